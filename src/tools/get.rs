use crate::engine;
use crate::state::MknState;
use crate::tools::to_json;
use rmcp::schemars;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRequest {
    /// Diagnosis code to look up (e.g. "J06.9"); case-insensitive
    pub code: String,
}

/// Look up the full record for one code, or `{"error": ...}`.
pub async fn handle_get(state: &Arc<MknState>, request: GetRequest) -> Result<String, String> {
    let raw = state.document().await;

    match engine::get_detail(state.cache(), &request.code, &raw) {
        Ok(diagnosis) => to_json(&diagnosis),
        Err(e) => to_json(&json!({ "error": e.to_string() })),
    }
}
