use crate::engine;
use crate::state::MknState;
use crate::tools::to_json;
use rmcp::schemars;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BrowseRequest {
    /// Code to expand. If omitted, lists all chapters.
    #[serde(default)]
    pub code: Option<String>,
}

/// Walk the hierarchy one level at a time.
pub async fn handle_browse(state: &Arc<MknState>, request: BrowseRequest) -> Result<String, String> {
    let raw = state.document().await;

    match engine::browse(state.cache(), request.code.as_deref(), &raw) {
        Ok(result) => to_json(&result),
        Err(e) => to_json(&json!({ "error": e.to_string() })),
    }
}
