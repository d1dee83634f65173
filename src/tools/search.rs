//! Code-prefix and free-text search over the loaded classification.

use crate::engine::{self, DEFAULT_MAX_RESULTS};
use crate::state::MknState;
use crate::tools::to_json;
use rmcp::schemars;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Diagnosis code or prefix (e.g. "J06"), or Czech text with or without diacritics
    pub query: String,
    /// Maximum number of results to return (default: 10)
    #[serde(default = "default_max_results")]
    pub max_results: Option<usize>,
}

fn default_max_results() -> Option<usize> {
    Some(DEFAULT_MAX_RESULTS)
}

/// Execute a search against the current document.
///
/// Failures come back as `{"error": ..., "results": []}` rather than `Err`.
pub async fn handle_search(state: &Arc<MknState>, request: SearchRequest) -> Result<String, String> {
    let raw = state.document().await;
    let max_results = request.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

    match engine::search(state.cache(), &request.query, max_results, &raw) {
        Ok(response) => to_json(&response),
        Err(e) => to_json(&json!({ "error": e.to_string(), "results": [] })),
    }
}
