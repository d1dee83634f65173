use crate::classification::Classification;
use crate::server::expand_tilde;
use crate::state::MknState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadClassificationRequest {
    /// Path to a ClaML XML export of MKN-10 (supports `~`)
    pub path: String,
}

/// Read, parse, and activate a ClaML document.
///
/// The previous document stays active if the new one cannot be read or parsed.
pub async fn handle_load_classification(
    state: &Arc<MknState>,
    request: LoadClassificationRequest,
) -> Result<String, String> {
    let path = PathBuf::from(expand_tilde(&request.path).as_ref());

    let (classification, previous) = state
        .load_file(&path)
        .await
        .map_err(|e| format!("Failed to load classification: {:#}", e))?;

    Ok(format_response(&path, &classification, previous.as_deref()))
}

/// Format a user-friendly summary of the loaded classification.
pub fn format_response(path: &Path, classification: &Classification, previous: Option<&Path>) -> String {
    let mut response = format!("Classification loaded: {}\n\n", path.display());

    let _ = writeln!(response, "Classes: {}", classification.len());
    let _ = writeln!(response, "Chapters: {}", classification.chapter_count());
    let _ = writeln!(response, "Indexed words: {}", classification.text_index().len());

    if let Some(previous) = previous {
        let _ = writeln!(response, "\nReplaced: {}", previous.display());
    }

    response
}
