//! The three classification operations: search, detail lookup, and browse.
//!
//! Each takes the raw ClaML document alongside its arguments and resolves the
//! indices through an [`IndexCache`], so repeated calls with the same document
//! never reparse. Failures come back as [`MknError`]; turning them into
//! error-shaped results is the tool layer's job.

use crate::cache::IndexCache;
use crate::classification::{self, BrowseResult, Classification, resolve_hierarchy};
use crate::error::MknError;
use crate::types::{Diagnosis, SearchHit, SearchResponse};
use std::sync::Arc;

/// Default number of search results.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Resolves the indices for `raw`, rejecting an empty document up front.
pub fn load(cache: &IndexCache, raw: &str) -> Result<Arc<Classification>, MknError> {
    if raw.trim().is_empty() {
        return Err(MknError::NoDataLoaded);
    }
    cache.get_or_parse(raw).map_err(|e| {
        tracing::error!("Failed to parse MKN-10 XML: {}", e);
        MknError::from(e)
    })
}

/// Searches by code prefix or free text.
pub fn search(
    cache: &IndexCache,
    query: &str,
    max_results: usize,
    raw: &str,
) -> Result<SearchResponse, MknError> {
    let indices = load(cache, raw)?;
    let query = query.trim();

    let results: Vec<SearchHit> = classification::search(
        query,
        max_results,
        indices.code_index(),
        indices.text_index(),
    )
    .into_iter()
    .map(SearchHit::from)
    .collect();

    tracing::debug!("Search '{}' matched {} classes", query, results.len());

    Ok(SearchResponse {
        query: query.to_string(),
        total: results.len(),
        results,
    })
}

/// Full record for one code, with its resolved hierarchy.
pub fn get_detail(cache: &IndexCache, code: &str, raw: &str) -> Result<Diagnosis, MknError> {
    let indices = load(cache, raw)?;
    let codes = indices.code_index();

    let node = codes
        .get(code.trim())
        .ok_or_else(|| MknError::CodeNotFound(code.to_string()))?;

    let hierarchy = resolve_hierarchy(&node.code, codes);
    if hierarchy.is_none() {
        tracing::warn!("Could not resolve hierarchy for '{}'", node.code);
    }

    Ok(Diagnosis::new(node, hierarchy))
}

/// Lists the chapters, or one node with its immediate children.
pub fn browse(cache: &IndexCache, code: Option<&str>, raw: &str) -> Result<BrowseResult, MknError> {
    let indices = load(cache, raw)?;
    classification::browse(code, indices.code_index())
}
