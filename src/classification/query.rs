//! Query dispatch: code-prefix search or diacritic-insensitive free-text search.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::index::{ClassificationNode, CodeIndex, TextIndex};
use super::normalize::tokenize;

/// Category codes look like `J06` or `J06.9`, chapters like `X`, blocks like `J00-J06`.
static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9]{1,3}(?:\.[0-9]{1,2})?$|^[A-Z0-9]{1,5}-[A-Z0-9]{2,5}$")
        .expect("code pattern is a valid regex")
});

/// Returns true when the trimmed query is shaped like a classification code.
pub fn is_code_query(query: &str) -> bool {
    CODE_PATTERN.is_match(query.trim())
}

/// Searches the classification, returning at most `max_results` nodes.
///
/// Code-shaped queries are matched as code prefixes in index order; anything
/// else goes through the text index and comes back sorted by code.
pub fn search<'a>(
    query: &str,
    max_results: usize,
    codes: &'a CodeIndex,
    text: &TextIndex,
) -> Vec<&'a ClassificationNode> {
    let query = query.trim();
    if is_code_query(query) {
        search_by_code(query, max_results, codes)
    } else {
        search_by_text(query, max_results, codes, text)
    }
}

/// Nodes whose code starts with `prefix`, case-insensitively.
///
/// Results follow code index order and the scan stops at `max_results`; they
/// are not re-sorted by code.
pub(crate) fn search_by_code<'a>(
    prefix: &str,
    max_results: usize,
    codes: &'a CodeIndex,
) -> Vec<&'a ClassificationNode> {
    let prefix = prefix.to_uppercase();
    codes
        .values()
        .filter(|node| node.code.to_uppercase().starts_with(&prefix))
        .take(max_results)
        .collect()
}

/// Nodes whose label matches every query token.
///
/// A token matches an indexed word when either one contains the other, which
/// tolerates partial words and light inflection. Short tokens are permissive:
/// "in" matches every word containing "in".
pub(crate) fn search_by_text<'a>(
    query: &str,
    max_results: usize,
    codes: &'a CodeIndex,
    text: &TextIndex,
) -> Vec<&'a ClassificationNode> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut candidates: Option<BTreeSet<&str>> = None;
    for token in &tokens {
        let matching: BTreeSet<&str> = text
            .words()
            .filter(|(word, _)| word.contains(token.as_str()) || token.contains(word))
            .flat_map(|(_, codes)| codes.iter().map(String::as_str))
            .collect();

        let narrowed = match candidates {
            None => matching,
            Some(previous) => previous.intersection(&matching).copied().collect(),
        };
        if narrowed.is_empty() {
            return Vec::new();
        }
        candidates = Some(narrowed);
    }

    candidates
        .unwrap_or_default()
        .into_iter()
        .filter_map(|code| codes.get(code))
        .take(max_results)
        .collect()
}
