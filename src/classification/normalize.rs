//! Diacritic-insensitive text normalization and label tokenization.
//!
//! The same normalization is applied to labels at index time and to free-text
//! queries at search time, so "akutní" and "akutni" land on the same term.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Minimum token length for indexing and querying. Single characters are noise.
pub(crate) const MIN_TOKEN_LENGTH: usize = 2;

/// Lower-cases `text` and strips diacritics down to the base Latin letter.
///
/// Canonical decomposition splits "ř" into "r" + combining caron; the marks
/// are then dropped. Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Normalizes `text` and splits it on whitespace, keeping tokens of at least
/// [`MIN_TOKEN_LENGTH`] characters.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_LENGTH)
        .map(str::to_owned)
        .collect()
}
