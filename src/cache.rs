//! Memoized ClaML parsing keyed by a digest of the raw document.
//!
//! The same document string always yields the same indices, so a cache hit
//! skips parsing entirely. A different document misses and is parsed fresh;
//! older documents age out of the LRU.

use crate::classification::{Classification, parse};
use crate::error::ParseError;
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use xxhash_rust::xxh3::xxh3_128;

/// Number of parsed documents kept in memory by default.
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(4).unwrap();

/// Content digest of a raw document: 128-bit XXH3 plus byte length.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct DocumentDigest {
    hash: u128,
    len: usize,
}

impl DocumentDigest {
    pub fn of(raw: &str) -> Self {
        Self {
            hash: xxh3_128(raw.as_bytes()),
            len: raw.len(),
        }
    }

    /// Returns the hash as a lowercase hexadecimal string
    pub fn as_hex(&self) -> String {
        format!("{:032x}", self.hash)
    }

    /// Size of the digested document in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for DocumentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.as_hex(), self.len)
    }
}

/// Parsed classifications keyed by document digest.
///
/// Lookups hold the lock only briefly; parsing runs outside it, so two callers
/// racing on the same new document may both parse it. Both results are
/// identical and the later insert simply replaces the earlier one.
pub struct IndexCache {
    entries: Mutex<LruCache<DocumentDigest, Arc<Classification>>>,
    parses: AtomicUsize,
}

impl fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexCache")
            .field("entries", &self.len())
            .field("parses", &self.parse_count())
            .finish()
    }
}

impl Default for IndexCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl IndexCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            parses: AtomicUsize::new(0),
        }
    }

    /// Returns the cached indices for `raw`, parsing it on a miss.
    ///
    /// Failed parses are not cached; the next call will try again.
    pub fn get_or_parse(&self, raw: &str) -> Result<Arc<Classification>, ParseError> {
        let digest = DocumentDigest::of(raw);

        if let Some(classification) = self.lock().get(&digest) {
            tracing::debug!("Cache hit for document {}", digest);
            return Ok(Arc::clone(classification));
        }

        tracing::debug!("Cache miss for document {}, parsing", digest);
        self.parses.fetch_add(1, Ordering::Relaxed);
        let classification = Arc::new(parse(raw)?);

        self.lock().put(digest, Arc::clone(&classification));
        Ok(classification)
    }

    /// Whether `raw` has already been parsed and is still cached.
    pub fn contains(&self, raw: &str) -> bool {
        self.lock().contains(&DocumentDigest::of(raw))
    }

    /// Number of parse attempts made so far, successful or not.
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every cached classification.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<DocumentDigest, Arc<Classification>>> {
        // Entries are only ever replaced whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    const DOCUMENT: &str = r#"<ClaML>
      <Class code="I" kind="chapter"><Rubric kind="preferred"><Label>Infekční nemoci</Label></Rubric></Class>
    </ClaML>"#;

    const OTHER_DOCUMENT: &str = r#"<ClaML>
      <Class code="II" kind="chapter"><Rubric kind="preferred"><Label>Novotvary</Label></Rubric></Class>
    </ClaML>"#;

    #[test]
    fn test_same_document_parsed_once() {
        let cache = IndexCache::default();
        let_assert!(Ok(first) = cache.get_or_parse(DOCUMENT));
        let_assert!(Ok(second) = cache.get_or_parse(DOCUMENT));

        check!(cache.parse_count() == 1);
        check!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_different_document_reparses() {
        let cache = IndexCache::default();
        let_assert!(Ok(first) = cache.get_or_parse(DOCUMENT));
        let_assert!(Ok(second) = cache.get_or_parse(OTHER_DOCUMENT));

        check!(cache.parse_count() == 2);
        check!(first.code_index().get("I").is_some());
        check!(second.code_index().get("II").is_some());
        check!(second.code_index().get("I").is_none());
    }

    #[test]
    fn test_failed_parse_not_cached() {
        let cache = IndexCache::default();
        check!(cache.get_or_parse("<ClaML>").is_err());
        check!(cache.get_or_parse("<ClaML>").is_err());

        check!(cache.parse_count() == 2);
        check!(cache.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = IndexCache::new(NonZeroUsize::MIN);
        let_assert!(Ok(_) = cache.get_or_parse(DOCUMENT));
        let_assert!(Ok(_) = cache.get_or_parse(OTHER_DOCUMENT));

        check!(!cache.contains(DOCUMENT));
        check!(cache.contains(OTHER_DOCUMENT));

        let_assert!(Ok(_) = cache.get_or_parse(DOCUMENT));
        check!(cache.parse_count() == 3);
    }

    #[test]
    fn test_clear() {
        let cache = IndexCache::default();
        let_assert!(Ok(_) = cache.get_or_parse(DOCUMENT));
        cache.clear();
        check!(cache.is_empty());

        let_assert!(Ok(_) = cache.get_or_parse(DOCUMENT));
        check!(cache.parse_count() == 2);
    }

    #[rstest]
    #[case("", "")]
    #[case("abc", "abc")]
    #[case(DOCUMENT, DOCUMENT)]
    fn test_digest_is_stable(#[case] left: &str, #[case] right: &str) {
        let digest = DocumentDigest::of(left);
        check!(digest == DocumentDigest::of(right));
        check!(digest.as_hex().len() == 32);
        check!(digest.len() == left.len());
    }

    #[test]
    fn test_digest_distinguishes_content() {
        check!(DocumentDigest::of(DOCUMENT) != DocumentDigest::of(OTHER_DOCUMENT));
    }
}
