//! Shared server state: the loaded ClaML document and the parsed-index cache.
//!
//! Tool handlers read the current document and hand it to the engine, which
//! resolves indices through the cache. Loading a new document swaps the text;
//! the cache keeps older parses until they age out.

use crate::cache::{DEFAULT_CACHE_CAPACITY, IndexCache};
use crate::classification::Classification;
use crate::error::{MknError, Result};
use anyhow::Context;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A ClaML document read from disk.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub raw: Arc<str>,
}

/// Central coordination point for the server.
pub struct MknState {
    /// Parsed indices keyed by document digest
    cache: Arc<IndexCache>,

    /// Currently loaded document (if any)
    document: RwLock<Option<LoadedDocument>>,
}

impl std::fmt::Debug for MknState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MknState")
            .field("cache", &self.cache)
            .field("has_document", &self.document.try_read().is_ok_and(|d| d.is_some()))
            .finish()
    }
}

impl Default for MknState {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl MknState {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: Arc::new(IndexCache::new(capacity)),
            document: RwLock::new(None),
        }
    }

    /// Create a state with `raw` already loaded, as if read from `path`.
    pub fn with_document(capacity: NonZeroUsize, path: impl Into<PathBuf>, raw: &str) -> Self {
        Self {
            cache: Arc::new(IndexCache::new(capacity)),
            document: RwLock::new(Some(LoadedDocument {
                path: path.into(),
                raw: Arc::from(raw),
            })),
        }
    }

    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Raw text of the current document; empty when nothing is loaded.
    pub async fn document(&self) -> Arc<str> {
        self.document
            .read()
            .await
            .as_ref()
            .map_or_else(|| Arc::from(""), |d| Arc::clone(&d.raw))
    }

    /// Path the current document was read from.
    pub async fn source_path(&self) -> Option<PathBuf> {
        self.document.read().await.as_ref().map(|d| d.path.clone())
    }

    pub async fn has_document(&self) -> bool {
        self.document.read().await.is_some()
    }

    /// Replace the current document, returning the previous path.
    pub async fn set_document(&self, path: PathBuf, raw: Arc<str>) -> Option<PathBuf> {
        let previous = self
            .document
            .write()
            .await
            .replace(LoadedDocument { path, raw });
        previous.map(|d| d.path)
    }

    /// Read a ClaML file, parse it, and make it the current document.
    ///
    /// The document is only swapped in once it parses, so a bad file leaves the
    /// previous one in place. Parsing runs on the blocking pool.
    pub async fn load_file(&self, path: &Path) -> Result<(Arc<Classification>, Option<PathBuf>)> {
        let raw = read_document(path).await?;
        if raw.trim().is_empty() {
            return Err(MknError::NoDataLoaded)
                .with_context(|| format!("ClaML file is empty: {}", path.display()));
        }

        let cache = Arc::clone(&self.cache);
        let document = Arc::clone(&raw);
        let classification = tokio::task::spawn_blocking(move || cache.get_or_parse(&document))
            .await
            .context("ClaML parse task failed")?
            .map_err(MknError::from)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let previous = self.set_document(path.to_path_buf(), raw).await;
        tracing::info!(
            "Loaded {} classes from {}",
            classification.len(),
            path.display()
        );

        Ok((classification, previous))
    }
}

/// Read a document from disk into shared text.
pub async fn read_document(path: &Path) -> Result<Arc<str>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read ClaML file '{}'", path.display()))?;
    Ok(Arc::from(raw))
}
