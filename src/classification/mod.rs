//! MKN-10 classification engine: ClaML decoding, indices, search, and navigation.
//!
//! A raw ClaML document is parsed once into a [`Classification`] holding a
//! code index and an inverted text index; searches, detail lookups, and
//! hierarchy browsing all read from those immutable indices.

// Module declarations
pub(crate) mod browse;
pub(crate) mod claml;
pub(crate) mod hierarchy;
pub(crate) mod index;
pub(crate) mod normalize;
pub(crate) mod query;

// Public re-exports (used via lib.rs)
pub use browse::{BrowseResult, ChapterListing, ListingType, NodeSummary, NodeView, browse};
pub use claml::parse;
pub use hierarchy::{DiagnosisHierarchy, resolve_hierarchy};
pub use index::{Classification, ClassificationNode, CodeIndex, Modifier, NodeKind, TextIndex};
pub use normalize::normalize;
pub use query::{is_code_query, search};
