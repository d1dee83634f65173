pub mod cache;
pub mod classification;
pub mod cli;
pub mod engine;
pub mod error;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;
pub mod types;

pub use cache::{DocumentDigest, IndexCache};
pub use classification::{
    BrowseResult, Classification, ClassificationNode, CodeIndex, DiagnosisHierarchy, NodeKind,
    TextIndex,
};
pub use error::{MknError, ParseError};
pub use server::MknServer;
pub use state::MknState;
pub use types::{Diagnosis, SearchHit, SearchResponse};
