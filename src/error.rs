//! Error handling types and utilities.

use crate::classification::NodeKind;

/// A specialized Result type for application plumbing (startup, file loading).
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods. Classification operations use [`MknError`] instead.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a raw ClaML document cannot be decoded into indices.
///
/// Parsing is all-or-nothing: any of these aborts the build and nothing is cached.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("root element is <{0}>, expected <ClaML>")]
    NotClaml(String),

    #[error("<{element}> at line {line} is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
        line: u32,
    },

    #[error("class '{code}' has unknown kind '{kind}'")]
    UnknownKind { code: String, kind: String },

    #[error("class '{0}' has no preferred label")]
    MissingLabel(String),

    #[error("duplicate class code '{0}'")]
    DuplicateCode(String),

    #[error("class '{code}' references undeclared class '{target}'")]
    DanglingReference { code: String, target: String },

    #[error("class '{code}' declares parent '{declared}' but is listed as a subclass of '{claimed}'")]
    ConflictingParent {
        code: String,
        declared: String,
        claimed: String,
    },

    #[error("{kind} '{code}' has no parent class")]
    Orphan { code: String, kind: NodeKind },

    #[error("chapter '{code}' declares parent '{parent}'")]
    ChapterWithParent { code: String, parent: String },

    #[error("cycle in parent links at class '{0}'")]
    Cycle(String),
}

/// Failure of one of the classification operations (search, detail, browse).
///
/// Tool handlers turn these into error-shaped JSON; they never cross the
/// tool boundary as `Err`.
#[derive(Debug, thiserror::Error)]
pub enum MknError {
    #[error("No MKN-10 data loaded.")]
    NoDataLoaded,

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Code not found: {0}")]
    CodeNotFound(String),
}
