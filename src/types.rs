use crate::classification::{ClassificationNode, DiagnosisHierarchy, Modifier, NodeKind};
use serde::{Deserialize, Serialize};

/// Provenance tag carried on every detail record.
pub const SOURCE: &str = "UZIS/MKN-10";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub code: String,
    pub label: String,
    pub kind: NodeKind,
}

impl From<&ClassificationNode> for SearchHit {
    fn from(node: &ClassificationNode) -> Self {
        Self {
            code: node.code.clone(),
            label: node.label.clone(),
            kind: node.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The query as searched, trimmed
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchHit>,
}

/// Full diagnosis record for a single code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub code: String,
    pub label: String,
    pub label_en: Option<String>,
    pub kind: NodeKind,
    pub parent_code: Option<String>,
    pub children: Vec<String>,
    pub definition: Option<String>,
    /// `None` when the ancestry could not be resolved; the rest is still valid
    pub hierarchy: Option<DiagnosisHierarchy>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub modifiers: Vec<Modifier>,
    pub source: String,
}

impl Diagnosis {
    pub fn new(node: &ClassificationNode, hierarchy: Option<DiagnosisHierarchy>) -> Self {
        Self {
            code: node.code.clone(),
            label: node.label.clone(),
            label_en: node.label_en.clone(),
            kind: node.kind,
            parent_code: node.parent_code.clone(),
            children: node.children.clone(),
            definition: node.definition.clone(),
            hierarchy,
            includes: node.includes.clone(),
            excludes: node.excludes.clone(),
            modifiers: node.modifiers.clone(),
            source: SOURCE.to_string(),
        }
    }
}
