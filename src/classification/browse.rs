//! Hierarchy navigation: list the chapters or expand one node by a single level.

use serde::{Deserialize, Serialize};

use super::index::{ClassificationNode, CodeIndex, NodeKind};
use crate::error::MknError;

/// A node with its children listed by code only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub code: String,
    pub label: String,
    pub kind: NodeKind,
    pub children: Vec<String>,
}

impl From<&ClassificationNode> for NodeSummary {
    fn from(node: &ClassificationNode) -> Self {
        Self {
            code: node.code.clone(),
            label: node.label.clone(),
            kind: node.kind,
            children: node.children.clone(),
        }
    }
}

/// A node with its immediate children expanded one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub code: String,
    pub label: String,
    pub kind: NodeKind,
    pub parent_code: Option<String>,
    pub children: Vec<NodeSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Chapters,
}

/// Every chapter of the classification, sorted by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterListing {
    #[serde(rename = "type")]
    pub listing: ListingType,
    pub items: Vec<NodeSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BrowseResult {
    Chapters(ChapterListing),
    Node(NodeView),
}

/// Lists the chapters when `code` is `None`, otherwise expands that node.
pub fn browse(code: Option<&str>, codes: &CodeIndex) -> Result<BrowseResult, MknError> {
    let Some(code) = code else {
        let mut items: Vec<NodeSummary> = codes.chapters().map(NodeSummary::from).collect();
        items.sort_by(|a, b| a.code.cmp(&b.code));
        return Ok(BrowseResult::Chapters(ChapterListing {
            listing: ListingType::Chapters,
            items,
        }));
    };

    let node = codes
        .get(code.trim())
        .ok_or_else(|| MknError::CodeNotFound(code.to_string()))?;

    let children = node
        .children
        .iter()
        .filter_map(|child| codes.get(child))
        .map(NodeSummary::from)
        .collect();

    Ok(BrowseResult::Node(NodeView {
        code: node.code.clone(),
        label: node.label.clone(),
        kind: node.kind,
        parent_code: node.parent_code.clone(),
        children,
    }))
}
