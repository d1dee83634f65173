//! Chapter/block/category ancestry resolution by walking parent links.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use super::index::{ClassificationNode, CodeIndex, NodeKind};

/// Hierarchical position of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisHierarchy {
    /// Chapter code, e.g. `X`
    pub chapter: String,
    pub chapter_name: String,
    /// Block code, e.g. `J00-J06`; absent when a category hangs directly off a chapter
    pub block: Option<String>,
    pub block_name: Option<String>,
    /// Deepest category on the path, or the queried code itself
    pub category: String,
}

/// Resolves the ancestry of `code`.
///
/// Returns `None` when the code is unknown, when the walk never reaches a
/// chapter, or when the parent links loop.
pub fn resolve_hierarchy(code: &str, codes: &CodeIndex) -> Option<DiagnosisHierarchy> {
    let node = codes.get(code)?;

    // Self first, root last.
    let mut chain = vec![node];
    let mut visited = AHashSet::new();
    visited.insert(node.code.as_str());
    let mut current = node;
    while let Some(parent_code) = current.parent_code.as_deref() {
        let Some(parent) = codes.get(parent_code) else {
            tracing::debug!("Class '{}' has unknown parent '{}'", current.code, parent_code);
            break;
        };
        if !visited.insert(parent.code.as_str()) {
            tracing::warn!("Parent links loop back to '{}' from '{}'", parent.code, code);
            return None;
        }
        chain.push(parent);
        current = parent;
    }

    let mut chapter: Option<&ClassificationNode> = None;
    let mut block: Option<&ClassificationNode> = None;
    let mut category: Option<&ClassificationNode> = None;
    for &ancestor in chain.iter().rev() {
        match ancestor.kind {
            NodeKind::Chapter => {
                chapter.get_or_insert(ancestor);
            }
            NodeKind::Block => {
                block.get_or_insert(ancestor);
            }
            NodeKind::Category => category = Some(ancestor),
        }
    }

    let chapter = chapter?;
    Some(DiagnosisHierarchy {
        chapter: chapter.code.clone(),
        chapter_name: chapter.label.clone(),
        block: block.map(|b| b.code.clone()),
        block_name: block.map(|b| b.label.clone()),
        category: category.unwrap_or(node).code.clone(),
    })
}
