//! In-memory code index and inverted text index over a parsed classification.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::normalize::tokenize;

/// Position of a node in the chapter → block → category hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Chapter,
    Block,
    Category,
}

impl NodeKind {
    /// Parses the ClaML `kind` attribute value.
    pub fn from_claml(kind: &str) -> Option<Self> {
        match kind {
            "chapter" => Some(Self::Chapter),
            "block" => Some(Self::Block),
            "category" => Some(Self::Category),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Block => "block",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic modifier attached to a class through `ModifiedBy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub code: String,
    pub name: String,
}

/// One class of the classification, with its links into the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationNode {
    /// Unique code, e.g. `J06.9`, `J00-J06` or a chapter numeral
    pub code: String,
    /// Preferred label in the primary (Czech) language
    pub label: String,
    /// Preferred English label, when the document carries one
    pub label_en: Option<String>,
    pub kind: NodeKind,
    /// `None` only for chapters
    pub parent_code: Option<String>,
    /// Immediate children in document order
    pub children: Vec<String>,
    pub definition: Option<String>,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub modifiers: Vec<Modifier>,
}

impl ClassificationNode {
    /// Creates a bare node with no links or supplementary rubrics.
    pub fn new(code: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            label_en: None,
            kind,
            parent_code: None,
            children: Vec::new(),
            definition: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    pub fn is_chapter(&self) -> bool {
        self.kind == NodeKind::Chapter
    }
}

/// Map from code to node, iterated in document order.
///
/// Nodes live in a `Vec` so iteration order is the insertion order; the hash
/// maps only hold positions into it.
#[derive(Debug, Clone, Default)]
pub struct CodeIndex {
    nodes: Vec<ClassificationNode>,
    positions: AHashMap<String, usize>,
    /// Upper-cased code → position, for case-insensitive lookups
    folded: AHashMap<String, usize>,
}

impl CodeIndex {
    /// Builds the index from nodes in document order.
    ///
    /// Callers must have rejected duplicate codes already; a later duplicate
    /// would shadow the earlier one in lookups.
    pub(crate) fn from_nodes(nodes: Vec<ClassificationNode>) -> Self {
        let mut positions = AHashMap::with_capacity(nodes.len());
        let mut folded = AHashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            positions.insert(node.code.clone(), position);
            folded.entry(node.code.to_uppercase()).or_insert(position);
        }
        Self {
            nodes,
            positions,
            folded,
        }
    }

    /// Looks up a node by code. Exact casing wins; otherwise the code is
    /// matched case-insensitively.
    pub fn get(&self, code: &str) -> Option<&ClassificationNode> {
        self.positions
            .get(code)
            .or_else(|| self.folded.get(&code.to_uppercase()))
            .and_then(|&position| self.nodes.get(position))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// All nodes in document order.
    pub fn values(&self) -> impl Iterator<Item = &ClassificationNode> {
        self.nodes.iter()
    }

    /// Chapter nodes in document order.
    pub fn chapters(&self) -> impl Iterator<Item = &ClassificationNode> {
        self.nodes.iter().filter(|node| node.is_chapter())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

static NO_CODES: BTreeSet<String> = BTreeSet::new();

/// Inverted index from normalized label word to the codes whose label contains it.
#[derive(Debug, Clone, Default)]
pub struct TextIndex {
    words: AHashMap<String, BTreeSet<String>>,
}

impl TextIndex {
    /// Indexes every node's preferred label.
    pub(crate) fn build<'a>(nodes: impl IntoIterator<Item = &'a ClassificationNode>) -> Self {
        let mut words: AHashMap<String, BTreeSet<String>> = AHashMap::new();
        for node in nodes {
            for token in tokenize(&node.label) {
                words.entry(token).or_default().insert(node.code.clone());
            }
        }
        Self { words }
    }

    /// Codes indexed under exactly `word`. Unknown words yield an empty set.
    pub fn get(&self, word: &str) -> &BTreeSet<String> {
        self.words.get(word).unwrap_or(&NO_CODES)
    }

    /// Every indexed word with its codes, in no particular order.
    pub fn words(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.words
            .iter()
            .map(|(word, codes)| (word.as_str(), codes))
    }

    /// Number of distinct indexed words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Both indices built from one raw document. Immutable once constructed.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    codes: CodeIndex,
    text: TextIndex,
}

impl Classification {
    pub(crate) fn new(codes: CodeIndex, text: TextIndex) -> Self {
        Self { codes, text }
    }

    pub fn code_index(&self) -> &CodeIndex {
        &self.codes
    }

    pub fn text_index(&self) -> &TextIndex {
        &self.text
    }

    /// Number of classes in the document.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn chapter_count(&self) -> usize {
        self.codes.chapters().count()
    }
}
