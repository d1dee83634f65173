//! ClaML document decoding into the code and text indices.
//!
//! The document is read once into a DOM, each `<Class>` is decoded into a
//! node, and the `SuperClass`/`SubClass` references are then reconciled into
//! consistent parent and child links before the indices are built.

use ahash::AHashMap;
use roxmltree::{Document, Node, ParsingOptions};
use std::time::Instant;

use super::index::{Classification, ClassificationNode, CodeIndex, Modifier, NodeKind, TextIndex};
use crate::error::ParseError;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Language of the primary label. Labels without `xml:lang` count as primary.
const PRIMARY_LANGUAGE: &str = "cs";
const SECONDARY_LANGUAGE: &str = "en";

/// Modifier name → modifier classes, in document order.
type ModifierTable = AHashMap<String, Vec<Modifier>>;

/// Parses a raw ClaML document into both indices.
pub fn parse(raw: &str) -> Result<Classification, ParseError> {
    let start = Instant::now();

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(raw, options)?;
    let root = document.root_element();
    if root.tag_name().name() != "ClaML" {
        return Err(ParseError::NotClaml(root.tag_name().name().to_string()));
    }

    let modifiers = collect_modifiers(&document, root)?;

    let mut builder = TreeBuilder::default();
    for class in root.children().filter(|n| n.has_tag_name("Class")) {
        builder.push(decode_class(&document, class, &modifiers)?)?;
    }
    let nodes = builder.finish()?;

    let text = TextIndex::build(&nodes);
    let codes = CodeIndex::from_nodes(nodes);

    tracing::info!(
        "Parsed ClaML document: {} classes, {} chapters, {} indexed words in {:?}",
        codes.len(),
        codes.chapters().count(),
        text.len(),
        start.elapsed()
    );

    Ok(Classification::new(codes, text))
}

/// A decoded `<Class>` before its references are reconciled.
#[derive(Debug)]
struct RawClass {
    node: ClassificationNode,
    super_code: Option<String>,
    sub_codes: Vec<String>,
}

/// Accumulates decoded classes and turns their references into links.
#[derive(Debug, Default)]
struct TreeBuilder {
    classes: Vec<RawClass>,
    positions: AHashMap<String, usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    OnPath,
    Done,
}

impl TreeBuilder {
    fn push(&mut self, class: RawClass) -> Result<(), ParseError> {
        let position = self.classes.len();
        if self
            .positions
            .insert(class.node.code.clone(), position)
            .is_some()
        {
            return Err(ParseError::DuplicateCode(class.node.code));
        }
        self.classes.push(class);
        Ok(())
    }

    fn position_of(&self, code: &str, target: &str) -> Result<usize, ParseError> {
        self.positions
            .get(target)
            .copied()
            .ok_or_else(|| ParseError::DanglingReference {
                code: code.to_string(),
                target: target.to_string(),
            })
    }

    /// Resolves parents and children and validates the resulting forest.
    fn finish(self) -> Result<Vec<ClassificationNode>, ParseError> {
        let count = self.classes.len();

        // Parents declared through SuperClass.
        let mut parents: Vec<Option<usize>> = Vec::with_capacity(count);
        for class in &self.classes {
            let parent = class
                .super_code
                .as_deref()
                .map(|target| self.position_of(&class.node.code, target))
                .transpose()?;
            parents.push(parent);
        }

        // SubClass references fill in missing parents and must agree with declared ones.
        let mut explicit_children: Vec<Vec<usize>> = Vec::with_capacity(count);
        for (position, class) in self.classes.iter().enumerate() {
            let mut children = Vec::with_capacity(class.sub_codes.len());
            for target in &class.sub_codes {
                let child = self.position_of(&class.node.code, target)?;
                match parents[child] {
                    None => parents[child] = Some(position),
                    Some(existing) if existing == position => {}
                    Some(existing) => {
                        return Err(ParseError::ConflictingParent {
                            code: target.clone(),
                            declared: self.classes[existing].node.code.clone(),
                            claimed: class.node.code.clone(),
                        });
                    }
                }
                if !children.contains(&child) {
                    children.push(child);
                }
            }
            explicit_children.push(children);
        }

        check_acyclic(&parents, &self.classes)?;

        // Children named only through the child's SuperClass go after the
        // explicit ones, in document order.
        let mut implicit_children: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (child, parent) in parents.iter().enumerate() {
            if let Some(parent) = *parent
                && !explicit_children[parent].contains(&child)
            {
                implicit_children[parent].push(child);
            }
        }

        let codes: Vec<String> = self.classes.iter().map(|c| c.node.code.clone()).collect();
        let mut nodes = Vec::with_capacity(count);
        for (position, class) in self.classes.into_iter().enumerate() {
            let mut node = class.node;
            node.parent_code = parents[position].map(|parent| codes[parent].clone());
            node.children = explicit_children[position]
                .iter()
                .chain(&implicit_children[position])
                .map(|&child| codes[child].clone())
                .collect();

            match (&node.parent_code, node.kind) {
                (Some(parent), NodeKind::Chapter) => {
                    return Err(ParseError::ChapterWithParent {
                        code: node.code,
                        parent: parent.clone(),
                    });
                }
                (None, kind) if kind != NodeKind::Chapter => {
                    return Err(ParseError::Orphan {
                        code: node.code,
                        kind,
                    });
                }
                _ => {}
            }
            nodes.push(node);
        }

        Ok(nodes)
    }
}

/// Walks every parent chain once, failing on the first revisited class.
fn check_acyclic(parents: &[Option<usize>], classes: &[RawClass]) -> Result<(), ParseError> {
    let mut state = vec![Visit::Unseen; parents.len()];
    for start in 0..parents.len() {
        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(position) = current {
            match state[position] {
                Visit::Done => break,
                Visit::OnPath => {
                    return Err(ParseError::Cycle(classes[position].node.code.clone()));
                }
                Visit::Unseen => {
                    state[position] = Visit::OnPath;
                    path.push(position);
                    current = parents[position];
                }
            }
        }
        for position in path {
            state[position] = Visit::Done;
        }
    }
    Ok(())
}

/// Decodes one `<Class>` element.
fn decode_class(
    document: &Document<'_>,
    class: Node<'_, '_>,
    modifiers: &ModifierTable,
) -> Result<RawClass, ParseError> {
    let code = required_attribute(document, class, "code")?.trim().to_string();
    let kind_attr = required_attribute(document, class, "kind")?;
    let kind = NodeKind::from_claml(kind_attr).ok_or_else(|| ParseError::UnknownKind {
        code: code.clone(),
        kind: kind_attr.to_string(),
    })?;

    let mut rubrics = Rubrics::default();
    let mut super_code = None;
    let mut sub_codes = Vec::new();
    let mut modified_by = Vec::new();

    for child in class.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "SuperClass" => {
                let target = required_attribute(document, child, "code")?.trim();
                if super_code.is_none() {
                    super_code = Some(target.to_string());
                } else {
                    tracing::warn!(
                        "Class '{}' declares more than one SuperClass, keeping the first",
                        code
                    );
                }
            }
            "SubClass" => {
                sub_codes.push(required_attribute(document, child, "code")?.trim().to_string());
            }
            "ModifiedBy" => {
                let modifier = required_attribute(document, child, "code")?;
                match modifiers.get(modifier) {
                    Some(classes) => modified_by.extend(classes.iter().cloned()),
                    None => tracing::debug!(
                        "Class '{}' is modified by unknown modifier '{}'",
                        code,
                        modifier
                    ),
                }
            }
            "Rubric" => rubrics.add(child),
            _ => {}
        }
    }

    let label = rubrics
        .preferred
        .or(rubrics.preferred_any)
        .ok_or_else(|| ParseError::MissingLabel(code.clone()))?;

    let mut node = ClassificationNode::new(code, label, kind);
    node.label_en = rubrics.preferred_en;
    node.definition = rubrics.definition;
    node.includes = rubrics.includes;
    node.excludes = rubrics.excludes;
    node.modifiers = modified_by;

    Ok(RawClass {
        node,
        super_code,
        sub_codes,
    })
}

/// Label texts gathered from a class's rubrics.
#[derive(Debug, Default)]
struct Rubrics {
    preferred: Option<String>,
    preferred_en: Option<String>,
    preferred_any: Option<String>,
    definition: Option<String>,
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl Rubrics {
    fn add(&mut self, rubric: Node<'_, '_>) {
        let kind = rubric.attribute("kind").unwrap_or_default();
        for label in rubric.children().filter(|n| n.has_tag_name("Label")) {
            let language = label.attribute((XML_NAMESPACE, "lang"));
            let primary = language.is_none_or(|lang| lang == PRIMARY_LANGUAGE);
            let text = label_text(label);
            if text.is_empty() {
                continue;
            }

            match kind {
                "preferred" => {
                    if primary {
                        self.preferred.get_or_insert_with(|| text.clone());
                    } else if language == Some(SECONDARY_LANGUAGE) {
                        self.preferred_en.get_or_insert_with(|| text.clone());
                    }
                    self.preferred_any.get_or_insert(text);
                }
                "inclusion" if primary => self.includes.push(text),
                "exclusion" if primary => self.excludes.push(text),
                "definition" if primary => {
                    self.definition.get_or_insert(text);
                }
                _ => {}
            }
        }
    }
}

/// Collects the text of a `<Label>`, including nested fragments and
/// references, with whitespace collapsed.
fn label_text(label: Node<'_, '_>) -> String {
    let mut raw = String::new();
    for node in label.descendants().skip(1) {
        if node.is_text() {
            raw.push_str(node.text().unwrap_or_default());
        } else if node.has_tag_name("Fragment") || node.has_tag_name("Para") {
            raw.push(' ');
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads every `<ModifierClass>` into a table keyed by its modifier name.
fn collect_modifiers(document: &Document<'_>, root: Node<'_, '_>) -> Result<ModifierTable, ParseError> {
    let mut table = ModifierTable::new();
    for class in root.children().filter(|n| n.has_tag_name("ModifierClass")) {
        let modifier = required_attribute(document, class, "modifier")?;
        let code = required_attribute(document, class, "code")?;

        let mut rubrics = Rubrics::default();
        for rubric in class.children().filter(|n| n.has_tag_name("Rubric")) {
            rubrics.add(rubric);
        }

        table.entry(modifier.to_string()).or_default().push(Modifier {
            code: code.to_string(),
            name: rubrics.preferred.or(rubrics.preferred_any).unwrap_or_default(),
        });
    }
    Ok(table)
}

fn required_attribute<'a>(
    document: &Document<'_>,
    element: Node<'a, '_>,
    attribute: &'static str,
) -> Result<&'a str, ParseError> {
    element
        .attribute(attribute)
        .ok_or_else(|| ParseError::MissingAttribute {
            element: element.tag_name().name().to_string(),
            attribute,
            line: document.text_pos_at(element.range().start).row,
        })
}
