//! Invariants of a parsed classification, checked over the shared sample.

mod common;

use assert2::{check, let_assert};
use common::{SAMPLE_CLAML, TEXT_CLAML};
use mkn_mcp::classification::{Classification, NodeKind, normalize, parse, resolve_hierarchy};
use rstest::rstest;

fn parse_ok(raw: &str) -> Classification {
    let_assert!(Ok(classification) = parse(raw));
    classification
}

#[rstest]
#[case("Akutní infekce horních cest dýchacích")]
#[case("ŽLUTOUČKÝ KŮŇ ÚPĚL ĎÁBELSKÉ ÓDY")]
#[case("already plain")]
#[case("")]
#[case("Ａｃｕｔｅ ﬁbrosis")]
fn normalization_is_idempotent(#[case] text: &str) {
    let once = normalize(text);
    check!(normalize(&once) == once);
}

/// Every node reachable by iteration is returned unchanged by code lookup.
#[rstest]
#[case(SAMPLE_CLAML)]
#[case(TEXT_CLAML)]
fn code_lookup_round_trips(#[case] raw: &str) {
    let classification = parse_ok(raw);
    let codes = classification.code_index();

    for node in codes.values() {
        let_assert!(Some(found) = codes.get(&node.code));
        check!(found == node);
    }
}

#[rstest]
#[case(SAMPLE_CLAML)]
#[case(TEXT_CLAML)]
fn children_point_back_to_parent(#[case] raw: &str) {
    let classification = parse_ok(raw);
    let codes = classification.code_index();

    for node in codes.values() {
        for child in &node.children {
            let_assert!(Some(child) = codes.get(child));
            check!(child.parent_code.as_deref() == Some(node.code.as_str()));
        }
        if let Some(parent) = node.parent_code.as_deref() {
            let_assert!(Some(parent) = codes.get(parent));
            check!(parent.children.contains(&node.code));
        }
    }
}

#[test]
fn only_chapters_lack_parents() {
    let classification = parse_ok(SAMPLE_CLAML);
    for node in classification.code_index().values() {
        check!(node.parent_code.is_none() == (node.kind == NodeKind::Chapter));
    }
    check!(classification.chapter_count() == 2);
}

/// Every category resolves to a hierarchy rooted at its chapter.
#[test]
fn every_category_resolves() {
    let classification = parse_ok(TEXT_CLAML);
    let codes = classification.code_index();

    for node in codes.values().filter(|n| n.kind == NodeKind::Category) {
        let_assert!(Some(hierarchy) = resolve_hierarchy(&node.code, codes));
        check!(hierarchy.chapter == "X");
        check!(hierarchy.category == node.code);
        check!(hierarchy.block.is_some());
    }
}

#[test]
fn text_index_holds_normalized_words() {
    let classification = parse_ok(TEXT_CLAML);
    let text = classification.text_index();

    check!(text.get("akutni").iter().collect::<Vec<_>>() == vec!["J06", "J20"]);
    check!(text.get("akutní").is_empty());
    check!(text.get("ns").iter().collect::<Vec<_>>() == vec!["J06.9"]);
    check!(text.words().all(|(word, _)| word == normalize(word)));
}
