//! Tests for DSN tree building and design extraction

use dsn2kicad::parser::{Keyword, KeywordIndex, PadType, Side};
use dsn2kicad::{parse_dsn, ConversionError, DsnParseError, ParseError, SExpParser};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture should exist")
}

#[test]
fn test_every_span_matches_source() {
    let input = fixture("simple_board.dsn");
    let tree = SExpParser::new(&input).parse().expect("Should parse");

    assert_eq!(tree.roots().len(), 1);
    for node in tree.nodes() {
        assert_eq!(&input[node.start..node.end], node.text);
        assert!(node.text.starts_with('(') && node.text.ends_with(')'));
    }
}

#[test]
fn test_children_keep_parent_links() {
    let input = fixture("simple_board.dsn");
    let tree = SExpParser::new(&input).parse().expect("Should parse");

    for id in tree.ids() {
        for &child in &tree.node(id).children {
            assert_eq!(tree.node(child).parent, Some(id));
            let occurrences = tree.node(id).children.iter().filter(|&&c| c == child).count();
            assert_eq!(occurrences, 1);
        }
    }
}

#[test]
fn test_keyword_groups() {
    let input = fixture("simple_board.dsn");
    let tree = SExpParser::new(&input).parse().expect("Should parse");
    let index = KeywordIndex::build(&tree);

    assert_eq!(index.nodes(Keyword::Component).len(), 4);
    assert_eq!(index.nodes(Keyword::Image).len(), 3);
    assert_eq!(index.nodes(Keyword::Padstack).len(), 3);
    // three declarations plus three references from the wiring section
    assert_eq!(index.nodes(Keyword::Net).len(), 6);
    assert_eq!(index.nodes(Keyword::Other("resolution")).len(), 1);
}

#[test]
fn test_unbalanced_fixture_fails() {
    let input = fixture("unbalanced.dsn");
    let err = SExpParser::new(&input).parse().unwrap_err();
    assert!(matches!(err, ParseError::Unterminated { start: 0, .. }));
}

#[test]
fn test_parse_design_tables() {
    let design = parse_dsn(&fixture_path("simple_board.dsn")).expect("Should parse");

    assert_eq!(design.components.len(), 4);
    assert_eq!(design.images.len(), 3);
    assert_eq!(design.padstacks["TH_Round"].pad_type, PadType::ThruHole);
    assert_eq!(design.padstacks["SMD_Rect"].shapes.len(), 2);

    let u2 = design
        .components
        .iter()
        .find(|c| c.reference == "U2")
        .expect("U2 should be placed");
    assert_eq!(u2.side, Side::Back);
    assert_eq!(u2.rotation, -90.0);
    assert_eq!(u2.image, "SOIC8");
}

#[test]
fn test_net_numbers_first_seen() {
    let design = parse_dsn(&fixture_path("simple_board.dsn")).expect("Should parse");
    let nets: Vec<_> = design
        .nets
        .iter()
        .map(|n| (n.name.as_str(), n.number, n.pins.len()))
        .collect();
    assert_eq!(nets, vec![("GND", 0, 4), ("VCC", 1, 3), ("SIG", 2, 2)]);

    assert_eq!(design.net_for_pin("U1", "1").map(|n| n.number), Some(0));
    assert_eq!(design.net_for_pin("U2", "3").map(|n| n.number), Some(0));
    assert!(design.net_for_pin("U1", "3").is_none());
}

#[test]
fn test_regions_only_from_polygons() {
    let design = parse_dsn(&fixture_path("simple_board.dsn")).expect("Should parse");
    assert_eq!(design.regions.len(), 2);
    assert_eq!(design.regions[0].net_name, "GND");
    assert_eq!(design.regions[1].net_number, 1);
    assert_eq!(design.regions[1].layer, "layer3");
}

#[test]
fn test_bad_side_fixture() {
    let err = parse_dsn(&fixture_path("bad_side.dsn")).unwrap_err();
    assert!(matches!(
        err,
        ConversionError::Design(DsnParseError::UnknownSide { ref value, .. }) if value == "sideways"
    ));
    assert!(err.to_string().contains("sideways"));
}

#[test]
fn test_parse_missing_file() {
    let result = parse_dsn(&PathBuf::from("not_a_real_file.dsn"));
    assert!(matches!(result, Err(ConversionError::Io(_))));
}
