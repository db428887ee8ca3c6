//! End-to-end conversion tests

use dsn2kicad::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn convert_fixture(name: &str) -> ConversionResult {
    let content = std::fs::read_to_string(fixture_path(name)).expect("fixture should exist");
    Dsn2KicadCore::convert_str(&content, ConversionOptions::default()).expect("Should convert")
}

/// The `(module ...)` block of one reference designator.
fn module_block<'a>(output: &'a str, reference: &str) -> &'a str {
    let marker = format!("(fp_text reference {} ", reference);
    let at = output.find(&marker).expect("module should exist");
    let start = output[..at].rfind("(module ").expect("module header");
    let end = output[at..].find("\n  )\n").map(|e| at + e).unwrap_or(output.len());
    &output[start..end]
}

#[test]
fn test_convert_simple_board() {
    let result = convert_fixture("simple_board.dsn");

    assert_eq!(result.stats.modules, 4);
    assert_eq!(result.stats.nets, 3);
    assert_eq!(result.stats.zones, 2);
    assert_eq!(result.stats.skipped_through_hole_pads, 2);

    let out = &result.output;
    assert!(out.starts_with("(kicad_pcb (version 4)"));
    assert!(out.contains("(modules 4)"));
    assert!(out.contains("(nets 3)"));
    assert!(out.contains("  (net 0 \"GND\")\n  (net 1 \"VCC\")\n  (net 2 \"SIG\")\n"));
}

#[test]
fn test_output_parses_back() {
    let result = convert_fixture("simple_board.dsn");
    let tree = dsn2kicad::SExpParser::new(&result.output)
        .parse()
        .expect("Output should be balanced");
    assert_eq!(tree.roots().len(), 1);
}

#[test]
fn test_front_pad_geometry_and_net() {
    let result = convert_fixture("simple_board.dsn");
    let u1 = module_block(&result.output, "U1");

    assert!(u1.contains("(module SOIC8 (layer F.Cu)"));
    assert!(u1.contains("(at 112.7 112.7 0)"));
    assert!(u1.contains(
        "(pad 1 smd rect (at 96.19 98.095 0) (size 1.524 0.6096) (layers F.Cu F.Paste F.Mask)\n      (net 0 \"GND\"))"
    ));
    // pin 4 carries its own rotation
    assert!(u1.contains("(pad 4 smd rect (at 103.81 98.095 90)"));
    assert!(u1.contains("(pad 3 smd rect (at 103.81 101.905 0) (size 1.524 0.6096) (layers F.Cu F.Paste F.Mask))"));
}

#[test]
fn test_back_side_component_is_mirrored() {
    let result = convert_fixture("simple_board.dsn");
    let u2 = module_block(&result.output, "U2");

    assert!(u2.contains("(module SOIC8 (layer B.Cu)"));
    assert!(u2.contains("(at 138.1 112.7 -90)"));
    assert!(u2.contains("(layer B.SilkS)"));
    assert!(u2.contains(
        "(pad 3 smd rect (at 96.19 101.905 90) (size 1.524 0.6096) (layers B.Cu B.Paste B.Mask)\n      (net 0 \"GND\"))"
    ));
    assert!(!u2.contains("F.Cu"));
}

#[test]
fn test_mirror_matches_front_placement() {
    let result = convert_fixture("simple_board.dsn");
    let u1 = module_block(&result.output, "U1");
    let u2 = module_block(&result.output, "U2");

    // Pad 1 sits at local x=-150; mirrored it lands where pad 3 (x=150) would sit unmirrored.
    assert!(u1.contains("(pad 1 smd rect (at 96.19 98.095"));
    assert!(u2.contains("(pad 1 smd rect (at 103.81 98.095"));
    assert!(u1.contains("(pad 1 smd rect (at 96.19 98.095 0) (size 1.524 0.6096) (layers F.Cu"));
    assert!(u2.contains("(pad 1 smd rect (at 103.81 98.095 90) (size 1.524 0.6096) (layers B.Cu"));
}

#[test]
fn test_only_first_padstack_shape_is_used() {
    let result = convert_fixture("simple_board.dsn");
    assert!(result.output.contains("(size 1.524 0.6096)"));
    assert!(!result.output.contains("(size 1.27 0.508)"));
}

#[test]
fn test_circle_pads() {
    let result = convert_fixture("simple_board.dsn");
    let r1 = module_block(&result.output, "R1");
    assert!(r1.contains("(at 125.4 125.4 -180)"));
    assert!(r1.contains(
        "(pad 1 smd circle (at 98.984 100 180) (size 1.016 1.016) (layers F.Cu F.Paste F.Mask)\n      (net 1 \"VCC\"))"
    ));
}

#[test]
fn test_through_hole_pads_are_skipped() {
    let result = convert_fixture("simple_board.dsn");
    let j1 = module_block(&result.output, "J1");
    assert!(j1.contains("(fp_text reference J1 "));
    assert!(!j1.contains("(pad "));
}

#[test]
fn test_zones() {
    let result = convert_fixture("simple_board.dsn");
    let out = &result.output;
    assert!(out.contains("(zone (net 0) (net_name \"GND\") (layer F.Cu)"));
    assert!(out.contains("(xy 100 100) (xy 150.8 100) (xy 150.8 138.1) (xy 100 138.1)"));
    assert!(out.contains("(zone (net 1) (net_name \"VCC\") (layer In1.Cu)"));
    assert!(!out.contains("SIG\") (layer"));
}

#[test]
fn test_scenario_single_net() {
    let input = "(pcb \
        (image IC (pin P 1 0 0) (pin P 3 10 0)) \
        (padstack P (type smd) (shape (rect top -5 -5 5 5))) \
        (component IC (place U1 0 0 front 0)) \
        (component IC (place U2 100 0 front 0)) \
        (network (net GND (pins U1-1 U2-3))))";
    let result = Dsn2KicadCore::convert_str(input, ConversionOptions::default()).unwrap();
    let out = &result.output;

    assert!(out.contains("(net 0 \"GND\")"));
    let u1 = module_block(out, "U1");
    let u2 = module_block(out, "U2");
    assert!(u1.contains("(pad 1 smd rect (at 100 100 0) (size 0.254 0.254) (layers F.Cu F.Paste F.Mask)\n      (net 0 \"GND\"))"));
    assert!(u2.contains("(pad 3 smd rect (at 100.254 100 0) (size 0.254 0.254) (layers F.Cu F.Paste F.Mask)\n      (net 0 \"GND\"))"));
    // the other two pads are unconnected
    assert_eq!(out.matches("(net 0 \"GND\"))").count(), 2);
}

#[test]
fn test_skip_pinless_nets_option() {
    let input = "(pcb (image X (pin P 1 0 0) (pin P 2 10 0)) \
        (padstack P (type smd) (shape (circle top 5))) \
        (component X (place U1 0 0 front)) \
        (network (net A (pins U1-1)) (net NC) (net B (pins U1-2))))";

    let legacy = Dsn2KicadCore::convert_str(input, ConversionOptions::default()).unwrap();
    assert_eq!(legacy.stats.nets, 1);

    let options = ConversionOptions {
        pinless_nets: PinlessNets::Skip,
        ..Default::default()
    };
    let skipped = Dsn2KicadCore::convert_str(input, options).unwrap();
    assert_eq!(skipped.stats.nets, 2);
    assert!(skipped.output.contains("(net 1 \"B\")"));
}

#[test]
fn test_convert_file_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("board.kicad_pcb");

    let stats = Dsn2KicadCore::convert_file(
        &fixture_path("simple_board.dsn"),
        &output,
        ConversionOptions::default(),
    )
    .expect("Should convert");

    assert_eq!(stats.modules, 4);
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("(kicad_pcb"));
}

#[test]
fn test_failed_conversion_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("board.kicad_pcb");

    let result = Dsn2KicadCore::convert_file(
        &fixture_path("unbalanced.dsn"),
        &output,
        ConversionOptions::default(),
    );

    assert!(matches!(result, Err(ConversionError::Parse(_))));
    assert!(!output.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_convert_str_wrapper_uses_defaults() {
    let content = std::fs::read_to_string(fixture_path("simple_board.dsn")).unwrap();
    let output = dsn2kicad::convert_str(&content).expect("Should convert");
    assert_eq!(output, convert_fixture("simple_board.dsn").output);
}

#[test]
fn test_inspect_carries_model() {
    let report = Dsn2KicadCore::inspect(&fixture_path("simple_board.dsn"), ConversionOptions::default())
        .expect("Should inspect");

    assert_eq!(report.components, 4);
    assert_eq!(report.design.components.len(), report.components);
    assert_eq!(report.design.nets[2].name, "SIG");
    assert!(report.keywords.iter().any(|(k, n)| k == "padstack" && *n == 3));
}
