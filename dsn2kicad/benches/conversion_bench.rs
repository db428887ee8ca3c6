use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dsn2kicad::parser::KeywordIndex;
use dsn2kicad::prelude::*;
use dsn2kicad::SExpParser;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_board() -> String {
    std::fs::read_to_string(fixture_path("simple_board.dsn")).expect("fixture should exist")
}

fn bench_build_tree(c: &mut Criterion) {
    let content = load_board();

    c.bench_function("build_tree", |b| {
        b.iter(|| {
            let tree = SExpParser::new(black_box(&content)).parse().unwrap();
            KeywordIndex::build(&tree).histogram().len()
        });
    });
}

fn bench_convert_board(c: &mut Criterion) {
    let content = load_board();
    let options = ConversionOptions::default();

    c.bench_function("convert_board", |b| {
        b.iter(|| Dsn2KicadCore::convert_str(black_box(&content), black_box(options.clone())));
    });
}

criterion_group!(benches, bench_build_tree, bench_convert_board);
criterion_main!(benches);
