//! Convert a DSN file and print a short summary.

use dsn2kicad::prelude::*;
use std::path::Path;

fn main() -> Result<(), ConversionError> {
    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/simple_board.dsn".to_string());
    let output = args.next().unwrap_or_else(|| "board.kicad_pcb".to_string());
    let input = Path::new(&input);

    if !input.exists() {
        eprintln!("File not found: {}", input.display());
        eprintln!("Usage: cargo run --example convert_board [input.dsn] [output.kicad_pcb]");
        std::process::exit(1);
    }

    let stats = Dsn2KicadCore::convert_file(input, Path::new(&output), ConversionOptions::default())?;

    println!("Converted {} -> {}", input.display(), output);
    println!("  modules: {}", stats.modules);
    println!("  pads:    {}", stats.pads);
    println!("  nets:    {}", stats.nets);
    println!("  zones:   {}", stats.zones);

    if stats.skipped_through_hole_pads > 0 {
        println!(
            "\n{} through-hole pads were left out.",
            stats.skipped_through_hole_pads
        );
    }
    Ok(())
}
