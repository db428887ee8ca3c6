//! dsn2kicad - Specctra DSN to KiCad PCB conversion library
//!
//! This library reads a board in the Specctra DSN S-expression format and
//! writes an equivalent KiCad `kicad_pcb` document: placed modules with
//! their SMD pads, net declarations and filled copper zones.
//!
//! # Quick Start
//!
//! ```no_run
//! use dsn2kicad::{ConversionOptions, Dsn2KicadCore};
//! use std::path::Path;
//!
//! let stats = Dsn2KicadCore::convert_file(
//!     Path::new("board.dsn"),
//!     Path::new("board.kicad_pcb"),
//!     ConversionOptions::default(),
//! ).unwrap();
//!
//! println!("{} modules, {} nets", stats.modules, stats.nets);
//! ```
//!
//! # Pipeline
//!
//! - **Tree building**: [`parser::sexp`] keeps byte spans of every group
//! - **Keyword index**: [`parser::keywords`] groups nodes by their first token
//! - **Extraction**: [`parser::dsn`] builds images, padstacks, nets, components and regions
//! - **Emission**: [`kicad`] applies scale, offset, mirroring and rotation and renders text
//!
//! # Known gaps
//!
//! - Through-hole padstacks are not rendered
//! - Only the first shape of a padstack is drawn
//! - Quoted tokens cannot contain parentheses

pub mod core;
pub mod kicad;
pub mod parser;

// Re-export main types
pub use crate::core::{
    ConversionError, ConversionOptions, ConversionResult, ConversionStats, Dsn2KicadCore,
    InspectReport,
};
pub use kicad::{EmitError, Transform};
pub use parser::dsn::{DsnParseError, DsnParser, PinlessNets};
pub use parser::dsn_schema::DsnDesign;
pub use parser::sexp::{ParseError, SExpParser, SExpTree};

/// Convert DSN text with default options (convenience wrapper).
pub fn convert_str(content: &str) -> Result<String, ConversionError> {
    Dsn2KicadCore::convert_str(content, ConversionOptions::default()).map(|r| r.output)
}

/// Parse a DSN file into its design model (convenience wrapper).
pub fn parse_dsn(path: &std::path::Path) -> Result<DsnDesign, ConversionError> {
    let content = std::fs::read_to_string(path)?;
    Dsn2KicadCore::extract(&content, &ConversionOptions::default())
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        ConversionError, ConversionOptions, ConversionResult, ConversionStats, Dsn2KicadCore,
        DsnDesign, PinlessNets,
    };
}
