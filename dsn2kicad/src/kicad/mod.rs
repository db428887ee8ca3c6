//! KiCad `kicad_pcb` text generation.

pub mod document;
pub mod footprint;
pub mod layers;
pub mod transform;
pub mod zone;

use thiserror::Error;

pub use document::assemble;
pub use transform::Transform;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Component {reference} uses undefined image '{image}'")]
    MissingImage { reference: String, image: String },
    #[error("Image '{image}' pin {pin} uses undefined padstack '{padstack}'")]
    MissingPadstack {
        image: String,
        pin: String,
        padstack: String,
    },
    #[error("Padstack '{0}' declares no shapes")]
    EmptyPadstack(String),
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Format a length or angle for output: at most 6 decimals, no trailing
/// zeros, never `-0`.
pub fn fmt_num(value: f64) -> String {
    let s = format!("{:.6}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// KiCad string literal.
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}
