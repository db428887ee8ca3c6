//! Core conversion logic shared by the CLI and library users.
//! No terminal or argument parsing dependencies.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::kicad::{self, EmitError, Transform};
use crate::parser::dsn::{DsnExtractor, DsnParseError, PinlessNets};
use crate::parser::dsn_schema::{DsnDesign, PadType};
use crate::parser::keywords::KeywordIndex;
use crate::parser::sexp::{ParseError, SExpParser};

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Invalid DSN design: {0}")]
    Design(#[from] DsnParseError),
    #[error("Cannot generate KiCad output: {0}")]
    Emit(#[from] EmitError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for a conversion run.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionOptions {
    /// Source length unit -> millimetres
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub pinless_nets: PinlessNets,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        let transform = Transform::default();
        Self {
            scale: transform.scale,
            offset_x: transform.offset_x,
            offset_y: transform.offset_y,
            pinless_nets: PinlessNets::default(),
        }
    }
}

impl ConversionOptions {
    pub fn transform(&self) -> Transform {
        Transform::new(self.scale, self.offset_x, self.offset_y)
    }
}

/// Result of converting one design.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub output: String,
    pub stats: ConversionStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    pub modules: usize,
    pub pads: usize,
    pub skipped_through_hole_pads: usize,
    pub nets: usize,
    pub zones: usize,
}

impl ConversionStats {
    fn from_design(design: &DsnDesign) -> Self {
        let mut pads = 0;
        let mut skipped_through_hole_pads = 0;
        for component in &design.components {
            let Some(image) = design.images.get(&component.image) else {
                continue;
            };
            for pin in &image.pins {
                match design.padstacks.get(&pin.padstack).map(|p| p.pad_type) {
                    Some(PadType::ThruHole) => skipped_through_hole_pads += 1,
                    Some(PadType::Smd) => pads += 1,
                    None => {}
                }
            }
        }
        Self {
            modules: design.components.len(),
            pads,
            skipped_through_hole_pads,
            nets: design.nets.len(),
            zones: design.regions.len(),
        }
    }
}

/// Parse statistics, model sizes and the extracted model, without generating output.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub file: PathBuf,
    pub nodes: usize,
    pub keywords: Vec<(String, usize)>,
    pub components: usize,
    pub images: usize,
    pub padstacks: usize,
    pub nets: usize,
    pub regions: usize,
    pub options: ConversionOptions,
    pub design: DsnDesign,
}

/// Core conversion API used by the CLI.
pub struct Dsn2KicadCore;

impl Dsn2KicadCore {
    /// Build the design model from DSN text.
    pub fn extract(content: &str, options: &ConversionOptions) -> Result<DsnDesign, ConversionError> {
        let tree = SExpParser::new(content).parse()?;
        let index = KeywordIndex::build(&tree);
        let design = DsnExtractor::new(&tree, &index)
            .pinless_nets(options.pinless_nets)
            .extract()?;
        Ok(design)
    }

    /// Convert DSN text to a complete `kicad_pcb` document.
    pub fn convert_str(content: &str, options: ConversionOptions) -> Result<ConversionResult, ConversionError> {
        let design = Self::extract(content, &options)?;
        let output = kicad::assemble(&design, &options.transform())?;
        let stats = ConversionStats::from_design(&design);
        if stats.skipped_through_hole_pads > 0 {
            tracing::warn!(
                "{} through-hole pads were not converted",
                stats.skipped_through_hole_pads
            );
        }
        Ok(ConversionResult { output, stats })
    }

    /// Convert `input` and write the result to `output`.
    ///
    /// The document is written to a temporary file next to `output` and
    /// moved into place only once it is complete, so a failed conversion
    /// never leaves a partial file behind.
    pub fn convert_file(
        input: &Path,
        output: &Path,
        options: ConversionOptions,
    ) -> Result<ConversionStats, ConversionError> {
        let content = std::fs::read_to_string(input)?;
        tracing::info!("Converting {} ({} bytes)", input.display(), content.len());

        let result = Self::convert_str(&content, options)?;

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(result.output.as_bytes())?;
        tmp.persist(output).map_err(|e| e.error)?;

        tracing::info!(
            "Wrote {} ({} modules, {} nets, {} zones)",
            output.display(),
            result.stats.modules,
            result.stats.nets,
            result.stats.zones
        );
        Ok(result.stats)
    }

    /// Diagnostics for a DSN file: keyword histogram plus model sizes.
    pub fn inspect(path: &Path, options: ConversionOptions) -> Result<InspectReport, ConversionError> {
        let content = std::fs::read_to_string(path)?;
        let tree = SExpParser::new(&content).parse()?;
        let index = KeywordIndex::build(&tree);
        let design = DsnExtractor::new(&tree, &index)
            .pinless_nets(options.pinless_nets)
            .extract()?;

        Ok(InspectReport {
            file: path.to_path_buf(),
            nodes: tree.len(),
            keywords: index
                .histogram()
                .into_iter()
                .map(|(k, n)| (k.to_string(), n))
                .collect(),
            components: design.components.len(),
            images: design.images.len(),
            padstacks: design.padstacks.len(),
            nets: design.nets.len(),
            regions: design.regions.len(),
            options,
            design,
        })
    }
}
