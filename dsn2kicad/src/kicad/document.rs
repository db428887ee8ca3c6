//! Top-level `kicad_pcb` document assembly.
//!
//! Block order is fixed: header, general, layers, setup, nets, net class,
//! modules, zones. Nothing is sorted; everything keeps declaration order.

use std::fmt::Write;

use crate::kicad::footprint::emit_modules;
use crate::kicad::layers::LAYER_TABLE;
use crate::kicad::transform::Transform;
use crate::kicad::zone::emit_zones;
use crate::kicad::{quoted, EmitError};
use crate::parser::dsn_schema::DsnDesign;

const SETUP: &str = "  (setup
    (last_trace_width 0.25)
    (trace_clearance 0.2)
    (zone_clearance 0.508)
    (zone_45_only no)
    (trace_min 0.2)
    (segment_width 0.2)
    (edge_width 0.15)
    (via_size 0.6)
    (via_drill 0.4)
    (via_min_size 0.4)
    (via_min_drill 0.3)
    (uvia_size 0.3)
    (uvia_drill 0.1)
    (uvias_allowed no)
    (uvia_min_size 0.2)
    (uvia_min_drill 0.1)
    (pcb_text_width 0.3)
    (pcb_text_size 1.5 1.5)
    (mod_edge_width 0.15)
    (mod_text_size 1 1)
    (mod_text_width 0.15)
    (pad_size 1.524 1.524)
    (pad_drill 0.762)
    (pad_to_mask_clearance 0.2)
    (aux_axis_origin 0 0)
    (visible_elements FFFFFF7F)
    (pcbplotparams
      (layerselection 0x00030_80000001)
      (usegerberextensions false)
      (excludeedgelayer true)
      (linewidth 0.100000)
      (plotframeref false)
      (viasonmask false)
      (mode 1)
      (useauxorigin false)
      (hpglpennumber 1)
      (hpglpenspeed 20)
      (hpglpendiameter 15)
      (psnegative false)
      (psa4output false)
      (plotreference true)
      (plotvalue true)
      (plotinvisibletext false)
      (padsonsilk false)
      (subtractmaskfromsilk false)
      (outputformat 1)
      (mirror false)
      (drillshape 1)
      (scaleselection 1)
      (outputdirectory \"\"))
  )
";

/// Render the whole board.
pub fn assemble(design: &DsnDesign, transform: &Transform) -> Result<String, EmitError> {
    let mut out = String::new();

    writeln!(
        out,
        "(kicad_pcb (version 4) (host dsn2kicad {})",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out)?;
    writeln!(out, "  (general")?;
    writeln!(out, "    (links 0)")?;
    writeln!(out, "    (no_connects 0)")?;
    writeln!(out, "    (area 0 0 0 0)")?;
    writeln!(out, "    (thickness 1.6)")?;
    writeln!(out, "    (drawings 0)")?;
    writeln!(out, "    (tracks 0)")?;
    writeln!(out, "    (zones 0)")?;
    writeln!(out, "    (modules {})", design.components.len())?;
    writeln!(out, "    (nets {})", design.nets.len())?;
    writeln!(out, "  )")?;
    writeln!(out)?;
    writeln!(out, "  (page A4)")?;
    writeln!(out, "  (layers")?;
    for (ordinal, name, kind) in LAYER_TABLE {
        writeln!(out, "    ({} {} {})", ordinal, name, kind)?;
    }
    writeln!(out, "  )")?;
    writeln!(out)?;
    out.push_str(SETUP);
    writeln!(out)?;

    for net in &design.nets {
        writeln!(out, "  (net {} {})", net.number, quoted(&net.name))?;
    }
    writeln!(out)?;

    writeln!(out, "  (net_class Default \"This is the default net class.\"")?;
    writeln!(out, "    (clearance 0.2)")?;
    writeln!(out, "    (trace_width 0.25)")?;
    writeln!(out, "    (via_dia 0.6)")?;
    writeln!(out, "    (via_drill 0.4)")?;
    writeln!(out, "    (uvia_dia 0.3)")?;
    writeln!(out, "    (uvia_drill 0.1)")?;
    for net in &design.nets {
        writeln!(out, "    (add_net {})", quoted(&net.name))?;
    }
    writeln!(out, "  )")?;
    writeln!(out)?;

    emit_modules(&mut out, design, transform)?;
    emit_zones(&mut out, design, transform)?;

    writeln!(out, ")")?;
    Ok(out)
}
