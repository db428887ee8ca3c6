//! Filled copper zones from DSN wiring polygons.

use std::fmt::Write;

use crate::kicad::layers::copper_layer;
use crate::kicad::transform::Transform;
use crate::kicad::{fmt_num, quoted, EmitError};
use crate::parser::dsn_schema::{CopperRegion, DsnDesign};

pub fn emit_zones(out: &mut String, design: &DsnDesign, transform: &Transform) -> Result<(), EmitError> {
    for region in &design.regions {
        emit_zone(out, region, transform)?;
    }
    Ok(())
}

pub fn emit_zone(out: &mut String, region: &CopperRegion, transform: &Transform) -> Result<(), EmitError> {
    let points = region
        .points
        .iter()
        .map(|&(x, y)| {
            let (x, y) = transform.place(x, y);
            format!("(xy {} {})", fmt_num(x), fmt_num(y))
        })
        .collect::<Vec<_>>()
        .join(" ");

    writeln!(
        out,
        "  (zone (net {}) (net_name {}) (layer {}) (tstamp 0) (hatch edge 0.508)",
        region.net_number,
        quoted(&region.net_name),
        copper_layer(&region.layer)
    )?;
    writeln!(out, "    (connect_pads (clearance 0.508))")?;
    writeln!(out, "    (min_thickness 0.254)")?;
    writeln!(
        out,
        "    (fill yes (arc_segments 16) (thermal_gap 0.508) (thermal_bridge_width 0.508))"
    )?;
    writeln!(out, "    (polygon")?;
    writeln!(out, "      (pts")?;
    writeln!(out, "        {}", points)?;
    writeln!(out, "      )")?;
    writeln!(out, "    )")?;
    writeln!(out, "    (filled_polygon")?;
    writeln!(out, "      (pts")?;
    writeln!(out, "        {}", points)?;
    writeln!(out, "      )")?;
    writeln!(out, "    )")?;
    writeln!(out, "  )")?;
    Ok(())
}
