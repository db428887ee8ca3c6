//! Module and pad emission.
//!
//! Each placed component becomes one `(module ...)` block built from its
//! image. Only the first shape of a padstack is drawn. Through-hole
//! padstacks are not rendered yet; their pins are left out of the module.

use std::fmt::Write;

use crate::kicad::layers::{module_layer, silkscreen_layer, smd_pad_layers};
use crate::kicad::transform::{compose_rotation, mirror_x, swap_layer_if_mirrored, Transform};
use crate::kicad::{fmt_num, quoted, EmitError};
use crate::parser::dsn_schema::{Component, DsnDesign, PadDefinition, PadShape, PadType};

pub fn emit_modules(out: &mut String, design: &DsnDesign, transform: &Transform) -> Result<(), EmitError> {
    for component in &design.components {
        emit_module(out, design, component, transform)?;
    }
    Ok(())
}

pub fn emit_module(
    out: &mut String,
    design: &DsnDesign,
    component: &Component,
    transform: &Transform,
) -> Result<(), EmitError> {
    let image = design
        .images
        .get(&component.image)
        .ok_or_else(|| EmitError::MissingImage {
            reference: component.reference.clone(),
            image: component.image.clone(),
        })?;
    let mirrored = component.side.is_mirrored();
    let (x, y) = transform.place(component.x, component.y);

    writeln!(
        out,
        "  (module {} (layer {}) (tedit 0) (tstamp 0)",
        image.name,
        module_layer(mirrored)
    )?;
    writeln!(out, "    (at {} {} {})", fmt_num(x), fmt_num(y), fmt_num(component.rotation))?;
    writeln!(
        out,
        "    (fp_text reference {} (at 0 0) (layer {})",
        component.reference,
        silkscreen_layer(mirrored)
    )?;
    writeln!(out, "      (effects (font (size 1 1) (thickness 0.15)))")?;
    writeln!(out, "    )")?;

    for pin in &image.pins {
        let padstack = design
            .padstacks
            .get(&pin.padstack)
            .ok_or_else(|| EmitError::MissingPadstack {
                image: image.name.clone(),
                pin: pin.number.clone(),
                padstack: pin.padstack.clone(),
            })?;

        if padstack.pad_type == PadType::ThruHole {
            tracing::debug!(
                "Skipping through-hole pad {}-{} ({})",
                component.reference,
                pin.number,
                padstack.name
            );
            continue;
        }

        let shape = padstack
            .shapes
            .first()
            .ok_or_else(|| EmitError::EmptyPadstack(padstack.name.clone()))?;
        emit_pad(out, design, component, pin, shape, transform)?;
    }

    writeln!(out, "  )")?;
    Ok(())
}

fn emit_pad(
    out: &mut String,
    design: &DsnDesign,
    component: &Component,
    pin: &PadDefinition,
    shape: &PadShape,
    transform: &Transform,
) -> Result<(), EmitError> {
    let mirrored = component.side.is_mirrored();
    let local_x = if mirrored { mirror_x(pin.x) } else { pin.x };
    let (x, y) = transform.place(local_x, pin.y);
    let rotation = compose_rotation(pin.rotation.unwrap_or(0.0), component.rotation);
    let layers = smd_pad_layers(swap_layer_if_mirrored(shape.layer(), mirrored));

    let (kind, (width, height)) = match *shape {
        PadShape::Rect { x1, y1, x2, y2, .. } => ("rect", transform.rect_size(x1, y1, x2, y2)),
        PadShape::Circle { radius, .. } => {
            let d = transform.circle_size(radius);
            ("circle", (d, d))
        }
    };

    write!(
        out,
        "    (pad {} smd {} (at {} {} {}) (size {} {}) (layers {})",
        pin.number,
        kind,
        fmt_num(x),
        fmt_num(y),
        fmt_num(rotation),
        fmt_num(width),
        fmt_num(height),
        layers
    )?;
    match design.net_for_pin(&component.reference, &pin.number) {
        Some(net) => writeln!(out, "\n      (net {} {}))", net.number, quoted(&net.name))?,
        None => writeln!(out, ")")?,
    }
    Ok(())
}
