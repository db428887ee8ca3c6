//! Geometry helpers shared by the emitters.
//!
//! DSN pad geometry is always relative to an unmirrored image. A back-side
//! part flips the local x offset and swaps top/bottom; y and the rotation
//! composition are unaffected.

use serde::Serialize;

/// mil -> mm
pub const DEFAULT_SCALE: f64 = 0.0254;
/// Page offset in mm so the board lands in positive coordinates
pub const DEFAULT_OFFSET: (f64, f64) = (100.0, 100.0);

/// Fixed unit scale plus page offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            offset_x: DEFAULT_OFFSET.0,
            offset_y: DEFAULT_OFFSET.1,
        }
    }
}

impl Transform {
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn scale_length(&self, v: f64) -> f64 {
        v * self.scale
    }

    /// Source coordinates to page coordinates.
    pub fn place(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.scale_length(x) + self.offset_x,
            self.scale_length(y) + self.offset_y,
        )
    }

    /// Width and height of a rectangle given two opposite corners.
    pub fn rect_size(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64) {
        (
            self.scale_length((x1 - x2).abs()),
            self.scale_length((y1 - y2).abs()),
        )
    }

    /// Diameter of a circle declared by its radius.
    pub fn circle_size(&self, radius: f64) -> f64 {
        self.scale_length(2.0 * radius)
    }
}

pub fn mirror_x(x: f64) -> f64 {
    -x
}

pub fn compose_rotation(pad_rotation: f64, component_rotation: f64) -> f64 {
    pad_rotation - component_rotation
}

pub fn swap_layer_if_mirrored(layer: &str, mirrored: bool) -> &str {
    match (layer, mirrored) {
        ("top", true) => "bottom",
        ("bottom", true) => "top",
        (other, _) => other,
    }
}
