//! DSN Design Model
//!
//! Lookup tables extracted from a Specctra DSN file. All lengths are kept in
//! source units; scaling happens when the KiCad text is emitted.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Everything the emitters need from one DSN file
#[derive(Debug, Clone, Default, Serialize)]
pub struct DsnDesign {
    pub images: HashMap<String, Image>,
    pub padstacks: HashMap<String, Padstack>,
    /// Declaration order; `nets[i].number == i`
    pub nets: Vec<Net>,
    #[serde(skip)]
    net_index: HashMap<String, usize>,
    /// (component, pad) -> net name
    #[serde(skip)]
    pub pin_nets: HashMap<PinRef, String>,
    pub components: Vec<Component>,
    pub regions: Vec<CopperRegion>,
}

impl DsnDesign {
    pub fn net(&self, name: &str) -> Option<&Net> {
        self.net_index.get(name).map(|&i| &self.nets[i])
    }

    /// Appends a net with the next free number and returns that number.
    pub fn push_net(&mut self, name: String, pins: Vec<PinRef>) -> u32 {
        let number = self.nets.len() as u32;
        self.net_index.insert(name.clone(), self.nets.len());
        self.nets.push(Net { name, number, pins });
        number
    }

    /// Net attached to a component pad, if any.
    pub fn net_for_pin(&self, component: &str, pad: &str) -> Option<&Net> {
        let key = PinRef {
            component: component.to_string(),
            pad: pad.to_string(),
        };
        self.pin_nets.get(&key).and_then(|name| self.net(name))
    }
}

/// Footprint template (`image`)
#[derive(Debug, Clone, Serialize)]
pub struct Image {
    pub name: String,
    pub pins: Vec<PadDefinition>,
}

/// One `pin` of an image
#[derive(Debug, Clone, Serialize)]
pub struct PadDefinition {
    pub padstack: String,
    pub number: String,
    pub x: f64,
    pub y: f64,
    pub rotation: Option<f64>,
}

/// Pad-shape template (`padstack`)
#[derive(Debug, Clone, Serialize)]
pub struct Padstack {
    pub name: String,
    pub pad_type: PadType,
    /// Declaration order. Only the first one is rendered.
    pub shapes: Vec<PadShape>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PadType {
    Smd,
    ThruHole,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PadShape {
    /// Two opposite corners
    Rect {
        layer: String,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Circle { layer: String, radius: f64 },
}

impl PadShape {
    pub fn layer(&self) -> &str {
        match self {
            PadShape::Rect { layer, .. } | PadShape::Circle { layer, .. } => layer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Net {
    pub name: String,
    pub number: u32,
    pub pins: Vec<PinRef>,
}

/// A pin designator such as `U1-3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PinRef {
    pub component: String,
    pub pad: String,
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.component, self.pad)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Front,
    Back,
}

impl Side {
    /// Back-side parts are drawn mirrored
    pub fn is_mirrored(self) -> bool {
        self == Side::Back
    }
}

/// A placed component
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    pub reference: String,
    pub image: String,
    pub x: f64,
    pub y: f64,
    pub side: Side,
    /// Already negated into the KiCad sign convention
    pub rotation: f64,
}

/// Copper polygon from the `wiring` section
#[derive(Debug, Clone, Serialize)]
pub struct CopperRegion {
    pub net_name: String,
    pub net_number: u32,
    pub layer: String,
    pub points: Vec<(f64, f64)>,
}
