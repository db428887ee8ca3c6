//! Specctra DSN design extraction
//!
//! Walks a parsed [`SExpTree`] through its [`KeywordIndex`] and builds the
//! [`DsnDesign`] lookup tables. Sections are read in dependency order:
//! padstacks and images, then nets, then components, then the copper
//! polygons of the `wiring` section (which need the net numbers).
//!
//! Layout of the groups this module understands:
//!
//! ```text
//! (padstack NAME (type smd|thru_hole) (shape (rect LAYER X1 Y1 X2 Y2)) (shape (circle LAYER R)))
//! (image NAME (pin PADSTACK [(rotate DEG)] NUMBER X Y) ...)
//! (net NAME (pins REF-PAD REF-PAD ...))
//! (component IMAGE (place REF X Y front|back [DEG]))
//! (wiring (wire (polygon LAYER APERTURE X Y X Y ...) (net NAME)))
//! ```

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::parser::dsn_schema::*;
use crate::parser::keywords::{Keyword, KeywordIndex};
use crate::parser::sexp::{NodeId, ParseError, SExpParser, SExpTree};

#[derive(Debug, Error)]
pub enum DsnParseError {
    #[error("S-expression parse error: {0}")]
    SExpParse(#[from] ParseError),
    #[error("Missing required section: ({0} ...)")]
    MissingSection(String),
    #[error("Expected exactly one ({child} ...) in {parent} at byte {at}, found {found}")]
    ChildCount {
        parent: String,
        child: &'static str,
        found: usize,
        at: usize,
    },
    #[error("Missing {field} in ({context} ...) at byte {at}")]
    MissingField {
        field: &'static str,
        context: &'static str,
        at: usize,
    },
    #[error("Invalid number '{value}' for {field} at byte {at}")]
    InvalidNumber {
        value: String,
        field: &'static str,
        at: usize,
    },
    #[error("Malformed pin designator '{value}' at byte {at}: expected COMPONENT-PAD")]
    BadPinDesignator { value: String, at: usize },
    #[error("Net '{name}' declared twice (again at byte {at})")]
    DuplicateNet { name: String, at: usize },
    #[error("Component '{reference}' placed twice (again at byte {at})")]
    DuplicateComponent { reference: String, at: usize },
    #[error("Unrecognized board side '{value}' at byte {at}")]
    UnknownSide { value: String, at: usize },
    #[error("Unrecognized padstack type '{value}' at byte {at}")]
    UnknownPadType { value: String, at: usize },
    #[error("Unsupported pad shape '{value}' at byte {at}")]
    UnknownShape { value: String, at: usize },
    #[error("Polygon at byte {at} has an odd number of coordinates ({count})")]
    OddCoordinates { count: usize, at: usize },
    #[error("Wire at byte {at} refers to undeclared net '{name}'")]
    UnknownNet { name: String, at: usize },
}

/// What to do with a `(net ...)` that has no `(pins ...)` child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PinlessNets {
    /// Stop reading nets altogether. Matches the legacy converter output.
    #[default]
    Stop,
    /// Ignore just that net and keep going.
    Skip,
}

/// Parser front end for DSN text
pub struct DsnParser;

impl DsnParser {
    /// Parse DSN text into a design model in one go.
    pub fn parse_dsn_str(content: &str, pinless_nets: PinlessNets) -> Result<DsnDesign, DsnParseError> {
        let tree = SExpParser::new(content).parse()?;
        let index = KeywordIndex::build(&tree);
        DsnExtractor::new(&tree, &index)
            .pinless_nets(pinless_nets)
            .extract()
    }
}

/// Builds a [`DsnDesign`] from an indexed tree.
pub struct DsnExtractor<'t, 'a> {
    tree: &'t SExpTree<'a>,
    index: &'t KeywordIndex<'a>,
    pinless_nets: PinlessNets,
}

impl<'t, 'a> DsnExtractor<'t, 'a> {
    pub fn new(tree: &'t SExpTree<'a>, index: &'t KeywordIndex<'a>) -> Self {
        Self {
            tree,
            index,
            pinless_nets: PinlessNets::default(),
        }
    }

    pub fn pinless_nets(mut self, policy: PinlessNets) -> Self {
        self.pinless_nets = policy;
        self
    }

    pub fn extract(&self) -> Result<DsnDesign, DsnParseError> {
        let mut design = DsnDesign::default();

        for &id in self.index.nodes(Keyword::Padstack) {
            let padstack = self.parse_padstack(id)?;
            design.padstacks.insert(padstack.name.clone(), padstack);
        }
        for &id in self.index.nodes(Keyword::Image) {
            let image = self.parse_image(id)?;
            design.images.insert(image.name.clone(), image);
        }

        self.parse_nets(&mut design)?;
        self.parse_components(&mut design)?;
        self.parse_regions(&mut design)?;

        tracing::info!(
            "Extracted {} components, {} images, {} padstacks, {} nets, {} copper regions",
            design.components.len(),
            design.images.len(),
            design.padstacks.len(),
            design.nets.len(),
            design.regions.len()
        );

        Ok(design)
    }

    fn at(&self, id: NodeId) -> usize {
        self.tree.node(id).start
    }

    /// Exactly one child of `id` named `child`.
    fn single_child(&self, id: NodeId, child: &'static str) -> Result<NodeId, DsnParseError> {
        let found = self.tree.children_with(id, child);
        match found.as_slice() {
            [only] => Ok(*only),
            _ => Err(self.child_count(id, child, found.len())),
        }
    }

    fn child_count(&self, id: NodeId, child: &'static str, found: usize) -> DsnParseError {
        let node = self.tree.node(id);
        let parent = match node.word(1) {
            Some(name) => format!("({} {})", node.keyword(), unquote(name)),
            None => format!("({})", node.keyword()),
        };
        DsnParseError::ChildCount {
            parent,
            child,
            found,
            at: node.start,
        }
    }

    /// The name of a `(keyword NAME ...)` group.
    fn name(&self, id: NodeId, context: &'static str) -> Result<String, DsnParseError> {
        self.tree
            .node(id)
            .word(1)
            .map(|w| unquote(w).to_string())
            .ok_or(DsnParseError::MissingField {
                field: "name",
                context,
                at: self.at(id),
            })
    }

    fn parse_padstack(&self, id: NodeId) -> Result<Padstack, DsnParseError> {
        let name = self.name(id, "padstack")?;

        let type_id = self.single_child(id, "type")?;
        let pad_type = match self.tree.node(type_id).word(1) {
            Some("smd") => PadType::Smd,
            Some("thru_hole") => PadType::ThruHole,
            other => {
                return Err(DsnParseError::UnknownPadType {
                    value: other.unwrap_or("").to_string(),
                    at: self.at(type_id),
                })
            }
        };

        let shapes = self
            .tree
            .children_with(id, "shape")
            .into_iter()
            .map(|shape| self.parse_shape(shape))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Padstack {
            name,
            pad_type,
            shapes,
        })
    }

    fn parse_shape(&self, shape: NodeId) -> Result<PadShape, DsnParseError> {
        let Some(&geometry) = self.tree.node(shape).children.first() else {
            return Err(DsnParseError::MissingField {
                field: "geometry",
                context: "shape",
                at: self.at(shape),
            });
        };
        let words = self.tree.own_words(geometry);
        let at = self.at(geometry);
        let layer = field(&words, 1, "layer", "shape", at)?.to_string();

        match words[0] {
            "rect" => Ok(PadShape::Rect {
                layer,
                x1: number(field(&words, 2, "x1", "rect", at)?, "rect x1", at)?,
                y1: number(field(&words, 3, "y1", "rect", at)?, "rect y1", at)?,
                x2: number(field(&words, 4, "x2", "rect", at)?, "rect x2", at)?,
                y2: number(field(&words, 5, "y2", "rect", at)?, "rect y2", at)?,
            }),
            "circle" => Ok(PadShape::Circle {
                layer,
                radius: number(field(&words, 2, "radius", "circle", at)?, "circle radius", at)?,
            }),
            other => Err(DsnParseError::UnknownShape {
                value: other.to_string(),
                at,
            }),
        }
    }

    fn parse_image(&self, id: NodeId) -> Result<Image, DsnParseError> {
        let name = self.name(id, "image")?;
        let mut pins = Vec::new();

        for pin in self.tree.children_with(id, "pin") {
            let words = self.tree.own_words(pin);
            let at = self.at(pin);
            let rotation = match self.tree.children_with(pin, "rotate").first() {
                Some(&rotate) => {
                    let value = self.tree.node(rotate).word(1).ok_or(DsnParseError::MissingField {
                        field: "angle",
                        context: "rotate",
                        at: self.at(rotate),
                    })?;
                    Some(number(value, "pin rotation", at)?)
                }
                None => None,
            };

            pins.push(PadDefinition {
                padstack: unquote(field(&words, 1, "padstack", "pin", at)?).to_string(),
                number: unquote(field(&words, 2, "number", "pin", at)?).to_string(),
                x: number(field(&words, 3, "x", "pin", at)?, "pin x", at)?,
                y: number(field(&words, 4, "y", "pin", at)?, "pin y", at)?,
                rotation,
            });
        }

        Ok(Image { name, pins })
    }

    fn parse_nets(&self, design: &mut DsnDesign) -> Result<(), DsnParseError> {
        for &id in self.index.nodes(Keyword::Net) {
            let name = self.name(id, "net")?;
            let pin_lists = self.tree.children_with(id, "pins");

            let pins_id = match pin_lists.as_slice() {
                [only] => *only,
                [] => match self.pinless_nets {
                    PinlessNets::Stop => {
                        tracing::debug!("Net '{}' has no pin list; ignoring the remaining nets", name);
                        break;
                    }
                    PinlessNets::Skip => {
                        tracing::debug!("Skipping net '{}' without a pin list", name);
                        continue;
                    }
                },
                _ => return Err(self.child_count(id, "pins", pin_lists.len())),
            };

            if design.net(&name).is_some() {
                return Err(DsnParseError::DuplicateNet {
                    name,
                    at: self.at(id),
                });
            }

            let at = self.at(pins_id);
            let pins = self
                .tree
                .own_words(pins_id)
                .into_iter()
                .skip(1)
                .map(|designator| parse_pin_designator(designator, at))
                .collect::<Result<Vec<_>, _>>()?;

            for pin in &pins {
                if let Some(existing) = design.pin_nets.get(pin) {
                    tracing::warn!("Pin {} is in nets '{}' and '{}'; keeping '{}'", pin, existing, name, existing);
                    continue;
                }
                design.pin_nets.insert(pin.clone(), name.clone());
            }

            design.push_net(name, pins);
        }
        Ok(())
    }

    fn parse_components(&self, design: &mut DsnDesign) -> Result<(), DsnParseError> {
        let mut seen = HashSet::new();

        for &id in self.index.require(Keyword::Component)? {
            let image = self.name(id, "component")?;
            let place = self.single_child(id, "place")?;
            let words = self.tree.own_words(place);
            let at = self.at(place);

            let reference = unquote(field(&words, 1, "reference", "place", at)?).to_string();
            let x = number(field(&words, 2, "x", "place", at)?, "place x", at)?;
            let y = number(field(&words, 3, "y", "place", at)?, "place y", at)?;
            let side_word = field(&words, 4, "side", "place", at)?;
            let side = match side_word.to_ascii_lowercase().as_str() {
                "front" => Side::Front,
                "back" => Side::Back,
                _ => {
                    return Err(DsnParseError::UnknownSide {
                        value: side_word.to_string(),
                        at,
                    })
                }
            };
            let rotation = match words.get(5) {
                Some(value) => number(value, "place rotation", at)?,
                None => 0.0,
            };

            if !seen.insert(reference.clone()) {
                return Err(DsnParseError::DuplicateComponent { reference, at });
            }

            design.components.push(Component {
                reference,
                image,
                x,
                y,
                side,
                rotation: -rotation,
            });
        }
        Ok(())
    }

    fn parse_regions(&self, design: &mut DsnDesign) -> Result<(), DsnParseError> {
        for &wiring in self.index.nodes(Keyword::Wiring) {
            for wire in self.tree.children_with(wiring, "wire") {
                let polygons = self.tree.children_with(wire, "polygon");
                if polygons.is_empty() {
                    continue;
                }

                let net_id = self.single_child(wire, "net")?;
                let net_name = self.name(net_id, "net")?;
                let net_number = design
                    .net(&net_name)
                    .map(|n| n.number)
                    .ok_or(DsnParseError::UnknownNet {
                        name: net_name.clone(),
                        at: self.at(wire),
                    })?;

                for polygon in polygons {
                    let words = self.tree.own_words(polygon);
                    let at = self.at(polygon);
                    let layer = field(&words, 1, "layer", "polygon", at)?.to_string();
                    // words[2] is the aperture width
                    field(&words, 2, "aperture width", "polygon", at)?;

                    let coords = words[3..]
                        .iter()
                        .map(|w| number(w, "polygon coordinate", at))
                        .collect::<Result<Vec<_>, _>>()?;
                    if coords.len() % 2 != 0 {
                        return Err(DsnParseError::OddCoordinates {
                            count: coords.len(),
                            at,
                        });
                    }

                    design.regions.push(CopperRegion {
                        net_name: net_name.clone(),
                        net_number,
                        layer,
                        points: coords.chunks(2).map(|xy| (xy[0], xy[1])).collect(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Split `U1-3` into component and pad.
pub fn parse_pin_designator(designator: &str, at: usize) -> Result<PinRef, DsnParseError> {
    let parts: Vec<&str> = unquote(designator).split('-').collect();
    match parts.as_slice() {
        [component, pad] => Ok(PinRef {
            component: component.to_string(),
            pad: pad.to_string(),
        }),
        _ => Err(DsnParseError::BadPinDesignator {
            value: designator.to_string(),
            at,
        }),
    }
}

fn unquote(s: &str) -> &str {
    s.trim_matches('"')
}

fn field<'w>(
    words: &[&'w str],
    i: usize,
    field: &'static str,
    context: &'static str,
    at: usize,
) -> Result<&'w str, DsnParseError> {
    words
        .get(i)
        .copied()
        .ok_or(DsnParseError::MissingField { field, context, at })
}

/// A finite decimal; `inf` and `NaN` are rejected.
fn number(value: &str, field: &'static str, at: usize) -> Result<f64, DsnParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DsnParseError::InvalidNumber {
            value: value.to_string(),
            field,
            at,
        })
}
