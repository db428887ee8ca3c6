//! Keyword index over a parsed DSN tree.

use std::collections::HashMap;
use std::fmt;

use crate::parser::dsn::DsnParseError;
use crate::parser::sexp::{NodeId, SExpTree};

/// Group kinds the converter knows about. Anything else lands in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyword<'a> {
    Pcb,
    Structure,
    Layer,
    Placement,
    Component,
    Place,
    Library,
    Image,
    Pin,
    Padstack,
    Type,
    Shape,
    Rect,
    Circle,
    Rotate,
    Network,
    Net,
    Pins,
    Class,
    Wiring,
    Wire,
    Polygon,
    Other(&'a str),
}

impl<'a> Keyword<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Keyword::Pcb => "pcb",
            Keyword::Structure => "structure",
            Keyword::Layer => "layer",
            Keyword::Placement => "placement",
            Keyword::Component => "component",
            Keyword::Place => "place",
            Keyword::Library => "library",
            Keyword::Image => "image",
            Keyword::Pin => "pin",
            Keyword::Padstack => "padstack",
            Keyword::Type => "type",
            Keyword::Shape => "shape",
            Keyword::Rect => "rect",
            Keyword::Circle => "circle",
            Keyword::Rotate => "rotate",
            Keyword::Network => "network",
            Keyword::Net => "net",
            Keyword::Pins => "pins",
            Keyword::Class => "class",
            Keyword::Wiring => "wiring",
            Keyword::Wire => "wire",
            Keyword::Polygon => "polygon",
            Keyword::Other(s) => s,
        }
    }
}

impl<'a> From<&'a str> for Keyword<'a> {
    fn from(s: &'a str) -> Self {
        match s {
            "pcb" => Keyword::Pcb,
            "structure" => Keyword::Structure,
            "layer" => Keyword::Layer,
            "placement" => Keyword::Placement,
            "component" => Keyword::Component,
            "place" => Keyword::Place,
            "library" => Keyword::Library,
            "image" => Keyword::Image,
            "pin" => Keyword::Pin,
            "padstack" => Keyword::Padstack,
            "type" => Keyword::Type,
            "shape" => Keyword::Shape,
            "rect" => Keyword::Rect,
            "circle" => Keyword::Circle,
            "rotate" => Keyword::Rotate,
            "network" => Keyword::Network,
            "net" => Keyword::Net,
            "pins" => Keyword::Pins,
            "class" => Keyword::Class,
            "wiring" => Keyword::Wiring,
            "wire" => Keyword::Wire,
            "polygon" => Keyword::Polygon,
            other => Keyword::Other(other),
        }
    }
}

impl fmt::Display for Keyword<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nodes grouped by keyword, each group in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex<'a> {
    groups: HashMap<Keyword<'a>, Vec<NodeId>>,
}

impl<'a> KeywordIndex<'a> {
    pub fn build(tree: &SExpTree<'a>) -> Self {
        let mut groups: HashMap<Keyword<'a>, Vec<NodeId>> = HashMap::new();
        for id in tree.ids() {
            let keyword = Keyword::from(tree.node(id).keyword());
            groups.entry(keyword).or_default().push(id);
        }
        Self { groups }
    }

    /// All nodes of `keyword`; empty when the input has none.
    pub fn nodes(&self, keyword: Keyword<'a>) -> &[NodeId] {
        self.groups
            .get(&keyword)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Like [`nodes`](Self::nodes) but a missing section is an error.
    pub fn require(&self, keyword: Keyword<'a>) -> Result<&[NodeId], DsnParseError> {
        let ids = self.nodes(keyword);
        if ids.is_empty() {
            return Err(DsnParseError::MissingSection(keyword.as_str().to_string()));
        }
        Ok(ids)
    }

    /// Every keyword with its node count, sorted by keyword.
    pub fn histogram(&self) -> Vec<(&'a str, usize)> {
        let mut counts: Vec<_> = self
            .groups
            .iter()
            .map(|(k, ids)| (k.as_str(), ids.len()))
            .collect();
        counts.sort();
        counts
    }
}
