//! KiCad layer names and the fixed layer table.

/// DSN layer alias -> KiCad copper layer
const COPPER_ALIASES: &[(&str, &str)] = &[
    ("top", "F.Cu"),
    ("bottom", "B.Cu"),
    ("layer3", "In1.Cu"),
    ("layer4", "In2.Cu"),
];

/// (ordinal, name, type) as written in the `(layers ...)` block
pub const LAYER_TABLE: &[(u32, &str, &str)] = &[
    (0, "F.Cu", "signal"),
    (1, "In1.Cu", "signal"),
    (2, "In2.Cu", "signal"),
    (31, "B.Cu", "signal"),
    (32, "B.Adhes", "user"),
    (33, "F.Adhes", "user"),
    (34, "B.Paste", "user"),
    (35, "F.Paste", "user"),
    (36, "B.SilkS", "user"),
    (37, "F.SilkS", "user"),
    (38, "B.Mask", "user"),
    (39, "F.Mask", "user"),
    (40, "Dwgs.User", "user"),
    (41, "Cmts.User", "user"),
    (42, "Eco1.User", "user"),
    (43, "Eco2.User", "user"),
    (44, "Edge.Cuts", "user"),
    (45, "Margin", "user"),
    (46, "B.CrtYd", "user"),
    (47, "F.CrtYd", "user"),
    (48, "B.Fab", "user"),
    (49, "F.Fab", "user"),
];

/// Map a DSN layer name to KiCad. Unknown names pass through.
pub fn copper_layer(source: &str) -> &str {
    COPPER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == source)
        .map(|(_, kicad)| *kicad)
        .unwrap_or(source)
}

/// Layer list of an SMD pad: copper plus paste and mask on outer layers.
pub fn smd_pad_layers(source: &str) -> String {
    match source {
        "top" => "F.Cu F.Paste F.Mask".to_string(),
        "bottom" => "B.Cu B.Paste B.Mask".to_string(),
        other => copper_layer(other).to_string(),
    }
}

/// Silkscreen layer for a module placed on the given side.
pub fn silkscreen_layer(mirrored: bool) -> &'static str {
    if mirrored {
        "B.SilkS"
    } else {
        "F.SilkS"
    }
}

pub fn module_layer(mirrored: bool) -> &'static str {
    if mirrored {
        "B.Cu"
    } else {
        "F.Cu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copper_aliases() {
        assert_eq!(copper_layer("top"), "F.Cu");
        assert_eq!(copper_layer("bottom"), "B.Cu");
        assert_eq!(copper_layer("layer3"), "In1.Cu");
        assert_eq!(copper_layer("layer4"), "In2.Cu");
        assert_eq!(copper_layer("In2.Cu"), "In2.Cu");
    }

    #[test]
    fn test_smd_pad_layers() {
        assert_eq!(smd_pad_layers("top"), "F.Cu F.Paste F.Mask");
        assert_eq!(smd_pad_layers("bottom"), "B.Cu B.Paste B.Mask");
        assert_eq!(smd_pad_layers("layer3"), "In1.Cu");
    }

    #[test]
    fn test_every_alias_is_in_layer_table() {
        for (_, kicad) in COPPER_ALIASES {
            assert!(LAYER_TABLE.iter().any(|(_, name, _)| name == kicad));
        }
    }
}
