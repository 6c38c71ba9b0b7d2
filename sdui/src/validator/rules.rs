//! Fixed tables the validator checks against.

/// Keys whose values may hold child nodes, in any properties payload.
pub(crate) const CHILD_KEYS: &[&str] = &[
    "child",
    "children",
    "actions",
    "topBar",
    "bottomBar",
    "title",
    "text",
    "navigationIcon",
    "confirmButton",
    "dismissButton",
    "label",
    "icon",
];

/// Keys accepted on a node object.
pub(crate) const NODE_FIELDS: &[&str] = &["type", "properties", "composeModifier"];

/// Keys accepted on a `composeModifier` object.
pub(crate) const MODIFIER_FIELDS: &[&str] = &["operations"];

/// Keys accepted on a document object.
pub(crate) const DOCUMENT_FIELDS: &[&str] = &["initialState", "actions", "root"];

pub(crate) const COLUMN_VERTICAL_ARRANGEMENTS: &[&str] = &[
    "Top",
    "Bottom",
    "Center",
    "SpaceBetween",
    "SpaceAround",
    "SpaceEvenly",
];

pub(crate) const COLUMN_HORIZONTAL_ALIGNMENTS: &[&str] =
    &["Start", "CenterHorizontally", "End"];

pub(crate) const ROW_HORIZONTAL_ARRANGEMENTS: &[&str] = &[
    "Start",
    "End",
    "Center",
    "SpaceBetween",
    "SpaceAround",
    "SpaceEvenly",
];

pub(crate) const ROW_VERTICAL_ALIGNMENTS: &[&str] =
    &["Top", "CenterVertically", "Bottom"];

pub(crate) const BOX_CONTENT_ALIGNMENTS: &[&str] = &[
    "TopStart",
    "TopCenter",
    "TopEnd",
    "CenterStart",
    "Center",
    "CenterEnd",
    "BottomStart",
    "BottomCenter",
    "BottomEnd",
];

/// `#AARRGGBB`: a hash followed by exactly eight hex digits.
pub(crate) fn is_valid_hex_color(value: &str) -> bool {
    let mut chars = value.chars();
    if chars.next() != Some('#') || value.len() != 9 {
        return false;
    }
    chars.all(|ch| ch.is_ascii_hexdigit())
}

/// Field names accepted per modifier operation tag, `type` excluded.
pub(crate) fn operation_fields(tag: &str) -> Option<&'static [&'static str]> {
    let fields: &'static [&'static str] = match tag {
        "Padding" | "Width" | "Height" | "Alpha" => &["value"],
        "FillMaxSize" | "FillMaxWidth" | "FillMaxHeight" => &[],
        "BackgroundColor" => &["color"],
        "Border" => &["width", "color"],
        "Shadow" => &["elevation"],
        "Clip" => &["shape"],
        "Background" => &["color", "shape"],
        "Rotate" => &["degrees"],
        _ => return None,
    };
    Some(fields)
}

/// Field names accepted per shape tag, `type` excluded.
pub(crate) fn shape_fields(tag: &str) -> Option<&'static [&'static str]> {
    let fields: &'static [&'static str] = match tag {
        "Rectangle" | "Circle" => &[],
        "RoundedCorner" => {
            &["radius", "topStart", "topEnd", "bottomEnd", "bottomStart"]
        },
        _ => return None,
    };
    Some(fields)
}

/// Field names accepted per action tag, `type` excluded.
pub(crate) fn action_fields(tag: &str) -> Option<&'static [&'static str]> {
    let fields: &'static [&'static str] = match tag {
        "SetState" => &["key", "value"],
        "ToggleState" => &["key"],
        "Log" => &["message"],
        "Sequence" => &["actions"],
        "Custom" => &["customType", "params"],
        _ => return None,
    };
    Some(fields)
}
