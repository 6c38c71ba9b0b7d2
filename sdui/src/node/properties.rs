use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Node;

/// Type-specific payload of a [`Node`].
///
/// Which variant is legal for a node is fixed by its
/// [`NodeType`](super::NodeType); see [`NodeType::expected_properties`].
///
/// [`NodeType::expected_properties`]: super::NodeType::expected_properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Properties {
    TextProps(TextProps),
    ImageProps(ImageProps),
    TextFieldProps(TextFieldProps),
    SwitchProps(ToggleProps),
    CheckboxProps(ToggleProps),
    ColumnProps(ColumnProps),
    RowProps(RowProps),
    BoxProps(BoxProps),
    ButtonProps(ButtonProps),
    CardProps(CardProps),
    ScaffoldProps(ScaffoldProps),
    TopAppBarProps(TopAppBarProps),
    AlertDialogProps(AlertDialogProps),
    CustomProps(CustomProps),
}

impl Properties {
    pub fn tag(&self) -> &'static str {
        match self {
            Properties::TextProps(_) => "TextProps",
            Properties::ImageProps(_) => "ImageProps",
            Properties::TextFieldProps(_) => "TextFieldProps",
            Properties::SwitchProps(_) => "SwitchProps",
            Properties::CheckboxProps(_) => "CheckboxProps",
            Properties::ColumnProps(_) => "ColumnProps",
            Properties::RowProps(_) => "RowProps",
            Properties::BoxProps(_) => "BoxProps",
            Properties::ButtonProps(_) => "ButtonProps",
            Properties::CardProps(_) => "CardProps",
            Properties::ScaffoldProps(_) => "ScaffoldProps",
            Properties::TopAppBarProps(_) => "TopAppBarProps",
            Properties::AlertDialogProps(_) => "AlertDialogProps",
            Properties::CustomProps(_) => "CustomProps",
        }
    }

    /// Ordered child list of Column/Row/Box payloads.
    pub fn child_list(&self) -> Option<&[Node]> {
        match self {
            Properties::ColumnProps(props) => Some(&props.children),
            Properties::RowProps(props) => Some(&props.children),
            Properties::BoxProps(props) => Some(&props.children),
            _ => None,
        }
    }

    pub(crate) fn child_list_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Properties::ColumnProps(props) => Some(&mut props.children),
            Properties::RowProps(props) => Some(&mut props.children),
            Properties::BoxProps(props) => Some(&mut props.children),
            _ => None,
        }
    }

    pub(crate) fn has_child_slot(&self) -> bool {
        matches!(
            self,
            Properties::ButtonProps(_)
                | Properties::CardProps(_)
                | Properties::ScaffoldProps(_)
        )
    }

    /// The single `child` slot of Button/Card/Scaffold payloads.
    pub(crate) fn child_slot_mut(&mut self) -> Option<&mut Option<Box<Node>>> {
        match self {
            Properties::ButtonProps(props) => Some(&mut props.child),
            Properties::CardProps(props) => Some(&mut props.child),
            Properties::ScaffoldProps(props) => Some(&mut props.child),
            _ => None,
        }
    }

    /// Every child in id order: named slots in declared order, then list
    /// children.
    pub fn children(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        match self {
            Properties::TextProps(_)
            | Properties::ImageProps(_)
            | Properties::TextFieldProps(_)
            | Properties::SwitchProps(_)
            | Properties::CheckboxProps(_)
            | Properties::CustomProps(_) => {},
            Properties::ColumnProps(props) => out.extend(&props.children),
            Properties::RowProps(props) => out.extend(&props.children),
            Properties::BoxProps(props) => out.extend(&props.children),
            Properties::ButtonProps(props) => out.extend(props.child.as_deref()),
            Properties::CardProps(props) => out.extend(props.child.as_deref()),
            Properties::ScaffoldProps(props) => {
                out.extend(props.top_bar.as_deref());
                out.extend(props.bottom_bar.as_deref());
                out.extend(props.child.as_deref());
            },
            Properties::TopAppBarProps(props) => {
                out.extend(props.title.as_deref());
                out.extend(props.navigation_icon.as_deref());
                out.extend(&props.actions);
            },
            Properties::AlertDialogProps(props) => {
                out.extend(props.title.as_deref());
                out.extend(props.text.as_deref());
                out.extend(props.confirm_button.as_deref());
                out.extend(props.dismiss_button.as_deref());
            },
        }
        out
    }

    /// Mutable counterpart of [`Properties::children`], same order.
    pub(crate) fn children_mut(&mut self) -> Vec<&mut Node> {
        let mut out = Vec::new();
        match self {
            Properties::TextProps(_)
            | Properties::ImageProps(_)
            | Properties::TextFieldProps(_)
            | Properties::SwitchProps(_)
            | Properties::CheckboxProps(_)
            | Properties::CustomProps(_) => {},
            Properties::ColumnProps(props) => {
                out.extend(props.children.iter_mut());
            },
            Properties::RowProps(props) => out.extend(props.children.iter_mut()),
            Properties::BoxProps(props) => out.extend(props.children.iter_mut()),
            Properties::ButtonProps(props) => {
                out.extend(props.child.as_deref_mut());
            },
            Properties::CardProps(props) => {
                out.extend(props.child.as_deref_mut());
            },
            Properties::ScaffoldProps(props) => {
                out.extend(props.top_bar.as_deref_mut());
                out.extend(props.bottom_bar.as_deref_mut());
                out.extend(props.child.as_deref_mut());
            },
            Properties::TopAppBarProps(props) => {
                out.extend(props.title.as_deref_mut());
                out.extend(props.navigation_icon.as_deref_mut());
                out.extend(props.actions.iter_mut());
            },
            Properties::AlertDialogProps(props) => {
                out.extend(props.title.as_deref_mut());
                out.extend(props.text.as_deref_mut());
                out.extend(props.confirm_button.as_deref_mut());
                out.extend(props.dismiss_button.as_deref_mut());
            },
        }
        out
    }

    /// Whether the payload holds any child, in a list or a slot.
    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_scale: Option<String>,
}

/// Text input bound to the state host named by `state_key`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFieldProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,
}

/// Shared payload of `Switch` and `Checkbox`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,
    /// Behavior invoked after the checked state flips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_checked_change: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProps {
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_arrangement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_alignment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowProps {
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_arrangement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_alignment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxProps {
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_alignment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<Node>>,
    /// Name of the behavior invoked on click.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<String>,
}

/// Screen frame: optional bars around the content `child`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_bar: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_bar: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<Node>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopAppBarProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_icon: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDialogProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_button: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismiss_button: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_dismiss_request: Option<String>,
}

/// Opaque payload for node types rendered by an external handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProps {
    pub custom_type: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub data: serde_json::Map<String, Value>,
}

/// Field names accepted per properties tag, `type` excluded.
pub(crate) fn known_fields(tag: &str) -> Option<&'static [&'static str]> {
    let fields: &'static [&'static str] = match tag {
        "TextProps" => &["text", "fontSize", "fontWeight", "color", "maxLines"],
        "ImageProps" => &["url", "contentDescription", "contentScale"],
        "TextFieldProps" => &["value", "label", "placeholder", "stateKey"],
        "SwitchProps" | "CheckboxProps" => {
            &["checked", "stateKey", "onCheckedChange"]
        },
        "ColumnProps" => {
            &["children", "verticalArrangement", "horizontalAlignment"]
        },
        "RowProps" => {
            &["children", "horizontalArrangement", "verticalAlignment"]
        },
        "BoxProps" => &["children", "contentAlignment"],
        "ButtonProps" => &["child", "onClick", "enabled"],
        "CardProps" => &["child", "elevation", "onClick"],
        "ScaffoldProps" => &["topBar", "bottomBar", "child"],
        "TopAppBarProps" => &["title", "navigationIcon", "actions"],
        "AlertDialogProps" => &[
            "title",
            "text",
            "confirmButton",
            "dismissButton",
            "onDismissRequest",
        ],
        "CustomProps" => &["customType", "data"],
        _ => return None,
    };
    Some(fields)
}
