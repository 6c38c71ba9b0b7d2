//! Node tree: typed UI elements, their payloads and tree editing.
//!
//! A [`Node`] owns its children through its [`Properties`]. Nodes carry no
//! back-reference to their parent; ancestry and derived ids are answered by a
//! [`TreeIndex`] built over a root, and editing operations take the parent
//! explicitly.

mod edit;
mod flatten;
mod index;
mod properties;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::modifier::Modifier;

pub use edit::{
    DEFAULT_TEXT, EditOutcome, add_as_child, add_as_sibling, update_node,
};
pub use flatten::{FlattenedNode, flatten, flatten_visible};
pub use index::{NodeIndex, TreeIndex};
pub(crate) use properties::known_fields as known_properties_fields;
pub use properties::{
    AlertDialogProps, BoxProps, ButtonProps, CardProps, ColumnProps,
    CustomProps, ImageProps, Properties, RowProps, ScaffoldProps,
    TextFieldProps, TextProps, ToggleProps, TopAppBarProps,
};

/// Closed set of node types. The wire tag is the variant name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum NodeType {
    Column,
    Row,
    Box,
    Text,
    Image,
    TextField,
    Switch,
    Checkbox,
    Button,
    Card,
    Scaffold,
    TopAppBar,
    AlertDialog,
    Custom,
}

impl NodeType {
    pub const ALL: [NodeType; 14] = [
        NodeType::Column,
        NodeType::Row,
        NodeType::Box,
        NodeType::Text,
        NodeType::Image,
        NodeType::TextField,
        NodeType::Switch,
        NodeType::Checkbox,
        NodeType::Button,
        NodeType::Card,
        NodeType::Scaffold,
        NodeType::TopAppBar,
        NodeType::AlertDialog,
        NodeType::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Column => "Column",
            NodeType::Row => "Row",
            NodeType::Box => "Box",
            NodeType::Text => "Text",
            NodeType::Image => "Image",
            NodeType::TextField => "TextField",
            NodeType::Switch => "Switch",
            NodeType::Checkbox => "Checkbox",
            NodeType::Button => "Button",
            NodeType::Card => "Card",
            NodeType::Scaffold => "Scaffold",
            NodeType::TopAppBar => "TopAppBar",
            NodeType::AlertDialog => "AlertDialog",
            NodeType::Custom => "Custom",
        }
    }

    /// Case-sensitive lookup of a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == tag)
    }

    /// The one [`Properties`] tag a node of this type may carry.
    pub fn expected_properties(self) -> &'static str {
        match self {
            NodeType::Column => "ColumnProps",
            NodeType::Row => "RowProps",
            NodeType::Box => "BoxProps",
            NodeType::Text => "TextProps",
            NodeType::Image => "ImageProps",
            NodeType::TextField => "TextFieldProps",
            NodeType::Switch => "SwitchProps",
            NodeType::Checkbox => "CheckboxProps",
            NodeType::Button => "ButtonProps",
            NodeType::Card => "CardProps",
            NodeType::Scaffold => "ScaffoldProps",
            NodeType::TopAppBar => "TopAppBarProps",
            NodeType::AlertDialog => "AlertDialogProps",
            NodeType::Custom => "CustomProps",
        }
    }

    /// Leaf types never hold children.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeType::Text
                | NodeType::Image
                | NodeType::TextField
                | NodeType::Switch
                | NodeType::Checkbox
        )
    }

    pub fn is_text(self) -> bool {
        matches!(self, NodeType::Text)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of the UI tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(
        default,
        rename = "composeModifier",
        skip_serializing_if = "Modifier::is_empty"
    )]
    pub modifier: Modifier,
}

impl Node {
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            properties: None,
            modifier: Modifier::default(),
        }
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeType::Text).with_properties(Properties::TextProps(
            TextProps {
                text: Some(text.into()),
                ..TextProps::default()
            },
        ))
    }

    pub fn column(children: Vec<Node>) -> Self {
        Self::new(NodeType::Column).with_properties(Properties::ColumnProps(
            ColumnProps {
                children,
                ..ColumnProps::default()
            },
        ))
    }

    pub fn row(children: Vec<Node>) -> Self {
        Self::new(NodeType::Row).with_properties(Properties::RowProps(
            RowProps {
                children,
                ..RowProps::default()
            },
        ))
    }

    pub fn button(child: Option<Node>, on_click: Option<&str>) -> Self {
        Self::new(NodeType::Button).with_properties(Properties::ButtonProps(
            ButtonProps {
                child: child.map(Box::new),
                on_click: on_click.map(ToString::to_string),
                enabled: None,
            },
        ))
    }

    /// Decode a node leniently; unknown JSON fields are ignored.
    pub fn from_json(input: &str) -> Result<Self, DecodeError> {
        if input.trim().is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json(&self) -> Result<String, DecodeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Children in id order; empty for leaves and nodes without payload.
    pub fn children(&self) -> Vec<&Node> {
        self.properties
            .as_ref()
            .map(Properties::children)
            .unwrap_or_default()
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut Node> {
        self.properties
            .as_mut()
            .map(Properties::children_mut)
            .unwrap_or_default()
    }

    /// Text of a `TextProps` payload, if any.
    pub fn text_value(&self) -> Option<&str> {
        match &self.properties {
            Some(Properties::TextProps(props)) => props.text.as_deref(),
            _ => None,
        }
    }
}
