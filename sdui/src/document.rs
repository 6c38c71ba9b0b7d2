use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::Action;
use crate::error::{DecodeError, Result};
use crate::node::Node;

/// Self-contained payload: initial state, named action scripts and a root
/// node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub initial_state: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, Vec<Action>>,
    pub root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self {
            initial_state: BTreeMap::new(),
            actions: BTreeMap::new(),
            root,
        }
    }

    pub fn with_state(mut self, key: impl Into<String>, value: Value) -> Self {
        self.initial_state.insert(key.into(), value);
        self
    }

    pub fn with_actions(
        mut self,
        name: impl Into<String>,
        actions: Vec<Action>,
    ) -> Self {
        self.actions.insert(name.into(), actions);
        self
    }

    /// Decode a document leniently; unknown JSON fields are ignored.
    pub fn from_json(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Either top-level shape accepted on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Node(Node),
    Document(Document),
}

impl Payload {
    /// Decode a bare node or a document.
    ///
    /// An object with a `root` field and no `type` field is a document;
    /// anything else is decoded as a node.
    pub fn from_json(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(DecodeError::Empty);
        }
        let value: Value = serde_json::from_str(input)?;
        if is_document_shape(&value) {
            Ok(Payload::Document(serde_json::from_value(value)?))
        } else {
            Ok(Payload::Node(serde_json::from_value(value)?))
        }
    }

    pub fn root(&self) -> &Node {
        match self {
            Payload::Node(node) => node,
            Payload::Document(document) => &document.root,
        }
    }

    /// The payload as a document; a bare node gets empty state and actions.
    pub fn into_document(self) -> Document {
        match self {
            Payload::Node(node) => Document::new(node),
            Payload::Document(document) => document,
        }
    }
}

pub(crate) fn is_document_shape(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("root") && !map.contains_key("type"))
}

/// Object carrying document sections but neither `root` nor a node `type`.
pub(crate) fn is_rootless_document(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        !map.contains_key("root")
            && !map.contains_key("type")
            && (map.contains_key("initialState") || map.contains_key("actions"))
    })
}
