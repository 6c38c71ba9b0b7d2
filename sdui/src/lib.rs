//! Server-driven UI documents.
//!
//! A server sends a JSON [`Document`]: a tree of typed [`Node`]s, a map of
//! initial state and a map of named action scripts. This crate covers
//! everything up to the renderer:
//! - the data model ([`Node`], [`Properties`], [`Modifier`], [`Action`]);
//! - validation of raw payloads ([`validate_json`], [`validate_node`]);
//! - derived ids, flattening and persistent tree edits for authoring tools
//!   ([`TreeIndex`], [`flatten`], [`EditorState`]);
//! - the action runtime ([`Dispatcher`]) and document binding
//!   ([`DocumentBinder`]).
//!
//! # Quick Example
//!
//! ```
//! use sdui::{DocumentBinder, Payload, StateValue, ValidatorOptions};
//!
//! let json = r#"{
//!     "initialState": {"open": false},
//!     "actions": {"toggle": [{"type": "ToggleState", "key": "open"}]},
//!     "root": {"type": "Text", "properties": {"type": "TextProps", "text": "hi"}}
//! }"#;
//!
//! let report = sdui::validate_json(json, &ValidatorOptions::default());
//! assert!(report.is_valid());
//!
//! let document = Payload::from_json(json).unwrap().into_document();
//! let binding = DocumentBinder::new().bind(&document);
//! binding.invoke("toggle");
//!
//! let open = binding.states().get("open").map(|host| host.get());
//! assert_eq!(open, Some(StateValue::Bool(true)));
//! ```

mod action;
mod binder;
mod dispatch;
mod document;
mod editor;
mod error;
mod modifier;
mod node;
mod state;
mod validator;

pub use action::{Action, CustomAction};
pub use binder::{
    Behavior, BehaviorRegistry, Binding, BoundDocument, DocumentBinder,
};
pub use dispatch::{
    CustomActionHandler, Dispatcher, DispatcherOptions, HandlerRegistry,
    LogSink, RecordingSink, SinkRecord, StdoutSink,
};
pub use document::{Document, Payload};
pub use editor::EditorState;
pub use error::{DecodeError, Result};
pub use modifier::{CornerRadii, Modifier, Operation, Shape};
pub use node::{
    AlertDialogProps, BoxProps, ButtonProps, CardProps, ColumnProps,
    CustomProps, DEFAULT_TEXT, EditOutcome, FlattenedNode, ImageProps, Node,
    NodeIndex, NodeType, Properties, RowProps, ScaffoldProps, TextFieldProps,
    TextProps, ToggleProps, TopAppBarProps, TreeIndex, add_as_child,
    add_as_sibling, flatten, flatten_visible, update_node,
};
pub use state::{StateHost, StateRegistry, StateValue};
pub use validator::{
    ErrorCode, ROOT_PATH, Severity, ValidationError, ValidationResult,
    ValidatorOptions, validate_json, validate_node,
};
