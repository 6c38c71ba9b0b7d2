//! Structural and semantic checks over node and document payloads.
//!
//! Findings are never raised as errors. Every check appends to one
//! [`ValidationResult`]; callers decide whether Error findings block
//! rendering.
//!
//! Raw JSON goes through a fixed pipeline:
//!
//! 1. blank input is `EMPTY_JSON`, unparsable input is `MALFORMED_JSON`;
//! 2. the raw tree is walked for unknown node types and modifier
//!    operations, and validation stops here if any were found;
//! 3. the payload is decoded leniently;
//! 4. the typed tree is checked in full;
//! 5. in strict mode, every field the decoder ignored is reported as a
//!    warning.

mod raw;
mod rules;
mod typed;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{is_document_shape, is_rootless_document};
use crate::error::DecodeError;
use crate::node::Node;

/// Path of the top-level payload in finding paths.
pub const ROOT_PATH: &str = "root";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    EmptyJson,
    MalformedJson,
    UnknownComposeType,
    PropertiesTypeMismatch,
    UnknownModifierOperation,
    ModifierValueOutOfRange,
    InvalidHexColor,
    ChildrenOnLeafNode,
    InvalidArrangement,
    InvalidAlignment,
    UnrecognizedProperties,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyJson => "EMPTY_JSON",
            ErrorCode::MalformedJson => "MALFORMED_JSON",
            ErrorCode::UnknownComposeType => "UNKNOWN_COMPOSE_TYPE",
            ErrorCode::PropertiesTypeMismatch => "PROPERTIES_TYPE_MISMATCH",
            ErrorCode::UnknownModifierOperation => {
                "UNKNOWN_MODIFIER_OPERATION"
            },
            ErrorCode::ModifierValueOutOfRange => "MODIFIER_VALUE_OUT_OF_RANGE",
            ErrorCode::InvalidHexColor => "INVALID_HEX_COLOR",
            ErrorCode::ChildrenOnLeafNode => "CHILDREN_ON_LEAF_NODE",
            ErrorCode::InvalidArrangement => "INVALID_ARRANGEMENT",
            ErrorCode::InvalidAlignment => "INVALID_ALIGNMENT",
            ErrorCode::UnrecognizedProperties => "UNRECOGNIZED_PROPERTIES",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted/indexed location, e.g.
    /// `root.properties.children[0].composeModifier.operations[1]`.
    pub path: String,
    pub message: String,
    pub code: ErrorCode,
    pub severity: Severity,
}

impl ValidationError {
    pub fn error(
        path: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code,
            severity: Severity::Error,
        }
    }

    pub fn warning(
        path: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code,
            severity: Severity::Warning,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.code, self.path, self.message
        )
    }
}

/// Every finding of one validation pass, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// No finding has Error severity.
    pub fn is_valid(&self) -> bool {
        !self
            .errors
            .iter()
            .any(|finding| finding.severity == Severity::Error)
    }

    /// No findings at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|finding| finding.code).collect()
    }

    fn single(finding: ValidationError) -> Self {
        Self {
            errors: vec![finding],
        }
    }
}

impl Serialize for ValidationResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Report<'a> {
            errors: &'a [ValidationError],
            is_valid: bool,
            is_clean: bool,
        }

        Report {
            errors: &self.errors,
            is_valid: self.is_valid(),
            is_clean: self.is_clean(),
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Report fields the lenient decoder ignores as warnings.
    pub strict: bool,
}

impl ValidatorOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Accumulates findings, dropping repeats of the same `(path, code)`.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    errors: Vec<ValidationError>,
}

impl Findings {
    pub(crate) fn push(&mut self, finding: ValidationError) {
        let seen = self.errors.iter().any(|existing| {
            existing.path == finding.path && existing.code == finding.code
        });
        if !seen {
            self.errors.push(finding);
        }
    }

    pub(crate) fn error(
        &mut self,
        path: &str,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        self.push(ValidationError::error(path, code, message));
    }

    pub(crate) fn warning(
        &mut self,
        path: &str,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        self.push(ValidationError::warning(path, code, message));
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|finding| finding.severity == Severity::Error)
    }

    pub(crate) fn finish(self) -> ValidationResult {
        ValidationResult {
            errors: self.errors,
        }
    }
}

pub(crate) fn field_path(path: &str, key: &str) -> String {
    format!("{path}.{key}")
}

pub(crate) fn index_path(path: &str, key: &str, index: usize) -> String {
    format!("{path}.{key}[{index}]")
}

/// Validate a raw JSON payload, either a node or a document.
pub fn validate_json(input: &str, options: &ValidatorOptions) -> ValidationResult {
    if input.trim().is_empty() {
        return ValidationResult::single(DecodeError::Empty.to_finding());
    }
    let value: Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(err) => {
            return ValidationResult::single(
                DecodeError::Malformed(err).to_finding(),
            );
        },
    };

    if is_rootless_document(&value) {
        return ValidationResult::single(ValidationError::error(
            ROOT_PATH,
            ErrorCode::MalformedJson,
            "document has no root",
        ));
    }

    let document = is_document_shape(&value);
    let raw_root = if document { &value["root"] } else { &value };

    let mut findings = Findings::default();
    raw::check_tags(raw_root, ROOT_PATH, &mut findings);
    if findings.has_errors() {
        log::debug!("validation stopped before decoding");
        return findings.finish();
    }
    raw::check_leaf_children(raw_root, ROOT_PATH, &mut findings);

    let root = match serde_json::from_value::<Node>(raw_root.clone()) {
        Ok(root) => root,
        Err(err) => {
            let (path, reason) =
                raw::locate_decode_failure(raw_root, ROOT_PATH)
                    .unwrap_or_else(|| (ROOT_PATH.to_string(), err.to_string()));
            findings.error(
                &path,
                ErrorCode::MalformedJson,
                format!("node does not decode: {reason}"),
            );
            return findings.finish();
        },
    };
    if document {
        raw::check_document_sections(&value, &mut findings);
    }

    typed::check_node(&root, ROOT_PATH, &mut findings);

    if options.strict {
        if document {
            raw::check_document_fields(&value, &mut findings);
        }
        raw::check_node_fields(raw_root, ROOT_PATH, &mut findings);
    }

    findings.finish()
}

/// Validate an already decoded node tree.
pub fn validate_node(node: &Node) -> ValidationResult {
    let mut findings = Findings::default();
    typed::check_node(node, ROOT_PATH, &mut findings);
    findings.finish()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn validate(value: Value) -> ValidationResult {
        validate_json(&value.to_string(), &ValidatorOptions::default())
    }

    fn text(content: &str) -> Value {
        json!({"type": "Text", "properties": {"type": "TextProps", "text": content}})
    }

    #[test]
    fn given_blank_input_when_validating_then_reports_empty_json() {
        let result = validate_json("   ", &ValidatorOptions::default());

        assert_eq!(result.codes(), vec![ErrorCode::EmptyJson]);
        assert!(!result.is_valid());
    }

    #[test]
    fn given_broken_json_when_validating_then_reports_malformed_json() {
        let result = validate_json("{\"type\":", &ValidatorOptions::default());

        assert_eq!(result.codes(), vec![ErrorCode::MalformedJson]);
        assert_eq!(result.errors[0].path, ROOT_PATH);
    }

    #[test]
    fn given_undecodable_nested_properties_when_validating_then_path_is_narrowed()
     {
        let result = validate(json!({
            "type": "Column",
            "properties": {"type": "ColumnProps", "children": [
                {"type": "Text", "properties": {"type": "FooProps"}},
                text("fine")
            ]}
        }));

        assert_eq!(result.codes(), vec![ErrorCode::MalformedJson]);
        assert_eq!(result.errors[0].path, "root.properties.children[0]");
    }

    #[test]
    fn given_document_sections_without_root_when_validating_then_malformed() {
        let result = validate(json!({"initialState": {}, "actions": {}}));

        assert_eq!(result.codes(), vec![ErrorCode::MalformedJson]);
        assert_eq!(result.errors[0].path, ROOT_PATH);
        assert!(result.errors[0].message.contains("no root"));
    }

    #[test]
    fn given_unknown_type_when_validating_then_exactly_one_error() {
        let result = validate(json!({"type": "Bogus"}));

        assert_eq!(result.codes(), vec![ErrorCode::UnknownComposeType]);
        assert_eq!(result.errors[0].severity, Severity::Error);
    }

    #[test]
    fn given_text_with_children_when_validating_then_leaf_error_is_reported() {
        let result = validate(json!({
            "type": "Text",
            "properties": {
                "type": "TextProps",
                "text": "parent",
                "children": [text("child")]
            }
        }));

        assert_eq!(result.codes(), vec![ErrorCode::ChildrenOnLeafNode]);
        assert_eq!(result.errors[0].path, "root");
    }

    #[test]
    fn given_bad_hex_color_when_validating_then_hex_error_is_reported() {
        let result = validate(json!({
            "type": "Box",
            "properties": {"type": "BoxProps"},
            "composeModifier": {"operations": [
                {"type": "BackgroundColor", "color": "#ZZZZZZZZ"}
            ]}
        }));

        assert_eq!(result.codes(), vec![ErrorCode::InvalidHexColor]);
        assert_eq!(
            result.errors[0].path,
            "root.composeModifier.operations[0]"
        );
    }

    #[test]
    fn given_negative_padding_when_validating_then_range_error_is_reported() {
        let result = validate(json!({
            "type": "Column",
            "properties": {"type": "ColumnProps", "children": [{
                "type": "Text",
                "properties": {"type": "TextProps", "text": "x"},
                "composeModifier": {"operations": [
                    {"type": "FillMaxWidth"},
                    {"type": "Padding", "value": -1}
                ]}
            }]}
        }));

        assert_eq!(result.codes(), vec![ErrorCode::ModifierValueOutOfRange]);
        assert_eq!(
            result.errors[0].path,
            "root.properties.children[0].composeModifier.operations[1]"
        );
    }

    #[test]
    fn given_three_independent_defects_when_validating_then_three_findings() {
        let result = validate(json!({
            "type": "Column",
            "properties": {
                "type": "ColumnProps",
                "verticalArrangement": "Middle",
                "children": [
                    {
                        "type": "Text",
                        "properties": {"type": "TextProps", "text": "a"},
                        "composeModifier": {"operations": [
                            {"type": "Alpha", "value": 1.5}
                        ]}
                    },
                    {"type": "Image", "properties": {"type": "TextProps"}}
                ]
            }
        }));

        assert_eq!(
            result.codes(),
            vec![
                ErrorCode::InvalidArrangement,
                ErrorCode::ModifierValueOutOfRange,
                ErrorCode::PropertiesTypeMismatch,
            ]
        );
    }

    #[test]
    fn given_alpha_just_above_one_when_validating_then_range_error_is_reported()
    {
        let result = validate(json!({
            "type": "Text",
            "properties": {"type": "TextProps", "text": "a"},
            "composeModifier": {"operations": [
                {"type": "Alpha", "value": 1.00000001}
            ]}
        }));

        assert_eq!(result.codes(), vec![ErrorCode::ModifierValueOutOfRange]);
    }

    #[test]
    fn given_unknown_operation_when_validating_then_decode_is_skipped() {
        let result = validate(json!({
            "type": "Column",
            "properties": {"type": "ColumnProps", "verticalArrangement": "Nope"},
            "composeModifier": {"operations": [{"type": "Blur", "radius": 3}]}
        }));

        assert_eq!(result.codes(), vec![ErrorCode::UnknownModifierOperation]);
    }

    #[test]
    fn given_unknown_fields_when_strict_then_each_is_a_warning() {
        let raw = json!({
            "type": "Text",
            "extra": true,
            "properties": {"type": "TextProps", "text": "x", "shadow": 2}
        });

        let lenient =
            validate_json(&raw.to_string(), &ValidatorOptions::default());
        let strict = validate_json(&raw.to_string(), &ValidatorOptions::strict());

        assert!(lenient.is_clean());
        assert!(strict.is_valid());
        assert!(!strict.is_clean());
        let paths: Vec<&str> =
            strict.warnings().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["root.extra", "root.properties.shadow"]);
        assert!(
            strict
                .warnings()
                .all(|w| w.code == ErrorCode::UnrecognizedProperties)
        );
    }

    #[test]
    fn given_document_payload_when_validating_then_root_is_checked() {
        let result = validate(json!({
            "initialState": {"open": false},
            "actions": {"toggle": [{"type": "ToggleState", "key": "open"}]},
            "root": {"type": "Bogus"}
        }));

        assert_eq!(result.codes(), vec![ErrorCode::UnknownComposeType]);
        assert_eq!(result.errors[0].path, "root");
    }

    #[test]
    fn given_document_with_bad_action_when_validating_then_malformed_json() {
        let result = validate(json!({
            "actions": {"go": [{"type": "Teleport"}]},
            "root": text("ok")
        }));

        assert_eq!(result.codes(), vec![ErrorCode::MalformedJson]);
        assert_eq!(result.errors[0].path, "actions.go");
    }

    #[test]
    fn given_result_when_serializing_then_flags_are_included() {
        let result = validate(json!({"type": "Bogus"}));

        let encoded = serde_json::to_value(&result).expect("serializes");

        assert_eq!(encoded["isValid"], json!(false));
        assert_eq!(encoded["isClean"], json!(false));
        assert_eq!(encoded["errors"][0]["code"], json!("UNKNOWN_COMPOSE_TYPE"));
        assert_eq!(encoded["errors"][0]["severity"], json!("Error"));
    }

    #[test]
    fn given_decoded_tree_when_validating_node_then_typed_checks_run() {
        let mut node = Node::column(vec![Node::text("a")]);
        if let Some(crate::node::Properties::ColumnProps(props)) =
            &mut node.properties
        {
            props.horizontal_alignment = Some(String::from("Middle"));
        }

        let result = validate_node(&node);

        assert_eq!(result.codes(), vec![ErrorCode::InvalidAlignment]);
        assert_eq!(result.errors[0].path, "root.properties.horizontalAlignment");
    }
}
