use super::rules::{
    BOX_CONTENT_ALIGNMENTS, COLUMN_HORIZONTAL_ALIGNMENTS,
    COLUMN_VERTICAL_ARRANGEMENTS, ROW_HORIZONTAL_ARRANGEMENTS,
    ROW_VERTICAL_ALIGNMENTS, is_valid_hex_color,
};
use super::{ErrorCode, Findings, field_path, index_path};
use crate::modifier::{Operation, Shape};
use crate::node::{Node, Properties};

/// Post-decode checks for `node` and everything below it.
pub(super) fn check_node(node: &Node, path: &str, findings: &mut Findings) {
    let properties_path = field_path(path, "properties");

    if let Some(properties) = &node.properties {
        let expected = node.node_type.expected_properties();
        if properties.tag() != expected {
            findings.error(
                &properties_path,
                ErrorCode::PropertiesTypeMismatch,
                format!(
                    "{} expects {expected}, found {}",
                    node.node_type,
                    properties.tag()
                ),
            );
        }

        if node.node_type.is_leaf() && properties.has_children() {
            findings.error(
                path,
                ErrorCode::ChildrenOnLeafNode,
                format!("{} is a leaf but holds children", node.node_type),
            );
        }

        check_layout(properties, &properties_path, findings);
        check_text_color(properties, &properties_path, findings);
    }

    let modifier_path = field_path(path, "composeModifier");
    for (index, operation) in node.modifier.operations.iter().enumerate() {
        check_operation(
            operation,
            &index_path(&modifier_path, "operations", index),
            findings,
        );
    }

    if let Some(properties) = &node.properties {
        for (child_path, child) in child_paths(properties, &properties_path) {
            check_node(child, &child_path, findings);
        }
    }
}

fn check_layout(properties: &Properties, path: &str, findings: &mut Findings) {
    match properties {
        Properties::ColumnProps(props) => {
            check_allowed(
                props.vertical_arrangement.as_deref(),
                COLUMN_VERTICAL_ARRANGEMENTS,
                &field_path(path, "verticalArrangement"),
                ErrorCode::InvalidArrangement,
                findings,
            );
            check_allowed(
                props.horizontal_alignment.as_deref(),
                COLUMN_HORIZONTAL_ALIGNMENTS,
                &field_path(path, "horizontalAlignment"),
                ErrorCode::InvalidAlignment,
                findings,
            );
        },
        Properties::RowProps(props) => {
            check_allowed(
                props.horizontal_arrangement.as_deref(),
                ROW_HORIZONTAL_ARRANGEMENTS,
                &field_path(path, "horizontalArrangement"),
                ErrorCode::InvalidArrangement,
                findings,
            );
            check_allowed(
                props.vertical_alignment.as_deref(),
                ROW_VERTICAL_ALIGNMENTS,
                &field_path(path, "verticalAlignment"),
                ErrorCode::InvalidAlignment,
                findings,
            );
        },
        Properties::BoxProps(props) => {
            check_allowed(
                props.content_alignment.as_deref(),
                BOX_CONTENT_ALIGNMENTS,
                &field_path(path, "contentAlignment"),
                ErrorCode::InvalidAlignment,
                findings,
            );
        },
        _ => {},
    }
}

fn check_allowed(
    value: Option<&str>,
    allowed: &[&str],
    path: &str,
    code: ErrorCode,
    findings: &mut Findings,
) {
    let Some(value) = value else {
        return;
    };
    if !allowed.contains(&value) {
        findings.error(
            path,
            code,
            format!("'{value}' is not one of {}", allowed.join(", ")),
        );
    }
}

fn check_text_color(
    properties: &Properties,
    path: &str,
    findings: &mut Findings,
) {
    if let Properties::TextProps(props) = properties {
        if let Some(color) = props.color.as_deref() {
            check_color(color, &field_path(path, "color"), findings);
        }
    }
}

fn check_operation(operation: &Operation, path: &str, findings: &mut Findings) {
    match operation {
        Operation::Padding { value }
        | Operation::Width { value }
        | Operation::Height { value } => {
            check_non_negative(operation.tag(), *value, path, findings);
        },
        Operation::Shadow { elevation } => {
            check_non_negative("Shadow elevation", *elevation, path, findings);
        },
        Operation::Border { width, color } => {
            check_non_negative("Border width", *width, path, findings);
            check_color(color, path, findings);
        },
        Operation::BackgroundColor { color } => {
            check_color(color, path, findings);
        },
        Operation::Background { color, shape } => {
            check_color(color, path, findings);
            check_shape(shape, path, findings);
        },
        Operation::Clip { shape } => check_shape(shape, path, findings),
        Operation::Alpha { value } => {
            if !(0.0..=1.0).contains(value) {
                findings.error(
                    path,
                    ErrorCode::ModifierValueOutOfRange,
                    format!("Alpha must be within [0, 1], got {value}"),
                );
            }
        },
        Operation::FillMaxSize
        | Operation::FillMaxWidth
        | Operation::FillMaxHeight
        | Operation::Rotate { .. } => {},
    }
}

fn check_shape(shape: &Shape, path: &str, findings: &mut Findings) {
    if let Shape::RoundedCorner(radii) = shape {
        if let Some(radius) = radii.resolved().into_iter().find(|r| *r < 0) {
            findings.error(
                path,
                ErrorCode::ModifierValueOutOfRange,
                format!("corner radius must be >= 0, got {radius}"),
            );
        }
    }
}

fn check_non_negative(
    what: &str,
    value: i32,
    path: &str,
    findings: &mut Findings,
) {
    if value < 0 {
        findings.error(
            path,
            ErrorCode::ModifierValueOutOfRange,
            format!("{what} must be >= 0, got {value}"),
        );
    }
}

fn check_color(color: &str, path: &str, findings: &mut Findings) {
    if !is_valid_hex_color(color) {
        findings.error(
            path,
            ErrorCode::InvalidHexColor,
            format!("'{color}' is not a #AARRGGBB color"),
        );
    }
}

/// Children of a payload with their finding paths, in id order.
fn child_paths<'a>(
    properties: &'a Properties,
    path: &str,
) -> Vec<(String, &'a Node)> {
    let slot = |key: &str, node: &'a Option<Box<Node>>| {
        node.as_deref().map(|node| (field_path(path, key), node))
    };
    let list = |key: &str, nodes: &'a [Node]| {
        nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (index_path(path, key, index), node))
            .collect::<Vec<_>>()
    };

    let mut out = Vec::new();
    match properties {
        Properties::ColumnProps(props) => {
            out.extend(list("children", props.children.as_slice()));
        },
        Properties::RowProps(props) => {
            out.extend(list("children", props.children.as_slice()));
        },
        Properties::BoxProps(props) => {
            out.extend(list("children", props.children.as_slice()));
        },
        Properties::ButtonProps(props) => {
            out.extend(slot("child", &props.child));
        },
        Properties::CardProps(props) => {
            out.extend(slot("child", &props.child));
        },
        Properties::ScaffoldProps(props) => {
            out.extend(slot("topBar", &props.top_bar));
            out.extend(slot("bottomBar", &props.bottom_bar));
            out.extend(slot("child", &props.child));
        },
        Properties::TopAppBarProps(props) => {
            out.extend(slot("title", &props.title));
            out.extend(slot("navigationIcon", &props.navigation_icon));
            out.extend(list("actions", props.actions.as_slice()));
        },
        Properties::AlertDialogProps(props) => {
            out.extend(slot("title", &props.title));
            out.extend(slot("text", &props.text));
            out.extend(slot("confirmButton", &props.confirm_button));
            out.extend(slot("dismissButton", &props.dismiss_button));
        },
        Properties::TextProps(_)
        | Properties::ImageProps(_)
        | Properties::TextFieldProps(_)
        | Properties::SwitchProps(_)
        | Properties::CheckboxProps(_)
        | Properties::CustomProps(_) => {},
    }
    out
}
