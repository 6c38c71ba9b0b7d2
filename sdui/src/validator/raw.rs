//! Checks that run on the parsed JSON tree rather than the decoded model.
//!
//! Lenient decoding drops unknown fields, so anything that must be seen
//! before that happens lives here.

use serde_json::{Map, Value};

use super::rules::{
    CHILD_KEYS, DOCUMENT_FIELDS, MODIFIER_FIELDS, NODE_FIELDS, action_fields,
    operation_fields, shape_fields,
};
use super::{ErrorCode, Findings, field_path, index_path};
use crate::action::Action;
use crate::modifier::Operation;
use crate::node::{Node, NodeType, known_properties_fields};

/// Unknown node type tags and modifier operation tags, for the whole tree.
pub(super) fn check_tags(value: &Value, path: &str, findings: &mut Findings) {
    let Some(node) = value.as_object() else {
        findings.error(path, ErrorCode::MalformedJson, "expected a node object");
        return;
    };

    match node.get("type").and_then(Value::as_str) {
        Some(tag) if NodeType::from_tag(tag).is_some() => {},
        Some(tag) => findings.error(
            path,
            ErrorCode::UnknownComposeType,
            format!("unknown node type '{tag}'"),
        ),
        None => findings.error(
            path,
            ErrorCode::UnknownComposeType,
            "node has no string 'type'",
        ),
    }

    let modifier_path = field_path(path, "composeModifier");
    let operations = node
        .get("composeModifier")
        .and_then(|modifier| modifier.get("operations"))
        .and_then(Value::as_array);
    for (index, operation) in operations.into_iter().flatten().enumerate() {
        let tag = operation.get("type").and_then(Value::as_str);
        if tag.is_some_and(Operation::is_known_tag) {
            continue;
        }
        findings.error(
            &index_path(&modifier_path, "operations", index),
            ErrorCode::UnknownModifierOperation,
            match tag {
                Some(tag) => format!("unknown modifier operation '{tag}'"),
                None => String::from("modifier operation has no string 'type'"),
            },
        );
    }

    let properties_path = field_path(path, "properties");
    if let Some(properties) = node.get("properties").and_then(Value::as_object) {
        for_each_child(properties, &properties_path, |child, child_path| {
            check_tags(child, child_path, findings)
        });
    }
}

/// Leaf nodes whose raw payload still carries child content.
pub(super) fn check_leaf_children(
    value: &Value,
    path: &str,
    findings: &mut Findings,
) {
    let Some(node) = value.as_object() else {
        return;
    };
    let node_type = node
        .get("type")
        .and_then(Value::as_str)
        .and_then(NodeType::from_tag);
    let properties = node.get("properties").and_then(Value::as_object);

    if let Some(node_type) = node_type.filter(|ty| ty.is_leaf()) {
        let offending = properties
            .and_then(first_child_key)
            .or_else(|| first_child_key(node));
        if let Some(key) = offending {
            findings.error(
                path,
                ErrorCode::ChildrenOnLeafNode,
                format!("{node_type} is a leaf but carries '{key}'"),
            );
        }
    }

    if let Some(properties) = properties {
        let properties_path = field_path(path, "properties");
        for_each_child(properties, &properties_path, |child, child_path| {
            check_leaf_children(child, child_path, findings)
        });
    }
}

/// Deepest subtree that fails to decode as a node, with the decoder's
/// message.
pub(super) fn locate_decode_failure(
    value: &Value,
    path: &str,
) -> Option<(String, String)> {
    let err = serde_json::from_value::<Node>(value.clone()).err()?;

    let mut deeper = None;
    if let Some(properties) = value.get("properties").and_then(Value::as_object)
    {
        let properties_path = field_path(path, "properties");
        for_each_child(properties, &properties_path, |child, child_path| {
            if deeper.is_none() {
                deeper = locate_decode_failure(child, child_path);
            }
        });
    }

    Some(deeper.unwrap_or_else(|| (path.to_string(), err.to_string())))
}

/// `initialState` and `actions` of a document must decode.
pub(super) fn check_document_sections(
    document: &Value,
    findings: &mut Findings,
) {
    match document.get("initialState") {
        None | Some(Value::Object(_)) => {},
        Some(_) => findings.error(
            "initialState",
            ErrorCode::MalformedJson,
            "initialState must be an object",
        ),
    }

    match document.get("actions") {
        None => {},
        Some(Value::Object(actions)) => {
            for (name, script) in actions {
                let decoded =
                    serde_json::from_value::<Vec<Action>>(script.clone());
                if let Err(err) = decoded {
                    findings.error(
                        &field_path("actions", name),
                        ErrorCode::MalformedJson,
                        format!("action list does not decode: {err}"),
                    );
                }
            }
        },
        Some(_) => findings.error(
            "actions",
            ErrorCode::MalformedJson,
            "actions must be an object",
        ),
    }
}

/// Strict mode: unknown top-level document fields and action fields.
pub(super) fn check_document_fields(document: &Value, findings: &mut Findings) {
    let Some(fields) = document.as_object() else {
        return;
    };
    report_unknown(fields, DOCUMENT_FIELDS, "", findings);

    let scripts = fields.get("actions").and_then(Value::as_object);
    for (name, script) in scripts.into_iter().flatten() {
        let actions_path = field_path("actions", name);
        for (index, action) in script.as_array().into_iter().flatten().enumerate()
        {
            check_action_fields(
                action,
                &format!("{actions_path}[{index}]"),
                findings,
            );
        }
    }
}

/// Strict mode: every field of the node tree that decoding ignores.
pub(super) fn check_node_fields(
    value: &Value,
    path: &str,
    findings: &mut Findings,
) {
    let Some(node) = value.as_object() else {
        return;
    };
    report_unknown(node, NODE_FIELDS, path, findings);

    if let Some(modifier) = node.get("composeModifier").and_then(Value::as_object)
    {
        let modifier_path = field_path(path, "composeModifier");
        report_unknown(modifier, MODIFIER_FIELDS, &modifier_path, findings);
        let operations = modifier.get("operations").and_then(Value::as_array);
        for (index, operation) in operations.into_iter().flatten().enumerate() {
            check_operation_fields(
                operation,
                &index_path(&modifier_path, "operations", index),
                findings,
            );
        }
    }

    let Some(properties) = node.get("properties").and_then(Value::as_object)
    else {
        return;
    };
    let properties_path = field_path(path, "properties");
    let known = properties
        .get("type")
        .and_then(Value::as_str)
        .and_then(known_properties_fields);
    let Some(known) = known else {
        return;
    };
    report_unknown(properties, known, &properties_path, findings);

    let decoded: Map<String, Value> = properties
        .iter()
        .filter(|(key, _)| known.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    for_each_child(&decoded, &properties_path, |child, child_path| {
        check_node_fields(child, child_path, findings)
    });
}

fn check_operation_fields(value: &Value, path: &str, findings: &mut Findings) {
    let Some(operation) = value.as_object() else {
        return;
    };
    let known = operation
        .get("type")
        .and_then(Value::as_str)
        .and_then(operation_fields);
    let Some(known) = known else {
        return;
    };
    report_unknown(operation, known, path, findings);

    if let Some(shape) = operation.get("shape").and_then(Value::as_object) {
        let shape_path = field_path(path, "shape");
        let known = shape
            .get("type")
            .and_then(Value::as_str)
            .and_then(shape_fields);
        if let Some(known) = known {
            report_unknown(shape, known, &shape_path, findings);
        }
    }
}

fn check_action_fields(value: &Value, path: &str, findings: &mut Findings) {
    let Some(action) = value.as_object() else {
        return;
    };
    let known = action
        .get("type")
        .and_then(Value::as_str)
        .and_then(action_fields);
    let Some(known) = known else {
        return;
    };
    report_unknown(action, known, path, findings);

    let nested = action.get("actions").and_then(Value::as_array);
    for (index, inner) in nested.into_iter().flatten().enumerate() {
        check_action_fields(inner, &index_path(path, "actions", index), findings);
    }
}

/// One warning per key of `object` that is neither `type` nor in `known`.
fn report_unknown(
    object: &Map<String, Value>,
    known: &[&str],
    path: &str,
    findings: &mut Findings,
) {
    for key in object.keys() {
        if key == "type" || known.contains(&key.as_str()) {
            continue;
        }
        let key_path = if path.is_empty() {
            key.clone()
        } else {
            field_path(path, key)
        };
        findings.warning(
            &key_path,
            ErrorCode::UnrecognizedProperties,
            format!("unrecognized field '{key}'"),
        );
    }
}

/// Calls `visit` for every node held under a child key of `object`.
///
/// Only object and array values are followed; strings such as a text
/// payload's `text` are data, not nodes.
fn for_each_child<F>(object: &Map<String, Value>, path: &str, mut visit: F)
where
    F: FnMut(&Value, &str),
{
    for key in CHILD_KEYS {
        match object.get(*key) {
            Some(child @ Value::Object(_)) => {
                visit(child, &field_path(path, key));
            },
            Some(Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    visit(item, &index_path(path, key, index));
                }
            },
            _ => {},
        }
    }
}

/// First child key holding an object or a non-empty array.
fn first_child_key(object: &Map<String, Value>) -> Option<&'static str> {
    CHILD_KEYS.iter().copied().find(|key| match object.get(*key) {
        Some(Value::Object(_)) => true,
        Some(Value::Array(items)) => !items.is_empty(),
        _ => false,
    })
}
