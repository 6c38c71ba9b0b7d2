use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative operation executed by the [`Dispatcher`](crate::Dispatcher).
///
/// `Sequence` nests without limit; the dispatcher walks nested lists
/// depth-first in authored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    SetState { key: String, value: Value },
    ToggleState { key: String },
    Log { message: String },
    Sequence { actions: Vec<Action> },
    Custom(CustomAction),
}

impl Action {
    pub fn set_state(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Action::SetState {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn toggle_state(key: impl Into<String>) -> Self {
        Action::ToggleState { key: key.into() }
    }

    pub fn log(message: impl Into<String>) -> Self {
        Action::Log {
            message: message.into(),
        }
    }

    pub fn sequence(actions: Vec<Action>) -> Self {
        Action::Sequence { actions }
    }

    pub fn custom(
        custom_type: impl Into<String>,
        params: serde_json::Map<String, Value>,
    ) -> Self {
        Action::Custom(CustomAction {
            custom_type: custom_type.into(),
            params,
        })
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Action::SetState { .. } => "SetState",
            Action::ToggleState { .. } => "ToggleState",
            Action::Log { .. } => "Log",
            Action::Sequence { .. } => "Sequence",
            Action::Custom(_) => "Custom",
        }
    }
}

/// Action delegated to an externally registered handler.
///
/// The dispatcher routes on `custom_type` and never looks inside `params`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAction {
    pub custom_type: String,
    #[serde(default)]
    pub params: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn given_nested_sequence_json_when_decoding_then_structure_matches() {
        let raw = json!({
            "type": "Sequence",
            "actions": [
                {"type": "SetState", "key": "loading", "value": true},
                {"type": "Sequence", "actions": [
                    {"type": "Log", "message": "nested"}
                ]},
                {"type": "Custom", "customType": "navigate",
                 "params": {"route": "home"}}
            ]
        });

        let action: Action =
            serde_json::from_value(raw).expect("sequence decodes");

        let mut params = serde_json::Map::new();
        params.insert(String::from("route"), json!("home"));
        assert_eq!(
            action,
            Action::sequence(vec![
                Action::set_state("loading", true),
                Action::sequence(vec![Action::log("nested")]),
                Action::custom("navigate", params),
            ])
        );
    }

    #[test]
    fn given_custom_without_params_when_decoding_then_params_default_empty() {
        let action: Action = serde_json::from_value(json!({
            "type": "Custom",
            "customType": "refresh"
        }))
        .expect("custom decodes");

        let Action::Custom(custom) = action else {
            panic!("expected custom action");
        };
        assert_eq!(custom.custom_type, "refresh");
        assert!(custom.params.is_empty());
    }
}
