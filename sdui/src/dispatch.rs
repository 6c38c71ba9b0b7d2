//! Action runtime: executes declarative actions against state hosts and
//! custom handlers.
//!
//! Nothing here returns an error to the caller. A missing host, a value of
//! the wrong runtime type or an unregistered custom handler becomes a
//! warning on the [`LogSink`] and the action is skipped.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::action::{Action, CustomAction};
use crate::state::{StateRegistry, StateValue};

/// Destination of `Log` actions and dispatch warnings.
pub trait LogSink {
    /// Message of a `Log` action, forwarded verbatim.
    fn log(&self, message: &str);

    /// Diagnostic about an action that could not be applied.
    fn warn(&self, message: &str);
}

/// Default sink: `Log` messages go to standard output, warnings to the
/// `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn log(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        log::warn!(target: "sdui::dispatch", "{message}");
    }
}

/// One entry captured by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkRecord {
    Log(String),
    Warn(String),
}

/// Sink that keeps every record in order, for previews and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: RefCell<Vec<SinkRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SinkRecord> {
        self.records.borrow().clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter_map(|record| match record {
                SinkRecord::Log(message) => Some(message.clone()),
                SinkRecord::Warn(_) => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter_map(|record| match record {
                SinkRecord::Warn(message) => Some(message.clone()),
                SinkRecord::Log(_) => None,
            })
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, message: &str) {
        self.records
            .borrow_mut()
            .push(SinkRecord::Log(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.records
            .borrow_mut()
            .push(SinkRecord::Warn(message.to_string()));
    }
}

/// Consumer of `Custom` actions, registered by custom type tag.
///
/// Implemented for every `Fn(&CustomAction)`.
pub trait CustomActionHandler {
    fn handle(&self, action: &CustomAction);
}

impl<F> CustomActionHandler for F
where
    F: Fn(&CustomAction),
{
    fn handle(&self, action: &CustomAction) {
        self(action)
    }
}

/// Custom action handlers keyed by custom type tag.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Rc<dyn CustomActionHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        custom_type: impl Into<String>,
        handler: impl CustomActionHandler + 'static,
    ) {
        self.handlers.insert(custom_type.into(), Rc::new(handler));
    }

    pub fn get(&self, custom_type: &str) -> Option<&Rc<dyn CustomActionHandler>> {
        self.handlers.get(custom_type)
    }

    pub fn contains(&self, custom_type: &str) -> bool {
        self.handlers.contains_key(custom_type)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> =
            self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &tags)
            .finish()
    }
}

/// Knobs for the dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherOptions {
    /// Maximum dispatch nesting. Counts `Sequence` nesting and re-entrant
    /// dispatch triggered from custom handlers. `None` means unbounded.
    pub max_depth: Option<usize>,
}

/// Executes actions against a state registry and custom handlers.
pub struct Dispatcher {
    states: StateRegistry,
    handlers: HandlerRegistry,
    sink: Rc<dyn LogSink>,
    options: DispatcherOptions,
    depth: Cell<usize>,
}

impl Dispatcher {
    pub fn new(states: StateRegistry, handlers: HandlerRegistry) -> Self {
        Self {
            states,
            handlers,
            sink: Rc::new(StdoutSink),
            options: DispatcherOptions::default(),
            depth: Cell::new(0),
        }
    }

    pub fn with_sink(mut self, sink: Rc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_options(mut self, options: DispatcherOptions) -> Self {
        self.options = options;
        self
    }

    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Execute every action in order. A skipped action does not stop the
    /// ones after it.
    pub fn dispatch_all(&self, actions: &[Action]) {
        for action in actions {
            self.dispatch(action);
        }
    }

    /// Execute one action, synchronously.
    pub fn dispatch(&self, action: &Action) {
        let depth = self.depth.get() + 1;
        if let Some(max_depth) = self.options.max_depth {
            if depth > max_depth {
                self.sink.warn(&format!(
                    "dropping {} action: dispatch depth {depth} exceeds \
                     limit {max_depth}",
                    action.tag()
                ));
                return;
            }
        }

        self.depth.set(depth);
        log::debug!("dispatch {} at depth {depth}", action.tag());
        self.apply(action);
        self.depth.set(depth - 1);
    }

    fn apply(&self, action: &Action) {
        match action {
            Action::SetState { key, value } => self.set_state(key, value),
            Action::ToggleState { key } => self.toggle_state(key),
            Action::Log { message } => self.sink.log(message),
            Action::Sequence { actions } => self.dispatch_all(actions),
            Action::Custom(custom) => self.custom(custom),
        }
    }

    fn set_state(&self, key: &str, value: &serde_json::Value) {
        let Some(host) = self.states.get(key) else {
            self.sink
                .warn(&format!("SetState ignored: no state host named '{key}'"));
            return;
        };
        host.set(StateValue::from_json(value));
    }

    fn toggle_state(&self, key: &str) {
        let Some(host) = self.states.get(key) else {
            self.sink.warn(&format!(
                "ToggleState ignored: no state host named '{key}'"
            ));
            return;
        };

        let current = host.get();
        let Some(flag) = current.as_bool() else {
            self.sink.warn(&format!(
                "ToggleState ignored: state '{key}' holds {}, not Boolean",
                current.type_name()
            ));
            return;
        };
        host.set(!flag);
    }

    fn custom(&self, action: &CustomAction) {
        let Some(handler) = self.handlers.get(&action.custom_type) else {
            self.sink.warn(&format!(
                "Custom action ignored: no handler for '{}'",
                action.custom_type
            ));
            return;
        };
        handler.handle(action);
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("states", &self.states.keys())
            .field("handlers", &self.handlers)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::state::StateHost;

    fn dispatcher(states: StateRegistry) -> (Dispatcher, Rc<RecordingSink>) {
        dispatcher_with(states, HandlerRegistry::new())
    }

    fn dispatcher_with(
        states: StateRegistry,
        handlers: HandlerRegistry,
    ) -> (Dispatcher, Rc<RecordingSink>) {
        let sink = Rc::new(RecordingSink::new());
        let dispatcher = Dispatcher::new(states, handlers).with_sink(sink.clone());
        (dispatcher, sink)
    }

    #[test]
    fn given_empty_registry_when_setting_missing_key_then_warns_and_creates_nothing()
     {
        let (dispatcher, sink) = dispatcher(StateRegistry::new());

        dispatcher.dispatch(&Action::set_state("missing", true));

        assert!(dispatcher.states().is_empty());
        assert_eq!(sink.warnings().len(), 1);
        assert!(sink.warnings()[0].contains("missing"));
    }

    #[test]
    fn given_host_when_setting_state_then_value_is_converted() {
        let host = StateHost::new(0_i64);
        let mut states = StateRegistry::new();
        states.insert("count", host.clone());
        let (dispatcher, sink) = dispatcher(states);

        dispatcher.dispatch(&Action::set_state("count", json!("12")));

        assert_eq!(host.get(), StateValue::Int(12));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn given_boolean_host_when_toggling_then_value_flips() {
        let host = StateHost::new(true);
        let mut states = StateRegistry::new();
        states.insert("open", host.clone());
        let (dispatcher, _sink) = dispatcher(states);

        dispatcher.dispatch(&Action::toggle_state("open"));
        assert_eq!(host.get(), StateValue::Bool(false));

        dispatcher.dispatch(&Action::toggle_state("open"));
        assert_eq!(host.get(), StateValue::Bool(true));
    }

    #[test]
    fn given_string_host_when_toggling_then_value_is_kept_and_type_is_named() {
        let host = StateHost::new("on");
        let mut states = StateRegistry::new();
        states.insert("mode", host.clone());
        let (dispatcher, sink) = dispatcher(states);

        dispatcher.dispatch(&Action::toggle_state("mode"));

        assert_eq!(host.get(), StateValue::String(String::from("on")));
        let warnings = sink.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("String"), "got: {}", warnings[0]);
    }

    #[test]
    fn given_missing_host_when_toggling_then_warns() {
        let (dispatcher, sink) = dispatcher(StateRegistry::new());

        dispatcher.dispatch(&Action::toggle_state("ghost"));

        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn given_sequence_of_logs_when_dispatching_then_order_is_kept() {
        let (dispatcher, sink) = dispatcher(StateRegistry::new());

        dispatcher.dispatch(&Action::sequence(vec![
            Action::log("a"),
            Action::log("b"),
        ]));

        assert_eq!(
            sink.records(),
            vec![
                SinkRecord::Log(String::from("a")),
                SinkRecord::Log(String::from("b")),
            ]
        );
    }

    #[test]
    fn given_failing_step_in_sequence_when_dispatching_then_later_steps_run() {
        let host = StateHost::new(false);
        let mut states = StateRegistry::new();
        states.insert("done", host.clone());
        let (dispatcher, sink) = dispatcher(states);

        dispatcher.dispatch(&Action::sequence(vec![
            Action::toggle_state("nope"),
            Action::set_state("done", true),
            Action::log("after"),
        ]));

        assert_eq!(host.get(), StateValue::Bool(true));
        assert_eq!(sink.warnings().len(), 1);
        assert_eq!(sink.logs(), vec![String::from("after")]);
    }

    #[test]
    fn given_registered_handler_when_dispatching_custom_then_full_action_is_passed()
     {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = HandlerRegistry::new();
        let captured = seen.clone();
        handlers.register("navigate", move |action: &CustomAction| {
            captured.borrow_mut().push(action.clone());
        });
        let (dispatcher, sink) = dispatcher_with(StateRegistry::new(), handlers);

        let mut params = serde_json::Map::new();
        params.insert(String::from("route"), json!("settings"));
        dispatcher.dispatch(&Action::custom("navigate", params.clone()));

        assert_eq!(
            seen.borrow().as_slice(),
            &[CustomAction {
                custom_type: String::from("navigate"),
                params,
            }]
        );
        assert!(sink.records().is_empty());
    }

    #[test]
    fn given_unregistered_custom_type_when_dispatching_then_warns() {
        let (dispatcher, sink) = dispatcher(StateRegistry::new());

        dispatcher.dispatch(&Action::custom("share", serde_json::Map::new()));

        assert_eq!(sink.warnings().len(), 1);
        assert!(sink.warnings()[0].contains("share"));
    }

    #[test]
    fn given_depth_limit_when_sequence_nests_too_deep_then_inner_part_is_dropped()
     {
        let (dispatcher, sink) = dispatcher(StateRegistry::new());
        let dispatcher = dispatcher.with_options(DispatcherOptions {
            max_depth: Some(2),
        });

        dispatcher.dispatch(&Action::sequence(vec![
            Action::log("depth two"),
            Action::sequence(vec![Action::log("depth three")]),
            Action::log("still two"),
        ]));

        assert_eq!(
            sink.logs(),
            vec![String::from("depth two"), String::from("still two")]
        );
        assert_eq!(sink.warnings().len(), 1);
    }
}
