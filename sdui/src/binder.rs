//! Wiring of a [`Document`] to live state hosts and behaviors.
//!
//! Binding turns `initialState` into state hosts and every `actions` entry
//! into a [`Behavior`], then merges both with registries supplied by the
//! host application. Entries built from the document win on key
//! collision.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::action::Action;
use crate::dispatch::{
    Dispatcher, DispatcherOptions, HandlerRegistry, LogSink, StdoutSink,
};
use crate::document::Document;
use crate::node::Node;
use crate::state::{StateHost, StateRegistry, StateValue};

/// Zero-argument entry point the renderer calls on user interaction.
#[derive(Clone)]
pub struct Behavior {
    run: Rc<dyn Fn()>,
}

impl Behavior {
    pub fn new(run: impl Fn() + 'static) -> Self {
        Self { run: Rc::new(run) }
    }

    pub fn invoke(&self) {
        (self.run)()
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Behavior(..)")
    }
}

/// Named behaviors. Inserting an existing name replaces the behavior.
#[derive(Debug, Clone, Default)]
pub struct BehaviorRegistry {
    behaviors: HashMap<String, Behavior>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Behavior> {
        self.behaviors.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, behavior: Behavior) {
        self.behaviors.insert(name.into(), behavior);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.behaviors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> =
            self.behaviors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Copy every entry of `other` in, replacing behaviors on name collision.
    pub fn extend_overriding(&mut self, other: &BehaviorRegistry) {
        for (name, behavior) in &other.behaviors {
            self.behaviors.insert(name.clone(), behavior.clone());
        }
    }
}

/// Builds [`Binding`]s from documents plus application-supplied registries.
#[derive(Clone)]
pub struct DocumentBinder {
    states: StateRegistry,
    behaviors: BehaviorRegistry,
    handlers: HandlerRegistry,
    sink: Rc<dyn LogSink>,
    options: DispatcherOptions,
}

impl Default for DocumentBinder {
    fn default() -> Self {
        Self {
            states: StateRegistry::new(),
            behaviors: BehaviorRegistry::new(),
            handlers: HandlerRegistry::new(),
            sink: Rc::new(StdoutSink),
            options: DispatcherOptions::default(),
        }
    }
}

impl DocumentBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hosts the application already owns.
    pub fn with_states(mut self, states: StateRegistry) -> Self {
        self.states = states;
        self
    }

    /// Behaviors the application already owns.
    pub fn with_behaviors(mut self, behaviors: BehaviorRegistry) -> Self {
        self.behaviors = behaviors;
        self
    }

    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn with_sink(mut self, sink: Rc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_options(mut self, options: DispatcherOptions) -> Self {
        self.options = options;
        self
    }

    pub fn bind(&self, document: &Document) -> Binding {
        let wired: StateRegistry = document
            .initial_state
            .iter()
            .map(|(key, value)| {
                (key.clone(), StateHost::new(StateValue::from_json(value)))
            })
            .collect();
        let mut states = self.states.clone();
        states.extend_overriding(&wired);

        let dispatcher = Rc::new(
            Dispatcher::new(states.clone(), self.handlers.clone())
                .with_sink(self.sink.clone())
                .with_options(self.options),
        );

        let mut scripted = BehaviorRegistry::new();
        for (name, actions) in &document.actions {
            let dispatcher = dispatcher.clone();
            let actions = actions.clone();
            scripted.insert(
                name.clone(),
                Behavior::new(move || dispatcher.dispatch_all(&actions)),
            );
        }
        let mut behaviors = self.behaviors.clone();
        behaviors.extend_overriding(&scripted);

        log::debug!(
            "bound document: {} state hosts, {} behaviors",
            states.len(),
            behaviors.len()
        );

        Binding {
            states,
            behaviors,
            dispatcher,
            initial_state: document.initial_state.clone(),
            actions: document.actions.clone(),
        }
    }
}

impl fmt::Debug for DocumentBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentBinder")
            .field("states", &self.states)
            .field("behaviors", &self.behaviors)
            .field("handlers", &self.handlers)
            .field("options", &self.options)
            .finish()
    }
}

/// Merged registries handed to the renderer for one document.
#[derive(Debug, Clone)]
pub struct Binding {
    states: StateRegistry,
    behaviors: BehaviorRegistry,
    dispatcher: Rc<Dispatcher>,
    initial_state: BTreeMap<String, Value>,
    actions: BTreeMap<String, Vec<Action>>,
}

impl Binding {
    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Invoke the behavior `name`. Returns `false` when no behavior has
    /// that name.
    pub fn invoke(&self, name: &str) -> bool {
        match self.behaviors.get(name) {
            Some(behavior) => {
                behavior.invoke();
                true
            },
            None => {
                log::warn!("no behavior named '{name}'");
                false
            },
        }
    }

    /// Whether this binding was built from the same `initialState` and
    /// `actions` as `document`, compared by value.
    pub fn is_current_for(&self, document: &Document) -> bool {
        self.initial_state == document.initial_state
            && self.actions == document.actions
    }
}

/// A document together with its current binding.
///
/// [`BoundDocument::sync`] swaps in a new document and rebinds only when
/// its `initialState` or `actions` changed; edits to `root` alone keep the
/// existing hosts and their live values.
#[derive(Debug)]
pub struct BoundDocument {
    binder: DocumentBinder,
    document: Document,
    binding: Binding,
}

impl BoundDocument {
    pub fn new(binder: DocumentBinder, document: Document) -> Self {
        let binding = binder.bind(&document);
        Self {
            binder,
            document,
            binding,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn root(&self) -> &Node {
        &self.document.root
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Replace the document. Returns `true` when hosts and behaviors were
    /// rebuilt.
    pub fn sync(&mut self, document: Document) -> bool {
        let rebind = !self.binding.is_current_for(&document);
        if rebind {
            self.binding = self.binder.bind(&document);
        }
        self.document = document;
        rebind
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use serde_json::json;

    use super::*;
    use crate::action::CustomAction;
    use crate::dispatch::RecordingSink;

    fn counter_document() -> Document {
        Document::new(Node::text("count"))
            .with_state("count", json!(0))
            .with_state("open", json!(false))
            .with_actions(
                "toggle",
                vec![Action::toggle_state("open"), Action::log("toggled")],
            )
    }

    #[test]
    fn given_external_host_with_same_key_when_binding_then_document_value_wins()
    {
        let external = StateHost::new(99_i64);
        let mut states = StateRegistry::new();
        states.insert("k", external.clone());
        states.insert("theme", StateHost::new("dark"));
        let binder = DocumentBinder::new().with_states(states);
        let document =
            Document::new(Node::text("x")).with_state("k", json!(1));

        let binding = binder.bind(&document);

        let host = binding.states().get("k").expect("k is bound");
        assert_eq!(host.get(), StateValue::Int(1));
        assert!(!host.same_cell(&external));
        assert_eq!(binding.states().keys(), vec!["k", "theme"]);
    }

    #[test]
    fn given_external_behavior_with_same_name_when_binding_then_document_wins()
    {
        let external_calls = Rc::new(Cell::new(0));
        let counter = external_calls.clone();
        let mut behaviors = BehaviorRegistry::new();
        behaviors.insert(
            "toggle",
            Behavior::new(move || counter.set(counter.get() + 1)),
        );
        behaviors.insert("close", Behavior::new(|| {}));
        let sink = Rc::new(RecordingSink::new());
        let binder = DocumentBinder::new()
            .with_behaviors(behaviors)
            .with_sink(sink.clone());

        let binding = binder.bind(&counter_document());
        assert!(binding.invoke("toggle"));

        assert_eq!(external_calls.get(), 0);
        assert_eq!(sink.logs(), vec![String::from("toggled")]);
        assert_eq!(binding.behaviors().names(), vec!["close", "toggle"]);
    }

    #[test]
    fn given_bound_document_when_invoking_behavior_then_state_changes() {
        let binder =
            DocumentBinder::new().with_sink(Rc::new(RecordingSink::new()));
        let binding = binder.bind(&counter_document());

        binding.invoke("toggle");

        let open = binding.states().get("open").map(StateHost::get);
        assert_eq!(open, Some(StateValue::Bool(true)));
        assert!(!binding.invoke("missing"));
    }

    #[test]
    fn given_root_only_change_when_syncing_then_hosts_are_kept() {
        let binder =
            DocumentBinder::new().with_sink(Rc::new(RecordingSink::new()));
        let mut bound = BoundDocument::new(binder, counter_document());
        bound.binding().invoke("toggle");

        let mut edited = counter_document();
        edited.root = Node::text("renamed");
        assert!(!bound.sync(edited));

        assert_eq!(bound.root().text_value(), Some("renamed"));
        let open = bound.binding().states().get("open").map(StateHost::get);
        assert_eq!(open, Some(StateValue::Bool(true)));
    }

    #[test]
    fn given_state_change_when_syncing_then_hosts_are_rebuilt() {
        let binder =
            DocumentBinder::new().with_sink(Rc::new(RecordingSink::new()));
        let mut bound = BoundDocument::new(binder, counter_document());
        bound.binding().invoke("toggle");

        let changed = counter_document().with_state("count", json!(5));
        assert!(bound.sync(changed));

        let states = bound.binding().states();
        assert_eq!(
            states.get("count").map(StateHost::get),
            Some(StateValue::Int(5))
        );
        assert_eq!(
            states.get("open").map(StateHost::get),
            Some(StateValue::Bool(false))
        );
    }

    #[test]
    fn given_handler_reinvoking_its_behavior_when_depth_is_limited_then_it_stops()
     {
        let calls = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Behavior>>> = Rc::new(RefCell::new(None));
        let mut handlers = HandlerRegistry::new();
        let (counter, next) = (calls.clone(), slot.clone());
        handlers.register("reenter", move |_: &CustomAction| {
            counter.set(counter.get() + 1);
            let behavior = next.borrow().clone();
            if let Some(behavior) = behavior {
                behavior.invoke();
            }
        });
        let sink = Rc::new(RecordingSink::new());
        let document = Document::new(Node::text("loop")).with_actions(
            "again",
            vec![Action::custom("reenter", serde_json::Map::new())],
        );
        let binding = DocumentBinder::new()
            .with_handlers(handlers)
            .with_sink(sink.clone())
            .with_options(DispatcherOptions { max_depth: Some(3) })
            .bind(&document);
        *slot.borrow_mut() = binding.behaviors().get("again").cloned();

        assert!(binding.invoke("again"));

        assert_eq!(calls.get(), 3);
        let warnings = sink.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("exceeds limit 3"), "{}", warnings[0]);
        slot.borrow_mut().take();
    }
}
