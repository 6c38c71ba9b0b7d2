use super::{Node, Properties, TextProps, TreeIndex};

/// Placeholder given to freshly added text nodes without text.
pub const DEFAULT_TEXT: &str = "New Text Node";

/// Result of a tree edit. Edits never touch their inputs; every variant
/// carries an owned value.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The edit took effect; carries the rebuilt parent or tree.
    Applied(Node),
    /// No parent was given; the node comes back unchanged as a root
    /// candidate.
    Detached(Node),
    /// The parent's payload has no container for this edit; the node comes
    /// back unchanged and the parent is left as it was.
    Unsupported(Node),
    /// No node carries the requested id; the tree comes back unchanged.
    NotFound(Node),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied(_))
    }

    pub fn node(&self) -> &Node {
        match self {
            EditOutcome::Applied(node)
            | EditOutcome::Detached(node)
            | EditOutcome::Unsupported(node)
            | EditOutcome::NotFound(node) => node,
        }
    }

    pub fn into_node(self) -> Node {
        match self {
            EditOutcome::Applied(node)
            | EditOutcome::Detached(node)
            | EditOutcome::Unsupported(node)
            | EditOutcome::NotFound(node) => node,
        }
    }
}

/// Append `node` to the child list of a Column/Row/Box `parent`.
pub fn add_as_sibling(parent: Option<&Node>, node: Node) -> EditOutcome {
    let Some(parent) = parent else {
        return EditOutcome::Detached(node);
    };

    let supported = parent
        .properties
        .as_ref()
        .and_then(Properties::child_list)
        .is_some();
    if !supported {
        log::debug!(
            "add_as_sibling ignored: {} holds no child list",
            parent.node_type
        );
        return EditOutcome::Unsupported(node);
    }

    let mut updated = parent.clone();
    if let Some(children) =
        updated.properties.as_mut().and_then(Properties::child_list_mut)
    {
        children.push(with_default_text(node));
    }
    EditOutcome::Applied(updated)
}

/// Put `node` into the single child slot of a Button/Card/Scaffold
/// `parent`, overwriting any existing child.
pub fn add_as_child(parent: Option<&Node>, node: Node) -> EditOutcome {
    let Some(parent) = parent else {
        return EditOutcome::Detached(node);
    };

    let supported = parent
        .properties
        .as_ref()
        .is_some_and(Properties::has_child_slot);
    if !supported {
        log::debug!(
            "add_as_child ignored: {} holds no child slot",
            parent.node_type
        );
        return EditOutcome::Unsupported(node);
    }

    let mut updated = parent.clone();
    if let Some(slot) =
        updated.properties.as_mut().and_then(Properties::child_slot_mut)
    {
        *slot = Some(Box::new(with_default_text(node)));
    }
    EditOutcome::Applied(updated)
}

/// Return a copy of `root` where the node with derived id `id` is replaced
/// by `replacement`.
pub fn update_node(root: &Node, id: &str, replacement: Node) -> EditOutcome {
    let positions = {
        let index = TreeIndex::build(root);
        let Some(target) = index.find(id) else {
            return EditOutcome::NotFound(root.clone());
        };
        index.positions(target)
    };

    let mut updated = root.clone();
    let mut current = &mut updated;
    for position in positions {
        current = match current.children_mut().into_iter().nth(position) {
            Some(child) => child,
            None => return EditOutcome::NotFound(root.clone()),
        };
    }
    *current = replacement;

    EditOutcome::Applied(updated)
}

fn with_default_text(mut node: Node) -> Node {
    if !node.node_type.is_text() {
        return node;
    }

    if node.properties.is_none() {
        node.properties = Some(Properties::TextProps(TextProps::default()));
    }
    if let Some(Properties::TextProps(props)) = &mut node.properties {
        if props.text.is_none() {
            props.text = Some(String::from(DEFAULT_TEXT));
        }
    }
    node
}
