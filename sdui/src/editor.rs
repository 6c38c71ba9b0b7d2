use std::collections::HashSet;

use crate::node::{
    self, EditOutcome, FlattenedNode, Node, TreeIndex, flatten_visible,
};

/// Authoring state: the current tree plus view-state kept beside it.
///
/// Selection and collapsed rows are tracked by derived id and never stored
/// inside the tree. Every applied edit swaps in a new tree value and keeps
/// the previous one for [`EditorState::undo`].
#[derive(Debug, Clone)]
pub struct EditorState {
    root: Node,
    selected: Option<String>,
    collapsed: HashSet<String>,
    history: Vec<Node>,
}

impl EditorState {
    pub fn new(root: Node) -> Self {
        Self {
            root,
            selected: None,
            collapsed: HashSet::new(),
            history: Vec::new(),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn collapsed(&self) -> &HashSet<String> {
        &self.collapsed
    }

    /// Select a node by id, or clear the selection.
    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.map(ToString::to_string);
    }

    /// Flip the collapsed flag of `id`. Returns the new collapsed state.
    pub fn toggle_collapsed(&mut self, id: &str) -> bool {
        if self.collapsed.remove(id) {
            false
        } else {
            self.collapsed.insert(id.to_string());
            true
        }
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    /// Ids of the ancestors of `id`, direct parent first.
    pub fn ancestors_of(&self, id: &str) -> Vec<String> {
        let index = TreeIndex::build(&self.root);
        index
            .find(id)
            .map(|target| {
                index
                    .ancestor_ids(target)
                    .into_iter()
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True when `id` exists and none of its ancestors is collapsed.
    pub fn is_ancestor_expanded(&self, id: &str) -> bool {
        let index = TreeIndex::build(&self.root);
        index
            .find(id)
            .is_some_and(|target| {
                index.is_ancestor_expanded(target, &self.collapsed)
            })
    }

    /// Rows currently visible given the collapsed set.
    pub fn visible_rows(&self) -> Vec<FlattenedNode<'_>> {
        flatten_visible(&self.root, &self.collapsed)
    }

    /// Append `node` to the child list of the node `parent_id`.
    pub fn add_as_sibling(
        &mut self,
        parent_id: &str,
        node: Node,
    ) -> EditOutcome {
        self.edit_parent(parent_id, node, node::add_as_sibling)
    }

    /// Put `node` into the child slot of the node `parent_id`.
    pub fn add_as_child(
        &mut self,
        parent_id: &str,
        node: Node,
    ) -> EditOutcome {
        self.edit_parent(parent_id, node, node::add_as_child)
    }

    /// Replace the node `id` with `replacement`.
    pub fn update(&mut self, id: &str, replacement: Node) -> EditOutcome {
        let outcome = node::update_node(&self.root, id, replacement);
        if let EditOutcome::Applied(tree) = &outcome {
            self.commit(tree.clone());
        }
        outcome
    }

    /// Restore the tree as it was before the last applied edit.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        self.root = previous;
        self.forget_missing_ids();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    fn edit_parent(
        &mut self,
        parent_id: &str,
        node: Node,
        edit: fn(Option<&Node>, Node) -> EditOutcome,
    ) -> EditOutcome {
        let parent = {
            let index = TreeIndex::build(&self.root);
            index.find(parent_id).map(|target| index.node(target).clone())
        };

        let outcome = edit(parent.as_ref(), node);
        let updated_parent = match outcome {
            EditOutcome::Applied(node) => node,
            other => return other,
        };

        let tree = node::update_node(&self.root, parent_id, updated_parent);
        if let EditOutcome::Applied(tree) = &tree {
            self.commit(tree.clone());
        }
        tree
    }

    fn commit(&mut self, tree: Node) {
        let previous = std::mem::replace(&mut self.root, tree);
        self.history.push(previous);
        self.forget_missing_ids();
    }

    fn forget_missing_ids(&mut self) {
        let index = TreeIndex::build(&self.root);
        if let Some(selected) = &self.selected {
            if index.find(selected).is_none() {
                self.selected = None;
            }
        }
        self.collapsed.retain(|id| index.find(id).is_some());
    }
}
