use std::collections::HashSet;

use super::{Node, NodeType};

/// Handle of a node inside a [`TreeIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Entry<'a> {
    node: &'a Node,
    id: String,
    parent: Option<NodeIndex>,
    depth: usize,
    children: Vec<NodeIndex>,
}

/// Arena over a borrowed tree answering ancestry and id queries.
///
/// The index stores parent handles next to borrowed nodes, so the owned
/// tree itself stays strictly root-to-leaf. Entries are laid out
/// depth-first, parent before children, and index `0` is the root.
///
/// Accessors taking a [`NodeIndex`] panic when the handle came from a
/// larger index; use [`TreeIndex::get`] for handles of unknown origin.
#[derive(Debug)]
pub struct TreeIndex<'a> {
    entries: Vec<Entry<'a>>,
}

impl<'a> TreeIndex<'a> {
    pub fn build(root: &'a Node) -> Self {
        let mut index = Self {
            entries: Vec::new(),
        };
        index.push(root, None, root_id(0), 0);
        index
    }

    fn push(
        &mut self,
        node: &'a Node,
        parent: Option<NodeIndex>,
        id: String,
        depth: usize,
    ) -> NodeIndex {
        let handle = NodeIndex(self.entries.len());
        self.entries.push(Entry {
            node,
            id,
            parent,
            depth,
            children: Vec::new(),
        });

        for (position, child) in node.children().into_iter().enumerate() {
            let child_id =
                child_id(&self.entries[handle.0].id, child.node_type, position);
            let child_handle =
                self.push(child, Some(handle), child_id, depth + 1);
            self.entries[handle.0].children.push(child_handle);
        }

        handle
    }

    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Node behind `index`, or `None` when the handle is out of range.
    pub fn get(&self, index: NodeIndex) -> Option<&'a Node> {
        self.entries.get(index.0).map(|entry| entry.node)
    }

    pub fn node(&self, index: NodeIndex) -> &'a Node {
        self.entries[index.0].node
    }

    pub fn id(&self, index: NodeIndex) -> &str {
        &self.entries[index.0].id
    }

    pub fn depth(&self, index: NodeIndex) -> usize {
        self.entries[index.0].depth
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.entries[index.0].parent
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.entries[index.0].children
    }

    /// Depth-first handles, parent before children.
    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        (0..self.entries.len()).map(NodeIndex)
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.iter().find(|index| self.id(*index) == id)
    }

    /// Ancestors from the direct parent up to the root.
    pub fn ancestors(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut current = self.parent(index);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    /// Ids of [`TreeIndex::ancestors`], same order.
    pub fn ancestor_ids(&self, index: NodeIndex) -> Vec<&str> {
        self.ancestors(index)
            .into_iter()
            .map(|ancestor| self.id(ancestor))
            .collect()
    }

    /// True when no ancestor of `index` is collapsed.
    pub fn is_ancestor_expanded(
        &self,
        index: NodeIndex,
        collapsed: &HashSet<String>,
    ) -> bool {
        self.ancestors(index)
            .into_iter()
            .all(|ancestor| !collapsed.contains(self.id(ancestor)))
    }

    /// Child-ordered positions leading from the root to `index`.
    pub(crate) fn positions(&self, index: NodeIndex) -> Vec<usize> {
        let mut out = Vec::new();
        let mut current = index;
        while let Some(parent) = self.parent(current) {
            let position = self
                .children(parent)
                .iter()
                .position(|child| *child == current)
                .unwrap_or_default();
            out.push(position);
            current = parent;
        }
        out.reverse();
        out
    }
}

pub(crate) fn root_id(depth: usize) -> String {
    format!("root_{depth}")
}

/// Id of the child at `position` among its parent's children.
pub(crate) fn child_id(
    parent_id: &str,
    node_type: NodeType,
    position: usize,
) -> String {
    format!("{parent_id}_{node_type}_{}", position + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Properties, ScaffoldProps};

    fn sample_tree() -> Node {
        Node::column(vec![
            Node::text("title"),
            Node::row(vec![Node::text("left"), Node::text("right")]),
            Node::button(Some(Node::text("ok")), Some("submit")),
        ])
    }

    #[test]
    fn given_tree_when_indexing_then_ids_follow_position() {
        let root = sample_tree();
        let index = TreeIndex::build(&root);

        let ids: Vec<&str> = index.iter().map(|i| index.id(i)).collect();
        assert_eq!(
            ids,
            vec![
                "root_0",
                "root_0_Text_1",
                "root_0_Row_2",
                "root_0_Row_2_Text_1",
                "root_0_Row_2_Text_2",
                "root_0_Button_3",
                "root_0_Button_3_Text_1",
            ]
        );
    }

    #[test]
    fn given_reordered_children_when_indexing_then_ids_change() {
        let root = Node::column(vec![Node::text("a"), Node::row(vec![])]);
        let moved = Node::column(vec![Node::row(vec![]), Node::text("a")]);

        let before = TreeIndex::build(&root);
        let after = TreeIndex::build(&moved);

        assert_eq!(before.find("root_0_Text_1").map(|i| i.get()), Some(1));
        assert!(after.find("root_0_Text_1").is_none());
        assert!(after.find("root_0_Text_2").is_some());
    }

    #[test]
    fn given_nested_node_when_walking_ancestors_then_order_is_parent_first() {
        let root = sample_tree();
        let index = TreeIndex::build(&root);
        let leaf = index.find("root_0_Row_2_Text_2").expect("leaf exists");

        assert_eq!(index.ancestor_ids(leaf), vec!["root_0_Row_2", "root_0"]);
        assert_eq!(index.depth(leaf), 2);
        assert_eq!(index.positions(leaf), vec![1, 1]);
    }

    #[test]
    fn given_collapsed_ancestor_when_checking_expansion_then_hidden() {
        let root = sample_tree();
        let index = TreeIndex::build(&root);
        let leaf = index.find("root_0_Row_2_Text_1").expect("leaf exists");
        let sibling = index.find("root_0_Text_1").expect("sibling exists");

        let collapsed = HashSet::from([String::from("root_0_Row_2")]);

        assert!(!index.is_ancestor_expanded(leaf, &collapsed));
        assert!(index.is_ancestor_expanded(sibling, &collapsed));
        assert!(index.is_ancestor_expanded(leaf, &HashSet::new()));
    }

    #[test]
    fn given_scaffold_slots_when_indexing_then_same_type_slots_get_distinct_ids()
    {
        let root = Node::new(NodeType::Scaffold).with_properties(
            Properties::ScaffoldProps(ScaffoldProps {
                top_bar: Some(Box::new(Node::text("top"))),
                bottom_bar: None,
                child: Some(Box::new(Node::text("body"))),
            }),
        );
        let index = TreeIndex::build(&root);

        let ids: Vec<&str> = index.iter().map(|i| index.id(i)).collect();
        assert_eq!(ids, vec!["root_0", "root_0_Text_1", "root_0_Text_2"]);
    }

    #[test]
    fn given_handle_from_larger_index_when_getting_then_none_is_returned() {
        let large = sample_tree();
        let small = Node::text("alone");
        let large_index = TreeIndex::build(&large);
        let small_index = TreeIndex::build(&small);
        let far = large_index
            .find("root_0_Button_3_Text_1")
            .expect("leaf exists");

        assert_eq!(small_index.get(far), None);
        assert_eq!(small_index.get(small_index.root()), Some(&small));
        assert_eq!(large_index.get(far).and_then(Node::text_value), Some("ok"));
    }
}
