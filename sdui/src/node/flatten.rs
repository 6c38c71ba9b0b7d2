use std::collections::HashSet;

use super::Node;
use super::index::{child_id, root_id};

/// One row of a flattened tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedNode<'a> {
    /// Zero-based depth (`0` for the root).
    pub depth: usize,
    /// Borrowed source node.
    pub node: &'a Node,
    /// Derived id of the node.
    pub id: String,
}

/// Flatten a tree depth-first, parent before children.
///
/// Slot children come before list children, in the same order used for id
/// derivation.
pub fn flatten(root: &Node) -> Vec<FlattenedNode<'_>> {
    flatten_visible(root, &HashSet::new())
}

/// Like [`flatten`], but the children of any node whose id is in `collapsed`
/// are skipped. The collapsed node itself is still listed.
pub fn flatten_visible<'a>(
    root: &'a Node,
    collapsed: &HashSet<String>,
) -> Vec<FlattenedNode<'a>> {
    let mut entries = Vec::new();
    push_node(root, 0, root_id(0), collapsed, &mut entries);
    entries
}

fn push_node<'a>(
    node: &'a Node,
    depth: usize,
    id: String,
    collapsed: &HashSet<String>,
    entries: &mut Vec<FlattenedNode<'a>>,
) {
    let expanded = !collapsed.contains(&id);
    let children = if expanded { node.children() } else { Vec::new() };

    let parent_id = id.clone();
    entries.push(FlattenedNode { depth, node, id });

    for (position, child) in children.into_iter().enumerate() {
        let id = child_id(&parent_id, child.node_type, position);
        push_node(child, depth + 1, id, collapsed, entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeType, TreeIndex};

    fn flat_ids(entries: &[FlattenedNode<'_>]) -> Vec<String> {
        entries.iter().map(|entry| entry.id.clone()).collect()
    }

    #[test]
    fn given_leaf_when_flattening_then_only_leaf_is_listed() {
        let leaf = Node::text("alone");
        let entries = flatten(&leaf);
        assert_eq!(flat_ids(&entries), vec!["root_0"]);
        assert_eq!(entries[0].depth, 0);
    }

    #[test]
    fn given_slot_and_list_children_when_flattening_then_parent_comes_first() {
        let root = Node::column(vec![
            Node::button(Some(Node::text("ok")), None),
            Node::text("after"),
        ]);

        let entries = flatten(&root);

        assert_eq!(
            flat_ids(&entries),
            vec![
                "root_0",
                "root_0_Button_1",
                "root_0_Button_1_Text_1",
                "root_0_Text_2",
            ]
        );
        let depths: Vec<usize> = entries.iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1]);
        assert_eq!(entries[1].node.node_type, NodeType::Button);
    }

    #[test]
    fn given_collapsed_node_when_flattening_visible_then_children_are_hidden() {
        let root = Node::column(vec![
            Node::row(vec![Node::text("hidden")]),
            Node::text("shown"),
        ]);
        let collapsed = HashSet::from([String::from("root_0_Row_1")]);

        let entries = flatten_visible(&root, &collapsed);

        assert_eq!(
            flat_ids(&entries),
            vec!["root_0", "root_0_Row_1", "root_0_Text_2"]
        );
    }

    #[test]
    fn given_any_tree_when_flattening_then_ids_match_tree_index() {
        let root = Node::column(vec![
            Node::row(vec![Node::text("a"), Node::text("b")]),
            Node::button(Some(Node::text("c")), None),
        ]);

        let index = TreeIndex::build(&root);
        let indexed: Vec<String> =
            index.iter().map(|i| index.id(i).to_string()).collect();

        assert_eq!(flat_ids(&flatten(&root)), indexed);
    }
}
