use slotmap::SlotMap;

use crate::node::{Handle, Node};

/// An in-order iterator over the entries of a tree, returned by
/// [`Tree::iter()`](crate::Tree::iter).
#[derive(Debug)]
pub struct Iter<'a, K, V, D> {
    nodes: &'a SlotMap<Handle, Node<K, V, D>>,
    stack: Vec<Handle>,
}

impl<'a, K, V, D> Iter<'a, K, V, D> {
    pub(crate) fn new(nodes: &'a SlotMap<Handle, Node<K, V, D>>, root: Option<Handle>) -> Self {
        let mut this = Self {
            nodes,
            stack: vec![],
        };

        // Descend down the left side of the tree.
        if let Some(root) = root {
            this.push_subtree(root);
        }

        this
    }

    fn push_subtree(&mut self, subtree_root: Handle) {
        let mut ptr = Some(subtree_root);

        while let Some(v) = ptr {
            self.stack.push(v);
            ptr = self.nodes[v].left;
        }
    }
}

impl<'a, K, V, D> Iterator for Iter<'a, K, V, D> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let nodes = self.nodes;
            let v = &nodes[self.stack.pop()?];

            // Descend down the left side of the right hand child of this node,
            // if any.
            if let Some(right) = v.right {
                self.push_subtree(right);
            }

            // Routing nodes are stepped over.
            if let Some(entry) = v.entry() {
                return Some(entry);
            }
        }
    }
}
