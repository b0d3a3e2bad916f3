use slotmap::SlotMap;

use crate::node::{Handle, Node};

/// A pre-order (node, left, right) iterator over the entries of a tree,
/// returned by [`Tree::pre_order()`](crate::Tree::pre_order).
///
/// Rebuilding a tree by inserting entries in this order reproduces the shape
/// of an unbalanced tree.
#[derive(Debug)]
pub struct PreOrder<'a, K, V, D> {
    nodes: &'a SlotMap<Handle, Node<K, V, D>>,
    stack: Vec<Handle>,
}

impl<'a, K, V, D> PreOrder<'a, K, V, D> {
    pub(crate) fn new(nodes: &'a SlotMap<Handle, Node<K, V, D>>, root: Option<Handle>) -> Self {
        Self {
            nodes,
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a, K, V, D> Iterator for PreOrder<'a, K, V, D> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let nodes = self.nodes;
            let v = &nodes[self.stack.pop()?];

            // Visit the left subtree before the right.
            self.stack.extend(v.right.iter().chain(v.left.iter()));

            if let Some(entry) = v.entry() {
                return Some(entry);
            }
        }
    }
}

/// A post-order (left, right, node) iterator over the entries of a tree,
/// returned by [`Tree::post_order()`](crate::Tree::post_order).
///
/// Every entry is yielded after all the entries below it.
#[derive(Debug)]
pub struct PostOrder<'a, K, V, D> {
    nodes: &'a SlotMap<Handle, Node<K, V, D>>,

    /// Nodes to visit, and whether their children have already been pushed.
    stack: Vec<(Handle, bool)>,
}

impl<'a, K, V, D> PostOrder<'a, K, V, D> {
    pub(crate) fn new(nodes: &'a SlotMap<Handle, Node<K, V, D>>, root: Option<Handle>) -> Self {
        Self {
            nodes,
            stack: root.map(|v| (v, false)).into_iter().collect(),
        }
    }

    /// Pop the next node handle in post-order, routing nodes included.
    fn next_node(&mut self) -> Option<Handle> {
        loop {
            let (h, expanded) = self.stack.pop()?;
            if expanded {
                return Some(h);
            }

            let v = &self.nodes[h];
            self.stack.push((h, true));
            self.stack
                .extend(v.right.iter().chain(v.left.iter()).map(|&c| (c, false)));
        }
    }
}

impl<'a, K, V, D> Iterator for PostOrder<'a, K, V, D> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let h = self.next_node()?;
            let nodes = self.nodes;
            if let Some(entry) = nodes[h].entry() {
                return Some(entry);
            }
        }
    }
}

/// All node handles of the subtree rooted at `root` in post-order, routing
/// nodes included, so that children always precede their parent.
#[cfg(test)]
pub(crate) fn post_order_nodes<K, V, D>(
    nodes: &SlotMap<Handle, Node<K, V, D>>,
    root: Option<Handle>,
) -> Vec<Handle> {
    let mut iter = PostOrder::new(nodes, root);
    std::iter::from_fn(|| iter.next_node()).collect()
}
