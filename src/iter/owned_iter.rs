use slotmap::SlotMap;

use crate::node::{Handle, Node};

/// An iterator of owned `(key, value)` entries in key order, as the
/// underlying tree `into_iter()` impl.
#[derive(Debug)]
pub struct IntoIter<K, V, D> {
    nodes: SlotMap<Handle, Node<K, V, D>>,
    stack: Vec<Handle>,
}

impl<K, V, D> IntoIter<K, V, D> {
    pub(crate) fn new(nodes: SlotMap<Handle, Node<K, V, D>>, root: Option<Handle>) -> Self {
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

impl<K, V, D> Iterator for IntoIter<K, V, D> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let h = self.stack.pop()?;

            // Descend down the left side of the right hand child of this node,
            // if any, before releasing the node from the arena.
            if let Some(right) = self.nodes[h].right {
                self.push_subtree(right);
            }

            let v = self.nodes.remove(h)?;
            if let Some(value) = v.value {
                return Some((v.key, value));
            }
        }
    }
}
