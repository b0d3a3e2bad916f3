use std::{cmp::Ordering, mem};

use crate::{
    augment::Augment,
    balance::Balance,
    compare::Compare,
    error::Result,
    node::Handle,
    tree::Tree,
};

mod sealed {
    pub trait Sealed {}
}

/// A value placement strategy, deciding which node an inserted value is
/// attached to and how a node is unlinked when its entry is erased.
///
/// This trait is sealed; the available strategies are [`Inner`] and
/// [`Leaf`].
pub trait Storage: sealed::Sealed + Sized {
    /// A short name identifying the strategy in logs.
    const NAME: &'static str;

    /// True if values live only at leaf nodes, with internal nodes carrying
    /// routing keys.
    const VALUES_AT_LEAVES: bool;

    /// Place `value` under `key`, returning the handle of the node holding
    /// the entry.
    fn insert<K, V, C, B, A>(
        tree: &mut Tree<K, V, C, B, Self, A>,
        key: K,
        value: V,
    ) -> Result<Handle>
    where
        K: Clone,
        C: Compare<K>,
        B: Balance,
        A: Augment<K, V>;

    /// Unlink the entry held by `node`, returning it.
    ///
    /// `node` must hold an entry (not be a routing node).
    fn remove<K, V, C, B, A>(tree: &mut Tree<K, V, C, B, Self, A>, node: Handle) -> (K, V)
    where
        C: Compare<K>,
        B: Balance,
        A: Augment<K, V>;
}

/// Values are attached to the node where their key lands, as in a
/// conventional associative binary search tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct Inner;

impl sealed::Sealed for Inner {}

impl Storage for Inner {
    const NAME: &'static str = "inner";
    const VALUES_AT_LEAVES: bool = false;

    fn insert<K, V, C, B, A>(
        tree: &mut Tree<K, V, C, B, Self, A>,
        key: K,
        value: V,
    ) -> Result<Handle>
    where
        K: Clone,
        C: Compare<K>,
        B: Balance,
        A: Augment<K, V>,
    {
        let mut parent = None;
        let mut went_left = false;
        let mut cursor = tree.root;

        while let Some(h) = cursor {
            let n = &tree.nodes[h];
            cursor = match tree.cmp.compare(&key, &n.key) {
                Ordering::Less => {
                    went_left = true;
                    n.left
                }
                Ordering::Greater => {
                    went_left = false;
                    n.right
                }
                Ordering::Equal => return tree.on_duplicate(h, value),
            };
            parent = Some(h);
        }

        let h = tree.attach(key, Some(value), parent, went_left);
        tree.len += 1;
        tree.retrace(parent);

        Ok(h)
    }

    fn remove<K, V, C, B, A>(tree: &mut Tree<K, V, C, B, Self, A>, node: Handle) -> (K, V)
    where
        C: Compare<K>,
        B: Balance,
        A: Augment<K, V>,
    {
        let n = &tree.nodes[node];
        let (left, right, parent) = (n.left, n.right, n.parent);

        // This node may have 0, 1 or 2 child node(s).
        //
        // With two children, the in-order successor (the minimum of the right
        // subtree) has no left child. Its key and value move into "node" and
        // the successor's slot is unlinked instead, its right child (if any)
        // taking its place.
        //
        // Otherwise the only child (if any) replaces "node" directly.
        let (start, key, value) = match (left, right) {
            (Some(_), Some(right)) => {
                let successor = tree.leftmost(right);
                let s = &tree.nodes[successor];
                debug_assert!(s.left.is_none());
                let (s_parent, s_right) = (s.parent, s.right);

                tree.replace_child(s_parent, successor, s_right);
                let Some(s) = tree.nodes.remove(successor) else {
                    unreachable!("successor vanished from the arena");
                };

                let target = &mut tree.nodes[node];
                let key = mem::replace(&mut target.key, s.key);
                let value = mem::replace(&mut target.value, s.value);

                (s_parent, key, value)
            }
            (child, None) | (None, child) => {
                tree.replace_child(parent, node, child);
                let Some(n) = tree.nodes.remove(node) else {
                    unreachable!("node vanished from the arena");
                };

                (parent, n.key, n.value)
            }
        };

        tree.len -= 1;
        tree.retrace(start);

        let Some(value) = value else {
            unreachable!("inner storage node without a value");
        };
        (key, value)
    }
}

/// Values live only at leaves. Every internal node is a routing node with
/// exactly two children, carrying a copy of the largest key of its left
/// subtree at the time it was created.
///
/// Routing nodes satisfy `left <= key < right`. Erasing an entry leaves the
/// routing keys above it untouched; a stale routing key still separates the
/// two subtrees correctly.
#[derive(Debug, Default, Clone, Copy)]
pub struct Leaf;

impl sealed::Sealed for Leaf {}

impl Storage for Leaf {
    const NAME: &'static str = "leaf";
    const VALUES_AT_LEAVES: bool = true;

    fn insert<K, V, C, B, A>(
        tree: &mut Tree<K, V, C, B, Self, A>,
        key: K,
        value: V,
    ) -> Result<Handle>
    where
        K: Clone,
        C: Compare<K>,
        B: Balance,
        A: Augment<K, V>,
    {
        let Some(mut cursor) = tree.root else {
            let h = tree.attach(key, Some(value), None, false);
            tree.len += 1;
            return Ok(h);
        };

        // Descend the routing nodes to the leaf the key belongs next to.
        loop {
            let n = &tree.nodes[cursor];
            if !n.is_routing() {
                break;
            }
            let next = match tree.cmp.compare(&key, &n.key) {
                Ordering::Greater => n.right,
                Ordering::Less | Ordering::Equal => n.left,
            };
            let Some(next) = next else {
                unreachable!("routing node without two children");
            };
            cursor = next;
        }

        let leaf = cursor;
        let ord = tree.cmp.compare(&key, &tree.nodes[leaf].key);
        let routing_key = match ord {
            Ordering::Equal => return tree.on_duplicate(leaf, value),
            Ordering::Less => key.clone(),
            Ordering::Greater => tree.nodes[leaf].key.clone(),
        };

        // The new routing node takes the leaf's place, with the existing leaf
        // and the new one as its children, smallest on the left.
        //
        //        parent                parent
        //          |                     |
        //        leaf        ->       routing
        //                              /    \
        //                           leaf    new
        let parent = tree.nodes[leaf].parent;
        let routing = tree.alloc(routing_key, None, parent);
        tree.replace_child(parent, leaf, Some(routing));

        let new = tree.alloc(key, Some(value), Some(routing));
        tree.nodes[leaf].parent = Some(routing);

        let (left, right) = match ord {
            Ordering::Less => (new, leaf),
            _ => (leaf, new),
        };
        let r = &mut tree.nodes[routing];
        r.left = Some(left);
        r.right = Some(right);

        tree.len += 1;
        tree.retrace(Some(routing));

        Ok(new)
    }

    fn remove<K, V, C, B, A>(tree: &mut Tree<K, V, C, B, Self, A>, node: Handle) -> (K, V)
    where
        C: Compare<K>,
        B: Balance,
        A: Augment<K, V>,
    {
        debug_assert!(tree.nodes[node].is_leaf());

        // The sibling of the leaf replaces the routing node above them both.
        //
        //        grand               grand
        //          |                   |
        //       routing      ->     sibling
        //        /    \
        //     node  sibling
        let start = match tree.nodes[node].parent {
            None => {
                tree.root = None;
                None
            }
            Some(routing) => {
                let r = &tree.nodes[routing];
                let sibling = if r.left == Some(node) { r.right } else { r.left };
                let grand = r.parent;

                tree.replace_child(grand, routing, sibling);
                tree.nodes.remove(routing);
                grand
            }
        };

        let Some(n) = tree.nodes.remove(node) else {
            unreachable!("leaf vanished from the arena");
        };

        tree.len -= 1;
        tree.retrace(start);

        let Some(value) = n.value else {
            unreachable!("leaf storage leaf without a value");
        };
        (n.key, value)
    }
}
