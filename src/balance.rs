use tracing::trace;

use crate::{augment::Augment, node::Handle, tree::Tree};

mod sealed {
    pub trait Sealed {}
}

/// A balancing strategy, invoked by the tree engine on every node along the
/// path from a structural mutation back to the root.
///
/// This trait is sealed; the available strategies are [`Plain`] and [`Avl`].
pub trait Balance: sealed::Sealed + Sized {
    /// A short name identifying the strategy in logs.
    const NAME: &'static str;

    /// True if the strategy bounds the height of the tree to O(log n).
    const SELF_BALANCING: bool;

    /// Refresh the height and augmentation of `node` (whose children are
    /// already up to date) and restore the strategy's invariant at it.
    ///
    /// Returns the node now at the root of the subtree previously rooted at
    /// `node`.
    fn rebalance<K, V, C, S, A>(tree: &mut Tree<K, V, C, Self, S, A>, node: Handle) -> Handle
    where
        A: Augment<K, V>;
}

/// No rebalancing: the shape of the tree is whatever the insertion order
/// produces, degenerating into a chain for sorted input.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plain;

impl sealed::Sealed for Plain {}

impl Balance for Plain {
    const NAME: &'static str = "plain";
    const SELF_BALANCING: bool = false;

    fn rebalance<K, V, C, S, A>(tree: &mut Tree<K, V, C, Self, S, A>, node: Handle) -> Handle
    where
        A: Augment<K, V>,
    {
        tree.refresh(node);
        node
    }
}

/// AVL balancing: the heights of the two subtrees of any node differ by at
/// most one.
#[derive(Debug, Default, Clone, Copy)]
pub struct Avl;

impl sealed::Sealed for Avl {}

impl Balance for Avl {
    const NAME: &'static str = "avl";
    const SELF_BALANCING: bool = true;

    fn rebalance<K, V, C, S, A>(tree: &mut Tree<K, V, C, Self, S, A>, node: Handle) -> Handle
    where
        A: Augment<K, V>,
    {
        tree.refresh(node);

        // A single insertion or removal changes a subtree height by at most
        // one, so the balance factor of an ancestor is never outside +-2.
        let root = match tree.balance_factor(node) {
            // Left-heavy
            2 => {
                let Some(left) = tree.nodes[node].left else {
                    unreachable!("left-heavy node without a left child");
                };
                if tree.balance_factor(left) < 0 {
                    tree.rotate_left(left);
                }
                tree.rotate_right(node)
            }
            // Right-heavy
            -2 => {
                let Some(right) = tree.nodes[node].right else {
                    unreachable!("right-heavy node without a right child");
                };
                if tree.balance_factor(right) > 0 {
                    tree.rotate_right(right);
                }
                tree.rotate_left(node)
            }
            -1..=1 => node,
            v => unreachable!("balance factor {v} outside of AVL bounds"),
        };

        // Invariant: the absolute difference between subtree heights
        // ("balance factor") cannot exceed 1.
        debug_assert!(tree.balance_factor(root).abs() <= 1);
        root
    }
}

impl<K, V, C, B, S, A> Tree<K, V, C, B, S, A>
where
    A: Augment<K, V>,
{
    /// Compute the "balance factor" of the subtree rooted at `node`.
    ///
    /// Positive when left heavy, negative when right heavy.
    pub(crate) fn balance_factor(&self, node: Handle) -> i64 {
        let n = &self.nodes[node];
        i64::from(self.height_of(n.left)) - i64::from(self.height_of(n.right))
    }

    /// Left rotate the subtree rooted at `x` around the pivot point `P`,
    /// returning `P`.
    ///
    /// ```text
    ///
    ///      x
    ///     / \                               P
    ///    1   P         Rotate Left        /   \
    ///       / \      --------------->    x     y
    ///      2   y                        / \   / \
    ///         / \                      1   2 3   4
    ///        3   4
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `x` has no right child (cannot be rotated).
    pub(crate) fn rotate_left(&mut self, x: Handle) -> Handle {
        let Some(p) = self.nodes[x].right else {
            unreachable!("left rotation without a right child");
        };
        let parent = self.nodes[x].parent;
        let inner = self.nodes[p].left;

        self.nodes[x].right = inner;
        if let Some(v) = inner {
            self.nodes[v].parent = Some(x);
        }

        self.nodes[p].left = Some(x);
        self.nodes[x].parent = Some(p);
        self.replace_child(parent, x, Some(p));

        self.refresh(x);
        self.refresh(p);

        trace!("rotate left");
        p
    }

    /// Right rotate the subtree rooted at `y` around the pivot point `P`,
    /// returning `P`.
    ///
    /// ```text
    ///          y
    ///         / \                           P
    ///        P   4     Rotate Right       /   \
    ///       / \      --------------->    x     y
    ///      x   3                        / \   / \
    ///     / \                          1   2 3   4
    ///    1   2
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `y` has no left child (cannot be rotated).
    pub(crate) fn rotate_right(&mut self, y: Handle) -> Handle {
        let Some(p) = self.nodes[y].left else {
            unreachable!("right rotation without a left child");
        };
        let parent = self.nodes[y].parent;
        let inner = self.nodes[p].right;

        self.nodes[y].left = inner;
        if let Some(v) = inner {
            self.nodes[v].parent = Some(y);
        }

        self.nodes[p].right = Some(y);
        self.nodes[y].parent = Some(p);
        self.replace_child(parent, y, Some(p));

        self.refresh(y);
        self.refresh(p);

        trace!("rotate right");
        p
    }
}
