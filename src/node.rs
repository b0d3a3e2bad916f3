use slotmap::new_key_type;

new_key_type! {
    /// A handle identifying a node in a [`Tree`](crate::Tree).
    ///
    /// Handles are generational: a handle to a node that has since been
    /// erased is detected as stale rather than aliasing a newer node.
    /// Structural mutation may move a key to a different node, so handles
    /// should not be held across calls that take `&mut` on the tree.
    pub struct Handle;
}

/// A single arena slot of a tree.
///
/// All links are [`Handle`]s into the owning arena. `parent` is a
/// back-reference used for retracing and in-order stepping only; ownership of
/// every node lies with the arena.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V, D> {
    pub(crate) key: K,

    /// The value attached to this node.
    ///
    /// [`None`] only for the routing nodes of leaf storage, which carry a key
    /// purely to steer searches.
    pub(crate) value: Option<V>,

    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,

    /// The height of the subtree rooted at this node.
    ///
    /// A leaf has a height of 1, an absent child counts as 0. A u32 (rather
    /// than a u8) is needed because an unbalanced tree can degenerate into a
    /// chain as long as the tree itself.
    pub(crate) height: u32,

    /// Augmentation data summarising the subtree rooted at this node.
    pub(crate) data: D,
}

impl<K, V, D> Node<K, V, D> {
    pub(crate) fn new(key: K, value: Option<V>, parent: Option<Handle>, data: D) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
            height: 1,
            data,
        }
    }

    /// Returns true if this node only routes searches and holds no entry.
    #[inline]
    pub(crate) fn is_routing(&self) -> bool {
        self.value.is_none()
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// The `(key, value)` tuple of this node, if it holds an entry.
    #[inline]
    pub(crate) fn entry(&self) -> Option<(&K, &V)> {
        self.value.as_ref().map(|v| (&self.key, v))
    }
}
