use std::{
    cmp::Ordering,
    fmt::{self, Debug},
    marker::PhantomData,
};

use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::{
    augment::Augment,
    balance::{Avl, Balance, Plain},
    compare::{Compare, Natural},
    error::{Result, TreeError},
    iter::{CoverIter, IntoIter, Iter, PostOrder, PreOrder, RangeIter},
    node::{Handle, Node},
    storage::{Inner, Leaf, Storage},
};

/// A self-balancing (AVL) tree with values attached to every node.
pub type AvlTree<K, V, C = Natural> = Tree<K, V, C, Avl, Inner>;

/// An unbalanced binary search tree with values attached to every node.
pub type BstTree<K, V, C = Natural> = Tree<K, V, C, Plain, Inner>;

/// A self-balancing (AVL) tree storing values at the leaves only.
pub type LeafAvlTree<K, V, C = Natural> = Tree<K, V, C, Avl, Leaf>;

/// An unbalanced binary search tree storing values at the leaves only.
pub type LeafBstTree<K, V, C = Natural> = Tree<K, V, C, Plain, Leaf>;

/// What [`Tree::insert`] does with a key that is already present.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Leave the tree unchanged and return [`TreeError::DuplicateKey`].
    #[default]
    Reject,

    /// Overwrite the stored value, keeping the existing key.
    Replace,
}

/// An ordered map from `K` to `V`, stored as a binary search tree.
///
/// The tree is generic over:
///
/// * `C`: the [`Compare`] ordering of keys, [`Natural`] by default.
/// * `B`: the [`Balance`] strategy, [`Avl`] by default.
/// * `S`: the [`Storage`] strategy, [`Inner`] by default.
/// * `A`: the [`Augment`] summary maintained in each node, none by default.
///
/// Nodes live in an arena owned by the tree and are linked by [`Handle`]s.
pub struct Tree<K, V, C = Natural, B = Avl, S = Inner, A = ()>
where
    A: Augment<K, V>,
{
    pub(crate) nodes: SlotMap<Handle, Node<K, V, A::Data>>,
    pub(crate) root: Option<Handle>,

    /// The number of entries (excluding routing nodes).
    pub(crate) len: usize,

    pub(crate) cmp: C,
    pub(crate) augment: A,
    pub(crate) duplicates: DuplicatePolicy,

    _policy: PhantomData<fn() -> (B, S)>,
}

impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Construct an empty AVL tree ordered by `K`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, V, C, B, S, A> Default for Tree<K, V, C, B, S, A>
where
    C: Default,
    A: Augment<K, V> + Default,
{
    fn default() -> Self {
        Self::with_parts(C::default(), A::default())
    }
}

impl<K, V, C, B, S, A> Clone for Tree<K, V, C, B, S, A>
where
    K: Clone,
    V: Clone,
    C: Clone,
    A: Augment<K, V> + Clone,
    A::Data: Clone,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
            cmp: self.cmp.clone(),
            augment: self.augment.clone(),
            duplicates: self.duplicates,
            _policy: PhantomData,
        }
    }
}

impl<K, V, C, B, S, A> Debug for Tree<K, V, C, B, S, A>
where
    K: Debug,
    V: Debug,
    A: Augment<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, B, S, A> Tree<K, V, C, B, S, A>
where
    A: Augment<K, V>,
{
    /// Construct an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self
    where
        A: Default,
    {
        Self::with_parts(cmp, A::default())
    }

    /// Construct an empty tree ordered by `cmp`, maintaining `augment` in
    /// every node.
    pub fn with_augment(cmp: C, augment: A) -> Self {
        Self::with_parts(cmp, augment)
    }

    fn with_parts(cmp: C, augment: A) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            len: 0,
            cmp,
            augment,
            duplicates: DuplicatePolicy::default(),
            _policy: PhantomData,
        }
    }

    /// Set the [`DuplicatePolicy`] applied by [`Tree::insert`].
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// The number of entries in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The height of the tree: 0 when empty, 1 for a single node.
    pub fn height(&self) -> usize {
        self.height_of(self.root) as usize
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// The comparator ordering the keys of this tree.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// The `(key, value)` entry held by the node `handle`.
    pub fn entry(&self, handle: Handle) -> Result<(&K, &V)> {
        self.nodes
            .get(handle)
            .and_then(Node::entry)
            .ok_or(TreeError::NotFound)
    }

    /// The augmentation summary of the subtree rooted at `handle`.
    pub fn summary(&self, handle: Handle) -> Result<&A::Data> {
        self.nodes
            .get(handle)
            .map(|n| &n.data)
            .ok_or(TreeError::NotFound)
    }

    /// The handle of the entry with the smallest key.
    pub fn min(&self) -> Result<Handle> {
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        let h = self.leftmost(root);
        debug_assert!(!self.nodes[h].is_routing());
        Ok(h)
    }

    /// The handle of the entry with the largest key.
    pub fn max(&self) -> Result<Handle> {
        let root = self.root.ok_or(TreeError::EmptyTree)?;
        let h = self.rightmost(root);
        debug_assert!(!self.nodes[h].is_routing());
        Ok(h)
    }

    /// The in-order successor of the entry at `handle`, if any.
    pub fn successor(&self, handle: Handle) -> Result<Option<Handle>> {
        self.entry(handle)?;

        let mut h = handle;
        loop {
            match self.next_node(h) {
                Some(v) if self.nodes[v].is_routing() => h = v,
                v => return Ok(v),
            }
        }
    }

    /// The in-order predecessor of the entry at `handle`, if any.
    pub fn predecessor(&self, handle: Handle) -> Result<Option<Handle>> {
        self.entry(handle)?;

        let mut h = handle;
        loop {
            match self.prev_node(h) {
                Some(v) if self.nodes[v].is_routing() => h = v,
                v => return Ok(v),
            }
        }
    }

    /// Iterate over all entries in key order.
    ///
    /// The iterator borrows the tree and can be recreated at will; each
    /// yields the same sequence until the tree is mutated.
    pub fn iter(&self) -> Iter<'_, K, V, A::Data> {
        Iter::new(&self.nodes, self.root)
    }

    /// Iterate over all entries in structural pre-order (node, left, right).
    pub fn pre_order(&self) -> PreOrder<'_, K, V, A::Data> {
        PreOrder::new(&self.nodes, self.root)
    }

    /// Iterate over all entries in structural post-order (left, right, node).
    pub fn post_order(&self) -> PostOrder<'_, K, V, A::Data> {
        PostOrder::new(&self.nodes, self.root)
    }

    /// Yield the nodes covering `[low, high]` under `probe`, which orders a
    /// key relative to a bound.
    ///
    /// `probe` must be consistent with the tree's own ordering: every key
    /// ordered below a bound must precede every key ordered at or above it.
    pub(crate) fn cover<'a, Q, F>(
        &'a self,
        low: &'a Q,
        high: &'a Q,
        probe: F,
    ) -> CoverIter<'a, K, V, A::Data, Q, F>
    where
        F: Fn(&K, &Q) -> Ordering,
    {
        CoverIter::new(&self.nodes, self.root, low, high, probe)
    }

    pub(crate) fn height_of(&self, node: Option<Handle>) -> u32 {
        node.map(|v| self.nodes[v].height).unwrap_or_default()
    }

    /// Recompute the height and augmentation summary of `node` from its
    /// children.
    pub(crate) fn refresh(&mut self, node: Handle) {
        let n = &self.nodes[node];
        let left = n.left.map(|v| &self.nodes[v]);
        let right = n.right.map(|v| &self.nodes[v]);

        let height = 1 + left
            .map(|v| v.height)
            .max(right.map(|v| v.height))
            .unwrap_or_default();
        let data = self.augment.summarize(
            &n.key,
            n.value.as_ref(),
            left.map(|v| &v.data),
            right.map(|v| &v.data),
        );

        let n = &mut self.nodes[node];
        n.height = height;
        n.data = data;
    }

    /// Allocate an unlinked node below `parent`.
    pub(crate) fn alloc(&mut self, key: K, value: Option<V>, parent: Option<Handle>) -> Handle {
        let data = self.augment.summarize(&key, value.as_ref(), None, None);
        self.nodes.insert(Node::new(key, value, parent, data))
    }

    /// Allocate a node and link it as the `left` (or right) child of
    /// `parent`, or as the root if `parent` is [`None`].
    pub(crate) fn attach(
        &mut self,
        key: K,
        value: Option<V>,
        parent: Option<Handle>,
        left: bool,
    ) -> Handle {
        let h = self.alloc(key, value, parent);
        match parent {
            None => self.root = Some(h),
            Some(p) if left => self.nodes[p].left = Some(h),
            Some(p) => self.nodes[p].right = Some(h),
        }
        h
    }

    /// Replace the link from `parent` to `old` with a link to `new`, making
    /// `new` the root when `parent` is [`None`].
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<Handle>,
        old: Handle,
        new: Option<Handle>,
    ) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let p = &mut self.nodes[p];
                if p.left == Some(old) {
                    p.left = new;
                } else {
                    debug_assert_eq!(p.right, Some(old));
                    p.right = new;
                }
            }
        }

        if let Some(v) = new {
            self.nodes[v].parent = parent;
        }
    }

    pub(crate) fn leftmost(&self, mut node: Handle) -> Handle {
        while let Some(v) = self.nodes[node].left {
            node = v;
        }
        node
    }

    pub(crate) fn rightmost(&self, mut node: Handle) -> Handle {
        while let Some(v) = self.nodes[node].right {
            node = v;
        }
        node
    }

    /// The next node of an in-order walk, routing nodes included.
    fn next_node(&self, node: Handle) -> Option<Handle> {
        if let Some(right) = self.nodes[node].right {
            return Some(self.leftmost(right));
        }

        // Climb until arriving from a left child.
        let mut child = node;
        let mut parent = self.nodes[node].parent;
        while let Some(p) = parent {
            if self.nodes[p].left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        None
    }

    /// The previous node of an in-order walk, routing nodes included.
    fn prev_node(&self, node: Handle) -> Option<Handle> {
        if let Some(left) = self.nodes[node].left {
            return Some(self.rightmost(left));
        }

        // Climb until arriving from a right child.
        let mut child = node;
        let mut parent = self.nodes[node].parent;
        while let Some(p) = parent {
            if self.nodes[p].right == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        None
    }

    /// Descend to the entry for which `probe` returns [`Ordering::Equal`].
    ///
    /// `probe` orders the searched key relative to a node's key.
    pub(crate) fn search(&self, probe: impl Fn(&K) -> Ordering) -> Option<Handle> {
        let mut cursor = self.root;
        while let Some(h) = cursor {
            let n = &self.nodes[h];
            let ord = probe(&n.key);

            if n.is_routing() {
                // Routing nodes hold keys less than or equal to theirs on the
                // left.
                cursor = match ord {
                    Ordering::Greater => n.right,
                    Ordering::Less | Ordering::Equal => n.left,
                };
                continue;
            }

            cursor = match ord {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => return Some(h),
            };
        }
        None
    }
}

impl<K, V, C, B, S, A> Tree<K, V, C, B, S, A>
where
    C: Compare<K>,
    A: Augment<K, V>,
{
    /// The handle of the entry for `key`, if any.
    pub fn find(&self, key: &K) -> Option<Handle> {
        self.search(|v| self.cmp.compare(key, v))
    }

    /// A reference to the value stored under `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).and_then(|h| self.nodes[h].value.as_ref())
    }

    /// Returns true if the tree holds an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Iterate, in key order, over the entries with keys in `[low, high]`.
    ///
    /// The search descends to the split node where the paths to `low` and
    /// `high` diverge, then reports whole subtrees hanging inside the range
    /// along both boundary paths without comparing their keys, for
    /// O(log n + k) work overall.
    ///
    /// An inverted range (`low > high`) yields nothing.
    pub fn range_query<'a>(
        &'a self,
        low: &'a K,
        high: &'a K,
    ) -> RangeIter<'a, K, V, A::Data, K, impl Fn(&K, &K) -> Ordering + 'a> {
        let probe = |key: &K, bound: &K| self.cmp.compare(key, bound);

        let root = match self.cmp.compare(low, high) {
            Ordering::Greater => None,
            _ => self.root,
        };
        RangeIter::new(CoverIter::new(&self.nodes, root, low, high, probe))
    }
}

impl<K, V, C, B, S, A> Tree<K, V, C, B, S, A>
where
    C: Compare<K>,
    B: Balance,
    S: Storage,
    A: Augment<K, V>,
{
    /// Insert `value` under `key`, returning the handle of the node now
    /// holding the entry.
    ///
    /// If `key` is already present the [`DuplicatePolicy`] decides the
    /// outcome: [`TreeError::DuplicateKey`] (the default), or replacing the
    /// stored value.
    ///
    /// Leaf storage clones `key` into the routing node it creates.
    pub fn insert(&mut self, key: K, value: V) -> Result<Handle>
    where
        K: Clone,
    {
        let h = S::insert(self, key, value)?;
        trace!(
            len = self.len,
            balance = B::NAME,
            storage = S::NAME,
            "inserted entry"
        );
        Ok(h)
    }

    /// Erase the entry for `key`, returning its value.
    pub fn erase(&mut self, key: &K) -> Result<V> {
        let h = self.find(key).ok_or(TreeError::NotFound)?;
        self.remove_entry(h).map(|(_, v)| v)
    }

    /// Erase the entry held by the node `handle`, returning it.
    pub fn remove_entry(&mut self, handle: Handle) -> Result<(K, V)> {
        self.entry(handle)?;

        let entry = S::remove(self, handle);
        trace!(
            len = self.len,
            balance = B::NAME,
            storage = S::NAME,
            "erased entry"
        );
        Ok(entry)
    }

    /// Apply the duplicate policy to an insertion of `value` for the key
    /// already held by `node`.
    pub(crate) fn on_duplicate(&mut self, node: Handle, value: V) -> Result<Handle> {
        match self.duplicates {
            DuplicatePolicy::Reject => {
                debug!(len = self.len, "rejecting duplicate key");
                Err(TreeError::DuplicateKey)
            }
            DuplicatePolicy::Replace => {
                self.nodes[node].value = Some(value);
                // The summaries may depend on the value.
                self.retrace(Some(node));
                Ok(node)
            }
        }
    }

    /// Walk from `cursor` to the root, refreshing and rebalancing every node
    /// on the way.
    pub(crate) fn retrace(&mut self, mut cursor: Option<Handle>) {
        while let Some(h) = cursor {
            let subtree = B::rebalance(self, h);
            cursor = self.nodes[subtree].parent;
        }
    }
}

impl<K, V, C, B, S> Tree<K, V, C, B, S, ()>
where
    C: Compare<K>,
{
    /// A mutable reference to the value stored under `key`, if any.
    ///
    /// Only available without augmentation, as summaries are not recomputed
    /// after the value is changed in place.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let h = self.find(key)?;
        self.nodes[h].value.as_mut()
    }
}

impl<K, V, C, B, S, A> IntoIterator for Tree<K, V, C, B, S, A>
where
    A: Augment<K, V>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, A::Data>;

    /// Consume the tree, yielding its entries in key order.
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.nodes, self.root)
    }
}

impl<'a, K, V, C, B, S, A> IntoIterator for &'a Tree<K, V, C, B, S, A>
where
    A: Augment<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, A::Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
impl<K, V, C, B, S, A> Tree<K, V, C, B, S, A>
where
    A: Augment<K, V>,
{
    /// Refresh every node bottom-up, for trees assembled by hand.
    pub(crate) fn refresh_all(&mut self) {
        let order = crate::iter::post_order_nodes(&self.nodes, self.root);
        for h in order {
            self.refresh(h);
        }
    }
}
