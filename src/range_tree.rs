//! A multidimensional range tree for orthogonal range queries over points.

use std::{cmp::Ordering, fmt, sync::Arc};

use slotmap::SecondaryMap;
use tracing::debug;

use crate::{
    balance::Avl,
    compare::Compare,
    error::{Result, TreeError},
    iter::{Cover, Iter},
    node::Handle,
    storage::Inner,
    tree::Tree,
};

/// Orders points by one axis, breaking ties with the remaining axes in
/// cyclic order so distinct points never compare equal.
struct AxisOrder<C> {
    axes: Arc<[C]>,
    axis: usize,
}

impl<C> Clone for AxisOrder<C> {
    fn clone(&self) -> Self {
        Self {
            axes: Arc::clone(&self.axes),
            axis: self.axis,
        }
    }
}

impl<P, C> Compare<P> for AxisOrder<C>
where
    C: Compare<P>,
{
    fn compare(&self, a: &P, b: &P) -> Ordering {
        let d = self.axes.len();
        (0..d)
            .map(|i| self.axes[(self.axis + i) % d].compare(a, b))
            .find(|v| v.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// A range tree indexing `D`-dimensional points of type `P`, where the
/// ordering of each dimension is given by its own comparator `C`.
///
/// The tree over the first dimension is an AVL tree ordered by comparator 0.
/// Every node of the dimension `i` tree owns an associated range tree over
/// dimension `i + 1` holding exactly the points of its subtree, down to the
/// last dimension which has no associated trees. A query descends the first
/// dimension to the split node and hands each canonical subtree to its
/// associated tree, answering in O(log^D n + k).
///
/// ```
/// use ordtree::{Axis, RangeTree};
///
/// let points = [[1, 1], [2, 5], [3, 3], [4, 2]];
/// let t = RangeTree::build(vec![Axis(0), Axis(1)], 2, points).unwrap();
///
/// let got = t.query(&[1, 1], &[3, 4]).unwrap();
/// assert_eq!(got, [&[1, 1], &[3, 3]]);
/// ```
///
/// The associated trees are derived data: they are rebuilt (never patched)
/// whenever the point set changes.
pub struct RangeTree<P, C> {
    tree: Tree<P, (), AxisOrder<C>, Avl, Inner>,
    associated: SecondaryMap<Handle, RangeTree<P, C>>,
}

impl<P, C> RangeTree<P, C>
where
    P: Clone,
    C: Compare<P>,
{
    /// Construct an empty range tree over `dimension` axes, ordered by one
    /// comparator per axis.
    ///
    /// Returns [`TreeError::InvalidDimension`] if `dimension` is 0 or
    /// differs from the number of comparators.
    pub fn new(comparators: Vec<C>, dimension: usize) -> Result<Self> {
        let axes = check_axes(comparators, dimension)?;
        Ok(Self::empty(axes, 0))
    }

    /// Construct a range tree over `dimension` axes holding `points`.
    ///
    /// Returns [`TreeError::DuplicateKey`] if two points are equal on every
    /// axis.
    pub fn build(
        comparators: Vec<C>,
        dimension: usize,
        points: impl IntoIterator<Item = P>,
    ) -> Result<Self> {
        let axes = check_axes(comparators, dimension)?;
        let this = Self::build_at(axes, 0, points)?;

        debug!(
            points = this.len(),
            dimension,
            nodes = this.node_count(),
            "built range tree"
        );
        Ok(this)
    }

    fn empty(axes: Arc<[C]>, axis: usize) -> Self {
        Self {
            tree: Tree::with_comparator(AxisOrder { axes, axis }),
            associated: SecondaryMap::new(),
        }
    }

    fn build_at(axes: Arc<[C]>, axis: usize, points: impl IntoIterator<Item = P>) -> Result<Self> {
        let mut this = Self::empty(axes, axis);
        for p in points {
            this.tree.insert(p, ())?;
        }
        this.build_associated()?;
        Ok(this)
    }

    /// Discard and rebuild the associated tree of every node.
    fn build_associated(&mut self) -> Result<()> {
        self.associated.clear();

        let order = &self.tree.cmp;
        let next = order.axis + 1;
        if next == order.axes.len() {
            return Ok(());
        }

        for h in self.tree.nodes.keys() {
            let points = Iter::new(&self.tree.nodes, Some(h)).map(|(p, _)| p.clone());
            let index = Self::build_at(Arc::clone(&order.axes), next, points)?;
            self.associated.insert(h, index);
        }

        Ok(())
    }

    /// The number of points in the tree.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The number of axes of the indexed points.
    pub fn dimension(&self) -> usize {
        self.tree.cmp.axes.len()
    }

    /// Iterate over all points, ordered by the first axis.
    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.tree.iter().map(|(p, _)| p)
    }

    /// Returns true if a point equal to `point` on every axis is stored.
    pub fn contains(&self, point: &P) -> bool {
        self.tree.contains_key(point)
    }

    /// Add `point`, rebuilding the associated trees.
    ///
    /// Returns [`TreeError::DuplicateKey`] if an equal point is present.
    pub fn insert(&mut self, point: P) -> Result<()> {
        self.tree.insert(point, ())?;
        self.build_associated()?;

        debug!(points = self.len(), "rebuilt range tree after insert");
        Ok(())
    }

    /// Remove the point equal to `point`, rebuilding the associated trees.
    pub fn remove(&mut self, point: &P) -> Result<P> {
        let h = self.tree.find(point).ok_or(TreeError::NotFound)?;
        let (point, ()) = self.tree.remove_entry(h)?;
        self.build_associated()?;

        debug!(points = self.len(), "rebuilt range tree after remove");
        Ok(point)
    }

    /// All points inside the box with corners `low` and `high` (inclusive on
    /// every axis), ordered by the first axis within each canonical subtree.
    ///
    /// Returns [`TreeError::InvalidDimension`] naming the first axis on which
    /// `low` lies above `high`.
    pub fn query(&self, low: &P, high: &P) -> Result<Vec<&P>> {
        let axes = &self.tree.cmp.axes;
        if let Some(axis) = (0..axes.len()).find(|&i| axes[i].compare(low, high).is_gt()) {
            debug!(axis, "rejecting inverted query corners");
            return Err(TreeError::InvalidDimension {
                axis,
                reason: "lower query corner above upper corner",
            });
        }

        let mut out = vec![];
        self.collect(low, high, &mut out);
        Ok(out)
    }

    fn collect<'a>(&'a self, low: &P, high: &P, out: &mut Vec<&'a P>) {
        let order = &self.tree.cmp;
        let cmp = &order.axes[order.axis];
        let rest = &order.axes[order.axis + 1..];

        for piece in self.tree.cover(low, high, |p: &P, q: &P| cmp.compare(p, q)) {
            match piece {
                // In range on this axis, the rest are checked directly.
                Cover::Entry(h) => {
                    let p = &self.tree.nodes[h].key;
                    if rest.iter().all(|c| within(c, p, low, high)) {
                        out.push(p);
                    }
                }
                Cover::Subtree(h) if rest.is_empty() => {
                    out.extend(Iter::new(&self.tree.nodes, Some(h)).map(|(p, _)| p));
                }
                Cover::Subtree(h) => self.associated[h].collect(low, high, out),
            }
        }
    }

    /// The number of nodes across this tree and all nested associated trees.
    fn node_count(&self) -> usize {
        self.tree.nodes.len() + self.associated.values().map(Self::node_count).sum::<usize>()
    }
}

fn check_axes<C>(comparators: Vec<C>, dimension: usize) -> Result<Arc<[C]>> {
    if dimension == 0 {
        return Err(TreeError::InvalidDimension {
            axis: 0,
            reason: "at least one dimension is required",
        });
    }
    if comparators.len() != dimension {
        return Err(TreeError::InvalidDimension {
            axis: comparators.len().min(dimension),
            reason: "one comparator per dimension is required",
        });
    }
    Ok(comparators.into())
}

fn within<P, C>(cmp: &C, p: &P, low: &P, high: &P) -> bool
where
    C: Compare<P>,
{
    !cmp.compare(p, low).is_lt() && !cmp.compare(p, high).is_gt()
}

impl<P, C> Clone for RangeTree<P, C>
where
    P: Clone,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            associated: self.associated.clone(),
        }
    }
}

impl<P, C> fmt::Debug for RangeTree<P, C>
where
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeTree")
            .field("axis", &self.tree.cmp.axis)
            .field("dimension", &self.tree.cmp.axes.len())
            .field(
                "points",
                &self.tree.iter().map(|(p, _)| p).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
