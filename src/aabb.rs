//! An interval tree over axis-aligned bounding boxes.

use std::{
    cmp::Ordering,
    fmt::{self, Debug},
};

use tracing::debug;

use crate::{
    augment::Augment,
    balance::Avl,
    bound::{ByLowerBound, LowerBound},
    error::{Result, TreeError},
    iter::Overlaps,
    node::Handle,
    storage::Inner,
    tree::Tree,
};

/// Derives the bounds of an item on one axis.
///
/// Any `Fn(&I, usize) -> (S, S)` closure returning `(lower, upper)` for the
/// requested axis is an [`Extract`] implementation.
pub trait Extract<I> {
    /// The scalar type of the bounds.
    type Scalar: PartialOrd + Clone;

    /// The `(lower, upper)` bounds of `item` on `axis`.
    fn bounds(&self, item: &I, axis: usize) -> (Self::Scalar, Self::Scalar);
}

impl<I, S, F> Extract<I> for F
where
    F: Fn(&I, usize) -> (S, S),
    S: PartialOrd + Clone,
{
    type Scalar = S;

    #[inline]
    fn bounds(&self, item: &I, axis: usize) -> (S, S) {
        self(item, axis)
    }
}

/// Maintains the maximum upper bound of all intervals in each subtree.
#[derive(Debug, Clone)]
pub struct SubtreeMax<E> {
    extractor: E,
    axis: usize,
}

impl<I, E> Augment<LowerBound<E::Scalar>, I> for SubtreeMax<E>
where
    E: Extract<I>,
{
    type Data = E::Scalar;

    fn summarize(
        &self,
        key: &LowerBound<E::Scalar>,
        value: Option<&I>,
        left: Option<&E::Scalar>,
        right: Option<&E::Scalar>,
    ) -> E::Scalar {
        let own = match value {
            Some(item) => self.extractor.bounds(item, self.axis).1,
            None => key.value().clone(),
        };

        [left, right]
            .into_iter()
            .flatten()
            .fold(own, |max, v| if *v > max { v.clone() } else { max })
    }
}

type IntervalIndex<I, E> =
    Tree<LowerBound<<E as Extract<I>>::Scalar>, I, ByLowerBound, Avl, Inner, SubtreeMax<E>>;

/// An AVL tree of items keyed by their lower bound on one axis and augmented
/// with the maximum upper bound of each subtree, answering overlap queries
/// without scanning every item.
///
/// The tree prunes with the bounds on its axis; `predicate` has the final say
/// on whether a candidate overlaps a query item (for example by testing every
/// axis of a bounding box). The predicate must not accept two items whose
/// bounds on the tree's axis are disjoint.
///
/// Bounds are closed: `[1, 3]` and `[3, 5]` overlap.
pub struct AabbTree<I, E, P>
where
    E: Extract<I>,
{
    tree: IntervalIndex<I, E>,
    predicate: P,
    axis: usize,

    /// Insertion sequence number of the next item.
    next_seq: u64,
}

impl<I, E, P> AabbTree<I, E, P>
where
    E: Extract<I>,
    P: Fn(&I, &I) -> bool,
{
    /// Construct an empty tree indexing items by their bounds on `axis`.
    pub fn new(axis: usize, extractor: E, predicate: P) -> Self {
        Self {
            tree: Tree::with_augment(ByLowerBound, SubtreeMax { extractor, axis }),
            predicate,
            axis,
            next_seq: 0,
        }
    }

    /// Construct a tree holding `items`.
    pub fn build(
        axis: usize,
        extractor: E,
        predicate: P,
        items: impl IntoIterator<Item = I>,
    ) -> Result<Self> {
        let mut this = Self::new(axis, extractor, predicate);
        for item in items {
            this.insert(item)?;
        }

        debug!(items = this.len(), axis, height = this.tree.height(), "built aabb tree");
        Ok(this)
    }

    /// The axis this tree indexes.
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// The number of items in the tree.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Iterate over all items, ordered by lower bound and then insertion.
    pub fn iter(&self) -> impl Iterator<Item = &I> {
        self.tree.iter().map(|(_, v)| v)
    }

    /// Insert `item`.
    ///
    /// Returns [`TreeError::InvalidBounds`] if the lower bound of `item` is
    /// greater than its upper bound, or the two cannot be ordered.
    pub fn insert(&mut self, item: I) -> Result<Handle> {
        let (low, _) = self.bounds(&item)?;

        let key = LowerBound::new(low, self.next_seq);
        self.next_seq += 1;

        self.tree.insert(key, item)
    }

    /// Remove an item equal to `item`, returning the stored item.
    ///
    /// If several stored items are equal, the earliest inserted is removed.
    pub fn remove(&mut self, item: &I) -> Result<I>
    where
        I: PartialEq,
    {
        let (low, _) = self.bounds(item)?;

        // Every item sharing this lower bound, in insertion order.
        let first = LowerBound::new(low.clone(), 0);
        let last = LowerBound::new(low, u64::MAX);

        let key = self
            .tree
            .range_query(&first, &last)
            .find(|(_, v)| *v == item)
            .map(|(k, _)| k.clone())
            .ok_or(TreeError::NotFound)?;

        self.tree.erase(&key)
    }

    /// Iterate over every stored item the predicate reports as overlapping
    /// `item`.
    ///
    /// Subtrees whose maximum upper bound lies below the lower bound of
    /// `item` are skipped, as are nodes (and their right subtrees) starting
    /// above its upper bound.
    pub fn query_overlaps<'a>(&'a self, item: &'a I) -> Result<Overlaps<'a, I, E::Scalar, P>> {
        let bounds = self.bounds(item)?;
        Ok(Overlaps::new(
            &self.tree.nodes,
            self.tree.root,
            item,
            bounds,
            &self.predicate,
        ))
    }

    /// Extract and validate the bounds of `item` on this tree's axis.
    fn bounds(&self, item: &I) -> Result<(E::Scalar, E::Scalar)> {
        let (low, high) = self.tree.augment.extractor.bounds(item, self.axis);

        // Unordered bounds (NaN) are as invalid as inverted ones.
        match low.partial_cmp(&high) {
            Some(Ordering::Less | Ordering::Equal) => Ok((low, high)),
            _ => {
                debug!(axis = self.axis, "rejecting interval with invalid bounds");
                Err(TreeError::InvalidBounds { axis: self.axis })
            }
        }
    }
}

impl<I, E, P> Debug for AabbTree<I, E, P>
where
    I: Debug,
    E: Extract<I>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AabbTree")
            .field("axis", &self.axis)
            .field("items", &self.tree.iter().map(|(_, v)| v).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
