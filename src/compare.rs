use std::{cmp::Ordering, ops::Index};

/// A strict weak order over values of type `K`.
///
/// Any `Fn(&K, &K) -> Ordering` closure (including boxed trait objects) is a
/// [`Compare`] implementation, so callers can parametrise a tree with an
/// ad-hoc ordering without declaring a type.
pub trait Compare<K: ?Sized> {
    /// Compare `a` with `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K, F> Compare<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// The natural [`Ord`] ordering of `K`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<K> Compare<K> for Natural
where
    K: Ord + ?Sized,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders indexable points (arrays, slices, vectors) by a single coordinate.
///
/// `Axis(1)` compares `[x, y, z]` points by `y` only, and so is the usual
/// per-dimension comparator handed to a [`RangeTree`](crate::RangeTree).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Axis(pub usize);

impl<P> Compare<P> for Axis
where
    P: Index<usize> + ?Sized,
    P::Output: Ord,
{
    #[inline]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        a[self.0].cmp(&b[self.0])
    }
}
