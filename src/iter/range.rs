use std::{cmp::Ordering, fmt};

use super::{Cover, CoverIter, Iter};

/// An in-order iterator over the entries with keys inside a range, returned
/// by [`Tree::range_query()`](crate::Tree::range_query).
pub struct RangeIter<'a, K, V, D, Q, F> {
    cover: CoverIter<'a, K, V, D, Q, F>,

    /// The canonical subtree currently being drained, if any.
    subtree: Option<Iter<'a, K, V, D>>,
}

impl<'a, K, V, D, Q, F> RangeIter<'a, K, V, D, Q, F>
where
    F: Fn(&K, &Q) -> Ordering,
{
    pub(crate) fn new(cover: CoverIter<'a, K, V, D, Q, F>) -> Self {
        Self {
            cover,
            subtree: None,
        }
    }
}

impl<K, V, D, Q, F> fmt::Debug for RangeIter<'_, K, V, D, Q, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeIter")
            .field("draining_subtree", &self.subtree.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a, K, V, D, Q, F> Iterator for RangeIter<'a, K, V, D, Q, F>
where
    F: Fn(&K, &Q) -> Ordering,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(v) = self.subtree.as_mut().and_then(Iterator::next) {
                return Some(v);
            }
            self.subtree = None;

            let nodes = self.cover.nodes();
            match self.cover.next()? {
                Cover::Entry(h) => {
                    if let Some(entry) = nodes[h].entry() {
                        return Some(entry);
                    }
                }
                // Every entry below a canonical subtree root is in range.
                Cover::Subtree(h) => self.subtree = Some(Iter::new(nodes, Some(h))),
            }
        }
    }
}
