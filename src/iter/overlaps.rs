use std::fmt;

use slotmap::SlotMap;

use crate::{
    bound::LowerBound,
    node::{Handle, Node},
};

/// An iterator over the items of an [`AabbTree`](crate::AabbTree) accepted by
/// its intersection predicate for a query item, returned by
/// [`AabbTree::query_overlaps()`](crate::AabbTree::query_overlaps).
///
/// Subtrees are pruned using the `[low, high]` bounds of the query on the
/// tree's axis, so the predicate is evaluated only for items that may
/// overlap.
pub struct Overlaps<'a, I, S, P> {
    nodes: &'a SlotMap<Handle, Node<LowerBound<S>, I, S>>,
    query: &'a I,
    low: S,
    high: S,
    predicate: &'a P,
    stack: Vec<Handle>,
}

impl<'a, I, S, P> Overlaps<'a, I, S, P>
where
    S: PartialOrd,
{
    pub(crate) fn new(
        nodes: &'a SlotMap<Handle, Node<LowerBound<S>, I, S>>,
        root: Option<Handle>,
        query: &'a I,
        (low, high): (S, S),
        predicate: &'a P,
    ) -> Self {
        let mut this = Self {
            nodes,
            query,
            low,
            high,
            predicate,
            stack: vec![],
        };

        // Descend down the left side of the tree, pushing all the internal
        // nodes onto the stack until the left-most leaf is reached.
        if let Some(root) = root {
            this.push_subtree(root);
        }

        this
    }

    fn push_subtree(&mut self, subtree_root: Handle) {
        let mut ptr = Some(subtree_root);

        while let Some(v) = ptr {
            let n = &self.nodes[v];
            if n.data < self.low {
                // Prune this subtree rooted at "v" from the search.
                //
                // All intervals in this subtree end before the query starts.
                break;
            }

            self.stack.push(v);
            ptr = n.left;
        }
    }
}

impl<'a, I, S, P> Iterator for Overlaps<'a, I, S, P>
where
    S: PartialOrd,
    P: Fn(&I, &I) -> bool,
{
    type Item = &'a I;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let nodes = self.nodes;
            let v = &nodes[self.stack.pop()?];

            if *v.key.value() > self.high {
                // Prune this node and the right subtree from the search.
                //
                // All intervals in the right subtree start after the query
                // ends.
                continue;
            }

            // Push the right subtree to be visited next.
            if let Some(right) = v.right {
                self.push_subtree(right);
            }

            // Yield this item if the caller's predicate accepts it.
            if let Some(item) = v.value.as_ref() {
                if (self.predicate)(item, self.query) {
                    return Some(item);
                }
            }
        }
    }
}

impl<I, S, P> fmt::Debug for Overlaps<'_, I, S, P>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlaps")
            .field("low", &self.low)
            .field("high", &self.high)
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}
