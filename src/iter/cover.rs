use std::cmp::Ordering;

use slotmap::SlotMap;

use crate::node::{Handle, Node};

/// One piece of the cover of a range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cover {
    /// A single node on a boundary path whose key lies inside the range.
    Entry(Handle),

    /// A canonical subtree: every key in it lies inside the range.
    Subtree(Handle),
}

#[derive(Debug)]
enum Frame {
    /// Visit the subtree rooted at `node`, knowing whether all of its keys
    /// are already known to be `>= low` / `<= high`.
    Visit {
        node: Handle,
        low_ok: bool,
        high_ok: bool,
    },
    Emit(Handle),
}

/// An [`Iterator`] that performs a depth-first, in-order walk of the nodes
/// covering `[low, high]`, yielding boundary entries individually and
/// canonical subtrees whole.
///
/// Above the split node neither bound is known to hold. Below it, the left
/// boundary path only compares keys with `low` (everything is `<= high`) and
/// the right boundary path only with `high`; the subtrees hanging inside the
/// range off these paths are yielded as [`Cover::Subtree`] without being
/// descended into.
pub(crate) struct CoverIter<'a, K, V, D, Q, F> {
    nodes: &'a SlotMap<Handle, Node<K, V, D>>,
    low: &'a Q,
    high: &'a Q,

    /// Orders a key relative to a bound.
    probe: F,

    stack: Vec<Frame>,
}

impl<'a, K, V, D, Q, F> CoverIter<'a, K, V, D, Q, F>
where
    F: Fn(&K, &Q) -> Ordering,
{
    pub(crate) fn new(
        nodes: &'a SlotMap<Handle, Node<K, V, D>>,
        root: Option<Handle>,
        low: &'a Q,
        high: &'a Q,
        probe: F,
    ) -> Self {
        let stack = root
            .map(|node| Frame::Visit {
                node,
                low_ok: false,
                high_ok: false,
            })
            .into_iter()
            .collect();

        Self {
            nodes,
            low,
            high,
            probe,
            stack,
        }
    }

    pub(crate) fn nodes(&self) -> &'a SlotMap<Handle, Node<K, V, D>> {
        self.nodes
    }
}

impl<K, V, D, Q, F> Iterator for CoverIter<'_, K, V, D, Q, F>
where
    F: Fn(&K, &Q) -> Ordering,
{
    type Item = Cover;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, low_ok, high_ok) = match self.stack.pop()? {
                Frame::Emit(h) => return Some(Cover::Entry(h)),
                Frame::Visit {
                    node,
                    low_ok: true,
                    high_ok: true,
                } => return Some(Cover::Subtree(node)),
                Frame::Visit {
                    node,
                    low_ok,
                    high_ok,
                } => (node, low_ok, high_ok),
            };

            let n = &self.nodes[node];
            let vs_low = (!low_ok).then(|| (self.probe)(&n.key, self.low));
            let vs_high = (!high_ok).then(|| (self.probe)(&n.key, self.high));

            // key >= low, key <= high
            let above_low = vs_low.map_or(true, |v| v != Ordering::Less);
            let below_high = vs_high.map_or(true, |v| v != Ordering::Greater);

            // The probe may be coarser than the tree order, so keys on either
            // side of this node can tie with it. Prune the left subtree only
            // when this key is already below "low", and the right subtree only
            // when it is already above "high".
            let visit_left = above_low;
            let visit_right = below_high;

            // Push in reverse so the left subtree is visited first.
            if let Some(right) = n.right.filter(|_| visit_right) {
                self.stack.push(Frame::Visit {
                    node: right,
                    low_ok: low_ok || above_low,
                    high_ok,
                });
            }
            if above_low && below_high && !n.is_routing() {
                self.stack.push(Frame::Emit(node));
            }
            if let Some(left) = n.left.filter(|_| visit_left) {
                self.stack.push(Frame::Visit {
                    node: left,
                    low_ok,
                    high_ok: high_ok || below_high,
                });
            }
        }
    }
}
