/// Per-node summary data maintained bottom-up by the tree engine.
///
/// After every structural change (insertion, erasure, rotation) the engine
/// recomputes [`Augment::summarize`] for each node whose subtree changed,
/// children first, so the summary of a node always reflects its current
/// subtree.
///
/// The unit type is the "no augmentation" implementation.
pub trait Augment<K, V> {
    /// The summary stored in every node.
    type Data;

    /// Compute the summary of a node holding `key` (and `value`, unless it is
    /// a routing node) from the summaries of its children, if any.
    fn summarize(
        &self,
        key: &K,
        value: Option<&V>,
        left: Option<&Self::Data>,
        right: Option<&Self::Data>,
    ) -> Self::Data;
}

impl<K, V> Augment<K, V> for () {
    type Data = ();

    #[inline]
    fn summarize(&self, _key: &K, _value: Option<&V>, _left: Option<&()>, _right: Option<&()>) {}
}
