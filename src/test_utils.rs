use std::fmt::Debug;

use proptest::prelude::*;

use crate::{
    augment::Augment, balance::Balance, compare::Compare, dot::print_dot, iter::Iter,
    node::Handle, storage::Storage, tree::Tree,
};

const KEY_MAX: u16 = 64;
const RANGE_MAX: u32 = 20;

/// Generate keys from a small domain, so that random operations frequently
/// act on the same key.
pub(crate) fn arbitrary_key() -> impl Strategy<Value = u16> {
    0..KEY_MAX
}

/// Generate valid closed intervals with bounds from [0..[`RANGE_MAX`]).
pub(crate) fn arbitrary_interval() -> impl Strategy<Value = (u32, u32)> {
    (0..RANGE_MAX, 0..RANGE_MAX).prop_map(|(a, b)| (a.min(b), a.max(b)))
}

/// Assert every structural invariant of `t`, panicking with the offending node
/// and a graphviz rendering of the tree if one does not hold.
pub(crate) fn validate_tree_structure<K, V, C, B, S, A>(t: &Tree<K, V, C, B, S, A>)
where
    K: Debug,
    C: Compare<K>,
    B: Balance,
    S: Storage,
    A: Augment<K, V>,
    A::Data: PartialEq + Debug,
{
    // Only rendered when an assertion fails.
    let dot = || print_dot(t);

    // Size consistency.
    assert_eq!(t.len(), t.iter().count(), "length mismatch\n{}", dot());

    let root = match t.root {
        Some(v) => v,
        None => {
            assert!(t.nodes.is_empty(), "empty tree with allocated nodes");
            return;
        }
    };
    assert_eq!(t.nodes[root].parent, None, "root has a parent\n{}", dot());

    // Perform a pre-order traversal of the tree.
    let mut stack = vec![root];
    let mut visited = 0;
    while let Some(h) = stack.pop() {
        visited += 1;
        let n = &t.nodes[h];

        // Prepare to visit the children
        stack.extend(n.left.iter().chain(n.right.iter()));

        // Invariant 1: children link back to this node.
        for child in [n.left, n.right].into_iter().flatten() {
            assert_eq!(
                t.nodes[child].parent,
                Some(h),
                "broken parent link under {:?}\n{}",
                n.key,
                dot()
            );
        }

        // Invariant 2: every key in the left subtree orders before this
        // node's key, and every key in the right subtree after it. Routing
        // nodes also admit an equal key on their left.
        let left_ok = |v: &K| match t.cmp.compare(v, &n.key) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Equal => n.is_routing(),
            std::cmp::Ordering::Greater => false,
        };
        if let Some(v) = subtree_keys(t, n.left).into_iter().find(|&v| !left_ok(v)) {
            panic!("left subtree key {v:?} out of order under {:?}\n{}", n.key, dot());
        }
        if let Some(v) = subtree_keys(t, n.right)
            .into_iter()
            .find(|&v| !t.cmp.compare(v, &n.key).is_gt())
        {
            panic!("right subtree key {v:?} out of order under {:?}\n{}", n.key, dot());
        }

        // Invariant 3: the height of this node is always +1 of the
        // maximum child height.
        let left_height = t.height_of(n.left);
        let right_height = t.height_of(n.right);
        let want_height = 1 + left_height.max(right_height);
        assert_eq!(
            n.height, want_height,
            "expect node with key {:?} to have height {}, has {}\n{}",
            n.key,
            want_height,
            n.height,
            dot(),
        );

        // Invariant 4: the absolute height difference between the left
        // subtree and right subtree (the "balance factor") cannot exceed 1.
        if B::SELF_BALANCING {
            let balance = (i64::from(left_height) - i64::from(right_height)).abs();
            assert!(balance <= 1, "balance={balance}, key={:?}\n{}", n.key, dot());
        }

        // Invariant 5: the augmentation summary reflects the current
        // subtree.
        let want_data = t.augment.summarize(
            &n.key,
            n.value.as_ref(),
            n.left.map(|v| &t.nodes[v].data),
            n.right.map(|v| &t.nodes[v].data),
        );
        assert_eq!(n.data, want_data, "stale summary at key {:?}\n{}", n.key, dot());

        // Invariant 6: leaf storage keeps entries at the leaves and joins
        // them with routing nodes of exactly two children.
        if S::VALUES_AT_LEAVES {
            assert_eq!(
                n.is_routing(),
                !n.is_leaf(),
                "misplaced entry at {:?}\n{}",
                n.key,
                dot()
            );
            if n.is_routing() {
                assert!(n.left.is_some() && n.right.is_some(), "{}", dot());
            }
        } else {
            assert!(!n.is_routing(), "routing node in inner storage\n{}", dot());
        }
    }

    // Invariant 7: no node is unreachable from the root.
    assert_eq!(visited, t.nodes.len(), "unreachable nodes\n{}", dot());
}

/// The keys of all entries in the subtree rooted at `node`.
fn subtree_keys<K, V, C, B, S, A>(t: &Tree<K, V, C, B, S, A>, node: Option<Handle>) -> Vec<&K>
where
    A: Augment<K, V>,
{
    Iter::new(&t.nodes, node).map(|(k, _)| k).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::AvlTree;

    #[test]
    #[should_panic(expected = "digraph")]
    fn test_validate_renders_tree_on_failure() {
        let mut t = AvlTree::new();
        for v in [2, 1, 3] {
            t.insert(v, ()).unwrap();
        }
        validate_tree_structure(&t);

        let root = t.root.unwrap();
        t.nodes[root].height = 7;
        validate_tree_structure(&t);
    }
}
