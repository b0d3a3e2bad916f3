//! Generic ordered search trees, and the spatial indexes built on them.
//!
//! The core is a single binary search tree engine, [`Tree`], parametrised by
//! a key [`Compare`] ordering, a [`Balance`] strategy ([`Avl`] or
//! [`Plain`]), a [`Storage`] strategy ([`Inner`] or [`Leaf`]) and an optional
//! per-node [`Augment`] summary. Nodes live in an arena and are addressed by
//! generational [`Handle`]s.
//!
//! ```
//! use ordtree::AvlTree;
//!
//! let mut t = AvlTree::new();
//! for v in [5, 3, 8, 1, 4, 7, 9] {
//!     t.insert(v, v * 10).unwrap();
//! }
//!
//! assert_eq!(t.height(), 3);
//! assert_eq!(t.get(&4), Some(&40));
//!
//! let keys = t.range_query(&3, &7).map(|(k, _)| *k).collect::<Vec<_>>();
//! assert_eq!(keys, [3, 4, 5, 7]);
//! ```
//!
//! Two indexes are composed from the engine:
//!
//! * [`RangeTree`]: orthogonal range queries over `D`-dimensional points.
//! * [`AabbTree`]: overlap queries over intervals or axis-aligned bounding
//!   boxes, pruned by a subtree maximum augmentation.
//!
//! Operations emit [`tracing`] events; no subscriber is installed by this
//! crate.

#![deny(rustdoc::broken_intra_doc_links, rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::explicit_iter_loop,
    clippy::future_not_send,
    clippy::todo,
    clippy::use_self,
    missing_debug_implementations,
    unused_crate_dependencies
)]

mod aabb;
mod augment;
mod balance;
mod bound;
mod compare;
mod error;
pub mod iter;
mod node;
mod range_tree;
mod storage;
mod tree;

#[cfg(test)]
mod dot;
#[cfg(test)]
mod test_utils;

pub use aabb::{AabbTree, Extract, SubtreeMax};
pub use augment::Augment;
pub use balance::{Avl, Balance, Plain};
pub use bound::{ByLowerBound, LowerBound};
pub use compare::{Axis, Compare, Natural};
pub use error::{Result, TreeError};
pub use node::Handle;
pub use range_tree::RangeTree;
pub use storage::{Inner, Leaf, Storage};
pub use tree::{AvlTree, BstTree, DuplicatePolicy, LeafAvlTree, LeafBstTree, Tree};

// The benches depend on criterion, which is otherwise unused by the lib test
// target and would trip `unused_crate_dependencies`.
#[cfg(test)]
use criterion as _;
