//! Error types returned by tree operations.

/// A specialised [`Result`](std::result::Result) for tree operations.
pub type Result<T, E = TreeError> = std::result::Result<T, E>;

/// Recoverable conditions reported to the caller of a tree operation.
///
/// None of these leave the tree in a modified state: an operation that
/// returns an error has not mutated the structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The operation needs at least one entry, but the tree is empty.
    #[error("tree is empty")]
    EmptyTree,

    /// The key or handle does not identify an entry in the tree.
    #[error("key not found")]
    NotFound,

    /// The key is already present and the tree rejects duplicates.
    #[error("duplicate key")]
    DuplicateKey,

    /// A range tree was configured with an unusable dimensionality, or
    /// queried with corners that are inverted on some axis.
    #[error("invalid dimension {axis}: {reason}")]
    InvalidDimension {
        /// The offending axis (or the requested dimensionality).
        axis: usize,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// An interval's lower bound is greater than its upper bound, or the two
    /// bounds cannot be ordered at all.
    #[error("invalid interval bounds on axis {axis}")]
    InvalidBounds {
        /// The axis the bounds were extracted for.
        axis: usize,
    },
}
