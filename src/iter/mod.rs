//! Iterators over the entries of a [`Tree`](crate::Tree) and the trees built
//! on top of it.

mod cover;
mod overlaps;
mod owned_iter;
mod range;
mod ref_iter;
mod structural;

pub(crate) use cover::*;
pub use overlaps::*;
pub use owned_iter::*;
pub use range::*;
pub use ref_iter::*;
pub use structural::*;
