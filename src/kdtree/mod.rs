//! An implementation of an immutable k-d tree over k-dimensional points.

#![warn(missing_docs)]

mod builder;
mod index;
mod query;

pub use builder::KdTreeBuilder;
pub use index::KdTree;
pub use query::Neighbor;
