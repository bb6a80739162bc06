#![doc = include_str!("../README.md")]

mod error;
pub mod heap;
pub mod kdtree;
mod metric;
mod r#type;

pub use error::{KdIndexError, Result};
pub use metric::Metric;
pub use r#type::Coord;
