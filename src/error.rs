use std::collections::TryReserveError;
use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum KdIndexError {
    /// Storage for the index or a query heap could not be allocated.
    #[error("Allocation failure: {0}")]
    Allocation(#[from] TryReserveError),

    /// A metric label that is not one of the supported metrics.
    #[error("Unrecognized distance metric `{0}`; expected `manhattan` or `squared_euclidean`.")]
    UnknownMetric(String),

    /// A point subset above the leaf threshold had zero spread on every
    /// axis, so no splitting axis exists.
    #[error("Cannot split {count} identical points; no axis has positive spread.")]
    DegenerateSplit {
        /// Number of points in the unsplittable subset.
        count: usize,
    },

    /// The coordinate buffer length is not a multiple of the dimensionality.
    #[error("Point buffer of length {len} is not a multiple of dimensionality {dims}.")]
    InvalidBufferLength {
        /// Length of the provided buffer.
        len: usize,
        /// Configured dimensionality.
        dims: usize,
    },

    /// Dimensionality must be at least 1.
    #[error("Dimensionality must be at least 1.")]
    ZeroDimensions,

    /// Leaf size must be at least 1.
    #[error("Leaf size must be at least 1.")]
    ZeroLeafSize,

    /// A query point or radii vector whose length differs from the tree's
    /// dimensionality.
    #[error("Expected {expected} coordinates, got {actual}.")]
    DimensionMismatch {
        /// The tree's dimensionality.
        expected: usize,
        /// Length of the slice passed by the caller.
        actual: usize,
    },

    /// A range query radius below zero.
    #[error("Range radii must be non-negative.")]
    NegativeRadius,
}

pub type Result<T> = std::result::Result<T, KdIndexError>;
