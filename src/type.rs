use std::fmt::Debug;

use num_traits::Float;

/// A trait for scalar types usable as point coordinates.
///
/// This trait is sealed and cannot be implemented for external types: the
/// flat coordinate layout and the query arithmetic only make sense for the
/// built-in IEEE float types.
pub trait Coord: private::Sealed + Float + Debug + Default + Send + Sync {}

impl Coord for f32 {}
impl Coord for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
