use std::fmt::Debug;

use num_traits::Float;

/// A trait for types that can be used as point coordinates.
///
/// Coordinates are real-valued, so only `f32` and `f64` are supported. This trait is sealed and
/// cannot be implemented for external types.
pub trait IndexableNum: private::Sealed + Float + Debug + Send + Sync + 'static {}

impl IndexableNum for f32 {}

impl IndexableNum for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
