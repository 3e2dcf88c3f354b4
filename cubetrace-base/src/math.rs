//! Mathematical utilities and decisions.

mod aab;
pub use aab::*;
mod axis;
pub use axis::*;
mod color;
pub use color::*;
mod coord;
pub use coord::*;
mod cube;
pub use cube::Cube;
mod face;
pub use face::*;

// We make an assumption in several places that `usize` is at least 32 bits.
#[cfg(target_pointer_width = "16")]
compile_error!("cubetrace does not support platforms with less than 32-bit `usize`");

/// Returns the fractional part of `value` in the range `0.0..1.0`, for negative inputs too.
///
/// ```
/// use cubetrace_base::math::fract_positive;
///
/// assert_eq!(fract_positive(2.25), 0.25);
/// assert_eq!(fract_positive(-0.25), 0.75);
/// ```
#[inline]
pub fn fract_positive(value: FreeCoordinate) -> FreeCoordinate {
    value.rem_euclid(1.0)
}
