//! Mathematical vocabulary shared by the [`cubetrace`] crates: grid and free coordinates,
//! cube faces and axes, axis-aligned boxes, rays, colors, and the optics formulas used
//! by the shading model.
//!
//! Do not depend on this library directly unless you only need the math;
//! its contents are re-exported from `cubetrace`.
//!
//! [`cubetrace`]: https://crates.io/crates/cubetrace/

#![forbid(unsafe_code)]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![warn(clippy::missing_inline_in_public_items)]

pub mod math;

pub mod optics;

mod ray;
pub use ray::Ray;

// reexport for convenience of our tests and dependents
#[doc(hidden)]
pub use euclid;
