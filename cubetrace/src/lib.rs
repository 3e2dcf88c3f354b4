//! Voxel world data for the cubetrace software ray tracer.
//!
//! This crate holds everything the ray tracer reads but never writes:
//!
//! * [`world::VoxelWorld`], a grid of [`material::Material`]s partitioned into chunks
//!   which track how many of their cells are non-empty;
//! * [`material::MaterialTable`], the per-material optical constants;
//! * [`sampler::MaterialSampler`], the interface by which surface colors are looked up,
//!   with a flat-color [`sampler::PaletteSampler`] and an image-based
//!   [`atlas::TextureAtlas`];
//! * [`content`], procedural worlds for demonstrations and tests.
//!
//! The ray tracer itself lives in the `cubetrace-render` crate.

#![forbid(unsafe_code)]
// Lenience for tests.
#![cfg_attr(test, allow(clippy::float_cmp, clippy::redundant_clone))]

pub use cubetrace_base::{Ray, math, optics};

pub mod atlas;
pub mod content;
pub mod material;
pub mod sampler;
pub mod world;

// reexport for convenience of our tests and dependents
#[doc(hidden)]
pub use cubetrace_base::euclid;
