//! Command-line front end for the cubetrace ray tracer.
//!
//! This library contains the pieces of the `cubetrace` binary which are worth testing
//! on their own: log and progress bar setup, the settings file, scene construction,
//! and writing rendered frames to PNG files.

#![forbid(unsafe_code)]
// Lenience for tests.
#![cfg_attr(test, allow(clippy::float_cmp, clippy::redundant_clone))]

mod config_files;
pub use config_files::{SettingsArgs, load_config};

pub mod logging;
pub mod record;

mod scene;
pub use scene::{SceneSource, load_sampler};
