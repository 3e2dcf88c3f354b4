//! Choosing and constructing what is rendered.

use std::path::Path;

use anyhow::Context as _;

use cubetrace::atlas::TextureAtlas;
use cubetrace::content::{DEMO_SEA_LEVEL, demo_world, flat_world};
use cubetrace::math::GridSize;
use cubetrace::sampler::{MaterialSampler, PaletteSampler};
use cubetrace::world::VoxelWorld;

/// Which world to generate.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
#[non_exhaustive]
pub enum SceneSource {
    /// Noise-generated terrain with water, a glass tower, and a tree.
    #[default]
    Demo,
    /// An empty world with a log floor, surrounded by sea at the demo world's sea level.
    Flat,
}

impl SceneSource {
    /// Generates the world. `seed` affects only [`SceneSource::Demo`].
    pub fn create_world(self, seed: u64) -> Result<VoxelWorld, anyhow::Error> {
        let world = match self {
            SceneSource::Demo => demo_world(seed),
            SceneSource::Flat => flat_world(GridSize::new(4, 4, 4), DEMO_SEA_LEVEL),
        }
        .with_context(|| format!("failed to generate {self} world"))?;
        log::info!("{self} world: {composition}", composition = world.composition());
        Ok(world)
    }
}

/// Returns the [`MaterialSampler`] to color surfaces with: the texture atlas at `atlas_path`
/// if given, and flat colors otherwise.
pub fn load_sampler(atlas_path: Option<&Path>) -> Result<Box<dyn MaterialSampler>, anyhow::Error> {
    Ok(match atlas_path {
        Some(path) => {
            let atlas = TextureAtlas::from_path(path)
                .with_context(|| format!("could not load texture atlas {}", path.display()))?;
            log::debug!("loaded texture atlas {atlas:?}");
            Box::new(atlas)
        }
        None => Box::new(PaletteSampler::default()),
    })
}
