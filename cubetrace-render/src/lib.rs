//! Multithreaded CPU ray tracer for [`cubetrace`] voxel worlds.
//!
//! Rendering a frame involves:
//!
//! * a [`Scene`]: the world, its material constants, and the source of surface colors;
//! * a [`camera::Camera`], which produces one ray per pixel;
//! * a [`RenderConfig`], which selects between the deterministic [`Quality::Fast`] mode
//!   and the many-sample [`Quality::Fancy`] mode, and holds every tunable constant;
//! * [`FrameParams`], the animation time and random seed of this particular frame.
//!
//! [`Renderer::render()`] traces every pixel on a pool of worker threads and leaves the
//! result in its [`Framebuffer`].
//!
//! The pieces are also usable individually: [`kernel::trace()`] walks a single ray
//! through the grid, and [`water::water_normal()`] computes the animated water surface.

#![forbid(unsafe_code)]
// Lenience for tests.
#![cfg_attr(test, allow(clippy::float_cmp, clippy::redundant_clone))]

use core::ops::Range;
use core::time::Duration;
use std::time::Instant;

use cubetrace::material::MaterialTable;
use cubetrace::math::ImageSize;
use cubetrace::sampler::MaterialSampler;
use cubetrace::world::VoxelWorld;
use rand::SeedableRng as _;
use rand_xoshiro::Xoshiro256PlusPlus;

pub mod camera;

mod config;
pub use config::{FrameParams, Quality, RenderConfig, ShadingConstants};

mod framebuffer;
pub use framebuffer::Framebuffer;

mod info;
pub use info::RenderInfo;

pub mod kernel;

mod scheduler;
pub use scheduler::RenderProgress;
use scheduler::{FrameScheduler, RunParams, worker_seed};

mod shade;
use shade::{Tracer, WorkerState};

pub mod water;

// -------------------------------------------------------------------------------------------------

/// Everything a frame is rendered from, other than the camera and configuration.
///
/// All of it is only read during rendering, and shared by all workers.
#[derive(Clone, Copy)]
#[expect(clippy::exhaustive_structs)]
pub struct Scene<'a> {
    /// The voxels.
    pub world: &'a VoxelWorld,
    /// Optical constants of each material.
    pub materials: &'a MaterialTable,
    /// Source of surface colors.
    pub sampler: &'a dyn MaterialSampler,
}

impl core::fmt::Debug for Scene<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("world", &self.world)
            .field("materials", &self.materials)
            .finish_non_exhaustive()
    }
}

/// An error indicating that a frame could not be rendered.
#[derive(Debug, displaydoc::Display)]
#[non_exhaustive]
pub enum RenderError {
    /// could not allocate a framebuffer of {size:?} pixels
    OutOfMemory {
        /// The requested size.
        size: ImageSize,
    },
    /// camera viewport {camera:?} does not match the configured resolution {config:?}
    ViewportMismatch {
        /// Size the camera was constructed for.
        camera: ImageSize,
        /// Size given by the [`RenderConfig`].
        config: ImageSize,
    },
    /// could not create render threads
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::OutOfMemory { .. } | RenderError::ViewportMismatch { .. } => None,
            RenderError::ThreadPool(e) => Some(e),
        }
    }
}

/// Renders frames into a [`Framebuffer`], keeping the framebuffer and worker threads
/// from one frame to the next.
#[derive(Debug)]
pub struct Renderer {
    framebuffer: Option<Framebuffer>,
    scheduler: FrameScheduler,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Constructs a renderer. Nothing is allocated until the first frame.
    pub fn new() -> Self {
        Self {
            framebuffer: None,
            scheduler: FrameScheduler::new(),
        }
    }

    /// Renders one frame, replacing the contents of [`Self::framebuffer()`].
    ///
    /// `config` is [repaired](RenderConfig::repair) before use. `progress` is called on
    /// this thread from time to time if [`RenderConfig::report_progress`] is set, and
    /// always once when the frame is complete.
    pub fn render(
        &mut self,
        scene: Scene<'_>,
        config: &RenderConfig,
        camera: &camera::Camera,
        frame: FrameParams,
        progress: impl FnMut(RenderProgress),
    ) -> Result<RenderInfo, RenderError> {
        let start_time = Instant::now();
        let config = config.clone().repair();
        let size = config.size();
        if camera.size() != size {
            return Err(RenderError::ViewportMismatch {
                camera: camera.size(),
                config: size,
            });
        }

        let framebuffer = match self.framebuffer.take() {
            Some(framebuffer) if framebuffer.size() == size => framebuffer,
            _ => {
                log::debug!("allocating framebuffer of {size:?}");
                Framebuffer::new(size)?
            }
        };
        let framebuffer = &*self.framebuffer.insert(framebuffer);

        let tracer = Tracer {
            scene,
            config: &config,
            frame,
        };
        let width = size.width as usize;
        let params = RunParams {
            threads: config.worker_count(),
            pixel_count: framebuffer.len(),
            batch_size: config.batch_size,
            progress_interval: config
                .report_progress
                .then(|| Duration::from_millis(config.progress_interval_ms)),
        };

        let states = self.scheduler.run(
            params,
            |worker| WorkerState {
                rng: Xoshiro256PlusPlus::seed_from_u64(worker_seed(frame.seed, worker)),
                info: RenderInfo::default(),
            },
            |state: &mut WorkerState, batch: Range<usize>| {
                for index in batch {
                    // Both fit in u32 because the size does.
                    let x = (index % width) as u32;
                    let y = (index / width) as u32;
                    let color = tracer.trace_pixel(camera, x, y, state);
                    framebuffer.store(index, color);
                }
            },
            progress,
        )?;

        let mut info: RenderInfo = states.into_iter().map(|state| state.info).sum();
        info.time = start_time.elapsed();
        log::debug!(
            "rendered {quality} frame on {threads} thread(s): {info}",
            quality = config.quality,
            threads = params.threads,
        );
        Ok(info)
    }

    /// The most recently rendered frame, if any.
    pub fn framebuffer(&self) -> Option<&Framebuffer> {
        self.framebuffer.as_ref()
    }
}
