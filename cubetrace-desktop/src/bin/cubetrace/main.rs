//! Binary for the cubetrace renderer.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use std::time::Instant;

use anyhow::Context as _;
use clap::Parser as _;

use cubetrace::content::spawn_point;
use cubetrace::material::MaterialTable;
use cubetrace_desktop::{load_sampler, logging, record};
use cubetrace_render::camera::Camera;
use cubetrace_render::{Renderer, Scene};

mod command_options;
use command_options::{CameraPositionArg, CubetraceArgs};

static TITLE: &str = "cubetrace";

fn main() -> Result<(), anyhow::Error> {
    // Parse and transform command-line arguments.
    let options = CubetraceArgs::parse();
    logging::install(&options.logging)?;

    // After setting up logging, do other option interpretation steps.
    let config = options.apply_to_config(options.settings.clone().build_config()?);
    let record_options = options.record_options()?;

    let start_time = Instant::now();
    let world = options.scene.create_world(options.seed)?;
    let sampler = load_sampler(options.atlas.as_deref())?;
    let materials = MaterialTable::default();
    log::debug!(
        "Created world ({:.3} s)",
        start_time.elapsed().as_secs_f32()
    );

    let eye = match options.camera {
        Some(CameraPositionArg(eye)) => eye,
        None => spawn_point(&world),
    };
    let camera = Camera::from_yaw_pitch(eye, options.yaw, options.pitch, options.fov, config.size())
        .context("invalid camera options")?;
    log::debug!("{camera:?}");

    let scene = Scene {
        world: &world,
        materials: &materials,
        sampler: &*sampler,
    };
    let info = record::record_main(
        &mut Renderer::new(),
        scene,
        &config,
        &camera,
        options.seed,
        &record_options,
    )?;
    log::info!(
        "Rendered {quality} in {time:.3} s",
        quality = config.quality,
        time = info.time.as_secs_f32()
    );

    Ok(())
}
