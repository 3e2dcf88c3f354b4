//! Rendering frames to image files.

use anyhow::Context as _;

use cubetrace_render::camera::Camera;
use cubetrace_render::{FrameParams, RenderConfig, RenderInfo, Renderer, Scene};

use crate::logging;

mod options;
pub use options::*;

mod write_png;
pub use write_png::write_png;

/// Renders every frame `options` asks for and writes each to its file.
///
/// Frame `n` of an animation is rendered with random seed `seed + n`, so that noise
/// differs between frames but the whole sequence is reproducible.
pub fn record_main(
    renderer: &mut Renderer,
    scene: Scene<'_>,
    config: &RenderConfig,
    camera: &Camera,
    seed: u64,
    options: &RecordOptions,
) -> Result<RenderInfo, anyhow::Error> {
    let frames = options.frame_range();

    let drawing_progress_bar = options.animation.as_ref().map(|animation| {
        log::info!(
            "recording {count} frames ({duration:.2?} of animation)",
            count = animation.frame_count,
            duration = animation.total_duration(),
        );
        let pb = logging::new_progress_bar(frames.len() as u64);
        pb.set_prefix("Frames");
        pb
    });

    let mut total_info = RenderInfo::default();
    for frame in frames {
        let path = options.path_for_frame(frame);
        let frame_params =
            FrameParams::new(options.frame_time(frame), seed.wrapping_add(frame as u64));

        let info = if config.report_progress {
            let pixel_bar = logging::new_progress_bar(config.pixel_count() as u64);
            pixel_bar.set_prefix("Drawing");
            let info = renderer.render(scene, config, camera, frame_params, |progress| {
                pixel_bar.set_length(progress.total as u64);
                pixel_bar.set_position(progress.completed as u64);
            });
            pixel_bar.finish_and_clear();
            info
        } else {
            renderer.render(scene, config, camera, frame_params, |_| {})
        }
        .with_context(|| format!("failed to render frame {frame}"))?;

        let framebuffer = renderer
            .framebuffer()
            .context("renderer produced no framebuffer")?;
        write_png(&path, framebuffer)
            .with_context(|| format!("failed to write {path}", path = path.display()))?;
        log::info!("wrote {path}", path = path.display());

        if let Some(pb) = &drawing_progress_bar {
            pb.inc(1);
        }
        total_info += info;
    }

    if let Some(pb) = drawing_progress_bar {
        pb.finish();
    }
    log::debug!("recording complete: {total_info}");
    Ok(total_info)
}
