//! Whole-frame rendering scenarios.

use cubetrace::content::{demo_world, spawn_point};
use cubetrace::euclid::{point3, vec3};
use cubetrace::material::{Material, MaterialTable};
use cubetrace::math::{Cube, GridSize, ImageSize};
use cubetrace::sampler::{PaletteSampler, Side};
use cubetrace::world::VoxelWorld;
use cubetrace_render::camera::Camera;
use cubetrace_render::{
    FrameParams, Quality, RenderConfig, RenderError, RenderProgress, Renderer, Scene,
    ShadingConstants,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

struct Fixture {
    world: VoxelWorld,
    materials: MaterialTable,
    sampler: PaletteSampler,
}

impl Fixture {
    fn new(world: VoxelWorld) -> Self {
        Self {
            world,
            materials: MaterialTable::default(),
            sampler: PaletteSampler::default(),
        }
    }

    fn scene(&self) -> Scene<'_> {
        Scene {
            world: &self.world,
            materials: &self.materials,
            sampler: &self.sampler,
        }
    }

    fn render(&self, renderer: &mut Renderer, config: &RenderConfig, camera: &Camera) -> Vec<u8> {
        renderer
            .render(
                self.scene(),
                config,
                camera,
                FrameParams::new(1.5, 12345),
                |_| {},
            )
            .unwrap();
        renderer.framebuffer().unwrap().to_rgba_top_down()
    }
}

/// A small image with the given settings changed.
fn small(mut config: RenderConfig, options_fn: impl FnOnce(&mut RenderConfig)) -> RenderConfig {
    config.width = 32;
    config.height = 24;
    options_fn(&mut config);
    config
}

fn pixels(bytes: &[u8]) -> impl Iterator<Item = [u8; 4]> + '_ {
    bytes.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
}

#[rstest]
fn empty_world_looking_up_is_all_sky(#[values(Quality::Fast, Quality::Fancy)] quality: Quality) {
    let world = VoxelWorld::new(GridSize::new(2, 2, 2), 0).unwrap();
    let eye = world.center_at_height(16.0);
    let fixture = Fixture::new(world);
    let config = small(RenderConfig::fast(), |c| {
        c.quality = quality;
        c.threads = 2;
        c.samples_per_pixel = 4;
        c.max_bounces = 1;
    });
    let camera = Camera::looking(eye, vec3(0.0, 1.0, 0.0), 60.0, config.size()).unwrap();

    let image = fixture.render(&mut Renderer::new(), &config, &camera);

    let [r, g, b] = config.shading.sky_color.to_u8();
    assert_eq!(image.len(), 32 * 24 * 4);
    for pixel in pixels(&image) {
        assert_eq!(pixel, [r, g, b, 255]);
    }
}

#[rstest]
fn block_filling_view_is_its_color(#[values(1, 3)] threads: usize) {
    let mut world = VoxelWorld::new(GridSize::new(1, 1, 1), 0).unwrap();
    world.set(Cube::new(8, 8, 3), Material::Stone).unwrap();
    let fixture = Fixture::new(world);
    let config = small(RenderConfig::fast(), |c| {
        c.threads = threads;
        c.shading = ShadingConstants::UNLIT;
    });
    let camera = Camera::looking(
        point3(8.5, 8.5, 2.9),
        vec3(0.0, 0.0, 1.0),
        20.0,
        config.size(),
    )
    .unwrap();

    let image = fixture.render(&mut Renderer::new(), &config, &camera);

    let expected = PaletteSampler::default()
        .color(Material::Stone, Side::Side)
        .to_rgb()
        .with_alpha_one()
        .to_u8();
    for pixel in pixels(&image) {
        assert_eq!(pixel, expected);
    }
}

#[test]
fn fast_and_fancy_agree_with_one_sample_and_bounce() {
    let fixture = Fixture::new(demo_world(3).unwrap());
    let fast = small(RenderConfig::fast(), |c| {
        c.max_bounces = 1;
        c.threads = 2;
    });
    let fancy = small(RenderConfig::fancy(), |c| {
        c.samples_per_pixel = 1;
        c.max_bounces = 1;
        c.threads = 2;
        c.report_progress = false;
    });
    let camera = Camera::from_yaw_pitch(
        spawn_point(&fixture.world),
        30.0,
        -20.0,
        70.0,
        fast.size(),
    )
    .unwrap();
    let mut renderer = Renderer::new();

    let fast_image = fixture.render(&mut renderer, &fast, &camera);
    let fancy_image = fixture.render(&mut renderer, &fancy, &camera);
    assert_eq!(fast_image, fancy_image);
}

#[test]
fn single_threaded_rerender_is_identical() {
    let fixture = Fixture::new(demo_world(5).unwrap());
    let config = small(RenderConfig::fancy(), |c| {
        c.threads = 1;
        c.samples_per_pixel = 3;
        c.shadow_samples = 2;
        c.report_progress = false;
    });
    let camera = Camera::from_yaw_pitch(
        spawn_point(&fixture.world),
        200.0,
        -30.0,
        70.0,
        config.size(),
    )
    .unwrap();

    let first = fixture.render(&mut Renderer::new(), &config, &camera);
    let mut renderer = Renderer::new();
    let second = fixture.render(&mut renderer, &config, &camera);
    let third = fixture.render(&mut renderer, &config, &camera);
    assert_eq!(first, second);
    assert_eq!(second, third);
}

/// Fast quality uses randomness only to recover from degenerate geometry, so threading
/// may change at most a few pixels.
#[test]
fn threads_do_not_change_fast_image() {
    let fixture = Fixture::new(demo_world(8).unwrap());
    let config = small(RenderConfig::fast(), |_| {});
    let camera = Camera::from_yaw_pitch(
        spawn_point(&fixture.world),
        45.0,
        -15.0,
        70.0,
        config.size(),
    )
    .unwrap();

    let serial = fixture.render(
        &mut Renderer::new(),
        &small(config.clone(), |c| c.threads = 1),
        &camera,
    );
    let parallel = fixture.render(
        &mut Renderer::new(),
        &small(config, |c| {
            c.threads = 4;
            c.batch_size = 7;
        }),
        &camera,
    );
    let differing = pixels(&serial)
        .zip(pixels(&parallel))
        .filter(|(a, b)| a != b)
        .count();
    assert!(differing <= 8, "{differing} pixels differ");
}

#[test]
fn info_counts_pixels_and_samples() {
    let fixture = Fixture::new(demo_world(1).unwrap());
    let config = small(RenderConfig::fancy(), |c| {
        c.samples_per_pixel = 2;
        c.threads = 3;
        c.report_progress = true;
        c.progress_interval_ms = 1;
    });
    let camera = Camera::from_yaw_pitch(
        spawn_point(&fixture.world),
        0.0,
        -10.0,
        70.0,
        config.size(),
    )
    .unwrap();
    let mut progress = Vec::new();
    let info = Renderer::new()
        .render(
            fixture.scene(),
            &config,
            &camera,
            FrameParams::default(),
            |p| progress.push(p),
        )
        .unwrap();

    assert_eq!(info.pixels, 32 * 24);
    assert_eq!(info.samples, 32 * 24 * 2);
    assert!(info.kernel_steps >= info.samples);
    assert_eq!(info.degenerate_camera_rays, 0);
    assert_eq!(
        progress.last().map(RenderProgress::fraction),
        Some(1.0),
        "{progress:?}"
    );
}

#[test]
fn viewport_mismatch() {
    let fixture = Fixture::new(demo_world(1).unwrap());
    let config = small(RenderConfig::fast(), |_| {});
    let camera = Camera::looking(
        point3(10.0, 40.0, 10.0),
        vec3(1.0, 0.0, 0.0),
        70.0,
        ImageSize::new(10, 10),
    )
    .unwrap();
    let error = Renderer::new()
        .render(
            fixture.scene(),
            &config,
            &camera,
            FrameParams::default(),
            |_| {},
        )
        .unwrap_err();
    assert!(
        matches!(error, RenderError::ViewportMismatch { .. }),
        "{error:?}"
    );
}

#[test]
fn horizon_shows_sky_and_world() {
    let fixture = Fixture::new(demo_world(2).unwrap());
    let config = small(RenderConfig::fast(), |_| {});
    let camera = Camera::from_yaw_pitch(
        spawn_point(&fixture.world),
        90.0,
        0.0,
        90.0,
        config.size(),
    )
    .unwrap();
    let image = fixture.render(&mut Renderer::new(), &config, &camera);
    let [r, g, b] = config.shading.sky_color.to_u8();
    let sky = [r, g, b, 255];
    let sky_pixels = pixels(&image).filter(|&p| p == sky).count();
    assert!(sky_pixels > 0);
    assert!(sky_pixels < 32 * 24);
}
