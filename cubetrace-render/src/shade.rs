//! The shading model: following a camera ray through reflections, refractions, and
//! shadows to a color.

use cubetrace::Ray;
use cubetrace::material::Material;
use cubetrace::math::{Cube, Face6, FreeCoordinate, FreePoint, FreeVector, Rgb, Rgba};
use cubetrace::optics::{self, Interface};
use cubetrace::sampler::Side;
use euclid::Vector2D;
use rand::Rng as _;
use rand_distr::{Distribution as _, UnitBall, UnitSphere};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::camera::{Camera, PIXEL_CENTER};
use crate::config::{FrameParams, RenderConfig};
use crate::kernel::{self, Crossing, Surface};
use crate::water::water_normal;
use crate::{RenderInfo, Scene};

/// Upper bound on the number of transparent surfaces a shadow ray passes through.
const MAX_SHADOW_CROSSINGS: u32 = 64;

/// State belonging to one worker thread.
#[derive(Clone, Debug)]
pub(crate) struct WorkerState {
    pub rng: Xoshiro256PlusPlus,
    pub info: RenderInfo,
}

/// What to do after a ray has interacted with something.
enum Step {
    /// The ray's color is determined.
    Finish(Rgb),
    /// Light `emitted` reaches the viewer, and the ray continues as `ray` with its
    /// further contributions multiplied by `filter`.
    Continue { ray: Ray, emitted: Rgb, filter: Rgb },
}

/// Everything needed to shade rays in one frame. Shared read-only by all workers.
#[derive(Clone, Copy)]
pub(crate) struct Tracer<'a> {
    pub scene: Scene<'a>,
    pub config: &'a RenderConfig,
    pub frame: FrameParams,
}

impl Tracer<'_> {
    /// Computes the color of one pixel, averaging its samples.
    ///
    /// `y` counts rows from the bottom of the image.
    pub fn trace_pixel(&self, camera: &Camera, x: u32, y: u32, state: &mut WorkerState) -> Rgb {
        state.info.pixels += 1;
        let samples = self.config.effective_samples();
        let stochastic = self.config.is_stochastic();
        let mut sum = Rgb::ZERO;
        for _ in 0..samples {
            let offset = if stochastic {
                Vector2D::new(state.rng.random::<f64>(), state.rng.random::<f64>())
            } else {
                PIXEL_CENTER
            };
            let Some(ray) = camera.ray_for_pixel(x, y, offset) else {
                state.info.degenerate_camera_rays += 1;
                return Rgb::ZERO;
            };
            state.info.samples += 1;
            sum += self.trace_ray(ray, 0, 0, state);
        }
        sum * (samples as f32).recip()
    }

    /// Follows a ray from bounce number `first_bounce` until it finishes or the bounce
    /// limit is reached. `depth` is the number of enclosing reflect/refract splits.
    pub fn trace_ray(
        &self,
        mut ray: Ray,
        depth: u32,
        first_bounce: u32,
        state: &mut WorkerState,
    ) -> Rgb {
        let mut influence = Rgb::ONE;
        let mut accumulated = Rgb::ZERO;
        for bounce in first_bounce..self.config.max_bounces {
            let traversal = kernel::trace(self.scene.world, ray, &mut state.rng);
            state.info.kernel_steps += u64::from(traversal.steps);
            state.info.perturbations += u64::from(traversal.perturbations);

            let step = match traversal.crossing {
                Crossing::Escaped {
                    point, direction, ..
                } => self.escaped(point, direction, bounce, depth, state),
                Crossing::Surface(surface) => {
                    if surface.previous.is_liquid() {
                        influence *= self.water_transmittance(surface.distance);
                    }
                    self.surface(&surface, ray.direction, bounce, depth, state)
                }
            };
            match step {
                Step::Finish(color) => return accumulated + influence * color,
                Step::Continue {
                    ray: next_ray,
                    emitted,
                    filter,
                } => {
                    accumulated += influence * emitted;
                    influence *= filter;
                    ray = next_ray;
                }
            }
        }
        state.info.bounce_limit_terminations += 1;
        accumulated
    }

    // ---------------------------------------------------------------------------------------------

    /// Resolves a ray which left the world: the sky, the sun, or the sea beyond the world.
    fn escaped(
        &self,
        point: FreePoint,
        direction: FreeVector,
        bounce: u32,
        depth: u32,
        state: &mut WorkerState,
    ) -> Step {
        let constants = &self.config.shading;
        let sea_level = FreeCoordinate::from(self.scene.world.sea_level());

        if point.y < sea_level {
            return Step::Finish(constants.deep_water_color);
        }
        if direction.y >= 0.0 {
            let sun_visible = bounce == 0
                && direction.y > 0.0
                && direction.dot(constants.light_direction) > constants.sun_angular_radius.cos();
            return Step::Finish(if sun_visible {
                constants.sun_color
            } else {
                constants.sky_color
            });
        }

        // Heading down toward the sea surrounding the world.
        let t = ((sea_level - point.y) / direction.y).max(0.0);
        let mut surface_point = point + direction * t;
        surface_point.y = sea_level;
        let normal = water_normal(Face6::PY, surface_point, self.frame.time, constants);
        let water_index = self.scene.materials[Material::Water].refractive_index;
        let interface = Interface::new(direction, normal, 1.0, water_index);
        let reflected = Ray::new(surface_point, interface.reflected);
        let reflectance = interface.reflectance as f32;

        if self.config.is_stochastic() {
            if state.rng.random_bool(interface.reflectance.clamp(0.0, 1.0)) {
                Step::Continue {
                    ray: reflected,
                    emitted: Rgb::ZERO,
                    filter: Rgb::ONE,
                }
            } else {
                Step::Finish(constants.deep_water_color)
            }
        } else {
            let reflected_color = if depth < self.config.max_recursion_depth {
                self.trace_ray(reflected, depth + 1, bounce + 1, state)
            } else {
                state.info.recursion_limit_terminations += 1;
                constants.sky_color
            };
            Step::Finish(
                reflected_color * reflectance + constants.deep_water_color * (1.0 - reflectance),
            )
        }
    }

    /// Resolves a ray crossing into a cube of a different material.
    fn surface(
        &self,
        surface: &Surface,
        incident: FreeVector,
        bounce: u32,
        depth: u32,
        state: &mut WorkerState,
    ) -> Step {
        let color = self.surface_color(surface.next, surface.face, surface.point);
        if color.is_opaque() {
            self.opaque(surface, color.to_rgb(), incident, bounce, state)
        } else {
            self.transparent(surface, color, incident, bounce, depth, state)
        }
    }

    fn opaque(
        &self,
        surface: &Surface,
        base: Rgb,
        incident: FreeVector,
        bounce: u32,
        state: &mut WorkerState,
    ) -> Step {
        let constants = &self.config.shading;
        let properties = &self.scene.materials[surface.next];
        let normal: FreeVector = surface.face.normal_vector();
        let light = constants.light_direction;

        let n_dot_l = normal.dot(light);
        let visibility = if constants.sun_intensity > 0.0 && n_dot_l > 0.0 {
            self.visibility(surface.point, state)
        } else {
            0.0
        };
        let diffuse = properties.diffuse as f32 * n_dot_l.max(0.0) as f32;
        let highlight = optics::reflect(-light, normal)
            .dot(-incident)
            .max(0.0)
            .powf(f64::from(constants.specular_exponent)) as f32
            * properties.specular as f32;
        let direct = base * (constants.ambient + diffuse * visibility * constants.sun_intensity)
            + Rgb::from_luminance(highlight * visibility * constants.sun_intensity);

        if !self.config.is_stochastic() || bounce + 1 >= self.config.max_bounces {
            return Step::Finish(direct);
        }

        let (direction, filter) =
            if state.rng.random_bool(properties.specular_probability().clamp(0.0, 1.0)) {
                (optics::reflect(incident, normal), base.lerp(Rgb::ONE, 0.5))
            } else {
                let [x, y, z]: [f64; 3] = UnitSphere.sample(&mut state.rng);
                let scattered = normal + FreeVector::new(x, y, z);
                let direction = if scattered.square_length() > 1e-12 {
                    scattered.normalize()
                } else {
                    normal
                };
                (direction, base * constants.diffuse_bounce_gain)
            };
        Step::Continue {
            ray: Ray::new(surface.point, direction),
            emitted: direct,
            filter,
        }
    }

    fn transparent(
        &self,
        surface: &Surface,
        color: Rgba,
        incident: FreeVector,
        bounce: u32,
        depth: u32,
        state: &mut WorkerState,
    ) -> Step {
        let constants = &self.config.shading;
        let materials = self.scene.materials;
        let n1 = materials[surface.previous].refractive_index;
        let n2 = materials[surface.next].refractive_index;

        let crosses_water_surface = (surface.previous.is_liquid() && surface.next.is_empty())
            || (surface.previous.is_empty() && surface.next.is_liquid());
        let normal = if crosses_water_surface {
            water_normal(surface.face, surface.point, self.frame.time, constants)
        } else {
            surface.face.normal_vector()
        };
        let interface = Interface::new(incident, normal, n1, n2);

        let tint_strength = if surface.next.is_liquid() {
            color.alpha() * constants.water_tint_strength
        } else {
            color.alpha()
        };
        let tint = Rgb::ONE.lerp(color.to_rgb(), tint_strength);
        let reflected = Ray::new(surface.point, interface.reflected);
        let reflectance = interface.reflectance;

        let refracted = match interface.refracted {
            Some(direction) if reflectance < 1.0 => Ray::new(surface.point, direction),
            // Total internal reflection.
            _ => {
                return Step::Continue {
                    ray: reflected,
                    emitted: Rgb::ZERO,
                    filter: Rgb::ONE,
                };
            }
        };
        let refract_step = Step::Continue {
            ray: refracted,
            emitted: Rgb::ZERO,
            filter: tint,
        };
        if reflectance <= 0.0 {
            return refract_step;
        }

        if self.config.is_stochastic() {
            if state.rng.random_bool(reflectance) {
                Step::Continue {
                    ray: reflected,
                    emitted: Rgb::ZERO,
                    filter: Rgb::ONE,
                }
            } else {
                refract_step
            }
        } else if depth < self.config.max_recursion_depth {
            let reflected_color = self.trace_ray(reflected, depth + 1, bounce + 1, state);
            let refracted_color = self.trace_ray(refracted, depth + 1, bounce + 1, state);
            let reflectance = reflectance as f32;
            Step::Finish(reflected_color * reflectance + tint * refracted_color * (1.0 - reflectance))
        } else {
            state.info.recursion_limit_terminations += 1;
            if reflectance > 0.5 {
                Step::Continue {
                    ray: reflected,
                    emitted: Rgb::ZERO,
                    filter: Rgb::ONE,
                }
            } else {
                refract_step
            }
        }
    }

    // ---------------------------------------------------------------------------------------------

    /// Fraction of sunlight reaching `point`, from 0 to 1.
    fn visibility(&self, point: FreePoint, state: &mut WorkerState) -> f32 {
        let constants = &self.config.shading;
        if !self.config.soft_shadows() {
            return self.transmittance(point, constants.light_direction, state);
        }
        let samples = self.config.shadow_samples;
        let spread = constants.sun_angular_radius.sin();
        let mut total = 0.0;
        for _ in 0..samples {
            let [x, y, z]: [f64; 3] = UnitBall.sample(&mut state.rng);
            let jittered = constants.light_direction + FreeVector::new(x, y, z) * spread;
            total += self.transmittance(point, jittered.normalize(), state);
        }
        total / samples as f32
    }

    /// Fraction of light travelling from `origin` in `direction` which leaves the world.
    fn transmittance(
        &self,
        origin: FreePoint,
        direction: FreeVector,
        state: &mut WorkerState,
    ) -> f32 {
        state.info.shadow_rays += 1;
        let mut ray = Ray::new(origin, direction);
        // Each crossing filters by the material entered, so the starting medium is
        // accounted for here.
        let mut transmitted = self.medium_transmittance(origin, direction);
        for _ in 0..MAX_SHADOW_CROSSINGS {
            let traversal = kernel::trace(self.scene.world, ray, &mut state.rng);
            state.info.kernel_steps += u64::from(traversal.steps);
            state.info.perturbations += u64::from(traversal.perturbations);
            match traversal.crossing {
                Crossing::Escaped { .. } => return transmitted,
                Crossing::Surface(surface) => {
                    let color = self.surface_color(surface.next, surface.face, surface.point);
                    if color.is_opaque() {
                        return 0.0;
                    }
                    transmitted *= 1.0 - color.alpha();
                    ray = Ray::new(surface.point, ray.direction);
                }
            }
        }
        transmitted
    }

    /// Fraction of light passing through the transparent material a ray starting at
    /// `origin` is in. Empty or opaque starting cubes do not filter.
    fn medium_transmittance(&self, origin: FreePoint, direction: FreeVector) -> f32 {
        let Some(cube) = Cube::containing_toward(origin, direction, kernel::BOUNDARY_EPSILON)
        else {
            return 1.0;
        };
        let medium = self.scene.world.get_material(cube);
        if medium.is_empty() {
            return 1.0;
        }
        let color = self.scene.sampler.sample(medium, Side::Side, origin);
        if color.is_opaque() {
            1.0
        } else {
            1.0 - color.alpha()
        }
    }

    /// Per-channel fraction of light remaining after travelling `distance` through water.
    fn water_transmittance(&self, distance: FreeCoordinate) -> Rgb {
        let distance = distance as f32;
        self.config
            .shading
            .water_absorption
            .map(|absorption| (-absorption * distance).exp())
    }

    fn surface_color(&self, material: Material, face: Face6, point: FreePoint) -> Rgba {
        if material.is_empty() {
            Rgba::TRANSPARENT
        } else {
            self.scene
                .sampler
                .sample(material, Side::from_face(face), point)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Quality, ShadingConstants};
    use cubetrace::material::MaterialTable;
    use cubetrace::math::{GridSize, ImageSize};
    use cubetrace::sampler::PaletteSampler;
    use cubetrace::world::VoxelWorld;
    use euclid::{point3, vec3};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng as _;
    use rstest::rstest;

    fn state(seed: u64) -> WorkerState {
        WorkerState {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            info: RenderInfo::default(),
        }
    }

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

        fn tracer<'a>(&'a self, config: &'a RenderConfig) -> Tracer<'a> {
            Tracer {
                scene: Scene {
                    world: &self.world,
                    materials: &self.materials,
                    sampler: &self.sampler,
                },
                config,
                frame: FrameParams::new(0.5, 0),
            }
        }
    }

    /// A world with a stone floor at y = 0..4, glass at y = 4, and water up to y = 8.
    fn layered_world() -> VoxelWorld {
        let mut world = VoxelWorld::new(GridSize::new(2, 1, 2), 0).unwrap();
        world.fill(Cube::new(0, 0, 0), Cube::new(32, 4, 32), Material::Stone);
        world.fill(Cube::new(0, 4, 0), Cube::new(32, 5, 32), Material::Glass);
        world.fill(Cube::new(0, 5, 0), Cube::new(32, 8, 32), Material::Water);
        world
    }

    fn down_ray() -> Ray {
        Ray::new(point3(16.5, 14.5, 16.5), vec3(0.1, -1.0, 0.05).normalize())
    }

    #[test]
    fn sky_and_sun_only_on_first_bounce() {
        let fixture = Fixture::new(VoxelWorld::new(GridSize::new(1, 1, 1), 0).unwrap());
        let config = RenderConfig::fast();
        let tracer = fixture.tracer(&config);
        let constants = &config.shading;
        let state = &mut state(0);

        let toward_sun = Ray::new(point3(8.0, 8.0, 8.0), constants.light_direction);
        assert_eq!(tracer.trace_ray(toward_sun, 0, 0, state), constants.sun_color);
        assert_eq!(tracer.trace_ray(toward_sun, 0, 1, state), constants.sky_color);
        let up = Ray::new(point3(8.0, 8.0, 8.0), vec3(0.0, 1.0, 0.0));
        assert_eq!(tracer.trace_ray(up, 0, 0, state), constants.sky_color);
    }

    #[test]
    fn unlit_opaque_is_sampled_color() {
        let fixture = Fixture::new(layered_world());
        let config = RenderConfig {
            shading: ShadingConstants::UNLIT,
            ..RenderConfig::fast()
        };
        let tracer = fixture.tracer(&config);
        let state = &mut state(0);
        // Straight down onto stone exposed at the world's edge, outside the water.
        let mut world = VoxelWorld::new(GridSize::new(1, 1, 1), 0).unwrap();
        world.fill(Cube::new(0, 0, 0), Cube::new(16, 1, 16), Material::Stone);
        let stone_fixture = Fixture::new(world);
        let stone_tracer = stone_fixture.tracer(&config);
        let color = stone_tracer.trace_ray(
            Ray::new(point3(3.5, 10.0, 3.5), vec3(0.0, -1.0, 0.0)),
            0,
            0,
            state,
        );
        assert_eq!(
            color,
            PaletteSampler::default()
                .color(Material::Stone, Side::Top)
                .to_rgb()
        );
        assert_eq!(state.info.shadow_rays, 0);

        // Looking down through water and glass, the stone is tinted and dimmed.
        let through = tracer.trace_ray(down_ray(), 0, 0, state);
        assert!(through.is_valid());
        assert!(through.luminance() > 0.0);
        assert_ne!(through, color);
    }

    #[test]
    fn fast_and_fancy_agree_with_one_sample() {
        let fixture = Fixture::new(layered_world());
        let fast = RenderConfig {
            max_bounces: 1,
            ..RenderConfig::fast()
        };
        let fancy = RenderConfig {
            max_bounces: 1,
            samples_per_pixel: 1,
            quality: Quality::Fancy,
            ..RenderConfig::fancy()
        };
        let mut opaque_world = VoxelWorld::new(GridSize::new(1, 1, 1), 0).unwrap();
        opaque_world.fill(Cube::new(0, 0, 0), Cube::new(16, 3, 16), Material::Gold);
        let opaque_fixture = Fixture::new(opaque_world);
        let ray = Ray::new(point3(5.5, 12.0, 6.5), vec3(0.2, -1.0, 0.3).normalize());

        let a = opaque_fixture
            .tracer(&fast)
            .trace_ray(ray, 0, 0, &mut state(1));
        let b = opaque_fixture
            .tracer(&fancy)
            .trace_ray(ray, 0, 0, &mut state(2));
        let c = opaque_fixture
            .tracer(&fancy)
            .trace_ray(ray, 0, 0, &mut state(3));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!(a.luminance() > 0.0);

        // The layered world's first crossing is transparent, so one bounce is not enough.
        let d = fixture.tracer(&fast).trace_ray(down_ray(), 0, 0, &mut state(0));
        assert_eq!(d, Rgb::ZERO);
    }

    #[test]
    fn bounce_limit_is_black_and_counted() {
        let fixture = Fixture::new(layered_world());
        let config = RenderConfig {
            max_bounces: 2,
            ..RenderConfig::fast()
        };
        let state = &mut state(0);
        let color = fixture.tracer(&config).trace_ray(down_ray(), 0, 0, state);
        assert!(color.is_valid());
        assert!(state.info.bounce_limit_terminations > 0);
    }

    #[test]
    fn recursion_is_bounded() {
        let fixture = Fixture::new(layered_world());
        let config = RenderConfig {
            max_recursion_depth: 1,
            max_bounces: 64,
            ..RenderConfig::fast()
        };
        let state = &mut state(0);
        let color = fixture.tracer(&config).trace_ray(down_ray(), 0, 0, state);
        assert!(color.is_valid());
        assert!(state.info.recursion_limit_terminations > 0);
    }

    #[test]
    fn shadowed_point_gets_only_ambient() {
        let mut world = VoxelWorld::new(GridSize::new(2, 2, 2), 0).unwrap();
        world.fill(Cube::new(0, 0, 0), Cube::new(32, 1, 32), Material::Stone);
        // Roof high overhead, covering the sun from the floor's center.
        world.fill(Cube::new(0, 20, 0), Cube::new(32, 21, 32), Material::Obsidian);
        let fixture = Fixture::new(world);
        let config = RenderConfig {
            shading: ShadingConstants {
                light_direction: vec3(0.0, 1.0, 0.0),
                ..ShadingConstants::default()
            },
            ..RenderConfig::fast()
        };
        let state = &mut state(0);
        let color = fixture.tracer(&config).trace_ray(
            Ray::new(point3(16.5, 10.0, 16.5), vec3(0.0, -1.0, 0.0)),
            0,
            0,
            state,
        );
        let stone = PaletteSampler::default()
            .color(Material::Stone, Side::Top)
            .to_rgb();
        let expected = stone * config.shading.ambient;
        assert!((color.luminance() - expected.luminance()).abs() < 1e-6, "{color:?}");
        assert_eq!(state.info.shadow_rays, 1);
    }

    /// A stone floor at y = 0..4 with `medium` from y = `bottom` to 4 blocks above it.
    fn covered_floor(medium: Material, bottom: i32) -> VoxelWorld {
        let mut world = VoxelWorld::new(GridSize::new(2, 1, 2), 0).unwrap();
        world.fill(Cube::new(0, 0, 0), Cube::new(32, 4, 32), Material::Stone);
        world.fill(Cube::new(0, bottom, 0), Cube::new(32, bottom + 4, 32), medium);
        world
    }

    #[rstest]
    fn shadow_filtered_by_starting_medium(
        #[values(Material::Water, Material::Glass)] medium: Material,
    ) {
        let config = RenderConfig::fast();
        let expected = 1.0 - PaletteSampler::default().color(medium, Side::Side).alpha();
        let floor = point3(16.5, 4.0, 16.5);
        let up = vec3(0.0, 1.0, 0.0);

        let submerged = Fixture::new(covered_floor(medium, 4));
        let submerged = submerged
            .tracer(&config)
            .transmittance(floor, up, &mut state(0));
        let air_gap = Fixture::new(covered_floor(medium, 5));
        let air_gap = air_gap
            .tracer(&config)
            .transmittance(floor, up, &mut state(0));

        assert!(expected < 1.0);
        assert!((submerged - expected).abs() < 1e-6, "{submerged}");
        assert!((air_gap - expected).abs() < 1e-6, "{air_gap}");
    }

    #[test]
    fn water_absorption_is_exponential() {
        let fixture = Fixture::new(VoxelWorld::new(GridSize::new(1, 1, 1), 0).unwrap());
        let config = RenderConfig::fast();
        let tracer = fixture.tracer(&config);
        let absorption = config.shading.water_absorption;
        let distance = 2.5;

        let transmitted = tracer.water_transmittance(distance);

        for (actual, absorption) in [
            (transmitted.red(), absorption.red()),
            (transmitted.green(), absorption.green()),
            (transmitted.blue(), absorption.blue()),
        ] {
            let expected = (-absorption * distance as f32).exp();
            assert!((actual - expected).abs() < 1e-6, "{actual} vs {expected}");
        }
        assert_eq!(tracer.water_transmittance(0.0), Rgb::ONE);
    }

    #[test]
    fn soft_shadow_edge_is_partly_lit() {
        let mut world = VoxelWorld::new(GridSize::new(2, 2, 2), 0).unwrap();
        world.fill(Cube::new(0, 0, 0), Cube::new(32, 1, 32), Material::Stone);
        // Roof over the x < 16 half, ending directly above the shaded point.
        world.fill(Cube::new(0, 10, 0), Cube::new(16, 11, 32), Material::Obsidian);
        let fixture = Fixture::new(world);
        let mut config = RenderConfig::fancy();
        config.shadow_samples = 64;
        config.shading.light_direction = vec3(0.0, 1.0, 0.0);
        config.shading.sun_angular_radius = 0.3;
        assert!(config.soft_shadows());
        let state = &mut state(0);

        let visibility = fixture
            .tracer(&config)
            .visibility(point3(16.0, 1.0, 16.5), state);

        assert!(visibility > 0.0 && visibility < 1.0, "{visibility}");
        assert_eq!(state.info.shadow_rays, 64);
    }

    #[test]
    fn escaped_below_sea_level_is_deep_water() {
        let fixture = Fixture::new(VoxelWorld::new(GridSize::new(1, 1, 1), 8).unwrap());
        let config = RenderConfig::fast();
        let color = fixture.tracer(&config).trace_ray(
            Ray::new(point3(8.0, 4.0, 8.0), vec3(1.0, 0.0, 0.0)),
            0,
            0,
            &mut state(0),
        );
        // The ray travels through the world's air and exits below the sea surface.
        assert_eq!(color, config.shading.deep_water_color);
    }

    #[test]
    fn sea_reflects_sky() {
        let fixture = Fixture::new(VoxelWorld::new(GridSize::new(1, 1, 1), 0).unwrap());
        let config = RenderConfig {
            shading: ShadingConstants {
                ripple_amplitude: 0.0,
                ..ShadingConstants::default()
            },
            ..RenderConfig::fast()
        };
        let constants = &config.shading;
        let color = fixture.tracer(&config).trace_ray(
            Ray::new(point3(8.0, 8.0, 8.0), vec3(1.0, -0.05, 0.0).normalize()),
            0,
            0,
            &mut state(0),
        );
        // A grazing view of the sea is mostly reflection.
        let sky_distance = (color.luminance() - constants.sky_color.luminance()).abs();
        let deep_distance = (color.luminance() - constants.deep_water_color.luminance()).abs();
        assert!(sky_distance < deep_distance, "{color:?}");
    }

    #[test]
    fn pixel_counts() {
        let fixture = Fixture::new(VoxelWorld::new(GridSize::new(1, 1, 1), 0).unwrap());
        let config = RenderConfig {
            samples_per_pixel: 3,
            ..RenderConfig::fancy()
        };
        let camera = Camera::looking(
            point3(8.0, 8.0, 8.0),
            vec3(0.0, 1.0, 0.0),
            60.0,
            ImageSize::new(2, 2),
        )
        .unwrap();
        let state = &mut state(0);
        let color = fixture.tracer(&config).trace_pixel(&camera, 1, 0, state);
        let sky = config.shading.sky_color;
        assert!((color.luminance() - sky.luminance()).abs() < 1e-5, "{color:?}");
        assert_eq!(state.info.pixels, 1);
        assert_eq!(state.info.samples, 3);
    }
}
