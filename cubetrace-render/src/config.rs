//! [`RenderConfig`] and the constants it carries.
//!
//! A configuration is an immutable value passed to every render call; nothing about how
//! a frame is rendered is kept in global state.

use core::fmt;
use core::num::NonZeroUsize;

use cubetrace::math::{FreeCoordinate, FreeVector, ImageSize, Rgb};
use serde::{Deserialize, Serialize};

/// Which of the two rendering strategies to use.
///
/// Both trace rays through the same geometry with the same material model; they differ
/// in sampling budget and in how they resolve choices between reflection and refraction.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Quality {
    /// One deterministic sample per pixel. Reflection and refraction at transparent
    /// surfaces are blended by their Fresnel weights instead of randomly chosen.
    #[default]
    Fast,
    /// Many random samples per pixel, averaged; random bounce directions, random
    /// reflect-or-refract choices, and soft shadows.
    Fancy,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Quality::Fast => "fast",
            Quality::Fancy => "fancy",
        })
    }
}

/// Tuned constants of the shading model.
///
/// These are chosen for appearance, not physical accuracy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct ShadingConstants {
    /// Unit vector pointing toward the sun.
    pub light_direction: FreeVector,
    /// Angular radius of the sun's disk, in radians.
    pub sun_angular_radius: FreeCoordinate,
    /// Color of rays escaping to the sky.
    pub sky_color: Rgb,
    /// Color of rays which hit the sun's disk directly.
    pub sun_color: Rgb,
    /// Brightness of direct sunlight on surfaces. Zero disables shadow rays.
    pub sun_intensity: f32,
    /// Light reaching every surface regardless of shadowing.
    pub ambient: f32,
    /// Phong exponent of specular highlights.
    pub specular_exponent: f32,
    /// Multiplier applied to a ray's color influence on each diffuse bounce.
    pub diffuse_bounce_gain: f32,
    /// Color seen through water too deep to see the bottom of.
    pub deep_water_color: Rgb,
    /// Fraction of each color channel absorbed per unit of distance travelled in water.
    pub water_absorption: Rgb,
    /// How strongly the water's own color tints light refracted into it, from 0 to 1.
    pub water_tint_strength: f32,
    /// Maximum tilt of the animated water surface normal.
    pub ripple_amplitude: FreeCoordinate,
    /// Ripples per block.
    pub ripple_frequency: FreeCoordinate,
    /// Radians of ripple phase per second.
    pub ripple_speed: FreeCoordinate,
}

impl ShadingConstants {
    /// No directional light and full ambient light, so that opaque surfaces appear in
    /// exactly their sampled colors.
    pub const UNLIT: Self = Self {
        sun_intensity: 0.0,
        ambient: 1.0,
        ..Self::DEFAULT
    };

    const DEFAULT: Self = Self {
        // normalize(0.6, 0.5, 0.45)
        light_direction: FreeVector::new(0.665_640_235, 0.554_700_196, 0.499_230_176),
        sun_angular_radius: 0.05,
        sky_color: Rgb::from_u8([135, 206, 250]),
        sun_color: Rgb::new(4.0, 3.8, 3.3),
        sun_intensity: 1.0,
        ambient: 0.35,
        specular_exponent: 32.0,
        diffuse_bounce_gain: 0.7,
        deep_water_color: Rgb::from_u8([16, 48, 96]),
        water_absorption: Rgb::new(0.35, 0.12, 0.07),
        water_tint_strength: 0.5,
        ripple_amplitude: 0.05,
        ripple_frequency: 2.0,
        ripple_speed: 2.0,
    };

    /// Replaces values that would break shading (non-finite, negative, or a zero light
    /// direction) with the defaults.
    #[must_use]
    pub fn repair(self) -> Self {
        let d = Self::DEFAULT;
        let finite_or = |value: f32, default: f32| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                default
            }
        };
        let free_or = |value: FreeCoordinate, default: FreeCoordinate| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                default
            }
        };
        let color_or = |value: Rgb, default: Rgb| {
            if value.is_valid() { value } else { default }
        };
        let light_direction = {
            let length = self.light_direction.length();
            if (length - 1.0).abs() < 1e-6 {
                self.light_direction
            } else if length.is_finite() && length > 0.0 {
                self.light_direction / length
            } else {
                d.light_direction
            }
        };
        Self {
            light_direction,
            sun_angular_radius: free_or(self.sun_angular_radius, d.sun_angular_radius)
                .min(core::f64::consts::FRAC_PI_2),
            sky_color: color_or(self.sky_color, d.sky_color),
            sun_color: color_or(self.sun_color, d.sun_color),
            sun_intensity: finite_or(self.sun_intensity, d.sun_intensity),
            ambient: finite_or(self.ambient, d.ambient),
            specular_exponent: finite_or(self.specular_exponent, d.specular_exponent),
            diffuse_bounce_gain: finite_or(self.diffuse_bounce_gain, d.diffuse_bounce_gain),
            deep_water_color: color_or(self.deep_water_color, d.deep_water_color),
            water_absorption: color_or(self.water_absorption, d.water_absorption),
            water_tint_strength: finite_or(self.water_tint_strength, d.water_tint_strength)
                .min(1.0),
            ripple_amplitude: free_or(self.ripple_amplitude, d.ripple_amplitude),
            ripple_frequency: free_or(self.ripple_frequency, d.ripple_frequency),
            ripple_speed: if self.ripple_speed.is_finite() {
                self.ripple_speed
            } else {
                d.ripple_speed
            },
        }
    }
}

impl Default for ShadingConstants {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything about how a frame is to be rendered, other than what is in it and where
/// it is seen from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct RenderConfig {
    /// Width of the image in pixels.
    pub width: u32,
    /// Height of the image in pixels.
    pub height: u32,
    /// Rendering strategy.
    pub quality: Quality,
    /// Number of worker threads; 0 means as many as the machine has processors.
    /// 1 renders on the calling thread without creating any threads.
    pub threads: usize,
    /// Number of consecutive pixels a worker claims at once.
    pub batch_size: usize,
    /// Random samples averaged per pixel in [`Quality::Fancy`]. Fast quality always
    /// takes one sample.
    pub samples_per_pixel: u32,
    /// Maximum number of surfaces a ray may interact with before it is given up on.
    pub max_bounces: u32,
    /// Maximum depth to which [`Quality::Fast`] splits rays into reflected and refracted
    /// parts. Beyond it, only the stronger part is followed.
    pub max_recursion_depth: u32,
    /// Jittered shadow rays per shaded point, for soft shadows in [`Quality::Fancy`].
    pub shadow_samples: u32,
    /// Whether to call the progress callback while a frame is rendering.
    pub report_progress: bool,
    /// Interval, in milliseconds, at which progress is checked.
    pub progress_interval_ms: u64,
    /// Tuned constants of the shading model.
    pub shading: ShadingConstants,
}

impl RenderConfig {
    /// Settings suitable for interactive frame rates: one deterministic sample per pixel.
    pub fn fast() -> Self {
        Self {
            width: 400,
            height: 300,
            quality: Quality::Fast,
            threads: 4,
            batch_size: 64,
            samples_per_pixel: 1,
            max_bounces: 8,
            max_recursion_depth: 4,
            shadow_samples: 1,
            report_progress: false,
            progress_interval_ms: 250,
            shading: ShadingConstants::default(),
        }
    }

    /// Settings for offline rendering: many samples, deep bounces, soft shadows, and
    /// progress reporting.
    pub fn fancy() -> Self {
        Self {
            quality: Quality::Fancy,
            threads: 0,
            samples_per_pixel: 16,
            max_bounces: 16,
            shadow_samples: 8,
            report_progress: true,
            ..Self::fast()
        }
    }

    /// Size of the image.
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    /// Number of pixels in the image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Samples actually taken per pixel, given the quality.
    pub fn effective_samples(&self) -> u32 {
        match self.quality {
            Quality::Fast => 1,
            Quality::Fancy => self.samples_per_pixel.max(1),
        }
    }

    /// Whether tracing uses random choices at all.
    ///
    /// A single-sample trace is deterministic in either quality, so that the two agree.
    pub fn is_stochastic(&self) -> bool {
        self.quality == Quality::Fancy && self.effective_samples() > 1
    }

    /// Whether shadow rays are jittered within the sun's disk.
    pub fn soft_shadows(&self) -> bool {
        self.is_stochastic() && self.shadow_samples > 1
    }

    /// Number of worker threads to use, resolving 0 to the available parallelism.
    pub fn worker_count(&self) -> usize {
        match NonZeroUsize::new(self.threads) {
            Some(threads) => threads.get(),
            None => std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }

    /// Replaces values which cannot be rendered with (such as zero sizes and counts) with
    /// the nearest usable ones.
    #[must_use]
    pub fn repair(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
            batch_size: self.batch_size.max(1),
            samples_per_pixel: self.samples_per_pixel.max(1),
            max_bounces: self.max_bounces.max(1),
            shadow_samples: self.shadow_samples.max(1),
            progress_interval_ms: self.progress_interval_ms.max(1),
            shading: self.shading.repair(),
            ..self
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::fast()
    }
}

/// Inputs which vary from frame to frame of an animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct FrameParams {
    /// Time in seconds, which animates the water surface.
    pub time: f64,
    /// Seed for the random numbers used in rendering the frame.
    pub seed: u64,
}

impl FrameParams {
    /// Constructs a [`FrameParams`].
    pub const fn new(time: f64, seed: u64) -> Self {
        Self { time, seed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_light_direction_is_unit() {
        let light = ShadingConstants::default().light_direction;
        assert!((light.length() - 1.0).abs() < 1e-6);
        let expected = FreeVector::new(0.6, 0.5, 0.45).normalize();
        assert!((light - expected).length() < 1e-6);
    }

    #[test]
    fn fast_always_one_sample() {
        let config = RenderConfig {
            samples_per_pixel: 9,
            ..RenderConfig::fast()
        };
        assert_eq!(config.effective_samples(), 1);
        assert!(!config.is_stochastic());
        assert_eq!(RenderConfig::fancy().effective_samples(), 16);
        assert!(RenderConfig::fancy().soft_shadows());
    }

    #[test]
    fn single_sample_fancy_is_deterministic() {
        let config = RenderConfig {
            samples_per_pixel: 1,
            ..RenderConfig::fancy()
        };
        assert!(!config.is_stochastic());
        assert!(!config.soft_shadows());
    }

    #[test]
    fn repair() {
        let broken = RenderConfig {
            width: 0,
            samples_per_pixel: 0,
            max_bounces: 0,
            batch_size: 0,
            shading: ShadingConstants {
                light_direction: FreeVector::zero(),
                ambient: f32::NAN,
                ..ShadingConstants::default()
            },
            ..RenderConfig::fancy()
        };
        let repaired = broken.repair();
        assert_eq!(repaired.width, 1);
        assert_eq!(repaired.samples_per_pixel, 1);
        assert_eq!(repaired.max_bounces, 1);
        assert_eq!(repaired.batch_size, 1);
        assert_eq!(repaired.shading, ShadingConstants::default());
        assert_eq!(RenderConfig::fancy().repair(), RenderConfig::fancy());
    }

    #[test]
    fn worker_count() {
        assert_eq!(RenderConfig::fast().worker_count(), 4);
        assert!(RenderConfig::fancy().worker_count() >= 1);
    }

    #[test]
    fn json_partial() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"quality": "fancy", "width": 64}"#).unwrap();
        assert_eq!(config.quality, Quality::Fancy);
        assert_eq!(config.width, 64);
        assert_eq!(config.height, RenderConfig::default().height);
        assert!(serde_json::from_str::<RenderConfig>(r#"{"bogus": 1}"#).is_err());
    }
}
