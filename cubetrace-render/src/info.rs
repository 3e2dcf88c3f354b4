//! Statistics about rendering a frame.

use core::fmt;
use core::ops;
use core::time::Duration;

/// Statistics about a rendered frame, for logging and performance analysis.
///
/// Each worker keeps its own; they are summed when the frame is complete.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct RenderInfo {
    /// Pixels rendered.
    pub pixels: u64,
    /// Camera rays traced, counting every sample of every pixel.
    pub samples: u64,
    /// Boxes (cells or whole chunks) stepped through by the geometry kernel.
    pub kernel_steps: u64,
    /// Directions perturbed to recover from numerical degeneracies.
    pub perturbations: u64,
    /// Shadow rays cast toward the sun.
    pub shadow_rays: u64,
    /// Rays given up on because they interacted with too many surfaces.
    pub bounce_limit_terminations: u64,
    /// Reflect/refract splits not taken because the recursion depth was reached.
    pub recursion_limit_terminations: u64,
    /// Pixels whose camera ray could not be constructed, and were rendered black.
    pub degenerate_camera_rays: u64,
    /// Wall-clock time spent rendering.
    pub time: Duration,
}

impl ops::AddAssign for RenderInfo {
    fn add_assign(&mut self, other: Self) {
        let Self {
            pixels,
            samples,
            kernel_steps,
            perturbations,
            shadow_rays,
            bounce_limit_terminations,
            recursion_limit_terminations,
            degenerate_camera_rays,
            time,
        } = other;
        self.pixels += pixels;
        self.samples += samples;
        self.kernel_steps += kernel_steps;
        self.perturbations += perturbations;
        self.shadow_rays += shadow_rays;
        self.bounce_limit_terminations += bounce_limit_terminations;
        self.recursion_limit_terminations += recursion_limit_terminations;
        self.degenerate_camera_rays += degenerate_camera_rays;
        self.time += time;
    }
}

impl ops::Add for RenderInfo {
    type Output = Self;
    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl core::iter::Sum for RenderInfo {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Self>,
    {
        let mut sum = Self::default();
        for part in iter {
            sum += part;
        }
        sum
    }
}

impl fmt::Display for RenderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let &Self {
            pixels,
            samples,
            kernel_steps,
            perturbations,
            shadow_rays,
            bounce_limit_terminations,
            recursion_limit_terminations,
            degenerate_camera_rays,
            time,
        } = self;
        write!(
            f,
            "{pixels} px, {samples} samples in {time:.3?}; \
            {kernel_steps} steps, {shadow_rays} shadow rays; \
            limits hit: {bounce_limit_terminations} bounce, {recursion_limit_terminations} recursion; \
            {perturbations} perturbed, {degenerate_camera_rays} degenerate"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sum() {
        let part = RenderInfo {
            pixels: 2,
            samples: 4,
            shadow_rays: 1,
            ..RenderInfo::default()
        };
        let total: RenderInfo = [part, part, RenderInfo::default()].into_iter().sum();
        assert_eq!(total.pixels, 4);
        assert_eq!(total.samples, 8);
        assert_eq!(total.shadow_rays, 2);
        assert_eq!(total, part + part);
    }

    #[test]
    fn display() {
        let info = RenderInfo {
            pixels: 12,
            samples: 12,
            kernel_steps: 40,
            ..RenderInfo::default()
        };
        assert_eq!(
            info.to_string(),
            "12 px, 12 samples in 0.000ns; 40 steps, 0 shadow rays; \
            limits hit: 0 bounce, 0 recursion; 0 perturbed, 0 degenerate"
        );
    }
}
