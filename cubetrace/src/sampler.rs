//! Looking up the color of a material's surface.

use crate::material::Material;
use crate::math::{Face6, FreePoint, Rgb, Rgba};

/// Which of a block's three kinds of faces a surface belongs to, for texturing.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, exhaust::Exhaust)]
pub enum Side {
    /// The upward-facing face.
    Top,
    /// Any of the four horizontally-facing faces.
    Side,
    /// The downward-facing face.
    Bottom,
}

impl Side {
    /// Classifies a surface by its normal: positive Y is the top, negative Y the bottom,
    /// and everything else a side.
    #[inline]
    pub fn from_face(face: Face6) -> Self {
        match face {
            Face6::PY => Side::Top,
            Face6::NY => Side::Bottom,
            Face6::NX | Face6::NZ | Face6::PX | Face6::PZ => Side::Side,
        }
    }
}

/// Source of surface colors for the ray tracer.
///
/// Implementations must be usable from many rendering threads at once.
pub trait MaterialSampler: Send + Sync {
    /// Returns the color of `material`'s surface on the given side, at the given point in
    /// world coordinates (which lies on a face of the cube being sampled).
    ///
    /// An alpha of at least [`Rgba::OPAQUE_THRESHOLD`] means the surface is opaque.
    fn sample(&self, material: Material, side: Side, point: FreePoint) -> Rgba;
}

impl<T: MaterialSampler + ?Sized> MaterialSampler for &T {
    fn sample(&self, material: Material, side: Side, point: FreePoint) -> Rgba {
        (**self).sample(material, side, point)
    }
}

/// A [`MaterialSampler`] which gives every material one flat color,
/// optionally different on the top and bottom faces.
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteSampler {
    colors: [[Rgba; 3]; Material::COUNT],
}

impl PaletteSampler {
    /// Returns a copy of this palette with `material` colored `color` on every side.
    #[must_use]
    pub fn with(mut self, material: Material, color: Rgba) -> Self {
        self.colors[material as usize] = [color; 3];
        self
    }

    /// Returns a copy of this palette with `material` colored `color` on one side.
    #[must_use]
    pub fn with_side(mut self, material: Material, side: Side, color: Rgba) -> Self {
        self.colors[material as usize][side as usize] = color;
        self
    }

    /// The color of a material on a side, independent of position.
    pub fn color(&self, material: Material, side: Side) -> Rgba {
        self.colors[material as usize][side as usize]
    }
}

impl Default for PaletteSampler {
    fn default() -> Self {
        use Material::*;
        let mut palette = Self {
            colors: [[Rgba::TRANSPARENT; 3]; Material::COUNT],
        };
        for material in Material::all() {
            let color = match material {
                Air => Rgba::TRANSPARENT,
                Stone => Rgb::from_u8([125, 125, 125]).with_alpha_one(),
                Dirt => Rgb::from_u8([134, 96, 67]).with_alpha_one(),
                Coal => Rgb::from_u8([60, 60, 62]).with_alpha_one(),
                Iron => Rgb::from_u8([196, 170, 150]).with_alpha_one(),
                Gold => Rgb::from_u8([250, 210, 60]).with_alpha_one(),
                Diamond => Rgb::from_u8([95, 220, 215]).with_alpha_one(),
                Log => Rgb::from_u8([102, 81, 50]).with_alpha_one(),
                Leaf => Rgb::from_u8([60, 140, 40]).with_alpha_one(),
                Water => Rgb::from_u8([40, 90, 200]).with_alpha(0.35),
                Sand => Rgb::from_u8([219, 207, 163]).with_alpha_one(),
                Glass => Rgb::from_u8([200, 225, 230]).with_alpha(0.2),
                Obsidian => Rgb::from_u8([20, 16, 32]).with_alpha_one(),
                Quartz => Rgb::from_u8([235, 230, 225]).with_alpha_one(),
                Bedrock => Rgb::from_u8([85, 85, 85]).with_alpha_one(),
            };
            palette = palette.with(material, color);
        }
        palette
            .with_side(
                Dirt,
                Side::Top,
                Rgb::from_u8([96, 160, 60]).with_alpha_one(),
            )
            .with_side(
                Log,
                Side::Top,
                Rgb::from_u8([160, 130, 80]).with_alpha_one(),
            )
            .with_side(
                Log,
                Side::Bottom,
                Rgb::from_u8([160, 130, 80]).with_alpha_one(),
            )
    }
}

impl MaterialSampler for PaletteSampler {
    fn sample(&self, material: Material, side: Side, _point: FreePoint) -> Rgba {
        self.color(material, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn side_from_face() {
        assert_eq!(Side::from_face(Face6::PY), Side::Top);
        assert_eq!(Side::from_face(Face6::NY), Side::Bottom);
        assert_eq!(Side::from_face(Face6::PX), Side::Side);
        assert_eq!(Side::from_face(Face6::NZ), Side::Side);
    }

    #[test]
    fn default_palette_opacity() {
        let palette = PaletteSampler::default();
        for material in Material::all() {
            let opaque = palette.color(material, Side::Side).is_opaque();
            let expected = !matches!(material, Material::Air | Material::Water | Material::Glass);
            assert_eq!(opaque, expected, "{material}");
        }
    }

    #[test]
    fn sides_differ_where_configured() {
        let palette = PaletteSampler::default();
        assert_ne!(
            palette.color(Material::Dirt, Side::Top),
            palette.color(Material::Dirt, Side::Side)
        );
        assert_eq!(
            palette.sample(Material::Stone, Side::Top, FreePoint::new(1.0, 2.0, 3.0)),
            palette.color(Material::Stone, Side::Bottom)
        );
    }
}
