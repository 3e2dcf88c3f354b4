//! [`Material`] identifiers and their optical constants.

use core::fmt;
use core::ops;

use exhaust::Exhaust as _;

/// The kind of matter occupying one cell of a [`VoxelWorld`](crate::world::VoxelWorld).
///
/// Whether a material is opaque or see-through is decided by the color its
/// [`MaterialSampler`](crate::sampler::MaterialSampler) reports, not by the material itself;
/// the classifications here are the ones the traversal and shading need regardless of
/// appearance.
#[expect(clippy::exhaustive_enums)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Ord,
    PartialOrd,
    exhaust::Exhaust,
    strum::Display,
    strum::EnumCount,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "save", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "save", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Material {
    #[default]
    Air = 0,
    Stone,
    Dirt,
    Coal,
    Iron,
    Gold,
    Diamond,
    Log,
    Leaf,
    Water,
    Sand,
    Glass,
    Obsidian,
    Quartz,
    Bedrock,
}

impl Material {
    /// Number of distinct materials.
    pub const COUNT: usize = <Self as strum::EnumCount>::COUNT;

    /// Whether this is empty space. Chunk occupancy counts every cell that is not empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Material::Air
    }

    /// Whether this is the liquid which fills the world below sea level.
    #[inline]
    pub fn is_liquid(self) -> bool {
        self == Material::Water
    }

    /// Whether this is foliage, which the traversal never treats as a uniform region:
    /// every cell of it is a separate surface.
    #[inline]
    pub fn is_foliage(self) -> bool {
        self == Material::Leaf
    }

    /// Iterates over all materials in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::exhaust()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Optical constants of one [`Material`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "save", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct MaterialProperties {
    /// Weight of mirror-like reflection of the light source and of specular bounces.
    pub specular: f64,
    /// Weight of diffuse reflection of the light source and of diffuse bounces.
    pub diffuse: f64,
    /// Index of refraction, used at boundaries between see-through materials.
    pub refractive_index: f64,
}

impl MaterialProperties {
    /// Constructs a [`MaterialProperties`].
    pub const fn new(specular: f64, diffuse: f64, refractive_index: f64) -> Self {
        Self {
            specular,
            diffuse,
            refractive_index,
        }
    }

    /// Probability that a scattering bounce off this material is specular rather than
    /// diffuse: `specular / (specular + diffuse)`, or 0 if both are zero.
    pub fn specular_probability(&self) -> f64 {
        let total = self.specular + self.diffuse;
        if total > 0.0 {
            self.specular / total
        } else {
            0.0
        }
    }
}

/// Per-material [`MaterialProperties`], indexed by [`Material`].
///
/// Loaded once and shared read-only by every rendering thread.
#[derive(Clone, PartialEq)]
pub struct MaterialTable {
    entries: [MaterialProperties; Material::COUNT],
}

impl MaterialTable {
    /// Refractive index of water.
    pub const WATER_INDEX: f64 = 1.333;
    /// Refractive index of glass.
    pub const GLASS_INDEX: f64 = 1.5;

    /// Returns a copy of this table with the properties of `material` replaced.
    #[must_use]
    pub fn with(mut self, material: Material, properties: MaterialProperties) -> Self {
        self.entries[material.index()] = properties;
        self
    }

    /// Iterates over every material and its properties.
    pub fn iter(&self) -> impl Iterator<Item = (Material, &MaterialProperties)> + '_ {
        Material::all().zip(self.entries.iter())
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        use Material::*;
        let properties = |material| {
            let (specular, diffuse) = match material {
                Air => (0.0, 0.0),
                Stone => (0.05, 0.9),
                Dirt => (0.02, 0.95),
                Coal => (0.1, 0.8),
                Iron => (0.35, 0.6),
                Gold => (0.6, 0.4),
                Diamond => (0.5, 0.5),
                Log => (0.02, 0.9),
                Leaf => (0.05, 0.85),
                Water => (0.5, 0.1),
                Sand => (0.03, 0.95),
                Glass => (0.6, 0.05),
                Obsidian => (0.45, 0.5),
                Quartz => (0.3, 0.7),
                Bedrock => (0.02, 0.9),
            };
            let refractive_index = match material {
                Water => Self::WATER_INDEX,
                Glass => Self::GLASS_INDEX,
                _ => 1.0,
            };
            MaterialProperties::new(specular, diffuse, refractive_index)
        };
        let mut entries = [MaterialProperties::new(0.0, 0.0, 1.0); Material::COUNT];
        for material in Material::all() {
            entries[material.index()] = properties(material);
        }
        Self { entries }
    }
}

impl ops::Index<Material> for MaterialTable {
    type Output = MaterialProperties;
    #[inline]
    fn index(&self, material: Material) -> &Self::Output {
        &self.entries[material.index()]
    }
}

impl fmt::Debug for MaterialTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
