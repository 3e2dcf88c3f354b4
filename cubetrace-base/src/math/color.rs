//! Color data types. This module is private but reexported by its parent.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, MulAssign};

use euclid::{Vector3D, vec3};

/// A floating-point RGB color value.
///
/// * Each color component should have a nonnegative, non-NaN value.
///   Depending on the application, they may be considered to have a nominal
///   range of 0 to 1, or unbounded; light accumulated by the ray tracer is unbounded
///   and is clamped only when quantized with [`Rgb::to_u8()`].
/// * Components are display values: `from_u8` and `to_u8` are plain scaling by 255,
///   with no transfer function applied.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f32; 3]", into = "[f32; 3]"))]
pub struct Rgb(Vector3D<f32, Intensity>);

/// A floating-point RGBA color value.
///
/// The alpha is not premultiplied. Alpha at or above [`Rgba::OPAQUE_THRESHOLD`] means
/// the surface blocks light entirely.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f32; 4]", into = "[f32; 4]"))]
pub struct Rgba {
    rgb: Rgb,
    alpha: f32,
}

/// Unit-of-measure type for vectors that contain color channels.
#[expect(clippy::exhaustive_enums)]
#[derive(Debug, Eq, PartialEq)]
pub enum Intensity {}

impl Rgb {
    /// Black; the constant equal to `Rgb::new(0., 0., 0.)`.
    pub const ZERO: Rgb = Rgb(vec3(0.0, 0.0, 0.0));
    /// White; the constant equal to `Rgb::new(1., 1., 1.)`.
    pub const ONE: Rgb = Rgb(vec3(1.0, 1.0, 1.0));

    /// Constructs a color from components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self(vec3(r, g, b))
    }

    /// Constructs a shade of gray (components all equal).
    #[inline]
    pub const fn from_luminance(luminance: f32) -> Self {
        Self::new(luminance, luminance, luminance)
    }

    /// Constructs a color from 8-bit components, dividing each by 255.
    ///
    /// ```
    /// use cubetrace_base::math::Rgb;
    ///
    /// assert_eq!(Rgb::from_u8([255, 0, 51]), Rgb::new(1.0, 0.0, 0.2));
    /// ```
    #[inline]
    pub const fn from_u8([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Adds an alpha component to produce an [`Rgba`] color.
    #[inline]
    pub const fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba { rgb: self, alpha }
    }

    /// Adds an alpha component of `1.0` (fully opaque) to produce an [`Rgba`] color.
    #[inline]
    pub const fn with_alpha_one(self) -> Rgba {
        self.with_alpha(1.0)
    }

    /// Returns the red color component.
    #[inline]
    pub const fn red(self) -> f32 {
        self.0.x
    }
    /// Returns the green color component.
    #[inline]
    pub const fn green(self) -> f32 {
        self.0.y
    }
    /// Returns the blue color component.
    #[inline]
    pub const fn blue(self) -> f32 {
        self.0.z
    }

    /// Combines the red, green, and blue components to obtain a luminance (“grayscale”)
    /// value.
    #[inline]
    pub fn luminance(self) -> f32 {
        self.red() * 0.212671 + self.green() * 0.715160 + self.blue() * 0.072169
    }

    /// Applies a function to each component.
    #[inline]
    #[must_use]
    pub fn map(self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self::new(f(self.red()), f(self.green()), f(self.blue()))
    }

    /// Linear interpolation: returns `self` at `t = 0` and `other` at `t = 1`.
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }

    /// Returns whether every component is finite and nonnegative.
    #[inline]
    pub fn is_valid(self) -> bool {
        [self.red(), self.green(), self.blue()]
            .into_iter()
            .all(|c| c.is_finite() && c >= 0.0)
    }

    /// Quantizes to 8 bits per component, clamping to the range 0 to 1 first.
    /// NaN components become zero.
    ///
    /// ```
    /// use cubetrace_base::math::Rgb;
    ///
    /// assert_eq!(Rgb::new(0.5, 2.0, -1.0).to_u8(), [128, 255, 0]);
    /// assert_eq!(Rgb::from_u8([135, 206, 250]).to_u8(), [135, 206, 250]);
    /// ```
    #[inline]
    pub fn to_u8(self) -> [u8; 3] {
        [
            component_to_u8(self.red()),
            component_to_u8(self.green()),
            component_to_u8(self.blue()),
        ]
    }
}

impl Rgba {
    /// Transparent black (all components zero).
    pub const TRANSPARENT: Rgba = Rgb::ZERO.with_alpha(0.0);
    /// Black.
    pub const BLACK: Rgba = Rgb::ZERO.with_alpha_one();
    /// White.
    pub const WHITE: Rgba = Rgb::ONE.with_alpha_one();

    /// Alpha at or above which a sampled surface is treated as opaque.
    pub const OPAQUE_THRESHOLD: f32 = 0.5;

    /// Constructs a color from components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Rgb::new(r, g, b).with_alpha(a)
    }

    /// Constructs a color from 8-bit components, dividing each by 255.
    #[inline]
    pub const fn from_u8([r, g, b, a]: [u8; 4]) -> Self {
        Rgb::from_u8([r, g, b]).with_alpha(a as f32 / 255.0)
    }

    /// Returns the alpha component.
    #[inline]
    pub const fn alpha(self) -> f32 {
        self.alpha
    }

    /// Discards the alpha component to produce an RGB color.
    #[inline]
    pub const fn to_rgb(self) -> Rgb {
        self.rgb
    }

    /// Returns whether a surface of this color blocks light,
    /// i.e. its alpha is at least [`Rgba::OPAQUE_THRESHOLD`].
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.alpha >= Self::OPAQUE_THRESHOLD
    }

    /// Quantizes to 8 bits per component, clamping to the range 0 to 1 first.
    #[inline]
    pub fn to_u8(self) -> [u8; 4] {
        let [r, g, b] = self.rgb.to_u8();
        [r, g, b, component_to_u8(self.alpha)]
    }
}

#[inline]
fn component_to_u8(c: f32) -> u8 {
    // `as` saturates, and maps NaN to zero.
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl From<[f32; 3]> for Rgb {
    #[inline]
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}
impl From<Rgb> for [f32; 3] {
    #[inline]
    fn from(value: Rgb) -> Self {
        [value.red(), value.green(), value.blue()]
    }
}
impl From<[f32; 4]> for Rgba {
    #[inline]
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}
impl From<Rgba> for [f32; 4] {
    #[inline]
    fn from(value: Rgba) -> Self {
        let [r, g, b]: [f32; 3] = value.rgb.into();
        [r, g, b, value.alpha]
    }
}

impl Add<Rgb> for Rgb {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}
impl AddAssign<Rgb> for Rgb {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}
/// Multiplies two color values componentwise.
impl Mul<Rgb> for Rgb {
    type Output = Self;
    #[inline]
    fn mul(self, other: Rgb) -> Self {
        Self(self.0.component_mul(other.0))
    }
}
impl MulAssign<Rgb> for Rgb {
    #[inline]
    fn mul_assign(&mut self, other: Rgb) {
        *self = *self * other;
    }
}
/// Multiplies this color value by a scalar.
impl Mul<f32> for Rgb {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self(self.0 * scalar)
    }
}

/// There is no corresponding `impl Sum for Rgba` because the alpha would
/// not have a universally reasonable interpretation.
impl Sum for Rgb {
    #[inline]
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Rgb::ZERO, |a, b| a + b)
    }
}

impl fmt::Debug for Rgb {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "Rgb({:?}, {:?}, {:?})",
            self.red(),
            self.green(),
            self.blue()
        )
    }
}
impl fmt::Debug for Rgba {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "Rgba({:?}, {:?}, {:?}, {:?})",
            self.rgb.red(),
            self.rgb.green(),
            self.rgb.blue(),
            self.alpha
        )
    }
}
