use crate::math::{FreeCoordinate, FreePoint, FreeVector};

/// A ray; a half-infinite line segment.
///
/// Most of the ray tracer expects `direction` to be a unit vector, so that ray parameters
/// are distances; see [`Ray::normalized()`].
#[allow(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The sole endpoint of the ray.
    pub origin: FreePoint,

    /// The direction in which the ray extends infinitely.
    pub direction: FreeVector,
}

impl Ray {
    /// Constructs a [`Ray`] from convertible types (e.g. tuples or 3-element arrays).
    /// Other than the use of [`Into`], this is equivalent to a struct literal.
    ///
    /// ```
    /// use cubetrace_base::euclid::{point3, vec3};
    /// use cubetrace_base::Ray;
    ///
    /// assert_eq!(
    ///     Ray::new([1., 2., 3.], [4., 5., 6.]),
    ///     Ray {
    ///         origin: point3(1., 2., 3.),
    ///         direction: vec3(4., 5., 6.),
    ///     }
    /// );
    /// ```
    #[allow(clippy::missing_inline_in_public_items)] // is generic already
    pub fn new(origin: impl Into<FreePoint>, direction: impl Into<FreeVector>) -> Self {
        Self {
            origin: origin.into(),
            direction: direction.into(),
        }
    }

    /// Returns the point at parameter `t` along the ray, `origin + direction * t`.
    #[must_use]
    #[inline]
    pub fn at(&self, t: FreeCoordinate) -> FreePoint {
        self.origin + self.direction * t
    }

    /// Returns this ray with a unit-length direction, or [`None`] if the direction is
    /// zero or not finite.
    #[must_use]
    #[inline]
    pub fn normalized(self) -> Option<Self> {
        let length = self.direction.length();
        if length > 0.0 && length.is_finite() && self.origin.to_vector().square_length().is_finite()
        {
            Some(Self {
                origin: self.origin,
                direction: self.direction / length,
            })
        } else {
            None
        }
    }
}
