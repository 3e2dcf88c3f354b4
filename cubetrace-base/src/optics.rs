//! Formulas for light meeting a boundary between two media:
//! mirror reflection, Snell's law refraction, Schlick's Fresnel approximation,
//! and total internal reflection.
//!
//! All functions take the surface normal oriented *against* the incident direction
//! (that is, `normal.dot(incident) <= 0`), and unit-length vectors.

use crate::math::{FreeCoordinate, FreeVector};

/// Mirror reflection of `incident` about the plane with the given `normal`.
///
/// ```
/// use cubetrace_base::math::FreeVector;
/// use cubetrace_base::optics::reflect;
///
/// assert_eq!(
///     reflect(FreeVector::new(1.0, -1.0, 0.0), FreeVector::new(0.0, 1.0, 0.0)),
///     FreeVector::new(1.0, 1.0, 0.0),
/// );
/// ```
#[inline]
pub fn reflect(incident: FreeVector, normal: FreeVector) -> FreeVector {
    incident - normal * (2.0 * incident.dot(normal))
}

/// Direction of light refracted by Snell's law when passing from a medium of refractive
/// index `n1` into one of index `n2`.
///
/// Returns [`None`] when no refracted ray exists: total internal reflection.
#[inline]
pub fn refract(
    incident: FreeVector,
    normal: FreeVector,
    n1: FreeCoordinate,
    n2: FreeCoordinate,
) -> Option<FreeVector> {
    let eta = n1 / n2;
    let cos_i = -normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        None
    } else {
        Some(incident * eta + normal * (eta * cos_i - k.sqrt()))
    }
}

/// The angle of incidence, in radians, beyond which light going from index `n1` to
/// index `n2` is totally internally reflected.
///
/// Only a transition to a less dense medium (`n1 > n2`) has one.
#[inline]
pub fn critical_angle(n1: FreeCoordinate, n2: FreeCoordinate) -> Option<FreeCoordinate> {
    if n1 > n2 { Some((n2 / n1).asin()) } else { None }
}

/// Reflectance at normal incidence, `((n1 - n2) / (n1 + n2))²`.
#[inline]
pub fn normal_reflectance(n1: FreeCoordinate, n2: FreeCoordinate) -> FreeCoordinate {
    let r = (n1 - n2) / (n1 + n2);
    r * r
}

/// Fraction of light reflected at a boundary, by Schlick's approximation of the Fresnel
/// equations. `cos_incidence` is the cosine of the angle between the incident ray and
/// the normal.
///
/// When going into a less dense medium, the transmitted angle is used, and past the
/// critical angle the result is exactly `1.0`.
///
/// ```
/// use cubetrace_base::optics::{normal_reflectance, schlick_reflectance};
///
/// assert_eq!(schlick_reflectance(1.0, 1.0, 1.5), normal_reflectance(1.0, 1.5));
/// assert_eq!(schlick_reflectance(0.1, 1.5, 1.0), 1.0);
/// ```
#[inline]
pub fn schlick_reflectance(
    cos_incidence: FreeCoordinate,
    n1: FreeCoordinate,
    n2: FreeCoordinate,
) -> FreeCoordinate {
    let r0 = normal_reflectance(n1, n2);
    let cos = if n1 > n2 {
        let eta = n1 / n2;
        let sin_t_squared = eta * eta * (1.0 - cos_incidence * cos_incidence);
        if sin_t_squared > 1.0 {
            return 1.0;
        }
        (1.0 - sin_t_squared).sqrt()
    } else {
        cos_incidence
    };
    let x = (1.0 - cos).clamp(0.0, 1.0);
    r0 + (1.0 - r0) * x.powi(5)
}

/// Everything about how a ray meets a boundary between two media.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct Interface {
    /// Fraction of light reflected, in the range 0 to 1.
    pub reflectance: FreeCoordinate,
    /// Direction of the reflected ray.
    pub reflected: FreeVector,
    /// Direction of the refracted ray, or [`None`] if totally internally reflected.
    pub refracted: Option<FreeVector>,
}

impl Interface {
    /// Computes the [`Interface`] for a unit `incident` direction at a surface with unit
    /// `normal`, going from refractive index `n1` to `n2`.
    ///
    /// The normal may face either way; it is flipped to oppose the incident direction.
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn new(
        incident: FreeVector,
        normal: FreeVector,
        n1: FreeCoordinate,
        n2: FreeCoordinate,
    ) -> Self {
        let normal = if normal.dot(incident) > 0.0 {
            -normal
        } else {
            normal
        };
        let cos_incidence = (-normal.dot(incident)).clamp(0.0, 1.0);
        let reflected = reflect(incident, normal);
        match refract(incident, normal, n1, n2) {
            Some(refracted) => Self {
                reflectance: schlick_reflectance(cos_incidence, n1, n2),
                reflected,
                refracted: Some(refracted),
            },
            None => Self {
                reflectance: 1.0,
                reflected,
                refracted: None,
            },
        }
    }

    /// Returns whether light is totally internally reflected here.
    #[inline]
    pub fn is_total_internal_reflection(&self) -> bool {
        self.refracted.is_none()
    }
}
