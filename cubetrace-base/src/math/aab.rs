use core::fmt;

use euclid::{Point3D, Size3D};

use crate::Ray;
use crate::math::{Axis, Cube, Face6, FreeCoordinate, FreePoint};

/// Axis-Aligned Box data type, with continuous coordinates.
#[derive(Copy, Clone, PartialEq)]
pub struct Aab {
    lower_bounds: FreePoint,
    upper_bounds: FreePoint,
}

impl Aab {
    /// The [`Aab`] of zero size at the origin.
    pub const ZERO: Aab = Aab {
        lower_bounds: Point3D::new(0., 0., 0.),
        upper_bounds: Point3D::new(0., 0., 0.),
    };

    /// Constructs an [`Aab`] from individual coordinates.
    #[inline]
    #[track_caller]
    pub fn new(
        lx: FreeCoordinate,
        hx: FreeCoordinate,
        ly: FreeCoordinate,
        hy: FreeCoordinate,
        lz: FreeCoordinate,
        hz: FreeCoordinate,
    ) -> Self {
        Self::from_lower_upper(Point3D::new(lx, ly, lz), Point3D::new(hx, hy, hz))
    }

    /// Constructs an [`Aab`] from most-negative and most-positive corner points.
    ///
    /// Panics if the points are not in the proper order or if they are NaN.
    #[inline]
    #[track_caller]
    pub fn from_lower_upper(
        lower_bounds: impl Into<FreePoint>,
        upper_bounds: impl Into<FreePoint>,
    ) -> Self {
        let lower_bounds = lower_bounds.into();
        let upper_bounds = upper_bounds.into();
        match Self::checked_from_lower_upper(lower_bounds, upper_bounds) {
            Some(aab) => aab,
            None => panic!(
                "invalid AAB points that are misordered or NaN: \
                lower {lower_bounds:?} upper {upper_bounds:?}"
            ),
        }
    }

    /// Constructs an [`Aab`] from most-negative and most-positive corner points.
    ///
    /// Returns [`None`] if the points are not in the proper order or if they are NaN.
    #[inline]
    pub fn checked_from_lower_upper(
        lower_bounds: FreePoint,
        upper_bounds: FreePoint,
    ) -> Option<Self> {
        if lower_bounds.x <= upper_bounds.x
            && lower_bounds.y <= upper_bounds.y
            && lower_bounds.z <= upper_bounds.z
        {
            Some(Self {
                lower_bounds,
                upper_bounds,
            })
        } else {
            None
        }
    }

    /// Returns the coordinate of the plane containing the given face of the box,
    /// on the axis the face is perpendicular to.
    ///
    /// Unlike the equivalent in some other libraries, negative faces are *not* inverted.
    #[inline]
    pub fn face_plane(&self, face: Face6) -> FreeCoordinate {
        if face.is_positive() {
            self.upper_bounds[face.axis()]
        } else {
            self.lower_bounds[face.axis()]
        }
    }

    /// Size of the box in each axis.
    #[inline]
    pub fn size(&self) -> Size3D<FreeCoordinate, Cube> {
        Size3D::from(self.upper_bounds - self.lower_bounds)
    }

    /// The center of the enclosed volume.
    #[inline]
    pub fn center(&self) -> FreePoint {
        (self.lower_bounds + self.upper_bounds.to_vector()) * 0.5
    }

    /// Returns whether this AAB, including the boundary, contains the point.
    #[inline]
    pub fn contains(&self, point: FreePoint) -> bool {
        for axis in Axis::ALL {
            if !(self.lower_bounds[axis] <= point[axis] && point[axis] <= self.upper_bounds[axis]) {
                return false;
            }
        }
        true
    }

    /// Returns whether the point lies within the box expanded by `tolerance` on every side.
    #[inline]
    pub fn contains_within(&self, point: FreePoint, tolerance: FreeCoordinate) -> bool {
        Axis::ALL.into_iter().all(|axis| {
            self.lower_bounds[axis] - tolerance <= point[axis]
                && point[axis] <= self.upper_bounds[axis] + tolerance
        })
    }

    /// Finds where the ray first reaches this box, using the slab method.
    ///
    /// Returns the ray parameter `t` (distance along the ray, if its direction is a unit
    /// vector) at which the ray enters the box, `0.0` if the origin is already inside,
    /// or [`None`] if the ray never touches the box going forward.
    ///
    /// ```
    /// use cubetrace_base::{Ray, math::Aab};
    ///
    /// let aab = Aab::new(0.0, 4.0, 0.0, 4.0, 0.0, 4.0);
    /// assert_eq!(aab.ray_entry(&Ray::new([-2.0, 1.0, 1.0], [1.0, 0.0, 0.0])), Some(2.0));
    /// assert_eq!(aab.ray_entry(&Ray::new([-2.0, 1.0, 1.0], [-1.0, 0.0, 0.0])), None);
    /// ```
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn ray_entry(&self, ray: &Ray) -> Option<FreeCoordinate> {
        let mut t_enter: FreeCoordinate = 0.0;
        let mut t_exit = FreeCoordinate::INFINITY;
        for axis in Axis::ALL {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let lower = self.lower_bounds[axis];
            let upper = self.upper_bounds[axis];
            if direction == 0.0 {
                if origin < lower || origin > upper {
                    return None;
                }
                continue;
            }
            let t_lower = (lower - origin) / direction;
            let t_upper = (upper - origin) / direction;
            let (near, far) = if t_lower <= t_upper {
                (t_lower, t_upper)
            } else {
                (t_upper, t_lower)
            };
            t_enter = t_enter.max(near);
            t_exit = t_exit.min(far);
        }
        // NaN inputs make every comparison false, so check in the accepting direction.
        if t_enter <= t_exit {
            Some(t_enter)
        } else {
            None
        }
    }
}

impl fmt::Debug for Aab {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Aab {
            lower_bounds: l,
            upper_bounds: u,
        } = *self;
        f.debug_tuple("Aab")
            .field(&(l.x..=u.x))
            .field(&(l.y..=u.y))
            .field(&(l.z..=u.z))
            .finish()
    }
}
