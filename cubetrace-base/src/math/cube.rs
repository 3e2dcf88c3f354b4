use core::fmt;

use crate::math::{
    Aab, Axis, Face6, FreeCoordinate, FreePoint, FreeVector, GridCoordinate, GridPoint, GridVector,
};

/// “A cube”, in this documentation, is a unit cube whose corners' coordinates are integers.
/// This type identifies such a cube by the coordinates of its most negative corner.
///
/// Considered in continuous space, the ranges of coordinates a cube contains are half-open
/// intervals: lower inclusive and upper exclusive. [`Cube::containing_toward()`] relaxes
/// this for points that lie on a boundary, taking the direction of travel into account.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[allow(missing_docs, clippy::exhaustive_structs)]
pub struct Cube {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Cube {
    /// Equal to `Cube::new(0, 0, 0)`.
    ///
    /// Note that this is not a box _centered_ on the coordinate origin.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Construct `Cube { x, y, z }` from the given coordinates.
    #[inline]
    pub const fn new(x: GridCoordinate, y: GridCoordinate, z: GridCoordinate) -> Self {
        Self { x, y, z }
    }

    /// Convert a point in space to the unit cube that encloses it.
    ///
    /// Such cubes are defined to be half-open intervals on each axis; that is,
    /// an integer coordinate is counted as part of the cube extending positively
    /// from that coordinate.
    ///
    /// If the point coordinates are outside of the numeric range of [`GridCoordinate`],
    /// returns [`None`].
    ///
    /// ```
    /// use cubetrace_base::math::{FreePoint, Cube};
    ///
    /// assert_eq!(Cube::containing(FreePoint::new(1.0, 1.5, -2.5)), Some(Cube::new(1, 1, -3)));
    /// ```
    #[inline]
    pub fn containing(point: FreePoint) -> Option<Self> {
        let FreePoint { x, y, z, .. } = point;
        Some(Self {
            x: grid_coordinate(x.floor())?,
            y: grid_coordinate(y.floor())?,
            z: grid_coordinate(z.floor())?,
        })
    }

    /// Convert a point on a ray to the cube the ray is in, or is about to enter.
    ///
    /// On each axis, if the coordinate lies within `epsilon` of an integer boundary, it is
    /// treated as exactly on that boundary, and the cube is chosen by the sign of
    /// `direction` on that axis: a negative direction picks the cube behind the boundary,
    /// and a positive or zero direction picks the cube ahead of it. Coordinates farther
    /// than `epsilon` from a boundary behave exactly as in [`Cube::containing()`].
    ///
    /// Returns [`None`] if any coordinate is NaN or out of range.
    ///
    /// ```
    /// use cubetrace_base::math::{Cube, FreePoint, FreeVector};
    ///
    /// let on_boundary = FreePoint::new(2.0, 0.5, 0.5);
    /// assert_eq!(
    ///     Cube::containing_toward(on_boundary, FreeVector::new(-1.0, 0.0, 0.0), 1e-6),
    ///     Some(Cube::new(1, 0, 0)),
    /// );
    /// assert_eq!(
    ///     Cube::containing_toward(on_boundary, FreeVector::new(1.0, 0.0, 0.0), 1e-6),
    ///     Some(Cube::new(2, 0, 0)),
    /// );
    /// ```
    #[inline]
    pub fn containing_toward(
        point: FreePoint,
        direction: FreeVector,
        epsilon: FreeCoordinate,
    ) -> Option<Self> {
        let classify = |coordinate: FreeCoordinate, direction: FreeCoordinate| {
            let nearest = coordinate.round();
            if (coordinate - nearest).abs() <= epsilon {
                if direction < 0.0 {
                    grid_coordinate(nearest - 1.0)
                } else {
                    grid_coordinate(nearest)
                }
            } else {
                grid_coordinate(coordinate.floor())
            }
        };
        Some(Self {
            x: classify(point.x, direction.x)?,
            y: classify(point.y, direction.y)?,
            z: classify(point.z, direction.z)?,
        })
    }

    /// Returns the corner of this cube with the most negative coordinates.
    #[inline]
    pub fn lower_bounds(self) -> GridPoint {
        self.into()
    }

    /// Returns the center of this cube.
    #[inline]
    pub fn center(self) -> FreePoint {
        let Self { x, y, z } = self;
        FreePoint::new(
            FreeCoordinate::from(x) + 0.5,
            FreeCoordinate::from(y) + 0.5,
            FreeCoordinate::from(z) + 0.5,
        )
    }

    /// Returns the bounding box in floating-point coordinates containing this cube.
    ///
    /// ```
    /// use cubetrace_base::math::{Aab, Cube};
    ///
    /// assert_eq!(
    ///     Cube::new(10, 20, -30).aab(),
    ///     Aab::new(10.0, 11.0, 20.0, 21.0, -30.0, -29.0)
    /// );
    /// ```
    #[inline]
    pub fn aab(self) -> Aab {
        let lower = GridPoint::from(self).map(FreeCoordinate::from);
        Aab::from_lower_upper(lower, lower + FreeVector::new(1.0, 1.0, 1.0))
    }

    /// Apply a function to each coordinate independently.
    #[expect(clippy::return_self_not_must_use)]
    #[inline]
    pub fn map(self, mut f: impl FnMut(GridCoordinate) -> GridCoordinate) -> Self {
        Self {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }
}

/// Converts an already-integral float to [`GridCoordinate`] if it is in range.
#[inline]
fn grid_coordinate(value: FreeCoordinate) -> Option<GridCoordinate> {
    const MIN_INCLUSIVE: FreeCoordinate = GridCoordinate::MIN as FreeCoordinate;
    const MAX_INCLUSIVE: FreeCoordinate = GridCoordinate::MAX as FreeCoordinate;
    // NaN fails both comparisons.
    if (MIN_INCLUSIVE..=MAX_INCLUSIVE).contains(&value) {
        Some(value as GridCoordinate)
    } else {
        None
    }
}

impl fmt::Debug for Cube {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { x, y, z } = self;
        write!(f, "({x:+.3?}, {y:+.3?}, {z:+.3?})")
    }
}

mod arithmetic {
    use super::*;
    use core::ops;

    impl ops::Add<GridVector> for Cube {
        type Output = Self;
        #[inline]
        fn add(self, rhs: GridVector) -> Self::Output {
            Self::from(self.lower_bounds() + rhs)
        }
    }

    impl ops::Sub<Cube> for Cube {
        type Output = GridVector;
        #[inline]
        fn sub(self, rhs: Cube) -> Self::Output {
            self.lower_bounds() - rhs.lower_bounds()
        }
    }

    impl ops::Add<Face6> for Cube {
        type Output = Self;
        #[inline]
        fn add(self, rhs: Face6) -> Self::Output {
            self + rhs.normal_vector()
        }
    }

    impl ops::Index<Axis> for Cube {
        type Output = GridCoordinate;
        #[inline]
        fn index(&self, index: Axis) -> &Self::Output {
            match index {
                Axis::X => &self.x,
                Axis::Y => &self.y,
                Axis::Z => &self.z,
            }
        }
    }
    impl ops::IndexMut<Axis> for Cube {
        #[inline]
        fn index_mut(&mut self, index: Axis) -> &mut Self::Output {
            match index {
                Axis::X => &mut self.x,
                Axis::Y => &mut self.y,
                Axis::Z => &mut self.z,
            }
        }
    }
}

mod conversion {
    use super::*;

    impl From<Cube> for [GridCoordinate; 3] {
        #[inline]
        fn from(Cube { x, y, z }: Cube) -> [GridCoordinate; 3] {
            [x, y, z]
        }
    }
    impl From<Cube> for GridPoint {
        #[inline]
        fn from(Cube { x, y, z }: Cube) -> GridPoint {
            GridPoint::new(x, y, z)
        }
    }

    impl From<[GridCoordinate; 3]> for Cube {
        #[inline]
        fn from([x, y, z]: [GridCoordinate; 3]) -> Self {
            Self { x, y, z }
        }
    }
    impl From<GridPoint> for Cube {
        #[inline]
        fn from(GridPoint { x, y, z, _unit }: GridPoint) -> Self {
            Self { x, y, z }
        }
    }
}
