//! Walking a ray through the voxel grid to the next change of material.
//!
//! The only acceleration structure is the per-chunk occupancy count: inside a chunk with
//! no non-empty cells, the ray crosses the whole chunk in one step instead of one cell
//! at a time.

use cubetrace::material::Material;
use cubetrace::math::{Aab, Axis, Cube, Face6, FreeCoordinate, FreePoint, FreeVector};
use cubetrace::world::{ChunkPos, VoxelWorld};
use cubetrace::Ray;
use rand::Rng;

/// Distance within which a point is considered to lie exactly on a cell boundary.
///
/// A point within this distance of a boundary belongs to the cell on the side the ray is
/// moving toward; see [`Cube::containing_toward()`].
pub const BOUNDARY_EPSILON: FreeCoordinate = 1e-6;

/// Number of times a direction is perturbed when no face of the current box accepts the
/// ray, before falling back to the nearest plane.
const MAX_PERTURBATIONS: u32 = 8;

/// Size of the random offset added to a direction when perturbing it.
const PERTURBATION_SIZE: FreeCoordinate = 1e-9;

/// Result of [`trace()`]: what the ray found, plus counters for statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct Traversal {
    /// Where the ray stopped.
    pub crossing: Crossing,
    /// Number of boxes (cells or whole chunks) the ray was stepped through.
    pub steps: u32,
    /// Number of times the direction had to be perturbed to get out of a box.
    pub perturbations: u32,
}

/// Where a traced ray stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
#[expect(clippy::exhaustive_enums)]
pub enum Crossing {
    /// The ray left the world without meeting a change of material.
    Escaped {
        /// Where the ray left the world (or, if it never entered, its origin).
        point: FreePoint,
        /// Direction of the ray at that point.
        direction: FreeVector,
        /// The face of the world's bounds the ray left through, or [`None`] if the ray
        /// never entered the world or had no usable direction.
        face: Option<Face6>,
    },
    /// The ray moved into a cube of a different material, or into foliage.
    Surface(Surface),
}

/// A boundary between materials which a ray crossed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct Surface {
    /// Point on the boundary.
    pub point: FreePoint,
    /// The face of [`Self::cube`] the ray entered through. Its normal points back
    /// toward where the ray came from.
    pub face: Face6,
    /// The cube the ray entered.
    pub cube: Cube,
    /// Material the ray was travelling through.
    pub previous: Material,
    /// Material of [`Self::cube`].
    pub next: Material,
    /// Distance from the ray's origin to [`Self::point`].
    pub distance: FreeCoordinate,
}

impl Crossing {
    /// Returns the surface, if there is one.
    pub fn surface(&self) -> Option<&Surface> {
        match self {
            Crossing::Surface(surface) => Some(surface),
            Crossing::Escaped { .. } => None,
        }
    }
}

/// Follows `ray` through `world` until it either leaves the world or crosses into a
/// cube whose material differs from the material the ray started in.
///
/// The starting cube is classified by [`Cube::containing_toward()`], so a ray starting on a
/// boundary and moving negatively starts in the cube behind the boundary. A ray starting
/// outside the world first jumps to where it enters the world.
///
/// `rng` is used only for perturbing directions which meet a numerical degeneracy.
pub fn trace<R: Rng + ?Sized>(world: &VoxelWorld, ray: Ray, rng: &mut R) -> Traversal {
    let mut steps = 0;
    let mut perturbations = 0;
    let finish = |crossing, steps, perturbations| Traversal {
        crossing,
        steps,
        perturbations,
    };
    let escape_at_origin = Crossing::Escaped {
        point: ray.origin,
        direction: ray.direction,
        face: None,
    };

    let Some(Ray {
        origin,
        direction: mut dir,
    }) = ray.normalized()
    else {
        return finish(escape_at_origin, 0, 0);
    };
    let Some(start_cube) = Cube::containing_toward(origin, dir, BOUNDARY_EPSILON) else {
        return finish(escape_at_origin, 0, 0);
    };
    let current = world.get_material(start_cube);
    let mut point = origin;
    let mut cube = start_cube;

    if !world.contains_cube(start_cube) {
        let bounds = world.bounds();
        let unit_ray = Ray::new(origin, dir);
        let Some(t) = bounds.ray_entry(&unit_ray) else {
            return finish(escape_at_origin, 0, 0);
        };
        let entry_point = unit_ray.at(t);
        let entry_cube = Cube::containing_toward(entry_point, dir, BOUNDARY_EPSILON)
            .filter(|&c| world.contains_cube(c));
        let Some(entry_cube) = entry_cube else {
            // Grazing an edge or corner of the world without going inside.
            return finish(escape_at_origin, 0, 0);
        };
        steps += 1;
        let next = world.get_material_in_bounds(entry_cube);
        if next != current || next.is_foliage() {
            return finish(
                Crossing::Surface(Surface {
                    point: entry_point,
                    face: entry_face(&bounds, entry_point, dir),
                    cube: entry_cube,
                    previous: current,
                    next,
                    distance: t,
                }),
                steps,
                perturbations,
            );
        }
        point = entry_point;
        cube = entry_cube;
    }

    // Every step enters a new cube further along the ray, so this is never reached
    // except through a bug; it keeps a bug from becoming a hang.
    let size = world.size();
    let max_steps = 4 * (size.width + size.height + size.depth) + 16;

    loop {
        if steps >= max_steps {
            log::debug!("ray {origin:?} {dir:?} exceeded {max_steps} steps");
            return finish(
                Crossing::Escaped {
                    point,
                    direction: dir,
                    face: None,
                },
                steps,
                perturbations,
            );
        }
        steps += 1;

        let chunk = ChunkPos::containing(cube);
        let test_box = if world.chunk_is_empty(chunk) {
            chunk.bounds()
        } else {
            cube.aab()
        };

        let (face, t) = exit_with_retries(&test_box, point, &mut dir, rng, &mut perturbations);
        let mut exit_point = point + dir * t;
        exit_point[face.axis()] = test_box.face_plane(face);

        let next_cube = Cube::containing_toward(exit_point, dir, BOUNDARY_EPSILON)
            .filter(|&c| world.contains_cube(c));
        let Some(next_cube) = next_cube else {
            return finish(
                Crossing::Escaped {
                    point: exit_point,
                    direction: dir,
                    face: Some(face),
                },
                steps,
                perturbations,
            );
        };

        let next = world.get_material_in_bounds(next_cube);
        if next != current || next.is_foliage() {
            return finish(
                Crossing::Surface(Surface {
                    point: exit_point,
                    face: face.opposite(),
                    cube: next_cube,
                    previous: current,
                    next,
                    distance: (exit_point - origin).length(),
                }),
                steps,
                perturbations,
            );
        }
        point = exit_point;
        cube = next_cube;
    }
}

/// Finds the face through which a ray at `point` (which should be inside `aab`) moving in
/// direction `direction` leaves the box, and the ray parameter at which it does so.
///
/// Only faces the direction can cross are considered, in X, Y, Z order; the first whose
/// crossing point lies within the box (with tolerance [`BOUNDARY_EPSILON`]) is chosen.
/// Returns [`None`] if numerical error leaves no face acceptable.
pub fn exit_face(
    aab: &Aab,
    point: FreePoint,
    direction: FreeVector,
) -> Option<(Face6, FreeCoordinate)> {
    Axis::ALL.into_iter().find_map(|axis| {
        let (face, t) = face_crossing(aab, point, direction, axis)?;
        let t = t.max(0.0);
        aab.contains_within(point + direction * t, BOUNDARY_EPSILON)
            .then_some((face, t))
    })
}

/// The face on `axis` that `direction` moves toward, and the ray parameter at which its
/// plane is reached (negative if the point is already past the plane).
#[inline]
fn face_crossing(
    aab: &Aab,
    point: FreePoint,
    direction: FreeVector,
    axis: Axis,
) -> Option<(Face6, FreeCoordinate)> {
    let d = direction[axis];
    if d == 0.0 || !d.is_finite() {
        return None;
    }
    let face = Face6::exit_face(axis, d);
    Some((face, (aab.face_plane(face) - point[axis]) / d))
}

/// [`exit_face()`], recovering from degeneracies by perturbing `direction` in place and
/// finally by choosing the nearest plane.
fn exit_with_retries<R: Rng + ?Sized>(
    aab: &Aab,
    point: FreePoint,
    direction: &mut FreeVector,
    rng: &mut R,
    perturbations: &mut u32,
) -> (Face6, FreeCoordinate) {
    for _ in 0..MAX_PERTURBATIONS {
        if let Some(exit) = exit_face(aab, point, *direction) {
            return exit;
        }
        *perturbations += 1;
        let offset = FreeVector::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        ) * PERTURBATION_SIZE;
        let perturbed = *direction + offset;
        if perturbed.square_length() > 0.0 {
            *direction = perturbed.normalize();
        }
        log::trace!("perturbed ray at {point:?} to {direction:?}");
    }
    if let Some(exit) = exit_face(aab, point, *direction) {
        return exit;
    }
    nearest_exit(aab, point, *direction)
}

/// Chooses the plane ahead of the ray which it reaches first, ignoring whether the
/// crossing point lies on the box. If every plane is behind, chooses the nearest one.
fn nearest_exit(aab: &Aab, point: FreePoint, direction: FreeVector) -> (Face6, FreeCoordinate) {
    let crossings = || {
        Axis::ALL
            .into_iter()
            .filter_map(|axis| face_crossing(aab, point, direction, axis))
    };
    crossings()
        .filter(|&(_, t)| t >= 0.0)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .or_else(|| crossings().max_by(|a, b| a.1.total_cmp(&b.1)))
        .map(|(face, t)| (face, t.max(0.0)))
        // Only a zero direction has no candidates, and directions are normalized.
        .unwrap_or((Face6::PY, 0.0))
}

/// The face of `bounds` through which a ray at `point` with `direction` enters the box.
fn entry_face(bounds: &Aab, point: FreePoint, direction: FreeVector) -> Face6 {
    let on_entry_plane = |axis: Axis| {
        let d = direction[axis];
        let face = Face6::exit_face(axis, -d);
        (d != 0.0 && (point[axis] - bounds.face_plane(face)).abs() <= BOUNDARY_EPSILON)
            .then_some(face)
    };
    Axis::ALL
        .into_iter()
        .find_map(on_entry_plane)
        .unwrap_or_else(|| {
            let axis = Axis::ALL
                .into_iter()
                .max_by(|&a, &b| direction[a].abs().total_cmp(&direction[b].abs()))
                .unwrap_or(Axis::Y);
            Face6::exit_face(axis, -direction[axis])
        })
}
