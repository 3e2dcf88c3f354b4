//! [`VoxelWorld`], the grid of materials that rays are traced through.

use core::fmt;

use crate::material::Material;
use crate::math::{Aab, Cube, FreeCoordinate, FreePoint, GridCoordinate, GridSize, GridSizeCoord};

/// Edge length, in cells, of the cubical chunks a [`VoxelWorld`] is partitioned into.
pub const CHUNK_SIZE: GridCoordinate = 16;

/// Type to distinguish chunk coordinates from cube coordinates.
///
/// Chunk math is generally just like cube math (hence the type of the field), but we
/// don't want to confuse the two and forget to multiply or divide.
/// A `ChunkPos(Cube::new(x, y, z))` identifies the chunk which contains the cubes with `x`
/// coordinates in the half-open range `x * CHUNK_SIZE..(x + 1) * CHUNK_SIZE`, and
/// similarly for the `y` and `z` axes.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct ChunkPos(pub Cube);

impl fmt::Debug for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(Cube { x, y, z }) = *self;
        write!(f, "ChunkPos({x}, {y}, {z})")
    }
}

impl ChunkPos {
    /// Construct a [`ChunkPos`] from chunk coordinates
    /// (i.e. successive numbers indicate adjacent chunks).
    pub const fn new(x: GridCoordinate, y: GridCoordinate, z: GridCoordinate) -> Self {
        Self(Cube::new(x, y, z))
    }

    /// Returns the chunk containing the given cube.
    #[inline]
    pub fn containing(cube: Cube) -> Self {
        Self(cube.map(|c| c.div_euclid(CHUNK_SIZE)))
    }

    /// Returns the bounds of this chunk in world coordinates.
    #[inline]
    pub fn bounds(self) -> Aab {
        let lower = self
            .0
            .lower_bounds()
            .map(|c| FreeCoordinate::from(c) * FreeCoordinate::from(CHUNK_SIZE));
        let edge = FreeCoordinate::from(CHUNK_SIZE);
        Aab::from_lower_upper(lower, lower + euclid::vec3(edge, edge, edge))
    }
}

/// Errors from constructing or modifying a [`VoxelWorld`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum WorldError {
    /// The requested size is empty or too large to address.
    #[error("world size {size_in_chunks:?} chunks is empty or too large")]
    InvalidSize {
        /// The requested size, in chunks.
        size_in_chunks: GridSize,
    },
    /// A cube outside the world was to be modified.
    #[error("cube {cube:?} is outside the world")]
    OutOfBounds {
        /// The cube which was out of bounds.
        cube: Cube,
    },
}

/// A 3D grid of [`Material`]s with per-chunk occupancy counts.
///
/// The world occupies the cubes from the origin up to (excluding) [`VoxelWorld::size()`]
/// on each axis. Outside of it, every cube below [`VoxelWorld::sea_level()`] reads as
/// [`Material::Water`] and every other cube as [`Material::Air`].
///
/// Each chunk stores a count of its non-empty cells, which is kept consistent by every
/// mutation; readers may use [`VoxelWorld::chunk_is_empty()`] to skip whole chunks.
#[derive(Clone)]
pub struct VoxelWorld {
    size_in_chunks: GridSize,
    size: GridSize,
    sea_level: GridCoordinate,
    cells: Box<[Material]>,
    filled: Box<[u32]>,
}

impl VoxelWorld {
    /// Constructs a world of [`Material::Air`] with the given size in chunks.
    pub fn new(size_in_chunks: GridSize, sea_level: GridCoordinate) -> Result<Self, WorldError> {
        let invalid = || WorldError::InvalidSize { size_in_chunks };
        if size_in_chunks.width == 0 || size_in_chunks.height == 0 || size_in_chunks.depth == 0 {
            return Err(invalid());
        }
        let chunk_edge = CHUNK_SIZE.cast_unsigned();
        let size = GridSize::new(
            size_in_chunks.width.checked_mul(chunk_edge).ok_or_else(invalid)?,
            size_in_chunks.height.checked_mul(chunk_edge).ok_or_else(invalid)?,
            size_in_chunks.depth.checked_mul(chunk_edge).ok_or_else(invalid)?,
        );
        // Every in-bounds coordinate must be a valid `GridCoordinate`.
        if [size.width, size.height, size.depth]
            .into_iter()
            .any(|s| GridCoordinate::try_from(s).is_err())
        {
            return Err(invalid());
        }
        let volume = volume_usize(size).ok_or_else(invalid)?;
        let chunk_count = volume_usize(size_in_chunks).ok_or_else(invalid)?;

        Ok(Self {
            size_in_chunks,
            size,
            sea_level,
            cells: vec![Material::Air; volume].into_boxed_slice(),
            filled: vec![0; chunk_count].into_boxed_slice(),
        })
    }

    /// Size of the world in cubes.
    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Size of the world in chunks.
    #[inline]
    pub fn size_in_chunks(&self) -> GridSize {
        self.size_in_chunks
    }

    /// The height below which cubes outside the world are water.
    #[inline]
    pub fn sea_level(&self) -> GridCoordinate {
        self.sea_level
    }

    /// The region the world occupies, in continuous coordinates.
    pub fn bounds(&self) -> Aab {
        Aab::from_lower_upper(
            FreePoint::origin(),
            FreePoint::new(
                self.size.width.into(),
                self.size.height.into(),
                self.size.depth.into(),
            ),
        )
    }

    /// A point in the horizontal center of the world, at the given height.
    pub fn center_at_height(&self, y: FreeCoordinate) -> FreePoint {
        FreePoint::new(
            FreeCoordinate::from(self.size.width) / 2.0,
            y,
            FreeCoordinate::from(self.size.depth) / 2.0,
        )
    }

    /// Returns whether the cube is inside the world.
    #[inline]
    pub fn contains_cube(&self, cube: Cube) -> bool {
        in_extent(cube.x, self.size.width)
            && in_extent(cube.y, self.size.height)
            && in_extent(cube.z, self.size.depth)
    }

    /// Returns the material at the given cube.
    ///
    /// Cubes outside the world are water below sea level and air otherwise.
    #[inline]
    pub fn get_material(&self, cube: Cube) -> Material {
        if self.contains_cube(cube) {
            self.get_material_in_bounds(cube)
        } else if cube.y < self.sea_level {
            Material::Water
        } else {
            Material::Air
        }
    }

    /// Returns the material at the given cube, which the caller has already checked is
    /// [inside the world](Self::contains_cube).
    ///
    /// The result is unspecified (but memory-safe) for cubes outside the world.
    #[inline]
    pub fn get_material_in_bounds(&self, cube: Cube) -> Material {
        debug_assert!(self.contains_cube(cube), "{cube:?} out of bounds");
        self.cells
            .get(self.cell_index(cube))
            .copied()
            .unwrap_or_default()
    }

    /// Returns whether the chunk contains no non-empty cells.
    ///
    /// Chunks outside the world are reported as empty.
    #[inline]
    pub fn chunk_is_empty(&self, chunk: ChunkPos) -> bool {
        self.chunk_index(chunk)
            .and_then(|index| self.filled.get(index))
            .is_none_or(|&count| count == 0)
    }

    /// Returns the number of non-empty cells in the chunk, or [`None`] if the chunk is
    /// outside the world.
    pub fn chunk_filled_count(&self, chunk: ChunkPos) -> Option<u32> {
        self.filled.get(self.chunk_index(chunk)?).copied()
    }

    /// Replace the material at the given cube, keeping its chunk's count consistent.
    ///
    /// Returns whether the material changed.
    pub fn set(&mut self, cube: Cube, material: Material) -> Result<bool, WorldError> {
        if !self.contains_cube(cube) {
            return Err(WorldError::OutOfBounds { cube });
        }
        let index = self.cell_index(cube);
        let chunk_index = self
            .chunk_index(ChunkPos::containing(cube))
            .ok_or(WorldError::OutOfBounds { cube })?;
        let old = core::mem::replace(&mut self.cells[index], material);
        if old == material {
            return Ok(false);
        }
        let count = &mut self.filled[chunk_index];
        match (old.is_empty(), material.is_empty()) {
            (true, false) => *count += 1,
            (false, true) => *count -= 1,
            _ => {}
        }
        Ok(true)
    }

    /// Sets every cube in the box from `lower` (inclusive) to `upper` (exclusive) to
    /// `material`. Cubes of the box outside the world are ignored.
    pub fn fill(&mut self, lower: Cube, upper: Cube, material: Material) {
        let clamp = |c: GridCoordinate, extent: GridSizeCoord| {
            c.clamp(0, GridCoordinate::try_from(extent).unwrap_or(GridCoordinate::MAX))
        };
        for x in clamp(lower.x, self.size.width)..clamp(upper.x, self.size.width) {
            for y in clamp(lower.y, self.size.height)..clamp(upper.y, self.size.height) {
                for z in clamp(lower.z, self.size.depth)..clamp(upper.z, self.size.depth) {
                    // In bounds by construction.
                    let _ = self.set(Cube::new(x, y, z), material);
                }
            }
        }
    }

    /// Returns the height of the highest non-empty cube in the column at `x, z`,
    /// or [`None`] if the column is empty or outside the world.
    pub fn column_top(&self, x: GridCoordinate, z: GridCoordinate) -> Option<GridCoordinate> {
        let height = GridCoordinate::try_from(self.size.height).ok()?;
        (0..height)
            .rev()
            .map(|y| Cube::new(x, y, z))
            .filter(|&cube| self.contains_cube(cube))
            .find(|&cube| !self.get_material_in_bounds(cube).is_empty())
            .map(|cube| cube.y)
    }

    /// Counts the cells of each material.
    pub fn composition(&self) -> Composition {
        let mut counts = [0; Material::COUNT];
        for &material in self.cells.iter() {
            counts[material.index()] += 1;
        }
        Composition { counts }
    }

    #[inline]
    fn cell_index(&self, cube: Cube) -> usize {
        // Coordinates are nonnegative when in bounds; others produce some index which
        // is either out of range or harmlessly wrong.
        let (x, y, z) = (cube.x as usize, cube.y as usize, cube.z as usize);
        x.wrapping_mul(self.size.height as usize)
            .wrapping_add(y)
            .wrapping_mul(self.size.depth as usize)
            .wrapping_add(z)
    }

    #[inline]
    fn chunk_index(&self, ChunkPos(chunk): ChunkPos) -> Option<usize> {
        let size = self.size_in_chunks;
        if !(in_extent(chunk.x, size.width)
            && in_extent(chunk.y, size.height)
            && in_extent(chunk.z, size.depth))
        {
            return None;
        }
        let (x, y, z) = (chunk.x as usize, chunk.y as usize, chunk.z as usize);
        Some((x * size.height as usize + y) * size.depth as usize + z)
    }
}

impl fmt::Debug for VoxelWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoxelWorld")
            .field("size_in_chunks", &self.size_in_chunks)
            .field("sea_level", &self.sea_level)
            .finish_non_exhaustive()
    }
}

#[inline]
fn in_extent(coordinate: GridCoordinate, extent: GridSizeCoord) -> bool {
    u32::try_from(coordinate).is_ok_and(|c| c < extent)
}

fn volume_usize(size: GridSize) -> Option<usize> {
    usize::try_from(size.width)
        .ok()?
        .checked_mul(usize::try_from(size.height).ok()?)?
        .checked_mul(usize::try_from(size.depth).ok()?)
}

/// Number of cells of each [`Material`] in a [`VoxelWorld`],
/// as returned by [`VoxelWorld::composition()`].
///
/// Formats with [`Display`](fmt::Display) as a list of the nonzero counts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Composition {
    counts: [usize; Material::COUNT],
}

impl Composition {
    /// Returns the number of cells of the given material.
    pub fn count(&self, material: Material) -> usize {
        self.counts[material.index()]
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for material in Material::all() {
            let count = self.count(material);
            if count == 0 {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{material}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::{Rng as _, SeedableRng as _};

    fn small_world() -> VoxelWorld {
        VoxelWorld::new(GridSize::new(2, 2, 2), 8).unwrap()
    }

    #[test]
    fn invalid_sizes() {
        assert_eq!(
            VoxelWorld::new(GridSize::new(0, 1, 1), 0).unwrap_err(),
            WorldError::InvalidSize {
                size_in_chunks: GridSize::new(0, 1, 1)
            }
        );
        assert!(VoxelWorld::new(GridSize::new(u32::MAX, 1, 1), 0).is_err());
    }

    #[test]
    fn out_of_bounds_follows_sea_level() {
        let world = small_world();
        assert_eq!(world.get_material(Cube::new(-1, 7, 0)), Material::Water);
        assert_eq!(world.get_material(Cube::new(-1, 8, 0)), Material::Air);
        assert_eq!(world.get_material(Cube::new(5, -3, 40)), Material::Water);
        assert_eq!(world.get_material(Cube::new(5, 3, 5)), Material::Air);
    }

    #[test]
    fn set_and_get() {
        let mut world = small_world();
        let cube = Cube::new(17, 3, 31);
        assert_eq!(world.set(cube, Material::Gold), Ok(true));
        assert_eq!(world.set(cube, Material::Gold), Ok(false));
        assert_eq!(world.get_material(cube), Material::Gold);
        assert_eq!(world.get_material_in_bounds(cube), Material::Gold);
        assert_eq!(
            world.set(Cube::new(32, 0, 0), Material::Gold),
            Err(WorldError::OutOfBounds {
                cube: Cube::new(32, 0, 0)
            })
        );
    }

    #[test]
    fn chunk_counts_stay_consistent() {
        let mut world = small_world();
        let mut rng = rand_xoshiro::Xoshiro256Plus::seed_from_u64(0);
        let materials: Vec<Material> = Material::all().collect();
        for _ in 0..5000 {
            let cube = Cube::new(
                rng.random_range(0..32),
                rng.random_range(0..32),
                rng.random_range(0..32),
            );
            let material = materials[rng.random_range(0..materials.len())];
            world.set(cube, material).unwrap();
        }

        for cx in 0..2 {
            for cy in 0..2 {
                for cz in 0..2 {
                    let chunk = ChunkPos::new(cx, cy, cz);
                    let mut expected = 0;
                    for x in 0..CHUNK_SIZE {
                        for y in 0..CHUNK_SIZE {
                            for z in 0..CHUNK_SIZE {
                                let cube = Cube::new(
                                    cx * CHUNK_SIZE + x,
                                    cy * CHUNK_SIZE + y,
                                    cz * CHUNK_SIZE + z,
                                );
                                if !world.get_material(cube).is_empty() {
                                    expected += 1;
                                }
                            }
                        }
                    }
                    assert_eq!(world.chunk_filled_count(chunk), Some(expected));
                    assert_eq!(world.chunk_is_empty(chunk), expected == 0);
                }
            }
        }
    }

    #[test]
    fn chunk_is_empty_outside() {
        let mut world = small_world();
        world.fill(Cube::ORIGIN, Cube::new(32, 32, 32), Material::Stone);
        assert!(!world.chunk_is_empty(ChunkPos::new(0, 0, 0)));
        assert!(world.chunk_is_empty(ChunkPos::new(-1, 0, 0)));
        assert!(world.chunk_is_empty(ChunkPos::new(0, 2, 0)));
        assert_eq!(world.chunk_filled_count(ChunkPos::new(0, 2, 0)), None);
    }

    #[test]
    fn chunk_containing_negative() {
        assert_eq!(
            ChunkPos::containing(Cube::new(-1, 15, 16)),
            ChunkPos::new(-1, 0, 1)
        );
        assert_eq!(
            ChunkPos::new(1, 0, -1).bounds(),
            Aab::new(16.0, 32.0, 0.0, 16.0, -16.0, 0.0)
        );
    }

    #[test]
    fn fill_clips_and_composition_counts() {
        let mut world = small_world();
        world.fill(Cube::new(-5, 0, -5), Cube::new(2, 1, 2), Material::Sand);
        world.set(Cube::new(0, 5, 0), Material::Glass).unwrap();
        let composition = world.composition();
        assert_eq!(composition.count(Material::Sand), 4);
        assert_eq!(composition.count(Material::Glass), 1);
        assert_eq!(composition.count(Material::Air), 32 * 32 * 32 - 5);
        assert_eq!(
            composition.to_string(),
            format!("air: {}, sand: 4, glass: 1", 32 * 32 * 32 - 5)
        );
        assert_eq!(world.column_top(0, 0), Some(5));
        assert_eq!(world.column_top(1, 1), Some(0));
        assert_eq!(world.column_top(20, 20), None);
    }
}
