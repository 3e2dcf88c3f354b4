//! Procedurally generated worlds, for demonstration and testing.

use noise::NoiseFn as _;
use rand::{Rng as _, SeedableRng as _};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::material::Material;
use crate::math::{Cube, FreePoint, GridCoordinate, GridSize};
use crate::world::{VoxelWorld, WorldError};

/// Sea level of [`demo_world()`].
pub const DEMO_SEA_LEVEL: GridCoordinate = 24;

/// A world whose bottom layer is [`Material::Log`] and which is otherwise empty.
pub fn flat_world(
    size_in_chunks: GridSize,
    sea_level: GridCoordinate,
) -> Result<VoxelWorld, WorldError> {
    let mut world = VoxelWorld::new(size_in_chunks, sea_level)?;
    let size = world.size();
    world.fill(
        Cube::ORIGIN,
        Cube::new(extent(size.width), 1, extent(size.depth)),
        Material::Log,
    );
    Ok(world)
}

/// A 4×4×4-chunk landscape: rolling terrain with ores, sea water up to
/// [`DEMO_SEA_LEVEL`], a glass tower, and a tree.
///
/// The same `seed` always produces the same world.
pub fn demo_world(seed: u64) -> Result<VoxelWorld, WorldError> {
    let mut world = VoxelWorld::new(GridSize::new(4, 4, 4), DEMO_SEA_LEVEL)?;
    let rng = &mut Xoshiro256PlusPlus::seed_from_u64(seed);
    let size = world.size();
    let (width, height, depth) = (extent(size.width), extent(size.height), extent(size.depth));
    let sea_level = world.sea_level();

    // Truncation is fine; any 32 bits of the seed make a distinct landscape.
    let broad = noise::Value::new(seed as u32);
    let detail = noise::Value::new((seed >> 32) as u32 ^ 0x5eed);
    let surface_height = |x: GridCoordinate, z: GridCoordinate| -> GridCoordinate {
        let (x, z) = (f64::from(x), f64::from(z));
        let value = 8.0 * broad.get([x / 24.0, z / 24.0]) + 3.0 * detail.get([x / 7.0, z / 7.0]);
        (f64::from(sea_level) + value).round().clamp(2.0, f64::from(height - 8)) as GridCoordinate
    };

    for x in 0..width {
        for z in 0..depth {
            let top = surface_height(x, z);
            for y in 0..top {
                let material = if y == 0 {
                    Material::Bedrock
                } else if y < top - 3 {
                    ore_or_stone(rng, y)
                } else if top <= sea_level + 1 {
                    Material::Sand
                } else {
                    Material::Dirt
                };
                world.set(Cube::new(x, y, z), material)?;
            }
            for y in top..sea_level {
                world.set(Cube::new(x, y, z), Material::Water)?;
            }
        }
    }

    // Tower of glass standing on an obsidian foundation, with a quartz roof.
    let (tower_x, tower_z) = (width * 3 / 4, depth / 4);
    let tower_base = ground_level(&world, tower_x + 2, tower_z + 2).max(sea_level);
    world.fill(
        Cube::new(tower_x, tower_base - 1, tower_z),
        Cube::new(tower_x + 5, tower_base, tower_z + 5),
        Material::Obsidian,
    );
    world.fill(
        Cube::new(tower_x, tower_base, tower_z),
        Cube::new(tower_x + 5, tower_base + 12, tower_z + 5),
        Material::Glass,
    );
    world.fill(
        Cube::new(tower_x + 1, tower_base, tower_z + 1),
        Cube::new(tower_x + 4, tower_base + 11, tower_z + 4),
        Material::Air,
    );
    world.fill(
        Cube::new(tower_x, tower_base + 12, tower_z),
        Cube::new(tower_x + 5, tower_base + 13, tower_z + 5),
        Material::Quartz,
    );

    // Tree on the first dry spot found, or in the middle if there is none.
    let (tree_x, tree_z) = (0..64)
        .map(|_| (rng.random_range(4..width / 2), rng.random_range(depth / 2..depth - 4)))
        .find(|&(x, z)| ground_level(&world, x, z) > sea_level)
        .unwrap_or((width / 2, depth / 2));
    let tree_base = ground_level(&world, tree_x, tree_z);
    plant_tree(&mut world, Cube::new(tree_x, tree_base, tree_z), 5)?;

    log::debug!("generated demo world: {}", world.composition());
    Ok(world)
}

/// A point above the ground in the horizontal center of the world, suitable for a camera.
pub fn spawn_point(world: &VoxelWorld) -> FreePoint {
    let size = world.size();
    let x = extent(size.width) / 2;
    let z = extent(size.depth) / 2;
    let ground = world
        .column_top(x, z)
        .map_or(world.sea_level(), |top| top + 1)
        .max(world.sea_level());
    world.center_at_height(f64::from(ground) + 2.0)
}

fn plant_tree(
    world: &mut VoxelWorld,
    base: Cube,
    trunk_height: GridCoordinate,
) -> Result<(), WorldError> {
    let crown = base.y + trunk_height;
    for dx in -2..=2 {
        for dy in -2..=1 {
            for dz in -2..=2 {
                // Round off the corners of the canopy.
                if dx * dx + dz * dz + dy * dy > 6 {
                    continue;
                }
                let cube = Cube::new(base.x + dx, crown + dy, base.z + dz);
                if world.contains_cube(cube) {
                    world.set(cube, Material::Leaf)?;
                }
            }
        }
    }
    for y in base.y..crown {
        let cube = Cube::new(base.x, y, base.z);
        if world.contains_cube(cube) {
            world.set(cube, Material::Log)?;
        }
    }
    Ok(())
}

fn ore_or_stone(rng: &mut Xoshiro256PlusPlus, y: GridCoordinate) -> Material {
    if !rng.random_bool(0.04) {
        return Material::Stone;
    }
    match rng.random_range(0..y.max(1)) {
        0..=3 => Material::Diamond,
        4..=7 => Material::Gold,
        8..=13 => Material::Iron,
        _ => Material::Coal,
    }
}

/// The lowest height at which the column has nothing but air and water above.
fn ground_level(world: &VoxelWorld, x: GridCoordinate, z: GridCoordinate) -> GridCoordinate {
    let height = extent(world.size().height);
    (0..height)
        .rev()
        .find(|&y| {
            let material = world.get_material(Cube::new(x, y, z));
            !(material.is_empty() || material.is_liquid())
        })
        .map_or(0, |y| y + 1)
}

fn extent(size: u32) -> GridCoordinate {
    GridCoordinate::try_from(size).unwrap_or(GridCoordinate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ChunkPos;
    use pretty_assertions::assert_eq;

    #[test]
    fn flat_world_floor() {
        let world = flat_world(GridSize::new(2, 1, 2), 0).unwrap();
        let composition = world.composition();
        assert_eq!(composition.count(Material::Log), 32 * 32);
        assert_eq!(world.get_material(Cube::new(5, 0, 7)), Material::Log);
        assert_eq!(world.get_material(Cube::new(5, 1, 7)), Material::Air);
        assert_eq!(world.chunk_filled_count(ChunkPos::new(1, 0, 1)), Some(16 * 16));
    }

    #[test]
    fn demo_world_is_deterministic() {
        let a = demo_world(7).unwrap();
        let b = demo_world(7).unwrap();
        assert_eq!(a.composition(), b.composition());
        for x in (0..64).step_by(5) {
            for z in (0..64).step_by(3) {
                assert_eq!(a.column_top(x, z), b.column_top(x, z));
            }
        }
    }

    #[test]
    fn demo_world_contents() {
        let world = demo_world(0).unwrap();
        let composition = world.composition();
        for material in [
            Material::Bedrock,
            Material::Stone,
            Material::Water,
            Material::Glass,
            Material::Quartz,
            Material::Log,
            Material::Leaf,
        ] {
            assert!(composition.count(material) > 0, "no {material} in {composition}");
        }
        assert_eq!(composition.count(Material::Bedrock), 64 * 64);
        // Nothing but air at the top of the world.
        assert!(world.chunk_is_empty(ChunkPos::new(0, 3, 0)));
    }

    #[test]
    fn spawn_point_is_in_open_air() {
        let world = demo_world(3).unwrap();
        let spawn = spawn_point(&world);
        let cube = Cube::containing(spawn).unwrap();
        assert_eq!(world.get_material(cube), Material::Air);
        assert!(spawn.y >= f64::from(DEMO_SEA_LEVEL));
    }
}
