//! Voxel mesh assembly: one pass over the grid, one instance per solid cell.

use crate::graph::{CubeGeometry, MeshInstance, SceneGraph};
use crate::structure::{Dimensions, PaletteEntry};
use blockmodel::{MaterialCache, Resolver};
use glam::IVec3;
use tracing::debug;

/// Qualified name of the empty-cell block
pub const AIR_BLOCK: &str = "minecraft:air";

/// Placed/skipped cell counts for one assembly pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleStats {
    pub placed: usize,
    pub skipped: usize,
}

/// Lattice coordinates of flat grid index `i`.
///
/// Storage order is Z-fastest, then Y, then X. This formula and
/// [`flat_index`] are exact inverses; reordering either misplaces every
/// block.
pub fn lattice_position(i: usize, dims: &Dimensions) -> IVec3 {
    let width = dims.width as usize;
    let height = dims.height as usize;
    let depth = dims.depth as usize;
    IVec3::new(
        ((i / (depth * height)) % width) as i32,
        ((i / depth) % height) as i32,
        (i % depth) as i32,
    )
}

/// Flat grid index of a lattice position; inverse of [`lattice_position`]
pub fn flat_index(position: IVec3, dims: &Dimensions) -> usize {
    position.z as usize
        + position.y as usize * dims.depth as usize
        + position.x as usize * dims.depth as usize * dims.height as usize
}

/// Build the scene graph for a decoded structure.
///
/// Empty cells — index `-1`, the air palette entry, indices past the
/// palette, or a nameless entry — are skipped. Materials come from the
/// per-run cache, so each distinct block name resolves at most once.
pub fn assemble(
    dims: &Dimensions,
    grid: &[i32],
    palette: &[PaletteEntry],
    cache: &MaterialCache,
    resolver: &Resolver,
) -> SceneGraph {
    let air_index = palette
        .iter()
        .position(|entry| entry.name == AIR_BLOCK)
        .map(|i| i as i32);

    let mut instances = Vec::new();
    let mut stats = AssembleStats::default();

    for i in 0..dims.volume() {
        // Indices past the grid's end count as empty (grid length is
        // never validated against the volume)
        let idx = grid.get(i).copied().unwrap_or(-1);
        if idx < 0 || Some(idx) == air_index || idx as usize >= palette.len() {
            stats.skipped += 1;
            continue;
        }
        let entry = &palette[idx as usize];
        if entry.name.is_empty() {
            stats.skipped += 1;
            continue;
        }

        let materials = cache.get_or_resolve(&entry.name, resolver);
        instances.push(MeshInstance {
            position: lattice_position(i, dims),
            materials,
        });
        stats.placed += 1;
    }

    debug!(
        placed = stats.placed,
        skipped = stats.skipped,
        blocks = cache.len(),
        "assembled scene graph"
    );

    SceneGraph {
        geometry: CubeGeometry::unit(),
        instances,
        stats,
    }
}
