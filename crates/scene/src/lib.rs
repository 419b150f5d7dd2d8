//! Scene construction from decoded structure files.
//!
//! [`structure::decode_structure`] validates a decoded tag tree into
//! dimensions, a flat voxel grid, and a block palette;
//! [`assemble::assemble`] turns those into a [`graph::SceneGraph`] of
//! positioned mesh instances sharing one unit-cube geometry template; and
//! [`io::glb::serialize_glb`] encodes the graph into a binary scene
//! container.

pub mod assemble;
pub mod graph;
pub mod io;
pub mod structure;

pub use assemble::{assemble, flat_index, lattice_position, AssembleStats, AIR_BLOCK};
pub use graph::{CubeGeometry, MeshInstance, SceneGraph};
pub use io::glb::{serialize_glb, GlbError};
pub use structure::{decode_structure, Dimensions, PaletteEntry, FormatError, VoxelGrid};
