//! Scene graph: positioned mesh instances over one shared geometry template.

use crate::assemble::AssembleStats;
use blockmodel::{Face, FaceMaterials};
use glam::IVec3;
use std::sync::Arc;

/// Shared unit-cube geometry template.
///
/// Four vertices per face, faces emitted in [`Face::ALL`] slot order — the
/// same order the resolver fills material slots in. The two orders form one
/// contract; a mesh instance's slot `n` material belongs to the template's
/// face `n`.
#[derive(Debug, Clone)]
pub struct CubeGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Two triangles per face, indexing into the shared vertex arrays
    pub face_indices: [[u16; 6]; 6],
}

impl CubeGeometry {
    pub const VERTEX_COUNT: usize = 24;

    /// Build the template for the axis-aligned unit cube at the origin
    pub fn unit() -> Self {
        let mut positions = Vec::with_capacity(Self::VERTEX_COUNT);
        let mut normals = Vec::with_capacity(Self::VERTEX_COUNT);
        let mut uvs = Vec::with_capacity(Self::VERTEX_COUNT);
        let mut face_indices = [[0u16; 6]; 6];

        for face in Face::iter() {
            let base = (face.index() * 4) as u16;
            positions.extend_from_slice(&face.vertices());
            normals.extend_from_slice(&[face.normal().to_array(); 4]);
            uvs.extend_from_slice(&face.uvs());
            face_indices[face.index()] = [base, base + 1, base + 2, base, base + 2, base + 3];
        }

        Self {
            positions,
            normals,
            uvs,
            face_indices,
        }
    }
}

/// One voxel's mesh: a lattice position plus its resolved face materials.
/// Geometry is always the scene's shared template, never per-instance.
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub position: IVec3,
    pub materials: Arc<FaceMaterials>,
}

/// The assembled scene, handed whole to the container encoder
#[derive(Debug)]
pub struct SceneGraph {
    pub geometry: CubeGeometry,
    pub instances: Vec<MeshInstance>,
    pub stats: AssembleStats,
}
