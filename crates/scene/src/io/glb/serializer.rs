//! GLB serialization - Convert a SceneGraph to the binary container

use super::constants::*;
use super::document as doc;
use super::GlbError;
use crate::graph::{CubeGeometry, SceneGraph};
use blockmodel::{FaceMaterials, Material as FaceMaterial, Texture, FALLBACK_TINT};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

/// Serialize a scene graph to a GLB byte buffer.
///
/// Nothing is written anywhere; the caller persists the returned buffer
/// only after this succeeds.
pub fn serialize_glb(scene: &SceneGraph) -> Result<Vec<u8>, GlbError> {
    GlbWriter::new().serialize(scene)
}

/// Accessor indices of the shared unit-cube template
struct GeometryAccessors {
    position: usize,
    normal: usize,
    texcoord: usize,
    /// One index accessor per face slot
    face_indices: [usize; 6],
}

/// GLB writer implementation
struct GlbWriter {
    bin: Vec<u8>,
    views: Vec<doc::BufferView>,
    accessors: Vec<doc::Accessor>,
    materials: Vec<doc::Material>,
    textures: Vec<doc::TextureBinding>,
    samplers: Vec<doc::Sampler>,
    images: Vec<doc::Image>,
    meshes: Vec<doc::Mesh>,
    nodes: Vec<doc::Node>,
    /// texture key -> material index, so a texture is embedded once
    material_by_texture: HashMap<String, usize>,
    /// material set identity -> mesh index, so shared sets share meshes
    mesh_by_set: HashMap<usize, usize>,
    fallback_material: Option<usize>,
}

impl GlbWriter {
    fn new() -> Self {
        Self {
            bin: Vec::new(),
            views: Vec::new(),
            accessors: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            samplers: Vec::new(),
            images: Vec::new(),
            meshes: Vec::new(),
            nodes: Vec::new(),
            material_by_texture: HashMap::new(),
            mesh_by_set: HashMap::new(),
            fallback_material: None,
        }
    }

    fn serialize(mut self, scene: &SceneGraph) -> Result<Vec<u8>, GlbError> {
        let geometry = self.write_geometry(&scene.geometry);

        for instance in &scene.instances {
            let mesh = self.mesh_for(&instance.materials, &geometry)?;
            self.nodes.push(doc::Node {
                mesh,
                translation: instance.position.as_vec3().to_array(),
            });
        }

        // Zero-pad the binary chunk to the container's 4-byte alignment
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }

        let gltf = doc::Gltf {
            asset: doc::Asset {
                version: "2.0",
                generator: "structool",
            },
            scene: 0,
            scenes: vec![doc::Scene {
                nodes: (0..self.nodes.len()).collect(),
            }],
            nodes: self.nodes,
            meshes: self.meshes,
            materials: self.materials,
            textures: self.textures,
            samplers: self.samplers,
            images: self.images,
            accessors: self.accessors,
            buffer_views: self.views,
            buffers: vec![doc::Buffer {
                byte_length: self.bin.len(),
            }],
        };

        let mut json = serde_json::to_vec(&gltf)?;
        // JSON chunks are space-padded so the BIN chunk stays aligned
        while json.len() % 4 != 0 {
            json.push(b' ');
        }

        let mut out = Vec::with_capacity(HEADER_SIZE + 16 + json.len() + self.bin.len());
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&VERSION.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes()); // total length, patched below

        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&json);

        out.extend_from_slice(&(self.bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&self.bin);

        let total = out.len();
        if u32::try_from(total).is_err() {
            return Err(GlbError::TooLarge(total));
        }
        out[8..12].copy_from_slice(&(total as u32).to_le_bytes());

        Ok(out)
    }

    /// Append a buffer view, aligning its start as required
    fn push_view(&mut self, data: &[u8], alignment: usize) -> usize {
        while self.bin.len() % alignment != 0 {
            self.bin.push(0);
        }
        self.views.push(doc::BufferView {
            buffer: 0,
            byte_offset: self.bin.len(),
            byte_length: data.len(),
        });
        self.bin.extend_from_slice(data);
        self.views.len() - 1
    }

    /// Write the shared template once; every mesh reuses these accessors
    fn write_geometry(&mut self, geometry: &CubeGeometry) -> GeometryAccessors {
        let position = self.push_vec3_accessor(&geometry.positions, true);
        let normal = self.push_vec3_accessor(&geometry.normals, false);
        let texcoord = self.push_vec2_accessor(&geometry.uvs);

        let mut index_bytes = Vec::with_capacity(6 * 6 * 2);
        for face in &geometry.face_indices {
            for &index in face {
                index_bytes.extend_from_slice(&index.to_le_bytes());
            }
        }
        let index_view = self.push_view(&index_bytes, 4);

        let mut face_indices = [0usize; 6];
        for (slot, accessor) in face_indices.iter_mut().enumerate() {
            self.accessors.push(doc::Accessor {
                buffer_view: index_view,
                byte_offset: slot * 6 * 2,
                component_type: COMPONENT_U16,
                count: 6,
                accessor_type: "SCALAR",
                min: None,
                max: None,
            });
            *accessor = self.accessors.len() - 1;
        }

        GeometryAccessors {
            position,
            normal,
            texcoord,
            face_indices,
        }
    }

    fn push_vec3_accessor(&mut self, values: &[[f32; 3]], with_bounds: bool) -> usize {
        let mut bytes = Vec::with_capacity(values.len() * 12);
        for value in values {
            for component in value {
                bytes.extend_from_slice(&component.to_le_bytes());
            }
        }
        let view = self.push_view(&bytes, 4);

        let (min, max) = if with_bounds {
            let mut min = [f32::INFINITY; 3];
            let mut max = [f32::NEG_INFINITY; 3];
            for value in values {
                for axis in 0..3 {
                    min[axis] = min[axis].min(value[axis]);
                    max[axis] = max[axis].max(value[axis]);
                }
            }
            (Some(min), Some(max))
        } else {
            (None, None)
        };

        self.accessors.push(doc::Accessor {
            buffer_view: view,
            byte_offset: 0,
            component_type: COMPONENT_F32,
            count: values.len(),
            accessor_type: "VEC3",
            min,
            max,
        });
        self.accessors.len() - 1
    }

    fn push_vec2_accessor(&mut self, values: &[[f32; 2]]) -> usize {
        let mut bytes = Vec::with_capacity(values.len() * 8);
        for value in values {
            for component in value {
                bytes.extend_from_slice(&component.to_le_bytes());
            }
        }
        let view = self.push_view(&bytes, 4);
        self.accessors.push(doc::Accessor {
            buffer_view: view,
            byte_offset: 0,
            component_type: COMPONENT_F32,
            count: values.len(),
            accessor_type: "VEC2",
            min: None,
            max: None,
        });
        self.accessors.len() - 1
    }

    /// Mesh for one material set: six primitives over the shared template,
    /// deduplicated so every instance of a block reuses one mesh
    fn mesh_for(
        &mut self,
        materials: &Arc<FaceMaterials>,
        geometry: &GeometryAccessors,
    ) -> Result<usize, GlbError> {
        let set_id = Arc::as_ptr(materials) as usize;
        if let Some(&mesh) = self.mesh_by_set.get(&set_id) {
            return Ok(mesh);
        }

        let mut primitives = Vec::with_capacity(6);
        for (slot, material) in materials.slots().iter().enumerate() {
            let material = self.material_for(material)?;
            primitives.push(doc::Primitive {
                attributes: doc::Attributes {
                    position: geometry.position,
                    normal: geometry.normal,
                    texcoord: geometry.texcoord,
                },
                indices: geometry.face_indices[slot],
                material,
            });
        }

        self.meshes.push(doc::Mesh { primitives });
        let mesh = self.meshes.len() - 1;
        self.mesh_by_set.insert(set_id, mesh);
        Ok(mesh)
    }

    fn material_for(&mut self, material: &FaceMaterial) -> Result<usize, GlbError> {
        match material {
            FaceMaterial::Texture(texture) => self.textured_material(texture),
            FaceMaterial::Fallback => Ok(self.fallback_material()),
        }
    }

    fn textured_material(&mut self, texture: &Arc<Texture>) -> Result<usize, GlbError> {
        if let Some(&index) = self.material_by_texture.get(&texture.name) {
            return Ok(index);
        }

        let png = encode_png(texture)?;
        let view = self.push_view(&png, 4);
        self.images.push(doc::Image {
            buffer_view: view,
            mime_type: "image/png",
        });
        if self.samplers.is_empty() {
            self.samplers.push(doc::Sampler {
                mag_filter: FILTER_NEAREST,
                min_filter: FILTER_NEAREST,
            });
        }
        self.textures.push(doc::TextureBinding {
            sampler: 0,
            source: self.images.len() - 1,
        });
        self.materials.push(doc::Material {
            name: Some(texture.name.clone()),
            pbr_metallic_roughness: doc::PbrMetallicRoughness {
                base_color_texture: Some(doc::TextureRef {
                    index: self.textures.len() - 1,
                }),
                base_color_factor: None,
                metallic_factor: 0.0,
                roughness_factor: 1.0,
            },
        });

        let index = self.materials.len() - 1;
        self.material_by_texture.insert(texture.name.clone(), index);
        Ok(index)
    }

    /// One shared tinted material for every unresolved face slot
    fn fallback_material(&mut self) -> usize {
        if let Some(index) = self.fallback_material {
            return index;
        }
        self.materials.push(doc::Material {
            name: Some("fallback".to_string()),
            pbr_metallic_roughness: doc::PbrMetallicRoughness {
                base_color_texture: None,
                base_color_factor: Some(FALLBACK_TINT),
                metallic_factor: 0.0,
                roughness_factor: 1.0,
            },
        });
        let index = self.materials.len() - 1;
        self.fallback_material = Some(index);
        index
    }
}

fn encode_png(texture: &Texture) -> Result<Vec<u8>, GlbError> {
    let mut bytes = Vec::new();
    texture
        .image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| GlbError::PngEncode {
            name: texture.name.clone(),
            message: e.to_string(),
        })?;
    Ok(bytes)
}
