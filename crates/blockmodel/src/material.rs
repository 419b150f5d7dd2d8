use crate::face::Face;
use image::RgbaImage;
use std::sync::Arc;

/// Flat tint applied to face slots that could not be resolved to a texture
pub const FALLBACK_TINT: [f32; 4] = [0.62, 0.62, 0.62, 1.0];

/// A decoded texture image, shared between every face slot that uses it
#[derive(Debug)]
pub struct Texture {
    /// Namespace-stripped texture key
    pub name: String,
    pub image: RgbaImage,
}

/// Material of one face slot: a shared texture, or the fallback tint
#[derive(Debug, Clone)]
pub enum Material {
    Texture(Arc<Texture>),
    Fallback,
}

impl Material {
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Material::Fallback)
    }
}

/// Per-face material set of one block, slots ordered by [`Face::ALL`]
#[derive(Debug, Clone)]
pub struct FaceMaterials {
    slots: [Material; 6],
}

impl FaceMaterials {
    /// The fallback tint on every slot
    pub fn uniform_fallback() -> Self {
        Self {
            slots: std::array::from_fn(|_| Material::Fallback),
        }
    }

    #[inline]
    pub fn get(&self, face: Face) -> &Material {
        &self.slots[face.index()]
    }

    #[inline]
    pub fn set(&mut self, face: Face, material: Material) {
        self.slots[face.index()] = material;
    }

    #[inline]
    pub fn slots(&self) -> &[Material; 6] {
        &self.slots
    }

    pub fn is_uniform_fallback(&self) -> bool {
        self.slots.iter().all(Material::is_fallback)
    }
}
