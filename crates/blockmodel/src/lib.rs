//! Block model resolution.
//!
//! Maps a block's qualified name to a set of per-face materials by walking
//! its model-definition chain: texture variables, `#variable` indirections,
//! and parent inheritance. Missing models, missing textures, and dead-end
//! indirections all degrade to a fallback tint instead of failing the run.

mod cache;
mod face;
mod material;
mod model;
mod resolver;
mod store;

pub use cache::MaterialCache;
pub use face::Face;
pub use material::{FaceMaterials, Material, Texture, FALLBACK_TINT};
pub use model::{BlockModel, Element, ElementFace};
pub use resolver::{Resolver, ResolverStats};
pub use store::{strip_namespace, ModelStore};
