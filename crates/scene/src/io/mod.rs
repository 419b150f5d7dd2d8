// Output: scene container serialization

pub mod glb;

pub use glb::{serialize_glb, GlbError};
