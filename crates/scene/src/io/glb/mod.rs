//! Binary scene container (GLB) encoding.
//!
//! Encodes a [`crate::SceneGraph`] as a glTF 2.0 binary container: the
//! shared unit-cube geometry becomes one set of accessors reused by every
//! mesh, each distinct face-material set becomes one mesh of six
//! single-face primitives, and each instance becomes a translated node.
//! Textures are PNG-encoded into the binary chunk once per distinct
//! texture; fallback slots share one untextured, tinted material.
//!
//! # File Format
//!
//! ```text
//! [Header: 12 bytes]
//!   Magic: 'glTF' (0x46546C67)
//!   Version: 2 (little-endian u32)
//!   Total length: 4 bytes (little-endian, patched after assembly)
//!
//! [JSON chunk]   length + 'JSON' type + document, space-padded to 4
//! [BIN chunk]    length + 'BIN\0' type + payload, zero-padded to 4
//! ```

mod document;
pub mod serializer;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlbError {
    #[error("scene JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PNG encoding failed for texture {name}: {message}")]
    PngEncode { name: String, message: String },

    #[error("container exceeds the format size limit: {0} bytes")]
    TooLarge(usize),
}

/// GLB container constants
pub mod constants {
    /// Magic number: 'glTF' in ASCII
    pub const MAGIC: u32 = 0x4654_6C67;

    /// Container version
    pub const VERSION: u32 = 2;

    /// Header size in bytes
    pub const HEADER_SIZE: usize = 12;

    /// Chunk type: 'JSON'
    pub const CHUNK_JSON: u32 = 0x4E4F_534A;

    /// Chunk type: 'BIN\0'
    pub const CHUNK_BIN: u32 = 0x004E_4942;

    /// Accessor component type: f32
    pub const COMPONENT_F32: u32 = 5126;

    /// Accessor component type: u16
    pub const COMPONENT_U16: u32 = 5123;

    /// Sampler filter: nearest neighbor
    pub const FILTER_NEAREST: u32 = 9728;
}

// Re-export public API
pub use serializer::serialize_glb;
