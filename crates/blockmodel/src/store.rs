use crate::material::Texture;
use crate::model::BlockModel;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Strip the `namespace:` prefix from a qualified block, model, or texture
/// name, yielding the store lookup key.
pub fn strip_namespace(name: &str) -> &str {
    match name.split_once(':') {
        Some((_, rest)) => rest,
        None => name,
    }
}

/// Filesystem lookup for model documents and texture images.
///
/// A model key `k` maps to `<root>/models/<k>.json`, a texture key to
/// `<root>/textures/<k>.png`; keys may contain path segments. Both lookups
/// miss non-fatally — the resolver degrades to fallback materials.
#[derive(Debug)]
pub struct ModelStore {
    root: PathBuf,
}

impl ModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load a model definition, `None` on a missing or malformed document
    pub fn model(&self, key: &str) -> Option<BlockModel> {
        let path = self.root.join("models").join(format!("{key}.json"));
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => {
                debug!(key, path = %path.display(), "model definition not found");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!(key, error = %e, "malformed model definition");
                None
            }
        }
    }

    /// Load and decode a texture image, `None` on a missing or undecodable file
    pub fn texture(&self, key: &str) -> Option<Arc<Texture>> {
        let path = self.root.join("textures").join(format!("{key}.png"));
        match image::open(&path) {
            Ok(decoded) => Some(Arc::new(Texture {
                name: key.to_string(),
                image: decoded.to_rgba8(),
            })),
            Err(e) => {
                debug!(key, path = %path.display(), error = %e, "texture not loadable");
                None
            }
        }
    }
}
