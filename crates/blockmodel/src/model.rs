use serde::Deserialize;
use std::collections::HashMap;

/// On-disk block model document.
///
/// A model either carries its own `elements` or inherits them from `parent`;
/// `textures` maps variable names to texture keys or `#variable`
/// indirections. Unknown fields in the document are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockModel {
    #[serde(default)]
    pub parent: Option<String>,

    #[serde(default)]
    pub textures: HashMap<String, String>,

    #[serde(default)]
    pub elements: Option<Vec<Element>>,
}

/// One cuboid of a model. Only the face map matters here; geometry bounds
/// of partial blocks are not interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub faces: HashMap<String, ElementFace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementFace {
    pub texture: String,
}
