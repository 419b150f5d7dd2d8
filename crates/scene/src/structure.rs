//! Structure decoding: tag tree to dimensions, voxel grid, and palette.

use nbt::{Tag, TagError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("missing or malformed {field} field: {source}")]
    Field {
        field: &'static str,
        source: TagError,
    },

    #[error("size field must hold exactly 3 values, found {0}")]
    SizeArity(usize),

    #[error("size value is not finite: {0}")]
    NonFiniteSize(f64),

    #[error("block indices field holds no layers")]
    NoLayers,

    #[error("palette entry {index} has no usable name: {source}")]
    UnnamedPaletteEntry { index: usize, source: TagError },
}

type Result<T> = std::result::Result<T, FormatError>;

fn field(name: &'static str) -> impl Fn(TagError) -> FormatError {
    move |source| FormatError::Field {
        field: name,
        source,
    }
}

/// Structure extents in the declared width/height/depth order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl Dimensions {
    /// Cell count of the lattice; zero when any extent is non-positive
    pub fn volume(&self) -> usize {
        if self.width <= 0 || self.height <= 0 || self.depth <= 0 {
            return 0;
        }
        self.width as usize * self.height as usize * self.depth as usize
    }
}

/// Flat sequence of palette indices; `-1` or out-of-range means empty
pub type VoxelGrid = Vec<i32>;

/// One block variant referenced by the grid.
///
/// `states` is carried along for completeness but never consulted when
/// selecting materials.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub name: String,
    pub states: HashMap<String, Tag>,
}

/// Validate a decoded tag tree and extract dimensions, grid, and palette.
///
/// Only the first block-indices layer is consumed; a second layer (liquid
/// data) is intentionally ignored. Grid length is not checked against the
/// volume here — indices past the grid's end assemble as empty cells.
pub fn decode_structure(root: &Tag) -> Result<(Dimensions, VoxelGrid, Vec<PaletteEntry>)> {
    let size = root
        .child("size")
        .map_err(field("size"))?
        .list()
        .map_err(field("size"))?;
    if size.len() != 3 {
        return Err(FormatError::SizeArity(size.len()));
    }
    let mut extents = [0i32; 3];
    for (slot, tag) in size.iter().enumerate() {
        let value = tag.as_f64().map_err(field("size"))?;
        if !value.is_finite() {
            return Err(FormatError::NonFiniteSize(value));
        }
        extents[slot] = value as i32;
    }
    let dimensions = Dimensions {
        width: extents[0],
        height: extents[1],
        depth: extents[2],
    };

    let structure = root.child("structure").map_err(field("structure"))?;

    let layers = structure
        .child("block_indices")
        .map_err(field("block indices"))?
        .list()
        .map_err(field("block indices"))?;
    let first_layer = layers.first().ok_or(FormatError::NoLayers)?;
    let grid = first_layer
        .list()
        .map_err(field("block indices"))?
        .iter()
        .map(|tag| tag.int().map_err(field("block indices")))
        .collect::<Result<VoxelGrid>>()?;

    let entries = structure
        .child("palette")
        .map_err(field("block palette"))?
        .child("default")
        .map_err(field("block palette"))?
        .child("block_palette")
        .map_err(field("block palette"))?
        .list()
        .map_err(field("block palette"))?;
    let mut palette = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let name = entry
            .child("name")
            .and_then(Tag::string)
            .map_err(|source| FormatError::UnnamedPaletteEntry { index, source })?;
        let states = entry
            .get("states")
            .and_then(|tag| tag.compound().ok())
            .cloned()
            .unwrap_or_default();
        palette.push(PaletteEntry {
            name: name.to_string(),
            states,
        });
    }

    Ok((dimensions, grid, palette))
}
