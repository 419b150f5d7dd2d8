//! Tag-tree document model for binary structure files.
//!
//! A decoded structure file is a tree of named, typed tags. [`Tag`] models
//! the tree as a tagged union with checked accessors; [`decode`] parses the
//! little-endian binary encoding (optionally gzip-wrapped) into it.

mod reader;
mod value;

pub use reader::{decode, DecodeError};
pub use value::{Tag, TagError};
