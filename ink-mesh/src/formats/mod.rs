//! Binary file formats
//!
//! POD formats for packed meshes. No magic bytes; the format is determined by
//! the file extension.

pub mod mesh_file;

pub use mesh_file::*;
