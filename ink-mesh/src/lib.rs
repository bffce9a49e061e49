//! Geometry packing for stroke meshes
//!
//! Converts floating-point vertex attributes into compact quantized layouts
//! for GPU upload and back, partitions large meshes into 16-bit-indexable
//! chunks, and repairs triangles whose winding quantization would flip.
//!
//! # Modules
//!
//! - [`attribute`] - attribute types and ids, coding params, bounds
//! - [`format`] - vertex layout ([`MeshFormat`]) and index width
//! - [`packing`] - bit-level codecs and the per-attribute pack/unpack facade
//! - [`partition`] - splitting triangle lists into bounded partitions
//! - [`coding_params`] - per-mesh coding params from bounds or overrides
//! - [`vertex_copy`] - packing one partition's vertices
//! - [`correction`] - flipped-triangle correction
//! - [`mesh`] / [`mutable_mesh`] - the packed and editable mesh types
//! - [`formats`] - the `.inkmesh` container

pub mod attribute;
pub mod coding_params;
pub mod correction;
pub mod error;
pub mod format;
pub mod formats;
pub mod mesh;
pub mod mutable_mesh;
pub mod packing;
pub mod partition;
pub mod vertex_copy;

// Re-export the mesh types
pub use mesh::Mesh;
pub use mutable_mesh::{MutableMesh, PackingOptions};

// Re-export commonly used attribute and format items
pub use attribute::{
    AttributeId, AttributeType, AttributeValues, ComponentCodingParams, MeshAttributeBounds,
    MeshAttributeCodingParams,
};
pub use error::{ErrorKind, MeshError, PackingError};
pub use format::{Attribute, IndexFormat, MAX_ATTRIBUTES, MAX_VERTICES_PER_MESH, MeshFormat};

// Re-export the container
pub use formats::{INK_MESH_EXT, MeshFileHeader, read_mesh, write_mesh};
