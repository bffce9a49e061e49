//! ink-mesh-export library
//!
//! Loads JSON meshes and TOML packing manifests, and writes packed
//! `.inkmesh` files. Used by the `ink-mesh-export` binary.

pub mod export;
pub mod input;
pub mod manifest;

pub use export::{inspect_file, output_paths, pack_file};
pub use input::MeshInput;
pub use manifest::{ExportManifest, PackingSection};
