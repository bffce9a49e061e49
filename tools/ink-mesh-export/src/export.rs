//! Pack and inspect commands

use anyhow::{Context, Result};
use ink_mesh::{INK_MESH_EXT, Mesh, read_mesh, write_mesh};
use std::path::{Path, PathBuf};

use crate::input::MeshInput;
use crate::manifest::ExportManifest;

/// Output file names for `count` packed meshes.
///
/// A single mesh goes to `output` itself; several go next to it as
/// `<stem>.<n>.inkmesh`.
pub fn output_paths(output: &Path, count: usize) -> Vec<PathBuf> {
    if count == 1 {
        return vec![output.to_path_buf()];
    }
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());
    (0..count)
        .map(|n| output.with_file_name(format!("{stem}.{n}.{INK_MESH_EXT}")))
        .collect()
}

/// Pack a JSON mesh into one or more `.inkmesh` files and return their paths
///
/// `output` defaults to the input path with the `.inkmesh` extension.
pub fn pack_file(
    input: &Path,
    output: Option<&Path>,
    manifest: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let manifest = match manifest {
        Some(path) => ExportManifest::load(path)?,
        None => ExportManifest::default(),
    };
    let mesh = MeshInput::load(input)?.to_mutable_mesh()?;
    let options = manifest.packing.packing_options(mesh.format())?;

    let meshes = mesh
        .as_meshes_with_partition_size(&options, manifest.packing.max_vertices_per_partition)
        .with_context(|| format!("Failed to pack {}", input.display()))?;
    if meshes.is_empty() {
        tracing::warn!("{} has no triangles, nothing written", input.display());
        return Ok(Vec::new());
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension(INK_MESH_EXT));
    let paths = output_paths(&output, meshes.len());
    for (packed, path) in meshes.iter().zip(&paths) {
        std::fs::write(path, write_mesh(packed))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(
            "  {} vertices, {} triangles, stride {} -> {}",
            packed.vertex_count(),
            packed.triangle_count(),
            packed.vertex_stride(),
            path.display()
        );
    }
    Ok(paths)
}

/// Read a `.inkmesh` file and log what it holds
pub fn inspect_file(path: &Path) -> Result<Mesh> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mesh = read_mesh(&bytes).with_context(|| format!("Invalid mesh file {}", path.display()))?;

    let format = mesh.format();
    tracing::info!("{}", path.display());
    tracing::info!(
        "  {} vertices, {} triangles, index format {:?}, stride {}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        format.index_format(),
        mesh.vertex_stride()
    );
    for (attribute, params) in format.attributes().iter().zip(mesh.coding_params()) {
        let components: Vec<String> = params
            .components
            .iter()
            .map(|c| format!("(offset {}, scale {})", c.offset, c.scale))
            .collect();
        tracing::info!(
            "  {:?}: {:?} {}",
            attribute.id,
            attribute.attribute_type,
            components.join(" ")
        );
    }
    if let Some(bounds) = mesh.bounds() {
        tracing::info!(
            "  position bounds {:?} .. {:?}",
            bounds.minimum.as_slice(),
            bounds.maximum.as_slice()
        );
    }
    Ok(mesh)
}
