//! JSON mesh input
//!
//! ```json
//! {
//!   "format": {
//!     "attributes": [
//!       { "type": "Float2PackedInOneFloat", "id": "Position" },
//!       { "type": "Float1PackedInOneUnsignedByte", "id": "OpacityShift" }
//!     ],
//!     "index_format": "Unpacked32Packed16"
//!   },
//!   "vertices": [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 0.5]],
//!   "triangles": [[0, 1, 2]]
//! }
//! ```
//!
//! Each vertex lists every component of every attribute, in format order.

use anyhow::{Context, Result, bail};
use ink_mesh::{AttributeId, AttributeType, IndexFormat, MeshFormat, MutableMesh};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct MeshInput {
    pub format: FormatInput,
    #[serde(default)]
    pub vertices: Vec<Vec<f32>>,
    #[serde(default)]
    pub triangles: Vec<[u32; 3]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatInput {
    pub attributes: Vec<AttributeInput>,
    #[serde(default)]
    pub index_format: IndexFormat,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AttributeInput {
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub id: AttributeId,
}

impl MeshInput {
    /// Load mesh input from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mesh: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid mesh: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse mesh JSON")
    }

    pub fn mesh_format(&self) -> Result<MeshFormat> {
        let attributes = self
            .format
            .attributes
            .iter()
            .map(|a| (a.attribute_type, a.id))
            .collect();
        MeshFormat::new(attributes, self.format.index_format).context("Invalid mesh format")
    }

    /// Build an editable mesh. Triangle indices are range-checked later, when
    /// the mesh is packed.
    pub fn to_mutable_mesh(&self) -> Result<MutableMesh> {
        let format = self.mesh_format()?;
        let expected = format.total_component_count();
        for (v, vertex) in self.vertices.iter().enumerate() {
            if vertex.len() != expected {
                bail!(
                    "vertex {} has {} values, format needs {}",
                    v,
                    vertex.len(),
                    expected
                );
            }
        }
        if format.index_format() == IndexFormat::Unpacked16Packed16 {
            if let Some((t, _)) = self
                .triangles
                .iter()
                .enumerate()
                .find(|(_, tri)| tri.iter().any(|&i| i > u16::MAX as u32))
            {
                bail!("triangle {} does not fit 16-bit indices", t);
            }
        }

        let component_counts: Vec<usize> = format
            .attributes()
            .iter()
            .map(|a| a.attribute_type.component_count())
            .collect();

        let mut mesh = MutableMesh::new(format);
        mesh.resize(self.vertices.len(), self.triangles.len());
        for (v, vertex) in self.vertices.iter().enumerate() {
            let mut rest = vertex.as_slice();
            for (attribute_index, &count) in component_counts.iter().enumerate() {
                let (values, tail) = rest.split_at(count);
                mesh.set_float_vertex_attribute(v, attribute_index, values);
                rest = tail;
            }
        }
        for (t, &triangle) in self.triangles.iter().enumerate() {
            mesh.set_triangle_indices(t, triangle);
        }
        Ok(mesh)
    }
}
