//! Packing manifest (TOML)
//!
//! ```toml
//! [packing]
//! omit = ["ForwardLabel"]
//! max_vertices_per_partition = 65536
//!
//! [[packing.coding_params]]
//! attribute = "Position"
//! components = [{ offset = 0.0, scale = 0.01 }, { offset = 0.0, scale = 0.01 }]
//! ```

use anyhow::{Context, Result, bail};
use ink_mesh::{
    AttributeId, ComponentCodingParams, MAX_VERTICES_PER_MESH, MeshAttributeCodingParams,
    MeshFormat, PackingOptions,
};
use serde::Deserialize;
use std::path::Path;

/// Root of a packing manifest. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportManifest {
    #[serde(default)]
    pub packing: PackingSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackingSection {
    /// Attributes dropped from the packed meshes
    #[serde(default)]
    pub omit: Vec<AttributeId>,

    /// Vertex limit per packed mesh (3..=65536)
    #[serde(default = "default_max_vertices")]
    pub max_vertices_per_partition: usize,

    /// Explicit coding params, replacing the ones derived from bounds
    #[serde(default)]
    pub coding_params: Vec<CodingParamsEntry>,
}

fn default_max_vertices() -> usize {
    MAX_VERTICES_PER_MESH
}

impl Default for PackingSection {
    fn default() -> Self {
        Self {
            omit: Vec::new(),
            max_vertices_per_partition: default_max_vertices(),
            coding_params: Vec::new(),
        }
    }
}

/// Coding params for one attribute, looked up by id
#[derive(Debug, Clone, Deserialize)]
pub struct CodingParamsEntry {
    pub attribute: AttributeId,
    pub components: Vec<ComponentCodingParams>,
}

impl ExportManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid manifest: {}", path.display()))
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse packing manifest")
    }
}

impl PackingSection {
    /// Resolve the section against a mesh format.
    ///
    /// Custom params are ordered by the attributes that survive omission;
    /// attributes without an entry keep derived params.
    pub fn packing_options(&self, format: &MeshFormat) -> Result<PackingOptions> {
        let packed_format = format
            .without_attributes(&self.omit)
            .context("Invalid omit list")?;

        let mut custom_coding_params = vec![None; packed_format.attribute_count()];
        for entry in &self.coding_params {
            let Some(index) = packed_format.find_attribute(entry.attribute) else {
                bail!(
                    "coding_params given for {:?}, which is not in the packed format",
                    entry.attribute
                );
            };
            let expected = packed_format.attributes()[index]
                .attribute_type
                .component_count();
            if entry.components.len() != expected {
                bail!(
                    "coding_params for {:?} has {} components, expected {}",
                    entry.attribute,
                    entry.components.len(),
                    expected
                );
            }
            if custom_coding_params[index].is_some() {
                bail!("coding_params given twice for {:?}", entry.attribute);
            }
            custom_coding_params[index] = Some(MeshAttributeCodingParams::new(
                entry.components.iter().copied(),
            ));
        }

        // All-None is the same as deriving everything
        if custom_coding_params.iter().all(Option::is_none) {
            custom_coding_params.clear();
        }

        Ok(PackingOptions {
            omit_attributes: self.omit.clone(),
            custom_coding_params,
        })
    }
}
