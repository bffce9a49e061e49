//! Mesh format: the per-vertex attribute layout and index width
//!
//! A [`MeshFormat`] describes one vertex's byte blob in both its unpacked
//! (all `f32`) form used by [`crate::MutableMesh`] and its packed form used by
//! [`crate::Mesh`]. Attribute order is fixed at construction.

use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeId, AttributeType};
use crate::error::MeshError;

/// Maximum number of attributes in one format
pub const MAX_ATTRIBUTES: usize = 16;

/// Vertices addressable by a packed (16-bit) index buffer
pub const MAX_VERTICES_PER_MESH: usize = 1 << 16;

/// Triangle index width in unpacked and packed meshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndexFormat {
    /// 16-bit indices in both forms
    Unpacked16Packed16,
    /// 32-bit indices while mutable, 16-bit once packed
    #[default]
    Unpacked32Packed16,
}

impl IndexFormat {
    /// Bytes per index in a [`crate::MutableMesh`]
    #[inline]
    pub const fn unpacked_stride(self) -> usize {
        match self {
            IndexFormat::Unpacked16Packed16 => 2,
            IndexFormat::Unpacked32Packed16 => 4,
        }
    }

    /// Bytes per index in a [`crate::Mesh`]
    #[inline]
    pub const fn packed_stride(self) -> usize {
        2
    }

    pub fn to_code(self) -> u8 {
        match self {
            IndexFormat::Unpacked16Packed16 => 0,
            IndexFormat::Unpacked32Packed16 => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(IndexFormat::Unpacked16Packed16),
            1 => Some(IndexFormat::Unpacked32Packed16),
            _ => None,
        }
    }
}

/// One attribute of a [`MeshFormat`] with its byte layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub attribute_type: AttributeType,
    pub id: AttributeId,
    /// Byte offset within a packed vertex
    pub packed_offset: usize,
    /// Byte width within a packed vertex
    pub packed_width: usize,
    /// Byte offset within an unpacked vertex
    pub unpacked_offset: usize,
    /// Byte width within an unpacked vertex
    pub unpacked_width: usize,
}

/// Ordered attribute layout plus index format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshFormat {
    attributes: Vec<Attribute>,
    index_format: IndexFormat,
    position_index: usize,
    packed_stride: usize,
    unpacked_stride: usize,
}

impl MeshFormat {
    /// Build a format from `(type, id)` pairs in vertex order
    pub fn new(
        attributes: Vec<(AttributeType, AttributeId)>,
        index_format: IndexFormat,
    ) -> Result<Self, MeshError> {
        if attributes.is_empty() || attributes.len() > MAX_ATTRIBUTES {
            return Err(MeshError::AttributeCount {
                count: attributes.len(),
                max: MAX_ATTRIBUTES,
            });
        }

        let mut position_index = None;
        for (i, &(attribute_type, id)) in attributes.iter().enumerate() {
            if attributes[..i].iter().any(|&(_, other)| other == id) {
                return Err(MeshError::DuplicateAttributeId(id));
            }
            if let Some(expected) = id.required_component_count() {
                if attribute_type.component_count() != expected {
                    return Err(MeshError::AttributeComponentCount {
                        id,
                        expected,
                        actual: attribute_type.component_count(),
                    });
                }
            }
            if id == AttributeId::Position {
                position_index = Some(i);
            }
        }
        let position_index = position_index.ok_or(MeshError::MissingPosition)?;

        let mut laid_out = Vec::with_capacity(attributes.len());
        let mut packed_stride = 0;
        let mut unpacked_stride = 0;
        for (attribute_type, id) in attributes {
            let packed_width = attribute_type.packed_byte_width();
            let unpacked_width = attribute_type.unpacked_byte_width();
            laid_out.push(Attribute {
                attribute_type,
                id,
                packed_offset: packed_stride,
                packed_width,
                unpacked_offset: unpacked_stride,
                unpacked_width,
            });
            packed_stride += packed_width;
            unpacked_stride += unpacked_width;
        }

        Ok(Self {
            attributes: laid_out,
            index_format,
            position_index,
            packed_stride,
            unpacked_stride,
        })
    }

    /// Attributes in vertex order
    #[inline]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    #[inline]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn index_format(&self) -> IndexFormat {
        self.index_format
    }

    /// Index of the position attribute
    #[inline]
    pub fn position_attribute_index(&self) -> usize {
        self.position_index
    }

    #[inline]
    pub fn position_attribute(&self) -> &Attribute {
        &self.attributes[self.position_index]
    }

    /// Bytes per vertex in packed form
    #[inline]
    pub fn packed_vertex_stride(&self) -> usize {
        self.packed_stride
    }

    /// Bytes per vertex in unpacked form
    #[inline]
    pub fn unpacked_vertex_stride(&self) -> usize {
        self.unpacked_stride
    }

    /// Total float components across all attributes
    pub fn total_component_count(&self) -> usize {
        self.attributes
            .iter()
            .map(|a| a.attribute_type.component_count())
            .sum()
    }

    /// Position of the attribute with `id`, if present
    pub fn find_attribute(&self, id: AttributeId) -> Option<usize> {
        self.attributes.iter().position(|a| a.id == id)
    }

    /// Same format with the listed attributes removed
    pub fn without_attributes(&self, omit: &[AttributeId]) -> Result<Self, MeshError> {
        for &id in omit {
            if id == AttributeId::Position {
                return Err(MeshError::OmittedPosition);
            }
            if self.find_attribute(id).is_none() {
                return Err(MeshError::OmittedAttributeNotInFormat(id));
            }
        }
        let retained = self
            .attributes
            .iter()
            .filter(|a| !omit.contains(&a.id))
            .map(|a| (a.attribute_type, a.id))
            .collect();
        Self::new(retained, self.index_format)
    }
}
