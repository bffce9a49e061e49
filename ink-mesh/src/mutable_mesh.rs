//! Mutable, unpacked mesh builder
//!
//! A [`MutableMesh`] stores every attribute as raw `f32`s so it can be edited
//! freely. [`MutableMesh::as_meshes`] quantizes it into one or more packed
//! [`Mesh`]es, partitioning so each fits a 16-bit index buffer and repairing
//! triangles whose winding quantization would flip.

use glam::Vec2;

use crate::attribute::{AttributeId, AttributeValues, MeshAttributeCodingParams};
use crate::correction::{CorrectedPositions, correct_flipped_triangles};
use crate::error::MeshError;
use crate::format::{MAX_VERTICES_PER_MESH, MeshFormat};
use crate::mesh::{Mesh, PackingPlan, validate_triangle_list};
use crate::packing::{read_unpacked_attribute, write_unpacked_attribute};
use crate::partition::partition_triangles;

/// How a mesh is packed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackingOptions {
    /// Attributes dropped from the packed format (never `Position`)
    pub omit_attributes: Vec<AttributeId>,
    /// Either empty, or one entry per retained attribute; `Some` replaces the
    /// derived coding params of a packed attribute
    pub custom_coding_params: Vec<Option<MeshAttributeCodingParams>>,
}

/// Editable mesh with unpacked float attributes
#[derive(Debug, Clone, PartialEq)]
pub struct MutableMesh {
    format: MeshFormat,
    vertex_data: Vec<u8>,
    index_data: Vec<u8>,
}

impl MutableMesh {
    /// Empty mesh
    pub fn new(format: MeshFormat) -> Self {
        Self {
            format,
            vertex_data: Vec::new(),
            index_data: Vec::new(),
        }
    }

    /// Unpack a [`Mesh`] back into an editable mesh
    ///
    /// Attribute values are the dequantized grid values, not the originals.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, MeshError> {
        let mut mutable = Self::new(mesh.format().clone());
        mutable.resize(mesh.vertex_count(), mesh.triangle_count());
        for vertex in 0..mesh.vertex_count() {
            for attribute_index in 0..mesh.format().attribute_count() {
                let values = mesh.float_vertex_attribute(vertex, attribute_index)?;
                mutable.set_float_vertex_attribute(vertex, attribute_index, &values);
            }
        }
        for triangle in 0..mesh.triangle_count() {
            mutable.set_triangle_indices(triangle, mesh.triangle_indices(triangle)?);
        }
        Ok(mutable)
    }

    #[inline]
    pub fn format(&self) -> &MeshFormat {
        &self.format
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len() / self.vertex_stride()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.index_data.len() / (3 * self.index_stride())
    }

    /// Unpacked bytes per vertex
    #[inline]
    pub fn vertex_stride(&self) -> usize {
        self.format.unpacked_vertex_stride()
    }

    /// Bytes per index (2 or 4, per the format's index format)
    #[inline]
    pub fn index_stride(&self) -> usize {
        self.format.index_format().unpacked_stride()
    }

    /// Native-endian `f32` vertex data
    #[inline]
    pub fn raw_vertex_data(&self) -> &[u8] {
        &self.vertex_data
    }

    /// Little-endian triangle indices of `index_stride()` bytes each
    #[inline]
    pub fn raw_index_data(&self) -> &[u8] {
        &self.index_data
    }

    // ========================================================================
    // Vertices
    // ========================================================================

    /// Append a vertex at `position`; its other attributes are zero
    pub fn append_vertex(&mut self, position: Vec2) {
        self.vertex_data
            .resize(self.vertex_data.len() + self.vertex_stride(), 0);
        self.set_vertex_position(self.vertex_count() - 1, position);
    }

    /// # Panics
    ///
    /// Panics if `vertex >= vertex_count()`.
    pub fn set_vertex_position(&mut self, vertex: usize, position: Vec2) {
        let index = self.format.position_attribute_index();
        self.set_float_vertex_attribute(vertex, index, &position.to_array());
    }

    /// # Panics
    ///
    /// Panics if `vertex >= vertex_count()`.
    pub fn vertex_position(&self, vertex: usize) -> Vec2 {
        let values = self.float_vertex_attribute(vertex, self.format.position_attribute_index());
        Vec2::new(values[0], values[1])
    }

    /// Overwrite one attribute of one vertex
    ///
    /// # Panics
    ///
    /// Panics if `vertex` or `attribute_index` is out of range, or `values`
    /// does not have one entry per component of the attribute.
    pub fn set_float_vertex_attribute(
        &mut self,
        vertex: usize,
        attribute_index: usize,
        values: &[f32],
    ) {
        assert!(vertex < self.vertex_count(), "vertex {vertex} out of range");
        let stride = self.vertex_stride();
        let attribute = &self.format.attributes()[attribute_index];
        assert_eq!(
            values.len(),
            attribute.attribute_type.component_count(),
            "wrong component count for attribute {attribute_index}"
        );
        write_unpacked_attribute(&mut self.vertex_data, stride, vertex, attribute, values);
    }

    /// # Panics
    ///
    /// Panics if `vertex` or `attribute_index` is out of range.
    pub fn float_vertex_attribute(
        &self,
        vertex: usize,
        attribute_index: usize,
    ) -> AttributeValues {
        assert!(vertex < self.vertex_count(), "vertex {vertex} out of range");
        let attribute = &self.format.attributes()[attribute_index];
        read_unpacked_attribute(&self.vertex_data, self.vertex_stride(), vertex, attribute)
    }

    // ========================================================================
    // Triangles
    // ========================================================================

    /// Append a triangle. Indices are not checked against the vertex count
    /// until [`MutableMesh::validate_triangles`] or packing.
    ///
    /// # Panics
    ///
    /// Panics if an index does not fit a 16-bit index format.
    pub fn append_triangle_indices(&mut self, indices: [u32; 3]) {
        self.index_data
            .resize(self.index_data.len() + 3 * self.index_stride(), 0);
        self.set_triangle_indices(self.triangle_count() - 1, indices);
    }

    /// # Panics
    ///
    /// Panics if `triangle >= triangle_count()` or an index does not fit a
    /// 16-bit index format.
    pub fn set_triangle_indices(&mut self, triangle: usize, indices: [u32; 3]) {
        assert!(triangle < self.triangle_count(), "triangle {triangle} out of range");
        let stride = self.index_stride();
        for (k, index) in indices.into_iter().enumerate() {
            let at = (3 * triangle + k) * stride;
            if stride == 2 {
                let index = u16::try_from(index)
                    .unwrap_or_else(|_| panic!("index {index} does not fit a 16-bit index format"));
                self.index_data[at..at + 2].copy_from_slice(&index.to_le_bytes());
            } else {
                self.index_data[at..at + 4].copy_from_slice(&index.to_le_bytes());
            }
        }
    }

    /// # Panics
    ///
    /// Panics if `triangle >= triangle_count()`.
    pub fn triangle_indices(&self, triangle: usize) -> [u32; 3] {
        assert!(triangle < self.triangle_count(), "triangle {triangle} out of range");
        let stride = self.index_stride();
        std::array::from_fn(|k| {
            let at = (3 * triangle + k) * stride;
            let bytes = &self.index_data[at..at + stride];
            match stride {
                2 => u16::from_le_bytes([bytes[0], bytes[1]]) as u32,
                _ => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            }
        })
    }

    /// Grow (zero-filled) or shrink the vertex and triangle lists
    pub fn resize(&mut self, vertex_count: usize, triangle_count: usize) {
        self.vertex_data.resize(vertex_count * self.vertex_stride(), 0);
        self.index_data
            .resize(triangle_count * 3 * self.index_stride(), 0);
    }

    /// Remove all vertices and triangles, keeping the format
    pub fn clear(&mut self) {
        self.vertex_data.clear();
        self.index_data.clear();
    }

    /// Check that every triangle references existing vertices, each at most
    /// once
    pub fn validate_triangles(&self) -> Result<(), MeshError> {
        validate_triangle_list(
            (0..self.triangle_count()).map(|t| self.triangle_indices(t)),
            self.vertex_count(),
        )
    }

    // ========================================================================
    // Packing
    // ========================================================================

    /// Pack into meshes of at most [`MAX_VERTICES_PER_MESH`] vertices each
    ///
    /// All partitions share one set of coding params derived over every
    /// vertex, so a vertex duplicated across partitions packs identically. If
    /// the position attribute is packed, vertex positions are nudged where
    /// needed so quantization does not flip triangles; when no consistent set
    /// of nudges is found the positions are packed uncorrected. A mesh without
    /// triangles packs to no meshes.
    pub fn as_meshes(&self, options: &PackingOptions) -> Result<Vec<Mesh>, MeshError> {
        self.pack_partitions(options, MAX_VERTICES_PER_MESH)
    }

    /// [`MutableMesh::as_meshes`] with a smaller partition size
    pub fn as_meshes_with_partition_size(
        &self,
        options: &PackingOptions,
        max_vertices_per_partition: usize,
    ) -> Result<Vec<Mesh>, MeshError> {
        if !(3..=MAX_VERTICES_PER_MESH).contains(&max_vertices_per_partition) {
            return Err(MeshError::InvalidPartitionSize {
                size: max_vertices_per_partition,
                max: MAX_VERTICES_PER_MESH,
            });
        }
        self.pack_partitions(options, max_vertices_per_partition)
    }

    fn pack_partitions(
        &self,
        options: &PackingOptions,
        max_vertices_per_partition: usize,
    ) -> Result<Vec<Mesh>, MeshError> {
        self.validate_triangles()?;
        let plan = PackingPlan::new(&self.format, &self.vertex_data, options)?;
        if self.triangle_count() == 0 {
            return Ok(Vec::new());
        }

        let corrected = self.correct_positions(&plan);
        let partitions =
            partition_triangles(&self.index_data, self.index_stride(), max_vertices_per_partition)?;
        let meshes = partitions
            .iter()
            .map(|partition| {
                Mesh::pack_partition(
                    &self.format,
                    &self.vertex_data,
                    partition,
                    &options.omit_attributes,
                    &plan,
                    &corrected,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            vertices = self.vertex_count(),
            triangles = self.triangle_count(),
            partitions = meshes.len(),
            corrected_vertices = corrected.len(),
            "packed mutable mesh"
        );
        Ok(meshes)
    }

    fn correct_positions(&self, plan: &PackingPlan) -> CorrectedPositions {
        let position = plan.packed_format.position_attribute();
        if !position.attribute_type.is_packed() {
            return CorrectedPositions::new();
        }
        let positions: Vec<Vec2> = (0..self.vertex_count())
            .map(|v| self.vertex_position(v))
            .collect();
        let triangles: Vec<[u32; 3]> = (0..self.triangle_count())
            .map(|t| self.triangle_indices(t))
            .collect();
        correct_flipped_triangles(
            &positions,
            &triangles,
            position.attribute_type,
            &plan.coding_params[plan.packed_format.position_attribute_index()],
        )
    }
}
