//! Immutable, packed, GPU-ready mesh
//!
//! A [`Mesh`] owns a packed vertex buffer, a 16-bit triangle index buffer and
//! the per-attribute coding params a renderer needs to unpack vertices in a
//! shader. Everything is computed once at construction.

use glam::Vec2;

use crate::attribute::{
    AttributeId, AttributeValues, MeshAttributeBounds, MeshAttributeCodingParams, QuantizedValues,
};
use crate::coding_params::{compute_attribute_bounds, compute_coding_params_array};
use crate::correction::CorrectedPositions;
use crate::error::{MeshError, PackingError};
use crate::format::{Attribute, MAX_VERTICES_PER_MESH, MeshFormat};
use crate::mutable_mesh::PackingOptions;
use crate::packing::bits::{max_value_for_bits, pack_integers};
use crate::packing::{
    read_triangle_indices, unpack_attribute, write_triangle_indices, write_unpacked_attribute,
};
use crate::partition::PartitionInfo;
use crate::vertex_copy::copy_and_pack_partition_vertices;

/// Immutable mesh with packed vertex attributes
///
/// `Clone` duplicates the buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    format: MeshFormat,
    vertex_data: Vec<u8>,
    index_data: Vec<u8>,
    coding_params: Vec<MeshAttributeCodingParams>,
    attribute_bounds: Vec<Option<MeshAttributeBounds>>,
}

// ============================================================================
// Construction
// ============================================================================

impl Mesh {
    /// Pack float vertex data into a single mesh
    ///
    /// `vertex_attributes` holds one slice per component of every attribute in
    /// `format` order (so a format of position + color has five slices), all of
    /// the same length. `triangle_indices` is a flat list of vertex indices,
    /// three per triangle.
    ///
    /// Coding params are derived from the value bounds unless overridden in
    /// `options`. Omitted attributes are dropped from the packed format. Unlike
    /// [`crate::MutableMesh::as_meshes`], no partitioning or flipped-triangle
    /// correction is done, so at most [`MAX_VERTICES_PER_MESH`] vertices are
    /// accepted.
    pub fn create(
        format: &MeshFormat,
        vertex_attributes: &[&[f32]],
        triangle_indices: &[u32],
        options: &PackingOptions,
    ) -> Result<Self, MeshError> {
        let vertex_count = check_component_arrays(format, vertex_attributes)?;
        if vertex_count > MAX_VERTICES_PER_MESH {
            return Err(MeshError::TooManyVertices {
                count: vertex_count,
                max: MAX_VERTICES_PER_MESH,
            });
        }
        let triangles = triangle_list(triangle_indices)?;
        validate_triangle_list(triangles.iter().copied(), vertex_count)?;

        let stride = format.unpacked_vertex_stride();
        let mut unpacked = vec![0u8; vertex_count * stride];
        let mut component = 0;
        let mut values = AttributeValues::new();
        for attribute in format.attributes() {
            let component_count = attribute.attribute_type.component_count();
            let arrays = &vertex_attributes[component..component + component_count];
            for vertex in 0..vertex_count {
                values.clear();
                values.extend(arrays.iter().map(|array| array[vertex]));
                write_unpacked_attribute(&mut unpacked, stride, vertex, attribute, &values);
            }
            component += arrays.len();
        }

        let plan = PackingPlan::new(format, &unpacked, options)?;
        let partition = PartitionInfo {
            vertex_indices: (0..vertex_count as u32).collect(),
            triangles,
        };
        Self::pack_partition(
            format,
            &unpacked,
            &partition,
            &options.omit_attributes,
            &plan,
            &CorrectedPositions::new(),
        )
    }

    /// Build a mesh from already-quantized integer codes
    ///
    /// Every attribute of `format` must be packed. `vertex_attributes` holds
    /// one slice of codes per component, as in [`Mesh::create`], and each code
    /// must fit its component's bit width. `coding_params` (one entry per
    /// attribute) is stored as-is for unpacking.
    pub fn create_from_quantized_data(
        format: &MeshFormat,
        vertex_attributes: &[&[u32]],
        triangle_indices: &[u32],
        coding_params: &[MeshAttributeCodingParams],
    ) -> Result<Self, MeshError> {
        let vertex_count = check_component_arrays(format, vertex_attributes)?;
        if vertex_count > MAX_VERTICES_PER_MESH {
            return Err(MeshError::TooManyVertices {
                count: vertex_count,
                max: MAX_VERTICES_PER_MESH,
            });
        }
        let triangles = triangle_list(triangle_indices)?;
        validate_triangle_list(triangles.iter().copied(), vertex_count)?;

        if coding_params.len() != format.attribute_count() {
            return Err(MeshError::CodingParamsCountMismatch {
                expected: format.attribute_count(),
                actual: coding_params.len(),
            });
        }
        for (attribute_index, (attribute, params)) in
            format.attributes().iter().zip(coding_params).enumerate()
        {
            if !attribute.attribute_type.is_packed() {
                return Err(MeshError::QuantizedDataForUnpackedAttribute {
                    attribute: attribute_index,
                });
            }
            if !params.is_valid_for(attribute.attribute_type) {
                return Err(MeshError::InvalidCodingParams {
                    attribute: attribute_index,
                    reason: format!(
                        "expected {} components with finite offset and positive scale",
                        attribute.attribute_type.component_count()
                    ),
                });
            }
        }

        let stride = format.packed_vertex_stride();
        let mut vertex_data = vec![0u8; vertex_count * stride];
        let mut component = 0;
        let mut codes = QuantizedValues::new();
        for (attribute_index, attribute) in format.attributes().iter().enumerate() {
            let bits = attribute.attribute_type.bits_per_component();
            let arrays = &vertex_attributes[component..component + bits.len()];
            for vertex in 0..vertex_count {
                codes.clear();
                for (k, (array, &width)) in arrays.iter().zip(bits).enumerate() {
                    let value = array[vertex];
                    let max = max_value_for_bits(width);
                    if value > max {
                        return Err(MeshError::QuantizedValueOutOfRange {
                            attribute: attribute_index,
                            component: k,
                            value,
                            max,
                        });
                    }
                    codes.push(value);
                }
                let start = vertex * stride + attribute.packed_offset;
                pack_integers(
                    attribute.attribute_type,
                    &codes,
                    &mut vertex_data[start..start + attribute.packed_width],
                )?;
            }
            component += bits.len();
        }

        let index_data = pack_index_data(format.index_format().packed_stride(), &triangles)?;
        Self::from_parts(format.clone(), vertex_data, index_data, coding_params.to_vec())
    }

    /// Pack one partition of an unpacked vertex buffer
    ///
    /// `format` describes `unpacked_vertex_data`; the result uses
    /// `plan.packed_format`.
    pub(crate) fn pack_partition(
        format: &MeshFormat,
        unpacked_vertex_data: &[u8],
        partition: &PartitionInfo,
        omit_attributes: &[AttributeId],
        plan: &PackingPlan,
        corrected_positions: &CorrectedPositions,
    ) -> Result<Self, MeshError> {
        let vertex_data = if partition.vertex_indices.is_empty() {
            Vec::new()
        } else {
            copy_and_pack_partition_vertices(
                unpacked_vertex_data,
                &partition.vertex_indices,
                format,
                omit_attributes,
                &plan.coding_params,
                corrected_positions,
            )?
        };
        let index_data = pack_index_data(
            plan.packed_format.index_format().packed_stride(),
            &partition.triangles,
        )?;
        Self::from_parts(
            plan.packed_format.clone(),
            vertex_data,
            index_data,
            plan.coding_params.clone(),
        )
    }

    /// Assemble a mesh from packed buffers, computing attribute bounds from the
    /// dequantized vertex values
    pub(crate) fn from_parts(
        format: MeshFormat,
        vertex_data: Vec<u8>,
        index_data: Vec<u8>,
        coding_params: Vec<MeshAttributeCodingParams>,
    ) -> Result<Self, MeshError> {
        let attribute_bounds = packed_attribute_bounds(&format, &vertex_data, &coding_params)?;
        Ok(Self {
            format,
            vertex_data,
            index_data,
            coding_params,
            attribute_bounds,
        })
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl Mesh {
    /// Packed format (omitted attributes already removed)
    #[inline]
    pub fn format(&self) -> &MeshFormat {
        &self.format
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len() / self.format.packed_vertex_stride()
    }

    #[inline]
    fn index_stride(&self) -> usize {
        self.format.index_format().packed_stride()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.index_data.len() / (3 * self.index_stride())
    }

    /// Packed vertex bytes, `vertex_stride()` bytes per vertex
    #[inline]
    pub fn raw_vertex_data(&self) -> &[u8] {
        &self.vertex_data
    }

    /// Little-endian 16-bit triangle indices
    #[inline]
    pub fn raw_index_data(&self) -> &[u8] {
        &self.index_data
    }

    #[inline]
    pub fn vertex_stride(&self) -> usize {
        self.format.packed_vertex_stride()
    }

    /// Coding params of every attribute, in format order
    #[inline]
    pub fn coding_params(&self) -> &[MeshAttributeCodingParams] {
        &self.coding_params
    }

    fn attribute(&self, attribute_index: usize) -> Result<&Attribute, MeshError> {
        self.format
            .attributes()
            .get(attribute_index)
            .ok_or(MeshError::AttributeIndexOutOfBounds {
                index: attribute_index,
                count: self.format.attribute_count(),
            })
    }

    /// Dequantized values of one attribute of one vertex
    pub fn float_vertex_attribute(
        &self,
        vertex: usize,
        attribute_index: usize,
    ) -> Result<AttributeValues, MeshError> {
        let attribute = self.attribute(attribute_index)?;
        let vertex_count = self.vertex_count();
        if vertex >= vertex_count {
            return Err(MeshError::VertexIndexOutOfBounds {
                index: vertex,
                count: vertex_count,
            });
        }
        let start = vertex * self.vertex_stride() + attribute.packed_offset;
        Ok(unpack_attribute(
            attribute.attribute_type,
            &self.coding_params[attribute_index],
            &self.vertex_data[start..start + attribute.packed_width],
        )?)
    }

    /// Dequantized position of one vertex
    pub fn vertex_position(&self, vertex: usize) -> Result<Vec2, MeshError> {
        let values = self.float_vertex_attribute(vertex, self.format.position_attribute_index())?;
        Ok(Vec2::new(values[0], values[1]))
    }

    pub fn triangle_indices(&self, triangle: usize) -> Result<[u32; 3], MeshError> {
        Ok(read_triangle_indices(triangle, self.index_stride(), &self.index_data)?)
    }

    /// Transform a shader applies to the packed codes of an attribute
    pub fn vertex_attribute_unpacking_params(
        &self,
        attribute_index: usize,
    ) -> Result<&MeshAttributeCodingParams, MeshError> {
        self.attribute(attribute_index)?;
        Ok(&self.coding_params[attribute_index])
    }

    /// Bounds of the dequantized values of an attribute; `None` for an empty
    /// mesh or an out-of-range index
    pub fn attribute_bounds(&self, attribute_index: usize) -> Option<&MeshAttributeBounds> {
        self.attribute_bounds.get(attribute_index)?.as_ref()
    }

    /// Position bounds
    pub fn bounds(&self) -> Option<&MeshAttributeBounds> {
        self.attribute_bounds(self.format.position_attribute_index())
    }
}

// ============================================================================
// Shared Packing Steps
// ============================================================================

/// Packed format and coding params shared by every partition of one mesh
#[derive(Debug, Clone)]
pub(crate) struct PackingPlan {
    pub packed_format: MeshFormat,
    pub coding_params: Vec<MeshAttributeCodingParams>,
}

impl PackingPlan {
    /// Derive the packed format and coding params over all vertices
    pub(crate) fn new(
        format: &MeshFormat,
        unpacked_vertex_data: &[u8],
        options: &PackingOptions,
    ) -> Result<Self, MeshError> {
        let packed_format = format.without_attributes(&options.omit_attributes)?;
        let bounds =
            compute_attribute_bounds(format, unpacked_vertex_data, &options.omit_attributes)?;
        let coding_params =
            compute_coding_params_array(&packed_format, &bounds, &options.custom_coding_params)?;
        Ok(Self {
            packed_format,
            coding_params,
        })
    }
}

/// Vertex count implied by per-component arrays
fn check_component_arrays<T>(format: &MeshFormat, arrays: &[&[T]]) -> Result<usize, MeshError> {
    let expected = format.total_component_count();
    if arrays.len() != expected {
        return Err(MeshError::ComponentArrayCount {
            expected,
            actual: arrays.len(),
        });
    }
    let vertex_count = arrays.first().map_or(0, |a| a.len());
    if let Some((component, array)) = arrays
        .iter()
        .enumerate()
        .find(|(_, a)| a.len() != vertex_count)
    {
        return Err(MeshError::ComponentArrayLength {
            component,
            expected: vertex_count,
            actual: array.len(),
        });
    }
    Ok(vertex_count)
}

/// Group a flat index list into triangles
fn triangle_list(triangle_indices: &[u32]) -> Result<Vec<[u32; 3]>, MeshError> {
    if triangle_indices.len() % 3 != 0 {
        return Err(MeshError::TriangleIndexCount(triangle_indices.len()));
    }
    Ok(triangle_indices
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect())
}

/// Every triangle references existing vertices, each at most once
pub(crate) fn validate_triangle_list(
    triangles: impl IntoIterator<Item = [u32; 3]>,
    vertex_count: usize,
) -> Result<(), MeshError> {
    for (triangle, indices) in triangles.into_iter().enumerate() {
        for (k, &index) in indices.iter().enumerate() {
            if index as usize >= vertex_count {
                return Err(MeshError::TriangleIndexOutOfBounds {
                    triangle,
                    index,
                    vertex_count,
                });
            }
            if indices[..k].contains(&index) {
                return Err(MeshError::DuplicateTriangleVertex { triangle, index });
            }
        }
    }
    Ok(())
}

fn pack_index_data(stride: usize, triangles: &[[u32; 3]]) -> Result<Vec<u8>, PackingError> {
    let mut index_data = vec![0u8; triangles.len() * 3 * stride];
    for (triangle, &indices) in triangles.iter().enumerate() {
        write_triangle_indices(triangle, stride, indices, &mut index_data)?;
    }
    Ok(index_data)
}

fn packed_attribute_bounds(
    format: &MeshFormat,
    vertex_data: &[u8],
    coding_params: &[MeshAttributeCodingParams],
) -> Result<Vec<Option<MeshAttributeBounds>>, PackingError> {
    let stride = format.packed_vertex_stride();
    format
        .attributes()
        .iter()
        .zip(coding_params)
        .map(|(attribute, params)| {
            let mut bounds: Option<MeshAttributeBounds> = None;
            for vertex in vertex_data.chunks_exact(stride) {
                let bytes =
                    &vertex[attribute.packed_offset..attribute.packed_offset + attribute.packed_width];
                let values = unpack_attribute(attribute.attribute_type, params, bytes)?;
                match bounds.as_mut() {
                    Some(b) => b.include(&values),
                    None => bounds = Some(MeshAttributeBounds::from_point(&values)),
                }
            }
            Ok(bounds)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeType, ComponentCodingParams};
    use crate::format::IndexFormat;

    fn position_opacity_format() -> MeshFormat {
        MeshFormat::new(
            vec![
                (AttributeType::Float2PackedInOneFloat, AttributeId::Position),
                (AttributeType::Float1Unpacked, AttributeId::OpacityShift),
            ],
            IndexFormat::Unpacked32Packed16,
        )
        .unwrap()
    }

    fn create_triangle() -> Mesh {
        Mesh::create(
            &position_opacity_format(),
            &[&[0.0, 4095.0, 0.0], &[0.0, 0.0, 4095.0], &[0.5, -1.0, 2.0]],
            &[0, 1, 2],
            &PackingOptions::default(),
        )
        .unwrap()
    }

    // ========================================================================
    // Mesh::create
    // ========================================================================

    #[test]
    fn test_create_packs_vertices() {
        let mesh = create_triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_stride(), 8);

        let stride = mesh.vertex_stride();
        let packed_position = &mesh.raw_vertex_data()[stride..stride + 4];
        assert_eq!(
            f32::from_le_bytes(packed_position.try_into().unwrap()),
            (4095u32 << 12) as f32
        );
        assert_eq!(mesh.vertex_position(2).unwrap(), Vec2::new(0.0, 4095.0));
        assert_eq!(mesh.float_vertex_attribute(1, 1).unwrap().as_slice(), &[-1.0]);
        assert_eq!(mesh.triangle_indices(0).unwrap(), [0, 1, 2]);
        assert_eq!(mesh.raw_index_data(), &[0, 0, 1, 0, 2, 0]);
    }

    #[test]
    fn test_create_metadata() {
        let mesh = create_triangle();
        let params = mesh.vertex_attribute_unpacking_params(0).unwrap();
        assert_eq!(params.components[0], ComponentCodingParams::new(0.0, 1.0));
        assert_eq!(
            mesh.vertex_attribute_unpacking_params(2),
            Err(MeshError::AttributeIndexOutOfBounds { index: 2, count: 2 })
        );

        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.minimum.as_slice(), &[0.0, 0.0]);
        assert_eq!(bounds.maximum.as_slice(), &[4095.0, 4095.0]);
        assert_eq!(mesh.attribute_bounds(1).unwrap().maximum.as_slice(), &[2.0]);
        assert!(mesh.attribute_bounds(2).is_none());
    }

    #[test]
    fn test_accessors_reject_out_of_range_vertex() {
        let mesh = create_triangle();
        let err = MeshError::VertexIndexOutOfBounds { index: 3, count: 3 };
        assert_eq!(mesh.float_vertex_attribute(3, 1), Err(err.clone()));
        assert_eq!(mesh.vertex_position(3), Err(err.clone()));
        assert_eq!(err.kind(), crate::error::ErrorKind::FailedPrecondition);
        assert_eq!(
            mesh.float_vertex_attribute(3, 5),
            Err(MeshError::AttributeIndexOutOfBounds { index: 5, count: 2 })
        );

        let empty = Mesh::create(
            &position_opacity_format(),
            &[&[], &[], &[]],
            &[],
            &PackingOptions::default(),
        )
        .unwrap();
        assert_eq!(
            empty.vertex_position(0),
            Err(MeshError::VertexIndexOutOfBounds { index: 0, count: 0 })
        );
    }

    #[test]
    fn test_create_with_omission() {
        let options = PackingOptions {
            omit_attributes: vec![AttributeId::OpacityShift],
            ..Default::default()
        };
        let mesh = Mesh::create(
            &position_opacity_format(),
            &[&[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0], &[f32::NAN, 0.0, 0.0]],
            &[0, 1, 2],
            &options,
        )
        .unwrap();
        assert_eq!(mesh.format().attribute_count(), 1);
        assert_eq!(mesh.vertex_stride(), 4);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let format = position_opacity_format();
        let options = PackingOptions::default();
        assert_eq!(
            Mesh::create(&format, &[&[0.0], &[0.0]], &[], &options),
            Err(MeshError::ComponentArrayCount {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            Mesh::create(&format, &[&[0.0, 1.0], &[0.0, 1.0], &[0.0]], &[], &options),
            Err(MeshError::ComponentArrayLength {
                component: 2,
                expected: 2,
                actual: 1
            })
        );
        let xs: &[f32] = &[0.0, 1.0, 2.0];
        assert_eq!(
            Mesh::create(&format, &[xs, xs, xs], &[0, 1], &options),
            Err(MeshError::TriangleIndexCount(2))
        );
        assert_eq!(
            Mesh::create(&format, &[xs, xs, xs], &[0, 1, 3], &options),
            Err(MeshError::TriangleIndexOutOfBounds {
                triangle: 0,
                index: 3,
                vertex_count: 3
            })
        );
        assert_eq!(
            Mesh::create(&format, &[xs, xs, xs], &[0, 1, 2, 2, 1, 2], &options),
            Err(MeshError::DuplicateTriangleVertex {
                triangle: 1,
                index: 2
            })
        );
        assert_eq!(
            Mesh::create(&format, &[xs, &[0.0, f32::INFINITY, 0.0], xs], &[], &options),
            Err(MeshError::NonFiniteValue {
                attribute: 0,
                vertex: 1
            })
        );
    }

    #[test]
    fn test_create_rejects_too_many_vertices() {
        let zeros = vec![0.0f32; MAX_VERTICES_PER_MESH + 1];
        assert_eq!(
            Mesh::create(
                &position_opacity_format(),
                &[&zeros, &zeros, &zeros],
                &[],
                &PackingOptions::default()
            ),
            Err(MeshError::TooManyVertices {
                count: MAX_VERTICES_PER_MESH + 1,
                max: MAX_VERTICES_PER_MESH
            })
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mesh = create_triangle();
        let copy = mesh.clone();
        assert_eq!(copy, mesh);
        assert_ne!(copy.raw_vertex_data().as_ptr(), mesh.raw_vertex_data().as_ptr());
    }

    // ========================================================================
    // Mesh::create_from_quantized_data
    // ========================================================================

    fn quantized_format() -> MeshFormat {
        MeshFormat::new(
            vec![
                (AttributeType::Float2PackedInThreeUnsignedBytesXY12, AttributeId::Position),
                (AttributeType::Float1PackedInOneUnsignedByte, AttributeId::OpacityShift),
            ],
            IndexFormat::Unpacked16Packed16,
        )
        .unwrap()
    }

    fn quantized_params() -> Vec<MeshAttributeCodingParams> {
        vec![
            MeshAttributeCodingParams::new([
                ComponentCodingParams::new(-1.0, 0.5),
                ComponentCodingParams::new(0.0, 0.25),
            ]),
            MeshAttributeCodingParams::new([ComponentCodingParams::new(0.0, 1.0 / 255.0)]),
        ]
    }

    #[test]
    fn test_create_from_quantized_data() {
        let mesh = Mesh::create_from_quantized_data(
            &quantized_format(),
            &[&[0, 4, 0], &[0, 0, 8], &[0, 255, 51]],
            &[0, 1, 2],
            &quantized_params(),
        )
        .unwrap();
        assert_eq!(mesh.vertex_stride(), 4);
        assert_eq!(&mesh.raw_vertex_data()[4..8], &[0x00, 0x40, 0x00, 0xFF]);
        assert_eq!(mesh.vertex_position(1).unwrap(), Vec2::new(1.0, 0.0));
        assert_eq!(mesh.vertex_position(2).unwrap(), Vec2::new(-1.0, 2.0));
        assert_eq!(mesh.coding_params(), quantized_params().as_slice());
    }

    #[test]
    fn test_create_from_quantized_data_errors() {
        let format = quantized_format();
        let params = quantized_params();
        assert_eq!(
            Mesh::create_from_quantized_data(&format, &[&[0], &[0], &[256]], &[], &params),
            Err(MeshError::QuantizedValueOutOfRange {
                attribute: 1,
                component: 0,
                value: 256,
                max: 255
            })
        );
        assert_eq!(
            Mesh::create_from_quantized_data(&format, &[&[0], &[0], &[0]], &[], &params[..1]),
            Err(MeshError::CodingParamsCountMismatch {
                expected: 2,
                actual: 1
            })
        );

        let mut bad_params = params.clone();
        bad_params[0].components[1].scale = -1.0;
        assert!(matches!(
            Mesh::create_from_quantized_data(&format, &[&[0], &[0], &[0]], &[], &bad_params),
            Err(MeshError::InvalidCodingParams { attribute: 0, .. })
        ));

        let unpacked = MeshFormat::new(
            vec![(AttributeType::Float2Unpacked, AttributeId::Position)],
            IndexFormat::Unpacked16Packed16,
        )
        .unwrap();
        assert_eq!(
            Mesh::create_from_quantized_data(
                &unpacked,
                &[&[0], &[0]],
                &[],
                &[MeshAttributeCodingParams::identity(AttributeType::Float2Unpacked)]
            ),
            Err(MeshError::QuantizedDataForUnpackedAttribute { attribute: 0 })
        );
    }
}
