//! Partition vertex copier
//!
//! Materializes the packed vertex buffer of one partition from the unpacked
//! source mesh, dropping omitted attributes and substituting corrected
//! position codes.

use crate::attribute::{AttributeId, MeshAttributeCodingParams};
use crate::correction::CorrectedPositions;
use crate::error::PackingError;
use crate::format::MeshFormat;
use crate::packing::{pack_attribute, pack_integers, read_unpacked_attribute};

/// Pack the vertices listed in `partition_vertex_indices`
///
/// Output vertex `i` is source vertex `partition_vertex_indices[i]`, with the
/// retained attributes of `original_format` packed in order using
/// `coding_params` (one entry per retained attribute). If the source vertex
/// has an entry in `corrected_positions`, those codes are packed as its
/// position without going through the coding params.
///
/// # Panics
///
/// Panics if the vertex data is empty or not a whole number of vertices, the
/// partition is empty, `coding_params` does not have one entry per retained
/// attribute, or a partition index is past the last vertex.
pub fn copy_and_pack_partition_vertices(
    unpacked_vertex_data: &[u8],
    partition_vertex_indices: &[u32],
    original_format: &MeshFormat,
    omit_attributes: &[AttributeId],
    coding_params: &[MeshAttributeCodingParams],
    corrected_positions: &CorrectedPositions,
) -> Result<Vec<u8>, PackingError> {
    let unpacked_stride = original_format.unpacked_vertex_stride();
    assert!(!unpacked_vertex_data.is_empty(), "no vertex data");
    assert!(!partition_vertex_indices.is_empty(), "empty partition");
    assert_eq!(unpacked_vertex_data.len() % unpacked_stride, 0);
    let vertex_count = unpacked_vertex_data.len() / unpacked_stride;

    let retained: Vec<_> = original_format
        .attributes()
        .iter()
        .filter(|a| !omit_attributes.contains(&a.id))
        .collect();
    assert_eq!(
        coding_params.len(),
        retained.len(),
        "one coding params entry per retained attribute"
    );
    let packed_stride: usize = retained.iter().map(|a| a.packed_width).sum();

    let mut packed = vec![0u8; partition_vertex_indices.len() * packed_stride];
    for (vertex_out, &source) in packed
        .chunks_exact_mut(packed_stride)
        .zip(partition_vertex_indices)
    {
        let source = source as usize;
        assert!(source < vertex_count, "vertex index out of bounds");

        let mut offset = 0;
        for (attribute, params) in retained.iter().zip(coding_params) {
            let out = &mut vertex_out[offset..offset + attribute.packed_width];
            let corrected = (attribute.id == AttributeId::Position)
                .then(|| corrected_positions.get(&(source as u32)))
                .flatten();
            match corrected {
                Some(codes) => pack_integers(attribute.attribute_type, codes, out)?,
                None => {
                    let values =
                        read_unpacked_attribute(unpacked_vertex_data, unpacked_stride, source, attribute);
                    pack_attribute(attribute.attribute_type, params, &values, out)?
                }
            }
            offset += attribute.packed_width;
        }
    }
    Ok(packed)
}
