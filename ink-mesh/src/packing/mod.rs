//! Vertex attribute packing
//!
//! Converts between float attribute values and their packed GPU forms:
//! - [`bits`] - fixed bit-width integer codec for the packed attribute types
//! - [`coding`] - linear float <-> integer quantization
//! - [`attribute`] - per-attribute pack/unpack facade
//! - [`triangles`] - fixed-stride triangle index codec
//!
//! Packed buffers are little-endian. Unpacked (mutable mesh) vertex buffers
//! hold native `f32`s read and written through `bytemuck`.

pub mod attribute;
pub mod bits;
pub mod coding;
pub mod triangles;

pub use attribute::{pack_attribute, quantize_attribute, unpack_attribute};
pub use bits::{max_value_for_bits, pack_integers, unpack_integers};
pub use coding::{compute_coding_params, pack_single_float, unpack_single_float};
pub use triangles::{read_triangle_indices, write_triangle_indices};

use crate::attribute::AttributeValues;
use crate::format::Attribute;

// ============================================================================
// Unpacked Vertex Access
// ============================================================================

/// Byte range of `attribute` of `vertex` in an unpacked vertex buffer
#[inline]
fn unpacked_range(stride: usize, vertex: usize, attribute: &Attribute) -> std::ops::Range<usize> {
    let start = vertex * stride + attribute.unpacked_offset;
    start..start + attribute.unpacked_width
}

/// Read one attribute's floats from an unpacked vertex buffer
///
/// # Panics
///
/// Panics if `vertex` is past the end of `data`.
pub fn read_unpacked_attribute(
    data: &[u8],
    stride: usize,
    vertex: usize,
    attribute: &Attribute,
) -> AttributeValues {
    data[unpacked_range(stride, vertex, attribute)]
        .chunks_exact(4)
        .map(bytemuck::pod_read_unaligned::<f32>)
        .collect()
}

/// Overwrite one attribute's floats in an unpacked vertex buffer
///
/// # Panics
///
/// Panics if `vertex` is past the end of `data` or `values` has the wrong
/// component count.
pub fn write_unpacked_attribute(
    data: &mut [u8],
    stride: usize,
    vertex: usize,
    attribute: &Attribute,
    values: &[f32],
) {
    data[unpacked_range(stride, vertex, attribute)].copy_from_slice(bytemuck::cast_slice(values));
}
