//! Linear quantization between float values and integer codes

use crate::attribute::{
    AttributeType, ComponentCodingParams, MeshAttributeBounds, MeshAttributeCodingParams,
};
use crate::packing::bits::max_value_for_bits;

/// A component whose observed range overflows `f32`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeExceedsPrecision {
    pub component: usize,
    pub minimum: f32,
    pub maximum: f32,
}

/// Derive coding params for `attribute_type` from observed `bounds`
///
/// Unpacked types get the identity transform. Packed types map
/// `[minimum, maximum]` onto `[0, max_value_for_bits(bits)]` per component; a
/// degenerate range (`minimum == maximum`, or too small to divide) gets scale 1
/// so the values pack to code 0.
///
/// # Panics
///
/// Panics if `bounds` does not have one entry per component, or if any
/// `minimum[i] > maximum[i]`. Callers build bounds from the same format.
pub fn compute_coding_params(
    attribute_type: AttributeType,
    bounds: &MeshAttributeBounds,
) -> Result<MeshAttributeCodingParams, RangeExceedsPrecision> {
    let component_count = attribute_type.component_count();
    assert_eq!(bounds.minimum.len(), component_count);
    assert_eq!(bounds.maximum.len(), component_count);

    if !attribute_type.is_packed() {
        return Ok(MeshAttributeCodingParams::identity(attribute_type));
    }

    let mut params = MeshAttributeCodingParams::default();
    for (component, &bits) in attribute_type.bits_per_component().iter().enumerate() {
        let minimum = bounds.minimum[component];
        let maximum = bounds.maximum[component];
        assert!(minimum <= maximum, "bounds minimum exceeds maximum");

        let range = maximum - minimum;
        if !range.is_finite() {
            return Err(RangeExceedsPrecision {
                component,
                minimum,
                maximum,
            });
        }
        // A subnormal range can underflow to a zero scale
        let scale = match range / max_value_for_bits(bits) as f32 {
            scale if scale > 0.0 => scale,
            _ => 1.0,
        };
        params.components.push(ComponentCodingParams::new(minimum, scale));
    }
    Ok(params)
}

/// `round((value - offset) / scale)`, before any range check
#[inline]
pub fn quantize_single_float(params: &ComponentCodingParams, value: f32) -> f32 {
    ((value - params.offset) / params.scale).round()
}

/// Pack one float to its code, or `None` when the rounded code is outside
/// `[0, max_value_for_bits(bits)]`
#[inline]
pub fn pack_single_float(params: &ComponentCodingParams, bits: u8, value: f32) -> Option<u32> {
    let code = quantize_single_float(params, value);
    if code >= 0.0 && code <= max_value_for_bits(bits) as f32 {
        Some(code as u32)
    } else {
        None
    }
}

/// `code * scale + offset`
#[inline]
pub fn unpack_single_float(params: &ComponentCodingParams, code: u32) -> f32 {
    code as f32 * params.scale + params.offset
}

/// Whether `params` can pack every value in `[minimum, maximum]` for a
/// component of `bits` bits
pub fn can_represent(params: &ComponentCodingParams, bits: u8, minimum: f32, maximum: f32) -> bool {
    pack_single_float(params, bits, minimum).is_some()
        && pack_single_float(params, bits, maximum).is_some()
}
