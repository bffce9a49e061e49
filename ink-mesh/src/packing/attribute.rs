//! Attribute pack/unpack facade
//!
//! Dispatches between the raw-float path and the quantize-then-bit-pack path
//! depending on the [`AttributeType`].

use crate::attribute::{AttributeType, AttributeValues, MeshAttributeCodingParams, QuantizedValues};
use crate::error::PackingError;
use crate::packing::bits::{max_value_for_bits, pack_integers, unpack_integers};
use crate::packing::coding::{quantize_single_float, unpack_single_float};

fn check_params(
    attribute_type: AttributeType,
    params: &MeshAttributeCodingParams,
) -> Result<(), PackingError> {
    if params.components.len() != attribute_type.component_count() {
        return Err(PackingError::InvalidCodingParams("component count mismatch"));
    }
    if !params.components.iter().all(|c| c.is_valid()) {
        return Err(PackingError::InvalidCodingParams(
            "offsets and scales must be finite with positive scale",
        ));
    }
    Ok(())
}

/// Quantize `values` to integer codes without packing them
pub fn quantize_attribute(
    attribute_type: AttributeType,
    params: &MeshAttributeCodingParams,
    values: &[f32],
) -> Result<QuantizedValues, PackingError> {
    check_params(attribute_type, params)?;
    if values.len() != attribute_type.component_count() {
        return Err(PackingError::ComponentCount {
            expected: attribute_type.component_count(),
            actual: values.len(),
        });
    }

    let bits = attribute_type.bits_per_component();
    let mut codes = QuantizedValues::new();
    for (component, (&value, c)) in values.iter().zip(&params.components).enumerate() {
        if !value.is_finite() {
            return Err(PackingError::NonFiniteValue { component, value });
        }
        let code = quantize_single_float(c, value);
        let width = bits[component];
        if code < 0.0 || code > max_value_for_bits(width) as f32 {
            return Err(PackingError::ValueOutOfRange {
                component,
                value: code as i64,
                bits: width,
            });
        }
        codes.push(code as u32);
    }
    Ok(codes)
}

/// Pack one attribute's float components into `out`
///
/// `out` must be exactly `attribute_type.packed_byte_width()` bytes.
pub fn pack_attribute(
    attribute_type: AttributeType,
    params: &MeshAttributeCodingParams,
    values: &[f32],
    out: &mut [u8],
) -> Result<(), PackingError> {
    if attribute_type.is_packed() {
        let codes = quantize_attribute(attribute_type, params, values)?;
        return pack_integers(attribute_type, &codes, out);
    }

    check_params(attribute_type, params)?;
    if values.len() != attribute_type.component_count() {
        return Err(PackingError::ComponentCount {
            expected: attribute_type.component_count(),
            actual: values.len(),
        });
    }
    if out.len() != attribute_type.packed_byte_width() {
        return Err(PackingError::ByteWidth {
            expected: attribute_type.packed_byte_width(),
            actual: out.len(),
        });
    }
    for (component, (&value, chunk)) in values.iter().zip(out.chunks_exact_mut(4)).enumerate() {
        if !value.is_finite() {
            return Err(PackingError::NonFiniteValue { component, value });
        }
        chunk.copy_from_slice(&value.to_le_bytes());
    }
    Ok(())
}

/// Unpack one attribute from its packed bytes back to floats
///
/// Packed types return the dequantized grid values, not the originals.
pub fn unpack_attribute(
    attribute_type: AttributeType,
    params: &MeshAttributeCodingParams,
    bytes: &[u8],
) -> Result<AttributeValues, PackingError> {
    check_params(attribute_type, params)?;
    if !attribute_type.is_packed() {
        if bytes.len() != attribute_type.packed_byte_width() {
            return Err(PackingError::ByteWidth {
                expected: attribute_type.packed_byte_width(),
                actual: bytes.len(),
            });
        }
        return Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect());
    }

    let codes = unpack_integers(attribute_type, bytes)?;
    Ok(codes
        .iter()
        .zip(&params.components)
        .map(|(&code, c)| unpack_single_float(c, code))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::ComponentCodingParams;

    #[test]
    fn test_pack_known_position() {
        let params = MeshAttributeCodingParams::identity(AttributeType::Float2PackedInOneFloat);
        let mut out = [0u8; 4];
        pack_attribute(AttributeType::Float2PackedInOneFloat, &params, &[200.1, 400.9], &mut out)
            .unwrap();
        assert_eq!(f32::from_le_bytes(out), 819_601.0);

        let values =
            unpack_attribute(AttributeType::Float2PackedInOneFloat, &params, &out).unwrap();
        assert_eq!(values.as_slice(), &[200.0, 401.0]);
    }

    #[test]
    fn test_unpacked_roundtrip_is_exact() {
        let params = MeshAttributeCodingParams::identity(AttributeType::Float3Unpacked);
        let mut out = [0u8; 12];
        let values = [1.25, -3.5e-7, 1.0e30];
        pack_attribute(AttributeType::Float3Unpacked, &params, &values, &mut out).unwrap();
        let back = unpack_attribute(AttributeType::Float3Unpacked, &params, &out).unwrap();
        assert_eq!(back.as_slice(), &values);
    }

    #[test]
    fn test_quantization_error_bounded_by_half_step() {
        let attribute_type = AttributeType::Float3PackedInFourUnsignedBytesXYZ10;
        let params = MeshAttributeCodingParams::new([
            ComponentCodingParams::new(-1.0, 2.0 / 1023.0),
            ComponentCodingParams::new(0.0, 1.0 / 1023.0),
            ComponentCodingParams::new(5.0, 0.25),
        ]);
        let values = [0.3337, 0.9999, 100.1];
        let mut out = [0u8; 4];
        pack_attribute(attribute_type, &params, &values, &mut out).unwrap();
        let back = unpack_attribute(attribute_type, &params, &out).unwrap();
        for ((v, b), c) in values.iter().zip(&back).zip(&params.components) {
            assert!((v - b).abs() <= c.scale / 2.0 + 1e-6, "{v} vs {b}");
        }
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let params = MeshAttributeCodingParams::identity(AttributeType::Float2Unpacked);
        let mut out = [0u8; 8];
        assert!(matches!(
            pack_attribute(AttributeType::Float2Unpacked, &params, &[1.0, f32::NAN], &mut out),
            Err(PackingError::NonFiniteValue { component: 1, .. })
        ));

        let params = MeshAttributeCodingParams::identity(AttributeType::Float2PackedInOneFloat);
        let mut out = [0u8; 4];
        assert!(matches!(
            pack_attribute(
                AttributeType::Float2PackedInOneFloat,
                &params,
                &[f32::INFINITY, 1.0],
                &mut out
            ),
            Err(PackingError::NonFiniteValue { component: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_codes() {
        let params = MeshAttributeCodingParams::identity(AttributeType::Float1PackedInOneUnsignedByte);
        let mut out = [0u8; 1];
        assert_eq!(
            pack_attribute(AttributeType::Float1PackedInOneUnsignedByte, &params, &[256.0], &mut out),
            Err(PackingError::ValueOutOfRange {
                component: 0,
                value: 256,
                bits: 8
            })
        );
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = MeshAttributeCodingParams::new([ComponentCodingParams::new(0.0, -1.0)]);
        let mut out = [0u8; 1];
        assert!(matches!(
            pack_attribute(AttributeType::Float1PackedInOneUnsignedByte, &params, &[0.0], &mut out),
            Err(PackingError::InvalidCodingParams(_))
        ));
        let wrong_count = MeshAttributeCodingParams::identity(AttributeType::Float2Unpacked);
        assert!(matches!(
            unpack_attribute(AttributeType::Float1PackedInOneUnsignedByte, &wrong_count, &out),
            Err(PackingError::InvalidCodingParams(_))
        ));
    }
}
