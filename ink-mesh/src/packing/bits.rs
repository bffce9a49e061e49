//! Fixed bit-width integer codec
//!
//! Each packed [`AttributeType`] concatenates its component codes
//! most-significant field first into one bit string, then splits that string
//! into containers from the most significant end:
//!
//! - float containers hold 24 bits each, stored as the *numeric value* of a
//!   little-endian `f32` (every integer below 2^24 is exact in an `f32`)
//! - byte containers hold 8 bits each
//!
//! Unused container bits (only `XYZ10`, which has 2) are zero padding at the
//! least significant end.
//!
//! ```text
//! Float2PackedInOneFloat:               f0 = [x:12][y:12]
//! Float3PackedInTwoFloats:              f0 = [x:16][y:8 hi]  f1 = [y:8 lo][z:16]
//! Float3PackedInFourUnsignedBytes_XYZ10: [x:10][y:10][z:10][pad:2] in 4 bytes
//! ```

use crate::attribute::{
    AttributeType, BITS_PER_FLOAT_CONTAINER, Container, MAX_PACKED_FLOAT_VALUE, QuantizedValues,
};
use crate::error::PackingError;

/// Largest unsigned integer representable in `bits` bits
///
/// `max_value_for_bits(12) == 4095`, `max_value_for_bits(32) == u32::MAX`.
#[inline]
pub const fn max_value_for_bits(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Container geometry of a packed type: (bits per container, container count)
fn container_layout(attribute_type: AttributeType) -> Result<(u32, u32), PackingError> {
    match attribute_type.container() {
        Container::Unpacked => Err(PackingError::NotPacked(attribute_type)),
        Container::Floats(n) => Ok((BITS_PER_FLOAT_CONTAINER, n as u32)),
        Container::Bytes(n) => Ok((8, n as u32)),
    }
}

fn check_width(attribute_type: AttributeType, len: usize) -> Result<(), PackingError> {
    let expected = attribute_type.packed_byte_width();
    if len != expected {
        return Err(PackingError::ByteWidth {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Pack quantized component codes into `out`
///
/// `values` must hold exactly one code per component, each within its bit
/// width, and `out` must be exactly the type's packed width.
pub fn pack_integers(
    attribute_type: AttributeType,
    values: &[u32],
    out: &mut [u8],
) -> Result<(), PackingError> {
    let (container_bits, container_count) = container_layout(attribute_type)?;
    check_width(attribute_type, out.len())?;

    let bits = attribute_type.bits_per_component();
    if values.len() != bits.len() {
        return Err(PackingError::ComponentCount {
            expected: bits.len(),
            actual: values.len(),
        });
    }

    let mut acc: u128 = 0;
    let mut total_bits = 0u32;
    for (component, (&value, &width)) in values.iter().zip(bits).enumerate() {
        if value > max_value_for_bits(width) {
            return Err(PackingError::ValueOutOfRange {
                component,
                value: value as i64,
                bits: width,
            });
        }
        acc = (acc << width) | value as u128;
        total_bits += width as u32;
    }
    acc <<= container_bits * container_count - total_bits;

    let container_mask = (1u128 << container_bits) - 1;
    for k in 0..container_count {
        let shift = container_bits * (container_count - 1 - k);
        let chunk = ((acc >> shift) & container_mask) as u32;
        match attribute_type.container() {
            Container::Floats(_) => {
                let at = 4 * k as usize;
                out[at..at + 4].copy_from_slice(&(chunk as f32).to_le_bytes());
            }
            _ => out[k as usize] = chunk as u8,
        }
    }
    Ok(())
}

/// Unpack component codes from `bytes`
///
/// Float containers must hold a finite value in `[0, 2^24 - 1]`; fractional
/// values are truncated.
pub fn unpack_integers(
    attribute_type: AttributeType,
    bytes: &[u8],
) -> Result<QuantizedValues, PackingError> {
    let (container_bits, container_count) = container_layout(attribute_type)?;
    check_width(attribute_type, bytes.len())?;

    let mut acc: u128 = 0;
    for k in 0..container_count as usize {
        let chunk = match attribute_type.container() {
            Container::Floats(_) => {
                let value = f32::from_le_bytes([
                    bytes[4 * k],
                    bytes[4 * k + 1],
                    bytes[4 * k + 2],
                    bytes[4 * k + 3],
                ]);
                if !(value.is_finite() && (0.0..=MAX_PACKED_FLOAT_VALUE).contains(&value)) {
                    return Err(PackingError::PackedFloatOutOfRange { value });
                }
                value as u32
            }
            _ => bytes[k] as u32,
        };
        acc = (acc << container_bits) | chunk as u128;
    }

    let bits = attribute_type.bits_per_component();
    let total_bits: u32 = bits.iter().map(|&b| b as u32).sum();
    acc >>= container_bits * container_count - total_bits;

    let mut values = QuantizedValues::from_elem(0, bits.len());
    for (slot, &width) in values.iter_mut().zip(bits).rev() {
        *slot = (acc & max_value_for_bits(width) as u128) as u32;
        acc >>= width;
    }
    Ok(values)
}
