//! Triangle index codec
//!
//! Triangles are stored as three consecutive little-endian indices of a fixed
//! stride (2 or 4 bytes). These functions are purely positional: they never
//! check indices against a vertex count.

use crate::error::PackingError;

fn triangle_offset(triangle: usize, stride: usize, len: usize) -> Result<usize, PackingError> {
    if stride != 2 && stride != 4 {
        return Err(PackingError::InvalidIndexStride(stride));
    }
    let triangle_bytes = 3 * stride;
    if len % triangle_bytes != 0 {
        return Err(PackingError::MisalignedIndexData {
            len,
            triangle_bytes,
        });
    }
    let triangle_count = len / triangle_bytes;
    if triangle >= triangle_count {
        return Err(PackingError::TriangleOutOfBounds {
            triangle,
            triangle_count,
        });
    }
    Ok(triangle * triangle_bytes)
}

/// Read the three vertex indices of `triangle`
pub fn read_triangle_indices(
    triangle: usize,
    stride: usize,
    data: &[u8],
) -> Result<[u32; 3], PackingError> {
    let base = triangle_offset(triangle, stride, data.len())?;
    let mut indices = [0u32; 3];
    for (k, index) in indices.iter_mut().enumerate() {
        let at = base + k * stride;
        *index = match stride {
            2 => u16::from_le_bytes([data[at], data[at + 1]]) as u32,
            _ => u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]),
        };
    }
    Ok(indices)
}

/// Overwrite the three vertex indices of `triangle`
pub fn write_triangle_indices(
    triangle: usize,
    stride: usize,
    indices: [u32; 3],
    data: &mut [u8],
) -> Result<(), PackingError> {
    let base = triangle_offset(triangle, stride, data.len())?;
    if stride == 2 {
        if let Some(&value) = indices.iter().find(|&&i| i > u16::MAX as u32) {
            return Err(PackingError::IndexValueTooLarge { value, stride });
        }
    }
    for (k, &index) in indices.iter().enumerate() {
        let at = base + k * stride;
        match stride {
            2 => data[at..at + 2].copy_from_slice(&(index as u16).to_le_bytes()),
            _ => data[at..at + 4].copy_from_slice(&index.to_le_bytes()),
        }
    }
    Ok(())
}

/// Number of whole triangles in an index buffer
#[inline]
pub fn triangle_count(stride: usize, data: &[u8]) -> usize {
    data.len() / (3 * stride)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_16_bit() {
        let mut data = vec![0u8; 12];
        write_triangle_indices(1, 2, [7, 65535, 0], &mut data).unwrap();
        assert_eq!(&data[6..], &[7, 0, 0xFF, 0xFF, 0, 0]);
        assert_eq!(read_triangle_indices(1, 2, &data).unwrap(), [7, 65535, 0]);
        assert_eq!(read_triangle_indices(0, 2, &data).unwrap(), [0, 0, 0]);
    }

    #[test]
    fn test_write_then_read_32_bit() {
        let mut data = vec![0u8; 12];
        write_triangle_indices(0, 4, [70_000, 1, 2], &mut data).unwrap();
        assert_eq!(read_triangle_indices(0, 4, &data).unwrap(), [70_000, 1, 2]);
        assert_eq!(triangle_count(4, &data), 1);
    }

    #[test]
    fn test_misaligned_buffer() {
        assert_eq!(
            read_triangle_indices(0, 2, &[0u8; 7]),
            Err(PackingError::MisalignedIndexData {
                len: 7,
                triangle_bytes: 6
            })
        );
    }

    #[test]
    fn test_out_of_bounds_triangle() {
        assert_eq!(
            read_triangle_indices(2, 2, &[0u8; 12]),
            Err(PackingError::TriangleOutOfBounds {
                triangle: 2,
                triangle_count: 2
            })
        );
    }

    #[test]
    fn test_index_too_wide_for_stride() {
        let mut data = vec![0u8; 6];
        assert_eq!(
            write_triangle_indices(0, 2, [0, 1, 65536], &mut data),
            Err(PackingError::IndexValueTooLarge {
                value: 65536,
                stride: 2
            })
        );
        assert_eq!(
            write_triangle_indices(0, 3, [0, 1, 2], &mut data),
            Err(PackingError::InvalidIndexStride(3))
        );
    }
}
