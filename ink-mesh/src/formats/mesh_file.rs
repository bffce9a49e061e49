//! Packed mesh container (.inkmesh)
//!
//! Serializes one packed [`Mesh`] with everything needed to unpack it.
//! POD format, little-endian, no magic bytes.
//!
//! # Layout
//! ```text
//! 0x00: vertex_count u32
//! 0x04: triangle_count u32
//! 0x08: attribute_count u8
//! 0x09: index_format u8
//! 0x0A: padding (2 bytes)
//! 0x0C: attribute table (attribute_count * { type u8, id u8 })
//! var:  coding params (per attribute, per component { offset f32, scale f32 })
//! var:  vertex_data (vertex_count * packed vertex stride)
//! var:  index_data (triangle_count * 3 * 2 bytes)
//! ```

use crate::attribute::{
    AttributeId, AttributeType, ComponentCodingParams, MeshAttributeCodingParams,
};
use crate::error::MeshError;
use crate::format::{IndexFormat, MAX_VERTICES_PER_MESH, MeshFormat};
use crate::mesh::{Mesh, validate_triangle_list};
use crate::packing::read_triangle_indices;

/// File extension for packed meshes
pub const INK_MESH_EXT: &str = "inkmesh";

/// Packed mesh header (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct MeshFileHeader {
    pub vertex_count: u32,
    pub triangle_count: u32,
    pub attribute_count: u8,
    pub index_format: u8,
    pub _padding: [u8; 2],
}

impl MeshFileHeader {
    pub const SIZE: usize = 12;

    pub fn new(vertex_count: u32, triangle_count: u32, attribute_count: u8, index_format: u8) -> Self {
        Self {
            vertex_count,
            triangle_count,
            attribute_count,
            index_format,
            _padding: [0; 2],
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.triangle_count.to_le_bytes());
        bytes[8] = self.attribute_count;
        bytes[9] = self.index_format;
        // padding bytes stay 0
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            vertex_count: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            triangle_count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            attribute_count: bytes[8],
            index_format: bytes[9],
            _padding: [0; 2],
        })
    }
}

/// Serialize a packed mesh
pub fn write_mesh(mesh: &Mesh) -> Vec<u8> {
    let format = mesh.format();
    let header = MeshFileHeader::new(
        mesh.vertex_count() as u32,
        mesh.triangle_count() as u32,
        format.attribute_count() as u8,
        format.index_format().to_code(),
    );

    let mut bytes = Vec::with_capacity(
        MeshFileHeader::SIZE
            + 2 * format.attribute_count()
            + 8 * format.total_component_count()
            + mesh.raw_vertex_data().len()
            + mesh.raw_index_data().len(),
    );
    bytes.extend_from_slice(&header.to_bytes());
    for attribute in format.attributes() {
        bytes.push(attribute.attribute_type.to_code());
        bytes.push(attribute.id.to_code());
    }
    for params in mesh.coding_params() {
        for component in &params.components {
            bytes.extend_from_slice(&component.offset.to_le_bytes());
            bytes.extend_from_slice(&component.scale.to_le_bytes());
        }
    }
    bytes.extend_from_slice(mesh.raw_vertex_data());
    bytes.extend_from_slice(mesh.raw_index_data());
    bytes
}

/// Cursor over a byte slice that fails with [`MeshError::MalformedFile`]
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8], MeshError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| MeshError::MalformedFile(format!("truncated {what}")))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn f32(&mut self, what: &str) -> Result<f32, MeshError> {
        let b = self.take(4, what)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// Deserialize and validate a packed mesh
pub fn read_mesh(bytes: &[u8]) -> Result<Mesh, MeshError> {
    let header = MeshFileHeader::from_bytes(bytes)
        .ok_or_else(|| MeshError::MalformedFile("truncated header".to_string()))?;
    let mut reader = Reader {
        bytes,
        pos: MeshFileHeader::SIZE,
    };

    let index_format = IndexFormat::from_code(header.index_format).ok_or_else(|| {
        MeshError::MalformedFile(format!("unknown index format {}", header.index_format))
    })?;

    let mut attributes = Vec::with_capacity(header.attribute_count as usize);
    for _ in 0..header.attribute_count {
        let entry = reader.take(2, "attribute table")?;
        let attribute_type = AttributeType::from_code(entry[0]).ok_or_else(|| {
            MeshError::MalformedFile(format!("unknown attribute type {}", entry[0]))
        })?;
        let id = AttributeId::from_code(entry[1])
            .ok_or_else(|| MeshError::MalformedFile(format!("unknown attribute id {}", entry[1])))?;
        attributes.push((attribute_type, id));
    }
    let format = MeshFormat::new(attributes, index_format)?;

    let mut coding_params = Vec::with_capacity(format.attribute_count());
    for (attribute_index, attribute) in format.attributes().iter().enumerate() {
        let mut params = MeshAttributeCodingParams::default();
        for _ in 0..attribute.attribute_type.component_count() {
            let offset = reader.f32("coding params")?;
            let scale = reader.f32("coding params")?;
            params.components.push(ComponentCodingParams::new(offset, scale));
        }
        if !params.is_valid_for(attribute.attribute_type) {
            return Err(MeshError::InvalidCodingParams {
                attribute: attribute_index,
                reason: "offsets and scales must be finite with positive scale".to_string(),
            });
        }
        coding_params.push(params);
    }

    let vertex_count = header.vertex_count as usize;
    if vertex_count > MAX_VERTICES_PER_MESH {
        return Err(MeshError::TooManyVertices {
            count: vertex_count,
            max: MAX_VERTICES_PER_MESH,
        });
    }
    let vertex_data = reader.take(vertex_count * format.packed_vertex_stride(), "vertex data")?;
    let index_data = reader.take(header.triangle_count as usize * 3 * 2, "index data")?;
    if reader.pos != bytes.len() {
        return Err(MeshError::MalformedFile(format!(
            "{} trailing bytes",
            bytes.len() - reader.pos
        )));
    }

    let triangles = (0..header.triangle_count as usize)
        .map(|t| read_triangle_indices(t, 2, index_data))
        .collect::<Result<Vec<_>, _>>()?;
    validate_triangle_list(triangles, vertex_count)?;

    Mesh::from_parts(format, vertex_data.to_vec(), index_data.to_vec(), coding_params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutable_mesh::PackingOptions;

    fn sample_mesh() -> Mesh {
        let format = MeshFormat::new(
            vec![
                (AttributeType::Float2PackedInFourUnsignedBytesX12Y20, AttributeId::Position),
                (AttributeType::Float3PackedInFourUnsignedBytesXYZ10, AttributeId::ColorShiftHsl),
                (AttributeType::Float1Unpacked, AttributeId::Custom2),
            ],
            IndexFormat::Unpacked16Packed16,
        )
        .unwrap();
        Mesh::create(
            &format,
            &[
                &[0.0, 2.5, -1.0, 4.0],
                &[1.0, 1.0, 3.0, -2.0],
                &[0.0, 0.5, 1.0, 0.25],
                &[-1.0, 0.0, 1.0, 0.0],
                &[0.0, 0.0, 0.0, 0.0],
                &[7.0, 8.0, 9.0, 10.0],
            ],
            &[0, 1, 2, 2, 1, 3],
            &PackingOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_header_roundtrip() {
        let header = MeshFileHeader::new(100, 50, 3, 1);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[8..12], &[3, 1, 0, 0]);
        assert_eq!(MeshFileHeader::from_bytes(&bytes), Some(header));
        assert_eq!(MeshFileHeader::from_bytes(&bytes[..11]), None);
    }

    #[test]
    fn test_mesh_file_layout() {
        let mesh = sample_mesh();
        let bytes = write_mesh(&mesh);

        assert_eq!(&bytes[0..4], &4u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2u32.to_le_bytes());
        assert_eq!(bytes[8], 3);
        assert_eq!(bytes[9], IndexFormat::Unpacked16Packed16.to_code());
        assert_eq!(
            &bytes[12..14],
            &[
                AttributeType::Float2PackedInFourUnsignedBytesX12Y20.to_code(),
                AttributeId::Position.to_code()
            ]
        );
        // 6 components of coding params, then 12-byte vertices and 12 index bytes
        assert_eq!(bytes.len(), 12 + 6 + 6 * 8 + 4 * 12 + 12);
        assert_eq!(&bytes[bytes.len() - 12..], mesh.raw_index_data());
    }

    #[test]
    fn test_mesh_file_roundtrip() {
        let mesh = sample_mesh();
        let read = read_mesh(&write_mesh(&mesh)).unwrap();
        assert_eq!(read, mesh);
        assert_eq!(read.bounds(), mesh.bounds());
    }

    #[test]
    fn test_read_rejects_malformed() {
        let bytes = write_mesh(&sample_mesh());

        assert!(matches!(read_mesh(&bytes[..8]), Err(MeshError::MalformedFile(_))));
        assert!(matches!(
            read_mesh(&bytes[..bytes.len() - 1]),
            Err(MeshError::MalformedFile(_))
        ));

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(matches!(read_mesh(&trailing), Err(MeshError::MalformedFile(_))));

        let mut bad_index_format = bytes.clone();
        bad_index_format[9] = 7;
        assert!(matches!(read_mesh(&bad_index_format), Err(MeshError::MalformedFile(_))));

        let mut bad_type = bytes.clone();
        bad_type[12] = 200;
        assert!(matches!(read_mesh(&bad_type), Err(MeshError::MalformedFile(_))));

        // Scale of the first position component
        let mut bad_scale = bytes.clone();
        bad_scale[22..26].copy_from_slice(&0.0f32.to_le_bytes());
        assert!(matches!(
            read_mesh(&bad_scale),
            Err(MeshError::InvalidCodingParams { attribute: 0, .. })
        ));

        let mut bad_triangle = bytes.clone();
        let last = bad_triangle.len() - 2;
        bad_triangle[last..].copy_from_slice(&9u16.to_le_bytes());
        assert_eq!(
            read_mesh(&bad_triangle),
            Err(MeshError::TriangleIndexOutOfBounds {
                triangle: 1,
                index: 9,
                vertex_count: 4
            })
        );
    }
}
