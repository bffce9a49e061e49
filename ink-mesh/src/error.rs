//! Error types for mesh construction and attribute packing
//!
//! Two tiers:
//! - [`MeshError`] - caller input problems detected at mesh construction
//!   boundaries. Applications are expected to surface these, never crash.
//! - [`PackingError`] - contract violations in the low-level codecs (wrong
//!   buffer widths, values outside a bit field, misaligned index buffers).
//!   These are always checked; high-level code validates its inputs first, so
//!   one of these reaching an application through [`MeshError::Packing`]
//!   indicates a bug in this crate.

use crate::attribute::{AttributeId, AttributeType};

/// Coarse classification of a [`MeshError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The arguments are malformed on their own
    InvalidArgument,
    /// The arguments are well formed but inconsistent with the object's state
    FailedPrecondition,
}

/// Recoverable mesh construction error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    // ------------------------------------------------------------------------
    // Format errors
    // ------------------------------------------------------------------------
    /// Attribute list is empty or too long
    #[error("mesh format must have between 1 and {max} attributes, got {count}")]
    AttributeCount { count: usize, max: usize },

    /// No position attribute
    #[error("mesh format has no position attribute")]
    MissingPosition,

    /// Same attribute id used twice
    #[error("attribute id {0:?} appears more than once in mesh format")]
    DuplicateAttributeId(AttributeId),

    /// Attribute type has the wrong component count for its id
    #[error("attribute {id:?} requires {expected} components, type has {actual}")]
    AttributeComponentCount {
        id: AttributeId,
        expected: usize,
        actual: usize,
    },

    /// Position cannot be dropped from a packed mesh
    #[error("the position attribute cannot be omitted")]
    OmittedPosition,

    /// Omission list names an attribute the format does not have
    #[error("cannot omit attribute {0:?}: not present in mesh format")]
    OmittedAttributeNotInFormat(AttributeId),

    // ------------------------------------------------------------------------
    // Coding params errors
    // ------------------------------------------------------------------------
    /// Number of per-attribute bounds does not match the format
    #[error("expected bounds for {expected} attributes, got {actual}")]
    BoundsCountMismatch { expected: usize, actual: usize },

    /// Number of custom coding params does not match the format
    #[error("expected coding params for {expected} attributes, got {actual}")]
    CodingParamsCountMismatch { expected: usize, actual: usize },

    /// Custom coding params supplied for an attribute stored as raw floats
    #[error("coding params given for unpacked attribute {attribute}")]
    CodingParamsForUnpackedAttribute { attribute: usize },

    /// Custom coding params are missing components or have non-finite/non-positive values
    #[error("invalid coding params for attribute {attribute}: {reason}")]
    InvalidCodingParams { attribute: usize, reason: String },

    /// Custom coding params cannot represent the attribute's observed range
    #[error(
        "coding params for attribute {attribute} cannot represent component {component} \
         values in [{minimum}, {maximum}]"
    )]
    UnrepresentableValues {
        attribute: usize,
        component: usize,
        minimum: f32,
        maximum: f32,
    },

    /// The attribute's value range overflows f32
    #[error(
        "range of attribute {attribute} component {component} exceeds float precision \
         ([{minimum}, {maximum}])"
    )]
    RangeExceedsPrecision {
        attribute: usize,
        component: usize,
        minimum: f32,
        maximum: f32,
    },

    // ------------------------------------------------------------------------
    // Vertex and triangle data errors
    // ------------------------------------------------------------------------
    /// Wrong number of per-component value slices
    #[error("expected {expected} vertex attribute component arrays, got {actual}")]
    ComponentArrayCount { expected: usize, actual: usize },

    /// Per-component value slices disagree on the vertex count
    #[error("component array {component} has {actual} values, expected {expected}")]
    ComponentArrayLength {
        component: usize,
        expected: usize,
        actual: usize,
    },

    /// An attribute value is NaN or infinite
    #[error("non-finite value in attribute {attribute} of vertex {vertex}")]
    NonFiniteValue { attribute: usize, vertex: usize },

    /// Quantized input does not fit its component's bit width
    #[error(
        "quantized value {value} for attribute {attribute} component {component} \
         exceeds {max}"
    )]
    QuantizedValueOutOfRange {
        attribute: usize,
        component: usize,
        value: u32,
        max: u32,
    },

    /// Quantized input given for an attribute stored as raw floats
    #[error("quantized data cannot be given for unpacked attribute {attribute}")]
    QuantizedDataForUnpackedAttribute { attribute: usize },

    /// Triangle index buffer length is not a multiple of three
    #[error("triangle index count {0} is not a multiple of 3")]
    TriangleIndexCount(usize),

    /// A triangle references a vertex that does not exist
    #[error("triangle {triangle} references vertex {index}, mesh has {vertex_count} vertices")]
    TriangleIndexOutOfBounds {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A triangle uses the same vertex more than once
    #[error("triangle {triangle} repeats vertex {index}")]
    DuplicateTriangleVertex { triangle: usize, index: u32 },

    /// More vertices than a 16-bit packed index buffer can address
    #[error("mesh has {count} vertices, a packed mesh holds at most {max}")]
    TooManyVertices { count: usize, max: usize },

    /// Partition size cannot hold a triangle or exceeds the packed index range
    #[error("partition size {size} must be between 3 and {max}")]
    InvalidPartitionSize { size: usize, max: usize },

    // ------------------------------------------------------------------------
    // Accessor errors
    // ------------------------------------------------------------------------
    /// Attribute index past the end of the format
    #[error("attribute index {index} out of bounds for format with {count} attributes")]
    AttributeIndexOutOfBounds { index: usize, count: usize },

    /// Vertex index past the last vertex
    #[error("vertex index {index} out of bounds for mesh with {count} vertices")]
    VertexIndexOutOfBounds { index: usize, count: usize },

    /// Malformed `.inkmesh` container
    #[error("malformed mesh file: {0}")]
    MalformedFile(String),

    /// Low-level codec contract violation
    #[error(transparent)]
    Packing(#[from] PackingError),
}

impl MeshError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeshError::TriangleIndexOutOfBounds { .. }
            | MeshError::DuplicateTriangleVertex { .. }
            | MeshError::AttributeIndexOutOfBounds { .. }
            | MeshError::VertexIndexOutOfBounds { .. }
            | MeshError::Packing(_) => ErrorKind::FailedPrecondition,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

/// Codec contract violation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PackingError {
    /// Integer codec called for a raw-float attribute type
    #[error("{0:?} is not a packed attribute type")]
    NotPacked(AttributeType),

    /// Byte buffer does not match the attribute type's fixed width
    #[error("expected {expected} bytes, got {actual}")]
    ByteWidth { expected: usize, actual: usize },

    /// Value slice does not match the attribute type's component count
    #[error("expected {expected} components, got {actual}")]
    ComponentCount { expected: usize, actual: usize },

    /// Coding params do not fit the attribute type
    #[error("invalid coding params: {0}")]
    InvalidCodingParams(&'static str),

    /// Float value to pack is NaN or infinite
    #[error("cannot pack non-finite value {value} in component {component}")]
    NonFiniteValue { component: usize, value: f32 },

    /// Quantized value does not fit its bit field
    #[error("component {component} value {value} does not fit in {bits} bits")]
    ValueOutOfRange { component: usize, value: i64, bits: u8 },

    /// Float container holds something other than a 24-bit unsigned integer
    #[error("packed float {value} is outside [0, 2^24 - 1]")]
    PackedFloatOutOfRange { value: f32 },

    /// Index buffer length is not a whole number of triangles
    #[error("index buffer of {len} bytes is not a multiple of {triangle_bytes}")]
    MisalignedIndexData { len: usize, triangle_bytes: usize },

    /// Triangle slot past the end of the index buffer
    #[error("triangle {triangle} out of bounds for {triangle_count} triangles")]
    TriangleOutOfBounds { triangle: usize, triangle_count: usize },

    /// Index value does not fit the index stride
    #[error("index {value} does not fit in {stride} bytes")]
    IndexValueTooLarge { value: u32, stride: usize },

    /// Unsupported index stride
    #[error("index stride must be 2 or 4 bytes, got {0}")]
    InvalidIndexStride(usize),
}
