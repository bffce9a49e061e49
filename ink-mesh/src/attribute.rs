//! Vertex attribute types, identities, coding params and bounds
//!
//! An [`AttributeType`] fixes how the 1-4 float components of a vertex
//! attribute are stored: either as raw `f32`s, or quantized to unsigned
//! integers of a fixed bit width and concatenated into 24-bit float containers
//! or 8-bit byte containers.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Inline storage for one attribute's components (never more than 4)
pub type AttributeValues = SmallVec<[f32; 4]>;

/// Inline storage for one attribute's quantized components
pub type QuantizedValues = SmallVec<[u32; 4]>;

/// Storage container used by an [`AttributeType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// One raw `f32` per component
    Unpacked,
    /// Bit fields spread over this many floats, 24 integer bits per float
    Floats(u8),
    /// Bit fields spread over this many bytes
    Bytes(u8),
}

/// Number of integer bits stored in one float container.
///
/// Every unsigned integer below 2^24 is exactly representable as an `f32`.
pub const BITS_PER_FLOAT_CONTAINER: u32 = 24;

/// Largest value a float container may hold (2^24 - 1)
pub const MAX_PACKED_FLOAT_VALUE: f32 = 16_777_215.0;

// ============================================================================
// Attribute Type
// ============================================================================

/// Storage layout of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    Float1Unpacked,
    Float2Unpacked,
    Float2PackedInOneFloat,
    Float3Unpacked,
    Float3PackedInOneFloat,
    Float3PackedInTwoFloats,
    Float4Unpacked,
    Float4PackedInOneFloat,
    Float4PackedInTwoFloats,
    Float4PackedInThreeFloats,
    Float1PackedInOneUnsignedByte,
    #[serde(rename = "Float2PackedInThreeUnsignedBytes_XY12")]
    Float2PackedInThreeUnsignedBytesXY12,
    #[serde(rename = "Float2PackedInFourUnsignedBytes_X12_Y20")]
    Float2PackedInFourUnsignedBytesX12Y20,
    #[serde(rename = "Float3PackedInFourUnsignedBytes_XYZ10")]
    Float3PackedInFourUnsignedBytesXYZ10,
}

impl AttributeType {
    /// Every attribute type, in wire-code order
    pub const ALL: [AttributeType; 14] = [
        AttributeType::Float1Unpacked,
        AttributeType::Float2Unpacked,
        AttributeType::Float2PackedInOneFloat,
        AttributeType::Float3Unpacked,
        AttributeType::Float3PackedInOneFloat,
        AttributeType::Float3PackedInTwoFloats,
        AttributeType::Float4Unpacked,
        AttributeType::Float4PackedInOneFloat,
        AttributeType::Float4PackedInTwoFloats,
        AttributeType::Float4PackedInThreeFloats,
        AttributeType::Float1PackedInOneUnsignedByte,
        AttributeType::Float2PackedInThreeUnsignedBytesXY12,
        AttributeType::Float2PackedInFourUnsignedBytesX12Y20,
        AttributeType::Float3PackedInFourUnsignedBytesXYZ10,
    ];

    /// Number of float components
    #[inline]
    pub const fn component_count(self) -> usize {
        match self {
            AttributeType::Float1Unpacked | AttributeType::Float1PackedInOneUnsignedByte => 1,
            AttributeType::Float2Unpacked
            | AttributeType::Float2PackedInOneFloat
            | AttributeType::Float2PackedInThreeUnsignedBytesXY12
            | AttributeType::Float2PackedInFourUnsignedBytesX12Y20 => 2,
            AttributeType::Float3Unpacked
            | AttributeType::Float3PackedInOneFloat
            | AttributeType::Float3PackedInTwoFloats
            | AttributeType::Float3PackedInFourUnsignedBytesXYZ10 => 3,
            AttributeType::Float4Unpacked
            | AttributeType::Float4PackedInOneFloat
            | AttributeType::Float4PackedInTwoFloats
            | AttributeType::Float4PackedInThreeFloats => 4,
        }
    }

    /// Storage container
    #[inline]
    pub const fn container(self) -> Container {
        match self {
            AttributeType::Float1Unpacked
            | AttributeType::Float2Unpacked
            | AttributeType::Float3Unpacked
            | AttributeType::Float4Unpacked => Container::Unpacked,
            AttributeType::Float2PackedInOneFloat
            | AttributeType::Float3PackedInOneFloat
            | AttributeType::Float4PackedInOneFloat => Container::Floats(1),
            AttributeType::Float3PackedInTwoFloats | AttributeType::Float4PackedInTwoFloats => {
                Container::Floats(2)
            }
            AttributeType::Float4PackedInThreeFloats => Container::Floats(3),
            AttributeType::Float1PackedInOneUnsignedByte => Container::Bytes(1),
            AttributeType::Float2PackedInThreeUnsignedBytesXY12 => Container::Bytes(3),
            AttributeType::Float2PackedInFourUnsignedBytesX12Y20
            | AttributeType::Float3PackedInFourUnsignedBytesXYZ10 => Container::Bytes(4),
        }
    }

    /// Whether components are quantized to integers
    #[inline]
    pub const fn is_packed(self) -> bool {
        !matches!(self.container(), Container::Unpacked)
    }

    /// Bit width of each component, most significant field first.
    ///
    /// Empty for unpacked types.
    pub const fn bits_per_component(self) -> &'static [u8] {
        match self {
            AttributeType::Float1Unpacked
            | AttributeType::Float2Unpacked
            | AttributeType::Float3Unpacked
            | AttributeType::Float4Unpacked => &[],
            AttributeType::Float1PackedInOneUnsignedByte => &[8],
            AttributeType::Float2PackedInOneFloat
            | AttributeType::Float2PackedInThreeUnsignedBytesXY12 => &[12, 12],
            AttributeType::Float2PackedInFourUnsignedBytesX12Y20 => &[12, 20],
            AttributeType::Float3PackedInOneFloat => &[8, 8, 8],
            AttributeType::Float3PackedInTwoFloats => &[16, 16, 16],
            AttributeType::Float3PackedInFourUnsignedBytesXYZ10 => &[10, 10, 10],
            AttributeType::Float4PackedInOneFloat => &[6, 6, 6, 6],
            AttributeType::Float4PackedInTwoFloats => &[12, 12, 12, 12],
            AttributeType::Float4PackedInThreeFloats => &[18, 18, 18, 18],
        }
    }

    /// Bytes occupied in a packed vertex
    #[inline]
    pub const fn packed_byte_width(self) -> usize {
        match self.container() {
            Container::Unpacked => self.unpacked_byte_width(),
            Container::Floats(n) => 4 * n as usize,
            Container::Bytes(n) => n as usize,
        }
    }

    /// Bytes occupied in an unpacked (all-float) vertex
    #[inline]
    pub const fn unpacked_byte_width(self) -> usize {
        4 * self.component_count()
    }

    /// Stable wire code
    pub fn to_code(self) -> u8 {
        Self::ALL.iter().position(|&t| t == self).unwrap_or_default() as u8
    }

    /// Parse a wire code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

// ============================================================================
// Attribute Id
// ============================================================================

/// Semantic identity of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeId {
    Position,
    ColorShiftHsl,
    OpacityShift,
    Texture,
    SideDerivative,
    SideLabel,
    ForwardDerivative,
    ForwardLabel,
    Custom0,
    Custom1,
    Custom2,
    Custom3,
    Custom4,
    Custom5,
    Custom6,
    Custom7,
    Custom8,
    Custom9,
}

impl AttributeId {
    /// Every attribute id, in wire-code order
    pub const ALL: [AttributeId; 18] = [
        AttributeId::Position,
        AttributeId::ColorShiftHsl,
        AttributeId::OpacityShift,
        AttributeId::Texture,
        AttributeId::SideDerivative,
        AttributeId::SideLabel,
        AttributeId::ForwardDerivative,
        AttributeId::ForwardLabel,
        AttributeId::Custom0,
        AttributeId::Custom1,
        AttributeId::Custom2,
        AttributeId::Custom3,
        AttributeId::Custom4,
        AttributeId::Custom5,
        AttributeId::Custom6,
        AttributeId::Custom7,
        AttributeId::Custom8,
        AttributeId::Custom9,
    ];

    /// Component count this id demands, or `None` for custom attributes
    pub const fn required_component_count(self) -> Option<usize> {
        match self {
            AttributeId::Position
            | AttributeId::Texture
            | AttributeId::SideDerivative
            | AttributeId::ForwardDerivative => Some(2),
            AttributeId::ColorShiftHsl => Some(3),
            AttributeId::OpacityShift | AttributeId::SideLabel | AttributeId::ForwardLabel => {
                Some(1)
            }
            _ => None,
        }
    }

    /// Stable wire code
    pub fn to_code(self) -> u8 {
        Self::ALL.iter().position(|&id| id == self).unwrap_or_default() as u8
    }

    /// Parse a wire code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

// ============================================================================
// Coding Params
// ============================================================================

/// Linear map between one float component and its quantized integer code.
///
/// `code = round((value - offset) / scale)`, `value = code * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentCodingParams {
    pub offset: f32,
    pub scale: f32,
}

impl ComponentCodingParams {
    /// The transform used by unpacked attributes
    pub const IDENTITY: Self = Self {
        offset: 0.0,
        scale: 1.0,
    };

    pub const fn new(offset: f32, scale: f32) -> Self {
        Self { offset, scale }
    }

    /// Finite offset and finite, strictly positive scale
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.offset.is_finite() && self.scale.is_finite() && self.scale > 0.0
    }
}

impl Default for ComponentCodingParams {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One [`ComponentCodingParams`] per component of an attribute
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshAttributeCodingParams {
    pub components: SmallVec<[ComponentCodingParams; 4]>,
}

impl MeshAttributeCodingParams {
    pub fn new(components: impl IntoIterator<Item = ComponentCodingParams>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    /// Identity transform for every component of `attribute_type`
    pub fn identity(attribute_type: AttributeType) -> Self {
        Self::new(std::iter::repeat_n(
            ComponentCodingParams::IDENTITY,
            attribute_type.component_count(),
        ))
    }

    /// Component count matches and every component is valid
    pub fn is_valid_for(&self, attribute_type: AttributeType) -> bool {
        self.components.len() == attribute_type.component_count()
            && self.components.iter().all(ComponentCodingParams::is_valid)
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Componentwise minimum and maximum of an attribute over a set of vertices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshAttributeBounds {
    pub minimum: AttributeValues,
    pub maximum: AttributeValues,
}

impl MeshAttributeBounds {
    pub fn new(minimum: &[f32], maximum: &[f32]) -> Self {
        Self {
            minimum: SmallVec::from_slice(minimum),
            maximum: SmallVec::from_slice(maximum),
        }
    }

    /// Bounds containing only `values`
    pub fn from_point(values: &[f32]) -> Self {
        Self::new(values, values)
    }

    /// Grow to contain `values`
    pub fn include(&mut self, values: &[f32]) {
        for (i, &v) in values.iter().enumerate() {
            self.minimum[i] = self.minimum[i].min(v);
            self.maximum[i] = self.maximum[i].max(v);
        }
    }
}
