//! Attribute element types - the value types an attribute can store per element.

use bytemuck::{Pod, Zeroable};
use glam::{IVec2, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Error;

/// Element type of an attribute.
///
/// Every variant maps to exactly one Rust type implementing [`AttrPod`], so
/// type-erased storage can always be reinterpreted as a typed slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AttrType {
    /// Boolean stored as one byte
    Bool = 0,
    /// Signed 8-bit integer
    Int8 = 1,
    /// Signed 32-bit integer
    #[serde(rename = "int")]
    Int32 = 2,
    /// Two signed 32-bit integers
    Int2 = 3,
    /// 32-bit float
    Float = 4,
    /// 2D float vector
    Float2 = 5,
    /// 3D float vector
    Float3 = 6,
    /// 4x4 float matrix
    Float4x4 = 7,
    /// RGBA float color
    #[serde(rename = "color")]
    ColorFloat = 8,
    /// RGBA byte color
    #[serde(rename = "byte_color")]
    ColorByte = 9,
    /// Rotation quaternion
    Quaternion = 10,
}

impl AttrType {
    /// Number of attribute types.
    pub const COUNT: usize = 11;

    /// All attribute types in declaration order.
    pub const ALL: [AttrType; Self::COUNT] = [
        Self::Bool,
        Self::Int8,
        Self::Int32,
        Self::Int2,
        Self::Float,
        Self::Float2,
        Self::Float3,
        Self::Float4x4,
        Self::ColorFloat,
        Self::ColorByte,
        Self::Quaternion,
    ];

    /// Returns the size in bytes of a single element of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Bool => 1,
            Self::Int8 => 1,
            Self::Int32 => 4,
            Self::Int2 => 8,
            Self::Float => 4,
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Float4x4 => 64,
            Self::ColorFloat => 16,
            Self::ColorByte => 4,
            Self::Quaternion => 16,
        }
    }

    /// Returns the name of this type as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int32 => "int",
            Self::Int2 => "int2",
            Self::Float => "float",
            Self::Float2 => "float2",
            Self::Float3 => "float3",
            Self::Float4x4 => "float4x4",
            Self::ColorFloat => "color",
            Self::ColorByte => "byte_color",
            Self::Quaternion => "quaternion",
        }
    }

    /// Parse a type from its name string.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Returns true for integer-valued types.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int8 | Self::Int32 | Self::Int2)
    }

    /// Returns true for float-valued types (vectors, matrices and colors included).
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(
            self,
            Self::Float
                | Self::Float2
                | Self::Float3
                | Self::Float4x4
                | Self::ColorFloat
                | Self::Quaternion
        )
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AttrType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::UnknownType(s.to_string()))
    }
}

// === Element trait for type-safe conversions ===

/// Trait for Rust types that can be stored as attribute elements.
pub trait AttrPod: Pod + Zeroable + Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// The corresponding attribute type.
    const ATTR_TYPE: AttrType;
}

impl AttrPod for i8 {
    const ATTR_TYPE: AttrType = AttrType::Int8;
}

impl AttrPod for i32 {
    const ATTR_TYPE: AttrType = AttrType::Int32;
}

impl AttrPod for IVec2 {
    const ATTR_TYPE: AttrType = AttrType::Int2;
}

impl AttrPod for f32 {
    const ATTR_TYPE: AttrType = AttrType::Float;
}

impl AttrPod for Vec2 {
    const ATTR_TYPE: AttrType = AttrType::Float2;
}

impl AttrPod for Vec3 {
    const ATTR_TYPE: AttrType = AttrType::Float3;
}

impl AttrPod for Mat4 {
    const ATTR_TYPE: AttrType = AttrType::Float4x4;
}

impl AttrPod for Quat {
    const ATTR_TYPE: AttrType = AttrType::Quaternion;
}

/// Boolean type with guaranteed 1-byte storage.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Bool(u8);

impl Bool {
    pub const TRUE: Self = Self(1);
    pub const FALSE: Self = Self(0);

    #[inline]
    pub const fn new(v: bool) -> Self {
        Self(v as u8)
    }

    #[inline]
    pub const fn get(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for Bool {
    #[inline]
    fn from(v: bool) -> Self {
        Self::new(v)
    }
}

impl From<Bool> for bool {
    #[inline]
    fn from(v: Bool) -> Self {
        v.get()
    }
}

impl fmt::Debug for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl fmt::Display for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl AttrPod for Bool {
    const ATTR_TYPE: AttrType = AttrType::Bool;
}

/// RGBA color with float channels, stored in geometry (linear) space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ColorGeometry4f {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorGeometry4f {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl AttrPod for ColorGeometry4f {
    const ATTR_TYPE: AttrType = AttrType::ColorFloat;
}

/// RGBA color with byte channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct ColorGeometry4b {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorGeometry4b {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl AttrPod for ColorGeometry4b {
    const ATTR_TYPE: AttrType = AttrType::ColorByte;
}

/// Run `$body` with `$T` aliased to the Rust element type of `$data_type`.
macro_rules! with_attr_type {
    ($data_type:expr, $T:ident => $body:expr) => {
        match $data_type {
            $crate::util::AttrType::Bool => {
                type $T = $crate::util::Bool;
                $body
            }
            $crate::util::AttrType::Int8 => {
                type $T = i8;
                $body
            }
            $crate::util::AttrType::Int32 => {
                type $T = i32;
                $body
            }
            $crate::util::AttrType::Int2 => {
                type $T = ::glam::IVec2;
                $body
            }
            $crate::util::AttrType::Float => {
                type $T = f32;
                $body
            }
            $crate::util::AttrType::Float2 => {
                type $T = ::glam::Vec2;
                $body
            }
            $crate::util::AttrType::Float3 => {
                type $T = ::glam::Vec3;
                $body
            }
            $crate::util::AttrType::Float4x4 => {
                type $T = ::glam::Mat4;
                $body
            }
            $crate::util::AttrType::ColorFloat => {
                type $T = $crate::util::ColorGeometry4f;
                $body
            }
            $crate::util::AttrType::ColorByte => {
                type $T = $crate::util::ColorGeometry4b;
                $body
            }
            $crate::util::AttrType::Quaternion => {
                type $T = ::glam::Quat;
                $body
            }
        }
    };
}

pub(crate) use with_attr_type;
