//! Layer type tags and masks.

use std::fmt;

use crate::util::AttrType;

/// Type of a layer in a [`CustomData`](super::CustomData) collection.
///
/// Generic property types correspond one-to-one with [`AttrType`]. The remaining
/// types are structural layers that exist for internal bookkeeping and are never
/// exposed as generic attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CustomDataType {
    PropFloat = 0,
    PropInt32 = 1,
    PropInt8 = 2,
    PropBool = 3,
    PropFloat2 = 4,
    PropFloat3 = 5,
    PropInt2 = 6,
    PropColor = 7,
    PropByteColor = 8,
    PropQuaternion = 9,
    PropFloat4x4 = 10,
    /// Index of the element this one was derived from
    OrigIndex = 11,
    /// Cached normals
    Normal = 12,
    /// Shape key index per vertex
    ShapeKeyIndex = 13,
}

impl CustomDataType {
    /// Bit of this type in a [`CustomDataMask`].
    #[inline]
    pub const fn bit(self) -> u64 {
        1u64 << (self as u64)
    }

    /// Element type used to store the layer's values.
    pub const fn storage_type(self) -> AttrType {
        match self {
            Self::PropFloat => AttrType::Float,
            Self::PropInt32 => AttrType::Int32,
            Self::PropInt8 => AttrType::Int8,
            Self::PropBool => AttrType::Bool,
            Self::PropFloat2 => AttrType::Float2,
            Self::PropFloat3 => AttrType::Float3,
            Self::PropInt2 => AttrType::Int2,
            Self::PropColor => AttrType::ColorFloat,
            Self::PropByteColor => AttrType::ColorByte,
            Self::PropQuaternion => AttrType::Quaternion,
            Self::PropFloat4x4 => AttrType::Float4x4,
            Self::OrigIndex => AttrType::Int32,
            Self::Normal => AttrType::Float3,
            Self::ShapeKeyIndex => AttrType::Int32,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::PropFloat => "PropFloat",
            Self::PropInt32 => "PropInt32",
            Self::PropInt8 => "PropInt8",
            Self::PropBool => "PropBool",
            Self::PropFloat2 => "PropFloat2",
            Self::PropFloat3 => "PropFloat3",
            Self::PropInt2 => "PropInt2",
            Self::PropColor => "PropColor",
            Self::PropByteColor => "PropByteColor",
            Self::PropQuaternion => "PropQuaternion",
            Self::PropFloat4x4 => "PropFloat4x4",
            Self::OrigIndex => "OrigIndex",
            Self::Normal => "Normal",
            Self::ShapeKeyIndex => "ShapeKeyIndex",
        }
    }
}

impl fmt::Display for CustomDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Attribute type of a generic property layer, `None` for structural layers.
pub const fn custom_data_type_to_attr_type(data_type: CustomDataType) -> Option<AttrType> {
    if CustomDataMask::PROP_ALL.contains(data_type) {
        Some(data_type.storage_type())
    } else {
        None
    }
}

/// Property layer type storing values of an attribute type.
pub const fn attr_type_to_custom_data_type(data_type: AttrType) -> CustomDataType {
    match data_type {
        AttrType::Bool => CustomDataType::PropBool,
        AttrType::Int8 => CustomDataType::PropInt8,
        AttrType::Int32 => CustomDataType::PropInt32,
        AttrType::Int2 => CustomDataType::PropInt2,
        AttrType::Float => CustomDataType::PropFloat,
        AttrType::Float2 => CustomDataType::PropFloat2,
        AttrType::Float3 => CustomDataType::PropFloat3,
        AttrType::Float4x4 => CustomDataType::PropFloat4x4,
        AttrType::ColorFloat => CustomDataType::PropColor,
        AttrType::ColorByte => CustomDataType::PropByteColor,
        AttrType::Quaternion => CustomDataType::PropQuaternion,
    }
}

/// Set of layer types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CustomDataMask(u64);

impl CustomDataMask {
    pub const NONE: Self = Self(0);

    /// Every generic property type.
    pub const PROP_ALL: Self = Self(
        CustomDataType::PropFloat.bit()
            | CustomDataType::PropInt32.bit()
            | CustomDataType::PropInt8.bit()
            | CustomDataType::PropBool.bit()
            | CustomDataType::PropFloat2.bit()
            | CustomDataType::PropFloat3.bit()
            | CustomDataType::PropInt2.bit()
            | CustomDataType::PropColor.bit()
            | CustomDataType::PropByteColor.bit()
            | CustomDataType::PropQuaternion.bit()
            | CustomDataType::PropFloat4x4.bit(),
    );

    #[inline]
    pub const fn contains(self, data_type: CustomDataType) -> bool {
        self.0 & data_type.bit() != 0
    }

    #[inline]
    pub const fn with(self, data_type: CustomDataType) -> Self {
        Self(self.0 | data_type.bit())
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_type_mapping_roundtrip() {
        for t in AttrType::ALL {
            let cd_type = attr_type_to_custom_data_type(t);
            assert_eq!(cd_type.storage_type(), t);
            assert_eq!(custom_data_type_to_attr_type(cd_type), Some(t));
        }
    }

    #[test]
    fn test_structural_types_are_not_attributes() {
        for t in [
            CustomDataType::OrigIndex,
            CustomDataType::Normal,
            CustomDataType::ShapeKeyIndex,
        ] {
            assert!(!CustomDataMask::PROP_ALL.contains(t));
            assert_eq!(custom_data_type_to_attr_type(t), None);
        }
    }

    #[test]
    fn test_mask_ops() {
        let mask = CustomDataMask::NONE.with(CustomDataType::OrigIndex);
        assert!(mask.contains(CustomDataType::OrigIndex));
        assert!(!mask.contains(CustomDataType::PropFloat));
        assert_eq!(CustomDataMask::PROP_ALL.bits().count_ones(), 11);
    }
}
