//! Single type-erased attribute value.

use smallvec::SmallVec;
use std::fmt;

use crate::util::{with_attr_type, AttrPod, AttrType, Error, Result};

/// One attribute value of a runtime-known type.
///
/// Stores the value bytes inline for everything up to 16 bytes (all types but
/// matrices), so defaults and fill values rarely allocate.
#[derive(Clone, PartialEq)]
pub struct GValue {
    data_type: AttrType,
    bytes: SmallVec<[u8; 16]>,
}

impl GValue {
    /// Wrap a typed value.
    pub fn new<T: AttrPod>(value: T) -> Self {
        Self {
            data_type: T::ATTR_TYPE,
            bytes: SmallVec::from_slice(bytemuck::bytes_of(&value)),
        }
    }

    /// Default-constructed value of a type (zero, or identity for rotations and matrices).
    pub fn default_for(data_type: AttrType) -> Self {
        with_attr_type!(data_type, T => Self::new(T::default()))
    }

    /// All-zero value of a type.
    pub fn zeroed(data_type: AttrType) -> Self {
        Self {
            data_type,
            bytes: SmallVec::from_elem(0, data_type.num_bytes()),
        }
    }

    /// Build a value from raw bytes.
    pub fn from_bytes(data_type: AttrType, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != data_type.num_bytes() {
            return Err(Error::SizeMismatch {
                expected: data_type.num_bytes(),
                actual: bytes.len(),
            });
        }
        Ok(Self {
            data_type,
            bytes: SmallVec::from_slice(bytes),
        })
    }

    #[inline]
    pub fn data_type(&self) -> AttrType {
        self.data_type
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Read the value as `T`, `None` if the type differs.
    pub fn get<T: AttrPod>(&self) -> Option<T> {
        if T::ATTR_TYPE != self.data_type {
            return None;
        }
        Some(bytemuck::pod_read_unaligned(&self.bytes))
    }
}

impl fmt::Debug for GValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_attr_type!(self.data_type, T => {
            let value: T = bytemuck::pod_read_unaligned(&self.bytes);
            write!(f, "{}({:?})", self.data_type, value)
        })
    }
}

impl<T: AttrPod> From<T> for GValue {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
