//! Owned type-erased attribute array.

use bytemuck::{Pod, Zeroable};
use std::fmt;

use super::span::fill_bytes;
use super::{GMutSpan, GSpan, GValue};
use crate::util::{AttrPod, AttrType, Error, Result};

/// Storage unit; keeps the byte buffer aligned for every element type.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C, align(16))]
struct Chunk([u8; 16]);

const CHUNK_SIZE: usize = std::mem::size_of::<Chunk>();

fn chunks_for(num_bytes: usize) -> usize {
    num_bytes.div_ceil(CHUNK_SIZE)
}

/// Owned array of attribute values whose type is known at runtime.
///
/// Elements live in 16-byte aligned storage, so the buffer can always be
/// reinterpreted as a slice of the matching [`AttrPod`] type.
#[derive(Clone)]
pub struct GArray {
    data_type: AttrType,
    len: usize,
    chunks: Vec<Chunk>,
}

impl GArray {
    /// Array of `len` all-zero elements.
    pub fn zeroed(data_type: AttrType, len: usize) -> Self {
        Self {
            data_type,
            len,
            chunks: vec![Chunk::zeroed(); chunks_for(len * data_type.num_bytes())],
        }
    }

    /// Array of `len` copies of `value`.
    pub fn filled(value: &GValue, len: usize) -> Self {
        let mut array = Self::zeroed(value.data_type(), len);
        fill_bytes(array.bytes_mut(), value.as_bytes());
        array
    }

    /// Array of `len` default-constructed elements.
    pub fn default_filled(data_type: AttrType, len: usize) -> Self {
        Self::filled(&GValue::default_for(data_type), len)
    }

    /// Copy a typed slice.
    pub fn from_slice<T: AttrPod>(values: &[T]) -> Self {
        Self::from_span(GSpan::new(values))
    }

    /// Take the values of a typed vector.
    pub fn from_vec<T: AttrPod>(values: Vec<T>) -> Self {
        Self::from_slice(&values)
    }

    /// Copy the contents of a span.
    pub fn from_span(span: GSpan<'_>) -> Self {
        let mut array = Self::zeroed(span.data_type(), span.len());
        array.bytes_mut().copy_from_slice(span.as_bytes());
        array
    }

    /// Build from raw bytes; the byte count must be a multiple of the element size.
    pub fn from_bytes(data_type: AttrType, bytes: &[u8]) -> Result<Self> {
        let size = data_type.num_bytes();
        if bytes.len() % size != 0 {
            return Err(Error::SizeMismatch {
                expected: bytes.len() / size * size,
                actual: bytes.len(),
            });
        }
        let mut array = Self::zeroed(data_type, bytes.len() / size);
        array.bytes_mut().copy_from_slice(bytes);
        Ok(array)
    }

    #[inline]
    pub fn data_type(&self) -> AttrType {
        self.data_type
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_span(&self) -> GSpan<'_> {
        GSpan::from_bytes(self.data_type, self.bytes())
    }

    #[inline]
    pub fn as_mut_span(&mut self) -> GMutSpan<'_> {
        let data_type = self.data_type;
        GMutSpan::from_bytes(data_type, self.bytes_mut())
    }

    /// Typed view, `None` on type mismatch.
    pub fn typed<T: AttrPod>(&self) -> Option<&[T]> {
        self.as_span().typed()
    }

    /// Typed mutable view, `None` on type mismatch.
    pub fn typed_mut<T: AttrPod>(&mut self) -> Option<&mut [T]> {
        self.as_mut_span().into_typed()
    }

    /// Copy out one element.
    pub fn get(&self, index: usize) -> Option<GValue> {
        self.as_span().get(index)
    }

    /// Change the element count. New elements are default-constructed.
    pub fn resize(&mut self, len: usize) {
        if len == self.len {
            return;
        }
        let size = self.data_type.num_bytes();
        let old_bytes = self.len * size;
        self.chunks.resize(chunks_for(len * size), Chunk::zeroed());
        self.len = len;
        if len * size > old_bytes {
            let default = GValue::default_for(self.data_type);
            fill_bytes(&mut self.bytes_mut()[old_bytes..], default.as_bytes());
        }
    }

    fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<Chunk, u8>(&self.chunks)[..self.len * self.data_type.num_bytes()]
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        let num_bytes = self.len * self.data_type.num_bytes();
        &mut bytemuck::cast_slice_mut::<Chunk, u8>(&mut self.chunks)[..num_bytes]
    }
}

impl PartialEq for GArray {
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type && self.bytes() == other.bytes()
    }
}

impl fmt::Debug for GArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GArray<{}>", self.data_type)?;
        fmt::Debug::fmt(&self.as_span(), f)
    }
}

impl<T: AttrPod> From<Vec<T>> for GArray {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Quat, Vec3};

    #[test]
    fn test_zeroed_and_default() {
        let zeros = GArray::zeroed(AttrType::Float, 4);
        assert_eq!(zeros.len(), 4);
        assert_eq!(zeros.typed::<f32>(), Some(&[0.0f32; 4][..]));

        let rotations = GArray::default_filled(AttrType::Quaternion, 3);
        assert_eq!(rotations.typed::<Quat>(), Some(&[Quat::IDENTITY; 3][..]));
    }

    #[test]
    fn test_aligned_views_for_all_types() {
        // Odd lengths exercise the tail of the last chunk.
        for t in AttrType::ALL {
            let array = GArray::default_filled(t, 7);
            assert_eq!(array.len(), 7);
            assert_eq!(array.as_span().len(), 7);
        }
        let matrices = GArray::default_filled(AttrType::Float4x4, 5);
        assert_eq!(matrices.typed::<Mat4>().map(|m| m.len()), Some(5));
    }

    #[test]
    fn test_from_vec_and_typed_mut() {
        let mut array = GArray::from_vec(vec![Vec3::ZERO, Vec3::ONE]);
        assert_eq!(array.data_type(), AttrType::Float3);
        array.typed_mut::<Vec3>().unwrap()[0] = Vec3::X;
        assert_eq!(array.get(0).and_then(|v| v.get::<Vec3>()), Some(Vec3::X));
        assert!(array.typed_mut::<f32>().is_none());
    }

    #[test]
    fn test_resize_fills_defaults() {
        let mut array = GArray::from_vec(vec![5i32, 6]);
        array.resize(4);
        assert_eq!(array.typed::<i32>(), Some(&[5, 6, 0, 0][..]));
        array.resize(1);
        assert_eq!(array.typed::<i32>(), Some(&[5][..]));

        let mut rotations = GArray::zeroed(AttrType::Quaternion, 0);
        rotations.resize(2);
        assert_eq!(rotations.typed::<Quat>(), Some(&[Quat::IDENTITY; 2][..]));
    }

    #[test]
    fn test_from_bytes() {
        let array = GArray::from_bytes(AttrType::Int32, &[1, 0, 0, 0, 2, 0, 0, 0]).unwrap();
        assert_eq!(array.typed::<i32>(), Some(&[1, 2][..]));
        assert!(GArray::from_bytes(AttrType::Int32, &[1, 0, 0]).is_err());
    }

    #[test]
    fn test_filled_equality() {
        let a = GArray::filled(&GValue::new(2.5f32), 3);
        let b = GArray::from_vec(vec![2.5f32; 3]);
        assert_eq!(a, b);
        assert_ne!(a, GArray::zeroed(AttrType::Float, 3));
    }
}
