//! Borrowed type-erased views over attribute arrays.

use std::fmt;

use super::GValue;
use crate::util::{AttrPod, AttrType, Error, Result};

/// Read-only view of a contiguous array whose element type is known at runtime.
#[derive(Clone, Copy)]
pub struct GSpan<'a> {
    data_type: AttrType,
    bytes: &'a [u8],
}

impl<'a> GSpan<'a> {
    /// View a typed slice.
    pub fn new<T: AttrPod>(values: &'a [T]) -> Self {
        Self {
            data_type: T::ATTR_TYPE,
            bytes: bytemuck::cast_slice(values),
        }
    }

    #[inline]
    pub(crate) fn from_bytes(data_type: AttrType, bytes: &'a [u8]) -> Self {
        debug_assert_eq!(bytes.len() % data_type.num_bytes(), 0);
        Self { data_type, bytes }
    }

    #[inline]
    pub fn data_type(&self) -> AttrType {
        self.data_type
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / self.data_type.num_bytes()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Reinterpret as a typed slice, `None` on type mismatch.
    pub fn typed<T: AttrPod>(&self) -> Option<&'a [T]> {
        if T::ATTR_TYPE != self.data_type {
            return None;
        }
        bytemuck::try_cast_slice(self.bytes).ok()
    }

    /// Copy out one element.
    pub fn get(&self, index: usize) -> Option<GValue> {
        let size = self.data_type.num_bytes();
        let start = index.checked_mul(size)?;
        let bytes = self.bytes.get(start..start.checked_add(size)?)?;
        GValue::from_bytes(self.data_type, bytes).ok()
    }
}

impl fmt::Debug for GSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.len()).filter_map(|i| self.get(i)))
            .finish()
    }
}

/// Mutable view of a contiguous array whose element type is known at runtime.
pub struct GMutSpan<'a> {
    data_type: AttrType,
    bytes: &'a mut [u8],
}

impl<'a> GMutSpan<'a> {
    /// View a mutable typed slice.
    pub fn new<T: AttrPod>(values: &'a mut [T]) -> Self {
        Self {
            data_type: T::ATTR_TYPE,
            bytes: bytemuck::cast_slice_mut(values),
        }
    }

    #[inline]
    pub(crate) fn from_bytes(data_type: AttrType, bytes: &'a mut [u8]) -> Self {
        debug_assert_eq!(bytes.len() % data_type.num_bytes(), 0);
        Self { data_type, bytes }
    }

    #[inline]
    pub fn data_type(&self) -> AttrType {
        self.data_type
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / self.data_type.num_bytes()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Shorter-lived mutable view of the same data.
    #[inline]
    pub fn reborrow(&mut self) -> GMutSpan<'_> {
        GMutSpan {
            data_type: self.data_type,
            bytes: &mut *self.bytes,
        }
    }

    #[inline]
    pub fn as_span(&self) -> GSpan<'_> {
        GSpan::from_bytes(self.data_type, &*self.bytes)
    }

    /// Consume into a typed mutable slice, `None` on type mismatch.
    pub fn into_typed<T: AttrPod>(self) -> Option<&'a mut [T]> {
        if T::ATTR_TYPE != self.data_type {
            return None;
        }
        bytemuck::try_cast_slice_mut(self.bytes).ok()
    }

    /// Reinterpret as a typed mutable slice, `None` on type mismatch.
    pub fn typed_mut<T: AttrPod>(&mut self) -> Option<&mut [T]> {
        self.reborrow().into_typed()
    }

    /// Overwrite one element.
    pub fn set(&mut self, index: usize, value: &GValue) -> Result<()> {
        self.check_type(value.data_type())?;
        let size = self.data_type.num_bytes();
        let len = self.len();
        let dst = index
            .checked_mul(size)
            .and_then(|start| Some(start..start.checked_add(size)?))
            .and_then(|range| self.bytes.get_mut(range))
            .ok_or(Error::LengthMismatch {
                expected: index.saturating_add(1),
                actual: len,
            })?;
        dst.copy_from_slice(value.as_bytes());
        Ok(())
    }

    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: &GValue) -> Result<()> {
        self.check_type(value.data_type())?;
        fill_bytes(&mut *self.bytes, value.as_bytes());
        Ok(())
    }

    /// Copy all elements from a span of the same type and length.
    pub fn copy_from(&mut self, src: GSpan<'_>) -> Result<()> {
        self.check_type(src.data_type())?;
        if src.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: src.len(),
            });
        }
        self.bytes.copy_from_slice(src.as_bytes());
        Ok(())
    }

    fn check_type(&self, actual: AttrType) -> Result<()> {
        if actual != self.data_type {
            return Err(Error::TypeMismatch {
                expected: self.data_type,
                actual,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for GMutSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_span(), f)
    }
}

/// Repeat `pattern` over `dst`; `dst.len()` must be a multiple of the pattern size.
pub(crate) fn fill_bytes(dst: &mut [u8], pattern: &[u8]) {
    for chunk in dst.chunks_exact_mut(pattern.len()) {
        chunk.copy_from_slice(pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_span_typed_access() {
        let values = [1.0f32, 2.0, 3.0];
        let span = GSpan::new(&values);
        assert_eq!(span.len(), 3);
        assert_eq!(span.data_type(), AttrType::Float);
        assert_eq!(span.typed::<f32>(), Some(&values[..]));
        assert!(span.typed::<i32>().is_none());
        assert_eq!(span.get(1).and_then(|v| v.get::<f32>()), Some(2.0));
        assert!(span.get(3).is_none());
    }

    #[test]
    fn test_mut_span_fill_and_set() {
        let mut values = [Vec3::ZERO; 4];
        {
            let mut span = GMutSpan::new(&mut values);
            span.fill(&GValue::new(Vec3::ONE)).unwrap();
            span.set(2, &GValue::new(Vec3::X)).unwrap();
            assert!(span.set(4, &GValue::new(Vec3::X)).is_err());
            assert!(span.fill(&GValue::new(1.0f32)).is_err());
        }
        assert_eq!(values, [Vec3::ONE, Vec3::ONE, Vec3::X, Vec3::ONE]);
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let mut values = [0.0f32; 2];
        let mut span = GMutSpan::new(&mut values);
        assert!(matches!(
            span.set(usize::MAX, &GValue::new(1.0f32)),
            Err(Error::LengthMismatch { actual: 2, .. })
        ));
        assert!(span.set(usize::MAX / 4, &GValue::new(1.0f32)).is_err());
        assert!(span.as_span().get(usize::MAX).is_none());
        assert!(span.as_span().get(usize::MAX / 4).is_none());
        assert_eq!(values, [0.0; 2]);
    }

    #[test]
    fn test_mut_span_copy_from() {
        let src = [1i32, 2, 3];
        let mut dst = [0i32; 3];
        GMutSpan::new(&mut dst).copy_from(GSpan::new(&src)).unwrap();
        assert_eq!(dst, src);

        let short = [1i32, 2];
        assert!(matches!(
            GMutSpan::new(&mut dst).copy_from(GSpan::new(&short)),
            Err(Error::LengthMismatch { expected: 3, actual: 2 })
        ));
    }
}
