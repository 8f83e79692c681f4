//! Read view that is either borrowed, owned or a single repeated value.

use std::borrow::Cow;
use std::fmt;

use super::{GArray, GSpan, GValue};
use crate::util::{AttrPod, AttrType};

/// Virtual array returned by attribute readers.
///
/// Stored attributes are read as [`GVArray::Span`]; computed attributes either
/// materialize an owned array or repeat a single value.
#[derive(Clone)]
pub enum GVArray<'a> {
    /// Borrowed storage
    Span(GSpan<'a>),
    /// Values computed for this read
    Owned(GArray),
    /// The same value for every element
    Single { value: GValue, len: usize },
}

impl<'a> GVArray<'a> {
    pub fn data_type(&self) -> AttrType {
        match self {
            Self::Span(span) => span.data_type(),
            Self::Owned(array) => array.data_type(),
            Self::Single { value, .. } => value.data_type(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Span(span) => span.len(),
            Self::Owned(array) => array.len(),
            Self::Single { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single { .. })
    }

    /// Copy out one element.
    pub fn get(&self, index: usize) -> Option<GValue> {
        match self {
            Self::Span(span) => span.get(index),
            Self::Owned(array) => array.get(index),
            Self::Single { value, len } => (index < *len).then(|| value.clone()),
        }
    }

    /// Contiguous view when the values are already stored contiguously.
    pub fn as_span(&self) -> Option<GSpan<'_>> {
        match self {
            Self::Span(span) => Some(*span),
            Self::Owned(array) => Some(array.as_span()),
            Self::Single { .. } => None,
        }
    }

    /// Typed contiguous view, `None` on type mismatch or for single values.
    pub fn typed<T: AttrPod>(&self) -> Option<&[T]> {
        match self {
            Self::Span(span) => span.typed(),
            Self::Owned(array) => array.typed(),
            Self::Single { .. } => None,
        }
    }

    /// Copy all values into an owned array.
    pub fn materialize(&self) -> GArray {
        match self {
            Self::Span(span) => GArray::from_span(*span),
            Self::Owned(array) => array.clone(),
            Self::Single { value, len } => GArray::filled(value, *len),
        }
    }

    /// Copy all values into a typed vector, `None` on type mismatch.
    pub fn to_vec<T: AttrPod>(&self) -> Option<Vec<T>> {
        match self {
            Self::Single { value, len } => value.get::<T>().map(|v| vec![v; *len]),
            _ => self.typed::<T>().map(<[T]>::to_vec),
        }
    }

    /// Typed values, borrowed when the view is a span.
    pub fn into_typed<T: AttrPod>(self) -> Option<Cow<'a, [T]>> {
        match self {
            Self::Span(span) => span.typed::<T>().map(Cow::Borrowed),
            other => other.to_vec::<T>().map(Cow::Owned),
        }
    }
}

impl<'a> From<GSpan<'a>> for GVArray<'a> {
    fn from(span: GSpan<'a>) -> Self {
        Self::Span(span)
    }
}

impl From<GArray> for GVArray<'_> {
    fn from(array: GArray) -> Self {
        Self::Owned(array)
    }
}

impl fmt::Debug for GVArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Span(span) => fmt::Debug::fmt(span, f),
            Self::Owned(array) => fmt::Debug::fmt(array, f),
            Self::Single { value, len } => write!(f, "[{:?}; {}]", value, len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_variant() {
        let values = [1i32, 2, 3];
        let varray = GVArray::from(GSpan::new(&values));
        assert_eq!(varray.len(), 3);
        assert_eq!(varray.typed::<i32>(), Some(&values[..]));
        assert_eq!(varray.to_vec::<i32>(), Some(values.to_vec()));
        assert!(matches!(varray.into_typed::<i32>(), Some(Cow::Borrowed(_))));
    }

    #[test]
    fn test_single_variant() {
        let varray = GVArray::Single {
            value: GValue::new(0.5f32),
            len: 3,
        };
        assert!(varray.is_single());
        assert!(varray.as_span().is_none());
        assert_eq!(varray.get(2).and_then(|v| v.get::<f32>()), Some(0.5));
        assert!(varray.get(3).is_none());
        assert_eq!(varray.to_vec::<f32>(), Some(vec![0.5; 3]));
        assert_eq!(varray.materialize().typed::<f32>(), Some(&[0.5f32; 3][..]));
        assert_eq!(varray.into_typed::<f32>().as_deref(), Some(&[0.5f32; 3][..]));
    }
}
