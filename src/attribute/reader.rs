//! Read and write handles returned by attribute lookups.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use super::AttributeValidator;
use crate::array::{GArray, GMutSpan, GSpan, GVArray};
use crate::util::{AttrDomain, AttrPod, AttrType};

/// Change notifier run once after values were written.
pub type TagModifiedFn = Box<dyn FnOnce() + Send>;

/// Read view of one attribute.
#[derive(Clone)]
pub struct AttributeReader<'a> {
    pub varray: GVArray<'a>,
    pub domain: AttrDomain,
    /// Shared storage the values live in, when they are stored
    pub sharing_info: Option<&'a Arc<GArray>>,
}

impl<'a> AttributeReader<'a> {
    #[inline]
    pub fn data_type(&self) -> AttrType {
        self.varray.data_type()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.varray.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.varray.is_empty()
    }

    /// Typed values, borrowed from storage when possible. `None` on type mismatch.
    pub fn into_typed<T: AttrPod>(self) -> Option<Cow<'a, [T]>> {
        self.varray.into_typed()
    }
}

impl fmt::Debug for AttributeReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeReader")
            .field("domain", &self.domain)
            .field("varray", &self.varray)
            .field("shared", &self.sharing_info.is_some())
            .finish()
    }
}

/// Stores values of a buffered writer back into the owner.
pub type WriteBackFn<'a> = Box<dyn FnOnce(GSpan<'_>) + 'a>;

enum WriterData<'a> {
    /// Values written in place
    Span(GMutSpan<'a>),
    /// Values written to a copy, stored back on finish
    Buffered {
        array: GArray,
        write_back: Option<WriteBackFn<'a>>,
    },
}

/// Write view of one attribute.
///
/// The writer finishes exactly once, on [`finish`](Self::finish) or on drop:
/// an attached validator normalizes the values, buffered values are stored
/// back, then the change notifier runs.
pub struct AttributeWriter<'a> {
    data: WriterData<'a>,
    pub domain: AttrDomain,
    tag_modified: Option<TagModifiedFn>,
    validator: Option<AttributeValidator>,
}

impl<'a> AttributeWriter<'a> {
    /// Writer over stored values.
    pub fn new(span: GMutSpan<'a>, domain: AttrDomain, tag_modified: Option<TagModifiedFn>) -> Self {
        Self {
            data: WriterData::Span(span),
            domain,
            tag_modified,
            validator: None,
        }
    }

    /// Writer over a copy of values that are not stored contiguously.
    pub fn buffered(
        array: GArray,
        domain: AttrDomain,
        write_back: WriteBackFn<'a>,
        tag_modified: Option<TagModifiedFn>,
    ) -> Self {
        Self {
            data: WriterData::Buffered {
                array,
                write_back: Some(write_back),
            },
            domain,
            tag_modified,
            validator: None,
        }
    }

    /// Attach a validator applied when the writer finishes.
    pub fn with_validator(mut self, validator: Option<AttributeValidator>) -> Self {
        self.validator = validator;
        self
    }

    #[inline]
    pub fn data_type(&self) -> AttrType {
        self.as_span().data_type()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_span().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_span().is_empty()
    }

    /// Whether writes go to a copy that is stored back on finish.
    #[inline]
    pub fn is_buffered(&self) -> bool {
        matches!(self.data, WriterData::Buffered { .. })
    }

    /// Current values.
    pub fn as_span(&self) -> GSpan<'_> {
        match &self.data {
            WriterData::Span(span) => span.as_span(),
            WriterData::Buffered { array, .. } => array.as_span(),
        }
    }

    /// Mutable view of the values.
    pub fn span(&mut self) -> GMutSpan<'_> {
        match &mut self.data {
            WriterData::Span(span) => span.reborrow(),
            WriterData::Buffered { array, .. } => array.as_mut_span(),
        }
    }

    /// Typed mutable values, `None` on type mismatch.
    pub fn typed_mut<T: AttrPod>(&mut self) -> Option<&mut [T]> {
        self.span().into_typed()
    }

    /// Validate the values and notify the owner.
    pub fn finish(mut self) {
        self.finish_impl();
    }

    fn finish_impl(&mut self) {
        if let Some(validator) = self.validator.take() {
            let data_type = self.data_type();
            if !validator.validate(self.span()) {
                warn!(
                    "{} values on {} still invalid after normalization",
                    data_type, self.domain
                );
            }
        }
        if let WriterData::Buffered { array, write_back } = &mut self.data {
            if let Some(write_back) = write_back.take() {
                write_back(array.as_span());
            }
        }
        if let Some(tag_modified) = self.tag_modified.take() {
            tag_modified();
        }
    }
}

impl Drop for AttributeWriter<'_> {
    fn drop(&mut self) {
        self.finish_impl();
    }
}

impl fmt::Debug for AttributeWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeWriter")
            .field("domain", &self.domain)
            .field("values", &self.as_span())
            .field("buffered", &self.is_buffered())
            .finish()
    }
}
