//! Type-erased attribute values and arrays.
//!
//! - [`GValue`] - one value of a runtime-known [`AttrType`](crate::util::AttrType)
//! - [`GArray`] - owned array, aligned for zero-copy typed views
//! - [`GSpan`] / [`GMutSpan`] - borrowed views
//! - [`GVArray`] - read view that may be borrowed, owned or a single value

#[allow(clippy::module_inception)]
mod array;
mod span;
mod value;
mod varray;

pub use array::GArray;
pub use span::{GMutSpan, GSpan};
pub use value::GValue;
pub use varray::GVArray;
