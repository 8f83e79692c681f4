//! Utility types and functions for geoattr.
//!
//! This module contains fundamental types used throughout the library:
//! - [`AttrType`] / [`AttrPod`] - Attribute element types
//! - [`AttrDomain`] - Element classes attributes live on
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam

mod attr_type;
mod domain;
mod error;
mod math;

pub use attr_type::*;
pub use domain::*;
pub use error::*;
pub use math::*;

pub(crate) use attr_type::with_attr_type;
