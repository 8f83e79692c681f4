//! Attribute handles and the accessor API.
//!
//! - [`AttributeReader`] / [`AttributeWriter`] - views of one attribute's values
//! - [`AttributeInit`] - fill policy for new attributes
//! - [`AttributeValidator`] - normalization attached to builtin attributes
//! - [`AttributeIter`] - record passed to enumeration callbacks
//! - [`AttributeAccessor`] / [`MutableAttributeAccessor`] - per-geometry API

mod accessor;
mod init;
mod iter;
mod reader;
mod validator;

pub use accessor::{AttributeAccessor, AttributeDomainAndType, MutableAttributeAccessor};
pub use init::AttributeInit;
pub use iter::AttributeIter;
pub use reader::{AttributeReader, AttributeWriter, TagModifiedFn, WriteBackFn};
pub use validator::AttributeValidator;
