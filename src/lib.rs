//! # geoattr
//!
//! Generic attribute access for geometry types.
//!
//! Every geometry stores named per-element data on a set of domains (points,
//! edges, faces, corners, curves). A static table of attribute providers per
//! geometry type decides where each attribute lives: builtin providers own
//! fixed names with a fixed domain and type, dynamic providers serve any other
//! name from custom data layers or special storage such as vertex groups.
//!
//! ## Modules
//!
//! - [`util`] - Attribute types, domains, errors and math types
//! - [`array`] - Type-erased values, arrays and spans
//! - [`custom_data`] - Named layer storage
//! - [`attribute`] - Readers, writers and accessors
//! - [`provider`] - Provider traits and registries
//! - [`geom`] - Point clouds, meshes and curves
//!
//! ## Example
//!
//! ```
//! use geoattr::prelude::*;
//!
//! let mut points = PointCloud::new(4);
//! let mut attributes = points.attributes_for_write();
//! assert!(attributes.add("temperature", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed));
//! assert!(!attributes.remove("position"));
//!
//! let temperature = attributes.lookup("temperature").unwrap();
//! assert_eq!(temperature.varray.to_vec::<f32>(), Some(vec![0.0; 4]));
//! ```

pub mod util;
pub mod array;
pub mod custom_data;
pub mod attribute;
pub mod provider;
pub mod geom;

// Re-export commonly used types
pub use util::{AttrDomain, AttrType, Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{AttrDomain, AttrPod, AttrType, Bool, Error, Result};
    pub use crate::array::{GArray, GMutSpan, GSpan, GVArray, GValue};
    pub use crate::attribute::{
        AttributeAccessor, AttributeInit, AttributeReader, AttributeWriter, MutableAttributeAccessor,
    };
    pub use crate::provider::GeometryAttributeOwner;
    pub use crate::geom::*;
}
