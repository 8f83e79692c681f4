//! Attribute providers and their per-geometry registries.
//!
//! - [`BuiltinAttributeProvider`] / [`DynamicAttributesProvider`] - provider traits
//! - [`CustomDataAttributeProvider`] / [`BuiltinCustomDataLayerProvider`] - layer-backed providers
//! - [`GeometryAttributeProviders`] - registry and dispatch
//! - [`AttributeAccessorFunctions`] - static dispatch table per geometry type

mod custom_data;
mod functions;
mod registry;
mod traits;

pub use custom_data::{BuiltinCustomDataLayerProvider, CustomDataAttributeProvider, UpdateOnChange};
pub use functions::{accessor_functions_for_providers, AttributeAccessorFunctions, GeometryAttributeOwner};
pub use registry::GeometryAttributeProviders;
pub use traits::*;
