//! Geometry types exposing their data through attribute accessors.
//!
//! - [`PointCloud`] - Unstructured points
//! - [`Mesh`] - Polygon meshes with vertex groups
//! - [`Curves`] - Poly, Bezier, Catmull-Rom and NURBS curves
//!
//! Each type keeps its caches in a shared [`GeometryRuntime`] that attribute
//! writers notify when they finish.

mod curves;
mod mesh;
mod points;
mod runtime;
mod vertex_groups;

pub use curves::{CurveType, Curves, DEFAULT_CURVE_RADIUS, DEFAULT_NURBS_ORDER, DEFAULT_RESOLUTION};
pub use mesh::Mesh;
pub use points::{PointCloud, DEFAULT_POINT_RADIUS};
pub use runtime::GeometryRuntime;
pub use vertex_groups::{DeformVert, DeformWeight};
