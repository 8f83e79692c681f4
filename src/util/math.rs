//! Math type re-exports and bounding boxes.
//!
//! This module re-exports the `glam` types used as attribute elements and
//! provides the bounding box cached by geometry runtimes.

// Re-export glam types
pub use glam::{IVec2, Mat4, Quat, Vec2, Vec3, Vec4};

use bytemuck::{Pod, Zeroable};
use rayon::prelude::*;
use std::fmt;

/// Point count above which bounds are computed in parallel.
const PARALLEL_BOUNDS_THRESHOLD: usize = 8192;

/// 3D bounding box with single precision.
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BBox3f {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox3f {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create a new bounding box from min and max points.
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a bounding box from a single point.
    #[inline]
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Bounding box of a set of points, `None` when there are no points.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let bounds = if points.len() >= PARALLEL_BOUNDS_THRESHOLD {
            points
                .par_iter()
                .fold(|| Self::EMPTY, |mut b, &p| {
                    b.expand_by_point(p);
                    b
                })
                .reduce(|| Self::EMPTY, |mut a, b| {
                    a.expand_by_box(&b);
                    a
                })
        } else {
            let mut b = Self::EMPTY;
            for &p in points {
                b.expand_by_point(p);
            }
            b
        };
        Some(bounds)
    }

    /// Check if this box is empty (has no volume).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand this box to include another box.
    #[inline]
    pub fn expand_by_box(&mut self, other: &Self) {
        if !other.is_empty() {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
    }

    /// Get the center of the box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (extents) of the box.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for BBox3f {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BBox3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3f({:?} - {:?})", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox3f() {
        let mut b = BBox3f::EMPTY;
        assert!(b.is_empty());

        b.expand_by_point(Vec3::ZERO);
        assert!(!b.is_empty());
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max, Vec3::ZERO);

        b.expand_by_point(Vec3::ONE);
        assert_eq!(b.center(), Vec3::splat(0.5));
        assert_eq!(b.size(), Vec3::ONE);
    }

    #[test]
    fn test_bbox_from_points() {
        assert!(BBox3f::from_points(&[]).is_none());

        let b = BBox3f::from_points(&[Vec3::new(-1.0, 2.0, 0.0), Vec3::new(3.0, -4.0, 1.0)])
            .unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(b.max, Vec3::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_bbox_from_many_points() {
        // Large enough to take the parallel path
        let points: Vec<Vec3> = (0..20_000).map(|i| Vec3::splat(i as f32)).collect();
        let b = BBox3f::from_points(&points).unwrap();
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max, Vec3::splat(19_999.0));
    }
}
