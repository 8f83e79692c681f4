//! Point cloud geometry.
//!
//! Stores a single point domain. `position` always exists, `radius` is optional.

use std::sync::{Arc, OnceLock};

use glam::Vec3;

use super::GeometryRuntime;
use crate::array::GArray;
use crate::attribute::{AttributeAccessor, MutableAttributeAccessor, TagModifiedFn};
use crate::custom_data::{CustomData, CustomDataType};
use crate::provider::{
    accessor_functions_for_providers, AttributeAccessorFunctions, BuiltinAttributeInfo,
    BuiltinCustomDataLayerProvider, CustomDataAccess, CustomDataAttributeProvider, Deletability,
    GeometryAttributeOwner, GeometryAttributeProviders,
};
use crate::util::{AttrDomain, AttrType, BBox3f};

/// Default radius of new points.
pub const DEFAULT_POINT_RADIUS: f32 = 0.01;

/// Unstructured set of points.
#[derive(Debug)]
pub struct PointCloud {
    point_num: usize,
    point_data: CustomData,
    runtime: Arc<GeometryRuntime>,
}

impl PointCloud {
    /// Point cloud with `point_num` points at the origin.
    pub fn new(point_num: usize) -> Self {
        let mut points = Self {
            point_num,
            point_data: CustomData::new(),
            runtime: GeometryRuntime::new(),
        };
        points.ensure_positions();
        points
    }

    /// Point cloud from point positions.
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        let mut points = Self::new(positions.len());
        points.positions_mut().copy_from_slice(&positions);
        points
    }

    #[inline]
    pub fn points_num(&self) -> usize {
        self.point_num
    }

    pub fn positions(&self) -> &[Vec3] {
        self.point_data
            .named_layer(CustomDataType::PropFloat3, "position")
            .and_then(|layer| layer.typed())
            .unwrap_or_default()
    }

    /// Mutable positions. Invalidates cached bounds.
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        self.runtime.tag_positions_changed();
        self.ensure_positions();
        self.point_data
            .named_layer_mut(CustomDataType::PropFloat3, "position")
            .and_then(|layer| layer.typed_mut())
            .unwrap_or_default()
    }

    /// Per-point radii, `None` if the attribute was never created.
    pub fn radii(&self) -> Option<&[f32]> {
        self.point_data
            .named_layer(CustomDataType::PropFloat, "radius")?
            .typed()
    }

    /// Change the number of points. New points get default values.
    pub fn resize(&mut self, point_num: usize) {
        self.point_num = point_num;
        self.point_data.realloc(point_num);
        self.runtime.tag_positions_changed();
    }

    pub fn bounds(&self) -> Option<BBox3f> {
        self.runtime.bounds(|| BBox3f::from_points(self.positions()))
    }

    #[inline]
    pub fn runtime(&self) -> &GeometryRuntime {
        &self.runtime
    }

    #[inline]
    pub fn point_data(&self) -> &CustomData {
        &self.point_data
    }

    pub fn attributes(&self) -> AttributeAccessor<'_, Self> {
        AttributeAccessor::new(self, &POINT_CLOUD_FUNCTIONS)
    }

    pub fn attributes_for_write(&mut self) -> MutableAttributeAccessor<'_, Self> {
        MutableAttributeAccessor::new(self, &POINT_CLOUD_FUNCTIONS)
    }

    fn ensure_positions(&mut self) {
        if self
            .point_data
            .named_layer_index_of_type(CustomDataType::PropFloat3, "position")
            .is_none()
        {
            let data = Arc::new(GArray::zeroed(AttrType::Float3, self.point_num));
            self.point_data
                .push_layer(CustomDataType::PropFloat3, "position", data);
        }
    }
}

impl Clone for PointCloud {
    fn clone(&self) -> Self {
        Self {
            point_num: self.point_num,
            point_data: self.point_data.clone(),
            runtime: self.runtime.duplicate(),
        }
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new(0)
    }
}

// ============================================================================
// Attribute providers
// ============================================================================

struct PointAccess;

impl CustomDataAccess<PointCloud> for PointAccess {
    fn custom_data<'a>(&self, owner: &'a mut PointCloud) -> Option<&'a mut CustomData> {
        Some(&mut owner.point_data)
    }

    fn const_custom_data<'a>(&self, owner: &'a PointCloud) -> Option<&'a CustomData> {
        Some(&owner.point_data)
    }

    fn element_num(&self, owner: &PointCloud) -> usize {
        owner.point_num
    }

    fn tag_modified_function(&self, owner: &PointCloud, _name: &str) -> Option<TagModifiedFn> {
        Some(owner.runtime.attribute_tag_fn())
    }
}

static POINT_ACCESS: PointAccess = PointAccess;

fn tag_positions_changed(owner: &PointCloud) -> TagModifiedFn {
    owner.runtime.positions_tag_fn()
}

fn tag_radii_changed(owner: &PointCloud) -> TagModifiedFn {
    owner.runtime.attribute_tag_fn()
}

fn create_attribute_providers() -> GeometryAttributeProviders<PointCloud> {
    let position = BuiltinCustomDataLayerProvider::new(
        BuiltinAttributeInfo::new("position", AttrDomain::Point, AttrType::Float3, Deletability::NonDeletable),
        &POINT_ACCESS,
        Some(tag_positions_changed),
    );
    let radius = BuiltinCustomDataLayerProvider::new(
        BuiltinAttributeInfo::new("radius", AttrDomain::Point, AttrType::Float, Deletability::Deletable)
            .with_default_value(DEFAULT_POINT_RADIUS),
        &POINT_ACCESS,
        Some(tag_radii_changed),
    );
    let point_custom_data = CustomDataAttributeProvider::new(AttrDomain::Point, &POINT_ACCESS);

    GeometryAttributeProviders::new(
        vec![Box::new(position), Box::new(radius)],
        vec![Box::new(point_custom_data)],
    )
}

static POINT_CLOUD_FUNCTIONS: AttributeAccessorFunctions<PointCloud> =
    accessor_functions_for_providers::<PointCloud>();

impl GeometryAttributeOwner for PointCloud {
    fn attribute_providers() -> &'static GeometryAttributeProviders<Self> {
        static PROVIDERS: OnceLock<GeometryAttributeProviders<PointCloud>> = OnceLock::new();
        PROVIDERS.get_or_init(create_attribute_providers)
    }

    fn domain_size(&self, domain: AttrDomain) -> usize {
        match domain {
            AttrDomain::Point => self.point_num,
            _ => 0,
        }
    }
}
