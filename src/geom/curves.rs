//! Curves geometry.
//!
//! A set of curves sharing one point domain. Each curve owns a contiguous range
//! of points given by the curve offsets.

use std::fmt;
use std::ops::Range;
use std::sync::{Arc, OnceLock};

use glam::Vec3;

use super::GeometryRuntime;
use crate::array::GArray;
use crate::attribute::{AttributeAccessor, AttributeValidator, MutableAttributeAccessor, TagModifiedFn};
use crate::custom_data::{CustomData, CustomDataType};
use crate::provider::{
    accessor_functions_for_providers, AttributeAccessorFunctions, BuiltinAttributeInfo,
    BuiltinAttributeProvider, BuiltinCustomDataLayerProvider, CustomDataAccess,
    CustomDataAttributeProvider, Deletability, GeometryAttributeOwner, GeometryAttributeProviders,
    UpdateOnChange,
};
use crate::util::{AttrDomain, AttrType, BBox3f, Bool};

/// Default radius of new control points.
pub const DEFAULT_CURVE_RADIUS: f32 = 0.01;
/// Default evaluated segments per control point.
pub const DEFAULT_RESOLUTION: i32 = 12;
/// Default NURBS order.
pub const DEFAULT_NURBS_ORDER: i8 = 4;

/// Curve type stored in the `curve_type` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum CurveType {
    #[default]
    CatmullRom = 0,
    Poly = 1,
    Bezier = 2,
    Nurbs = 3,
}

impl CurveType {
    pub const MAX: i8 = CurveType::Nurbs as i8;

    /// Convert from the stored value. Out-of-range values become Catmull-Rom.
    pub fn from_i8(val: i8) -> Self {
        match val {
            1 => CurveType::Poly,
            2 => CurveType::Bezier,
            3 => CurveType::Nurbs,
            _ => CurveType::CatmullRom,
        }
    }

    #[inline]
    pub fn to_i8(self) -> i8 {
        self as i8
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveType::CatmullRom => write!(f, "CatmullRom"),
            CurveType::Poly => write!(f, "Poly"),
            CurveType::Bezier => write!(f, "Bezier"),
            CurveType::Nurbs => write!(f, "Nurbs"),
        }
    }
}

/// Set of curves.
#[derive(Debug)]
pub struct Curves {
    point_num: usize,
    curve_num: usize,
    /// Start of each curve's points, plus the total point count
    curve_offsets: Vec<usize>,
    point_data: CustomData,
    curve_data: CustomData,
    runtime: Arc<GeometryRuntime>,
}

impl Curves {
    /// Curves with the given point counts, all points at the origin.
    pub fn from_curve_sizes(sizes: &[usize]) -> Self {
        let mut curve_offsets = Vec::with_capacity(sizes.len() + 1);
        curve_offsets.push(0);
        for &size in sizes {
            curve_offsets.push(curve_offsets[curve_offsets.len() - 1] + size);
        }
        let point_num = curve_offsets[sizes.len()];
        let mut point_data = CustomData::new();
        point_data.push_layer(
            CustomDataType::PropFloat3,
            "position",
            Arc::new(GArray::zeroed(AttrType::Float3, point_num)),
        );
        Self {
            point_num,
            curve_num: sizes.len(),
            curve_offsets,
            point_data,
            curve_data: CustomData::new(),
            runtime: GeometryRuntime::new(),
        }
    }

    #[inline]
    pub fn points_num(&self) -> usize {
        self.point_num
    }

    #[inline]
    pub fn curves_num(&self) -> usize {
        self.curve_num
    }

    pub fn offsets(&self) -> &[usize] {
        &self.curve_offsets
    }

    /// Point indices of a curve.
    pub fn points_by_curve(&self, curve: usize) -> Range<usize> {
        self.curve_offsets[curve]..self.curve_offsets[curve + 1]
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
        self.point_data
            .named_layer_mut(CustomDataType::PropFloat3, "position")
            .and_then(|layer| layer.typed_mut())
            .unwrap_or_default()
    }

    /// Type of every curve; Catmull-Rom when the attribute does not exist.
    pub fn curve_types(&self) -> Vec<CurveType> {
        match self
            .curve_data
            .named_layer(CustomDataType::PropInt8, "curve_type")
            .and_then(|layer| layer.typed::<i8>())
        {
            Some(types) => types.iter().map(|&t| CurveType::from_i8(t)).collect(),
            None => vec![CurveType::default(); self.curve_num],
        }
    }

    /// Whether each curve is closed; all open when the attribute does not exist.
    pub fn cyclic(&self) -> Vec<bool> {
        match self
            .curve_data
            .named_layer(CustomDataType::PropBool, "cyclic")
            .and_then(|layer| layer.typed::<Bool>())
        {
            Some(values) => values.iter().map(|v| v.get()).collect(),
            None => vec![false; self.curve_num],
        }
    }

    /// Change the number of points of the last curve. New points get default values.
    pub fn resize_points(&mut self, point_num: usize) {
        let last_start = match self.curve_num {
            0 => return,
            n => self.curve_offsets[n - 1],
        };
        let point_num = point_num.max(last_start);
        self.point_num = point_num;
        self.curve_offsets[self.curve_num] = point_num;
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

    pub fn attributes(&self) -> AttributeAccessor<'_, Self> {
        AttributeAccessor::new(self, &CURVES_FUNCTIONS)
    }

    pub fn attributes_for_write(&mut self) -> MutableAttributeAccessor<'_, Self> {
        MutableAttributeAccessor::new(self, &CURVES_FUNCTIONS)
    }
}

impl Clone for Curves {
    fn clone(&self) -> Self {
        Self {
            point_num: self.point_num,
            curve_num: self.curve_num,
            curve_offsets: self.curve_offsets.clone(),
            point_data: self.point_data.clone(),
            curve_data: self.curve_data.clone(),
            runtime: self.runtime.duplicate(),
        }
    }
}

// ============================================================================
// Attribute providers
// ============================================================================

struct CurvesDomainAccess(AttrDomain);

impl CustomDataAccess<Curves> for CurvesDomainAccess {
    fn custom_data<'a>(&self, owner: &'a mut Curves) -> Option<&'a mut CustomData> {
        match self.0 {
            AttrDomain::Point => Some(&mut owner.point_data),
            AttrDomain::Curve => Some(&mut owner.curve_data),
            _ => None,
        }
    }

    fn const_custom_data<'a>(&self, owner: &'a Curves) -> Option<&'a CustomData> {
        match self.0 {
            AttrDomain::Point => Some(&owner.point_data),
            AttrDomain::Curve => Some(&owner.curve_data),
            _ => None,
        }
    }

    fn element_num(&self, owner: &Curves) -> usize {
        owner.domain_size(self.0)
    }

    fn tag_modified_function(&self, owner: &Curves, _name: &str) -> Option<TagModifiedFn> {
        Some(owner.runtime.attribute_tag_fn())
    }
}

static POINT_ACCESS: CurvesDomainAccess = CurvesDomainAccess(AttrDomain::Point);
static CURVE_ACCESS: CurvesDomainAccess = CurvesDomainAccess(AttrDomain::Curve);

fn tag_positions_changed(owner: &Curves) -> TagModifiedFn {
    owner.runtime.positions_tag_fn()
}

fn tag_attribute_changed(owner: &Curves) -> TagModifiedFn {
    owner.runtime.attribute_tag_fn()
}

fn layer_provider(
    info: BuiltinAttributeInfo,
    access: &'static CurvesDomainAccess,
    update_on_change: Option<UpdateOnChange<Curves>>,
) -> Box<dyn BuiltinAttributeProvider<Curves>> {
    Box::new(BuiltinCustomDataLayerProvider::new(info, access, update_on_change))
}

fn create_attribute_providers() -> GeometryAttributeProviders<Curves> {
    use AttrDomain::{Curve, Point};
    use Deletability::{Deletable, NonDeletable};

    let position = BuiltinAttributeInfo::new("position", Point, AttrType::Float3, NonDeletable);
    let radius = BuiltinAttributeInfo::new("radius", Point, AttrType::Float, Deletable)
        .with_default_value(DEFAULT_CURVE_RADIUS);
    let tilt = BuiltinAttributeInfo::new("tilt", Point, AttrType::Float, Deletable);
    let id = BuiltinAttributeInfo::new("id", Point, AttrType::Int32, Deletable);
    let curve_type = BuiltinAttributeInfo::new("curve_type", Curve, AttrType::Int8, Deletable)
        .with_validator(AttributeValidator::int8_range::<0, { CurveType::MAX }>());
    let resolution = BuiltinAttributeInfo::new("resolution", Curve, AttrType::Int32, Deletable)
        .with_default_value(DEFAULT_RESOLUTION)
        .with_validator(AttributeValidator::int32_min::<1>());
    let cyclic = BuiltinAttributeInfo::new("cyclic", Curve, AttrType::Bool, Deletable);
    let nurbs_order = BuiltinAttributeInfo::new("nurbs_order", Curve, AttrType::Int8, Deletable)
        .with_default_value(DEFAULT_NURBS_ORDER)
        .with_validator(AttributeValidator::int8_range::<1, { i8::MAX }>());

    GeometryAttributeProviders::new(
        vec![
            layer_provider(position, &POINT_ACCESS, Some(tag_positions_changed)),
            layer_provider(radius, &POINT_ACCESS, Some(tag_attribute_changed)),
            layer_provider(tilt, &POINT_ACCESS, Some(tag_attribute_changed)),
            layer_provider(id, &POINT_ACCESS, None),
            layer_provider(curve_type, &CURVE_ACCESS, Some(tag_attribute_changed)),
            layer_provider(resolution, &CURVE_ACCESS, Some(tag_attribute_changed)),
            layer_provider(cyclic, &CURVE_ACCESS, Some(tag_attribute_changed)),
            layer_provider(nurbs_order, &CURVE_ACCESS, Some(tag_attribute_changed)),
        ],
        vec![
            Box::new(CustomDataAttributeProvider::new(Curve, &CURVE_ACCESS)),
            Box::new(CustomDataAttributeProvider::new(Point, &POINT_ACCESS)),
        ],
    )
}

static CURVES_FUNCTIONS: AttributeAccessorFunctions<Curves> = accessor_functions_for_providers::<Curves>();

impl GeometryAttributeOwner for Curves {
    fn attribute_providers() -> &'static GeometryAttributeProviders<Self> {
        static PROVIDERS: OnceLock<GeometryAttributeProviders<Curves>> = OnceLock::new();
        PROVIDERS.get_or_init(create_attribute_providers)
    }

    fn domain_size(&self, domain: AttrDomain) -> usize {
        match domain {
            AttrDomain::Point => self.point_num,
            AttrDomain::Curve => self.curve_num,
            _ => 0,
        }
    }
}
