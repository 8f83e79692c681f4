//! Polygon mesh geometry.
//!
//! Four domains: points (vertices), edges, faces and face corners. Topology is
//! stored as builtin attributes (`.edge_verts`, `.corner_vert`, `.corner_edge`)
//! next to positions, so it is shared between copies like any other layer.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, OnceLock};

use glam::{IVec2, Vec3};

use super::vertex_groups::{DeformVert, VertexGroupsAttributeProvider};
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
use crate::util::{AttrDomain, AttrType, BBox3f, Bool, Error, Result};

/// Polygon mesh.
#[derive(Debug)]
pub struct Mesh {
    vert_num: usize,
    edge_num: usize,
    face_num: usize,
    corner_num: usize,
    /// Start of each face's corners, plus the total corner count
    face_offsets: Vec<usize>,
    vert_data: CustomData,
    edge_data: CustomData,
    face_data: CustomData,
    corner_data: CustomData,
    pub(super) vertex_group_names: Vec<String>,
    /// Per-vertex group weights; empty until a weight is assigned
    pub(super) deform_verts: Vec<DeformVert>,
    pub(super) runtime: Arc<GeometryRuntime>,
}

impl Mesh {
    /// Build a mesh from vertex positions and faces.
    ///
    /// `face_sizes` gives the corner count of each face and `corner_verts` the
    /// vertex of every corner, face after face. Edges are derived from the faces.
    pub fn from_faces(positions: Vec<Vec3>, face_sizes: &[usize], corner_verts: &[i32]) -> Result<Self> {
        let vert_num = positions.len();
        let corner_num: usize = face_sizes.iter().sum();
        if corner_num != corner_verts.len() {
            return Err(Error::LengthMismatch {
                expected: corner_num,
                actual: corner_verts.len(),
            });
        }
        if face_sizes.iter().any(|&size| size < 3) {
            return Err(Error::other("faces need at least 3 corners"));
        }
        if let Some(&vert) = corner_verts
            .iter()
            .find(|&&v| v < 0 || v as usize >= vert_num)
        {
            return Err(Error::other(format!(
                "corner vertex {} out of range 0..{}",
                vert, vert_num
            )));
        }

        let mut face_offsets = Vec::with_capacity(face_sizes.len() + 1);
        face_offsets.push(0);
        for &size in face_sizes {
            face_offsets.push(face_offsets[face_offsets.len() - 1] + size);
        }

        let mut edge_index: HashMap<(i32, i32), i32> = HashMap::new();
        let mut edge_verts: Vec<IVec2> = Vec::new();
        let mut corner_edges = vec![0i32; corner_num];
        for face in face_offsets.windows(2) {
            let (start, end) = (face[0], face[1]);
            for corner in start..end {
                let next = if corner + 1 == end { start } else { corner + 1 };
                let (a, b) = (corner_verts[corner], corner_verts[next]);
                let key = (a.min(b), a.max(b));
                corner_edges[corner] = *edge_index.entry(key).or_insert_with(|| {
                    edge_verts.push(IVec2::new(key.0, key.1));
                    (edge_verts.len() - 1) as i32
                });
            }
        }

        let mut mesh = Self {
            vert_num,
            edge_num: edge_verts.len(),
            face_num: face_sizes.len(),
            corner_num,
            face_offsets,
            vert_data: CustomData::new(),
            edge_data: CustomData::new(),
            face_data: CustomData::new(),
            corner_data: CustomData::new(),
            vertex_group_names: Vec::new(),
            deform_verts: Vec::new(),
            runtime: GeometryRuntime::new(),
        };
        mesh.vert_data
            .push_layer(CustomDataType::PropFloat3, "position", Arc::new(GArray::from_vec(positions)));
        mesh.edge_data
            .push_layer(CustomDataType::PropInt2, ".edge_verts", Arc::new(GArray::from_vec(edge_verts)));
        mesh.corner_data.push_layer(
            CustomDataType::PropInt32,
            ".corner_vert",
            Arc::new(GArray::from_slice(corner_verts)),
        );
        mesh.corner_data
            .push_layer(CustomDataType::PropInt32, ".corner_edge", Arc::new(GArray::from_vec(corner_edges)));
        Ok(mesh)
    }

    #[inline]
    pub fn verts_num(&self) -> usize {
        self.vert_num
    }

    #[inline]
    pub fn edges_num(&self) -> usize {
        self.edge_num
    }

    #[inline]
    pub fn faces_num(&self) -> usize {
        self.face_num
    }

    #[inline]
    pub fn corners_num(&self) -> usize {
        self.corner_num
    }

    pub fn face_offsets(&self) -> &[usize] {
        &self.face_offsets
    }

    /// Corner indices of a face.
    pub fn face(&self, face: usize) -> Range<usize> {
        self.face_offsets[face]..self.face_offsets[face + 1]
    }

    pub fn positions(&self) -> &[Vec3] {
        self.vert_data
            .named_layer(CustomDataType::PropFloat3, "position")
            .and_then(|layer| layer.typed())
            .unwrap_or_default()
    }

    /// Mutable positions. Invalidates cached bounds.
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        self.runtime.tag_positions_changed();
        self.vert_data
            .named_layer_mut(CustomDataType::PropFloat3, "position")
            .and_then(|layer| layer.typed_mut())
            .unwrap_or_default()
    }

    /// Vertex pair of every edge.
    pub fn edges(&self) -> &[IVec2] {
        self.edge_data
            .named_layer(CustomDataType::PropInt2, ".edge_verts")
            .and_then(|layer| layer.typed())
            .unwrap_or_default()
    }

    pub fn corner_verts(&self) -> &[i32] {
        self.corner_data
            .named_layer(CustomDataType::PropInt32, ".corner_vert")
            .and_then(|layer| layer.typed())
            .unwrap_or_default()
    }

    pub fn corner_edges(&self) -> &[i32] {
        self.corner_data
            .named_layer(CustomDataType::PropInt32, ".corner_edge")
            .and_then(|layer| layer.typed())
            .unwrap_or_default()
    }

    pub fn material_indices(&self) -> Option<&[i32]> {
        self.face_data
            .named_layer(CustomDataType::PropInt32, "material_index")?
            .typed()
    }

    pub fn sharp_faces(&self) -> Option<&[Bool]> {
        self.face_data
            .named_layer(CustomDataType::PropBool, "sharp_face")?
            .typed()
    }

    /// Change the number of vertices. New vertices get default values.
    ///
    /// Fails if a face still uses a removed vertex.
    pub fn resize_verts(&mut self, vert_num: usize) -> Result<()> {
        if let Some(&vert) = self.corner_verts().iter().find(|&&v| v as usize >= vert_num) {
            return Err(Error::other(format!("vertex {} is still used by a face", vert)));
        }
        self.vert_num = vert_num;
        self.vert_data.realloc(vert_num);
        if !self.deform_verts.is_empty() {
            self.deform_verts.resize(vert_num, DeformVert::new());
        }
        self.runtime.tag_positions_changed();
        Ok(())
    }

    pub fn bounds(&self) -> Option<BBox3f> {
        self.runtime.bounds(|| BBox3f::from_points(self.positions()))
    }

    #[inline]
    pub fn runtime(&self) -> &GeometryRuntime {
        &self.runtime
    }

    // === Vertex groups ===

    pub fn vertex_group_names(&self) -> &[String] {
        &self.vertex_group_names
    }

    /// Add an empty vertex group, exposed as a point float attribute.
    pub fn add_vertex_group(&mut self, name: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::other("vertex group name must not be empty"));
        }
        if self.attributes().contains(name) {
            return Err(Error::LayerExists(name.to_string()));
        }
        self.vertex_group_names.push(name.to_string());
        Ok(self.vertex_group_names.len() - 1)
    }

    pub fn deform_verts(&self) -> &[DeformVert] {
        &self.deform_verts
    }

    // === Attributes ===

    pub fn attributes(&self) -> AttributeAccessor<'_, Self> {
        AttributeAccessor::new(self, &MESH_FUNCTIONS)
    }

    pub fn attributes_for_write(&mut self) -> MutableAttributeAccessor<'_, Self> {
        MutableAttributeAccessor::new(self, &MESH_FUNCTIONS)
    }
}

impl Clone for Mesh {
    fn clone(&self) -> Self {
        Self {
            vert_num: self.vert_num,
            edge_num: self.edge_num,
            face_num: self.face_num,
            corner_num: self.corner_num,
            face_offsets: self.face_offsets.clone(),
            vert_data: self.vert_data.clone(),
            edge_data: self.edge_data.clone(),
            face_data: self.face_data.clone(),
            corner_data: self.corner_data.clone(),
            vertex_group_names: self.vertex_group_names.clone(),
            deform_verts: self.deform_verts.clone(),
            runtime: self.runtime.duplicate(),
        }
    }
}

// ============================================================================
// Attribute providers
// ============================================================================

struct MeshDomainAccess(AttrDomain);

impl CustomDataAccess<Mesh> for MeshDomainAccess {
    fn custom_data<'a>(&self, owner: &'a mut Mesh) -> Option<&'a mut CustomData> {
        match self.0 {
            AttrDomain::Point => Some(&mut owner.vert_data),
            AttrDomain::Edge => Some(&mut owner.edge_data),
            AttrDomain::Face => Some(&mut owner.face_data),
            AttrDomain::Corner => Some(&mut owner.corner_data),
            _ => None,
        }
    }

    fn const_custom_data<'a>(&self, owner: &'a Mesh) -> Option<&'a CustomData> {
        match self.0 {
            AttrDomain::Point => Some(&owner.vert_data),
            AttrDomain::Edge => Some(&owner.edge_data),
            AttrDomain::Face => Some(&owner.face_data),
            AttrDomain::Corner => Some(&owner.corner_data),
            _ => None,
        }
    }

    fn element_num(&self, owner: &Mesh) -> usize {
        owner.domain_size(self.0)
    }

    fn tag_modified_function(&self, owner: &Mesh, _name: &str) -> Option<TagModifiedFn> {
        Some(owner.runtime.attribute_tag_fn())
    }
}

static VERT_ACCESS: MeshDomainAccess = MeshDomainAccess(AttrDomain::Point);
static EDGE_ACCESS: MeshDomainAccess = MeshDomainAccess(AttrDomain::Edge);
static FACE_ACCESS: MeshDomainAccess = MeshDomainAccess(AttrDomain::Face);
static CORNER_ACCESS: MeshDomainAccess = MeshDomainAccess(AttrDomain::Corner);

fn tag_positions_changed(owner: &Mesh) -> TagModifiedFn {
    owner.runtime.positions_tag_fn()
}

fn tag_attribute_changed(owner: &Mesh) -> TagModifiedFn {
    owner.runtime.attribute_tag_fn()
}

fn layer_provider(
    info: BuiltinAttributeInfo,
    access: &'static MeshDomainAccess,
    update_on_change: Option<UpdateOnChange<Mesh>>,
) -> Box<dyn BuiltinAttributeProvider<Mesh>> {
    Box::new(BuiltinCustomDataLayerProvider::new(info, access, update_on_change))
}

fn create_attribute_providers() -> GeometryAttributeProviders<Mesh> {
    use AttrDomain::{Corner, Edge, Face, Point};
    use Deletability::{Deletable, NonDeletable};

    let position = BuiltinAttributeInfo::new("position", Point, AttrType::Float3, NonDeletable);
    let edge_verts = BuiltinAttributeInfo::new(".edge_verts", Edge, AttrType::Int2, NonDeletable);
    let corner_vert = BuiltinAttributeInfo::new(".corner_vert", Corner, AttrType::Int32, NonDeletable);
    let corner_edge = BuiltinAttributeInfo::new(".corner_edge", Corner, AttrType::Int32, NonDeletable);
    let id = BuiltinAttributeInfo::new("id", Point, AttrType::Int32, Deletable);
    let material_index = BuiltinAttributeInfo::new("material_index", Face, AttrType::Int32, Deletable)
        .with_validator(AttributeValidator::int32_min::<0>());
    let sharp_face = BuiltinAttributeInfo::new("sharp_face", Face, AttrType::Bool, Deletable);
    let sharp_edge = BuiltinAttributeInfo::new("sharp_edge", Edge, AttrType::Bool, Deletable);

    GeometryAttributeProviders::new(
        vec![
            layer_provider(position, &VERT_ACCESS, Some(tag_positions_changed)),
            layer_provider(edge_verts, &EDGE_ACCESS, Some(tag_attribute_changed)),
            layer_provider(corner_vert, &CORNER_ACCESS, Some(tag_attribute_changed)),
            layer_provider(corner_edge, &CORNER_ACCESS, Some(tag_attribute_changed)),
            layer_provider(id, &VERT_ACCESS, None),
            layer_provider(material_index, &FACE_ACCESS, None),
            layer_provider(sharp_face, &FACE_ACCESS, Some(tag_attribute_changed)),
            layer_provider(sharp_edge, &EDGE_ACCESS, Some(tag_attribute_changed)),
        ],
        vec![
            Box::new(CustomDataAttributeProvider::new(Corner, &CORNER_ACCESS)),
            Box::new(VertexGroupsAttributeProvider),
            Box::new(CustomDataAttributeProvider::new(Point, &VERT_ACCESS)),
            Box::new(CustomDataAttributeProvider::new(Edge, &EDGE_ACCESS)),
            Box::new(CustomDataAttributeProvider::new(Face, &FACE_ACCESS)),
        ],
    )
}

static MESH_FUNCTIONS: AttributeAccessorFunctions<Mesh> = accessor_functions_for_providers::<Mesh>();

impl GeometryAttributeOwner for Mesh {
    fn attribute_providers() -> &'static GeometryAttributeProviders<Self> {
        static PROVIDERS: OnceLock<GeometryAttributeProviders<Mesh>> = OnceLock::new();
        PROVIDERS.get_or_init(create_attribute_providers)
    }

    fn domain_size(&self, domain: AttrDomain) -> usize {
        match domain {
            AttrDomain::Point => self.vert_num,
            AttrDomain::Edge => self.edge_num,
            AttrDomain::Face => self.face_num,
            AttrDomain::Corner => self.corner_num,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeInit;

    /// Two triangles sharing an edge.
    fn quad() -> Mesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        Mesh::from_faces(positions, &[3, 3], &[0, 1, 2, 0, 2, 3]).unwrap()
    }

    #[test]
    fn test_topology() {
        let mesh = quad();
        assert_eq!(mesh.verts_num(), 4);
        assert_eq!(mesh.faces_num(), 2);
        assert_eq!(mesh.corners_num(), 6);
        assert_eq!(mesh.edges_num(), 5);
        assert_eq!(mesh.face(1), 3..6);
        assert_eq!(mesh.corner_edges().len(), 6);
        // Diagonal 0-2 is shared by both faces.
        let diagonal = mesh.corner_edges()[2];
        assert_eq!(mesh.edges()[diagonal as usize], IVec2::new(0, 2));
        assert_eq!(mesh.corner_edges()[3], diagonal);
    }

    #[test]
    fn test_from_faces_validation() {
        let positions = vec![Vec3::ZERO; 3];
        assert!(matches!(
            Mesh::from_faces(positions.clone(), &[3], &[0, 1]),
            Err(Error::LengthMismatch { expected: 3, actual: 2 })
        ));
        assert!(Mesh::from_faces(positions.clone(), &[3], &[0, 1, 5]).is_err());
        assert!(Mesh::from_faces(positions, &[2], &[0, 1]).is_err());
    }

    #[test]
    fn test_domain_sizes() {
        let mesh = quad();
        let attributes = mesh.attributes();
        assert_eq!(attributes.domain_size(AttrDomain::Edge), 5);
        assert_eq!(attributes.domain_size(AttrDomain::Corner), 6);
        assert!(attributes.domain_supported(AttrDomain::Face));
        assert!(!attributes.domain_supported(AttrDomain::Curve));
    }

    #[test]
    fn test_topology_not_deletable() {
        let mut mesh = quad();
        let mut attributes = mesh.attributes_for_write();
        for name in ["position", ".edge_verts", ".corner_vert", ".corner_edge"] {
            assert!(!attributes.remove(name), "{}", name);
        }
        assert!(attributes.contains(".corner_vert"));
    }

    #[test]
    fn test_material_index_validated() {
        let mut mesh = quad();
        let mut attributes = mesh.attributes_for_write();
        let mut writer = attributes
            .lookup_or_add_for_write("material_index", AttrDomain::Face, AttrType::Int32, AttributeInit::Zeroed)
            .unwrap();
        writer.typed_mut::<i32>().unwrap().copy_from_slice(&[-4, 2]);
        writer.finish();
        assert_eq!(mesh.material_indices(), Some(&[0, 2][..]));
    }

    #[test]
    fn test_builtin_writes_tag_runtime() {
        let mut mesh = quad();
        {
            let mut attributes = mesh.attributes_for_write();
            assert!(attributes.add("material_index", AttrDomain::Face, AttrType::Int32, AttributeInit::Zeroed));
            assert!(attributes.add("id", AttrDomain::Point, AttrType::Int32, AttributeInit::Zeroed));
        }
        for name in ["material_index", "id"] {
            mesh.runtime().clear_batch_dirty();
            let before = mesh.runtime().change_count();
            let mut attributes = mesh.attributes_for_write();
            let mut writer = attributes.lookup_for_write(name).unwrap();
            writer.typed_mut::<i32>().unwrap()[0] = 1;
            writer.finish();
            assert_eq!(mesh.runtime().change_count(), before + 1, "{}", name);
            assert!(mesh.runtime().is_batch_dirty(), "{}", name);
        }
        let before = mesh.runtime().change_count();
        assert!(mesh.attributes_for_write().remove("id"));
        assert_eq!(mesh.runtime().change_count(), before + 1);
    }

    #[test]
    fn test_dynamic_attribute_per_domain() {
        let mut mesh = quad();
        let mut attributes = mesh.attributes_for_write();
        assert!(attributes.add("uv", AttrDomain::Corner, AttrType::Float2, AttributeInit::Zeroed));
        assert!(attributes.add("crease", AttrDomain::Edge, AttrType::Float, AttributeInit::Zeroed));
        assert!(!attributes.add("uv", AttrDomain::Point, AttrType::Float2, AttributeInit::Zeroed));
        assert!(!attributes.add("ghost", AttrDomain::Curve, AttrType::Float, AttributeInit::Zeroed));
        let uv = attributes.lookup("uv").unwrap();
        assert_eq!(uv.domain, AttrDomain::Corner);
        assert_eq!(uv.len(), 6);
    }

    #[test]
    fn test_clone_shares_topology() {
        let mesh = quad();
        let copy = mesh.clone();
        let original = mesh.attributes().lookup(".corner_vert").unwrap();
        let copied = copy.attributes().lookup(".corner_vert").unwrap();
        assert!(Arc::ptr_eq(original.sharing_info.unwrap(), copied.sharing_info.unwrap()));
    }

    #[test]
    fn test_resize_verts() {
        let mut mesh = quad();
        assert!(mesh.resize_verts(2).is_err());
        mesh.resize_verts(6).unwrap();
        assert_eq!(mesh.positions().len(), 6);
        assert_eq!(mesh.attributes().domain_size(AttrDomain::Point), 6);
    }
}
