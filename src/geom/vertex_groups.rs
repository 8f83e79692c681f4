//! Vertex groups exposed as point attributes.
//!
//! Weights are stored sparsely per vertex, not as layers, so reads materialize a
//! float array and writes go through a buffered writer.

use smallvec::SmallVec;

use super::Mesh;
use crate::array::{GArray, GSpan, GVArray, GValue};
use crate::attribute::{AttributeIter, AttributeReader, AttributeWriter, WriteBackFn};
use crate::provider::DynamicAttributesProvider;
use crate::util::{AttrDomain, AttrType};

/// Weight of one vertex in one group.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeformWeight {
    /// Index into the mesh's vertex group names
    pub group: u32,
    pub weight: f32,
}

/// All group weights of one vertex.
pub type DeformVert = SmallVec<[DeformWeight; 4]>;

/// Dynamic provider for the vertex groups of a [`Mesh`].
pub(super) struct VertexGroupsAttributeProvider;

impl VertexGroupsAttributeProvider {
    fn group_index(owner: &Mesh, name: &str) -> Option<u32> {
        owner
            .vertex_group_names
            .iter()
            .position(|n| n == name)
            .map(|index| index as u32)
    }

    fn weights<'a>(owner: &Mesh, group: u32) -> GVArray<'a> {
        if owner.deform_verts.is_empty() {
            return GVArray::Single {
                value: GValue::new(0.0f32),
                len: owner.verts_num(),
            };
        }
        let weights: Vec<f32> = owner
            .deform_verts
            .iter()
            .map(|dvert| {
                dvert
                    .iter()
                    .find(|w| w.group == group)
                    .map_or(0.0, |w| w.weight)
            })
            .collect();
        GVArray::Owned(GArray::from_vec(weights))
    }
}

fn store_weights(deform_verts: &mut Vec<DeformVert>, vert_num: usize, group: u32, weights: &[f32]) {
    if deform_verts.is_empty() {
        if weights.iter().all(|&w| w == 0.0) {
            return;
        }
        deform_verts.resize(vert_num, DeformVert::new());
    }
    for (dvert, &weight) in deform_verts.iter_mut().zip(weights) {
        match dvert.iter_mut().find(|w| w.group == group) {
            Some(existing) => existing.weight = weight,
            None if weight != 0.0 => dvert.push(DeformWeight { group, weight }),
            None => {}
        }
    }
}

impl DynamicAttributesProvider<Mesh> for VertexGroupsAttributeProvider {
    fn try_get_for_read<'a>(&self, owner: &'a Mesh, name: &str) -> Option<AttributeReader<'a>> {
        let group = Self::group_index(owner, name)?;
        Some(AttributeReader {
            varray: Self::weights(owner, group),
            domain: AttrDomain::Point,
            sharing_info: None,
        })
    }

    fn try_get_for_write<'a>(&self, owner: &'a mut Mesh, name: &str) -> Option<AttributeWriter<'a>> {
        let group = Self::group_index(owner, name)?;
        let values = Self::weights(owner, group).materialize();
        let tag_modified = owner.runtime.attribute_tag_fn();
        let vert_num = owner.verts_num();
        let deform_verts = &mut owner.deform_verts;
        let write_back: WriteBackFn<'a> = Box::new(move |values: GSpan<'_>| {
            if let Some(weights) = values.typed::<f32>() {
                store_weights(deform_verts, vert_num, group, weights);
            }
        });
        Some(AttributeWriter::buffered(
            values,
            AttrDomain::Point,
            write_back,
            Some(tag_modified),
        ))
    }

    fn try_delete(&self, owner: &mut Mesh, name: &str) -> bool {
        let Some(group) = Self::group_index(owner, name) else {
            return false;
        };
        owner.vertex_group_names.remove(group as usize);
        for dvert in &mut owner.deform_verts {
            dvert.retain(|w| w.group != group);
            for w in dvert.iter_mut().filter(|w| w.group > group) {
                w.group -= 1;
            }
        }
        owner.runtime.tag_attribute_changed();
        true
    }

    fn contains(&self, owner: &Mesh, name: &str) -> bool {
        Self::group_index(owner, name).is_some()
    }

    fn foreach_attribute(&self, owner: &Mesh, f: &mut dyn FnMut(&AttributeIter<'_, Mesh>)) -> bool {
        for name in &owner.vertex_group_names {
            let get = || self.try_get_for_read(owner, name);
            let iter = AttributeIter::new(name, AttrDomain::Point, AttrType::Float, false, owner, &get);
            f(&iter);
            if iter.is_stopped() {
                return false;
            }
        }
        true
    }

    fn foreach_domain(&self, f: &mut dyn FnMut(AttrDomain)) {
        f(AttrDomain::Point);
    }
}
