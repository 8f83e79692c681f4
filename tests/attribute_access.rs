//! Integration tests for the attribute accessor API on the bundled geometries.

use std::collections::HashSet;
use std::sync::Arc;

use geoattr::prelude::*;
use geoattr::util::{Vec3, IVec2};

fn four_points() -> PointCloud {
    PointCloud::from_positions(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z])
}

#[test]
fn test_point_cloud_scenario() {
    let mut points = four_points();
    let mut attributes = points.attributes_for_write();

    // Builtin that already exists
    assert!(!attributes.add("position", AttrDomain::Point, AttrType::Float3, AttributeInit::DefaultValue));

    assert!(attributes.add("temperature", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed));
    let temperature = attributes.lookup("temperature").expect("temperature exists");
    assert_eq!(temperature.domain, AttrDomain::Point);
    assert_eq!(temperature.varray.to_vec::<f32>(), Some(vec![0.0; 4]));

    assert!(!attributes.remove("position"));
    assert!(attributes.contains("position"));

    assert!(attributes.remove("temperature"));
    assert!(!attributes.contains("temperature"));
    assert!(attributes.lookup("temperature").is_none());
}

#[test]
fn test_builtin_name_never_falls_through() {
    let mut points = four_points();
    let mut attributes = points.attributes_for_write();

    // `radius` is a builtin Float; a mismatching request must not create a custom layer.
    assert!(!attributes.add("radius", AttrDomain::Point, AttrType::Int32, AttributeInit::Zeroed));
    assert!(!attributes.contains("radius"));
    assert!(attributes.lookup_for_write("radius").is_none());
    assert!(!attributes.remove("radius"));

    assert!(attributes.add("radius", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed));
    let meta = attributes.lookup_meta_data("radius").unwrap();
    assert_eq!((meta.domain, meta.data_type), (AttrDomain::Point, AttrType::Float));
    assert!(attributes.as_const().is_builtin("radius"));
}

#[test]
fn test_add_initializers() {
    let mut points = four_points();
    let mut attributes = points.attributes_for_write();

    assert!(attributes.add("a", AttrDomain::Point, AttrType::Int32, AttributeInit::DefaultValue));
    assert!(attributes.add("b", AttrDomain::Point, AttrType::Float, AttributeInit::Value(GValue::new(1.5f32))));
    let src = [1.0f32, 2.0, 3.0, 4.0];
    assert!(attributes.add("c", AttrDomain::Point, AttrType::Float, AttributeInit::Copy(GSpan::new(&src))));
    let moved = GArray::from_vec(vec![IVec2::new(1, 2); 4]);
    assert!(attributes.add("d", AttrDomain::Point, AttrType::Int2, AttributeInit::Move(moved)));
    let shared = Arc::new(GArray::from_vec(vec![Bool::new(true); 4]));
    assert!(attributes.add("e", AttrDomain::Point, AttrType::Bool, AttributeInit::Shared(Arc::clone(&shared))));

    let accessor = attributes.as_const();
    assert_eq!(accessor.lookup_typed::<i32>("a").as_deref(), Some(&[0; 4][..]));
    assert_eq!(accessor.lookup_typed::<f32>("b").as_deref(), Some(&[1.5; 4][..]));
    assert_eq!(accessor.lookup_typed::<f32>("c").as_deref(), Some(&src[..]));
    assert_eq!(accessor.lookup_typed::<IVec2>("d").as_deref(), Some(&[IVec2::new(1, 2); 4][..]));

    let e = accessor.lookup("e").unwrap();
    assert!(Arc::ptr_eq(e.sharing_info.unwrap(), &shared));
}

#[test]
fn test_add_rejects_wrong_length_or_type() {
    let mut points = four_points();
    let mut attributes = points.attributes_for_write();
    let short = [1.0f32, 2.0];
    assert!(!attributes.add("short", AttrDomain::Point, AttrType::Float, AttributeInit::Copy(GSpan::new(&short))));
    assert!(!attributes.add("typed", AttrDomain::Point, AttrType::Int32, AttributeInit::Value(GValue::new(1.0f32))));
    assert!(!attributes.add("face", AttrDomain::Face, AttrType::Float, AttributeInit::Zeroed));
    assert!(!attributes.contains("short"));
    assert!(!attributes.contains("typed"));
    assert!(!attributes.contains("face"));
}

#[test]
fn test_empty_name_rejected() {
    let mut points = PointCloud::from_positions(vec![Vec3::ZERO, Vec3::X]);
    let mut attributes = points.attributes_for_write();
    assert!(!attributes.add("", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed));
    assert!(attributes.lookup("").is_none());
    assert!(!attributes.contains(""));

    assert!(attributes.add("heat", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed));
    assert!(!attributes.rename("heat", ""));
    assert!(attributes.contains("heat"));
    assert_eq!(attributes.all_names(), vec!["position", "heat"]);
    assert!(attributes
        .lookup_or_add_for_write("", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed)
        .is_none());
}

#[test]
fn test_remove_twice() {
    let mut points = four_points();
    let mut attributes = points.attributes_for_write();
    assert!(attributes.add("mask", AttrDomain::Point, AttrType::Bool, AttributeInit::Zeroed));
    assert!(attributes.remove("mask"));
    let names = attributes.all_names();
    for _ in 0..3 {
        assert!(!attributes.remove("mask"));
        assert_eq!(attributes.all_names(), names);
    }
}

#[test]
fn test_foreach_visits_each_name_once() {
    let mut points = four_points();
    {
        let mut attributes = points.attributes_for_write();
        attributes.add("radius", AttrDomain::Point, AttrType::Float, AttributeInit::DefaultValue);
        attributes.add("temperature", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed);
        attributes.add("id_hash", AttrDomain::Point, AttrType::Int32, AttributeInit::Zeroed);
    }
    let mut seen = Vec::new();
    let finished = points.attributes().foreach_attribute(|iter| {
        seen.push((iter.name.to_string(), iter.is_builtin));
        let reader = iter.get().unwrap();
        assert_eq!(reader.domain, iter.domain);
        assert_eq!(reader.data_type(), iter.data_type);
    });
    assert!(finished);
    let unique: HashSet<_> = seen.iter().map(|(name, _)| name.clone()).collect();
    assert_eq!(unique.len(), seen.len());
    assert_eq!(
        seen,
        vec![
            ("position".to_string(), true),
            ("radius".to_string(), true),
            ("temperature".to_string(), false),
            ("id_hash".to_string(), false),
        ]
    );
}

#[test]
fn test_foreach_early_stop() {
    let mut mesh = Mesh::from_faces(vec![Vec3::ZERO, Vec3::X, Vec3::Y], &[3], &[0, 1, 2]).unwrap();
    {
        let mut attributes = mesh.attributes_for_write();
        attributes.add("uv_seam", AttrDomain::Edge, AttrType::Bool, AttributeInit::Zeroed);
        attributes.add("shade", AttrDomain::Face, AttrType::Float, AttributeInit::Zeroed);
    }
    let total = mesh.attributes().all_names().len();
    for stop_at in 1..=total {
        let mut visits = 0;
        let finished = mesh.attributes().foreach_attribute(|iter| {
            visits += 1;
            if visits == stop_at {
                iter.stop();
            }
        });
        assert!(!finished);
        assert_eq!(visits, stop_at);
    }
}

#[test]
fn test_iter_accessor_reaches_geometry() {
    let points = four_points();
    points.attributes().foreach_attribute(|iter| {
        let accessor = iter.accessor().expect("iteration through an accessor");
        assert_eq!(accessor.domain_size(AttrDomain::Point), 4);
        assert!(accessor.contains(iter.name));
    });
}

#[test]
fn test_lookup_or_add_for_write() {
    let mut points = four_points();
    let mut attributes = points.attributes_for_write();
    {
        let mut writer = attributes
            .lookup_or_add_for_write("weight", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed)
            .unwrap();
        writer.typed_mut::<f32>().unwrap()[1] = 2.0;
    }
    // Existing attribute is reused without reinitializing.
    {
        let writer = attributes
            .lookup_or_add_for_write("weight", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed)
            .unwrap();
        assert_eq!(writer.as_span().typed::<f32>(), Some(&[0.0, 2.0, 0.0, 0.0][..]));
    }
    assert!(attributes
        .lookup_or_add_for_write("weight", AttrDomain::Point, AttrType::Int32, AttributeInit::Zeroed)
        .is_none());
    assert_eq!(attributes.lookup_meta_data("weight").unwrap().data_type, AttrType::Float);
}

#[test]
fn test_rename_shares_data() {
    let mut points = four_points();
    let mut attributes = points.attributes_for_write();
    attributes.add("old", AttrDomain::Point, AttrType::Float, AttributeInit::Value(GValue::new(3.0f32)));
    let before = Arc::clone(attributes.lookup("old").unwrap().sharing_info.unwrap());

    assert!(attributes.rename("old", "new"));
    assert!(!attributes.contains("old"));
    let after = attributes.lookup("new").unwrap();
    assert!(Arc::ptr_eq(after.sharing_info.unwrap(), &before));

    assert!(!attributes.rename("position", "pos"));
    assert!(!attributes.rename("new", "radius"));
    attributes.add("other", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed);
    assert!(!attributes.rename("new", "other"));
    assert!(attributes.rename("new", "new"));
    assert!(!attributes.rename("missing", "missing"));
}

#[test]
fn test_writer_notifies_on_finish() {
    let mut points = four_points();
    points.bounds();
    let count = points.runtime().change_count();
    {
        let mut attributes = points.attributes_for_write();
        let mut writer = attributes.lookup_for_write("position").unwrap();
        writer.typed_mut::<Vec3>().unwrap()[0] = Vec3::splat(-1.0);
    }
    assert_eq!(points.runtime().change_count(), count + 1);
    assert!(!points.runtime().has_cached_bounds());
    assert_eq!(points.bounds().unwrap().min, Vec3::splat(-1.0));
}

#[test]
fn test_clone_is_copy_on_write() {
    let mut a = four_points();
    a.attributes_for_write()
        .add("temperature", AttrDomain::Point, AttrType::Float, AttributeInit::Zeroed);
    let b = a.clone();
    {
        let mut attributes = a.attributes_for_write();
        let mut writer = attributes.lookup_for_write("temperature").unwrap();
        writer.typed_mut::<f32>().unwrap().fill(9.0);
    }
    assert_eq!(a.attributes().lookup_typed::<f32>("temperature").as_deref(), Some(&[9.0; 4][..]));
    assert_eq!(b.attributes().lookup_typed::<f32>("temperature").as_deref(), Some(&[0.0; 4][..]));
}
