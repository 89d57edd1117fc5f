// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scene behaviour

use approx::assert_relative_eq;
use citygml_lite_geometry::buffer_area;
use citygml_lite_model::{
    decode_pos_list, FeatureRecord, ObjectType, Point3, Polygon, Ring, SurfaceType,
    VecFeatureSource,
};
use citygml_lite_scene::{Scene, SceneConfig};

fn ring(text: &str) -> Ring {
    decode_pos_list(text).unwrap().into_ring()
}

fn holed_square() -> Polygon {
    Polygon::with_holes(
        ring("0 0 0  4 0 0  4 4 0  0 4 0"),
        vec![ring("1 1 0  3 1 0  3 3 0  1 3 0")],
    )
}

fn city() -> Vec<FeatureRecord> {
    let mut records = Vec::new();
    for i in 0..12 {
        let dx = i as f64 * 10.0;
        let shifted = |r: &Ring| {
            Ring::new(
                r.points
                    .iter()
                    .map(|p| Point3::new(p.x + dx, p.y, p.z + i as f64))
                    .collect(),
            )
        };
        let base = holed_square();
        let polygon = Polygon::with_holes(
            shifted(&base.exterior),
            base.interiors.iter().map(shifted).collect(),
        );
        records.push(
            FeatureRecord::new(format!("bldg-{i}"), ObjectType::Building)
                .with_polygon(SurfaceType::ROOF, polygon.clone())
                .with_polygon(SurfaceType(i % 3), polygon),
        );
    }
    records
}

fn bits(buffer: &[f32]) -> Vec<u32> {
    buffer.iter().map(|f| f.to_bits()).collect()
}

#[test]
fn test_square_with_hole_area() {
    let mut scene = Scene::new();
    let index = scene.add_record(
        FeatureRecord::new("roof", ObjectType::Building)
            .with_polygon(SurfaceType::ROOF, holed_square()),
    );
    let report = scene.regenerate_triangles_for(index).unwrap();

    assert_eq!(report.failed_polygons(), 0);
    let triangles = scene.object(index).unwrap().triangles_of(SurfaceType::ROOF);
    assert_eq!(triangles.len() % 9, 0);
    assert_relative_eq!(buffer_area(triangles), 12.0, epsilon = 1e-5);
}

#[test]
fn test_edge_buffer_length() {
    let mut scene = Scene::new();
    let polygon = Polygon::with_holes(
        ring("0 0 0  10 0 0  10 10 0  5 12 0  0 10 0"),
        vec![
            ring("1 1 0  2 1 0  2 2 0"),
            ring("5 5 0  7 5 0  7 7 0  5 7 0"),
        ],
    );
    let index = scene.add_record(
        FeatureRecord::new("house", ObjectType::Building)
            .with_polygon(SurfaceType::UNCLASSIFIED, polygon),
    );
    let report = scene.regenerate_edges_for(index).unwrap();

    assert_eq!(report.segments, 5 + 3 + 4);
    assert_eq!(scene.object(index).unwrap().edges().len(), 6 * (5 + 3 + 4));
}

#[test]
fn test_regeneration_is_idempotent() {
    let mut scene = Scene::with_config(SceneConfig::default().with_parallel(false));
    scene.load(VecFeatureSource::new(city())).unwrap();

    scene.regenerate_all();
    let first: Vec<_> = scene
        .objects()
        .iter()
        .map(|o| {
            let triangles: Vec<_> = o.triangles().values().map(|b| bits(b)).collect();
            (triangles, bits(o.edges()))
        })
        .collect();

    for index in 0..scene.len() {
        scene.regenerate_triangles_for(index).unwrap();
        scene.regenerate_edges_for(index).unwrap();
    }
    scene.regenerate_all();

    for (object, (triangles, edges)) in scene.objects().iter().zip(&first) {
        let again: Vec<_> = object.triangles().values().map(|b| bits(b)).collect();
        assert_eq!(&again, triangles);
        assert_eq!(&bits(object.edges()), edges);
    }
}

#[test]
fn test_two_point_ring_leaves_siblings_intact() {
    let mut scene = Scene::new();
    let index = scene.add_record(
        FeatureRecord::new("mixed", ObjectType::GenericCityObject)
            .with_polygon(SurfaceType::UNCLASSIFIED, Polygon::new(ring("0 0 0  1 0 0")))
            .with_polygon(SurfaceType::UNCLASSIFIED, holed_square()),
    );
    let report = scene.regenerate_all();

    assert_eq!(report.invalid_rings, 1);
    assert_eq!(report.polygons, 1);
    let object = scene.object(index).unwrap();
    assert_relative_eq!(
        buffer_area(object.triangles_of(SurfaceType::UNCLASSIFIED)),
        12.0,
        epsilon = 1e-5
    );
    // The 2-point ring emits no segments, the holed square emits 8
    assert_eq!(object.edges().len(), 6 * 8);
}

#[test]
fn test_bounds_track_ingested_points() {
    let mut scene = Scene::new();
    scene.ingest_point(&Point3::new(1.0, 2.0, 3.0));
    scene.ingest_point(&Point3::new(-1.0, 5.0, 0.0));
    scene.ingest_point(&Point3::new(0.0, 0.0, 10.0));

    assert_eq!(scene.bounds().min, [-1.0, 0.0, 0.0]);
    assert_eq!(scene.bounds().max, [1.0, 5.0, 10.0]);

    scene.clear();
    assert!(scene.bounds().is_empty());
}

#[test]
fn test_parallel_matches_sequential() {
    let mut sequential = Scene::with_config(SceneConfig::default().with_parallel(false));
    let mut parallel = Scene::with_config(SceneConfig::default().with_parallel(true));
    sequential.load(VecFeatureSource::new(city())).unwrap();
    parallel.load(VecFeatureSource::new(city())).unwrap();

    let a = sequential.regenerate_all();
    let b = parallel.regenerate_all();
    assert_eq!(a, b);

    for (x, y) in sequential.objects().iter().zip(parallel.objects()) {
        assert_eq!(x.triangles(), y.triangles());
        assert_eq!(x.edges(), y.edges());
    }
}
