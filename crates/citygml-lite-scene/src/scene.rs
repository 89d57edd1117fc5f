// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene model: owns every city object and the global bounds

use crate::{CityObject, RegenerationReport, Result, SceneConfig, SceneError};
use citygml_lite_geometry::Bounds3;
use citygml_lite_model::{FeatureRecord, FeatureSource, Point3, Polygon, Ring, SurfaceType};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Collection of city objects with running bounds
///
/// Bounds only grow: removing an object keeps them as they are, and only
/// [`Scene::clear`] resets them.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<CityObject>,
    /// id -> index of the most recently added object with that id
    index: FxHashMap<String, usize>,
    bounds: Bounds3,
    config: SceneConfig,
}

impl Scene {
    /// Create an empty scene with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene with the given configuration
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current configuration
    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Replace the configuration; buffers are kept until the next regeneration
    pub fn set_config(&mut self, config: SceneConfig) {
        self.config = config;
    }

    /// Add an object, ingesting all its points into the bounds
    ///
    /// Returns the object's index.
    pub fn add_object(&mut self, object: CityObject) -> usize {
        self.bounds.include_all(object.points());
        let index = self.objects.len();
        self.index.insert(object.id().to_owned(), index);
        self.objects.push(object);
        index
    }

    /// Add an object built from a feature record
    pub fn add_record(&mut self, record: FeatureRecord) -> usize {
        self.add_object(CityObject::from(record))
    }

    /// Add every record a source yields
    ///
    /// Stops at the first source error; objects added before it stay.
    pub fn load<S: FeatureSource>(&mut self, mut source: S) -> Result<usize> {
        let (lower, _) = source.size_hint();
        self.objects.reserve(lower);

        let mut added = 0;
        while let Some(record) = source.next_feature() {
            self.add_record(record?);
            added += 1;
        }

        log::info!("Loaded {} objects ({} total)", added, self.objects.len());
        Ok(added)
    }

    /// Append a polygon to an existing object
    pub fn add_polygon(
        &mut self,
        index: usize,
        surface_type: SurfaceType,
        polygon: Polygon,
    ) -> Result<()> {
        let object = self
            .objects
            .get_mut(index)
            .ok_or(SceneError::ObjectNotFound(index))?;
        self.bounds.include_all(polygon.points());
        object.push_polygon(surface_type, polygon);
        Ok(())
    }

    /// Append an edge-only ring to an existing object
    pub fn add_edge_ring(&mut self, index: usize, ring: Ring) -> Result<()> {
        let object = self
            .objects
            .get_mut(index)
            .ok_or(SceneError::ObjectNotFound(index))?;
        self.bounds.include_all(&ring.points);
        object.push_edge_ring(ring);
        Ok(())
    }

    /// Grow the bounds by a point that is not part of any object
    pub fn ingest_point(&mut self, point: &Point3<f64>) {
        self.bounds.include(point);
    }

    /// Remove an object; later objects shift down by one
    ///
    /// The bounds are not shrunk.
    pub fn remove_object(&mut self, index: usize) -> Result<CityObject> {
        if index >= self.objects.len() {
            return Err(SceneError::ObjectNotFound(index));
        }
        let object = self.objects.remove(index);
        self.rebuild_index();
        Ok(object)
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, object) in self.objects.iter().enumerate() {
            self.index.insert(object.id().to_owned(), i);
        }
    }

    /// Drop every object and reset the bounds
    pub fn clear(&mut self) {
        self.objects.clear();
        self.index.clear();
        self.bounds.reset();
    }

    /// Rebuild one object's triangle buffers
    pub fn regenerate_triangles_for(&mut self, index: usize) -> Result<RegenerationReport> {
        let options = self.config.tessellation;
        let object = self
            .objects
            .get_mut(index)
            .ok_or(SceneError::ObjectNotFound(index))?;
        Ok(object.regenerate_triangles(&options))
    }

    /// Rebuild one object's edge buffer
    pub fn regenerate_edges_for(&mut self, index: usize) -> Result<RegenerationReport> {
        let object = self
            .objects
            .get_mut(index)
            .ok_or(SceneError::ObjectNotFound(index))?;
        Ok(object.regenerate_edges())
    }

    /// Rebuild the buffers of every object
    ///
    /// Objects own disjoint buffers, so with `parallel` set they are
    /// processed on the rayon pool. Output does not depend on the mode.
    pub fn regenerate_all(&mut self) -> RegenerationReport {
        let options = self.config.tessellation;
        let edges = self.config.emit_edges;

        let report = if self.config.parallel {
            self.objects
                .par_iter_mut()
                .map(|object| object.regenerate(&options, edges))
                .reduce(RegenerationReport::default, |a, b| a + b)
        } else {
            self.objects
                .iter_mut()
                .map(|object| object.regenerate(&options, edges))
                .sum()
        };

        log::info!("Regenerated scene: {}", report);
        if !report.is_clean() {
            log::info!(
                "Skipped: {} invalid rings, {} degenerate planes, {} triangulation failures, \
                 {} holes, {} edge rings; {} ambiguous faces, {} unenforced segments",
                report.invalid_rings,
                report.degenerate_planes,
                report.triangulation_failures,
                report.skipped_holes,
                report.skipped_edge_rings,
                report.ambiguous_faces,
                report.skipped_constraints
            );
        }
        report
    }

    /// All objects in insertion order
    #[inline]
    pub fn objects(&self) -> &[CityObject] {
        &self.objects
    }

    /// Object at an index
    #[inline]
    pub fn object(&self, index: usize) -> Option<&CityObject> {
        self.objects.get(index)
    }

    /// Index of the most recently added object with this id
    pub fn find(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Number of objects
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if the scene holds no objects
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Extent of every point ingested since the last clear
    #[inline]
    pub fn bounds(&self) -> &Bounds3 {
        &self.bounds
    }

    /// Triangles across all objects
    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(CityObject::triangle_count).sum()
    }

    /// Edge segments across all objects
    pub fn segment_count(&self) -> usize {
        self.objects.iter().map(CityObject::segment_count).sum()
    }
}
