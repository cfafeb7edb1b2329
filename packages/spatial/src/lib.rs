#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index for county lookups.
//!
//! Builds an R-tree over county bounding boxes and answers "which county
//! contains this point" with an exact point-in-polygon test. Backs the
//! map tooltip: the interactive menu and the `inspect` command use it to
//! show the statistics of the county under a coordinate.

use geo::{BoundingRect, Contains, MultiPolygon};
use prison_viz_geography_models::GeoFeature;
use rstar::{AABB, RTree, RTreeObject};

/// A county's bounding box stored in the R-tree, pointing back into the
/// feature slice.
struct CountyEntry {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for CountyEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// County features together with an R-tree over their bounding boxes.
///
/// The tree is built once when the features are loaded and reused for
/// every lookup.
pub struct CountyIndex {
    features: Vec<GeoFeature>,
    tree: RTree<CountyEntry>,
}

impl CountyIndex {
    /// Builds the index. Counties with empty geometry are kept in
    /// [`features`](Self::features) but left out of the tree.
    #[must_use]
    pub fn new(features: Vec<GeoFeature>) -> Self {
        let entries: Vec<CountyEntry> = features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                compute_envelope(&feature.geometry).map(|envelope| CountyEntry { index, envelope })
            })
            .collect();

        log::debug!(
            "Indexed {} of {} counties",
            entries.len(),
            features.len()
        );

        Self {
            features,
            tree: RTree::bulk_load(entries),
        }
    }

    /// All counties, in load order.
    #[must_use]
    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    /// Number of indexed counties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether no county was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Looks up the county containing the point.
    ///
    /// Counties tile without overlap, so the first match wins.
    #[must_use]
    pub fn lookup(&self, lng: f64, lat: f64) -> Option<&GeoFeature> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .map(|entry| &self.features[entry.index])
            .find(|feature| feature.geometry.contains(&point))
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`], or `None`
/// if it has no coordinates.
fn compute_envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}
