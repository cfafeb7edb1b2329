#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County boundary types for the choropleth map.
//!
//! A [`GeoFeature`] is one county polygon annotated with the numeric
//! statistics that were embedded in its `GeoJSON` properties. Features
//! are read-only once loaded.

use std::collections::{BTreeMap, BTreeSet};

use geo::MultiPolygon;

/// A county polygon with its embedded statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    /// Display name of the county.
    pub name: String,
    /// County boundary in lon/lat degrees.
    pub geometry: MultiPolygon<f64>,
    /// Numeric properties keyed by property name.
    pub stats: BTreeMap<String, f64>,
}

impl GeoFeature {
    /// Returns the value of the statistic `metric`, or `NaN` if the
    /// county does not carry it.
    #[must_use]
    pub fn stat(&self, metric: &str) -> f64 {
        self.stats.get(metric).copied().unwrap_or(f64::NAN)
    }
}

/// Returns every statistic name carried by at least one feature, sorted.
#[must_use]
pub fn available_metrics(features: &[GeoFeature]) -> Vec<String> {
    features
        .iter()
        .flat_map(|f| f.stats.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
