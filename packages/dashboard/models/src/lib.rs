#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard configuration schema.
//!
//! Defines the TOML layout for the data endpoints, the two SVG canvases,
//! and the output location. The default values live in the embedded
//! `default.toml` of the source crate; these types only describe shape.

use std::path::PathBuf;

use prison_viz_records_models::{BarMetric, GroupColumn};
use serde::{Deserialize, Serialize};

/// Complete dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Remote dataset locations.
    pub data: DataConfig,
    /// Bar chart canvas and defaults.
    pub bar_chart: BarChartConfig,
    /// Choropleth canvas, palette, and defaults.
    pub map: MapConfig,
    /// Where rendered SVG files are written.
    pub output: OutputConfig,
}

/// Remote dataset locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// URL of the JSON array of incarceration records.
    pub records_url: String,
    /// URL of the county `GeoJSON` `FeatureCollection`.
    pub counties_url: String,
    /// Feature property holding the county's display name.
    pub county_name_property: String,
}

/// Space reserved around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Canvas dimensions shared by both visuals.
pub trait Canvas {
    /// Total SVG width.
    fn width(&self) -> f64;
    /// Total SVG height.
    fn height(&self) -> f64;
    /// Margins around the plot area.
    fn margin(&self) -> Margin;

    /// Width available for the plot after margins.
    fn inner_width(&self) -> f64 {
        (self.width() - self.margin().left - self.margin().right).max(0.0)
    }

    /// Height available for the plot after margins.
    fn inner_height(&self) -> f64 {
        (self.height() - self.margin().top - self.margin().bottom).max(0.0)
    }
}

/// Bar chart canvas and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    /// Fill color of the bars.
    pub bar_color: String,
    /// Band padding as a fraction of the band step.
    pub padding: f64,
    /// Approximate number of Y axis ticks.
    pub ticks: usize,
    /// Column selected when the dashboard opens.
    pub default_group: GroupColumn,
    /// Statistic selected when the dashboard opens.
    pub default_metric: BarMetric,
}

impl Canvas for BarChartConfig {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn margin(&self) -> Margin {
        self.margin
    }
}

/// Choropleth canvas, palette, and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    /// Gradient stop colors, lowest value first.
    pub gradient: Vec<String>,
    /// Fill for counties without a value for the selected statistic.
    pub no_data_color: String,
    /// County outline color.
    pub stroke_color: String,
    /// Statistic selected when the dashboard opens. When unset the first
    /// available statistic is used.
    #[serde(default)]
    pub default_metric: Option<String>,
}

impl Canvas for MapConfig {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn margin(&self) -> Margin {
        self.margin
    }
}

/// Where rendered SVG files are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: PathBuf,
}
