//! Dashboard state: the loaded datasets plus the current selections.
//!
//! Every selection change recomputes what depends on it in full (no
//! incremental updates) and the caller rewrites the affected SVG.

use std::path::PathBuf;

use prison_viz_analytics::aggregate::{aggregate, columns};
use prison_viz_dashboard_models::DashboardConfig;
use prison_viz_geography_models::{GeoFeature, available_metrics};
use prison_viz_records_models::{Aggregate, BarMetric, GroupColumn, Record};
use prison_viz_render::{
    BAR_CHART_FILE, CHOROPLETH_FILE, RenderError, render_bar_chart, render_choropleth, write_svg,
};
use prison_viz_spatial::CountyIndex;

/// In-memory dashboard state for one session.
pub struct Dashboard {
    config: DashboardConfig,
    records: Vec<Record>,
    counties: CountyIndex,
    group: GroupColumn,
    bar_metric: BarMetric,
    map_metric: Option<String>,
    aggregates: Vec<Aggregate>,
}

impl Dashboard {
    /// Creates the dashboard with the configured default selections.
    ///
    /// When no default map statistic is configured, the first statistic
    /// (by name) found on any county is selected. The county lookup index
    /// is built here, once per session.
    #[must_use]
    pub fn new(config: DashboardConfig, records: Vec<Record>, counties: Vec<GeoFeature>) -> Self {
        let group = config.bar_chart.default_group.clone();
        let bar_metric = config.bar_chart.default_metric;
        let map_metric = config
            .map
            .default_metric
            .clone()
            .or_else(|| available_metrics(&counties).into_iter().next());
        let aggregates = aggregate(&records, &group);

        Self {
            config,
            records,
            counties: CountyIndex::new(counties),
            group,
            bar_metric,
            map_metric,
            aggregates,
        }
    }

    #[must_use]
    pub const fn group(&self) -> &GroupColumn {
        &self.group
    }

    #[must_use]
    pub const fn bar_metric(&self) -> BarMetric {
        self.bar_metric
    }

    #[must_use]
    pub fn map_metric(&self) -> Option<&str> {
        self.map_metric.as_deref()
    }

    #[must_use]
    pub fn aggregates(&self) -> &[Aggregate] {
        &self.aggregates
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn county_count(&self) -> usize {
        self.counties.features().len()
    }

    /// Columns the records can be grouped by.
    #[must_use]
    pub fn columns(&self) -> Vec<GroupColumn> {
        columns(&self.records)
    }

    /// Statistics available for the map fill.
    #[must_use]
    pub fn map_metrics(&self) -> Vec<String> {
        available_metrics(self.counties.features())
    }

    /// Changes the grouping column and recomputes the aggregates.
    pub fn select_group(&mut self, column: GroupColumn) {
        log::debug!("Grouping by {column}");
        self.aggregates = aggregate(&self.records, &column);
        self.group = column;
    }

    pub fn select_bar_metric(&mut self, metric: BarMetric) {
        self.bar_metric = metric;
    }

    pub fn select_map_metric(&mut self, metric: String) {
        self.map_metric = Some(metric);
    }

    /// Renders the bar chart for the current selections.
    #[must_use]
    pub fn bar_chart_svg(&self) -> String {
        render_bar_chart(
            &self.aggregates,
            self.bar_metric,
            &self.group,
            &self.config.bar_chart,
        )
    }

    /// Renders the choropleth for the current selection, or `None` when
    /// there is no statistic to color by.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the configured gradient is unusable.
    pub fn choropleth_svg(&self) -> Result<Option<String>, RenderError> {
        self.map_metric
            .as_deref()
            .map(|metric| render_choropleth(self.counties.features(), metric, &self.config.map))
            .transpose()
    }

    /// Writes the bar chart into the output directory.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if the file cannot be written.
    pub fn write_bar_chart(&self) -> Result<PathBuf, RenderError> {
        write_svg(
            &self.config.output.directory,
            BAR_CHART_FILE,
            &self.bar_chart_svg(),
        )
    }

    /// Writes the choropleth into the output directory. Returns `None`
    /// when there is no statistic to color by.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if rendering or writing fails.
    pub fn write_choropleth(&self) -> Result<Option<PathBuf>, RenderError> {
        self.choropleth_svg()?
            .map(|svg| write_svg(&self.config.output.directory, CHOROPLETH_FILE, &svg))
            .transpose()
    }

    /// Finds the county under a lon/lat coordinate.
    #[must_use]
    pub fn inspect(&self, lng: f64, lat: f64) -> Option<&GeoFeature> {
        self.counties.lookup(lng, lat)
    }
}
