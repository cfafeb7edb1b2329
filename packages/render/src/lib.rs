#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! SVG rendering for the dashboard.
//!
//! Produces two standalone SVG documents: a bar chart of grouped
//! aggregates ([`bar_chart`]) and a county choropleth ([`choropleth`]).
//! Rendering is pure string building; [`write_svg`] puts the result on
//! disk.

pub mod bar_chart;
pub mod choropleth;
mod svg;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use bar_chart::render_bar_chart;
pub use choropleth::render_choropleth;

/// File name of the rendered bar chart.
pub const BAR_CHART_FILE: &str = "bar_chart.svg";
/// File name of the rendered choropleth.
pub const CHOROPLETH_FILE: &str = "choropleth.svg";

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The color scale could not be built from the configured gradient.
    #[error(transparent)]
    Scale(#[from] prison_viz_analytics::AnalyticsError),

    /// Writing the SVG file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes `svg` to `dir/file_name`, creating `dir` if needed.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the directory or file cannot be written.
pub fn write_svg(dir: &Path, file_name: &str, svg: &str) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, svg)?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}
