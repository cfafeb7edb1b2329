#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data shaping for the dashboard visuals.
//!
//! [`aggregate`] reshapes raw records into per-group counts and means,
//! [`scale`] maps data values onto chart coordinates, and [`color`] maps
//! values onto a discrete gradient for the choropleth.

pub mod aggregate;
pub mod color;
pub mod scale;

use thiserror::Error;

/// Errors that can occur while building scales.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A scale was configured with unusable parameters.
    #[error("Invalid scale: {message}")]
    InvalidScale {
        /// Description of what went wrong.
        message: String,
    },
}
