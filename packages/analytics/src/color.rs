//! Discrete gradient color scale for the choropleth.
//!
//! Values are normalized linearly against the domain and then bucketed
//! into one of the gradient stops, so each county gets exactly one of
//! the configured colors.

use crate::AnalyticsError;
use crate::scale::extent;

/// Maps numeric values onto a list of gradient stop colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: (f64, f64),
    stops: Vec<String>,
    no_data: String,
}

impl ColorScale {
    /// Creates a scale over `domain` with the given stop colors (low to
    /// high) and the color used for `NaN` values.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidScale`] if `stops` is empty.
    pub fn new(
        domain: (f64, f64),
        stops: Vec<String>,
        no_data: impl Into<String>,
    ) -> Result<Self, AnalyticsError> {
        if stops.is_empty() {
            return Err(AnalyticsError::InvalidScale {
                message: "color scale needs at least one gradient stop".to_string(),
            });
        }
        Ok(Self {
            domain,
            stops,
            no_data: no_data.into(),
        })
    }

    /// Creates a scale whose domain is the extent of `values`.
    ///
    /// With no finite values the domain collapses to `(0, 0)`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidScale`] if `stops` is empty.
    pub fn from_values(
        values: impl IntoIterator<Item = f64>,
        stops: Vec<String>,
        no_data: impl Into<String>,
    ) -> Result<Self, AnalyticsError> {
        let domain = extent(values).unwrap_or((0.0, 0.0));
        Self::new(domain, stops, no_data)
    }

    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn stops(&self) -> &[String] {
        &self.stops
    }

    #[must_use]
    pub fn no_data(&self) -> &str {
        &self.no_data
    }

    /// Position of `value` in the domain, clamped to `[0, 1]`. `None` for
    /// `NaN`.
    #[must_use]
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        let (min, max) = self.domain;
        let span = max - min;
        if span == 0.0 || !span.is_finite() {
            return Some(0.0);
        }
        Some(((value - min) / span).clamp(0.0, 1.0))
    }

    /// Index of the stop that `value` falls into.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn stop_index(&self, value: f64) -> Option<usize> {
        let t = self.normalize(value)?;
        let n = self.stops.len();
        Some(((t * n as f64).floor() as usize).min(n - 1))
    }

    /// Color for `value`; the no-data color for `NaN`.
    #[must_use]
    pub fn color(&self, value: f64) -> &str {
        self.stop_index(value)
            .map_or(self.no_data.as_str(), |i| self.stops[i].as_str())
    }

    /// Lower domain bound of each stop, for legend labels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn thresholds(&self) -> Vec<f64> {
        let (min, max) = self.domain;
        let n = self.stops.len() as f64;
        (0..self.stops.len())
            .map(|i| (max - min).mul_add(i as f64 / n, min))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<String> {
        ["#eee", "#bbb", "#888", "#444"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn buckets_values_by_normalized_position() {
        let scale = ColorScale::new((0.0, 100.0), stops(), "#fff").unwrap();
        assert_eq!(scale.color(0.0), "#eee");
        assert_eq!(scale.color(24.9), "#eee");
        assert_eq!(scale.color(25.0), "#bbb");
        assert_eq!(scale.color(74.0), "#888");
        assert_eq!(scale.color(100.0), "#444");
    }

    #[test]
    fn out_of_domain_values_are_clamped() {
        let scale = ColorScale::new((10.0, 20.0), stops(), "#fff").unwrap();
        assert_eq!(scale.color(-5.0), "#eee");
        assert_eq!(scale.color(500.0), "#444");
    }

    #[test]
    fn nan_uses_no_data_color() {
        let scale = ColorScale::new((0.0, 1.0), stops(), "#fff").unwrap();
        assert_eq!(scale.color(f64::NAN), "#fff");
        assert_eq!(scale.stop_index(f64::NAN), None);
    }

    #[test]
    fn degenerate_domain_uses_first_stop() {
        let scale = ColorScale::from_values([7.0, 7.0, f64::NAN], stops(), "#fff").unwrap();
        assert_eq!(scale.domain(), (7.0, 7.0));
        assert_eq!(scale.color(7.0), "#eee");
    }

    #[test]
    fn empty_stops_are_rejected() {
        assert!(ColorScale::new((0.0, 1.0), vec![], "#fff").is_err());
    }

    #[test]
    fn thresholds_split_domain_evenly() {
        let scale = ColorScale::new((0.0, 100.0), stops(), "#fff").unwrap();
        assert_eq!(scale.thresholds(), vec![0.0, 25.0, 50.0, 75.0]);
    }
}
