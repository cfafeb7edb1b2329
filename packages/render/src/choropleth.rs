//! County choropleth map.
//!
//! Counties are projected with an equirectangular projection fit to the
//! bounding box of all features, corrected for latitude so shapes are
//! not stretched horizontally. Each county is filled through a
//! [`ColorScale`] over the selected statistic, and a legend of the
//! gradient stops sits in the bottom margin.

use geo::{BoundingRect, LineString, Rect};
use prison_viz_analytics::color::ColorScale;
use prison_viz_dashboard_models::{Canvas as _, MapConfig};
use prison_viz_geography_models::GeoFeature;

use crate::RenderError;
use crate::svg::{Document, escape, label, num};

/// Maps lon/lat degrees onto canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    min_lng: f64,
    max_lat: f64,
    /// Horizontal shrink factor, `cos` of the middle latitude.
    kx: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Projection {
    /// Fits `bounds` into the plot area of `config`, preserving aspect
    /// ratio and centering the result.
    #[must_use]
    pub fn fit(bounds: Rect<f64>, config: &MapConfig) -> Self {
        let inner_w = config.inner_width();
        let inner_h = config.inner_height();
        let mid_lat = f64::midpoint(bounds.min().y, bounds.max().y);
        let kx = mid_lat.to_radians().cos().max(0.01);

        let span_x = bounds.width() * kx;
        let span_y = bounds.height();
        let scale = match (span_x > 0.0, span_y > 0.0) {
            (true, true) => (inner_w / span_x).min(inner_h / span_y),
            (true, false) => inner_w / span_x,
            (false, true) => inner_h / span_y,
            (false, false) => 1.0,
        };

        Self {
            min_lng: bounds.min().x,
            max_lat: bounds.max().y,
            kx,
            scale,
            offset_x: config.margin.left + span_x.mul_add(-scale, inner_w) / 2.0,
            offset_y: config.margin.top + span_y.mul_add(-scale, inner_h) / 2.0,
        }
    }

    /// Projects a lon/lat pair to canvas `(x, y)`.
    #[must_use]
    pub fn project(&self, lng: f64, lat: f64) -> (f64, f64) {
        (
            ((lng - self.min_lng) * self.kx).mul_add(self.scale, self.offset_x),
            (self.max_lat - lat).mul_add(self.scale, self.offset_y),
        )
    }
}

/// Bounding box of all feature geometries, or `None` if there are no
/// coordinates at all.
#[must_use]
pub fn bounds(features: &[GeoFeature]) -> Option<Rect<f64>> {
    features
        .iter()
        .filter_map(|f| f.geometry.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
            )
        })
}

fn ring_path(ring: &LineString<f64>, projection: &Projection, d: &mut String) {
    for (i, coord) in ring.coords().enumerate() {
        let (x, y) = projection.project(coord.x, coord.y);
        d.push_str(if i == 0 { "M" } else { "L" });
        d.push_str(&num(x));
        d.push(',');
        d.push_str(&num(y));
    }
    if !ring.0.is_empty() {
        d.push('Z');
    }
}

/// SVG path data for a county, holes included.
fn feature_path(feature: &GeoFeature, projection: &Projection) -> String {
    let mut d = String::new();
    for polygon in &feature.geometry {
        ring_path(polygon.exterior(), projection, &mut d);
        for interior in polygon.interiors() {
            ring_path(interior, projection, &mut d);
        }
    }
    d
}

/// Renders `features` as an SVG choropleth colored by the statistic
/// `metric`.
///
/// Counties missing the statistic are drawn in the no-data color.
///
/// # Errors
///
/// Returns [`RenderError::Scale`] if the configured gradient is empty.
pub fn render_choropleth(
    features: &[GeoFeature],
    metric: &str,
    config: &MapConfig,
) -> Result<String, RenderError> {
    let colors = ColorScale::from_values(
        features.iter().map(|f| f.stat(metric)),
        config.gradient.clone(),
        config.no_data_color.clone(),
    )?;

    let mut doc = Document::new(config.width, config.height);
    doc.text(
        config.margin.left,
        config.margin.top - 6.0,
        r#"class="title" font-size="14""#,
        metric,
    );

    match bounds(features) {
        Some(rect) => {
            let projection = Projection::fit(rect, config);
            doc.line(&format!(
                r#"<g class="counties" stroke="{}" stroke-width="0.5" fill-rule="evenodd">"#,
                escape(&config.stroke_color)
            ));
            for feature in features {
                let value = feature.stat(metric);
                doc.line(&format!(
                    r#"<path d="{}" fill="{}"><title>{}: {}</title></path>"#,
                    feature_path(feature, &projection),
                    escape(colors.color(value)),
                    escape(&feature.name),
                    label(value)
                ));
            }
            doc.line("</g>");
        }
        None => {
            log::warn!("No county geometry to draw");
            doc.text(
                config.width / 2.0,
                config.height / 2.0,
                r#"class="empty" text-anchor="middle" font-size="14""#,
                "No data",
            );
        }
    }

    legend(&mut doc, &colors, config);

    Ok(doc.finish())
}

#[allow(clippy::cast_precision_loss)]
fn legend(doc: &mut Document, colors: &ColorScale, config: &MapConfig) {
    const SWATCH_H: f64 = 12.0;

    let stops = colors.stops();
    let legend_w = (config.inner_width() / 2.0).min(320.0);
    let swatch_w = legend_w / stops.len() as f64;
    let x0 = config.margin.left;
    let y0 = config.height - config.margin.bottom + 20.0;

    doc.line(r#"<g class="legend">"#);
    for (i, (stop, threshold)) in stops.iter().zip(colors.thresholds()).enumerate() {
        let x = swatch_w.mul_add(i as f64, x0);
        doc.line(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            num(x),
            num(y0),
            num(swatch_w),
            num(SWATCH_H),
            escape(stop)
        ));
        doc.text(x, y0 + SWATCH_H + 12.0, r#"text-anchor="middle""#, &label(threshold));
    }
    doc.text(
        x0 + legend_w,
        y0 + SWATCH_H + 12.0,
        r#"text-anchor="middle""#,
        &label(colors.domain().1),
    );

    let nd_x = x0 + legend_w + 30.0;
    doc.line(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
        num(nd_x),
        num(y0),
        num(SWATCH_H),
        num(SWATCH_H),
        escape(colors.no_data())
    ));
    doc.text(nd_x + SWATCH_H + 4.0, y0 + SWATCH_H - 2.0, "", "No data");
    doc.line("</g>");
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use geo::{MultiPolygon, Polygon};
    use prison_viz_dashboard_models::Margin;

    use super::*;

    fn config() -> MapConfig {
        MapConfig {
            width: 1000.0,
            height: 800.0,
            margin: Margin {
                top: 20.0,
                right: 20.0,
                bottom: 70.0,
                left: 20.0,
            },
            gradient: vec!["#aaa".to_string(), "#555".to_string()],
            no_data_color: "#ccc".to_string(),
            stroke_color: "#fff".to_string(),
            default_metric: None,
        }
    }

    fn square(name: &str, x0: f64, stats: &[(&str, f64)]) -> GeoFeature {
        let ring = LineString::from(vec![
            (x0, 0.0),
            (x0 + 1.0, 0.0),
            (x0 + 1.0, 1.0),
            (x0, 1.0),
            (x0, 0.0),
        ]);
        GeoFeature {
            name: name.to_string(),
            geometry: MultiPolygon(vec![Polygon::new(ring, vec![])]),
            stats: stats
                .iter()
                .map(|(k, v)| ((*k).to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn paths(svg: &str) -> Vec<&str> {
        svg.lines().filter(|l| l.starts_with("<path")).collect()
    }

    #[test]
    fn fills_counties_by_statistic() {
        let features = vec![
            square("Low", 0.0, &[("inmates", 10.0)]),
            square("High", 1.0, &[("inmates", 90.0)]),
            square("Unknown", 2.0, &[]),
        ];
        let svg = render_choropleth(&features, "inmates", &config()).unwrap();
        let paths = paths(&svg);

        assert!(svg.contains(r#"width="1000" height="800""#));
        assert_eq!(paths.len(), 3);
        assert!(paths[0].contains(r##"fill="#aaa""##));
        assert!(paths[1].contains(r##"fill="#555""##));
        assert!(paths[2].contains(r##"fill="#ccc""##));
        assert!(paths[2].contains("<title>Unknown: no data</title>"));
    }

    #[test]
    fn projection_fits_plot_area() {
        let rect = Rect::new((0.0, 0.0), (3.0, 1.0));
        let projection = Projection::fit(rect, &config());
        let (left, top) = projection.project(0.0, 1.0);
        let (right, bottom) = projection.project(3.0, 0.0);

        assert!(left >= 20.0 - 1e-9 && right <= 980.0 + 1e-9);
        assert!(top >= 20.0 - 1e-9 && bottom <= 730.0 + 1e-9);
        // Width-bound: the projected span fills the inner width exactly.
        assert!((right - left - 960.0).abs() < 1e-6);
        // North is up.
        assert!(top < bottom);
    }

    #[test]
    fn path_closes_every_ring() {
        let features = vec![square("A", 0.0, &[("x", 1.0)])];
        let svg = render_choropleth(&features, "x", &config()).unwrap();
        let path = paths(&svg)[0];
        assert!(path.contains(r#"d="M"#));
        assert_eq!(path.matches('Z').count(), 1);
    }

    #[test]
    fn legend_lists_every_stop() {
        let features = vec![square("A", 0.0, &[("x", 0.0)]), square("B", 1.0, &[("x", 50.0)])];
        let svg = render_choropleth(&features, "x", &config()).unwrap();
        assert!(svg.contains(r##"fill="#aaa"/>"##));
        assert!(svg.contains(r##"fill="#555"/>"##));
        assert!(svg.contains(">25</text>"));
        assert!(svg.contains(">50</text>"));
    }

    #[test]
    fn no_geometry_renders_notice() {
        let svg = render_choropleth(&[], "x", &config()).unwrap();
        assert!(paths(&svg).is_empty());
        assert!(svg.contains(r#"class="empty""#));
    }

    #[test]
    fn empty_gradient_is_an_error() {
        let mut config = config();
        config.gradient.clear();
        assert!(matches!(
            render_choropleth(&[], "x", &config),
            Err(RenderError::Scale(_))
        ));
    }
}
