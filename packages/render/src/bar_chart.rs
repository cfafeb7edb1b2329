//! Bar chart of grouped aggregates.
//!
//! One bar per group, keyed along a band X axis. The Y axis is linear
//! from zero to the largest metric value, rounded out to a tick.

use prison_viz_analytics::scale::{BandScale, LinearScale, extent};
use prison_viz_dashboard_models::{BarChartConfig, Canvas as _};
use prison_viz_records_models::{Aggregate, BarMetric, GroupColumn};

use crate::svg::{Document, label, num};

/// Renders `aggregates` as an SVG bar chart plotting `metric` per group
/// of `column`.
///
/// Groups whose metric is `NaN` get a zero-height bar; their tooltip
/// reads "no data". An empty aggregate list renders the axes frame with
/// a "No data" notice.
#[must_use]
pub fn render_bar_chart(
    aggregates: &[Aggregate],
    metric: BarMetric,
    column: &GroupColumn,
    config: &BarChartConfig,
) -> String {
    let margin = config.margin;
    let inner_w = config.inner_width();
    let inner_h = config.inner_height();

    let values: Vec<f64> = aggregates.iter().map(|a| a.metric(metric)).collect();
    let max = extent(values.iter().copied()).map_or(0.0, |(_, hi)| hi.max(0.0));
    let y = LinearScale::new((0.0, if max > 0.0 { max } else { 1.0 }), (inner_h, 0.0))
        .nice(config.ticks);
    let x = BandScale::new(aggregates.len(), (0.0, inner_w), config.padding);

    let mut doc = Document::new(config.width, config.height);
    doc.line(&format!(
        r#"<g transform="translate({},{})">"#,
        num(margin.left),
        num(margin.top)
    ));

    // Y axis with gridlines.
    doc.line(r#"<g class="y-axis" fill="currentColor" text-anchor="end">"#);
    doc.line(&format!(
        r#"<line x1="0" y1="0" x2="0" y2="{}" stroke="currentColor"/>"#,
        num(inner_h)
    ));
    for tick in y.ticks(config.ticks) {
        let ty = y.map(tick);
        doc.line(&format!(
            r##"<line x1="-6" y1="{ty}" x2="{w}" y2="{ty}" stroke="#e0e0e0"/>"##,
            ty = num(ty),
            w = num(inner_w)
        ));
        doc.text(-9.0, ty, r#"dy="0.32em""#, &label(tick));
    }
    doc.line("</g>");

    // X axis with one label per band.
    doc.line(&format!(
        r#"<g class="x-axis" transform="translate(0,{})" fill="currentColor" text-anchor="middle">"#,
        num(inner_h)
    ));
    doc.line(&format!(
        r#"<line x1="0" y1="0" x2="{}" y2="0" stroke="currentColor"/>"#,
        num(inner_w)
    ));
    for (i, aggregate) in aggregates.iter().enumerate() {
        let cx = x.position(i) + x.bandwidth() / 2.0;
        doc.text(cx, 18.0, "", &aggregate.key);
    }
    doc.line("</g>");

    doc.line(&format!(
        r#"<g class="bars" fill="{}">"#,
        crate::svg::escape(&config.bar_color)
    ));
    for (i, (aggregate, value)) in aggregates.iter().zip(&values).enumerate() {
        let top = if value.is_finite() {
            y.map(*value).clamp(0.0, inner_h)
        } else {
            inner_h
        };
        doc.line(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"><title>{}: {}</title></rect>"#,
            num(x.position(i)),
            num(top),
            num(x.bandwidth()),
            num(inner_h - top),
            crate::svg::escape(&aggregate.key),
            label(*value)
        ));
    }
    doc.line("</g>");

    if aggregates.is_empty() {
        doc.text(
            inner_w / 2.0,
            inner_h / 2.0,
            r#"class="empty" text-anchor="middle" font-size="14""#,
            "No data",
        );
    }

    // Axis titles.
    doc.text(
        inner_w / 2.0,
        inner_h + margin.bottom - 8.0,
        r#"class="x-label" text-anchor="middle" font-size="12""#,
        &column.label(),
    );
    doc.text(
        -inner_h / 2.0,
        -margin.left + 14.0,
        r#"class="y-label" text-anchor="middle" font-size="12" transform="rotate(-90)""#,
        metric.label(),
    );

    doc.line("</g>");
    doc.finish()
}
