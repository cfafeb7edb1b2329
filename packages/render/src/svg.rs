//! Minimal SVG string building.

use std::fmt::Write as _;

/// Escapes text for use in XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
pub fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Formats a data value for labels and tooltips. `NaN` reads as
/// "no data".
pub fn label(value: f64) -> String {
    if value.is_nan() {
        "no data".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        num(value)
    }
}

/// An SVG document under construction.
pub struct Document {
    buf: String,
}

impl Document {
    pub fn new(width: f64, height: f64) -> Self {
        let mut buf = String::new();
        let (w, h) = (num(width), num(height));
        let _ = writeln!(
            buf,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="11">"#
        );
        Self { buf }
    }

    /// Appends one raw line of markup.
    pub fn line(&mut self, markup: &str) {
        self.buf.push_str(markup);
        self.buf.push('\n');
    }

    /// Appends a `<text>` element with escaped content.
    pub fn text(&mut self, x: f64, y: f64, attrs: &str, content: &str) {
        let _ = writeln!(
            self.buf,
            r#"<text x="{}" y="{}" {attrs}>{}</text>"#,
            num(x),
            num(y),
            escape(content)
        );
    }

    pub fn finish(mut self) -> String {
        self.buf.push_str("</svg>\n");
        self.buf
    }
}
