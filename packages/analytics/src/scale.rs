//! Linear and band scales for chart layout.
//!
//! These map data space onto pixel space: [`LinearScale`] for
//! continuous values (the bar chart's Y axis, projection axes) and
//! [`BandScale`] for categorical keys (the bar chart's X axis).

/// Returns the `(min, max)` of the finite values in `values`, or `None`
/// if there are none.
#[must_use]
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Continuous linear mapping from a domain interval onto a range interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Maps `value` from the domain onto the range.
    ///
    /// A degenerate domain maps every value to the start of the range.
    /// Values outside the domain extrapolate linearly.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Extends the domain outward to round tick boundaries.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let (mut d0, mut d1) = self.domain;
        if d0 == d1 || !d0.is_finite() || !d1.is_finite() {
            return self;
        }
        for _ in 0..2 {
            let step = tick_step(d0, d1, count);
            d0 = (d0 / step).floor() * step;
            d1 = (d1 / step).ceil() * step;
        }
        Self {
            domain: (d0, d1),
            range: self.range,
        }
    }

    /// Returns roughly `count` round tick values inside the domain.
    ///
    /// Steps are 1, 2, or 5 times a power of ten.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = self.domain;
        if !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let (lo, hi) = if start < stop {
            (start, stop)
        } else {
            (stop, start)
        };

        let step = tick_step(lo, hi, count);
        // Dividing by the inverse step keeps fractional ticks exact
        // (0.6 rather than 0.6000000000000001).
        let inverse = if step < 1.0 { (1.0 / step).round() } else { 0.0 };
        let (first, last) = if inverse > 0.0 {
            ((lo * inverse).ceil(), (hi * inverse).floor())
        } else {
            ((lo / step).ceil(), (hi / step).floor())
        };

        let mut ticks = Vec::new();
        let mut i = first;
        while i <= last {
            ticks.push(if inverse > 0.0 { i / inverse } else { i * step });
            i += 1.0;
        }
        ticks
    }
}

#[allow(clippy::cast_precision_loss)]
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start).abs() / count.max(1) as f64;
    let mut step = 10f64.powf(raw.log10().floor());
    let error = raw / step;
    if error >= 50f64.sqrt() {
        step *= 10.0;
    } else if error >= 10f64.sqrt() {
        step *= 5.0;
    } else if error >= 2f64.sqrt() {
        step *= 2.0;
    }
    step
}

/// Evenly spaced bands for categorical values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    len: usize,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    /// Creates a scale of `len` bands spread over `range`.
    ///
    /// `padding` is used for both inner and outer padding, as a fraction
    /// of the step (clamped to `[0, 1)`).
    #[must_use]
    pub fn new(len: usize, range: (f64, f64), padding: f64) -> Self {
        let padding = padding.clamp(0.0, 0.99);
        Self {
            len,
            range,
            padding_inner: padding,
            padding_outer: padding,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.len as f64;
        let denom = (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        (r1 - r0) / denom
    }

    /// Width of one band.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Start coordinate of band `index`. Bands are centered in the range.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let step = self.step();
        let used = step * (self.len as f64 - self.padding_inner);
        let start = r0 + (r1 - r0 - used) / 2.0;
        start + step * index as f64
    }
}
