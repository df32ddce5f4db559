//! Linear index/price to pixel mapping.
//!
//! A plain `CoordinateMapper` for hosts without their own axis model (the
//! CLI, tests). Index `from` maps to the center of the first bar slot; price
//! `top` maps to y = 0 and `bottom` to y = `height`.

use std::ops::Range;

use super::CoordinateMapper;
use crate::domain::IndicatorPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMapper {
    pub from: usize,
    pub bar_spacing: f64,
    pub top: f64,
    pub bottom: f64,
    pub height: f64,
}

impl LinearMapper {
    /// Fit the visible `range` into `width` x `height` pixels, with price
    /// bounds taken from every present series value in the range.
    pub fn fit(points: &[IndicatorPoint], range: Range<usize>, width: f64, height: f64) -> Self {
        let slots = range.end.saturating_sub(range.start).max(1);
        let mut top = f64::NEG_INFINITY;
        let mut bottom = f64::INFINITY;
        let end = range.end.min(points.len());
        if range.start < end {
            for point in &points[range.start..end] {
                for value in [point.tenkan, point.kijun, point.chikou, point.span_a, point.span_b]
                    .into_iter()
                    .flatten()
                {
                    top = top.max(value);
                    bottom = bottom.min(value);
                }
            }
        }
        if !top.is_finite() || !bottom.is_finite() {
            top = 1.0;
            bottom = 0.0;
        }
        Self {
            from: range.start,
            bar_spacing: width / slots as f64,
            top,
            bottom,
            height,
        }
    }
}

impl CoordinateMapper for LinearMapper {
    fn index_to_x(&self, index: usize) -> f64 {
        (index as f64 - self.from as f64 + 0.5) * self.bar_spacing
    }

    fn price_to_y(&self, price: f64) -> f64 {
        let span = self.top - self.bottom;
        if span.abs() < 1e-12 {
            return self.height / 2.0;
        }
        (self.top - price) / span * self.height
    }
}
