//! IndicatorPoint - one output slot of the Ichimoku series.

use serde::{Deserialize, Serialize};

/// Five independently optional Ichimoku fields at one output index.
///
/// Fields accumulate: `tenkan`/`kijun` are written at the bar's own index,
/// `span_a`/`span_b` arrive from the bar `displacement` positions earlier and
/// `chikou` from the bar `displacement` positions later. `None` means "not
/// enough history", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenkan: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kijun: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chikou: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_b: Option<f64>,
}

impl IndicatorPoint {
    /// True if no field has been written.
    pub fn is_empty(&self) -> bool {
        self.tenkan.is_none()
            && self.kijun.is_none()
            && self.chikou.is_none()
            && self.span_a.is_none()
            && self.span_b.is_none()
    }

    /// Both cloud edges, if both are present.
    pub fn spans(&self) -> Option<(f64, f64)> {
        match (self.span_a, self.span_b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    /// True if both cloud edges are present.
    pub fn has_cloud(&self) -> bool {
        self.spans().is_some()
    }

    /// Cloud color at this index: `Some(true)` when Span A >= Span B.
    ///
    /// Ties count as bullish.
    pub fn cloud_bullish(&self) -> Option<bool> {
        self.spans().map(|(a, b)| a >= b)
    }

    /// Cloud edges as (top, bottom) price levels.
    pub fn cloud_bounds(&self) -> Option<(f64, f64)> {
        self.spans().map(|(a, b)| (a.max(b), a.min(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_point_is_empty() {
        let p = IndicatorPoint::default();
        assert!(p.is_empty());
        assert!(!p.has_cloud());
        assert_eq!(p.cloud_bullish(), None);
    }

    #[test]
    fn zero_is_a_value_not_absence() {
        let p = IndicatorPoint {
            span_a: Some(0.0),
            span_b: Some(0.0),
            ..Default::default()
        };
        assert!(!p.is_empty());
        assert_eq!(p.cloud_bullish(), Some(true));
    }

    #[test]
    fn cloud_bounds_orders_edges() {
        let p = IndicatorPoint {
            span_a: Some(3.0),
            span_b: Some(5.0),
            ..Default::default()
        };
        assert_eq!(p.cloud_bullish(), Some(false));
        assert_eq!(p.cloud_bounds(), Some((5.0, 3.0)));
    }

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let p = IndicatorPoint {
            tenkan: Some(7.5),
            ..Default::default()
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"tenkan":7.5}"#);
        let back: IndicatorPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
