//! Read-only views over a computed Ichimoku series.
//!
//! - `cloud_bias`: where a close sits relative to the cloud at its index
//! - `tk_crosses`: Tenkan/Kijun crossovers
//! - `IchimokuSummary`: state at the last bar and at the end of the projection

use serde::Serialize;

use crate::domain::{Bar, IndicatorPoint};

/// Position of a price relative to the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CloudBias {
    Above,
    Inside,
    Below,
}

impl std::fmt::Display for CloudBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CloudBias::Above => "above cloud",
            CloudBias::Inside => "inside cloud",
            CloudBias::Below => "below cloud",
        };
        f.write_str(label)
    }
}

/// Classify `close` against the cloud at the same index. Cloud edges count
/// as inside.
pub fn cloud_bias(close: f64, point: &IndicatorPoint) -> Option<CloudBias> {
    let (top, bottom) = point.cloud_bounds()?;
    Some(if close > top {
        CloudBias::Above
    } else if close < bottom {
        CloudBias::Below
    } else {
        CloudBias::Inside
    })
}

/// Tenkan crossing Kijun. `bullish` means Tenkan moved above Kijun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TkCross {
    pub index: usize,
    pub bullish: bool,
}

/// Indices where the sign of `tenkan - kijun` changes.
///
/// Only indices with both lines present are compared; an index where the
/// lines are equal keeps the previous sign.
pub fn tk_crosses(points: &[IndicatorPoint]) -> Vec<TkCross> {
    let mut crosses = Vec::new();
    let mut prev_above: Option<bool> = None;
    for (index, point) in points.iter().enumerate() {
        let (Some(t), Some(k)) = (point.tenkan, point.kijun) else {
            continue;
        };
        if t == k {
            continue;
        }
        let above = t > k;
        if let Some(prev) = prev_above {
            if prev != above {
                crosses.push(TkCross { index, bullish: above });
            }
        }
        prev_above = Some(above);
    }
    crosses
}

/// Snapshot of the indicator state at the last bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IchimokuSummary {
    pub bars: usize,
    pub last_close: Option<f64>,
    pub bias: Option<CloudBias>,
    pub last_cross: Option<TkCross>,
    /// Cloud color at the last bar.
    pub cloud_bullish_now: Option<bool>,
    /// Cloud color at the far end of the forward projection.
    pub cloud_bullish_ahead: Option<bool>,
}

impl IchimokuSummary {
    pub fn from_series(bars: &[Bar], points: &[IndicatorPoint]) -> Self {
        let last = bars.len().checked_sub(1);
        let last_close = last.map(|i| bars[i].close);
        let at_last = last.and_then(|i| points.get(i));
        Self {
            bars: bars.len(),
            last_close,
            bias: match (last_close, at_last) {
                (Some(close), Some(point)) => cloud_bias(close, point),
                _ => None,
            },
            last_cross: tk_crosses(points).last().copied(),
            cloud_bullish_now: at_last.and_then(IndicatorPoint::cloud_bullish),
            cloud_bullish_ahead: points.last().and_then(IndicatorPoint::cloud_bullish),
        }
    }
}

/// `bullish` / `bearish` / `n/a` for a cloud color.
pub fn color_label(bullish: Option<bool>) -> &'static str {
    match bullish {
        Some(true) => "bullish",
        Some(false) => "bearish",
        None => "n/a",
    }
}

impl std::fmt::Display for IchimokuSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "bars:          {}", self.bars)?;
        match self.last_close {
            Some(close) => writeln!(f, "last close:    {close:.4}")?,
            None => writeln!(f, "last close:    n/a")?,
        }
        match self.bias {
            Some(bias) => writeln!(f, "price:         {bias}")?,
            None => writeln!(f, "price:         n/a")?,
        }
        match self.last_cross {
            Some(cross) => writeln!(
                f,
                "last TK cross: {} at bar {}",
                if cross.bullish { "bullish" } else { "bearish" },
                cross.index
            )?,
            None => writeln!(f, "last TK cross: none")?,
        }
        writeln!(f, "cloud now:     {}", color_label(self.cloud_bullish_now))?;
        write!(f, "cloud ahead:   {}", color_label(self.cloud_bullish_ahead))
    }
}
