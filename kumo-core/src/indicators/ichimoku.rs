//! Ichimoku Cloud - five midpoint series, two of them projected forward and
//! one projected backward.
//!
//! For each bar `i` (in increasing order):
//! - Tenkan[i] = midpoint(high/low over `tenkan_period`), from `i >= tenkan_period - 1`
//! - Kijun[i]  = midpoint(high/low over `kijun_period`), from `i >= kijun_period - 1`
//! - SpanA[i + displacement] = (Tenkan[i] + Kijun[i]) / 2, only when both exist
//! - SpanB[i + displacement] = midpoint(high/low over `senkou_b_period`),
//!   from `i >= senkou_b_period - 1`
//! - Chikou[i - displacement] = close[i], from `i >= displacement`
//!
//! Output length is `bars.len() + displacement`. Slots past the last bar only
//! ever hold projected spans.

use serde::{Deserialize, Serialize};

use super::window::{midpoint, ExtremaStrategy, MonotonicExtrema};
use crate::domain::{Bar, IndicatorPoint};

/// Errors from parameter validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IchimokuError {
    #[error("invalid parameter {name}: {value} (must be between 1 and 100000)")]
    InvalidParameter { name: &'static str, value: i64 },
}

/// Upper bound for every period and the displacement.
pub const MAX_PARAMETER: usize = 100_000;

/// The four Ichimoku parameters. Independent of each other; the usual
/// configuration has `senkou_b_period >= kijun_period >= tenkan_period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IchimokuParams {
    pub tenkan_period: usize,
    pub kijun_period: usize,
    pub senkou_b_period: usize,
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            tenkan_period: 9,
            kijun_period: 26,
            senkou_b_period: 52,
            displacement: 26,
        }
    }
}

fn in_range(name: &'static str, value: i64) -> Result<usize, IchimokuError> {
    match usize::try_from(value) {
        Ok(v) if (1..=MAX_PARAMETER).contains(&v) => Ok(v),
        _ => Err(IchimokuError::InvalidParameter { name, value }),
    }
}

impl IchimokuParams {
    /// Build parameters from raw integers, rejecting zero, negatives and
    /// values above `MAX_PARAMETER`.
    pub fn new(
        tenkan_period: i64,
        kijun_period: i64,
        senkou_b_period: i64,
        displacement: i64,
    ) -> Result<Self, IchimokuError> {
        Ok(Self {
            tenkan_period: in_range("tenkan_period", tenkan_period)?,
            kijun_period: in_range("kijun_period", kijun_period)?,
            senkou_b_period: in_range("senkou_b_period", senkou_b_period)?,
            displacement: in_range("displacement", displacement)?,
        })
    }

    /// Check an already-built value (fields are public, so zero or an
    /// oversized value can sneak in).
    pub fn validate(&self) -> Result<(), IchimokuError> {
        let fields = [
            ("tenkan_period", self.tenkan_period),
            ("kijun_period", self.kijun_period),
            ("senkou_b_period", self.senkou_b_period),
            ("displacement", self.displacement),
        ];
        for (name, value) in fields {
            in_range(name, i64::try_from(value).unwrap_or(i64::MAX))?;
        }
        Ok(())
    }

    /// Output length for `bar_count` input bars, `None` on overflow.
    pub fn output_len(&self, bar_count: usize) -> Option<usize> {
        bar_count.checked_add(self.displacement)
    }
}

impl std::fmt::Display for IchimokuParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ichimoku({},{},{},{})",
            self.tenkan_period, self.kijun_period, self.senkou_b_period, self.displacement
        )
    }
}

/// Deque windows for the three periods, advanced one bar at a time.
struct DequeWindows {
    tenkan: MonotonicExtrema,
    kijun: MonotonicExtrema,
    senkou_b: MonotonicExtrema,
}

impl DequeWindows {
    fn new(params: &IchimokuParams) -> Self {
        Self {
            tenkan: MonotonicExtrema::new(params.tenkan_period),
            kijun: MonotonicExtrema::new(params.kijun_period),
            senkou_b: MonotonicExtrema::new(params.senkou_b_period),
        }
    }

    fn push(&mut self, index: usize, bar: &Bar) -> (Option<f64>, Option<f64>, Option<f64>) {
        self.tenkan.push(index, bar.high, bar.low);
        self.kijun.push(index, bar.high, bar.low);
        self.senkou_b.push(index, bar.high, bar.low);
        (
            self.tenkan.midpoint(),
            self.kijun.midpoint(),
            self.senkou_b.midpoint(),
        )
    }
}

/// Ichimoku calculator with a selectable extrema strategy.
#[derive(Debug, Clone)]
pub struct Ichimoku {
    params: IchimokuParams,
    strategy: ExtremaStrategy,
    name: String,
}

impl Ichimoku {
    pub fn new(params: IchimokuParams) -> Self {
        Self {
            params,
            strategy: ExtremaStrategy::default(),
            name: params.to_string(),
        }
    }

    pub fn with_strategy(mut self, strategy: ExtremaStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> ExtremaStrategy {
        self.strategy
    }

    /// Compute the full output sequence.
    ///
    /// Parameters are validated before any work; an empty `bars` slice yields
    /// `displacement` all-absent points.
    pub fn compute(&self, bars: &[Bar]) -> Result<Vec<IndicatorPoint>, IchimokuError> {
        self.params.validate()?;
        let p = &self.params;
        let d = p.displacement;

        let len = p.output_len(bars.len()).ok_or(IchimokuError::InvalidParameter {
            name: "displacement",
            value: i64::try_from(d).unwrap_or(i64::MAX),
        })?;
        let mut out = vec![IndicatorPoint::default(); len];
        let mut deques = match self.strategy {
            ExtremaStrategy::Rescan => None,
            ExtremaStrategy::MonotonicDeque => Some(DequeWindows::new(p)),
        };

        for (i, bar) in bars.iter().enumerate() {
            let (tenkan_mid, kijun_mid, senkou_b_mid) = match deques.as_mut() {
                Some(windows) => windows.push(i, bar),
                None => (
                    midpoint(bars, i, p.tenkan_period),
                    midpoint(bars, i, p.kijun_period),
                    midpoint(bars, i, p.senkou_b_period),
                ),
            };

            let tenkan = if i + 1 >= p.tenkan_period { tenkan_mid } else { None };
            let kijun = if i + 1 >= p.kijun_period { kijun_mid } else { None };

            if let (Some(t), Some(k)) = (tenkan, kijun) {
                out[i + d].span_a = Some((t + k) / 2.0);
            }
            if i + 1 >= p.senkou_b_period {
                out[i + d].span_b = senkou_b_mid;
            }
            if i >= d {
                out[i - d].chikou = Some(bar.close);
            }
            if tenkan.is_some() {
                out[i].tenkan = tenkan;
            }
            if kijun.is_some() {
                out[i].kijun = kijun;
            }
        }

        tracing::debug!(
            indicator = %self.name,
            strategy = ?self.strategy,
            bars = bars.len(),
            output_len = out.len(),
            "computed ichimoku series"
        );
        Ok(out)
    }
}

/// Compute Ichimoku with the re-scan strategy.
pub fn calculate(
    bars: &[Bar],
    params: &IchimokuParams,
) -> Result<Vec<IndicatorPoint>, IchimokuError> {
    Ichimoku::new(*params).compute(bars)
}
