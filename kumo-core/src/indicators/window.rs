//! Trailing-window extrema over bar highs and lows.
//!
//! The window ending at `end` covers `[max(0, end - period + 1), end]`. Near
//! the start of the series it is clamped rather than rejected, so early
//! indices see a shorter window. Callers decide when a value counts as a
//! full-period value.
//!
//! Two equivalent strategies:
//! - `highest_high` / `lowest_low`: direct re-scan, O(period) per call.
//! - `MonotonicExtrema`: monotonic deques of (index, value), amortized O(1)
//!   per bar. Produces the same values as the re-scan, warm-up included.

use std::collections::VecDeque;

use crate::domain::Bar;

/// Which extrema implementation the calculator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtremaStrategy {
    #[default]
    Rescan,
    MonotonicDeque,
}

/// Start index of the clamped window ending at `end`.
fn window_start(end: usize, period: usize) -> usize {
    (end + 1).saturating_sub(period)
}

/// Highest `high` over the clamped window ending at `end`.
///
/// Returns `None` for `period == 0` or `end` past the last bar.
pub fn highest_high(bars: &[Bar], end: usize, period: usize) -> Option<f64> {
    if period == 0 || end >= bars.len() {
        return None;
    }
    let window = &bars[window_start(end, period)..=end];
    let mut max_val = window[0].high;
    for bar in &window[1..] {
        if bar.high > max_val {
            max_val = bar.high;
        }
    }
    Some(max_val)
}

/// Lowest `low` over the clamped window ending at `end`.
///
/// Returns `None` for `period == 0` or `end` past the last bar.
pub fn lowest_low(bars: &[Bar], end: usize, period: usize) -> Option<f64> {
    if period == 0 || end >= bars.len() {
        return None;
    }
    let window = &bars[window_start(end, period)..=end];
    let mut min_val = window[0].low;
    for bar in &window[1..] {
        if bar.low < min_val {
            min_val = bar.low;
        }
    }
    Some(min_val)
}

/// Midpoint of the clamped window: (highest high + lowest low) / 2.
pub fn midpoint(bars: &[Bar], end: usize, period: usize) -> Option<f64> {
    Some((highest_high(bars, end, period)? + lowest_low(bars, end, period)?) / 2.0)
}

/// Sliding max-high / min-low over a fixed period.
///
/// Bars must be pushed with consecutive indices starting at 0. Each deque
/// keeps indices in increasing order with values strictly decreasing
/// (highs) or strictly increasing (lows), so the front is the extremum of
/// the current window.
#[derive(Debug, Clone)]
pub struct MonotonicExtrema {
    period: usize,
    highs: VecDeque<(usize, f64)>,
    lows: VecDeque<(usize, f64)>,
}

impl MonotonicExtrema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "MonotonicExtrema period must be >= 1");
        Self {
            period,
            highs: VecDeque::with_capacity(period),
            lows: VecDeque::with_capacity(period),
        }
    }

    /// Push the bar at `index` and evict entries that left the window.
    pub fn push(&mut self, index: usize, high: f64, low: f64) {
        while let Some(&(_, back)) = self.highs.back() {
            if back <= high {
                self.highs.pop_back();
            } else {
                break;
            }
        }
        self.highs.push_back((index, high));

        while let Some(&(_, back)) = self.lows.back() {
            if back >= low {
                self.lows.pop_back();
            } else {
                break;
            }
        }
        self.lows.push_back((index, low));

        let start = window_start(index, self.period);
        while let Some(&(i, _)) = self.highs.front() {
            if i < start {
                self.highs.pop_front();
            } else {
                break;
            }
        }
        while let Some(&(i, _)) = self.lows.front() {
            if i < start {
                self.lows.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn highest(&self) -> Option<f64> {
        self.highs.front().map(|&(_, v)| v)
    }

    pub fn lowest(&self) -> Option<f64> {
        self.lows.front().map(|&(_, v)| v)
    }

    /// (highest + lowest) / 2 over the current window.
    pub fn midpoint(&self) -> Option<f64> {
        Some((self.highest()? + self.lowest()?) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_hlc_bars, DEFAULT_EPSILON};

    fn sample() -> Vec<Bar> {
        make_hlc_bars(&[
            (12.0, 9.0, 11.0),
            (15.0, 10.0, 14.0),
            (14.0, 13.0, 13.5),
            (16.0, 12.0, 15.0),
            (15.5, 14.0, 14.5),
        ])
    }

    #[test]
    fn rescan_full_window() {
        let bars = sample();
        assert_eq!(highest_high(&bars, 2, 3), Some(15.0));
        assert_eq!(highest_high(&bars, 3, 3), Some(16.0));
        assert_eq!(lowest_low(&bars, 3, 3), Some(10.0));
        assert_eq!(lowest_low(&bars, 4, 3), Some(12.0));
    }

    #[test]
    fn rescan_clamps_at_series_start() {
        let bars = sample();
        // Window [0, 1] instead of failing on a negative start.
        assert_eq!(highest_high(&bars, 1, 5), Some(15.0));
        assert_eq!(lowest_low(&bars, 1, 5), Some(9.0));
        assert_eq!(highest_high(&bars, 0, 52), Some(12.0));
    }

    #[test]
    fn rescan_single_bar_window() {
        let bars = sample();
        assert_eq!(highest_high(&bars, 3, 1), Some(16.0));
        assert_eq!(lowest_low(&bars, 3, 1), Some(12.0));
        // First slot of the window holds the extremum.
        assert_eq!(highest_high(&bars, 2, 2), Some(15.0));
        assert_eq!(lowest_low(&bars, 2, 2), Some(10.0));
    }

    #[test]
    fn rescan_rejects_bad_inputs() {
        let bars = sample();
        assert_eq!(highest_high(&bars, 0, 0), None);
        assert_eq!(lowest_low(&bars, 5, 3), None);
        assert_eq!(midpoint(&[], 0, 3), None);
    }

    #[test]
    fn midpoint_of_window() {
        let bars = sample();
        // max(15, 14, 16) = 16, min(10, 13, 12) = 10
        assert_approx(midpoint(&bars, 3, 3).unwrap(), 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn deque_matches_rescan_on_every_index() {
        let bars = sample();
        for period in 1..=6 {
            let mut window = MonotonicExtrema::new(period);
            for (i, bar) in bars.iter().enumerate() {
                window.push(i, bar.high, bar.low);
                assert_eq!(window.highest(), highest_high(&bars, i, period), "period {period} i {i}");
                assert_eq!(window.lowest(), lowest_low(&bars, i, period), "period {period} i {i}");
                assert_eq!(window.midpoint(), midpoint(&bars, i, period));
            }
        }
    }

    #[test]
    fn deque_evicts_old_extremum() {
        let mut window = MonotonicExtrema::new(2);
        window.push(0, 100.0, 1.0);
        window.push(1, 50.0, 40.0);
        assert_eq!(window.highest(), Some(100.0));
        window.push(2, 60.0, 45.0);
        // Bar 0 has left the window.
        assert_eq!(window.highest(), Some(60.0));
        assert_eq!(window.lowest(), Some(40.0));
    }

    #[test]
    fn deque_empty_has_no_extrema() {
        let window = MonotonicExtrema::new(3);
        assert_eq!(window.highest(), None);
        assert_eq!(window.midpoint(), None);
    }

    #[test]
    #[should_panic(expected = "period must be >= 1")]
    fn deque_rejects_zero_period() {
        MonotonicExtrema::new(0);
    }
}
