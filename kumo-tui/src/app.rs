//! Application state - single-owner, main-thread only.

use std::ops::Range;

use kumo_core::cloud::CloudStyle;
use kumo_core::domain::{Bar, IndicatorPoint};
use kumo_core::indicators::{calculate, IchimokuError, IchimokuParams};
use kumo_core::signals::IchimokuSummary;

/// Terminal columns per output slot.
pub const MIN_ZOOM: u16 = 1;
pub const MAX_ZOOM: u16 = 6;

/// Which part of the series is on screen.
///
/// `offset` counts slots scrolled back from the right edge (the end of the
/// forward projection), so new data stays pinned to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset: usize,
    pub zoom: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { offset: 0, zoom: 2 }
    }
}

impl Viewport {
    /// Visible half-open slot range for `total` slots on `columns` columns.
    pub fn visible_range(&self, total: usize, columns: u16) -> Range<usize> {
        let slots = (columns / self.zoom.max(1)) as usize;
        let end = total.saturating_sub(self.offset);
        end.saturating_sub(slots)..end
    }
}

pub struct App {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub points: Vec<IndicatorPoint>,
    pub params: IchimokuParams,
    pub style: CloudStyle,
    pub viewport: Viewport,
    pub summary: IchimokuSummary,
    pub running: bool,
}

impl App {
    pub fn new(
        symbol: impl Into<String>,
        bars: Vec<Bar>,
        params: IchimokuParams,
        style: CloudStyle,
    ) -> Result<Self, IchimokuError> {
        let points = calculate(&bars, &params)?;
        let summary = IchimokuSummary::from_series(&bars, &points);
        Ok(Self {
            symbol: symbol.into(),
            bars,
            points,
            params,
            style,
            viewport: Viewport::default(),
            summary,
            running: true,
        })
    }

    /// Recompute the series with new parameters. On error nothing changes.
    pub fn set_params(&mut self, params: IchimokuParams) -> Result<(), IchimokuError> {
        self.points = calculate(&self.bars, &params)?;
        self.summary = IchimokuSummary::from_series(&self.bars, &self.points);
        self.params = params;
        self.clamp_offset();
        Ok(())
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn scroll_left(&mut self, slots: usize) {
        self.viewport.offset = self.viewport.offset.saturating_add(slots);
        self.clamp_offset();
    }

    pub fn scroll_right(&mut self, slots: usize) {
        self.viewport.offset = self.viewport.offset.saturating_sub(slots);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom = (self.viewport.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom = self.viewport.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    pub fn reset_view(&mut self) {
        self.viewport = Viewport::default();
    }

    /// Keep at least one slot on screen.
    fn clamp_offset(&mut self) {
        let max = self.points.len().saturating_sub(1);
        self.viewport.offset = self.viewport.offset.min(max);
    }
}
