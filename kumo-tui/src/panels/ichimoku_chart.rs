//! Ichimoku chart panel - candles, cloud fill and the five lines
//!
//! Renders with direct buffer writes, back to front:
//! - Cloud: cell backgrounds, via the core renderer and `CellSurface`
//! - Candles: one column per slot center, block body and `|` wicks
//! - Lines: one `•` per slot for Span A, Span B, Kijun, Tenkan and Chikou
//!
//! The projected slots past the last bar hold only cloud and span lines.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use kumo_core::cloud::{render_cloud, CloudStyle};
use kumo_core::domain::{Bar, IndicatorPoint};

use super::cell_surface::{CellMapper, CellSurface};
use crate::app::Viewport;
use crate::navigation::key_bindings_help;
use crate::theme::Theme;

/// Width reserved for the price axis labels.
const LABEL_WIDTH: u16 = 9;

pub struct IchimokuChartPanel<'a> {
    bars: &'a [Bar],
    points: &'a [IndicatorPoint],
    style: &'a CloudStyle,
    viewport: Viewport,
    symbol: &'a str,
    theme: &'a Theme,
}

impl<'a> IchimokuChartPanel<'a> {
    pub fn new(
        bars: &'a [Bar],
        points: &'a [IndicatorPoint],
        style: &'a CloudStyle,
        viewport: Viewport,
        symbol: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            bars,
            points,
            style,
            viewport,
            symbol,
            theme,
        }
    }

    /// Price bounds over every bar and series value in `from..to`.
    fn price_bounds(&self, from: usize, to: usize) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for bar in self.bars.get(from..to.min(self.bars.len())).unwrap_or(&[]) {
            lo = lo.min(bar.low);
            hi = hi.max(bar.high);
        }
        for p in self.points.get(from..to.min(self.points.len())).unwrap_or(&[]) {
            for v in [p.tenkan, p.kijun, p.chikou, p.span_a, p.span_b]
                .into_iter()
                .flatten()
            {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
    }

    fn draw_candles(&self, mapper: &CellMapper, from: usize, to: usize, buf: &mut Buffer) {
        for index in from..to.min(self.bars.len()) {
            let Some(x) = mapper.column(index) else {
                continue;
            };
            let bar = &self.bars[index];
            let style = Style::default().fg(self.theme.candle_color(bar.is_up()));

            let high_y = mapper.row(bar.high);
            let low_y = mapper.row(bar.low);
            let body_top_y = mapper.row(bar.open.max(bar.close));
            let body_bot_y = mapper.row(bar.open.min(bar.close));

            for y in high_y..body_top_y {
                buf.set_string(x, y, "|", style);
            }
            let body_char = if bar.is_up() { "\u{2588}" } else { "\u{2593}" };
            for y in body_top_y..=body_bot_y {
                buf.set_string(x, y, body_char, style);
            }
            for y in (body_bot_y + 1)..=low_y {
                buf.set_string(x, y, "|", style);
            }
        }
    }

    fn draw_lines(&self, mapper: &CellMapper, from: usize, to: usize, buf: &mut Buffer) {
        let series: [(fn(&IndicatorPoint) -> Option<f64>, Color); 5] = [
            (|p| p.span_a, self.theme.span_a),
            (|p| p.span_b, self.theme.span_b),
            (|p| p.kijun, self.theme.kijun),
            (|p| p.tenkan, self.theme.tenkan),
            (|p| p.chikou, self.theme.chikou),
        ];
        for (value, color) in series {
            let style = Style::default().fg(color);
            for index in from..to.min(self.points.len()) {
                let (Some(x), Some(v)) = (mapper.column(index), value(&self.points[index])) else {
                    continue;
                };
                buf.set_string(x, mapper.row(v), "\u{2022}", style);
            }
        }
    }
}

impl<'a> Widget for IchimokuChartPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.bars.is_empty() {
            let block = Block::default()
                .title(format!(" Ichimoku: {} [No Data] ", self.symbol))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background));
            block.render(area, buf);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));
        let inner = block.inner(area);

        let plot = Rect::new(
            inner.x + LABEL_WIDTH.min(inner.width),
            inner.y,
            inner.width.saturating_sub(LABEL_WIDTH),
            inner.height.saturating_sub(1),
        );
        let visible = self.viewport.visible_range(self.points.len(), plot.width);
        let (from, to) = (visible.start, visible.end);

        let title = format!(
            " {} | {} bars | slots {}..{} | x{} ",
            self.symbol,
            self.bars.len(),
            from,
            to,
            self.viewport.zoom,
        );
        block.title(title).render(area, buf);

        if plot.width == 0 || plot.height == 0 {
            return;
        }
        let Some((lo, hi)) = self.price_bounds(from, to) else {
            return;
        };
        let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
        let mapper = CellMapper {
            plot,
            from,
            zoom: self.viewport.zoom,
            lower: lo - pad,
            upper: hi + pad,
        };

        // Price axis
        let labels = [mapper.upper, (mapper.upper + mapper.lower) / 2.0, mapper.lower];
        let rows = [plot.y, plot.y + plot.height / 2, plot.y + plot.height - 1];
        for (value, y) in labels.iter().zip(rows) {
            buf.set_string(
                inner.x,
                y,
                format!("{value:>8.2}"),
                Style::default().fg(self.theme.muted),
            );
        }

        let outcome = {
            let mut surface = CellSurface::new(buf, plot, self.theme);
            render_cloud(self.points, visible, &mapper, &mut surface, self.style)
        };
        self.draw_candles(&mapper, from, to, buf);
        if outcome.draw_default_lines {
            self.draw_lines(&mapper, from, to, buf);
        }

        let info_y = plot.y + plot.height;
        if info_y < inner.y + inner.height {
            let hints: Vec<String> = key_bindings_help()
                .iter()
                .map(|(keys, action)| format!("{keys} {action}"))
                .collect();
            let info = format!(
                "{} cloud segment(s) | {}",
                outcome.segments_drawn,
                hints.join("  ")
            );
            buf.set_stringn(
                plot.x,
                info_y,
                info,
                plot.width as usize,
                Style::default().fg(self.theme.muted),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kumo_core::data::generate_synthetic_bars;
    use kumo_core::indicators::{calculate, IchimokuParams};

    fn content(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
        }
        s
    }

    fn series(n: usize, seed: u64) -> (Vec<Bar>, Vec<IndicatorPoint>) {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = generate_synthetic_bars(start, n, seed);
        let points = calculate(&bars, &IchimokuParams::default()).unwrap();
        (bars, points)
    }

    fn render(bars: &[Bar], points: &[IndicatorPoint], viewport: Viewport, area: Rect) -> Buffer {
        let theme = Theme::default();
        let style = CloudStyle::default();
        let mut buf = Buffer::empty(area);
        IchimokuChartPanel::new(bars, points, &style, viewport, "SPY", &theme).render(area, &mut buf);
        buf
    }

    #[test]
    fn empty_bars_show_no_data() {
        let area = Rect::new(0, 0, 60, 20);
        let buf = render(&[], &[], Viewport::default(), area);
        assert!(content(&buf, area).contains("No Data"));
    }

    #[test]
    fn title_and_footer_describe_view() {
        let (bars, points) = series(120, 2);
        let area = Rect::new(0, 0, 100, 30);
        let buf = render(&bars, &points, Viewport::default(), area);
        let text = content(&buf, area);
        assert!(text.contains("SPY | 120 bars"));
        assert!(text.contains("cloud segment(s)"));
    }

    #[test]
    fn cloud_cells_use_blended_fill() {
        let (bars, points) = series(200, 4);
        let area = Rect::new(0, 0, 120, 40);
        let buf = render(&bars, &points, Viewport::default(), area);

        let theme = Theme::default();
        let style = CloudStyle::default();
        let fills = [theme.blend(style.bullish), theme.blend(style.bearish)];
        let mut filled = 0;
        for y in 0..area.height {
            for x in 0..area.width {
                if fills.contains(&buf.cell((x, y)).unwrap().bg) {
                    filled += 1;
                }
            }
        }
        assert!(filled > 0, "no cloud cells painted");
    }

    #[test]
    fn projected_slots_have_lines_but_no_candles() {
        let (bars, points) = series(100, 8);
        let area = Rect::new(0, 0, 80, 30);
        // zoom 1: 69 plot columns, range 57..126 ends in 26 projected slots.
        let viewport = Viewport { offset: 0, zoom: 1 };
        let buf = render(&bars, &points, viewport, area);

        let plot_x = 1 + LABEL_WIDTH;
        let last_slot_col = plot_x + 68;
        let mut column = String::new();
        for y in 1..area.height - 1 {
            column.push_str(buf.cell((last_slot_col, y)).unwrap().symbol());
        }
        assert!(!column.contains('\u{2588}') && !column.contains('\u{2593}'));
        assert!(column.contains('\u{2022}'));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let (bars, points) = series(60, 1);
        for (w, h) in [(1, 1), (5, 3), (12, 4)] {
            let area = Rect::new(0, 0, w, h);
            render(&bars, &points, Viewport::default(), area);
        }
    }
}
