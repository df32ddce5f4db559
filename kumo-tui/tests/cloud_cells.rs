//! The terminal host paints each cloud segment in its own color.

use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use kumo_core::cloud::{render_cloud, CloudStyle};
use kumo_core::domain::{Bar, IndicatorPoint};
use kumo_core::indicators::{calculate, IchimokuParams};
use kumo_tui::app::Viewport;
use kumo_tui::panels::{CellMapper, CellSurface, IchimokuChartPanel};
use kumo_tui::Theme;

fn spans(data: &[(f64, f64)]) -> Vec<IndicatorPoint> {
    data.iter()
        .map(|&(a, b)| IndicatorPoint {
            span_a: Some(a),
            span_b: Some(b),
            ..Default::default()
        })
        .collect()
}

fn count_bg(buf: &Buffer, area: Rect, color: ratatui::style::Color) -> usize {
    let mut n = 0;
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if buf.cell((x, y)).map(|c| c.bg) == Some(color) {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn sign_flip_paints_both_colors() {
    // Wide bullish cloud for 4 slots, then wide bearish for 4.
    let points = spans(&[
        (90.0, 10.0),
        (90.0, 10.0),
        (90.0, 10.0),
        (90.0, 10.0),
        (10.0, 90.0),
        (10.0, 90.0),
        (10.0, 90.0),
        (10.0, 90.0),
    ]);
    let area = Rect::new(0, 0, 16, 20);
    let mapper = CellMapper {
        plot: area,
        from: 0,
        zoom: 2,
        lower: 0.0,
        upper: 100.0,
    };
    let theme = Theme::default();
    let style = CloudStyle::default();
    let mut buf = Buffer::empty(area);
    let outcome = {
        let mut surface = CellSurface::new(&mut buf, area, &theme);
        render_cloud(&points, 0..points.len(), &mapper, &mut surface, &style)
    };

    assert_eq!(outcome.segments_drawn, 2);
    assert!(outcome.draw_default_lines);
    assert!(count_bg(&buf, area, theme.blend(style.bullish)) > 0);
    assert!(count_bg(&buf, area, theme.blend(style.bearish)) > 0);
}

#[test]
fn flat_series_chart_renders() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars: Vec<Bar> = (0..60)
        .map(|i| Bar {
            date: start + chrono::Duration::days(i),
            open: 10.0,
            high: 10.0,
            low: 10.0,
            close: 10.0,
            volume: 0,
        })
        .collect();
    let points = calculate(&bars, &IchimokuParams::default()).unwrap();
    let theme = Theme::default();
    let style = CloudStyle::default();
    let area = Rect::new(0, 0, 80, 20);
    let mut buf = Buffer::empty(area);
    IchimokuChartPanel::new(&bars, &points, &style, Viewport::default(), "FLAT", &theme)
        .render(area, &mut buf);

    // A zero-width cloud covers no cell centers.
    assert_eq!(count_bg(&buf, area, theme.blend(style.bullish)), 0);
}
