//! Top-level layout - chart panel with a status bar.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::app::App;
use crate::panels::{IchimokuChartPanel, StatusBar};
use crate::theme::Theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    f.render_widget(
        IchimokuChartPanel::new(
            &app.bars,
            &app.points,
            &app.style,
            app.viewport,
            &app.symbol,
            theme,
        ),
        chunks[0],
    );
    f.render_widget(StatusBar::new(&app.summary, &app.params, theme), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use kumo_core::cloud::CloudStyle;
    use kumo_core::data::generate_synthetic_bars;
    use kumo_core::indicators::IchimokuParams;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn draws_chart_and_status() {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let app = App::new(
            "DEMO",
            generate_synthetic_bars(start, 150, 6),
            IchimokuParams::default(),
            CloudStyle::default(),
        )
        .unwrap();
        let theme = Theme::default();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &app, &theme)).unwrap();

        let buf = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..30 {
            for x in 0..100 {
                text.push_str(buf.cell((x, y)).unwrap().symbol());
            }
        }
        assert!(text.contains("DEMO | 150 bars"));
        assert!(text.contains("ichimoku(9,26,52,26)"));
    }
}
