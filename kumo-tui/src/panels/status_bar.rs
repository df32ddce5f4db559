//! Bottom status bar - params, price vs cloud, last TK cross, cloud ahead.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use kumo_core::indicators::IchimokuParams;
use kumo_core::signals::{color_label, CloudBias, IchimokuSummary};

use crate::theme::Theme;

pub struct StatusBar<'a> {
    summary: &'a IchimokuSummary,
    params: &'a IchimokuParams,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(summary: &'a IchimokuSummary, params: &'a IchimokuParams, theme: &'a Theme) -> Self {
        Self {
            summary,
            params,
            theme,
        }
    }

    fn bullish_style(&self, bullish: Option<bool>) -> Style {
        match bullish {
            Some(true) => Style::default().fg(self.theme.up),
            Some(false) => Style::default().fg(self.theme.down),
            None => Style::default().fg(self.theme.muted),
        }
    }

    fn line(&self) -> Line<'static> {
        let muted = Style::default().fg(self.theme.muted);
        let s = self.summary;

        let mut spans = vec![Span::styled(format!(" {} ", self.params), muted), Span::raw("| ")];

        match s.bias {
            Some(bias) => {
                let style = match bias {
                    CloudBias::Above => self.bullish_style(Some(true)),
                    CloudBias::Below => self.bullish_style(Some(false)),
                    CloudBias::Inside => muted,
                };
                spans.push(Span::styled(bias.to_string(), style));
            }
            None => spans.push(Span::styled("no cloud", muted)),
        }
        spans.push(Span::raw(" | TK "));

        match s.last_cross {
            Some(cross) => spans.push(Span::styled(
                format!(
                    "{} @{}",
                    if cross.bullish { "up" } else { "down" },
                    cross.index
                ),
                self.bullish_style(Some(cross.bullish)),
            )),
            None => spans.push(Span::styled("none", muted)),
        }

        spans.push(Span::raw(" | ahead "));
        spans.push(Span::styled(
            color_label(s.cloud_bullish_ahead),
            self.bullish_style(s.cloud_bullish_ahead),
        ));
        Line::from(spans)
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line())
            .style(Style::default().fg(self.theme.text_primary).bg(self.theme.background))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kumo_core::domain::IndicatorPoint;
    use kumo_core::signals::TkCross;

    fn render_text(summary: &IchimokuSummary) -> String {
        let theme = Theme::default();
        let params = IchimokuParams::default();
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(summary, &params, &theme).render(area, &mut buf);
        (0..area.width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn shows_params_and_state() {
        let summary = IchimokuSummary {
            bars: 10,
            last_close: Some(12.0),
            bias: Some(CloudBias::Above),
            last_cross: Some(TkCross {
                index: 7,
                bullish: true,
            }),
            cloud_bullish_now: Some(true),
            cloud_bullish_ahead: Some(false),
        };
        let text = render_text(&summary);
        assert!(text.contains("ichimoku(9,26,52,26)"));
        assert!(text.contains("above cloud"));
        assert!(text.contains("TK up @7"));
        assert!(text.contains("ahead bearish"));
    }

    #[test]
    fn empty_series_shows_placeholders() {
        let summary = IchimokuSummary::from_series(&[], &[IndicatorPoint::default()]);
        let text = render_text(&summary);
        assert!(text.contains("no cloud"));
        assert!(text.contains("TK none"));
        assert!(text.contains("ahead n/a"));
    }
}
