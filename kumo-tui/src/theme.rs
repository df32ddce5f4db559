//! Chart palette for the Kumo TUI
//!
//! Dark background with one color per Ichimoku line. Cloud fills come from
//! `CloudStyle` and are alpha-blended against `background` because terminal
//! cells have no transparency.
//!
//! # Color Palette
//! - **Background**: Deep charcoal
//! - **Tenkan**: Electric cyan
//! - **Kijun**: Neon orange
//! - **Chikou**: Cool purple
//! - **Span A / Span B**: Muted green / muted red edges
//! - **Candles**: Neon green up, hot pink down

use ratatui::style::Color;

use kumo_core::cloud::Rgba;

const BACKGROUND: (u8, u8, u8) = (18, 18, 20);

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub up: Color,
    pub down: Color,
    pub tenkan: Color,
    pub kijun: Color,
    pub chikou: Color,
    pub span_a: Color,
    pub span_b: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::kumo_dark()
    }
}

impl Theme {
    pub fn kumo_dark() -> Self {
        let (r, g, b) = BACKGROUND;
        Self {
            background: Color::Rgb(r, g, b),
            accent: Color::Rgb(0, 255, 255),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            up: Color::Rgb(0, 255, 128),
            down: Color::Rgb(255, 20, 147),
            tenkan: Color::Rgb(0, 200, 255),
            kijun: Color::Rgb(255, 140, 0),
            chikou: Color::Rgb(147, 112, 219),
            span_a: Color::Rgb(80, 190, 120),
            span_b: Color::Rgb(210, 90, 90),
        }
    }

    /// Opaque cell color for a translucent cloud fill.
    pub fn blend(&self, fill: Rgba) -> Color {
        let (r, g, b) = fill.over(BACKGROUND);
        Color::Rgb(r, g, b)
    }

    /// Candle color by direction (flat counts as up).
    pub fn candle_color(&self, is_up: bool) -> Color {
        if is_up {
            self.up
        } else {
            self.down
        }
    }
}
