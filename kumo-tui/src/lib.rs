//! Kumo TUI - terminal Ichimoku chart
//!
//! Provides an interactive view of one bar series with:
//! - Candles and the five Ichimoku lines
//! - Cloud fill drawn by the core renderer into terminal cells
//! - Scroll/zoom navigation and persisted view state

pub mod app;
pub mod navigation;
pub mod panels;
pub mod persistence;
pub mod theme;
pub mod ui;

pub use app::App;
pub use navigation::handle_key_event;
pub use theme::Theme;
