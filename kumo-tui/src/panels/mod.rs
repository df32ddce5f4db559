//! Chart panels
//!
//! - IchimokuChart: candles, cloud fill and the five Ichimoku lines
//! - CellSurface / CellMapper: terminal-cell host for the cloud renderer
//! - StatusBar: one-line indicator summary

pub mod cell_surface;
pub mod ichimoku_chart;
pub mod status_bar;

pub use cell_surface::{CellMapper, CellSurface};
pub use ichimoku_chart::IchimokuChartPanel;
pub use status_bar::StatusBar;
