//! Kumo Core - Ichimoku Cloud computation and cloud rendering.
//!
//! This crate contains:
//! - Domain types (bars, indicator points, dataset hashes)
//! - The series calculator: five Ichimoku lines, including values projected
//!   ahead of and behind the input range
//! - Windowed extrema helpers (re-scan and monotonic deque)
//! - The cloud renderer: same-sign segmentation of Span A / Span B, drawn
//!   through host-supplied coordinate and drawing capabilities
//! - Parameter and style configuration (TOML)
//! - Bar sources (CSV, synthetic random walk)
//! - Read-only signal analysis over a computed series

pub mod cloud;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod signals;

pub use cloud::{render_cloud, segment_cloud, CloudStyle, RenderOutcome};
pub use domain::{Bar, DatasetHash, IndicatorPoint};
pub use indicators::ichimoku::{calculate, Ichimoku, IchimokuError, IchimokuParams};
