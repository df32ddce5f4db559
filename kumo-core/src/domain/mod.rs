//! Domain types for Kumo

pub mod bar;
pub mod ids;
pub mod point;

pub use bar::Bar;
pub use ids::DatasetHash;
pub use point::IndicatorPoint;
