//! Bar sources: CSV files and a deterministic synthetic random walk.

pub mod csv_io;
pub mod synthetic;

pub use csv_io::{load_csv, read_csv, write_csv, DataError};
pub use synthetic::{generate_synthetic_bars, symbol_seed};
