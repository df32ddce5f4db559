//! CSV bar files.
//!
//! Header: `date,open,high,low,close,volume` (`volume` may be omitted).
//! Rows must be in strictly ascending date order, since a bar's row position
//! is its index in the Ichimoku series.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Bar;

/// Errors from loading or writing bar files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: bar fails OHLC sanity check (high={high}, low={low})")]
    InsaneBar { row: usize, high: f64, low: f64 },

    #[error("row {row}: date {date} is not after previous date {previous}")]
    OutOfOrder {
        row: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },
}

/// Parse bars from any CSV reader.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars: Vec<Bar> = Vec::new();
    for (i, record) in rdr.deserialize::<Bar>().enumerate() {
        // Row 1 is the header.
        let row = i + 2;
        let bar = record?;
        if !bar.is_sane() {
            return Err(DataError::InsaneBar {
                row,
                high: bar.high,
                low: bar.low,
            });
        }
        if let Some(prev) = bars.last() {
            if bar.date <= prev.date {
                return Err(DataError::OutOfOrder {
                    row,
                    date: bar.date,
                    previous: prev.date,
                });
            }
        }
        bars.push(bar);
    }
    Ok(bars)
}

/// Load bars from a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let bars = read_csv(file)?;
    if bars.is_empty() {
        tracing::warn!(path = %path.display(), "bar file has no rows");
    } else {
        tracing::debug!(path = %path.display(), bars = bars.len(), "loaded bars");
    }
    Ok(bars)
}

/// Write bars to a CSV file with the standard header.
pub fn write_csv(path: &Path, bars: &[Bar]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for bar in bars {
        wtr.serialize(bar)?;
    }
    wtr.flush().map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}
