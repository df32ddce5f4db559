use serde::{Deserialize, Serialize};
use std::fmt;

use super::Bar;

/// Deterministic dataset hash (content hash of the bar series)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    /// Hash a bar series.
    ///
    /// Uses BLAKE3 over the canonical JSON of the bars, so the hash is stable
    /// across builds and platforms.
    pub fn of_bars(bars: &[Bar]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for bar in bars {
            let canonical = serde_json::json!({
                "date": bar.date.to_string(),
                "open": bar.open,
                "high": bar.high,
                "low": bar.low,
                "close": bar.close,
                "volume": bar.volume,
            });
            hasher.update(canonical.to_string().as_bytes());
            hasher.update(b"\n");
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    /// First 12 hex characters, for display.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn dataset_hash_is_deterministic() {
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        assert_eq!(DatasetHash::of_bars(&bars), DatasetHash::of_bars(&bars));
        assert_eq!(DatasetHash::of_bars(&bars).0.len(), 64);
    }

    #[test]
    fn dataset_hash_changes_with_data() {
        let a = make_bars(&[10.0, 11.0, 12.0]);
        let mut b = a.clone();
        b[2].close = 12.5;
        assert_ne!(DatasetHash::of_bars(&a), DatasetHash::of_bars(&b));
    }

    #[test]
    fn short_hash_truncates() {
        let h = DatasetHash("0123456789abcdef".to_string());
        assert_eq!(h.short(), "0123456789ab");
        assert_eq!(h.to_string(), "0123456789abcdef");
        assert_eq!(DatasetHash("abc".to_string()).short(), "abc");
    }
}
