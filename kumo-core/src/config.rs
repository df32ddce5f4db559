//! TOML configuration: Ichimoku parameters and cloud colors.
//!
//! ```toml
//! [ichimoku]
//! tenkan = 9
//! kijun = 26
//! senkou_b = 52
//! displacement = 26
//!
//! [cloud]
//! bullish = { r = 38, g = 166, b = 154, a = 0.25 }
//! bearish = { r = 239, g = 83, b = 80, a = 0.25 }
//! ```
//!
//! Every key is optional. Periods are read as signed integers so that a
//! negative value is reported as an invalid parameter instead of a parse
//! error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cloud::CloudStyle;
use crate::indicators::ichimoku::{IchimokuError, IchimokuParams};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
    #[error(transparent)]
    Invalid(#[from] IchimokuError),
}

/// `[ichimoku]` section as written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawIchimoku {
    pub tenkan: i64,
    pub kijun: i64,
    pub senkou_b: i64,
    pub displacement: i64,
}

impl Default for RawIchimoku {
    fn default() -> Self {
        let p = IchimokuParams::default();
        Self {
            tenkan: p.tenkan_period as i64,
            kijun: p.kijun_period as i64,
            senkou_b: p.senkou_b_period as i64,
            displacement: p.displacement as i64,
        }
    }
}

impl TryFrom<RawIchimoku> for IchimokuParams {
    type Error = IchimokuError;

    fn try_from(raw: RawIchimoku) -> Result<Self, Self::Error> {
        IchimokuParams::new(raw.tenkan, raw.kijun, raw.senkou_b, raw.displacement)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawConfig {
    ichimoku: RawIchimoku,
    cloud: CloudStyle,
}

/// Validated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KumoConfig {
    pub params: IchimokuParams,
    pub style: CloudStyle,
}

impl KumoConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        Ok(Self {
            params: raw.ichimoku.try_into()?,
            style: raw.cloud,
        })
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), params = %config.params, "loaded config");
        Ok(config)
    }

    /// Render back to TOML (used by `kumo synth` to drop a starter config).
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let raw = RawConfig {
            ichimoku: RawIchimoku {
                tenkan: self.params.tenkan_period as i64,
                kijun: self.params.kijun_period as i64,
                senkou_b: self.params.senkou_b_period as i64,
                displacement: self.params.displacement as i64,
            },
            cloud: self.style,
        };
        Ok(toml::to_string_pretty(&raw)?)
    }
}
