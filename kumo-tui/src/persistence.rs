//! View state persistence - JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use kumo_core::indicators::IchimokuParams;

use crate::app::{App, MAX_ZOOM, MIN_ZOOM};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub zoom: u16,
    pub params: IchimokuParams,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            zoom: crate::app::Viewport::default().zoom,
            params: IchimokuParams::default(),
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &App) -> PersistedState {
    PersistedState {
        zoom: app.viewport.zoom,
        params: app.params,
    }
}

/// Apply persisted state. Parameters that no longer validate are ignored.
pub fn apply(app: &mut App, state: PersistedState) {
    app.viewport.zoom = state.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    if state.params != app.params && state.params.validate().is_ok() {
        let _ = app.set_params(state.params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kumo_core::cloud::CloudStyle;
    use kumo_core::data::generate_synthetic_bars;

    fn app() -> App {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        App::new(
            "T",
            generate_synthetic_bars(start, 50, 1),
            IchimokuParams::default(),
            CloudStyle::default(),
        )
        .unwrap()
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = PersistedState {
            zoom: 4,
            params: IchimokuParams::new(7, 22, 44, 22).unwrap(),
        };
        save(&path, &state).unwrap();
        assert_eq!(load(&path), state);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded, PersistedState::default());
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();
        assert_eq!(load(&path), PersistedState::default());
    }

    #[test]
    fn apply_clamps_zoom_and_skips_invalid_params() {
        let mut a = app();
        let bad = PersistedState {
            zoom: 99,
            params: IchimokuParams {
                tenkan_period: 0,
                ..IchimokuParams::default()
            },
        };
        apply(&mut a, bad);
        assert_eq!(a.viewport.zoom, MAX_ZOOM);
        assert_eq!(a.params, IchimokuParams::default());
    }

    #[test]
    fn apply_then_extract() {
        let mut a = app();
        let state = PersistedState {
            zoom: 3,
            params: IchimokuParams::new(5, 10, 20, 5).unwrap(),
        };
        apply(&mut a, state.clone());
        assert_eq!(a.points.len(), 55);
        assert_eq!(extract(&a), state);
    }
}
