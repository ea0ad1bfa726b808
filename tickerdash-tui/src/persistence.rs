//! Control state persisted across restarts as JSON.
//!
//! Quiz answers are deliberately not persisted: every session starts with
//! an empty questionnaire.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tickerdash_core::dashboard::{inputs, DetailTab};
use tickerdash_core::domain::{normalize_ticker, PriceRange};
use tickerdash_core::scheduler::InputValue;

use crate::app::{AppState, View};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub view: View,
    pub ticker: Option<String>,
    pub range: Option<PriceRange>,
    pub detail_tab: Option<DetailTab>,
    pub indicator: Option<String>,
}

pub fn default_state_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tickerdash")
        .join("state.json")
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

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        view: app.view,
        ticker: app.selected_ticker().map(str::to_string),
        range: Some(app.range()),
        detail_tab: Some(app.detail_tab()),
        indicator: Some(app.indicator().to_string()).filter(|s| !s.is_empty()),
    }
}

/// Seed the saved controls into a fresh app, before it starts.
///
/// Values that no longer match the reference tables are skipped.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.view = state.view;
    if let Some(ticker) = state.ticker.map(|t| normalize_ticker(&t)) {
        if app.tickers().contains(&ticker) {
            app.seed_input(inputs::TICKER, InputValue::Text(ticker));
        }
    }
    if let Some(range) = state.range {
        app.seed_input(inputs::RANGE, InputValue::text(range.as_param()));
    }
    if let Some(tab) = state.detail_tab {
        app.seed_input(inputs::DETAIL_TAB, InputValue::text(tab.as_param()));
    }
    if let Some(indicator) = state.indicator {
        if app.reference.indicator(&indicator).is_some() {
            app.seed_input(inputs::INDICATOR, InputValue::Text(indicator));
        }
    }
}
