//! TickerDash TUI: terminal front end for the dashboard.
//!
//! Three views share one update scheduler:
//! - Introduction: concept cards and the investor persona quiz
//! - Stock Data: company header, price chart, performance and background
//! - Macroeconomic Indicators: FRED series with explanations

pub mod app;
pub mod charts;
pub mod input;
pub mod logging;
pub mod persistence;
pub mod theme;
pub mod ui;
pub mod worker;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use tickerdash_core::config::DashboardConfig;
use tickerdash_core::dashboard::{build_scheduler, DashboardContext};
use tickerdash_core::data::RetrievalFacade;
use tickerdash_core::reference::ReferenceTables;

pub use app::{AppState, View};
pub use theme::Theme;

/// Wire reference tables, retrieval and the scheduler into a fresh app.
/// Nothing runs until [`AppState::start`].
pub fn bootstrap(config: &DashboardConfig) -> Result<AppState> {
    let reference = Arc::new(
        ReferenceTables::builtin()
            .context("load reference tables")?
            .with_tickers(&config.tickers),
    );
    let facade = Arc::new(
        RetrievalFacade::from_config(config, reference.clone()).context("build retrieval")?,
    );
    let ctx = DashboardContext::new(reference.clone(), facade);
    let scheduler = build_scheduler(config, &ctx).context("register dashboard bindings")?;
    let worker = worker::Worker::new(config.worker_threads())?;
    info!(
        tickers = reference.tickers().len(),
        bindings = scheduler.binding_count(),
        threads = worker.threads(),
        "dashboard ready"
    );
    Ok(AppState::new(scheduler, reference, worker))
}
