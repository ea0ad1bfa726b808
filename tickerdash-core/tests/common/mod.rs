//! In-memory providers for integration tests. Never touches the network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tickerdash_core::data::{
    DataError, MacroDataProvider, MarketDataProvider, RawProfile, RetrievalFacade, SampleTable,
};
use tickerdash_core::domain::{MacroPoint, PricePoint, PriceRange};
use tickerdash_core::reference::ReferenceTables;

/// Per-method call counters.
#[derive(Debug, Default)]
pub struct Calls {
    pub profile: AtomicUsize,
    pub history: AtomicUsize,
    pub news: AtomicUsize,
    pub series: AtomicUsize,
}

impl Calls {
    pub fn profile(&self) -> usize {
        self.profile.load(Ordering::SeqCst)
    }
    pub fn history(&self) -> usize {
        self.history.load(Ordering::SeqCst)
    }
    pub fn news(&self) -> usize {
        self.news.load(Ordering::SeqCst)
    }
    pub fn series(&self) -> usize {
        self.series.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FixtureMarket {
    pub profiles: HashMap<String, RawProfile>,
    pub histories: HashMap<String, Vec<PricePoint>>,
    pub news: HashMap<String, Vec<Value>>,
    /// Every call fails with a network error.
    pub down: AtomicBool,
    /// Reports itself unavailable, like a tripped breaker.
    pub blocked: bool,
    pub calls: Arc<Calls>,
}

impl FixtureMarket {
    pub fn with_profile(mut self, ticker: &str, raw: RawProfile) -> Self {
        self.profiles.insert(ticker.to_string(), raw);
        self
    }

    pub fn with_history(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.histories.insert(ticker.to_string(), points);
        self
    }

    pub fn with_news(mut self, ticker: &str, items: Vec<Value>) -> Self {
        self.news.insert(ticker.to_string(), items);
        self
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DataError> {
        if self.down.load(Ordering::SeqCst) {
            Err(DataError::NetworkUnreachable("fixture offline".into()))
        } else {
            Ok(())
        }
    }
}

fn not_found(symbol: &str) -> DataError {
    DataError::SymbolNotFound {
        symbol: symbol.to_string(),
    }
}

impl MarketDataProvider for FixtureMarket {
    fn name(&self) -> &str {
        "fixture"
    }

    fn profile(&self, ticker: &str) -> Result<RawProfile, DataError> {
        self.calls.profile.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.profiles.get(ticker).cloned().ok_or_else(|| not_found(ticker))
    }

    fn history(&self, ticker: &str, _range: PriceRange) -> Result<Vec<PricePoint>, DataError> {
        self.calls.history.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.histories.get(ticker).cloned().ok_or_else(|| not_found(ticker))
    }

    fn news(&self, ticker: &str) -> Result<Vec<Value>, DataError> {
        self.calls.news.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.news.get(ticker).cloned().ok_or_else(|| not_found(ticker))
    }

    fn is_available(&self) -> bool {
        !self.blocked
    }
}

#[derive(Default)]
pub struct FixtureMacro {
    pub series: HashMap<String, Vec<MacroPoint>>,
    pub calls: Arc<Calls>,
}

impl MacroDataProvider for FixtureMacro {
    fn name(&self) -> &str {
        "fixture_macro"
    }

    fn series(&self, series_id: &str) -> Result<Vec<MacroPoint>, DataError> {
        self.calls.series.fetch_add(1, Ordering::SeqCst);
        self.series.get(series_id).cloned().ok_or_else(|| not_found(series_id))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn points(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: date(2024, 1, 1) + chrono::Duration::days(i as i64),
            close,
        })
        .collect()
}

pub fn reference() -> Arc<ReferenceTables> {
    Arc::new(ReferenceTables::builtin().unwrap())
}

pub fn facade_with(market: Arc<FixtureMarket>, samples: SampleTable) -> RetrievalFacade {
    RetrievalFacade::builder(reference())
        .market_provider(market)
        .samples(samples)
        .build()
}
