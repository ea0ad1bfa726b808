//! Primary tier: live providers behind the tier boundary.
//!
//! Every provider error becomes a miss here and never reaches the caller.

use std::sync::Arc;

use chrono::Utc;

use super::chain::{Tier, TierResult};
use super::facade::{HistoryKey, MacroKey};
use super::payload::RawNews;
use super::provider::{MacroDataProvider, MarketDataProvider};
use crate::domain::{CompanyProfile, MacroSeries, NewsItem, PriceHistory, RecordSource};

#[derive(Clone)]
pub struct LiveMarketTier {
    provider: Arc<dyn MarketDataProvider>,
}

impl LiveMarketTier {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    fn unavailable<R>(&self) -> Option<TierResult<R>> {
        (!self.provider.is_available())
            .then(|| TierResult::miss(format!("{} unavailable", self.provider.name())))
    }
}

impl Tier<str, CompanyProfile> for LiveMarketTier {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn lookup(&self, ticker: &str) -> TierResult<CompanyProfile> {
        if let Some(miss) = self.unavailable() {
            return miss;
        }
        self.provider
            .profile(ticker)
            .map(|raw| raw.into_profile(ticker, RecordSource::Live))
            .into()
    }
}

impl Tier<HistoryKey, PriceHistory> for LiveMarketTier {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn lookup(&self, key: &HistoryKey) -> TierResult<PriceHistory> {
        if let Some(miss) = self.unavailable() {
            return miss;
        }
        match self.provider.history(&key.ticker, key.range) {
            Ok(points) if points.is_empty() => TierResult::miss("empty price history"),
            Ok(points) => TierResult::Hit(PriceHistory {
                ticker: key.ticker.clone(),
                range: key.range,
                points,
                source: RecordSource::Live,
            }),
            Err(e) => TierResult::miss(e.to_string()),
        }
    }
}

impl Tier<str, NewsItem> for LiveMarketTier {
    fn name(&self) -> &str {
        self.provider.name()
    }

    /// Only the newest item is considered; it must carry a title and summary.
    fn lookup(&self, ticker: &str) -> TierResult<NewsItem> {
        if let Some(miss) = self.unavailable() {
            return miss;
        }
        let items = match self.provider.news(ticker) {
            Ok(items) => items,
            Err(e) => return TierResult::miss(e.to_string()),
        };
        let Some(latest) = items.first() else {
            return TierResult::miss("no news items");
        };
        RawNews::from_value(latest)
            .into_news(ticker, Utc::now())
            .map_or_else(
                || TierResult::miss("news payload missing title or summary"),
                TierResult::Hit,
            )
    }
}

#[derive(Clone)]
pub struct LiveMacroTier {
    provider: Arc<dyn MacroDataProvider>,
}

impl LiveMacroTier {
    pub fn new(provider: Arc<dyn MacroDataProvider>) -> Self {
        Self { provider }
    }
}

impl Tier<MacroKey, MacroSeries> for LiveMacroTier {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn lookup(&self, key: &MacroKey) -> TierResult<MacroSeries> {
        if !self.provider.is_available() {
            return TierResult::miss(format!("{} unavailable", self.provider.name()));
        }
        match self.provider.series(&key.series_id) {
            Ok(points) if points.is_empty() => TierResult::miss("empty series"),
            Ok(points) => TierResult::Hit(MacroSeries {
                indicator: key.indicator.clone(),
                series_id: key.series_id.clone(),
                explanation: String::new(),
                points,
                source: RecordSource::Live,
            }),
            Err(e) => TierResult::miss(e.to_string()),
        }
    }
}
