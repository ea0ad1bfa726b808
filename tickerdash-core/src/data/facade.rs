//! Retrieval facade: resolves a resource key to a complete record.
//!
//! Each record kind has its own [`FallbackChain`]: live provider, sample
//! table, synthesized default. Upstream failures are absorbed at the tier
//! boundaries, so no method here returns an error.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use super::chain::FallbackChain;
use super::circuit_breaker::CircuitBreaker;
use super::fred::FredProvider;
use super::live::{LiveMacroTier, LiveMarketTier};
use super::provider::{MacroDataProvider, MarketDataProvider};
use super::sample::{SampleTable, SampleTier};
use super::synth;
use super::yahoo::YahooProvider;
use crate::config::{ConfigError, DashboardConfig};
use crate::domain::{
    normalize_ticker, CompanyProfile, MacroSeries, NewsItem, PriceHistory, PriceRange,
};
use crate::reference::ReferenceTables;

/// Key of a price history request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    pub ticker: String,
    pub range: PriceRange,
}

/// Key of a macro series request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacroKey {
    /// Display name, e.g. "US Inflation".
    pub indicator: String,
    /// Provider series id, e.g. "CPIAUCSL".
    pub series_id: String,
}

/// Any resource the facade can resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Profile(String),
    History(HistoryKey),
    News(String),
    /// Indicator display name.
    Macro(String),
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::Profile(t) => write!(f, "profile:{t}"),
            ResourceKey::History(k) => write!(f, "history:{}:{}", k.ticker, k.range),
            ResourceKey::News(t) => write!(f, "news:{t}"),
            ResourceKey::Macro(name) => write!(f, "macro:{name}"),
        }
    }
}

/// A fully populated record.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceRecord {
    Profile(CompanyProfile),
    History(PriceHistory),
    News(NewsItem),
    Macro(MacroSeries),
}

pub struct RetrievalFacade {
    reference: Arc<ReferenceTables>,
    profiles: FallbackChain<str, CompanyProfile>,
    histories: FallbackChain<HistoryKey, PriceHistory>,
    news: FallbackChain<str, NewsItem>,
    macros: FallbackChain<MacroKey, MacroSeries>,
}

impl RetrievalFacade {
    pub fn builder(reference: Arc<ReferenceTables>) -> FacadeBuilder {
        FacadeBuilder {
            reference,
            market: None,
            macro_provider: None,
            samples: SampleTable::builtin(),
        }
    }

    /// Facade wired from configuration: Yahoo and FRED unless offline,
    /// built-in samples plus the configured fixture file.
    ///
    /// Only an unreadable or malformed fixture file is an error. A live
    /// provider that cannot be constructed is left out with a warning.
    pub fn from_config(
        config: &DashboardConfig,
        reference: Arc<ReferenceTables>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Self::builder(reference);

        if let Some(path) = &config.sample_fixtures {
            builder = builder.samples(SampleTable::load(path)?);
        }

        if config.provider.offline {
            info!("offline mode: live tier disabled");
            return Ok(builder.build());
        }

        let (market_breaker, macro_breaker) = provider_breakers(config);
        match YahooProvider::new(&config.provider, market_breaker) {
            Ok(yahoo) => builder = builder.market_provider(Arc::new(yahoo)),
            Err(e) => warn!(error = %e, "market provider disabled"),
        }
        match FredProvider::new(&config.provider, macro_breaker, config.fred_api_key.clone()) {
            Ok(fred) => builder = builder.macro_provider(Arc::new(fred)),
            Err(e) => warn!(error = %e, "macro provider disabled"),
        }
        Ok(builder.build())
    }

    pub fn reference(&self) -> &ReferenceTables {
        &self.reference
    }

    /// Resolve any key. Never fails.
    pub fn resolve(&self, key: &ResourceKey) -> ResourceRecord {
        match key {
            ResourceKey::Profile(t) => ResourceRecord::Profile(self.profile(t)),
            ResourceKey::History(k) => {
                ResourceRecord::History(self.price_history(&k.ticker, k.range))
            }
            ResourceKey::News(t) => ResourceRecord::News(self.latest_news(t)),
            ResourceKey::Macro(name) => ResourceRecord::Macro(self.macro_series(name)),
        }
    }

    /// Company profile with the static description and logo merged in,
    /// whichever tier produced it.
    pub fn profile(&self, ticker: &str) -> CompanyProfile {
        let ticker = normalize_ticker(ticker);
        let mut profile = self.profiles.resolve(ticker.as_str());
        profile.description = self.reference.description(&ticker).to_string();
        profile.logo_url = self.reference.logo_url(&ticker).to_string();
        profile
    }

    pub fn price_history(&self, ticker: &str, range: PriceRange) -> PriceHistory {
        self.histories.resolve(&HistoryKey {
            ticker: normalize_ticker(ticker),
            range,
        })
    }

    pub fn latest_news(&self, ticker: &str) -> NewsItem {
        let ticker = normalize_ticker(ticker);
        self.news.resolve(ticker.as_str())
    }

    /// Series for an indicator display name. An unknown name is used as the
    /// series id directly.
    pub fn macro_series(&self, indicator: &str) -> MacroSeries {
        let (key, explanation) = match self.reference.indicator(indicator) {
            Some(ind) => (
                MacroKey {
                    indicator: ind.name.clone(),
                    series_id: ind.series_id.clone(),
                },
                ind.explanation.clone(),
            ),
            None => (
                MacroKey {
                    indicator: indicator.to_string(),
                    series_id: indicator.to_string(),
                },
                String::new(),
            ),
        };
        let mut series = self.macros.resolve(&key);
        series.explanation = explanation;
        series
    }

    /// Tier names per record kind, in order, excluding the synthesizer.
    pub fn tier_names(&self) -> Vec<(&'static str, Vec<&str>)> {
        vec![
            ("profile", self.profiles.tier_names()),
            ("history", self.histories.tier_names()),
            ("news", self.news.tier_names()),
            ("macro", self.macros.tier_names()),
        ]
    }
}

pub struct FacadeBuilder {
    reference: Arc<ReferenceTables>,
    market: Option<Arc<dyn MarketDataProvider>>,
    macro_provider: Option<Arc<dyn MacroDataProvider>>,
    samples: SampleTable,
}

impl FacadeBuilder {
    pub fn market_provider(mut self, provider: Arc<dyn MarketDataProvider>) -> Self {
        self.market = Some(provider);
        self
    }

    pub fn macro_provider(mut self, provider: Arc<dyn MacroDataProvider>) -> Self {
        self.macro_provider = Some(provider);
        self
    }

    /// Extend the secondary tier.
    pub fn samples(mut self, samples: SampleTable) -> Self {
        self.samples.extend(samples);
        self
    }

    pub fn build(self) -> RetrievalFacade {
        let samples = SampleTier::new(Arc::new(self.samples));

        let mut profiles: FallbackChain<str, CompanyProfile> =
            FallbackChain::new("profile", |ticker: &str| synth::profile(ticker));
        let mut histories: FallbackChain<HistoryKey, PriceHistory> =
            FallbackChain::new("history", |key: &HistoryKey| {
                synth::price_history(key, Utc::now().date_naive())
            });
        let mut news: FallbackChain<str, NewsItem> =
            FallbackChain::new("news", |ticker: &str| synth::news(ticker, Utc::now()));
        let mut macros: FallbackChain<MacroKey, MacroSeries> =
            FallbackChain::new("macro", |key: &MacroKey| {
                synth::macro_series(key, Utc::now().date_naive())
            });

        if let Some(market) = self.market {
            let live = LiveMarketTier::new(market);
            profiles = profiles.with_tier(live.clone());
            histories = histories.with_tier(live.clone());
            news = news.with_tier(live);
        }
        if let Some(provider) = self.macro_provider {
            macros = macros.with_tier(LiveMacroTier::new(provider));
        }

        RetrievalFacade {
            reference: self.reference,
            profiles: profiles.with_tier(samples.clone()),
            histories,
            news: news.with_tier(samples.clone()),
            macros: macros.with_tier(samples),
        }
    }
}

/// Market and macro breakers. A trip on one leaves the other closed.
fn provider_breakers(config: &DashboardConfig) -> (Arc<CircuitBreaker>, Arc<CircuitBreaker>) {
    let cooldown = Duration::from_secs(config.provider.breaker_cooldown_secs);
    (
        Arc::new(CircuitBreaker::new(cooldown)),
        Arc::new(CircuitBreaker::new(cooldown)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> RetrievalFacade {
        RetrievalFacade::builder(Arc::new(ReferenceTables::builtin().unwrap())).build()
    }

    #[test]
    fn market_ban_leaves_macro_provider_available() {
        let config = DashboardConfig::default();
        let (market, macro_breaker) = provider_breakers(&config);
        let yahoo = YahooProvider::new(&config.provider, Arc::clone(&market)).unwrap();
        let fred =
            FredProvider::new(&config.provider, macro_breaker, Some("key".into())).unwrap();

        market.trip();
        assert!(!yahoo.is_available());
        assert!(fred.is_available());
    }

    #[test]
    fn offline_facade_has_sample_tiers_only() {
        let facade = offline();
        for (kind, tiers) in facade.tier_names() {
            match kind {
                "history" => assert!(tiers.is_empty()),
                _ => assert_eq!(tiers, vec!["sample"], "{kind}"),
            }
        }
    }

    #[test]
    fn profile_merges_reference_description() {
        let facade = offline();
        let p = facade.profile(" aapl ");
        assert_eq!(p.ticker, "AAPL");
        assert_eq!(p.description, facade.reference().description("AAPL"));
        assert_ne!(p.description, crate::domain::DEFAULT_DESCRIPTION);
    }

    #[test]
    fn macro_series_carries_indicator_explanation() {
        let facade = offline();
        let s = facade.macro_series("US Inflation");
        assert_eq!(s.series_id, "CPIAUCSL");
        assert!(!s.explanation.is_empty());

        let unknown = facade.macro_series("XYZ");
        assert_eq!(unknown.series_id, "XYZ");
        assert!(unknown.explanation.is_empty());
    }

    #[test]
    fn resolve_dispatches_by_kind() {
        let facade = offline();
        let key = ResourceKey::History(HistoryKey {
            ticker: "nvda".into(),
            range: PriceRange::OneYear,
        });
        match facade.resolve(&key) {
            ResourceRecord::History(h) => assert_eq!(h.ticker, "NVDA"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(key.to_string(), "history:nvda:1y");
    }
}
