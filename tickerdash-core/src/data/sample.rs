//! Secondary tier: static per-key sample records.
//!
//! The built-in table is empty; a `sample_fixtures` TOML file extends it:
//!
//! ```toml
//! [news.AAPL]
//! title = "..."
//! summary = "..."
//!
//! [profiles.AAPL]
//! long_name = "Apple Inc."
//! sector = "Technology"
//!
//! [[macro_series.UNRATE]]
//! date = "2024-01-01"
//! value = 3.7
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::chain::{Tier, TierResult};
use super::facade::MacroKey;
use super::payload::{news_page_url, RawProfile};
use crate::config::ConfigError;
use crate::domain::{
    CompanyProfile, MacroPoint, MacroSeries, NewsItem, RecordSource, UNKNOWN_PUBLISHER,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleNews {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleTable {
    pub news: BTreeMap<String, SampleNews>,
    pub profiles: BTreeMap<String, RawProfile>,
    pub macro_series: BTreeMap<String, Vec<MacroPoint>>,
}

impl SampleTable {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut table: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            what: "sample fixtures".into(),
            message: e.to_string(),
        })?;
        for points in table.macro_series.values_mut() {
            points.sort_by_key(|p| p.date);
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Add `other`'s entries, replacing same-key entries.
    pub fn extend(&mut self, other: SampleTable) {
        self.news.extend(other.news);
        self.profiles.extend(other.profiles);
        self.macro_series.extend(other.macro_series);
    }

    pub fn is_empty(&self) -> bool {
        self.news.is_empty() && self.profiles.is_empty() && self.macro_series.is_empty()
    }

    /// Sample headline stamped with the current time. Entries with a blank
    /// title or summary are ignored.
    pub fn news_item(&self, ticker: &str) -> Option<NewsItem> {
        let sample = self.news.get(ticker)?;
        if sample.title.trim().is_empty() || sample.summary.trim().is_empty() {
            return None;
        }
        Some(NewsItem {
            ticker: ticker.to_string(),
            title: sample.title.clone(),
            summary: sample.summary.clone(),
            link: sample.link.clone().unwrap_or_else(|| news_page_url(ticker)),
            source: sample
                .source
                .clone()
                .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string()),
            published_at: Utc::now(),
            origin: RecordSource::Sample,
        })
    }

    pub fn profile(&self, ticker: &str) -> Option<CompanyProfile> {
        self.profiles
            .get(ticker)
            .map(|raw| raw.clone().into_profile(ticker, RecordSource::Sample))
    }

    pub fn macro_points(&self, series_id: &str) -> Option<&[MacroPoint]> {
        self.macro_series
            .get(series_id)
            .map(Vec::as_slice)
            .filter(|p| !p.is_empty())
    }
}

/// Secondary tier over a shared table.
#[derive(Debug, Clone)]
pub struct SampleTier {
    table: Arc<SampleTable>,
}

impl SampleTier {
    pub fn new(table: Arc<SampleTable>) -> Self {
        Self { table }
    }
}

impl Tier<str, NewsItem> for SampleTier {
    fn name(&self) -> &str {
        "sample"
    }

    fn lookup(&self, ticker: &str) -> TierResult<NewsItem> {
        self.table
            .news_item(ticker)
            .map_or_else(|| TierResult::miss("no sample news"), TierResult::Hit)
    }
}

impl Tier<str, CompanyProfile> for SampleTier {
    fn name(&self) -> &str {
        "sample"
    }

    fn lookup(&self, ticker: &str) -> TierResult<CompanyProfile> {
        self.table
            .profile(ticker)
            .map_or_else(|| TierResult::miss("no sample profile"), TierResult::Hit)
    }
}

impl Tier<MacroKey, MacroSeries> for SampleTier {
    fn name(&self) -> &str {
        "sample"
    }

    fn lookup(&self, key: &MacroKey) -> TierResult<MacroSeries> {
        match self.table.macro_points(&key.series_id) {
            Some(points) => TierResult::Hit(MacroSeries {
                indicator: key.indicator.clone(),
                series_id: key.series_id.clone(),
                explanation: String::new(),
                points: points.to_vec(),
                source: RecordSource::Sample,
            }),
            None => TierResult::miss("no sample series"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
[news.AAPL]
title = "Apple ships"
summary = "Units moved."
source = "Desk"

[news.BLNK]
title = "Blank summary"
summary = " "

[profiles.AAPL]
long_name = "Apple Inc."
sector = "Technology"

[[macro_series.UNRATE]]
date = "2024-02-01"
value = 3.9

[[macro_series.UNRATE]]
date = "2024-01-01"
value = 3.7
"#;

    #[test]
    fn builtin_is_empty() {
        assert!(SampleTable::builtin().is_empty());
    }

    #[test]
    fn parses_fixture_file() {
        let table = SampleTable::from_toml(FIXTURE).unwrap();
        let news = table.news_item("AAPL").unwrap();
        assert_eq!(news.source, "Desk");
        assert_eq!(news.link, news_page_url("AAPL"));
        assert_eq!(news.origin, RecordSource::Sample);
        assert!(table.news_item("BLNK").is_none());
        assert!(table.news_item("MSFT").is_none());

        let profile = table.profile("AAPL").unwrap();
        assert_eq!(profile.sector, "Technology");
        assert_eq!(profile.industry, crate::domain::NOT_AVAILABLE);

        let points = table.macro_points("UNRATE").unwrap();
        assert_eq!(points[0].value, 3.7);
    }

    #[test]
    fn bad_fixture_is_a_parse_error() {
        let err = SampleTable::from_toml("news = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn tier_hits_only_present_keys() {
        let tier = SampleTier::new(Arc::new(SampleTable::from_toml(FIXTURE).unwrap()));
        let hit: TierResult<NewsItem> = tier.lookup("AAPL");
        assert!(hit.is_hit());
        let miss: TierResult<CompanyProfile> = tier.lookup("ZZZ");
        assert!(!miss.is_hit());
    }
}
