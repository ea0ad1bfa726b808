//! Fully-populated resource records.
//!
//! Every record here is schema-complete: absent upstream fields have already
//! been replaced by the documented defaults below, so consumers never see a
//! partially filled value.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::range::PriceRange;

/// Substituted for any missing descriptive text field.
pub const NOT_AVAILABLE: &str = "N/A";
/// Description shown for tickers absent from the reference table.
pub const DEFAULT_DESCRIPTION: &str = "No description available.";
/// Logo placeholder for tickers absent from the reference table.
pub const DEFAULT_LOGO_URL: &str = "";
/// Publisher shown when a news payload names none.
pub const UNKNOWN_PUBLISHER: &str = "Unknown Source";

/// Which retrieval tier produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Live,
    Sample,
    Synthesized,
}

impl RecordSource {
    pub fn label(self) -> &'static str {
        match self {
            RecordSource::Live => "live",
            RecordSource::Sample => "sample",
            RecordSource::Synthesized => "synthesized",
        }
    }
}

/// One closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Closing-price history for one ticker over one range, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub ticker: String,
    pub range: PriceRange,
    pub points: Vec<PricePoint>,
    pub source: RecordSource,
}

impl PriceHistory {
    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// Percentage change from first to last close.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.points.first()?.close;
        let last = self.points.last()?.close;
        if first == 0.0 || !first.is_finite() {
            return None;
        }
        Some((last / first - 1.0) * 100.0)
    }
}

/// Headline fundamentals used by the performance panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub free_cashflow: f64,
    pub profit_margins: f64,
    pub return_on_equity: f64,
    pub trailing_pe: f64,
}

impl Fundamentals {
    pub const DEFAULT_FREE_CASHFLOW: f64 = 1e6;
    pub const DEFAULT_PROFIT_MARGINS: f64 = 0.1;
    pub const DEFAULT_RETURN_ON_EQUITY: f64 = 0.1;
    pub const DEFAULT_TRAILING_PE: f64 = 20.0;
}

impl Default for Fundamentals {
    fn default() -> Self {
        Self {
            free_cashflow: Self::DEFAULT_FREE_CASHFLOW,
            profit_margins: Self::DEFAULT_PROFIT_MARGINS,
            return_on_equity: Self::DEFAULT_RETURN_ON_EQUITY,
            trailing_pe: Self::DEFAULT_TRAILING_PE,
        }
    }
}

/// Descriptive company record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub ticker: String,
    /// Falls back to the ticker itself.
    pub long_name: String,
    pub industry: String,
    pub sector: String,
    pub website: String,
    pub description: String,
    pub logo_url: String,
    pub fundamentals: Fundamentals,
    pub source: RecordSource,
}

impl CompanyProfile {
    /// A profile with every field at its documented default.
    pub fn placeholder(ticker: &str, source: RecordSource) -> Self {
        Self {
            ticker: ticker.to_string(),
            long_name: ticker.to_string(),
            industry: NOT_AVAILABLE.to_string(),
            sector: NOT_AVAILABLE.to_string(),
            website: NOT_AVAILABLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            logo_url: DEFAULT_LOGO_URL.to_string(),
            fundamentals: Fundamentals::default(),
            source,
        }
    }

    /// `"{long name} ({ticker})"`, the header line of the stock view.
    pub fn header(&self) -> String {
        format!("{} ({})", self.long_name, self.ticker)
    }
}

/// The latest headline for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub ticker: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub origin: RecordSource,
}

impl NewsItem {
    /// Summary truncated to `max_chars` characters, with `...` appended when cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        if self.summary.chars().count() > max_chars {
            let cut: String = self.summary.chars().take(max_chars).collect();
            format!("{cut}...")
        } else {
            self.summary.clone()
        }
    }

    pub fn display_date(&self) -> String {
        self.published_at.format("%b %d, %Y %H:%M").to_string()
    }

    /// True when every field except the timestamp matches.
    pub fn same_content(&self, other: &NewsItem) -> bool {
        self.ticker == other.ticker
            && self.title == other.title
            && self.summary == other.summary
            && self.link == other.link
            && self.source == other.source
            && self.origin == other.origin
    }
}

/// One macro observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A macroeconomic indicator series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSeries {
    /// Display name, e.g. "US Inflation".
    pub indicator: String,
    /// Provider series id, e.g. "CPIAUCSL".
    pub series_id: String,
    pub explanation: String,
    pub points: Vec<MacroPoint>,
    pub source: RecordSource,
}

impl MacroSeries {
    pub fn latest(&self) -> Option<MacroPoint> {
        self.points.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn news(summary: &str) -> NewsItem {
        NewsItem {
            ticker: "AAPL".into(),
            title: "Title".into(),
            summary: summary.into(),
            link: "https://example.com".into(),
            source: "Wire".into(),
            published_at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
            origin: RecordSource::Live,
        }
    }

    #[test]
    fn excerpt_truncates_long_summaries() {
        let long = "x".repeat(301);
        let item = news(&long);
        let excerpt = item.excerpt(300);
        assert_eq!(excerpt.len(), 303);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn excerpt_keeps_short_summaries() {
        let item = news(&"y".repeat(300));
        assert_eq!(item.excerpt(300), item.summary);
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let item = news("é".repeat(5).as_str());
        assert_eq!(item.excerpt(3), "ééé...");
    }

    #[test]
    fn display_date_format() {
        assert_eq!(news("s").display_date(), "Mar 05, 2024 14:30");
    }

    #[test]
    fn placeholder_profile_uses_documented_defaults() {
        let p = CompanyProfile::placeholder("ZZZZ", RecordSource::Synthesized);
        assert_eq!(p.long_name, "ZZZZ");
        assert_eq!(p.sector, NOT_AVAILABLE);
        assert_eq!(p.industry, NOT_AVAILABLE);
        assert_eq!(p.website, NOT_AVAILABLE);
        assert_eq!(p.description, DEFAULT_DESCRIPTION);
        assert_eq!(p.logo_url, DEFAULT_LOGO_URL);
        assert_eq!(p.fundamentals, Fundamentals::default());
        assert_eq!(p.header(), "ZZZZ (ZZZZ)");
    }

    #[test]
    fn change_pct_handles_empty_and_zero() {
        let mut h = PriceHistory {
            ticker: "T".into(),
            range: PriceRange::OneYear,
            points: vec![],
            source: RecordSource::Synthesized,
        };
        assert!(h.change_pct().is_none());
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        h.points = vec![
            PricePoint { date: d, close: 100.0 },
            PricePoint { date: d.succ_opt().unwrap(), close: 110.0 },
        ];
        assert!((h.change_pct().unwrap() - 10.0).abs() < 1e-9);
    }
}
