//! Boundary validation of untrusted upstream payloads.
//!
//! Each payload kind has a fixed optional-field schema. Converting it into a
//! record substitutes the documented default for every absent field, so
//! handlers only ever see complete records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    CompanyProfile, Fundamentals, NewsItem, RecordSource, NOT_AVAILABLE, UNKNOWN_PUBLISHER,
};

/// Timestamp field names probed in order on a news payload.
pub const TIMESTAMP_FIELDS: [&str; 4] = ["providerPublishTime", "published", "publishedAt", "time"];

/// Generic news page for a ticker.
pub fn news_page_url(ticker: &str) -> String {
    format!("https://finance.yahoo.com/quote/{ticker}/news/")
}

/// Descriptive fields as delivered by a provider; any may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProfile {
    pub long_name: Option<String>,
    pub industry: Option<String>,
    pub sector: Option<String>,
    pub website: Option<String>,
    pub free_cashflow: Option<f64>,
    pub profit_margins: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub trailing_pe: Option<f64>,
}

impl RawProfile {
    /// Complete the profile. Blank strings and non-finite numbers count as absent.
    ///
    /// Description and logo come from the reference tables and are left at
    /// their defaults here.
    pub fn into_profile(self, ticker: &str, source: RecordSource) -> CompanyProfile {
        let defaults = Fundamentals::default();
        CompanyProfile {
            ticker: ticker.to_string(),
            long_name: text_or(self.long_name, ticker),
            industry: text_or(self.industry, NOT_AVAILABLE),
            sector: text_or(self.sector, NOT_AVAILABLE),
            website: text_or(self.website, NOT_AVAILABLE),
            fundamentals: Fundamentals {
                free_cashflow: number_or(self.free_cashflow, defaults.free_cashflow),
                profit_margins: number_or(self.profit_margins, defaults.profit_margins),
                return_on_equity: number_or(self.return_on_equity, defaults.return_on_equity),
                trailing_pe: number_or(self.trailing_pe, defaults.trailing_pe),
            },
            ..CompanyProfile::placeholder(ticker, source)
        }
    }
}

fn text_or(value: Option<String>, default: &str) -> String {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn number_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

/// A news payload after field probing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNews {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub publisher: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl RawNews {
    /// Probe an untyped news object.
    ///
    /// Newer payloads nest the fields under `content`; both layouts are read.
    /// `summary` falls back to `body`; `publisher` may be a string or an
    /// object with a `name`.
    pub fn from_value(value: &Value) -> Self {
        let item = match value.get("content") {
            Some(content) if content.is_object() => content,
            _ => value,
        };
        Self {
            title: string_field(item, "title"),
            summary: string_field(item, "summary").or_else(|| string_field(item, "body")),
            link: string_field(item, "link"),
            publisher: match item.get("publisher") {
                Some(Value::String(s)) => non_blank(s),
                Some(obj @ Value::Object(_)) => string_field(obj, "name"),
                _ => None,
            },
            published_at: TIMESTAMP_FIELDS
                .iter()
                .find_map(|field| item.get(*field).and_then(parse_timestamp)),
        }
    }

    /// Build a record, or `None` unless both title and summary are present.
    ///
    /// When no timestamp parsed, the record is stamped with `retrieved_at`.
    pub fn into_news(self, ticker: &str, retrieved_at: DateTime<Utc>) -> Option<NewsItem> {
        let title = self.title?;
        let summary = self.summary?;
        Some(NewsItem {
            ticker: ticker.to_string(),
            title,
            summary,
            link: self.link.unwrap_or_else(|| news_page_url(ticker)),
            source: self.publisher.unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string()),
            published_at: self.published_at.unwrap_or(retrieved_at),
            origin: RecordSource::Live,
        })
    }
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).and_then(non_blank)
}

/// Epoch seconds (integer or float) or an RFC 3339 string. Zero and
/// unparseable values yield `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let secs = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            if secs <= 0 {
                return None;
            }
            DateTime::from_timestamp(secs, 0)
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn profile_defaults_fill_gaps() {
        let raw = RawProfile {
            long_name: Some("Apple Inc.".into()),
            sector: Some("  ".into()),
            trailing_pe: Some(f64::NAN),
            profit_margins: Some(0.25),
            ..RawProfile::default()
        };
        let p = raw.into_profile("AAPL", RecordSource::Live);
        assert_eq!(p.long_name, "Apple Inc.");
        assert_eq!(p.sector, NOT_AVAILABLE);
        assert_eq!(p.industry, NOT_AVAILABLE);
        assert_eq!(p.fundamentals.trailing_pe, Fundamentals::DEFAULT_TRAILING_PE);
        assert_eq!(p.fundamentals.profit_margins, 0.25);
        assert_eq!(p.source, RecordSource::Live);
    }

    #[test]
    fn flat_news_payload() {
        let v = json!({
            "title": "Chips rally",
            "summary": "Semis up.",
            "link": "https://news.example/1",
            "publisher": "Wire",
            "providerPublishTime": 1_700_000_000
        });
        let item = RawNews::from_value(&v).into_news("NVDA", now()).unwrap();
        assert_eq!(item.title, "Chips rally");
        assert_eq!(item.source, "Wire");
        assert_eq!(item.published_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn nested_content_and_publisher_object() {
        let v = json!({
            "id": "x",
            "content": {
                "title": "T",
                "body": "Body text",
                "publisher": {"name": "Desk"},
                "publishedAt": "2024-05-01T12:00:00Z"
            }
        });
        let raw = RawNews::from_value(&v);
        assert_eq!(raw.summary.as_deref(), Some("Body text"));
        assert_eq!(raw.publisher.as_deref(), Some("Desk"));
        let item = raw.into_news("MSFT", now()).unwrap();
        assert_eq!(item.link, news_page_url("MSFT"));
        assert_eq!(item.published_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn timestamp_probe_order_and_fallback() {
        let v = json!({
            "title": "T", "summary": "S",
            "providerPublishTime": "garbage",
            "published": 0,
            "time": 1_600_000_000.7
        });
        let item = RawNews::from_value(&v).into_news("X", now()).unwrap();
        assert_eq!(item.published_at.timestamp(), 1_600_000_000);

        let none = json!({"title": "T", "summary": "S", "time": "yesterday"});
        let item = RawNews::from_value(&none).into_news("X", now()).unwrap();
        assert_eq!(item.published_at, now());
        assert_eq!(item.source, UNKNOWN_PUBLISHER);
    }

    #[test]
    fn missing_summary_is_rejected() {
        let v = json!({"title": "Only a title", "summary": ""});
        assert!(RawNews::from_value(&v).into_news("X", now()).is_none());
        let v = json!({"summary": "No title"});
        assert!(RawNews::from_value(&v).into_news("X", now()).is_none());
    }
}
