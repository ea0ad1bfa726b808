//! Synthesized defaults: the last tier of every chain.
//!
//! Text records are generic placeholders naming the key. Series are random
//! walks seeded from a BLAKE3 hash of the key, so the same key and end date
//! always yield the same points.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::facade::{HistoryKey, MacroKey};
use super::payload::news_page_url;
use crate::domain::{
    CompanyProfile, MacroPoint, MacroSeries, NewsItem, PriceHistory, PricePoint, PriceRange,
    RecordSource,
};

pub const NEWS_SOURCE: &str = "Financial News Network";

/// Years shown for the `Max` range when nothing better is known.
const MAX_RANGE_YEARS: u32 = 25;
/// Months of macro history.
const MACRO_MONTHS: u32 = 240;

fn seeded_rng(parts: &[&str]) -> StdRng {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update(&[0]);
    }
    let seed: [u8; 32] = *hasher.finalize().as_bytes();
    StdRng::from_seed(seed)
}

pub fn news(ticker: &str, now: DateTime<Utc>) -> NewsItem {
    NewsItem {
        ticker: ticker.to_string(),
        title: format!("Market Updates for {ticker}"),
        summary: format!(
            "Stay informed with the most recent News, Market Developments and Analyst \
             Opinions on {ticker}."
        ),
        link: news_page_url(ticker),
        source: NEWS_SOURCE.to_string(),
        published_at: now,
        origin: RecordSource::Synthesized,
    }
}

pub fn profile(ticker: &str) -> CompanyProfile {
    CompanyProfile::placeholder(ticker, RecordSource::Synthesized)
}

/// Calendar step between points for a range.
fn step_days(range: PriceRange) -> i64 {
    match range {
        PriceRange::Max => 30,
        PriceRange::TenYears | PriceRange::FiveYears => 7,
        PriceRange::OneYear => 1,
    }
}

/// Price walk ending at `end`, one point per step, weekends skipped.
pub fn price_history(key: &HistoryKey, end: NaiveDate) -> PriceHistory {
    let mut rng = seeded_rng(&[&key.ticker, key.range.as_param()]);
    let years = key.range.years().unwrap_or(MAX_RANGE_YEARS);
    let step = step_days(key.range);
    let start = end - Duration::days(i64::from(years) * 365);

    let vol = 0.02 * (step as f64).sqrt();
    let drift = 0.0003 * step as f64;
    let mut price: f64 = rng.gen_range(20.0..400.0);
    let mut points = Vec::new();
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += Duration::days(1);
            continue;
        }
        points.push(PricePoint {
            date: current,
            close: price,
        });
        let ret: f64 = rng.gen_range(-vol..vol) + drift;
        price = (price * (1.0 + ret)).max(0.01);
        current += Duration::days(step);
    }

    PriceHistory {
        ticker: key.ticker.clone(),
        range: key.range,
        points,
        source: RecordSource::Synthesized,
    }
}

/// Rough level, monthly drift and noise for known series.
struct Shape {
    start: f64,
    drift: f64,
    vol: f64,
    floor: f64,
    ceiling: f64,
}

fn shape_for(series_id: &str) -> Shape {
    match series_id {
        "CPIAUCSL" => Shape {
            start: 180.0,
            drift: 0.002,
            vol: 0.002,
            floor: 0.0,
            ceiling: f64::MAX,
        },
        "GDP" => Shape {
            start: 14_000.0,
            drift: 0.004,
            vol: 0.004,
            floor: 0.0,
            ceiling: f64::MAX,
        },
        "FEDFUNDS" => Shape {
            start: 2.0,
            drift: 0.0,
            vol: 0.08,
            floor: 0.05,
            ceiling: 8.0,
        },
        "UNRATE" => Shape {
            start: 5.0,
            drift: 0.0,
            vol: 0.04,
            floor: 3.0,
            ceiling: 11.0,
        },
        _ => Shape {
            start: 100.0,
            drift: 0.001,
            vol: 0.01,
            floor: 0.0,
            ceiling: f64::MAX,
        },
    }
}

/// Monthly series ending in the month of `end`. The explanation is left empty.
pub fn macro_series(key: &MacroKey, end: NaiveDate) -> MacroSeries {
    let mut rng = seeded_rng(&[&key.series_id]);
    let shape = shape_for(&key.series_id);
    let first_of_month = end.with_day(1).unwrap_or(end);

    let mut value = shape.start;
    let mut points = Vec::with_capacity(MACRO_MONTHS as usize);
    for back in (0..MACRO_MONTHS).rev() {
        let Some(date) = first_of_month.checked_sub_months(Months::new(back)) else {
            continue;
        };
        points.push(MacroPoint { date, value });
        let change: f64 = rng.gen_range(-shape.vol..shape.vol) + shape.drift;
        value = (value * (1.0 + change)).clamp(shape.floor, shape.ceiling);
    }

    MacroSeries {
        indicator: key.indicator.clone(),
        series_id: key.series_id.clone(),
        explanation: String::new(),
        points,
        source: RecordSource::Synthesized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 13).unwrap()
    }

    fn key(ticker: &str, range: PriceRange) -> HistoryKey {
        HistoryKey {
            ticker: ticker.into(),
            range,
        }
    }

    #[test]
    fn news_placeholder_text() {
        let item = news("AAPL", Utc::now());
        assert_eq!(item.title, "Market Updates for AAPL");
        assert!(item.summary.ends_with("Opinions on AAPL."));
        assert_eq!(item.link, "https://finance.yahoo.com/quote/AAPL/news/");
        assert_eq!(item.source, NEWS_SOURCE);
        assert_eq!(item.origin, RecordSource::Synthesized);
    }

    #[test]
    fn history_is_deterministic_per_key() {
        let a = price_history(&key("NVDA", PriceRange::OneYear), end());
        let b = price_history(&key("NVDA", PriceRange::OneYear), end());
        let c = price_history(&key("MSFT", PriceRange::OneYear), end());
        assert_eq!(a, b);
        assert_ne!(a.points, c.points);
    }

    #[test]
    fn history_spans_range_without_weekends() {
        let h = price_history(&key("X", PriceRange::OneYear), end());
        assert!(h.points.len() > 240 && h.points.len() < 270, "{}", h.points.len());
        assert!(h.points.windows(2).all(|w| w[0].date < w[1].date));
        assert!(h
            .points
            .iter()
            .all(|p| !matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(h.points.iter().all(|p| p.close > 0.0));
    }

    #[test]
    fn macro_series_is_monthly_and_bounded() {
        let k = MacroKey {
            indicator: "US Unemployment Rate".into(),
            series_id: "UNRATE".into(),
        };
        let s = macro_series(&k, end());
        assert_eq!(s.points.len(), MACRO_MONTHS as usize);
        assert_eq!(s.points.last().unwrap().date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert!(s.points.iter().all(|p| (3.0..=11.0).contains(&p.value)));
        assert_eq!(s, macro_series(&k, end()));
    }
}
