//! Typed payloads published to the renderer, and the pure functions that
//! build them from records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::chart::ChartSpec;
use crate::domain::{CompanyProfile, MacroPoint, MacroSeries, NewsItem, PriceHistory, RecordSource};
use crate::quiz::QuizResult;

/// Years of the cosmetic performance projection.
pub const PROJECTION_YEARS: [i32; 5] = [2019, 2020, 2021, 2022, 2023];
/// Year-over-year growth factor of the projection.
pub const PROJECTION_GROWTH: f64 = 1.1;
pub const PE_GAUGE_MIN: f64 = 0.0;
pub const PE_GAUGE_MAX: f64 = 60.0;
/// Characters of news summary shown before truncation.
pub const NEWS_EXCERPT_CHARS: usize = 300;
pub const NO_STOCK_SELECTED: &str = "No stock selected";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailTab {
    #[default]
    Performance,
    Background,
}

impl DetailTab {
    pub const ALL: [DetailTab; 2] = [DetailTab::Performance, DetailTab::Background];

    pub fn as_param(self) -> &'static str {
        match self {
            DetailTab::Performance => "performance",
            DetailTab::Background => "background",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailTab::Performance => "Performance",
            DetailTab::Background => "Background",
        }
    }

    pub fn next(self) -> Self {
        match self {
            DetailTab::Performance => DetailTab::Background,
            DetailTab::Background => DetailTab::Performance,
        }
    }
}

impl fmt::Display for DetailTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for DetailTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "performance" => Ok(DetailTab::Performance),
            "background" => Ok(DetailTab::Background),
            other => Err(format!("unknown detail tab '{other}'")),
        }
    }
}

/// Header line of the stock view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockHeader {
    pub ticker: String,
    /// `"{long name} ({ticker})"`, or the no-selection notice.
    pub title: String,
    pub logo_url: String,
    pub last_close: Option<f64>,
    pub change_pct: Option<f64>,
    pub profile_source: Option<RecordSource>,
    pub history_source: Option<RecordSource>,
}

impl StockHeader {
    pub fn unselected() -> Self {
        Self {
            ticker: String::new(),
            title: NO_STOCK_SELECTED.to_string(),
            logo_url: String::new(),
            last_close: None,
            change_pct: None,
            profile_source: None,
            history_source: None,
        }
    }

    pub fn new(profile: &CompanyProfile, history: &PriceHistory) -> Self {
        Self {
            ticker: profile.ticker.clone(),
            title: profile.header(),
            logo_url: profile.logo_url.clone(),
            last_close: history.last_close(),
            change_pct: history.change_pct(),
            profile_source: Some(profile.source),
            history_source: Some(history.source),
        }
    }
}

pub fn price_chart(history: &PriceHistory) -> ChartSpec {
    ChartSpec::dated_area(
        "Stock Price",
        "Close",
        history.points.iter().map(|p| (p.date, p.close)),
    )
}

/// One metric card with its chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPanel {
    pub title: String,
    pub lines: Vec<String>,
    pub chart: ChartSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceView {
    pub ticker: String,
    pub panels: Vec<MetricPanel>,
    pub source: RecordSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundView {
    pub ticker: String,
    pub logo_url: String,
    pub description: String,
    pub industry: String,
    pub sector: String,
    pub website: String,
    pub news: NewsItem,
    /// News summary cut to [`NEWS_EXCERPT_CHARS`].
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DetailView {
    Empty(String),
    Performance(PerformanceView),
    Background(BackgroundView),
}

/// `base × 1.1^i` for each projection year.
pub fn projection(base: f64) -> Vec<f64> {
    (0..PROJECTION_YEARS.len())
        .map(|i| base * PROJECTION_GROWTH.powi(i as i32))
        .collect()
}

fn year_labels() -> Vec<String> {
    PROJECTION_YEARS.iter().map(|y| y.to_string()).collect()
}

fn metric(title: &str, lines: [&str; 2], chart: ChartSpec) -> MetricPanel {
    MetricPanel {
        title: title.to_string(),
        lines: lines.iter().map(|l| l.to_string()).collect(),
        chart,
    }
}

pub fn performance_view(profile: &CompanyProfile) -> PerformanceView {
    let f = &profile.fundamentals;
    let panels = vec![
        metric(
            "Free Cash Flow (FCF)",
            [
                "Cash left after expenses and investments.",
                "More FCF means growth, dividends, or debt reduction; good for investors.",
            ],
            ChartSpec::bars("Free Cash Flow", year_labels(), &projection(f.free_cashflow)),
        ),
        metric(
            "Net Profit Margin",
            [
                "Profit as a percentage of revenue.",
                "Higher margin = better efficiency and profitability.",
            ],
            ChartSpec::bars("Net Profit Margin", year_labels(), &projection(f.profit_margins)),
        ),
        metric(
            "Return on Equity (ROE)",
            [
                "Profit made from shareholders' equity.",
                "High ROE means the company uses investor money well.",
            ],
            ChartSpec::bars("Return on Equity", year_labels(), &projection(f.return_on_equity)),
        ),
        metric(
            "P/E Ratio",
            [
                "Stock price divided by earnings per share.",
                "Low P/E = undervalued, high P/E = growth potential (compare to industry).",
            ],
            ChartSpec::gauge("P/E Ratio", f.trailing_pe, PE_GAUGE_MIN, PE_GAUGE_MAX),
        ),
    ];
    PerformanceView {
        ticker: profile.ticker.clone(),
        panels,
        source: profile.source,
    }
}

pub fn background_view(profile: &CompanyProfile, news: NewsItem) -> BackgroundView {
    BackgroundView {
        ticker: profile.ticker.clone(),
        logo_url: profile.logo_url.clone(),
        description: profile.description.clone(),
        industry: profile.industry.clone(),
        sector: profile.sector.clone(),
        website: profile.website.clone(),
        excerpt: news.excerpt(NEWS_EXCERPT_CHARS),
        news,
    }
}

/// Title block of the macro view; the explanation is its tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroTitle {
    pub indicator: String,
    pub series_id: String,
    pub explanation: String,
    pub latest: Option<MacroPoint>,
    pub source: RecordSource,
}

impl MacroTitle {
    pub fn new(series: &MacroSeries) -> Self {
        Self {
            indicator: series.indicator.clone(),
            series_id: series.series_id.clone(),
            explanation: series.explanation.clone(),
            latest: series.latest(),
            source: series.source,
        }
    }
}

pub fn macro_chart(series: &MacroSeries) -> ChartSpec {
    ChartSpec::dated_area(
        series.indicator.clone(),
        series.indicator.clone(),
        series.points.iter().map(|p| (p.date, p.value)),
    )
}

/// Content of the quiz result region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizOutcome {
    Cleared,
    Rejected(String),
    Profile(QuizResult),
}

impl QuizOutcome {
    /// Heading and body lines as shown to the user.
    pub fn text(&self) -> Option<(String, String)> {
        match self {
            QuizOutcome::Cleared => None,
            QuizOutcome::Rejected(message) => Some((message.clone(), String::new())),
            QuizOutcome::Profile(result) => Some((
                "Your Investor Profile:".to_string(),
                format!(
                    "{}: {}",
                    result.category.label(),
                    result.category.description()
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::ChartKind;
    use crate::domain::{Fundamentals, PricePoint, PriceRange};
    use crate::quiz::RiskCategory;
    use chrono::NaiveDate;

    #[test]
    fn projection_compounds_ten_percent() {
        let p = projection(100.0);
        assert_eq!(p.len(), 5);
        assert!((p[0] - 100.0).abs() < 1e-9);
        assert!((p[4] - 146.41).abs() < 1e-9);
    }

    #[test]
    fn performance_uses_defaults_for_placeholder() {
        let profile = CompanyProfile::placeholder("ZZZ", RecordSource::Synthesized);
        let view = performance_view(&profile);
        assert_eq!(view.panels.len(), 4);
        assert_eq!(view.panels[0].chart.points[0].1, Fundamentals::DEFAULT_FREE_CASHFLOW);
        assert_eq!(view.panels[0].chart.x_labels[0], "2019");
        let gauge = &view.panels[3].chart;
        assert_eq!(gauge.kind, ChartKind::Gauge { min: 0.0, max: 60.0 });
        assert_eq!(gauge.points[0].1, Fundamentals::DEFAULT_TRAILING_PE);
    }

    #[test]
    fn header_reports_change() {
        let profile = CompanyProfile::placeholder("ABC", RecordSource::Live);
        let history = PriceHistory {
            ticker: "ABC".into(),
            range: PriceRange::OneYear,
            points: vec![
                PricePoint { date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), close: 50.0 },
                PricePoint { date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), close: 75.0 },
            ],
            source: RecordSource::Synthesized,
        };
        let header = StockHeader::new(&profile, &history);
        assert_eq!(header.title, "ABC (ABC)");
        assert_eq!(header.last_close, Some(75.0));
        assert_eq!(header.change_pct, Some(50.0));
        assert_eq!(price_chart(&history).title, "Stock Price");
    }

    #[test]
    fn detail_tab_parsing() {
        assert_eq!("Background".parse::<DetailTab>(), Ok(DetailTab::Background));
        assert!("news".parse::<DetailTab>().is_err());
        assert_eq!(DetailTab::Background.next(), DetailTab::Performance);
    }

    #[test]
    fn outcome_text() {
        let result = QuizResult { total: 20, category: RiskCategory::RiskSeeking };
        let (head, body) = QuizOutcome::Profile(result).text().unwrap();
        assert_eq!(head, "Your Investor Profile:");
        assert!(body.starts_with("Risk-Seeking: You are willing"));
        assert!(QuizOutcome::Cleared.text().is_none());
    }
}
