//! Static reference tables: read-only lookup data embedded at build time.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::config::ConfigError;
use crate::domain::{normalize_ticker, DEFAULT_DESCRIPTION, DEFAULT_LOGO_URL};
use crate::quiz::SLOT_COUNT;

const BUILTIN: &str = include_str!("reference.toml");

/// Description and logo for one company.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyReference {
    pub ticker: String,
    pub description: String,
    pub logo_url: String,
}

/// A macro indicator tab: display name, provider series id, explanation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndicatorReference {
    pub name: String,
    pub series_id: String,
    pub explanation: String,
}

/// An introduction card with an external "learn more" link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfoCard {
    pub title: String,
    pub text: String,
    pub link: String,
}

#[derive(Debug, Deserialize)]
struct QuizSection {
    scale_hint: String,
    questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ReferenceFile {
    tickers: Vec<String>,
    companies: Vec<CompanyReference>,
    indicators: Vec<IndicatorReference>,
    quiz: QuizSection,
    #[serde(default)]
    cards: Vec<InfoCard>,
}

/// All immutable lookup data the handlers read.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    tickers: Vec<String>,
    companies: BTreeMap<String, CompanyReference>,
    indicators: Vec<IndicatorReference>,
    questions: Vec<String>,
    scale_hint: String,
    cards: Vec<InfoCard>,
}

impl ReferenceTables {
    /// Parse the embedded tables.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml(BUILTIN)
    }

    /// Parse reference tables from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: ReferenceFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            what: "reference tables".into(),
            message: e.to_string(),
        })?;

        if file.quiz.questions.len() != SLOT_COUNT {
            return Err(ConfigError::Invalid(format!(
                "expected {SLOT_COUNT} quiz questions, found {}",
                file.quiz.questions.len()
            )));
        }
        if file.indicators.is_empty() {
            return Err(ConfigError::Invalid("no macro indicators defined".into()));
        }

        let companies = file
            .companies
            .into_iter()
            .map(|c| (normalize_ticker(&c.ticker), c))
            .collect();

        Ok(Self {
            tickers: file.tickers.iter().map(|t| normalize_ticker(t)).collect(),
            companies,
            indicators: file.indicators,
            questions: file.quiz.questions,
            scale_hint: file.quiz.scale_hint,
            cards: file.cards,
        })
    }

    /// Return a copy with a different selectable ticker list (from config).
    pub fn with_tickers(mut self, tickers: &[String]) -> Self {
        if !tickers.is_empty() {
            self.tickers = tickers.iter().map(|t| normalize_ticker(t)).collect();
        }
        self
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn company(&self, ticker: &str) -> Option<&CompanyReference> {
        self.companies.get(&normalize_ticker(ticker))
    }

    /// Description for a ticker, or the generic default.
    pub fn description(&self, ticker: &str) -> &str {
        self.company(ticker)
            .map(|c| c.description.as_str())
            .unwrap_or(DEFAULT_DESCRIPTION)
    }

    /// Logo URL for a ticker, or the placeholder.
    pub fn logo_url(&self, ticker: &str) -> &str {
        self.company(ticker)
            .map(|c| c.logo_url.as_str())
            .unwrap_or(DEFAULT_LOGO_URL)
    }

    pub fn indicators(&self) -> &[IndicatorReference] {
        &self.indicators
    }

    pub fn indicator(&self, name: &str) -> Option<&IndicatorReference> {
        self.indicators.iter().find(|i| i.name == name)
    }

    pub fn indicator_names(&self) -> Vec<&str> {
        self.indicators.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn scale_hint(&self) -> &str {
        &self.scale_hint
    }

    pub fn cards(&self) -> &[InfoCard] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_parse() {
        let tables = ReferenceTables::builtin().unwrap();
        assert_eq!(tables.tickers().len(), 30);
        assert_eq!(tables.questions().len(), 5);
        assert_eq!(tables.indicators().len(), 4);
        assert_eq!(tables.cards().len(), 4);
        assert!(tables.tickers().iter().any(|t| t == "BRK-B"));
    }

    #[test]
    fn indicator_series_ids() {
        let tables = ReferenceTables::builtin().unwrap();
        let ids: Vec<&str> = tables.indicators().iter().map(|i| i.series_id.as_str()).collect();
        assert_eq!(ids, vec!["CPIAUCSL", "FEDFUNDS", "GDP", "UNRATE"]);
        assert!(tables.indicator("US GDP Growth").is_some());
        assert!(tables.indicator("US Housing Starts").is_none());
    }

    #[test]
    fn unknown_ticker_gets_defaults() {
        let tables = ReferenceTables::builtin().unwrap();
        // PEP is selectable but has no description entry.
        assert_eq!(tables.description("PEP"), DEFAULT_DESCRIPTION);
        assert_eq!(tables.logo_url("PEP"), DEFAULT_LOGO_URL);
        assert!(tables.description("nvda").starts_with("NVIDIA Corporation"));
        assert_eq!(tables.logo_url("AAPL"), "https://logo.clearbit.com/apple.com");
    }

    #[test]
    fn ticker_override_from_config() {
        let tables = ReferenceTables::builtin()
            .unwrap()
            .with_tickers(&["spy".to_string(), "qqq".to_string()]);
        assert_eq!(tables.tickers(), &["SPY".to_string(), "QQQ".to_string()]);
    }

    #[test]
    fn rejects_wrong_question_count() {
        let toml = r#"
            tickers = ["AAPL"]
            companies = []
            [[indicators]]
            name = "X"
            series_id = "X"
            explanation = "x"
            [quiz]
            scale_hint = "h"
            questions = ["only one"]
        "#;
        let err = ReferenceTables::from_toml(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
