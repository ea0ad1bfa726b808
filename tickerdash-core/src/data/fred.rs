//! FRED (Federal Reserve Economic Data) macro provider.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use super::circuit_breaker::CircuitBreaker;
use super::http::HttpFetcher;
use super::provider::{DataError, MacroDataProvider};
use crate::config::ProviderSettings;
use crate::domain::MacroPoint;

const OBSERVATIONS_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

pub struct FredProvider {
    http: HttpFetcher,
    api_key: Option<String>,
}

impl FredProvider {
    pub fn new(
        settings: &ProviderSettings,
        circuit_breaker: Arc<CircuitBreaker>,
        api_key: Option<String>,
    ) -> Result<Self, DataError> {
        Ok(Self {
            http: HttpFetcher::new(settings, circuit_breaker)?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    fn url(series_id: &str, api_key: &str) -> String {
        format!("{OBSERVATIONS_URL}?series_id={series_id}&api_key={api_key}&file_type=json")
    }

    /// FRED reports missing observations as `"."`; those rows are dropped.
    fn parse(series_id: &str, resp: ObservationsResponse) -> Result<Vec<MacroPoint>, DataError> {
        let mut points = Vec::with_capacity(resp.observations.len());
        for obs in resp.observations {
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").map_err(|e| {
                DataError::ResponseFormatChanged(format!("bad date '{}': {e}", obs.date))
            })?;
            if let Ok(value) = obs.value.trim().parse::<f64>() {
                points.push(MacroPoint { date, value });
            }
        }
        if points.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: series_id.to_string(),
            });
        }
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl MacroDataProvider for FredProvider {
    fn name(&self) -> &str {
        "fred"
    }

    fn series(&self, series_id: &str) -> Result<Vec<MacroPoint>, DataError> {
        let key = self.api_key.as_deref().ok_or_else(|| DataError::MissingApiKey {
            provider: "FRED".into(),
        })?;
        let resp: ObservationsResponse = self.http.get_json(&Self::url(series_id, key), series_id)?;
        Self::parse(series_id, resp)
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some() && self.http.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drops_missing_observations() {
        let body = json!({"observations": [
            {"date": "2024-01-01", "value": "308.4"},
            {"date": "2024-02-01", "value": "."},
            {"date": "2024-03-01", "value": "310.3"}
        ]});
        let resp: ObservationsResponse = serde_json::from_value(body).unwrap();
        let points = FredProvider::parse("CPIAUCSL", resp).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].value, 310.3);
    }

    #[test]
    fn missing_key_is_reported_without_a_request() {
        let cb = Arc::new(CircuitBreaker::default_provider());
        let fred = FredProvider::new(&ProviderSettings::default(), cb, Some("  ".into())).unwrap();
        assert!(!fred.is_available());
        let err = fred.series("UNRATE").unwrap_err();
        assert!(matches!(err, DataError::MissingApiKey { .. }));
    }
}
