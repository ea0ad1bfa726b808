//! Yahoo Finance market data provider.
//!
//! Closing prices come from the v8 chart API, descriptive fields and
//! fundamentals from quoteSummary, headlines from the search API.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. Every failure here falls through to the sample and synthesized
//! tiers.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::circuit_breaker::CircuitBreaker;
use super::http::HttpFetcher;
use super::payload::RawProfile;
use super::provider::{DataError, MarketDataProvider};
use crate::config::ProviderSettings;
use crate::domain::{PricePoint, PriceRange};

const BASE_URL: &str = "https://query2.finance.yahoo.com";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<SummaryModules>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SummaryModules {
    price: Option<PriceModule>,
    asset_profile: Option<AssetProfile>,
    financial_data: Option<FinancialData>,
    summary_detail: Option<SummaryDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AssetProfile {
    industry: Option<String>,
    sector: Option<String>,
    website: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FinancialData {
    free_cashflow: Option<RawNumber>,
    profit_margins: Option<RawNumber>,
    return_on_equity: Option<RawNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawNumber>,
}

/// Yahoo wraps numbers as `{"raw": 1.5, "fmt": "1.50"}`.
#[derive(Debug, Default, Deserialize)]
struct RawNumber {
    raw: Option<f64>,
}

fn raw(n: Option<RawNumber>) -> Option<f64> {
    n.and_then(|n| n.raw)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<Value>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    http: HttpFetcher,
}

impl YahooProvider {
    pub fn new(
        settings: &ProviderSettings,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, DataError> {
        Ok(Self {
            http: HttpFetcher::new(settings, circuit_breaker)?,
        })
    }

    /// Build the chart API URL for a symbol and range.
    fn chart_url(symbol: &str, range: PriceRange) -> String {
        format!(
            "{BASE_URL}/v8/finance/chart/{symbol}?range={}&interval={}&includeAdjustedClose=true",
            range.as_param(),
            range.interval()
        )
    }

    fn summary_url(symbol: &str) -> String {
        format!(
            "{BASE_URL}/v10/finance/quoteSummary/{symbol}\
             ?modules=price,assetProfile,financialData,summaryDetail"
        )
    }

    fn search_url(symbol: &str) -> String {
        format!("{BASE_URL}/v1/finance/search?q={symbol}&newsCount=5&quotesCount=0")
    }

    fn api_error(symbol: &str, error: Option<ApiError>) -> DataError {
        match error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        }
    }

    /// Parse the chart API response into closing prices. Adjusted closes are
    /// preferred; rows without any close are skipped.
    fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<PricePoint>, DataError> {
        let ChartResult { result, error } = resp.chart;
        let data = result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| Self::api_error(symbol, error))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut points = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;
            let close = adj_closes
                .as_ref()
                .and_then(|v| v.get(i).copied().flatten())
                .or_else(|| quote.close.get(i).copied().flatten());
            if let Some(close) = close.filter(|c| c.is_finite()) {
                points.push(PricePoint { date, close });
            }
        }

        if points.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        points.sort_by_key(|p| p.date);
        Ok(points)
    }

    fn parse_summary(symbol: &str, resp: SummaryResponse) -> Result<RawProfile, DataError> {
        let SummaryResult { result, error } = resp.quote_summary;
        let modules = result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| Self::api_error(symbol, error))?;

        let price = modules.price.unwrap_or_default();
        let asset = modules.asset_profile.unwrap_or_default();
        let financial = modules.financial_data.unwrap_or_default();
        let detail = modules.summary_detail.unwrap_or_default();

        Ok(RawProfile {
            long_name: price.long_name.or(price.short_name),
            industry: asset.industry,
            sector: asset.sector,
            website: asset.website,
            free_cashflow: raw(financial.free_cashflow),
            profit_margins: raw(financial.profit_margins),
            return_on_equity: raw(financial.return_on_equity),
            trailing_pe: raw(detail.trailing_pe),
        })
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn profile(&self, ticker: &str) -> Result<RawProfile, DataError> {
        let resp: SummaryResponse = self.http.get_json(&Self::summary_url(ticker), ticker)?;
        Self::parse_summary(ticker, resp)
    }

    fn history(&self, ticker: &str, range: PriceRange) -> Result<Vec<PricePoint>, DataError> {
        let resp: ChartResponse = self.http.get_json(&Self::chart_url(ticker, range), ticker)?;
        Self::parse_chart(ticker, resp)
    }

    fn news(&self, ticker: &str) -> Result<Vec<Value>, DataError> {
        let resp: SearchResponse = self.http.get_json(&Self::search_url(ticker), ticker)?;
        Ok(resp.news)
    }

    fn is_available(&self) -> bool {
        self.http.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chart_url_carries_range_and_interval() {
        let url = YahooProvider::chart_url("AAPL", PriceRange::FiveYears);
        assert!(url.contains("/chart/AAPL?"));
        assert!(url.contains("range=5y"));
        assert!(url.contains("interval=1wk"));
    }

    #[test]
    fn parses_chart_and_skips_gaps() {
        let body = json!({
            "chart": {
                "result": [{
                    "timestamp": [1_704_153_600, 1_704_240_000, 1_704_326_400],
                    "indicators": {
                        "quote": [{"close": [10.0, null, 12.0]}],
                        "adjclose": [{"adjclose": [9.5, null, null]}]
                    }
                }],
                "error": null
            }
        });
        let resp: ChartResponse = serde_json::from_value(body).unwrap();
        let points = YahooProvider::parse_chart("X", resp).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 9.5);
        assert_eq!(points[1].close, 12.0);
    }

    #[test]
    fn chart_not_found_maps_to_symbol_error() {
        let body = json!({
            "chart": {"result": null, "error": {"code": "Not Found", "description": "No data"}}
        });
        let resp: ChartResponse = serde_json::from_value(body).unwrap();
        let err = YahooProvider::parse_chart("NOPE", resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn parses_summary_with_missing_modules() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "price": {"shortName": "Apple"},
                    "financialData": {"profitMargins": {"raw": 0.24, "fmt": "24%"}},
                    "summaryDetail": {"trailingPE": {"raw": 31.2}}
                }],
                "error": null
            }
        });
        let resp: SummaryResponse = serde_json::from_value(body).unwrap();
        let raw = YahooProvider::parse_summary("AAPL", resp).unwrap();
        assert_eq!(raw.long_name.as_deref(), Some("Apple"));
        assert_eq!(raw.sector, None);
        assert_eq!(raw.profit_margins, Some(0.24));
        assert_eq!(raw.trailing_pe, Some(31.2));
        assert_eq!(raw.free_cashflow, None);
    }
}
