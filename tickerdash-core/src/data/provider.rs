//! Provider traits and structured error types.
//!
//! Providers are the untrusted upstream sources behind the live tier. They
//! return raw payloads; validation into complete records happens in
//! [`super::payload`], and failures never escape the facade.

use thiserror::Error;

use super::payload::RawProfile;
use crate::domain::{MacroPoint, PriceRange, PricePoint};

/// Structured error types for upstream data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("{provider} requires an API key")]
    MissingApiKey { provider: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Market data source: descriptive fields, closing prices and news.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Descriptive fields and fundamentals; any field may be absent.
    fn profile(&self, ticker: &str) -> Result<RawProfile, DataError>;

    /// Closing prices over `range`, ascending by date.
    fn history(&self, ticker: &str, range: PriceRange) -> Result<Vec<PricePoint>, DataError>;

    /// News items as untyped JSON objects, newest first.
    fn news(&self, ticker: &str) -> Result<Vec<serde_json::Value>, DataError>;

    /// Check if the provider is currently available (not blocked).
    fn is_available(&self) -> bool {
        true
    }
}

/// Macroeconomic series source.
pub trait MacroDataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Observations for `series_id`, ascending by date.
    fn series(&self, series_id: &str) -> Result<Vec<MacroPoint>, DataError>;

    fn is_available(&self) -> bool {
        true
    }
}
