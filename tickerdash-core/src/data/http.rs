//! Blocking JSON fetcher shared by the live providers.
//!
//! Retries with exponential backoff, honours the provider's circuit breaker and
//! maps HTTP failures onto [`DataError`].

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::circuit_breaker::CircuitBreaker;
use super::provider::DataError;
use crate::config::ProviderSettings;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl HttpFetcher {
    pub fn new(
        settings: &ProviderSettings,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(500),
        })
    }

    pub fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }

    /// GET `url` and decode the body as `T`. `what` names the resource in errors.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!(what, attempt, ?delay, "retrying request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::FORBIDDEN {
                        // IP ban: immediately trip the circuit breaker
                        self.circuit_breaker.trip();
                        return Err(DataError::CircuitBreakerTripped);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        self.circuit_breaker.record_failure();
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(DataError::AuthenticationRequired(format!(
                            "{what} requires authentication"
                        )));
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(DataError::SymbolNotFound {
                            symbol: what.to_string(),
                        });
                    }

                    if !status.is_success() {
                        self.circuit_breaker.record_failure();
                        last_error = Some(DataError::Other(format!("HTTP {status} for {what}")));
                        continue;
                    }

                    let body: T = resp.json().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to parse response for {what}: {e}"
                        ))
                    })?;
                    self.circuit_breaker.record_success();
                    return Ok(body);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        self.circuit_breaker.record_failure();
                        last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::circuit_breaker::BreakerState;

    #[test]
    fn unreachable_host_trips_the_breaker() {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        let settings = ProviderSettings {
            timeout_secs: 2,
            max_retries: 2,
            ..ProviderSettings::default()
        };
        let mut fetcher = HttpFetcher::new(&settings, Arc::clone(&breaker)).unwrap();
        fetcher.base_delay = Duration::from_millis(1);

        // Nothing listens on the discard port.
        assert!(fetcher
            .get_json::<serde_json::Value>("http://127.0.0.1:9/", "local")
            .is_err());
        assert!(matches!(breaker.state(), BreakerState::Open { .. }));

        let err = fetcher
            .get_json::<serde_json::Value>("http://127.0.0.1:9/", "again")
            .unwrap_err();
        assert!(matches!(err, DataError::CircuitBreakerTripped));
    }
}
