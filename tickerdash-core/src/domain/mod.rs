//! Domain records produced by the retrieval facade.

pub mod range;
pub mod records;

pub use range::PriceRange;
pub use records::{
    CompanyProfile, Fundamentals, MacroPoint, MacroSeries, NewsItem, PriceHistory, PricePoint,
    RecordSource, DEFAULT_DESCRIPTION, DEFAULT_LOGO_URL, NOT_AVAILABLE, UNKNOWN_PUBLISHER,
};

/// Ticker symbol type alias
pub type Ticker = String;

/// Normalize a user-supplied ticker: trimmed, upper-case.
pub fn normalize_ticker(raw: &str) -> Ticker {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_ticker("  brk-b "), "BRK-B");
        assert_eq!(normalize_ticker("NVDA"), "NVDA");
    }
}
