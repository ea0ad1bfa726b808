//! Price history lookback window.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lookback window for the price chart.
///
/// Wire values match the provider's `range` parameter (`max`, `10y`, `5y`, `1y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriceRange {
    #[serde(rename = "max")]
    Max,
    #[default]
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "1y")]
    OneYear,
}

impl PriceRange {
    /// Tab order as shown in the UI.
    pub const ALL: [PriceRange; 4] = [
        PriceRange::Max,
        PriceRange::TenYears,
        PriceRange::FiveYears,
        PriceRange::OneYear,
    ];

    pub fn as_param(self) -> &'static str {
        match self {
            PriceRange::Max => "max",
            PriceRange::TenYears => "10y",
            PriceRange::FiveYears => "5y",
            PriceRange::OneYear => "1y",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceRange::Max => "All",
            PriceRange::TenYears => "10Y",
            PriceRange::FiveYears => "5Y",
            PriceRange::OneYear => "1Y",
        }
    }

    /// Bar interval requested from the provider; longer windows use coarser bars.
    pub fn interval(self) -> &'static str {
        match self {
            PriceRange::Max => "1mo",
            PriceRange::TenYears | PriceRange::FiveYears => "1wk",
            PriceRange::OneYear => "1d",
        }
    }

    /// Number of calendar years covered. `Max` has no fixed bound.
    pub fn years(self) -> Option<u32> {
        match self {
            PriceRange::Max => None,
            PriceRange::TenYears => Some(10),
            PriceRange::FiveYears => Some(5),
            PriceRange::OneYear => Some(1),
        }
    }

    pub fn next(self) -> PriceRange {
        let i = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> PriceRange {
        let i = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "all" => Ok(PriceRange::Max),
            "10y" => Ok(PriceRange::TenYears),
            "5y" => Ok(PriceRange::FiveYears),
            "1y" => Ok(PriceRange::OneYear),
            other => Err(format!("unknown price range '{other}' (expected max, 10y, 5y or 1y)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_values() {
        for range in PriceRange::ALL {
            assert_eq!(range.as_param().parse::<PriceRange>().unwrap(), range);
        }
        assert_eq!("All".parse::<PriceRange>().unwrap(), PriceRange::Max);
        assert!("3y".parse::<PriceRange>().is_err());
    }

    #[test]
    fn tab_cycle_wraps() {
        assert_eq!(PriceRange::OneYear.next(), PriceRange::Max);
        assert_eq!(PriceRange::Max.prev(), PriceRange::OneYear);
        assert_eq!(PriceRange::default(), PriceRange::TenYears);
    }

    #[test]
    fn serde_uses_wire_values() {
        let json = serde_json::to_string(&PriceRange::FiveYears).unwrap();
        assert_eq!(json, "\"5y\"");
    }
}
