//! Renderer-owned input values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value of one named input control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputValue {
    #[default]
    Unset,
    Text(String),
    Int(i64),
}

pub(super) static UNSET: InputValue = InputValue::Unset;

impl InputValue {
    pub fn text(value: impl Into<String>) -> Self {
        InputValue::Text(value.into())
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, InputValue::Unset)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            InputValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            InputValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Unset => write!(f, "<unset>"),
            InputValue::Text(s) => write!(f, "{s}"),
            InputValue::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Text(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::Text(s)
    }
}

impl From<i64> for InputValue {
    fn from(n: i64) -> Self {
        InputValue::Int(n)
    }
}

impl From<Option<u8>> for InputValue {
    fn from(v: Option<u8>) -> Self {
        v.map_or(InputValue::Unset, |n| InputValue::Int(i64::from(n)))
    }
}

/// Current value of every input. Absent names read as `Unset`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    values: BTreeMap<String, InputValue>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &InputValue {
        self.values.get(name).unwrap_or(&UNSET)
    }

    /// Store a value; returns whether it differs from the previous one.
    pub fn set(&mut self, name: &str, value: InputValue) -> bool {
        if self.get(name) == &value {
            return false;
        }
        if value.is_set() {
            self.values.insert(name.to_string(), value);
        } else {
            self.values.remove(name);
        }
        true
    }

    /// Current values for the given names, in order.
    pub fn snapshot<'a, I>(&self, names: I) -> Vec<InputValue>
    where
        I: IntoIterator<Item = &'a String>,
    {
        names.into_iter().map(|n| self.get(n).clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_reads_unset() {
        let state = InputState::new();
        assert_eq!(state.get("x"), &InputValue::Unset);
    }

    #[test]
    fn set_reports_change() {
        let mut state = InputState::new();
        assert!(state.set("ticker", "NVDA".into()));
        assert!(!state.set("ticker", "NVDA".into()));
        assert!(state.set("ticker", "AAPL".into()));
        assert!(state.set("ticker", InputValue::Unset));
        assert!(!state.set("ticker", InputValue::Unset));
        assert_eq!(state.iter().count(), 0);
    }

    #[test]
    fn option_conversion() {
        assert_eq!(InputValue::from(Some(3u8)), InputValue::Int(3));
        assert_eq!(InputValue::from(None::<u8>), InputValue::Unset);
    }
}
