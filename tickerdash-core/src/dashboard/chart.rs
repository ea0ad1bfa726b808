//! Chart descriptions handed to the charting collaborator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChartKind {
    /// Line filled down to zero.
    Area,
    Bar,
    /// Single value on a dial.
    Gauge { min: f64, max: f64 },
}

/// Ordered `(x, y)` points plus presentation hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    pub points: Vec<(f64, f64)>,
    /// Tick labels along x, evenly spaced.
    pub x_labels: Vec<String>,
}

/// Renders a [`ChartSpec`] into something displayable.
pub trait ChartRenderer {
    type Output;

    fn render(&self, spec: &ChartSpec) -> Self::Output;
}

impl ChartSpec {
    pub fn empty(title: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            kind,
            points: Vec::new(),
            x_labels: Vec::new(),
        }
    }

    /// Area chart over dates; x is days since the first date.
    pub fn dated_area(
        title: impl Into<String>,
        y_label: impl Into<String>,
        series: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        let series: Vec<(NaiveDate, f64)> = series.into_iter().collect();
        let origin = series.first().map(|(d, _)| *d);
        let points = match origin {
            Some(origin) => series
                .iter()
                .map(|(d, v)| ((*d - origin).num_days() as f64, *v))
                .collect(),
            None => Vec::new(),
        };
        Self {
            title: title.into(),
            x_label: "Date".into(),
            y_label: y_label.into(),
            kind: ChartKind::Area,
            points,
            x_labels: date_ticks(&series),
        }
    }

    /// One bar per label, in order.
    pub fn bars(title: impl Into<String>, labels: Vec<String>, values: &[f64]) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            kind: ChartKind::Bar,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect(),
            x_labels: labels,
        }
    }

    pub fn gauge(title: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            kind: ChartKind::Gauge { min, max },
            points: vec![(0.0, value)],
            x_labels: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.points.iter().map(|p| p.0))
    }

    /// Min and max y. Area and bar charts include zero.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        if let ChartKind::Gauge { min, max } = self.kind {
            return Some((min, max));
        }
        let (lo, hi) = bounds(self.points.iter().map(|p| p.1))?;
        Some((lo.min(0.0), hi.max(0.0)))
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// First, middle and last date.
fn date_ticks(series: &[(NaiveDate, f64)]) -> Vec<String> {
    match series.len() {
        0 => Vec::new(),
        1 => vec![series[0].0.to_string()],
        n => [0, n / 2, n - 1]
            .iter()
            .map(|&i| series[i].0.format("%Y-%m").to_string())
            .collect(),
    }
}
