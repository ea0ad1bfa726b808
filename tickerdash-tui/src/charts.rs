//! Terminal rendering of chart descriptions.
//!
//! Area charts draw a dim bar fill under a braille line, bar charts use
//! the bar graph type so negative values work, gauges use the gauge widget.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph, Widget};

use tickerdash_core::dashboard::{ChartKind, ChartRenderer, ChartSpec};

use crate::theme::{self, Theme};

pub struct TerminalCharts {
    theme: Theme,
}

impl TerminalCharts {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

impl Default for TerminalCharts {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl ChartRenderer for TerminalCharts {
    type Output = RenderedChart;

    fn render(&self, spec: &ChartSpec) -> RenderedChart {
        let color = match spec.kind {
            ChartKind::Area => self.theme.accent,
            ChartKind::Bar => self.theme.neutral,
            ChartKind::Gauge { .. } => self.theme.warning,
        };
        RenderedChart {
            spec: spec.clone(),
            color,
        }
    }
}

/// A chart ready to draw into any area.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    spec: ChartSpec,
    color: Color,
}

impl Widget for &RenderedChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::muted())
            .title(Span::styled(format!(" {} ", self.spec.title), theme::accent_bold()));

        if self.spec.is_empty() {
            Paragraph::new(Span::styled("No data", theme::muted()))
                .alignment(Alignment::Center)
                .block(block)
                .render(area, buf);
            return;
        }

        match self.spec.kind {
            ChartKind::Gauge { min, max } => self.render_gauge(block, min, max, area, buf),
            ChartKind::Area | ChartKind::Bar => self.render_xy(block, area, buf),
        }
    }
}

impl RenderedChart {
    fn render_gauge(&self, block: Block, min: f64, max: f64, area: Rect, buf: &mut Buffer) {
        let value = self.spec.points.first().map(|p| p.1).unwrap_or(min);
        Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(self.color).add_modifier(Modifier::BOLD))
            .ratio(gauge_ratio(value, min, max))
            .label(format!("{value:.2}"))
            .render(area, buf);
    }

    fn render_xy(&self, block: Block, area: Rect, buf: &mut Buffer) {
        let (x_min, x_max) = self.spec.x_bounds().unwrap_or((0.0, 1.0));
        let (y_min, y_max) = self.spec.y_bounds().unwrap_or((0.0, 1.0));
        let pad = ((y_max - y_min).abs() * 0.05).max(f64::EPSILON);
        let y_lo = if y_min < 0.0 { y_min - pad } else { y_min };
        let y_hi = y_max + pad;
        // Bars at the ends need half a slot either side.
        let (x_lo, x_hi) = match self.spec.kind {
            ChartKind::Bar => (x_min - 0.5, x_max + 0.5),
            _ => (x_min, x_max.max(x_min + 1.0)),
        };

        let fill = Style::default().fg(self.color).add_modifier(Modifier::DIM);
        let edge = Style::default().fg(self.color);
        let datasets = match self.spec.kind {
            ChartKind::Area => vec![
                Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Bar)
                    .style(fill)
                    .data(&self.spec.points),
                Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(edge)
                    .data(&self.spec.points),
            ],
            _ => vec![Dataset::default()
                .marker(symbols::Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(edge)
                .data(&self.spec.points)],
        };

        let x_labels: Vec<Span> = if self.spec.x_labels.is_empty() {
            vec![
                Span::styled(compact(x_min), theme::muted()),
                Span::styled(compact(x_max), theme::muted()),
            ]
        } else {
            self.spec
                .x_labels
                .iter()
                .map(|l| Span::styled(l.as_str(), theme::muted()))
                .collect()
        };
        let y_labels = vec![
            Span::styled(compact(y_lo), theme::muted()),
            Span::styled(compact((y_lo + y_hi) / 2.0), theme::muted()),
            Span::styled(compact(y_hi), theme::muted()),
        ];

        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .title(Span::styled(self.spec.x_label.as_str(), theme::muted()))
                    .style(theme::muted())
                    .bounds([x_lo, x_hi])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(self.spec.y_label.as_str(), theme::muted()))
                    .style(theme::muted())
                    .bounds([y_lo, y_hi])
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}

fn gauge_ratio(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() || max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Short axis label: `1.2B`, `350.0M`, `12.5K`, `0.42`.
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.1}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e4 {
        format!("{:.1}K", value / 1e3)
    } else if abs >= 100.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
