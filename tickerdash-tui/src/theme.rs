//! Parrot/neon theme tokens for the dashboard.
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (focus, selected tabs, chart lines)
//! - **Positive**: Neon green (gains, live data)
//! - **Negative**: Hot pink (losses, failed regions)
//! - **Warning**: Neon orange (validation messages, fallback data)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (hints, labels)

use ratatui::style::{Color, Modifier, Style};

use tickerdash_core::domain::RecordSource;
use tickerdash_core::quiz::RiskCategory;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub const fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Price change: green up, pink down.
    pub fn change_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    /// Which tier produced a record.
    pub fn source_color(&self, source: RecordSource) -> Color {
        match source {
            RecordSource::Live => self.positive,
            RecordSource::Sample => self.neutral,
            RecordSource::Synthesized => self.warning,
        }
    }

    pub fn risk_color(&self, category: RiskCategory) -> Color {
        match category {
            RiskCategory::RiskAverse => self.muted,
            RiskCategory::RiskNeutral => self.accent,
            RiskCategory::RiskSeeking => self.negative,
        }
    }
}

const PALETTE: Theme = Theme::parrot_neon();

pub fn accent() -> Style {
    Style::default().fg(PALETTE.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(PALETTE.muted)
}

pub fn text() -> Style {
    Style::default().fg(PALETTE.text_primary)
}

pub fn secondary() -> Style {
    Style::default().fg(PALETTE.text_secondary)
}

pub fn negative() -> Style {
    Style::default().fg(PALETTE.negative)
}

pub fn warning() -> Style {
    Style::default().fg(PALETTE.warning)
}

pub fn neutral() -> Style {
    Style::default().fg(PALETTE.neutral)
}

pub fn selected() -> Style {
    Style::default()
        .fg(PALETTE.background)
        .bg(PALETTE.accent)
        .add_modifier(Modifier::BOLD)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(18, 18, 20));
        assert_eq!(theme.accent, PALETTE.accent);
    }

    #[test]
    fn test_change_color() {
        let theme = Theme::default();
        assert_eq!(theme.change_color(1.5), theme.positive);
        assert_eq!(theme.change_color(-0.2), theme.negative);
        assert_eq!(theme.change_color(0.0), theme.positive);
    }

    #[test]
    fn test_source_color() {
        let theme = Theme::default();
        assert_eq!(theme.source_color(RecordSource::Live), theme.positive);
        assert_eq!(theme.source_color(RecordSource::Synthesized), theme.warning);
    }

    #[test]
    fn test_panel_styles() {
        assert_eq!(panel_border(true), accent());
        assert_eq!(panel_title(false), muted());
    }
}
