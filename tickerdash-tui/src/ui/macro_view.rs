//! Macroeconomic Indicators: indicator list, title with explanation, chart.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use tickerdash_core::dashboard::{ChartRenderer, MacroTitle};

use crate::app::AppState;
use crate::charts::TerminalCharts;
use crate::theme::{self, Theme};
use crate::ui::draw_region;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(area);

    render_indicators(f, cols[0], app);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(6)])
        .split(cols[1]);

    draw_region(f, rows[0], &app.macro_view.title, render_title);
    draw_region(f, rows[1], &app.macro_view.chart, |f, area, spec| {
        f.render_widget(&TerminalCharts::default().render(spec), area)
    });
}

fn render_indicators(f: &mut Frame, area: Rect, app: &AppState) {
    let names = app.reference.indicator_names();
    let current = app.indicator();
    let items: Vec<ListItem> = names
        .iter()
        .map(|n| ListItem::new(Span::styled(*n, theme::text())))
        .collect();
    let selected = names.iter().position(|n| *n == current);

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::RIGHT)
                .border_style(theme::muted()),
        )
        .highlight_style(theme::selected())
        .highlight_symbol(">");
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn render_title(f: &mut Frame, area: Rect, title: &MacroTitle) {
    let mut first = vec![
        Span::styled(title.indicator.as_str(), theme::accent_bold()),
        Span::styled(format!("  [{}]", title.series_id), theme::muted()),
    ];
    if let Some(latest) = &title.latest {
        first.push(Span::styled(
            format!("  latest {:.2} on {}", latest.value, latest.date),
            theme::text(),
        ));
    }
    first.push(Span::styled(
        format!("  {}", title.source.label()),
        theme::text().fg(Theme::default().source_color(title.source)),
    ));

    let lines = vec![
        Line::from(first),
        Line::from(Span::styled(title.explanation.as_str(), theme::secondary())),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}
