//! Stock Data: ticker list, header, price chart and the detail tabs.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use tickerdash_core::dashboard::{
    BackgroundView, ChartRenderer, DetailTab, DetailView, MetricPanel, PerformanceView, StockHeader,
};
use tickerdash_core::domain::{PriceRange, RecordSource};

use crate::app::AppState;
use crate::charts::TerminalCharts;
use crate::theme::{self, Theme};
use crate::ui::draw_region;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(20)])
        .split(area);

    render_tickers(f, cols[0], app);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Min(6),
        ])
        .split(cols[1]);

    draw_region(f, rows[0], &app.stock.header, render_header);
    render_range_tabs(f, rows[1], app.range());
    draw_region(f, rows[2], &app.stock.chart, |f, area, spec| {
        f.render_widget(&TerminalCharts::default().render(spec), area)
    });
    render_detail_tabs(f, rows[3], app.detail_tab());
    draw_region(f, rows[4], &app.stock.detail, render_detail);
}

fn render_tickers(f: &mut Frame, area: Rect, app: &AppState) {
    let selected = app.selected_ticker();
    let items: Vec<ListItem> = app
        .tickers()
        .iter()
        .map(|t| {
            let style = if Some(t.as_str()) == selected {
                theme::accent_bold()
            } else {
                theme::text()
            };
            ListItem::new(Span::styled(t.as_str(), style))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::RIGHT)
                .border_style(theme::muted()),
        )
        .highlight_style(theme::selected())
        .highlight_symbol(">");

    let mut state = ListState::default().with_selected(Some(app.stock.cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn source_span(label: &str, source: Option<RecordSource>) -> Vec<Span<'static>> {
    match source {
        Some(source) => vec![
            Span::styled(format!(" {label}:"), theme::muted()),
            Span::styled(
                source.label(),
                theme::text().fg(Theme::default().source_color(source)),
            ),
        ],
        None => Vec::new(),
    }
}

fn render_header(f: &mut Frame, area: Rect, header: &StockHeader) {
    let mut first = vec![Span::styled(header.title.as_str(), theme::accent_bold())];
    if let Some(close) = header.last_close {
        first.push(Span::styled(format!("  {close:.2}"), theme::text()));
    }
    if let Some(change) = header.change_pct {
        first.push(Span::styled(
            format!(" ({change:+.2}%)"),
            theme::text().fg(Theme::default().change_color(change)),
        ));
    }

    let mut second: Vec<Span> = Vec::new();
    if !header.logo_url.is_empty() {
        second.push(Span::styled(header.logo_url.as_str(), theme::muted()));
    }
    second.extend(source_span("profile", header.profile_source));
    second.extend(source_span("prices", header.history_source));

    f.render_widget(Paragraph::new(vec![Line::from(first), Line::from(second)]), area);
}

fn render_range_tabs(f: &mut Frame, area: Rect, range: PriceRange) {
    let index = PriceRange::ALL.iter().position(|r| *r == range).unwrap_or(0);
    let tabs = Tabs::new(PriceRange::ALL.iter().map(|r| r.label()))
        .select(index)
        .style(theme::muted())
        .highlight_style(theme::selected());
    f.render_widget(tabs, area);
}

fn render_detail_tabs(f: &mut Frame, area: Rect, tab: DetailTab) {
    let index = match tab {
        DetailTab::Performance => 0,
        DetailTab::Background => 1,
    };
    let tabs = Tabs::new(["Performance", "Background"])
        .select(index)
        .style(theme::muted())
        .highlight_style(theme::selected());
    f.render_widget(tabs, area);
}

fn render_detail(f: &mut Frame, area: Rect, detail: &DetailView) {
    match detail {
        DetailView::Empty(message) => f.render_widget(
            Paragraph::new(Span::styled(message.as_str(), theme::muted())),
            area,
        ),
        DetailView::Performance(view) => render_performance(f, area, view),
        DetailView::Background(view) => render_background(f, area, view),
    }
}

/// Metric cards in a two-by-two grid.
fn render_performance(f: &mut Frame, area: Rect, view: &PerformanceView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area);
    let cells: Vec<Rect> = rows
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
                .split(*row)
                .to_vec()
        })
        .collect();

    let charts = TerminalCharts::default();
    for (panel, cell) in view.panels.iter().zip(cells) {
        render_metric(f, cell, panel, &charts);
    }
}

fn render_metric(f: &mut Frame, area: Rect, panel: &MetricPanel, charts: &TerminalCharts) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let mut lines = vec![Line::from(Span::styled(
        panel.title.as_str(),
        theme::accent_bold(),
    ))];
    lines.extend(
        panel
            .lines
            .iter()
            .map(|l| Line::from(Span::styled(l.as_str(), theme::secondary()))),
    );
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), parts[0]);
    f.render_widget(&charts.render(&panel.chart), parts[1]);
}

fn render_background(f: &mut Frame, area: Rect, view: &BackgroundView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mut about = vec![
        Line::from(Span::styled("About", theme::accent_bold())),
        Line::from(Span::styled(view.description.as_str(), theme::text())),
        Line::from(""),
    ];
    for (label, value) in [
        ("Industry", &view.industry),
        ("Sector", &view.sector),
        ("Website", &view.website),
    ] {
        about.push(Line::from(vec![
            Span::styled(format!("{label:>9}: "), theme::muted()),
            Span::styled(value.as_str(), theme::neutral()),
        ]));
    }
    f.render_widget(Paragraph::new(about).wrap(Wrap { trim: true }), cols[0]);

    let news = &view.news;
    let lines = vec![
        Line::from(Span::styled("Latest News", theme::accent_bold())),
        Line::from(Span::styled(
            news.title.as_str(),
            theme::text().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} | {}",
                news.source,
                news.published_at.format("%Y-%m-%d %H:%M UTC")
            ),
            theme::muted(),
        )),
        Line::from(Span::styled(view.excerpt.as_str(), theme::secondary())),
        Line::from(Span::styled(news.link.as_str(), theme::neutral())),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::LEFT)
                    .border_style(theme::muted()),
            )
            .wrap(Wrap { trim: true }),
        cols[1],
    );
}
