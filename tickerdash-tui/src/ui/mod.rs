//! Top-level UI layout: view tabs, the active view, status bar.

pub mod intro_view;
pub mod macro_view;
pub mod overlays;
pub mod status_bar;
pub mod stock_view;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Region, View};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_tabs(f, chunks[0], app);
    draw_view(f, chunks[1], app);
    status_bar::render(f, chunks[2], app);

    match app.overlay {
        Overlay::Help => overlays::render_help(f, chunks[1]),
        Overlay::ErrorHistory => overlays::render_error_history(f, chunks[1], app),
        Overlay::None => {}
    }
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &AppState) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .map(|v| Line::from(format!(" {} [{}] ", v.label(), v.index() + 1)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.view.index())
        .style(theme::muted())
        .highlight_style(theme::selected())
        .divider(Span::styled("|", theme::muted()));
    f.render_widget(tabs, area);
}

fn draw_view(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} ", app.view.label()))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.view {
        View::Intro => intro_view::render(f, inner, app),
        View::Stock => stock_view::render(f, inner, app),
        View::Macro => macro_view::render(f, inner, app),
    }
}

/// Draw a region: loading and failure placeholders, or the value.
pub fn draw_region<T>(
    f: &mut Frame,
    area: Rect,
    region: &Region<T>,
    ready: impl FnOnce(&mut Frame, Rect, &T),
) {
    match region {
        Region::Ready(value) => ready(f, area, value),
        Region::Loading => {
            f.render_widget(Paragraph::new(Span::styled("Loading...", theme::muted())), area)
        }
        Region::Failed(message) => f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Error: ", theme::negative()),
                Span::styled(message.as_str(), theme::secondary()),
            ]))
            .wrap(Wrap { trim: true }),
            area,
        ),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
