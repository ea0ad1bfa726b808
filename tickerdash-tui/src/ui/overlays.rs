//! Overlay widgets: key help and error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys [any key]close ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "Tab / Shift+Tab", "Next / previous view");
    key(&mut lines, "e", "Error history");
    key(&mut lines, "?", "This help");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Introduction");
    key(&mut lines, "j / k", "Focus next / previous question");
    key(&mut lines, "1-5", "Answer the focused question");
    key(&mut lines, "0 / Backspace", "Clear the focused answer");
    key(&mut lines, "Enter / s", "Submit");
    key(&mut lines, "r", "Restart");
    lines.push(Line::from(""));

    section(&mut lines, "Stock Data");
    key(&mut lines, "1-3", "Switch view");
    key(&mut lines, "j / k, g / G", "Select ticker");
    key(&mut lines, "h / l", "Previous / next price range");
    key(&mut lines, "t", "Performance / Background details");
    lines.push(Line::from(""));

    section(&mut lines, "Macroeconomic Indicators");
    key(&mut lines, "1-3", "Switch view");
    key(&mut lines, "j / k", "Select indicator");

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let visible = inner.height as usize / 2;
    let lines: Vec<Line> = app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .take(visible.max(1))
        .flat_map(|(i, err)| {
            let style = if i == app.error_scroll {
                theme::negative().add_modifier(Modifier::BOLD)
            } else {
                theme::muted()
            };
            [
                Line::from(vec![
                    Span::styled(
                        format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                        theme::muted(),
                    ),
                    Span::styled(format!("[{}] ", err.output), theme::warning()),
                ]),
                Line::from(vec![Span::raw("  "), Span::styled(err.message.as_str(), style)]),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &'a str) {
    lines.push(Line::from(Span::styled(title, theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &'a str, action: &'a str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>18}  "), theme::neutral()),
        Span::styled(action, theme::secondary()),
    ]));
}
