//! Bottom status bar: key hints, work in flight, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel, View};
use crate::theme;

fn hints(view: View) -> &'static str {
    match view {
        View::Intro => " j/k:question 1-5:answer 0:clear Enter:submit r:restart",
        View::Stock => " j/k:ticker h/l:range t:details 1-3:view",
        View::Macro => " j/k:indicator 1-3:view",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(hints(app.view), theme::muted()));
    spans.push(Span::styled(" Tab ?:help e:errors q:quit", theme::muted()));

    if app.in_flight() > 0 {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{} loading", app.in_flight()),
            theme::warning(),
        ));
    }

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
