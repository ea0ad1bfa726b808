//! Introduction: concept cards on the left, the investor quiz on the right.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use tickerdash_core::dashboard::QuizOutcome;
use tickerdash_core::quiz::{QuizView, MAX_SCORE, MIN_SCORE};

use crate::app::AppState;
use crate::theme::{self, Theme};
use crate::ui::draw_region;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_cards(f, cols[0], app);
    render_quiz(f, cols[1], app);
}

fn render_cards(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    for card in app.reference.cards() {
        lines.push(Line::from(Span::styled(card.title.as_str(), theme::accent_bold())));
        lines.push(Line::from(Span::styled(card.text.as_str(), theme::text())));
        if !card.link.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Learn more: ", theme::muted()),
                Span::styled(card.link.as_str(), theme::neutral()),
            ]));
        }
        lines.push(Line::from(""));
    }
    let para = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::RIGHT)
                .border_style(theme::muted()),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn render_quiz(f: &mut Frame, area: Rect, app: &AppState) {
    let questions = app.reference.questions();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(questions.len() as u16 * 2),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    let heading = vec![
        Line::from(Span::styled("What kind of investor are you?", theme::accent_bold())),
        Line::from(Span::styled(app.reference.scale_hint(), theme::muted())),
    ];
    f.render_widget(Paragraph::new(heading).wrap(Wrap { trim: true }), rows[0]);

    let mut lines: Vec<Line> = Vec::new();
    for (slot, question) in questions.iter().enumerate() {
        let focused = slot == app.quiz.focused;
        let marker = if focused { "> " } else { "  " };
        let question_style = if focused {
            theme::accent_bold()
        } else {
            theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, theme::accent()),
            Span::styled(format!("{}. {question}", slot + 1), question_style),
        ]));
        lines.push(scale_line(app.answer(slot)));
    }
    f.render_widget(Paragraph::new(lines), rows[1]);

    draw_region(f, rows[2], &app.quiz.progress, |f, area, view: &QuizView| {
        let text = format!("{} ({}/{})", view.state.label(), filled(view), view.answers.len());
        f.render_widget(Paragraph::new(Span::styled(text, theme::muted())), area);
    });

    match &app.quiz.outcome {
        None => {}
        Some(region) => draw_region(f, rows[3], region, |f, area, outcome| {
            render_outcome(f, area, outcome)
        }),
    }
}

/// `1 2 [3] 4 5` with the chosen score highlighted.
fn scale_line(answer: Option<u8>) -> Line<'static> {
    let mut spans = vec![Span::raw("     ")];
    for score in MIN_SCORE..=MAX_SCORE {
        if answer == Some(score) {
            spans.push(Span::styled(format!("[{score}]"), theme::selected()));
        } else {
            spans.push(Span::styled(format!(" {score} "), theme::muted()));
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn filled(view: &QuizView) -> usize {
    view.answers.iter().filter(|a| a.is_some()).count()
}

fn render_outcome(f: &mut Frame, area: Rect, outcome: &QuizOutcome) {
    let Some((heading, body)) = outcome.text() else {
        return;
    };
    let lines = match outcome {
        QuizOutcome::Profile(result) => {
            let color = Theme::default().risk_color(result.category);
            vec![
                Line::from(Span::styled(heading, theme::accent_bold())),
                Line::from(Span::styled(
                    body,
                    theme::text().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(format!("Score: {}", result.total), theme::muted())),
            ]
        }
        _ => vec![Line::from(Span::styled(heading, theme::warning()))],
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

