use ratatui::backend::TestBackend;
use ratatui::Terminal;

use tickerdash_core::config::DashboardConfig;
use tickerdash_tui::{bootstrap, ui, AppState, View};

fn offline_app() -> AppState {
    let mut config = DashboardConfig::default();
    config.provider.offline = true;
    let mut app = bootstrap(&config).unwrap();
    app.start();
    app.settle();
    app
}

fn screen(app: &AppState) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 48)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn intro_shows_cards_and_quiz() {
    let app = offline_app();
    let text = screen(&app);
    assert!(text.contains("Introduction [1]"));
    assert!(text.contains("What kind of investor are you?"));
    assert!(text.contains("Unanswered (0/5)"));
    let first_card = &app.reference.cards()[0].title;
    assert!(text.contains(first_card.as_str()));
}

#[test]
fn stock_view_shows_synthesized_company() {
    let mut app = offline_app();
    app.switch_view(View::Stock);
    app.settle();
    let text = screen(&app);
    assert!(text.contains("(NVDA)"));
    assert!(text.contains("synthesized"));
    assert!(text.contains("Performance"));
    assert!(text.contains("Free Cash Flow"));
}

#[test]
fn background_tab_shows_news() {
    let mut app = offline_app();
    app.switch_view(View::Stock);
    app.toggle_detail_tab();
    app.settle();
    let text = screen(&app);
    assert!(text.contains("Latest News"));
    assert!(text.contains("Industry"));
}

#[test]
fn macro_view_shows_indicator() {
    let mut app = offline_app();
    app.switch_view(View::Macro);
    app.settle();
    let text = screen(&app);
    assert!(text.contains("US Inflation"));
    assert!(text.contains("CPIAUCSL"));
}

#[test]
fn submitted_quiz_shows_profile() {
    let mut app = offline_app();
    for _ in 0..5 {
        app.answer_focused(Some(3));
        app.focus_question(1);
    }
    app.submit_quiz();
    app.settle();
    let text = screen(&app);
    assert!(text.contains("Your Investor Profile:"));
    assert!(text.contains("Risk-Neutral"));
}

#[test]
fn incomplete_quiz_shows_validation_message() {
    let mut app = offline_app();
    app.answer_focused(Some(2));
    app.submit_quiz();
    app.settle();
    let text = screen(&app);
    assert!(text.contains("Please answer all questions."));
}
