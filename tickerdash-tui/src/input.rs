//! Keyboard input dispatch: overlays, then global keys, then per-view handlers.
//!
//! Digits mean different things per view. On the introduction they answer
//! the focused quiz question; elsewhere `1`..`3` jump to a view.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, View};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Tab => {
            let next = if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.view.prev()
            } else {
                app.view.next()
            };
            app.switch_view(next);
            return;
        }
        KeyCode::BackTab => {
            app.switch_view(app.view.prev());
            return;
        }
        _ => {}
    }

    // 3. View-specific keys.
    match app.view {
        View::Intro => handle_intro_key(app, key),
        View::Stock => handle_stock_key(app, key),
        View::Macro => handle_macro_key(app, key),
    }
}

/// `1`..`3` outside the introduction.
fn jump_to_view(app: &mut AppState, c: char) -> bool {
    let Some(view) = c
        .to_digit(10)
        .and_then(|d| (d as usize).checked_sub(1))
        .and_then(View::from_index)
    else {
        return false;
    };
    app.switch_view(view);
    true
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        _ => {}
    }
}

fn handle_intro_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.focus_question(-1),
        KeyCode::Down | KeyCode::Char('j') => app.focus_question(1),
        KeyCode::Char(c @ '1'..='5') => {
            let score = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
            app.answer_focused(score);
            app.focus_question(1);
        }
        KeyCode::Char('0') | KeyCode::Backspace | KeyCode::Delete => app.answer_focused(None),
        KeyCode::Enter | KeyCode::Char('s') => app.submit_quiz(),
        KeyCode::Char('r') => app.restart_quiz(),
        _ => {}
    }
}

fn handle_stock_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() && jump_to_view(app, c) => {}
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(row) = app.stock.cursor.checked_sub(1) {
                app.select_ticker(row);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let row = app.stock.cursor + 1;
            if row < app.tickers().len() {
                app.select_ticker(row);
            }
        }
        KeyCode::Home | KeyCode::Char('g') => app.select_ticker(0),
        KeyCode::End | KeyCode::Char('G') => {
            if let Some(last) = app.tickers().len().checked_sub(1) {
                app.select_ticker(last);
            }
        }
        KeyCode::Left | KeyCode::Char('h') => app.cycle_range(false),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_range(true),
        KeyCode::Char('t') => app.toggle_detail_tab(),
        _ => {}
    }
}

fn handle_macro_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() && jump_to_view(app, c) => {}
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Left | KeyCode::Char('h') => {
            app.cycle_indicator(false)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Right | KeyCode::Char('l') => {
            app.cycle_indicator(true)
        }
        _ => {}
    }
}
