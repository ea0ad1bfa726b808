//! TickerDash: three-view terminal dashboard.
//!
//! Views:
//! 1. Introduction: concept cards and the investor quiz
//! 2. Stock Data: header, price chart, performance and background tabs
//! 3. Macroeconomic Indicators: indicator series and explanations

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use tickerdash_core::config::DashboardConfig;
use tickerdash_tui::{input, logging, persistence, ui, AppState};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let _log_guard = logging::init(logging::default_log_dir())?;

    let config = DashboardConfig::load_or_default(None)?;
    let state_path = persistence::default_state_path();
    let persisted = persistence::load(&state_path);

    let mut app = tickerdash_tui::bootstrap(&config)?;
    persistence::apply(&mut app, persisted);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        warn!(error = %e, "failed to save state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exit");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Publish finished handler runs (non-blocking)
        app.poll();

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
