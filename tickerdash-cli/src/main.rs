//! TickerDash CLI: one-shot lookups over the dashboard core.
//!
//! Commands:
//! - `tickers`: list the selectable tickers
//! - `info`: company profile with fundamentals
//! - `news`: latest news item for a ticker
//! - `history`: closing prices over a range
//! - `macro`: a macroeconomic indicator series
//! - `quiz`: score five answers and print the investor profile
//!
//! Every record command answers even when the providers are down; the
//! `source` field says which tier produced it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tickerdash_core::config::DashboardConfig;
use tickerdash_core::data::RetrievalFacade;
use tickerdash_core::domain::{
    normalize_ticker, CompanyProfile, MacroSeries, NewsItem, PriceHistory, PriceRange,
};
use tickerdash_core::quiz::{
    validate_score, Emission, QuizEvent, QuizResult, QuizStateMachine, SLOT_COUNT,
};
use tickerdash_core::reference::ReferenceTables;

const NEWS_EXCERPT_CHARS: usize = 300;

#[derive(Parser)]
#[command(
    name = "tickerdash",
    about = "TickerDash CLI: company data, macro indicators and the investor quiz"
)]
struct Cli {
    /// Config file. Defaults to <config dir>/tickerdash/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip the live providers; answer from samples or synthesized data.
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,

    /// Print records as JSON.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable tickers.
    Tickers,
    /// Company profile and fundamentals.
    Info {
        ticker: String,
    },
    /// Latest news item.
    News {
        ticker: String,
    },
    /// Closing-price history.
    History {
        ticker: String,

        /// Lookback window: max, 10y, 5y or 1y.
        #[arg(long, default_value = "10y")]
        range: PriceRange,

        /// Number of most recent points to print (text output only).
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// Macroeconomic indicator series, e.g. "US Inflation".
    Macro {
        name: String,

        /// Number of most recent observations to print (text output only).
        #[arg(long, default_value_t = 12)]
        tail: usize,
    },
    /// Score quiz answers, each 1 (strongly disagree) to 5 (strongly agree).
    Quiz {
        #[arg(num_args = 0..=SLOT_COUNT)]
        answers: Vec<i64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    if let Commands::Quiz { answers } = &cli.command {
        let result = score_quiz(answers)?;
        return print_quiz(&result, cli.json);
    }

    let mut config = DashboardConfig::load_or_default(cli.config.as_deref())
        .context("load configuration")?;
    if cli.offline {
        config.provider.offline = true;
    }
    let reference = Arc::new(
        ReferenceTables::builtin()
            .context("load reference tables")?
            .with_tickers(&config.tickers),
    );
    let facade = RetrievalFacade::from_config(&config, reference.clone())
        .context("build retrieval")?;
    debug!(tiers = ?facade.tier_names(), "retrieval ready");

    match cli.command {
        Commands::Tickers => run_tickers(&reference, cli.json),
        Commands::Info { ticker } => {
            let profile = facade.profile(&normalize_ticker(&ticker));
            emit(&profile, cli.json, print_profile)
        }
        Commands::News { ticker } => {
            let news = facade.latest_news(&normalize_ticker(&ticker));
            emit(&news, cli.json, print_news)
        }
        Commands::History {
            ticker,
            range,
            tail,
        } => {
            let history = facade.price_history(&normalize_ticker(&ticker), range);
            emit(&history, cli.json, |h| print_history(h, tail))
        }
        Commands::Macro { name, tail } => {
            let Some(indicator) = reference.indicator(&name) else {
                bail!(
                    "unknown indicator '{name}'. Valid: {}",
                    reference.indicator_names().join(", ")
                );
            };
            let series = facade.macro_series(&indicator.name);
            emit(&series, cli.json, |s| print_macro(s, tail))
        }
        Commands::Quiz { .. } => Ok(()),
    }
}

/// Warnings and up on stderr unless `RUST_LOG` says otherwise.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn emit<T: Serialize>(record: &T, json: bool, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        text(record);
    }
    Ok(())
}

fn run_tickers(reference: &ReferenceTables, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reference.tickers())?);
        return Ok(());
    }
    for ticker in reference.tickers() {
        println!("{ticker}");
    }
    Ok(())
}

/// Feed the answers through the quiz machine and submit.
fn score_quiz(answers: &[i64]) -> Result<QuizResult> {
    let mut quiz = QuizStateMachine::new();
    for (i, raw) in answers.iter().enumerate() {
        let score = validate_score(*raw).with_context(|| format!("answer {}", i + 1))?;
        quiz.apply(QuizEvent::AnswerChanged {
            index: i + 1,
            value: Some(score),
        })?;
    }
    match quiz.apply(QuizEvent::Submit)? {
        Emission::Result(result) => Ok(result),
        Emission::Rejected(message) => bail!("{message} ({} of {SLOT_COUNT} given)", answers.len()),
        other => bail!("unexpected quiz emission: {other:?}"),
    }
}

fn print_quiz(result: &QuizResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    println!("Your Investor Profile:");
    println!(
        "{}: {}",
        result.category.label(),
        result.category.description()
    );
    println!("Score: {}", result.total);
    Ok(())
}

fn print_profile(p: &CompanyProfile) {
    println!("{}", p.header());
    println!("  Industry:      {}", p.industry);
    println!("  Sector:        {}", p.sector);
    println!("  Website:       {}", p.website);
    if !p.logo_url.is_empty() {
        println!("  Logo:          {}", p.logo_url);
    }
    let f = &p.fundamentals;
    println!("  Free cashflow: {:.0}", f.free_cashflow);
    println!("  Profit margin: {:.2}%", f.profit_margins * 100.0);
    println!("  ROE:           {:.2}%", f.return_on_equity * 100.0);
    println!("  Trailing P/E:  {:.2}", f.trailing_pe);
    println!("  Source:        {}", p.source.label());
    println!();
    println!("{}", p.description);
}

fn print_news(n: &NewsItem) {
    println!("{}", n.title);
    println!("{} | {}", n.source, n.display_date());
    println!();
    println!("{}", n.excerpt(NEWS_EXCERPT_CHARS));
    println!();
    println!("{}", n.link);
    println!("(source: {})", n.origin.label());
}

fn print_history(h: &PriceHistory, tail: usize) {
    println!(
        "{} {} ({} points, source: {})",
        h.ticker,
        h.range.label(),
        h.points.len(),
        h.source.label()
    );
    if let (Some(first), Some(last)) = (h.points.first(), h.points.last()) {
        println!("  {} .. {}", first.date, last.date);
    }
    if let (Some(close), Some(change)) = (h.last_close(), h.change_pct()) {
        println!("  Last close {close:.2} ({change:+.2}% over the range)");
    }
    let skip = h.points.len().saturating_sub(tail);
    for p in &h.points[skip..] {
        println!("  {}  {:>12.2}", p.date, p.close);
    }
}

fn print_macro(s: &MacroSeries, tail: usize) {
    println!(
        "{} [{}] ({} observations, source: {})",
        s.indicator,
        s.series_id,
        s.points.len(),
        s.source.label()
    );
    println!("{}", s.explanation);
    let skip = s.points.len().saturating_sub(tail);
    for p in &s.points[skip..] {
        println!("  {}  {:>12.2}", p.date, p.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerdash_core::quiz::RiskCategory;

    #[test]
    fn quiz_scores_five_answers() {
        let result = score_quiz(&[5, 5, 5, 5, 5]).unwrap();
        assert_eq!(result.total, 25);
        assert_eq!(result.category, RiskCategory::RiskSeeking);

        let result = score_quiz(&[3, 3, 3, 2, 2]).unwrap();
        assert_eq!(result.total, 13);
        assert_eq!(result.category, RiskCategory::RiskNeutral);
    }

    #[test]
    fn quiz_rejects_missing_answers() {
        let err = score_quiz(&[1, 2]).unwrap_err().to_string();
        assert!(err.contains("Please answer all questions."));
        assert!(err.contains("2 of 5"));
    }

    #[test]
    fn quiz_rejects_out_of_range_scores() {
        assert!(score_quiz(&[1, 2, 6, 4, 5]).is_err());
        assert!(score_quiz(&[0, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tickerdash",
            "history",
            "nvda",
            "--range",
            "5y",
            "--offline",
            "--json",
        ])
        .unwrap();
        assert!(cli.offline);
        assert!(cli.json);
        match cli.command {
            Commands::History { ticker, range, tail } => {
                assert_eq!(ticker, "nvda");
                assert_eq!(range, PriceRange::FiveYears);
                assert_eq!(tail, 10);
            }
            _ => panic!("expected history"),
        }
    }

    #[test]
    fn cli_rejects_bad_range() {
        assert!(Cli::try_parse_from(["tickerdash", "history", "NVDA", "--range", "3y"]).is_err());
    }
}
