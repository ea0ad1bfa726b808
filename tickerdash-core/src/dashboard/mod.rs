//! Dashboard wiring: the bindings between the renderer's controls and the
//! retrieval facade and quiz.
//!
//! | Triggers | Reads | Outputs |
//! |---|---|---|
//! | `stock.ticker`, `stock.range` | | `stock.header`, `stock.price_chart` |
//! | `stock.detail_tab`, `stock.ticker` | | `stock.detail` |
//! | `macro.indicator` | | `macro.title`, `macro.chart` |
//! | `quiz.q1`..`quiz.q5`, `quiz.submit`, `quiz.restart` | | `quiz.progress`, `quiz.result`, `quiz.q1`..`quiz.q5` |
//!
//! The button inputs are click counters. Cleared answers published on
//! `quiz.q1..q5` are fed back by the renderer as input events.
//!
//! Progress and result share one binding so a submitted result and the
//! `Submitted` state are published together, and an answer change clears both.

pub mod chart;
pub mod views;

pub use chart::{ChartKind, ChartRenderer, ChartSpec};
pub use views::{
    BackgroundView, DetailTab, DetailView, MacroTitle, MetricPanel, PerformanceView, QuizOutcome,
    StockHeader,
};

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::RetrievalFacade;
use crate::domain::{normalize_ticker, PriceRange};
use crate::quiz::{
    validate_score, Emission, QuizEvent, QuizStateMachine, QuizTrigger, QuizView, SLOT_COUNT,
};
use crate::reference::ReferenceTables;
use crate::scheduler::{
    Binding, HandlerContext, HandlerError, InputValue, Scheduler, SchedulerError, Update,
};

/// Input names.
pub mod inputs {
    pub const TICKER: &str = "stock.ticker";
    pub const RANGE: &str = "stock.range";
    pub const DETAIL_TAB: &str = "stock.detail_tab";
    pub const INDICATOR: &str = "macro.indicator";
    pub const QUIZ_ANSWERS: [&str; 5] = ["quiz.q1", "quiz.q2", "quiz.q3", "quiz.q4", "quiz.q5"];
    pub const SUBMIT: &str = "quiz.submit";
    pub const RESTART: &str = "quiz.restart";
}

/// Output names.
pub mod outputs {
    pub const STOCK_HEADER: &str = "stock.header";
    pub const PRICE_CHART: &str = "stock.price_chart";
    pub const DETAIL: &str = "stock.detail";
    pub const MACRO_TITLE: &str = "macro.title";
    pub const MACRO_CHART: &str = "macro.chart";
    pub const QUIZ_PROGRESS: &str = "quiz.progress";
    pub const QUIZ_RESULT: &str = "quiz.result";
    /// Answer slots written back on restart.
    pub const QUIZ_ANSWERS: [&str; 5] = super::inputs::QUIZ_ANSWERS;

    /// Outputs of the stock view.
    pub const STOCK_VIEW: [&str; 3] = [STOCK_HEADER, PRICE_CHART, DETAIL];
    /// Outputs of the macro view.
    pub const MACRO_VIEW: [&str; 2] = [MACRO_TITLE, MACRO_CHART];
}

/// Value published on an output.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardOutput {
    Header(StockHeader),
    Chart(ChartSpec),
    Detail(DetailView),
    MacroTitle(MacroTitle),
    QuizProgress(QuizView),
    QuizOutcome(QuizOutcome),
    /// New value for an answer control; `None` clears it.
    Answer(Option<u8>),
}

/// Read-only state shared by every handler.
#[derive(Clone)]
pub struct DashboardContext {
    pub reference: Arc<ReferenceTables>,
    pub facade: Arc<RetrievalFacade>,
}

impl DashboardContext {
    pub fn new(reference: Arc<ReferenceTables>, facade: Arc<RetrievalFacade>) -> Self {
        Self { reference, facade }
    }
}

/// Register every dashboard binding.
pub fn register_dashboard(
    scheduler: &mut Scheduler<DashboardOutput>,
    ctx: &DashboardContext,
) -> Result<(), SchedulerError> {
    let c = ctx.clone();
    scheduler.register(
        Binding::new("stock_overview", move |h: &HandlerContext| stock_overview(&c, h))
            .on([inputs::TICKER, inputs::RANGE])
            .producing([outputs::STOCK_HEADER, outputs::PRICE_CHART]),
    )?;

    let c = ctx.clone();
    scheduler.register(
        Binding::new("stock_detail", move |h: &HandlerContext| stock_detail(&c, h))
            .on([inputs::DETAIL_TAB, inputs::TICKER])
            .producing([outputs::DETAIL]),
    )?;

    let c = ctx.clone();
    scheduler.register(
        Binding::new("macro_chart", move |h: &HandlerContext| macro_chart(&c, h))
            .on([inputs::INDICATOR])
            .producing([outputs::MACRO_TITLE, outputs::MACRO_CHART]),
    )?;

    let mut quiz_triggers = inputs::QUIZ_ANSWERS.to_vec();
    quiz_triggers.extend([inputs::SUBMIT, inputs::RESTART]);
    let mut quiz_outputs = vec![outputs::QUIZ_PROGRESS, outputs::QUIZ_RESULT];
    quiz_outputs.extend(outputs::QUIZ_ANSWERS);
    scheduler.register(
        Binding::new("quiz", quiz_controls)
            .on(quiz_triggers)
            .producing(quiz_outputs),
    )?;

    Ok(())
}

/// Starting input values. Quiz answers start unset.
pub fn initial_inputs(
    config: &DashboardConfig,
    reference: &ReferenceTables,
) -> Vec<(&'static str, InputValue)> {
    let indicator = if reference.indicator(&config.default_indicator).is_some() {
        config.default_indicator.clone()
    } else {
        reference
            .indicators()
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_default()
    };
    vec![
        (inputs::TICKER, InputValue::Text(normalize_ticker(&config.default_ticker))),
        (inputs::RANGE, InputValue::text(config.default_range.as_param())),
        (inputs::DETAIL_TAB, InputValue::text(DetailTab::default().as_param())),
        (inputs::INDICATOR, InputValue::Text(indicator)),
        (inputs::SUBMIT, InputValue::Int(0)),
        (inputs::RESTART, InputValue::Int(0)),
    ]
}

/// Build a scheduler with every binding registered and inputs seeded.
pub fn build_scheduler(
    config: &DashboardConfig,
    ctx: &DashboardContext,
) -> Result<Scheduler<DashboardOutput>, SchedulerError> {
    let mut scheduler = Scheduler::new();
    register_dashboard(&mut scheduler, ctx)?;
    for (name, value) in initial_inputs(config, &ctx.reference) {
        scheduler.seed(name, value);
    }
    Ok(scheduler)
}

fn selected_ticker(h: &HandlerContext) -> Option<String> {
    h.value(inputs::TICKER)
        .as_text()
        .map(normalize_ticker)
        .filter(|t| !t.is_empty())
}

fn parsed<T: std::str::FromStr + Default>(
    h: &HandlerContext,
    name: &str,
) -> Result<T, HandlerError> {
    match h.value(name) {
        InputValue::Unset => Ok(T::default()),
        InputValue::Text(s) => s.parse().map_err(|_| HandlerError::InvalidInput {
            name: name.to_string(),
            value: s.clone(),
        }),
        other => Err(HandlerError::InvalidInput {
            name: name.to_string(),
            value: other.to_string(),
        }),
    }
}

fn stock_overview(
    ctx: &DashboardContext,
    h: &HandlerContext,
) -> Result<Update<DashboardOutput>, HandlerError> {
    let Some(ticker) = selected_ticker(h) else {
        return Ok(Update::Set(vec![
            DashboardOutput::Header(StockHeader::unselected()),
            DashboardOutput::Chart(ChartSpec::empty("Stock Price", ChartKind::Area)),
        ]));
    };
    let range: PriceRange = parsed(h, inputs::RANGE)?;
    let profile = ctx.facade.profile(&ticker);
    let history = ctx.facade.price_history(&ticker, range);
    Ok(Update::Set(vec![
        DashboardOutput::Header(StockHeader::new(&profile, &history)),
        DashboardOutput::Chart(views::price_chart(&history)),
    ]))
}

fn stock_detail(
    ctx: &DashboardContext,
    h: &HandlerContext,
) -> Result<Update<DashboardOutput>, HandlerError> {
    let Some(ticker) = selected_ticker(h) else {
        return Ok(Update::Set(vec![DashboardOutput::Detail(DetailView::Empty(
            views::NO_STOCK_SELECTED.to_string(),
        ))]));
    };
    let tab: DetailTab = parsed(h, inputs::DETAIL_TAB)?;
    let profile = ctx.facade.profile(&ticker);
    let view = match tab {
        DetailTab::Performance => DetailView::Performance(views::performance_view(&profile)),
        DetailTab::Background => {
            let news = ctx.facade.latest_news(&ticker);
            DetailView::Background(views::background_view(&profile, news))
        }
    };
    Ok(Update::Set(vec![DashboardOutput::Detail(view)]))
}

fn macro_chart(
    ctx: &DashboardContext,
    h: &HandlerContext,
) -> Result<Update<DashboardOutput>, HandlerError> {
    let indicator = h.text(inputs::INDICATOR)?;
    if ctx.reference.indicator(indicator).is_none() {
        return Err(HandlerError::InvalidInput {
            name: inputs::INDICATOR.to_string(),
            value: indicator.to_string(),
        });
    }
    let series = ctx.facade.macro_series(indicator);
    Ok(Update::Set(vec![
        DashboardOutput::MacroTitle(MacroTitle::new(&series)),
        DashboardOutput::Chart(views::macro_chart(&series)),
    ]))
}

fn answers(h: &HandlerContext) -> Result<[Option<u8>; SLOT_COUNT], HandlerError> {
    let mut slots = [None; SLOT_COUNT];
    for (slot, name) in slots.iter_mut().zip(inputs::QUIZ_ANSWERS) {
        *slot = match h.value(name) {
            InputValue::Unset => None,
            InputValue::Int(n) => Some(validate_score(*n)?),
            other => {
                return Err(HandlerError::InvalidInput {
                    name: name.to_string(),
                    value: other.to_string(),
                })
            }
        };
    }
    Ok(slots)
}

/// Drive the quiz machine with whatever fired this run.
///
/// - answer change: progress recomputed, any shown outcome cleared
/// - submit: progress (`Submitted` on success) and the outcome
/// - restart: everything cleared, answer controls included
/// - no trigger: progress only; answers and outcome stay as they are
fn quiz_controls(h: &HandlerContext) -> Result<Update<DashboardOutput>, HandlerError> {
    let slots = answers(h)?;
    let mut quiz = QuizStateMachine::with_answers(slots)?;
    let triggered = h.triggered();

    if let Some(index) =
        triggered.and_then(|t| inputs::QUIZ_ANSWERS.iter().position(|n| *n == t))
    {
        quiz.apply(QuizEvent::AnswerChanged {
            index: index + 1,
            value: slots[index],
        })?;
        return Ok(quiz_update(&quiz, Some(QuizOutcome::Cleared)));
    }

    let trigger = match triggered {
        Some(inputs::SUBMIT) => Some(QuizTrigger::Submit),
        Some(inputs::RESTART) => Some(QuizTrigger::Restart),
        _ => None,
    };
    let outcome = match quiz.apply_trigger(trigger) {
        Emission::NoChange | Emission::Progress(_) => None,
        Emission::Rejected(message) => Some(QuizOutcome::Rejected(message.to_string())),
        Emission::Result(result) => Some(QuizOutcome::Profile(result)),
        Emission::Cleared => {
            let mut values = vec![
                DashboardOutput::QuizProgress(quiz.view()),
                DashboardOutput::QuizOutcome(QuizOutcome::Cleared),
            ];
            values.extend(quiz.answers().map(DashboardOutput::Answer));
            return Ok(Update::Set(values));
        }
    };
    Ok(quiz_update(&quiz, outcome))
}

/// Progress plus an optional outcome. Answer controls keep their values.
fn quiz_update(
    quiz: &QuizStateMachine,
    outcome: Option<QuizOutcome>,
) -> Update<DashboardOutput> {
    let mut values = vec![
        Some(DashboardOutput::QuizProgress(quiz.view())),
        outcome.map(DashboardOutput::QuizOutcome),
    ];
    values.extend(std::iter::repeat_with(|| None).take(SLOT_COUNT));
    Update::Partial(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QuizState;
    use crate::scheduler::{OutputState, Publication};

    fn scheduler() -> Scheduler<DashboardOutput> {
        let reference = Arc::new(ReferenceTables::builtin().unwrap());
        let facade = Arc::new(RetrievalFacade::builder(reference.clone()).build());
        let ctx = DashboardContext::new(reference, facade);
        build_scheduler(&DashboardConfig::default(), &ctx).unwrap()
    }

    fn ready(published: &[Publication<DashboardOutput>], output: &str) -> DashboardOutput {
        match &published.iter().find(|p| p.output == output).unwrap().state {
            OutputState::Ready(v) => v.clone(),
            OutputState::Failed(e) => panic!("{output} failed: {e}"),
        }
    }

    #[test]
    fn initial_pass_fills_views_but_not_quiz_result() {
        let mut s = scheduler();
        let published = s.initialize();
        assert!(matches!(
            ready(&published, outputs::STOCK_HEADER),
            DashboardOutput::Header(h) if h.ticker == "NVDA"
        ));
        assert!(matches!(
            ready(&published, outputs::DETAIL),
            DashboardOutput::Detail(DetailView::Performance(_))
        ));
        assert!(matches!(
            ready(&published, outputs::MACRO_TITLE),
            DashboardOutput::MacroTitle(t) if t.series_id == "CPIAUCSL"
        ));
        assert!(matches!(
            ready(&published, outputs::QUIZ_PROGRESS),
            DashboardOutput::QuizProgress(v) if v.state == QuizState::Unanswered
        ));
        assert!(published.iter().all(|p| p.output != outputs::QUIZ_RESULT));
    }

    #[test]
    fn empty_ticker_shows_notice() {
        let mut s = scheduler();
        let published = s.dispatch(inputs::TICKER, InputValue::text(""));
        match ready(&published, outputs::DETAIL) {
            DashboardOutput::Detail(DetailView::Empty(msg)) => {
                assert_eq!(msg, "No stock selected")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_indicator_fails_only_macro_outputs() {
        let mut s = scheduler();
        let published = s.dispatch(inputs::INDICATOR, InputValue::text("Moon Index"));
        assert_eq!(published.len(), 2);
        assert!(published.iter().all(|p| matches!(p.state, OutputState::Failed(_))));
    }

    #[test]
    fn submit_publishes_submitted_progress_with_result() {
        let mut s = scheduler();
        for name in inputs::QUIZ_ANSWERS {
            s.dispatch(name, InputValue::Int(4));
        }
        let published = s.dispatch(inputs::SUBMIT, InputValue::Int(1));
        assert_eq!(published.len(), 2);
        match ready(&published, outputs::QUIZ_PROGRESS) {
            DashboardOutput::QuizProgress(view) => {
                assert_eq!(view.state, QuizState::Submitted);
                assert_eq!(view.result.map(|r| r.total), Some(20));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn restart_publishes_cleared_answers() {
        let mut s = scheduler();
        s.dispatch(inputs::QUIZ_ANSWERS[0], InputValue::Int(3));
        let published = s.dispatch(inputs::RESTART, InputValue::Int(1));
        assert_eq!(published.len(), 7);
        assert_eq!(
            ready(&published, outputs::QUIZ_RESULT),
            DashboardOutput::QuizOutcome(QuizOutcome::Cleared)
        );
        assert_eq!(ready(&published, "quiz.q1"), DashboardOutput::Answer(None));
    }
}
