//! Application state. Single owner, main thread only.
//!
//! The scheduler lives here; handlers run on the worker pool and their
//! completions are published back into the output regions below.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tickerdash_core::dashboard::{
    inputs, outputs, ChartSpec, DashboardOutput, DetailTab, DetailView, MacroTitle, QuizOutcome,
    StockHeader,
};
use tickerdash_core::domain::{PriceRange, RecordSource};
use tickerdash_core::quiz::{QuizView, SLOT_COUNT};
use tickerdash_core::reference::ReferenceTables;
use tickerdash_core::scheduler::{InputValue, Invocation, OutputState, Publication, Scheduler};

use crate::worker::Worker;

const ERROR_HISTORY_CAP: usize = 50;

/// Which view is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    #[default]
    Intro,
    Stock,
    Macro,
}

impl View {
    pub const ALL: [View; 3] = [View::Intro, View::Stock, View::Macro];

    pub fn index(self) -> usize {
        match self {
            View::Intro => 0,
            View::Stock => 1,
            View::Macro => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        View::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Intro => "Introduction",
            View::Stock => "Stock Data",
            View::Macro => "Macroeconomic Indicators",
        }
    }

    pub fn next(self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn prev(self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }

    /// Outputs rendered only while this view is shown.
    pub fn outputs(self) -> &'static [&'static str] {
        match self {
            View::Intro => &[],
            View::Stock => &outputs::STOCK_VIEW,
            View::Macro => &outputs::MACRO_VIEW,
        }
    }
}

/// One output region as the renderer shows it.
#[derive(Debug, Clone, PartialEq)]
pub enum Region<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for Region<T> {
    fn default() -> Self {
        Region::Loading
    }
}

impl<T> Region<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Region::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Region::Ready(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// A failed region, kept for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub output: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct StockState {
    /// Row in the ticker list.
    pub cursor: usize,
    pub header: Region<StockHeader>,
    pub chart: Region<ChartSpec>,
    pub detail: Region<DetailView>,
}

#[derive(Debug, Default)]
pub struct MacroState {
    pub title: Region<MacroTitle>,
    pub chart: Region<ChartSpec>,
}

#[derive(Debug, Default)]
pub struct QuizPanel {
    /// Focused question, 0-based.
    pub focused: usize,
    pub progress: Region<QuizView>,
    /// Nothing until the first button press.
    pub outcome: Option<Region<QuizOutcome>>,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    pub view: View,
    pub running: bool,
    pub reference: Arc<ReferenceTables>,

    pub stock: StockState,
    pub macro_view: MacroState,
    pub quiz: QuizPanel,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,

    scheduler: Scheduler<DashboardOutput>,
    worker: Worker,
    in_flight: usize,
    submits: i64,
    restarts: i64,
}

impl AppState {
    pub fn new(
        scheduler: Scheduler<DashboardOutput>,
        reference: Arc<ReferenceTables>,
        worker: Worker,
    ) -> Self {
        Self {
            view: View::default(),
            running: true,
            reference,
            stock: StockState::default(),
            macro_view: MacroState::default(),
            quiz: QuizPanel::default(),
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            scheduler,
            worker,
            in_flight: 0,
            submits: 0,
            restarts: 0,
        }
    }

    /// Store an input value before [`AppState::start`] without firing anything.
    pub fn seed_input(&mut self, name: &str, value: InputValue) {
        self.scheduler.seed(name, value);
    }

    /// Initial evaluation of every binding.
    pub fn start(&mut self) {
        self.sync_cursor();
        let planned = self.scheduler.plan_all();
        self.launch(planned);
    }

    pub fn input(&self, name: &str) -> &InputValue {
        self.scheduler.inputs().get(name)
    }

    pub fn tickers(&self) -> &[String] {
        self.reference.tickers()
    }

    pub fn selected_ticker(&self) -> Option<&str> {
        self.input(inputs::TICKER).as_text().filter(|t| !t.is_empty())
    }

    pub fn range(&self) -> PriceRange {
        self.input(inputs::RANGE)
            .as_text()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn detail_tab(&self) -> DetailTab {
        self.input(inputs::DETAIL_TAB)
            .as_text()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn indicator(&self) -> &str {
        self.input(inputs::INDICATOR).as_text().unwrap_or_default()
    }

    /// Answer for a 0-based question slot.
    pub fn answer(&self, slot: usize) -> Option<u8> {
        inputs::QUIZ_ANSWERS
            .get(slot)
            .and_then(|name| self.input(name).as_int())
            .and_then(|n| u8::try_from(n).ok())
    }

    /// Handler runs started but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    // ── Input events ─────────────────────────────────────────────────

    /// Record an input change and run whatever it fires.
    pub fn set_input(&mut self, name: &str, value: InputValue) {
        let planned = self.scheduler.plan(name, value);
        self.launch(planned);
    }

    pub fn select_ticker(&mut self, row: usize) {
        let Some(ticker) = self.tickers().get(row).cloned() else {
            return;
        };
        self.stock.cursor = row;
        self.set_input(inputs::TICKER, InputValue::Text(ticker));
    }

    pub fn cycle_range(&mut self, forward: bool) {
        let current = self.range();
        let range = if forward { current.next() } else { current.prev() };
        self.set_input(inputs::RANGE, InputValue::text(range.as_param()));
    }

    pub fn toggle_detail_tab(&mut self) {
        let tab = self.detail_tab().next();
        self.set_input(inputs::DETAIL_TAB, InputValue::text(tab.as_param()));
    }

    pub fn cycle_indicator(&mut self, forward: bool) {
        let names = self.reference.indicator_names();
        if names.is_empty() {
            return;
        }
        let current = names.iter().position(|n| *n == self.indicator()).unwrap_or(0);
        let next = if forward {
            (current + 1) % names.len()
        } else {
            (current + names.len() - 1) % names.len()
        };
        let name = names[next].to_string();
        self.set_input(inputs::INDICATOR, InputValue::Text(name));
    }

    pub fn focus_question(&mut self, delta: isize) {
        let max = SLOT_COUNT as isize - 1;
        self.quiz.focused = (self.quiz.focused as isize + delta).clamp(0, max) as usize;
    }

    /// Answer (or clear) the focused question.
    pub fn answer_focused(&mut self, value: Option<u8>) {
        let name = inputs::QUIZ_ANSWERS[self.quiz.focused];
        self.set_input(name, InputValue::from(value));
    }

    pub fn submit_quiz(&mut self) {
        self.submits += 1;
        self.set_input(inputs::SUBMIT, InputValue::Int(self.submits));
    }

    pub fn restart_quiz(&mut self) {
        self.restarts += 1;
        self.quiz.focused = 0;
        self.set_input(inputs::RESTART, InputValue::Int(self.restarts));
    }

    /// Switch views. Pending work of the view being left is dropped and
    /// re-run when it is shown again.
    pub fn switch_view(&mut self, view: View) {
        if view == self.view {
            return;
        }
        self.scheduler.cancel_outputs(self.view.outputs());
        self.view = view;
        if self.has_pending(view) {
            let planned = self.scheduler.refresh_outputs(view.outputs());
            self.launch(planned);
        }
    }

    // ── Completions ──────────────────────────────────────────────────

    /// Publish whatever the worker finished. Returns true if anything arrived.
    pub fn poll(&mut self) -> bool {
        let completions = self.worker.drain();
        let any = !completions.is_empty();
        for completion in completions {
            self.in_flight = self.in_flight.saturating_sub(1);
            let published = self.scheduler.complete(completion);
            self.publish(published);
        }
        any
    }

    /// Block until every launched run has completed, including runs
    /// launched by the publications themselves.
    pub fn settle(&mut self) {
        while self.in_flight > 0 {
            let Some(completion) = self.worker.recv() else {
                break;
            };
            self.in_flight -= 1;
            let published = self.scheduler.complete(completion);
            self.publish(published);
        }
    }

    pub fn publish(&mut self, published: Vec<Publication<DashboardOutput>>) {
        for Publication { output, state } in published {
            match state {
                OutputState::Ready(value) => self.store(&output, value),
                OutputState::Failed(message) => {
                    self.fail(&output, message.clone());
                    self.push_error(output, message);
                }
            }
        }
    }

    fn launch(&mut self, planned: Vec<Invocation<DashboardOutput>>) {
        if planned.is_empty() {
            return;
        }
        for invocation in &planned {
            let owned: Vec<String> = self.scheduler.outputs_of(invocation.binding_name()).to_vec();
            for output in owned {
                self.mark_loading(&output);
            }
        }
        self.in_flight += planned.len();
        self.worker.submit(planned);
    }

    fn store(&mut self, output: &str, value: DashboardOutput) {
        match value {
            DashboardOutput::Header(header) => {
                if header.history_source == Some(RecordSource::Synthesized) {
                    self.set_warning(format!(
                        "No price data for {}; showing synthesized prices",
                        header.ticker
                    ));
                }
                self.stock.header = Region::Ready(header);
            }
            DashboardOutput::Chart(chart) if output == outputs::PRICE_CHART => {
                self.stock.chart = Region::Ready(chart)
            }
            DashboardOutput::Chart(chart) => self.macro_view.chart = Region::Ready(chart),
            DashboardOutput::Detail(detail) => self.stock.detail = Region::Ready(detail),
            DashboardOutput::MacroTitle(title) => self.macro_view.title = Region::Ready(title),
            DashboardOutput::QuizProgress(view) => self.quiz.progress = Region::Ready(view),
            DashboardOutput::QuizOutcome(outcome) => {
                if let QuizOutcome::Profile(result) = &outcome {
                    self.set_status(format!("Investor profile: {}", result.category.label()));
                }
                self.quiz.outcome = Some(Region::Ready(outcome));
            }
            // Control updates come back in as input events.
            DashboardOutput::Answer(value) => {
                debug!(output, ?value, "answer control updated");
                self.set_input(output, InputValue::from(value));
            }
        }
    }

    fn mark_loading(&mut self, output: &str) {
        match output {
            outputs::STOCK_HEADER => self.stock.header = Region::Loading,
            outputs::PRICE_CHART => self.stock.chart = Region::Loading,
            outputs::DETAIL => self.stock.detail = Region::Loading,
            outputs::MACRO_TITLE => self.macro_view.title = Region::Loading,
            outputs::MACRO_CHART => self.macro_view.chart = Region::Loading,
            // Quiz handlers are local and instant.
            _ => {}
        }
    }

    fn fail(&mut self, output: &str, message: String) {
        match output {
            outputs::STOCK_HEADER => self.stock.header = Region::Failed(message),
            outputs::PRICE_CHART => self.stock.chart = Region::Failed(message),
            outputs::DETAIL => self.stock.detail = Region::Failed(message),
            outputs::MACRO_TITLE => self.macro_view.title = Region::Failed(message),
            outputs::MACRO_CHART => self.macro_view.chart = Region::Failed(message),
            outputs::QUIZ_PROGRESS => self.quiz.progress = Region::Failed(message),
            outputs::QUIZ_RESULT => self.quiz.outcome = Some(Region::Failed(message)),
            _ => {}
        }
    }

    fn has_pending(&self, view: View) -> bool {
        match view {
            View::Intro => false,
            View::Stock => {
                self.stock.header.is_loading()
                    || self.stock.chart.is_loading()
                    || self.stock.detail.is_loading()
            }
            View::Macro => self.macro_view.title.is_loading() || self.macro_view.chart.is_loading(),
        }
    }

    /// Put the ticker cursor on the selected ticker.
    fn sync_cursor(&mut self) {
        if let Some(row) = self
            .selected_ticker()
            .and_then(|t| self.tickers().iter().position(|x| x == t))
        {
            self.stock.cursor = row;
        }
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, output: String, message: String) {
        self.error_history.push_front(ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            output,
            message: message.clone(),
        });
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
