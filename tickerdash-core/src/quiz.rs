//! Investor persona quiz: five Likert answers classified into a risk category.
//!
//! State is derived from the slots rather than stored separately:
//! - `Unanswered`: no slot set
//! - `PartiallyAnswered`: 1 to 4 slots set
//! - `FullyAnswered`: all 5 slots set, no result attached
//! - `Submitted`: result computed and attached
//!
//! `Restart` returns to `Unanswered` from any state. A submit with unset slots
//! is rejected with a validation message and changes nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of quiz questions.
pub const SLOT_COUNT: usize = 5;
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Shown when a submit is rejected because a slot is unset.
pub const VALIDATION_MESSAGE: &str = "Please answer all questions.";

/// Errors from malformed quiz events.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("question index {0} is outside 1..=5")]
    IndexOutOfRange(usize),

    #[error("score {0} is outside 1..=5")]
    ScoreOutOfRange(i64),
}

/// Observable quiz state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizState {
    Unanswered,
    PartiallyAnswered,
    FullyAnswered,
    Submitted,
}

impl QuizState {
    pub fn label(self) -> &'static str {
        match self {
            QuizState::Unanswered => "Unanswered",
            QuizState::PartiallyAnswered => "Partially answered",
            QuizState::FullyAnswered => "Ready to submit",
            QuizState::Submitted => "Submitted",
        }
    }
}

/// Risk-tolerance category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    RiskAverse,
    RiskNeutral,
    RiskSeeking,
}

impl RiskCategory {
    /// Inclusive upper bound of the risk-averse band.
    pub const AVERSE_MAX: u32 = 12;
    /// Inclusive upper bound of the risk-neutral band.
    pub const NEUTRAL_MAX: u32 = 18;

    /// `≤ 12` averse, `13..=18` neutral, `≥ 19` seeking.
    pub fn classify(total: u32) -> Self {
        if total <= Self::AVERSE_MAX {
            RiskCategory::RiskAverse
        } else if total <= Self::NEUTRAL_MAX {
            RiskCategory::RiskNeutral
        } else {
            RiskCategory::RiskSeeking
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::RiskAverse => "Risk-Averse",
            RiskCategory::RiskNeutral => "Risk-Neutral",
            RiskCategory::RiskSeeking => "Risk-Seeking",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiskCategory::RiskAverse => {
                "You prefer low-risk investments that prioritize capital preservation. \
                 If you are risk-averse, you prefer safe and predictable outcomes over uncertain \
                 ones, even if the potential reward is higher. For example, you would rather keep \
                 your money in a savings account than invest in stocks that could go up or down. \
                 You prioritize security and avoiding losses over making big profits. Insurance \
                 companies and conservative investors often take a risk-averse approach."
            }
            RiskCategory::RiskNeutral => {
                "You are comfortable with moderate risk to achieve moderate returns. If you are \
                 risk-neutral, you make decisions based only on expected returns, without \
                 worrying about the level of risk. You would be indifferent between a guaranteed \
                 $50 and a 50 percent chance of winning $100 because both have the same expected \
                 value. In business, you might focus purely on potential profits without \
                 factoring in uncertainty."
            }
            RiskCategory::RiskSeeking => {
                "You are willing to take on higher risk for the potential of higher returns. If \
                 you are risk-seeking, you prefer uncertainty and are willing to take bigger risks \
                 for the chance of higher rewards. For example, you might gamble or invest in \
                 high-risk stocks, hoping for big returns despite the possibility of losing money. \
                 You enjoy excitement and are comfortable with uncertainty. Entrepreneurs and \
                 extreme sports athletes often have risk-seeking tendencies."
            }
        }
    }
}

/// A computed quiz result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub total: u32,
    pub category: RiskCategory,
}

impl QuizResult {
    pub fn from_total(total: u32) -> Self {
        Self {
            total,
            category: RiskCategory::classify(total),
        }
    }
}

/// Events accepted by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    /// `index` is 1-based; `None` unsets the slot.
    AnswerChanged { index: usize, value: Option<u8> },
    Submit,
    Restart,
}

/// The button that started an update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizTrigger {
    Submit,
    Restart,
}

/// What an event produced for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Nothing to publish.
    NoChange,
    /// A slot changed; the state was recomputed.
    Progress(QuizState),
    /// Submit rejected; slots untouched.
    Rejected(&'static str),
    /// Submit accepted.
    Result(QuizResult),
    /// Restart cleared everything.
    Cleared,
}

/// Snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizView {
    pub answers: [Option<u8>; SLOT_COUNT],
    pub state: QuizState,
    pub result: Option<QuizResult>,
    /// Validation message from the last rejected submit.
    pub message: Option<String>,
}

/// The quiz state machine. Single instance per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizStateMachine {
    slots: [Option<u8>; SLOT_COUNT],
    result: Option<QuizResult>,
    notice: Option<&'static str>,
}

impl QuizStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a machine pre-filled with answers (no result attached).
    pub fn with_answers(answers: [Option<u8>; SLOT_COUNT]) -> Result<Self, QuizError> {
        for value in answers.iter().flatten() {
            validate_score(i64::from(*value))?;
        }
        Ok(Self {
            slots: answers,
            result: None,
            notice: None,
        })
    }

    pub fn state(&self) -> QuizState {
        if self.result.is_some() {
            return QuizState::Submitted;
        }
        match self.filled() {
            0 => QuizState::Unanswered,
            SLOT_COUNT => QuizState::FullyAnswered,
            _ => QuizState::PartiallyAnswered,
        }
    }

    pub fn answers(&self) -> [Option<u8>; SLOT_COUNT] {
        self.slots
    }

    /// Answer for a 1-based question index.
    pub fn answer(&self, index: usize) -> Result<Option<u8>, QuizError> {
        Ok(self.slots[slot_of(index)?])
    }

    pub fn result(&self) -> Option<QuizResult> {
        self.result
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn view(&self) -> QuizView {
        QuizView {
            answers: self.slots,
            state: self.state(),
            result: self.result,
            message: self.notice.map(str::to_string),
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: QuizEvent) -> Result<Emission, QuizError> {
        match event {
            QuizEvent::AnswerChanged { index, value } => {
                self.set_answer(index, value).map(Emission::Progress)
            }
            QuizEvent::Submit => Ok(self.submit()),
            QuizEvent::Restart => Ok(self.restart()),
        }
    }

    /// Apply the button that fired this update cycle, if any.
    ///
    /// With no trigger (e.g. the initial evaluation pass) nothing changes.
    pub fn apply_trigger(&mut self, trigger: Option<QuizTrigger>) -> Emission {
        match trigger {
            Some(QuizTrigger::Submit) => self.submit(),
            Some(QuizTrigger::Restart) => self.restart(),
            None => Emission::NoChange,
        }
    }

    /// Set or clear a slot. Never submits; any attached result is dropped.
    pub fn set_answer(&mut self, index: usize, value: Option<u8>) -> Result<QuizState, QuizError> {
        let slot = slot_of(index)?;
        if let Some(v) = value {
            validate_score(i64::from(v))?;
        }
        self.slots[slot] = value;
        self.result = None;
        self.notice = None;
        Ok(self.state())
    }

    pub fn submit(&mut self) -> Emission {
        let mut total = 0u32;
        for slot in &self.slots {
            match slot {
                Some(v) => total += u32::from(*v),
                None => {
                    self.notice = Some(VALIDATION_MESSAGE);
                    return Emission::Rejected(VALIDATION_MESSAGE);
                }
            }
        }
        let result = QuizResult::from_total(total);
        self.result = Some(result);
        self.notice = None;
        Emission::Result(result)
    }

    pub fn restart(&mut self) -> Emission {
        self.slots = [None; SLOT_COUNT];
        self.result = None;
        self.notice = None;
        Emission::Cleared
    }
}

/// Check a raw score value (as entered through an input) is in range.
pub fn validate_score(value: i64) -> Result<u8, QuizError> {
    if (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(QuizError::ScoreOutOfRange(value))
    }
}

fn slot_of(index: usize) -> Result<usize, QuizError> {
    if (1..=SLOT_COUNT).contains(&index) {
        Ok(index - 1)
    } else {
        Err(QuizError::IndexOutOfRange(index))
    }
}
