//! Property tests for quiz, scheduler and synthesized-data invariants.
//!
//! Uses proptest to verify:
//! 1. Classification: the category follows the total's thresholds
//! 2. Rejection is non-destructive: an incomplete submit keeps every answer
//! 3. Restart always returns to Unanswered with no result
//! 4. Unchanged inputs fire nothing
//! 5. Last request wins: only the newest ticket per output is current
//! 6. Synthesized history is deterministic and positive

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use tickerdash_core::data::{synth, HistoryKey};
use tickerdash_core::domain::PriceRange;
use tickerdash_core::quiz::{Emission, QuizState, QuizStateMachine, RiskCategory, SLOT_COUNT};
use tickerdash_core::scheduler::{
    Binding, HandlerContext, InputValue, RequestGate, Scheduler, Update,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_full_answers() -> impl Strategy<Value = [u8; SLOT_COUNT]> {
    prop::array::uniform5(1u8..=5)
}

/// Answers with at least one slot left blank.
fn arb_incomplete_answers() -> impl Strategy<Value = [Option<u8>; SLOT_COUNT]> {
    (prop::array::uniform5(prop::option::of(1u8..=5)), 0..SLOT_COUNT).prop_map(
        |(mut answers, blank)| {
            answers[blank] = None;
            answers
        },
    )
}

fn arb_range() -> impl Strategy<Value = PriceRange> {
    prop::sample::select(PriceRange::ALL.to_vec())
}

// ── 1. Classification ────────────────────────────────────────────────

proptest! {
    #[test]
    fn category_follows_thresholds(answers in arb_full_answers()) {
        let mut quiz = QuizStateMachine::with_answers(answers.map(Some)).unwrap();
        let total: u32 = answers.iter().map(|&a| u32::from(a)).sum();
        let Emission::Result(result) = quiz.submit() else {
            return Err(TestCaseError::fail("complete answers must be accepted"));
        };
        prop_assert_eq!(result.total, total);
        let expected = if total <= 12 {
            RiskCategory::RiskAverse
        } else if total <= 18 {
            RiskCategory::RiskNeutral
        } else {
            RiskCategory::RiskSeeking
        };
        prop_assert_eq!(result.category, expected);
        prop_assert_eq!(quiz.state(), QuizState::Submitted);
    }
}

// ── 2. Rejection ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn incomplete_submit_keeps_answers(answers in arb_incomplete_answers()) {
        let mut quiz = QuizStateMachine::with_answers(answers).unwrap();
        let emission = quiz.submit();
        prop_assert!(matches!(emission, Emission::Rejected(_)));
        prop_assert_eq!(quiz.answers(), answers);
        prop_assert!(quiz.result().is_none());
        prop_assert!(quiz.view().message.is_some());
    }
}

// ── 3. Restart ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn restart_always_clears(
        answers in prop::array::uniform5(prop::option::of(1u8..=5)),
        submit_first in any::<bool>(),
    ) {
        let mut quiz = QuizStateMachine::with_answers(answers).unwrap();
        if submit_first {
            quiz.submit();
        }
        prop_assert_eq!(quiz.restart(), Emission::Cleared);
        prop_assert_eq!(quiz.state(), QuizState::Unanswered);
        prop_assert_eq!(quiz.answers(), [None; SLOT_COUNT]);
        prop_assert!(quiz.view().message.is_none());
    }
}

// ── 4. Unchanged inputs ──────────────────────────────────────────────

proptest! {
    #[test]
    fn repeated_value_fires_nothing(values in prop::collection::vec("[a-c]{1,2}", 1..20)) {
        let mut s: Scheduler<String> = Scheduler::new();
        s.register(
            Binding::new("echo", |h: &HandlerContext| {
                Ok(Update::Set(vec![h.value("in").to_string()]))
            })
            .on(["in"])
            .producing(["out"]),
        )
        .unwrap();

        let mut previous: Option<String> = None;
        for v in values {
            let published = s.dispatch("in", InputValue::text(v.clone()));
            if previous.as_deref() == Some(v.as_str()) {
                prop_assert!(published.is_empty());
            } else {
                prop_assert_eq!(published.len(), 1);
            }
            previous = Some(v);
        }
    }
}

// ── 5. Last request wins ─────────────────────────────────────────────

proptest! {
    #[test]
    fn only_newest_ticket_is_current(requests in prop::collection::vec(0usize..4, 1..40)) {
        let names: Vec<String> = (0..4).map(|i| format!("out{i}")).collect();
        let mut gate = RequestGate::new();
        let mut issued: Vec<(usize, u64)> = Vec::new();
        let mut newest: HashMap<usize, u64> = HashMap::new();
        for output in requests {
            let ticket = gate.issue(std::iter::once(&names[output]));
            issued.push((output, ticket));
            newest.insert(output, ticket);
        }
        for (output, ticket) in issued {
            prop_assert_eq!(
                gate.is_current(&names[output], ticket),
                newest[&output] == ticket
            );
        }
    }
}

// ── 6. Synthesized history ───────────────────────────────────────────

proptest! {
    #[test]
    fn synthesized_history_is_stable(ticker in "[A-Z]{1,5}", range in arb_range()) {
        let end = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
        let key = HistoryKey { ticker: ticker.clone(), range };
        let a = synth::price_history(&key, end);
        let b = synth::price_history(&key, end);
        prop_assert_eq!(&a, &b);
        prop_assert!(!a.points.is_empty());
        prop_assert!(a.points.iter().all(|p| p.close > 0.0 && p.close.is_finite()));
        prop_assert!(a.points.windows(2).all(|w| w[0].date < w[1].date));
        prop_assert!(a.points.last().is_some_and(|p| p.date <= end));
    }
}
