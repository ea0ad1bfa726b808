//! Criterion benchmarks for dashboard hot paths.
//!
//! Benchmarks:
//! 1. Scheduler dispatch (plan, run inline, publish) across fan-out sizes
//! 2. Full dashboard input cycle against the synthesized tier
//! 3. Synthesized price history per range

use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tickerdash_core::config::DashboardConfig;
use tickerdash_core::dashboard::{build_scheduler, inputs, DashboardContext};
use tickerdash_core::data::{synth, HistoryKey, RetrievalFacade};
use tickerdash_core::domain::PriceRange;
use tickerdash_core::reference::ReferenceTables;
use tickerdash_core::scheduler::{Binding, HandlerContext, InputValue, Scheduler, Update};

// ── Helpers ──────────────────────────────────────────────────────────

/// `n` bindings all triggered by the same input.
fn fan_out(n: usize) -> Scheduler<usize> {
    let mut s = Scheduler::new();
    for i in 0..n {
        s.register(
            Binding::new(format!("b{i}"), move |h: &HandlerContext| {
                Ok(Update::Set(vec![h.int("x").unwrap_or(0) as usize + i]))
            })
            .on(["x"])
            .producing([format!("out{i}")]),
        )
        .unwrap();
    }
    s
}

// ── 1. Dispatch ──────────────────────────────────────────────────────

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    for n in [1usize, 8, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut s = fan_out(n);
            let mut x = 0i64;
            b.iter(|| {
                x += 1;
                black_box(s.dispatch("x", InputValue::Int(x)))
            });
        });
    }
    group.finish();
}

// ── 2. Dashboard cycle ───────────────────────────────────────────────

fn bench_dashboard_cycle(c: &mut Criterion) {
    let reference = Arc::new(ReferenceTables::builtin().unwrap());
    let facade = Arc::new(RetrievalFacade::builder(reference.clone()).build());
    let ctx = DashboardContext::new(reference.clone(), facade);
    let mut s = build_scheduler(&DashboardConfig::default(), &ctx).unwrap();
    s.initialize();
    let tickers: Vec<String> = reference.tickers().to_vec();
    let mut i = 0usize;

    c.bench_function("dashboard_ticker_change", |b| {
        b.iter(|| {
            i = (i + 1) % tickers.len();
            black_box(s.dispatch(inputs::TICKER, InputValue::text(tickers[i].as_str())))
        });
    });
}

// ── 3. Synthesized history ───────────────────────────────────────────

fn bench_synth_history(c: &mut Criterion) {
    let end = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
    let mut group = c.benchmark_group("synth_history");
    for range in PriceRange::ALL {
        let key = HistoryKey {
            ticker: "BENCH".into(),
            range,
        };
        group.bench_with_input(BenchmarkId::from_parameter(range.as_param()), &key, |b, key| {
            b.iter(|| black_box(synth::price_history(black_box(key), end)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_dispatch,
    bench_dashboard_cycle,
    bench_synth_history
);
criterion_main!(benches);
