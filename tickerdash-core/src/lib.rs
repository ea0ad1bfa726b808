//! TickerDash Core: records, retrieval, quiz and the update scheduler.
//!
//! This crate contains everything except the terminal:
//! - Domain records (company profiles, price histories, news, macro series)
//! - Static reference tables embedded at build time
//! - Retrieval facade with live, sample and synthesized tiers
//! - Investor persona quiz state machine
//! - Declarative update scheduler with last-request-wins delivery
//! - Dashboard bindings wiring the controls to the above

pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod quiz;
pub mod reference;
pub mod scheduler;
