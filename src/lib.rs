#![doc(test(attr(deny(warnings))))]

//! Dairy Core keeps the books of a village milk collection center: fat-based
//! pricing, daily and monthly collection totals, and per-farmer statements,
//! behind a scriptable shell.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod notify;
pub mod report;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Dairy Core tracing initialized.");
    });
}
