#![doc(test(attr(deny(warnings))))]

//! spendlog is a personal expense tracker: record expenses, browse and filter
//! them, see where the money goes, and export selections as CSV, JSON or PDF.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("spendlog tracing initialized.");
    });
}
