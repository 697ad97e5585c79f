#![doc(test(attr(deny(warnings))))]

//! Budget planner: template-seeded allocation datasets, quantity/unit-cost/budget editing,
//! spreadsheet import and export, and a paginated text report, driven from an interactive shell.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod money;
pub mod report;
pub mod spreadsheet;
pub mod templates;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget planner tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
