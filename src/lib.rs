#![doc(test(attr(deny(warnings))))]

//! KARA core computes the due calendar of a cooperative's savings contracts
//! and benefactor placements: which payments and commissions fall on which
//! day of a month, how much is paid or outstanding, and how urgent each day is.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("KARA core tracing initialized.");
    });
}
