//! Shared fixtures for store integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use studio_store::{Clock, FixedClock, StoreOptions, TerminalStatePolicy};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 20, 18, 30, 0).unwrap()
}

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(fixed_now()))
}

pub fn options() -> StoreOptions {
    StoreOptions::default()
}

pub fn rejecting_options() -> StoreOptions {
    StoreOptions {
        terminal_policy: TerminalStatePolicy::Reject,
        ..StoreOptions::default()
    }
}
