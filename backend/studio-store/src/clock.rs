//! Time source for seed timestamps and audit events.

use chrono::{DateTime, Duration, Utc};
use std::fmt::Debug;

pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn hours_ago(&self, hours: i64) -> DateTime<Utc> {
        self.now() - Duration::hours(hours)
    }

    fn minutes_ago(&self, minutes: i64) -> DateTime<Utc> {
        self.now() - Duration::minutes(minutes)
    }

    fn days_ago(&self, days: i64) -> DateTime<Utc> {
        self.now() - Duration::days(days)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant. Used by tests so that a reset snapshot
/// compares equal to a fresh one.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
