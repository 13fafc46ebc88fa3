// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recency guard against accidental double invocation
//!
//! A write is refused when the record was modified within the window, unless
//! the caller forces it. This deters two agents advancing the same run back to
//! back; it is not mutual exclusion.

use chrono::{DateTime, Utc};
use sq_core::{Slug, SquadError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyGuard {
    window: Duration,
}

impl RecencyGuard {
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(5000);

    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check whether a write at `now` may proceed.
    ///
    /// A `last_modified` in the future counts as inside the window.
    pub fn check(
        &self,
        slug: &Slug,
        last_modified: DateTime<Utc>,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<(), SquadError> {
        if force {
            return Ok(());
        }
        let elapsed_ms = now.signed_duration_since(last_modified).num_milliseconds();
        let window_ms = u64::try_from(self.window.as_millis()).unwrap_or(u64::MAX);
        let inside = u64::try_from(elapsed_ms).map_or(true, |elapsed| elapsed < window_ms);
        if inside {
            return Err(SquadError::ConcurrentModification {
                slug: slug.to_string(),
                elapsed_ms,
                window_ms,
            });
        }
        Ok(())
    }
}

impl Default for RecencyGuard {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use yare::parameterized;

    fn slug() -> Slug {
        Slug::new("acme").unwrap()
    }

    #[parameterized(
        immediately = { 0, false },
        just_inside = { 4_999, false },
        at_threshold = { 5_000, true },
        well_after = { 60_000, true },
        in_the_future = { -1_000, false },
    )]
    fn default_window_is_five_seconds(elapsed_ms: i64, allowed: bool) {
        let guard = RecencyGuard::default();
        let last = Utc::now();
        let now = last + TimeDelta::milliseconds(elapsed_ms);
        assert_eq!(guard.check(&slug(), last, now, false).is_ok(), allowed);
    }

    #[test]
    fn force_always_passes() {
        let guard = RecencyGuard::default();
        let now = Utc::now();
        assert!(guard.check(&slug(), now, now, true).is_ok());
    }

    #[test]
    fn rejection_reports_elapsed_and_window() {
        let guard = RecencyGuard::new(Duration::from_secs(2));
        let last = Utc::now();
        let err = guard
            .check(&slug(), last, last + TimeDelta::milliseconds(750), false)
            .unwrap_err();
        assert_eq!(err.code(), "CONCURRENT_MODIFICATION");
        assert_eq!(err.details()["elapsed_ms"], 750);
        assert_eq!(err.details()["window_ms"], 2000);
    }

    #[test]
    fn zero_window_disables_the_guard() {
        let guard = RecencyGuard::new(Duration::ZERO);
        let now = Utc::now();
        assert!(guard.check(&slug(), now, now, false).is_ok());
    }
}
