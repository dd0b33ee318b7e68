//! Run deadline shared by the directory walks and the change-set fetch.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// An optional point in time after which a run must stop.
///
/// `Deadline::none()` never expires. The value is `Copy` so each stage can
/// hold its own handle without sharing mutable state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Self { at: None }
    }

    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Some(Instant::now() + timeout),
        }
    }

    /// Builds a deadline from an optional number of seconds.
    pub fn from_secs(secs: Option<u64>) -> Self {
        secs.map(|s| Self::after(Duration::from_secs(s)))
            .unwrap_or_default()
    }

    /// Time left before expiry, `None` when unbounded.
    ///
    /// Returns `Some(Duration::ZERO)` once the deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Fails with `DeadlineExceeded` naming `stage` once expired.
    pub fn check(&self, stage: &str) -> Result<()> {
        if self.is_expired() {
            return Err(Error::DeadlineExceeded {
                stage: stage.to_string(),
            });
        }
        Ok(())
    }
}
