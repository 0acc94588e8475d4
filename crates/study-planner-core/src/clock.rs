//! Time sources.
//!
//! Ranking needs "today" as a local calendar day while timestamps are UTC, so
//! both come from one [`Clock`] that tests can replace.

use std::sync::{Arc, Mutex, PoisonError};
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::timestamp::Timestamp;

/// Source of the current instant and the current local calendar day.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;

    /// Current local calendar day.
    fn today(&self) -> Date;
}

/// Wall clock. Falls back to UTC when the local offset cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn today(&self) -> Date {
        OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .date()
    }
}

/// Manually driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<OffsetDateTime>>,
    offset: UtcOffset,
}

impl ManualClock {
    /// Clock frozen at `start`, reporting calendar days in UTC.
    #[must_use]
    pub fn new(start: OffsetDateTime) -> Self {
        Self::with_offset(start, UtcOffset::UTC)
    }

    /// Clock frozen at `start`, reporting calendar days in `offset`.
    #[must_use]
    pub fn with_offset(start: OffsetDateTime, offset: UtcOffset) -> Self {
        Self {
            inner: Arc::new(Mutex::new(start)),
            offset,
        }
    }

    /// Move the clock forward (or backward for negative durations).
    pub fn advance(&self, by: Duration) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += by;
    }

    /// Jump to an absolute instant.
    pub fn set(&self, at: OffsetDateTime) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }

    fn current(&self) -> OffsetDateTime {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(self.current())
    }

    fn today(&self) -> Date {
        self.current().to_offset(self.offset).date()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn today(&self) -> Date {
        (**self).today()
    }
}
