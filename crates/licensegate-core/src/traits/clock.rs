//! Wall-clock timestamp source.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Source of UTC timestamps for record mutations.
///
/// Successive calls on one clock never return the same instant twice and
/// never go backwards, even if the system clock does.
pub trait Clock: Send + Sync + fmt::Debug + 'static {
    /// Return the next timestamp.
    fn now(&self) -> DateTime<Utc>;
}

/// System clock made strictly increasing at nanosecond granularity.
#[derive(Debug, Default)]
pub struct SystemClock {
    /// Last issued instant, in nanoseconds since the Unix epoch.
    last_nanos: AtomicI64,
}

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX - 1);

        let mut last = self.last_nanos.load(Ordering::Acquire);
        loop {
            let next = wall.max(last + 1);
            match self.last_nanos.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return DateTime::from_timestamp_nanos(next),
                Err(observed) => last = observed,
            }
        }
    }
}
