//! # Shoplist Testing
//!
//! Testing utilities and helpers for the Shoplist state container.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Log capture setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use shoplist_testing::{ReducerTest, SequentialIds};
//!
//! let ids = SequentialIds::starting_at(1);
//!
//! ReducerTest::new(ShoppingListReducer)
//!     .with_env(ShoppingEnvironment::new(Arc::new(ids.clone())))
//!     .given_state(AppState::new())
//!     .when_action(actions::add_shopping_list(&ids, "Groceries"))
//!     .then_state(|state| assert_eq!(state.list_count(), 1))
//!     .run();
//! ```

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use shoplist_core::environment::{Clock, IdGenerator};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

mod reducer_test;

pub use reducer_test::ReducerTest;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Arc, AtomicI64, Clock, DateTime, IdGenerator, Ordering, TimeDelta, TimeZone, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use shoplist_testing::mocks::FixedClock;
    /// use shoplist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }

    /// 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn test_epoch() -> DateTime<Utc> {
        Utc.timestamp_nanos(1_735_689_600_000_000_000)
    }

    /// Clock that moves forward by a fixed step on every reading
    ///
    /// Models actions created at distinct logical times. Clones share the
    /// same position.
    #[derive(Debug, Clone)]
    pub struct SteppingClock {
        start: DateTime<Utc>,
        step_millis: i64,
        ticks: Arc<AtomicI64>,
    }

    impl SteppingClock {
        /// Start at `start`, advancing `step` after each reading
        #[must_use]
        pub fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
            Self {
                start,
                step_millis: step.num_milliseconds(),
                ticks: Arc::new(AtomicI64::new(0)),
            }
        }

        /// Start at [`test_epoch`], advancing one millisecond per reading
        #[must_use]
        pub fn millis() -> Self {
            Self::new(test_epoch(), TimeDelta::milliseconds(1))
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            let millis = self
                .start
                .timestamp_millis()
                .saturating_add(tick.saturating_mul(self.step_millis));
            Utc.timestamp_millis_opt(millis).single().unwrap_or(self.start)
        }
    }

    /// Predictable ids: `start`, `start + 1`, ...
    ///
    /// Clones share the same counter.
    #[derive(Debug, Clone)]
    pub struct SequentialIds {
        next: Arc<AtomicI64>,
    }

    impl SequentialIds {
        /// Ids starting at `start`
        #[must_use]
        pub fn starting_at(start: i64) -> Self {
            Self {
                next: Arc::new(AtomicI64::new(start)),
            }
        }
    }

    impl Default for SequentialIds {
        fn default() -> Self {
            Self::starting_at(1)
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> i64 {
            self.next.fetch_add(1, Ordering::SeqCst)
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Route `tracing` output to the test harness
    ///
    /// Honors `RUST_LOG`; safe to call from every test.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{FixedClock, SequentialIds, SteppingClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.timestamp_millis(), 1_735_689_600_000);
    }

    #[test]
    fn test_stepping_clock_advances() {
        let clock = SteppingClock::millis();
        let first = clock.now();
        let second = clock.clone().now();
        assert_eq!((second - first).num_milliseconds(), 1);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::starting_at(10);
        let shared = ids.clone();
        assert_eq!(ids.next_id(), 10);
        assert_eq!(shared.next_id(), 11);
        assert_eq!(ids.next_id(), 12);
    }

    #[test]
    fn test_init_tracing_twice() {
        init_test_tracing();
        init_test_tracing();
    }
}
