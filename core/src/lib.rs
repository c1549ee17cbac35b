//! # Shoplist Core
//!
//! Core traits and types for the Shoplist state container.
//!
//! State lives in a single value and changes only through a closed set of
//! actions applied by a reducer.
//!
//! ## Core Concepts
//!
//! - **State**: The whole in-memory model, an owned and cheaply clonable value
//! - **Action**: A plain description of one state transition
//! - **Reducer**: Pure function `(State, Action) → State`
//! - **Environment**: Injected dependencies (clock, id source) used when
//!   actions are created, never during reduction
//!
//! ## Example
//!
//! ```
//! use shoplist_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut CounterState, action: CounterAction, _env: &()) {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!             CounterAction::Decrement => state.count -= 1,
//!         }
//!     }
//! }
//!
//! let before = CounterState::default();
//! let after = CounterReducer.reduced(&before, CounterAction::Increment, &());
//! assert_eq!(before.count, 0);
//! assert_eq!(after.count, 1);
//! ```

// Re-export commonly used types
pub use action::Action;
pub use environment::{Clock, ClockIds, IdGenerator, MonotonicIds, SystemClock};
pub use reducer::Reducer;

/// Action module - the input vocabulary of a reducer
///
/// Actions are plain values, usually variants of a closed enum, so a `match`
/// over them is checked for exhaustiveness by the compiler.
pub mod action {
    /// Common behavior of action types
    ///
    /// Normally implemented with `#[derive(Action)]` from `shoplist-macros`,
    /// which names each variant in `SCREAMING_SNAKE_CASE`.
    pub trait Action {
        /// Stable tag naming the kind of this action (e.g. `ADD_ITEM`)
        ///
        /// Used for log fields and metric labels.
        fn action_type(&self) -> &'static str;
    }
}

/// Reducer module - the core trait for state transitions
pub mod reducer {
    /// The Reducer trait - all state transition logic lives here
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: Injected dependencies available to the reducer
    ///
    /// A reducer must be deterministic: the same state and action always
    /// produce the same next state. Anything non-deterministic (time, ids)
    /// belongs in the action payload.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Apply an action to state
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to the state being produced
        /// - `action`: The action to apply
        /// - `env`: Reference to injected dependencies
        fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment);

        /// Apply an action to a copy of `state`, leaving the original untouched
        ///
        /// Cheap when the state shares its contents (`Arc`) and the reducer
        /// only copies what it changes.
        fn reduced(
            &self,
            state: &Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Self::State
        where
            Self::State: Clone,
        {
            let mut next = state.clone();
            self.reduce(&mut next, action, env);
            next
        }
    }
}

/// Environment module - dependency injection traits
///
/// Time and identifier generation are abstracted behind traits so that
/// production code reads the system clock while tests stay deterministic.
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of entity identifiers
    pub trait IdGenerator: Send + Sync {
        /// Produce the next raw identifier
        fn next_id(&self) -> i64;
    }

    /// Ids are the clock's current time in milliseconds since the Unix epoch
    ///
    /// Two ids requested within the same millisecond are equal.
    #[derive(Clone)]
    pub struct ClockIds {
        clock: Arc<dyn Clock>,
    }

    impl ClockIds {
        /// Creates an id source reading the given clock
        #[must_use]
        pub fn new(clock: Arc<dyn Clock>) -> Self {
            Self { clock }
        }

        /// Creates an id source reading the system clock
        #[must_use]
        pub fn system() -> Self {
            Self::new(Arc::new(SystemClock))
        }
    }

    impl std::fmt::Debug for ClockIds {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ClockIds").finish_non_exhaustive()
        }
    }

    impl IdGenerator for ClockIds {
        fn next_id(&self) -> i64 {
            self.clock.now().timestamp_millis()
        }
    }

    /// Clock-based ids that are strictly increasing
    ///
    /// Returns the current time in milliseconds unless that is not greater
    /// than the last id handed out, in which case it returns the last id
    /// plus one.
    pub struct MonotonicIds {
        clock: Arc<dyn Clock>,
        last: AtomicI64,
    }

    impl MonotonicIds {
        /// Creates a monotonic id source reading the given clock
        #[must_use]
        pub fn new(clock: Arc<dyn Clock>) -> Self {
            Self {
                clock,
                last: AtomicI64::new(i64::MIN),
            }
        }

        /// Creates a monotonic id source reading the system clock
        #[must_use]
        pub fn system() -> Self {
            Self::new(Arc::new(SystemClock))
        }
    }

    impl std::fmt::Debug for MonotonicIds {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MonotonicIds")
                .field("last", &self.last.load(Ordering::Relaxed))
                .finish_non_exhaustive()
        }
    }

    impl IdGenerator for MonotonicIds {
        fn next_id(&self) -> i64 {
            let now = self.clock.now().timestamp_millis();
            let advance = |last: i64| now.max(last.saturating_add(1));
            // The closure never returns None, so both arms carry the previous value.
            match self
                .last
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(advance(last)))
            {
                Ok(previous) | Err(previous) => advance(previous),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Arc;

    struct StuckClock(DateTime<Utc>);

    impl Clock for StuckClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn stuck_clock() -> Arc<dyn Clock> {
        Arc::new(StuckClock(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()))
    }

    #[test]
    fn clock_ids_use_milliseconds() {
        let ids = ClockIds::new(stuck_clock());
        assert_eq!(ids.next_id(), 1_700_000_000_000);
    }

    #[test]
    fn clock_ids_collide_within_one_tick() {
        let ids = ClockIds::new(stuck_clock());
        assert_eq!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn monotonic_ids_never_repeat_on_a_stuck_clock() {
        let ids = MonotonicIds::new(stuck_clock());
        let first = ids.next_id();
        let second = ids.next_id();
        let third = ids.next_id();
        assert_eq!(first, 1_700_000_000_000);
        assert_eq!(second, first + 1);
        assert_eq!(third, first + 2);
    }

    #[test]
    fn system_ids_are_close_to_now() {
        let before = Utc::now().timestamp_millis();
        let id = ClockIds::system().next_id();
        let after = Utc::now().timestamp_millis();
        assert!(before <= id && id <= after);
    }

    proptest::proptest! {
        #[test]
        fn monotonic_ids_strictly_increase(count in 1usize..64) {
            let ids = MonotonicIds::system();
            let generated: Vec<i64> = (0..count).map(|_| ids.next_id()).collect();
            proptest::prop_assert!(generated.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
