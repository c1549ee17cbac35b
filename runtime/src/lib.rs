//! # Shoplist Runtime
//!
//! The Store runtime: owns the current state value, applies actions through a
//! reducer one at a time in dispatch order, and notifies subscribers.
//!
//! ## Core Components
//!
//! - **Store**: Holds state, reducer and environment; `send` applies actions
//! - **Subscriptions**: Callbacks invoked with the new state after each action
//! - **`StoreConfig`**: Name used in logs and metrics, notification policy
//!
//! ## Example
//!
//! ```ignore
//! use shoplist_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use shoplist_core::{action::Action, reducer::Reducer};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Metric names and descriptions
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// Reduction itself cannot fail; errors only come from the store's
    /// lifecycle.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shut down and not accepting new actions
        ///
        /// Returned when `send()` is called after `shutdown()`.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use shoplist_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_name("shopping")
///     .with_notify_unchanged(false);
///
/// assert_eq!(config.name, "shopping");
/// assert!(!config.notify_unchanged);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Label attached to spans, log events and metrics of this store
    pub name: String,
    /// Whether subscribers are called after an action that left state equal
    pub notify_unchanged: bool,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub fn new(name: impl Into<String>, notify_unchanged: bool) -> Self {
        Self {
            name: name.into(),
            notify_unchanged,
        }
    }

    /// Set the store name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set whether subscribers hear about no-op actions
    #[must_use]
    pub const fn with_notify_unchanged(mut self, notify: bool) -> Self {
        self.notify_unchanged = notify;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            notify_unchanged: true,
        }
    }
}

/// Identifies a subscription so it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Lock a mutex, recovering the value if a previous holder panicked
///
/// The store only ever replaces its state with a fully reduced value, so a
/// poisoned lock still guards a consistent state.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Store module - the runtime coordinator
pub mod store {
    use super::{
        lock, metrics, read, write, Action, Mutex, Reducer, RwLock, StoreConfig, StoreError,
        SubscriptionId,
    };
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::time::Instant;

    type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

    /// Clears the delivering flag even if a subscriber panics
    struct Delivering<'a>(&'a AtomicBool);

    impl Drop for Delivering<'_> {
        fn drop(&mut self) {
            self.0.store(false, Ordering::Release);
        }
    }

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (the single current value)
    /// 2. Reducer (all transition logic)
    /// 3. Environment (injected dependencies, handed to the reducer)
    /// 4. Subscribers (notified after each applied action)
    ///
    /// Each `send` clones the current state (cheap for `Arc`-shared state),
    /// reduces the clone, then swaps it in. Earlier snapshots handed out by
    /// [`Store::snapshot`] are never modified.
    ///
    /// New states are queued for subscribers while the state lock is held and
    /// delivered by one thread at a time, so subscribers always see states in
    /// the order actions were applied.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Mutex<S>,
        reducer: R,
        environment: E,
        config: StoreConfig,
        subscribers: RwLock<Vec<(SubscriptionId, Listener<S>)>>,
        pending: Mutex<VecDeque<S>>,
        delivering: AtomicBool,
        next_subscription: AtomicU64,
        shutdown: AtomicBool,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Clone + PartialEq,
        A: Action,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            Self {
                state: Mutex::new(initial_state),
                reducer,
                environment,
                config,
                subscribers: RwLock::new(Vec::new()),
                pending: Mutex::new(VecDeque::new()),
                delivering: AtomicBool::new(false),
                next_subscription: AtomicU64::new(0),
                shutdown: AtomicBool::new(false),
            }
        }

        /// Apply an action to the current state
        ///
        /// The action is reduced to completion before this returns; a later
        /// `send` observes its result. Subscribers are called afterwards,
        /// outside the state lock, so they may read state or send again. If
        /// another call is already delivering, the new state is handed to it
        /// and this call returns without waiting for subscribers.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shut down.
        #[tracing::instrument(
            skip(self, action),
            name = "store_send",
            fields(store = %self.config.name, action = action.action_type())
        )]
        pub fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shut down");
                metrics::counter!(metrics::ACTIONS_REJECTED, "store" => self.config.name.clone())
                    .increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            let action_type = action.action_type();
            tracing::debug!("Processing action");

            let changed = {
                let mut state = lock(&self.state);

                let start = Instant::now();
                let next = self.reducer.reduced(&state, action, &self.environment);
                metrics::histogram!(metrics::REDUCER_DURATION)
                    .record(start.elapsed().as_secs_f64());

                let changed = next != *state;
                if changed || self.config.notify_unchanged {
                    lock(&self.pending).push_back(next.clone());
                }
                *state = next;
                changed
            };

            metrics::counter!(
                metrics::ACTIONS_TOTAL,
                "store" => self.config.name.clone(),
                "action" => action_type
            )
            .increment(1);

            if !changed {
                tracing::debug!("Action left state unchanged");
                metrics::counter!(
                    metrics::ACTIONS_UNCHANGED,
                    "store" => self.config.name.clone(),
                    "action" => action_type
                )
                .increment(1);
            }

            self.deliver();
            Ok(())
        }

        /// Apply several actions in order
        ///
        /// Stops at the first rejected action.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shut down.
        pub fn send_all<I>(&self, actions: I) -> Result<(), StoreError>
        where
            I: IntoIterator<Item = A>,
        {
            actions.into_iter().try_for_each(|action| self.send(action))
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let list_count = store.state(|s| s.list_count());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = lock(&self.state);
            f(&state)
        }

        /// Clone of the current state value
        #[must_use]
        pub fn snapshot(&self) -> S {
            lock(&self.state).clone()
        }

        /// Register a callback run with the new state after every action
        pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
        where
            F: Fn(&S) + Send + Sync + 'static,
        {
            let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
            let count = {
                let mut subscribers = write(&self.subscribers);
                subscribers.push((id, Arc::new(listener)));
                subscribers.len()
            };
            self.record_subscribers(count);
            tracing::debug!(store = %self.config.name, subscription = id.0, "Subscribed");
            id
        }

        /// Remove a subscription
        ///
        /// Returns `false` if it was already removed.
        pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
            let (removed, count) = {
                let mut subscribers = write(&self.subscribers);
                let before = subscribers.len();
                subscribers.retain(|(existing, _)| *existing != id);
                (subscribers.len() != before, subscribers.len())
            };
            if removed {
                self.record_subscribers(count);
                tracing::debug!(store = %self.config.name, subscription = id.0, "Unsubscribed");
            }
            removed
        }

        /// Number of active subscriptions
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            read(&self.subscribers).len()
        }

        /// Injected dependencies, for building actions outside the reducer
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// This store's configuration
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// Stop accepting actions
        ///
        /// State stays readable. Calling this twice is harmless.
        pub fn shutdown(&self) {
            if !self.shutdown.swap(true, Ordering::AcqRel) {
                tracing::info!(store = %self.config.name, "Store shut down");
            }
        }

        /// Whether [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shut_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Drain queued states to subscribers unless another call is doing so
        fn deliver(&self) {
            while self
                .delivering
                .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                let guard = Delivering(&self.delivering);
                loop {
                    let next = lock(&self.pending).pop_front();
                    let Some(state) = next else { break };
                    self.notify(&state);
                }
                drop(guard);

                // A state queued after the last pop but before the flag was
                // cleared would otherwise wait for the next send.
                if lock(&self.pending).is_empty() {
                    break;
                }
            }
        }

        fn notify(&self, state: &S) {
            // Clone the handles so listeners can (un)subscribe while being called.
            let listeners: Vec<Listener<S>> = read(&self.subscribers)
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();

            tracing::trace!("Notifying {} subscribers", listeners.len());
            for listener in listeners {
                listener(state);
            }
        }

        #[allow(clippy::cast_precision_loss)] // subscriber counts are small
        fn record_subscribers(&self, count: usize) {
            metrics::gauge!(metrics::SUBSCRIBERS, "store" => self.config.name.clone())
                .set(count as f64);
        }
    }

    impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("config", &self.config)
                .field("shutdown", &self.shutdown.load(Ordering::Relaxed))
                .finish_non_exhaustive()
        }
    }
}

pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use shoplist_macros::Action;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TestState {
        value: i64,
        log: Vec<i64>,
    }

    #[derive(Action, Clone, Debug)]
    enum TestAction {
        Add(i64),
        Noop,
        Explode,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(&self, state: &mut TestState, action: TestAction, _env: &()) {
            match action {
                TestAction::Add(n) => {
                    state.value += n;
                    state.log.push(n);
                }
                TestAction::Noop => {}
                TestAction::Explode => {
                    state.value = -1;
                    panic!("reducer failed");
                }
            }
        }
    }

    fn store() -> Store<TestState, TestAction, (), TestReducer> {
        Store::new(TestState::default(), TestReducer, ())
    }

    #[test]
    fn test_send_applies_action() {
        let store = store();
        store.send(TestAction::Add(3)).unwrap();
        assert_eq!(store.state(|s| s.value), 3);
    }

    #[test]
    fn test_actions_apply_in_dispatch_order() {
        let store = store();
        store
            .send_all([TestAction::Add(1), TestAction::Add(2), TestAction::Add(3)])
            .unwrap();
        assert_eq!(store.state(|s| s.log.clone()), vec![1, 2, 3]);
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_actions() {
        let store = store();
        store.send(TestAction::Add(1)).unwrap();
        let before = store.snapshot();
        store.send(TestAction::Add(1)).unwrap();
        assert_eq!(before.value, 1);
        assert_eq!(store.snapshot().value, 2);
    }

    #[test]
    fn test_subscribers_see_new_state() {
        let store = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |state: &TestState| sink.lock().unwrap().push(state.value));

        store.send(TestAction::Add(2)).unwrap();
        store.send(TestAction::Add(5)).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![2, 7]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_: &TestState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.send(TestAction::Add(1)).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.send(TestAction::Add(1)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_unchanged_notification_policy() {
        let quiet = Store::with_config(
            TestState::default(),
            TestReducer,
            (),
            StoreConfig::default().with_notify_unchanged(false),
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        quiet.subscribe(move |_: &TestState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        quiet.send(TestAction::Noop).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        quiet.send(TestAction::Add(1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_policy_notifies_on_noop() {
        let store = store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        store.subscribe(move |_: &TestState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.send(TestAction::Noop).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shutdown_rejects_actions() {
        let store = store();
        store.send(TestAction::Add(4)).unwrap();
        store.shutdown();
        store.shutdown();

        assert!(store.is_shut_down());
        assert_eq!(
            store.send(TestAction::Add(1)),
            Err(StoreError::ShutdownInProgress)
        );
        assert_eq!(store.state(|s| s.value), 4);
    }

    #[test]
    fn test_reducer_panic_keeps_previous_state() {
        let store = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |state: &TestState| sink.lock().unwrap().push(state.value));

        store.send(TestAction::Add(1)).unwrap();
        let result = catch_unwind(AssertUnwindSafe(|| store.send(TestAction::Explode)));
        assert!(result.is_err());

        // The half-reduced clone was discarded and the lock still works.
        assert_eq!(store.state(|s| s.value), 1);
        store.send(TestAction::Add(1)).unwrap();
        assert_eq!(store.state(|s| s.value), 2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.name, "store");
        assert!(config.notify_unchanged);
        assert_eq!(StoreConfig::new("lists", false).name, "lists");
    }
}
