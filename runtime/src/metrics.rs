//! Metric names and descriptions for the Store runtime.
//!
//! The store records through the `metrics` facade. Nothing is exported unless
//! the host application installs a recorder; call [`register_metrics`] once
//! after installing it so the descriptions show up alongside the values.

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Actions applied by a store, labelled by `store` and `action`
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Actions refused because the store was shut down, labelled by `store`
pub const ACTIONS_REJECTED: &str = "store.actions.rejected";

/// Actions that left state unchanged, labelled by `store` and `action`
pub const ACTIONS_UNCHANGED: &str = "store.actions.unchanged";

/// Time spent inside the reducer per action
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Current number of subscribers, labelled by `store`
pub const SUBSCRIBERS: &str = "store.subscribers";

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Total number of actions applied by the store");
    describe_counter!(
        ACTIONS_REJECTED,
        "Actions sent after shutdown and therefore not applied"
    );
    describe_counter!(
        ACTIONS_UNCHANGED,
        "Actions whose target was missing, leaving state unchanged"
    );
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time spent applying a single action"
    );
    describe_gauge!(SUBSCRIBERS, "Number of active state subscribers");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_without_recorder_is_harmless() {
        register_metrics();
        register_metrics();
    }

    #[test]
    fn metric_names_are_distinct() {
        let names = [
            ACTIONS_TOTAL,
            ACTIONS_REJECTED,
            ACTIONS_UNCHANGED,
            REDUCER_DURATION,
            SUBSCRIBERS,
        ];
        for (index, name) in names.iter().enumerate() {
            assert!(!names[index + 1..].contains(name), "duplicate metric {name}");
        }
    }
}
