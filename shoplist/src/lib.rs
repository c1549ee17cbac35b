//! Shopping lists held in a single immutable state value.
//!
//! Users create named lists, add, edit and delete items, and mark items
//! purchased. All of it goes through [`ShoppingListAction`]s reduced by
//! [`ShoppingListReducer`]; nothing is mutated behind the store's back.
//!
//! - [`types`]: `AppState`, `ShoppingList`, `Item` and their ids
//! - [`actions`]: the action enum and one creator per action
//! - [`reducer`]: the reducer, its environment, and the pure [`reduce`]
//! - [`validation`]: checks callers apply to raw input before dispatch
//!
//! # Quick Start
//!
//! ```
//! use shoplist::{actions, shopping_store, ItemDraft, ShoppingEnvironment};
//!
//! # fn main() -> Result<(), shoplist_runtime::StoreError> {
//! let store = shopping_store(ShoppingEnvironment::monotonic());
//! let ids = store.environment().ids();
//!
//! let create = actions::add_shopping_list(ids, "Groceries");
//! let list_id = create.list_id();
//! store.send(create)?;
//! store.send(actions::add_item(ids, list_id, ItemDraft::new("Milk", "2")))?;
//!
//! let remaining = store.state(|s| s.list(list_id).map(|list| list.remaining_count()));
//! assert_eq!(remaining, Some(1));
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod reducer;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use actions::ShoppingListAction;
pub use reducer::{reduce, ShoppingEnvironment, ShoppingListReducer};
pub use types::{AppState, Item, ItemDraft, ItemId, ItemPatch, ListId, ShoppingList};
pub use validation::ValidationError;

use shoplist_runtime::{Store, StoreConfig};

/// Store specialized for shopping lists
pub type ShoppingStore = Store<AppState, ShoppingListAction, ShoppingEnvironment, ShoppingListReducer>;

/// Name the shopping store reports in logs and metrics
pub const STORE_NAME: &str = "shopping_lists";

/// Creates an empty shopping store
#[must_use]
pub fn shopping_store(env: ShoppingEnvironment) -> ShoppingStore {
    shopping_store_with(AppState::new(), env)
}

/// Creates a shopping store starting from `state`
#[must_use]
pub fn shopping_store_with(state: AppState, env: ShoppingEnvironment) -> ShoppingStore {
    Store::with_config(
        state,
        ShoppingListReducer::new(),
        env,
        StoreConfig::default().with_name(STORE_NAME),
    )
}
