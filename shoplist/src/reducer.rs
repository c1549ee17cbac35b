//! Reducer logic for shopping lists.
//!
//! Every action either changes the lists and items it names or, when a target
//! is missing, leaves state as it was. There is no error branch.
//!
//! Lists and items are reached through `Arc::make_mut`, which copies a list or
//! item only when an older state value still shares it. Nothing else is
//! copied.

use crate::actions::ShoppingListAction;
use crate::types::{AppState, Item, ItemId, ListId, ShoppingList};
use shoplist_core::environment::{ClockIds, IdGenerator, MonotonicIds};
use shoplist_core::reducer::Reducer;
use std::sync::Arc;

/// Environment dependencies for shopping lists
///
/// Only action creation reads it; reduction is independent of the
/// environment.
#[derive(Clone)]
pub struct ShoppingEnvironment {
    /// Source of list and item ids
    pub ids: Arc<dyn IdGenerator>,
}

impl ShoppingEnvironment {
    /// Creates a new `ShoppingEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Millisecond timestamps from the system clock
    ///
    /// Two lists (or items) created within the same millisecond get the same
    /// id.
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(ClockIds::system()))
    }

    /// System-clock ids that never repeat within this environment
    #[must_use]
    pub fn monotonic() -> Self {
        Self::new(Arc::new(MonotonicIds::system()))
    }

    /// The id source, for the creators in [`crate::actions`]
    #[must_use]
    pub fn ids(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }
}

impl std::fmt::Debug for ShoppingEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShoppingEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the shopping-list model
#[derive(Clone, Copy, Debug, Default)]
pub struct ShoppingListReducer;

impl ShoppingListReducer {
    /// Creates a new `ShoppingListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies an action to state
    pub fn apply(state: &mut AppState, action: ShoppingListAction) {
        match action {
            ShoppingListAction::AddShoppingList { id, name } => {
                state
                    .shopping_lists
                    .push(Arc::new(ShoppingList::new(id, name)));
            }

            ShoppingListAction::DeleteShoppingList { id } => {
                let before = state.shopping_lists.len();
                state.shopping_lists.retain(|list| list.id != id);
                if state.shopping_lists.len() == before {
                    tracing::trace!(list_id = %id, "No shopping list to delete");
                }
            }

            ShoppingListAction::EditShoppingListName { id, new_name } => {
                let touched = update_lists(state, id, |list| list.name.clone_from(&new_name));
                if touched == 0 {
                    tracing::trace!(list_id = %id, "No shopping list to rename");
                }
            }

            ShoppingListAction::AddItem {
                list_id,
                item_id,
                item,
            } => {
                let touched = update_lists(state, list_id, |list| {
                    list.items.push(Arc::new(Item::new(item_id, item.clone())));
                });
                if touched == 0 {
                    tracing::trace!(list_id = %list_id, "No shopping list to add an item to");
                }
            }

            ShoppingListAction::DeleteItem { list_id, item_id } => {
                let mut touched = 0;
                for list in state
                    .shopping_lists
                    .iter_mut()
                    .filter(|list| list.id == list_id && list.contains_item(item_id))
                {
                    Arc::make_mut(list).items.retain(|item| item.id != item_id);
                    touched += 1;
                }
                if touched == 0 {
                    tracing::trace!(list_id = %list_id, item_id = %item_id, "No item to delete");
                }
            }

            ShoppingListAction::EditItem {
                list_id,
                item_id,
                updated_item,
            } => {
                let touched = update_items(state, list_id, item_id, |item| {
                    item.apply(updated_item.clone());
                });
                if touched == 0 {
                    tracing::trace!(list_id = %list_id, item_id = %item_id, "No item to edit");
                }
            }

            ShoppingListAction::ToggleItemPurchased { list_id, item_id } => {
                let touched = update_items(state, list_id, item_id, |item| {
                    item.purchased = !item.purchased;
                });
                if touched == 0 {
                    tracing::trace!(list_id = %list_id, item_id = %item_id, "No item to toggle");
                }
            }
        }
    }
}

/// Runs `f` on every list with this id, returning how many there were
///
/// Ids are unique in practice; a same-millisecond collision updates every
/// list carrying the id.
fn update_lists<F>(state: &mut AppState, id: ListId, mut f: F) -> usize
where
    F: FnMut(&mut ShoppingList),
{
    let mut touched = 0;
    for list in state.shopping_lists.iter_mut().filter(|list| list.id == id) {
        f(Arc::make_mut(list));
        touched += 1;
    }
    touched
}

/// Runs `f` on every item with `item_id` inside lists with `list_id`
///
/// A list without the item is left shared.
fn update_items<F>(state: &mut AppState, list_id: ListId, item_id: ItemId, mut f: F) -> usize
where
    F: FnMut(&mut Item),
{
    let mut touched = 0;
    for list in state
        .shopping_lists
        .iter_mut()
        .filter(|list| list.id == list_id && list.contains_item(item_id))
    {
        for item in Arc::make_mut(list)
            .items
            .iter_mut()
            .filter(|item| item.id == item_id)
        {
            f(Arc::make_mut(item));
            touched += 1;
        }
    }
    touched
}

impl Reducer for ShoppingListReducer {
    type State = AppState;
    type Action = ShoppingListAction;
    type Environment = ShoppingEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
        Self::apply(state, action);
    }
}

/// Pure transition: the state after `action`, leaving `state` untouched
///
/// Lists and items the action does not touch are shared with `state`.
#[must_use]
pub fn reduce(state: &AppState, action: ShoppingListAction) -> AppState {
    let mut next = state.clone();
    ShoppingListReducer::apply(&mut next, action);
    next
}
