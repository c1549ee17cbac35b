//! The action vocabulary and its creators.
//!
//! Identifiers for new lists and items are taken when the action is created,
//! so reducing an action never consults a clock.

use crate::types::{ItemDraft, ItemId, ItemPatch, ListId};
use serde::{Deserialize, Serialize};
use shoplist_core::environment::IdGenerator;
use shoplist_macros::Action;

/// Every state transition of the shopping-list model
///
/// Serialized as `{"type": "ADD_ITEM", "payload": {...}}`.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ShoppingListAction {
    /// Append a new empty list
    AddShoppingList {
        /// Id of the new list
        id: ListId,
        /// Name of the new list
        name: String,
    },

    /// Remove a list and its items
    DeleteShoppingList {
        /// List to remove
        id: ListId,
    },

    /// Rename a list
    EditShoppingListName {
        /// List to rename
        id: ListId,
        /// Replacement name
        new_name: String,
    },

    /// Append a new item to a list
    AddItem {
        /// Owning list
        list_id: ListId,
        /// Id of the new item
        item_id: ItemId,
        /// Name and quantity of the new item
        item: ItemDraft,
    },

    /// Remove an item from a list
    DeleteItem {
        /// Owning list
        list_id: ListId,
        /// Item to remove
        item_id: ItemId,
    },

    /// Overwrite some fields of an item
    EditItem {
        /// Owning list
        list_id: ListId,
        /// Item to edit
        item_id: ItemId,
        /// Fields to replace
        updated_item: ItemPatch,
    },

    /// Flip an item's purchased flag
    ToggleItemPurchased {
        /// Owning list
        list_id: ListId,
        /// Item to toggle
        item_id: ItemId,
    },
}

/// Creates a [`ShoppingListAction::AddShoppingList`] with a fresh id
#[must_use]
pub fn add_shopping_list(ids: &dyn IdGenerator, name: impl Into<String>) -> ShoppingListAction {
    ShoppingListAction::AddShoppingList {
        id: ListId::generate(ids),
        name: name.into(),
    }
}

/// Creates a [`ShoppingListAction::DeleteShoppingList`]
#[must_use]
pub const fn delete_shopping_list(id: ListId) -> ShoppingListAction {
    ShoppingListAction::DeleteShoppingList { id }
}

/// Creates a [`ShoppingListAction::EditShoppingListName`]
#[must_use]
pub fn edit_shopping_list_name(id: ListId, new_name: impl Into<String>) -> ShoppingListAction {
    ShoppingListAction::EditShoppingListName {
        id,
        new_name: new_name.into(),
    }
}

/// Creates a [`ShoppingListAction::AddItem`] with a fresh item id
#[must_use]
pub fn add_item(ids: &dyn IdGenerator, list_id: ListId, item: ItemDraft) -> ShoppingListAction {
    ShoppingListAction::AddItem {
        list_id,
        item_id: ItemId::generate(ids),
        item,
    }
}

/// Creates a [`ShoppingListAction::DeleteItem`]
#[must_use]
pub const fn delete_item(list_id: ListId, item_id: ItemId) -> ShoppingListAction {
    ShoppingListAction::DeleteItem { list_id, item_id }
}

/// Creates a [`ShoppingListAction::EditItem`]
#[must_use]
pub const fn edit_item(list_id: ListId, item_id: ItemId, updated_item: ItemPatch) -> ShoppingListAction {
    ShoppingListAction::EditItem {
        list_id,
        item_id,
        updated_item,
    }
}

/// Creates a [`ShoppingListAction::ToggleItemPurchased`]
#[must_use]
pub const fn toggle_item_purchased(list_id: ListId, item_id: ItemId) -> ShoppingListAction {
    ShoppingListAction::ToggleItemPurchased { list_id, item_id }
}

impl ShoppingListAction {
    /// The list this action targets or creates
    #[must_use]
    pub const fn list_id(&self) -> ListId {
        match self {
            Self::AddShoppingList { id, .. }
            | Self::DeleteShoppingList { id }
            | Self::EditShoppingListName { id, .. } => *id,
            Self::AddItem { list_id, .. }
            | Self::DeleteItem { list_id, .. }
            | Self::EditItem { list_id, .. }
            | Self::ToggleItemPurchased { list_id, .. } => *list_id,
        }
    }
}
