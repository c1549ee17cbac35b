//! Domain types for shopping lists.
//!
//! The whole model is one [`AppState`] value: an ordered sequence of
//! [`ShoppingList`]s, each owning an ordered sequence of [`Item`]s. Lists and
//! items sit behind `Arc`, so cloning a state is shallow and a transition only
//! copies the list and item it actually touches.

use serde::{Deserialize, Serialize};
use shoplist_core::environment::IdGenerator;
use std::sync::Arc;

/// Identifier of a shopping list: its creation time in epoch milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(i64);

impl ListId {
    /// Wraps a raw id
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Takes the next id from `ids`
    #[must_use]
    pub fn generate(ids: &dyn IdGenerator) -> Self {
        Self(ids.next_id())
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an item, unique within its list only
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Wraps a raw id
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Takes the next id from `ids`
    #[must_use]
    pub fn generate(ids: &dyn IdGenerator) -> Self {
        Self(ids.next_id())
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a caller supplies to add an item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    /// Item name
    pub name: String,
    /// Free-form quantity ("2", "500 g", ...)
    pub quantity: String,
}

impl ItemDraft {
    /// Creates a draft without checking its fields
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
        }
    }
}

/// Partial update of an item; `None` leaves a field as it is
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    /// Replacement name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// Replacement purchased flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased: Option<bool>,
}

impl ItemPatch {
    /// Patch that changes nothing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also replace the name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Also replace the quantity
    #[must_use]
    pub fn quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    /// Also replace the purchased flag
    #[must_use]
    pub const fn purchased(mut self, purchased: bool) -> Self {
        self.purchased = Some(purchased);
        self
    }
}

/// A single entry of a shopping list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique within the owning list
    pub id: ItemId,
    /// Item name
    pub name: String,
    /// Free-form quantity
    pub quantity: String,
    /// Whether the item has been bought
    pub purchased: bool,
}

impl Item {
    /// Creates a not-yet-purchased item from a draft
    #[must_use]
    pub fn new(id: ItemId, draft: ItemDraft) -> Self {
        Self {
            id,
            name: draft.name,
            quantity: draft.quantity,
            purchased: false,
        }
    }

    /// Overwrites the fields the patch sets
    pub fn apply(&mut self, patch: ItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(purchased) = patch.purchased {
            self.purchased = purchased;
        }
    }
}

/// A named, ordered collection of items
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    /// Unique within the state
    pub id: ListId,
    /// Display name
    pub name: String,
    /// Items in insertion order
    pub items: Vec<Arc<Item>>,
}

impl ShoppingList {
    /// Creates an empty list
    #[must_use]
    pub fn new(id: ListId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Appends an item (builder style, for constructing fixtures)
    #[must_use]
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(Arc::new(item));
        self
    }

    /// Items in display order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().map(AsRef::as_ref)
    }

    /// Looks up an item by id
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items().find(|item| item.id == id)
    }

    /// Whether an item with this id exists
    #[must_use]
    pub fn contains_item(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Number of items
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of purchased items
    #[must_use]
    pub fn purchased_count(&self) -> usize {
        self.items.iter().filter(|item| item.purchased).count()
    }

    /// Number of items still to buy
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.item_count() - self.purchased_count()
    }

    /// True when the list has items and all of them are purchased
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.purchased)
    }
}

/// The entire in-memory model
///
/// Serialized as `{"shoppingLists": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Lists in display order
    pub shopping_lists: Vec<Arc<ShoppingList>>,
}

impl AppState {
    /// Creates a state with no lists
    #[must_use]
    pub const fn new() -> Self {
        Self {
            shopping_lists: Vec::new(),
        }
    }

    /// Creates a state holding the given lists in order
    #[must_use]
    pub fn from_lists<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = ShoppingList>,
    {
        Self {
            shopping_lists: lists.into_iter().map(Arc::new).collect(),
        }
    }

    /// Lists in display order
    pub fn lists(&self) -> impl Iterator<Item = &ShoppingList> {
        self.shopping_lists.iter().map(AsRef::as_ref)
    }

    /// Looks up a list by id
    #[must_use]
    pub fn list(&self, id: ListId) -> Option<&ShoppingList> {
        self.lists().find(|list| list.id == id)
    }

    /// Looks up an item inside a list
    #[must_use]
    pub fn item(&self, list_id: ListId, item_id: ItemId) -> Option<&Item> {
        self.list(list_id).and_then(|list| list.item(item_id))
    }

    /// Whether a list with this id exists
    #[must_use]
    pub fn contains_list(&self, id: ListId) -> bool {
        self.shopping_lists.iter().any(|list| list.id == id)
    }

    /// Number of lists
    #[must_use]
    pub fn list_count(&self) -> usize {
        self.shopping_lists.len()
    }

    /// True when there are no lists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shopping_lists.is_empty()
    }
}
