//! Shopping-list repository abstraction.
//!
//! The [`ListStore`] trait is the only way the service layer reads or writes
//! lists. Every read returns an owned snapshot; there is no shared mutable
//! list state outside the store.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ShoppingItem, ShoppingList};

/// Computes a list's new items from its current items.
pub type ItemsRewrite<'a> = Box<dyn FnOnce(&[ShoppingItem]) -> Vec<ShoppingItem> + Send + 'a>;

/// Abstract storage backend for shopping lists.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`create_list`](ListStore::create_list) | Create an empty list with a fresh id |
/// | [`ensure_list`](ListStore::ensure_list) | Create a list under a fixed id unless it exists |
/// | [`get_list`](ListStore::get_list) | Snapshot of one list |
/// | [`list_lists`](ListStore::list_lists) | Snapshots of all lists, oldest first |
/// | [`append_items`](ListStore::append_items) | Add items to the end of a list |
/// | [`replace_items`](ListStore::replace_items) | Overwrite a list's items |
/// | [`update_items`](ListStore::update_items) | Rewrite a list's items from their current value, atomically |
/// | [`delete_list`](ListStore::delete_list) | Remove a list |
///
/// Mutating methods return `Ok(None)` / `Ok(false)` when the list does not
/// exist; the caller decides whether that is a 404.
#[async_trait]
pub trait ListStore: Send + Sync {
    async fn create_list(&self, name: &str) -> Result<ShoppingList>;

    async fn ensure_list(&self, id: &str, name: &str) -> Result<ShoppingList>;

    async fn get_list(&self, id: &str) -> Result<Option<ShoppingList>>;

    async fn list_lists(&self) -> Result<Vec<ShoppingList>>;

    async fn append_items(&self, id: &str, items: &[ShoppingItem]) -> Result<Option<ShoppingList>>;

    async fn replace_items(&self, id: &str, items: &[ShoppingItem])
        -> Result<Option<ShoppingList>>;

    /// Read the current items, run `rewrite` on them, and store the result.
    /// No other write to the same list may land between the read and the
    /// store.
    async fn update_items(&self, id: &str, rewrite: ItemsRewrite<'_>)
        -> Result<Option<ShoppingList>>;

    async fn delete_list(&self, id: &str) -> Result<bool>;
}

pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

pub(crate) fn new_list_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
