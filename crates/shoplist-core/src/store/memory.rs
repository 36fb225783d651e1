//! In-memory [`ListStore`] implementation for tests and single-process use.
//!
//! Lists live in a `HashMap` behind `std::sync::RwLock`. Contents are lost
//! when the process exits.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{ShoppingItem, ShoppingList};

use super::{new_list_id, now_ts, ItemsRewrite, ListStore};

/// In-memory list store.
pub struct InMemoryListStore {
    lists: RwLock<HashMap<String, ShoppingList>>,
}

impl InMemoryListStore {
    pub fn new() -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
        }
    }

    fn update(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Vec<ShoppingItem>),
    ) -> Result<Option<ShoppingList>> {
        let mut lists = self.lists.write().map_err(|_| anyhow!("list store lock poisoned"))?;
        Ok(lists.get_mut(id).map(|list| {
            apply(&mut list.items);
            list.updated_at = now_ts();
            list.clone()
        }))
    }
}

impl Default for InMemoryListStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListStore for InMemoryListStore {
    async fn create_list(&self, name: &str) -> Result<ShoppingList> {
        let now = now_ts();
        let list = ShoppingList {
            id: new_list_id(),
            name: name.to_string(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let mut lists = self.lists.write().map_err(|_| anyhow!("list store lock poisoned"))?;
        lists.insert(list.id.clone(), list.clone());
        Ok(list)
    }

    async fn ensure_list(&self, id: &str, name: &str) -> Result<ShoppingList> {
        let mut lists = self.lists.write().map_err(|_| anyhow!("list store lock poisoned"))?;
        let list = lists.entry(id.to_string()).or_insert_with(|| {
            let now = now_ts();
            ShoppingList {
                id: id.to_string(),
                name: name.to_string(),
                items: Vec::new(),
                created_at: now,
                updated_at: now,
            }
        });
        Ok(list.clone())
    }

    async fn get_list(&self, id: &str) -> Result<Option<ShoppingList>> {
        let lists = self.lists.read().map_err(|_| anyhow!("list store lock poisoned"))?;
        Ok(lists.get(id).cloned())
    }

    async fn list_lists(&self) -> Result<Vec<ShoppingList>> {
        let lists = self.lists.read().map_err(|_| anyhow!("list store lock poisoned"))?;
        let mut all: Vec<ShoppingList> = lists.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn append_items(&self, id: &str, items: &[ShoppingItem]) -> Result<Option<ShoppingList>> {
        self.update(id, |existing| existing.extend_from_slice(items))
    }

    async fn replace_items(
        &self,
        id: &str,
        items: &[ShoppingItem],
    ) -> Result<Option<ShoppingList>> {
        self.update(id, |existing| *existing = items.to_vec())
    }

    async fn update_items(
        &self,
        id: &str,
        rewrite: ItemsRewrite<'_>,
    ) -> Result<Option<ShoppingList>> {
        self.update(id, |existing| *existing = rewrite(existing.as_slice()))
    }

    async fn delete_list(&self, id: &str) -> Result<bool> {
        let mut lists = self.lists.write().map_err(|_| anyhow!("list store lock poisoned"))?;
        Ok(lists.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    fn item(id: &str, name: &str) -> ShoppingItem {
        ShoppingItem {
            id: id.to_string(),
            name: name.to_string(),
            quantity: 1.0,
            unit: Unit::None,
            category: "produce".to_string(),
            completed: false,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryListStore::new();
        let list = store.create_list("weekly").await.unwrap();
        assert!(list.items.is_empty());

        let fetched = store.get_list(&list.id).await.unwrap().unwrap();
        assert_eq!(fetched, list);
        assert!(store.get_list("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let store = InMemoryListStore::new();
        store.ensure_list("default", "Groceries").await.unwrap();
        store
            .append_items("default", &[item("a", "apple")])
            .await
            .unwrap();
        let again = store.ensure_list("default", "Other").await.unwrap();
        assert_eq!(again.name, "Groceries");
        assert_eq!(again.items.len(), 1);
    }

    #[tokio::test]
    async fn test_append_and_replace() {
        let store = InMemoryListStore::new();
        let list = store.create_list("weekly").await.unwrap();

        let after = store
            .append_items(&list.id, &[item("a", "apple"), item("b", "bread")])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.items.len(), 2);

        let after = store
            .replace_items(&list.id, &[item("c", "cheese")])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.items.len(), 1);
        assert_eq!(after.items[0].id, "c");

        assert!(store
            .append_items("missing", &[item("x", "x")])
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_items_sees_current_items() {
        let store = InMemoryListStore::new();
        let list = store.create_list("weekly").await.unwrap();
        store
            .append_items(&list.id, &[item("a", "apple"), item("b", "bread")])
            .await
            .unwrap();

        let mut seen = 0;
        let after = store
            .update_items(
                &list.id,
                Box::new(|current: &[ShoppingItem]| {
                    seen = current.len();
                    current.iter().filter(|i| i.name != "apple").cloned().collect()
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(seen, 2);
        assert_eq!(after.items.len(), 1);
        assert_eq!(after.items[0].id, "b");

        let missing = store
            .update_items(
                "missing",
                Box::new(|current: &[ShoppingItem]| current.to_vec()),
            )
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        let store = std::sync::Arc::new(InMemoryListStore::new());
        store.ensure_list("default", "Groceries").await.unwrap();

        let mut handles = Vec::new();
        for n in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("item-{}", n);
                store
                    .update_items(
                        "default",
                        Box::new(move |current: &[ShoppingItem]| {
                            let mut next = current.to_vec();
                            next.push(item(&id, "apple"));
                            next
                        }),
                    )
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let list = store.get_list("default").await.unwrap().unwrap();
        assert_eq!(list.items.len(), 16);
    }

    #[tokio::test]
    async fn test_snapshots_are_independent() {
        let store = InMemoryListStore::new();
        let list = store.create_list("weekly").await.unwrap();
        let mut snapshot = store
            .append_items(&list.id, &[item("a", "apple")])
            .await
            .unwrap()
            .unwrap();
        snapshot.items.clear();
        let fresh = store.get_list(&list.id).await.unwrap().unwrap();
        assert_eq!(fresh.items.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let store = InMemoryListStore::new();
        let a = store.create_list("a").await.unwrap();
        store.create_list("b").await.unwrap();
        assert_eq!(store.list_lists().await.unwrap().len(), 2);

        assert!(store.delete_list(&a.id).await.unwrap());
        assert!(!store.delete_list(&a.id).await.unwrap());
        assert_eq!(store.list_lists().await.unwrap().len(), 1);
    }
}
