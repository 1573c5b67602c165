//! In-process store used by tests and by the server when no database is configured.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AdSwapStore, StoreError};
use crate::models::product::{NewProduct, Product, ProductScope, UpdateProduct};
use crate::models::swap::{NewSwap, Swap, SwapStatus};

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    swaps: Vec<Swap>,
    /// `None` models a deployment without a credits table.
    credits: Option<HashMap<String, i64>>,
}

#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                credits: Some(HashMap::new()),
                ..Tables::default()
            }),
            unavailable: AtomicBool::new(false),
        }
    }

    /// A store whose credits table does not exist.
    pub fn without_credits_table() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail as if the connection were lost.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn set_credits(&self, user_id: &str, credits: i64) {
        let mut tables = self.tables.write().await;
        tables
            .credits
            .get_or_insert_with(HashMap::new)
            .insert(user_id.to_string(), credits);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Connection {
                message: "memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

/// Newest first; rows created in the same instant keep reverse insertion order.
fn newest_first<'a, T: Clone + 'a>(
    rows: impl DoubleEndedIterator<Item = &'a T>,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut out: Vec<T> = rows.rev().cloned().collect();
    out.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    out
}

#[async_trait]
impl AdSwapStore for MemoryStore {
    async fn list_products(
        &self,
        user_id: &str,
        scope: ProductScope,
    ) -> Result<Vec<Product>, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        let rows = tables.products.iter().filter(|p| match scope {
            ProductScope::Mine => p.user_id == user_id,
            ProductScope::Feed => p.user_id != user_id,
        });
        Ok(newest_first(rows, |p: &Product| p.created_at))
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn insert_product(&self, product: &NewProduct) -> Result<Product, StoreError> {
        self.check()?;
        let created = Product {
            id: Uuid::new_v4(),
            user_id: product.user_id.clone(),
            name: product.name.clone(),
            url: product.url.clone(),
            tagline: product.tagline.clone(),
            platform: product.platform.clone(),
            logo_url: product.logo_url.clone(),
            created_at: Utc::now(),
        };
        self.tables.write().await.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: Uuid,
        changes: &UpdateProduct,
    ) -> Result<Product, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::Query {
                message: format!("no product with id {id}"),
            })?;
        if let Some(column) = changes.nulled_required_column() {
            return Err(StoreError::Query {
                message: format!("null value in column \"{column}\" violates not-null constraint"),
            });
        }
        changes.apply_to(product);
        Ok(product.clone())
    }

    async fn swaps_for_user(&self, user_id: &str) -> Result<Vec<Swap>, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        let rows = tables.swaps.iter().filter(|s| s.is_participant(user_id));
        Ok(newest_first(rows, |s: &Swap| s.created_at))
    }

    async fn find_swap(&self, id: Uuid) -> Result<Option<Swap>, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.swaps.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_swap(&self, swap: &NewSwap) -> Result<Swap, StoreError> {
        self.check()?;
        let created = Swap {
            id: Uuid::new_v4(),
            requester_user_id: swap.requester_user_id.clone(),
            target_user_id: swap.target_user_id.clone(),
            target_product_id: swap.target_product_id,
            platform: swap.platform.clone(),
            status: SwapStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.tables.write().await.swaps.push(created.clone());
        Ok(created)
    }

    async fn complete_swap(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Swap, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let swap = tables
            .swaps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::Query {
                message: format!("no swap with id {id}"),
            })?;
        swap.status = SwapStatus::Completed;
        swap.completed_at = Some(completed_at);
        Ok(swap.clone())
    }

    async fn count_swaps(&self, user_id: &str, status: SwapStatus) -> Result<i64, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        let count = tables
            .swaps
            .iter()
            .filter(|s| s.status == status && s.is_participant(user_id))
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn find_credits(&self, user_id: &str) -> Result<Option<i64>, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        match &tables.credits {
            Some(credits) => Ok(credits.get(user_id).copied()),
            None => Err(StoreError::MissingRelation {
                relation: "credits".to_string(),
            }),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(owner: &str, name: &str) -> NewProduct {
        NewProduct {
            user_id: owner.to_string(),
            name: name.to_string(),
            url: format!("https://{name}.example"),
            tagline: "t".to_string(),
            platform: "Twitter".to_string(),
            logo_url: None,
        }
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_scoped() {
        let store = MemoryStore::new();
        store.insert_product(&new_product("a", "first")).await.unwrap();
        store.insert_product(&new_product("a", "second")).await.unwrap();
        store.insert_product(&new_product("b", "other")).await.unwrap();

        let mine = store.list_products("a", ProductScope::Mine).await.unwrap();
        let names: Vec<_> = mine.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["second", "first"]);

        let feed = store.list_products("a", ProductScope::Feed).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].user_id, "b");
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let err = store.list_products("a", ProductScope::Feed).await.unwrap_err();
        assert!(matches!(err, StoreError::Connection { .. }));
        assert!(store.ping().await.is_err());

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn missing_credits_table() {
        let store = MemoryStore::without_credits_table();
        let err = store.find_credits("a").await.unwrap_err();
        assert!(matches!(err, StoreError::MissingRelation { .. }));

        let store = MemoryStore::new();
        assert_eq!(store.find_credits("a").await.unwrap(), None);
        store.set_credits("a", 7).await;
        assert_eq!(store.find_credits("a").await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn update_of_unknown_row_is_a_query_error() {
        let store = MemoryStore::new();
        let err = store
            .update_product(Uuid::new_v4(), &UpdateProduct::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Query { .. }));
    }

    #[tokio::test]
    async fn null_required_column_is_rejected() {
        let store = MemoryStore::new();
        let product = store.insert_product(&new_product("a", "first")).await.unwrap();

        let changes = UpdateProduct {
            tagline: Some(Some("changed".to_string())),
            platform: Some(None),
            ..Default::default()
        };
        let err = store.update_product(product.id, &changes).await.unwrap_err();
        assert!(matches!(err, StoreError::Query { .. }));

        let stored = store.find_product(product.id).await.unwrap().unwrap();
        assert_eq!(stored, product);
    }
}
