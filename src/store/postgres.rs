//! Postgres adapter over the `ads_products`, `ads_swaps` and `ads_credits` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AdSwapStore, StoreError};
use crate::models::product::{NewProduct, Product, ProductScope, UpdateProduct};
use crate::models::swap::{NewSwap, Swap, SwapStatus};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AdSwapStore for PgStore {
    async fn list_products(
        &self,
        user_id: &str,
        scope: ProductScope,
    ) -> Result<Vec<Product>, StoreError> {
        let sql = match scope {
            ProductScope::Mine => {
                "SELECT * FROM ads_products WHERE user_id = $1 ORDER BY created_at DESC"
            }
            ProductScope::Feed => {
                "SELECT * FROM ads_products WHERE user_id <> $1 ORDER BY created_at DESC"
            }
        };

        let products = sqlx::query_as::<_, Product>(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM ads_products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM ads_products WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn insert_product(&self, product: &NewProduct) -> Result<Product, StoreError> {
        let created = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO ads_products (user_id, name, url, tagline, platform, logo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&product.user_id)
        .bind(&product.name)
        .bind(&product.url)
        .bind(&product.tagline)
        .bind(&product.platform)
        .bind(&product.logo_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_product(
        &self,
        id: Uuid,
        changes: &UpdateProduct,
    ) -> Result<Product, StoreError> {
        // Each column pairs a "present" flag with its value, so an explicit
        // null is written (and rejected by NOT NULL where it applies).
        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE ads_products SET
                name = CASE WHEN $2 THEN $3 ELSE name END,
                url = CASE WHEN $4 THEN $5 ELSE url END,
                tagline = CASE WHEN $6 THEN $7 ELSE tagline END,
                platform = CASE WHEN $8 THEN $9 ELSE platform END,
                logo_url = CASE WHEN $10 THEN $11 ELSE logo_url END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name.is_some())
        .bind(changes.name.clone().flatten())
        .bind(changes.url.is_some())
        .bind(changes.url.clone().flatten())
        .bind(changes.tagline.is_some())
        .bind(changes.tagline.clone().flatten())
        .bind(changes.platform.is_some())
        .bind(changes.platform.clone().flatten())
        .bind(changes.logo_url.is_some())
        .bind(changes.logo_url.clone().flatten())
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn swaps_for_user(&self, user_id: &str) -> Result<Vec<Swap>, StoreError> {
        let swaps = sqlx::query_as::<_, Swap>(
            r#"
            SELECT * FROM ads_swaps
            WHERE requester_user_id = $1 OR target_user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(swaps)
    }

    async fn find_swap(&self, id: Uuid) -> Result<Option<Swap>, StoreError> {
        let swap = sqlx::query_as::<_, Swap>("SELECT * FROM ads_swaps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(swap)
    }

    async fn insert_swap(&self, swap: &NewSwap) -> Result<Swap, StoreError> {
        let created = sqlx::query_as::<_, Swap>(
            r#"
            INSERT INTO ads_swaps (requester_user_id, target_user_id, target_product_id, platform, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&swap.requester_user_id)
        .bind(&swap.target_user_id)
        .bind(swap.target_product_id)
        .bind(&swap.platform)
        .bind(SwapStatus::Pending)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn complete_swap(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Swap, StoreError> {
        let updated = sqlx::query_as::<_, Swap>(
            "UPDATE ads_swaps SET status = $2, completed_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(SwapStatus::Completed)
        .bind(completed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn count_swaps(&self, user_id: &str, status: SwapStatus) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM ads_swaps
            WHERE (requester_user_id = $1 OR target_user_id = $1) AND status = $2
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn find_credits(&self, user_id: &str) -> Result<Option<i64>, StoreError> {
        let credits =
            sqlx::query_scalar::<_, i64>("SELECT credits FROM ads_credits WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(credits)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
