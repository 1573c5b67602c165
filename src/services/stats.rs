//! Per-user swap counters and credit balance.

use crate::errors::AppError;
use crate::models::stats::Stats;
use crate::models::swap::SwapStatus;
use crate::services::session::Session;
use crate::store::{AdSwapStore, StoreError};

/// Count the user's pending and completed swaps and read their credits.
///
/// The two counts are separate queries. The credit lookup is best effort: a
/// missing row, a missing table or any other failure reads as zero.
pub async fn get_stats(store: &dyn AdSwapStore, session: &Session) -> Result<Stats, AppError> {
    let (pending, completed) = tokio::try_join!(
        store.count_swaps(&session.user_id, SwapStatus::Pending),
        store.count_swaps(&session.user_id, SwapStatus::Completed),
    )?;

    let credits = match store.find_credits(&session.user_id).await {
        Ok(credits) => credits.unwrap_or(0),
        Err(StoreError::MissingRelation { relation }) => {
            tracing::debug!(%relation, "Credits table absent");
            0
        }
        Err(e) => {
            tracing::warn!(error = %e, "Credit lookup failed");
            0
        }
    };

    Ok(Stats {
        completed,
        pending,
        credits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::NewProduct;
    use crate::models::swap::NewSwap;
    use crate::store::MemoryStore;

    async fn seed_swaps(store: &MemoryStore) {
        let product = store
            .insert_product(&NewProduct {
                user_id: "alice".to_string(),
                name: "Foo".to_string(),
                url: "https://foo.example".to_string(),
                tagline: "t".to_string(),
                platform: "Blog".to_string(),
                logo_url: None,
            })
            .await
            .unwrap();

        let mut ids = Vec::new();
        for requester in ["bob", "carol", "dave"] {
            let swap = store
                .insert_swap(&NewSwap {
                    requester_user_id: requester.to_string(),
                    target_user_id: "alice".to_string(),
                    target_product_id: product.id,
                    platform: product.platform.clone(),
                })
                .await
                .unwrap();
            ids.push(swap.id);
        }
        store.complete_swap(ids[0], chrono::Utc::now()).await.unwrap();
    }

    #[tokio::test]
    async fn counts_pending_and_completed() {
        let store = MemoryStore::new();
        seed_swaps(&store).await;

        let stats = get_stats(&store, &Session::new("alice")).await.unwrap();
        assert_eq!(
            stats,
            Stats {
                completed: 1,
                pending: 2,
                credits: 0
            }
        );

        let bob = get_stats(&store, &Session::new("bob")).await.unwrap();
        assert_eq!(bob.completed, 1);
        assert_eq!(bob.pending, 0);
    }

    #[tokio::test]
    async fn reads_credit_balance() {
        let store = MemoryStore::new();
        store.set_credits("alice", 12).await;
        let stats = get_stats(&store, &Session::new("alice")).await.unwrap();
        assert_eq!(stats.credits, 12);
    }

    #[tokio::test]
    async fn missing_credits_table_reads_as_zero() {
        let store = MemoryStore::without_credits_table();
        seed_swaps(&store).await;
        let stats = get_stats(&store, &Session::new("alice")).await.unwrap();
        assert_eq!(stats.credits, 0);
        assert_eq!(stats.pending, 2);
    }

    #[tokio::test]
    async fn unavailable_store_is_an_error() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(get_stats(&store, &Session::new("alice")).await.is_err());
    }
}
