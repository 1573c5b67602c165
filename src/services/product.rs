//! Product accessor: owner-scoped listing, creation and partial update.

use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::product::{CreateProduct, NewProduct, Product, ProductScope, UpdateProduct};
use crate::services::session::Session;
use crate::store::AdSwapStore;

/// List products on one side of the ownership filter, newest first.
pub async fn list(
    store: &dyn AdSwapStore,
    session: &Session,
    scope: ProductScope,
) -> Result<Vec<Product>, AppError> {
    let products = store.list_products(&session.user_id, scope).await?;
    Ok(products)
}

/// Create a product owned by the session's user.
pub async fn create(
    store: &dyn AdSwapStore,
    session: &Session,
    input: CreateProduct,
) -> Result<Product, AppError> {
    input
        .validate()
        .map_err(|_| AppError::Validation("Missing required fields".to_string()))?;

    let (Some(name), Some(url), Some(tagline), Some(platform)) =
        (input.name, input.url, input.tagline, input.platform)
    else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };

    let new_product = NewProduct {
        user_id: session.user_id.clone(),
        name,
        url,
        tagline,
        platform,
        logo_url: input.logo_url.filter(|l| !l.is_empty()),
    };

    let product = store
        .insert_product(&new_product)
        .await
        .map_err(AppError::on_write("Insert failed"))?;

    tracing::info!(product_id = %product.id, user_id = %session.user_id, "Product created");
    Ok(product)
}

/// Update a product owned by the session's user. Products owned by anyone
/// else are indistinguishable from missing ones.
pub async fn update(
    store: &dyn AdSwapStore,
    session: &Session,
    id: Uuid,
    input: &UpdateProduct,
) -> Result<Product, AppError> {
    let existing = store
        .find_product(id)
        .await
        .map_err(AppError::on_lookup("Not found"))?
        .filter(|p| p.user_id == session.user_id)
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    let product = store
        .update_product(existing.id, input)
        .await
        .map_err(AppError::on_write("Update failed"))?;

    tracing::info!(product_id = %product.id, "Product updated");
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn foo() -> CreateProduct {
        CreateProduct {
            name: Some("Foo".to_string()),
            url: Some("https://foo.example".to_string()),
            tagline: Some("t".to_string()),
            platform: Some("Twitter".to_string()),
            logo_url: None,
        }
    }

    #[tokio::test]
    async fn create_without_required_field_persists_nothing() {
        let store = MemoryStore::new();
        let alice = Session::new("alice");

        for strip in ["name", "url", "tagline", "platform"] {
            let mut input = foo();
            match strip {
                "name" => input.name = None,
                "url" => input.url = None,
                "tagline" => input.tagline = Some(String::new()),
                _ => input.platform = None,
            }
            let err = create(&store, &alice, input).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == "Missing required fields"));
        }

        let mine = list(&store, &alice, ProductScope::Mine).await.unwrap();
        assert!(mine.is_empty());
    }

    #[tokio::test]
    async fn create_assigns_owner_and_blank_logo_is_null() {
        let store = MemoryStore::new();
        let alice = Session::new("alice");
        let mut input = foo();
        input.logo_url = Some(String::new());

        let product = create(&store, &alice, input).await.unwrap();
        assert_eq!(product.user_id, "alice");
        assert_eq!(product.name, "Foo");
        assert_eq!(product.logo_url, None);
    }

    #[tokio::test]
    async fn feed_and_mine_are_disjoint() {
        let store = MemoryStore::new();
        let alice = Session::new("alice");
        let bob = Session::new("bob");
        create(&store, &alice, foo()).await.unwrap();
        create(&store, &bob, foo()).await.unwrap();
        create(&store, &bob, foo()).await.unwrap();

        let feed = list(&store, &alice, ProductScope::Feed).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert!(feed.iter().all(|p| p.user_id != "alice"));

        let mine = list(&store, &alice, ProductScope::Mine).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(mine.iter().all(|p| p.user_id == "alice"));
    }

    #[tokio::test]
    async fn non_owner_update_is_not_found_and_row_unchanged() {
        let store = MemoryStore::new();
        let alice = Session::new("alice");
        let product = create(&store, &alice, foo()).await.unwrap();

        let changes = UpdateProduct {
            name: Some(Some("Hijacked".to_string())),
            ..Default::default()
        };
        let err = update(&store, &Session::new("mallory"), product.id, &changes)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let stored = store.find_product(product.id).await.unwrap().unwrap();
        assert_eq!(stored, product);
    }

    #[tokio::test]
    async fn owner_update_applies_subset() {
        let store = MemoryStore::new();
        let alice = Session::new("alice");
        let product = create(&store, &alice, foo()).await.unwrap();

        let changes = UpdateProduct {
            tagline: Some(Some("Better tagline".to_string())),
            logo_url: Some(Some("https://cdn.example/foo.png".to_string())),
            ..Default::default()
        };
        let updated = update(&store, &alice, product.id, &changes).await.unwrap();
        assert_eq!(updated.name, "Foo");
        assert_eq!(updated.tagline, "Better tagline");
        assert_eq!(updated.logo_url.as_deref(), Some("https://cdn.example/foo.png"));
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let store = MemoryStore::new();
        let err = update(
            &store,
            &Session::new("alice"),
            Uuid::new_v4(),
            &UpdateProduct::default(),
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn explicit_null_on_required_field_fails_and_row_unchanged() {
        let store = MemoryStore::new();
        let alice = Session::new("alice");
        let product = create(&store, &alice, foo()).await.unwrap();

        let changes = UpdateProduct {
            name: Some(None),
            ..Default::default()
        };
        let err = update(&store, &alice, product.id, &changes).await.unwrap_err();
        assert!(matches!(err, AppError::Backend(ref m) if m == "Update failed"));

        let stored = store.find_product(product.id).await.unwrap().unwrap();
        assert_eq!(stored, product);
    }
}
