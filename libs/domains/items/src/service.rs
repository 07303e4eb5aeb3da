//! Item Service - Business logic layer

use axum_helpers::errors::validation_summary;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::models::{Item, ItemId, ItemPayload, NewItem};
use crate::repository::ItemRepository;

/// Validates input and applies the not-found/duplicate rules on top of the
/// repository.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    fn validate(payload: &ItemPayload) -> ItemResult<()> {
        payload
            .validate()
            .map_err(|e| ItemError::Validation(validation_summary(&e)))
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self) -> ItemResult<Vec<Item>> {
        self.repository.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category: &str) -> ItemResult<Vec<Item>> {
        self.repository.find_by_category(category).await
    }

    /// May return an empty list; the HTTP layer decides what that means.
    #[instrument(skip(self))]
    pub async fn list_by_designer(&self, designer: &str) -> ItemResult<Vec<Item>> {
        self.repository.find_by_designer(designer).await
    }

    /// Stores `payload` under `category` unless an identical item exists.
    #[instrument(skip(self, payload), fields(design_name = %payload.design_name))]
    pub async fn create_item(&self, category: String, payload: ItemPayload) -> ItemResult<ItemId> {
        Self::validate(&payload)?;

        let item = NewItem {
            category,
            details: payload,
        };

        // Not atomic: two identical concurrent requests can both pass this check.
        if self.repository.exists(&item).await? {
            return Err(ItemError::Duplicate);
        }

        let id = self.repository.insert(item).await?;
        info!(item_id = %id, "Item created");
        Ok(id)
    }

    #[instrument(skip(self, payload), fields(item_id = %id))]
    pub async fn replace_item(&self, id: ItemId, payload: ItemPayload) -> ItemResult<()> {
        Self::validate(&payload)?;

        if self.repository.replace(id, &payload).await? {
            Ok(())
        } else {
            Err(ItemError::NotFound)
        }
    }

    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn delete_item(&self, id: ItemId) -> ItemResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(ItemError::NotFound)
        }
    }

    /// Removes at most one item, the first whose design name matches
    /// ignoring case.
    #[instrument(skip(self))]
    pub async fn delete_item_by_design_name(&self, design_name: &str) -> ItemResult<()> {
        if self.repository.delete_by_design_name(design_name).await? {
            Ok(())
        } else {
            Err(ItemError::NotFound)
        }
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::paimio;
    use crate::repository::MockItemRepository;
    use mockall::predicate::eq;

    fn stored(category: &str, payload: ItemPayload) -> Item {
        Item {
            id: ItemId::new(),
            category: category.to_string(),
            details: payload,
        }
    }

    #[tokio::test]
    async fn test_create_item_inserts_under_category() {
        let new_id = ItemId::new();
        let mut repo = MockItemRepository::new();
        repo.expect_exists()
            .withf(|item| item.category == "chairs" && item.details == paimio())
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|item| item.category == "chairs")
            .times(1)
            .returning(move |_| Ok(new_id));

        let service = ItemService::new(repo);
        let id = service.create_item("chairs".into(), paimio()).await.unwrap();
        assert_eq!(id, new_id);
    }

    #[tokio::test]
    async fn test_create_item_rejects_duplicate() {
        let mut repo = MockItemRepository::new();
        repo.expect_exists().returning(|_| Ok(true));
        repo.expect_insert().never();

        let service = ItemService::new(repo);
        let result = service.create_item("chairs".into(), paimio()).await;
        assert!(matches!(result, Err(ItemError::Duplicate)));
    }

    #[tokio::test]
    async fn test_create_item_validates_before_touching_repository() {
        let mut repo = MockItemRepository::new();
        repo.expect_exists().never();
        repo.expect_insert().never();

        let mut payload = paimio();
        payload.photo = String::new();

        let service = ItemService::new(repo);
        match service.create_item("chairs".into(), payload).await {
            Err(ItemError::Validation(msg)) => assert!(msg.contains("photo")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_item_propagates_database_error() {
        let mut repo = MockItemRepository::new();
        repo.expect_exists()
            .returning(|_| Err(ItemError::Database("server selection timeout".into())));

        let service = ItemService::new(repo);
        let result = service.create_item("chairs".into(), paimio()).await;
        assert!(matches!(result, Err(ItemError::Database(_))));
    }

    #[tokio::test]
    async fn test_list_by_designer_delegates() {
        let mut repo = MockItemRepository::new();
        repo.expect_find_by_designer()
            .with(eq("AALTO"))
            .times(1)
            .returning(|_| Ok(vec![stored("chairs", paimio())]));

        let service = ItemService::new(repo);
        let items = service.list_by_designer("AALTO").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].details.designer, "Alvar Aalto");
    }

    #[tokio::test]
    async fn test_list_by_category_and_all() {
        let mut repo = MockItemRepository::new();
        repo.expect_find_by_category()
            .with(eq("lamps"))
            .returning(|_| Ok(vec![]));
        repo.expect_find_all()
            .returning(|| Ok(vec![stored("chairs", paimio()), stored("lamps", paimio())]));

        let service = ItemService::new(repo);
        assert!(service.list_by_category("lamps").await.unwrap().is_empty());
        assert_eq!(service.list_items().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_replace_item_not_found() {
        let id = ItemId::new();
        let mut repo = MockItemRepository::new();
        repo.expect_replace()
            .withf(move |got, _| *got == id)
            .returning(|_, _| Ok(false));

        let service = ItemService::new(repo);
        let result = service.replace_item(id, paimio()).await;
        assert!(matches!(result, Err(ItemError::NotFound)));
    }

    #[tokio::test]
    async fn test_replace_item_success() {
        let mut repo = MockItemRepository::new();
        repo.expect_replace()
            .withf(|_, payload| payload.year_created == 1933)
            .returning(|_, _| Ok(true));

        let mut payload = paimio();
        payload.year_created = 1933;

        let service = ItemService::new(repo);
        assert!(service.replace_item(ItemId::new(), payload).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_item_outcomes() {
        let present = ItemId::new();
        let mut repo = MockItemRepository::new();
        repo.expect_delete()
            .returning(move |id| Ok(id == present));

        let service = ItemService::new(repo);
        assert!(service.delete_item(present).await.is_ok());
        assert!(matches!(
            service.delete_item(ItemId::new()).await,
            Err(ItemError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_by_design_name_not_found() {
        let mut repo = MockItemRepository::new();
        repo.expect_delete_by_design_name()
            .with(eq("Egg"))
            .returning(|_| Ok(false));

        let service = ItemService::new(repo);
        assert!(matches!(
            service.delete_item_by_design_name("Egg").await,
            Err(ItemError::NotFound)
        ));
    }
}
