use async_trait::async_trait;

use crate::error::ItemResult;
use crate::models::{Item, ItemId, ItemPayload, NewItem};

/// Data access for stored furniture designs.
///
/// Each method maps to a single database call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn find_all(&self) -> ItemResult<Vec<Item>>;

    /// Exact, case-sensitive match on `category`.
    async fn find_by_category(&self, category: &str) -> ItemResult<Vec<Item>>;

    /// Whole-string, case-insensitive match on `designer`.
    async fn find_by_designer(&self, designer: &str) -> ItemResult<Vec<Item>>;

    /// Whether an item with the same category, photo, design name, designer,
    /// materials and year is already stored.
    async fn exists(&self, item: &NewItem) -> ItemResult<bool>;

    async fn insert(&self, item: NewItem) -> ItemResult<ItemId>;

    /// Overwrites every field except `_id` and `category`, removing optional
    /// fields absent from `payload`. Returns false when no item has `id`.
    async fn replace(&self, id: ItemId, payload: &ItemPayload) -> ItemResult<bool>;

    /// Returns false when no item has `id`.
    async fn delete(&self, id: ItemId) -> ItemResult<bool>;

    /// Deletes the first item whose `design_name` matches case-insensitively.
    async fn delete_by_design_name(&self, design_name: &str) -> ItemResult<bool>;
}
