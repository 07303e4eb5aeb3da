//! MongoDB implementation of ItemRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, from_document, oid::ObjectId, to_document},
    options::IndexOptions,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::{ItemError, ItemResult};
use crate::models::{Item, ItemId, ItemPayload, NewItem, integral, optional_integral};
use crate::repository::ItemRepository;

pub const PRODUCTS_COLLECTION: &str = "products";

/// Optional fields removed on replace when the caller leaves them out
const OPTIONAL_FIELDS: [&str; 4] = ["style", "stock", "brand", "market_price"];

/// Stored shape of an item. `_id` is absent until the server assigns it.
#[derive(Debug, Serialize, Deserialize)]
struct ItemDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default)]
    category: String,
    photo: String,
    design_name: String,
    designer: String,
    #[serde(default)]
    materials: Vec<String>,
    #[serde(deserialize_with = "integral")]
    year_created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "optional_integral",
        skip_serializing_if = "Option::is_none"
    )]
    stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    market_price: Option<f64>,
}

impl ItemDocument {
    fn from_new(item: NewItem) -> Self {
        let d = item.details;
        Self {
            id: None,
            category: item.category,
            photo: d.photo,
            design_name: d.design_name,
            designer: d.designer,
            materials: d.materials,
            year_created: d.year_created,
            style: d.style,
            stock: d.stock,
            brand: d.brand,
            market_price: d.market_price,
        }
    }

    fn into_item(self) -> ItemResult<Item> {
        let id = self
            .id
            .ok_or_else(|| ItemError::Internal("stored item has no _id".to_string()))?;

        Ok(Item {
            id: id.into(),
            category: self.category,
            details: ItemPayload {
                photo: self.photo,
                design_name: self.design_name,
                designer: self.designer,
                materials: self.materials,
                year_created: self.year_created,
                style: self.style,
                stock: self.stock,
                brand: self.brand,
                market_price: self.market_price,
            },
        })
    }
}

/// MongoDB implementation of the ItemRepository
pub struct MongoItemRepository {
    collection: Collection<ItemDocument>,
}

impl MongoItemRepository {
    /// Repository over the `products` collection of `db`.
    ///
    /// ```ignore
    /// let client = database::mongodb::connect_from_config(&config).await?;
    /// let repo = MongoItemRepository::new(client.database("furniture"));
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<ItemDocument>(collection_name),
        }
    }

    /// Creates the indexes behind the category, designer and duplicate lookups.
    ///
    /// None of them is unique; duplicates are rejected by [`ItemRepository::exists`].
    #[instrument(skip(self))]
    pub async fn init_indexes(&self) -> ItemResult<()> {
        let named = |keys: Document, name: &str| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        };

        self.collection
            .create_indexes([
                named(doc! { "category": 1 }, "category_idx"),
                named(doc! { "designer": 1 }, "designer_idx"),
                named(
                    doc! {
                        "category": 1,
                        "design_name": 1,
                        "designer": 1,
                        "year_created": 1,
                    },
                    "identity_idx",
                ),
            ])
            .await?;

        info!("Item collection indexes ensured");
        Ok(())
    }

    /// Anchored, case-insensitive match on the literal `value`.
    fn case_insensitive_exact(value: &str) -> Document {
        doc! {
            "$regex": format!("^{}$", regex::escape(value)),
            "$options": "i",
        }
    }

    fn identity_filter(item: &NewItem) -> Document {
        let d = &item.details;
        doc! {
            "category": item.category.as_str(),
            "photo": d.photo.as_str(),
            "design_name": d.design_name.as_str(),
            "designer": d.designer.as_str(),
            "materials": d.materials.clone(),
            "year_created": d.year_created,
        }
    }

    /// `$set` for the supplied fields, `$unset` for optional fields left out.
    fn replacement_update(payload: &ItemPayload) -> ItemResult<Document> {
        let set = to_document(payload)?;

        let mut unset = Document::new();
        for field in OPTIONAL_FIELDS {
            if !set.contains_key(field) {
                unset.insert(field, "");
            }
        }

        let mut update = doc! { "$set": set };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }
        Ok(update)
    }

    async fn find_items(&self, filter: Document) -> ItemResult<Vec<Item>> {
        let cursor = self
            .collection
            .clone_with_type::<Document>()
            .find(filter)
            .await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(Self::decode_items(docs))
    }

    /// Stored documents that no longer fit the item shape are logged and
    /// left out of the listing.
    fn decode_items(docs: Vec<Document>) -> Vec<Item> {
        docs.into_iter()
            .filter_map(|raw| {
                let id = raw.get("_id").cloned();
                let decoded = from_document::<ItemDocument>(raw)
                    .map_err(|e| e.to_string())
                    .and_then(|doc| doc.into_item().map_err(|e| e.to_string()));

                match decoded {
                    Ok(item) => Some(item),
                    Err(error) => {
                        warn!(?id, %error, "Skipping malformed stored item");
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl ItemRepository for MongoItemRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> ItemResult<Vec<Item>> {
        self.find_items(doc! {}).await
    }

    #[instrument(skip(self))]
    async fn find_by_category(&self, category: &str) -> ItemResult<Vec<Item>> {
        self.find_items(doc! { "category": category }).await
    }

    #[instrument(skip(self))]
    async fn find_by_designer(&self, designer: &str) -> ItemResult<Vec<Item>> {
        self.find_items(doc! { "designer": Self::case_insensitive_exact(designer) })
            .await
    }

    #[instrument(skip(self, item), fields(design_name = %item.details.design_name))]
    async fn exists(&self, item: &NewItem) -> ItemResult<bool> {
        let found = self.collection.find_one(Self::identity_filter(item)).await?;
        Ok(found.is_some())
    }

    #[instrument(skip(self, item), fields(category = %item.category, design_name = %item.details.design_name))]
    async fn insert(&self, item: NewItem) -> ItemResult<ItemId> {
        let result = self.collection.insert_one(ItemDocument::from_new(item)).await?;

        let id = result
            .inserted_id
            .as_object_id()
            .map(ItemId::from)
            .ok_or_else(|| ItemError::Internal("inserted _id is not an ObjectId".to_string()))?;

        info!(item_id = %id, "Item inserted");
        Ok(id)
    }

    #[instrument(skip(self, payload), fields(item_id = %id))]
    async fn replace(&self, id: ItemId, payload: &ItemPayload) -> ItemResult<bool> {
        let update = Self::replacement_update(payload)?;
        let result = self
            .collection
            .update_one(doc! { "_id": id.as_object_id() }, update)
            .await?;

        if result.matched_count > 0 {
            info!(item_id = %id, "Item replaced");
        }
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn delete(&self, id: ItemId) -> ItemResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;

        if result.deleted_count > 0 {
            info!(item_id = %id, "Item deleted");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_by_design_name(&self, design_name: &str) -> ItemResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "design_name": Self::case_insensitive_exact(design_name) })
            .await?;

        if result.deleted_count > 0 {
            info!(design_name, "Item deleted by design name");
        }
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::paimio;
    use mongodb::bson::Bson;

    #[test]
    fn test_case_insensitive_exact_is_anchored() {
        let filter = MongoItemRepository::case_insensitive_exact("Aalto");
        assert_eq!(filter.get_str("$regex").unwrap(), "^Aalto$");
        assert_eq!(filter.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_case_insensitive_exact_escapes_metacharacters() {
        let filter = MongoItemRepository::case_insensitive_exact("Ray (& Charles).*");
        assert_eq!(
            filter.get_str("$regex").unwrap(),
            r"^Ray \(\& Charles\)\.\*$"
        );
    }

    #[test]
    fn test_identity_filter_uses_all_tuple_fields() {
        let item = NewItem {
            category: "chairs".to_string(),
            details: paimio(),
        };
        let filter = MongoItemRepository::identity_filter(&item);

        assert_eq!(filter.get_str("category").unwrap(), "chairs");
        assert_eq!(filter.get_str("design_name").unwrap(), "Paimio Chair");
        assert_eq!(filter.get_i64("year_created").unwrap(), 1932);
        assert_eq!(
            filter.get_array("materials").unwrap(),
            &vec![Bson::String("birch plywood".to_string())]
        );
        assert!(!filter.contains_key("brand"));
        assert!(!filter.contains_key("style"));
    }

    #[test]
    fn test_replacement_update_sets_present_and_unsets_absent() {
        let update = MongoItemRepository::replacement_update(&paimio()).unwrap();

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("designer").unwrap(), "Alvar Aalto");
        assert_eq!(set.get_str("brand").unwrap(), "Artek");
        assert!(!set.contains_key("category"));
        assert!(!set.contains_key("_id"));

        let unset = update.get_document("$unset").unwrap();
        let mut removed: Vec<_> = unset.keys().map(String::as_str).collect();
        removed.sort();
        assert_eq!(removed, vec!["market_price", "stock"]);
    }

    #[test]
    fn test_replacement_update_without_unset_when_all_present() {
        let mut payload = paimio();
        payload.stock = Some(4);
        payload.market_price = Some(4200.0);

        let update = MongoItemRepository::replacement_update(&payload).unwrap();
        assert!(!update.contains_key("$unset"));
    }

    #[test]
    fn test_document_conversions() {
        let stored = ItemDocument {
            id: Some(ObjectId::new()),
            ..ItemDocument::from_new(NewItem {
                category: "chairs".to_string(),
                details: paimio(),
            })
        };
        let oid = stored.id.unwrap();

        let item = stored.into_item().unwrap();
        assert_eq!(item.id.as_object_id(), oid);
        assert_eq!(item.category, "chairs");
        assert_eq!(item.details, paimio());
    }

    fn stored_document(year_created: Bson) -> Document {
        doc! {
            "_id": ObjectId::new(),
            "category": "chairs",
            "photo": "https://example.com/egg.jpg",
            "design_name": "Egg Chair",
            "designer": "Arne Jacobsen",
            "materials": ["leather"],
            "year_created": year_created,
        }
    }

    #[test]
    fn test_decode_items_skips_malformed_documents() {
        let docs = vec![
            stored_document(Bson::Int32(1958)),
            stored_document(Bson::String("1958".to_string())),
            stored_document(Bson::Double(1958.0)),
            doc! { "_id": ObjectId::new(), "category": "chairs" },
        ];

        let items = MongoItemRepository::decode_items(docs);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.details.year_created == 1958));
    }

    #[test]
    fn test_decode_items_rejects_fractional_year() {
        let items = MongoItemRepository::decode_items(vec![stored_document(Bson::Double(1958.5))]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_document_without_id_is_rejected() {
        let doc = ItemDocument::from_new(NewItem {
            category: "chairs".to_string(),
            details: paimio(),
        });
        assert!(matches!(doc.into_item(), Err(ItemError::Internal(_))));
    }
}
