use anyhow::Result;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::export::Money;

// ============================================================================
// Product Store - Read-Only Catalog Access
// ============================================================================
//
// The catalog is owned by another service; this store only reads the fields
// exports need. The unit price here is the authoritative one - line items
// are always priced from the catalog, never from the caller.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub price: Money,
}

pub struct ProductStore {
    collection: Collection<Product>,
}

impl ProductStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("products"),
        }
    }

    /// Batch-resolve a set of product ids in one query. Missing ids are
    /// simply absent from the result; callers decide whether that is fatal.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>> {
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        let cursor = self.collection.find(doc! {"_id": {"$in": ids}}).await?;
        let products = cursor.try_collect().await?;

        Ok(products)
    }
}
