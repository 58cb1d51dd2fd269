use anyhow::Result;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// User Store - Display-Name Resolution
// ============================================================================
//
// Users belong to the authentication service; exports only read them to
// resolve display names on administrative listings and single fetches.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

pub struct UserStore {
    collection: Collection<UserSummary>,
}

impl UserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserSummary>> {
        let user = self.collection.find_one(doc! {"_id": id.to_string()}).await?;
        Ok(user)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>> {
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        let cursor = self.collection.find(doc! {"_id": {"$in": ids}}).await?;
        let users = cursor.try_collect().await?;

        Ok(users)
    }
}
