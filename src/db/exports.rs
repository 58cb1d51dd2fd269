use anyhow::Result;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, from_document, DateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::export::{Export, Money, PaymentResult};

// ============================================================================
// Export Store - Persistence for Export Documents
// ============================================================================
//
// Responsibilities:
// 1. Insert newly created exports (one durable write per creation)
// 2. Point and filtered reads
// 3. Sales aggregations over stored integer-cent totals
// 4. Atomic state transitions (paid, delivered) via findOneAndUpdate,
//    so a transition can never interleave with another writer
//
// ============================================================================

/// One row of the sales-by-day aggregation: the calendar day of `paid_at`
/// and the summed totals of exports paid that day.
#[derive(Debug, Clone, Deserialize)]
pub struct DailySales {
    #[serde(rename = "_id")]
    pub day: String,
    pub total_sales: Money,
}

#[derive(Debug, Deserialize)]
struct SalesTotal {
    total_sales: Money,
}

pub struct ExportStore {
    collection: Collection<Export>,
}

impl ExportStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("exports"),
        }
    }

    pub async fn insert(&self, export: &Export) -> Result<()> {
        self.collection.insert_one(export).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Export>> {
        let export = self.collection.find_one(doc! {"_id": id.to_string()}).await?;
        Ok(export)
    }

    pub async fn find_by_user(&self, user: Uuid) -> Result<Vec<Export>> {
        let cursor = self.collection.find(doc! {"user": user.to_string()}).await?;
        let exports = cursor.try_collect().await?;
        Ok(exports)
    }

    pub async fn find_all(&self) -> Result<Vec<Export>> {
        let cursor = self.collection.find(doc! {}).await?;
        let exports = cursor.try_collect().await?;
        Ok(exports)
    }

    pub async fn count(&self) -> Result<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }

    /// Sum of `total_price` across every export, in minor units.
    pub async fn total_sales(&self) -> Result<Money> {
        let rows: Vec<Document> = self
            .collection
            .aggregate(total_sales_pipeline())
            .await?
            .try_collect()
            .await?;

        // No rows means an empty collection.
        match rows.into_iter().next() {
            Some(row) => Ok(from_document::<SalesTotal>(row)?.total_sales),
            None => Ok(Money::ZERO),
        }
    }

    /// Paid-export sales grouped by the calendar day of `paid_at`. Group
    /// order is whatever the server's aggregation produces.
    pub async fn sales_by_day(&self) -> Result<Vec<DailySales>> {
        let rows: Vec<Document> = self
            .collection
            .aggregate(sales_by_day_pipeline())
            .await?
            .try_collect()
            .await?;

        rows.into_iter()
            .map(|row| Ok(from_document(row)?))
            .collect()
    }

    /// Atomically mark an export paid, recording the provider payload.
    /// Returns the updated document, or None if the id does not exist.
    pub async fn mark_paid(&self, id: Uuid, payment: &PaymentResult) -> Result<Option<Export>> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! {"_id": id.to_string()},
                paid_update(payment, DateTime::now()),
            )
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    /// Atomically mark an export delivered. Returns the updated document,
    /// or None if the id does not exist.
    pub async fn mark_delivered(&self, id: Uuid) -> Result<Option<Export>> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! {"_id": id.to_string()},
                delivered_update(DateTime::now()),
            )
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }
}

// ============================================================================
// Pipeline and Update Builders
// ============================================================================

fn total_sales_pipeline() -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": null,
            "total_sales": { "$sum": "$total_price" },
        }
    }]
}

fn sales_by_day_pipeline() -> Vec<Document> {
    vec![
        doc! {
            "$match": { "is_paid": true }
        },
        doc! {
            "$group": {
                "_id": { "$dateToString": { "format": "%Y-%m-%d", "date": "$paid_at" } },
                "total_sales": { "$sum": "$total_price" },
            }
        },
    ]
}

fn paid_update(payment: &PaymentResult, now: DateTime) -> Document {
    doc! {
        "$set": {
            "is_paid": true,
            "paid_at": now,
            "payment_result": {
                "id": &payment.id,
                "status": &payment.status,
                "update_time": &payment.update_time,
                "email_address": &payment.email_address,
            },
            "updated_at": now,
        }
    }
}

fn delivered_update(now: DateTime) -> Document {
    doc! {
        "$set": {
            "is_delivered": true,
            "delivered_at": now,
            "updated_at": now,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_by_day_only_counts_paid_exports() {
        let pipeline = sales_by_day_pipeline();

        let match_stage = pipeline[0].get_document("$match").unwrap();
        assert_eq!(match_stage.get_bool("is_paid").unwrap(), true);
    }

    #[test]
    fn test_sales_by_day_groups_on_calendar_day_of_paid_at() {
        let pipeline = sales_by_day_pipeline();

        let group = pipeline[1].get_document("$group").unwrap();
        let day_key = group.get_document("_id").unwrap().get_document("$dateToString").unwrap();

        assert_eq!(day_key.get_str("format").unwrap(), "%Y-%m-%d");
        assert_eq!(day_key.get_str("date").unwrap(), "$paid_at");
        assert_eq!(
            group.get_document("total_sales").unwrap().get_str("$sum").unwrap(),
            "$total_price"
        );
    }

    #[test]
    fn test_paid_update_never_touches_delivery_fields() {
        let payment = PaymentResult {
            id: "PAY-1".to_string(),
            status: "COMPLETED".to_string(),
            update_time: "2024-03-01T10:00:00Z".to_string(),
            email_address: "buyer@example.com".to_string(),
        };
        let update = paid_update(&payment, DateTime::now());

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_bool("is_paid").unwrap(), true);
        assert!(set.get("paid_at").is_some());
        assert!(set.get("is_delivered").is_none());
        assert!(set.get("delivered_at").is_none());

        let recorded = set.get_document("payment_result").unwrap();
        assert_eq!(recorded.get_str("id").unwrap(), "PAY-1");
        assert_eq!(recorded.get_str("email_address").unwrap(), "buyer@example.com");
    }

    #[test]
    fn test_delivered_update_never_touches_payment_fields() {
        let update = delivered_update(DateTime::now());

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_bool("is_delivered").unwrap(), true);
        assert!(set.get("delivered_at").is_some());
        assert!(set.get("is_paid").is_none());
        assert!(set.get("paid_at").is_none());
        assert!(set.get("payment_result").is_none());
    }
}
