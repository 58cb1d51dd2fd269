use std::sync::Arc;

use mongodb::Database;
use uuid::Uuid;

use crate::db::{DailySales, ExportStore, Product, ProductStore, UserStore, UserSummary};
use crate::metrics::Metrics;

use super::errors::ExportError;
use super::model::{Export, ExportItem, PaymentResult, ShippingAddress};
use super::pricing::{calc_prices, Money};

// ============================================================================
// Export Service
// ============================================================================
//
// Orchestrates: request input -> catalog resolution -> pricing -> store.
// Caller identity arrives as an explicit argument; the service never reads
// ambient request state.
//
// ============================================================================

/// A requested line as it arrives from the caller. Carries no price: the
/// unit price is always taken from the catalog.
#[derive(Debug, Clone)]
pub struct ItemRequest {
    pub product: Uuid,
    pub name: String,
    pub qty: u32,
    pub image: String,
}

pub struct ExportService {
    exports: ExportStore,
    products: ProductStore,
    users: UserStore,
    metrics: Arc<Metrics>,
}

impl ExportService {
    pub fn new(db: &Database, metrics: Arc<Metrics>) -> Self {
        Self {
            exports: ExportStore::new(db),
            products: ProductStore::new(db),
            users: UserStore::new(db),
            metrics,
        }
    }

    /// Create an export for `user` from the requested lines.
    ///
    /// Every product reference must resolve; line prices come from the
    /// catalog snapshot taken here, not from the caller.
    pub async fn create(
        &self,
        user: Uuid,
        requested: Vec<ItemRequest>,
        shipping_address: ShippingAddress,
        payment_method: String,
    ) -> Result<Export, ExportError> {
        if requested.is_empty() {
            return Err(ExportError::EmptyItems);
        }

        let mut ids: Vec<Uuid> = requested.iter().map(|item| item.product).collect();
        ids.sort_unstable();
        ids.dedup();

        let catalog = self.products.find_by_ids(&ids).await?;
        let items = snapshot_items(&requested, &catalog)?;

        let prices = calc_prices(&items);
        let export = Export::new(user, items, shipping_address, payment_method, prices);

        self.exports.insert(&export).await?;
        self.metrics.exports_created.inc();
        tracing::debug!("export {} created for user {}", export.id, user);

        Ok(export)
    }

    /// Every export, with the placing user resolved where one still exists.
    pub async fn list_all(&self) -> Result<Vec<(Export, Option<UserSummary>)>, ExportError> {
        let exports = self.exports.find_all().await?;

        let mut user_ids: Vec<Uuid> = exports.iter().map(|export| export.user).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users = self.users.find_by_ids(&user_ids).await?;

        Ok(exports
            .into_iter()
            .map(|export| {
                let user = users.iter().find(|u| u.id == export.user).cloned();
                (export, user)
            })
            .collect())
    }

    pub async fn list_for_user(&self, user: Uuid) -> Result<Vec<Export>, ExportError> {
        Ok(self.exports.find_by_user(user).await?)
    }

    pub async fn count(&self) -> Result<u64, ExportError> {
        Ok(self.exports.count().await?)
    }

    pub async fn total_sales(&self) -> Result<Money, ExportError> {
        Ok(self.exports.total_sales().await?)
    }

    pub async fn sales_by_day(&self) -> Result<Vec<DailySales>, ExportError> {
        Ok(self.exports.sales_by_day().await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<(Export, Option<UserSummary>), ExportError> {
        let export = self
            .exports
            .find_by_id(id)
            .await?
            .ok_or(ExportError::ExportNotFound(id))?;

        let user = self.users.find_by_id(export.user).await?;

        Ok((export, user))
    }

    /// Record a payment-provider result and flip the export to paid.
    /// Replays overwrite the recorded payload; the flag itself never
    /// returns to false.
    pub async fn mark_paid(&self, id: Uuid, payment: PaymentResult) -> Result<Export, ExportError> {
        let export = self
            .exports
            .mark_paid(id, &payment)
            .await?
            .ok_or(ExportError::ExportNotFound(id))?;

        self.metrics.state_transitions.with_label_values(&["paid"]).inc();
        tracing::debug!("export {} marked paid", id);

        Ok(export)
    }

    pub async fn mark_delivered(&self, id: Uuid) -> Result<Export, ExportError> {
        let export = self
            .exports
            .mark_delivered(id)
            .await?
            .ok_or(ExportError::ExportNotFound(id))?;

        self.metrics.state_transitions.with_label_values(&["delivered"]).inc();
        tracing::debug!("export {} marked delivered", id);

        Ok(export)
    }
}

/// Rebuild the requested lines against the catalog: each line keeps the
/// caller's name, quantity and image, but takes its unit price from the
/// matching product. A line whose reference does not resolve fails the
/// whole request, naming the offending id.
fn snapshot_items(
    requested: &[ItemRequest],
    catalog: &[Product],
) -> Result<Vec<ExportItem>, ExportError> {
    if requested.is_empty() {
        return Err(ExportError::EmptyItems);
    }

    requested
        .iter()
        .map(|line| {
            let product = catalog
                .iter()
                .find(|product| product.id == line.product)
                .ok_or(ExportError::ProductNotFound(line.product))?;

            Ok(ExportItem {
                product: product.id,
                name: line.name.clone(),
                qty: line.qty,
                price: product.price,
                image: line.image.clone(),
            })
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================
