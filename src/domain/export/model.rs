use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pricing::{Money, PriceBreakdown};

// ============================================================================
// Export Document Model
// ============================================================================
//
// An export is a placed purchase record: an immutable item list with
// snapshot pricing, plus two independent completion flags (paid, delivered)
// that are each set at most once over its life.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Export {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// The placing user. Immutable once created.
    pub user: Uuid,
    pub items: Vec<ExportItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,

    // Computed once at creation and stored; never recomputed on read.
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    pub total_price: Money,

    pub is_paid: bool,
    pub paid_at: Option<DateTime>,
    pub payment_result: Option<PaymentResult>,

    pub is_delivered: bool,
    pub delivered_at: Option<DateTime>,

    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// One line of an export: a product reference plus the name, image and unit
/// price snapshotted from the catalog at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportItem {
    pub product: Uuid,
    pub name: String,
    pub qty: u32,
    pub price: Money,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Payment-provider payload recorded verbatim on the paid transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub email_address: String,
}

impl Export {
    /// Assemble a new export ready for its first (and only) insert.
    pub fn new(
        user: Uuid,
        items: Vec<ExportItem>,
        shipping_address: ShippingAddress,
        payment_method: String,
        prices: PriceBreakdown,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: Uuid::new_v4(),
            user,
            items,
            shipping_address,
            payment_method,
            items_price: prices.items_price,
            shipping_price: prices.shipping_price,
            tax_price: prices.tax_price,
            total_price: prices.total_price,
            is_paid: false,
            paid_at: None,
            payment_result: None,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
