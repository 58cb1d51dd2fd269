use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{DailySales, UserSummary};
use crate::domain::export::{
    Export, ExportItem, ItemRequest, PaymentResult, ShippingAddress,
};

// ============================================================================
// Wire Types - camelCase JSON at the HTTP Boundary
// ============================================================================
//
// Monetary amounts cross this boundary as 2-decimal strings; internally they
// are integer cents. Timestamps are RFC 3339.
//
// ============================================================================

// ----------------------------------------------------------------------------
// Requests
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExportRequest {
    #[serde(default)]
    pub export_items: Vec<RequestedItemDto>,
    pub shipping_address: ShippingAddressDto,
    pub payment_method: String,
}

/// One requested line. Any caller-supplied price is ignored; legacy clients
/// may send the product reference as `_id`.
#[derive(Debug, Deserialize)]
pub struct RequestedItemDto {
    #[serde(alias = "_id")]
    pub product: Uuid,
    pub name: String,
    pub qty: u32,
    pub image: String,
}

impl From<RequestedItemDto> for ItemRequest {
    fn from(dto: RequestedItemDto) -> Self {
        ItemRequest {
            product: dto.product,
            name: dto.name,
            qty: dto.qty,
            image: dto.image,
        }
    }
}

/// Payment-provider notification, PayPal-shaped. Passed through unvalidated.
#[derive(Debug, Deserialize)]
pub struct PaymentNotice {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub payer: Payer,
}

#[derive(Debug, Deserialize)]
pub struct Payer {
    pub email_address: String,
}

impl From<PaymentNotice> for PaymentResult {
    fn from(notice: PaymentNotice) -> Self {
        PaymentResult {
            id: notice.id,
            status: notice.status,
            update_time: notice.update_time,
            email_address: notice.payer.email_address,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddressDto {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl From<ShippingAddressDto> for ShippingAddress {
    fn from(dto: ShippingAddressDto) -> Self {
        ShippingAddress {
            address: dto.address,
            city: dto.city,
            postal_code: dto.postal_code,
            country: dto.country,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressDto {
    fn from(address: ShippingAddress) -> Self {
        ShippingAddressDto {
            address: address.address,
            city: address.city,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

// ----------------------------------------------------------------------------
// Responses
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRefDto {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserRefDto {
    pub fn id_only(id: Uuid) -> Self {
        Self {
            id,
            username: None,
            email: None,
        }
    }

    pub fn from_summary(summary: UserSummary, include_email: bool) -> Self {
        Self {
            id: summary.id,
            username: Some(summary.username),
            email: include_email.then_some(summary.email),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportItemDto {
    pub product: Uuid,
    pub name: String,
    pub qty: u32,
    pub price: String,
    pub image: String,
}

impl From<ExportItem> for ExportItemDto {
    fn from(item: ExportItem) -> Self {
        ExportItemDto {
            product: item.product,
            name: item.name,
            qty: item.qty,
            price: item.price.to_string(),
            image: item.image,
        }
    }
}

/// The payment payload exactly as recorded on the paid transition.
#[derive(Debug, Serialize)]
pub struct PaymentResultDto {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub email_address: String,
}

impl From<PaymentResult> for PaymentResultDto {
    fn from(result: PaymentResult) -> Self {
        PaymentResultDto {
            id: result.id,
            status: result.status,
            update_time: result.update_time,
            email_address: result.email_address,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub id: Uuid,
    pub user: UserRefDto,
    pub export_items: Vec<ExportItemDto>,
    pub shipping_address: ShippingAddressDto,
    pub payment_method: String,
    pub items_price: String,
    pub shipping_price: String,
    pub tax_price: String,
    pub total_price: String,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResultDto>,
    pub is_delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExportResponse {
    pub fn from_export(export: Export, user: UserRefDto) -> Self {
        ExportResponse {
            id: export.id,
            user,
            export_items: export.items.into_iter().map(Into::into).collect(),
            shipping_address: export.shipping_address.into(),
            payment_method: export.payment_method,
            items_price: export.items_price.to_string(),
            shipping_price: export.shipping_price.to_string(),
            tax_price: export.tax_price.to_string(),
            total_price: export.total_price.to_string(),
            is_paid: export.is_paid,
            paid_at: export.paid_at.map(|at| at.to_chrono()),
            payment_result: export.payment_result.map(Into::into),
            is_delivered: export.is_delivered,
            delivered_at: export.delivered_at.map(|at| at.to_chrono()),
            created_at: export.created_at.to_chrono(),
            updated_at: export.updated_at.to_chrono(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalExportsResponse {
    pub total_exports: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalSalesResponse {
    pub total_sales: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesDto {
    pub date: String,
    pub total_sales: String,
}

impl From<DailySales> for DailySalesDto {
    fn from(row: DailySales) -> Self {
        DailySalesDto {
            date: row.day,
            total_sales: row.total_sales.to_string(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export::{calc_prices, Money};

    #[test]
    fn test_create_request_accepts_legacy_id_field_and_drops_client_price() {
        let body = serde_json::json!({
            "exportItems": [
                { "_id": "7f8d2e40-27a8-4f4b-bb17-2c5f6f2f6a10", "name": "Widget",
                  "qty": 2, "image": "/images/widget.jpg", "price": "0.01" }
            ],
            "shippingAddress": {
                "address": "1 Main St", "city": "Springfield",
                "postalCode": "12345", "country": "US"
            },
            "paymentMethod": "PayPal"
        });

        let request: CreateExportRequest = serde_json::from_value(body).unwrap();

        assert_eq!(request.export_items.len(), 1);
        assert_eq!(
            request.export_items[0].product,
            "7f8d2e40-27a8-4f4b-bb17-2c5f6f2f6a10".parse::<Uuid>().unwrap()
        );
        assert_eq!(request.export_items[0].qty, 2);
        assert_eq!(request.shipping_address.postal_code, "12345");
    }

    #[test]
    fn test_missing_items_deserialize_as_empty_for_upstream_rejection() {
        let body = serde_json::json!({
            "shippingAddress": {
                "address": "1 Main St", "city": "Springfield",
                "postalCode": "12345", "country": "US"
            },
            "paymentMethod": "PayPal"
        });

        let request: CreateExportRequest = serde_json::from_value(body).unwrap();
        assert!(request.export_items.is_empty());
    }

    #[test]
    fn test_payment_notice_follows_the_provider_shape() {
        let body = serde_json::json!({
            "id": "PAY-123",
            "status": "COMPLETED",
            "update_time": "2024-03-01T10:00:00Z",
            "payer": { "email_address": "buyer@example.com" }
        });

        let notice: PaymentNotice = serde_json::from_value(body).unwrap();
        let result = PaymentResult::from(notice);

        assert_eq!(result.id, "PAY-123");
        assert_eq!(result.email_address, "buyer@example.com");
    }

    #[test]
    fn test_export_response_formats_money_and_uses_camel_case() {
        let items = vec![ExportItem {
            product: Uuid::new_v4(),
            name: "Widget".to_string(),
            qty: 2,
            price: Money::from_cents(25_00),
            image: "/images/widget.jpg".to_string(),
        }];
        let prices = calc_prices(&items);
        let export = Export::new(
            Uuid::new_v4(),
            items,
            ShippingAddress {
                address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                postal_code: "12345".to_string(),
                country: "US".to_string(),
            },
            "PayPal".to_string(),
            prices,
        );
        let user = UserRefDto::id_only(export.user);

        let value = serde_json::to_value(ExportResponse::from_export(export, user)).unwrap();

        assert_eq!(value["itemsPrice"], "50.00");
        assert_eq!(value["shippingPrice"], "10.00");
        assert_eq!(value["taxPrice"], "7.50");
        assert_eq!(value["totalPrice"], "67.50");
        assert_eq!(value["isPaid"], false);
        assert_eq!(value["exportItems"][0]["price"], "25.00");
        // Unset transition fields are omitted entirely
        assert!(value.get("paidAt").is_none());
        assert!(value.get("paymentResult").is_none());
        // Unresolved user carries the id alone
        assert!(value["user"].get("username").is_none());
    }

    #[test]
    fn test_daily_sales_row_maps_to_date_and_formatted_total() {
        let dto = DailySalesDto::from(DailySales {
            day: "2024-03-01".to_string(),
            total_sales: Money::from_cents(172_50),
        });

        assert_eq!(dto.date, "2024-03-01");
        assert_eq!(dto.total_sales, "172.50");
    }
}
