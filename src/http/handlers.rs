use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::domain::export::ExportService;
use crate::metrics::Metrics;

use super::auth::{AdminIdentity, CallerIdentity};
use super::dto::{
    CreateExportRequest, DailySalesDto, ExportResponse, PaymentNotice, TotalExportsResponse,
    TotalSalesResponse, UserRefDto,
};
use super::error::ApiError;

// ============================================================================
// Route Handlers
// ============================================================================
//
// Thin shims: extract identity and body, call the service, map the result
// to a wire type. All policy lives in the service and the extractors.
//
// ============================================================================

/// POST /api/exports
pub async fn create_export(
    service: web::Data<ExportService>,
    caller: CallerIdentity,
    body: web::Json<CreateExportRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    let export = service
        .create(
            caller.id,
            request.export_items.into_iter().map(Into::into).collect(),
            request.shipping_address.into(),
            request.payment_method,
        )
        .await?;

    let user = UserRefDto::id_only(export.user);
    Ok(HttpResponse::Created().json(ExportResponse::from_export(export, user)))
}

/// GET /api/exports (admin)
pub async fn list_all_exports(
    service: web::Data<ExportService>,
    _admin: AdminIdentity,
) -> Result<HttpResponse, ApiError> {
    let rows = service.list_all().await?;

    let response: Vec<ExportResponse> = rows
        .into_iter()
        .map(|(export, user)| {
            let user = match user {
                Some(summary) => UserRefDto::from_summary(summary, false),
                None => UserRefDto::id_only(export.user),
            };
            ExportResponse::from_export(export, user)
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/exports/mine
pub async fn list_my_exports(
    service: web::Data<ExportService>,
    caller: CallerIdentity,
) -> Result<HttpResponse, ApiError> {
    let exports = service.list_for_user(caller.id).await?;

    let response: Vec<ExportResponse> = exports
        .into_iter()
        .map(|export| {
            let user = UserRefDto::id_only(export.user);
            ExportResponse::from_export(export, user)
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/exports/total-exports
pub async fn count_exports(service: web::Data<ExportService>) -> Result<HttpResponse, ApiError> {
    let total_exports = service.count().await?;
    Ok(HttpResponse::Ok().json(TotalExportsResponse { total_exports }))
}

/// GET /api/exports/total-sales
pub async fn total_sales(service: web::Data<ExportService>) -> Result<HttpResponse, ApiError> {
    let total = service.total_sales().await?;
    Ok(HttpResponse::Ok().json(TotalSalesResponse {
        total_sales: total.to_string(),
    }))
}

/// GET /api/exports/total-sales-by-date
pub async fn sales_by_date(service: web::Data<ExportService>) -> Result<HttpResponse, ApiError> {
    let rows = service.sales_by_day().await?;

    let response: Vec<DailySalesDto> = rows.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/exports/{id}
pub async fn find_export(
    service: web::Data<ExportService>,
    _caller: CallerIdentity,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let (export, user) = service.find_by_id(id.into_inner()).await?;

    let user = match user {
        Some(summary) => UserRefDto::from_summary(summary, true),
        None => UserRefDto::id_only(export.user),
    };

    Ok(HttpResponse::Ok().json(ExportResponse::from_export(export, user)))
}

/// PUT /api/exports/{id}/pay
pub async fn mark_paid(
    service: web::Data<ExportService>,
    _caller: CallerIdentity,
    id: web::Path<Uuid>,
    body: web::Json<PaymentNotice>,
) -> Result<HttpResponse, ApiError> {
    let export = service
        .mark_paid(id.into_inner(), body.into_inner().into())
        .await?;

    let user = UserRefDto::id_only(export.user);
    Ok(HttpResponse::Ok().json(ExportResponse::from_export(export, user)))
}

/// PUT /api/exports/{id}/deliver (admin)
pub async fn mark_delivered(
    service: web::Data<ExportService>,
    _admin: AdminIdentity,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let export = service.mark_delivered(id.into_inner()).await?;

    let user = UserRefDto::id_only(export.user);
    Ok(HttpResponse::Ok().json(ExportResponse::from_export(export, user)))
}

/// GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "export-service"
    }))
}

/// GET /metrics
pub async fn metrics_exposition(metrics: web::Data<Metrics>) -> HttpResponse {
    match metrics.encode() {
        Ok(buffer) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(buffer),
        Err(err) => {
            tracing::error!("Metrics encoding failed: {:#}", err);
            HttpResponse::InternalServerError().finish()
        }
    }
}
