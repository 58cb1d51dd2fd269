// ============================================================================
// HTTP Layer - Routes, Extractors, Wire Types
// ============================================================================

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;

use actix_web::web;

/// Mount the export routes. Literal paths are registered before the `{id}`
/// capture so `/total-sales` and friends never parse as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/exports")
            .route("", web::post().to(handlers::create_export))
            .route("", web::get().to(handlers::list_all_exports))
            .route("/mine", web::get().to(handlers::list_my_exports))
            .route("/total-exports", web::get().to(handlers::count_exports))
            .route("/total-sales", web::get().to(handlers::total_sales))
            .route("/total-sales-by-date", web::get().to(handlers::sales_by_date))
            .route("/{id}", web::get().to(handlers::find_export))
            .route("/{id}/pay", web::put().to(handlers::mark_paid))
            .route("/{id}/deliver", web::put().to(handlers::mark_delivered)),
    )
    .route("/health", web::get().to(handlers::health))
    .route("/metrics", web::get().to(handlers::metrics_exposition));
}
