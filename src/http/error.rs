use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::export::ExportError;

// ============================================================================
// API Error - Status Decoding at the Request Boundary
// ============================================================================
//
// Domain errors carry a machine-readable kind; the intended HTTP status is
// decoded exactly once, here. 500 is reserved for storage and other
// unexpected failures.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Export(ExportError::EmptyItems) => StatusCode::BAD_REQUEST,
            ApiError::Export(ExportError::ProductNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Export(ExportError::ExportNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Export(ExportError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage failures are logged with detail but reported opaquely.
        if let ApiError::Export(ExportError::Store(err)) = self {
            tracing::error!("Storage failure: {:#}", err);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Internal server error" }));
        }

        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_empty_items_is_a_bad_request() {
        let err = ApiError::from(ExportError::EmptyItems);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_references_are_not_found() {
        let id = Uuid::new_v4();

        let err = ApiError::from(ExportError::ProductNotFound(id));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains(&id.to_string()));

        let err = ApiError::from(ExportError::ExportNotFound(id));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_failures_stay_internal() {
        let err = ApiError::from(ExportError::Store(anyhow::anyhow!("connection reset")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_identity_failures_map_to_401_and_403() {
        assert_eq!(
            ApiError::Unauthorized("Not authenticated").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("Not authorized as an admin").status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
