use uuid::Uuid;

// ============================================================================
// Export Business Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No export items")]
    EmptyItems,

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Export not found: {0}")]
    ExportNotFound(Uuid),

    #[error("Storage failure: {0}")]
    Store(#[from] anyhow::Error),
}
