// ============================================================================
// Domain Modules
// ============================================================================

pub mod export;
