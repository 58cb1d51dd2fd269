// ============================================================================
// Store Layer - Typed Wrappers over MongoDB Collections
// ============================================================================

pub mod exports;
pub mod products;
pub mod users;

pub use exports::{DailySales, ExportStore};
pub use products::{Product, ProductStore};
pub use users::{UserStore, UserSummary};
