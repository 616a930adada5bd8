//! Brand kit store: assets and their reviews, color palette, typography and
//! brand voice settings.

pub mod contrast;
pub mod models;
pub mod seed;
pub mod stats;
pub mod store;

pub use contrast::contrast_ratio;
pub use models::*;
pub use stats::BrandingStats;
pub use store::BrandingStore;
