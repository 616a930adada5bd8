//! Platform operations store for the site builder: accounts, their sites,
//! support tickets, feature flags and platform settings.

pub mod models;
pub mod seed;
pub mod stats;
pub mod store;

pub use models::*;
pub use stats::PlatformStats;
pub use store::PlatformOpsStore;
