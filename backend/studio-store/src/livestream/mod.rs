//! Livestream operations store: creators, their streams, viewer reports,
//! chat moderation, the moderation team and auto-mod settings.

pub mod models;
pub mod seed;
pub mod stats;
pub mod store;

pub use models::*;
pub use stats::LivestreamStats;
pub use store::{LivestreamStore, ResolvedTarget};
