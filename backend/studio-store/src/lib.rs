//! In-memory moderation and administration stores backing the studio admin
//! dashboards: livestream moderation, platform operations and the brand kit.
//!
//! Every store is seeded deterministically, mutated through named actions
//! that append to a bounded audit log, and exposes derived stats computed
//! from its current snapshot.

pub mod audit;
pub mod branding;
pub mod clock;
pub mod config;
pub mod error;
pub mod livestream;
pub mod logging;
pub mod models;
pub mod platform_ops;
pub mod session;
pub mod store;

pub use audit::{AuditAction, AuditEvent, AuditLog, AuditTarget};
pub use branding::BrandingStore;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{StoreOptions, StudioConfig, TerminalStatePolicy};
pub use error::{Result, StoreError};
pub use livestream::LivestreamStore;
pub use platform_ops::PlatformOpsStore;
pub use session::{Activity, Session, SessionOverview};
pub use store::{ChangeKind, SeedContext, Store, StoreChange, StoreKind};
