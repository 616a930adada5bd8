//! Typed entity identifiers.
//!
//! Seeded records get UUIDv5 ids derived from a fixed namespace so that two
//! runs of the same seed generator agree on every id. Records created at
//! runtime (invites, uploads, audit events) get random UUIDv4 ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const SEED_NAMESPACE: Uuid = Uuid::from_u128(0x6f1d_2b7e_93a4_4c51_a2d0_5e8b_17c3_9f04);

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Stable id for the `n`th seeded record of this kind.
            pub fn seeded(n: usize) -> Self {
                let name = format!("{}-{}", $prefix, n);
                Self(Uuid::new_v5(&SEED_NAMESPACE, name.as_bytes()))
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(AuditEventId, "audit");
entity_id!(TeamMemberId, "member");

// livestream
entity_id!(UserId, "user");
entity_id!(StreamId, "stream");
entity_id!(ReportId, "report");
entity_id!(MessageId, "message");

// platform ops
entity_id!(AccountId, "account");
entity_id!(SiteId, "site");
entity_id!(TicketId, "ticket");
entity_id!(FlagId, "flag");

// branding
entity_id!(AssetId, "asset");
entity_id!(SwatchId, "swatch");
entity_id!(FontId, "font");
entity_id!(ReviewId, "review");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_ids_are_stable() {
        assert_eq!(UserId::seeded(3), UserId::seeded(3));
        assert_ne!(UserId::seeded(3), UserId::seeded(4));
    }

    #[test]
    fn test_seeded_ids_differ_per_kind() {
        assert_ne!(UserId::seeded(1).as_uuid(), StreamId::seeded(1).as_uuid());
    }

    #[test]
    fn test_runtime_ids_are_random() {
        assert_ne!(AssetId::new(), AssetId::new());
    }
}
