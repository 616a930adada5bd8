pub mod ids;
pub mod moderation;
pub mod team;

pub use ids::*;
pub use moderation::*;
pub use team::*;

/// A record with a stable identifier inside one of the store collections.
pub trait Entity {
    type Id: Copy + PartialEq + std::fmt::Display;

    fn id(&self) -> Self::Id;
}

impl Entity for TeamMember {
    type Id = TeamMemberId;

    fn id(&self) -> TeamMemberId {
        self.id
    }
}
