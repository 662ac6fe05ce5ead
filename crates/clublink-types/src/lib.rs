//! Shared type definitions for the Club Link gym network.
//!
//! This crate is the single source of truth for the entities stored by
//! `clublink-db` and served by `clublink-api`. Types flow downstream to
//! `TypeScript` via `ts-rs` for the web frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for every entity identifier
//! - [`enums`] -- Closed enumerations backing the `PostgreSQL` enum types
//! - [`shapes`] -- Typed documents stored in `jsonb` columns
//! - [`structs`] -- Fully populated entity rows
//! - [`inputs`] -- Validated create and patch inputs
//! - [`filters`] -- Equality filters for list queries
//! - [`validation`] -- Field validators shared by the inputs
//! - [`serde_helpers`] -- Deserializers for nullable patch fields

pub mod enums;
pub mod filters;
pub mod ids;
pub mod inputs;
pub mod serde_helpers;
pub mod shapes;
pub mod structs;
pub mod validation;

// Re-export all public types at crate root for convenience.
pub use enums::{GymStatus, SubscriptionStatus, SubscriptionType, UserRole, VisitStatus};
pub use filters::{
    AccessCodeFilter, GymFilter, GymOwnerFilter, MemberFilter, MessageFilter, SubscriptionFilter,
    UserFilter, VisitFilter,
};
pub use ids::{
    AccessCodeId, GymId, GymOwnerId, MemberId, MessageId, SubscriptionId, UserId, VisitId,
};
pub use inputs::{
    AccessCodePatch, GymOwnerPatch, GymPatch, MemberPatch, MessagePatch, NewAccessCode, NewGym,
    NewGymOwner, NewMember, NewMessage, NewSubscription, NewUser, NewVisit, SubscriptionPatch,
    UserPatch, VisitPatch,
};
pub use shapes::{Address, Coordinates, DayHours, MemberPreferences, OpeningHours, SocialAccounts};
pub use structs::{
    AccessCode, Gym, GymOwner, Member, MemberHomeGym, Message, Subscription, User, Visit,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files to `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::UserId::export_all();
        let _ = crate::ids::GymOwnerId::export_all();
        let _ = crate::ids::GymId::export_all();
        let _ = crate::ids::MemberId::export_all();
        let _ = crate::ids::VisitId::export_all();
        let _ = crate::ids::MessageId::export_all();
        let _ = crate::ids::AccessCodeId::export_all();
        let _ = crate::ids::SubscriptionId::export_all();

        // Enums
        let _ = crate::enums::UserRole::export_all();
        let _ = crate::enums::GymStatus::export_all();
        let _ = crate::enums::SubscriptionType::export_all();
        let _ = crate::enums::SubscriptionStatus::export_all();
        let _ = crate::enums::VisitStatus::export_all();

        // Shapes
        let _ = crate::shapes::Address::export_all();
        let _ = crate::shapes::Coordinates::export_all();
        let _ = crate::shapes::DayHours::export_all();
        let _ = crate::shapes::OpeningHours::export_all();
        let _ = crate::shapes::SocialAccounts::export_all();
        let _ = crate::shapes::MemberPreferences::export_all();

        // Entities
        let _ = crate::structs::User::export_all();
        let _ = crate::structs::GymOwner::export_all();
        let _ = crate::structs::Gym::export_all();
        let _ = crate::structs::Member::export_all();
        let _ = crate::structs::Visit::export_all();
        let _ = crate::structs::Message::export_all();
        let _ = crate::structs::AccessCode::export_all();
        let _ = crate::structs::Subscription::export_all();
        let _ = crate::structs::MemberHomeGym::export_all();

        // Inputs
        let _ = crate::inputs::NewUser::export_all();
        let _ = crate::inputs::UserPatch::export_all();
        let _ = crate::inputs::NewGymOwner::export_all();
        let _ = crate::inputs::GymOwnerPatch::export_all();
        let _ = crate::inputs::NewGym::export_all();
        let _ = crate::inputs::GymPatch::export_all();
        let _ = crate::inputs::NewMember::export_all();
        let _ = crate::inputs::MemberPatch::export_all();
        let _ = crate::inputs::NewVisit::export_all();
        let _ = crate::inputs::VisitPatch::export_all();
        let _ = crate::inputs::NewMessage::export_all();
        let _ = crate::inputs::MessagePatch::export_all();
        let _ = crate::inputs::NewAccessCode::export_all();
        let _ = crate::inputs::AccessCodePatch::export_all();
        let _ = crate::inputs::NewSubscription::export_all();
        let _ = crate::inputs::SubscriptionPatch::export_all();
    }
}
