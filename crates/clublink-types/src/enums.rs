//! Closed enumerations stored as `PostgreSQL` enum types.
//!
//! Each enum mirrors one `CREATE TYPE ... AS ENUM` in the schema migration.
//! Values outside these sets are rejected when JSON is deserialized and
//! when a database label is decoded, so an out-of-set string can never
//! reach a row.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// user_role
// ---------------------------------------------------------------------------

/// The role a user (or an access code invitee) holds in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum UserRole {
    /// Network administrator; approves gyms and issues system-wide codes.
    Admin,
    /// Owns one business profile and the gyms under it.
    Owner,
    /// Gym-goer holding a membership.
    Member,
}

impl UserRole {
    /// Every role, in declaration order of the `user_role` type.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Owner, Self::Member];
}

// ---------------------------------------------------------------------------
// gym_status
// ---------------------------------------------------------------------------

/// Listing status of a gym.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GymStatus {
    /// Submitted by an owner, awaiting approval.
    #[default]
    Pending,
    /// Live and bookable.
    Active,
    /// Temporarily removed from the network.
    Suspended,
}

impl GymStatus {
    /// Every status, in declaration order of the `gym_status` type.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Active, Self::Suspended];
}

// ---------------------------------------------------------------------------
// subscription_type
// ---------------------------------------------------------------------------

/// Membership plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SubscriptionType {
    /// Access to a single home gym.
    GymMonthly,
    /// Home gym plus a monthly allowance of visits elsewhere.
    BasePassport,
    /// Unlimited visits across the whole network.
    UnlimitedRoamer,
}

impl SubscriptionType {
    /// Every plan, in declaration order of the `subscription_type` type.
    pub const ALL: [Self; 3] = [Self::GymMonthly, Self::BasePassport, Self::UnlimitedRoamer];
}

// ---------------------------------------------------------------------------
// subscription_status
// ---------------------------------------------------------------------------

/// Billing state of a subscription as reported by the billing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SubscriptionStatus {
    /// Paid up for the current period.
    Active,
    /// Cancelled by the member; no further renewals.
    Cancelled,
    /// Renewal payment failed.
    PastDue,
}

impl SubscriptionStatus {
    /// Every status, in declaration order of the `subscription_status` type.
    pub const ALL: [Self; 3] = [Self::Active, Self::Cancelled, Self::PastDue];
}

// ---------------------------------------------------------------------------
// visit_status
// ---------------------------------------------------------------------------

/// Progress of a single gym visit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum VisitStatus {
    /// Reserved in advance.
    #[default]
    Booked,
    /// Member scanned in at the front desk.
    CheckedIn,
    /// Member checked out.
    Completed,
    /// Booking expired without a check-in.
    NoShow,
}

impl VisitStatus {
    /// Every status, in declaration order of the `visit_status` type.
    pub const ALL: [Self; 4] = [Self::Booked, Self::CheckedIn, Self::Completed, Self::NoShow];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&SubscriptionType::UnlimitedRoamer).ok();
        assert_eq!(json.as_deref(), Some("\"unlimited_roamer\""));

        let json = serde_json::to_string(&VisitStatus::NoShow).ok();
        assert_eq!(json.as_deref(), Some("\"no_show\""));
    }

    #[test]
    fn out_of_set_values_are_rejected() {
        assert!(serde_json::from_str::<UserRole>("\"superuser\"").is_err());
        assert!(serde_json::from_str::<GymStatus>("\"closed\"").is_err());
        assert!(serde_json::from_str::<SubscriptionStatus>("\"Active\"").is_err());
    }

    #[test]
    fn defaults_match_column_defaults() {
        assert_eq!(GymStatus::default(), GymStatus::Pending);
        assert_eq!(VisitStatus::default(), VisitStatus::Booked);
    }
}
