//! Mapping between the closed Rust enums and their `PostgreSQL` enum labels.
//!
//! Queries read enum columns as `col::TEXT` and bind them back as
//! `$n::type_name`, so the labels here must match the `CREATE TYPE`
//! statements in the migration exactly.

use clublink_types::{GymStatus, SubscriptionStatus, SubscriptionType, UserRole, VisitStatus};

use crate::error::DbError;

/// A Rust enum backed by a `PostgreSQL` enum type.
pub trait DbEnum: Sized + Copy + 'static {
    /// Name of the `PostgreSQL` type.
    const TYPE_NAME: &'static str;

    /// Every variant, in label order.
    fn variants() -> &'static [Self];

    /// The label stored in the database.
    fn to_db(self) -> &'static str;

    /// Parse a database label.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Decode`] if the label is not part of the type.
    fn from_db(label: &str) -> Result<Self, DbError> {
        Self::variants()
            .iter()
            .copied()
            .find(|v| v.to_db() == label)
            .ok_or_else(|| DbError::Decode(format!("unknown {} label: {label}", Self::TYPE_NAME)))
    }
}

/// Decode an optional label.
///
/// # Errors
///
/// Returns [`DbError::Decode`] if the label is present but unknown.
pub fn opt_from_db<E: DbEnum>(label: Option<&str>) -> Result<Option<E>, DbError> {
    label.map(E::from_db).transpose()
}

impl DbEnum for UserRole {
    const TYPE_NAME: &'static str = "user_role";

    fn variants() -> &'static [Self] {
        &Self::ALL
    }

    fn to_db(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl DbEnum for GymStatus {
    const TYPE_NAME: &'static str = "gym_status";

    fn variants() -> &'static [Self] {
        &Self::ALL
    }

    fn to_db(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }
}

impl DbEnum for SubscriptionType {
    const TYPE_NAME: &'static str = "subscription_type";

    fn variants() -> &'static [Self] {
        &Self::ALL
    }

    fn to_db(self) -> &'static str {
        match self {
            Self::GymMonthly => "gym_monthly",
            Self::BasePassport => "base_passport",
            Self::UnlimitedRoamer => "unlimited_roamer",
        }
    }
}

impl DbEnum for SubscriptionStatus {
    const TYPE_NAME: &'static str = "subscription_status";

    fn variants() -> &'static [Self] {
        &Self::ALL
    }

    fn to_db(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::PastDue => "past_due",
        }
    }
}

impl DbEnum for VisitStatus {
    const TYPE_NAME: &'static str = "visit_status";

    fn variants() -> &'static [Self] {
        &Self::ALL
    }

    fn to_db(self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::CheckedIn => "checked_in",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
        }
    }
}
