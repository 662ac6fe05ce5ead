//! The tables of the schema and their dependency order.

use std::fmt;

/// One table of the Club Link schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `users`
    Users,
    /// `gym_owners`
    GymOwners,
    /// `gyms`
    Gyms,
    /// `members`
    Members,
    /// `visits`
    Visits,
    /// `messages`
    Messages,
    /// `access_codes`
    AccessCodes,
    /// `subscriptions`
    Subscriptions,
}

impl Table {
    /// Referenced tables first. Inserting in this order never breaks a
    /// foreign key.
    pub const CREATION_ORDER: [Self; 8] = [
        Self::Users,
        Self::GymOwners,
        Self::Gyms,
        Self::Members,
        Self::Visits,
        Self::Messages,
        Self::AccessCodes,
        Self::Subscriptions,
    ];

    /// Dependents first. Deleting every row in this order never breaks a
    /// foreign key.
    pub const DELETION_ORDER: [Self; 8] = [
        Self::Visits,
        Self::Messages,
        Self::AccessCodes,
        Self::Subscriptions,
        Self::Members,
        Self::Gyms,
        Self::GymOwners,
        Self::Users,
    ];

    /// SQL table name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::GymOwners => "gym_owners",
            Self::Gyms => "gyms",
            Self::Members => "members",
            Self::Visits => "visits",
            Self::Messages => "messages",
            Self::AccessCodes => "access_codes",
            Self::Subscriptions => "subscriptions",
        }
    }

    /// Tables this one holds foreign keys into.
    pub const fn references(self) -> &'static [Self] {
        match self {
            Self::Users => &[],
            Self::GymOwners | Self::Subscriptions => &[Self::Users],
            Self::Gyms => &[Self::GymOwners],
            Self::Members => &[Self::Users, Self::Gyms],
            Self::Visits => &[Self::Members, Self::Gyms],
            Self::Messages => &[Self::Users, Self::Gyms],
            Self::AccessCodes => &[Self::Gyms],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
