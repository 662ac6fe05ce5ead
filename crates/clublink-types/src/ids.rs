//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every Club Link entity has its own ID type so a `GymId` can never be
//! passed where a `MemberId` is expected. The database generates IDs with
//! `DEFAULT gen_random_uuid()`; the `new()` constructors exist for tests
//! and for callers that need an ID before the row exists.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl core::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a user account (the root of every other entity).
    UserId
}

define_id! {
    /// Unique identifier for a gym owner business profile.
    GymOwnerId
}

define_id! {
    /// Unique identifier for a gym.
    GymId
}

define_id! {
    /// Unique identifier for a member profile.
    MemberId
}

define_id! {
    /// Unique identifier for a gym visit.
    VisitId
}

define_id! {
    /// Unique identifier for a direct message between users.
    MessageId
}

define_id! {
    /// Unique identifier for an invitation access code.
    AccessCodeId
}

define_id! {
    /// Unique identifier for a billing subscription record.
    SubscriptionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_serializes_as_bare_uuid() {
        let id = GymId::new();
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json, Some(format!("\"{}\"", id.into_inner())));
    }

    #[test]
    fn id_parses_from_str() {
        let raw = "0b0f3c9e-6a51-4c2e-9f53-3f0d6a2b8e11";
        let parsed: Result<UserId, _> = raw.parse();
        assert_eq!(parsed.ok().map(|id| id.to_string()), Some(raw.to_owned()));
        assert!("not-a-uuid".parse::<UserId>().is_err());
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = MemberId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
