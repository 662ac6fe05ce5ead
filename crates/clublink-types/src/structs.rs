//! Entity structs, one per table.
//!
//! These are the fully populated rows returned by the store, including
//! server-generated IDs, timestamps and defaulted columns. They serialize
//! in `camelCase` to match the JSON bodies the REST API has always served.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{GymStatus, SubscriptionStatus, SubscriptionType, UserRole, VisitStatus};
use crate::ids::{
    AccessCodeId, GymId, GymOwnerId, MemberId, MessageId, SubscriptionId, UserId, VisitId,
};
use crate::shapes::{Address, Coordinates, MemberPreferences, OpeningHours, SocialAccounts};

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// A user account. Every other entity traces back to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct User {
    /// Primary key.
    pub id: UserId,
    /// Login email, unique across the network.
    pub email: String,
    /// Network role.
    pub role: UserRole,
    /// Opaque subject id issued by the identity provider. Unique.
    pub external_auth_id: String,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// gym_owners
// ---------------------------------------------------------------------------

/// Business profile of a user who operates gyms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GymOwner {
    /// Primary key.
    pub id: GymOwnerId,
    /// The owning user. At most one owner profile exists per user.
    pub user_id: UserId,
    /// Trading name of the business.
    pub business_name: String,
    /// Public contact number.
    pub contact_phone: Option<String>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// gyms
// ---------------------------------------------------------------------------

/// A gym listed on the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Gym {
    /// Primary key.
    pub id: GymId,
    /// Owning business profile.
    pub owner_id: GymOwnerId,
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: Address,
    /// Map position.
    pub coordinates: Coordinates,
    /// Amenity tags in display order.
    pub amenities: Vec<String>,
    /// Photo URLs in display order.
    pub photos: Option<Vec<String>>,
    /// Weekly opening hours.
    pub opening_hours: Option<OpeningHours>,
    /// Listing status.
    pub status: GymStatus,
    /// Monthly membership fee with exactly two decimal places.
    #[ts(as = "String")]
    pub monthly_fee: Decimal,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// members
// ---------------------------------------------------------------------------

/// Member profile attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Member {
    /// Primary key.
    pub id: MemberId,
    /// The user this profile belongs to.
    pub user_id: UserId,
    /// Gym the member registered at, if any.
    pub home_gym_id: Option<GymId>,
    /// Name the member wants to be called.
    pub preferred_name: Option<String>,
    /// Age in years.
    pub age: Option<i32>,
    /// Occupation.
    pub occupation: Option<String>,
    /// Free-form home location.
    pub location: Option<String>,
    /// Self-described athlete types.
    pub athlete_type: Option<Vec<String>>,
    /// Current plan, mirrored from the latest subscription.
    pub subscription_type: Option<SubscriptionType>,
    /// Current billing state, mirrored from the latest subscription.
    pub subscription_status: Option<SubscriptionStatus>,
    /// Avatar URL.
    pub profile_photo: Option<String>,
    /// Short biography.
    pub bio: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Social media handles.
    pub social_accounts: Option<SocialAccounts>,
    /// Workout preferences.
    pub preferences: Option<MemberPreferences>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// visits
// ---------------------------------------------------------------------------

/// A member's visit to a gym.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Visit {
    /// Primary key.
    pub id: VisitId,
    /// Visiting member.
    pub member_id: MemberId,
    /// Visited gym.
    pub gym_id: GymId,
    /// Scheduled date of the visit.
    pub visit_date: DateTime<Utc>,
    /// Front-desk check-in.
    pub check_in_time: Option<DateTime<Utc>>,
    /// Front-desk check-out.
    pub check_out_time: Option<DateTime<Utc>>,
    /// Visit progress.
    pub status: VisitStatus,
    /// QR code scanned at check-in.
    pub qr_code_used: Option<String>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// messages
// ---------------------------------------------------------------------------

/// Direct message between two users, optionally about a gym.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Message {
    /// Primary key.
    pub id: MessageId,
    /// Author.
    pub sender_id: UserId,
    /// Addressee.
    pub recipient_id: UserId,
    /// Gym the conversation is about.
    pub gym_id: Option<GymId>,
    /// Message body, never blank.
    pub content: String,
    /// When the recipient first read the message.
    pub read_at: Option<DateTime<Utc>>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// access_codes
// ---------------------------------------------------------------------------

/// Invitation token granting a role on signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AccessCode {
    /// Primary key.
    pub id: AccessCodeId,
    /// The token itself, unique.
    pub code: String,
    /// Gym the invitation is scoped to; `None` means system-wide.
    pub gym_id: Option<GymId>,
    /// Invitee email.
    pub email: String,
    /// Role granted on redemption.
    pub role: UserRole,
    /// Redemption deadline.
    pub expires_at: DateTime<Utc>,
    /// Redemption time; set once.
    pub used_at: Option<DateTime<Utc>>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}

impl AccessCode {
    /// Whether the code may still be redeemed at `at`.
    pub fn is_redeemable_at(&self, at: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > at
    }
}

// ---------------------------------------------------------------------------
// subscriptions
// ---------------------------------------------------------------------------

/// Billing subscription mirrored from the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Subscription {
    /// Primary key.
    pub id: SubscriptionId,
    /// Subscribed user.
    pub user_id: UserId,
    /// Plan.
    #[serde(rename = "type")]
    pub subscription_type: SubscriptionType,
    /// Billing state.
    pub status: SubscriptionStatus,
    /// Start of the paid period.
    pub current_period_start: DateTime<Utc>,
    /// End of the paid period.
    pub current_period_end: DateTime<Utc>,
    /// Opaque subscription id issued by the billing provider.
    pub external_billing_id: String,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Join projections
// ---------------------------------------------------------------------------

/// A member joined to its user's email and its home gym's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MemberHomeGym {
    /// The member.
    pub member_id: MemberId,
    /// Email of the member's user account.
    pub email: String,
    /// Name of the member's home gym.
    pub gym_name: String,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn sample_code(used_at: Option<DateTime<Utc>>, expires_in: Duration) -> AccessCode {
        let now = Utc::now();
        AccessCode {
            id: AccessCodeId::new(),
            code: "WELCOME2024".to_owned(),
            gym_id: None,
            email: "newmember@example.com".to_owned(),
            role: UserRole::Member,
            expires_at: now + expires_in,
            used_at,
            created_at: now,
        }
    }

    #[test]
    fn access_code_redeemable_only_when_unused_and_unexpired() {
        let now = Utc::now();
        assert!(sample_code(None, Duration::days(1)).is_redeemable_at(now));
        assert!(!sample_code(Some(now), Duration::days(1)).is_redeemable_at(now));
        assert!(!sample_code(None, Duration::days(-1)).is_redeemable_at(now));
    }

    #[test]
    fn subscription_type_serializes_as_type() {
        let now = Utc::now();
        let sub = Subscription {
            id: SubscriptionId::new(),
            user_id: UserId::new(),
            subscription_type: SubscriptionType::BasePassport,
            status: SubscriptionStatus::Active,
            current_period_start: now,
            current_period_end: now,
            external_billing_id: "sub_base_passport_001".to_owned(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&sub).unwrap_or_default();
        assert_eq!(json["type"], "base_passport");
        assert_eq!(json["externalBillingId"], "sub_base_passport_001");
    }
}
