//! Equality filters accepted by the store `list` operations.
//!
//! Every field is optional; `None` means "do not filter on this column".
//! Filters deserialize from query strings so the HTTP layer can pass them
//! straight through.

use serde::{Deserialize, Serialize};

use crate::enums::{GymStatus, SubscriptionStatus, SubscriptionType, UserRole, VisitStatus};
use crate::ids::{GymId, GymOwnerId, MemberId, UserId};

/// Filter for listing users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    /// Only users with this role.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Only the user with this exact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Maximum number of rows.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Filter for listing gym owners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GymOwnerFilter {
    /// Only the profile of this user.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Maximum number of rows.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Filter for listing gyms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GymFilter {
    /// Only gyms of this owner.
    #[serde(default)]
    pub owner_id: Option<GymOwnerId>,
    /// Only gyms in this status.
    #[serde(default)]
    pub status: Option<GymStatus>,
    /// Maximum number of rows.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Filter for listing members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFilter {
    /// Only profiles of this user.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Only members registered at this gym.
    #[serde(default)]
    pub home_gym_id: Option<GymId>,
    /// Only members on this plan.
    #[serde(default)]
    pub subscription_type: Option<SubscriptionType>,
    /// Only members in this billing state.
    #[serde(default)]
    pub subscription_status: Option<SubscriptionStatus>,
    /// Maximum number of rows.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Filter for listing visits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitFilter {
    /// Only visits by this member.
    #[serde(default)]
    pub member_id: Option<MemberId>,
    /// Only visits to this gym.
    #[serde(default)]
    pub gym_id: Option<GymId>,
    /// Only visits in this status.
    #[serde(default)]
    pub status: Option<VisitStatus>,
    /// Maximum number of rows.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Filter for listing messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFilter {
    /// Only messages written by this user.
    #[serde(default)]
    pub sender_id: Option<UserId>,
    /// Only messages addressed to this user.
    #[serde(default)]
    pub recipient_id: Option<UserId>,
    /// Only messages about this gym.
    #[serde(default)]
    pub gym_id: Option<GymId>,
    /// Only messages not yet read.
    #[serde(default)]
    pub unread_only: bool,
    /// Maximum number of rows.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Filter for listing access codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCodeFilter {
    /// Only codes scoped to this gym.
    #[serde(default)]
    pub gym_id: Option<GymId>,
    /// Only codes issued to this email.
    #[serde(default)]
    pub email: Option<String>,
    /// Only codes granting this role.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Only codes that have not been redeemed.
    #[serde(default)]
    pub unused_only: bool,
    /// Maximum number of rows.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Filter for listing subscriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionFilter {
    /// Only subscriptions of this user.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Only subscriptions on this plan.
    #[serde(default, rename = "type")]
    pub subscription_type: Option<SubscriptionType>,
    /// Only subscriptions in this billing state.
    #[serde(default)]
    pub status: Option<SubscriptionStatus>,
    /// Maximum number of rows.
    #[serde(default)]
    pub limit: Option<u32>,
}
