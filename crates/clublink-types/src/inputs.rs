//! Create and patch inputs for every entity.
//!
//! `New*` structs carry the caller-supplied columns of an insert; anything
//! the database fills in (ids, timestamps, defaulted statuses) is absent or
//! optional. `*Patch` structs carry the columns of a partial update: a
//! `None` field is left untouched. Patch fields for nullable columns are
//! `Option<Option<T>>`, where an explicit JSON `null` (`Some(None)`) clears
//! the column.
//!
//! All inputs derive [`Validate`]; the store validates before touching the
//! database so malformed input surfaces as a validation error rather than a
//! constraint violation.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::enums::{GymStatus, SubscriptionStatus, SubscriptionType, UserRole, VisitStatus};
use crate::ids::{GymId, GymOwnerId, MemberId, UserId};
use crate::serde_helpers::double_option;
use crate::shapes::{Address, Coordinates, MemberPreferences, OpeningHours, SocialAccounts};
use crate::validation::{currency_amount, http_url, not_blank, photo_urls, tags};

/// How two timestamps must relate.
#[derive(Clone, Copy)]
enum Order {
    /// `end >= start`.
    NotBefore,
    /// `end > start`.
    StrictlyAfter,
}

/// Reject `end` when it breaks `order` relative to `start`.
fn ordered(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    order: Order,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    let (Some(start), Some(end)) = (start, end) else {
        return Ok(());
    };
    let holds = match order {
        Order::NotBefore => end >= start,
        Order::StrictlyAfter => end > start,
    };
    if holds {
        Ok(())
    } else {
        Err(ValidationError::new(code).with_message(Cow::Borrowed(message)))
    }
}

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// Columns for inserting a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewUser {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Network role.
    pub role: UserRole,
    /// Identity provider subject id. `clerkId` is accepted for older clients.
    #[serde(alias = "clerkId")]
    #[validate(custom(function = "not_blank"))]
    pub external_auth_id: String,
}

/// Partial update of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UserPatch {
    /// New login email.
    #[serde(default)]
    #[ts(optional)]
    #[validate(email)]
    pub email: Option<String>,
    /// New role.
    #[serde(default)]
    #[ts(optional)]
    pub role: Option<UserRole>,
    /// New identity provider subject id.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub external_auth_id: Option<String>,
}

// ---------------------------------------------------------------------------
// gym_owners
// ---------------------------------------------------------------------------

/// Columns for inserting a gym owner profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewGymOwner {
    /// The user the profile belongs to.
    pub user_id: UserId,
    /// Trading name.
    #[validate(custom(function = "not_blank"))]
    pub business_name: String,
    /// Public contact number.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub contact_phone: Option<String>,
}

/// Partial update of a gym owner profile.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GymOwnerPatch {
    /// New trading name.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub business_name: Option<String>,
    /// New contact number.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub contact_phone: Option<Option<String>>,
}

// ---------------------------------------------------------------------------
// gyms
// ---------------------------------------------------------------------------

/// Columns for inserting a gym. `status` defaults to `pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewGym {
    /// Owning business profile.
    pub owner_id: GymOwnerId,
    /// Display name.
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    /// Postal address.
    #[validate(nested)]
    pub address: Address,
    /// Map position.
    #[validate(nested)]
    pub coordinates: Coordinates,
    /// Amenity tags.
    #[serde(default)]
    #[validate(custom(function = "tags"))]
    pub amenities: Vec<String>,
    /// Photo URLs.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "photo_urls"))]
    pub photos: Option<Vec<String>>,
    /// Weekly opening hours.
    #[serde(default)]
    #[ts(optional)]
    #[validate(nested)]
    pub opening_hours: Option<OpeningHours>,
    /// Initial listing status.
    #[serde(default)]
    #[ts(optional)]
    pub status: Option<GymStatus>,
    /// Monthly fee.
    #[ts(as = "String")]
    #[validate(custom(function = "currency_amount"))]
    pub monthly_fee: Decimal,
}

/// Partial update of a gym.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GymPatch {
    /// Transfer to another business profile.
    #[serde(default)]
    #[ts(optional)]
    pub owner_id: Option<GymOwnerId>,
    /// New display name.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    /// New address.
    #[serde(default)]
    #[ts(optional)]
    #[validate(nested)]
    pub address: Option<Address>,
    /// New map position.
    #[serde(default)]
    #[ts(optional)]
    #[validate(nested)]
    pub coordinates: Option<Coordinates>,
    /// Replacement amenity list.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "tags"))]
    pub amenities: Option<Vec<String>>,
    /// Replacement photo list.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(custom(function = "photo_urls"))]
    pub photos: Option<Option<Vec<String>>>,
    /// Replacement opening hours.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(nested)]
    pub opening_hours: Option<Option<OpeningHours>>,
    /// New listing status.
    #[serde(default)]
    #[ts(optional)]
    pub status: Option<GymStatus>,
    /// New monthly fee.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    #[validate(custom(function = "currency_amount"))]
    pub monthly_fee: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// members
// ---------------------------------------------------------------------------

/// Columns for inserting a member profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewMember {
    /// The user the profile belongs to.
    pub user_id: UserId,
    /// Home gym.
    #[serde(default)]
    #[ts(optional)]
    pub home_gym_id: Option<GymId>,
    /// Preferred display name.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub preferred_name: Option<String>,
    /// Age in years.
    #[serde(default)]
    #[ts(optional)]
    #[validate(range(min = 0, max = 150))]
    pub age: Option<i32>,
    /// Occupation.
    #[serde(default)]
    #[ts(optional)]
    pub occupation: Option<String>,
    /// Home location.
    #[serde(default)]
    #[ts(optional)]
    pub location: Option<String>,
    /// Athlete types.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "tags"))]
    pub athlete_type: Option<Vec<String>>,
    /// Plan.
    #[serde(default)]
    #[ts(optional)]
    pub subscription_type: Option<SubscriptionType>,
    /// Billing state.
    #[serde(default)]
    #[ts(optional)]
    pub subscription_status: Option<SubscriptionStatus>,
    /// Avatar URL.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "http_url"))]
    pub profile_photo: Option<String>,
    /// Biography.
    #[serde(default)]
    #[ts(optional)]
    pub bio: Option<String>,
    /// Phone number.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub phone: Option<String>,
    /// Social media handles.
    #[serde(default)]
    #[ts(optional)]
    pub social_accounts: Option<SocialAccounts>,
    /// Workout preferences.
    #[serde(default)]
    #[ts(optional)]
    pub preferences: Option<MemberPreferences>,
}

/// Partial update of a member profile.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MemberPatch {
    /// New home gym; `null` detaches the member from any gym.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub home_gym_id: Option<Option<GymId>>,
    /// New preferred name.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub preferred_name: Option<Option<String>>,
    /// New age.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(range(min = 0, max = 150))]
    pub age: Option<Option<i32>>,
    /// New occupation.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub occupation: Option<Option<String>>,
    /// New home location.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub location: Option<Option<String>>,
    /// Replacement athlete types.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(custom(function = "tags"))]
    pub athlete_type: Option<Option<Vec<String>>>,
    /// New plan.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub subscription_type: Option<Option<SubscriptionType>>,
    /// New billing state.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub subscription_status: Option<Option<SubscriptionStatus>>,
    /// New avatar URL.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(custom(function = "http_url"))]
    pub profile_photo: Option<Option<String>>,
    /// New biography.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub bio: Option<Option<String>>,
    /// New phone number.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub phone: Option<Option<String>>,
    /// Replacement social media handles.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub social_accounts: Option<Option<SocialAccounts>>,
    /// Replacement preferences.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub preferences: Option<Option<MemberPreferences>>,
}

// ---------------------------------------------------------------------------
// visits
// ---------------------------------------------------------------------------

/// Columns for inserting a visit. `visit_date` defaults to now and
/// `status` to `booked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
#[validate(schema(function = "new_visit_times"))]
pub struct NewVisit {
    /// Visiting member.
    pub member_id: MemberId,
    /// Visited gym.
    pub gym_id: GymId,
    /// Scheduled date.
    #[serde(default)]
    #[ts(optional)]
    pub visit_date: Option<DateTime<Utc>>,
    /// Check-in time.
    #[serde(default)]
    #[ts(optional)]
    pub check_in_time: Option<DateTime<Utc>>,
    /// Check-out time.
    #[serde(default)]
    #[ts(optional)]
    pub check_out_time: Option<DateTime<Utc>>,
    /// Initial status.
    #[serde(default)]
    #[ts(optional)]
    pub status: Option<VisitStatus>,
    /// QR code scanned at check-in.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub qr_code_used: Option<String>,
}

fn new_visit_times(visit: &NewVisit) -> Result<(), ValidationError> {
    ordered(
        visit.check_in_time,
        visit.check_out_time,
        Order::NotBefore,
        "check_out_before_check_in",
        "check-out cannot precede check-in",
    )
}

/// Partial update of a visit.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
#[validate(schema(function = "visit_patch_times"))]
pub struct VisitPatch {
    /// New scheduled date.
    #[serde(default)]
    #[ts(optional)]
    pub visit_date: Option<DateTime<Utc>>,
    /// Check-in time.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub check_in_time: Option<Option<DateTime<Utc>>>,
    /// Check-out time.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub check_out_time: Option<Option<DateTime<Utc>>>,
    /// New status.
    #[serde(default)]
    #[ts(optional)]
    pub status: Option<VisitStatus>,
    /// QR code scanned at check-in.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub qr_code_used: Option<Option<String>>,
}

fn visit_patch_times(patch: &VisitPatch) -> Result<(), ValidationError> {
    ordered(
        patch.check_in_time.flatten(),
        patch.check_out_time.flatten(),
        Order::NotBefore,
        "check_out_before_check_in",
        "check-out cannot precede check-in",
    )
}

// ---------------------------------------------------------------------------
// messages
// ---------------------------------------------------------------------------

/// Columns for inserting a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewMessage {
    /// Author.
    pub sender_id: UserId,
    /// Addressee.
    pub recipient_id: UserId,
    /// Gym context.
    #[serde(default)]
    #[ts(optional)]
    pub gym_id: Option<GymId>,
    /// Body text.
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    /// Pre-set read time, used when importing history.
    #[serde(default)]
    #[ts(optional)]
    pub read_at: Option<DateTime<Utc>>,
}

/// Partial update of a message.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MessagePatch {
    /// Edited body text.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub content: Option<String>,
    /// Read time; `null` marks the message unread.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub read_at: Option<Option<DateTime<Utc>>>,
}

// ---------------------------------------------------------------------------
// access_codes
// ---------------------------------------------------------------------------

/// Columns for inserting an access code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewAccessCode {
    /// The token.
    #[validate(custom(function = "not_blank"))]
    pub code: String,
    /// Gym scope; `None` issues a system-wide code.
    #[serde(default)]
    #[ts(optional)]
    pub gym_id: Option<GymId>,
    /// Invitee email.
    #[validate(email)]
    pub email: String,
    /// Role granted on redemption.
    pub role: UserRole,
    /// Redemption deadline.
    pub expires_at: DateTime<Utc>,
}

/// Partial update of an access code.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AccessCodePatch {
    /// New gym scope; `null` makes the code system-wide.
    #[serde(default)]
    #[serde(deserialize_with = "double_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub gym_id: Option<Option<GymId>>,
    /// New invitee email.
    #[serde(default)]
    #[ts(optional)]
    #[validate(email)]
    pub email: Option<String>,
    /// New role.
    #[serde(default)]
    #[ts(optional)]
    pub role: Option<UserRole>,
    /// New deadline.
    #[serde(default)]
    #[ts(optional)]
    pub expires_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// subscriptions
// ---------------------------------------------------------------------------

/// Columns for inserting a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
#[validate(schema(function = "new_subscription_period"))]
pub struct NewSubscription {
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
    /// Billing provider subscription id. `stripeSubscriptionId` is accepted
    /// for older clients.
    #[serde(alias = "stripeSubscriptionId")]
    #[validate(custom(function = "not_blank"))]
    pub external_billing_id: String,
}

fn new_subscription_period(sub: &NewSubscription) -> Result<(), ValidationError> {
    ordered(
        Some(sub.current_period_start),
        Some(sub.current_period_end),
        Order::StrictlyAfter,
        "period_end_before_start",
        "period end must be after period start",
    )
}

/// Partial update of a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
#[validate(schema(function = "subscription_patch_period"))]
pub struct SubscriptionPatch {
    /// New plan.
    #[serde(default, rename = "type")]
    #[ts(optional)]
    pub subscription_type: Option<SubscriptionType>,
    /// New billing state.
    #[serde(default)]
    #[ts(optional)]
    pub status: Option<SubscriptionStatus>,
    /// New period start.
    #[serde(default)]
    #[ts(optional)]
    pub current_period_start: Option<DateTime<Utc>>,
    /// New period end.
    #[serde(default)]
    #[ts(optional)]
    pub current_period_end: Option<DateTime<Utc>>,
    /// New billing provider id.
    #[serde(default)]
    #[ts(optional)]
    #[validate(custom(function = "not_blank"))]
    pub external_billing_id: Option<String>,
}

fn subscription_patch_period(patch: &SubscriptionPatch) -> Result<(), ValidationError> {
    ordered(
        patch.current_period_start,
        patch.current_period_end,
        Order::StrictlyAfter,
        "period_end_before_start",
        "period end must be after period start",
    )
}
