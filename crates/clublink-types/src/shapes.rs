//! Typed shapes for the `jsonb` columns.
//!
//! The schema stores addresses, coordinates, opening hours, social
//! accounts and member preferences as `jsonb`. These structs pin down the
//! shape of each document so every row written through the store has the
//! same keys.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::validation::{clock_time, not_blank};

/// Postal address of a gym.
///
/// `line1` is accepted as an alias for `street` on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export, export_to = "bindings/")]
#[validate(schema(function = "address_has_content"))]
pub struct Address {
    /// Street and number.
    #[serde(default)]
    #[serde(alias = "line1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub street: Option<String>,
    /// Suite, floor or unit.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub line2: Option<String>,
    /// City or town.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub city: Option<String>,
    /// State, province or region.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub state: Option<String>,
    /// Postal code.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub zip_code: Option<String>,
    /// Country name or ISO code.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub country: Option<String>,
}

fn address_has_content(address: &Address) -> Result<(), ValidationError> {
    let has_content = [
        &address.street,
        &address.line2,
        &address.city,
        &address.state,
        &address.zip_code,
        &address.country,
    ]
    .into_iter()
    .flatten()
    .any(|part| not_blank(part).is_ok());

    if has_content {
        Ok(())
    } else {
        Err(ValidationError::new("address_empty")
            .with_message(Cow::Borrowed("address must contain at least one field")))
    }
}

/// WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS, Validate)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinates {
    /// Latitude in degrees.
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    /// Longitude in degrees.
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

/// Opening and closing time for one weekday, as `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "bindings/")]
pub struct DayHours {
    /// Opening time.
    #[validate(custom(function = "clock_time"))]
    pub open: String,
    /// Closing time.
    #[validate(custom(function = "clock_time"))]
    pub close: String,
}

impl DayHours {
    /// Build a day entry from two `HH:MM` strings.
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_owned(),
            close: close.to_owned(),
        }
    }
}

/// Weekly opening hours. A missing day means closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Validate)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "bindings/")]
pub struct OpeningHours {
    /// Monday hours.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(nested)]
    pub monday: Option<DayHours>,
    /// Tuesday hours.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(nested)]
    pub tuesday: Option<DayHours>,
    /// Wednesday hours.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(nested)]
    pub wednesday: Option<DayHours>,
    /// Thursday hours.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(nested)]
    pub thursday: Option<DayHours>,
    /// Friday hours.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(nested)]
    pub friday: Option<DayHours>,
    /// Saturday hours.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(nested)]
    pub saturday: Option<DayHours>,
    /// Sunday hours.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    #[validate(nested)]
    pub sunday: Option<DayHours>,
}

impl OpeningHours {
    /// Same hours Monday to Friday, another set for the weekend.
    pub fn weekdays_and_weekend(weekday: &DayHours, saturday: &DayHours, sunday: &DayHours) -> Self {
        Self {
            monday: Some(weekday.clone()),
            tuesday: Some(weekday.clone()),
            wednesday: Some(weekday.clone()),
            thursday: Some(weekday.clone()),
            friday: Some(weekday.clone()),
            saturday: Some(saturday.clone()),
            sunday: Some(sunday.clone()),
        }
    }
}

/// Social media handles shown on a member profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "bindings/")]
pub struct SocialAccounts {
    /// Instagram handle.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub instagram: Option<String>,
    /// Twitter / X handle.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub twitter: Option<String>,
    /// Facebook profile name.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub facebook: Option<String>,
    /// `LinkedIn` profile slug.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub linkedin: Option<String>,
    /// `TikTok` handle.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub tiktok: Option<String>,
}

/// Workout preferences captured during member onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export, export_to = "bindings/")]
pub struct MemberPreferences {
    /// Preferred time of day, e.g. `morning` or `evening`.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub workout_time: Option<String>,
    /// Favourite class formats.
    #[serde(default)]
    pub favorite_classes: Vec<String>,
    /// Equipment the member likes to use.
    #[serde(default)]
    pub equipment: Vec<String>,
}
