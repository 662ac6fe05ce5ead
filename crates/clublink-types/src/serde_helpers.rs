//! Serde helpers for patch inputs.

use serde::{Deserialize, Deserializer};

/// Deserialize a present field, `null` included, as `Some(..)`.
///
/// Combined with `#[serde(default)]` an absent field stays `None`, while an
/// explicit `null` arrives as `Some(None)`.
///
/// # Errors
///
/// Returns the deserializer's error if the value is neither `null` nor a `T`.
#[allow(clippy::option_option)]
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
