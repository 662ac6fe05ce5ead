//! Field-level validation functions used by the `validator` derives.
//!
//! Each function has the signature `validator` expects for
//! `#[validate(custom(function = ...))]`: it receives a reference to the
//! field value and returns a [`ValidationError`] describing the first
//! problem found.

use std::borrow::Cow;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use validator::{ValidateUrl, ValidationError};

/// Largest value a `NUMERIC(10, 2)` column can hold, exclusive.
const MAX_FEE_EXCLUSIVE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Number of fractional digits kept for currency amounts.
const CURRENCY_SCALE: u32 = 2;

/// Build a [`ValidationError`] with a static code and message.
fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Reject strings that are empty or contain only whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank"));
    }
    Ok(())
}

/// Accept a `HH:MM` 24-hour clock time.
pub fn clock_time(value: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_parse| error("clock_time", "must be a HH:MM time"))
}

/// Accept a currency amount that fits `NUMERIC(10, 2)` exactly.
pub fn currency_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(error("currency_negative", "must not be negative"));
    }
    if value.normalize().scale() > CURRENCY_SCALE {
        return Err(error(
            "currency_precision",
            "must have at most two decimal places",
        ));
    }
    if *value >= MAX_FEE_EXCLUSIVE {
        return Err(error("currency_range", "must be below 100000000.00"));
    }
    Ok(())
}

/// Every entry must be an absolute `http`/`https` URL.
pub fn photo_urls(values: &[String]) -> Result<(), ValidationError> {
    let all_valid = values.iter().all(|url| {
        url.validate_url() && (url.starts_with("https://") || url.starts_with("http://"))
    });
    if all_valid {
        Ok(())
    } else {
        Err(error("photo_url", "every photo must be an http(s) URL"))
    }
}

/// A single optional URL field (profile photo).
pub fn http_url(value: &str) -> Result<(), ValidationError> {
    if value.validate_url() && (value.starts_with("https://") || value.starts_with("http://")) {
        Ok(())
    } else {
        Err(error("url", "must be an http(s) URL"))
    }
}

/// Free-form tag lists (amenities, athlete types) must not hold blank entries.
pub fn tags(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|tag| tag.trim().is_empty()) {
        return Err(error("blank_tag", "entries must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("  \n\t").is_err());
    }

    #[test]
    fn clock_times_must_be_hh_mm() {
        assert!(clock_time("06:00").is_ok());
        assert!(clock_time("23:59").is_ok());
        assert!(clock_time("24:00").is_err());
        assert!(clock_time("6am").is_err());
    }

    #[test]
    fn currency_keeps_two_decimal_places() {
        assert!(currency_amount(&dec!(300.00)).is_ok());
        assert!(currency_amount(&dec!(0)).is_ok());
        assert!(currency_amount(&dec!(12.5)).is_ok());
        // Trailing zeros beyond the scale are harmless.
        assert!(currency_amount(&dec!(12.500)).is_ok());
        assert!(currency_amount(&dec!(12.345)).is_err());
        assert!(currency_amount(&dec!(-1.00)).is_err());
        assert!(currency_amount(&dec!(99999999.99)).is_ok());
        assert!(currency_amount(&dec!(100000000.00)).is_err());
    }

    #[test]
    fn photo_lists_require_http_urls() {
        let good = vec!["https://example.com/gym1-1.jpg".to_owned()];
        let bad = vec!["ftp://example.com/x.jpg".to_owned()];
        assert!(photo_urls(&good).is_ok());
        assert!(photo_urls(&[]).is_ok());
        assert!(photo_urls(&bad).is_err());
    }
}
