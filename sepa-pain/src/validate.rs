//! Field-level assertions. Each failure carries the offending field name
//! and value so a rejected document points straight at the bad input.
//!
//! All checks run against the raw caller-supplied value; sanitization
//! happens separately on the copy that gets serialized.

use std::sync::LazyLock;

use regex::Regex;
use sepa_pain_types::{Amount, Date};

use crate::checksum;
use crate::error::{SepaError, SepaResult};

/// Controls which checks run during serialization. Carried explicitly by
/// the document configuration; there is no process-wide switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationMode {
    /// Master switch. Off means nothing raises; values are still
    /// sanitized and truncated on the way out.
    pub enabled: bool,
    /// Sub-switch for the restricted identifier charset patterns.
    pub charset: bool,
}

impl Default for ValidationMode {
    fn default() -> Self {
        ValidationMode {
            enabled: true,
            charset: true,
        }
    }
}

impl ValidationMode {
    pub fn disabled() -> Self {
        ValidationMode {
            enabled: false,
            charset: false,
        }
    }

    /// Structural rules: presence, lengths, ranges, checksums,
    /// cross-field agreement.
    pub(crate) fn structural(&self) -> bool {
        self.enabled
    }

    /// The identifier charset patterns, independently switchable.
    pub(crate) fn charset_checks(&self) -> bool {
        self.enabled && self.charset
    }
}

// Restricted charsets for SEPA identifier fields. Both cap at 35; the
// second drops the space.
static IDENTIFIER_WITH_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9 +?/\-:().,']{1,35}$").expect("invalid identifier regex")
});
static IDENTIFIER_NO_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+?/\-:().,']{1,35}$").expect("invalid identifier regex")
});

/// The value must be one of a fixed set of codes.
pub fn assert_fixed(field: &str, value: &str, allowed: &[&str]) -> SepaResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(SepaError::validation(
        field,
        value,
        format!("must be one of {}", allowed.join(", ")),
    ))
}

/// Character-count bounds; either side may be open.
pub fn assert_length(
    field: &str,
    value: &str,
    min: Option<usize>,
    max: Option<usize>,
) -> SepaResult<()> {
    let len = value.chars().count();
    if let Some(min) = min {
        if len < min {
            return Err(SepaError::validation(
                field,
                value,
                format!("must be at least {} characters", min),
            ));
        }
    }
    if let Some(max) = max {
        if len > max {
            return Err(SepaError::validation(
                field,
                value,
                format!("must be at most {} characters", max),
            ));
        }
    }
    Ok(())
}

/// Numeric bounds, both inclusive.
pub fn assert_range(field: &str, value: f64, min: f64, max: f64) -> SepaResult<()> {
    if value < min || value > max {
        return Err(SepaError::validation(
            field,
            value.to_string(),
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Within the SEPA bounds and expressible in whole cents.
pub fn assert_amount(field: &str, amount: Amount) -> SepaResult<()> {
    assert_range(field, amount.value(), 0.01, 999_999_999.99)?;
    if !amount.is_whole_cents() {
        return Err(SepaError::validation(
            field,
            amount.value().to_string(),
            "must have at most two decimal places",
        ));
    }
    Ok(())
}

/// The IBAN's mod-97 check digits must be correct.
pub fn assert_iban(field: &str, value: &str) -> SepaResult<()> {
    match checksum::validate_iban(value) {
        Ok(true) => Ok(()),
        Ok(false) => Err(SepaError::validation(field, value, "IBAN checksum is invalid")),
        Err(e) => Err(SepaError::validation(field, value, e.to_string())),
    }
}

/// The creditor identifier's mod-97 check digits must be correct.
pub fn assert_creditor_id(field: &str, value: &str) -> SepaResult<()> {
    match checksum::validate_creditor_id(value) {
        Ok(true) => Ok(()),
        Ok(false) => Err(SepaError::validation(
            field,
            value,
            "creditor identifier checksum is invalid",
        )),
        Err(e) => Err(SepaError::validation(field, value, e.to_string())),
    }
}

/// The date must be present. `Date` itself only holds real calendar
/// dates, so presence is the remaining failure mode.
pub fn assert_date(field: &str, value: Option<&Date>) -> SepaResult<()> {
    match value {
        Some(_) => Ok(()),
        None => Err(SepaError::validation(field, "", "date is required")),
    }
}

/// Restricted identifier charset; `allow_space` picks between the two
/// SEPA identifier sets.
pub fn assert_identifier(field: &str, value: &str, allow_space: bool) -> SepaResult<()> {
    let pattern: &Regex = if allow_space {
        &IDENTIFIER_WITH_SPACE
    } else {
        &IDENTIFIER_NO_SPACE
    };
    if pattern.is_match(value) {
        return Ok(());
    }
    Err(SepaError::validation(
        field,
        value,
        "contains characters outside the permitted identifier set or is longer than 35",
    ))
}

/// When a BIC is present, its embedded country code (characters 4..6)
/// must agree with the IBAN's country prefix.
pub fn assert_bic_country(field: &str, bic: &str, iban: &str) -> SepaResult<()> {
    if bic.is_empty() {
        return Ok(());
    }
    let bic_country = bic.get(4..6);
    let iban_country = iban.get(0..2);
    match (bic_country, iban_country) {
        (Some(b), Some(i)) if b.eq_ignore_ascii_case(i) => Ok(()),
        _ => Err(SepaError::validation(
            field,
            bic,
            format!("BIC country code does not match IBAN {:?}", iban),
        )),
    }
}
