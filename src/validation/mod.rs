//! Per-field acceptance rules for payment submissions.
//!
//! The four predicates are pure and individually answer "would this field be
//! accepted" — the UI re-runs them on every change. `validate_payment`
//! aggregates them at the submission boundary and reports the first failing
//! field.

use std::fmt;

use crate::domain::card::strip_non_digits;

pub const NAME_MAX_LEN: usize = 100;
pub const PHONE_DIGITS: usize = 10;
pub const CARD_MIN_DIGITS: usize = 13;
pub const CARD_MAX_DIGITS: usize = 19;
pub const AMOUNT_MIN: f64 = 0.01;
pub const AMOUNT_MAX: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Accepts a display name whose trimmed length is 1-100 characters.
pub fn validate_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= NAME_MAX_LEN
}

/// Accepts a phone number that contains exactly ten decimal digits once
/// formatting characters are stripped.
pub fn validate_phone_number(phone_number: &str) -> bool {
    strip_non_digits(phone_number).len() == PHONE_DIGITS
}

/// Accepts a card number that, after removing whitespace, is all digits and
/// 13-19 characters long.
pub fn validate_card_number(card_number: &str) -> bool {
    let cleaned: String = card_number.chars().filter(|ch| !ch.is_whitespace()).collect();
    cleaned.len() >= CARD_MIN_DIGITS
        && cleaned.len() <= CARD_MAX_DIGITS
        && cleaned.chars().all(|ch| ch.is_ascii_digit())
}

/// Accepts an amount in [0.01, 100000] inclusive.
pub fn validate_amount_value(amount: f64) -> bool {
    amount.is_finite() && (AMOUNT_MIN..=AMOUNT_MAX).contains(&amount)
}

/// String form of [`validate_amount_value`]: the parse must succeed first.
pub fn validate_amount(amount: &str) -> bool {
    amount
        .trim()
        .parse::<f64>()
        .map(validate_amount_value)
        .unwrap_or(false)
}

/// Submission gate: all four fields must pass simultaneously. Returns the
/// first failing field so the client can surface a targeted message.
pub fn validate_payment(
    name: &str,
    phone_number: &str,
    card_number: &str,
    amount: f64,
) -> ValidationResult {
    if !validate_name(name) {
        return Err(ValidationError::new(
            "name",
            format!("must be 1-{} characters after trimming", NAME_MAX_LEN),
        ));
    }
    if !validate_phone_number(phone_number) {
        return Err(ValidationError::new(
            "phone_number",
            format!("must contain exactly {} digits", PHONE_DIGITS),
        ));
    }
    if !validate_card_number(card_number) {
        return Err(ValidationError::new(
            "card_number",
            format!(
                "must be {}-{} digits",
                CARD_MIN_DIGITS, CARD_MAX_DIGITS
            ),
        ));
    }
    if !validate_amount_value(amount) {
        return Err(ValidationError::new(
            "amount",
            format!("must be between {} and {}", AMOUNT_MIN, AMOUNT_MAX),
        ));
    }
    Ok(())
}
