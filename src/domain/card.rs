//! Card number utilities: display formatting, brand detection, and the
//! non-cryptographic fingerprint used to obfuscate card numbers on screen.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card brand, derived purely from the digit prefix. Never user-supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CardType {
    Visa,
    Mastercard,
    #[serde(rename = "American Express")]
    AmericanExpress,
    RuPay,
    Discover,
    #[serde(rename = "JCB")]
    Jcb,
    #[serde(rename = "Diners Club")]
    DinersClub,
    #[default]
    Unknown,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Visa => "Visa",
            CardType::Mastercard => "Mastercard",
            CardType::AmericanExpress => "American Express",
            CardType::RuPay => "RuPay",
            CardType::Discover => "Discover",
            CardType::Jcb => "JCB",
            CardType::DinersClub => "Diners Club",
            CardType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drops everything except ASCII digits.
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

fn strip_whitespace(raw: &str) -> String {
    raw.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Regroups the digits of `raw` into space-separated groups of four.
/// The last group may hold 1-4 digits; empty input yields an empty string.
pub fn format_card_number(raw: &str) -> String {
    let digits = strip_non_digits(raw);
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(ch);
    }
    formatted
}

/// Classifies a card number by digit prefix, first matching rule wins.
///
/// The rule order is part of the observable contract: RuPay's `60` prefix is
/// checked before Discover's more specific `6011`, so `6011...` numbers
/// classify as RuPay. Display code elsewhere depends on these exact labels,
/// so the priority must not be reordered.
pub fn detect_card_type(card_number: &str) -> CardType {
    let cleaned = strip_whitespace(card_number);
    let digits = cleaned.as_bytes();

    let prefix = |candidates: &[&str]| candidates.iter().any(|p| cleaned.starts_with(p));

    if cleaned.starts_with('4') {
        return CardType::Visa;
    }
    if digits.len() >= 2 && digits[0] == b'5' && (b'1'..=b'5').contains(&digits[1]) {
        return CardType::Mastercard;
    }
    if digits.len() >= 2 && digits[0] == b'3' && (digits[1] == b'4' || digits[1] == b'7') {
        return CardType::AmericanExpress;
    }
    if prefix(&["60", "65", "81", "82", "508"]) {
        return CardType::RuPay;
    }
    if prefix(&["6011", "644", "645", "646", "647", "648", "649"]) {
        return CardType::Discover;
    }
    if is_jcb_prefix(digits) {
        return CardType::Jcb;
    }
    if prefix(&["30", "36", "38"]) {
        return CardType::DinersClub;
    }
    CardType::Unknown
}

// 3528-3589: `35` followed by `2[8-9]` or `[3-8][0-9]`.
fn is_jcb_prefix(digits: &[u8]) -> bool {
    if digits.len() < 4 || digits[0] != b'3' || digits[1] != b'5' {
        return false;
    }
    match digits[2] {
        b'2' => digits[3] == b'8' || digits[3] == b'9',
        b'3'..=b'8' => digits[3].is_ascii_digit(),
        _ => false,
    }
}

/// Deterministic short fingerprint of a card number, used only to obfuscate
/// the value on screen. Not a security hash; collisions are acceptable.
///
/// Folds each character code through `h = h * 31 + code` in wrapping 32-bit
/// signed arithmetic, then renders the absolute value as lowercase hex,
/// zero-padded to at least eight characters. Stored fingerprints depend on
/// these exact semantics, so the arithmetic must stay 32-bit.
pub fn generate_card_hash(card_number: &str) -> String {
    let cleaned = strip_whitespace(card_number);
    let mut hash: i32 = 0;
    for ch in cleaned.chars() {
        let code = ch as u32 as i32;
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(code);
    }
    format!("{:08x}", hash.unsigned_abs())
}
