/// Masks a card number for logging: first four and last four digits visible,
/// everything else replaced. Raw card numbers must never reach a log line.
pub fn mask_card_number(card_number: &str) -> String {
    let digits: String = card_number.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.len() > 8 {
        format!("{}****{}", &digits[..4], &digits[digits.len() - 4..])
    } else {
        "****".to_string()
    }
}
