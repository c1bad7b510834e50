//! Phone number normalization shared by the delivery providers.

/// Strip formatting and ensure a leading country code. Ten-digit numbers
/// starting 6-9 are assumed Indian mobile numbers and get `+91`.
pub fn clean_phone_number(raw: &str) -> String {
    let mut cleaned: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if cleaned.is_empty() {
        return cleaned;
    }

    if raw.trim_start().starts_with('+') {
        cleaned.insert(0, '+');
    } else if cleaned.len() == 12 && cleaned.starts_with("91") {
        cleaned.insert(0, '+');
    } else if cleaned.len() == 10 && cleaned.starts_with(['6', '7', '8', '9']) {
        cleaned.insert_str(0, "+91");
    } else {
        cleaned.insert(0, '+');
    }
    cleaned
}

/// Minimum digits for a number we are willing to hand to a provider.
pub fn is_dialable(cleaned: &str) -> bool {
    cleaned.chars().filter(|c| c.is_ascii_digit()).count() >= 8
}
