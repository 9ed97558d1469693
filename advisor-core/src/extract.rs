use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::fields::FixedField;

/// Known language names, scanned in fixed order; first substring match wins
pub const KNOWN_LANGUAGES: [(&str, &str); 4] = [
    ("english", "English"),
    ("spanish", "Spanish"),
    ("french", "French"),
    ("german", "German"),
];

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
    })
}

/// True when the trimmed text matches the strict email shape
pub fn is_valid_email(text: &str) -> bool {
    email_re().is_match(text.trim())
}

fn distinct_non_space_chars(text: &str) -> usize {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<HashSet<char>>()
        .len()
}

fn is_all_digits_ignoring_spaces(text: &str) -> bool {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

/// Cheap nonsense check for the fixed-field phase: long enough to judge,
/// and either pure digits or a repeated-character string.
pub fn is_nonsensical(message: &str) -> bool {
    let clean = message.trim();
    if clean.chars().count() <= 3 {
        return false;
    }
    if is_all_digits_ignoring_spaces(clean) {
        return true;
    }
    distinct_non_space_chars(clean) < 3 && clean.chars().count() > 5
}

/// Decide whether raw user text satisfies the minimum shape for a fixed
/// field, returning the normalized value to store. Language is never
/// rejected: a known language name is canonicalized, anything else is
/// stored verbatim.
pub fn extract_fixed_field(field: FixedField, message: &str) -> Option<String> {
    let trimmed = message.trim();
    let len = trimmed.chars().count();

    match field {
        FixedField::CompanyName => (len > 1).then(|| trimmed.to_string()),
        FixedField::Language => {
            let lowered = trimmed.to_lowercase();
            for (needle, canonical) in KNOWN_LANGUAGES {
                if lowered.contains(needle) {
                    return Some(canonical.to_string());
                }
            }
            Some(trimmed.to_string())
        }
        FixedField::Sphere | FixedField::Education | FixedField::Location => {
            (len > 2).then(|| trimmed.to_string())
        }
        FixedField::Experience => (len > 0).then(|| trimmed.to_string()),
    }
}

/// Scan raw text for an email address. The strict pattern wins; failing
/// that, any "@"-containing text longer than 5 characters whose domain part
/// contains a dot is taken as a best-effort address.
pub fn extract_email(message: &str) -> Option<String> {
    if let Some(m) = email_re().find(message) {
        return Some(m.as_str().to_string());
    }

    let trimmed = message.trim();
    if let Some((_, domain)) = trimmed.split_once('@') {
        if trimmed.chars().count() > 5 && domain.contains('.') {
            return Some(trimmed.to_string());
        }
    }
    None
}
