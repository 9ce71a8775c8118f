/// Validation Module
///
/// Format checks for user-supplied fields before they are written. All
/// patterns are ASCII-only and anchored at both ends; a trailing newline
/// never matches.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest accepted address, local part plus `@` plus domain.
const MAX_EMAIL_LEN: usize = 320;
/// Longest accepted local part.
const MAX_LOCAL_LEN: usize = 64;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<local>[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*)",
        r"@",
        r"(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+",
        r"[A-Za-z](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    ))
    .expect("email pattern is valid")
});

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern is valid"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(98|97)[0-9]{8}$").expect("phone pattern is valid"));

/// Returns whether `value` is a syntactically valid email address.
///
/// The local part is a dot-atom of at most 64 bytes. The domain needs at least
/// two labels and its last label must start with a letter, so `a@b` and
/// `a@1.2` are rejected. Nothing is resolved over the network.
pub fn validate_email(value: &str) -> bool {
    if value.len() > MAX_EMAIL_LEN {
        return false;
    }
    match EMAIL_RE.captures(value) {
        Some(caps) => caps
            .name("local")
            .map_or(false, |local| local.as_str().len() <= MAX_LOCAL_LEN),
        None => false,
    }
}

/// Returns whether `value` is one or more ASCII letters, digits or underscores.
pub fn validate_username(value: &str) -> bool {
    USERNAME_RE.is_match(value)
}

/// Returns whether `value` is a ten digit number starting with 98 or 97.
pub fn validate_phone_number(value: &str) -> bool {
    PHONE_RE.is_match(value)
}
