//! Free-text cleanup applied while rendering, before anything reaches the
//! XML writer. Characters outside the permitted SEPA text charset are
//! removed (not replaced), then the value is truncated to the field's
//! maximum. This runs unconditionally; the validation switch only decides
//! whether an out-of-bound *caller* value raises first.

/// Names, street and city lines.
pub const MAX_NAME: usize = 70;
/// ISO 3166 country codes.
pub const MAX_COUNTRY: usize = 2;
/// Unstructured remittance information (`Ustrd`).
pub const MAX_REMITTANCE: usize = 140;
/// Message, payment, end-to-end and mandate identifiers.
pub const MAX_IDENTIFIER: usize = 35;

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, ' ' | '.' | '+' | '?' | '/' | ':' | '(' | ')' | ',')
}

/// Strips disallowed characters, then truncates to `max_len` characters.
pub fn sanitize_text(value: &str, max_len: usize) -> String {
    value.chars().filter(|c| is_allowed(*c)).take(max_len).collect()
}
