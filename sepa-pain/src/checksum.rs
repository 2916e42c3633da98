//! ISO 7064 mod-97 check digits, shared by IBANs and SEPA creditor
//! identifiers. Pure functions, no state.

/// Raised when an identifier contains material the check-digit scheme
/// cannot process. Invalid characters are never silently dropped here;
/// stripping is the sanitizer's concern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChecksumError {
    #[error("character {0:?} is not allowed in a checksummed identifier")]
    InvalidChar(char),
    #[error("identifier {0:?} is too short to carry check digits")]
    TooShort(String),
}

/// Uppercases the input and maps every letter to its mod-97 two-digit
/// value (A→10 … Z→35); digits pass through unchanged.
pub fn replace_chars(input: &str) -> Result<String, ChecksumError> {
    let mut out = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        let c = c.to_ascii_uppercase();
        match c {
            '0'..='9' => out.push(c),
            'A'..='Z' => {
                let v = c as u32 - 'A' as u32 + 10;
                out.push(char::from_digit(v / 10, 10).unwrap_or('0'));
                out.push(char::from_digit(v % 10, 10).unwrap_or('0'));
            }
            _ => return Err(ChecksumError::InvalidChar(c)),
        }
    }
    Ok(out)
}

/// Remainder of an arbitrarily long digit string modulo 97, computed as a
/// running remainder so no big-integer arithmetic is needed.
pub fn mod97(digits: &str) -> Result<u32, ChecksumError> {
    let mut r: u32 = 0;
    for c in digits.chars() {
        let d = c.to_digit(10).ok_or(ChecksumError::InvalidChar(c))?;
        r = (r * 10 + d) % 97;
    }
    Ok(r)
}

fn ascii_guard(value: &str, min_len: usize) -> Result<(), ChecksumError> {
    if let Some(c) = value.chars().find(|c| !c.is_ascii()) {
        return Err(ChecksumError::InvalidChar(c));
    }
    if value.len() < min_len {
        return Err(ChecksumError::TooShort(value.to_string()));
    }
    Ok(())
}

/// True iff the IBAN's check digits are correct: move the leading
/// country+check block to the back and the remainder must be 1.
pub fn validate_iban(iban: &str) -> Result<bool, ChecksumError> {
    ascii_guard(iban, 5)?;
    let digits = replace_chars(&format!("{}{}", &iban[4..], &iban[..4]))?;
    Ok(mod97(&digits)? == 1)
}

/// Returns the IBAN with its check digits replaced by the correct pair,
/// whatever the input carried in positions 2..4.
pub fn checksum_iban(iban: &str) -> Result<String, ChecksumError> {
    ascii_guard(iban, 5)?;
    let digits = replace_chars(&format!("{}{}00", &iban[4..], &iban[..2]))?;
    let m = mod97(&digits)?;
    Ok(format!("{}{:02}{}", &iban[..2], 98 - m, &iban[4..]))
}

/// Creditor identifier variant: same algorithm, but the rearrangement
/// skips the fixed 7-character country+check+business-code prefix.
pub fn validate_creditor_id(cid: &str) -> Result<bool, ChecksumError> {
    ascii_guard(cid, 8)?;
    let digits = replace_chars(&format!("{}{}", &cid[7..], &cid[..4]))?;
    Ok(mod97(&digits)? == 1)
}

/// Returns the creditor identifier with corrected check digits, keeping
/// the business code in positions 4..7 untouched.
pub fn checksum_creditor_id(cid: &str) -> Result<String, ChecksumError> {
    ascii_guard(cid, 8)?;
    let digits = replace_chars(&format!("{}{}00", &cid[7..], &cid[..2]))?;
    let m = mod97(&digits)?;
    Ok(format!("{}{:02}{}", &cid[..2], 98 - m, &cid[4..]))
}
