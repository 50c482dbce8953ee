//! Base-62 encoding of record identifiers into short codes.
//!
//! Symbols are ordered digits first, then lowercase, then uppercase, so the
//! encoding of small numbers reads like ordinary decimal: `0 -> "0"`,
//! `9 -> "9"`, `10 -> "a"`, `61 -> "Z"`, `62 -> "10"`.
//!
//! Encoding is injective over `u64`: distinct identifiers always produce
//! distinct codes, which is what makes derived codes unique without a
//! collision check.

/// The 62-symbol alphabet, least significant value first.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u64 = BASE62_ALPHABET.len() as u64;

/// Encodes `value` as a base-62 string, most significant symbol first.
///
/// # Examples
///
/// ```
/// use shortlink::utils::base62::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "Z");
/// assert_eq!(encode(62), "10");
/// ```
pub fn encode(mut value: u64) -> String {
    if value == 0 {
        return char::from(BASE62_ALPHABET[0]).to_string();
    }

    let mut symbols = Vec::with_capacity(11);
    while value > 0 {
        symbols.push(BASE62_ALPHABET[(value % BASE) as usize]);
        value /= BASE;
    }

    symbols.iter().rev().map(|&b| char::from(b)).collect()
}

/// Decodes a base-62 string back into the number it represents.
///
/// Returns `None` for an empty string, a symbol outside the alphabet, or a
/// value that does not fit in `u64`.
pub fn decode(code: &str) -> Option<u64> {
    if code.is_empty() {
        return None;
    }

    code.bytes().try_fold(0u64, |acc, byte| {
        acc.checked_mul(BASE)?.checked_add(symbol_value(byte)?)
    })
}

fn symbol_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'z' => byte - b'a' + 10,
        b'A'..=b'Z' => byte - b'A' + 36,
        _ => return None,
    };
    Some(u64::from(value))
}
