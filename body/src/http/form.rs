//! `application/x-www-form-urlencoded` decoding

use super::context::{accumulate, Fields};
use crate::error::BodyError;

/// Decode a URL-encoded form body into fields
///
/// Repeated keys become a list in the order they appear. Pairs are
/// percent-decoded with `+` as space. A stray `%` escape or a `;` separator
/// fails the whole decode.
pub fn decode_form(body: &[u8]) -> Result<Fields, BodyError> {
    validate(body)?;

    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(body).map_err(|e| BodyError::form(e.to_string()))?;

    let mut fields = Fields::new();
    for (key, value) in pairs {
        accumulate(&mut fields, key, value);
    }
    Ok(fields)
}

/// Reject input the lenient `form_urlencoded` parser would silently accept
fn validate(body: &[u8]) -> Result<(), BodyError> {
    for segment in body.split(|b| *b == b'&').filter(|s| !s.is_empty()) {
        if segment.contains(&b';') {
            return Err(BodyError::form("invalid semicolon separator in query"));
        }

        let mut i = 0;
        while i < segment.len() {
            if segment[i] == b'%' {
                let escape = segment.get(i + 1..i + 3);
                match escape {
                    Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => i += 3,
                    _ => {
                        let end = (i + 3).min(segment.len());
                        return Err(BodyError::form(format!(
                            "invalid URL escape \"{}\"",
                            String::from_utf8_lossy(&segment[i..end])
                        )));
                    }
                }
            } else {
                i += 1;
            }
        }
    }
    Ok(())
}
