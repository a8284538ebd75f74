//! Bearer token parsing.
//!
//! Tokens are JWTs: three dot-separated segments whose middle segment is a
//! base64url encoded JSON payload. Signatures are never verified here; the
//! server does that on every request.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde_json::Value;

/// Number of segments in a well-formed token
const TOKEN_SEGMENTS: usize = 3;

/// Claims checked, in order, when looking for the user id
const USER_ID_CLAIMS: [&str; 4] = ["sub", "userId", "id", "user_id"];

/// Trim whitespace and strip one layer of wrapping quotes.
///
/// The sign-in endpoint answers with a JSON string literal, so the raw body
/// usually arrives as `"eyJ..."`.
pub fn clean_token(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    let trimmed = trimmed
        .strip_suffix(['"', '\''])
        .unwrap_or(trimmed);
    trimmed.trim().to_string()
}

/// True if the token has exactly three dot-separated segments
pub fn has_token_shape(token: &str) -> bool {
    token.split('.').count() == TOKEN_SEGMENTS
}

/// Decode the payload segment of a token into JSON.
/// Returns `None` for malformed tokens or payloads.
pub fn decode_claims(token: &str) -> Option<Value> {
    if !has_token_shape(token) {
        return None;
    }
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .or_else(|_| STANDARD.decode(payload))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Numeric `exp` claim in Unix seconds, if present
pub fn expiry(claims: &Value) -> Option<f64> {
    claims.get("exp")?.as_f64()
}

/// First user id claim present in the payload, rendered as a string
pub fn user_id(claims: &Value) -> Option<String> {
    USER_ID_CLAIMS.iter().find_map(|key| match claims.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
