//! Inbound half of the request/response contract.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::engine::{short_type_name, RawResponse};
use crate::error::{Result, TeamworkError};

/// Most of a failed body kept for diagnostics.
const MAX_ERROR_BODY: usize = 2048;

/// A value that can be produced from one inbound API response.
///
/// Every operation documents a single success status. Any other status is
/// reported as [`TeamworkError::UnexpectedStatus`] without looking at the
/// body shape.
pub trait ApiResponse: Sized {
    /// The only status code that counts as success.
    const EXPECTED_STATUS: StatusCode;

    /// Decode a response whose status already matched.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the body has the wrong shape, or a
    /// missing-id error for create responses without an identifier.
    fn decode(raw: &RawResponse) -> Result<Self>;

    /// Validate the status code, then decode.
    fn from_http(raw: RawResponse) -> Result<Self> {
        if raw.status != Self::EXPECTED_STATUS {
            return Err(unexpected_status(&raw));
        }
        Self::decode(&raw)
    }
}

/// Decode a JSON body, naming the target type on failure.
pub(crate) fn decode_json<T: DeserializeOwned>(raw: &RawResponse) -> Result<T> {
    serde_json::from_slice(&raw.body).map_err(|source| TeamworkError::Decode {
        response: short_type_name::<T>(),
        source,
    })
}

/// Reject a create response that came back without an identifier.
pub(crate) fn require_id(id: i64, entity: &'static str) -> Result<()> {
    if id == 0 {
        return Err(TeamworkError::MissingId { entity });
    }
    Ok(())
}

/// Build the structured error for a response with the wrong status.
pub(crate) fn unexpected_status(raw: &RawResponse) -> TeamworkError {
    let body = raw.text();
    let message = extract_error_message(&body)
        .unwrap_or_else(|| raw.status.canonical_reason().unwrap_or("unknown status").to_string());

    let mut body = body;
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }

    TeamworkError::UnexpectedStatus {
        status: raw.status.as_u16(),
        message,
        body,
    }
}

/// Pull a human message out of an error body, if it has one.
fn extract_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;

    for key in ["message", "error", "MESSAGE"] {
        if let Some(msg) = json.get(key).and_then(|m| m.as_str()) {
            return Some(msg.to_string());
        }
    }

    json.get("errors")
        .and_then(|errors| errors.as_array())
        .and_then(|errors| errors.first())
        .and_then(|first| first.get("detail").or_else(|| first.get("title")))
        .and_then(|detail| detail.as_str())
        .map(str::to_string)
}
