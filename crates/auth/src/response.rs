//! Token endpoint response parsing.
//!
//! Success: `{"access_token": "…", "expires_in": 3600, "user_id": "…"}`.
//! Failure: `{"error": "invalid_grant", "error_description": "…"}`.

use msalive_types::{AuthError, AuthResult, traits::Result};
use serde_json::Value;

/// Parse a raw token endpoint body into an [`AuthResult`].
///
/// `expires_at` is computed as now + `expires_in` seconds.
///
/// # Errors
///
/// - [`AuthError::NoData`] for an empty body.
/// - [`AuthError::ConversionFailed`] if the body is not a JSON object.
/// - [`AuthError::Provider`] if the object carries an `error` string.
/// - [`AuthError::InvalidResponse`] if a required field is missing or mistyped.
pub fn parse_token_response(body: &[u8]) -> Result<AuthResult> {
    if body.is_empty() {
        return Err(AuthError::NoData);
    }
    let json: Value =
        serde_json::from_slice(body).map_err(|e| AuthError::ConversionFailed(e.to_string()))?;
    let Some(object) = json.as_object() else {
        return Err(AuthError::ConversionFailed(
            "expected a JSON object".into(),
        ));
    };

    if let Some(error) = object.get("error").and_then(Value::as_str) {
        return Err(AuthError::Provider {
            error: error.to_string(),
            description: object
                .get("error_description")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    let access_token = object
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or(AuthError::InvalidResponse("access_token"))?;
    let expires_in = object
        .get("expires_in")
        .and_then(Value::as_u64)
        .ok_or(AuthError::InvalidResponse("expires_in"))?;
    let user_id = object
        .get("user_id")
        .and_then(Value::as_str)
        .ok_or(AuthError::InvalidResponse("user_id"))?;

    Ok(AuthResult::new(access_token, user_id, expires_in))
}
