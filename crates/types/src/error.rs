//! Unified error type for the msalive workspace.

use thiserror::Error;

/// Enumerates all error kinds that can occur across msalive crates.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint answered with an empty body.
    #[error("no data in token response")]
    NoData,

    /// The token endpoint body is not a JSON object.
    #[error("conversion from JSON failed: {0}")]
    ConversionFailed(String),

    /// The provider answered with an OAuth error object.
    #[error("provider error \"{error}\": {}", .description.as_deref().unwrap_or("no description"))]
    Provider {
        error: String,
        description: Option<String>,
    },

    /// A required field is missing from the token response or has the wrong type.
    #[error("invalid token response: missing or malformed `{0}`")]
    InvalidResponse(&'static str),

    /// A refresh was requested without a usable refresh token.
    #[error("refresh requires a non-empty refresh token")]
    MissingRefreshToken,

    /// The controller was driven out of order (e.g. `start` before `configure`).
    #[error("invalid flow state: {0}")]
    InvalidState(String),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(String),

    /// The browser collaborator failed to load a page.
    #[error("browser error: {0}")]
    Browser(String),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl AuthError {
    /// Returns `true` for failures reported by the token endpoint itself
    /// (as opposed to transport or usage errors).
    #[must_use]
    pub fn is_token_response_error(&self) -> bool {
        matches!(
            self,
            Self::NoData
                | Self::ConversionFailed(_)
                | Self::Provider { .. }
                | Self::InvalidResponse(_)
        )
    }
}
