//! Async traits for the collaborators a sign-in flow depends on.
//!
//! The controller in `msalive-auth` only sees these traits, so hosts can plug
//! in an embedded web view, a system browser, or a test double.

use crate::AuthError;
use async_trait::async_trait;
use bytes::Bytes;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Content type of every request body sent to the token endpoint.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A browser surface the flow can point at a URL.
///
/// The host reports each completed navigation back to the controller
/// (`AuthFlowController::on_navigation_finished`); the browser itself never
/// calls into the controller.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Start loading `url`.
    async fn navigate(&self, url: &str) -> Result<()>;
}

/// Sends form-encoded POST requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` (already form-encoded) to `url` and return the raw response body.
    ///
    /// An empty body is returned as empty bytes, not as an error.
    async fn post_form(&self, url: &str, body: String) -> Result<Bytes>;
}
