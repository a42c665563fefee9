//! Flow actions, controller states and terminal outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AuthError;

/// The operation a sign-in flow performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Login,
    Refresh,
    SignOut,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Refresh => write!(f, "refresh"),
            Self::SignOut => write!(f, "signout"),
        }
    }
}

impl std::str::FromStr for Action {
    type Err = AuthError;

    /// Parse an action name or alias into an [`Action`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the string names no known action.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" | "signin" | "sign_in" => Ok(Self::Login),
            "refresh" => Ok(Self::Refresh),
            "signout" | "sign_out" | "logout" => Ok(Self::SignOut),
            other => Err(AuthError::Config(format!("unknown action: {other}"))),
        }
    }
}

/// Where a controller currently is in its lifecycle.
///
/// `Idle → {AwaitingLogin, AwaitingRefresh, AwaitingSignOut} → Closed`, with
/// `AwaitingLogin → AwaitingRefresh` once a login redirect yields a refresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    AwaitingLogin,
    AwaitingRefresh,
    AwaitingSignOut,
    Closed,
}

impl FlowState {
    #[must_use]
    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }
}

/// Why a flow closed.
#[derive(Debug)]
pub enum FlowOutcome {
    /// A result was delivered to the receiver.
    Authenticated,
    /// The sign-out redirect came back without an error.
    SignedOut,
    /// The sign-out redirect carried an `error` parameter.
    SignOutRejected { error: String },
    /// The token exchange failed; nothing was delivered.
    Failed(AuthError),
    /// The navigation source ended before the flow reached a terminal state.
    Abandoned,
}

impl FlowOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Authenticated | Self::SignedOut)
    }
}
