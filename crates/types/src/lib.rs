//! Core types and traits for the msalive workspace.
//!
//! This crate defines the shared abstractions used by the sign-in flow:
//! the error type, flow actions and states, token/result representations,
//! and the collaborator traits the controller is written against.

pub mod error;
pub mod flow;
pub mod token;
pub mod traits;

pub use error::AuthError;
pub use flow::{Action, FlowOutcome, FlowState};
pub use token::{AuthResult, RefreshToken};
pub use traits::{Browser, FORM_CONTENT_TYPE, HttpTransport, Result};
