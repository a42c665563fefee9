//! Microsoft Account sign-in flows.
//!
//! [`endpoints`] builds the provider URLs and token request bodies,
//! [`redirect`] and [`response`] parse what comes back, and the
//! [`AuthFlowController`] ties them into a single-shot login, refresh or
//! sign-out flow. [`flow`] wraps the controller in one-call helpers.

pub mod browser;
pub mod controller;
pub mod endpoints;
pub mod flow;
pub mod redirect;
pub mod response;
pub mod transport;

pub use browser::TerminalBrowser;
pub use controller::{AuthFlowController, ResultReceiver};
pub use endpoints::Endpoints;
pub use transport::ReqwestTransport;
