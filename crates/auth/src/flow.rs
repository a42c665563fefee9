//! One-call entry points wrapping [`AuthFlowController`].

use msalive_config::FlowConfig;
use msalive_types::{
    Action, AuthResult, Browser, FlowOutcome, HttpTransport, RefreshToken, traits::Result,
};
use tokio::sync::mpsc;

use crate::AuthFlowController;

/// Everything a finished flow produced.
#[derive(Debug)]
pub struct FlowReport {
    pub outcome: FlowOutcome,
    /// Present only for [`FlowOutcome::Authenticated`].
    pub result: Option<AuthResult>,
    /// Captured (login) or supplied (refresh) refresh token; empty for sign-out.
    pub refresh_token: RefreshToken,
}

/// Run `action` to completion.
///
/// `navigations` carries the URLs of completed browser navigations; it is
/// not consulted for [`Action::Refresh`].
///
/// # Errors
///
/// Returns an error for an invalid config or a refresh without a token.
/// Failures during the flow are reported in [`FlowReport::outcome`].
pub async fn run<B: Browser, H: HttpTransport>(
    config: &FlowConfig,
    browser: B,
    http: H,
    action: Action,
    refresh_token: Option<RefreshToken>,
    navigations: mpsc::Receiver<String>,
) -> Result<FlowReport> {
    let mut controller = AuthFlowController::new(config, browser, http)?;
    let rx = controller.configure(action, refresh_token)?;
    controller.run(navigations).await?;

    // The sender is consumed or dropped once the flow closes.
    let result = rx.await.ok();
    let refresh_token = controller.refresh_token().clone();
    Ok(FlowReport {
        outcome: controller.into_outcome(),
        result,
        refresh_token,
    })
}

/// Interactive login: authorize in the browser, then exchange the captured refresh token.
///
/// # Errors
///
/// See [`run`].
pub async fn login<B: Browser, H: HttpTransport>(
    config: &FlowConfig,
    browser: B,
    http: H,
    navigations: mpsc::Receiver<String>,
) -> Result<FlowReport> {
    run(config, browser, http, Action::Login, None, navigations).await
}

/// Exchange `refresh_token` for a fresh access token. No browser involved.
///
/// # Errors
///
/// See [`run`].
pub async fn refresh<B: Browser, H: HttpTransport>(
    config: &FlowConfig,
    browser: B,
    http: H,
    refresh_token: RefreshToken,
) -> Result<FlowReport> {
    let (_tx, navigations) = mpsc::channel(1);
    run(
        config,
        browser,
        http,
        Action::Refresh,
        Some(refresh_token),
        navigations,
    )
    .await
}

/// Sign out of the provider session in the browser.
///
/// # Errors
///
/// See [`run`].
pub async fn sign_out<B: Browser, H: HttpTransport>(
    config: &FlowConfig,
    browser: B,
    http: H,
    navigations: mpsc::Receiver<String>,
) -> Result<FlowReport> {
    run(config, browser, http, Action::SignOut, None, navigations).await
}
