//! Single-shot sign-in flow controller.
//!
//! Drives one [`Action`] against the configured authorization server:
//! login and sign-out point the [`Browser`] at provider pages and watch the
//! completed navigations for the redirect target; refresh POSTs the refresh
//! token to the token endpoint. A login whose redirect carries a refresh
//! token moves straight into the refresh path.
//!
//! The HTTP exchange is awaited in place, so the response is handled on the
//! task that owns the controller and no state is shared across threads.

use msalive_config::FlowConfig;
use msalive_types::{
    Action, AuthError, AuthResult, Browser, FlowOutcome, FlowState, HttpTransport, RefreshToken,
    traits::Result,
};
use tokio::sync::{mpsc, oneshot};

use crate::{endpoints::Endpoints, redirect, response};

/// Receives the flow's [`AuthResult`]. Resolves to an error if the flow
/// closes without producing one.
pub type ResultReceiver = oneshot::Receiver<AuthResult>;

const REFRESH_TOKEN_PARAM: &str = "refresh_token";
const ERROR_PARAM: &str = "error";

/// Drives one login, refresh or sign-out flow from `Idle` to `Closed`.
pub struct AuthFlowController<B, H> {
    endpoints: Endpoints,
    browser: B,
    http: H,
    action: Option<Action>,
    state: FlowState,
    refresh_token: RefreshToken,
    result_tx: Option<oneshot::Sender<AuthResult>>,
    outcome: Option<FlowOutcome>,
}

impl<B: Browser, H: HttpTransport> AuthFlowController<B, H> {
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if `config` cannot produce valid endpoints.
    pub fn new(config: &FlowConfig, browser: B, http: H) -> Result<Self> {
        Ok(Self {
            endpoints: Endpoints::new(config)?,
            browser,
            http,
            action: None,
            state: FlowState::Idle,
            refresh_token: RefreshToken::default(),
            result_tx: None,
            outcome: None,
        })
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    #[must_use]
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    #[must_use]
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// The refresh token in use: caller-supplied for [`Action::Refresh`],
    /// captured from the redirect for [`Action::Login`], empty otherwise.
    #[must_use]
    pub fn refresh_token(&self) -> &RefreshToken {
        &self.refresh_token
    }

    /// Why the flow closed, once it has.
    #[must_use]
    pub fn outcome(&self) -> Option<&FlowOutcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn into_outcome(self) -> FlowOutcome {
        self.outcome.unwrap_or(FlowOutcome::Abandoned)
    }

    /// Select the action and return the receiver its result is delivered on.
    ///
    /// May be called repeatedly before [`start`](Self::start); each call
    /// replaces the previous action and closes the previous receiver.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidState`] if the flow has already started.
    /// - [`AuthError::MissingRefreshToken`] for [`Action::Refresh`] without a
    ///   non-empty token.
    pub fn configure(
        &mut self,
        action: Action,
        refresh_token: Option<RefreshToken>,
    ) -> Result<ResultReceiver> {
        if self.state != FlowState::Idle {
            return Err(AuthError::InvalidState(format!(
                "cannot configure a flow in state {:?}",
                self.state
            )));
        }
        self.refresh_token = match action {
            Action::Refresh => refresh_token
                .filter(|t| !t.is_empty())
                .ok_or(AuthError::MissingRefreshToken)?,
            Action::Login | Action::SignOut => RefreshToken::default(),
        };
        let (tx, rx) = oneshot::channel();
        self.action = Some(action);
        self.result_tx = Some(tx);
        Ok(rx)
    }

    /// Begin the configured action.
    ///
    /// Collaborator failures (browser, HTTP, token endpoint) close the flow
    /// and are recorded in [`outcome`](Self::outcome) rather than returned.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidState`] if called before
    /// [`configure`](Self::configure) or more than once.
    pub async fn start(&mut self) -> Result<()> {
        let Some(action) = self.action else {
            return Err(AuthError::InvalidState(
                "start called before configure".into(),
            ));
        };
        if self.state != FlowState::Idle {
            return Err(AuthError::InvalidState(format!(
                "flow already started (state {:?})",
                self.state
            )));
        }
        tracing::info!(action = %action, "sign-in flow started");

        match action {
            Action::Login => {
                self.state = FlowState::AwaitingLogin;
                let url = self.endpoints.authorize_url();
                self.load(&url).await;
            }
            Action::SignOut => {
                self.state = FlowState::AwaitingSignOut;
                let url = self.endpoints.sign_out_url();
                self.load(&url).await;
            }
            Action::Refresh => {
                self.state = FlowState::AwaitingRefresh;
                self.refresh().await;
            }
        }
        Ok(())
    }

    /// Report a completed browser navigation.
    pub async fn on_navigation_finished(&mut self, url: &str) {
        match self.state {
            FlowState::AwaitingLogin => {
                if let Some(token) = self.capture_refresh_token(url) {
                    tracing::debug!("refresh token captured from login redirect");
                    self.refresh_token = token;
                    self.state = FlowState::AwaitingRefresh;
                    self.refresh().await;
                }
            }
            FlowState::AwaitingSignOut => {
                if self.endpoints.is_redirect(url) {
                    self.finish_sign_out(url);
                }
            }
            state => {
                tracing::debug!(
                    ?state,
                    url = redirect::strip_params(url),
                    "ignoring navigation"
                );
            }
        }
    }

    /// Feed navigation events into the flow until it closes.
    ///
    /// Starts the flow first if it is still idle. If `navigations` ends
    /// before the flow closes, the flow closes as [`FlowOutcome::Abandoned`].
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidState`] if the flow was never configured.
    pub async fn run(&mut self, mut navigations: mpsc::Receiver<String>) -> Result<()> {
        if self.state == FlowState::Idle {
            self.start().await?;
        }
        while !self.state.is_closed() {
            let Some(url) = navigations.recv().await else {
                tracing::warn!("navigation source closed before the flow finished");
                self.close(FlowOutcome::Abandoned);
                break;
            };
            self.on_navigation_finished(&url).await;
        }
        Ok(())
    }

    async fn load(&mut self, url: &str) {
        tracing::debug!(url = redirect::strip_params(url), "navigating");
        if let Err(e) = self.browser.navigate(url).await {
            tracing::error!(error = %e, "browser navigation failed");
            self.close(FlowOutcome::Failed(e));
        }
    }

    fn capture_refresh_token(&self, url: &str) -> Option<RefreshToken> {
        if !self.endpoints.is_redirect(url) {
            return None;
        }
        let Some(params) = redirect::fragment_params(url) else {
            tracing::debug!("login redirect without fragment");
            return None;
        };
        redirect::value_of(&params, REFRESH_TOKEN_PARAM)
            .filter(|t| !t.is_empty())
            .map(RefreshToken::from)
    }

    fn finish_sign_out(&mut self, url: &str) {
        let error = redirect::query_params(url)
            .and_then(|params| redirect::value_of(&params, ERROR_PARAM).map(str::to_string));
        match error {
            Some(error) => {
                tracing::warn!(error = %error, "error while signing out");
                self.close(FlowOutcome::SignOutRejected { error });
            }
            None => {
                tracing::info!("successfully signed out");
                self.close(FlowOutcome::SignedOut);
            }
        }
    }

    async fn refresh(&mut self) {
        let outcome = match self.exchange().await {
            Ok(result) => {
                tracing::info!(user_id = %result.user_id, "access token obtained");
                self.deliver(result);
                FlowOutcome::Authenticated
            }
            Err(e) if e.is_token_response_error() => {
                tracing::warn!(error = %e, "token endpoint rejected the refresh request");
                FlowOutcome::Failed(e)
            }
            Err(e) => {
                tracing::error!(error = %e, "token refresh failed");
                FlowOutcome::Failed(e)
            }
        };
        self.close(outcome);
    }

    async fn exchange(&self) -> Result<AuthResult> {
        let body = self.endpoints.refresh_body(&self.refresh_token)?;
        let bytes = self
            .http
            .post_form(&self.endpoints.token_url(), body)
            .await?;
        response::parse_token_response(&bytes)
    }

    fn deliver(&mut self, result: AuthResult) {
        if let Some(tx) = self.result_tx.take()
            && tx.send(result).is_err()
        {
            tracing::debug!("result receiver dropped before delivery");
        }
    }

    fn close(&mut self, outcome: FlowOutcome) {
        tracing::debug!(?outcome, "sign-in flow closed");
        self.state = FlowState::Closed;
        self.result_tx = None;
        self.outcome = Some(outcome);
    }
}
