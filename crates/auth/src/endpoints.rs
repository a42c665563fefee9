//! Microsoft Account endpoint URLs and token request bodies.
//!
//! All parameter values are form-encoded once at construction, so the
//! builders below are pure string concatenation: the same config always
//! yields byte-identical URLs.

use msalive_config::FlowConfig;
use msalive_types::{AuthError, RefreshToken, traits::Result};

/// Grant type sent when exchanging a refresh token.
pub const REFRESH_GRANT_TYPE: &str = "refresh_token";

/// Implicit flow: the authorize endpoint returns tokens in the redirect fragment.
pub const RESPONSE_TYPE: &str = "token";

fn encode(pairs: &[(&str, &str)]) -> Result<String> {
    serde_urlencoded::to_string(pairs)
        .map_err(|e| AuthError::Config(format!("cannot encode request parameters: {e}")))
}

/// Pre-encoded endpoint set derived from a [`FlowConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    authorize_endpoint: String,
    token_endpoint: String,
    sign_out_endpoint: String,
    redirect_url: String,
    /// `redirect_uri=<enc>`
    redirect_param: String,
    /// `&client_id=<enc>`
    client_id_param: String,
    /// `&scope=<enc>`
    scope_param: String,
}

impl Endpoints {
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if the config is invalid.
    pub fn new(config: &FlowConfig) -> Result<Self> {
        config.validate()?;
        let redirect_url = format!("{}{}", config.base_url, config.redirect_endpoint);
        Ok(Self {
            redirect_param: encode(&[("redirect_uri", redirect_url.as_str())])?,
            client_id_param: format!("&{}", encode(&[("client_id", config.client_id.as_str())])?),
            scope_param: format!("&{}", encode(&[("scope", config.scope.as_str())])?),
            base_url: config.base_url.clone(),
            authorize_endpoint: config.authorize_endpoint.clone(),
            token_endpoint: config.token_endpoint.clone(),
            sign_out_endpoint: config.sign_out_endpoint.clone(),
            redirect_url,
        })
    }

    /// The canonical redirect URL, e.g. `https://login.live.com/oauth20_desktop.srf`.
    #[must_use]
    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    /// Whether a navigation landed on the redirect target (prefix match).
    #[must_use]
    pub fn is_redirect(&self, url: &str) -> bool {
        url.starts_with(&self.redirect_url)
    }

    /// Build the authorization URL for the implicit flow.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        format!(
            "{}{}?{}{}&response_type={RESPONSE_TYPE}{}",
            self.base_url,
            self.authorize_endpoint,
            self.redirect_param,
            self.client_id_param,
            self.scope_param,
        )
    }

    /// Build the sign-out URL.
    #[must_use]
    pub fn sign_out_url(&self) -> String {
        format!(
            "{}{}?{}{}",
            self.base_url, self.sign_out_endpoint, self.redirect_param, self.client_id_param,
        )
    }

    /// The token endpoint refresh requests are POSTed to.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}{}", self.base_url, self.token_endpoint)
    }

    /// Build the form body exchanging `refresh_token` for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingRefreshToken`] for an empty token.
    pub fn refresh_body(&self, refresh_token: &RefreshToken) -> Result<String> {
        if refresh_token.is_empty() {
            return Err(AuthError::MissingRefreshToken);
        }
        let grant = encode(&[
            ("grant_type", REFRESH_GRANT_TYPE),
            ("refresh_token", refresh_token.as_str()),
        ])?;
        Ok(format!(
            "{}{}&{grant}{}",
            self.redirect_param, self.client_id_param, self.scope_param
        ))
    }
}
