use msalive_types::{AuthError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `MSALIVE_FLOW__CLIENT_ID`.
pub const ENV_PREFIX: &str = "MSALIVE_";

fn default_base_url() -> String {
    "https://login.live.com/oauth20_".to_string()
}
fn default_redirect_endpoint() -> String {
    "desktop.srf".to_string()
}
fn default_authorize_endpoint() -> String {
    "authorize.srf".to_string()
}
fn default_token_endpoint() -> String {
    "token.srf".to_string()
}
fn default_sign_out_endpoint() -> String {
    "logout.srf".to_string()
}
fn default_client_id() -> String {
    "000000004C1D3F6C".to_string()
}
fn default_scope() -> String {
    "service::events.data.microsoft.com::MBI_SSL".to_string()
}

/// Authorization server endpoints and client registration.
///
/// Every endpoint is appended verbatim to `base_url`, so `base_url` carries
/// the shared path prefix (`oauth20_`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Redirect target recognized by prefix match after login and sign-out.
    #[serde(default = "default_redirect_endpoint")]
    pub redirect_endpoint: String,
    #[serde(default = "default_authorize_endpoint")]
    pub authorize_endpoint: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_sign_out_endpoint")]
    pub sign_out_endpoint: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    #[serde(default = "default_scope")]
    pub scope: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            redirect_endpoint: default_redirect_endpoint(),
            authorize_endpoint: default_authorize_endpoint(),
            token_endpoint: default_token_endpoint(),
            sign_out_endpoint: default_sign_out_endpoint(),
            client_id: default_client_id(),
            scope: default_scope(),
        }
    }
}

impl FlowConfig {
    /// Reject configurations that cannot produce usable URLs.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("base_url", &self.base_url),
            ("redirect_endpoint", &self.redirect_endpoint),
            ("authorize_endpoint", &self.authorize_endpoint),
            ("token_endpoint", &self.token_endpoint),
            ("sign_out_endpoint", &self.sign_out_endpoint),
            ("client_id", &self.client_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AuthError::Config(format!("flow.{name} must not be empty")));
            }
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AuthError::Config(format!(
                "flow.base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive (overridden by `RUST_LOG`).
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// HTTP client configuration for the token endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Overall request timeout; `None` keeps the client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration from a file path, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &Path) -> std::result::Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
    }

    /// Loads defaults, then the optional YAML file, then `MSALIVE_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file or an environment value cannot be parsed.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&Path>) -> std::result::Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Serialized, Yaml},
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const SAMPLE_YAML: &str = r#"
flow:
  base_url: "https://login.example.com/oauth20_"
  client_id: "client-123"
log:
  level: debug
http:
  timeout_secs: 15
"#;

    #[test]
    fn test_default_config() {
        let c = Config::default();
        assert_eq!(c.flow.base_url, "https://login.live.com/oauth20_");
        assert_eq!(c.flow.redirect_endpoint, "desktop.srf");
        assert_eq!(c.flow.client_id, "000000004C1D3F6C");
        assert_eq!(c.log.level, "info");
        assert!(c.http.timeout_secs.is_none());
        assert!(c.flow.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_overrides() {
        let c = Config::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(c.flow.base_url, "https://login.example.com/oauth20_");
        assert_eq!(c.flow.client_id, "client-123");
        assert_eq!(c.log.level, "debug");
        assert_eq!(c.http.timeout_secs, Some(15));
    }

    #[test]
    fn test_from_yaml_defaults_applied() {
        let c = Config::from_yaml("flow:\n  client_id: abc\n").unwrap();
        assert_eq!(c.flow.client_id, "abc");
        assert_eq!(c.flow.token_endpoint, "token.srf"); // default preserved
        assert_eq!(c.flow.scope, "service::events.data.microsoft.com::MBI_SSL");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_YAML.as_bytes()).unwrap();
        let c = Config::from_file(file.path()).unwrap();
        assert_eq!(c.flow.client_id, "client-123");
    }

    #[test]
    fn test_load_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("msalive.yaml", "flow:\n  client_id: from-file\n")?;
            jail.set_env("MSALIVE_FLOW__CLIENT_ID", "from-env");
            jail.set_env("MSALIVE_LOG__LEVEL", "trace");
            let c = Config::load(Some(Path::new("msalive.yaml")))?;
            assert_eq!(c.flow.client_id, "from-env");
            assert_eq!(c.log.level, "trace");
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_empty_client_id() {
        let flow = FlowConfig {
            client_id: "  ".into(),
            ..FlowConfig::default()
        };
        let err = flow.validate().unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_validate_rejects_non_http_base() {
        let flow = FlowConfig {
            base_url: "ftp://login.live.com/".into(),
            ..FlowConfig::default()
        };
        assert!(matches!(flow.validate(), Err(AuthError::Config(_))));
    }
}
