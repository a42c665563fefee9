//! Refresh token and authentication result types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds before the real expiry at which a result is already treated as expired.
const EXPIRY_SKEW_SECS: u64 = 60;

/// An opaque, long-lived refresh token. Empty means "not yet obtained".
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("RefreshToken(<empty>)")
        } else {
            f.write_str("RefreshToken(<redacted>)")
        }
    }
}

impl From<String> for RefreshToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RefreshToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The outcome of a successful token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub access_token: String,
    pub user_id: String,
    /// Serialized as unix seconds.
    #[serde(with = "unix_secs")]
    pub expires_at: SystemTime,
}

impl AuthResult {
    /// Build a result expiring `expires_in_secs` seconds from now.
    pub fn new(
        access_token: impl Into<String>,
        user_id: impl Into<String>,
        expires_in_secs: u64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            user_id: user_id.into(),
            expires_at: SystemTime::now() + Duration::from_secs(expires_in_secs),
        }
    }

    /// Expiry as seconds since the unix epoch.
    #[must_use]
    pub fn expires_at_unix(&self) -> u64 {
        self.expires_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs()
    }

    /// Return `true` if the access token expires within 60 seconds.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        now + EXPIRY_SKEW_SECS >= self.expires_at_unix()
    }
}

mod unix_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S: Serializer>(at: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
        let secs = at
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        s.serialize_u64(secs)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SystemTime, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(UNIX_EPOCH + Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn test_refresh_token_debug_redacts() {
        let t = RefreshToken::new("M.R3_BAY.secret");
        let dbg = format!("{t:?}");
        assert!(!dbg.contains("secret"));
        assert_eq!(format!("{:?}", RefreshToken::default()), "RefreshToken(<empty>)");
    }

    #[test]
    fn test_refresh_token_empty() {
        assert!(RefreshToken::default().is_empty());
        assert!(!RefreshToken::from("x").is_empty());
    }

    #[test]
    fn test_auth_result_expiry() {
        let before = now_secs();
        let r = AuthResult::new("tok", "u1", 3600);
        let after = now_secs();
        assert!(r.expires_at_unix() >= before + 3600);
        assert!(r.expires_at_unix() <= after + 3600);
        assert!(!r.is_expired());
    }

    #[test]
    fn test_near_expiry_treated_as_expired() {
        let r = AuthResult::new("tok", "u1", 30); // 30s < 60s threshold
        assert!(r.is_expired());
    }

    #[test]
    fn test_serialize_expiry_as_unix_seconds() {
        let r = AuthResult {
            access_token: "tok".into(),
            user_id: "u1".into(),
            expires_at: UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["expires_at"], 1_700_000_000);
        assert_eq!(json["user_id"], "u1");
    }
}
