//! JWT token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use skirmish_core::config::AuthConfig;
use skirmish_core::error::AppError;
use skirmish_core::types::PlayerId;

use super::claims::Claims;

/// Signs access tokens for players.
///
/// The server only validates tokens; issuing is for the CLI and tests.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    access_ttl_minutes: i64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_minutes: i64::try_from(config.jwt_access_ttl_minutes).unwrap_or(i64::MAX),
        }
    }

    /// Issues an access token valid for the configured lifetime.
    pub fn issue(
        &self,
        player_id: PlayerId,
        username: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = Duration::try_minutes(self.access_ttl_minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::configuration("Access token lifetime is too large"))?;
        self.issue_with_expiry(player_id, username, now, exp)
            .map(|token| (token, exp))
    }

    /// Issues a token with explicit timestamps.
    pub fn issue_with_expiry(
        &self,
        player_id: PlayerId,
        username: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: player_id.into_uuid(),
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))
    }
}
