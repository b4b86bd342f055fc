use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Claims carried by an access token.
///
/// `sub`, `name` and `email` default to empty strings when absent so that a
/// token missing its subject is reported as a bad subject rather than as a
/// parse failure. `exp` is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    #[serde(default)]
    pub sub: String,

    /// Display name of the user
    #[serde(default)]
    pub name: String,

    /// Email of the user
    #[serde(default)]
    pub email: String,

    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `name` - Display name
    /// * `email` - Email address
    /// * `ttl` - Time until the token expires
    ///
    /// # Errors
    /// * `InvalidLifetime` - `ttl` is not positive or overflows the clock
    pub fn for_user(
        user_id: impl ToString,
        name: impl Into<String>,
        email: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        Self::issued_at(user_id, name, email, ttl, Utc::now())
    }

    /// Same as [`Claims::for_user`] with an explicit issue instant.
    pub fn issued_at(
        user_id: impl ToString,
        name: impl Into<String>,
        email: impl Into<String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, JwtError> {
        if ttl <= Duration::zero() {
            return Err(JwtError::InvalidLifetime(format!(
                "must be positive, got {}s",
                ttl.num_seconds()
            )));
        }

        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            JwtError::InvalidLifetime(format!("{}s is out of range", ttl.num_seconds()))
        })?;

        Ok(Self {
            sub: user_id.to_string(),
            name: name.into(),
            email: email.into(),
            iat: Some(now.timestamp()),
            exp: expires_at.timestamp(),
        })
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// A token is only valid while `exp` is strictly in the future.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
