use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::AuthError;
use crate::user::errors::StoreError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserStore;

/// Upper bound on a single store call unless configured otherwise.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Domain service implementation for registration and login.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Holds no mutable state; email uniqueness is left to the store.
pub struct AuthService<S>
where
    S: UserStore,
{
    store: Arc<S>,
    authenticator: Arc<Authenticator>,
    store_timeout: Duration,
}

impl<S> AuthService<S>
where
    S: UserStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - User persistence implementation
    /// * `authenticator` - Password hashing and token signing, keyed at startup
    pub fn new(store: Arc<S>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Bound every store call by `timeout`.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Run a store call under the configured deadline. Failures are returned
    /// as they are; nothing is retried.
    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>> + Send,
    {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(StoreError::Timeout {
                    operation,
                    elapsed: self.store_timeout,
                })
            }
        }
    }
}

#[async_trait]
impl<S> AuthServicePort for AuthService<S>
where
    S: UserStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<UserProfile, AuthError> {
        // Fast path only. The store's unique constraint decides below.
        match self
            .bounded("find_by_email", self.store.find_by_email(&command.email))
            .await
        {
            Ok(Some(_)) => {
                tracing::info!("Registration rejected: email already registered");
                return Err(AuthError::EmailExists);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Email pre-check failed, relying on store constraint");
            }
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            location: command.location,
            bio: None,
            avatar_url: None,
            rating: 0.0,
            created_at: now,
            updated_at: now,
        };

        match self.bounded("create", self.store.create(user.clone())).await {
            Ok(()) => {}
            Err(StoreError::Duplicate) => {
                tracing::info!("Registration rejected by store: email already registered");
                return Err(AuthError::EmailExists);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create user");
                return Err(e.into());
            }
        }

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user.into_profile())
    }

    async fn login(&self, command: LoginCommand) -> Result<(String, UserProfile), AuthError> {
        let user = self
            .bounded("find_by_email", self.store.find_by_email(&command.email))
            .await?;

        let Some(user) = user else {
            // Pay the same hashing cost as a wrong password
            self.authenticator.verify_password(&command.password, "");
            tracing::info!("Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        let claims = self
            .authenticator
            .claims_for(user.id.0, user.name.as_str(), user.email.as_str())
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Failed to build token claims");
                AuthError::Jwt(e)
            })?;

        let result = self
            .authenticator
            .authenticate(&command.password, &user.password_hash, &claims)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::info!("Login rejected: invalid credentials");
                    AuthError::InvalidCredentials
                }
                AuthenticationError::JwtError(err) => {
                    tracing::error!(user_id = %user.id, error = %err, "Token generation failed");
                    AuthError::Jwt(err)
                }
            })?;

        tracing::info!(user_id = %user.id, expires_at = result.expires_at, "User logged in");

        Ok((result.access_token, user.into_profile()))
    }
}
