use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserProfile;
use crate::user::errors::AuthError;
use crate::user::errors::StoreError;

/// Port for the authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated name, email, password and optional location
    ///
    /// # Returns
    /// Profile of the created user (no password hash)
    ///
    /// # Errors
    /// * `EmailExists` - Email is already registered
    /// * `Password` - Password hashing failed
    /// * `Store` - Store operation failed or timed out
    async fn register(&self, command: RegisterCommand) -> Result<UserProfile, AuthError>;

    /// Check credentials and issue an access token.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password
    ///
    /// # Returns
    /// Signed access token and the user's profile
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Jwt` - Token generation failed
    /// * `Store` - Store operation failed or timed out
    async fn login(&self, command: LoginCommand) -> Result<(String, UserProfile), AuthError>;
}

/// Persistence capability the service needs from user storage.
///
/// Email uniqueness is enforced here, not by the service.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `Duplicate` - A user with this email already exists
    /// * `Database` - Storage operation failed
    async fn create(&self, user: User) -> Result<(), StoreError>;

    /// Retrieve a user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    /// * `CorruptRecord` - Stored row does not form a valid user
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, StoreError>;
}
