//! Authentication primitives
//!
//! Provides the credential and token machinery the auth service is built on:
//! - Password hashing (Argon2id) with fail-closed verification
//! - HS256 JWT issuance and validation pinned to the HMAC family
//! - Authentication coordination
//!
//! Nothing here performs I/O; every type is safe to share across tasks.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("my_password", "not-a-hash"));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let claims = Claims::for_user(
//!     "9b2d4c1e-6f0a-4c7e-8d55-3c0e9f1a2b3c",
//!     "Ann",
//!     "a@x.com",
//!     Duration::days(7),
//! )
//! .unwrap();
//! let token = handler.encode(&claims).unwrap();
//! let verified = handler.validate(&token).unwrap();
//! assert_eq!(verified.claims, claims);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use uuid::Uuid;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let user_id = Uuid::new_v4();
//! let claims = auth.claims_for(user_id, "Ann", "a@x.com").unwrap();
//! let result = auth.authenticate("password123", &hash, &claims).unwrap();
//!
//! // Validate token
//! let verified = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(verified.subject, user_id);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::DEFAULT_TOKEN_TTL_HOURS;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenError;
pub use jwt::VerifiedToken;
pub use password::PasswordError;
pub use password::PasswordHasher;
