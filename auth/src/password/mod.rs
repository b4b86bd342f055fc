pub mod argon2;
pub mod errors;

pub use argon2::PasswordHasher;
pub use argon2::MAX_SECRET_BYTES;
pub use errors::PasswordError;
