pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use errors::JwtError;
pub use errors::TokenError;
pub use handler::JwtHandler;
pub use handler::VerifiedToken;
