//! Credential adapters: password hashing and bearer tokens.

mod jwt_tokens;
mod pbkdf2_hasher;

pub use jwt_tokens::{DEFAULT_TOKEN_TTL, JwtTokenService};
pub use pbkdf2_hasher::{DEFAULT_PBKDF2_ITERATIONS, Pbkdf2PasswordHasher};
