//! # authgate-auth
//!
//! Session/token subsystem for AuthGate.
//!
//! ## Modules
//!
//! - `jwt`: HS256 token issuance and verification
//! - `password`: Argon2id password hashing
//! - `session`: register, login, logout, refresh and session resolution

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{JwtDecoder, JwtEncoder, SessionClaims, TokenDetails, TokenPair};
pub use password::PasswordHasher;
pub use session::SessionManager;
