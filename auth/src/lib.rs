//! Authentication utilities library
//!
//! Provides the credential and token primitives of the directory service:
//! - Password hashing (Argon2id, configurable work factor)
//! - Identity token issuance and verification (HS256, 24 hour lifetime)
//! - Authentication coordination
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
//! ```
//!
//! ## Identity Tokens
//! ```
//! use auth::TokenIssuer;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let token = issuer.issue("user123", "manager").unwrap();
//! let claims = issuer.verify(&token).unwrap();
//! assert_eq!(claims.role, "manager");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, PasswordHasher};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", PasswordHasher::new()).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth.authenticate("password123", &hash, "user123", "admin").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.id, "user123");
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::WorkFactor;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenIssuer;
