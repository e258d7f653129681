use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::Claims;
use crate::token::TokenError;
use crate::token::TokenIssuer;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    // Hash of a throwaway password under the configured work factor.
    // Unknown principals are checked against it so they cost as much as a wrong password.
    decoy_hash: String,
}

const DECOY_PASSWORD: &str = "decoy-password-never-assigned";

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed identity token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `token_secret` - Secret key for token signing
    /// * `password_hasher` - Hasher configured with the desired work factor
    ///
    /// # Errors
    /// * `PasswordError` - The decoy hash could not be computed
    pub fn new(
        token_secret: &[u8],
        password_hasher: PasswordHasher,
    ) -> Result<Self, PasswordError> {
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            token_issuer: TokenIssuer::new(token_secret),
            decoy_hash,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Password rejected or hashing failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a token for `id` and `role`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        id: impl ToString,
        role: impl ToString,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_issuer.issue(id, role)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login attempt for a principal that does not exist.
    ///
    /// Runs one full verification against the decoy hash, so the attempt
    /// takes as long as a wrong password for a known principal.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.verify(password, &self.decoy_hash);
        AuthenticationError::InvalidCredentials
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `TokenError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_issuer.verify(token)
    }
}
