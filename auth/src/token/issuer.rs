use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::Claims;
use super::errors::TokenError;

/// Issues and verifies identity tokens.
///
/// Uses HS256 (HMAC with SHA-256). The signing secret is supplied once at
/// construction and never leaves this type.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenIssuer {
    /// Create a new token issuer with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a token for `id` and `role`, valid for 24 hours from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, id: impl ToString, role: impl ToString) -> Result<String, TokenError> {
        self.issue_at(id, role, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        id: impl ToString,
        role: impl ToString,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(id, role, issued_at);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token against the current time and return its claims.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was not signed with this issuer's secret
    /// * `Expired` - Token expiry is in the past
    /// * `MissingClaim` / `MalformedClaims` - Required claims are absent or mistyped
    /// * `InvalidToken` - Token is otherwise malformed
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// Every claim is required. The first absent one, in the order `id`,
    /// `role`, `iat`, `exp`, is reported as `MissingClaim`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Presence and expiry are checked below against the caller-supplied clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data =
            decode::<RawClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::MissingRequiredClaim(claim) => {
                        TokenError::MissingClaim(claim.clone())
                    }
                    ErrorKind::Json(err) => TokenError::MalformedClaims(err.to_string()),
                    _ => TokenError::InvalidToken(e.to_string()),
                }
            })?;

        let claims = token_data.claims.into_claims()?;
        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Wire form of [`Claims`] where every field may be absent, so a missing
/// claim is told apart from a mistyped one.
#[derive(Debug, Deserialize)]
struct RawClaims {
    id: Option<String>,
    role: Option<String>,
    iat: Option<i64>,
    exp: Option<i64>,
}

impl RawClaims {
    fn into_claims(self) -> Result<Claims, TokenError> {
        Ok(Claims {
            id: self.id.ok_or_else(|| missing("id"))?,
            role: self.role.ok_or_else(|| missing("role"))?,
            iat: self.iat.ok_or_else(|| missing("iat"))?,
            exp: self.exp.ok_or_else(|| missing("exp"))?,
        })
    }
}

fn missing(claim: &str) -> TokenError {
    TokenError::MissingClaim(claim.to_string())
}
