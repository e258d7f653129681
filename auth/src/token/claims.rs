use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Lifetime of every issued token.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Claims carried by an identity token.
///
/// `id` and `role` assert who the bearer is; `iat` and `exp` are Unix
/// timestamps bounding the assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Principal identifier
    pub id: String,

    /// Principal role
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims issued at `issued_at` that expire one token lifetime later.
    pub fn new(id: impl ToString, role: impl ToString, issued_at: DateTime<Utc>) -> Self {
        let expiration = issued_at + Duration::hours(TOKEN_LIFETIME_HOURS);

        Self {
            id: id.to_string(),
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
