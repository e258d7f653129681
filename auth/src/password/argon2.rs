use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Longest plaintext accepted by [`PasswordHasher::hash`], in bytes.
pub const MAX_PASSWORD_BYTES: usize = 256;

/// Tunable cost of one hash or verify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Password hashing implementation.
///
/// Argon2id with a random salt per call. The parameters used are embedded
/// in the PHC output, so hashes produced under an older work factor keep
/// verifying after the configuration changes.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    work_factor: WorkFactor,
}

impl PasswordHasher {
    /// Create a hasher with the argon2 default work factor.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            work_factor: WorkFactor::default(),
        }
    }

    /// Create a hasher with an explicit work factor.
    ///
    /// # Errors
    /// * `InvalidWorkFactor` - Parameters are outside argon2's accepted ranges
    pub fn with_work_factor(work_factor: WorkFactor) -> Result<Self, PasswordError> {
        let params = Params::new(
            work_factor.memory_kib,
            work_factor.iterations,
            work_factor.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidWorkFactor(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            work_factor,
        })
    }

    pub fn work_factor(&self) -> WorkFactor {
        self.work_factor
    }

    /// Hash a plaintext password securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `InvalidInput` - Password is empty or longer than `MAX_PASSWORD_BYTES`
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::InvalidInput(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// Fails closed: a stored hash that cannot be parsed never matches.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
