//! Credential codec.
//!
//! Turns plaintext secrets into salted Argon2id verifiers (PHC string form)
//! and checks candidate secrets against stored verifiers. The cost
//! parameters travel inside each verifier, so changing [`CodecConfig`] only
//! affects newly hashed secrets.

use std::fmt;

use argon2::password_hash::{
    rand_core::OsRng, Error as PhcError, PasswordHash, PasswordHasher, PasswordVerifier as _,
    SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{CodecError, CodecResult};

/// Stored, one-way transform of a secret.
///
/// A different type from [`SecretString`]: a verifier can be
/// persisted and logged by length, a secret can do neither.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialVerifier(String);

impl CredentialVerifier {
    /// Wrap a verifier read back from storage. No validation happens here;
    /// a corrupt value surfaces as [`CodecError::MalformedVerifier`] on verify.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialVerifier({} bytes)", self.0.len())
    }
}

/// Argon2 cost parameters and input limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
    /// Longest secret accepted, in bytes.
    pub max_secret_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
            max_secret_bytes: 1024,
        }
    }
}

/// Hashes and verifies secrets.
#[derive(Clone)]
pub struct CredentialCodec {
    argon2: Argon2<'static>,
    config: CodecConfig,
}

impl CredentialCodec {
    /// Build a codec; rejects parameter combinations Argon2 cannot run with.
    pub fn new(config: CodecConfig) -> CodecResult<Self> {
        if config.max_secret_bytes == 0 {
            return Err(CodecError::InvalidParameters {
                reason: "max_secret_bytes must be positive".to_string(),
            });
        }
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| CodecError::InvalidParameters {
            reason: e.to_string(),
        })?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            config,
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Hash a secret with a fresh random salt.
    pub fn hash(&self, secret: &SecretString) -> CodecResult<CredentialVerifier> {
        let raw = secret.expose_secret();
        self.check_secret(raw)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| CodecError::Hashing {
                reason: e.to_string(),
            })?;

        Ok(CredentialVerifier(hash.to_string()))
    }

    /// Check `candidate` against a stored verifier.
    ///
    /// Returns `Ok(false)` on mismatch, including candidates the codec would
    /// refuse to hash (empty or oversized). Errors only when the verifier
    /// itself cannot be parsed or names an unsupported algorithm.
    pub fn verify(
        &self,
        verifier: &CredentialVerifier,
        candidate: &SecretString,
    ) -> CodecResult<bool> {
        let parsed =
            PasswordHash::new(verifier.as_str()).map_err(|e| CodecError::MalformedVerifier {
                reason: e.to_string(),
            })?;

        let raw = candidate.expose_secret();
        if self.check_secret(raw).is_err() {
            return Ok(false);
        }

        match self.argon2.verify_password(raw.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => Err(CodecError::MalformedVerifier {
                reason: e.to_string(),
            }),
        }
    }

    fn check_secret(&self, raw: &str) -> CodecResult<()> {
        if raw.is_empty() {
            return Err(CodecError::EmptySecret);
        }
        if raw.len() > self.config.max_secret_bytes {
            return Err(CodecError::SecretTooLong {
                len: raw.len(),
                max: self.config.max_secret_bytes,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCodec")
            .field("config", &self.config)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn codec() -> CredentialCodec {
        CredentialCodec::new(CodecConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
            max_secret_bytes: 512,
        })
        .expect("valid params")
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Any accepted secret verifies against its own verifier.
        #[test]
        fn prop_hash_verify_roundtrip(s in "\\PC{1,64}") {
            let codec = codec();
            let secret = SecretString::from(s);
            let verifier = codec.hash(&secret).unwrap();
            prop_assert!(codec.verify(&verifier, &secret).unwrap());
        }

        /// A different secret never verifies.
        #[test]
        fn prop_distinct_secret_rejected(a in "[a-zA-Z0-9]{1,32}", b in "[a-zA-Z0-9]{1,32}") {
            prop_assume!(a != b);
            let codec = codec();
            let verifier = codec.hash(&SecretString::from(a)).unwrap();
            prop_assert!(!codec.verify(&verifier, &SecretString::from(b)).unwrap());
        }
    }
}
