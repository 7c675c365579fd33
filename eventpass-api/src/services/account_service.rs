//! Account Service
//!
//! Registration, login and profile lookup over a [`UserStore`].

use std::sync::Arc;

use eventpass_core::{
    check_length, limits, new_entity_id, CredentialCodec, CredentialVerifier, EntityId,
    ExposeSecret, NewUser, Registration, SecretString, ServiceError, ServiceResult, StoreError,
    UserProfile, ValidationError,
};
use eventpass_storage::UserStore;

/// Account operations.
///
/// Argon2 work runs on the blocking pool so a burst of logins cannot starve
/// the async workers.
pub struct AccountService {
    users: Arc<dyn UserStore>,
    codec: CredentialCodec,
    /// Verified against when the username is unknown, so both login failure
    /// paths pay for one Argon2 evaluation.
    decoy: CredentialVerifier,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, codec: CredentialCodec) -> ServiceResult<Self> {
        let decoy = codec.hash(&SecretString::from(new_entity_id()))?;
        Ok(Self {
            users,
            codec,
            decoy,
        })
    }

    /// Register a new account and return its id.
    ///
    /// Nothing is persisted unless the single insert succeeds; a username or
    /// email collision comes back as [`ServiceError::DuplicateIdentity`].
    pub async fn register(&self, registration: Registration) -> ServiceResult<EntityId> {
        let Registration {
            first_name,
            last_name,
            username,
            email,
            phone,
            secret,
        } = registration;

        let username = required("username", &username)?;
        let email = required("email", &email)?;
        check_length("first_name", &first_name, limits::FIRST_NAME)?;
        check_length("last_name", &last_name, limits::LAST_NAME)?;
        check_length("username", &username, limits::USERNAME)?;
        check_length("email", &email, limits::EMAIL)?;
        check_length("phone", &phone, limits::PHONE)?;
        self.check_secret(&secret)?;

        let user_id = new_entity_id();
        let password_verifier = self.hash_blocking(secret).await?;

        let new_user = NewUser {
            user_id,
            email,
            password_verifier,
            first_name,
            last_name,
            username,
            phone,
        };

        match self.users.create_user(&new_user).await {
            Ok(()) => {
                tracing::info!(user_id = %new_user.user_id, "User registered");
                Ok(new_user.user_id)
            }
            Err(StoreError::Conflict { field, .. }) => {
                tracing::info!(field = %field, "Registration rejected, identity taken");
                Err(ServiceError::DuplicateIdentity { field })
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create user");
                Err(ServiceError::internal("failed to create user"))
            }
        }
    }

    /// Check a username/secret pair and return the user id on success.
    ///
    /// An unknown username and a wrong secret are indistinguishable to the
    /// caller: both return [`ServiceError::AuthenticationFailed`].
    pub async fn login(&self, username: &str, secret: SecretString) -> ServiceResult<EntityId> {
        let username = username.trim();

        let (verifier, user_id) = match self.users.get_user_by_username(username).await {
            Ok(user) => (user.password_verifier, Some(user.user_id)),
            Err(StoreError::NotFound { .. }) => (self.decoy.clone(), None),
            Err(e) => {
                tracing::error!(error = %e, "Failed to look up user for login");
                return Err(ServiceError::internal("failed to look up user"));
            }
        };

        let matched = self.verify_blocking(verifier, secret).await?;
        match user_id {
            Some(user_id) if matched => {
                tracing::info!(user_id = %user_id, "Login succeeded");
                Ok(user_id)
            }
            _ => {
                tracing::warn!("Login failed");
                Err(ServiceError::AuthenticationFailed)
            }
        }
    }

    /// Fetch the public profile of a user.
    pub async fn get_profile(&self, user_id: &str) -> ServiceResult<UserProfile> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ValidationError::missing("user_id").into());
        }

        match self.users.get_user(user_id).await {
            Ok(user) => Ok(user.profile()),
            Err(StoreError::NotFound { .. }) => Err(ServiceError::UserNotFound {
                id: user_id.to_string(),
            }),
            Err(e) => {
                tracing::error!(error = %e, user_id = %user_id, "Failed to load user");
                Err(ServiceError::internal("failed to load user"))
            }
        }
    }

    fn check_secret(&self, secret: &SecretString) -> ServiceResult<()> {
        let len = secret.expose_secret().len();
        if len == 0 {
            return Err(ValidationError::missing("password").into());
        }
        let max = self.codec.config().max_secret_bytes;
        if len > max {
            return Err(
                ValidationError::invalid("password", format!("must be at most {} bytes", max))
                    .into(),
            );
        }
        Ok(())
    }

    async fn hash_blocking(&self, secret: SecretString) -> ServiceResult<CredentialVerifier> {
        let codec = self.codec.clone();
        let verifier = tokio::task::spawn_blocking(move || codec.hash(&secret))
            .await
            .map_err(|e| ServiceError::internal(format!("hashing task failed: {}", e)))?;
        verifier.map_err(|e| {
            tracing::error!(error = %e, "Failed to hash credential");
            ServiceError::InvalidCredential(e)
        })
    }

    async fn verify_blocking(
        &self,
        verifier: CredentialVerifier,
        candidate: SecretString,
    ) -> ServiceResult<bool> {
        let codec = self.codec.clone();
        let outcome = tokio::task::spawn_blocking(move || codec.verify(&verifier, &candidate))
            .await
            .map_err(|e| ServiceError::internal(format!("verification task failed: {}", e)))?;
        outcome.map_err(|e| {
            tracing::error!(error = %e, "Stored credential could not be verified");
            ServiceError::internal("stored credential is unreadable")
        })
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

/// Trim and require a non-blank value.
fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(value.to_string())
}

// =============================================================================
// TESTS
// =============================================================================
