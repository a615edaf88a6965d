//! Authentication Use Case
//!
//! Verifies credentials and mints a signed session token. Success has no
//! observable side effect other than the returned token.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};
use crate::token::TokenCodec;

/// Authentication input
pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
}

/// Authentication output
pub struct AuthenticateOutput {
    /// Opaque signed session token
    pub token: String,
}

/// Authentication use case
pub struct AuthenticateUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    codec: TokenCodec,
    config: Arc<AuthConfig>,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        let codec = TokenCodec::new(config.token_secret);
        Self {
            user_repo,
            codec,
            config,
        }
    }

    pub async fn execute(&self, input: AuthenticateInput) -> AuthResult<AuthenticateOutput> {
        // Unknown email and wrong password collapse into the same error;
        // the caller cannot probe which addresses are registered
        let email = Email::new(input.email).map_err(|_| AuthError::BadCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::BadCredentials)?;

        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::BadCredentials);
        }

        if user.locked {
            return Err(AuthError::AccountLocked);
        }
        if !user.enabled {
            return Err(AuthError::AccountDisabled);
        }

        let mut claims = HashMap::new();
        claims.insert(
            "fullName".to_string(),
            serde_json::json!(user.full_name()),
        );

        let token = self
            .codec
            .issue(user.email.as_str(), claims, self.config.token_ttl);

        tracing::info!(email = %user.email, "User authenticated");

        Ok(AuthenticateOutput { token })
    }
}
