//! Account Activation Use Case
//!
//! Consumes an emailed activation code: enables the account on success,
//! or regenerates and resends the code when it has expired.

use std::sync::Arc;

use crate::application::activation_mail::dispatch_activation_code;
use crate::application::config::AuthConfig;
use crate::domain::repository::{
    ActivationTokenRepository, EmailSender, UserRepository,
};
use crate::error::{AuthError, AuthResult};

/// Activation use case
pub struct ActivateUseCase<U, T, M>
where
    U: UserRepository,
    T: ActivationTokenRepository,
    M: EmailSender,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, T, M> ActivateUseCase<U, T, M>
where
    U: UserRepository,
    T: ActivationTokenRepository,
    M: EmailSender,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<T>,
        mailer: Arc<M>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, code: &str) -> AuthResult<()> {
        let mut token = self
            .token_repo
            .find_by_code(code)
            .await?
            .ok_or(AuthError::InvalidActivationCode)?;

        // A consumed code is rejected outright, never a silent
        // re-activation
        if token.is_consumed() {
            return Err(AuthError::InvalidActivationCode);
        }

        let mut user = self
            .user_repo
            .find_by_id(&token.user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Activation token owner missing".to_string()))?;

        if token.is_expired() {
            // Resend happens even though this call fails; the caller
            // retries with the new code once it arrives
            dispatch_activation_code(
                self.token_repo.as_ref(),
                self.mailer.as_ref(),
                &self.config,
                &user,
            )
            .await?;

            tracing::info!(email = %user.email, "Expired activation code, new code sent");

            return Err(AuthError::ActivationCodeExpired);
        }

        user.enable();
        self.user_repo.update(&user).await?;

        token.consume();
        self.token_repo.update(&token).await?;

        tracing::info!(email = %user.email, "Account activated");

        Ok(())
    }
}
