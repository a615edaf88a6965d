//! Registration Use Case
//!
//! Creates a disabled user account and dispatches its first activation
//! code by mail.

use std::sync::Arc;

use crate::application::activation_mail::dispatch_activation_code;
use crate::application::config::AuthConfig;
use crate::domain::entity::role::DEFAULT_ROLE;
use crate::domain::entity::user::User;
use crate::domain::repository::{
    ActivationTokenRepository, EmailSender, RoleRepository, UserRepository,
};
use crate::domain::value_object::{
    email::Email, user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Registration input
pub struct RegisterInput {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

/// Registration use case
pub struct RegisterUseCase<U, T, R, M>
where
    U: UserRepository,
    T: ActivationTokenRepository,
    R: RoleRepository,
    M: EmailSender,
{
    user_repo: Arc<U>,
    token_repo: Arc<T>,
    role_repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, T, R, M> RegisterUseCase<U, T, R, M>
where
    U: UserRepository,
    T: ActivationTokenRepository,
    R: RoleRepository,
    M: EmailSender,
{
    pub fn new(
        user_repo: Arc<U>,
        token_repo: Arc<T>,
        role_repo: Arc<R>,
        mailer: Arc<M>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            role_repo,
            mailer,
            config,
        }
    }

    /// Register a new account
    ///
    /// No body on success; the activation code travels only by mail.
    pub async fn execute(&self, input: RegisterInput) -> AuthResult<()> {
        // Missing canonical role is a process misconfiguration, not a
        // user error
        let role = self
            .role_repo
            .find_by_name(DEFAULT_ROLE)
            .await?
            .ok_or(AuthError::RoleNotInitialized)?;

        let email = Email::new(input.email)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.message().to_string()))?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(
            input.firstname,
            input.lastname,
            email,
            password_hash,
            role,
        );

        // A concurrent insert racing past the find_by_email check hits the
        // unique constraint and surfaces as DuplicateEmail in the adapter
        self.user_repo.create(&user).await?;

        tracing::info!(email = %user.email, "User registered (disabled)");

        // Persisted user and token survive a dispatch failure; the
        // inconsistency window is accepted and the error still surfaces
        dispatch_activation_code(
            self.token_repo.as_ref(),
            self.mailer.as_ref(),
            &self.config,
            &user,
        )
        .await?;

        Ok(())
    }
}
