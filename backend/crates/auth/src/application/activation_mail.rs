//! Activation Mail Dispatch
//!
//! Shared by registration (first code) and the resend-on-expiry branch of
//! activation: generate a code, persist the token, then mail the code.
//! The token is always persisted before the mail referencing it is sent;
//! a dispatch failure leaves the token (and the user) in place.

use crate::application::config::AuthConfig;
use crate::domain::entity::{activation_token::ActivationToken, user::User};
use crate::domain::repository::{
    ActivationTokenRepository, EmailSender, MailMessage, MailTemplate,
};
use crate::domain::value_object::activation_code::ActivationCode;
use crate::error::{AuthError, AuthResult};

const ACTIVATION_SUBJECT: &str = "Account Activation";

/// Issue a fresh activation code for `user` and mail it
pub(crate) async fn dispatch_activation_code<T, M>(
    token_repo: &T,
    mailer: &M,
    config: &AuthConfig,
    user: &User,
) -> AuthResult<()>
where
    T: ActivationTokenRepository,
    M: EmailSender,
{
    let code = ActivationCode::generate(config.activation_code_length);

    let ttl = chrono::Duration::from_std(config.activation_code_ttl)
        .map_err(|e| AuthError::Internal(format!("Invalid activation code TTL: {e}")))?;

    let token = ActivationToken::new(user.user_id, code.clone(), ttl);
    token_repo.create(&token).await?;

    let mail = MailMessage {
        to: user.email.clone(),
        display_name: user.full_name(),
        template: MailTemplate::ActivateAccount,
        activation_url: config.activation_url.clone(),
        code,
        subject: ACTIVATION_SUBJECT.to_string(),
    };

    mailer.send(&mail).await?;

    tracing::info!(
        email = %user.email,
        expires_at = %token.expires_at,
        "Activation code dispatched"
    );

    Ok(())
}
