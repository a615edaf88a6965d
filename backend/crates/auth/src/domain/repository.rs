//! Repository Traits
//!
//! Ports this core consumes. Implementations live in the infrastructure
//! layer (PostgreSQL, outbound mail relay) and in test fakes.

use crate::domain::entity::{
    activation_token::ActivationToken, role::Role, user::User,
};
use crate::domain::value_object::{
    activation_code::ActivationCode, email::Email, user_id::UserId,
};
use crate::error::AuthResult;

/// Credential store trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;
}

/// Activation token ledger trait
#[trait_variant::make(ActivationTokenRepository: Send)]
pub trait LocalActivationTokenRepository {
    /// Persist a new token
    async fn create(&self, token: &ActivationToken) -> AuthResult<()>;

    /// Find a token by its code
    async fn find_by_code(&self, code: &str) -> AuthResult<Option<ActivationToken>>;

    /// Update a token (sets validated_at)
    async fn update(&self, token: &ActivationToken) -> AuthResult<()>;
}

/// Role store trait (read-only from this core)
#[trait_variant::make(RoleRepository: Send)]
pub trait LocalRoleRepository {
    /// Find a role by its canonical name
    async fn find_by_name(&self, name: &str) -> AuthResult<Option<Role>>;
}

/// Mail template selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MailTemplate {
    /// Account activation mail carrying the code and activation URL
    #[display("activate_account")]
    ActivateAccount,
}

/// Outbound mail payload
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub to: Email,
    pub display_name: String,
    pub template: MailTemplate,
    pub activation_url: String,
    pub code: ActivationCode,
    pub subject: String,
}

/// Outbound email port
///
/// Fire-and-forget from the core's perspective: once `send` returns Ok
/// the mail is considered dispatched.
#[trait_variant::make(EmailSender: Send)]
pub trait LocalEmailSender {
    async fn send(&self, mail: &MailMessage) -> AuthResult<()>;
}
