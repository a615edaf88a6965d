//! Use-case tests against in-memory fakes
//!
//! Covers the register / authenticate / activate flows end to end without
//! a database or a mail relay.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::application::{
    ActivateUseCase, AuthenticateInput, AuthenticateUseCase, RegisterInput,
    RegisterUseCase, config::AuthConfig,
};
use crate::domain::entity::{
    activation_token::ActivationToken, role::Role, user::User,
};
use crate::domain::repository::{
    ActivationTokenRepository, EmailSender, MailMessage, RoleRepository,
    UserRepository,
};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};
use crate::token::TokenCodec;

// ============================================================================
// In-memory fakes
// ============================================================================

#[derive(Clone, Default)]
struct MemStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    tokens: Arc<Mutex<Vec<ActivationToken>>>,
    roles: Arc<Mutex<Vec<Role>>>,
}

impl MemStore {
    fn with_user_role() -> Self {
        let store = Self::default();
        store.roles.lock().unwrap().push(Role::new("USER"));
        store
    }

    fn user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned()
    }

    fn token_count(&self) -> usize {
        self.tokens.lock().unwrap().len()
    }

    fn latest_code(&self) -> String {
        self.tokens
            .lock()
            .unwrap()
            .last()
            .map(|t| t.code.as_str().to_string())
            .expect("at least one token persisted")
    }

    fn set_locked(&self, email: &str, locked: bool) {
        let mut users = self.users.lock().unwrap();
        let user = users
            .values_mut()
            .find(|u| u.email.as_str() == email)
            .expect("user exists");
        user.locked = locked;
    }

    fn expire_latest_token(&self) {
        let mut tokens = self.tokens.lock().unwrap();
        let token = tokens.last_mut().expect("at least one token persisted");
        token.expires_at = chrono::Utc::now() - chrono::Duration::seconds(1);
    }
}

impl UserRepository for MemStore {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.lock().unwrap();
        // Mirrors the unique constraint on users.email
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail);
        }
        users.insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(user_id.as_uuid()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.user_by_email(email.as_str()))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        self.users
            .lock()
            .unwrap()
            .insert(*user.user_id.as_uuid(), user.clone());
        Ok(())
    }
}

impl ActivationTokenRepository for MemStore {
    async fn create(&self, token: &ActivationToken) -> AuthResult<()> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> AuthResult<Option<ActivationToken>> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.code.as_str() == code)
            .last()
            .cloned())
    }

    async fn update(&self, token: &ActivationToken) -> AuthResult<()> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(stored) = tokens.iter_mut().find(|t| t.id == token.id) {
            *stored = token.clone();
        }
        Ok(())
    }
}

impl RoleRepository for MemStore {
    async fn find_by_name(&self, name: &str) -> AuthResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name)
            .cloned())
    }
}

#[derive(Clone, Default)]
struct MockMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
    fail: Arc<AtomicBool>,
}

impl MockMailer {
    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn last_mail(&self) -> MailMessage {
        self.sent
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one mail dispatched")
    }
}

impl EmailSender for MockMailer {
    async fn send(&self, mail: &MailMessage) -> AuthResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AuthError::EmailDelivery("relay down".to_string()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    store: MemStore,
    mailer: MockMailer,
    config: Arc<AuthConfig>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(AuthConfig::with_random_secret())
    }

    fn with_config(config: AuthConfig) -> Self {
        Self {
            store: MemStore::with_user_role(),
            mailer: MockMailer::default(),
            config: Arc::new(config),
        }
    }

    async fn register(&self, email: &str, password: &str) -> AuthResult<()> {
        let use_case = RegisterUseCase::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.mailer.clone()),
            self.config.clone(),
        );
        use_case
            .execute(RegisterInput {
                firstname: "Ana".to_string(),
                lastname: "Lee".to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    async fn activate(&self, code: &str) -> AuthResult<()> {
        let use_case = ActivateUseCase::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.mailer.clone()),
            self.config.clone(),
        );
        use_case.execute(code).await
    }

    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<String> {
        let use_case =
            AuthenticateUseCase::new(Arc::new(self.store.clone()), self.config.clone());
        use_case
            .execute(AuthenticateInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .map(|out| out.token)
    }
}

const PASSWORD: &str = "Str0ng!Pwd";

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_creates_disabled_user_and_mails_code() {
    let h = Harness::new();

    h.register("ana@x.com", PASSWORD).await.unwrap();

    let user = h.store.user_by_email("ana@x.com").unwrap();
    assert!(!user.enabled);
    assert!(!user.locked);
    assert_eq!(user.roles[0].name, "USER");

    assert_eq!(h.store.token_count(), 1);
    assert_eq!(h.mailer.sent_count(), 1);

    let mail = h.mailer.last_mail();
    assert_eq!(mail.to.as_str(), "ana@x.com");
    assert_eq!(mail.display_name, "Ana Lee");
    assert_eq!(mail.code.as_str().len(), 6);
    assert!(mail.code.as_str().chars().all(|c| c.is_ascii_digit()));
    assert_eq!(mail.code.as_str(), h.store.latest_code());
}

#[tokio::test]
async fn register_duplicate_email_rejected_first_user_unchanged() {
    let h = Harness::new();

    h.register("ana@x.com", PASSWORD).await.unwrap();
    let before = h.store.user_by_email("ana@x.com").unwrap();

    let err = h.register("ana@x.com", "0ther!Pwd9").await.unwrap_err();
    assert!(matches!(err, AuthError::DuplicateEmail));

    let after = h.store.user_by_email("ana@x.com").unwrap();
    assert_eq!(before.user_id, after.user_id);
    assert!(!after.enabled);
    // No extra token or mail for the rejected attempt
    assert_eq!(h.store.token_count(), 1);
    assert_eq!(h.mailer.sent_count(), 1);
}

#[tokio::test]
async fn register_fails_fatally_without_seeded_role() {
    let h = Harness {
        store: MemStore::default(), // no USER role
        mailer: MockMailer::default(),
        config: Arc::new(AuthConfig::with_random_secret()),
    };

    let err = h.register("ana@x.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::RoleNotInitialized));
}

#[tokio::test]
async fn register_rejects_weak_password() {
    let h = Harness::new();

    let err = h.register("ana@x.com", "weakpass").await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
    assert!(h.store.user_by_email("ana@x.com").is_none());
}

#[tokio::test]
async fn register_mail_failure_keeps_user_and_token() {
    let h = Harness::new();
    h.mailer.fail.store(true, Ordering::SeqCst);

    let err = h.register("ana@x.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::EmailDelivery(_)));

    // No rollback: the account and its token survive the dispatch failure
    assert!(h.store.user_by_email("ana@x.com").is_some());
    assert_eq!(h.store.token_count(), 1);
}

// ============================================================================
// Activation
// ============================================================================

#[tokio::test]
async fn activate_unknown_code_fails_without_state_change() {
    let h = Harness::new();
    h.register("ana@x.com", PASSWORD).await.unwrap();

    let err = h.activate("000000x").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidActivationCode));

    assert!(!h.store.user_by_email("ana@x.com").unwrap().enabled);
    assert_eq!(h.store.token_count(), 1);
    assert_eq!(h.mailer.sent_count(), 1);
}

#[tokio::test]
async fn activate_expired_code_resends_and_fails() {
    let h = Harness::new();
    h.register("ana@x.com", PASSWORD).await.unwrap();

    let expired_code = h.store.latest_code();
    h.store.expire_latest_token();

    let err = h.activate(&expired_code).await.unwrap_err();
    assert!(matches!(err, AuthError::ActivationCodeExpired));

    // Exactly one new token with a later expiry, exactly one extra mail
    assert_eq!(h.store.token_count(), 2);
    assert_eq!(h.mailer.sent_count(), 2);
    {
        let tokens = h.store.tokens.lock().unwrap();
        assert!(tokens[1].expires_at > tokens[0].expires_at);
        assert_eq!(tokens[1].user_id, tokens[0].user_id);
    }
    assert!(!h.store.user_by_email("ana@x.com").unwrap().enabled);

    // The freshly sent code works
    let new_code = h.store.latest_code();
    h.activate(&new_code).await.unwrap();
    assert!(h.store.user_by_email("ana@x.com").unwrap().enabled);
}

#[tokio::test]
async fn activate_valid_code_enables_user_and_is_single_use() {
    let h = Harness::new();
    h.register("ana@x.com", PASSWORD).await.unwrap();

    let code = h.store.latest_code();
    h.activate(&code).await.unwrap();

    let user = h.store.user_by_email("ana@x.com").unwrap();
    assert!(user.enabled);
    {
        let tokens = h.store.tokens.lock().unwrap();
        assert!(tokens[0].validated_at.is_some());
    }

    // Second submission of the consumed code must be rejected
    let err = h.activate(&code).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidActivationCode));
}

// ============================================================================
// Authentication
// ============================================================================

async fn registered_and_activated(h: &Harness, email: &str) {
    h.register(email, PASSWORD).await.unwrap();
    let code = h.store.latest_code();
    h.activate(&code).await.unwrap();
}

#[tokio::test]
async fn authenticate_returns_token_with_email_subject() {
    let h = Harness::new();
    registered_and_activated(&h, "ana@x.com").await;

    let token = h.authenticate("ana@x.com", PASSWORD).await.unwrap();

    let codec = TokenCodec::new(h.config.token_secret);
    let claims = codec.verify(&token).unwrap();
    assert_eq!(claims.sub, "ana@x.com");
    assert_eq!(claims.extra["fullName"], serde_json::json!("Ana Lee"));
}

#[tokio::test]
async fn authenticate_unknown_email_and_wrong_password_are_uniform() {
    let h = Harness::new();
    registered_and_activated(&h, "ana@x.com").await;

    let missing = h.authenticate("bob@x.com", PASSWORD).await.unwrap_err();
    let wrong = h.authenticate("ana@x.com", "Wr0ng!Pwd!").await.unwrap_err();

    assert!(matches!(missing, AuthError::BadCredentials));
    assert!(matches!(wrong, AuthError::BadCredentials));
    // Identical externally visible message either way
    assert_eq!(missing.to_string(), wrong.to_string());
}

#[tokio::test]
async fn authenticate_disabled_account_is_distinct_from_bad_credentials() {
    let h = Harness::new();
    h.register("ana@x.com", PASSWORD).await.unwrap();

    // Correct password, never activated
    let err = h.authenticate("ana@x.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountDisabled));
}

#[tokio::test]
async fn authenticate_locked_account_rejected() {
    let h = Harness::new();
    registered_and_activated(&h, "ana@x.com").await;
    h.store.set_locked("ana@x.com", true);

    let err = h.authenticate("ana@x.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::AccountLocked));
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn register_activate_authenticate_scenario() {
    let h = Harness::new();

    h.register("ana@x.com", PASSWORD).await.unwrap();
    let user = h.store.user_by_email("ana@x.com").unwrap();
    assert!(!user.enabled);

    let mail = h.mailer.last_mail();
    assert_eq!(mail.code.as_str().len(), 6);

    h.activate(mail.code.as_str()).await.unwrap();
    assert!(h.store.user_by_email("ana@x.com").unwrap().enabled);

    let token = h.authenticate("ana@x.com", PASSWORD).await.unwrap();
    let claims = TokenCodec::new(h.config.token_secret)
        .verify(&token)
        .unwrap();
    assert_eq!(claims.sub, "ana@x.com");
}
