//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use crate::application::{
    ActivateUseCase, AuthenticateInput, AuthenticateUseCase, RegisterInput,
    RegisterUseCase, config::AuthConfig,
};
use crate::domain::repository::{
    ActivationTokenRepository, EmailSender, RoleRepository, UserRepository,
};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ActivationQuery, AuthenticationRequest, AuthenticationResponse,
    RegistrationRequest,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, M>
where
    R: UserRepository
        + ActivationTokenRepository
        + RoleRepository
        + Clone
        + Send
        + Sync
        + 'static,
    M: EmailSender + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<RegistrationRequest>,
) -> AuthResult<StatusCode>
where
    R: UserRepository
        + ActivationTokenRepository
        + RoleRepository
        + Clone
        + Send
        + Sync
        + 'static,
    M: EmailSender + Clone + Send + Sync + 'static,
{
    if req.firstname.trim().is_empty() {
        return Err(AuthError::Validation("Firstname is mandatory".to_string()));
    }
    if req.lastname.trim().is_empty() {
        return Err(AuthError::Validation("Lastname is mandatory".to_string()));
    }

    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let input = RegisterInput {
        firstname: req.firstname,
        lastname: req.lastname,
        email: req.email,
        password: req.password,
    };

    use_case.execute(input).await?;

    Ok(StatusCode::ACCEPTED)
}

// ============================================================================
// Authenticate
// ============================================================================

/// POST /api/auth/authenticate
pub async fn authenticate<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<AuthenticationRequest>,
) -> AuthResult<Json<AuthenticationResponse>>
where
    R: UserRepository
        + ActivationTokenRepository
        + RoleRepository
        + Clone
        + Send
        + Sync
        + 'static,
    M: EmailSender + Clone + Send + Sync + 'static,
{
    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.config.clone());

    let input = AuthenticateInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(AuthenticationResponse {
        token: output.token,
    }))
}

// ============================================================================
// Activate
// ============================================================================

/// GET /api/auth/activate?code=...
pub async fn activate<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Query(query): Query<ActivationQuery>,
) -> AuthResult<StatusCode>
where
    R: UserRepository
        + ActivationTokenRepository
        + RoleRepository
        + Clone
        + Send
        + Sync
        + 'static,
    M: EmailSender + Clone + Send + Sync + 'static,
{
    let use_case = ActivateUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(&query.code).await?;

    Ok(StatusCode::OK)
}
