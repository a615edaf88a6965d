//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

// ============================================================================
// Register
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

// ============================================================================
// Authenticate
// ============================================================================

/// Authentication request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationRequest {
    pub email: String,
    pub password: String,
}

/// Authentication response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    /// Opaque signed session token
    pub token: String,
}

// ============================================================================
// Activate
// ============================================================================

/// Activation query parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationQuery {
    pub code: String,
}
