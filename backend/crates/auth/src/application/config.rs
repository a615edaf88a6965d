//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for HMAC token signing (32 bytes)
    pub token_secret: [u8; 32],
    /// Session token TTL
    pub token_ttl: Duration,
    /// Number of decimal digits in an activation code
    pub activation_code_length: usize,
    /// How long an activation code stays valid after issuance
    pub activation_code_ttl: Duration,
    /// Frontend URL embedded in activation mails
    pub activation_url: String,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            token_ttl: Duration::from_secs(12 * 3600), // 12 hours
            activation_code_length: 6,
            activation_code_ttl: Duration::from_secs(60),
            activation_url: "http://localhost:4200/activate-account".to_string(),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
