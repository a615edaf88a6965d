//! Session Token Codec
//!
//! Stateless signed tokens: `base64url(claims JSON).base64url(HMAC-SHA256)`.
//! Validity is entirely signature plus embedded expiry; nothing is stored
//! server-side and nothing can be revoked early.

use std::collections::HashMap;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Token rejection reasons
///
/// Internal granularity only; callers collapse all three into one
/// uniform invalid-token error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Token does not have the expected two-part structure or the
    /// payload is not valid claims JSON
    #[error("Malformed token")]
    Malformed,

    /// Signature does not match the payload
    #[error("Token signature mismatch")]
    Signature,

    /// Embedded expiry has passed
    #[error("Token has expired")]
    Expired,
}

/// Claim set carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
    /// Additional claims (e.g. "fullName")
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Signs and verifies compact claim sets with a server-held secret
#[derive(Clone)]
pub struct TokenCodec {
    secret: [u8; 32],
}

impl TokenCodec {
    pub fn new(secret: [u8; 32]) -> Self {
        Self { secret }
    }

    /// Issue a signed token for `subject` expiring after `ttl`
    pub fn issue(
        &self,
        subject: &str,
        extra: HashMap<String, serde_json::Value>,
        ttl: Duration,
    ) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            extra,
        };

        // Claims serialization cannot fail: string keys, Value payloads
        let payload = serde_json::to_vec(&claims).expect("claims serialize to JSON");
        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload);

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(payload_b64.as_bytes());
        let signature = mac.finalize().into_bytes();

        format!("{}.{}", payload_b64, URL_SAFE_NO_PAD.encode(signature))
    }

    /// Verify a token and return its claims
    ///
    /// Fails on structural decoding errors, signature mismatch (any bit
    /// flip in either part), or elapsed expiry. The signature is checked
    /// before the payload is parsed.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let (payload_b64, signature_b64) =
            token.split_once('.').ok_or(TokenError::Malformed)?;
        if signature_b64.contains('.') {
            return Err(TokenError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::Signature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if Utc::now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
