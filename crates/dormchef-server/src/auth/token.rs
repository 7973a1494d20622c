// SPDX-License-Identifier: Apache-2.0

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Duration;
use dormchef_model::{Timestamp, UserId};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    BadSignature,
    Expired,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Malformed => "malformed session token",
            Self::BadSignature => "session token signature mismatch",
            Self::Expired => "session token expired",
        };
        f.write_str(text)
    }
}

impl std::error::Error for TokenError {}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Signs and checks stateless session tokens:
/// `base64url(claims) "." base64url(hmac_sha256(secret, claims))`.
#[derive(Clone)]
pub struct SessionKeys {
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    #[must_use]
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs).map_or(MAX_TTL_SECS, |s| s.min(MAX_TTL_SECS));
        Self {
            secret: secret.to_vec(),
            ttl: Duration::seconds(ttl),
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        match HmacSha256::new_from_slice(&self.secret) {
            Ok(mac) => mac,
            Err(_) => unreachable!("hmac key length is unrestricted"),
        }
    }

    #[must_use]
    pub fn issue(&self, user: &UserId, now: Timestamp) -> IssuedToken {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user.to_string(),
            exp: expires_at.timestamp(),
        };
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap_or_default());
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        IssuedToken {
            token: format!("{payload}.{signature}"),
            expires_at,
        }
    }

    pub fn verify(&self, token: &str, now: Timestamp) -> Result<UserId, TokenError> {
        let (payload, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let raw = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        UserId::parse(&claims.sub).map_err(|_| TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dormchef_model::now_utc;

    fn keys() -> SessionKeys {
        SessionKeys::new(b"unit-test-secret-0123456789", 3600)
    }

    #[test]
    fn issued_token_verifies_until_expiry() {
        let user = UserId::parse("u-1").expect("id");
        let now = now_utc();
        let issued = keys().issue(&user, now);
        assert_eq!(issued.expires_at, now + Duration::seconds(3600));
        assert_eq!(keys().verify(&issued.token, now), Ok(user));
        assert_eq!(
            keys().verify(&issued.token, now + Duration::seconds(3600)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn tampering_is_detected() {
        let user = UserId::parse("u-1").expect("id");
        let now = now_utc();
        let issued = keys().issue(&user, now);

        let other = SessionKeys::new(b"another-secret-0123456789", 3600);
        assert_eq!(other.verify(&issued.token, now), Err(TokenError::BadSignature));

        let (_, sig) = issued.token.split_once('.').expect("dot");
        let forged = URL_SAFE_NO_PAD.encode(br#"{"sub":"u-2","exp":99999999999}"#);
        assert_eq!(
            keys().verify(&format!("{forged}.{sig}"), now),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let now = now_utc();
        assert_eq!(keys().verify("no-dot", now), Err(TokenError::Malformed));
        assert_eq!(keys().verify("a.!!!", now), Err(TokenError::Malformed));
    }
}
