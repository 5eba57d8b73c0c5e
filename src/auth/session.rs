use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{LoginResponse, UserProfile};

/// Token, profile and expiry of the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    user: UserProfile,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserProfile, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            user,
            expires_at,
        }
    }

    /// Session for a fresh login. Expires after `ttl`, or earlier when the
    /// token itself carries an earlier `exp`.
    pub fn from_login(login: &LoginResponse, ttl: Duration, now: DateTime<Utc>) -> Self {
        let mut expires_at = now + ttl;
        if let Some(exp) = token_expiry(&login.token) {
            expires_at = expires_at.min(exp);
        }
        Self::new(login.token.clone(), login.profile(), expires_at)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn role(&self) -> &str {
        &self.user.role
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Read the `exp` claim of a JWT without checking its signature.
///
/// The signing key belongs to the remote API; the claim is only used to
/// shorten the local expiry. Opaque tokens yield `None`.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    DateTime::from_timestamp(data.claims.exp, 0)
}
