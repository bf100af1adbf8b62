//! # Tokens
//!
//! HS256 JWTs, signed with HMAC-SHA256 and encoded as unpadded URL-safe base64.
//!
//! - Access tokens: short lived, checked on every protected request
//! - Refresh tokens: long lived, separate secret, only accepted by `/api/auth/token`
//! - OAuth state: access secret, own issuer, ten minute lifetime
//!
//! `sub` is always the user id.
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::config::Config;

type HmacSha256 = Hmac<Sha256>;

pub const ISSUER: &str = "paf";
pub const STATE_ISSUER: &str = "paf:oauth-state";

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;
const MAX_TOKEN_LEN: usize = 4096;
pub const STATE_TTL_MINUTES: i64 = 10;
const REFRESH_ROTATION_DAYS: i64 = 7;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("signature mismatch")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("unexpected issuer")]
    WrongIssuer,

    #[error("signing key rejected")]
    Key,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn new(issuer: &str, subject: &str, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            iss: issuer.to_string(),
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::Key)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let payload = serde_json::to_vec(claims).map_err(|_| TokenError::Malformed)?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER),
            URL_SAFE_NO_PAD.encode(payload)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    pub fn verify(
        &self,
        token: &str,
        issuer: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::Malformed);
        }

        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let header = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| TokenError::Malformed)?;
        let header: serde_json::Value =
            serde_json::from_slice(&header).map_err(|_| TokenError::Malformed)?;
        if header.get("alg").and_then(serde_json::Value::as_str) != Some("HS256") {
            return Err(TokenError::Malformed);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.iss != issuer {
            return Err(TokenError::WrongIssuer);
        }
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
}

pub struct TokenIssuer {
    access: TokenSigner,
    refresh: TokenSigner,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            access: TokenSigner::new(&config.access_secret),
            refresh: TokenSigner::new(&config.refresh_secret),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<TokenPair, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            user_id: user_id.to_string(),
            access_token: self.mint_access(user_id, now)?,
            refresh_token: self
                .refresh
                .sign(&Claims::new(ISSUER, user_id, now, self.refresh_ttl))?,
        })
    }

    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        self.refresh_at(refresh_token, Utc::now())
    }

    /// New access token every time. The refresh token is only re-minted once
    /// it gets within a week of expiring.
    pub fn refresh_at(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, TokenError> {
        let claims = self.refresh.verify(refresh_token, ISSUER, now)?;

        let remaining = claims.exp - now.timestamp();
        let rotate = remaining < Duration::days(REFRESH_ROTATION_DAYS).num_seconds();
        let refresh_token = if rotate {
            self.refresh
                .sign(&Claims::new(ISSUER, &claims.sub, now, self.refresh_ttl))?
        } else {
            refresh_token.to_string()
        };

        Ok(TokenPair {
            access_token: self.mint_access(&claims.sub, now)?,
            user_id: claims.sub,
            refresh_token,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.access.verify(token, ISSUER, Utc::now())
    }

    pub fn sign_state(&self, nonce: &str) -> Result<String, TokenError> {
        self.access.sign(&Claims::new(
            STATE_ISSUER,
            nonce,
            Utc::now(),
            Duration::minutes(STATE_TTL_MINUTES),
        ))
    }

    pub fn verify_state(&self, state: &str) -> Result<Claims, TokenError> {
        self.access.verify(state, STATE_ISSUER, Utc::now())
    }

    fn mint_access(&self, user_id: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        self.access
            .sign(&Claims::new(ISSUER, user_id, now, self.access_ttl))
    }
}
