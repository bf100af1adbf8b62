//! Google sign-in via the authorization code flow.
//!
//! The consent redirect carries a signed `state` token, so the callback needs no
//! server-side session. Once Google hands back a code, it is exchanged for an
//! access token, the account email is read from the userinfo endpoint, and the
//! matching user is found or created.
use models::User;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::info;

use crate::{config::GoogleOAuth, error::AppError, repository::Collection, token::TokenPair};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPE: &str = "openid email profile";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfo {
    email: Option<String>,
}

pub fn authorization_url(
    google: &GoogleOAuth,
    redirect_uri: &str,
    state: &str,
) -> Result<Url, AppError> {
    Url::parse_with_params(
        AUTHORIZE_URL,
        [
            ("client_id", google.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", SCOPE),
            ("state", state),
        ],
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

/// Trades an authorization code for the account's email address.
pub async fn fetch_email(
    http: &Client,
    google: &GoogleOAuth,
    redirect_uri: &str,
    code: &str,
) -> Result<String, AppError> {
    let token: TokenResponse = http
        .post(TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", google.client_id.as_str()),
            ("client_secret", google.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::OAuth(format!("code exchange failed: {e}")))?
        .json()
        .await
        .map_err(|e| AppError::OAuth(format!("bad token response: {e}")))?;

    let info: UserInfo = http
        .get(USERINFO_URL)
        .bearer_auth(&token.access_token)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::OAuth(format!("userinfo request failed: {e}")))?
        .json()
        .await
        .map_err(|e| AppError::OAuth(format!("bad userinfo response: {e}")))?;

    info.email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::OAuth("account has no email".to_string()))
}

pub async fn find_or_create_user(users: &Collection<User>, email: &str) -> Result<User, AppError> {
    if let Some(user) = users
        .find_one_where(|u| u.email.as_deref() == Some(email))
        .await?
    {
        return Ok(user);
    }

    info!("Creating user for Google account {email}");
    let mut user = User::new(email);
    user.email = Some(email.to_string());

    Ok(users.insert(user).await?)
}

/// Where the browser lands after a successful sign-in.
pub fn callback_url(frontend_origin: &str, tokens: &TokenPair) -> Result<Url, AppError> {
    Url::parse_with_params(
        &format!("{}/oauth-callback", frontend_origin.trim_end_matches('/')),
        [
            ("token", tokens.access_token.as_str()),
            ("refreshToken", tokens.refresh_token.as_str()),
            ("userId", tokens.user_id.as_str()),
        ],
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use super::*;
    use crate::database::MemoryStore;

    fn google() -> GoogleOAuth {
        GoogleOAuth {
            client_id: "client-1".to_string(),
            client_secret: "shh".to_string(),
        }
    }

    #[test]
    fn authorization_url_has_flow_parameters() {
        let redirect_uri = "http://localhost:8080/login/oauth2/code/google";
        let url = authorization_url(&google(), redirect_uri, "st").unwrap();
        let query: HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(query["client_id"], "client-1");
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["scope"], "openid email profile");
        assert_eq!(query["state"], "st");
        assert_eq!(
            query["redirect_uri"],
            "http://localhost:8080/login/oauth2/code/google"
        );
        assert!(!query.contains_key("client_secret"));
    }

    #[test]
    fn callback_url_carries_tokens() {
        let tokens = TokenPair {
            user_id: "u1".to_string(),
            access_token: "a.b.c".to_string(),
            refresh_token: "d.e.f".to_string(),
        };

        let url = callback_url("http://localhost:3000/", &tokens).unwrap();

        assert_eq!(url.path(), "/oauth-callback");
        assert_eq!(
            url.query(),
            Some("token=a.b.c&refreshToken=d.e.f&userId=u1")
        );
    }

    #[tokio::test]
    async fn google_users_are_matched_by_email() {
        let users: Collection<User> = Collection::new(Arc::new(MemoryStore::default()));

        let created = find_or_create_user(&users, "ana@example.com").await.unwrap();
        let found = find_or_create_user(&users, "ana@example.com").await.unwrap();

        assert_eq!(created.id, found.id);
        assert_eq!(created.username, "ana@example.com");
        assert!(created.password.is_none());
        assert_eq!(users.find_all().await.unwrap().len(), 1);
    }
}
