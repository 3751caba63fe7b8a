//! GitHub identity provider.
//!
//! LIFECYCLE
//! =========
//! 1. `authorize_url` sends the browser to GitHub with a CSRF `state`
//! 2. The callback `code` is exchanged for an access token
//! 3. The token fetches the GitHub profile
//! 4. `upsert_user` links the profile to a local user by `github_id`
//!
//! The provider is optional. Without all three `GITHUB_*` variables only
//! password accounts are available.

use records::User;
use reqwest::Url;
use serde::Deserialize;
use sqlx::PgPool;

use crate::services::session::{USER_COLUMNS, user_from_row};

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const PROFILE_URL: &str = "https://api.github.com/user";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("github token exchange failed: {0}")]
    TokenExchange(String),
    #[error("github api error: {0}")]
    GitHubApi(String),
    #[error("invalid authorize url: {0}")]
    Url(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub id: i64,
    pub login: String,
    pub avatar_url: Option<String>,
}

/// GitHub answers a bad code with 200 and an `error` field.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> Result<String, AuthError> {
        match (self.access_token, self.error) {
            (Some(token), None) if !token.is_empty() => Ok(token),
            (_, Some(error)) => {
                let detail = self.error_description.map(|d| format!("{error}: {d}")).unwrap_or(error);
                Err(AuthError::TokenExchange(detail))
            }
            _ => Err(AuthError::TokenExchange("response carried no access token".into())),
        }
    }
}

/// OAuth app credentials plus a shared HTTP client.
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    pub client_id: String,
    client_secret: String,
    pub redirect_uri: String,
    http: reqwest::Client,
}

impl GitHubProvider {
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self { client_id, client_secret, redirect_uri, http: reqwest::Client::new() }
    }

    /// Reads `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET` and
    /// `GITHUB_REDIRECT_URI`; `None` unless all are set and non-empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Some(Self::new(var("GITHUB_CLIENT_ID")?, var("GITHUB_CLIENT_SECRET")?, var("GITHUB_REDIRECT_URI")?))
    }

    /// Authorization page URL with every parameter form-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Url`] if the URL cannot be assembled.
    pub fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            [
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", "read:user"),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Url(e.to_string()))?;
        Ok(url.into())
    }

    /// Exchange the callback `code` and fetch the signed-in GitHub profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenExchange`] or [`AuthError::GitHubApi`].
    pub async fn sign_in(&self, code: &str) -> Result<GitHubUser, AuthError> {
        let token = self.exchange_code(code).await?;
        self.fetch_profile(&token).await
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let body = serde_json::json!({
            "client_id": self.client_id,
            "client_secret": self.client_secret,
            "code": code,
            "redirect_uri": self.redirect_uri,
        });
        let response: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;
        response.into_token()
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GitHubUser, AuthError> {
        self.http
            .get(PROFILE_URL)
            .bearer_auth(access_token)
            .header(reqwest::header::USER_AGENT, "liftbook")
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AuthError::GitHubApi(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::GitHubApi(e.to_string()))
    }
}

/// Link a GitHub profile to a local user, creating one on first sign-in.
///
/// An uploaded profile picture is never overwritten by the GitHub avatar.
/// The GitHub email is not copied: it may already belong to a password
/// account.
pub async fn upsert_user(pool: &PgPool, gh: &GitHubUser) -> Result<User, AuthError> {
    let sql = format!(
        "WITH u AS (
             INSERT INTO users (github_id, name, avatar_url)
             VALUES ($1, $2, $3)
             ON CONFLICT (github_id) DO UPDATE
                 SET avatar_url = COALESCE(users.avatar_url, EXCLUDED.avatar_url)
             RETURNING *
         )
         SELECT {USER_COLUMNS} FROM u"
    );
    let row = sqlx::query(&sql)
        .bind(gh.id)
        .bind(&gh.login)
        .bind(&gh.avatar_url)
        .fetch_one(pool)
        .await?;
    Ok(user_from_row(&row))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
