//! Auth routes: password sign-up and sign-in, GitHub OAuth, sessions, tickets.

use axum::extract::{FromRef, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use records::User;
use serde::{Deserialize, Serialize};
use time::Duration;

use super::{ApiError, api_error};
use crate::rate_limit::RateLimitError;
use crate::services::credentials::{self, CredentialError};
use crate::services::session::{self, TicketKind};
use crate::services::auth as auth_svc;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";
const OAUTH_STATE_COOKIE_NAME: &str = "oauth_state";

/// Session token from the `session_token` cookie, else `Authorization: Bearer`.
pub(crate) fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(COOKIE_NAME).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_owned());
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

fn session_cookie(token: String, secure: bool, ttl_days: i64) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(ttl_days))
        .build()
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

pub(crate) fn credential_error_to_status(err: &CredentialError) -> StatusCode {
    match err {
        CredentialError::InvalidEmail | CredentialError::WeakPassword => StatusCode::BAD_REQUEST,
        CredentialError::EmailTaken => StatusCode::CONFLICT,
        CredentialError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CredentialError::Hash(_) | CredentialError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn credential_error(err: CredentialError) -> ApiError {
    api_error(credential_error_to_status(&err), &err)
}

fn db_error(err: sqlx::Error) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, &err)
}

fn rate_limited(err: RateLimitError) -> ApiError {
    tracing::warn!(error = %err, "password attempt rejected");
    api_error(StatusCode::TOO_MANY_REQUESTS, &err)
}

/// Limiter key for an email, normalized the way credentials are stored.
pub(crate) fn email_key(prefix: &str, email: &str) -> String {
    format!("{prefix}:{}", email.trim().to_ascii_lowercase())
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user resolved from the session token.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, &token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token })
    }
}

// =============================================================================
// PASSWORD AUTH
// =============================================================================

#[derive(Deserialize)]
pub struct CredentialsBody {
    pub email: String,
    pub password: String,
}

/// Returned by every sign-in path. The token is also set as a cookie; native
/// clients keep it and replay it as a cookie header.
#[derive(Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
}

async fn start_session(state: &AppState, user: User) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    let token = session::create_session(&state.pool, user.id, state.config.session_ttl_days)
        .await
        .map_err(db_error)?;
    let cookie = session_cookie(token.clone(), state.config.cookie_secure, state.config.session_ttl_days);
    Ok((CookieJar::new().add(cookie), Json(SessionResponse { user, token })))
}

/// `POST /api/auth/register`: create a password account and sign in.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>), ApiError> {
    state
        .auth_limiter
        .check_and_record(&email_key("register", &body.email))
        .map_err(rate_limited)?;
    let user = credentials::register(&state.pool, &body.email, &body.password)
        .await
        .map_err(credential_error)?;
    tracing::info!(user_id = %user.id, "account registered");
    let (jar, body) = start_session(&state, user).await?;
    Ok((StatusCode::CREATED, jar, body))
}

/// `POST /api/auth/login`: email and password sign-in.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    state
        .auth_limiter
        .check_and_record(&email_key("login", &body.email))
        .map_err(rate_limited)?;
    let user = credentials::login(&state.pool, &body.email, &body.password)
        .await
        .map_err(credential_error)?;
    start_session(&state, user).await
}

#[derive(Deserialize)]
pub struct ReauthBody {
    pub password: String,
}

/// `POST /api/auth/reauthenticate`: re-check the password and issue a
/// one-time ticket for a destructive action.
pub async fn reauthenticate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ReauthBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .auth_limiter
        .check_and_record(&format!("reauth:{}", auth.user.id))
        .map_err(rate_limited)?;
    credentials::recheck_password(&state.pool, auth.user.id, &body.password)
        .await
        .map_err(credential_error)?;
    let ticket = session::create_ticket(&state.pool, TicketKind::Reauth, auth.user.id)
        .await
        .map_err(db_error)?;
    Ok(Json(serde_json::json!({ "ticket": ticket })))
}

// =============================================================================
// GITHUB OAUTH
// =============================================================================

/// `GET /auth/github`: redirect to the GitHub authorization page.
pub async fn github_redirect(State(state): State<AppState>) -> Response {
    let Some(github) = &state.github else {
        return (StatusCode::SERVICE_UNAVAILABLE, "GitHub sign-in not configured").into_response();
    };

    let oauth_state = session::generate_token();
    let authorize_url = match github.authorize_url(&oauth_state) {
        Ok(url) => url,
        Err(e) => return api_error(StatusCode::INTERNAL_SERVER_ERROR, &e).into_response(),
    };
    let cookie = Cookie::build((OAUTH_STATE_COOKIE_NAME, oauth_state.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure)
        .max_age(Duration::minutes(10));

    let jar = CookieJar::new().add(cookie);
    (jar, axum::response::Redirect::temporary(&authorize_url)).into_response()
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: Option<String>,
}

/// `GET /auth/github/callback`: exchange the code, upsert the user, start a session.
pub async fn github_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let Some(github) = &state.github else {
        return (StatusCode::SERVICE_UNAVAILABLE, "GitHub sign-in not configured").into_response();
    };

    let Some(callback_state) = params.state.as_deref() else {
        return (StatusCode::BAD_REQUEST, "missing oauth state").into_response();
    };
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE_NAME)
        .map(Cookie::value)
        .unwrap_or_default();
    if expected_state.is_empty() || expected_state != callback_state {
        return (StatusCode::UNAUTHORIZED, "invalid oauth state").into_response();
    }

    let gh_user = match github.sign_in(&params.code).await {
        Ok(u) => u,
        Err(e) => {
            tracing::error!(error = %e, "github sign-in failed");
            return (StatusCode::BAD_GATEWAY, "GitHub sign-in failed").into_response();
        }
    };

    let user = match auth_svc::upsert_user(&state.pool, &gh_user).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, "user upsert failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user").into_response();
        }
    };
    tracing::info!(user_id = %user.id, github_login = %gh_user.login, "github sign-in");

    match start_session(&state, user).await {
        Ok((session_jar, body)) => {
            let session_jar = session_jar.add(expired_cookie(OAUTH_STATE_COOKIE_NAME, state.config.cookie_secure));
            (session_jar, body).into_response()
        }
        Err(err) => err.into_response(),
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// `GET /api/auth/me`: return the current user.
pub async fn me(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}

/// `POST /api/auth/logout`: delete the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::warn!(error = %e, user_id = %auth.user.id, "logout: session delete failed");
    }

    let jar = CookieJar::new().add(expired_cookie(COOKIE_NAME, state.config.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}

/// `POST /api/auth/ws-ticket`: create a one-time WS ticket.
pub async fn ws_ticket(State(state): State<AppState>, auth: AuthUser) -> Result<Json<serde_json::Value>, ApiError> {
    let ticket = session::create_ticket(&state.pool, TicketKind::Live, auth.user.id)
        .await
        .map_err(db_error)?;
    Ok(Json(serde_json::json!({ "ticket": ticket })))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
