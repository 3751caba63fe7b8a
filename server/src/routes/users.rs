//! Profile and account routes for the signed-in user.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use records::{LiveEvent, User};
use serde::Deserialize;

use super::auth::{AuthUser, COOKIE_NAME};
use super::{ApiError, api_error};
use crate::services::account::{self, AccountError};
use crate::services::storage::StorageError;
use crate::state::AppState;

pub(crate) fn account_error_to_status(err: &AccountError) -> StatusCode {
    match err {
        AccountError::InvalidName => StatusCode::BAD_REQUEST,
        AccountError::ReauthRequired => StatusCode::FORBIDDEN,
        AccountError::NotFound => StatusCode::NOT_FOUND,
        AccountError::Storage(StorageError::Empty | StorageError::UnsupportedType) => StatusCode::BAD_REQUEST,
        AccountError::Storage(StorageError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        AccountError::Storage(StorageError::Io(_)) | AccountError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn account_error(err: AccountError) -> ApiError {
    api_error(account_error_to_status(&err), &err)
}

#[derive(Deserialize)]
pub struct UpdateProfileBody {
    pub name: String,
}

/// `PATCH /api/users/me`: change the display name.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<User>, ApiError> {
    let user = account::update_name(&state.pool, auth.user.id, &body.name)
        .await
        .map_err(account_error)?;
    Ok(Json(user))
}

/// `PUT /api/users/me/picture`: raw image bytes; replaces any previous picture.
pub async fn put_picture(State(state): State<AppState>, auth: AuthUser, body: Bytes) -> Result<Json<User>, ApiError> {
    let user = account::set_picture(
        &state.pool,
        state.pictures.as_ref(),
        &state.config.public_base_url,
        state.config.max_picture_bytes,
        auth.user.id,
        &body,
    )
    .await
    .map_err(account_error)?;
    Ok(Json(user))
}

#[derive(Deserialize)]
pub struct DeleteAccountBody {
    /// Ticket from `POST /api/auth/reauthenticate`.
    pub ticket: String,
}

/// `DELETE /api/users/me`: remove the account and every document it owns.
pub async fn delete_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<DeleteAccountBody>,
) -> Result<impl IntoResponse, ApiError> {
    account::delete_account(&state.pool, state.pictures.as_ref(), auth.user.id, &body.ticket)
        .await
        .map_err(account_error)?;

    state.live.publish(auth.user.id, &LiveEvent::AccountDeleted).await;

    let jar = CookieJar::new().remove(axum_extra::extract::cookie::Cookie::build(COOKIE_NAME).path("/"));
    Ok((jar, StatusCode::NO_CONTENT))
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
