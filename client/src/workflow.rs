//! Multi-step flows that touch both the backend and local state.
//!
//! ERROR HANDLING
//! ==============
//! Remote writes come first; local state is only changed after the backend
//! accepted the write. A failure between the two leaves local state stale
//! but never ahead of the server: a kept draft is repaired by
//! [`reconcile_draft`] on the next start, and a signed-out session simply
//! fails its next request.

use records::{ExerciseDef, User, Workout, merge_catalog};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ClientError;
use crate::net::backend::Backend;
use crate::state::history::HistoryEvent;
use crate::state::session::Session;
use crate::state::stats_cache::{CachedHistory, StatsCache};
use crate::storage::{LocalStore, StorageError};

// =============================================================================
// IDENTITY
// =============================================================================

/// # Errors
///
/// Returns backend errors or a storage error if the session cannot be saved.
pub async fn register<S: LocalStore>(
    ctx: &mut AppContext<S>,
    backend: &dyn Backend,
    email: &str,
    password: &str,
) -> Result<User, ClientError> {
    let session = backend.register(email, password).await?;
    sign_in(ctx, session)
}

/// # Errors
///
/// Returns [`ClientError::Auth`] for rejected credentials.
pub async fn login<S: LocalStore>(
    ctx: &mut AppContext<S>,
    backend: &dyn Backend,
    email: &str,
    password: &str,
) -> Result<User, ClientError> {
    let session = backend.login(email, password).await?;
    sign_in(ctx, session)
}

/// Adopt a session obtained out of band (the GitHub callback returns one).
///
/// # Errors
///
/// Returns backend errors if the token is not accepted.
pub async fn adopt_token<S: LocalStore>(
    ctx: &mut AppContext<S>,
    backend: &dyn Backend,
    token: String,
) -> Result<User, ClientError> {
    let user = backend.me().await?;
    sign_in(ctx, Session { user, token })
}

fn sign_in<S: LocalStore>(ctx: &mut AppContext<S>, session: Session) -> Result<User, ClientError> {
    let user = session.user.clone();
    ctx.session.sign_in(&mut ctx.store, session)?;
    tracing::info!(user_id = %user.id, "signed in");
    Ok(user)
}

/// End the session remotely, then locally. The local session is dropped even
/// if the backend call fails.
///
/// # Errors
///
/// Returns a storage error if the local session cannot be removed.
pub async fn logout<S: LocalStore>(ctx: &mut AppContext<S>, backend: &dyn Backend) -> Result<(), ClientError> {
    if let Err(e) = backend.logout().await {
        tracing::warn!(error = %e, "remote logout failed");
    }
    ctx.session.sign_out(&mut ctx.store)?;
    Ok(())
}

// =============================================================================
// PROFILE
// =============================================================================

/// # Errors
///
/// Returns backend errors (for example a rejected name).
pub async fn update_name<S: LocalStore>(
    ctx: &mut AppContext<S>,
    backend: &dyn Backend,
    name: &str,
) -> Result<User, ClientError> {
    let user = backend.update_name(name).await?;
    ctx.session.update_user(&mut ctx.store, user.clone())?;
    Ok(user)
}

/// # Errors
///
/// Returns backend errors (size or type rejected).
pub async fn upload_picture<S: LocalStore>(
    ctx: &mut AppContext<S>,
    backend: &dyn Backend,
    bytes: Vec<u8>,
) -> Result<User, ClientError> {
    let user = backend.upload_picture(bytes).await?;
    ctx.session.update_user(&mut ctx.store, user.clone())?;
    Ok(user)
}

/// Reauthenticate, delete everything server side, then wipe local state.
/// A failed reauthentication returns [`ClientError::Auth`] and deletes
/// nothing.
///
/// # Errors
///
/// Returns [`ClientError::Auth`] on reauthentication failure, backend errors
/// from the deletion, or storage errors while clearing local state.
pub async fn delete_account<S: LocalStore>(
    ctx: &mut AppContext<S>,
    backend: &dyn Backend,
    password: &str,
) -> Result<(), ClientError> {
    let user_id = ctx.user_id()?;
    let ticket = match backend.reauthenticate(password).await {
        Ok(ticket) => ticket,
        Err(ClientError::Auth(msg)) => return Err(ClientError::Auth(msg)),
        Err(e) => return Err(ClientError::Auth(e.to_string())),
    };
    backend.delete_account(&ticket).await?;
    tracing::info!(%user_id, "account deleted");

    ctx.session.sign_out(&mut ctx.store)?;
    ctx.draft.clear(&mut ctx.store)?;
    StatsCache::invalidate(&mut ctx.store, user_id)?;
    ctx.history.apply_event(&mut ctx.store, HistoryEvent::Cleared)?;
    Ok(())
}

// =============================================================================
// WORKOUTS
// =============================================================================

/// Start a draft pre-populated from a stored template.
///
/// # Errors
///
/// Returns backend errors or a storage error.
pub async fn start_from_template<S: LocalStore>(
    ctx: &mut AppContext<S>,
    backend: &dyn Backend,
    template_id: Uuid,
    now: OffsetDateTime,
) -> Result<(), ClientError> {
    let template = backend.get_template(template_id).await?;
    ctx.draft.start_from_template(&mut ctx.store, &template, now)?;
    Ok(())
}

/// Built-in catalog merged with the user's custom exercises.
///
/// # Errors
///
/// Returns backend errors.
pub async fn exercise_catalog(backend: &dyn Backend) -> Result<Vec<ExerciseDef>, ClientError> {
    let custom = backend.list_exercises().await?;
    Ok(merge_catalog(&custom))
}

/// Save the active draft as a workout. The draft id doubles as the workout
/// id, so repeating this after a partial failure stores one document.
///
/// Order: create → clear draft → invalidate stats cache → record in history.
/// If the create fails the draft is kept.
///
/// # Errors
///
/// Returns [`ClientError::NoActiveWorkout`], backend errors, or storage
/// errors from the local follow-up steps.
pub async fn finish_workout<S: LocalStore>(
    ctx: &mut AppContext<S>,
    backend: &dyn Backend,
    now: OffsetDateTime,
) -> Result<Workout, ClientError> {
    if !ctx.draft.is_active() {
        return Err(ClientError::NoActiveWorkout);
    }
    ctx.draft.tick(&mut ctx.store, now)?;
    let request = ctx.draft.to_new_workout();
    let stored = backend.create_workout(&request).await?;
    tracing::info!(workout_id = %stored.id, duration = %stored.duration, "workout saved");

    ctx.draft.clear(&mut ctx.store)?;
    if let Ok(user_id) = ctx.user_id() {
        StatsCache::invalidate(&mut ctx.store, user_id)?;
    }
    ctx.history.apply_event(&mut ctx.store, HistoryEvent::Created(stored.clone()))?;
    Ok(stored)
}

/// Drop a persisted draft whose workout already reached the backend.
/// Returns `true` when the draft was discarded. Backend errors keep the
/// draft.
///
/// # Errors
///
/// Returns a storage error if the draft cannot be removed.
pub async fn reconcile_draft<S: LocalStore>(
    ctx: &mut AppContext<S>,
    backend: &dyn Backend,
) -> Result<bool, StorageError> {
    if !ctx.draft.is_active() {
        return Ok(false);
    }
    let draft_id = ctx.draft.draft().id;
    match backend.get_workout(draft_id).await {
        Ok(Some(_)) => {
            tracing::info!(%draft_id, "draft already saved; discarding");
            ctx.draft.clear(&mut ctx.store)?;
            Ok(true)
        }
        Ok(None) => Ok(false),
        Err(e) => {
            tracing::warn!(error = %e, %draft_id, "draft reconciliation skipped");
            Ok(false)
        }
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// History for the statistics view, served from the per-user cache when
/// fresh.
///
/// # Errors
///
/// Returns [`ClientError::NotSignedIn`] or backend errors on a cache miss.
pub async fn stats_history<S: LocalStore>(
    ctx: &mut AppContext<S>,
    backend: &dyn Backend,
    now: OffsetDateTime,
) -> Result<CachedHistory, ClientError> {
    let user_id = ctx.user_id()?;
    let cache = ctx.stats;
    cache.load_or_fetch(&mut ctx.store, user_id, backend, now).await
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
