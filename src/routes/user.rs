//! Users endpoints.

use axum::extract::State;

use music_clicker_model::{User, request::LoginRequest, response::LoginResponse};

use tracing::instrument;

use crate::{
    app::{AppError, AppGarde, AppJson, AppState, Payload},
    auth::AuthenticatedUser,
    earnings::now_ms,
};

/// Logs a user in, creating them if they don't exist.
#[instrument(skip(state))]
pub async fn login(
    State(state): State<AppState>,
    AppGarde(Payload(request)): AppGarde<Payload<LoginRequest>>,
) -> Result<AppJson<LoginResponse>, AppError> {
    state.store.ensure(&request.username, now_ms()).await?;

    Ok(AppJson(LoginResponse {
        ok: true,
        token: state.auth.issue(&request.username),
    }))
}

/// Returns the current user's full state, after crediting their earnings.
#[instrument(skip(state))]
pub async fn show(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<AppJson<User>, AppError> {
    let user = state
        .store
        .update(&auth.username, now_ms(), |user| user.clone())
        .await?;

    Ok(AppJson(user))
}
