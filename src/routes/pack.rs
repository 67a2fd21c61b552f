//! Pack routes.

use axum::extract::State;

use music_clicker_model::{Item, request::BuyPackRequest};

use tracing::instrument;

use crate::{
    app::{AppError, AppJson, AppState, Payload},
    auth::AuthenticatedUser,
    earnings::now_ms,
    game,
};

/// Lists the genres packs are offered in.
pub async fn list(State(state): State<AppState>) -> AppJson<Vec<String>> {
    AppJson(state.config.game.genres.clone())
}

/// Buys a pack for the current user.
#[instrument(skip(state))]
pub async fn buy(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Payload(request): Payload<BuyPackRequest>,
) -> Result<AppJson<Vec<Item>>, AppError> {
    let items = state
        .store
        .update(&auth.username, now_ms(), |user| {
            game::buy_pack(user, &request.genre, &state.config.game, &mut rand::rng())
        })
        .await??;

    tracing::info!(genre = %request.genre, "pack bought");

    Ok(AppJson(items))
}
