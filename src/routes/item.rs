//! Item routes.

use axum::extract::State;

use music_clicker_model::{Item, request::EquipRequest, user::Equipped};

use tracing::instrument;

use crate::{
    app::{AppError, AppJson, AppState, Payload},
    auth::AuthenticatedUser,
    earnings::now_ms,
    game,
};

/// Mints a random item for the current user.
#[instrument(skip(state))]
pub async fn click(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<AppJson<Item>, AppError> {
    let genres = &state.config.game.genres;

    let item = state
        .store
        .update(&auth.username, now_ms(), |user| {
            game::click(user, genres, &mut rand::rng())
        })
        .await?
        .ok_or_else(|| AppError::new("no genres configured"))?;

    tracing::debug!(id = %item.id, rarity = item.rarity, "minted item");

    Ok(AppJson(item))
}

/// Equips or unequips one of the current user's items.
///
/// Returns the resulting loadout.
#[instrument(skip(state))]
pub async fn equip(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Payload(request): Payload<EquipRequest>,
) -> Result<AppJson<Equipped>, AppError> {
    let max_equipped = state.config.game.max_equipped;

    let equipped = state
        .store
        .update(&auth.username, now_ms(), |user| {
            game::toggle_equip(user, request.kind, request.item_id, max_equipped);
            user.equipped.clone()
        })
        .await?;

    Ok(AppJson(equipped))
}
