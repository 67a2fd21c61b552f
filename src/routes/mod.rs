//! API routes.

pub mod item;
pub mod pack;
pub mod user;

use axum::{
    Router,
    routing::{get, post},
};

use crate::app::AppState;

/// Builds the game API, mounted under `/api`.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::<AppState>::new()
        .route("/login", post(user::login))
        .route("/state", get(user::show))
        .route("/click", post(item::click))
        .route("/equip", post(item::equip))
        .route("/packs", get(pack::list))
        .route("/buyPack", post(pack::buy));

    Router::new().nest("/api", api_routes).with_state(state)
}
