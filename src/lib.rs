//! Music clicker backend.
//!
//! Tracks each player's money, their collection of randomly minted singles and
//! albums, and the loadout that earns them money while they are away.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod earnings;
pub mod game;
pub mod item;
pub mod routes;
pub mod store;
