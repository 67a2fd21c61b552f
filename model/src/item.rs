//! Collectible item model.

use derive_more::Display;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

/// The rarity tiers an item can be rolled at.
///
/// A rarity is the denominator of "1-in-N" drop odds, so a smaller value is a
/// rarer item.
pub const RARITY_TIERS: [u32; 5] = [10, 20, 50, 100, 200];

/// The genres offered when no other list is configured.
pub const DEFAULT_GENRES: [&str; 5] = ["Rock", "Pop", "Jazz", "HipHop", "Electronic"];

/// A single collectible.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Item {
    /// The unique ID of the item.
    pub id: Uuid,
    /// What kind of release this is.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// The genre of the item.
    ///
    /// Genres are free-form; anything bought in a pack carries whatever genre
    /// was asked for.
    pub genre: String,
    /// A display name, e.g. `Rock Single #4120`.
    pub name: String,
    /// The rarity tier, one of [`RARITY_TIERS`].
    pub rarity: u32,
}

/// The kind of an [`Item`].
#[derive(Clone, Copy, Debug, Display, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[display("Single")]
    Single,
    #[display("Album")]
    Album,
}

impl ItemKind {
    /// All item kinds.
    pub const ALL: [ItemKind; 2] = [ItemKind::Single, ItemKind::Album];
}
