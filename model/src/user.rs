//! User representations.

use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemKind};

/// A user's full game state.
///
/// This is both the persisted record and what `/state` returns.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The unique username of the user.
    pub username: String,
    /// The user's balance.
    ///
    /// Passive income accrues fractionally, so this is not an integer.
    pub money: f64,
    /// Every item the user has ever received.
    pub inventory: Inventory,
    /// Rarities of the items the user has equipped.
    pub equipped: Equipped,
    /// When earnings were last credited, in milliseconds since the epoch.
    pub last_update: i64,
}

impl User {
    /// Creates a fresh user with nothing to their name.
    pub fn new(username: impl Into<String>, now_ms: i64) -> User {
        User {
            username: username.into(),
            money: 0.0,
            inventory: Inventory::default(),
            equipped: Equipped::default(),
            last_update: now_ms,
        }
    }
}

/// Owned items, split by kind.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Inventory {
    pub singles: Vec<Item>,
    pub albums: Vec<Item>,
}

impl Inventory {
    /// The items of a kind.
    pub fn get(&self, kind: ItemKind) -> &Vec<Item> {
        match kind {
            ItemKind::Single => &self.singles,
            ItemKind::Album => &self.albums,
        }
    }

    /// The items of a kind, mutably.
    pub fn get_mut(&mut self, kind: ItemKind) -> &mut Vec<Item> {
        match kind {
            ItemKind::Single => &mut self.singles,
            ItemKind::Album => &mut self.albums,
        }
    }

    /// Adds an item to the list matching its kind.
    pub fn push(&mut self, item: Item) {
        self.get_mut(item.kind).push(item);
    }
}

/// Equipped loadout, split by kind.
///
/// Only the rarity of an equipped item is kept. Two items sharing a rarity
/// cannot be told apart once equipped.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Equipped {
    pub singles: Vec<u32>,
    pub albums: Vec<u32>,
}

impl Equipped {
    /// The equipped rarities of a kind.
    pub fn get(&self, kind: ItemKind) -> &Vec<u32> {
        match kind {
            ItemKind::Single => &self.singles,
            ItemKind::Album => &self.albums,
        }
    }

    /// The equipped rarities of a kind, mutably.
    pub fn get_mut(&mut self, kind: ItemKind) -> &mut Vec<u32> {
        match kind {
            ItemKind::Single => &mut self.singles,
            ItemKind::Album => &mut self.albums,
        }
    }

    /// Iterates over every equipped rarity.
    pub fn rarities(&self) -> impl Iterator<Item = u32> + '_ {
        self.singles.iter().chain(self.albums.iter()).copied()
    }
}
