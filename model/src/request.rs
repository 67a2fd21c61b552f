//! Request bodies.

use garde::Validate;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::item::ItemKind;

/// Request to log in, creating the user if they don't exist.
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    /// The username to log in as.
    #[serde(default)]
    #[garde(length(min = 1))]
    pub username: String,
}

/// Request to equip or unequip an item.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipRequest {
    /// The kind of the item.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// The ID of the item in the user's inventory.
    pub item_id: Uuid,
}

/// Request to buy a pack.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BuyPackRequest {
    /// The genre of the pack.
    ///
    /// This is not checked against the offered genres.
    pub genre: String,
}
