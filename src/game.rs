//! Game rules.
//!
//! Everything here mutates a [`User`] in place and knows nothing of how the
//! user was loaded or where they will be saved.

use derive_more::{Display, Error};

use music_clicker_model::{Item, ItemKind, User};

use rand::{Rng, seq::IndexedRandom as _};

use uuid::Uuid;

use crate::{
    config::GameConfig,
    item::{generate_item_with, random_kind_with},
};

/// The user cannot afford a purchase.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("not enough money")]
pub struct InsufficientFunds {
    /// What the user had.
    pub balance: f64,
    /// What the purchase costs.
    pub cost: f64,
}

/// Mints a single item of a random kind and genre into the user's inventory.
///
/// Returns `None` if there are no genres to pick from.
pub fn click<R>(user: &mut User, genres: &[String], rng: &mut R) -> Option<Item>
where
    R: Rng,
{
    let kind = random_kind_with(rng);
    let genre = genres.choose(rng)?;

    let item = generate_item_with(rng, kind, genre);
    user.inventory.push(item.clone());

    Some(item)
}

/// Equips or unequips an item.
///
/// If the item's rarity is already equipped, the first equipped entry with
/// that rarity is removed. Otherwise the rarity is equipped if there is room.
/// Items not in the user's inventory are ignored.
pub fn toggle_equip(user: &mut User, kind: ItemKind, item_id: Uuid, max_equipped: usize) {
    let Some(rarity) = user
        .inventory
        .get(kind)
        .iter()
        .find(|item| item.id == item_id)
        .map(|item| item.rarity)
    else {
        return;
    };

    let equipped = user.equipped.get_mut(kind);

    if let Some(ix) = equipped.iter().position(|&r| r == rarity) {
        equipped.remove(ix);
    } else if equipped.len() < max_equipped {
        equipped.push(rarity);
    }
}

/// Buys a pack of items of one genre.
///
/// The pack cost is deducted only if the user can afford it.
pub fn buy_pack<R>(
    user: &mut User,
    genre: &str,
    config: &GameConfig,
    rng: &mut R,
) -> Result<Vec<Item>, InsufficientFunds>
where
    R: Rng,
{
    if user.money < config.pack_cost {
        return Err(InsufficientFunds {
            balance: user.money,
            cost: config.pack_cost,
        });
    }

    user.money -= config.pack_cost;

    let items = (0..config.pack_size)
        .map(|_| {
            let kind = random_kind_with(rng);
            let item = generate_item_with(rng, kind, genre);
            user.inventory.push(item.clone());
            item
        })
        .collect();

    Ok(items)
}
