//! Item generation.

use music_clicker_model::{
    Item, ItemKind,
    item::RARITY_TIERS,
};

use rand::{Rng, seq::IndexedRandom as _};

use uuid::Builder;

/// The exclusive upper bound of the number in an item's name.
pub const NAME_SUFFIX_BOUND: u32 = 10_000;

/// Generates a new item with thread-local entropy.
pub fn generate_item(kind: ItemKind, genre: &str) -> Item {
    generate_item_with(&mut rand::rng(), kind, genre)
}

/// Generates a new item with a provided random generator.
///
/// Every rarity tier is equally likely.
pub fn generate_item_with<R>(rng: &mut R, kind: ItemKind, genre: &str) -> Item
where
    R: Rng,
{
    let id = Builder::from_random_bytes(rng.random()).into_uuid();
    let rarity = *RARITY_TIERS.choose(rng).unwrap_or(&RARITY_TIERS[0]);
    let suffix = rng.random_range(0..NAME_SUFFIX_BOUND);

    Item {
        id,
        kind,
        genre: genre.to_owned(),
        name: format!("{} {} #{}", genre, kind, suffix),
        rarity,
    }
}

/// Flips a fair coin between a single and an album.
pub fn random_kind_with<R>(rng: &mut R) -> ItemKind
where
    R: Rng,
{
    if rng.random_bool(0.5) {
        ItemKind::Single
    } else {
        ItemKind::Album
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use rand::{SeedableRng as _, rngs::StdRng};

    #[test]
    fn test_generate_item() {
        let mut rng = StdRng::seed_from_u64(7);

        let item = generate_item_with(&mut rng, ItemKind::Single, "Rock");

        assert_eq!(item.kind, ItemKind::Single);
        assert_eq!(item.genre, "Rock");
        assert!(RARITY_TIERS.contains(&item.rarity));
        assert!(item.name.starts_with("Rock Single #"));

        let suffix = item.name["Rock Single #".len()..].parse::<u32>().unwrap();
        assert!(suffix < NAME_SUFFIX_BOUND);

        assert_eq!(item.id.get_version_num(), 4);
    }

    #[test]
    fn test_unique_ids() {
        let mut rng = StdRng::seed_from_u64(7);

        let a = generate_item_with(&mut rng, ItemKind::Album, "Jazz");
        let b = generate_item_with(&mut rng, ItemKind::Album, "Jazz");

        assert_ne!(a.id, b.id);
        assert!(a.name.starts_with("Jazz Album #"));
    }

    #[test]
    fn test_rarity_distribution_is_flat() {
        const DRAWS: usize = 10_000;

        let mut rng = StdRng::seed_from_u64(1337);
        let mut counts = HashMap::<u32, usize>::new();

        for _ in 0..DRAWS {
            let item = generate_item_with(&mut rng, ItemKind::Single, "Pop");
            *counts.entry(item.rarity).or_default() += 1;
        }

        assert_eq!(counts.len(), RARITY_TIERS.len());

        // 2000 expected per tier; allow a generous margin
        for tier in RARITY_TIERS {
            let count = counts[&tier];
            assert!((1_700..=2_300).contains(&count), "tier {tier}: {count}");
        }
    }

    #[test]
    fn test_random_kind_is_fair() {
        let mut rng = StdRng::seed_from_u64(42);

        let singles = (0..10_000)
            .filter(|_| random_kind_with(&mut rng) == ItemKind::Single)
            .count();

        assert!((4_500..=5_500).contains(&singles), "{singles} singles");
    }
}
