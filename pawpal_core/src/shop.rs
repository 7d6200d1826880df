//! Cosmetic shop.
//!
//! Coins earned from habits can be spent on skins and outfits for the pet.
//! A purchase never drives the balance below zero.

use crate::{Error, HabitStateEngine, MessageSink, PetProfile, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Kind of cosmetic item
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CosmeticKind {
    Skin,
    Outfit,
}

/// An item that can be bought with coins
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Cosmetic {
    pub id: String,
    pub name: String,
    pub kind: CosmeticKind,
    pub cost: u32,
    pub hint: String,
}

/// Cached default catalog - built once and reused
static DEFAULT_COSMETICS: Lazy<Vec<Cosmetic>> = Lazy::new(build_default_cosmetics);

/// Get a reference to the cached cosmetic catalog
pub fn get_default_cosmetics() -> &'static [Cosmetic] {
    &DEFAULT_COSMETICS
}

fn build_default_cosmetics() -> Vec<Cosmetic> {
    let item = |id: &str, name: &str, kind, cost, hint: &str| Cosmetic {
        id: id.into(),
        name: name.into(),
        kind,
        cost,
        hint: hint.into(),
    };

    vec![
        item("golden", "Golden", CosmeticKind::Skin, 50, "golden pet skin"),
        item("galaxy", "Galaxy", CosmeticKind::Skin, 100, "galaxy pet skin"),
        item("zombie", "Zombie", CosmeticKind::Skin, 150, "zombie pet skin"),
        item("bowtie", "Bowtie", CosmeticKind::Outfit, 20, "pet with bowtie"),
        item("top_hat", "Top Hat", CosmeticKind::Outfit, 30, "pet with top hat"),
        item(
            "superhero_cape",
            "Superhero Cape",
            CosmeticKind::Outfit,
            75,
            "pet with superhero cape",
        ),
    ]
}

/// Find a cosmetic by id or display name, ignoring case
pub fn find_cosmetic(key: &str) -> Option<&'static Cosmetic> {
    let key = key.trim();
    get_default_cosmetics()
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(key) || c.name.eq_ignore_ascii_case(key))
}

/// True when the balance covers the item, i.e. the buy action is enabled
pub fn can_afford(cosmetic: &Cosmetic, coins: u32) -> bool {
    coins >= cosmetic.cost
}

/// Receipt for a completed purchase
#[derive(Clone, Debug, PartialEq)]
pub struct Purchase {
    pub cosmetic: &'static Cosmetic,
    pub remaining_coins: u32,
}

/// Buy a cosmetic for the pet, debiting the engine's coin balance
pub fn purchase<S: MessageSink>(
    engine: &mut HabitStateEngine<S>,
    profile: &mut PetProfile,
    key: &str,
) -> Result<Purchase> {
    let cosmetic = find_cosmetic(key).ok_or_else(|| Error::UnknownCosmetic(key.to_string()))?;

    if profile.owns(&cosmetic.id) {
        return Err(Error::AlreadyOwned(cosmetic.name.clone()));
    }

    let remaining_coins = engine.debit(cosmetic.cost)?;
    profile.grant(&cosmetic.id);

    tracing::info!(
        "Bought {} for {} coins, {} left",
        cosmetic.name,
        cosmetic.cost,
        remaining_coins
    );

    Ok(Purchase {
        cosmetic,
        remaining_coins,
    })
}
