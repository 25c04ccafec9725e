use serde::{Deserialize, Serialize};

pub use pokerun_core::{
    BossBlind, BossEffect, Content, EconomyRule, GameConfig, Joker, JokerEffect, JokerRarity,
};

/// Config plus catalogs, as loaded from one assets directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Assets {
    pub config: GameConfig,
    pub content: Content,
}

/// Catalog sizes, for logging after a load.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentSummary {
    pub jokers: usize,
    pub scaling_jokers: usize,
    pub bosses: usize,
}

impl ContentSummary {
    pub fn of(content: &Content) -> Self {
        Self {
            jokers: content.jokers.len(),
            scaling_jokers: content
                .jokers
                .iter()
                .filter(|joker| joker.effect.is_scaling())
                .count(),
            bosses: content.bosses.len(),
        }
    }
}
