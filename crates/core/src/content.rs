use crate::{BossBlind, ConfigError, Joker, JokerRarity, RandomSource};
use serde::{Deserialize, Serialize};

/// Joker and boss catalogs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub jokers: Vec<Joker>,
    #[serde(default)]
    pub bosses: Vec<BossBlind>,
}

impl Content {
    pub fn joker_by_id(&self, id: &str) -> Option<&Joker> {
        self.jokers.iter().find(|joker| joker.id == id)
    }

    pub fn boss_by_id(&self, id: &str) -> Option<&BossBlind> {
        self.bosses.iter().find(|boss| boss.id == id)
    }

    /// Resolves each id to a catalog joker, in order.
    pub fn jokers_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Joker>, ConfigError> {
        ids.iter()
            .map(|id| {
                self.joker_by_id(id.as_ref())
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownJoker(id.as_ref().to_string()))
            })
            .collect()
    }

    pub fn pick_boss(&self, rng: &mut dyn RandomSource) -> Result<&BossBlind, ConfigError> {
        if self.bosses.is_empty() {
            return Err(ConfigError::EmptyBossCatalog);
        }
        Ok(&self.bosses[rng.next_index(self.bosses.len())])
    }

    pub fn pick_joker(&self, rarity: JokerRarity, rng: &mut dyn RandomSource) -> Option<&Joker> {
        let pool: Vec<&Joker> = self
            .jokers
            .iter()
            .filter(|joker| joker.rarity == rarity)
            .collect();
        if pool.is_empty() {
            return None;
        }
        Some(pool[rng.next_index(pool.len())])
    }
}
