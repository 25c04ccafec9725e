use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EconomyRule {
    pub reward_small: i64,
    pub reward_big: i64,
    pub per_hand_reward: i64,
    pub interest_step: i64,
    pub interest_per: i64,
    pub interest_cap: i64,
}

impl Default for EconomyRule {
    fn default() -> Self {
        Self {
            reward_small: 3,
            reward_big: 4,
            per_hand_reward: 1,
            interest_step: 5,
            interest_per: 1,
            interest_cap: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub hand_size: usize,
    pub hands_per_round: u32,
    pub discards_per_round: u32,
    /// Base score goal per ante, ante 1 first.
    pub ante_targets: Vec<i64>,
    /// Growth applied per ante past the end of `ante_targets`.
    pub ante_growth: f64,
    pub max_ante: u32,
    pub small_blind_mult: f64,
    pub big_blind_mult: f64,
    pub glass_break_chance: f64,
    pub gold_seal_money: i64,
    pub economy: EconomyRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_size: 8,
            hands_per_round: 4,
            discards_per_round: 3,
            ante_targets: vec![100, 300, 800, 2_000, 5_000, 11_000, 20_000, 35_000, 50_000],
            ante_growth: 1.5,
            max_ante: 8,
            small_blind_mult: 1.0,
            big_blind_mult: 1.5,
            glass_break_chance: 0.25,
            gold_seal_money: 3,
            economy: EconomyRule::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("ante must start at 1, got {0}")]
    InvalidAnte(u32),
    #[error("ante target table is empty")]
    EmptyAnteTable,
    #[error("boss catalog is empty")]
    EmptyBossCatalog,
    #[error("unknown joker id {0:?}")]
    UnknownJoker(String),
}

impl GameConfig {
    /// Base target for `ante`; past the table each ante grows by `ante_growth`.
    pub fn ante_base(&self, ante: u32) -> Result<i64, ConfigError> {
        if ante == 0 {
            return Err(ConfigError::InvalidAnte(ante));
        }
        let last = *self.ante_targets.last().ok_or(ConfigError::EmptyAnteTable)?;
        let idx = (ante - 1) as usize;
        if let Some(target) = self.ante_targets.get(idx) {
            return Ok(*target);
        }
        let extra = (idx + 1 - self.ante_targets.len()) as i32;
        Ok((last as f64 * self.ante_growth.powi(extra)).floor() as i64)
    }
}
