use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoplayConfig {
    pub seed: u64,
    /// Player actions (plays and discards) before the run is cut off.
    pub max_steps: u32,
    pub starting_money: i64,
    /// Joker ids owned for the whole run, in order.
    pub jokers: Vec<String>,
    /// Stop after clearing this ante; `None` runs to the configured max ante.
    pub target_ante: Option<u32>,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            max_steps: 500,
            starting_money: 4,
            jokers: Vec::new(),
            target_ante: None,
        }
    }
}
