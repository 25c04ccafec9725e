use crate::schema::{Assets, BossEffect, Content, GameConfig};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.json";
pub const JOKERS_FILE: &str = "jokers.json";
pub const BOSSES_FILE: &str = "bosses.json";

/// Reads `config.json` from `dir`. A missing file yields the defaults; missing
/// fields inside the file do too.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE);
    let config: GameConfig = if path.exists() {
        load_json(&path)?
    } else {
        GameConfig::default()
    };
    validate_config(&config).with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

pub fn load_content(dir: &Path) -> anyhow::Result<Content> {
    let jokers_path = dir.join(JOKERS_FILE);
    if !jokers_path.exists() {
        bail!("missing {}", jokers_path.display());
    }
    let bosses_path = dir.join(BOSSES_FILE);
    if !bosses_path.exists() {
        bail!("missing {}", bosses_path.display());
    }
    let content = Content {
        jokers: load_json(&jokers_path)?,
        bosses: load_json(&bosses_path)?,
    };
    validate_content(&content).with_context(|| format!("validate {}", dir.display()))?;
    Ok(content)
}

pub fn load_assets(dir: &Path) -> anyhow::Result<Assets> {
    Ok(Assets {
        config: load_game_config(dir)?,
        content: load_content(dir)?,
    })
}

pub fn validate_config(config: &GameConfig) -> anyhow::Result<()> {
    if config.ante_targets.is_empty() {
        bail!("ante_targets cannot be empty");
    }
    if config.ante_targets.iter().any(|target| *target <= 0) {
        bail!("ante_targets must be positive");
    }
    if config.hand_size == 0 {
        bail!("hand_size must be at least 1");
    }
    if config.hands_per_round == 0 {
        bail!("hands_per_round must be at least 1");
    }
    if !(0.0..=1.0).contains(&config.glass_break_chance) {
        bail!(
            "glass_break_chance must be within [0, 1], got {}",
            config.glass_break_chance
        );
    }
    if config.ante_growth < 1.0 {
        bail!("ante_growth must be at least 1, got {}", config.ante_growth);
    }
    Ok(())
}

pub fn validate_content(content: &Content) -> anyhow::Result<()> {
    let mut joker_ids = HashSet::new();
    for joker in &content.jokers {
        if joker.id.trim().is_empty() {
            bail!("joker id cannot be empty ({})", joker.name);
        }
        if !joker_ids.insert(joker.id.as_str()) {
            bail!("duplicate joker {}", joker.id);
        }
    }
    if content.bosses.is_empty() {
        bail!("boss catalog is empty");
    }
    let mut boss_ids = HashSet::new();
    for boss in &content.bosses {
        if !boss_ids.insert(boss.id.as_str()) {
            bail!("duplicate boss {}", boss.id);
        }
        if boss.score_multiplier <= 0.0 {
            bail!("boss {} has a non-positive score_multiplier", boss.id);
        }
        for effect in &boss.effects {
            if let BossEffect::FaceDownChance { chance } = effect {
                if !(0.0..=1.0).contains(chance) {
                    bail!("boss {} has face_down_chance {} outside [0, 1]", boss.id, chance);
                }
            }
        }
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
