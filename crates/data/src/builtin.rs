use crate::load::{validate_config, validate_content, BOSSES_FILE, CONFIG_FILE, JOKERS_FILE};
use crate::schema::{Assets, Content, GameConfig};
use anyhow::Context;

const BUILTIN_CONFIG: &str = include_str!("../../../assets/config.json");
const BUILTIN_JOKERS: &str = include_str!("../../../assets/jokers.json");
const BUILTIN_BOSSES: &str = include_str!("../../../assets/bosses.json");

/// The config compiled into the binary.
pub fn builtin_game_config() -> anyhow::Result<GameConfig> {
    let config: GameConfig = serde_json::from_str(BUILTIN_CONFIG)
        .with_context(|| format!("parse builtin {CONFIG_FILE}"))?;
    validate_config(&config).with_context(|| format!("validate builtin {CONFIG_FILE}"))?;
    Ok(config)
}

/// The joker and boss catalogs compiled into the binary.
pub fn builtin_content() -> anyhow::Result<Content> {
    let content = Content {
        jokers: serde_json::from_str(BUILTIN_JOKERS)
            .with_context(|| format!("parse builtin {JOKERS_FILE}"))?,
        bosses: serde_json::from_str(BUILTIN_BOSSES)
            .with_context(|| format!("parse builtin {BOSSES_FILE}"))?,
    };
    validate_content(&content).context("validate builtin content")?;
    Ok(content)
}

pub fn builtin_assets() -> anyhow::Result<Assets> {
    Ok(Assets {
        config: builtin_game_config()?,
        content: builtin_content()?,
    })
}
