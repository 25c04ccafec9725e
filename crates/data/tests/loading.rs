use pokerun_core::{
    blind_score_goal, calculate_score, Blind, BossEffect, Card, JokerRarity, PokerHandType,
    ScoreContext, SequenceRng,
};
use pokerun_data::{
    builtin_assets, load_assets, load_content, load_game_config, validate_config,
    validate_content, ContentSummary, GameConfig,
};
use std::path::PathBuf;

fn assets_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
}

macro_rules! joker_score_case {
    ($name:ident, $id:expr, [$($card:expr),*], $expected:expr) => {
        #[test]
        fn $name() {
            let content = load_content(&assets_root()).expect("load content");
            let jokers = content.jokers_by_ids(&[$id]).expect("known joker");
            let played: Vec<Card> = [$($card),*]
                .iter()
                .map(|text| Card::parse(text).expect("valid card"))
                .collect();
            let ctx = ScoreContext {
                jokers: &jokers,
                ..ScoreContext::default()
            };
            assert_eq!(calculate_score(&played, &ctx).final_score, $expected);
        }
    };
}

macro_rules! boss_case {
    ($name:ident, $id:expr, $effect:pat) => {
        #[test]
        fn $name() {
            let content = load_content(&assets_root()).expect("load content");
            let boss = content.boss_by_id($id).expect("known boss");
            assert!(boss.effects.iter().any(|effect| matches!(effect, $effect)));
        }
    };
}

joker_score_case!(plain_joker_adds_four_mult, "joker", ["KS", "KH"], 30 * 6);
joker_score_case!(jolly_joker_on_pair, "jolly_joker", ["KS", "KH"], 30 * 10);
joker_score_case!(jolly_joker_ignores_high_card, "jolly_joker", ["KS", "2H"], 17);
joker_score_case!(the_duo_doubles_pair, "the_duo", ["KS", "KH"], 30 * 4);
joker_score_case!(scholar_on_aces, "scholar", ["AS", "AH"], (10 + 22 + 40) * 10);
joker_score_case!(half_joker_small_hand, "half_joker", ["AS"], 16 * 21);

boss_case!(hook_discards, "the_hook", BossEffect::DiscardRandomCards { count: 2 });
boss_case!(mouth_wants_pairs, "the_mouth", BossEffect::OnlyOneHandType { hand: PokerHandType::Pair });
boss_case!(ox_resets_money, "the_ox", BossEffect::ResetMoneyOnMostPlayed);
boss_case!(eye_zeroes_first_hand, "the_eye", BossEffect::FirstHandScoresZero);

#[test]
fn assets_directory_loads() {
    let assets = load_assets(&assets_root()).expect("load assets");
    assert_eq!(assets.config, GameConfig::default());
    let summary = ContentSummary::of(&assets.content);
    assert!(summary.jokers >= 30);
    assert_eq!(summary.scaling_jokers, 3);
    assert!(summary.bosses >= 16);
}

#[test]
fn builtin_copy_matches_assets_directory() {
    let on_disk = load_assets(&assets_root()).expect("load assets");
    let builtin = builtin_assets().expect("builtin assets");
    assert_eq!(on_disk, builtin);
}

#[test]
fn every_rarity_is_represented() {
    let content = load_content(&assets_root()).expect("load content");
    let mut rng = SequenceRng::constant(0.5);
    for rarity in [JokerRarity::Common, JokerRarity::Uncommon, JokerRarity::Rare] {
        assert!(content.pick_joker(rarity, &mut rng).is_some());
    }
}

#[test]
fn boss_goals_use_catalog_multipliers() {
    let config = load_game_config(&assets_root()).expect("load config");
    let content = load_content(&assets_root()).expect("load content");
    let wall = content.boss_by_id("the_wall").expect("the wall").clone();
    let hook = content.boss_by_id("the_hook").expect("the hook").clone();
    assert_eq!(blind_score_goal(&config, 1, &Blind::Boss(wall)), Ok(400));
    assert_eq!(blind_score_goal(&config, 1, &Blind::Boss(hook)), Ok(200));
}

#[test]
fn missing_directory_is_reported() {
    let err = load_content(&assets_root().join("does-not-exist")).unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let config = load_game_config(&assets_root().join("does-not-exist")).expect("defaults");
    assert_eq!(config, GameConfig::default());
}

#[test]
fn unknown_joker_ids_are_rejected() {
    let content = load_content(&assets_root()).expect("load content");
    assert!(content.jokers_by_ids(&["joker", "no_such_joker"]).is_err());
}

#[test]
fn duplicate_ids_fail_validation() {
    let mut content = load_content(&assets_root()).expect("load content");
    let copy = content.jokers[0].clone();
    content.jokers.push(copy);
    let err = validate_content(&content).unwrap_err();
    assert!(err.to_string().contains("duplicate joker"));
}

#[test]
fn empty_boss_catalog_fails_validation() {
    let mut content = load_content(&assets_root()).expect("load content");
    content.bosses.clear();
    assert!(validate_content(&content).is_err());
}

#[test]
fn bad_config_values_fail_validation() {
    let empty_antes = GameConfig {
        ante_targets: Vec::new(),
        ..GameConfig::default()
    };
    assert!(validate_config(&empty_antes).is_err());
    let sure_break = GameConfig {
        glass_break_chance: 1.5,
        ..GameConfig::default()
    };
    assert!(validate_config(&sure_break).is_err());
    assert!(validate_config(&GameConfig::default()).is_ok());
}
