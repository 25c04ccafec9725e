use crate::{round_end_penalty, BossBlind, ConfigError, GameConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BlindKind {
    Small,
    Big,
    Boss,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Blind {
    Small,
    Big,
    Boss(BossBlind),
}

impl Blind {
    pub fn kind(&self) -> BlindKind {
        match self {
            Blind::Small => BlindKind::Small,
            Blind::Big => BlindKind::Big,
            Blind::Boss(_) => BlindKind::Boss,
        }
    }

    pub fn boss(&self) -> Option<&BossBlind> {
        match self {
            Blind::Boss(boss) => Some(boss),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Blind::Small => "Small Blind",
            Blind::Big => "Big Blind",
            Blind::Boss(boss) => &boss.name,
        }
    }

    pub fn score_multiplier(&self, config: &GameConfig) -> f64 {
        match self {
            Blind::Small => config.small_blind_mult,
            Blind::Big => config.big_blind_mult,
            Blind::Boss(boss) => boss.score_multiplier,
        }
    }
}

pub fn blind_score_goal(config: &GameConfig, ante: u32, blind: &Blind) -> Result<i64, ConfigError> {
    let base = config.ante_base(ante)?;
    Ok((base as f64 * blind.score_multiplier(config)).floor() as i64)
}

/// Small -> Big -> Boss -> next ante's Small.
pub fn next_blind(ante: u32, kind: BlindKind) -> (u32, BlindKind) {
    match kind {
        BlindKind::Small => (ante, BlindKind::Big),
        BlindKind::Big => (ante, BlindKind::Boss),
        BlindKind::Boss => (ante.saturating_add(1), BlindKind::Small),
    }
}

/// Cash paid for clearing `blind`: base reward, per-hand bonus and interest on
/// `money`, less any boss round-end penalty. Never negative.
pub fn round_reward(config: &GameConfig, blind: &Blind, hands_remaining: u32, money: i64) -> i64 {
    let economy = &config.economy;
    let base = match blind {
        Blind::Small => economy.reward_small,
        Blind::Big => economy.reward_big,
        Blind::Boss(boss) => boss.cash_reward,
    };
    let reward = base - round_end_penalty(blind.boss())
        + economy.per_hand_reward * hands_remaining as i64
        + interest_earned(config, money);
    reward.max(0)
}

pub fn interest_earned(config: &GameConfig, money: i64) -> i64 {
    let economy = &config.economy;
    if economy.interest_step <= 0 || economy.interest_per <= 0 {
        return 0;
    }
    let steps = (money / economy.interest_step).max(0);
    let cap_steps = economy.interest_cap / economy.interest_per;
    steps.min(cap_steps) * economy.interest_per
}
