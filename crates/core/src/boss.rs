//! Boss-blind rule modifications. Each phase is a fold of a pure per-effect step
//! over the effects of that phase, in catalog order.

use crate::{
    apply_effects_traced, Card, ChipMult, EffectOp, EvaluatedHand, GameConfig, PokerHandType,
    RandomSource, ScoreTraceStep, ScoringEffect, Suit,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BossBlind {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_score_multiplier")]
    pub score_multiplier: f64,
    #[serde(default = "default_cash_reward")]
    pub cash_reward: i64,
    #[serde(default)]
    pub effects: Vec<BossEffect>,
}

fn default_score_multiplier() -> f64 {
    2.0
}

fn default_cash_reward() -> i64 {
    5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossPhase {
    HandSelection,
    CardVisibility,
    PreScoring,
    ScoringModifier,
    PostScoring,
    RoundEnd,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BossEffect {
    DiscardRandomCards { count: usize },
    ReduceHandSize { amount: usize },
    LimitHands { hands: u32 },
    LimitDiscards { discards: u32 },
    FaceDownAfterPlay,
    FaceDownFirstHand,
    FaceDownFaceCards,
    FaceDownChance { chance: f64 },
    FirstHandScoresZero,
    Debuff,
    RemoveAllSuits,
    HalveBase,
    SuitGivesNoChips { suit: Suit },
    FaceCardsGiveNoChips,
    DecreaseHandLevel { amount: u32 },
    OnlyOneHandType { hand: PokerHandType },
    CapChips { max: i64 },
    RequireCardCount { count: usize },
    ResetMoneyOnMostPlayed,
    LoseMoneyPerCardPlayed { amount: i64 },
    ReduceCashReward { amount: i64 },
}

pub const DEBUFF_FACTOR: f64 = 0.5;
pub const REMOVE_ALL_SUITS_FACTOR: f64 = 0.75;

impl BossEffect {
    pub fn phase(&self) -> BossPhase {
        match self {
            BossEffect::DiscardRandomCards { .. }
            | BossEffect::ReduceHandSize { .. }
            | BossEffect::LimitHands { .. }
            | BossEffect::LimitDiscards { .. } => BossPhase::HandSelection,
            BossEffect::FaceDownAfterPlay
            | BossEffect::FaceDownFirstHand
            | BossEffect::FaceDownFaceCards
            | BossEffect::FaceDownChance { .. } => BossPhase::CardVisibility,
            BossEffect::FirstHandScoresZero
            | BossEffect::Debuff
            | BossEffect::RemoveAllSuits
            | BossEffect::HalveBase => BossPhase::PreScoring,
            BossEffect::SuitGivesNoChips { .. }
            | BossEffect::FaceCardsGiveNoChips
            | BossEffect::DecreaseHandLevel { .. }
            | BossEffect::OnlyOneHandType { .. }
            | BossEffect::CapChips { .. }
            | BossEffect::RequireCardCount { .. } => BossPhase::ScoringModifier,
            BossEffect::ResetMoneyOnMostPlayed | BossEffect::LoseMoneyPerCardPlayed { .. } => {
                BossPhase::PostScoring
            }
            BossEffect::ReduceCashReward { .. } => BossPhase::RoundEnd,
        }
    }
}

impl BossBlind {
    pub fn effects_in(&self, phase: BossPhase) -> impl Iterator<Item = &BossEffect> + '_ {
        self.effects
            .iter()
            .filter(move |effect| effect.phase() == phase)
    }

    pub fn has_effect(&self, wanted: &BossEffect) -> bool {
        self.effects.iter().any(|effect| effect == wanted)
    }
}

/// Hand size and per-round budgets after boss setup effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundLimits {
    pub hand_size: usize,
    pub hands: u32,
    pub discards: u32,
}

impl RoundLimits {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            hand_size: config.hand_size,
            hands: config.hands_per_round,
            discards: config.discards_per_round,
        }
    }
}

pub fn round_limits(config: &GameConfig, boss: Option<&BossBlind>) -> RoundLimits {
    let base = RoundLimits::from_config(config);
    let Some(boss) = boss else {
        return base;
    };
    boss.effects_in(BossPhase::HandSelection)
        .fold(base, |limits, effect| match effect {
            BossEffect::ReduceHandSize { amount } => RoundLimits {
                hand_size: limits.hand_size.saturating_sub(*amount).max(1),
                ..limits
            },
            BossEffect::LimitHands { hands } => RoundLimits {
                hands: limits.hands.min(*hands).max(1),
                ..limits
            },
            BossEffect::LimitDiscards { discards } => RoundLimits {
                discards: limits.discards.min(*discards),
                ..limits
            },
            _ => limits,
        })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandSelection {
    pub hand: Vec<Card>,
    pub discarded: Vec<Card>,
}

/// Hand-selection effects on a freshly drawn hand. Removed cards are returned for
/// the discard pile, never destroyed.
pub fn apply_to_hand_selection(
    hand: &[Card],
    boss: Option<&BossBlind>,
    rng: &mut dyn RandomSource,
) -> HandSelection {
    let start = HandSelection {
        hand: hand.to_vec(),
        discarded: Vec::new(),
    };
    let Some(boss) = boss else {
        return start;
    };
    boss.effects_in(BossPhase::HandSelection)
        .fold(start, |selection, effect| match effect {
            BossEffect::DiscardRandomCards { count } => {
                discard_random(selection, *count, &mut *rng)
            }
            _ => selection,
        })
}

fn discard_random(
    selection: HandSelection,
    count: usize,
    rng: &mut dyn RandomSource,
) -> HandSelection {
    let HandSelection {
        mut hand,
        mut discarded,
    } = selection;
    for _ in 0..count.min(hand.len()) {
        let idx = rng.next_index(hand.len());
        discarded.push(hand.remove(idx));
    }
    HandSelection { hand, discarded }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityContext {
    pub hands_played: u32,
    /// True for the opening deal of the round.
    pub opening_deal: bool,
}

/// Ids among `drawn` that come in face down.
pub fn apply_to_card_visibility(
    drawn: &[Card],
    boss: Option<&BossBlind>,
    ctx: VisibilityContext,
    rng: &mut dyn RandomSource,
) -> BTreeSet<String> {
    let Some(boss) = boss else {
        return BTreeSet::new();
    };
    boss.effects_in(BossPhase::CardVisibility)
        .fold(BTreeSet::new(), |mut face_down, effect| {
            for card in drawn {
                let flip = match effect {
                    BossEffect::FaceDownAfterPlay => ctx.hands_played > 0,
                    BossEffect::FaceDownFirstHand => ctx.opening_deal,
                    BossEffect::FaceDownFaceCards => card.is_face(),
                    BossEffect::FaceDownChance { chance } => rng.roll(*chance),
                    _ => false,
                };
                if flip {
                    face_down.insert(card.id.clone());
                }
            }
            face_down
        })
}

pub fn card_gives_chips(card: &Card, boss: Option<&BossBlind>) -> bool {
    let Some(boss) = boss else {
        return true;
    };
    !boss
        .effects_in(BossPhase::ScoringModifier)
        .any(|effect| match effect {
            BossEffect::SuitGivesNoChips { suit } => card.suit == *suit,
            BossEffect::FaceCardsGiveNoChips => card.is_face(),
            _ => false,
        })
}

pub fn hand_level_penalty(boss: Option<&BossBlind>) -> u32 {
    boss.map(|boss| {
        boss.effects_in(BossPhase::ScoringModifier)
            .map(|effect| match effect {
                BossEffect::DecreaseHandLevel { amount } => *amount,
                _ => 0,
            })
            .sum()
    })
    .unwrap_or(0)
}

/// Running value of a boss step: the chip/mult so far and whether the hand has
/// been forced to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossAdjusted {
    pub chip_mult: ChipMult,
    pub zeroed: bool,
}

/// Boss pre-scoring step, applied to the base value before any enhancement or joker.
pub fn apply_pre_scoring(
    base: ChipMult,
    boss: Option<&BossBlind>,
    hands_played: u32,
    trace: &mut Vec<ScoreTraceStep>,
) -> BossAdjusted {
    let start = BossAdjusted {
        chip_mult: base,
        zeroed: false,
    };
    let Some(boss) = boss else {
        return start;
    };
    boss.effects_in(BossPhase::PreScoring)
        .fold(start, |state, effect| {
            let ops = match effect {
                BossEffect::FirstHandScoresZero if hands_played == 0 => {
                    return BossAdjusted {
                        zeroed: true,
                        ..state
                    };
                }
                BossEffect::Debuff => vec![EffectOp::MultiplyChips(DEBUFF_FACTOR)],
                BossEffect::RemoveAllSuits => {
                    vec![EffectOp::MultiplyChips(REMOVE_ALL_SUITS_FACTOR)]
                }
                BossEffect::HalveBase => {
                    vec![EffectOp::MultiplyChips(0.5), EffectOp::MultiplyMult(0.5)]
                }
                _ => Vec::new(),
            };
            let effects: Vec<ScoringEffect> = ops
                .into_iter()
                .map(|op| ScoringEffect {
                    op,
                    source: boss.name.clone(),
                })
                .collect();
            BossAdjusted {
                chip_mult: apply_effects_traced(state.chip_mult, &effects, trace),
                ..state
            }
        })
}

/// Boss scoring modifiers, applied after joker effects.
pub fn apply_scoring_modifiers(
    state: BossAdjusted,
    boss: Option<&BossBlind>,
    evaluated: &EvaluatedHand,
    played_count: usize,
) -> BossAdjusted {
    let Some(boss) = boss else {
        return state;
    };
    boss.effects_in(BossPhase::ScoringModifier)
        .fold(state, |state, effect| match effect {
            BossEffect::OnlyOneHandType { hand } if *hand != evaluated.hand_type => {
                BossAdjusted {
                    zeroed: true,
                    ..state
                }
            }
            BossEffect::RequireCardCount { count } if played_count != *count => BossAdjusted {
                zeroed: true,
                ..state
            },
            BossEffect::CapChips { max } => BossAdjusted {
                chip_mult: ChipMult {
                    chips: state.chip_mult.chips.min(*max as f64),
                    ..state.chip_mult
                }
                .clamped(),
                ..state
            },
            _ => state,
        })
}

/// Money consequences of a scored hand, reported to whoever owns the wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossMoneySignal {
    pub reset_money: bool,
    pub money_delta: i64,
}

/// True when `hand` is (one of) the most played categories so far this run.
/// `play_counts` holds plays before the current hand.
pub fn should_reset_money(
    boss: Option<&BossBlind>,
    hand: PokerHandType,
    play_counts: &HashMap<PokerHandType, u32>,
) -> bool {
    let Some(boss) = boss else {
        return false;
    };
    if !boss.has_effect(&BossEffect::ResetMoneyOnMostPlayed) {
        return false;
    }
    let most = play_counts.values().copied().max().unwrap_or(0);
    most > 0 && play_counts.get(&hand).copied().unwrap_or(0) == most
}

pub fn apply_post_scoring(
    boss: Option<&BossBlind>,
    hand: PokerHandType,
    played_count: usize,
    play_counts: &HashMap<PokerHandType, u32>,
) -> BossMoneySignal {
    let Some(boss) = boss else {
        return BossMoneySignal::default();
    };
    let reset_money = should_reset_money(Some(boss), hand, play_counts);
    let money_delta = boss
        .effects_in(BossPhase::PostScoring)
        .map(|effect| match effect {
            BossEffect::LoseMoneyPerCardPlayed { amount } => -amount * played_count as i64,
            _ => 0,
        })
        .sum();
    BossMoneySignal {
        reset_money,
        money_delta,
    }
}

/// Cash taken off the clear reward by round-end effects.
pub fn round_end_penalty(boss: Option<&BossBlind>) -> i64 {
    boss.map(|boss| {
        boss.effects_in(BossPhase::RoundEnd)
            .map(|effect| match effect {
                BossEffect::ReduceCashReward { amount } => *amount,
                _ => 0,
            })
            .sum()
    })
    .unwrap_or(0)
}
