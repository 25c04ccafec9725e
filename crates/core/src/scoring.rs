use crate::{
    apply_effects_traced, apply_pre_scoring, apply_scoring_modifiers, card_gives_chips,
    evaluate_all_jokers, evaluate_hand, hand_level_penalty, BossBlind, Card, ChipMult,
    Enhancement, EvaluatedHand, Joker, JokerContext, MoneyEffect, PokerHandType, RandomSource,
    ScalingTable, ScoreTraceStep, ScoringEffect, Seal,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const LEVEL_CHIPS: i64 = 10;
pub const LEVEL_MULT: f64 = 1.0;
pub const FOIL_CHIPS: i64 = 50;
pub const HOLOGRAPHIC_MULT: f64 = 10.0;
pub const POLYCHROME_XMULT: f64 = 1.5;
pub const GLASS_XMULT: f64 = 2.0;

/// Persistent per-category level, owned by the run. Missing entries are level 1.
pub type HandLevels = HashMap<PokerHandType, u32>;

/// Rank face value, plus the foil bonus.
pub fn card_chip_value(card: &Card) -> i64 {
    let bonus = match card.enhancement {
        Some(Enhancement::Foil) => FOIL_CHIPS,
        _ => 0,
    };
    card.rank.chips() + bonus
}

/// How many times a played card counts: once, twice with a red seal.
pub fn card_triggers(card: &Card) -> usize {
    match card.seal {
        Some(Seal::Red) => 2,
        _ => 1,
    }
}

pub fn effective_level(
    hand_type: PokerHandType,
    boss: Option<&BossBlind>,
    hand_levels: Option<&HandLevels>,
) -> u32 {
    let level = hand_levels
        .and_then(|levels| levels.get(&hand_type).copied())
        .unwrap_or(1);
    level.saturating_sub(hand_level_penalty(boss)).max(1)
}

pub fn calculate_base_chip_mult(
    evaluated: &EvaluatedHand,
    boss: Option<&BossBlind>,
    hand_levels: Option<&HandLevels>,
) -> ChipMult {
    let hand_type = evaluated.hand_type;
    let card_chips: i64 = evaluated
        .cards()
        .filter(|card| card_gives_chips(card, boss))
        .map(|card| card_chip_value(card) * card_triggers(card) as i64)
        .sum();
    let bonus_levels = effective_level(hand_type, boss, hand_levels) - 1;
    let chips = hand_type.base_chips() + card_chips + LEVEL_CHIPS * bonus_levels as i64;
    ChipMult {
        chips: chips as f64,
        mult: hand_type.base_mult() + LEVEL_MULT * bonus_levels as f64,
    }
}

pub fn enhancement_effects(card: &Card) -> Vec<ScoringEffect> {
    let source = format!("{card}");
    let effect = match card.enhancement {
        Some(Enhancement::Holographic) => ScoringEffect::add_mult(HOLOGRAPHIC_MULT, source),
        Some(Enhancement::Polychrome) => ScoringEffect::multiply_mult(POLYCHROME_XMULT, source),
        Some(Enhancement::Glass) => ScoringEffect::multiply_mult(GLASS_XMULT, source),
        Some(Enhancement::Foil) | None => return Vec::new(),
    };
    vec![effect; card_triggers(card)]
}

pub fn card_enhancement_effects(cards: &[Card]) -> Vec<ScoringEffect> {
    cards.iter().flat_map(enhancement_effects).collect()
}

/// Ids of played glass cards that shatter; one independent roll per card.
pub fn glass_breaks(cards: &[Card], chance: f64, rng: &mut dyn RandomSource) -> Vec<String> {
    cards
        .iter()
        .filter(|card| card.is_glass())
        .filter(|_| rng.roll(chance))
        .map(|card| card.id.clone())
        .collect()
}

pub fn seal_money_effects(cards: &[Card], gold_seal_money: i64) -> Vec<MoneyEffect> {
    cards
        .iter()
        .filter(|card| card.seal == Some(Seal::Gold))
        .map(|card| MoneyEffect {
            amount: gold_seal_money,
            source: format!("{card}"),
        })
        .collect()
}

/// Everything the pipeline reads besides the cards themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreContext<'a> {
    pub jokers: &'a [Joker],
    pub boss: Option<&'a BossBlind>,
    pub hand_levels: Option<&'a HandLevels>,
    pub hands_played: u32,
    pub discards_remaining: Option<u32>,
    pub held_cards: Option<&'a [Card]>,
    pub scaling: Option<&'a ScalingTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub evaluated: EvaluatedHand,
    pub base: ChipMult,
    pub total: ChipMult,
    pub joker_effects: Vec<ScoringEffect>,
    pub trace: Vec<ScoreTraceStep>,
    /// A boss rule forced this hand to score nothing.
    pub zeroed: bool,
    pub final_score: i64,
}

pub fn calculate_score(played: &[Card], ctx: &ScoreContext<'_>) -> ScoreBreakdown {
    let evaluated = evaluate_hand(played);
    calculate_score_for(evaluated, played, ctx)
}

/// Base, boss pre-scoring, enhancements, jokers, boss modifiers, floor. In that order.
///
/// Every played card (scoring cards and kickers) contributes its chip value and
/// enhancement; jokers look at the scoring cards.
pub fn calculate_score_for(
    evaluated: EvaluatedHand,
    played: &[Card],
    ctx: &ScoreContext<'_>,
) -> ScoreBreakdown {
    let mut trace = Vec::new();
    let base = calculate_base_chip_mult(&evaluated, ctx.boss, ctx.hand_levels);

    let pre = apply_pre_scoring(base, ctx.boss, ctx.hands_played, &mut trace);

    let played_in_order: Vec<Card> = evaluated.cards().cloned().collect();
    let enhancements = card_enhancement_effects(&played_in_order);
    let enhanced = apply_effects_traced(pre.chip_mult, &enhancements, &mut trace);

    let joker_ctx = JokerContext {
        played_cards: played,
        evaluated_hand: &evaluated,
        hands_played: ctx.hands_played,
        discards_remaining: ctx.discards_remaining,
        held_cards: ctx.held_cards,
        joker_count: ctx.jokers.len(),
        scaling: ctx.scaling,
    };
    let joker_effects = evaluate_all_jokers(ctx.jokers, &joker_ctx);
    let with_jokers = apply_effects_traced(enhanced, &joker_effects, &mut trace);

    let adjusted = apply_scoring_modifiers(
        crate::BossAdjusted {
            chip_mult: with_jokers,
            zeroed: pre.zeroed,
        },
        ctx.boss,
        &evaluated,
        played.len(),
    );
    let final_score = if adjusted.zeroed {
        0
    } else {
        adjusted.chip_mult.total()
    };

    ScoreBreakdown {
        evaluated,
        base,
        total: adjusted.chip_mult,
        joker_effects,
        trace,
        zeroed: adjusted.zeroed,
        final_score,
    }
}
