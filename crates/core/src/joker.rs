//! Joker catalog types and the resolver that turns owned jokers into scoring and
//! money effects for one played hand.

use crate::hand::rank_groups;
use crate::{Card, EvaluatedHand, MoneyEffect, Rank, ScoringEffect, Suit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum JokerRarity {
    Common,
    Uncommon,
    Rare,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Joker {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rarity: JokerRarity,
    pub effect: JokerEffect,
}

/// Closed set of joker behaviours. Per-card variants count over the scoring cards
/// unless the name says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JokerEffect {
    Flat {
        #[serde(default)]
        chips: i64,
        #[serde(default)]
        mult: f64,
    },
    SuitMult { suit: Suit, mult: f64 },
    SuitChips { suit: Suit, chips: i64 },
    HandMult { hand: String, mult: f64 },
    HandChips { hand: String, chips: i64 },
    HandXMult { hand: String, factor: f64 },
    EvenRankMult { mult: f64 },
    OddRankChips { chips: i64 },
    FaceChips { chips: i64 },
    FaceMult { mult: f64 },
    RankBonus {
        ranks: Vec<Rank>,
        #[serde(default)]
        chips: i64,
        #[serde(default)]
        mult: f64,
    },
    /// Played-card count at most `max_cards`.
    MaxCardsMult { max_cards: usize, mult: f64 },
    /// Played-card count exactly `count`.
    ExactCardsXMult { count: usize, factor: f64 },
    NoFacesChips { chips: i64 },
    DiscardsAtMostMult { max: u32, mult: f64 },
    ChipsPerDiscard { chips: i64 },
    /// Every played card shares one suit.
    SameSuitMult { mult: f64 },
    PairCountMult { mult: f64 },
    /// Fires on the 1st, 3rd, 5th... hand of the round.
    AlternatingMult { mult: f64 },
    FirstHandXMult { factor: f64 },
    HeldRankXMult { rank: Rank, factor: f64 },
    /// Every held card is a Spade or a Club.
    HeldDarkSuitsXMult { factor: f64 },
    JokerCountMult { mult: f64 },
    RerollScaling { mult_per_reroll: f64 },
    RoundScaling { chips_per_round: i64 },
    DiscardScaling { mult_per_discard: f64 },
    MoneyPerFace { money: i64 },
    MoneyPerSuit { suit: Suit, money: i64 },
    MoneyOnHand { hand: String, money: i64 },
    /// Paid by [`round_end_joker_money`], never per hand.
    RoundEndMoney { money: i64 },
}

impl JokerEffect {
    pub fn is_scaling(&self) -> bool {
        matches!(
            self,
            JokerEffect::RerollScaling { .. }
                | JokerEffect::RoundScaling { .. }
                | JokerEffect::DiscardScaling { .. }
        )
    }
}

/// Events a scaling joker has seen since it joined the run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScalingCounters {
    pub rerolls_used: u32,
    pub rounds_played: u32,
    pub discards_used: u32,
}

/// Run-owned side table of scaling counters, keyed by joker id. The joker catalog
/// itself stays immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScalingTable {
    counters: HashMap<String, ScalingCounters>,
}

impl ScalingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, joker_id: &str) -> ScalingCounters {
        self.counters.get(joker_id).copied().unwrap_or_default()
    }

    pub fn record_discard(&mut self, jokers: &[Joker]) {
        self.bump(jokers, |c| c.discards_used += 1);
    }

    pub fn record_reroll(&mut self, jokers: &[Joker]) {
        self.bump(jokers, |c| c.rerolls_used += 1);
    }

    pub fn record_round(&mut self, jokers: &[Joker]) {
        self.bump(jokers, |c| c.rounds_played += 1);
    }

    pub fn forget(&mut self, joker_id: &str) {
        self.counters.remove(joker_id);
    }

    fn bump(&mut self, jokers: &[Joker], update: impl Fn(&mut ScalingCounters)) {
        for joker in jokers.iter().filter(|joker| joker.effect.is_scaling()) {
            update(self.counters.entry(joker.id.clone()).or_default());
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JokerContext<'a> {
    pub played_cards: &'a [Card],
    pub evaluated_hand: &'a EvaluatedHand,
    pub hands_played: u32,
    pub discards_remaining: Option<u32>,
    pub held_cards: Option<&'a [Card]>,
    pub joker_count: usize,
    pub scaling: Option<&'a ScalingTable>,
}

impl<'a> JokerContext<'a> {
    pub fn new(played_cards: &'a [Card], evaluated_hand: &'a EvaluatedHand) -> Self {
        Self {
            played_cards,
            evaluated_hand,
            hands_played: 0,
            discards_remaining: None,
            held_cards: None,
            joker_count: 0,
            scaling: None,
        }
    }

    pub fn hands_played(mut self, hands_played: u32) -> Self {
        self.hands_played = hands_played;
        self
    }

    pub fn discards_remaining(mut self, discards: u32) -> Self {
        self.discards_remaining = Some(discards);
        self
    }

    pub fn held_cards(mut self, held: &'a [Card]) -> Self {
        self.held_cards = Some(held);
        self
    }

    pub fn scaling(mut self, table: &'a ScalingTable) -> Self {
        self.scaling = Some(table);
        self
    }

    fn scoring(&self) -> &'a [Card] {
        let hand: &'a EvaluatedHand = self.evaluated_hand;
        &hand.scoring_cards
    }

    fn count_scoring(&self, pred: impl Fn(&Card) -> bool) -> usize {
        self.scoring().iter().filter(|card| pred(card)).count()
    }

    fn hand_contains(&self, hand: &str) -> bool {
        let name = self.evaluated_hand.name().to_lowercase();
        name.contains(&hand.trim().to_lowercase())
    }

    fn counters(&self, joker_id: &str) -> ScalingCounters {
        self.scaling
            .map(|table| table.get(joker_id))
            .unwrap_or_default()
    }
}

pub fn evaluate_joker(joker: &Joker, ctx: &JokerContext<'_>) -> Vec<ScoringEffect> {
    let source = joker.name.as_str();
    let chips = |value: i64| ScoringEffect::add_chips(value, source);
    let mult = |value: f64| ScoringEffect::add_mult(value, source);
    let xmult = |value: f64| ScoringEffect::multiply_mult(value, source);
    let per_card = |count: usize, make: &dyn Fn(usize) -> ScoringEffect| {
        if count > 0 {
            vec![make(count)]
        } else {
            Vec::new()
        }
    };

    match &joker.effect {
        JokerEffect::Flat {
            chips: c,
            mult: m,
        } => chips_and_mult(source, *c, *m),
        JokerEffect::SuitMult { suit, mult: m } => {
            let count = ctx.count_scoring(|card| card.suit == *suit);
            per_card(count, &|n| mult(m * n as f64))
        }
        JokerEffect::SuitChips { suit, chips: c } => {
            let count = ctx.count_scoring(|card| card.suit == *suit);
            per_card(count, &|n| chips(c * n as i64))
        }
        JokerEffect::HandMult { hand, mult: m } => {
            when(ctx.hand_contains(hand), || mult(*m))
        }
        JokerEffect::HandChips { hand, chips: c } => {
            when(ctx.hand_contains(hand), || chips(*c))
        }
        JokerEffect::HandXMult { hand, factor } => {
            when(ctx.hand_contains(hand), || xmult(*factor))
        }
        JokerEffect::EvenRankMult { mult: m } => {
            let count = ctx.count_scoring(|card| card.rank.is_even());
            per_card(count, &|n| mult(m * n as f64))
        }
        JokerEffect::OddRankChips { chips: c } => {
            let count = ctx.count_scoring(|card| card.rank.is_odd());
            per_card(count, &|n| chips(c * n as i64))
        }
        JokerEffect::FaceChips { chips: c } => {
            let count = ctx.count_scoring(Card::is_face);
            per_card(count, &|n| chips(c * n as i64))
        }
        JokerEffect::FaceMult { mult: m } => {
            let count = ctx.count_scoring(Card::is_face);
            per_card(count, &|n| mult(m * n as f64))
        }
        JokerEffect::RankBonus {
            ranks,
            chips: c,
            mult: m,
        } => {
            let count = ctx.count_scoring(|card| ranks.contains(&card.rank)) as i64;
            if count == 0 {
                Vec::new()
            } else {
                chips_and_mult(source, c * count, m * count as f64)
            }
        }
        JokerEffect::MaxCardsMult { max_cards, mult: m } => when(
            !ctx.played_cards.is_empty() && ctx.played_cards.len() <= *max_cards,
            || mult(*m),
        ),
        JokerEffect::ExactCardsXMult { count, factor } => {
            when(ctx.played_cards.len() == *count, || xmult(*factor))
        }
        JokerEffect::NoFacesChips { chips: c } => when(
            !ctx.played_cards.is_empty() && !ctx.played_cards.iter().any(Card::is_face),
            || chips(*c),
        ),
        JokerEffect::DiscardsAtMostMult { max, mult: m } => when(
            ctx.discards_remaining.is_some_and(|left| left <= *max),
            || mult(*m),
        ),
        JokerEffect::ChipsPerDiscard { chips: c } => {
            let left = ctx.discards_remaining.unwrap_or(0) as usize;
            per_card(left, &|n| chips(c * n as i64))
        }
        JokerEffect::SameSuitMult { mult: m } => {
            let uniform = ctx
                .played_cards
                .first()
                .is_some_and(|first| ctx.played_cards.iter().all(|c| c.suit == first.suit));
            when(uniform, || mult(*m))
        }
        JokerEffect::PairCountMult { mult: m } => {
            let pairs = rank_groups(ctx.scoring())
                .iter()
                .map(|(_, members)| members.len() / 2)
                .sum::<usize>();
            per_card(pairs, &|n| mult(m * n as f64))
        }
        JokerEffect::AlternatingMult { mult: m } => {
            when(ctx.hands_played % 2 == 0, || mult(*m))
        }
        JokerEffect::FirstHandXMult { factor } => {
            when(ctx.hands_played == 0, || xmult(*factor))
        }
        JokerEffect::HeldRankXMult { rank, factor } => {
            let count = ctx
                .held_cards
                .map(|held| held.iter().filter(|card| card.rank == *rank).count())
                .unwrap_or(0);
            per_card(count, &|n| xmult(factor.powi(n as i32)))
        }
        JokerEffect::HeldDarkSuitsXMult { factor } => when(
            ctx.held_cards
                .is_some_and(|held| held.iter().all(|card| card.suit.is_dark())),
            || xmult(*factor),
        ),
        JokerEffect::JokerCountMult { mult: m } => {
            per_card(ctx.joker_count, &|n| mult(m * n as f64))
        }
        JokerEffect::RerollScaling { mult_per_reroll } => {
            let used = ctx.counters(&joker.id).rerolls_used as usize;
            per_card(used, &|n| mult(mult_per_reroll * n as f64))
        }
        JokerEffect::RoundScaling { chips_per_round } => {
            let rounds = ctx.counters(&joker.id).rounds_played as usize;
            per_card(rounds, &|n| chips(chips_per_round * n as i64))
        }
        JokerEffect::DiscardScaling { mult_per_discard } => {
            let used = ctx.counters(&joker.id).discards_used as usize;
            per_card(used, &|n| mult(mult_per_discard * n as f64))
        }
        JokerEffect::MoneyPerFace { .. }
        | JokerEffect::MoneyPerSuit { .. }
        | JokerEffect::MoneyOnHand { .. }
        | JokerEffect::RoundEndMoney { .. } => Vec::new(),
    }
}

/// Effects of every joker, in joker order.
pub fn evaluate_all_jokers(jokers: &[Joker], ctx: &JokerContext<'_>) -> Vec<ScoringEffect> {
    let ctx = JokerContext {
        joker_count: jokers.len(),
        ..*ctx
    };
    jokers
        .iter()
        .flat_map(|joker| evaluate_joker(joker, &ctx))
        .collect()
}

pub fn evaluate_joker_money(joker: &Joker, ctx: &JokerContext<'_>) -> Option<MoneyEffect> {
    let amount = match &joker.effect {
        JokerEffect::MoneyPerFace { money } => money * ctx.count_scoring(Card::is_face) as i64,
        JokerEffect::MoneyPerSuit { suit, money } => {
            money * ctx.count_scoring(|card| card.suit == *suit) as i64
        }
        JokerEffect::MoneyOnHand { hand, money } if ctx.hand_contains(hand) => *money,
        _ => 0,
    };
    (amount != 0).then(|| MoneyEffect {
        amount,
        source: joker.name.clone(),
    })
}

pub fn evaluate_all_joker_money_effects(
    jokers: &[Joker],
    ctx: &JokerContext<'_>,
) -> Vec<MoneyEffect> {
    jokers
        .iter()
        .filter_map(|joker| evaluate_joker_money(joker, ctx))
        .collect()
}

pub fn round_end_joker_money(jokers: &[Joker]) -> Vec<MoneyEffect> {
    jokers
        .iter()
        .filter_map(|joker| match joker.effect {
            JokerEffect::RoundEndMoney { money } if money != 0 => Some(MoneyEffect {
                amount: money,
                source: joker.name.clone(),
            }),
            _ => None,
        })
        .collect()
}

pub fn money_generated(effects: &[MoneyEffect]) -> i64 {
    effects.iter().map(|effect| effect.amount).sum()
}

fn when(condition: bool, make: impl FnOnce() -> ScoringEffect) -> Vec<ScoringEffect> {
    if condition {
        vec![make()]
    } else {
        Vec::new()
    }
}

fn chips_and_mult(source: &str, chips: i64, mult: f64) -> Vec<ScoringEffect> {
    let mut effects = Vec::with_capacity(2);
    if chips != 0 {
        effects.push(ScoringEffect::add_chips(chips, source));
    }
    if mult != 0.0 {
        effects.push(ScoringEffect::add_mult(mult, source));
    }
    effects
}
