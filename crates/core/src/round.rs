//! Per-round lifecycle: drawing -> selecting -> playing -> scoring -> played, until
//! the round finishes. Every transition reads a state and returns a new one; an
//! action attempted in the wrong phase returns the state unchanged.

use crate::{
    round_limits, shuffle_deck, BossBlind, BossMoneySignal, Card, DrawPile, EvaluatedHand,
    GameConfig, HandLevels, Joker, MoneyEffect, PokerHandType, RandomSource, ScalingTable,
    ScoreBreakdown,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

mod draw;
mod play;
mod select;

pub const MAX_SELECTED: usize = 5;

/// Fields shared by every phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundCore {
    pub pile: DrawPile,
    pub hand: Vec<Card>,
    /// Selected card ids, in selection order.
    pub selected: Vec<String>,
    pub score: i64,
    pub score_goal: i64,
    pub hands_remaining: u32,
    pub discards_remaining: u32,
    pub hands_played: u32,
    pub discards_used: u32,
    pub hand_size: usize,
    /// Number of completed draw ticks this round.
    pub draws: u32,
    pub face_down: BTreeSet<String>,
    /// Cards permanently removed this round (shattered glass).
    pub destroyed: Vec<Card>,
}

impl RoundCore {
    pub fn total_cards(&self) -> usize {
        self.pile.len() + self.hand.len()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|selected| selected == id)
    }

    pub fn is_face_down(&self, id: &str) -> bool {
        self.face_down.contains(id)
    }

    pub fn selected_cards(&self) -> Vec<Card> {
        self.hand
            .iter()
            .filter(|card| self.is_selected(&card.id))
            .cloned()
            .collect()
    }
}

/// Result of one scored hand, kept for presentation and for the run owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandOutcome {
    pub played: Vec<Card>,
    pub breakdown: ScoreBreakdown,
    pub money_effects: Vec<MoneyEffect>,
    pub money_generated: i64,
    pub broken_glass: Vec<String>,
    pub boss_money: BossMoneySignal,
}

impl HandOutcome {
    pub fn hand_type(&self) -> PokerHandType {
        self.breakdown.evaluated.hand_type
    }

    pub fn final_score(&self) -> i64 {
        self.breakdown.final_score
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FinishReason {
    ScoreGoalReached,
    OutOfHands,
    OutOfCards,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    Drawing,
    SelectingHand,
    Playing,
    Scoring,
    Played,
    RoundFinished,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RoundState {
    Drawing(RoundCore),
    SelectingHand(RoundCore),
    Playing {
        core: RoundCore,
        played: Vec<Card>,
        evaluated: EvaluatedHand,
    },
    Scoring {
        core: RoundCore,
        outcome: HandOutcome,
    },
    Played {
        core: RoundCore,
        last: HandOutcome,
    },
    RoundFinished {
        core: RoundCore,
        won: bool,
        reason: FinishReason,
        last: Option<HandOutcome>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoundAction {
    Draw,
    ToggleCard { id: String },
    PlaySelected,
    ScoreHand,
    FinishScoring,
    Continue,
    DiscardSelected,
}

/// Read-only inputs owned by the run: config, jokers, boss, levels, counters.
#[derive(Debug, Clone, Copy)]
pub struct RoundContext<'a> {
    pub config: &'a GameConfig,
    pub jokers: &'a [Joker],
    pub boss: Option<&'a BossBlind>,
    pub hand_levels: Option<&'a HandLevels>,
    /// Plays per category before the current hand, across the run.
    pub hand_play_counts: Option<&'a HashMap<PokerHandType, u32>>,
    pub scaling: Option<&'a ScalingTable>,
}

impl<'a> RoundContext<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self {
            config,
            jokers: &[],
            boss: None,
            hand_levels: None,
            hand_play_counts: None,
            scaling: None,
        }
    }

    pub fn jokers(mut self, jokers: &'a [Joker]) -> Self {
        self.jokers = jokers;
        self
    }

    pub fn boss(mut self, boss: Option<&'a BossBlind>) -> Self {
        self.boss = boss;
        self
    }

    pub fn hand_levels(mut self, levels: &'a HandLevels) -> Self {
        self.hand_levels = Some(levels);
        self
    }

    pub fn hand_play_counts(mut self, counts: &'a HashMap<PokerHandType, u32>) -> Self {
        self.hand_play_counts = Some(counts);
        self
    }

    pub fn scaling(mut self, table: &'a ScalingTable) -> Self {
        self.scaling = Some(table);
        self
    }
}

impl RoundState {
    /// Shuffles `deck` into a fresh draw pile and waits in `Drawing`.
    pub fn new_round(
        deck: &[Card],
        score_goal: i64,
        ctx: &RoundContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let limits = round_limits(ctx.config, ctx.boss);
        tracing::debug!(
            cards = deck.len(),
            score_goal,
            hands = limits.hands,
            discards = limits.discards,
            hand_size = limits.hand_size,
            "round started"
        );
        RoundState::Drawing(RoundCore {
            pile: DrawPile::new(shuffle_deck(deck, rng)),
            hand: Vec::new(),
            selected: Vec::new(),
            score: 0,
            score_goal,
            hands_remaining: limits.hands,
            discards_remaining: limits.discards,
            hands_played: 0,
            discards_used: 0,
            hand_size: limits.hand_size,
            draws: 0,
            face_down: BTreeSet::new(),
            destroyed: Vec::new(),
        })
    }

    pub fn core(&self) -> &RoundCore {
        match self {
            RoundState::Drawing(core) | RoundState::SelectingHand(core) => core,
            RoundState::Playing { core, .. }
            | RoundState::Scoring { core, .. }
            | RoundState::Played { core, .. }
            | RoundState::RoundFinished { core, .. } => core,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        match self {
            RoundState::Drawing(_) => RoundPhase::Drawing,
            RoundState::SelectingHand(_) => RoundPhase::SelectingHand,
            RoundState::Playing { .. } => RoundPhase::Playing,
            RoundState::Scoring { .. } => RoundPhase::Scoring,
            RoundState::Played { .. } => RoundPhase::Played,
            RoundState::RoundFinished { .. } => RoundPhase::RoundFinished,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, RoundState::RoundFinished { .. })
    }

    /// `Some(won)` once the round is over.
    pub fn outcome(&self) -> Option<(bool, FinishReason)> {
        match self {
            RoundState::RoundFinished { won, reason, .. } => Some((*won, *reason)),
            _ => None,
        }
    }

    /// Outcome of the hand being scored or just scored, if any.
    pub fn last_outcome(&self) -> Option<&HandOutcome> {
        match self {
            RoundState::Scoring { outcome, .. } => Some(outcome),
            RoundState::Played { last, .. } => Some(last),
            RoundState::RoundFinished { last, .. } => last.as_ref(),
            _ => None,
        }
    }

    pub fn can_play_hand(&self) -> bool {
        match self {
            RoundState::SelectingHand(core) => {
                !core.selected.is_empty() && core.hands_remaining > 0
            }
            _ => false,
        }
    }

    pub fn can_discard_cards(&self) -> bool {
        match self {
            RoundState::SelectingHand(core) => {
                !core.selected.is_empty() && core.discards_remaining > 0
            }
            _ => false,
        }
    }

    /// `Played` back to `Drawing`; a pacing tick with no other change.
    pub fn advance(&self) -> RoundState {
        match self {
            RoundState::Played { core, .. } => RoundState::Drawing(core.clone()),
            other => other.clone(),
        }
    }

    pub fn apply(
        &self,
        action: &RoundAction,
        ctx: &RoundContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> RoundState {
        match action {
            RoundAction::Draw => self.draw_cards_to_hand(ctx, rng),
            RoundAction::ToggleCard { id } => self.toggle_card_selection(id),
            RoundAction::PlaySelected => self.play_selected_cards(),
            RoundAction::ScoreHand => self.score_hand(ctx, rng),
            RoundAction::FinishScoring => self.finish_scoring(),
            RoundAction::Continue => self.advance(),
            RoundAction::DiscardSelected => self.discard_selected_cards(),
        }
    }

    /// The action that moves an automatic phase forward, if the phase has one.
    pub fn auto_action(&self) -> Option<RoundAction> {
        match self {
            RoundState::Drawing(_) => Some(RoundAction::Draw),
            RoundState::Playing { .. } => Some(RoundAction::ScoreHand),
            RoundState::Scoring { .. } => Some(RoundAction::FinishScoring),
            RoundState::Played { .. } => Some(RoundAction::Continue),
            RoundState::SelectingHand(_) | RoundState::RoundFinished { .. } => None,
        }
    }
}
