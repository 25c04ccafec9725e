//! Owning driver for one round: the state machine plus its random source and the
//! run-owned inputs it reads. Money never changes here; it is reported through
//! [`Event::MoneyGenerated`] and [`Event::MoneyReset`] for the wallet owner.

use crate::{
    BossBlind, Card, Event, EventBus, FinishReason, GameConfig, HandLevels, Joker,
    PokerHandType, RandomSource, RngState, RoundAction, RoundContext, RoundPhase, RoundState,
    ScalingTable,
};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("{action:?} is not allowed during {phase:?}")]
    Rejected {
        action: RoundAction,
        phase: RoundPhase,
    },
    #[error("card {0:?} is not in hand")]
    UnknownCard(String),
}

/// Inputs the run carries from round to round.
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    pub config: GameConfig,
    pub jokers: Vec<Joker>,
    pub hand_levels: HandLevels,
    pub hand_play_counts: HashMap<PokerHandType, u32>,
    pub scaling: ScalingTable,
}

impl RunInputs {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn context<'a>(&'a self, boss: Option<&'a BossBlind>) -> RoundContext<'a> {
        RoundContext::new(&self.config)
            .jokers(&self.jokers)
            .boss(boss)
            .hand_levels(&self.hand_levels)
            .hand_play_counts(&self.hand_play_counts)
            .scaling(&self.scaling)
    }
}

pub struct RoundSession<R: RandomSource = RngState> {
    pub inputs: RunInputs,
    pub boss: Option<BossBlind>,
    pub state: RoundState,
    pub rng: R,
}

impl<R: RandomSource> RoundSession<R> {
    pub fn start(
        inputs: RunInputs,
        boss: Option<BossBlind>,
        deck: &[Card],
        score_goal: i64,
        mut rng: R,
        events: &mut EventBus,
    ) -> Self {
        let state = RoundState::new_round(
            deck,
            score_goal,
            &inputs.context(boss.as_ref()),
            &mut rng,
        );
        let core = state.core();
        events.push(Event::RoundStarted {
            score_goal,
            hands: core.hands_remaining,
            discards: core.discards_remaining,
            hand_size: core.hand_size,
        });
        let mut session = Self {
            inputs,
            boss,
            state,
            rng,
        };
        session.settle(events);
        session
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase()
    }

    pub fn hand(&self) -> &[Card] {
        &self.state.core().hand
    }

    /// Applies a player action, then runs the automatic phases until the round
    /// waits for the player again or finishes.
    pub fn apply(&mut self, action: RoundAction, events: &mut EventBus) -> Result<(), SessionError> {
        if let RoundAction::ToggleCard { id } = &action {
            if !self.hand().iter().any(|card| &card.id == id) {
                return Err(SessionError::UnknownCard(id.clone()));
            }
        }
        let before = self.state.phase();
        if !self.step(&action, events) {
            return Err(SessionError::Rejected {
                action,
                phase: before,
            });
        }
        self.settle(events);
        Ok(())
    }

    /// Selects `ids` (clearing any previous selection) and plays them.
    pub fn play(&mut self, ids: &[String], events: &mut EventBus) -> Result<(), SessionError> {
        self.select(ids)?;
        self.apply(RoundAction::PlaySelected, events)
    }

    /// Selects `ids` (clearing any previous selection) and discards them.
    pub fn discard(&mut self, ids: &[String], events: &mut EventBus) -> Result<(), SessionError> {
        self.select(ids)?;
        self.apply(RoundAction::DiscardSelected, events)
    }

    fn select(&mut self, ids: &[String]) -> Result<(), SessionError> {
        let mut state = self.state.clear_selection();
        for id in ids {
            if !state.core().hand.iter().any(|card| &card.id == id) {
                return Err(SessionError::UnknownCard(id.clone()));
            }
            state = state.toggle_card_selection(id);
        }
        self.state = state;
        Ok(())
    }

    fn settle(&mut self, events: &mut EventBus) {
        while let Some(action) = self.state.auto_action() {
            if !self.step(&action, events) {
                break;
            }
        }
    }

    /// One transition plus its side effects on the run inputs. False when the
    /// state did not change.
    fn step(&mut self, action: &RoundAction, events: &mut EventBus) -> bool {
        let next = {
            let ctx = self.inputs.context(self.boss.as_ref());
            self.state.apply(action, &ctx, &mut self.rng)
        };
        if next == self.state {
            return false;
        }
        let previous = std::mem::replace(&mut self.state, next);
        self.observe(&previous, events);
        true
    }

    fn observe(&mut self, previous: &RoundState, events: &mut EventBus) {
        let state = &self.state;
        match (previous, state) {
            (RoundState::Drawing(before), RoundState::SelectingHand(core)) => {
                events.push(Event::HandDealt {
                    count: core.hand.len().saturating_sub(before.hand.len()),
                    face_down: core.face_down.len(),
                });
            }
            (RoundState::SelectingHand(before), RoundState::Drawing(core)) => {
                self.inputs.scaling.record_discard(&self.inputs.jokers);
                events.push(Event::CardsDiscarded {
                    count: before.hand.len() - core.hand.len(),
                    discards_remaining: core.discards_remaining,
                });
            }
            (_, RoundState::Playing {
                played, evaluated, ..
            }) => {
                events.push(Event::HandPlayed {
                    hand: evaluated.hand_type,
                    cards: played.len(),
                });
            }
            (RoundState::Playing { core, .. }, RoundState::Scoring { outcome, .. }) => {
                let breakdown = &outcome.breakdown;
                events.push(Event::HandScored {
                    hand: outcome.hand_type(),
                    chips: breakdown.total.chips,
                    mult: breakdown.total.mult,
                    score: breakdown.final_score,
                    round_score: core.score + breakdown.final_score,
                });
                for effect in &outcome.money_effects {
                    events.push(Event::MoneyGenerated {
                        amount: effect.amount,
                        source: effect.source.clone(),
                    });
                }
                if outcome.boss_money.money_delta != 0 {
                    let source = self
                        .boss
                        .as_ref()
                        .map(|boss| boss.name.clone())
                        .unwrap_or_default();
                    events.push(Event::MoneyGenerated {
                        amount: outcome.boss_money.money_delta,
                        source,
                    });
                }
                if outcome.boss_money.reset_money {
                    events.push(Event::MoneyReset);
                }
                for id in &outcome.broken_glass {
                    events.push(Event::GlassShattered { id: id.clone() });
                }
                *self
                    .inputs
                    .hand_play_counts
                    .entry(outcome.hand_type())
                    .or_insert(0) += 1;
            }
            (
                _,
                RoundState::RoundFinished {
                    core, won, reason, ..
                },
            ) => {
                if *won {
                    self.inputs.scaling.record_round(&self.inputs.jokers);
                    events.push(Event::RoundWon {
                        score: core.score,
                        hands_remaining: core.hands_remaining,
                    });
                } else {
                    events.push(Event::RoundLost {
                        score: core.score,
                        reason: *reason,
                    });
                }
            }
            _ => {}
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn won(&self) -> Option<bool> {
        self.state.outcome().map(|(won, _)| won)
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.state.outcome().map(|(_, reason)| reason)
    }
}
