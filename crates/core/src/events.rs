use crate::{FinishReason, PokerHandType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    RoundStarted {
        score_goal: i64,
        hands: u32,
        discards: u32,
        hand_size: usize,
    },
    HandDealt {
        count: usize,
        face_down: usize,
    },
    CardsDiscarded {
        count: usize,
        discards_remaining: u32,
    },
    HandPlayed {
        hand: PokerHandType,
        cards: usize,
    },
    HandScored {
        hand: PokerHandType,
        chips: f64,
        mult: f64,
        score: i64,
        round_score: i64,
    },
    GlassShattered {
        id: String,
    },
    MoneyGenerated {
        amount: i64,
        source: String,
    },
    MoneyReset,
    RoundWon {
        score: i64,
        hands_remaining: u32,
    },
    RoundLost {
        score: i64,
        reason: FinishReason,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
