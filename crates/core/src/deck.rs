use crate::{shuffle, Card, RandomSource, Rank, Suit};
use serde::{Deserialize, Serialize};

/// 52 unique cards, ids `"{rank}{suit}"` (e.g. `"10H"`, `"AS"`).
pub fn standard_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            let id = format!("{}{}", rank.label(), suit.letter());
            cards.push(Card::new(id, suit, rank));
        }
    }
    cards
}

/// Returns a shuffled copy; the input is untouched.
pub fn shuffle_deck(deck: &[Card], rng: &mut dyn RandomSource) -> Vec<Card> {
    let mut shuffled = deck.to_vec();
    shuffle(&mut shuffled, rng);
    shuffled
}

/// Draw pile plus discard pile for one round. Cards are drawn from the back.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawPile {
    pub draw: Vec<Card>,
    pub discard: Vec<Card>,
}

impl DrawPile {
    pub fn new(draw: Vec<Card>) -> Self {
        Self {
            draw,
            discard: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.draw.is_empty() && self.discard.is_empty()
    }

    pub fn len(&self) -> usize {
        self.draw.len() + self.discard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_exhausted()
    }

    /// Draws up to `count` cards, reshuffling the discard pile into the draw pile
    /// whenever the draw pile runs dry.
    pub fn draw_cards(&mut self, mut count: usize, rng: &mut dyn RandomSource) -> Vec<Card> {
        let mut cards = Vec::with_capacity(count);
        while count > 0 {
            if self.draw.is_empty() {
                self.reshuffle_discard(rng);
                if self.draw.is_empty() {
                    break;
                }
            }
            if let Some(card) = self.draw.pop() {
                cards.push(card);
                count -= 1;
            }
        }
        cards
    }

    pub fn discard(&mut self, mut cards: Vec<Card>) {
        self.discard.append(&mut cards);
    }

    pub fn reshuffle_discard(&mut self, rng: &mut dyn RandomSource) {
        if self.discard.is_empty() {
            return;
        }
        self.draw.append(&mut self.discard);
        shuffle(&mut self.draw, rng);
    }
}
