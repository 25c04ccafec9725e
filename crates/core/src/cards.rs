use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
        }
    }

    pub fn letter(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Suit::Spades | Suit::Clubs)
    }
}

/// Declaration order is the fixed rank order used by the evaluator: 2 < 3 < ... < K < A.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Ace high: 2..=14.
    pub fn value(self) -> u8 {
        self as u8 + 2
    }

    pub fn chips(self) -> i64 {
        match self {
            Rank::Ace => 11,
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other.value() as i64,
        }
    }

    pub fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    /// Even Steven / Odd Todd parity. Face cards have no parity; the Ace counts as odd.
    pub fn is_even(self) -> bool {
        matches!(
            self,
            Rank::Two | Rank::Four | Rank::Six | Rank::Eight | Rank::Ten
        )
    }

    pub fn is_odd(self) -> bool {
        matches!(
            self,
            Rank::Ace | Rank::Three | Rank::Five | Rank::Seven | Rank::Nine
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Enhancement {
    Foil,
    Holographic,
    Polychrome,
    Glass,
}

/// Gold pays out when the card scores and Red retriggers it. Blue and Purple are
/// carried as card data only; nothing in scoring or the round reads them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Seal {
    Gold,
    Red,
    Blue,
    Purple,
}

/// A playing card. Identity is the `id`; two cards may share suit and rank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: String,
    pub suit: Suit,
    pub rank: Rank,
    #[serde(default)]
    pub enhancement: Option<Enhancement>,
    #[serde(default)]
    pub seal: Option<Seal>,
}

impl Card {
    pub fn new(id: impl Into<String>, suit: Suit, rank: Rank) -> Self {
        Self {
            id: id.into(),
            suit,
            rank,
            enhancement: None,
            seal: None,
        }
    }

    /// Parses `"KH"`, `"10s"`, `"Ad"` style notation; the id is the notation itself.
    pub fn parse(text: &str) -> Result<Self, CardParseError> {
        let text = text.trim();
        let mut chars = text.chars();
        let suit_char = chars.next_back().ok_or(CardParseError::Empty)?;
        let rank_text = chars.as_str();
        let suit = match suit_char.to_ascii_uppercase() {
            'S' | '♠' => Suit::Spades,
            'H' | '♥' => Suit::Hearts,
            'C' | '♣' => Suit::Clubs,
            'D' | '♦' => Suit::Diamonds,
            other => return Err(CardParseError::UnknownSuit(other)),
        };
        let rank = match rank_text.to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return Err(CardParseError::UnknownRank(rank_text.to_string())),
        };
        Ok(Self::new(text, suit, rank))
    }

    pub fn with_enhancement(&self, enhancement: Enhancement) -> Self {
        Self {
            enhancement: Some(enhancement),
            ..self.clone()
        }
    }

    pub fn with_seal(&self, seal: Seal) -> Self {
        Self {
            seal: Some(seal),
            ..self.clone()
        }
    }

    pub fn is_face(&self) -> bool {
        self.rank.is_face()
    }

    pub fn is_glass(&self) -> bool {
        matches!(self.enhancement, Some(Enhancement::Glass))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("empty card notation")]
    Empty,
    #[error("unknown suit {0:?}")]
    UnknownSuit(char),
    #[error("unknown rank {0:?}")]
    UnknownRank(String),
}
