use crate::{Card, Rank, Suit};
use serde::{Deserialize, Serialize};

pub const MAX_PLAYED_CARDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PokerHandType {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl PokerHandType {
    /// Lowest to highest detection priority.
    pub const ALL: [PokerHandType; 10] = [
        PokerHandType::HighCard,
        PokerHandType::Pair,
        PokerHandType::TwoPair,
        PokerHandType::ThreeOfAKind,
        PokerHandType::Straight,
        PokerHandType::Flush,
        PokerHandType::FullHouse,
        PokerHandType::FourOfAKind,
        PokerHandType::StraightFlush,
        PokerHandType::RoyalFlush,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PokerHandType::HighCard => "High Card",
            PokerHandType::Pair => "Pair",
            PokerHandType::TwoPair => "Two Pair",
            PokerHandType::ThreeOfAKind => "Three of a Kind",
            PokerHandType::Straight => "Straight",
            PokerHandType::Flush => "Flush",
            PokerHandType::FullHouse => "Full House",
            PokerHandType::FourOfAKind => "Four of a Kind",
            PokerHandType::StraightFlush => "Straight Flush",
            PokerHandType::RoyalFlush => "Royal Flush",
        }
    }

    /// Display / level-table index, 0 for High Card through 9 for Royal Flush.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn base_chips(self) -> i64 {
        match self {
            PokerHandType::HighCard => 5,
            PokerHandType::Pair => 10,
            PokerHandType::TwoPair => 20,
            PokerHandType::ThreeOfAKind => 30,
            PokerHandType::Straight => 30,
            PokerHandType::Flush => 35,
            PokerHandType::FullHouse => 40,
            PokerHandType::FourOfAKind => 60,
            PokerHandType::StraightFlush | PokerHandType::RoyalFlush => 100,
        }
    }

    pub fn base_mult(self) -> f64 {
        match self {
            PokerHandType::HighCard => 1.0,
            PokerHandType::Pair | PokerHandType::TwoPair => 2.0,
            PokerHandType::ThreeOfAKind => 3.0,
            PokerHandType::Straight | PokerHandType::Flush | PokerHandType::FullHouse => 4.0,
            PokerHandType::FourOfAKind => 7.0,
            PokerHandType::StraightFlush | PokerHandType::RoyalFlush => 8.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedHand {
    pub hand_type: PokerHandType,
    pub scoring_cards: Vec<Card>,
    pub kickers: Vec<Card>,
}

impl EvaluatedHand {
    pub fn new(hand_type: PokerHandType, scoring_cards: Vec<Card>, kickers: Vec<Card>) -> Self {
        Self {
            hand_type,
            scoring_cards,
            kickers,
        }
    }

    pub fn name(&self) -> &'static str {
        self.hand_type.name()
    }

    /// Scoring cards first, then kickers.
    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.scoring_cards.iter().chain(self.kickers.iter())
    }
}

/// Picks the highest-priority category the cards satisfy.
///
/// Zero cards or more than [`MAX_PLAYED_CARDS`] degrade to a High Card shape over
/// the first five cards instead of failing.
pub fn evaluate_hand(cards: &[Card]) -> EvaluatedHand {
    if cards.is_empty() || cards.len() > MAX_PLAYED_CARDS {
        let prefix = &cards[..cards.len().min(MAX_PLAYED_CARDS)];
        return high_card(prefix);
    }

    let all: Vec<usize> = (0..cards.len()).collect();
    let groups = rank_groups(cards);
    let flush = flush_indices(cards);
    let straight = straight_indices(cards, &all);

    if let (Some(flush), Some(_)) = (&flush, &straight) {
        if let Some(run) = straight_indices(cards, flush) {
            let kind = if is_royal(cards, &run) {
                PokerHandType::RoyalFlush
            } else {
                PokerHandType::StraightFlush
            };
            return assemble(cards, kind, run);
        }
    }

    let top = groups.first().map(|(_, idx)| idx.len()).unwrap_or(0);
    let second = groups.get(1).map(|(_, idx)| idx.len()).unwrap_or(0);

    if top >= 4 {
        let quads = groups[0].1.iter().copied().take(4).collect();
        return assemble(cards, PokerHandType::FourOfAKind, quads);
    }
    if top == 3 && second >= 2 {
        let mut picked: Vec<usize> = groups[0].1.clone();
        picked.extend(groups[1].1.iter().copied().take(2));
        return assemble(cards, PokerHandType::FullHouse, picked);
    }
    if let Some(flush) = flush {
        return assemble(cards, PokerHandType::Flush, flush);
    }
    if let Some(run) = straight {
        return assemble(cards, PokerHandType::Straight, run);
    }
    if top == 3 {
        return assemble(cards, PokerHandType::ThreeOfAKind, groups[0].1.clone());
    }
    if top == 2 && second == 2 {
        let mut picked = groups[0].1.clone();
        picked.extend(groups[1].1.iter().copied());
        return assemble(cards, PokerHandType::TwoPair, picked);
    }
    if top == 2 {
        return assemble(cards, PokerHandType::Pair, groups[0].1.clone());
    }
    high_card(cards)
}

fn high_card(cards: &[Card]) -> EvaluatedHand {
    let best = cards
        .iter()
        .enumerate()
        .fold(None::<(usize, Rank)>, |best, (idx, card)| match best {
            Some((_, rank)) if rank >= card.rank => best,
            _ => Some((idx, card.rank)),
        });
    match best {
        Some((idx, _)) => assemble(cards, PokerHandType::HighCard, vec![idx]),
        None => EvaluatedHand::new(PokerHandType::HighCard, Vec::new(), Vec::new()),
    }
}

fn assemble(cards: &[Card], hand_type: PokerHandType, scoring: Vec<usize>) -> EvaluatedHand {
    let scoring_cards = scoring.iter().map(|&idx| cards[idx].clone()).collect();
    let mut kickers: Vec<&Card> = cards
        .iter()
        .enumerate()
        .filter(|(idx, _)| !scoring.contains(idx))
        .map(|(_, card)| card)
        .collect();
    kickers.sort_by(|a, b| b.rank.cmp(&a.rank));
    EvaluatedHand::new(
        hand_type,
        scoring_cards,
        kickers.into_iter().cloned().collect(),
    )
}

/// Rank buckets sorted by count descending, then rank descending. Members keep input order.
pub(crate) fn rank_groups(cards: &[Card]) -> Vec<(Rank, Vec<usize>)> {
    let mut groups = cards
        .iter()
        .enumerate()
        .fold(Vec::<(Rank, Vec<usize>)>::new(), |mut acc, (idx, card)| {
            match acc.iter_mut().find(|(rank, _)| *rank == card.rank) {
                Some((_, members)) => members.push(idx),
                None => acc.push((card.rank, vec![idx])),
            }
            acc
        });
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(b.0.cmp(&a.0)));
    groups
}

pub(crate) fn suit_groups(cards: &[Card]) -> Vec<(Suit, Vec<usize>)> {
    let mut groups = cards
        .iter()
        .enumerate()
        .fold(Vec::<(Suit, Vec<usize>)>::new(), |mut acc, (idx, card)| {
            match acc.iter_mut().find(|(suit, _)| *suit == card.suit) {
                Some((_, members)) => members.push(idx),
                None => acc.push((card.suit, vec![idx])),
            }
            acc
        });
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    groups
}

fn flush_indices(cards: &[Card]) -> Option<Vec<usize>> {
    suit_groups(cards)
        .into_iter()
        .find(|(_, members)| members.len() >= MAX_PLAYED_CARDS)
        .map(|(_, members)| members.into_iter().take(MAX_PLAYED_CARDS).collect())
}

/// Five consecutive distinct ranks within `pool`, highest run first. The wheel
/// comes back ordered 5, 4, 3, 2, A.
fn straight_indices(cards: &[Card], pool: &[usize]) -> Option<Vec<usize>> {
    let mut distinct: Vec<(Rank, usize)> = Vec::new();
    for &idx in pool {
        let rank = cards[idx].rank;
        if !distinct.iter().any(|(seen, _)| *seen == rank) {
            distinct.push((rank, idx));
        }
    }
    distinct.sort_by(|a, b| b.0.cmp(&a.0));

    for window in distinct.windows(MAX_PLAYED_CARDS) {
        if window[0].0.value() - window[MAX_PLAYED_CARDS - 1].0.value() == 4 {
            return Some(window.iter().map(|(_, idx)| *idx).collect());
        }
    }

    let wheel = [Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace];
    let picked: Vec<usize> = wheel
        .iter()
        .filter_map(|rank| {
            distinct
                .iter()
                .find(|(seen, _)| seen == rank)
                .map(|(_, idx)| *idx)
        })
        .collect();
    (picked.len() == wheel.len()).then_some(picked)
}

fn is_royal(cards: &[Card], run: &[usize]) -> bool {
    let mut ranks: Vec<Rank> = run.iter().map(|&idx| cards[idx].rank).collect();
    ranks.sort();
    ranks == [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace]
}
