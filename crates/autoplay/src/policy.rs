use crate::AutoAction;
use pokerun_core::{
    calculate_score, Card, PokerHandType, RoundContext, RoundCore, ScoreContext,
    MAX_PLAYED_CARDS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayCandidate {
    pub indices: Vec<usize>,
    pub hand: PokerHandType,
    pub score: i64,
}

/// Highest-scoring subset of one to five face-up cards. Ties prefer fewer cards,
/// then the earlier subset. Face-down cards are only considered when nothing
/// else is visible, and then blindly.
pub fn best_play(core: &RoundCore, ctx: &RoundContext<'_>) -> Option<PlayCandidate> {
    let visible: Vec<usize> = (0..core.hand.len())
        .filter(|&idx| !core.is_face_down(&core.hand[idx].id))
        .collect();
    if visible.is_empty() {
        return (!core.hand.is_empty()).then(|| PlayCandidate {
            indices: vec![0],
            hand: PokerHandType::HighCard,
            score: 0,
        });
    }

    let mut best: Option<PlayCandidate> = None;
    for subset in subsets(&visible, MAX_PLAYED_CARDS) {
        let played: Vec<Card> = subset.iter().map(|&idx| core.hand[idx].clone()).collect();
        let held: Vec<Card> = core
            .hand
            .iter()
            .enumerate()
            .filter(|(idx, _)| !subset.contains(idx))
            .map(|(_, card)| card.clone())
            .collect();
        let score_ctx = ScoreContext {
            jokers: ctx.jokers,
            boss: ctx.boss,
            hand_levels: ctx.hand_levels,
            hands_played: core.hands_played,
            discards_remaining: Some(core.discards_remaining),
            held_cards: Some(&held),
            scaling: ctx.scaling,
        };
        let breakdown = calculate_score(&played, &score_ctx);
        let better = match &best {
            None => true,
            Some(current) => {
                breakdown.final_score > current.score
                    || (breakdown.final_score == current.score
                        && subset.len() < current.indices.len())
            }
        };
        if better {
            best = Some(PlayCandidate {
                indices: subset,
                hand: breakdown.evaluated.hand_type,
                score: breakdown.final_score,
            });
        }
    }
    best
}

/// Cards outside `keep`, lowest rank first, at most five.
pub fn discard_candidates(hand: &[Card], keep: &[usize]) -> Vec<usize> {
    let mut rest: Vec<usize> = (0..hand.len()).filter(|idx| !keep.contains(idx)).collect();
    rest.sort_by_key(|&idx| (hand[idx].rank, idx));
    rest.truncate(MAX_PLAYED_CARDS);
    rest.sort_unstable();
    rest
}

/// Plays the best hand when it closes the gap or when discarding cannot help;
/// otherwise throws away the cards the best hand does not use. A hand with no
/// face-up card is played blind from its first card.
pub fn choose_action(core: &RoundCore, ctx: &RoundContext<'_>) -> Option<AutoAction> {
    let best = best_play(core, ctx)?;
    if core.hand.iter().all(|card| core.face_down.contains(&card.id)) {
        return Some(AutoAction::Play { indices: vec![0] });
    }
    let needed = core.score_goal.saturating_sub(core.score);
    let on_pace = best.score.saturating_mul(core.hands_remaining as i64) >= needed;
    if best.score >= needed || on_pace || core.discards_remaining == 0 {
        return Some(AutoAction::Play {
            indices: best.indices,
        });
    }
    let discard = discard_candidates(&core.hand, &best.indices);
    if discard.is_empty() {
        return Some(AutoAction::Play {
            indices: best.indices,
        });
    }
    Some(AutoAction::Discard { indices: discard })
}

/// Every subset of `items` with 1..=`max` members, smallest first, each in
/// ascending order.
fn subsets(items: &[usize], max: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    for size in 1..=max.min(items.len()) {
        let mut picked = Vec::with_capacity(size);
        combine(items, size, 0, &mut picked, &mut out);
    }
    out
}

fn combine(
    items: &[usize],
    size: usize,
    start: usize,
    picked: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if picked.len() == size {
        out.push(picked.clone());
        return;
    }
    for idx in start..items.len() {
        picked.push(items[idx]);
        combine(items, size, idx + 1, picked, out);
        picked.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsets_cover_every_size() {
        let all = subsets(&[0, 1, 2, 3, 4, 5, 6, 7], 5);
        assert_eq!(all.len(), 8 + 28 + 56 + 70 + 56);
        assert_eq!(all[0], vec![0]);
        assert!(all.iter().all(|subset| subset.windows(2).all(|w| w[0] < w[1])));
    }

    #[test]
    fn small_hands_cap_subset_size() {
        assert_eq!(subsets(&[3, 9], 5), vec![vec![3], vec![9], vec![3, 9]]);
        assert!(subsets(&[], 5).is_empty());
    }
}
