use super::*;
use crate::{apply_to_card_visibility, apply_to_hand_selection, VisibilityContext};

impl RoundState {
    /// Refills the hand to `hand_size`, then applies boss hand-selection and
    /// visibility effects. A hand that cannot be refilled at all ends the round.
    pub fn draw_cards_to_hand(
        &self,
        ctx: &RoundContext<'_>,
        rng: &mut dyn RandomSource,
    ) -> RoundState {
        let RoundState::Drawing(core) = self else {
            return self.clone();
        };
        let mut core = core.clone();
        let needed = core.hand_size.saturating_sub(core.hand.len());
        let drawn = core.pile.draw_cards(needed, rng);

        let mut full_hand = core.hand.clone();
        full_hand.extend(drawn.iter().cloned());
        let selection = apply_to_hand_selection(&full_hand, ctx.boss, rng);
        if !selection.discarded.is_empty() {
            tracing::debug!(count = selection.discarded.len(), "boss discarded from hand");
        }
        for card in &selection.discarded {
            core.face_down.remove(&card.id);
        }
        core.pile.discard(selection.discarded);
        core.hand = selection.hand;

        let still_held: Vec<Card> = drawn
            .into_iter()
            .filter(|card| core.hand.iter().any(|held| held.id == card.id))
            .collect();
        let visibility = VisibilityContext {
            hands_played: core.hands_played,
            opening_deal: core.draws == 0,
        };
        core.face_down
            .extend(apply_to_card_visibility(&still_held, ctx.boss, visibility, rng));

        if core.hand.is_empty() && !core.pile.is_exhausted() {
            let refill = core.hand_size;
            core.hand = core.pile.draw_cards(refill, rng);
            core.face_down
                .extend(apply_to_card_visibility(&core.hand, ctx.boss, visibility, rng));
        }
        core.draws += 1;

        if core.hand.is_empty() {
            tracing::debug!(score = core.score, "round lost: out of cards");
            return RoundState::RoundFinished {
                core,
                won: false,
                reason: FinishReason::OutOfCards,
                last: None,
            };
        }
        tracing::trace!(hand = core.hand.len(), pile = core.pile.draw.len(), "hand drawn");
        RoundState::SelectingHand(core)
    }
}
