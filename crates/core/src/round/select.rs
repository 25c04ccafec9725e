use super::*;

impl RoundState {
    /// Selects or deselects a held card. Selection is capped at [`MAX_SELECTED`];
    /// face-down flags are untouched.
    pub fn toggle_card_selection(&self, id: &str) -> RoundState {
        let RoundState::SelectingHand(core) = self else {
            return self.clone();
        };
        if !core.hand.iter().any(|card| card.id == id) {
            return self.clone();
        }
        let mut core = core.clone();
        if core.is_selected(id) {
            core.selected.retain(|selected| selected != id);
        } else if core.selected.len() < MAX_SELECTED {
            core.selected.push(id.to_string());
        } else {
            return self.clone();
        }
        RoundState::SelectingHand(core)
    }

    pub fn clear_selection(&self) -> RoundState {
        match self {
            RoundState::SelectingHand(core) => RoundState::SelectingHand(RoundCore {
                selected: Vec::new(),
                ..core.clone()
            }),
            other => other.clone(),
        }
    }

    /// Sends the selected cards to the discard pile and goes back to drawing.
    pub fn discard_selected_cards(&self) -> RoundState {
        if !self.can_discard_cards() {
            return self.clone();
        }
        let RoundState::SelectingHand(core) = self else {
            return self.clone();
        };
        let mut core = core.clone();
        let (discarded, kept): (Vec<Card>, Vec<Card>) = core
            .hand
            .iter()
            .cloned()
            .partition(|card| core.is_selected(&card.id));
        for card in &discarded {
            core.face_down.remove(&card.id);
        }
        tracing::debug!(count = discarded.len(), "cards discarded");
        core.hand = kept;
        core.pile.discard(discarded);
        core.selected.clear();
        core.discards_remaining -= 1;
        core.discards_used += 1;
        RoundState::Drawing(core)
    }
}
