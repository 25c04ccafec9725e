use super::*;
use crate::{
    apply_post_scoring, calculate_score_for, evaluate_all_joker_money_effects, evaluate_hand,
    glass_breaks, money_generated, seal_money_effects, JokerContext, ScoreContext,
};

impl RoundState {
    /// Moves the selected cards out of the hand and evaluates them. Played cards
    /// are revealed.
    pub fn play_selected_cards(&self) -> RoundState {
        if !self.can_play_hand() {
            return self.clone();
        }
        let RoundState::SelectingHand(core) = self else {
            return self.clone();
        };
        let mut core = core.clone();
        let (played, kept): (Vec<Card>, Vec<Card>) = core
            .hand
            .iter()
            .cloned()
            .partition(|card| core.is_selected(&card.id));
        for card in &played {
            core.face_down.remove(&card.id);
        }
        core.hand = kept;
        core.selected.clear();
        let evaluated = evaluate_hand(&played);
        tracing::debug!(hand = evaluated.name(), cards = played.len(), "hand played");
        RoundState::Playing {
            core,
            played,
            evaluated,
        }
    }

    /// Runs the scoring pipeline, money effects and glass rolls for the played hand.
    pub fn score_hand(&self, ctx: &RoundContext<'_>, rng: &mut dyn RandomSource) -> RoundState {
        let RoundState::Playing {
            core,
            played,
            evaluated,
        } = self
        else {
            return self.clone();
        };

        let score_ctx = ScoreContext {
            jokers: ctx.jokers,
            boss: ctx.boss,
            hand_levels: ctx.hand_levels,
            hands_played: core.hands_played,
            discards_remaining: Some(core.discards_remaining),
            held_cards: Some(&core.hand),
            scaling: ctx.scaling,
        };
        let breakdown = calculate_score_for(evaluated.clone(), played, &score_ctx);

        let joker_ctx = JokerContext::new(played, evaluated)
            .hands_played(core.hands_played)
            .discards_remaining(core.discards_remaining)
            .held_cards(&core.hand);
        let mut money_effects = evaluate_all_joker_money_effects(ctx.jokers, &joker_ctx);
        money_effects.extend(seal_money_effects(played, ctx.config.gold_seal_money));
        let money = money_generated(&money_effects);

        let broken_glass = glass_breaks(played, ctx.config.glass_break_chance, rng);
        let no_counts = HashMap::new();
        let boss_money = apply_post_scoring(
            ctx.boss,
            evaluated.hand_type,
            played.len(),
            ctx.hand_play_counts.unwrap_or(&no_counts),
        );

        tracing::debug!(
            hand = evaluated.name(),
            chips = breakdown.total.chips,
            mult = breakdown.total.mult,
            score = breakdown.final_score,
            money,
            broken = broken_glass.len(),
            "hand scored"
        );
        RoundState::Scoring {
            core: core.clone(),
            outcome: HandOutcome {
                played: played.clone(),
                breakdown,
                money_effects,
                money_generated: money,
                broken_glass,
                boss_money,
            },
        }
    }

    /// Commits the score, discards surviving played cards and decides whether the
    /// round continues.
    pub fn finish_scoring(&self) -> RoundState {
        let RoundState::Scoring { core, outcome } = self else {
            return self.clone();
        };
        let mut core = core.clone();
        let (destroyed, survivors): (Vec<Card>, Vec<Card>) = outcome
            .played
            .iter()
            .cloned()
            .partition(|card| outcome.broken_glass.contains(&card.id));
        core.pile.discard(survivors);
        core.destroyed.extend(destroyed);
        core.score = core.score.saturating_add(outcome.final_score());
        core.hands_remaining = core.hands_remaining.saturating_sub(1);
        core.hands_played += 1;

        let last = outcome.clone();
        if core.score >= core.score_goal {
            tracing::debug!(score = core.score, goal = core.score_goal, "round won");
            return RoundState::RoundFinished {
                core,
                won: true,
                reason: FinishReason::ScoreGoalReached,
                last: Some(last),
            };
        }
        if core.hands_remaining == 0 {
            tracing::debug!(score = core.score, goal = core.score_goal, "round lost: out of hands");
            return RoundState::RoundFinished {
                core,
                won: false,
                reason: FinishReason::OutOfHands,
                last: Some(last),
            };
        }
        RoundState::Played { core, last }
    }
}
