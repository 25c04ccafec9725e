use crate::{
    choose_action, AutoAction, AutoplayConfig, AutoplayError, AutoplayResult, BlindRecord,
    RunStatus, StepRecord, SummaryStats,
};
use pokerun_core::{
    blind_score_goal, money_generated, next_blind, round_end_joker_money, round_reward,
    standard_deck, Blind, BlindKind, Card, Content, Event, EventBus, GameConfig, PokerHandType,
    RngState, RoundSession, RunInputs,
};

/// Owns everything a run carries between rounds: wallet, deck, hand levels,
/// play counts and scaling counters. Each blind is one [`RoundSession`].
#[derive(Debug)]
pub struct Simulator {
    pub config: AutoplayConfig,
    pub content: Content,
    pub inputs: RunInputs,
    pub deck: Vec<Card>,
    pub money: i64,
    pub ante: u32,
    pub blind: BlindKind,
    pub rng: RngState,
    pub events: EventBus,
    steps: Vec<StepRecord>,
    blinds: Vec<BlindRecord>,
}

enum BlindResult {
    Cleared,
    Failed,
    OutOfSteps,
}

/// What draining the event bus after an action revealed.
#[derive(Default)]
struct Absorbed {
    count: usize,
    hand: Option<PokerHandType>,
    hand_score: Option<i64>,
}

impl Simulator {
    pub fn new(
        config: AutoplayConfig,
        game: GameConfig,
        content: Content,
    ) -> Result<Self, AutoplayError> {
        let jokers = content.jokers_by_ids(config.jokers.as_slice())?;
        let mut inputs = RunInputs::new(game);
        inputs.jokers = jokers;
        Ok(Self {
            rng: RngState::from_seed(config.seed),
            money: config.starting_money,
            config,
            content,
            inputs,
            deck: standard_deck(),
            ante: 1,
            blind: BlindKind::Small,
            events: EventBus::default(),
            steps: Vec::new(),
            blinds: Vec::new(),
        })
    }

    pub fn target_ante(&self) -> u32 {
        self.config
            .target_ante
            .unwrap_or(self.inputs.config.max_ante)
    }

    /// Plays blinds until the target ante is cleared, a blind is lost, or the
    /// step budget runs out.
    pub fn run(mut self) -> Result<AutoplayResult, AutoplayError> {
        let status = loop {
            if self.ante > self.target_ante() {
                break RunStatus::Won;
            }
            let blind = match self.blind {
                BlindKind::Small => Blind::Small,
                BlindKind::Big => Blind::Big,
                BlindKind::Boss => Blind::Boss(self.content.pick_boss(&mut self.rng)?.clone()),
            };
            match self.play_blind(blind)? {
                BlindResult::Cleared => {
                    let (ante, kind) = next_blind(self.ante, self.blind);
                    self.ante = ante;
                    self.blind = kind;
                }
                BlindResult::Failed => break RunStatus::Failed,
                BlindResult::OutOfSteps => break RunStatus::MaxSteps,
            }
        };
        tracing::info!(
            seed = self.config.seed,
            ?status,
            ante = self.ante,
            money = self.money,
            steps = self.steps.len(),
            "run finished"
        );
        Ok(self.into_result(status))
    }

    fn play_blind(&mut self, blind: Blind) -> Result<BlindResult, AutoplayError> {
        let goal = blind_score_goal(&self.inputs.config, self.ante, &blind)?;
        let inputs = std::mem::take(&mut self.inputs);
        let rng = self.rng.fork();
        let mut session = RoundSession::start(
            inputs,
            blind.boss().cloned(),
            &self.deck,
            goal,
            rng,
            &mut self.events,
        );
        self.absorb();

        let mut out_of_steps = false;
        while !session.is_finished() {
            if self.steps.len() as u32 >= self.config.max_steps {
                out_of_steps = true;
                break;
            }
            let (action, ids, cards) = {
                let core = session.state.core();
                let ctx = session.inputs.context(session.boss.as_ref());
                let action = choose_action(core, &ctx).ok_or_else(|| {
                    AutoplayError::InvalidAction("no cards in hand to act on".to_string())
                })?;
                let picked: Vec<&Card> = action
                    .indices()
                    .iter()
                    .filter_map(|&idx| core.hand.get(idx))
                    .collect();
                let ids: Vec<String> = picked.iter().map(|card| card.id.clone()).collect();
                let cards: Vec<String> = picked.iter().map(|card| card.to_string()).collect();
                (action, ids, cards)
            };
            match &action {
                AutoAction::Play { .. } => session.play(&ids, &mut self.events)?,
                AutoAction::Discard { .. } => session.discard(&ids, &mut self.events)?,
            }
            let absorbed = self.absorb();
            let core = session.state.core();
            tracing::debug!(
                step = self.steps.len() + 1,
                action = %action.short_label(),
                score = core.score,
                goal,
                "autoplay step"
            );
            self.steps.push(StepRecord {
                step: self.steps.len() as u32 + 1,
                ante: self.ante,
                blind: blind.name().to_string(),
                action,
                cards,
                hand: absorbed.hand,
                hand_score: absorbed.hand_score,
                round_score: core.score,
                score_goal: goal,
                money: self.money,
                event_count: absorbed.count,
            });
        }

        let won = session.won() == Some(true);
        let core = session.state.core();
        let score = core.score;
        let hands_remaining = core.hands_remaining;
        if !core.destroyed.is_empty() {
            let destroyed: Vec<&str> = core.destroyed.iter().map(|card| card.id.as_str()).collect();
            self.deck.retain(|card| !destroyed.contains(&card.id.as_str()));
        }
        self.inputs = session.inputs;

        let mut reward = 0;
        if won {
            reward = round_reward(&self.inputs.config, &blind, hands_remaining, self.money)
                + money_generated(&round_end_joker_money(&self.inputs.jokers));
            self.money += reward;
        }
        tracing::info!(
            ante = self.ante,
            blind = blind.name(),
            score,
            goal,
            won,
            reward,
            money = self.money,
            "blind finished"
        );
        self.blinds.push(BlindRecord {
            ante: self.ante,
            blind: blind.name().to_string(),
            score_goal: goal,
            score,
            won,
            reward,
        });

        Ok(if out_of_steps {
            BlindResult::OutOfSteps
        } else if won {
            BlindResult::Cleared
        } else {
            BlindResult::Failed
        })
    }

    /// Drains the bus into the wallet.
    fn absorb(&mut self) -> Absorbed {
        let mut absorbed = Absorbed::default();
        for event in self.events.drain() {
            absorbed.count += 1;
            match event {
                Event::MoneyGenerated { amount, .. } => self.money += amount,
                Event::MoneyReset => self.money = 0,
                Event::HandScored { hand, score, .. } => {
                    absorbed.hand = Some(hand);
                    absorbed.hand_score = Some(score);
                }
                _ => {}
            }
        }
        absorbed
    }

    fn into_result(self, status: RunStatus) -> AutoplayResult {
        let summary = SummaryStats {
            steps: self.steps.len() as u32,
            hands_played: self
                .steps
                .iter()
                .filter(|step| matches!(step.action, AutoAction::Play { .. }))
                .count() as u32,
            discards_used: self
                .steps
                .iter()
                .filter(|step| matches!(step.action, AutoAction::Discard { .. }))
                .count() as u32,
            blinds_cleared: self.blinds.iter().filter(|blind| blind.won).count() as u32,
            best_hand_score: self
                .steps
                .iter()
                .filter_map(|step| step.hand_score)
                .max()
                .unwrap_or(0),
        };
        AutoplayResult {
            seed: self.config.seed,
            status,
            final_ante: self.ante,
            final_money: self.money,
            blinds: self.blinds,
            steps: self.steps,
            summary,
        }
    }
}

pub fn run_autoplay(
    config: AutoplayConfig,
    game: GameConfig,
    content: Content,
) -> Result<AutoplayResult, AutoplayError> {
    Simulator::new(config, game, content)?.run()
}
