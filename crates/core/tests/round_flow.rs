use pokerun_core::{
    standard_deck, BossBlind, BossEffect, Card, DrawPile, Enhancement, Event, EventBus,
    FinishReason, GameConfig, Joker, JokerEffect, JokerRarity, PokerHandType, RngState,
    RoundAction, RoundContext, RoundCore, RoundPhase, RoundSession, RoundState, RunInputs, Seal,
    SequenceRng, SessionError,
};
use std::collections::BTreeSet;

fn cards(notation: &[&str]) -> Vec<Card> {
    notation
        .iter()
        .map(|text| Card::parse(text).expect("valid card"))
        .collect()
}

/// A round waiting to draw from `pile`; the last card is drawn first.
fn drawing(pile: Vec<Card>, score_goal: i64) -> RoundState {
    RoundState::Drawing(RoundCore {
        pile: DrawPile::new(pile),
        hand: Vec::new(),
        selected: Vec::new(),
        score: 0,
        score_goal,
        hands_remaining: 4,
        discards_remaining: 3,
        hands_played: 0,
        discards_used: 0,
        hand_size: 5,
        draws: 0,
        face_down: BTreeSet::new(),
        destroyed: Vec::new(),
    })
}

fn boss(effects: Vec<BossEffect>) -> BossBlind {
    BossBlind {
        id: "boss".to_string(),
        name: "Boss".to_string(),
        description: String::new(),
        score_multiplier: 2.0,
        cash_reward: 5,
        effects,
    }
}

fn select(state: RoundState, ids: &[&str]) -> RoundState {
    ids.iter()
        .fold(state, |state, id| state.toggle_card_selection(id))
}

fn hand_ids(state: &RoundState) -> Vec<String> {
    state.core().hand.iter().map(|card| card.id.clone()).collect()
}

#[test]
fn empty_piles_end_the_round_lost() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut rng = SequenceRng::constant(0.0);
    let state = drawing(Vec::new(), 100).draw_cards_to_hand(&ctx, &mut rng);
    assert_eq!(state.outcome(), Some((false, FinishReason::OutOfCards)));
}

#[test]
fn draw_fills_hand_from_the_back() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut rng = SequenceRng::constant(0.0);
    let pile = cards(&["2C", "3D", "KH", "KS", "7D", "9C"]);
    let state = drawing(pile, 100).draw_cards_to_hand(&ctx, &mut rng);
    assert_eq!(state.phase(), RoundPhase::SelectingHand);
    assert_eq!(hand_ids(&state), vec!["9C", "7D", "KS", "KH", "3D"]);
    assert_eq!(state.core().pile.draw.len(), 1);
}

#[test]
fn winning_hand_finishes_the_round() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut rng = SequenceRng::constant(0.0);
    let pile = cards(&["2C", "3D", "KH", "KS", "7D", "9C"]);
    let state = drawing(pile, 50).draw_cards_to_hand(&ctx, &mut rng);
    let state = select(state, &["KS", "KH"]);
    assert!(state.can_play_hand());

    let state = state.play_selected_cards();
    assert_eq!(state.phase(), RoundPhase::Playing);
    assert_eq!(state.core().hand.len(), 3);

    let state = state.score_hand(&ctx, &mut rng);
    let outcome = state.last_outcome().expect("scored");
    assert_eq!(outcome.hand_type(), PokerHandType::Pair);
    assert_eq!(outcome.final_score(), 60);

    let state = state.finish_scoring();
    assert_eq!(state.outcome(), Some((true, FinishReason::ScoreGoalReached)));
    let core = state.core();
    assert_eq!(core.score, 60);
    assert_eq!(core.hands_remaining, 3);
    assert_eq!(core.hands_played, 1);
    assert_eq!(core.pile.discard.len(), 2);
}

#[test]
fn short_hand_continues_and_refills() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut rng = SequenceRng::constant(0.0);
    let pile = cards(&["2C", "3D", "KH", "KS", "7D", "9C"]);
    let state = drawing(pile, 1_000).draw_cards_to_hand(&ctx, &mut rng);
    let state = select(state, &["KS", "KH"])
        .play_selected_cards()
        .score_hand(&ctx, &mut rng)
        .finish_scoring();
    assert_eq!(state.phase(), RoundPhase::Played);

    let state = state.advance();
    assert_eq!(state.phase(), RoundPhase::Drawing);
    let state = state.draw_cards_to_hand(&ctx, &mut rng);
    assert_eq!(state.phase(), RoundPhase::SelectingHand);
    assert_eq!(state.core().hand.len(), 5);
    assert_eq!(state.core().pile.draw.len(), 1);
    assert!(state.core().pile.discard.is_empty());
}

#[test]
fn last_hand_short_of_goal_loses() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut rng = SequenceRng::constant(0.0);
    let RoundState::Drawing(core) = drawing(cards(&["2C", "3D", "KH", "KS", "7D"]), 1_000)
    else {
        unreachable!()
    };
    let state = RoundState::Drawing(RoundCore {
        hands_remaining: 1,
        ..core
    });
    let state = select(state.draw_cards_to_hand(&ctx, &mut rng), &["2C"])
        .play_selected_cards()
        .score_hand(&ctx, &mut rng)
        .finish_scoring();
    assert_eq!(state.outcome(), Some((false, FinishReason::OutOfHands)));
}

#[test]
fn wrong_phase_actions_leave_state_unchanged() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut rng = SequenceRng::constant(0.0);
    let waiting = drawing(cards(&["2C", "3D", "KH", "KS", "7D"]), 100);
    assert_eq!(waiting.play_selected_cards(), waiting);
    assert_eq!(waiting.toggle_card_selection("KS"), waiting);
    assert_eq!(waiting.finish_scoring(), waiting);

    let selecting = waiting.draw_cards_to_hand(&ctx, &mut rng);
    assert!(!selecting.can_play_hand());
    assert_eq!(selecting.play_selected_cards(), selecting);
    assert_eq!(selecting.discard_selected_cards(), selecting);
    assert_eq!(selecting.score_hand(&ctx, &mut rng), selecting);
    assert_eq!(selecting.draw_cards_to_hand(&ctx, &mut rng), selecting);
    assert_eq!(selecting.toggle_card_selection("AS"), selecting);
    assert_eq!(selecting.auto_action(), None);
}

#[test]
fn selection_is_capped_at_five() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut rng = SequenceRng::constant(0.0);
    let RoundState::Drawing(core) = drawing(cards(&["2C", "3D", "4H", "5S", "7D", "9C", "JH"]), 100)
    else {
        unreachable!()
    };
    let state = RoundState::Drawing(RoundCore {
        hand_size: 7,
        ..core
    })
    .draw_cards_to_hand(&ctx, &mut rng);
    let state = select(state, &["2C", "3D", "4H", "5S", "7D", "9C"]);
    assert_eq!(state.core().selected.len(), 5);
    assert!(!state.core().is_selected("9C"));

    let state = state.toggle_card_selection("2C");
    assert_eq!(state.core().selected, vec!["3D", "4H", "5S", "7D"]);
}

#[test]
fn discard_moves_cards_and_spends_a_discard() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut rng = SequenceRng::constant(0.0);
    let pile = cards(&["2C", "3D", "KH", "KS", "7D", "9C", "AS"]);
    let state = drawing(pile, 100).draw_cards_to_hand(&ctx, &mut rng);
    let state = select(state, &["AS", "9C"]);
    assert!(state.can_discard_cards());

    let state = state.discard_selected_cards();
    assert_eq!(state.phase(), RoundPhase::Drawing);
    let core = state.core();
    assert_eq!(core.discards_remaining, 2);
    assert_eq!(core.discards_used, 1);
    assert_eq!(core.hand.len(), 3);
    assert_eq!(core.pile.discard.len(), 2);
    assert!(core.selected.is_empty());

    let state = state.draw_cards_to_hand(&ctx, &mut rng);
    assert_eq!(hand_ids(&state), vec!["7D", "KS", "KH", "3D", "2C"]);
}

#[test]
fn no_discards_left_blocks_discarding() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut rng = SequenceRng::constant(0.0);
    let RoundState::Drawing(core) = drawing(cards(&["2C", "3D", "KH", "KS", "7D"]), 100)
    else {
        unreachable!()
    };
    let state = RoundState::Drawing(RoundCore {
        discards_remaining: 0,
        ..core
    })
    .draw_cards_to_hand(&ctx, &mut rng);
    let state = select(state, &["2C"]);
    assert!(!state.can_discard_cards());
    assert_eq!(state.discard_selected_cards(), state);
}

#[test]
fn face_down_cards_are_revealed_only_when_played() {
    let config = GameConfig::default();
    let wall = boss(vec![BossEffect::FaceDownFirstHand]);
    let ctx = RoundContext::new(&config).boss(Some(&wall));
    let mut rng = SequenceRng::constant(0.0);
    let pile = cards(&["2C", "3D", "4S", "6H", "KH", "KS", "7D", "9C"]);
    let state = drawing(pile, 1_000).draw_cards_to_hand(&ctx, &mut rng);
    assert_eq!(state.core().face_down.len(), 5);

    let state = select(state, &["KS"]).toggle_card_selection("KS");
    assert!(state.core().is_face_down("KS"));

    let discarded = select(state.clone(), &["9C"]).discard_selected_cards();
    assert!(!discarded.core().is_face_down("9C"));

    let state = select(state, &["KS", "KH"]).play_selected_cards();
    assert!(!state.core().is_face_down("KS"));
    assert_eq!(state.core().face_down.len(), 3);

    let state = state
        .score_hand(&ctx, &mut rng)
        .finish_scoring()
        .advance()
        .draw_cards_to_hand(&ctx, &mut rng);
    assert_eq!(state.core().hand.len(), 5);
    assert_eq!(state.core().face_down.len(), 3);
}

#[test]
fn hook_discards_from_the_drawn_hand() {
    let config = GameConfig::default();
    let hook = boss(vec![BossEffect::DiscardRandomCards { count: 2 }]);
    let ctx = RoundContext::new(&config).boss(Some(&hook));
    let mut rng = SequenceRng::constant(0.0);
    let pile = cards(&["2C", "3D", "KH", "KS", "7D", "9C"]);
    let state = drawing(pile, 100).draw_cards_to_hand(&ctx, &mut rng);
    assert_eq!(hand_ids(&state), vec!["KS", "KH", "3D"]);
    let discarded: Vec<&str> = state
        .core()
        .pile
        .discard
        .iter()
        .map(|card| card.id.as_str())
        .collect();
    assert_eq!(discarded, vec!["9C", "7D"]);
}

#[test]
fn refilled_hand_gets_visibility_effects() {
    let config = GameConfig::default();
    let hook = boss(vec![
        BossEffect::DiscardRandomCards { count: 5 },
        BossEffect::FaceDownFaceCards,
    ]);
    let ctx = RoundContext::new(&config).boss(Some(&hook));
    let mut rng = SequenceRng::constant(0.0);
    let pile = cards(&["KH", "KS", "7D", "9C", "2C"]);
    let state = drawing(pile, 100).draw_cards_to_hand(&ctx, &mut rng);
    assert_eq!(state.phase(), RoundPhase::SelectingHand);
    assert_eq!(state.core().hand.len(), 5);
    let hidden: Vec<&str> = state
        .core()
        .face_down
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(hidden, vec!["KH", "KS"]);
}

#[test]
fn shattered_glass_leaves_the_deck() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut pile = cards(&["2C", "3D", "KH", "KS", "7D", "9C"]);
    pile[3] = pile[3].with_enhancement(Enhancement::Glass);
    pile[2] = pile[2].with_seal(Seal::Gold);

    let mut breaking = SequenceRng::constant(0.0);
    let state = drawing(pile.clone(), 50).draw_cards_to_hand(&ctx, &mut breaking);
    let state = select(state, &["KS", "KH"])
        .play_selected_cards()
        .score_hand(&ctx, &mut breaking);
    let outcome = state.last_outcome().expect("scored").clone();
    assert_eq!(outcome.final_score(), 120);
    assert_eq!(outcome.broken_glass, vec!["KS".to_string()]);
    assert_eq!(outcome.money_generated, 3);

    let state = state.finish_scoring();
    let core = state.core();
    assert_eq!(core.destroyed.len(), 1);
    assert_eq!(core.pile.discard.len(), 1);
    assert_eq!(core.total_cards() + core.destroyed.len(), 6);

    let mut lucky = SequenceRng::constant(0.99);
    let state = drawing(pile, 50).draw_cards_to_hand(&ctx, &mut lucky);
    let state = select(state, &["KS", "KH"])
        .play_selected_cards()
        .score_hand(&ctx, &mut lucky);
    assert!(state.last_outcome().expect("scored").broken_glass.is_empty());
}

#[test]
fn cards_are_conserved_across_a_round() {
    let config = GameConfig::default();
    let ctx = RoundContext::new(&config);
    let mut rng = RngState::from_seed(11);
    let deck = standard_deck();
    let mut state = RoundState::new_round(&deck, i64::MAX, &ctx, &mut rng);
    let mut turn = 0;
    while !state.is_finished() {
        if let Some(action) = state.auto_action() {
            state = state.apply(&action, &ctx, &mut rng);
            continue;
        }
        assert_eq!(state.core().total_cards(), deck.len());
        let ids: Vec<String> = hand_ids(&state).into_iter().take(2).collect();
        for id in &ids {
            state = state.apply(&RoundAction::ToggleCard { id: id.clone() }, &ctx, &mut rng);
        }
        let action = if turn % 2 == 0 && state.can_discard_cards() {
            RoundAction::DiscardSelected
        } else {
            RoundAction::PlaySelected
        };
        state = state.apply(&action, &ctx, &mut rng);
        turn += 1;
    }
    assert_eq!(state.outcome(), Some((false, FinishReason::OutOfHands)));
    assert_eq!(state.core().total_cards(), deck.len());
}

fn scaling_joker() -> Joker {
    Joker {
        id: "yorick".to_string(),
        name: "Yorick".to_string(),
        description: String::new(),
        rarity: JokerRarity::Rare,
        effect: JokerEffect::DiscardScaling {
            mult_per_discard: 1.0,
        },
    }
}

#[test]
fn session_reports_events_and_updates_run_inputs() {
    let mut inputs = RunInputs::new(GameConfig::default());
    inputs.jokers.push(scaling_joker());
    let mut events = EventBus::default();
    let mut session = RoundSession::start(
        inputs,
        None,
        &standard_deck(),
        i64::MAX,
        RngState::from_seed(5),
        &mut events,
    );
    assert_eq!(session.phase(), RoundPhase::SelectingHand);
    let opening: Vec<Event> = events.drain().collect();
    assert!(matches!(opening[0], Event::RoundStarted { hands: 4, discards: 3, .. }));
    assert!(matches!(opening[1], Event::HandDealt { count: 8, .. }));

    let first_two: Vec<String> = session.hand().iter().take(2).map(|c| c.id.clone()).collect();
    session.discard(&first_two, &mut events).expect("discard");
    assert_eq!(session.inputs.scaling.get("yorick").discards_used, 1);
    let after_discard: Vec<Event> = events.drain().collect();
    assert!(matches!(
        after_discard[0],
        Event::CardsDiscarded {
            count: 2,
            discards_remaining: 2
        }
    ));
    assert!(matches!(after_discard[1], Event::HandDealt { count: 2, .. }));

    let one = vec![session.hand()[0].id.clone()];
    session.play(&one, &mut events).expect("play");
    assert_eq!(session.phase(), RoundPhase::SelectingHand);
    assert_eq!(
        session.inputs.hand_play_counts.get(&PokerHandType::HighCard),
        Some(&1)
    );
    let played: Vec<Event> = events.drain().collect();
    assert!(matches!(played[0], Event::HandPlayed { cards: 1, .. }));
    assert!(matches!(played[1], Event::HandScored { .. }));

    let missing = session.play(&["nope".to_string()], &mut events);
    assert_eq!(missing, Err(SessionError::UnknownCard("nope".to_string())));
}

#[test]
fn session_win_records_a_round_for_scaling_jokers() {
    let mut inputs = RunInputs::new(GameConfig::default());
    inputs.jokers.push(scaling_joker());
    let mut events = EventBus::default();
    let mut session = RoundSession::start(
        inputs,
        None,
        &standard_deck(),
        1,
        RngState::from_seed(9),
        &mut events,
    );
    let one = vec![session.hand()[0].id.clone()];
    session.play(&one, &mut events).expect("play");
    assert_eq!(session.won(), Some(true));
    assert_eq!(session.inputs.scaling.get("yorick").rounds_played, 1);
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::RoundWon { hands_remaining: 3, .. })));

    let rejected = session.apply(RoundAction::PlaySelected, &mut events);
    assert_eq!(
        rejected,
        Err(SessionError::Rejected {
            action: RoundAction::PlaySelected,
            phase: RoundPhase::RoundFinished
        })
    );
}

#[test]
fn ox_reset_follows_the_money_earned_by_the_hand() {
    let mut inputs = RunInputs::new(GameConfig::default());
    inputs.hand_play_counts.insert(PokerHandType::Pair, 2);
    inputs.hand_play_counts.insert(PokerHandType::Flush, 1);
    let ox = BossBlind {
        name: "The Ox".to_string(),
        ..boss(vec![BossEffect::ResetMoneyOnMostPlayed])
    };
    let mut deck = cards(&["KH", "7D", "2C", "9S"]);
    deck.push(Card::parse("KS").expect("valid card").with_seal(Seal::Gold));
    let mut events = EventBus::default();
    let mut session = RoundSession::start(
        inputs,
        Some(ox),
        &deck,
        i64::MAX,
        RngState::from_seed(3),
        &mut events,
    );
    events.drain().for_each(drop);

    session
        .play(&["KS".to_string(), "KH".to_string()], &mut events)
        .expect("play");
    let played: Vec<Event> = events.drain().collect();
    let earned = played
        .iter()
        .position(|event| matches!(event, Event::MoneyGenerated { source, .. } if source == "K♠"))
        .expect("gold seal pays");
    let reset = played
        .iter()
        .position(|event| matches!(event, Event::MoneyReset))
        .expect("ox resets money");
    assert!(earned < reset);
    assert_eq!(
        session.inputs.hand_play_counts.get(&PokerHandType::Pair),
        Some(&3)
    );
}

#[test]
fn ox_waits_for_a_most_played_hand() {
    let inputs = RunInputs::new(GameConfig::default());
    let ox = boss(vec![BossEffect::ResetMoneyOnMostPlayed]);
    let mut events = EventBus::default();
    let mut session = RoundSession::start(
        inputs,
        Some(ox),
        &cards(&["KH", "KS", "7D", "2C"]),
        i64::MAX,
        RngState::from_seed(3),
        &mut events,
    );
    session
        .play(&["KS".to_string(), "KH".to_string()], &mut events)
        .expect("play");
    assert!(!events
        .drain()
        .any(|event| matches!(event, Event::MoneyReset)));
}
