use pokerun_core::{
    apply_post_scoring, apply_to_card_visibility, should_reset_money, BossBlind, BossEffect,
    BossMoneySignal, Card, PokerHandType, SequenceRng, VisibilityContext,
};
use std::collections::{BTreeSet, HashMap};

fn cards(notation: &[&str]) -> Vec<Card> {
    notation
        .iter()
        .map(|text| Card::parse(text).expect("valid card"))
        .collect()
}

fn boss(effects: Vec<BossEffect>) -> BossBlind {
    BossBlind {
        id: "the_ox".to_string(),
        name: "The Ox".to_string(),
        description: String::new(),
        score_multiplier: 2.0,
        cash_reward: 5,
        effects,
    }
}

fn counts(plays: &[(PokerHandType, u32)]) -> HashMap<PokerHandType, u32> {
    plays.iter().copied().collect()
}

fn ids(expected: &[&str]) -> BTreeSet<String> {
    expected.iter().map(|id| id.to_string()).collect()
}

macro_rules! reset_case {
    ($name:ident, $effects:expr, $hand:expr, $plays:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let ox = boss($effects);
            assert_eq!(
                should_reset_money(Some(&ox), $hand, &counts($plays)),
                $expected
            );
        }
    };
}

reset_case!(
    most_played_hand_resets,
    vec![BossEffect::ResetMoneyOnMostPlayed],
    PokerHandType::Pair,
    &[(PokerHandType::Pair, 2), (PokerHandType::Flush, 1)],
    true
);
reset_case!(
    tie_for_most_played_resets,
    vec![BossEffect::ResetMoneyOnMostPlayed],
    PokerHandType::Flush,
    &[(PokerHandType::Pair, 2), (PokerHandType::Flush, 2)],
    true
);
reset_case!(
    no_plays_yet_keeps_money,
    vec![BossEffect::ResetMoneyOnMostPlayed],
    PokerHandType::Pair,
    &[],
    false
);
reset_case!(
    less_played_hand_keeps_money,
    vec![BossEffect::ResetMoneyOnMostPlayed],
    PokerHandType::Flush,
    &[(PokerHandType::Pair, 3), (PokerHandType::Flush, 1)],
    false
);
reset_case!(
    other_boss_never_resets,
    vec![BossEffect::Debuff],
    PokerHandType::Pair,
    &[(PokerHandType::Pair, 3)],
    false
);

#[test]
fn no_boss_never_resets() {
    let plays = counts(&[(PokerHandType::Pair, 3)]);
    assert!(!should_reset_money(None, PokerHandType::Pair, &plays));
    assert_eq!(
        apply_post_scoring(None, PokerHandType::Pair, 5, &plays),
        BossMoneySignal::default()
    );
}

#[test]
fn money_is_lost_per_card_played() {
    let tooth = boss(vec![BossEffect::LoseMoneyPerCardPlayed { amount: 1 }]);
    let signal = apply_post_scoring(Some(&tooth), PokerHandType::ThreeOfAKind, 3, &counts(&[]));
    assert_eq!(
        signal,
        BossMoneySignal {
            reset_money: false,
            money_delta: -3,
        }
    );
}

#[test]
fn post_scoring_reports_the_reset() {
    let ox = boss(vec![BossEffect::ResetMoneyOnMostPlayed]);
    let plays = counts(&[(PokerHandType::Pair, 1)]);
    let signal = apply_post_scoring(Some(&ox), PokerHandType::Pair, 2, &plays);
    assert_eq!(
        signal,
        BossMoneySignal {
            reset_money: true,
            money_delta: 0,
        }
    );
    let first = apply_post_scoring(Some(&ox), PokerHandType::Pair, 2, &counts(&[]));
    assert!(!first.reset_money);
}

macro_rules! visibility_case {
    ($name:ident, $effects:expr, $hands_played:expr, $opening:expr, $roll:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let drawn = cards(&["KS", "QH", "7D", "2C", "JD"]);
            let blind = boss($effects);
            let mut rng = SequenceRng::constant($roll);
            let ctx = VisibilityContext {
                hands_played: $hands_played,
                opening_deal: $opening,
            };
            assert_eq!(
                apply_to_card_visibility(&drawn, Some(&blind), ctx, &mut rng),
                ids($expected)
            );
        }
    };
}

visibility_case!(
    after_play_hides_nothing_before_a_hand,
    vec![BossEffect::FaceDownAfterPlay],
    0,
    true,
    0.5,
    &[]
);
visibility_case!(
    after_play_hides_every_draw,
    vec![BossEffect::FaceDownAfterPlay],
    1,
    false,
    0.5,
    &["KS", "QH", "7D", "2C", "JD"]
);
visibility_case!(
    first_hand_hides_the_opening_deal,
    vec![BossEffect::FaceDownFirstHand],
    0,
    true,
    0.5,
    &["KS", "QH", "7D", "2C", "JD"]
);
visibility_case!(
    first_hand_leaves_later_draws,
    vec![BossEffect::FaceDownFirstHand],
    1,
    false,
    0.5,
    &[]
);
visibility_case!(
    face_cards_are_hidden,
    vec![BossEffect::FaceDownFaceCards],
    0,
    true,
    0.5,
    &["KS", "QH", "JD"]
);
visibility_case!(
    low_roll_hides_by_chance,
    vec![BossEffect::FaceDownChance { chance: 0.25 }],
    0,
    true,
    0.0,
    &["KS", "QH", "7D", "2C", "JD"]
);
visibility_case!(
    high_roll_keeps_cards_up,
    vec![BossEffect::FaceDownChance { chance: 0.25 }],
    0,
    true,
    0.99,
    &[]
);
visibility_case!(
    unrelated_effects_hide_nothing,
    vec![BossEffect::Debuff, BossEffect::CapChips { max: 10 }],
    2,
    false,
    0.0,
    &[]
);

#[test]
fn chance_rolls_once_per_card() {
    let drawn = cards(&["KS", "QH", "7D"]);
    let blind = boss(vec![BossEffect::FaceDownChance { chance: 0.5 }]);
    let mut rng = SequenceRng::new(vec![0.9, 0.1, 0.7]);
    let ctx = VisibilityContext {
        hands_played: 0,
        opening_deal: true,
    };
    assert_eq!(
        apply_to_card_visibility(&drawn, Some(&blind), ctx, &mut rng),
        ids(&["QH"])
    );
}
