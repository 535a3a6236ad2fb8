//! Turn flow integration tests.
//!
//! Mana growth, draws and fatigue, turn timers and full commander-vs-commander
//! battles.

use std::sync::Arc;

use row_battle::battle::{BattleSession, BattleState, CommanderAi, TurnPolicy, TurnStage};
use row_battle::cards::{CardData, EffectKind, SpellEffect, UnitData};
use row_battle::core::{BattleConfig, BattleError, PlayerId};
use row_battle::effects::TargetSpec;
use row_battle::presentation::{NoPicker, NullPresentation, RecordingPresentation};

const HUMAN: PlayerId = PlayerId::FIRST;
const ENEMY: PlayerId = PlayerId::SECOND;

fn filler(count: usize) -> Vec<Arc<CardData>> {
    vec![Arc::new(CardData::new("Filler", 9)); count]
}

fn grunt() -> Arc<CardData> {
    Arc::new(
        CardData::new("Grunt", 1)
            .with_summon(UnitData::new("Grunt", 2, 2))
            .with_effect(SpellEffect::new(EffectKind::Summon, TargetSpec::NONE).with_attributes(1, 0, 0, 0)),
    )
}

fn session(
    config: BattleConfig,
    human: Vec<Arc<CardData>>,
    enemy: Vec<Arc<CardData>>,
) -> BattleSession<NullPresentation, NoPicker> {
    let state = BattleState::new(config)
        .with_deck(HUMAN, human)
        .with_deck(ENEMY, enemy);
    BattleSession::new(state, NullPresentation::new(), NoPicker)
}

// =============================================================================
// Mana
// =============================================================================

#[test]
fn test_mana_grows_and_regenerates() {
    let mut s = session(BattleConfig::default(), filler(20), filler(20));
    s.start().unwrap();

    let hero = s.state().hero(HUMAN);
    assert_eq!((hero.mana_cap(), hero.usable_mana()), (1, 1));

    s.end_turn().unwrap();
    s.end_turn().unwrap();
    let hero = s.state().hero(HUMAN);
    assert_eq!((hero.mana_cap(), hero.usable_mana()), (2, 2));

    s.state_mut().hero_mut(HUMAN).consume_mana(2);
    s.end_turn().unwrap();
    s.end_turn().unwrap();
    let hero = s.state().hero(HUMAN);
    assert_eq!((hero.mana_cap(), hero.usable_mana()), (3, 2));
}

#[test]
fn test_mana_cap_stops_at_ceiling() {
    let config = BattleConfig::default().with_mana_growth(2);
    let mut s = session(config, filler(20), filler(20));
    s.start().unwrap();
    for _ in 0..14 {
        s.end_turn().unwrap();
    }
    assert_eq!(s.state().hero(HUMAN).mana_cap(), 10);
    assert_eq!(s.state().hero(ENEMY).mana_cap(), 10);
}

// =============================================================================
// Draws and Fatigue
// =============================================================================

#[test]
fn test_fatigue_doubles() {
    let mut s = session(BattleConfig::default(), Vec::new(), Vec::new());
    s.start().unwrap();
    assert_eq!(s.state().hero(HUMAN).hitpoints(), 29);

    // Human turn starts 2, 3 and 4.
    for _ in 0..6 {
        s.end_turn().unwrap();
    }
    assert_eq!(s.state().hero(HUMAN).hitpoints(), 30 - (1 + 2 + 4 + 8));
    assert_eq!(s.state().hero(ENEMY).hitpoints(), 30 - (1 + 2 + 4));
    assert_eq!(s.state().hero(HUMAN).fatigue_counter(), 4);
}

#[test]
fn test_fatigue_can_end_battle() {
    let mut s = session(BattleConfig::default(), Vec::new(), Vec::new());
    s.start().unwrap();
    while s.end_turn().is_ok() {}

    // 1 + 2 + 4 + 8 + 16 = 31 kills the first side on its fifth draw.
    assert_eq!(s.state().winner(), Some(ENEMY));
    assert_eq!(s.stage(), TurnStage::Finished);
    assert_eq!(s.end_turn(), Err(BattleError::BattleOver));
}

#[test]
fn test_full_hand_burns_draw() {
    let config = BattleConfig::default().with_starting_draw(7);
    let mut s = session(config, filler(15), filler(15));
    s.start().unwrap();

    // Seven dealt, the turn draw burned.
    assert_eq!(s.state().hero(HUMAN).hand.len(), 7);
    assert_eq!(s.state().hero(HUMAN).deck.len(), 7);
    assert_eq!(s.state().hero(ENEMY).deck.len(), 8);
}

#[test]
fn test_restart_resets_board() {
    let mut s = session(BattleConfig::default().with_starting_draw(3), filler(10), filler(10));
    s.start().unwrap();
    s.rules().summon(HUMAN, &Arc::new(UnitData::new("Grunt", 1, 1)), 2);
    s.rules().damage_hero(ENEMY, 12);
    s.end_turn().unwrap();

    s.start().unwrap();
    assert!(s.state().units.is_empty());
    assert_eq!(s.state().hero(ENEMY).hitpoints(), 30);
    assert_eq!(s.state().hero(HUMAN).hand.len(), 4);
    assert_eq!(s.state().hero(HUMAN).deck.len(), 6);
    assert_eq!(s.state().active, HUMAN);
    assert_eq!(s.state().turn, 1);
}

// =============================================================================
// Timer and Errors
// =============================================================================

#[test]
fn test_timer_passes_turn() {
    let config = BattleConfig::default().with_turn_time_limit(60);
    let mut s = session(config, filler(10), filler(10));
    s.start().unwrap();

    s.tick(59.0).unwrap();
    assert_eq!(s.state().active, HUMAN);
    s.tick(2.0).unwrap();
    assert_eq!(s.state().active, ENEMY);
    assert!(s.turn_timer() < 1.0);
}

#[test]
fn test_not_started_and_bad_config() {
    let mut s = session(BattleConfig::default(), filler(5), filler(5));
    assert_eq!(s.end_turn(), Err(BattleError::NotStarted));
    assert_eq!(s.tick(1.0), Err(BattleError::NotStarted));

    let mut bad = session(BattleConfig::default().with_mana_regen(9), filler(5), filler(5));
    assert!(matches!(bad.start(), Err(BattleError::Config(_))));
}

// =============================================================================
// Commander Battles
// =============================================================================

fn commander_battle(seed: u64) -> (Option<PlayerId>, u32, i32, i32) {
    let config = BattleConfig::default().with_seed(seed).with_starting_draw(3);
    let deck: Vec<Arc<CardData>> = (0..20).map(|_| grunt()).collect();
    let state = BattleState::new(config)
        .with_deck(HUMAN, deck.clone())
        .with_deck(ENEMY, deck);
    let mut s = BattleSession::new(state, RecordingPresentation::new(), NoPicker)
        .with_policy(HUMAN, TurnPolicy::Commander(CommanderAi::new()))
        .with_policy(ENEMY, TurnPolicy::Commander(CommanderAi::new()));
    s.start().unwrap();

    for _ in 0..10_000 {
        if s.state().is_over() {
            break;
        }
        s.tick(0.5).unwrap();
    }
    (
        s.state().winner(),
        s.state().turn,
        s.state().hero(HUMAN).hitpoints(),
        s.state().hero(ENEMY).hitpoints(),
    )
}

#[test]
fn test_commander_battle_finishes() {
    let (winner, turn, human, enemy) = commander_battle(3);
    assert!(winner.is_some());
    assert!(turn > 2);
    assert!(human <= 0 || enemy <= 0);
}

#[test]
fn test_commander_battle_is_deterministic() {
    assert_eq!(commander_battle(42), commander_battle(42));
}
