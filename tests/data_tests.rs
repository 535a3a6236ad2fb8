//! Data loading tests.
//!
//! Card sets and configuration read from JSON, validated, and fed into a
//! battle.

use std::sync::Arc;

use row_battle::battle::{BattleSession, BattleState};
use row_battle::cards::{CardData, CardDatabase, CardSet, Commander, EffectKind, School, UnitRange};
use row_battle::core::{BattleConfig, BattleError, ConfigError, PlayerId};
use row_battle::effects::TargetSpec;
use row_battle::keywords::Keyword;
use row_battle::presentation::{NoPicker, NullPresentation};
use row_battle::triggers::UnitTrigger;

const SUMMONER_SET: &str = r#"[
    {
        "name": "Summon Sentinel",
        "description": "A patient guard.",
        "art": "sentinel",
        "school": "Creation",
        "tier": "Novice",
        "cost": 2,
        "effects": [
            { "kind": "Summon", "target": 0, "one": 1, "two": 0, "three": 0, "four": 0 }
        ],
        "summon": {
            "name": "Sentinel",
            "art": "sentinel_unit",
            "base_attack": 1,
            "base_health": 4,
            "range": "Melee",
            "base_keywords": 128,
            "abilities": [
                {
                    "trigger": "OnDeath",
                    "kind": "FlatDamageInstant",
                    "target": 1040,
                    "one": 0,
                    "two": 2,
                    "three": 0
                }
            ]
        }
    },
    {
        "name": "Spark",
        "description": "",
        "art": "",
        "school": "Fire",
        "tier": "Adept",
        "cost": 1,
        "effects": [
            { "kind": "FlatDamageInstant", "target": 1473, "one": 2, "two": 0, "three": 0, "four": 0 }
        ],
        "summon": null
    }
]"#;

fn summoner_cards() -> Vec<CardData> {
    serde_json::from_str(SUMMONER_SET).unwrap()
}

// =============================================================================
// Card Data
// =============================================================================

#[test]
fn test_card_set_from_json() {
    let cards = summoner_cards();
    assert_eq!(cards.len(), 2);

    let sentinel = cards[0].summon.as_ref().unwrap();
    assert_eq!(sentinel.range, UnitRange::Melee);
    assert!(sentinel.base_keywords.contains(Keyword::Defending));
    assert_eq!(sentinel.abilities[0].trigger, UnitTrigger::OnDeath);
    assert_eq!(sentinel.abilities[0].target, TargetSpec::ENEMY | TargetSpec::HERO);

    let spark = &cards[1];
    assert_eq!(spark.school, School::Fire);
    assert_eq!(spark.effects[0].kind, EffectKind::FlatDamageInstant);
    assert_eq!(
        spark.effects[0].target,
        TargetSpec::ENEMY | TargetSpec::ALL_ROWS | TargetSpec::SINGLE
    );
    assert!(cards.iter().all(|c| c.validate().is_ok()));
}

#[test]
fn test_card_data_round_trip() {
    let cards = summoner_cards();
    let json = serde_json::to_string(&cards).unwrap();
    let back: Vec<CardData> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cards);
}

#[test]
fn test_database_drops_bad_sets() {
    let mut broken = summoner_cards();
    broken[0].summon = None;

    let mut db = CardDatabase::new();
    db.insert(CardSet::Commander(Commander::Summoner), summoner_cards());
    db.insert(CardSet::Commander(Commander::DarkLord), broken);
    db.insert(CardSet::School(School::Water), Vec::new());

    let errors = db.validate();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains(&ConfigError::MissingSummonData {
        set: "DarkLord".into(),
        card: "Summon Sentinel".into(),
    }));
    assert!(errors.contains(&ConfigError::EmptyCardSet("Water".into())));
    assert_eq!(db.deck_for(Commander::Summoner).len(), 2);
    assert!(db.deck_for(Commander::DarkLord).is_empty());
}

#[test]
fn test_database_deck_starts_battle() {
    let mut db = CardDatabase::new();
    db.insert(CardSet::Commander(Commander::Summoner), summoner_cards());
    assert!(db.validate().is_empty());

    let deck: Vec<Arc<CardData>> = db.deck_for(Commander::Summoner).to_vec();
    let state = BattleState::new(BattleConfig::default().with_starting_draw(1))
        .with_deck(PlayerId::FIRST, deck.clone())
        .with_deck(PlayerId::SECOND, deck);
    let mut session = BattleSession::new(state, NullPresentation::new(), NoPicker);
    session.start().unwrap();

    assert_eq!(session.state().hero(PlayerId::FIRST).hand.len(), 2);
    assert_eq!(session.state().hero(PlayerId::FIRST).deck.len(), 0);
    assert_eq!(session.state().hero(PlayerId::SECOND).hand.len(), 1);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_round_trip() {
    let config = BattleConfig::default()
        .with_hitpoints_cap(40)
        .with_mana_regen(3)
        .with_turn_time_limit(75)
        .with_seed(99);
    let json = serde_json::to_string(&config).unwrap();
    let back: BattleConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
    assert!(back.validate().is_ok());
}

#[test]
fn test_config_out_of_range() {
    let config = BattleConfig::default().with_hitpoints_cap(10);
    assert_eq!(
        config.validate(),
        Err(ConfigError::OutOfRange {
            field: "hitpoints_cap",
            value: 10,
            min: 25,
            max: 50,
        })
    );

    let config = BattleConfig::default().with_ai_display_secs(3.0);
    assert_eq!(config.validate(), Err(ConfigError::DisplayTime(3.0)));

    let state = BattleState::new(BattleConfig::default().with_turn_time_limit(5));
    let mut session = BattleSession::new(state, NullPresentation::new(), NoPicker);
    assert!(matches!(
        session.start(),
        Err(BattleError::Config(ConfigError::OutOfRange {
            field: "turn_time_limit_secs",
            ..
        }))
    ));
}
