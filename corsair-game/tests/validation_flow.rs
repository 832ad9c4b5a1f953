//! End-to-end validation behavior: the operator corrects a state until the
//! error list is empty.

use corsair_game::{CardCatalog, GameStateSpec, SimulationMode, validate};

fn described_state() -> GameStateSpec {
    GameStateSpec {
        turn: 5,
        authority: 50,
        opponent_authority: 50,
        hand: "Federation Shuttle*2, BogusCardXYZ".to_string(),
        trade_row: "Cutter, Battle Blob, Missile Bot, Trade Escort, War World".to_string(),
        deck: "Scout*8, Viper*2, Explorer".to_string(),
        opponent_hand_and_deck: "Scout*10, Viper*2".to_string(),
        ..GameStateSpec::default()
    }
}

#[test]
fn a_single_bad_name_yields_exactly_one_error() {
    let errors = validate(
        &described_state(),
        SimulationMode::Standard,
        1000,
        CardCatalog::builtin(),
    );
    assert_eq!(errors.len(), 1, "unexpected errors: {errors:?}");
    assert_eq!(
        errors[0].message,
        "Hand has invalid card name: BogusCardXYZ"
    );
}

#[test]
fn correcting_the_name_clears_the_list() {
    let spec = GameStateSpec {
        hand: "Federation Shuttle*2, Cutter".to_string(),
        ..described_state()
    };
    let errors = validate(&spec, SimulationMode::Standard, 1000, CardCatalog::builtin());
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn repeated_validation_of_the_same_state_is_stable() {
    let spec = described_state();
    let catalog = CardCatalog::builtin();
    let first = validate(&spec, SimulationMode::Standard, 1000, catalog);
    let second = validate(&spec, SimulationMode::Standard, 1000, catalog);
    let third = validate(&spec, SimulationMode::Standard, 1000, catalog);
    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn a_state_description_survives_a_json_round_trip() {
    let spec = described_state();
    let json = serde_json::to_string_pretty(&spec).unwrap();
    let back: GameStateSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(back, spec);

    let errors_before = validate(&spec, SimulationMode::Standard, 500, CardCatalog::builtin());
    let errors_after = validate(&back, SimulationMode::Standard, 500, CardCatalog::builtin());
    assert_eq!(errors_before, errors_after);
}
