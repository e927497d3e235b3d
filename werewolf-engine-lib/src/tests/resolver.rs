use std::collections::BTreeMap;

use werewolf_game_lib::DeathCause;
use werewolf_game_lib::Seat;

use crate::resolver::resolve;
use crate::state::GameState;
use crate::store::NightActionStore;
use crate::tests::common::standard_players;

fn state() -> GameState {
    GameState::new(standard_players())
}

#[test]
fn unopposed_kill_lands() {
    let actions = NightActionStore {
        kill_target: Some(Seat(8)),
        ..NightActionStore::default()
    };

    assert_eq!(
        resolve(&state(), &actions),
        BTreeMap::from([(Seat(8), DeathCause::WerewolfKill)])
    );
}

#[test]
fn antidote_saves_the_victim() {
    let actions = NightActionStore {
        kill_target: Some(Seat(8)),
        antidote_target: Some(Seat(8)),
        ..NightActionStore::default()
    };

    assert!(resolve(&state(), &actions).is_empty());
}

#[test]
fn guard_saves_the_victim() {
    let actions = NightActionStore {
        kill_target: Some(Seat(8)),
        guard_target: Some(Seat(8)),
        ..NightActionStore::default()
    };

    assert!(resolve(&state(), &actions).is_empty());
}

#[test]
fn double_save_still_saves() {
    let actions = NightActionStore {
        kill_target: Some(Seat(8)),
        antidote_target: Some(Seat(8)),
        guard_target: Some(Seat(8)),
        ..NightActionStore::default()
    };

    assert!(resolve(&state(), &actions).is_empty());
}

#[test]
fn poison_ignores_the_guard() {
    let actions = NightActionStore {
        poison_target: Some(Seat(6)),
        guard_target: Some(Seat(6)),
        ..NightActionStore::default()
    };

    assert_eq!(
        resolve(&state(), &actions),
        BTreeMap::from([(Seat(6), DeathCause::Poison)])
    );
}

#[test]
fn poison_wins_when_it_overlaps_the_kill() {
    let actions = NightActionStore {
        kill_target: Some(Seat(9)),
        poison_target: Some(Seat(9)),
        ..NightActionStore::default()
    };

    let deaths = resolve(&state(), &actions);
    insta::assert_json_snapshot!(deaths, @r###"
    {
      "9": "Poison"
    }
    "###);
}

#[test]
fn dead_targets_are_ignored() {
    let mut state = state();
    state.apply_night_deaths(&BTreeMap::from([(Seat(8), DeathCause::WerewolfKill)]));

    let actions = NightActionStore {
        kill_target: Some(Seat(8)),
        poison_target: Some(Seat(8)),
        ..NightActionStore::default()
    };

    assert!(resolve(&state, &actions).is_empty());
}

#[test]
fn guard_elsewhere_does_not_save() {
    let actions = NightActionStore {
        kill_target: Some(Seat(8)),
        guard_target: Some(Seat(9)),
        poison_target: Some(Seat(10)),
        ..NightActionStore::default()
    };

    assert_eq!(
        resolve(&state(), &actions),
        BTreeMap::from([
            (Seat(8), DeathCause::WerewolfKill),
            (Seat(10), DeathCause::Poison),
        ])
    );
}
