use werewolf_game_lib::Seat;

use crate::store::NightActionStore;

#[test]
fn snapshot_keeps_only_persistent_fields() {
    let store = NightActionStore {
        antidote_used: true,
        poison_used: false,
        prev_guard_target: Some(Seat(3)),
        seer_checks: [Seat(1), Seat(2)].into_iter().collect(),
        kill_target: Some(Seat(9)),
        antidote_target: Some(Seat(9)),
        poison_target: None,
        guard_target: Some(Seat(4)),
    };

    let next = NightActionStore::from_snapshot(store.snapshot());

    assert!(next.antidote_used);
    assert!(!next.poison_used);
    assert_eq!(next.prev_guard_target, Some(Seat(3)));
    assert_eq!(next.seer_checks, store.seer_checks);
    assert_eq!(next.kill_target, None);
    assert_eq!(next.antidote_target, None);
    assert_eq!(next.poison_target, None);
    assert_eq!(next.guard_target, None);
}

#[test]
fn carry_over_promotes_tonights_guard_target() {
    let store = NightActionStore {
        prev_guard_target: Some(Seat(3)),
        guard_target: Some(Seat(7)),
        kill_target: Some(Seat(1)),
        ..NightActionStore::default()
    };

    let next = store.carry_over();

    assert_eq!(next.prev_guard_target, Some(Seat(7)));
    assert_eq!(next.guard_target, None);
    assert_eq!(next.kill_target, None);
}

#[test]
fn first_night_starts_empty() {
    let store = NightActionStore::default();

    assert!(!store.antidote_used);
    assert!(!store.poison_used);
    assert_eq!(store.prev_guard_target, None);
    assert!(store.seer_checks.is_empty());
}
