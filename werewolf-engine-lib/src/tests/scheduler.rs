use std::collections::BTreeMap;
use std::sync::Arc;

use werewolf_game_lib::DeathCause;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::Phase;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SubPhase;

use crate::collector::EventCollector;
use crate::day::run_day;
use crate::night::run_night;
use crate::participant::Participant;
use crate::state::GameState;
use crate::store::NightActionStore;
use crate::tests::common::defaulting_participants;
use crate::tests::common::participants_with;
use crate::tests::common::standard_players;
use crate::tests::common::Scripted;
use crate::validate::NoOpValidator;

fn collector() -> EventCollector {
    EventCollector::new()
}

#[test_log::test(tokio::test)]
async fn night_runs_all_five_subphases_in_order() {
    let mut state = GameState::new(standard_players());
    let mut collector = collector();

    let (_, deaths) = run_night(
        &mut state,
        NightActionStore::default(),
        &mut collector,
        &defaulting_participants(),
        &NoOpValidator,
    )
    .await
    .unwrap();

    assert!(deaths.is_empty());
    let log = collector.into_log();
    let subphases: Vec<SubPhase> = log.phases[0]
        .subphases
        .iter()
        .map(|sub| sub.subphase)
        .collect();
    assert_eq!(
        subphases,
        vec![
            SubPhase::WerewolfAction,
            SubPhase::WitchAction,
            SubPhase::GuardAction,
            SubPhase::SeerAction,
            SubPhase::NightResolution,
        ]
    );
}

#[test_log::test(tokio::test)]
async fn dead_roles_leave_empty_subphase_logs() {
    let mut state = GameState::new(standard_players());
    // Witch and guard are already gone.
    state.apply_night_deaths(&BTreeMap::from([
        (Seat(5), DeathCause::Banishment),
        (Seat(6), DeathCause::Banishment),
    ]));
    let mut collector = collector();

    run_night(
        &mut state,
        NightActionStore::default(),
        &mut collector,
        &defaulting_participants(),
        &NoOpValidator,
    )
    .await
    .unwrap();

    let log = collector.into_log();
    let phase = &log.phases[0];
    assert_eq!(phase.subphases.len(), 5);
    assert!(phase.subphases[1].events.is_empty(), "witch subphase");
    assert!(phase.subphases[2].events.is_empty(), "guard subphase");
    // Werewolves and seer still act.
    assert_eq!(phase.subphases[0].events.len(), 1);
    assert_eq!(phase.subphases[3].events.len(), 1);
}

#[test_log::test(tokio::test)]
async fn night_kill_is_applied_to_state() {
    let mut state = GameState::new(standard_players());
    let mut collector = collector();
    let participants = participants_with(|seat| {
        if seat == Seat(0) {
            Arc::new(Scripted::new().on("pack kill", ["8"])) as Arc<dyn Participant>
        } else {
            Arc::new(crate::tests::common::Defaulting)
        }
    });

    let (_, deaths) = run_night(
        &mut state,
        NightActionStore::default(),
        &mut collector,
        &participants,
        &NoOpValidator,
    )
    .await
    .unwrap();

    assert_eq!(deaths, BTreeMap::from([(Seat(8), DeathCause::WerewolfKill)]));
    assert!(!state.is_alive(Seat(8)));
}

#[test_log::test(tokio::test)]
async fn guard_restriction_threads_across_nights() {
    let mut state = GameState::new(standard_players());
    let mut collector = collector();
    let participants = participants_with(|seat| {
        if seat == Seat(6) {
            // Tries seat 3 both nights; the second night that choice is off
            // the menu, so the guard skips.
            Arc::new(Scripted::new().on("protect", ["3", "3", "3", "3"])) as Arc<dyn Participant>
        } else {
            Arc::new(crate::tests::common::Defaulting)
        }
    });

    let (store, _) = run_night(
        &mut state,
        NightActionStore::default(),
        &mut collector,
        &participants,
        &NoOpValidator,
    )
    .await
    .unwrap();
    assert_eq!(store.prev_guard_target, Some(Seat(3)));

    state.set_day(2);
    let (store, _) = run_night(
        &mut state,
        store,
        &mut collector,
        &participants,
        &NoOpValidator,
    )
    .await
    .unwrap();
    assert_eq!(store.prev_guard_target, None);

    let log = collector.into_log();
    let guard_targets: Vec<Option<Seat>> = log
        .events()
        .filter_map(|env| match env.event {
            GameEvent::GuardAction { target, .. } => Some(target),
            _ => None,
        })
        .collect();
    assert_eq!(guard_targets, vec![Some(Seat(3)), None]);
}

#[test_log::test(tokio::test)]
async fn witch_potions_stay_spent() {
    let mut state = GameState::new(standard_players());
    let mut collector = collector();
    let participants = participants_with(|seat| {
        if seat == Seat(5) {
            Arc::new(
                Scripted::new().on("What do you do", ["poison 0", "poison 1", "poison 1", "poison 1"]),
            ) as Arc<dyn Participant>
        } else {
            Arc::new(crate::tests::common::Defaulting)
        }
    });

    let (store, deaths) = run_night(
        &mut state,
        NightActionStore::default(),
        &mut collector,
        &participants,
        &NoOpValidator,
    )
    .await
    .unwrap();
    assert_eq!(deaths, BTreeMap::from([(Seat(0), DeathCause::Poison)]));
    assert!(store.poison_used);

    // Night 2: the poison options are no longer offered, so the scripted
    // answers fail to parse and the witch passes.
    state.set_day(2);
    let (store, deaths) = run_night(
        &mut state,
        store,
        &mut collector,
        &participants,
        &NoOpValidator,
    )
    .await
    .unwrap();
    assert!(deaths.is_empty());
    assert!(store.poison_used);
}

#[test_log::test(tokio::test)]
async fn day_without_nominations_skips_the_election() {
    let mut state = GameState::new(standard_players());
    let mut collector = collector();
    collector.create_phase_log(Phase::Night); // stand-in for the night

    run_day(
        &mut state,
        &mut collector,
        &defaulting_participants(),
        &BTreeMap::new(),
        &NoOpValidator,
    )
    .await
    .unwrap();

    let log = collector.into_log();
    let day_phase = &log.phases[1];
    let subphases: Vec<SubPhase> = day_phase.subphases.iter().map(|sub| sub.subphase).collect();
    assert_eq!(
        subphases,
        vec![
            SubPhase::Nomination,
            SubPhase::DeathResolution,
            SubPhase::Discussion,
            SubPhase::Voting,
        ]
    );
    assert_eq!(state.sheriff(), None);
}

#[test_log::test(tokio::test)]
async fn banishment_appends_a_resolution_subphase() {
    let mut state = GameState::new(standard_players());
    let mut collector = collector();
    collector.create_phase_log(Phase::Night);
    let participants = participants_with(|_| {
        Arc::new(Scripted::new().on("vote to banish", ["0"])) as Arc<dyn Participant>
    });

    run_day(
        &mut state,
        &mut collector,
        &participants,
        &BTreeMap::new(),
        &NoOpValidator,
    )
    .await
    .unwrap();

    assert!(!state.is_alive(Seat(0)));
    let log = collector.into_log();
    let subphases: Vec<SubPhase> = log.phases[1]
        .subphases
        .iter()
        .map(|sub| sub.subphase)
        .collect();
    assert_eq!(*subphases.last().unwrap(), SubPhase::BanishmentResolution);
}

#[test_log::test(tokio::test)]
async fn sheriff_flow_runs_only_on_day_one() {
    let mut state = GameState::new(standard_players());
    state.set_day(2);
    let mut collector = collector();
    collector.set_day(2);
    collector.create_phase_log(Phase::Night);
    let participants = participants_with(|_| {
        Arc::new(Scripted::new().on("run for sheriff", ["yes"])) as Arc<dyn Participant>
    });

    run_day(
        &mut state,
        &mut collector,
        &participants,
        &BTreeMap::new(),
        &NoOpValidator,
    )
    .await
    .unwrap();

    let log = collector.into_log();
    let subphases: Vec<SubPhase> = log.phases[1]
        .subphases
        .iter()
        .map(|sub| sub.subphase)
        .collect();
    assert!(!subphases.contains(&SubPhase::Nomination));
}
