use std::collections::BTreeMap;

use werewolf_game_lib::EventEnvelope;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::Phase;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SubPhase;
use werewolf_game_lib::SubPhaseLog;

use crate::collector::EventCollector;
use crate::error::EngineError;

fn night_outcome_envelope(day: u32) -> EventEnvelope {
    EventEnvelope {
        day,
        phase: Phase::Night,
        subphase: SubPhase::NightResolution,
        event: GameEvent::NightOutcome {
            deaths: BTreeMap::new(),
        },
    }
}

#[test]
fn events_require_an_open_phase() {
    let mut collector = EventCollector::new();

    assert!(matches!(
        collector.add_event(night_outcome_envelope(1)),
        Err(EngineError::NoOpenPhase)
    ));
    assert!(matches!(
        collector.add_subphase_log(SubPhaseLog::new(SubPhase::Voting)),
        Err(EngineError::NoOpenPhase)
    ));
}

#[test]
fn phases_are_numbered_by_day() {
    let mut collector = EventCollector::new();

    collector.set_day(1);
    collector.create_phase_log(Phase::Night);
    collector.create_phase_log(Phase::Day);
    collector.set_day(2);
    collector.create_phase_log(Phase::Night);

    let log = collector.into_log();
    let markers: Vec<(Phase, u32)> =
        log.phases.iter().map(|p| (p.kind, p.number)).collect();
    assert_eq!(
        markers,
        vec![(Phase::Night, 1), (Phase::Day, 1), (Phase::Night, 2)]
    );
}

#[test]
fn subphase_logs_merge_in_order() {
    let mut collector = EventCollector::new();
    collector.create_phase_log(Phase::Night);

    let mut werewolf = SubPhaseLog::new(SubPhase::WerewolfAction);
    werewolf.push(
        1,
        GameEvent::WerewolfKill {
            actor: Seat(0),
            target: Some(Seat(8)),
        },
    );
    collector.add_subphase_log(werewolf).unwrap();
    collector
        .add_subphase_log(SubPhaseLog::new(SubPhase::WitchAction))
        .unwrap();
    collector.add_event(night_outcome_envelope(1)).unwrap();

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
            SubPhase::NightResolution,
        ]
    );
    // The empty witch subphase stays in the log; an absent acting role is an
    // empty entry, never a missing one.
    assert!(log.phases[0].subphases[1].events.is_empty());
}

#[test]
fn later_events_land_in_the_open_phase_only() {
    let mut collector = EventCollector::new();

    collector.create_phase_log(Phase::Night);
    collector.add_event(night_outcome_envelope(1)).unwrap();
    collector.create_phase_log(Phase::Day);
    collector.set_day(2);
    collector.create_phase_log(Phase::Night);
    collector.add_event(night_outcome_envelope(2)).unwrap();

    let log = collector.into_log();
    // The first night kept exactly what it had when it was closed.
    assert_eq!(log.phases[0].subphases.len(), 1);
    assert_eq!(log.phases[1].subphases.len(), 0);
    assert_eq!(log.phases[2].subphases.len(), 1);
}

#[test]
fn game_start_carries_the_role_deal() {
    let mut collector = EventCollector::new();
    let roles = BTreeMap::from([(Seat(0), werewolf_game_lib::Role::Werewolf)]);

    collector.set_game_start(GameEvent::GameStart {
        player_count: 12,
        roles_secret: roles.clone(),
    });

    assert_eq!(collector.log().roles_secret, roles);
}

#[test]
fn consecutive_same_subphase_events_share_one_log() {
    let mut collector = EventCollector::new();
    collector.create_phase_log(Phase::Night);

    collector.add_event(night_outcome_envelope(1)).unwrap();
    collector.add_event(night_outcome_envelope(1)).unwrap();

    let log = collector.into_log();
    assert_eq!(log.phases[0].subphases.len(), 1);
    assert_eq!(log.phases[0].subphases[0].events.len(), 2);
}
