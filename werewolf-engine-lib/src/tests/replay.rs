use std::sync::Arc;

use werewolf_game_lib::DeathCause;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::GameLog;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SeerResult;

use crate::participant::Participant;
use crate::tests::common::participants_with;
use crate::tests::common::standard_players;
use crate::tests::common::Scripted;
use crate::validate::replay::ReplayValidator;
use crate::validate::rules;
use crate::validate::CollectingValidator;
use crate::GameConfig;
use crate::WerewolfGame;

/// A short scripted game: night-1 werewolf kill on the hunter, who shoots
/// back, then a day-2 banishment. Exercises most event kinds.
async fn played_log() -> GameLog {
    let participants = participants_with(|seat| match seat.0 {
        0 => Arc::new(Scripted::new().on("pack kill", ["7", "none"])) as Arc<dyn Participant>,
        7 => Arc::new(
            Scripted::new()
                .on("final shot", ["11"])
                .on("last words", ["avenge me"]),
        ),
        _ => Arc::new(
            Scripted::new().on("vote to banish", ["none", "1"]),
        ),
    });

    let game = WerewolfGame::with_players(
        GameConfig {
            seed: Some(11),
            max_days: 2,
        },
        standard_players(),
        participants,
    )
    .unwrap();

    let (log, _) = game.run().await.unwrap();
    log
}

#[test_log::test(tokio::test)]
async fn engine_logs_replay_clean() {
    let log = played_log().await;

    let report = ReplayValidator::new(&log).validate();

    assert!(report.is_clean(), "violations: {:?}", report.violations);
}

#[test_log::test(tokio::test)]
async fn replay_agrees_with_the_online_validator() {
    let participants = participants_with(|_| {
        Arc::new(Scripted::new().on("vote to banish", ["0", "1", "2", "3"]))
            as Arc<dyn Participant>
    });
    let validator = Arc::new(CollectingValidator::new());
    let game = WerewolfGame::with_players(
        GameConfig {
            seed: Some(3),
            max_days: 20,
        },
        standard_players(),
        participants,
    )
    .unwrap()
    .with_validator(validator.clone());

    let (log, _) = game.run().await.unwrap();

    let online = validator.report();
    let offline = ReplayValidator::new(&log).validate();
    assert!(online.is_clean(), "online: {:?}", online.violations);
    assert!(offline.is_clean(), "offline: {:?}", offline.violations);
}

#[test_log::test(tokio::test)]
async fn serialization_round_trip_preserves_the_verdict() {
    let log = played_log().await;

    let json = serde_json::to_string(&log).unwrap();
    let back: GameLog = serde_json::from_str(&json).unwrap();

    assert_eq!(back, log);
    assert_eq!(
        ReplayValidator::new(&back).validate(),
        ReplayValidator::new(&log).validate()
    );
}

#[test_log::test(tokio::test)]
async fn a_lying_seer_is_caught() {
    let mut log = played_log().await;

    for phase in &mut log.phases {
        for sub in &mut phase.subphases {
            for envelope in &mut sub.events {
                if let GameEvent::SeerAction { result, .. } = &mut envelope.event {
                    *result = match result {
                        SeerResult::Good => SeerResult::Werewolf,
                        SeerResult::Werewolf => SeerResult::Good,
                    };
                }
            }
        }
    }

    let report = ReplayValidator::new(&log).validate();

    assert!(report.errors().any(|v| v.rule_id == "G.4"), "{report:?}");
}

#[test_log::test(tokio::test)]
async fn a_forged_night_outcome_is_caught() {
    let mut log = played_log().await;

    for phase in &mut log.phases {
        for sub in &mut phase.subphases {
            for envelope in &mut sub.events {
                if let GameEvent::NightOutcome { deaths } = &mut envelope.event {
                    // Pretend the guarded-and-saved world where nobody died.
                    deaths.clear();
                }
            }
        }
    }

    let report = ReplayValidator::new(&log).validate();

    assert!(report.errors().any(|v| v.rule_id == "N.4"), "{report:?}");
}

#[test_log::test(tokio::test)]
async fn out_of_turn_last_words_are_caught() {
    let mut log = played_log().await;

    // The day-2 banishment victim legitimately speaks; a day-2 night death
    // must not. Forge last words onto a kill-cause death past day 1.
    let mut forged = false;
    for phase in &mut log.phases {
        for sub in &mut phase.subphases {
            for envelope in &mut sub.events {
                if let GameEvent::DeathEvent { cause, last_words, .. } = &mut envelope.event {
                    if *cause == DeathCause::Banishment {
                        *cause = DeathCause::WerewolfKill;
                        *last_words = Some("I should not be speaking".to_string());
                        forged = true;
                    }
                }
            }
        }
    }
    assert!(forged, "test setup expected a banishment death to forge");

    let report = ReplayValidator::new(&log).validate();

    assert!(report.errors().any(|v| v.rule_id == "I.4"), "{report:?}");
}

#[test_log::test(tokio::test)]
async fn a_missing_game_over_is_caught() {
    let mut log = played_log().await;
    log.game_over = None;

    let report = ReplayValidator::new(&log).validate();

    assert!(report.errors().any(|v| v.rule_id == "N.5"), "{report:?}");
}

#[test_log::test(tokio::test)]
async fn a_rigged_banishment_is_caught() {
    let mut log = played_log().await;

    for phase in &mut log.phases {
        for sub in &mut phase.subphases {
            for envelope in &mut sub.events {
                if let GameEvent::Banishment { banished, .. } = &mut envelope.event {
                    if banished.is_some() {
                        // Point the outcome at someone the ballots did not pick.
                        *banished = Some(Seat(4));
                    }
                }
            }
        }
    }

    let report = ReplayValidator::new(&log).validate();

    assert!(report.errors().any(|v| v.rule_id == "J.2"), "{report:?}");
}

#[test_log::test(tokio::test)]
async fn a_scrambled_phase_order_is_caught() {
    let mut log = played_log().await;
    log.phases.swap(0, 1);

    let report = ReplayValidator::new(&log).validate();

    assert!(
        report.errors().any(|v| v.rule_id == "C.1" || v.rule_id == "C.2"),
        "{report:?}"
    );
}

#[test]
fn banishment_death_rules_snapshot() {
    let violations = rules::check_banishment_death(Seat(3), None);

    insta::assert_json_snapshot!(violations, @r###"
    [
      {
        "rule_id": "C.14",
        "category": "PhaseOrder",
        "message": "banishment resolution killed seat 3 although nobody was banished",
        "severity": "Error"
      }
    ]
    "###);
}
