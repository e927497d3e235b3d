//! Shared fixtures: a fixed role layout, scripted participants, and the
//! log-invariant assertions every end-to-end test runs.

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use werewolf_game_lib::all_seats;
use werewolf_game_lib::ChoiceSpec;
use werewolf_game_lib::DeathCause;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::GameLog;
use werewolf_game_lib::Phase;
use werewolf_game_lib::Player;
use werewolf_game_lib::Role;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SeerResult;
use werewolf_game_lib::SubPhase;

use crate::error::ParticipantError;
use crate::participant::Participant;
use crate::participant::Participants;

/// Fixed layout used across tests: seats 0-3 werewolves, 4 seer, 5 witch,
/// 6 guard, 7 hunter, 8-11 ordinary villagers.
pub(crate) fn standard_players() -> BTreeMap<Seat, Player> {
    let role_for = |seat: Seat| match seat.0 {
        0..=3 => Role::Werewolf,
        4 => Role::Seer,
        5 => Role::Witch,
        6 => Role::Guard,
        7 => Role::Hunter,
        _ => Role::Villager,
    };

    all_seats()
        .map(|seat| (seat, Player::new(seat, role_for(seat))))
        .collect()
}

/// Participant that never answers, so every query runs to its default.
pub(crate) struct Defaulting;

#[async_trait]
impl Participant for Defaulting {
    async fn decide(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _hint: Option<&str>,
        _choices: Option<&ChoiceSpec>,
    ) -> Result<String, ParticipantError> {
        Err(ParticipantError("unscripted".to_string()))
    }
}

/// Keyword-scripted participant. The first rule whose keyword occurs in the
/// decision prompt pops its next canned answer; anything unscripted errors,
/// which sends the handler to the subphase default.
pub(crate) struct Scripted {
    rules: Mutex<Vec<(String, VecDeque<String>)>>,
}

impl Scripted {
    pub(crate) fn new() -> Self {
        Scripted {
            rules: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn on<const N: usize>(self, keyword: &str, answers: [&str; N]) -> Self {
        self.rules.lock().unwrap().push((
            keyword.to_string(),
            answers.iter().map(|a| a.to_string()).collect(),
        ));
        self
    }
}

#[async_trait]
impl Participant for Scripted {
    async fn decide(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _hint: Option<&str>,
        choices: Option<&ChoiceSpec>,
    ) -> Result<String, ParticipantError> {
        let prompt = choices.map(|spec| spec.prompt.as_str()).unwrap_or(user_prompt);

        let mut rules = self.rules.lock().unwrap();
        for (keyword, answers) in rules.iter_mut() {
            if prompt.contains(keyword.as_str()) {
                return answers
                    .pop_front()
                    .ok_or_else(|| ParticipantError(format!("script for '{keyword}' ran dry")));
            }
        }

        Err(ParticipantError(format!("no script matches '{prompt}'")))
    }
}

/// Twelve defaulting participants.
pub(crate) fn defaulting_participants() -> Participants {
    all_seats()
        .map(|seat| (seat, Arc::new(Defaulting) as Arc<dyn Participant>))
        .collect()
}

/// Builds a participant table from a per-seat constructor.
pub(crate) fn participants_with(
    mut build: impl FnMut(Seat) -> Arc<dyn Participant>,
) -> Participants {
    all_seats().map(|seat| (seat, build(seat))).collect()
}

/// The universal log invariants: phase alternation, night subphase order,
/// envelope stamps, poison silencing the hunter, guard non-repetition, seer
/// truthfulness, and the single day-1 election.
pub(crate) fn assert_log_invariants(log: &GameLog) {
    // Night 1 opens, then Night(k) Day(k) Night(k+1) ... strictly.
    let markers: Vec<(Phase, u32)> = log
        .phases
        .iter()
        .map(|phase| (phase.kind, phase.number))
        .collect();
    assert_eq!(markers.first(), Some(&(Phase::Night, 1)), "game must open with Night 1");
    for pair in markers.windows(2) {
        match pair[0] {
            (Phase::Night, n) => assert_eq!(pair[1], (Phase::Day, n)),
            (Phase::Day, n) => assert_eq!(pair[1], (Phase::Night, n + 1)),
        }
    }

    for phase in &log.phases {
        if phase.kind == Phase::Night {
            let subphases: Vec<SubPhase> =
                phase.subphases.iter().map(|sub| sub.subphase).collect();
            assert_eq!(
                subphases,
                vec![
                    SubPhase::WerewolfAction,
                    SubPhase::WitchAction,
                    SubPhase::GuardAction,
                    SubPhase::SeerAction,
                    SubPhase::NightResolution,
                ],
                "night {} subphases out of order",
                phase.number
            );
        }

        for sub in &phase.subphases {
            for envelope in &sub.events {
                assert_eq!(envelope.day, phase.number);
                assert_eq!(envelope.phase, phase.kind);
                assert_eq!(envelope.subphase, sub.subphase);
            }
        }
    }

    let mut prev_guard_target: Option<Seat> = None;
    let mut elections = 0;
    for envelope in log.events() {
        match &envelope.event {
            GameEvent::DeathEvent {
                cause: DeathCause::Poison,
                hunter_shoot_target,
                ..
            } => {
                assert_eq!(
                    *hunter_shoot_target, None,
                    "a poisoned hunter may not shoot"
                );
            }
            GameEvent::GuardAction { target, .. } => {
                if target.is_some() {
                    assert_ne!(*target, prev_guard_target, "guard repeated a target");
                }
                prev_guard_target = *target;
            }
            GameEvent::SeerAction { target, result, .. } => {
                let expected = if log.roles_secret.get(target) == Some(&Role::Werewolf) {
                    SeerResult::Werewolf
                } else {
                    SeerResult::Good
                };
                assert_eq!(*result, expected, "seer lied about seat {target}");
            }
            GameEvent::SheriffOutcome { .. } => {
                elections += 1;
                assert_eq!(envelope.day, 1, "election outside day 1");
            }
            _ => {}
        }
    }
    assert!(elections <= 1, "more than one sheriff election");
}

/// Finds the first event matching the predicate.
pub(crate) fn find_event<'a>(
    log: &'a GameLog,
    mut predicate: impl FnMut(&GameEvent) -> bool,
) -> Option<&'a GameEvent> {
    log.events()
        .map(|envelope| &envelope.event)
        .find(|event| predicate(event))
}
