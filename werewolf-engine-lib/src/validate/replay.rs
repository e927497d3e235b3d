//! Post-game validation: rebuilds the game from a finished log and checks
//! the same rule registry the online validator uses, with no access to the
//! live engine.
//!
//! Because the log records the private night actions, the replay can also
//! re-run the night resolution and confirm the logged outcome — the one
//! family of checks the online validator takes on trust.

use std::collections::BTreeMap;

use werewolf_game_lib::GameEvent;
use werewolf_game_lib::GameLog;
use werewolf_game_lib::Phase;
use werewolf_game_lib::PhaseLog;
use werewolf_game_lib::Player;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SubPhase;

use crate::resolver;
use crate::state::GameState;
use crate::store::NightActionStore;

use super::rules;
use super::RuleCategory;
use super::ValidationReport;
use super::Violation;

/// Replays a completed [`GameLog`] and reports every rule violation found.
pub struct ReplayValidator<'a> {
    log: &'a GameLog,
}

impl<'a> ReplayValidator<'a> {
    pub fn new(log: &'a GameLog) -> Self {
        ReplayValidator { log }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut violations = Vec::new();

        if self.log.roles_secret.is_empty() {
            violations.push(Violation::error(
                "B.1",
                RuleCategory::Initialization,
                "log carries no role deal; nothing can be replayed",
            ));
            return ValidationReport { violations };
        }

        if self.log.player_count != self.log.roles_secret.len() {
            violations.push(Violation::error(
                "B.1",
                RuleCategory::Initialization,
                format!(
                    "log says {} players but deals {} roles",
                    self.log.player_count,
                    self.log.roles_secret.len()
                ),
            ));
        }

        let players: BTreeMap<Seat, Player> = self
            .log
            .roles_secret
            .iter()
            .map(|(seat, role)| (*seat, Player::new(*seat, *role)))
            .collect();

        let mut replay = Replay {
            state: GameState::new(players),
            violations,
            prev_guard_target: None,
            antidote_used: false,
            poison_used: false,
            elections_seen: 0,
        };

        replay
            .violations
            .extend(rules::check_initial_state(&replay.state));

        let phase_markers: Vec<(Phase, u32)> = self
            .log
            .phases
            .iter()
            .map(|phase| (phase.kind, phase.number))
            .collect();
        replay
            .violations
            .extend(rules::check_phase_sequence(&phase_markers));

        for phase in &self.log.phases {
            replay.walk_phase(phase);
        }

        replay.finish(self.log);

        ValidationReport {
            violations: replay.violations,
        }
    }
}

struct Replay {
    state: GameState,
    violations: Vec<Violation>,
    prev_guard_target: Option<Seat>,
    antidote_used: bool,
    poison_used: bool,
    elections_seen: u32,
}

impl Replay {
    fn walk_phase(&mut self, phase: &PhaseLog) {
        self.state.set_day(phase.number);

        let subphases: Vec<SubPhase> = phase.subphases.iter().map(|sub| sub.subphase).collect();
        match phase.kind {
            Phase::Night => {
                self.violations
                    .extend(rules::check_night_subphase_order(&subphases));
                self.walk_night(phase);
            }
            Phase::Day => {
                self.violations
                    .extend(rules::check_day_subphase_order(&subphases, phase.number));
                self.walk_day(phase);
                // Any badge movement for the day's deaths is settled by now.
                self.violations
                    .extend(rules::check_sheriff_alive(&self.state));
            }
        }

        self.violations
            .extend(rules::check_state_consistency(&self.state));
    }

    fn walk_night(&mut self, phase: &PhaseLog) {
        let mut store = NightActionStore {
            antidote_used: self.antidote_used,
            poison_used: self.poison_used,
            prev_guard_target: self.prev_guard_target,
            ..NightActionStore::default()
        };
        let mut kill_events = 0;

        for sub in &phase.subphases {
            for envelope in &sub.events {
                self.violations.extend(rules::check_event_envelope(
                    envelope,
                    phase.kind,
                    phase.number,
                    sub.subphase,
                ));

                match &envelope.event {
                    GameEvent::WerewolfKill { actor, target } => {
                        kill_events += 1;
                        self.violations
                            .extend(rules::check_werewolf_action(*actor, *target, &self.state));
                        store.kill_target = *target;
                    }
                    GameEvent::WitchAction { actor, kind, target } => {
                        self.violations.extend(rules::check_witch_action(
                            *actor,
                            *kind,
                            *target,
                            &self.state,
                            self.antidote_used,
                            self.poison_used,
                        ));
                        match kind {
                            werewolf_game_lib::WitchActionKind::Antidote => {
                                store.antidote_target = *target;
                                self.antidote_used = true;
                            }
                            werewolf_game_lib::WitchActionKind::Poison => {
                                store.poison_target = *target;
                                self.poison_used = true;
                            }
                            werewolf_game_lib::WitchActionKind::Pass => {}
                        }
                    }
                    GameEvent::GuardAction { actor, target } => {
                        self.violations.extend(rules::check_guard_action(
                            *actor,
                            *target,
                            &self.state,
                            self.prev_guard_target,
                        ));
                        store.guard_target = *target;
                    }
                    GameEvent::SeerAction { actor, target, result } => {
                        self.violations.extend(rules::check_seer_action(
                            *actor,
                            *target,
                            *result,
                            &self.state,
                        ));
                    }
                    GameEvent::NightOutcome { deaths } => {
                        let expected = resolver::resolve(&self.state, &store);
                        self.violations
                            .extend(rules::check_night_outcome(deaths, &expected));
                        self.state.apply_night_deaths(deaths);
                    }
                    other => {
                        self.violations.push(Violation::error(
                            "N.2",
                            RuleCategory::EventLogging,
                            format!("day event {other:?} recorded inside a night phase"),
                        ));
                    }
                }
            }
        }

        self.violations
            .extend(rules::check_werewolf_single_query(kill_events));
        self.prev_guard_target = store.guard_target;
    }

    fn walk_day(&mut self, phase: &PhaseLog) {
        let mut ballots: Vec<(Seat, Option<Seat>)> = Vec::new();
        let mut banished: Option<Seat> = None;

        for sub in &phase.subphases {
            for envelope in &sub.events {
                self.violations.extend(rules::check_event_envelope(
                    envelope,
                    phase.kind,
                    phase.number,
                    sub.subphase,
                ));

                match &envelope.event {
                    GameEvent::SheriffNomination { actor, running } => {
                        self.violations
                            .extend(rules::check_nomination(*actor, *running, &self.state));
                    }
                    GameEvent::Speech { .. } | GameEvent::SheriffOptOut { .. } => {}
                    GameEvent::SheriffOutcome { candidates, votes, winner } => {
                        self.violations.extend(rules::check_sheriff_outcome(
                            candidates,
                            votes,
                            *winner,
                            envelope.day,
                            self.elections_seen,
                            &self.state,
                        ));
                        self.elections_seen += 1;
                        if let Some(winner) = winner {
                            self.state.elect_sheriff(*winner);
                        }
                    }
                    GameEvent::Vote { actor, target } => {
                        self.violations
                            .extend(rules::check_vote(*actor, *target, &self.state));
                        ballots.push((*actor, *target));
                    }
                    GameEvent::Banishment {
                        votes,
                        tied_players,
                        banished: outcome,
                    } => {
                        self.violations.extend(rules::check_banishment(
                            &ballots,
                            self.state.sheriff(),
                            votes,
                            tied_players,
                            *outcome,
                        ));
                        ballots.clear();
                        banished = *outcome;
                    }
                    GameEvent::DeathEvent {
                        actor,
                        cause,
                        last_words,
                        hunter_shoot_target,
                        badge_transfer_to,
                    } => {
                        if sub.subphase == SubPhase::BanishmentResolution {
                            self.violations
                                .extend(rules::check_banishment_death(*actor, banished));
                        }

                        self.violations.extend(rules::check_death_event(
                            *actor,
                            *cause,
                            last_words.as_deref(),
                            *hunter_shoot_target,
                            *badge_transfer_to,
                            envelope.day,
                            self.state.sheriff(),
                            &self.state,
                        ));

                        // Pre-apply aliveness checks the online validator
                        // cannot make.
                        if let Some(target) = hunter_shoot_target {
                            if !self.state.is_alive(*target) {
                                self.violations.push(Violation::error(
                                    "K.2",
                                    RuleCategory::Hunter,
                                    format!("the hunter shot dead seat {target}"),
                                ));
                            }
                        }
                        if let Some(to) = badge_transfer_to {
                            if !self.state.is_alive(*to) {
                                self.violations.push(Violation::error(
                                    "L.3",
                                    RuleCategory::Badge,
                                    format!("the badge was transferred to dead seat {to}"),
                                ));
                            }
                        }

                        self.state
                            .apply_events(std::slice::from_ref(envelope));
                    }
                    other => {
                        self.violations.push(Violation::error(
                            "N.2",
                            RuleCategory::EventLogging,
                            format!("night event {other:?} recorded inside a day phase"),
                        ));
                    }
                }
            }
        }
    }

    fn finish(&mut self, log: &GameLog) {
        match &log.game_over {
            Some(GameEvent::GameOver { winner, condition, .. }) => {
                self.violations
                    .extend(rules::check_victory_claim(&self.state, true, *winner));

                let expected = self.state.victory_condition(*winner);
                // An unresolved max-day board also records Tie, so only a
                // decided game pins the condition down.
                if *condition != expected && winner.is_some() {
                    self.violations.push(Violation::error(
                        "A.4",
                        RuleCategory::Victory,
                        format!(
                            "recorded victory condition {condition:?} does not match the final \
                             board ({expected:?})"
                        ),
                    ));
                }
            }
            Some(other) => {
                self.violations.push(Violation::error(
                    "N.5",
                    RuleCategory::EventLogging,
                    format!("game_over slot holds a non-GameOver event: {other:?}"),
                ));
            }
            None => {
                self.violations.push(Violation::error(
                    "N.5",
                    RuleCategory::EventLogging,
                    "log has no game_over record",
                ));
            }
        }
    }
}
