//! Runtime validation hooks and the shared rule registry.
//!
//! A [`Validator`] is injected per game. Production passes [`NoOpValidator`]
//! (every hook is a default empty method, so the calls melt away);
//! tests and debugging use [`CollectingValidator`], which records
//! [`Violation`]s and never raises. The same rule functions power the
//! post-game [`ReplayValidator`](replay::ReplayValidator), which rebuilds
//! state from a finished log and checks the rules independently.

pub mod replay;
pub mod rules;

use std::fmt::Display;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;

use werewolf_game_lib::Camp;
use werewolf_game_lib::EventEnvelope;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::Phase;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SubPhase;

use crate::collector::EventCollector;
use crate::state::GameState;

/// How bad a violation is. `Error` means a rule was broken; `Warning` marks
/// tolerated-but-suspicious behavior (e.g. a dead seat nominating itself).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// The rule groups of the registry.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub enum RuleCategory {
    Victory,
    Initialization,
    PhaseOrder,
    NightWerewolf,
    NightWitch,
    NightGuard,
    NightSeer,
    Sheriff,
    Death,
    Voting,
    Hunter,
    Badge,
    StateConsistency,
    EventLogging,
}

/// A single detected rule breach. Violations are collected, never thrown;
/// the game always plays on.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Violation {
    pub rule_id: &'static str,
    pub category: RuleCategory,
    pub message: String,
    pub severity: Severity,
}

impl Violation {
    pub fn error(rule_id: &'static str, category: RuleCategory, message: impl Into<String>) -> Self {
        Violation {
            rule_id,
            category,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(
        rule_id: &'static str,
        category: RuleCategory,
        message: impl Into<String>,
    ) -> Self {
        Violation {
            rule_id,
            category,
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}: {}", self.severity, self.rule_id, self.message)
    }
}

/// The violations found by a validation pass.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
    }

    /// True when no error-severity violation was found.
    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }
}

/// Hooks invoked at every lifecycle boundary of a game.
///
/// Hooks may suspend but must not block; they observe, they never steer.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn on_game_start(&self, _state: &GameState, _collector: &EventCollector) {}

    async fn on_phase_start(&self, _phase: Phase, _day: u32, _state: &GameState) {}

    async fn on_phase_end(
        &self,
        _phase: Phase,
        _day: u32,
        _state: &GameState,
        _collector: &EventCollector,
    ) {
    }

    async fn on_subphase_start(&self, _subphase: SubPhase, _day: u32, _state: &GameState) {}

    async fn on_subphase_end(
        &self,
        _subphase: SubPhase,
        _day: u32,
        _phase: Phase,
        _state: &GameState,
        _collector: &EventCollector,
    ) {
    }

    async fn on_event_applied(&self, _envelope: &EventEnvelope, _state: &GameState) {}

    async fn on_death_chain_complete(&self, _deaths: &[Seat], _state: &GameState) {}

    async fn on_victory_check(&self, _state: &GameState, _over: bool, _winner: Option<Camp>) {}

    async fn on_game_over(
        &self,
        _winner: Option<Camp>,
        _state: &GameState,
        _collector: &EventCollector,
    ) {
    }
}

/// Zero-overhead pass-through for production.
#[derive(Debug, Default)]
pub struct NoOpValidator;

#[async_trait]
impl Validator for NoOpValidator {}

/// Mirror of the hidden night/sheriff bookkeeping the collecting validator
/// needs to judge events it sees one at a time.
#[derive(Debug, Default)]
struct Collected {
    violations: Vec<Violation>,
    antidote_used: bool,
    poison_used: bool,
    /// Guard target of the last completed night.
    prev_guard_target: Option<Seat>,
    /// Guard target seen in the night currently running.
    guard_target_tonight: Option<Seat>,
    elections_seen: u32,
    /// Who we believe holds the badge, updated from observed events.
    sheriff: Option<Seat>,
    /// Ballots of the voting subphase currently running.
    ballots: Vec<(Seat, Option<Seat>)>,
    /// Subphases completed in the phase currently running.
    subphases: Vec<SubPhase>,
    /// Every phase boundary seen so far.
    phases: Vec<(Phase, u32)>,
}

/// Records `{rule_id, category, message, severity}` violations for
/// inspection; never raises.
#[derive(Debug, Default)]
pub struct CollectingValidator {
    inner: Mutex<Collected>,
}

impl CollectingValidator {
    pub fn new() -> Self {
        CollectingValidator::default()
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            violations: self.inner.lock().expect("validator lock").violations.clone(),
        }
    }

    pub fn violations(&self) -> Vec<Violation> {
        self.inner.lock().expect("validator lock").violations.clone()
    }
}

#[async_trait]
impl Validator for CollectingValidator {
    async fn on_game_start(&self, state: &GameState, _collector: &EventCollector) {
        let mut inner = self.inner.lock().expect("validator lock");
        inner.violations.extend(rules::check_initial_state(state));
    }

    async fn on_phase_start(&self, phase: Phase, day: u32, _state: &GameState) {
        let mut inner = self.inner.lock().expect("validator lock");
        inner.phases.push((phase, day));
        inner.subphases.clear();
    }

    async fn on_phase_end(
        &self,
        phase: Phase,
        day: u32,
        _state: &GameState,
        _collector: &EventCollector,
    ) {
        let mut inner = self.inner.lock().expect("validator lock");

        let subphases = std::mem::take(&mut inner.subphases);
        match phase {
            Phase::Night => {
                inner
                    .violations
                    .extend(rules::check_night_subphase_order(&subphases));
                inner.prev_guard_target = inner.guard_target_tonight.take();
            }
            Phase::Day => {
                inner
                    .violations
                    .extend(rules::check_day_subphase_order(&subphases, day));
            }
        }
    }

    async fn on_subphase_end(
        &self,
        subphase: SubPhase,
        _day: u32,
        _phase: Phase,
        _state: &GameState,
        _collector: &EventCollector,
    ) {
        let mut inner = self.inner.lock().expect("validator lock");
        inner.subphases.push(subphase);
    }

    async fn on_event_applied(&self, envelope: &EventEnvelope, state: &GameState) {
        let mut inner = self.inner.lock().expect("validator lock");

        match &envelope.event {
            GameEvent::WerewolfKill { actor, target } => {
                inner
                    .violations
                    .extend(rules::check_werewolf_action(*actor, *target, state));
            }
            GameEvent::WitchAction { actor, kind, target } => {
                let (antidote_used, poison_used) = (inner.antidote_used, inner.poison_used);
                inner.violations.extend(rules::check_witch_action(
                    *actor,
                    *kind,
                    *target,
                    state,
                    antidote_used,
                    poison_used,
                ));
                match kind {
                    werewolf_game_lib::WitchActionKind::Antidote => inner.antidote_used = true,
                    werewolf_game_lib::WitchActionKind::Poison => inner.poison_used = true,
                    werewolf_game_lib::WitchActionKind::Pass => {}
                }
            }
            GameEvent::GuardAction { actor, target } => {
                let prev = inner.prev_guard_target;
                inner
                    .violations
                    .extend(rules::check_guard_action(*actor, *target, state, prev));
                inner.guard_target_tonight = *target;
            }
            GameEvent::SeerAction { actor, target, result } => {
                inner
                    .violations
                    .extend(rules::check_seer_action(*actor, *target, *result, state));
            }
            GameEvent::SheriffNomination { actor, running } => {
                inner
                    .violations
                    .extend(rules::check_nomination(*actor, *running, state));
            }
            GameEvent::SheriffOutcome { candidates, votes, winner } => {
                let elections_seen = inner.elections_seen;
                inner.violations.extend(rules::check_sheriff_outcome(
                    candidates,
                    votes,
                    *winner,
                    envelope.day,
                    elections_seen,
                    state,
                ));
                inner.elections_seen += 1;
                if winner.is_some() {
                    inner.sheriff = *winner;
                }
            }
            GameEvent::Vote { actor, target } => {
                inner
                    .violations
                    .extend(rules::check_vote(*actor, *target, state));
                inner.ballots.push((*actor, *target));
            }
            GameEvent::Banishment { votes, tied_players, banished } => {
                let ballots = std::mem::take(&mut inner.ballots);
                let sheriff = inner.sheriff;
                inner.violations.extend(rules::check_banishment(
                    &ballots,
                    sheriff,
                    votes,
                    tied_players,
                    *banished,
                ));
            }
            GameEvent::DeathEvent {
                actor,
                cause,
                last_words,
                hunter_shoot_target,
                badge_transfer_to,
            } => {
                let sheriff = inner.sheriff;
                inner.violations.extend(rules::check_death_event(
                    *actor,
                    *cause,
                    last_words.as_deref(),
                    *hunter_shoot_target,
                    *badge_transfer_to,
                    envelope.day,
                    sheriff,
                    state,
                ));

                // Track where the badge went.
                if let Some(to) = badge_transfer_to {
                    inner.sheriff = Some(*to);
                } else if inner.sheriff == Some(*actor) {
                    inner.sheriff = None;
                }
                if inner.sheriff.is_some() && *hunter_shoot_target == inner.sheriff {
                    inner.sheriff = None;
                }
            }
            GameEvent::NightOutcome { .. }
            | GameEvent::Speech { .. }
            | GameEvent::SheriffOptOut { .. }
            | GameEvent::GameStart { .. }
            | GameEvent::GameOver { .. } => {}
        }

        inner
            .violations
            .extend(rules::check_state_consistency(state));
    }

    async fn on_victory_check(&self, state: &GameState, over: bool, winner: Option<Camp>) {
        let mut inner = self.inner.lock().expect("validator lock");
        inner
            .violations
            .extend(rules::check_victory_claim(state, over, winner));
        // A sheriff killed overnight legitimately holds the badge until the
        // day's death resolution, so the aliveness rule only applies after a
        // day phase.
        if inner.phases.last().map(|(kind, _)| *kind) == Some(Phase::Day) {
            inner.violations.extend(rules::check_sheriff_alive(state));
        }
    }

    async fn on_game_over(
        &self,
        winner: Option<Camp>,
        state: &GameState,
        _collector: &EventCollector,
    ) {
        let mut inner = self.inner.lock().expect("validator lock");
        let phases = inner.phases.clone();
        inner.violations.extend(rules::check_phase_sequence(&phases));
        inner
            .violations
            .extend(rules::check_victory_claim(state, true, winner));
    }
}
