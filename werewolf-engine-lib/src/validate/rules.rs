//! The rule registry: pure checks shared by the online validator and the
//! post-game replay.
//!
//! Groups: A victory, B initialization, C phase order, D werewolf, E witch,
//! F guard, G seer, H sheriff, I death, J voting, K hunter, L badge,
//! M state consistency, N event logging. Every function returns the
//! violations it found and mutates nothing.

use std::collections::BTreeMap;

use werewolf_game_lib::Camp;
use werewolf_game_lib::DeathCause;
use werewolf_game_lib::EventEnvelope;
use werewolf_game_lib::Phase;
use werewolf_game_lib::Role;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SeerResult;
use werewolf_game_lib::SubPhase;
use werewolf_game_lib::WitchActionKind;
use werewolf_game_lib::SEAT_COUNT;
use werewolf_game_lib::STANDARD_TWELVE_PLAYER_ROLES;

use crate::state::GameState;

use super::RuleCategory;
use super::Violation;

/// Longest game the rules allow (C.15).
pub const MAX_GAME_DAYS: u32 = 20;

// ---------------------------------------------------------------------------
// A: victory
// ---------------------------------------------------------------------------

/// A.1–A.5: the declared result must match what the board actually shows.
pub fn check_victory_claim(
    state: &GameState,
    declared_over: bool,
    declared_winner: Option<Camp>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let werewolf_condition = state.living_villager_count() == 0 || state.living_god_count() == 0;
    let villager_condition = state.living_werewolf_count() == 0;
    let over = werewolf_condition || villager_condition;

    if over && !declared_over {
        violations.push(Violation::error(
            "A.1",
            RuleCategory::Victory,
            "a victory condition is met but the game was not declared over",
        ));
    }

    if !declared_over {
        return violations;
    }

    let expected = match (werewolf_condition, villager_condition) {
        (true, true) => None,
        (true, false) => Some(Camp::Werewolf),
        (false, true) => Some(Camp::Villager),
        (false, false) => {
            // Only legal at the max-day cutoff, where an unresolved board is
            // recorded as a tie.
            if declared_winner.is_some() {
                violations.push(Violation::error(
                    "A.1",
                    RuleCategory::Victory,
                    format!(
                        "winner {declared_winner:?} declared while no victory condition is met"
                    ),
                ));
            }
            return violations;
        }
    };

    if declared_winner != expected {
        let (rule_id, message) = match expected {
            Some(Camp::Villager) => (
                "A.2",
                format!("all werewolves are dead, so villagers win, not {declared_winner:?}"),
            ),
            Some(Camp::Werewolf) => (
                "A.3",
                format!(
                    "all ordinary villagers or all gods are dead, so werewolves win, not {declared_winner:?}"
                ),
            ),
            None => (
                "A.5",
                format!("both victory conditions hold, so the game is a tie, not {declared_winner:?}"),
            ),
        };
        violations.push(Violation::error(rule_id, RuleCategory::Victory, message));
    }

    violations
}

// ---------------------------------------------------------------------------
// B: initialization
// ---------------------------------------------------------------------------

/// B.1–B.4: twelve seats, the standard role multiset, everyone alive, no
/// sheriff.
pub fn check_initial_state(state: &GameState) -> Vec<Violation> {
    let mut violations = Vec::new();

    if state.players().len() != SEAT_COUNT {
        violations.push(Violation::error(
            "B.1",
            RuleCategory::Initialization,
            format!("expected {SEAT_COUNT} seats, found {}", state.players().len()),
        ));
    }

    let mut expected: BTreeMap<Role, usize> = BTreeMap::new();
    for role in STANDARD_TWELVE_PLAYER_ROLES {
        *expected.entry(role).or_insert(0) += 1;
    }
    let mut actual: BTreeMap<Role, usize> = BTreeMap::new();
    for player in state.players().values() {
        *actual.entry(player.role).or_insert(0) += 1;
    }
    if actual != expected {
        violations.push(Violation::error(
            "B.2",
            RuleCategory::Initialization,
            format!("role counts {actual:?} do not match the standard configuration"),
        ));
    }

    if !state.dead().is_empty() || state.players().values().any(|p| !p.alive) {
        violations.push(Violation::error(
            "B.3",
            RuleCategory::Initialization,
            "every seat must start the game alive",
        ));
    }

    if state.sheriff().is_some() {
        violations.push(Violation::error(
            "B.4",
            RuleCategory::Initialization,
            "no seat may start the game holding the badge",
        ));
    }

    violations
}

// ---------------------------------------------------------------------------
// C: phase and subphase order
// ---------------------------------------------------------------------------

/// C.1–C.3, C.15: phases start at Night 1, alternate Night(k) Day(k)
/// Night(k+1), and never run past the max-day bound.
pub fn check_phase_sequence(phases: &[(Phase, u32)]) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(&(kind, number)) = phases.first() {
        if kind != Phase::Night || number != 1 {
            violations.push(Violation::error(
                "C.1",
                RuleCategory::PhaseOrder,
                format!("the game must open with Night 1, found {kind:?} {number}"),
            ));
        }
    }

    for pair in phases.windows(2) {
        let ((prev_kind, prev_number), (kind, number)) = (pair[0], pair[1]);
        let ok = match prev_kind {
            Phase::Night => kind == Phase::Day && number == prev_number,
            Phase::Day => kind == Phase::Night && number == prev_number + 1,
        };
        if !ok {
            violations.push(Violation::error(
                "C.2",
                RuleCategory::PhaseOrder,
                format!(
                    "{prev_kind:?} {prev_number} may not be followed by {kind:?} {number}"
                ),
            ));
        }
    }

    if let Some(&(_, number)) = phases.last() {
        if number > MAX_GAME_DAYS {
            violations.push(Violation::error(
                "C.15",
                RuleCategory::PhaseOrder,
                format!("the game ran to day {number}, past the {MAX_GAME_DAYS}-day bound"),
            ));
        }
    }

    violations
}

/// C.4: the night subphases run in exactly one order, none skipped.
pub fn check_night_subphase_order(subphases: &[SubPhase]) -> Vec<Violation> {
    const EXPECTED: [SubPhase; 5] = [
        SubPhase::WerewolfAction,
        SubPhase::WitchAction,
        SubPhase::GuardAction,
        SubPhase::SeerAction,
        SubPhase::NightResolution,
    ];

    if subphases == &EXPECTED[..] {
        Vec::new()
    } else {
        vec![Violation::error(
            "C.4",
            RuleCategory::PhaseOrder,
            format!("night subphases ran as {subphases:?}, expected {EXPECTED:?}"),
        )]
    }
}

/// C.5–C.14: the day's skeleton, including the Day-1 sheriff flow ordering
/// and the banishment-resolution tail.
pub fn check_day_subphase_order(subphases: &[SubPhase], day: u32) -> Vec<Violation> {
    let mut violations = Vec::new();

    let sheriff_flow: Vec<SubPhase> = subphases
        .iter()
        .copied()
        .filter(|sub| {
            matches!(
                sub,
                SubPhase::Nomination
                    | SubPhase::Campaign
                    | SubPhase::OptOut
                    | SubPhase::SheriffElection
            )
        })
        .collect();

    if day != 1 && !sheriff_flow.is_empty() {
        violations.push(Violation::error(
            "C.5",
            RuleCategory::PhaseOrder,
            format!("sheriff subphases {sheriff_flow:?} ran on day {day}"),
        ));
    }

    if day == 1 {
        let allowed: [&[SubPhase]; 4] = [
            &[SubPhase::Nomination],
            &[SubPhase::Nomination, SubPhase::Campaign],
            &[
                SubPhase::Nomination,
                SubPhase::Campaign,
                SubPhase::OptOut,
            ],
            &[
                SubPhase::Nomination,
                SubPhase::Campaign,
                SubPhase::OptOut,
                SubPhase::SheriffElection,
            ],
        ];
        if !allowed.contains(&sheriff_flow.as_slice()) {
            violations.push(Violation::error(
                "C.6",
                RuleCategory::PhaseOrder,
                format!(
                    "day-1 sheriff subphases ran as {sheriff_flow:?}; expected Nomination, then \
                     optionally Campaign, OptOut, SheriffElection in that order"
                ),
            ));
        }
    }

    let core: Vec<SubPhase> = subphases
        .iter()
        .copied()
        .filter(|sub| {
            matches!(
                sub,
                SubPhase::DeathResolution
                    | SubPhase::Discussion
                    | SubPhase::Voting
                    | SubPhase::BanishmentResolution
            )
        })
        .collect();

    let expected_core: [&[SubPhase]; 2] = [
        &[SubPhase::DeathResolution, SubPhase::Discussion, SubPhase::Voting],
        &[
            SubPhase::DeathResolution,
            SubPhase::Discussion,
            SubPhase::Voting,
            SubPhase::BanishmentResolution,
        ],
    ];
    if !expected_core.contains(&core.as_slice()) {
        violations.push(Violation::error(
            "C.7",
            RuleCategory::PhaseOrder,
            format!(
                "day subphases ran as {core:?}; expected DeathResolution, Discussion, Voting, \
                 then BanishmentResolution only after a banishment"
            ),
        ));
    }

    violations
}

/// C.16: the pack decision is one query, so a night carries at most one
/// werewolf-kill event.
pub fn check_werewolf_single_query(kill_events: usize) -> Vec<Violation> {
    if kill_events <= 1 {
        Vec::new()
    } else {
        vec![Violation::error(
            "C.16",
            RuleCategory::PhaseOrder,
            format!("{kill_events} werewolf-kill events in one night; the pack decides once"),
        )]
    }
}

/// C.13–C.14: a banishment-resolution death belongs to the seat the vote
/// banished, and a tied vote must not produce one at all.
pub fn check_banishment_death(actor: Seat, banished: Option<Seat>) -> Vec<Violation> {
    match banished {
        Some(banished) if banished == actor => Vec::new(),
        Some(banished) => vec![Violation::error(
            "C.13",
            RuleCategory::PhaseOrder,
            format!("banishment resolution killed seat {actor}, but the vote banished {banished}"),
        )],
        None => vec![Violation::error(
            "C.14",
            RuleCategory::PhaseOrder,
            format!("banishment resolution killed seat {actor} although nobody was banished"),
        )],
    }
}

// ---------------------------------------------------------------------------
// D: werewolf night action
// ---------------------------------------------------------------------------

/// D.1–D.2: the kill must come from a living werewolf and target a living
/// non-werewolf.
pub fn check_werewolf_action(
    actor: Seat,
    target: Option<Seat>,
    state: &GameState,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !state.is_alive(actor) || !state.is_werewolf(actor) {
        violations.push(Violation::error(
            "D.2",
            RuleCategory::NightWerewolf,
            format!("seat {actor} spoke for the pack but is not a living werewolf"),
        ));
    }

    if let Some(target) = target {
        if !state.is_alive(target) {
            violations.push(Violation::error(
                "D.1",
                RuleCategory::NightWerewolf,
                format!("the pack targeted dead seat {target}"),
            ));
        }
        if state.is_werewolf(target) {
            violations.push(Violation::error(
                "D.1",
                RuleCategory::NightWerewolf,
                format!("the pack targeted fellow werewolf {target}"),
            ));
        }
    }

    violations
}

// ---------------------------------------------------------------------------
// E: witch night action
// ---------------------------------------------------------------------------

/// E.2–E.5: one potion per night, no self-antidote, no reusing a spent
/// potion, no poisoning the dead.
pub fn check_witch_action(
    actor: Seat,
    kind: WitchActionKind,
    target: Option<Seat>,
    state: &GameState,
    antidote_used: bool,
    poison_used: bool,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    match kind {
        WitchActionKind::Pass => {}
        WitchActionKind::Antidote => {
            if target.is_none() {
                violations.push(Violation::error(
                    "E.2",
                    RuleCategory::NightWitch,
                    "antidote used without a target",
                ));
            }
            if target == Some(actor) {
                violations.push(Violation::error(
                    "E.3",
                    RuleCategory::NightWitch,
                    "the witch may not use the antidote on herself",
                ));
            }
            if antidote_used {
                violations.push(Violation::error(
                    "E.4",
                    RuleCategory::NightWitch,
                    "the antidote was already spent",
                ));
            }
        }
        WitchActionKind::Poison => {
            match target {
                None => violations.push(Violation::error(
                    "E.2",
                    RuleCategory::NightWitch,
                    "poison used without a target",
                )),
                Some(target) if !state.is_alive(target) => {
                    violations.push(Violation::error(
                        "E.5",
                        RuleCategory::NightWitch,
                        format!("the witch poisoned dead seat {target}"),
                    ));
                }
                Some(_) => {}
            }
            if poison_used {
                violations.push(Violation::error(
                    "E.5",
                    RuleCategory::NightWitch,
                    "the poison was already spent",
                ));
            }
        }
    }

    violations
}

// ---------------------------------------------------------------------------
// F: guard night action
// ---------------------------------------------------------------------------

/// F.1, F.3: the guard protects a living seat and never the same seat on two
/// consecutive nights.
pub fn check_guard_action(
    _actor: Seat,
    target: Option<Seat>,
    state: &GameState,
    prev_guard_target: Option<Seat>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(target) = target {
        if !state.is_alive(target) {
            violations.push(Violation::error(
                "F.1",
                RuleCategory::NightGuard,
                format!("the guard protected dead seat {target}"),
            ));
        }
        if prev_guard_target == Some(target) {
            violations.push(Violation::error(
                "F.3",
                RuleCategory::NightGuard,
                format!("the guard protected seat {target} on two consecutive nights"),
            ));
        }
    }

    violations
}

// ---------------------------------------------------------------------------
// G: seer night action
// ---------------------------------------------------------------------------

/// G.1, G.2, G.4: the check hits a living seat other than the seer, and the
/// reported result matches the target's true role.
pub fn check_seer_action(
    actor: Seat,
    target: Seat,
    result: SeerResult,
    state: &GameState,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !state.is_alive(target) {
        violations.push(Violation::error(
            "G.1",
            RuleCategory::NightSeer,
            format!("the seer checked dead seat {target}"),
        ));
    }

    if target == actor {
        violations.push(Violation::error(
            "G.2",
            RuleCategory::NightSeer,
            "the seer checked herself",
        ));
    }

    let expected = if state.is_werewolf(target) {
        SeerResult::Werewolf
    } else {
        SeerResult::Good
    };
    if result != expected {
        violations.push(Violation::error(
            "G.4",
            RuleCategory::NightSeer,
            format!("seer result {result:?} for seat {target}, whose role implies {expected:?}"),
        ));
    }

    violations
}

// ---------------------------------------------------------------------------
// H: sheriff
// ---------------------------------------------------------------------------

/// H.2 (candidate rule, recorded but not enforced): a dead seat declaring a
/// run is suspicious, not fatal.
pub fn check_nomination(actor: Seat, running: bool, state: &GameState) -> Vec<Violation> {
    if running && !state.is_alive(actor) {
        vec![Violation::warning(
            "H.2",
            RuleCategory::Sheriff,
            format!("dead seat {actor} nominated itself for sheriff"),
        )]
    } else {
        Vec::new()
    }
}

/// H.1, H.3–H.5: the election happens once, on day 1, with a plausible
/// ballot count and a winner from the candidate list.
pub fn check_sheriff_outcome(
    candidates: &[Seat],
    votes: &BTreeMap<Seat, u32>,
    winner: Option<Seat>,
    day: u32,
    elections_seen: u32,
    state: &GameState,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if day != 1 {
        violations.push(Violation::error(
            "H.1",
            RuleCategory::Sheriff,
            format!("sheriff election held on day {day}"),
        ));
    }

    if elections_seen > 0 {
        violations.push(Violation::error(
            "H.3",
            RuleCategory::Sheriff,
            "more than one sheriff election in a game",
        ));
    }

    if let Some(winner) = winner {
        if !candidates.contains(&winner) {
            violations.push(Violation::error(
                "H.4",
                RuleCategory::Sheriff,
                format!("winner {winner} is not among the candidates {candidates:?}"),
            ));
        }
    }

    for target in votes.keys() {
        if !candidates.contains(target) {
            violations.push(Violation::error(
                "H.4",
                RuleCategory::Sheriff,
                format!("ballots were counted for non-candidate seat {target}"),
            ));
        }
    }

    // Candidates do not vote, so the ballot total is bounded by the living
    // non-candidate count.
    let eligible = state
        .living()
        .iter()
        .filter(|seat| !candidates.contains(seat))
        .count() as u32;
    let cast: u32 = votes.values().sum();
    if cast > eligible {
        violations.push(Violation::error(
            "H.5",
            RuleCategory::Sheriff,
            format!("{cast} election ballots cast with only {eligible} eligible voters"),
        ));
    }

    violations
}

// ---------------------------------------------------------------------------
// I: death resolution
// ---------------------------------------------------------------------------

/// I.4–I.6: last words only for night-1 night deaths and for banishments.
/// K and L checks for the same event ride along, since a `DeathEvent`
/// carries all three concerns.
#[allow(clippy::too_many_arguments)]
pub fn check_death_event(
    actor: Seat,
    cause: DeathCause,
    last_words: Option<&str>,
    hunter_shoot_target: Option<Seat>,
    badge_transfer_to: Option<Seat>,
    day: u32,
    sheriff: Option<Seat>,
    state: &GameState,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let last_words_allowed = match cause {
        DeathCause::Banishment => true,
        DeathCause::WerewolfKill | DeathCause::Poison => day == 1,
    };
    if last_words.is_some() && !last_words_allowed {
        violations.push(Violation::error(
            "I.4",
            RuleCategory::Death,
            format!("seat {actor} spoke last words for a {cause:?} death on day {day}"),
        ));
    }

    if let Some(target) = hunter_shoot_target {
        if cause == DeathCause::Poison {
            violations.push(Violation::error(
                "K.1",
                RuleCategory::Hunter,
                format!("seat {actor} fired the hunter shot while dying of poison"),
            ));
        }
        if state.role(actor) != Some(Role::Hunter) {
            violations.push(Violation::error(
                "K.3",
                RuleCategory::Hunter,
                format!("non-hunter seat {actor} fired a final shot"),
            ));
        }
        if target == actor {
            violations.push(Violation::error(
                "K.2",
                RuleCategory::Hunter,
                format!("seat {actor} shot itself"),
            ));
        }
    }

    if let Some(to) = badge_transfer_to {
        if sheriff != Some(actor) {
            violations.push(Violation::error(
                "L.1",
                RuleCategory::Badge,
                format!("seat {actor} transferred the badge without holding it"),
            ));
        }
        if to == actor {
            violations.push(Violation::error(
                "L.4",
                RuleCategory::Badge,
                format!("seat {actor} transferred the badge to itself"),
            ));
        }
    }

    violations
}

// ---------------------------------------------------------------------------
// J: banishment voting
// ---------------------------------------------------------------------------

/// J.1: ballots come from living seats and point at living seats.
pub fn check_vote(actor: Seat, target: Option<Seat>, state: &GameState) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !state.is_alive(actor) {
        violations.push(Violation::error(
            "J.1",
            RuleCategory::Voting,
            format!("dead seat {actor} cast a banishment ballot"),
        ));
    }

    if let Some(target) = target {
        if !state.is_alive(target) {
            violations.push(Violation::error(
                "J.1",
                RuleCategory::Voting,
                format!("seat {actor} voted for dead seat {target}"),
            ));
        }
    }

    violations
}

/// J.2: the recorded tally and outcome must follow from the ballots, with
/// the sheriff's ballot at 1.5 and a tie banishing nobody.
pub fn check_banishment(
    ballots: &[(Seat, Option<Seat>)],
    sheriff: Option<Seat>,
    votes: &BTreeMap<Seat, f64>,
    tied_players: &[Seat],
    banished: Option<Seat>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut expected_halves: BTreeMap<Seat, u32> = BTreeMap::new();
    for (voter, target) in ballots {
        if let Some(target) = target {
            let weight = if Some(*voter) == sheriff { 3 } else { 2 };
            *expected_halves.entry(*target).or_insert(0) += weight;
        }
    }

    let expected_votes: BTreeMap<Seat, f64> = expected_halves
        .iter()
        .map(|(seat, halves)| (*seat, f64::from(*halves) / 2.0))
        .collect();
    if *votes != expected_votes {
        violations.push(Violation::error(
            "J.2",
            RuleCategory::Voting,
            format!("recorded tally {votes:?} does not follow from the ballots"),
        ));
    }

    let (expected_banished, expected_tied) = match expected_halves.values().copied().max() {
        None => (None, Vec::new()),
        Some(max) => {
            let leaders: Vec<Seat> = expected_halves
                .iter()
                .filter(|(_, halves)| **halves == max)
                .map(|(seat, _)| *seat)
                .collect();
            match leaders.as_slice() {
                [single] => (Some(*single), Vec::new()),
                _ => (None, leaders),
            }
        }
    };

    if banished != expected_banished || tied_players != expected_tied.as_slice() {
        violations.push(Violation::error(
            "J.2",
            RuleCategory::Voting,
            format!(
                "banishment outcome ({banished:?}, tied {tied_players:?}) does not follow from \
                 the ballots (expected {expected_banished:?}, tied {expected_tied:?})"
            ),
        ));
    }

    violations
}

// ---------------------------------------------------------------------------
// M: state consistency
// ---------------------------------------------------------------------------

/// M.1–M.4: living/dead partition the seats, flags agree with the sets, and
/// the badge flag agrees with the sheriff field.
pub fn check_state_consistency(state: &GameState) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !state.living().is_disjoint(state.dead()) {
        violations.push(Violation::error(
            "M.1",
            RuleCategory::StateConsistency,
            "living and dead seat sets overlap",
        ));
    }

    if state.living().len() + state.dead().len() != state.players().len() {
        violations.push(Violation::error(
            "M.2",
            RuleCategory::StateConsistency,
            format!(
                "living ({}) plus dead ({}) does not cover all {} seats",
                state.living().len(),
                state.dead().len(),
                state.players().len()
            ),
        ));
    }

    for (seat, player) in state.players() {
        if player.alive != state.living().contains(*seat) {
            violations.push(Violation::error(
                "M.3",
                RuleCategory::StateConsistency,
                format!(
                    "seat {seat} has alive={} but living-set membership says {}",
                    player.alive,
                    state.living().contains(*seat)
                ),
            ));
        }
        if player.is_sheriff != (state.sheriff() == Some(*seat)) {
            violations.push(Violation::error(
                "M.4",
                RuleCategory::StateConsistency,
                format!(
                    "seat {seat} has is_sheriff={} but the sheriff field says {:?}",
                    player.is_sheriff,
                    state.sheriff()
                ),
            ));
        }
    }

    violations
}

/// M.5: outside the window between a night kill and its day resolution, the
/// badge holder is alive.
pub fn check_sheriff_alive(state: &GameState) -> Vec<Violation> {
    match state.sheriff() {
        Some(sheriff) if !state.is_alive(sheriff) => vec![Violation::error(
            "M.5",
            RuleCategory::StateConsistency,
            format!("dead seat {sheriff} holds the badge after death resolution"),
        )],
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// N: event logging
// ---------------------------------------------------------------------------

/// N.1–N.3: every envelope's day matches its phase number and its phase and
/// subphase tags match where it sits in the log.
pub fn check_event_envelope(
    envelope: &EventEnvelope,
    phase_kind: Phase,
    phase_number: u32,
    subphase: SubPhase,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if envelope.day != phase_number {
        violations.push(Violation::error(
            "N.1",
            RuleCategory::EventLogging,
            format!(
                "event stamped day {} sits inside phase number {phase_number}",
                envelope.day
            ),
        ));
    }

    if envelope.phase != phase_kind {
        violations.push(Violation::error(
            "N.2",
            RuleCategory::EventLogging,
            format!(
                "event stamped {:?} sits inside a {phase_kind:?} phase",
                envelope.phase
            ),
        ));
    }

    if envelope.subphase != subphase || envelope.subphase.phase() != phase_kind {
        violations.push(Violation::error(
            "N.3",
            RuleCategory::EventLogging,
            format!(
                "event stamped {:?} sits inside a {subphase:?} subphase of a {phase_kind:?} phase",
                envelope.subphase
            ),
        ));
    }

    violations
}

/// N.4 with E.6, E.7 and F.2: the logged night outcome must equal what the
/// night's actions resolve to — the antidote overrides the kill, the guard
/// blocks the kill, poison ignores the guard.
pub fn check_night_outcome(
    logged: &BTreeMap<Seat, DeathCause>,
    expected: &BTreeMap<Seat, DeathCause>,
) -> Vec<Violation> {
    if logged == expected {
        Vec::new()
    } else {
        vec![Violation::error(
            "N.4",
            RuleCategory::EventLogging,
            format!(
                "night outcome {logged:?} does not match the resolution of the night's actions \
                 {expected:?}"
            ),
        )]
    }
}
