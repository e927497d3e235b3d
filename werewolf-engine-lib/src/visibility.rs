//! Event visibility: which parts of the log a participant may see, and the
//! public-history rendering injected into user prompts.
//!
//! The rules, per event:
//! - `GameStart` is public as a player count only; the role deal never leaves
//!   the log.
//! - Speeches, nominations, opt-outs and the election outcome are public.
//! - Death events are public with the cause stripped.
//! - `NightOutcome` is public with causes stripped; it only exists once the
//!   night closed, so it is naturally first visible the following day.
//! - Ballots (`Vote`) and the weighted `Banishment` tally stay out of prompts
//!   entirely; only the banishment outcome is shown.
//! - Night actions are visible to their actor alone.
//! - A participant's own speeches are suppressed from their own view.

use std::fmt::Write;

use werewolf_game_lib::EventEnvelope;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::GameLog;
use werewolf_game_lib::Seat;

/// Whether every participant may see (a rendering of) this event.
pub fn is_public(event: &GameEvent) -> bool {
    match event {
        GameEvent::GameStart { .. }
        | GameEvent::Speech { .. }
        | GameEvent::SheriffNomination { .. }
        | GameEvent::SheriffOptOut { .. }
        | GameEvent::SheriffOutcome { .. }
        | GameEvent::NightOutcome { .. }
        | GameEvent::Banishment { .. }
        | GameEvent::DeathEvent { .. } => true,
        GameEvent::WerewolfKill { .. }
        | GameEvent::WitchAction { .. }
        | GameEvent::GuardAction { .. }
        | GameEvent::SeerAction { .. }
        | GameEvent::Vote { .. }
        | GameEvent::GameOver { .. } => false,
    }
}

/// Whether this envelope appears in `viewer`'s prompt history.
pub fn visible_to(envelope: &EventEnvelope, viewer: Seat) -> bool {
    match &envelope.event {
        // Secret ballots never re-enter prompts, not even the voter's own.
        GameEvent::Vote { .. } => false,
        GameEvent::GameOver { .. } => false,
        // Don't feed a player their own words back to them.
        GameEvent::Speech { actor, .. } => *actor != viewer,
        GameEvent::WerewolfKill { actor, .. }
        | GameEvent::WitchAction { actor, .. }
        | GameEvent::GuardAction { actor, .. }
        | GameEvent::SeerAction { actor, .. } => *actor == viewer,
        _ => is_public(&envelope.event),
    }
}

/// Renders the history `viewer` is entitled to, one line per event. Hidden
/// information (causes, roles, ballots) never appears, even for the events
/// that are otherwise public.
pub fn render_history(log: &GameLog, viewer: Seat) -> String {
    let mut out = String::new();

    if let Some(GameEvent::GameStart { player_count, .. }) = &log.game_start {
        let _ = writeln!(out, "The game started with {player_count} players.");
    }

    for envelope in log.events() {
        if !visible_to(envelope, viewer) {
            continue;
        }
        let day = envelope.day;
        match &envelope.event {
            GameEvent::Speech { actor, content } => {
                let _ = writeln!(out, "[day {day}] Seat {actor} said: {content}");
            }
            GameEvent::SheriffNomination { actor, running } => {
                let verb = if *running { "ran for" } else { "declined to run for" };
                let _ = writeln!(out, "[day {day}] Seat {actor} {verb} sheriff.");
            }
            GameEvent::SheriffOptOut { actor } => {
                let _ = writeln!(out, "[day {day}] Seat {actor} withdrew from the sheriff race.");
            }
            GameEvent::SheriffOutcome { winner, candidates, .. } => {
                let listed = join_seats(candidates);
                match winner {
                    Some(seat) => {
                        let _ = writeln!(
                            out,
                            "[day {day}] Sheriff election among seats {listed}: seat {seat} won the badge."
                        );
                    }
                    None => {
                        let _ = writeln!(
                            out,
                            "[day {day}] Sheriff election among seats {listed}: no winner, no sheriff."
                        );
                    }
                }
            }
            GameEvent::NightOutcome { deaths } => {
                if deaths.is_empty() {
                    let _ = writeln!(out, "[night {day}] The night was peaceful; nobody died.");
                } else {
                    let seats: Vec<Seat> = deaths.keys().copied().collect();
                    let _ = writeln!(
                        out,
                        "[night {day}] Seats {} died during the night.",
                        join_seats(&seats)
                    );
                }
            }
            GameEvent::Banishment { banished, tied_players, .. } => match banished {
                Some(seat) => {
                    let _ = writeln!(out, "[day {day}] Seat {seat} was banished by vote.");
                }
                None if !tied_players.is_empty() => {
                    let _ = writeln!(
                        out,
                        "[day {day}] The banishment vote tied between seats {}; nobody was banished.",
                        join_seats(tied_players)
                    );
                }
                None => {
                    let _ = writeln!(out, "[day {day}] The banishment vote banished nobody.");
                }
            },
            GameEvent::DeathEvent {
                actor,
                last_words,
                hunter_shoot_target,
                badge_transfer_to,
                // Cause of death is concealed from the table.
                cause: _,
            } => {
                let _ = writeln!(out, "[day {day}] Seat {actor} died.");
                if let Some(target) = hunter_shoot_target {
                    let _ = writeln!(
                        out,
                        "[day {day}] Seat {actor} was the hunter and shot seat {target}."
                    );
                }
                if let Some(to) = badge_transfer_to {
                    let _ = writeln!(
                        out,
                        "[day {day}] Seat {actor} passed the sheriff badge to seat {to}."
                    );
                }
                if let Some(words) = last_words {
                    let _ = writeln!(out, "[day {day}] Seat {actor}'s last words: {words}");
                }
            }
            GameEvent::WerewolfKill { target, .. } => {
                match target {
                    Some(target) => {
                        let _ = writeln!(
                            out,
                            "[night {day}] Your pack chose to kill seat {target}."
                        );
                    }
                    None => {
                        let _ = writeln!(out, "[night {day}] Your pack chose not to kill.");
                    }
                }
            }
            GameEvent::WitchAction { kind, target, .. } => {
                let _ = match (kind, target) {
                    (werewolf_game_lib::WitchActionKind::Pass, _) => {
                        writeln!(out, "[night {day}] You passed on both potions.")
                    }
                    (werewolf_game_lib::WitchActionKind::Antidote, Some(t)) => {
                        writeln!(out, "[night {day}] You used the antidote on seat {t}.")
                    }
                    (werewolf_game_lib::WitchActionKind::Poison, Some(t)) => {
                        writeln!(out, "[night {day}] You poisoned seat {t}.")
                    }
                    _ => Ok(()),
                };
            }
            GameEvent::GuardAction { target, .. } => {
                let _ = match target {
                    Some(t) => writeln!(out, "[night {day}] You guarded seat {t}."),
                    None => writeln!(out, "[night {day}] You guarded nobody."),
                };
            }
            GameEvent::SeerAction { target, result, .. } => {
                let verdict = match result {
                    werewolf_game_lib::SeerResult::Werewolf => "a werewolf",
                    werewolf_game_lib::SeerResult::Good => "not a werewolf",
                };
                let _ = writeln!(
                    out,
                    "[night {day}] Your vision: seat {target} is {verdict}."
                );
            }
            GameEvent::GameStart { .. } | GameEvent::Vote { .. } | GameEvent::GameOver { .. } => {}
        }
    }

    out
}

fn join_seats(seats: &[Seat]) -> String {
    seats
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
