//! Death resolution: the sub-query contract a dying seat goes through.
//!
//! For each death, in this fixed order:
//! 1. hunter shot — only for a Hunter whose cause is a werewolf kill or a
//!    banishment (poison silences the gun),
//! 2. badge transfer — only for the current sheriff,
//! 3. last words — only for night-1 night deaths and for banishments.
//!
//! All answers land in a single `DeathEvent` per dying seat. A hunter shot
//! chains exactly one further death; the chained victim gets no sub-queries
//! of their own.

use std::collections::BTreeMap;

use werewolf_game_lib::ChoiceSpec;
use werewolf_game_lib::DeathCause;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::GameLog;
use werewolf_game_lib::Role;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SubPhase;
use werewolf_game_lib::SubPhaseLog;

use crate::handlers;
use crate::handlers::QueryOutcome;
use crate::participant::Participants;
use crate::prompt::system;
use crate::state::GameState;

/// Resolves the previous night's deaths, seat-ascending, during the day's
/// DeathResolution subphase.
pub(crate) async fn death_resolution(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    deaths: &BTreeMap<Seat, DeathCause>,
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::DeathResolution);

    for (&seat, &cause) in deaths {
        let last_words_allowed = state.day() == 1;
        resolve_one(state, log, participants, &mut sub, seat, cause, last_words_allowed).await;
    }

    sub
}

/// Resolves a banishment death. Last words are always granted.
pub(crate) async fn banishment_resolution(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    banished: Seat,
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::BanishmentResolution);
    resolve_one(
        state,
        log,
        participants,
        &mut sub,
        banished,
        DeathCause::Banishment,
        true,
    )
    .await;
    sub
}

async fn resolve_one(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    sub: &mut SubPhaseLog,
    seat: Seat,
    cause: DeathCause,
    last_words_allowed: bool,
) {
    // The hunter fires before the badge moves, so a shot is always fired by
    // the hunter as such and never in some ambiguous just-lost-the-badge
    // state.
    let hunter_shoot_target = if state.role(seat) == Some(Role::Hunter)
        && matches!(cause, DeathCause::WerewolfKill | DeathCause::Banishment)
    {
        query_hunter_shot(state, log, participants, seat).await
    } else {
        None
    };

    let badge_transfer_to = if state.is_sheriff(seat) {
        query_badge_transfer(state, log, participants, seat).await
    } else {
        None
    };

    let last_words = if last_words_allowed {
        Some(query_last_words(state, log, participants, seat).await)
    } else {
        None
    };

    sub.push(
        state.day(),
        GameEvent::DeathEvent {
            actor: seat,
            cause,
            last_words,
            hunter_shoot_target,
            badge_transfer_to,
        },
    );
}

async fn query_hunter_shot(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    seat: Seat,
) -> Option<Seat> {
    let targets = state.living().iter().filter(|target| *target != seat);
    let spec = ChoiceSpec::seats("You may fire your final shot. At whom?", targets, true);

    let participant = handlers::participant_for(participants, seat)?;
    let user = handlers::user_prompt(state, log, seat, &spec);

    match handlers::query_choice(participant, system::HUNTER_SHOOT, &user, &spec).await {
        QueryOutcome::Chose(value) => handlers::parse_seat(&value),
        QueryOutcome::Skipped | QueryOutcome::Failed => None,
    }
}

async fn query_badge_transfer(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    seat: Seat,
) -> Option<Seat> {
    let targets = state.living().iter().filter(|target| *target != seat);
    let spec = ChoiceSpec::seats(
        "You may pass the sheriff badge on, or retire it. To whom?",
        targets,
        true,
    );

    let participant = handlers::participant_for(participants, seat)?;
    let user = handlers::user_prompt(state, log, seat, &spec);

    match handlers::query_choice(participant, system::BADGE_TRANSFER, &user, &spec).await {
        QueryOutcome::Chose(value) => handlers::parse_seat(&value),
        QueryOutcome::Skipped | QueryOutcome::Failed => None,
    }
}

async fn query_last_words(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    seat: Seat,
) -> String {
    let spec = ChoiceSpec::text("These are your last words. What do you say?");

    match handlers::participant_for(participants, seat) {
        Some(participant) => {
            let user = handlers::user_prompt(state, log, seat, &spec);
            handlers::query_text(participant, system::LAST_WORDS, &user, &spec)
                .await
                .unwrap_or_else(|| handlers::SILENT_SPEECH.to_string())
        }
        None => handlers::SILENT_SPEECH.to_string(),
    }
}
