//! Day-1 sheriff flow handlers: nomination, campaign, opt-out, election.

use std::collections::BTreeMap;

use werewolf_game_lib::ChoiceOption;
use werewolf_game_lib::ChoiceSpec;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::GameLog;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SubPhase;
use werewolf_game_lib::SubPhaseLog;

use crate::handlers;
use crate::handlers::QueryOutcome;
use crate::participant::Participants;
use crate::prompt::system;
use crate::state::GameState;

/// Every seat — living or dead — declares whether it runs for sheriff. The
/// nomination record is preserved either way; the validators flag a dead
/// seat answering yes, but the engine does not block it.
pub(crate) async fn nomination(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::Nomination);
    let spec = ChoiceSpec::boolean("Do you run for sheriff?");

    for seat in state.players().keys().copied().collect::<Vec<_>>() {
        let running = match query(state, log, participants, seat, system::NOMINATION, &spec).await
        {
            QueryOutcome::Chose(value) => value == "yes",
            QueryOutcome::Skipped | QueryOutcome::Failed => false,
        };

        sub.push(state.day(), GameEvent::SheriffNomination { actor: seat, running });
    }

    sub
}

/// Seats that nominated themselves, in seat order.
pub(crate) fn nominated_seats(sub: &SubPhaseLog) -> Vec<Seat> {
    sub.events
        .iter()
        .filter_map(|env| match env.event {
            GameEvent::SheriffNomination { actor, running: true } => Some(actor),
            _ => None,
        })
        .collect()
}

/// Two-stage campaign: each candidate first decides to stay or drop, and the
/// stayers then give their speech. Droppers emit nothing here.
pub(crate) async fn campaign(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    candidates: &[Seat],
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::Campaign);

    let stay_spec = ChoiceSpec::actions(
        "Do you stay in the sheriff race and give a campaign speech?",
        vec![
            ChoiceOption::action("stay", "Stay in the race and speak"),
            ChoiceOption::action("withdraw", "Withdraw from the race"),
        ],
        false,
    );
    let speech_spec = ChoiceSpec::text("Give your campaign speech.");

    for &seat in candidates {
        let stays = matches!(
            query(state, log, participants, seat, system::CAMPAIGN_STAY, &stay_spec).await,
            QueryOutcome::Chose(ref value) if value == "stay"
        );
        if !stays {
            continue;
        }

        let content = match handlers::participant_for(participants, seat) {
            Some(participant) => {
                let user = handlers::user_prompt(state, log, seat, &speech_spec);
                handlers::query_text(participant, system::CAMPAIGN_SPEECH, &user, &speech_spec)
                    .await
                    .unwrap_or_else(|| handlers::SILENT_SPEECH.to_string())
            }
            None => handlers::SILENT_SPEECH.to_string(),
        };

        sub.push(state.day(), GameEvent::Speech { actor: seat, content });
    }

    sub
}

/// Candidates who spoke during the campaign, in seat order.
pub(crate) fn speakers(sub: &SubPhaseLog) -> Vec<Seat> {
    sub.events
        .iter()
        .filter_map(|env| match env.event {
            GameEvent::Speech { actor, .. } => Some(actor),
            _ => None,
        })
        .collect()
}

/// Post-campaign withdrawal round. Only withdrawals are logged; staying is
/// the default.
pub(crate) async fn opt_out(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    candidates: &[Seat],
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::OptOut);

    let spec = ChoiceSpec::actions(
        "The election is next. Do you stay in the sheriff race?",
        vec![
            ChoiceOption::action("stay", "Stay in the race"),
            ChoiceOption::action("withdraw", "Withdraw from the race"),
        ],
        false,
    );

    for &seat in candidates {
        let withdraws = matches!(
            query(state, log, participants, seat, system::OPT_OUT, &spec).await,
            QueryOutcome::Chose(ref value) if value == "withdraw"
        );
        if withdraws {
            sub.push(state.day(), GameEvent::SheriffOptOut { actor: seat });
        }
    }

    sub
}

/// Seats that withdrew in the opt-out round.
pub(crate) fn opted_out_seats(sub: &SubPhaseLog) -> Vec<Seat> {
    sub.events
        .iter()
        .filter_map(|env| match env.event {
            GameEvent::SheriffOptOut { actor } => Some(actor),
            _ => None,
        })
        .collect()
}

/// The election: every living non-candidate casts one raw-count ballot or
/// abstains; candidates do not vote. The strict plurality wins; a tie means
/// no sheriff for the whole game.
pub(crate) async fn election(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    candidates: &[Seat],
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::SheriffElection);

    let spec = ChoiceSpec::seats(
        "Which candidate do you elect as sheriff?",
        candidates.iter().copied(),
        true,
    );

    let mut votes: BTreeMap<Seat, u32> = BTreeMap::new();
    for voter in state.living().iter() {
        if candidates.contains(&voter) {
            continue;
        }

        let ballot = match query(state, log, participants, voter, system::ELECTION, &spec).await {
            QueryOutcome::Chose(value) => handlers::parse_seat(&value),
            QueryOutcome::Skipped | QueryOutcome::Failed => None,
        };

        if let Some(target) = ballot {
            *votes.entry(target).or_insert(0) += 1;
        }
    }

    let winner = strict_plurality(&votes);

    sub.push(
        state.day(),
        GameEvent::SheriffOutcome {
            candidates: candidates.to_vec(),
            votes,
            winner,
        },
    );
    sub
}

/// The winner recorded by an election subphase, if any.
pub(crate) fn elected_sheriff(sub: &SubPhaseLog) -> Option<Seat> {
    sub.events.iter().find_map(|env| match env.event {
        GameEvent::SheriffOutcome { winner, .. } => winner,
        _ => None,
    })
}

fn strict_plurality(votes: &BTreeMap<Seat, u32>) -> Option<Seat> {
    let max = votes.values().copied().max()?;
    let mut leaders = votes
        .iter()
        .filter(|(_, count)| **count == max)
        .map(|(seat, _)| *seat);

    let leader = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }
    Some(leader)
}

async fn query(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    seat: Seat,
    system: &'static str,
    spec: &ChoiceSpec,
) -> QueryOutcome {
    let Some(participant) = handlers::participant_for(participants, seat) else {
        return QueryOutcome::Failed;
    };
    let user = handlers::user_prompt(state, log, seat, spec);
    handlers::query_choice(participant, system, &user, spec).await
}
