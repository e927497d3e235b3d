//! The banishment vote.
//!
//! Every living seat votes for one living seat or abstains, in seat order.
//! The sheriff's ballot weighs 1.5, everyone else's 1.0; weights are tallied
//! in half-vote integer units so tie detection never touches float equality.
//! The strictly highest total is banished; a tie banishes nobody.

use std::collections::BTreeMap;

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

/// Half-vote units per ballot.
const SHERIFF_WEIGHT: u32 = 3;
const DEFAULT_WEIGHT: u32 = 2;

pub(crate) async fn voting(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::Voting);

    let spec = ChoiceSpec::seats(
        "Who do you vote to banish?",
        state.living().iter(),
        true,
    );

    let mut tally: BTreeMap<Seat, u32> = BTreeMap::new();
    for voter in state.living().iter() {
        let target = match handlers::participant_for(participants, voter) {
            Some(participant) => {
                let user = handlers::user_prompt(state, log, voter, &spec);
                match handlers::query_choice(participant, system::VOTING, &user, &spec).await {
                    QueryOutcome::Chose(value) => handlers::parse_seat(&value),
                    QueryOutcome::Skipped | QueryOutcome::Failed => None,
                }
            }
            None => None,
        };

        sub.push(state.day(), GameEvent::Vote { actor: voter, target });

        if let Some(target) = target {
            let weight = if state.is_sheriff(voter) {
                SHERIFF_WEIGHT
            } else {
                DEFAULT_WEIGHT
            };
            *tally.entry(target).or_insert(0) += weight;
        }
    }

    let (banished, tied_players) = settle(&tally);

    let votes: BTreeMap<Seat, f64> = tally
        .iter()
        .map(|(seat, halves)| (*seat, f64::from(*halves) / 2.0))
        .collect();

    sub.push(
        state.day(),
        GameEvent::Banishment {
            votes,
            tied_players,
            banished,
        },
    );
    sub
}

/// The seat banished by a voting subphase, if any.
pub(crate) fn banished_seat(sub: &SubPhaseLog) -> Option<Seat> {
    sub.events.iter().find_map(|env| match env.event {
        GameEvent::Banishment { banished, .. } => banished,
        _ => None,
    })
}

fn settle(tally: &BTreeMap<Seat, u32>) -> (Option<Seat>, Vec<Seat>) {
    let Some(max) = tally.values().copied().max() else {
        return (None, Vec::new());
    };

    let leaders: Vec<Seat> = tally
        .iter()
        .filter(|(_, halves)| **halves == max)
        .map(|(seat, _)| *seat)
        .collect();

    match leaders.as_slice() {
        [single] => (Some(*single), Vec::new()),
        _ => (None, leaders),
    }
}
