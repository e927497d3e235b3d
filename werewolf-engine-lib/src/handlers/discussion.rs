//! The open discussion: every living player speaks once. A living sheriff
//! picks the direction the table speaks in and closes the round themselves;
//! the direction shapes the speech order but is not logged.

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

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Direction {
    Clockwise,
    Counterclockwise,
}

pub(crate) async fn discussion(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::Discussion);

    let order = match state.sheriff() {
        Some(sheriff) => {
            let direction = choose_direction(state, log, participants, sheriff).await;
            speaking_order(state, sheriff, direction)
        }
        None => state.living().iter().collect(),
    };

    let spec = ChoiceSpec::text("It is your turn to speak. What do you say?");
    for seat in order {
        let content = match handlers::participant_for(participants, seat) {
            Some(participant) => {
                let user = handlers::user_prompt(state, log, seat, &spec);
                handlers::query_text(participant, system::DISCUSSION, &user, &spec)
                    .await
                    .unwrap_or_else(|| handlers::SILENT_SPEECH.to_string())
            }
            None => handlers::SILENT_SPEECH.to_string(),
        };

        sub.push(state.day(), GameEvent::Speech { actor: seat, content });
    }

    sub
}

async fn choose_direction(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    sheriff: Seat,
) -> Direction {
    let spec = ChoiceSpec::actions(
        "Which way does the discussion go around the table?",
        vec![
            ChoiceOption::action("clockwise", "Clockwise (ascending seats)"),
            ChoiceOption::action("counterclockwise", "Counterclockwise (descending seats)"),
        ],
        false,
    );

    let Some(participant) = handlers::participant_for(participants, sheriff) else {
        return Direction::Clockwise;
    };
    let user = handlers::user_prompt(state, log, sheriff, &spec);

    match handlers::query_choice(participant, system::DISCUSSION_DIRECTION, &user, &spec).await {
        QueryOutcome::Chose(value) if value == "counterclockwise" => Direction::Counterclockwise,
        _ => Direction::Clockwise,
    }
}

/// Living seats starting from the sheriff's neighbor in the chosen
/// direction, wrapping around the table, with the sheriff last.
fn speaking_order(state: &GameState, sheriff: Seat, direction: Direction) -> Vec<Seat> {
    let living: Vec<Seat> = state.living().iter().collect();

    let mut order: Vec<Seat> = match direction {
        Direction::Clockwise => living
            .iter()
            .copied()
            .filter(|seat| *seat > sheriff)
            .chain(living.iter().copied().filter(|seat| *seat < sheriff))
            .collect(),
        Direction::Counterclockwise => living
            .iter()
            .rev()
            .copied()
            .filter(|seat| *seat < sheriff)
            .chain(living.iter().rev().copied().filter(|seat| *seat > sheriff))
            .collect(),
    };

    if state.is_alive(sheriff) {
        order.push(sheriff);
    }
    order
}
