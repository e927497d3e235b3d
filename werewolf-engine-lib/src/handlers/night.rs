//! Night subphase handlers: werewolf kill, witch potions, guard protection,
//! seer check.

use werewolf_game_lib::ChoiceOption;
use werewolf_game_lib::ChoiceSpec;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::GameLog;
use werewolf_game_lib::PlayerKind;
use werewolf_game_lib::Role;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SeerResult;
use werewolf_game_lib::SubPhase;
use werewolf_game_lib::SubPhaseLog;
use werewolf_game_lib::WitchActionKind;

use crate::handlers;
use crate::handlers::QueryOutcome;
use crate::participant::Participants;
use crate::prompt::system;
use crate::state::GameState;
use crate::store::NightActionStore;

/// The pack's collective kill. One query to one representative werewolf:
/// a human werewolf when one is alive, otherwise the lowest living seat.
pub(crate) async fn werewolf_action(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::WerewolfAction);

    let wolves: Vec<Seat> = state.living_with_role(Role::Werewolf).collect();
    let Some(&lowest) = wolves.first() else {
        return sub;
    };
    let representative = wolves
        .iter()
        .copied()
        .find(|seat| {
            state
                .player(*seat)
                .is_some_and(|p| p.kind == PlayerKind::Human)
        })
        .unwrap_or(lowest);

    let targets = state.living().iter().filter(|seat| !state.is_werewolf(*seat));
    let spec = ChoiceSpec::seats(
        "Which seat does the pack kill tonight?",
        targets,
        true,
    );

    let target = match query(state, log, participants, representative, system::WEREWOLF, &spec)
        .await
    {
        QueryOutcome::Chose(value) => handlers::parse_seat(&value),
        QueryOutcome::Skipped | QueryOutcome::Failed => None,
    };

    sub.push(
        state.day(),
        GameEvent::WerewolfKill {
            actor: representative,
            target,
        },
    );
    sub
}

/// The witch's single decision, with the option list filtered down to what
/// is actually available: pass, the antidote on tonight's victim, or the
/// poison on any other living seat.
pub(crate) async fn witch_action(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    store: &NightActionStore,
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::WitchAction);

    let Some(witch) = state.living_with_role(Role::Witch).next() else {
        return sub;
    };

    let mut options = vec![ChoiceOption::action("pass", "Use no potion")];

    // The antidote needs a victim to save and may not save the witch herself.
    if !store.antidote_used {
        if let Some(victim) = store.kill_target {
            if victim != witch {
                options.push(ChoiceOption::action(
                    "antidote",
                    format!("Use the antidote to save seat {victim}"),
                ));
            }
        }
    }

    if !store.poison_used {
        for seat in state.living().iter().filter(|seat| *seat != witch) {
            options.push(ChoiceOption {
                value: format!("poison {seat}"),
                display: format!("Poison seat {seat}"),
                seat_hint: Some(seat),
            });
        }
    }

    let question = match store.kill_target {
        Some(victim) => format!(
            "The werewolves chose to kill seat {victim} tonight. What do you do?"
        ),
        None => "The werewolves killed nobody tonight. What do you do?".to_string(),
    };
    let spec = ChoiceSpec::actions(question, options, false);

    let (kind, target) = match query(state, log, participants, witch, system::WITCH, &spec).await {
        QueryOutcome::Chose(value) if value == "antidote" => {
            (WitchActionKind::Antidote, store.kill_target)
        }
        QueryOutcome::Chose(value) if value.starts_with("poison ") => (
            WitchActionKind::Poison,
            handlers::parse_seat(&value["poison ".len()..]),
        ),
        _ => (WitchActionKind::Pass, None),
    };

    sub.push(
        state.day(),
        GameEvent::WitchAction {
            actor: witch,
            kind,
            target,
        },
    );
    sub
}

/// The guard's protection pick. Anyone living is eligible, including the
/// guard, except last night's target.
pub(crate) async fn guard_action(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
    prev_guard_target: Option<Seat>,
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::GuardAction);

    let Some(guard) = state.living_with_role(Role::Guard).next() else {
        return sub;
    };

    let targets = state
        .living()
        .iter()
        .filter(|seat| Some(*seat) != prev_guard_target);
    let spec = ChoiceSpec::seats("Which seat do you protect tonight?", targets, true);

    let target = match query(state, log, participants, guard, system::GUARD, &spec).await {
        QueryOutcome::Chose(value) => handlers::parse_seat(&value),
        QueryOutcome::Skipped | QueryOutcome::Failed => None,
    };

    sub.push(state.day(), GameEvent::GuardAction { actor: guard, target });
    sub
}

/// The seer's check. Skipping is not allowed; if the participant never
/// produces a valid answer the lowest-numbered eligible seat is checked.
pub(crate) async fn seer_action(
    state: &GameState,
    log: &GameLog,
    participants: &Participants,
) -> SubPhaseLog {
    let mut sub = SubPhaseLog::new(SubPhase::SeerAction);

    let Some(seer) = state.living_with_role(Role::Seer).next() else {
        return sub;
    };

    let targets: Vec<Seat> = state
        .living()
        .iter()
        .filter(|seat| *seat != seer)
        .collect();
    let Some(&fallback) = targets.first() else {
        return sub;
    };
    let spec = ChoiceSpec::seats(
        "Which seat do you check tonight?",
        targets.iter().copied(),
        false,
    );

    let target = match query(state, log, participants, seer, system::SEER, &spec).await {
        QueryOutcome::Chose(value) => handlers::parse_seat(&value).unwrap_or(fallback),
        QueryOutcome::Skipped | QueryOutcome::Failed => fallback,
    };

    let result = if state.is_werewolf(target) {
        SeerResult::Werewolf
    } else {
        SeerResult::Good
    };

    sub.push(
        state.day(),
        GameEvent::SeerAction {
            actor: seer,
            target,
            result,
        },
    );
    sub
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
