//! Per-subphase handlers.
//!
//! Every handler follows the same contract: build the three prompt layers
//! and a [`ChoiceSpec`], query the relevant participants (retrying up to
//! [`MAX_QUERY_ATTEMPTS`] times on an invalid response), fall back to the
//! subphase's documented default on exhaustion, and return a typed
//! [`SubPhaseLog`](werewolf_game_lib::SubPhaseLog). Handlers never touch the
//! game state; the schedulers apply their events afterwards, so a cancelled
//! query leaves no half-applied mutation behind.

pub(crate) mod death;
pub(crate) mod discussion;
pub(crate) mod night;
pub(crate) mod sheriff;
pub(crate) mod voting;

use werewolf_game_lib::ChoiceSpec;
use werewolf_game_lib::GameLog;
use werewolf_game_lib::ParsedChoice;
use werewolf_game_lib::Seat;

use crate::participant::Participant;
use crate::participant::Participants;
use crate::prompt;
use crate::state::GameState;
use crate::visibility;

/// How many times a participant is asked before the default applies.
pub(crate) const MAX_QUERY_ATTEMPTS: usize = 3;

const RETRY_HINT: &str =
    "Previous response was invalid. Respond with exactly one of the listed option values.";
const RETRY_HINT_TEXT: &str = "Previous response was invalid. Respond with non-empty text.";

/// What a choice query resolved to.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) enum QueryOutcome {
    /// A declared option value.
    Chose(String),
    /// The participant declined (spec allowed none).
    Skipped,
    /// Retry budget exhausted; the caller applies the subphase default.
    Failed,
}

/// Builds the full user prompt for `viewer`: state snapshot, the history the
/// viewer is entitled to, and the decision with its options.
pub(crate) fn user_prompt(
    state: &GameState,
    log: &GameLog,
    viewer: Seat,
    spec: &ChoiceSpec,
) -> String {
    prompt::compose_user_prompt(
        &prompt::render_state(state, viewer),
        &visibility::render_history(log, viewer),
        &prompt::render_decision_llm(spec),
    )
}

/// Queries one participant against a choice spec, retrying on invalid
/// responses. Participant errors count as invalid responses.
pub(crate) async fn query_choice(
    participant: &dyn Participant,
    system: &'static str,
    user: &str,
    spec: &ChoiceSpec,
) -> QueryOutcome {
    for attempt in 0..MAX_QUERY_ATTEMPTS {
        let hint = (attempt > 0).then_some(RETRY_HINT);

        let raw = match participant.decide(system, user, hint, Some(spec)).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(error = %err, attempt, "participant error treated as invalid response");
                continue;
            }
        };

        match spec.parse(&raw) {
            Some(ParsedChoice::Value(value)) => return QueryOutcome::Chose(value),
            Some(ParsedChoice::Declined) => return QueryOutcome::Skipped,
            None => {
                tracing::debug!(response = %raw, attempt, "unparseable participant response");
            }
        }
    }

    QueryOutcome::Failed
}

/// Queries one participant for free text. `None` means the retry budget ran
/// out and the caller should substitute the deterministic default.
pub(crate) async fn query_text(
    participant: &dyn Participant,
    system: &'static str,
    user: &str,
    spec: &ChoiceSpec,
) -> Option<String> {
    for attempt in 0..MAX_QUERY_ATTEMPTS {
        let hint = (attempt > 0).then_some(RETRY_HINT_TEXT);

        let raw = match participant.decide(system, user, hint, Some(spec)).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(error = %err, attempt, "participant error treated as invalid response");
                continue;
            }
        };

        if let Some(ParsedChoice::Value(text)) = spec.parse(&raw) {
            return Some(text);
        }
    }

    None
}

/// Fixed stand-in for a speech the participant failed to produce, keeping
/// same-seed logs identical.
pub(crate) const SILENT_SPEECH: &str = "(silent)";

pub(crate) fn participant_for(participants: &Participants, seat: Seat) -> Option<&dyn Participant> {
    participants.get(&seat).map(|p| p.as_ref())
}

/// Parses an option value produced by a seat-kind spec back into a seat.
pub(crate) fn parse_seat(value: &str) -> Option<Seat> {
    value.trim().parse::<u8>().ok().map(Seat)
}
