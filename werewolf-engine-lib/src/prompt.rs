//! Three-layer prompt construction.
//!
//! Layer 1 is a static system prompt per decision: role rules, legal action
//! space and response format, with no seat, day or player data, so it is
//! cacheable per role/subphase. Layer 2 renders the current state snapshot.
//! Layer 3 is the concrete question plus its [`ChoiceSpec`], rendered the
//! same for humans (numbered menu) and LLMs (inline option list).

use std::fmt::Write;

use werewolf_game_lib::ChoiceKind;
use werewolf_game_lib::ChoiceSpec;
use werewolf_game_lib::Role;
use werewolf_game_lib::Seat;

use crate::state::GameState;

/// Layer-1 texts. Each describes one decision's rules and nothing about the
/// game in progress.
pub mod system {
    pub const WEREWOLF: &str = "You are a Werewolf. Each night your pack collectively picks one \
non-werewolf player to kill, or chooses to kill nobody. You speak for the whole pack: exactly \
one decision is made per night. Respond with exactly one of the listed option values.";

    pub const WITCH: &str = "You are the Witch. You hold one antidote and one poison for the \
whole game. The antidote saves tonight's werewolf victim (never yourself); the poison kills any \
other living player and cannot be blocked by the guard. You may use at most one potion per \
night, or pass. Respond with exactly one of the listed option values.";

    pub const GUARD: &str = "You are the Guard. Each night you may protect one living player \
(including yourself) from the werewolf kill, but never the same player on two consecutive \
nights. Protection does not stop poison. Respond with exactly one of the listed option values.";

    pub const SEER: &str = "You are the Seer. Each night you must check one living player other \
than yourself and learn whether they are a werewolf. You cannot skip the check. Respond with \
exactly one of the listed option values.";

    pub const NOMINATION: &str = "It is the sheriff nomination. Decide whether you stand for \
sheriff. The sheriff's vote counts 1.5 and the sheriff directs the discussion. Respond with \
'yes' or 'no'.";

    pub const CAMPAIGN_STAY: &str = "You are a sheriff candidate. Decide whether to stay in the \
race and give a campaign speech, or to withdraw now. Respond with exactly one of the listed \
option values.";

    pub const CAMPAIGN_SPEECH: &str = "You are a sheriff candidate giving your campaign speech. \
Say why the table should trust you with the badge. Respond with your speech as plain text.";

    pub const OPT_OUT: &str = "You are a sheriff candidate. This is the last chance to withdraw \
from the race before the election. Respond with exactly one of the listed option values.";

    pub const ELECTION: &str = "It is the sheriff election. You are not a candidate, so you cast \
one ballot for a candidate or abstain. The candidate with the most ballots takes the badge; a \
tie means no sheriff. Respond with exactly one of the listed option values.";

    pub const DISCUSSION_DIRECTION: &str = "You are the sheriff. Choose the direction the \
discussion proceeds around the table; you will speak last. Respond with exactly one of the \
listed option values.";

    pub const DISCUSSION: &str = "It is the open discussion. Share what you want the table to \
believe; you speak exactly once. Respond with your speech as plain text.";

    pub const VOTING: &str = "It is the banishment vote. Vote for one living player to banish, \
or abstain. The sheriff's ballot counts 1.5, everyone else's 1.0; the highest weighted total is \
banished and a tie banishes nobody. Respond with exactly one of the listed option values.";

    pub const HUNTER_SHOOT: &str = "You are the Hunter and you are dying. You may fire your one \
final shot at any living player, killing them, or hold your fire. Respond with exactly one of \
the listed option values.";

    pub const BADGE_TRANSFER: &str = "You are the Sheriff and you are dying. You may pass the \
badge to one living player or retire it forever; a retired badge is never re-elected. Respond \
with exactly one of the listed option values.";

    pub const LAST_WORDS: &str = "You are dying and may address the table one final time. \
Respond with your last words as plain text.";
}

/// Layer 2: a rendered snapshot of the public state, plus the werewolf
/// teammate roster when the viewer is a werewolf.
pub fn render_state(state: &GameState, viewer: Seat) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "You are seat {viewer}. It is day {}.", state.day());

    let living: Vec<String> = state.living().iter().map(|s| s.to_string()).collect();
    let _ = writeln!(out, "Living seats: {}.", living.join(", "));

    let dead: Vec<String> = state.dead().iter().map(|s| s.to_string()).collect();
    if dead.is_empty() {
        let _ = writeln!(out, "Nobody has died yet.");
    } else {
        let _ = writeln!(out, "Dead seats: {}.", dead.join(", "));
    }

    match state.sheriff() {
        Some(sheriff) => {
            let _ = writeln!(out, "Seat {sheriff} holds the sheriff badge.");
        }
        None => {
            let _ = writeln!(out, "There is no sheriff.");
        }
    }

    if state.role(viewer) == Some(Role::Werewolf) {
        let teammates: Vec<String> = state
            .players()
            .keys()
            .filter(|seat| **seat != viewer && state.role(**seat) == Some(Role::Werewolf))
            .map(|seat| seat.to_string())
            .collect();
        let _ = writeln!(out, "Your werewolf teammates: seats {}.", teammates.join(", "));
    }

    out
}

/// Layer 3, LLM rendering: the question with its options inlined.
pub fn render_decision_llm(spec: &ChoiceSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", spec.prompt);

    if spec.kind != ChoiceKind::Text {
        let _ = writeln!(out, "Available options:");
        for option in &spec.options {
            let _ = writeln!(out, "  - \"{}\" ({})", option.value, option.display);
        }
        if spec.allow_none {
            let _ = writeln!(out, "  - \"skip\" (No selection)");
        }
        let _ = writeln!(out, "Respond with exactly one option value.");
    }

    out
}

/// Layer 3, human rendering: the same choice set as a numbered menu.
pub fn render_decision_menu(spec: &ChoiceSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", spec.prompt);

    if spec.kind != ChoiceKind::Text {
        for (index, option) in spec.options.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", index + 1, option.display);
        }
        if spec.allow_none {
            let _ = writeln!(out, "  {}. Skip / Pass / Abstain", spec.options.len() + 1);
        }
    }

    out
}

/// Assembles the full user prompt: state snapshot, visible history, then the
/// decision itself.
pub fn compose_user_prompt(state_block: &str, history_block: &str, decision_block: &str) -> String {
    let mut out = String::new();
    out.push_str(state_block);

    if !history_block.is_empty() {
        out.push_str("\nWhat you have seen so far:\n");
        out.push_str(history_block);
    }

    out.push('\n');
    out.push_str(decision_block);
    out
}
