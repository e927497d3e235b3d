//! The engine's declaration of what answers a given query accepts.
//!
//! Handlers build a [`ChoiceSpec`] per decision; the same spec drives both
//! the numbered TUI menu and the inline option list shown to an LLM, so every
//! front-end presents exactly the same choice set.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::Seat;

/// The shape of answer a decision expects.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ChoiceKind {
    /// Pick a player seat from the option list.
    Seat,
    /// Pick a named action from the option list.
    Action,
    /// Yes / no.
    Boolean,
    /// Free-form non-empty text.
    Text,
}

/// A single selectable option.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// The exact string a participant must return to select this option.
    pub value: String,
    /// Human-readable rendering.
    pub display: String,
    /// The seat this option refers to, when it refers to one.
    pub seat_hint: Option<Seat>,
}

impl ChoiceOption {
    pub fn seat(seat: Seat) -> Self {
        ChoiceOption {
            value: seat.to_string(),
            display: format!("Player at seat {seat}"),
            seat_hint: Some(seat),
        }
    }

    pub fn action(value: impl Into<String>, display: impl Into<String>) -> Self {
        ChoiceOption {
            value: value.into(),
            display: display.into(),
            seat_hint: None,
        }
    }
}

/// Accepted spellings of the "no selection" sentinel.
const NONE_ANSWERS: [&str; 4] = ["skip", "none", "pass", "abstain"];

/// Specification of one decision put to a participant.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ChoiceSpec {
    pub kind: ChoiceKind,
    /// The rendered question.
    pub prompt: String,
    /// Valid selections, in presentation order. Empty for `Text`.
    pub options: Vec<ChoiceOption>,
    /// Whether `skip`/`none`/`pass`/`abstain` is a valid answer.
    pub allow_none: bool,
    /// Optional public per-seat annotations for display.
    pub seat_info: Option<BTreeMap<Seat, String>>,
}

/// Outcome of matching a raw participant response against a spec.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ParsedChoice {
    /// Matched an option; carries the option's `value`.
    Value(String),
    /// The participant declined (`allow_none` sentinels only).
    Declined,
}

impl ChoiceSpec {
    pub fn seats(
        prompt: impl Into<String>,
        seats: impl IntoIterator<Item = Seat>,
        allow_none: bool,
    ) -> Self {
        ChoiceSpec {
            kind: ChoiceKind::Seat,
            prompt: prompt.into(),
            options: seats.into_iter().map(ChoiceOption::seat).collect(),
            allow_none,
            seat_info: None,
        }
    }

    pub fn actions(
        prompt: impl Into<String>,
        options: Vec<ChoiceOption>,
        allow_none: bool,
    ) -> Self {
        ChoiceSpec {
            kind: ChoiceKind::Action,
            prompt: prompt.into(),
            options,
            allow_none,
            seat_info: None,
        }
    }

    pub fn boolean(prompt: impl Into<String>) -> Self {
        ChoiceSpec {
            kind: ChoiceKind::Boolean,
            prompt: prompt.into(),
            options: vec![
                ChoiceOption::action("yes", "Yes"),
                ChoiceOption::action("no", "No"),
            ],
            allow_none: false,
            seat_info: None,
        }
    }

    pub fn text(prompt: impl Into<String>) -> Self {
        ChoiceSpec {
            kind: ChoiceKind::Text,
            prompt: prompt.into(),
            options: Vec::new(),
            allow_none: false,
            seat_info: None,
        }
    }

    pub fn find_option(&self, value: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|opt| opt.value == value)
    }

    /// Matches a raw response against this spec. Returns `None` when the
    /// response is invalid and the participant should be retried.
    pub fn parse(&self, raw: &str) -> Option<ParsedChoice> {
        let trimmed = raw.trim();

        if self.kind == ChoiceKind::Text {
            if trimmed.is_empty() {
                return None;
            }
            return Some(ParsedChoice::Value(trimmed.to_string()));
        }

        let lowered = trimmed.to_ascii_lowercase();
        if self.allow_none && (lowered.is_empty() || NONE_ANSWERS.contains(&lowered.as_str())) {
            return Some(ParsedChoice::Declined);
        }

        self.find_option(trimmed)
            .map(|opt| ParsedChoice::Value(opt.value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_spec_parses_exact_values_only() {
        let spec = ChoiceSpec::seats("Who?", [Seat(3), Seat(5)], true);

        assert_eq!(
            spec.parse("3"),
            Some(ParsedChoice::Value("3".to_string()))
        );
        assert_eq!(spec.parse(" 5 "), Some(ParsedChoice::Value("5".to_string())));
        assert_eq!(spec.parse("4"), None);
        assert_eq!(spec.parse("seat 3"), None);
    }

    #[test]
    fn none_sentinels_require_allow_none() {
        let open = ChoiceSpec::seats("Who?", [Seat(1)], true);
        let closed = ChoiceSpec::seats("Who?", [Seat(1)], false);

        for sentinel in ["skip", "NONE", "Pass", "abstain", ""] {
            assert_eq!(open.parse(sentinel), Some(ParsedChoice::Declined));
            assert_eq!(closed.parse(sentinel), None);
        }
    }

    #[test]
    fn text_spec_rejects_empty() {
        let spec = ChoiceSpec::text("Say something");
        assert_eq!(spec.parse("   "), None);
        assert_eq!(
            spec.parse("I am a simple villager"),
            Some(ParsedChoice::Value("I am a simple villager".to_string()))
        );
    }

    #[test]
    fn boolean_spec_has_fixed_options() {
        let spec = ChoiceSpec::boolean("Run for sheriff?");
        assert_eq!(spec.parse("yes"), Some(ParsedChoice::Value("yes".to_string())));
        assert_eq!(spec.parse("no"), Some(ParsedChoice::Value("no".to_string())));
        assert_eq!(spec.parse("maybe"), None);
    }
}
