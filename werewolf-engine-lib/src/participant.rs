//! The capability the engine uses to ask a player anything.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use werewolf_game_lib::ChoiceSpec;
use werewolf_game_lib::Seat;

use crate::error::ParticipantError;

/// A player (AI or human) that can make decisions.
///
/// `decide` is the engine's only suspension point. When `choices` is present
/// the returned string must be one of the declared option values (or a
/// skip/none sentinel when the spec allows it); otherwise the handler retries
/// with a hint. When `choices` is absent any non-empty text is accepted.
///
/// Implementations must not panic; failures are reported through the `Err`
/// arm and are treated as a parse failure by the querying handler.
#[async_trait]
pub trait Participant: Send + Sync {
    async fn decide(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        hint: Option<&str>,
        choices: Option<&ChoiceSpec>,
    ) -> Result<String, ParticipantError>;
}

/// One participant per seat, registered at controller construction. The
/// engine references participants but never owns their underlying agents.
pub type Participants = BTreeMap<Seat, Arc<dyn Participant>>;
