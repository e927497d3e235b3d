use thiserror::Error;

use werewolf_game_lib::Seat;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid game setup: {0}")]
    InvalidSetup(String),
    #[error("no participant registered for seat {0}")]
    MissingParticipant(Seat),
    #[error("event emitted while no phase is open")]
    NoOpenPhase,
}

/// A participant failed to produce a response.
///
/// Never escapes the engine: the query loop treats it exactly like an
/// unparseable response and falls back to the subphase default after the
/// retry budget is spent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("participant failed to decide: {0}")]
pub struct ParticipantError(pub String);
