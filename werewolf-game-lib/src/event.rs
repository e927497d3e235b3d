//! The closed event sum and the hierarchical, append-only event log.
//!
//! Every dispatch over game history — state mutation, visibility filtering,
//! prompt rendering, validation — pattern-matches [`GameEvent`]. Events carry
//! no timestamps: two runs of the same seed with the same participant
//! responses serialize to byte-identical logs.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::Camp;
use crate::Phase;
use crate::Role;
use crate::Seat;
use crate::SubPhase;

/// Why a seat died.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum DeathCause {
    WerewolfKill,
    Poison,
    Banishment,
}

/// What the witch did with her night.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum WitchActionKind {
    Pass,
    Antidote,
    Poison,
}

/// What the seer learns about a checked seat.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum SeerResult {
    Good,
    Werewolf,
}

/// How the game ended.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum VictoryCondition {
    AllWerewolvesKilled,
    AllGodsKilled,
    AllVillagersKilled,
    Tie,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum GameEvent {
    GameStart {
        player_count: usize,
        /// The dealt roles. Secret: never rendered into participant prompts.
        roles_secret: BTreeMap<Seat, Role>,
    },
    /// The werewolves' collective kill decision, voiced by one representative.
    /// A missing target means "no kill tonight".
    WerewolfKill {
        actor: Seat,
        target: Option<Seat>,
    },
    WitchAction {
        actor: Seat,
        kind: WitchActionKind,
        target: Option<Seat>,
    },
    GuardAction {
        actor: Seat,
        target: Option<Seat>,
    },
    SeerAction {
        actor: Seat,
        target: Seat,
        result: SeerResult,
    },
    /// The set of seats that died overnight, with causes. Causes are stripped
    /// from the public rendering.
    NightOutcome {
        deaths: BTreeMap<Seat, DeathCause>,
    },
    SheriffNomination {
        actor: Seat,
        running: bool,
    },
    SheriffOptOut {
        actor: Seat,
    },
    /// Free-text speech: campaign, discussion, or last words.
    Speech {
        actor: Seat,
        content: String,
    },
    SheriffOutcome {
        candidates: Vec<Seat>,
        /// Raw ballot counts per candidate.
        votes: BTreeMap<Seat, u32>,
        winner: Option<Seat>,
    },
    Vote {
        actor: Seat,
        target: Option<Seat>,
    },
    Banishment {
        /// Weighted totals per target. Weights are half-vote exact (1.0 or
        /// 1.5 per ballot), so equality between totals is reliable.
        votes: BTreeMap<Seat, f64>,
        tied_players: Vec<Seat>,
        banished: Option<Seat>,
    },
    DeathEvent {
        actor: Seat,
        cause: DeathCause,
        last_words: Option<String>,
        hunter_shoot_target: Option<Seat>,
        badge_transfer_to: Option<Seat>,
    },
    GameOver {
        winner: Option<Camp>,
        condition: VictoryCondition,
        final_turn_count: u32,
    },
}

impl GameEvent {
    /// The acting seat, for events that have one.
    pub fn actor(&self) -> Option<Seat> {
        match self {
            GameEvent::WerewolfKill { actor, .. }
            | GameEvent::WitchAction { actor, .. }
            | GameEvent::GuardAction { actor, .. }
            | GameEvent::SeerAction { actor, .. }
            | GameEvent::SheriffNomination { actor, .. }
            | GameEvent::SheriffOptOut { actor }
            | GameEvent::Speech { actor, .. }
            | GameEvent::Vote { actor, .. }
            | GameEvent::DeathEvent { actor, .. } => Some(*actor),
            GameEvent::GameStart { .. }
            | GameEvent::NightOutcome { .. }
            | GameEvent::SheriffOutcome { .. }
            | GameEvent::Banishment { .. }
            | GameEvent::GameOver { .. } => None,
        }
    }
}

/// A [`GameEvent`] stamped with where in the game it happened.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub day: u32,
    pub phase: Phase,
    pub subphase: SubPhase,
    pub event: GameEvent,
}

/// The events of a single micro-phase. A micro-phase with no acting role
/// still produces an entry with an empty event list.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SubPhaseLog {
    pub subphase: SubPhase,
    pub events: Vec<EventEnvelope>,
}

impl SubPhaseLog {
    pub fn new(subphase: SubPhase) -> Self {
        SubPhaseLog {
            subphase,
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, day: u32, event: GameEvent) {
        self.events.push(EventEnvelope {
            day,
            phase: self.subphase.phase(),
            subphase: self.subphase,
            event,
        });
    }
}

/// One night or one day of the game.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PhaseLog {
    pub kind: Phase,
    pub number: u32,
    pub subphases: Vec<SubPhaseLog>,
}

/// The finished, replayable record of a game.
///
/// Phases are strictly in emission order; once a phase is followed by
/// another, nothing may be inserted into it. `game_start` and `game_over`
/// sit outside the phase list.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct GameLog {
    pub player_count: usize,
    pub roles_secret: BTreeMap<Seat, Role>,
    pub phases: Vec<PhaseLog>,
    pub game_start: Option<GameEvent>,
    pub game_over: Option<GameEvent>,
}

impl GameLog {
    /// All phase events in chronological order.
    pub fn events(&self) -> impl Iterator<Item = &EventEnvelope> {
        self.phases
            .iter()
            .flat_map(|phase| phase.subphases.iter())
            .flat_map(|sub| sub.events.iter())
    }

    /// The winner recorded in `game_over`, if the game finished.
    pub fn winner(&self) -> Option<Camp> {
        match &self.game_over {
            Some(GameEvent::GameOver { winner, .. }) => *winner,
            _ => None,
        }
    }
}
