//! Data structures shared by the Werewolf engine and its front-ends.
//!
//! Everything in this crate is plain serializable data: seats, roles, the
//! closed [`GameEvent`] sum, the hierarchical [`GameLog`], and the
//! [`ChoiceSpec`] contract the engine hands to whatever UI is driving a
//! participant. No game logic lives here.

use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

mod choice;
mod event;

pub use choice::ChoiceKind;
pub use choice::ChoiceOption;
pub use choice::ChoiceSpec;
pub use choice::ParsedChoice;
pub use event::DeathCause;
pub use event::EventEnvelope;
pub use event::GameEvent;
pub use event::GameLog;
pub use event::PhaseLog;
pub use event::SeerResult;
pub use event::SubPhaseLog;
pub use event::VictoryCondition;
pub use event::WitchActionKind;

/// A player's seat at the table. Seats are stable identifiers for the whole
/// game; the standard configuration uses seats `0..12`.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Seat(pub u8);

impl Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A role dealt to a seat at setup. Assigned once, never changes.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
pub enum Role {
    Werewolf,
    /// Learns one seat's true alignment each night.
    Seer,
    /// Holds one antidote and one poison, each usable once per game.
    Witch,
    /// Protects one seat from the werewolf kill each night.
    Guard,
    /// Fires a final shot when dying, unless poisoned.
    Hunter,
    /// No night ability.
    Villager,
}

/// Which side a role fights for.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Faction {
    Werewolf,
    /// The powered villager-side roles: Seer, Witch, Guard, Hunter.
    God,
    Villager,
}

impl Role {
    pub fn faction(&self) -> Faction {
        match self {
            Role::Werewolf => Faction::Werewolf,
            Role::Seer | Role::Witch | Role::Guard | Role::Hunter => Faction::God,
            Role::Villager => Faction::Villager,
        }
    }

    pub fn is_god(&self) -> bool {
        self.faction() == Faction::God
    }
}

/// The two camps a game can be won by. A simultaneous win is a tie and is
/// represented as `None` wherever a winner is optional.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Camp {
    Werewolf,
    Villager,
}

/// Whether a seat is driven by a human or an AI agent.
///
/// The engine treats both identically except when picking the werewolves'
/// representative, where a human is preferred.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum PlayerKind {
    Human,
    Ai,
}

/// A seat's full (secret) record.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,
    pub role: Role,
    pub kind: PlayerKind,
    pub alive: bool,
    pub is_sheriff: bool,
}

impl Player {
    pub fn new(seat: Seat, role: Role) -> Self {
        Player {
            seat,
            role,
            kind: PlayerKind::Ai,
            alive: true,
            is_sheriff: false,
        }
    }
}

/// The fixed 12-player role multiset: 4 werewolves, the four god roles, and
/// 4 ordinary villagers. Setup shuffles this into the seats.
pub const STANDARD_TWELVE_PLAYER_ROLES: [Role; 12] = [
    Role::Werewolf,
    Role::Werewolf,
    Role::Werewolf,
    Role::Werewolf,
    Role::Seer,
    Role::Witch,
    Role::Guard,
    Role::Hunter,
    Role::Villager,
    Role::Villager,
    Role::Villager,
    Role::Villager,
];

/// Number of seats in the standard configuration.
pub const SEAT_COUNT: usize = STANDARD_TWELVE_PLAYER_ROLES.len();

/// All seats of the standard configuration, ascending.
pub fn all_seats() -> impl Iterator<Item = Seat> {
    (0..SEAT_COUNT as u8).map(Seat)
}

/// The macro phase the game is in.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Phase {
    Night,
    Day,
}

/// A micro-phase within a night or a day.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum SubPhase {
    // Night micro-phases, in running order.
    WerewolfAction,
    WitchAction,
    GuardAction,
    SeerAction,
    NightResolution,
    // Day micro-phases, in running order.
    Nomination,
    Campaign,
    OptOut,
    SheriffElection,
    DeathResolution,
    Discussion,
    Voting,
    BanishmentResolution,
}

impl SubPhase {
    /// The macro phase this micro-phase belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            SubPhase::WerewolfAction
            | SubPhase::WitchAction
            | SubPhase::GuardAction
            | SubPhase::SeerAction
            | SubPhase::NightResolution => Phase::Night,
            SubPhase::Nomination
            | SubPhase::Campaign
            | SubPhase::OptOut
            | SubPhase::SheriffElection
            | SubPhase::DeathResolution
            | SubPhase::Discussion
            | SubPhase::Voting
            | SubPhase::BanishmentResolution => Phase::Day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_factions() {
        assert_eq!(Role::Werewolf.faction(), Faction::Werewolf);
        assert_eq!(Role::Villager.faction(), Faction::Villager);
        for role in [Role::Seer, Role::Witch, Role::Guard, Role::Hunter] {
            assert_eq!(role.faction(), Faction::God);
            assert!(role.is_god());
        }
    }

    #[test]
    fn standard_config_counts() {
        let werewolves = STANDARD_TWELVE_PLAYER_ROLES
            .iter()
            .filter(|r| **r == Role::Werewolf)
            .count();
        let gods = STANDARD_TWELVE_PLAYER_ROLES
            .iter()
            .filter(|r| r.is_god())
            .count();
        let villagers = STANDARD_TWELVE_PLAYER_ROLES
            .iter()
            .filter(|r| **r == Role::Villager)
            .count();

        assert_eq!((werewolves, gods, villagers), (4, 4, 4));
        assert_eq!(all_seats().count(), SEAT_COUNT);
    }

    #[test]
    fn subphase_phase_tags() {
        assert_eq!(SubPhase::WerewolfAction.phase(), Phase::Night);
        assert_eq!(SubPhase::NightResolution.phase(), Phase::Night);
        assert_eq!(SubPhase::Nomination.phase(), Phase::Day);
        assert_eq!(SubPhase::BanishmentResolution.phase(), Phase::Day);
    }

    #[test]
    fn seat_serializes_transparently() {
        let json = serde_json::to_string(&Seat(7)).unwrap();
        assert_eq!(json, "7");
        assert_eq!(serde_json::from_str::<Seat>("7").unwrap(), Seat(7));
    }
}
