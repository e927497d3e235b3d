//! Night-action bookkeeping: what carries across nights and what is wiped
//! every dusk.

use std::collections::BTreeSet;

use werewolf_game_lib::Seat;

/// The persistent slice of the store, carried from night to night.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NightSnapshot {
    pub antidote_used: bool,
    pub poison_used: bool,
    pub prev_guard_target: Option<Seat>,
    pub seer_checks: BTreeSet<Seat>,
}

/// Accumulates one night's actions on top of the persistent potion/guard
/// state. Ephemeral targets exist only between dusk and that night's
/// resolution.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NightActionStore {
    // Persistent across nights.
    pub antidote_used: bool,
    pub poison_used: bool,
    pub prev_guard_target: Option<Seat>,
    pub seer_checks: BTreeSet<Seat>,

    // Ephemeral, rebuilt empty each night.
    pub kill_target: Option<Seat>,
    pub antidote_target: Option<Seat>,
    pub poison_target: Option<Seat>,
    pub guard_target: Option<Seat>,
}

impl NightActionStore {
    pub fn snapshot(&self) -> NightSnapshot {
        NightSnapshot {
            antidote_used: self.antidote_used,
            poison_used: self.poison_used,
            prev_guard_target: self.prev_guard_target,
            seer_checks: self.seer_checks.clone(),
        }
    }

    /// A fresh store for a new night: persistent fields from the snapshot,
    /// every target cleared.
    pub fn from_snapshot(snapshot: NightSnapshot) -> Self {
        NightActionStore {
            antidote_used: snapshot.antidote_used,
            poison_used: snapshot.poison_used,
            prev_guard_target: snapshot.prev_guard_target,
            seer_checks: snapshot.seer_checks,
            ..NightActionStore::default()
        }
    }

    /// Closes out the night: tonight's guard target becomes the consecutive-
    /// night restriction, targets are dropped.
    pub fn carry_over(self) -> NightActionStore {
        NightActionStore {
            antidote_used: self.antidote_used,
            poison_used: self.poison_used,
            prev_guard_target: self.guard_target,
            seer_checks: self.seer_checks,
            ..NightActionStore::default()
        }
    }
}
