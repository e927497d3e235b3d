//! Night-action resolution: a pure function from the accumulated night
//! actions to the set of seats that die, with causes.

use std::collections::BTreeMap;

use werewolf_game_lib::DeathCause;
use werewolf_game_lib::Seat;

use crate::state::GameState;
use crate::store::NightActionStore;

/// Computes the night's deaths.
///
/// Resolution order:
/// 1. Poison kills its living target, guard or no guard.
/// 2. The werewolf kill lands unless the target was antidoted or guarded
///    (either save suffices; both at once still saves).
///
/// A seat that is both poisoned and killed dies of poison. The result is a
/// map, so downstream iteration is seat-ascending.
pub fn resolve(state: &GameState, actions: &NightActionStore) -> BTreeMap<Seat, DeathCause> {
    let mut deaths = BTreeMap::new();

    if let Some(target) = actions.poison_target {
        if state.is_alive(target) {
            deaths.insert(target, DeathCause::Poison);
        }
    }

    if let Some(target) = actions.kill_target {
        let antidoted = actions.antidote_target == Some(target);
        let guarded = actions.guard_target == Some(target);

        if !antidoted && !guarded && state.is_alive(target) && !deaths.contains_key(&target) {
            deaths.insert(target, DeathCause::WerewolfKill);
        }
    }

    deaths
}
