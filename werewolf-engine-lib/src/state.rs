//! Game state: the seat-indexed player table, living/dead bookkeeping, the
//! sheriff badge, and the victory test.
//!
//! The state is exclusively owned by the game controller and mutated only
//! through the methods here; handlers see read-only snapshots.

use std::collections::BTreeMap;

use bit_set::BitSet;
use tap::Tap;

use werewolf_game_lib::Camp;
use werewolf_game_lib::DeathCause;
use werewolf_game_lib::EventEnvelope;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::Player;
use werewolf_game_lib::Role;
use werewolf_game_lib::Seat;
use werewolf_game_lib::VictoryCondition;

/// A set of seats backed by a bit set. Iteration is seat-ascending, which is
/// what gives queries and death resolution their deterministic order.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SeatSet(BitSet);

impl SeatSet {
    pub fn new() -> Self {
        SeatSet(BitSet::new())
    }

    pub fn insert(&mut self, seat: Seat) -> bool {
        self.0.insert(seat.0 as usize)
    }

    pub fn remove(&mut self, seat: Seat) -> bool {
        self.0.remove(seat.0 as usize)
    }

    pub fn contains(&self, seat: Seat) -> bool {
        self.0.contains(seat.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_disjoint(&self, other: &SeatSet) -> bool {
        self.0.is_disjoint(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Seat> + '_ {
        self.0.iter().map(|idx| Seat(idx as u8))
    }
}

impl FromIterator<Seat> for SeatSet {
    fn from_iter<T: IntoIterator<Item = Seat>>(iter: T) -> Self {
        SeatSet::new().tap_mut(|set| {
            for seat in iter {
                set.insert(seat);
            }
        })
    }
}

/// The live state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    players: BTreeMap<Seat, Player>,
    living: SeatSet,
    dead: SeatSet,
    sheriff: Option<Seat>,
    day: u32,
}

impl GameState {
    /// Starts a game with every seat alive and no sheriff.
    pub fn new(players: BTreeMap<Seat, Player>) -> Self {
        let living = players.keys().copied().collect();
        GameState {
            players,
            living,
            dead: SeatSet::new(),
            sheriff: None,
            day: 1,
        }
    }

    pub fn players(&self) -> &BTreeMap<Seat, Player> {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(&seat)
    }

    pub fn role(&self, seat: Seat) -> Option<Role> {
        self.players.get(&seat).map(|p| p.role)
    }

    pub fn is_alive(&self, seat: Seat) -> bool {
        self.living.contains(seat)
    }

    pub fn is_werewolf(&self, seat: Seat) -> bool {
        self.role(seat) == Some(Role::Werewolf)
    }

    pub fn living(&self) -> &SeatSet {
        &self.living
    }

    pub fn dead(&self) -> &SeatSet {
        &self.dead
    }

    /// Living seats holding the given role, ascending.
    pub fn living_with_role(&self, role: Role) -> impl Iterator<Item = Seat> + '_ {
        self.living
            .iter()
            .filter(move |seat| self.role(*seat) == Some(role))
    }

    pub fn sheriff(&self) -> Option<Seat> {
        self.sheriff
    }

    pub fn is_sheriff(&self, seat: Seat) -> bool {
        self.sheriff == Some(seat)
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn set_day(&mut self, day: u32) {
        self.day = day;
    }

    /// Installs the Day-1 election winner. Called at most once per game, by
    /// the day scheduler; later badge movement goes through `DeathEvent`s.
    pub fn elect_sheriff(&mut self, seat: Seat) {
        self.sheriff = Some(seat);
        if let Some(player) = self.players.get_mut(&seat) {
            player.is_sheriff = true;
        }
    }

    /// Folds a sequence of events into the state. Only `DeathEvent` variants
    /// mutate anything; everything else is already reflected elsewhere.
    pub fn apply_events(&mut self, events: &[EventEnvelope]) {
        for envelope in events {
            if let GameEvent::DeathEvent {
                actor,
                hunter_shoot_target,
                badge_transfer_to,
                ..
            } = &envelope.event
            {
                self.apply_death(*actor, *hunter_shoot_target, *badge_transfer_to);
            }
        }
    }

    fn apply_death(
        &mut self,
        seat: Seat,
        hunter_shoot_target: Option<Seat>,
        badge_transfer_to: Option<Seat>,
    ) {
        // The deceased gives up the badge first, so the transfer below never
        // produces two badge holders.
        self.strip_badge(seat);
        self.mark_dead(seat);

        if let Some(to) = badge_transfer_to {
            self.sheriff = Some(to);
            if let Some(player) = self.players.get_mut(&to) {
                player.is_sheriff = true;
            }
        }

        // Depth-1 chain: the shot victim dies on the spot, with no nested
        // death event. If the victim holds the badge and nothing reassigned
        // it above, the badge dies with them.
        if let Some(target) = hunter_shoot_target {
            if self.living.contains(target) {
                self.strip_badge(target);
                self.mark_dead(target);
            }
        }
    }

    /// Marks the night's victims dead. Hunter shots, badge transfers and last
    /// words for these seats happen in the next day's death resolution, so a
    /// night-dead sheriff keeps the badge until their `DeathEvent` resolves.
    pub fn apply_night_deaths(&mut self, deaths: &BTreeMap<Seat, DeathCause>) {
        for seat in deaths.keys() {
            self.mark_dead(*seat);
        }
    }

    fn mark_dead(&mut self, seat: Seat) {
        if let Some(player) = self.players.get_mut(&seat) {
            player.alive = false;
        }
        if self.living.remove(seat) {
            self.dead.insert(seat);
        }
    }

    fn strip_badge(&mut self, seat: Seat) {
        if self.sheriff == Some(seat) {
            self.sheriff = None;
            if let Some(player) = self.players.get_mut(&seat) {
                player.is_sheriff = false;
            }
        }
    }

    pub fn living_werewolf_count(&self) -> usize {
        self.living_with_role(Role::Werewolf).count()
    }

    pub fn living_god_count(&self) -> usize {
        self.living
            .iter()
            .filter(|seat| self.role(*seat).is_some_and(|r| r.is_god()))
            .count()
    }

    pub fn living_villager_count(&self) -> usize {
        self.living_with_role(Role::Villager).count()
    }

    /// Evaluates the victory conditions independently on the current state.
    ///
    /// Werewolf condition: all ordinary villagers dead OR all gods dead.
    /// Villager condition: all werewolves dead. Both at once is a tie
    /// (`(true, None)`).
    pub fn is_game_over(&self) -> (bool, Option<Camp>) {
        let werewolf_condition =
            self.living_villager_count() == 0 || self.living_god_count() == 0;
        let villager_condition = self.living_werewolf_count() == 0;

        match (werewolf_condition, villager_condition) {
            (true, true) => (true, None),
            (true, false) => (true, Some(Camp::Werewolf)),
            (false, true) => (true, Some(Camp::Villager)),
            (false, false) => (false, None),
        }
    }

    /// Names how the declared winner won, for the `GameOver` record.
    pub fn victory_condition(&self, winner: Option<Camp>) -> VictoryCondition {
        match winner {
            None => VictoryCondition::Tie,
            Some(Camp::Villager) => VictoryCondition::AllWerewolvesKilled,
            Some(Camp::Werewolf) => {
                if self.living_god_count() == 0 {
                    VictoryCondition::AllGodsKilled
                } else {
                    VictoryCondition::AllVillagersKilled
                }
            }
        }
    }
}
