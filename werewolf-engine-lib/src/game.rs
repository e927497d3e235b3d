//! The game controller: setup, the night/day loop, victory termination, and
//! the max-day bound.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;

use werewolf_game_lib::all_seats;
use werewolf_game_lib::Camp;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::GameLog;
use werewolf_game_lib::Player;
use werewolf_game_lib::Role;
use werewolf_game_lib::Seat;
use werewolf_game_lib::VictoryCondition;
use werewolf_game_lib::STANDARD_TWELVE_PLAYER_ROLES;

use crate::collector::EventCollector;
use crate::day;
use crate::error::EngineError;
use crate::night;
use crate::participant::Participants;
use crate::state::GameState;
use crate::store::NightActionStore;
use crate::validate::rules::MAX_GAME_DAYS;
use crate::validate::NoOpValidator;
use crate::validate::Validator;

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Seed for the role shuffle. Same seed + same participant responses =
    /// byte-identical event log.
    pub seed: Option<u64>,
    /// Hard bound on the day counter; the game force-ends when it is hit.
    pub max_days: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            seed: None,
            max_days: MAX_GAME_DAYS,
        }
    }
}

/// Shuffles the standard 12-role multiset into the seats. This is the only
/// place the engine consults an RNG.
pub fn assign_roles<R: Rng + ?Sized>(rng: &mut R) -> BTreeMap<Seat, Player> {
    let mut roles = STANDARD_TWELVE_PLAYER_ROLES;
    roles.shuffle(rng);

    all_seats()
        .zip(roles)
        .map(|(seat, role)| (seat, Player::new(seat, role)))
        .collect()
}

/// Runs one complete game from setup to the terminal victory condition.
pub struct WerewolfGame {
    config: GameConfig,
    state: GameState,
    actions: NightActionStore,
    collector: EventCollector,
    participants: Participants,
    validator: Arc<dyn Validator>,
}

impl WerewolfGame {
    /// Deals roles (seeded when the config says so) and wires up the game.
    pub fn new(config: GameConfig, participants: Participants) -> Result<Self, EngineError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let players = assign_roles(&mut rng);
        Self::with_players(config, players, participants)
    }

    /// Wires up a game over an explicit role layout. Requires exactly one
    /// participant per seat.
    pub fn with_players(
        config: GameConfig,
        players: BTreeMap<Seat, Player>,
        participants: Participants,
    ) -> Result<Self, EngineError> {
        if players.len() != STANDARD_TWELVE_PLAYER_ROLES.len() {
            return Err(EngineError::InvalidSetup(format!(
                "expected {} seats, got {}",
                STANDARD_TWELVE_PLAYER_ROLES.len(),
                players.len()
            )));
        }
        for seat in players.keys() {
            if !participants.contains_key(seat) {
                return Err(EngineError::MissingParticipant(*seat));
            }
        }
        if participants.len() != players.len() {
            return Err(EngineError::InvalidSetup(format!(
                "{} participants registered for {} seats",
                participants.len(),
                players.len()
            )));
        }

        Ok(WerewolfGame {
            config,
            state: GameState::new(players),
            actions: NightActionStore::default(),
            collector: EventCollector::new(),
            participants,
            validator: Arc::new(NoOpValidator),
        })
    }

    /// Injects a validator. Defaults to the no-op one.
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    /// Plays the game to completion and returns the finalized log and the
    /// winner (`None` for a tie). Rule violations are retrievable from the
    /// injected validator, not from here.
    #[tracing::instrument(skip_all, fields(seed = self.config.seed))]
    pub async fn run(mut self) -> Result<(GameLog, Option<Camp>), EngineError> {
        self.collector.set_player_count(self.state.players().len());

        let roles_secret: BTreeMap<Seat, Role> = self
            .state
            .players()
            .iter()
            .map(|(seat, player)| (*seat, player.role))
            .collect();
        self.collector.set_game_start(GameEvent::GameStart {
            player_count: self.state.players().len(),
            roles_secret,
        });
        self.validator
            .on_game_start(&self.state, &self.collector)
            .await;

        let mut winner: Option<Camp> = None;
        let mut over = false;
        let mut current_day = 1;

        while current_day <= self.config.max_days {
            self.state.set_day(current_day);

            let (actions, night_deaths) = night::run_night(
                &mut self.state,
                std::mem::take(&mut self.actions),
                &mut self.collector,
                &self.participants,
                &*self.validator,
            )
            .await?;
            self.actions = actions;

            (over, winner) = self.state.is_game_over();
            self.validator
                .on_victory_check(&self.state, over, winner)
                .await;
            if over {
                break;
            }

            day::run_day(
                &mut self.state,
                &mut self.collector,
                &self.participants,
                &night_deaths,
                &*self.validator,
            )
            .await?;

            (over, winner) = self.state.is_game_over();
            self.validator
                .on_victory_check(&self.state, over, winner)
                .await;
            if over {
                break;
            }

            current_day += 1;
        }

        // At the max-day bound an undecided board is recorded as a tie.
        let condition = if over {
            self.state.victory_condition(winner)
        } else {
            VictoryCondition::Tie
        };

        self.collector.set_game_over(GameEvent::GameOver {
            winner,
            condition,
            final_turn_count: self.state.day(),
        });
        self.validator
            .on_game_over(winner, &self.state, &self.collector)
            .await;
        tracing::info!(?winner, ?condition, "game over");

        Ok((self.collector.into_log(), winner))
    }
}
