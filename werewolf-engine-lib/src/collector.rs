//! Accumulates events from handlers into the hierarchical game log.
//!
//! The collector is the single source of truth for both live play and the
//! post-game replay. It is append-only: opening a new phase closes the
//! previous one for good, and there is no API for reaching back into a
//! closed phase.

use werewolf_game_lib::EventEnvelope;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::GameLog;
use werewolf_game_lib::Phase;
use werewolf_game_lib::PhaseLog;
use werewolf_game_lib::SubPhaseLog;

use crate::error::EngineError;

#[derive(Debug, Default)]
pub struct EventCollector {
    day: u32,
    log: GameLog,
    phase_open: bool,
}

impl EventCollector {
    pub fn new() -> Self {
        EventCollector {
            day: 1,
            ..EventCollector::default()
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn set_day(&mut self, day: u32) {
        self.day = day;
    }

    pub fn set_player_count(&mut self, count: usize) {
        self.log.player_count = count;
    }

    /// Records the game-start event and the secret role deal it carries.
    pub fn set_game_start(&mut self, event: GameEvent) {
        if let GameEvent::GameStart { roles_secret, .. } = &event {
            self.log.roles_secret = roles_secret.clone();
        }
        self.log.game_start = Some(event);
    }

    pub fn set_game_over(&mut self, event: GameEvent) {
        self.log.game_over = Some(event);
    }

    /// Opens a new phase log numbered with the current day. The previously
    /// open phase, if any, is closed and can no longer be appended to.
    pub fn create_phase_log(&mut self, kind: Phase) {
        self.log.phases.push(PhaseLog {
            kind,
            number: self.day,
            subphases: Vec::new(),
        });
        self.phase_open = true;
    }

    /// Merges a handler's finished subphase log into the open phase.
    pub fn add_subphase_log(&mut self, subphase_log: SubPhaseLog) -> Result<(), EngineError> {
        let phase = self.open_phase()?;
        phase.subphases.push(subphase_log);
        Ok(())
    }

    /// Appends a single event, extending the trailing subphase log when it
    /// matches and opening a new one otherwise.
    pub fn add_event(&mut self, envelope: EventEnvelope) -> Result<(), EngineError> {
        let phase = self.open_phase()?;

        match phase.subphases.last_mut() {
            Some(last) if last.subphase == envelope.subphase => last.events.push(envelope),
            _ => {
                phase.subphases.push(SubPhaseLog {
                    subphase: envelope.subphase,
                    events: vec![envelope],
                });
            }
        }

        Ok(())
    }

    fn open_phase(&mut self) -> Result<&mut PhaseLog, EngineError> {
        if !self.phase_open {
            return Err(EngineError::NoOpenPhase);
        }
        self.log.phases.last_mut().ok_or(EngineError::NoOpenPhase)
    }

    /// Read-only view of everything collected so far.
    pub fn log(&self) -> &GameLog {
        &self.log
    }

    /// Finalizes the collector into the completed log.
    pub fn into_log(self) -> GameLog {
        self.log
    }
}
