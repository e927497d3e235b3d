//! The night scheduler: drives the fixed subphase order
//! WerewolfAction → WitchAction → GuardAction → SeerAction → NightResolution,
//! feeds the accumulated actions through the resolver, and stamps the
//! `NightOutcome`.

use std::collections::BTreeMap;

use werewolf_game_lib::DeathCause;
use werewolf_game_lib::EventEnvelope;
use werewolf_game_lib::GameEvent;
use werewolf_game_lib::Phase;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SubPhase;
use werewolf_game_lib::SubPhaseLog;
use werewolf_game_lib::WitchActionKind;

use crate::collector::EventCollector;
use crate::error::EngineError;
use crate::handlers;
use crate::participant::Participants;
use crate::resolver;
use crate::state::GameState;
use crate::store::NightActionStore;
use crate::validate::Validator;

/// Runs one complete night. The store moves in and the successor store
/// (ephemeral targets cleared, persistent state carried) moves back out,
/// together with the night's deaths for the next day's resolution.
#[tracing::instrument(skip_all, fields(day = state.day()))]
pub(crate) async fn run_night(
    state: &mut GameState,
    actions: NightActionStore,
    collector: &mut EventCollector,
    participants: &Participants,
    validator: &dyn Validator,
) -> Result<(NightActionStore, BTreeMap<Seat, DeathCause>), EngineError> {
    let mut store = NightActionStore::from_snapshot(actions.snapshot());

    collector.set_day(state.day());
    validator.on_phase_start(Phase::Night, state.day(), state).await;
    collector.create_phase_log(Phase::Night);

    // WerewolfAction
    validator
        .on_subphase_start(SubPhase::WerewolfAction, state.day(), state)
        .await;
    let sub = handlers::night::werewolf_action(state, collector.log(), participants).await;
    store.kill_target = sub.events.iter().find_map(|env| match env.event {
        GameEvent::WerewolfKill { target, .. } => target,
        _ => None,
    });
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::WerewolfAction, state.day(), Phase::Night, state, collector)
        .await;

    // WitchAction
    validator
        .on_subphase_start(SubPhase::WitchAction, state.day(), state)
        .await;
    let sub = handlers::night::witch_action(state, collector.log(), participants, &store).await;
    for env in &sub.events {
        if let GameEvent::WitchAction { kind, target, .. } = &env.event {
            match kind {
                WitchActionKind::Antidote => {
                    store.antidote_target = *target;
                    store.antidote_used = true;
                }
                WitchActionKind::Poison => {
                    store.poison_target = *target;
                    store.poison_used = true;
                }
                WitchActionKind::Pass => {}
            }
        }
    }
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::WitchAction, state.day(), Phase::Night, state, collector)
        .await;

    // GuardAction
    validator
        .on_subphase_start(SubPhase::GuardAction, state.day(), state)
        .await;
    let sub =
        handlers::night::guard_action(state, collector.log(), participants, store.prev_guard_target)
            .await;
    store.guard_target = sub.events.iter().find_map(|env| match env.event {
        GameEvent::GuardAction { target, .. } => target,
        _ => None,
    });
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::GuardAction, state.day(), Phase::Night, state, collector)
        .await;

    // SeerAction
    validator
        .on_subphase_start(SubPhase::SeerAction, state.day(), state)
        .await;
    let sub = handlers::night::seer_action(state, collector.log(), participants).await;
    for env in &sub.events {
        if let GameEvent::SeerAction { target, .. } = env.event {
            store.seer_checks.insert(target);
        }
    }
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::SeerAction, state.day(), Phase::Night, state, collector)
        .await;

    // NightResolution
    validator
        .on_subphase_start(SubPhase::NightResolution, state.day(), state)
        .await;
    let deaths = resolver::resolve(state, &store);
    tracing::info!(?deaths, "night resolved");

    let envelope = EventEnvelope {
        day: state.day(),
        phase: Phase::Night,
        subphase: SubPhase::NightResolution,
        event: GameEvent::NightOutcome {
            deaths: deaths.clone(),
        },
    };
    collector.add_event(envelope.clone())?;
    validator.on_event_applied(&envelope, state).await;
    validator
        .on_subphase_end(SubPhase::NightResolution, state.day(), Phase::Night, state, collector)
        .await;

    // The victims leave the table now; their hunter shots, badge transfers
    // and last words wait for the day's death resolution.
    state.apply_night_deaths(&deaths);
    let dead_seats: Vec<Seat> = deaths.keys().copied().collect();
    validator.on_death_chain_complete(&dead_seats, state).await;

    validator
        .on_phase_end(Phase::Night, state.day(), state, collector)
        .await;

    Ok((store.carry_over(), deaths))
}

/// Merges a handler's subphase log into the collector and notifies the
/// validator of every event it carried.
pub(crate) async fn record_subphase(
    collector: &mut EventCollector,
    validator: &dyn Validator,
    state: &GameState,
    sub: SubPhaseLog,
) -> Result<(), EngineError> {
    let events = sub.events.clone();
    collector.add_subphase_log(sub)?;
    for envelope in &events {
        validator.on_event_applied(envelope, state).await;
    }
    Ok(())
}
