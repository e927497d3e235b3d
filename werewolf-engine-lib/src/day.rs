//! The day scheduler: the conditional Day-1 sheriff flow, then death
//! resolution for the night's victims, discussion, the banishment vote, and
//! banishment resolution when the vote lands.

use std::collections::BTreeMap;

use werewolf_game_lib::DeathCause;
use werewolf_game_lib::Phase;
use werewolf_game_lib::Seat;
use werewolf_game_lib::SubPhase;

use crate::collector::EventCollector;
use crate::error::EngineError;
use crate::handlers;
use crate::night::record_subphase;
use crate::participant::Participants;
use crate::state::GameState;
use crate::validate::Validator;

#[tracing::instrument(skip_all, fields(day = state.day()))]
pub(crate) async fn run_day(
    state: &mut GameState,
    collector: &mut EventCollector,
    participants: &Participants,
    night_deaths: &BTreeMap<Seat, DeathCause>,
    validator: &dyn Validator,
) -> Result<(), EngineError> {
    collector.set_day(state.day());
    validator.on_phase_start(Phase::Day, state.day(), state).await;
    collector.create_phase_log(Phase::Day);

    if state.day() == 1 {
        run_sheriff_flow(state, collector, participants, validator).await?;
    }

    // DeathResolution: the previous night's victims get their sub-queries in
    // seat order; the resulting death events carry hunter shots and badge
    // transfers back into the state.
    validator
        .on_subphase_start(SubPhase::DeathResolution, state.day(), state)
        .await;
    let sub =
        handlers::death::death_resolution(state, collector.log(), participants, night_deaths)
            .await;
    state.apply_events(&sub.events);
    let resolved: Vec<Seat> = sub.events.iter().filter_map(|env| env.event.actor()).collect();
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::DeathResolution, state.day(), Phase::Day, state, collector)
        .await;
    if !resolved.is_empty() {
        validator.on_death_chain_complete(&resolved, state).await;
    }

    // Discussion
    validator
        .on_subphase_start(SubPhase::Discussion, state.day(), state)
        .await;
    let sub = handlers::discussion::discussion(state, collector.log(), participants).await;
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::Discussion, state.day(), Phase::Day, state, collector)
        .await;

    // Voting
    validator
        .on_subphase_start(SubPhase::Voting, state.day(), state)
        .await;
    let sub = handlers::voting::voting(state, collector.log(), participants).await;
    let banished = handlers::voting::banished_seat(&sub);
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::Voting, state.day(), Phase::Day, state, collector)
        .await;

    // BanishmentResolution, only when the vote actually banished someone.
    if let Some(banished) = banished {
        tracing::info!(%banished, "banished by vote");
        validator
            .on_subphase_start(SubPhase::BanishmentResolution, state.day(), state)
            .await;
        let sub =
            handlers::death::banishment_resolution(state, collector.log(), participants, banished)
                .await;
        state.apply_events(&sub.events);
        record_subphase(collector, validator, state, sub).await?;
        validator
            .on_subphase_end(
                SubPhase::BanishmentResolution,
                state.day(),
                Phase::Day,
                state,
                collector,
            )
            .await;
        validator.on_death_chain_complete(&[banished], state).await;
    }

    validator
        .on_phase_end(Phase::Day, state.day(), state, collector)
        .await;

    Ok(())
}

/// The Day-1 sheriff flow: nomination by every seat, then — as long as
/// candidates remain — campaign speeches, a final opt-out round, and the
/// election itself. If nobody runs, the game simply has no sheriff.
async fn run_sheriff_flow(
    state: &mut GameState,
    collector: &mut EventCollector,
    participants: &Participants,
    validator: &dyn Validator,
) -> Result<(), EngineError> {
    validator
        .on_subphase_start(SubPhase::Nomination, state.day(), state)
        .await;
    let sub = handlers::sheriff::nomination(state, collector.log(), participants).await;
    let candidates = handlers::sheriff::nominated_seats(&sub);
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::Nomination, state.day(), Phase::Day, state, collector)
        .await;

    if candidates.is_empty() {
        tracing::info!("nobody ran for sheriff; skipping the election");
        return Ok(());
    }

    // Campaign: candidates either speak or silently drop out.
    validator
        .on_subphase_start(SubPhase::Campaign, state.day(), state)
        .await;
    let sub = handlers::sheriff::campaign(state, collector.log(), participants, &candidates).await;
    let speakers = handlers::sheriff::speakers(&sub);
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::Campaign, state.day(), Phase::Day, state, collector)
        .await;

    if speakers.is_empty() {
        tracing::info!("every candidate withdrew during the campaign");
        return Ok(());
    }

    // OptOut: last chance to leave the race.
    validator
        .on_subphase_start(SubPhase::OptOut, state.day(), state)
        .await;
    let sub = handlers::sheriff::opt_out(state, collector.log(), participants, &speakers).await;
    let opted_out = handlers::sheriff::opted_out_seats(&sub);
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::OptOut, state.day(), Phase::Day, state, collector)
        .await;

    let remaining: Vec<Seat> = speakers
        .into_iter()
        .filter(|seat| !opted_out.contains(seat))
        .collect();
    if remaining.is_empty() {
        tracing::info!("every candidate opted out; no election");
        return Ok(());
    }

    // SheriffElection
    validator
        .on_subphase_start(SubPhase::SheriffElection, state.day(), state)
        .await;
    let sub = handlers::sheriff::election(state, collector.log(), participants, &remaining).await;
    if let Some(winner) = handlers::sheriff::elected_sheriff(&sub) {
        tracing::info!(%winner, "sheriff elected");
        state.elect_sheriff(winner);
    }
    record_subphase(collector, validator, state, sub).await?;
    validator
        .on_subphase_end(SubPhase::SheriffElection, state.day(), Phase::Day, state, collector)
        .await;

    Ok(())
}
