//! Simulation loop for one active session.
//!
//! The loop is an actor owned by the `SessionRegistry`. It ticks on a fixed
//! interval, scheduling the next tick only after the current one has finished,
//! so ticks never overlap. It keeps running while the room's running flag is
//! set in the store; clearing the flag is the only way to cancel it, and the
//! flag is checked once per tick.

use actix::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use log::{debug, error, info, warn};

use super::messages::{Broadcast, ServerEvent, SimulationStopped};
use super::server::SessionRegistry;
use crate::game::state::GameState;
use crate::server::recorder::{MatchRecorder, MatchResult};
use crate::server::store::{SessionStore, StoreError};

pub struct MatchLoop {
    room: String,
    store: SessionStore,
    registry: Addr<SessionRegistry>,
    recorder: Arc<dyn MatchRecorder>,
    tick_interval: Duration,
    ticks: u64,
}

/// Result of one tick, before it is published.
#[derive(Debug)]
enum TickOutcome {
    Snapshot(GameState),
    Ended(MatchResult),
    Stopped,
}

impl MatchLoop {
    pub fn new(
        room: String,
        store: SessionStore,
        registry: Addr<SessionRegistry>,
        recorder: Arc<dyn MatchRecorder>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            room,
            store,
            registry,
            recorder,
            tick_interval,
            ticks: 0,
        }
    }

    fn schedule_tick(&self, ctx: &mut Context<Self>) {
        ctx.run_later(self.tick_interval, |act, ctx| act.tick(ctx));
    }

    fn tick(&mut self, ctx: &mut Context<Self>) {
        let fut = run_tick(self.store.clone(), self.room.clone());
        ctx.wait(fut.into_actor(self).map(|outcome, act, ctx| {
            act.ticks += 1;
            match outcome {
                Ok(TickOutcome::Snapshot(state)) => {
                    act.broadcast(ServerEvent::state(state));
                    act.schedule_tick(ctx);
                }
                Ok(TickOutcome::Ended(result)) => act.end_match(result, ctx),
                Ok(TickOutcome::Stopped) => {
                    info!("[MatchLoop] Room {} no longer running, stopping after {} ticks", act.room, act.ticks);
                    ctx.stop();
                }
                Err(e) => {
                    warn!("[MatchLoop] Tick aborted for room={}: {}", act.room, e);
                    act.schedule_tick(ctx);
                }
            }
        }));
    }

    fn broadcast(&self, event: ServerEvent) {
        self.registry.do_send(Broadcast {
            room: self.room.clone(),
            event,
        });
    }

    /// Tear the room down, announce the result, hand it to the recorder, stop.
    ///
    /// Teardown failures are logged only; the announcement and the recording
    /// happen regardless.
    fn end_match(&mut self, result: MatchResult, ctx: &mut Context<Self>) {
        info!(
            "[MatchLoop] Match over in room={}: {:?} wins {}-{}",
            self.room, result.winner, result.score.first, result.score.second
        );
        let fut = teardown(self.store.clone(), self.room.clone());
        ctx.wait(fut.into_actor(self).map(move |_, act, ctx| {
            act.broadcast(ServerEvent::match_ended(&result));
            act.record(result);
            ctx.stop();
        }));
    }

    fn record(&self, result: MatchResult) {
        let recorder = self.recorder.clone();
        let room = self.room.clone();
        actix::spawn(async move {
            match tokio::task::spawn_blocking(move || recorder.record(&result)).await {
                Ok(Ok(())) => debug!("[MatchLoop] Result recorded for room={}", room),
                Ok(Err(e)) => error!("[MatchLoop] Failed to record result for room={}: {}", room, e),
                Err(e) => error!("[MatchLoop] Recorder task for room={} failed: {}", room, e),
            }
        });
    }
}

impl Actor for MatchLoop {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("[MatchLoop] Started for room={} every {:?}", self.room, self.tick_interval);
        self.schedule_tick(ctx);
    }

    fn stopped(&mut self, ctx: &mut Self::Context) {
        self.registry.do_send(SimulationStopped {
            room: self.room.clone(),
            addr: ctx.address(),
        });
    }
}

async fn run_tick(store: SessionStore, room: String) -> Result<TickOutcome, StoreError> {
    if !store.is_running(&room).await? {
        return Ok(TickOutcome::Stopped);
    }

    let mut state = store.game_state(&room).await?.unwrap_or_default();
    let report = state.tick(&mut rand::rng());
    if let Some(scorer) = report.scorer {
        debug!(
            "[MatchLoop] {:?} scored in room={} ({}-{})",
            scorer, room, state.score.first, state.score.second
        );
    }

    if let Some(winner) = report.winner {
        return Ok(TickOutcome::Ended(MatchResult::new(&room, winner, state.score)));
    }
    store.set_game_state(&room, &state).await?;
    Ok(TickOutcome::Snapshot(state))
}

async fn teardown(store: SessionStore, room: String) {
    if let Err(e) = store.clear_running(&room).await {
        warn!("[MatchLoop] Could not clear running flag for room={}: {}", room, e);
    }
    if let Err(e) = store.reset_game_state(&room).await {
        warn!("[MatchLoop] Could not reset game state for room={}: {}", room, e);
    }
}
