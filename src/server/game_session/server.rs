//! Session registry actor.
//!
//! Process-wide table keyed by room code. For each room it keeps the broadcast
//! group (the connections subscribed in this process) and the simulation loop
//! this process owns, if any. Entries appear on first subscribe and are
//! dropped once the room has neither members nor a loop.

use actix::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use log::{debug, info, warn};

use super::match_loop::MatchLoop;
use super::messages::{
    Broadcast, ServerEvent, SimulationStopped, StartSimulation, Subscribe, Unsubscribe,
};
use crate::config::game::TICK_INTERVAL_MS;
use crate::server::recorder::MatchRecorder;
use crate::server::store::SessionStore;

#[derive(Default)]
struct SessionGroup {
    members: HashMap<Uuid, Recipient<ServerEvent>>,
    simulation: Option<Addr<MatchLoop>>,
    /// A start arrived while the previous loop was still winding down.
    restart_pending: bool,
}

impl SessionGroup {
    fn is_idle(&self) -> bool {
        self.members.is_empty() && self.simulation.is_none()
    }
}

pub struct SessionRegistry {
    sessions: HashMap<String, SessionGroup>,
    store: SessionStore,
    recorder: Arc<dyn MatchRecorder>,
    tick_interval: Duration,
}

impl SessionRegistry {
    pub fn new(store: SessionStore, recorder: Arc<dyn MatchRecorder>) -> Self {
        Self {
            sessions: HashMap::new(),
            store,
            recorder,
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    fn reclaim_if_idle(&mut self, room: &str) {
        if self.sessions.get(room).is_some_and(SessionGroup::is_idle) {
            self.sessions.remove(room);
            debug!("[Registry] Room {} reclaimed", room);
        }
    }
}

impl Actor for SessionRegistry {
    type Context = Context<Self>;
}

impl Handler<Subscribe> for SessionRegistry {
    type Result = ();

    fn handle(&mut self, msg: Subscribe, _: &mut Context<Self>) -> Self::Result {
        let group = self.sessions.entry(msg.room.clone()).or_default();
        group.members.insert(msg.conn_id, msg.recipient);
        debug!(
            "[Registry] {} subscribed to room={} ({} connected)",
            msg.conn_id,
            msg.room,
            group.members.len()
        );
    }
}

impl Handler<Unsubscribe> for SessionRegistry {
    type Result = ();

    fn handle(&mut self, msg: Unsubscribe, _: &mut Context<Self>) -> Self::Result {
        if let Some(group) = self.sessions.get_mut(&msg.room) {
            group.members.remove(&msg.conn_id);
            debug!("[Registry] {} left room={}", msg.conn_id, msg.room);
        }
        self.reclaim_if_idle(&msg.room);
    }
}

impl Handler<Broadcast> for SessionRegistry {
    type Result = ();

    fn handle(&mut self, msg: Broadcast, _: &mut Context<Self>) -> Self::Result {
        let Some(group) = self.sessions.get_mut(&msg.room) else {
            return;
        };

        let mut closed = Vec::new();
        for (conn_id, recipient) in &group.members {
            match recipient.try_send(msg.event.clone()) {
                Ok(()) => {}
                Err(SendError::Full(_)) => {
                    warn!("[Registry] Mailbox full, dropping update for {} in room={}", conn_id, msg.room);
                }
                Err(SendError::Closed(_)) => closed.push(*conn_id),
            }
        }
        for conn_id in closed {
            group.members.remove(&conn_id);
            debug!("[Registry] Pruned closed connection {} from room={}", conn_id, msg.room);
        }
        self.reclaim_if_idle(&msg.room);
    }
}

impl SessionRegistry {
    fn spawn_simulation(&mut self, room: &str, ctx: &mut Context<Self>) -> Addr<MatchLoop> {
        let simulation = MatchLoop::new(
            room.to_string(),
            self.store.clone(),
            ctx.address(),
            self.recorder.clone(),
            self.tick_interval,
        )
        .start();
        info!("[Registry] Simulation started for room={}", room);
        simulation
    }
}

impl Handler<StartSimulation> for SessionRegistry {
    type Result = bool;

    fn handle(&mut self, msg: StartSimulation, ctx: &mut Context<Self>) -> Self::Result {
        let attached = self
            .sessions
            .get(&msg.room)
            .and_then(|group| group.simulation.as_ref())
            .is_some_and(Addr::connected);
        if attached {
            // The running flag was reclaimed while the old loop is still
            // attached; it may already be on its way out.
            if let Some(group) = self.sessions.get_mut(&msg.room) {
                group.restart_pending = true;
            }
            warn!("[Registry] Simulation already attached for room={}, restart queued", msg.room);
            return false;
        }
        let simulation = self.spawn_simulation(&msg.room, ctx);
        let group = self.sessions.entry(msg.room).or_default();
        group.simulation = Some(simulation);
        group.restart_pending = false;
        true
    }
}

impl Handler<SimulationStopped> for SessionRegistry {
    type Result = ();

    fn handle(&mut self, msg: SimulationStopped, ctx: &mut Context<Self>) -> Self::Result {
        let mut restart = false;
        if let Some(group) = self.sessions.get_mut(&msg.room) {
            // Only detach the loop we actually own.
            if group.simulation.as_ref() == Some(&msg.addr) {
                group.simulation = None;
                restart = std::mem::take(&mut group.restart_pending);
                info!("[Registry] Simulation detached from room={}", msg.room);
            }
        }
        if restart {
            // A fresh loop checks the running flag on its first tick and stops if unset.
            let simulation = self.spawn_simulation(&msg.room, ctx);
            if let Some(group) = self.sessions.get_mut(&msg.room) {
                group.simulation = Some(simulation);
            }
        }
        self.reclaim_if_idle(&msg.room);
    }
}

/// Registry introspection used by tests.
#[cfg(test)]
#[derive(Message)]
#[rtype(result = "(usize, bool)")]
pub struct RoomStatus {
    pub room: String,
}

#[cfg(test)]
impl Handler<RoomStatus> for SessionRegistry {
    type Result = MessageResult<RoomStatus>;

    fn handle(&mut self, msg: RoomStatus, _: &mut Context<Self>) -> Self::Result {
        MessageResult(
            self.sessions
                .get(&msg.room)
                .map(|g| (g.members.len(), g.simulation.is_some()))
                .unwrap_or((0, false)),
        )
    }
}
