/// WebSocket connection of one client to a game session.
///
/// The actor joins the session when it starts (claiming a player slot or
/// observing), turns the client's move requests into store updates, relays
/// every `ServerEvent` of its room to the socket, and gives its slot back when
/// it stops. Frames that arrive while the join is in flight wait for it.
use actix::prelude::*;
use actix_web::{http::StatusCode, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{debug, error, info, warn};
use uuid::Uuid;

use super::lifecycle::{apply_input, join_session, leave_session, JoinOutcome};
use super::messages::{
    Broadcast, ClientInput, RoleAssigned, ServerEvent, StartSimulation, Subscribe, Unsubscribe,
};
use super::server::SessionRegistry;
use crate::config::server::ROOM_CODE_MAX_LEN;
use crate::game::types::{Direction, Role};
use crate::server::http_error::http_error_response;
use crate::server::state::AppState;
use crate::server::store::SessionStore;

pub struct PlayerConnection {
    conn_id: Uuid,
    room: String,
    /// Set once the join completes.
    role: Option<Role>,
    store: SessionStore,
    registry: Addr<SessionRegistry>,
}

impl PlayerConnection {
    pub fn new(room: String, store: SessionStore, registry: Addr<SessionRegistry>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            room,
            role: None,
            store,
            registry,
        }
    }

    fn on_joined(&mut self, outcome: JoinOutcome, ctx: &mut ws::WebsocketContext<Self>) {
        self.role = Some(outcome.role);
        match serde_json::to_string(&RoleAssigned { role: outcome.role }) {
            Ok(text) => ctx.text(text),
            Err(e) => error!("[Connection] Failed to serialize role for {}: {}", self.conn_id, e),
        }

        // Late joiners get the current snapshot without waiting for a tick.
        self.registry.do_send(Broadcast {
            room: self.room.clone(),
            event: ServerEvent::state(outcome.state),
        });

        if outcome.start_simulation {
            let room = self.room.clone();
            ctx.spawn(
                self.registry
                    .send(StartSimulation { room: room.clone() })
                    .into_actor(self)
                    .map(move |res, _act, _ctx| match res {
                        Ok(true) => info!("[Connection] Simulation requested for room={}", room),
                        Ok(false) => debug!("[Connection] Room {} already simulated here", room),
                        Err(e) => error!("[Connection] Registry unreachable, room={} not simulated: {}", room, e),
                    }),
            );
        }
    }

    fn handle_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let input = match serde_json::from_str::<ClientInput>(text) {
            Ok(input) => input,
            Err(e) => {
                debug!("[Connection] Ignoring malformed frame from {}: {}", self.conn_id, e);
                return;
            }
        };
        let Some((role, direction)) = authorized_move(self.role, &input) else {
            debug!(
                "[Connection] Ignoring {:?} from {} (assigned {:?}, claimed {:?})",
                input.action, self.conn_id, self.role, input.role
            );
            return;
        };

        // One input at a time per connection, in arrival order.
        let fut = apply_input(self.store.clone(), self.room.clone(), role, direction);
        ctx.wait(fut.into_actor(self).map(|res, act, _ctx| match res {
            Ok(Some(state)) => act.registry.do_send(Broadcast {
                room: act.room.clone(),
                event: ServerEvent::state(state),
            }),
            Ok(None) => debug!("[Connection] No game in room={}, move dropped", act.room),
            Err(e) => warn!("[Connection] Move from {} in room={} failed: {}", act.conn_id, act.room, e),
        }));
    }
}

/// The paddle step a client may perform: only a player, only for its own
/// role, only for a known action.
pub fn authorized_move(assigned: Option<Role>, input: &ClientInput) -> Option<(Role, Direction)> {
    let assigned = assigned.filter(|role| role.is_player())?;
    if input.role != Some(assigned) {
        return None;
    }
    input.action.direction().map(|direction| (assigned, direction))
}

impl Actor for PlayerConnection {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.registry.do_send(Subscribe {
            room: self.room.clone(),
            conn_id: self.conn_id,
            recipient: ctx.address().recipient(),
        });

        let fut = join_session(self.store.clone(), self.room.clone(), self.conn_id);
        ctx.wait(fut.into_actor(self).map(|res, act, ctx| match res {
            Ok(outcome) => act.on_joined(outcome, ctx),
            Err(e) => {
                warn!("[Connection] Join of {} to room={} failed: {}", act.conn_id, act.room, e);
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Again,
                    description: Some("Session unavailable, try again".into()),
                }));
                ctx.stop();
            }
        }));
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.registry.do_send(Unsubscribe {
            room: self.room.clone(),
            conn_id: self.conn_id,
        });

        let store = self.store.clone();
        let room = self.room.clone();
        let conn_id = self.conn_id;
        actix::spawn(async move {
            if let Err(e) = leave_session(store, room.clone(), conn_id).await {
                warn!("[Connection] Leave of {} from room={} failed: {}", conn_id, room, e);
            }
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for PlayerConnection {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => self.handle_text(&text, ctx),
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Binary(_)) => {
                debug!("[Connection] Ignoring binary frame from {}", self.conn_id);
            }
            Ok(_) => (),
            Err(e) => {
                warn!("[Connection] Protocol error from {}: {}", self.conn_id, e);
                ctx.stop();
            }
        }
    }
}

impl Handler<ServerEvent> for PlayerConnection {
    type Result = ();

    fn handle(&mut self, msg: ServerEvent, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => error!("[Connection] Failed to serialize event for {}: {}", self.conn_id, e),
        }
    }
}

pub fn is_valid_room_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= ROOM_CODE_MAX_LEN
        && code.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// WebSocket endpoint of a game session: `/ws/game/{room_code}`.
pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    room: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let room = room.into_inner();
    if !is_valid_room_code(&room) {
        debug!("[Connection] Rejected room code {:?}", room);
        return Ok(http_error_response(
            "INVALID_ROOM_CODE",
            "Room codes are 1 to 100 letters, digits, '-' or '_'.",
            Some(&room),
            StatusCode::BAD_REQUEST,
        ));
    }

    ws::start(
        PlayerConnection::new(room, data.store.clone(), data.registry.clone()),
        &req,
        stream,
    )
}
