use actix::prelude::*;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use super::match_loop::MatchLoop;
use crate::game::state::GameState;
use crate::game::types::{Direction, Role, Score};
use crate::server::recorder::MatchResult;

/// Frame sent by a client.
///
/// Unknown actions parse as `Action::Other` and are ignored; anything that is
/// not an object with these fields fails to parse and is ignored too.
#[derive(Debug, Deserialize)]
pub struct ClientInput {
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveUp,
    MoveDown,
    #[default]
    #[serde(other)]
    Other,
}

impl Action {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::MoveUp => Some(Direction::Up),
            Action::MoveDown => Some(Direction::Down),
            Action::Other => None,
        }
    }
}

/// First frame a connection receives: `{"role": ...}`.
#[derive(Debug, Serialize)]
pub struct RoleAssigned {
    pub role: Role,
}

/// Events fanned out to every connection of a session.
#[derive(Message, Clone, Debug, PartialEq, Serialize)]
#[rtype(result = "()")]
#[serde(untagged)]
pub enum ServerEvent {
    GameState {
        #[serde(rename = "gameState")]
        game_state: GameState,
    },
    MatchEnded {
        #[serde(rename = "matchEnded")]
        match_ended: bool,
        winner: Role,
        score: Score,
    },
}

impl ServerEvent {
    pub fn state(game_state: GameState) -> Self {
        Self::GameState { game_state }
    }

    pub fn match_ended(result: &MatchResult) -> Self {
        Self::MatchEnded {
            match_ended: true,
            winner: result.winner,
            score: result.score,
        }
    }
}

/// Join the broadcast group of a room.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Subscribe {
    pub room: String,
    pub conn_id: Uuid,
    pub recipient: Recipient<ServerEvent>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Unsubscribe {
    pub room: String,
    pub conn_id: Uuid,
}

/// Deliver `event` once to every connection currently in the room's group.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Broadcast {
    pub room: String,
    pub event: ServerEvent,
}

/// Spawn the room's simulation loop. Sent only by the winner of the running claim.
/// Answers false when this process already runs a loop for the room.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct StartSimulation {
    pub room: String,
}

/// Sent by a loop when it stops, so the registry can drop it.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SimulationStopped {
    pub room: String,
    pub addr: Addr<MatchLoop>,
}
