//! Typed per-session view over the `StateStore` actor.
//!
//! Keys are namespaced by room code:
//! - `pingpong:{room}:slots`   -> `Slots` (JSON)
//! - `pingpong:{room}:state`   -> `GameState` (JSON)
//! - `pingpong:{room}:running` -> present while a simulation loop owns the room

use std::time::Duration;

use actix::Addr;
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::StoreError;
use super::actor::{CompareAndSet, Delete, Get, Set, StateStore};
use crate::config::server::{SLOT_CLAIM_ATTEMPTS, STORE_TIMEOUT_MS};
use crate::game::state::GameState;
use crate::game::types::Role;
use crate::server::game_session::slots::Slots;

const RUNNING_MARKER: &str = "true";

fn slots_key(room: &str) -> String {
    format!("pingpong:{}:slots", room)
}

fn state_key(room: &str) -> String {
    format!("pingpong:{}:state", room)
}

fn running_key(room: &str) -> String {
    format!("pingpong:{}:running", room)
}

fn decode<T: DeserializeOwned>(raw: Option<&str>) -> Result<Option<T>, StoreError> {
    raw.map(|s| serde_json::from_str::<T>(s))
        .transpose()
        .map_err(StoreError::from)
}

fn encode<T: Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(StoreError::from)
}

/// Cheap, cloneable handle given to every connection and loop.
#[derive(Clone)]
pub struct SessionStore {
    addr: Addr<StateStore>,
    timeout: Duration,
}

impl SessionStore {
    pub fn new(addr: Addr<StateStore>) -> Self {
        Self {
            addr,
            timeout: Duration::from_millis(STORE_TIMEOUT_MS),
        }
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.addr
            .send(Get { key: key.to_string() })
            .timeout(self.timeout)
            .await?
    }

    async fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.addr
            .send(Set { key: key.to_string(), value })
            .timeout(self.timeout)
            .await?
    }

    async fn delete_raw(&self, key: &str) -> Result<(), StoreError> {
        self.addr
            .send(Delete { key: key.to_string() })
            .timeout(self.timeout)
            .await?
    }

    async fn compare_and_set_raw(
        &self,
        key: &str,
        expected: Option<String>,
        new: Option<String>,
    ) -> Result<bool, StoreError> {
        self.addr
            .send(CompareAndSet { key: key.to_string(), expected, new })
            .timeout(self.timeout)
            .await?
    }

    #[cfg(test)]
    pub async fn slots(&self, room: &str) -> Result<Slots, StoreError> {
        let raw = self.get_raw(&slots_key(room)).await?;
        Ok(decode(raw.as_deref())?.unwrap_or_default())
    }

    /// Take the lowest free player slot for `conn_id`.
    ///
    /// Answers `Role::Observer` when both slots are taken by other connections.
    /// Concurrent claims are resolved by compare-and-set, so two connections
    /// can never end up with the same role.
    pub async fn claim_slot(&self, room: &str, conn_id: Uuid) -> Result<(Role, Slots), StoreError> {
        let key = slots_key(room);
        for _ in 0..SLOT_CLAIM_ATTEMPTS {
            let current = self.get_raw(&key).await?;
            let mut slots: Slots = decode(current.as_deref())?.unwrap_or_default();
            if let Some(role) = slots.role_of(conn_id) {
                return Ok((role, slots));
            }
            let Some(role) = slots.claim(conn_id) else {
                return Ok((Role::Observer, slots));
            };
            if self.compare_and_set_raw(&key, current, Some(encode(&slots)?)).await? {
                return Ok((role, slots));
            }
            debug!("[Store] Slot claim raced for room={}, retrying", room);
        }
        Err(StoreError::Contention { key })
    }

    /// Free the slot held by `conn_id`, leaving the other slot where it is.
    ///
    /// Returns the role that was released (if the connection held one) and the
    /// slots that remain. The key is removed once no slot is occupied.
    pub async fn release_slot(&self, room: &str, conn_id: Uuid) -> Result<(Option<Role>, Slots), StoreError> {
        let key = slots_key(room);
        for _ in 0..SLOT_CLAIM_ATTEMPTS {
            let current = self.get_raw(&key).await?;
            let mut slots: Slots = decode(current.as_deref())?.unwrap_or_default();
            let Some(role) = slots.release(conn_id) else {
                return Ok((None, slots));
            };
            let new = if slots.is_empty() { None } else { Some(encode(&slots)?) };
            if self.compare_and_set_raw(&key, current, new).await? {
                return Ok((Some(role), slots));
            }
            debug!("[Store] Slot release raced for room={}, retrying", room);
        }
        Err(StoreError::Contention { key })
    }

    pub async fn game_state(&self, room: &str) -> Result<Option<GameState>, StoreError> {
        let raw = self.get_raw(&state_key(room)).await?;
        decode(raw.as_deref())
    }

    /// Last write wins.
    pub async fn set_game_state(&self, room: &str, state: &GameState) -> Result<(), StoreError> {
        self.set_raw(&state_key(room), encode(state)?).await
    }

    /// Overwrite the stored snapshot with a fresh game.
    pub async fn reset_game_state(&self, room: &str) -> Result<(), StoreError> {
        self.set_game_state(room, &GameState::new()).await
    }

    /// Atomically mark the room as simulated. Exactly one caller wins while the flag is set.
    pub async fn claim_running(&self, room: &str) -> Result<bool, StoreError> {
        self.compare_and_set_raw(&running_key(room), None, Some(RUNNING_MARKER.to_string()))
            .await
    }

    pub async fn clear_running(&self, room: &str) -> Result<(), StoreError> {
        self.delete_raw(&running_key(room)).await
    }

    pub async fn is_running(&self, room: &str) -> Result<bool, StoreError> {
        Ok(self.get_raw(&running_key(room)).await?.is_some())
    }
}
