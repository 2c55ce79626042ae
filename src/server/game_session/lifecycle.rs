//! Join, input and leave flows of a connection.
//!
//! Each flow is a sequence of store round-trips. Other connections and the
//! simulation loop may interleave with them at every await point; game-state
//! writes are last-write-wins, slot changes and the running claim are atomic.

use std::time::Duration;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::server::{LEAVE_ATTEMPTS, LEAVE_RETRY_BACKOFF_MS};

use crate::game::state::GameState;
use crate::game::types::{Direction, Role};
use crate::server::store::{SessionStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub role: Role,
    /// Current snapshot, to broadcast right away.
    pub state: GameState,
    /// This connection won the running claim and must start the loop.
    pub start_simulation: bool,
}

/// Claim a slot (or observe), make sure a snapshot exists, and decide whether
/// this connection is the one that starts the simulation.
///
/// The player who takes an empty room starts from a fresh snapshot, whatever
/// was left in the store.
pub async fn join_session(store: SessionStore, room: String, conn_id: Uuid) -> Result<JoinOutcome, StoreError> {
    let (role, slots) = store.claim_slot(&room, conn_id).await?;

    let forming = role.is_player() && slots.occupied() == 1;
    let state = match store.game_state(&room).await? {
        Some(state) if !forming => state,
        _ => {
            let fresh = GameState::new();
            store.set_game_state(&room, &fresh).await?;
            fresh
        }
    };

    let start_simulation = role.is_player() && slots.is_full() && store.claim_running(&room).await?;

    info!("[Connection] {} joined room={} as {:?}", conn_id, room, role);
    Ok(JoinOutcome { role, state, start_simulation })
}

/// Move `role`'s paddle one step. Returns the snapshot to broadcast, or `None`
/// when the room has no game state yet.
pub async fn apply_input(
    store: SessionStore,
    room: String,
    role: Role,
    direction: Direction,
) -> Result<Option<GameState>, StoreError> {
    let Some(mut state) = store.game_state(&room).await? else {
        return Ok(None);
    };
    // A clamped move changes nothing; skip the write so a concurrent tick is not overwritten.
    if state.apply_move(role, direction) {
        store.set_game_state(&room, &state).await?;
    }
    Ok(Some(state))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub released: Option<Role>,
    /// The last player left; the room was reset.
    pub emptied: bool,
}

/// Give up the connection's slot. When that leaves the room without players,
/// stop the simulation and reset the snapshot for whoever joins next.
///
/// Store failures are retried with a growing delay, so a brief outage does not
/// leave the slot or the running flag behind.
pub async fn leave_session(store: SessionStore, room: String, conn_id: Uuid) -> Result<LeaveOutcome, StoreError> {
    let mut released = None;
    let mut backoff = Duration::from_millis(LEAVE_RETRY_BACKOFF_MS);
    let mut attempt = 1;
    loop {
        match leave_attempt(&store, &room, conn_id, &mut released).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) if attempt < LEAVE_ATTEMPTS => {
                warn!(
                    "[Connection] Leave of {} from room={} failed (attempt {}), retrying in {:?}: {}",
                    conn_id, room, attempt, backoff, e
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// One pass of the leave flow. `released` survives between passes: once the
/// slot is freed a later pass still finishes the room reset.
async fn leave_attempt(
    store: &SessionStore,
    room: &str,
    conn_id: Uuid,
    released: &mut Option<Role>,
) -> Result<LeaveOutcome, StoreError> {
    let (now_released, remaining) = store.release_slot(room, conn_id).await?;
    if now_released.is_some() {
        *released = now_released;
    }
    let emptied = released.is_some() && remaining.is_empty();
    if emptied {
        store.clear_running(room).await?;
        store.reset_game_state(room).await?;
        info!("[Connection] Room {} is empty, game reset", room);
    } else {
        debug!("[Connection] {} left room={} (released {:?})", conn_id, room, released);
    }
    Ok(LeaveOutcome { released: *released, emptied })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::store::{MemoryBackend, StateStore};
    use crate::server::test_support::{FlakyBackend, memory_store, settle};
    use actix::Actor;

    #[actix::test]
    async fn test_two_joins_start_the_loop_once() {
        let store = memory_store();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let first = join_session(store.clone(), "ABCDEF".into(), a).await.unwrap();
        assert_eq!(first.role, Role::First);
        assert!(!first.start_simulation);

        let second = join_session(store.clone(), "ABCDEF".into(), b).await.unwrap();
        assert_eq!(second.role, Role::Second);
        assert!(second.start_simulation);

        let observer = join_session(store.clone(), "ABCDEF".into(), c).await.unwrap();
        assert_eq!(observer.role, Role::Observer);
        assert!(!observer.start_simulation);
        assert!(store.is_running("ABCDEF").await.unwrap());
    }

    #[actix::test]
    async fn test_concurrent_joins_start_exactly_one_loop() {
        let store = memory_store();
        let (a, b) = tokio::join!(
            join_session(store.clone(), "race".into(), Uuid::new_v4()),
            join_session(store.clone(), "race".into(), Uuid::new_v4()),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.role, b.role);
        assert!(a.role.is_player() && b.role.is_player());
        assert_eq!(
            [a.start_simulation, b.start_simulation].iter().filter(|s| **s).count(),
            1
        );
    }

    #[actix::test]
    async fn test_late_joiner_sees_current_state() {
        let store = memory_store();
        join_session(store.clone(), "room".into(), Uuid::new_v4()).await.unwrap();
        let mut state = GameState::new();
        state.score.second = 3;
        store.set_game_state("room", &state).await.unwrap();

        let outcome = join_session(store.clone(), "room".into(), Uuid::new_v4()).await.unwrap();
        assert_eq!(outcome.role, Role::Second);
        assert_eq!(outcome.state, state);
    }

    #[actix::test]
    async fn test_join_into_empty_room_discards_leftover_state() {
        let store = memory_store();
        let mut stale = GameState::new();
        stale.score.first = 3;
        stale.ball.x = 411;
        store.set_game_state("room", &stale).await.unwrap();

        let outcome = join_session(store.clone(), "room".into(), Uuid::new_v4()).await.unwrap();
        assert_eq!(outcome.role, Role::First);
        assert_eq!(outcome.state, GameState::new());
        assert_eq!(store.game_state("room").await.unwrap(), Some(GameState::new()));
    }

    #[actix::test]
    async fn test_first_join_creates_fresh_state() {
        let store = memory_store();
        let outcome = join_session(store.clone(), "room".into(), Uuid::new_v4()).await.unwrap();
        assert_eq!(outcome.state, GameState::new());
        assert_eq!(store.game_state("room").await.unwrap(), Some(GameState::new()));
    }

    #[actix::test]
    async fn test_move_up_is_stored() {
        let store = memory_store();
        join_session(store.clone(), "room".into(), Uuid::new_v4()).await.unwrap();

        let state = apply_input(store.clone(), "room".into(), Role::First, Direction::Up)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.first.y, 130);
        assert_eq!(store.game_state("room").await.unwrap().unwrap().first.y, 130);
    }

    #[actix::test]
    async fn test_move_up_clamps_at_top() {
        let store = memory_store();
        let mut state = GameState::new();
        state.second.y = 15;
        store.set_game_state("room", &state).await.unwrap();

        for expected in [0, 0] {
            let state = apply_input(store.clone(), "room".into(), Role::Second, Direction::Up)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(state.second.y, expected);
        }
    }

    #[actix::test]
    async fn test_input_without_state_is_ignored() {
        let store = memory_store();
        let result = apply_input(store.clone(), "room".into(), Role::First, Direction::Down)
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(store.game_state("room").await.unwrap().is_none());
    }

    #[actix::test]
    async fn test_both_players_leaving_resets_room() {
        let store = memory_store();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        join_session(store.clone(), "room".into(), a).await.unwrap();
        join_session(store.clone(), "room".into(), b).await.unwrap();
        apply_input(store.clone(), "room".into(), Role::First, Direction::Up).await.unwrap();

        let outcome = leave_session(store.clone(), "room".into(), a).await.unwrap();
        assert_eq!(outcome, LeaveOutcome { released: Some(Role::First), emptied: false });
        assert!(store.is_running("room").await.unwrap());

        let outcome = leave_session(store.clone(), "room".into(), b).await.unwrap();
        assert_eq!(outcome, LeaveOutcome { released: Some(Role::Second), emptied: true });
        assert!(store.slots("room").await.unwrap().is_empty());
        assert!(!store.is_running("room").await.unwrap());
        assert_eq!(store.game_state("room").await.unwrap(), Some(GameState::new()));
    }

    #[actix::test]
    async fn test_observer_leaving_changes_nothing() {
        let store = memory_store();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        for id in [a, b, c] {
            join_session(store.clone(), "room".into(), id).await.unwrap();
        }
        let outcome = leave_session(store.clone(), "room".into(), c).await.unwrap();
        assert_eq!(outcome, LeaveOutcome { released: None, emptied: false });
        assert_eq!(store.slots("room").await.unwrap().occupied(), 2);
        assert!(store.is_running("room").await.unwrap());
    }

    #[actix::test]
    async fn test_rejoin_after_reset_becomes_first() {
        let store = memory_store();
        let a = Uuid::new_v4();
        join_session(store.clone(), "room".into(), a).await.unwrap();
        leave_session(store.clone(), "room".into(), a).await.unwrap();

        let outcome = join_session(store.clone(), "room".into(), Uuid::new_v4()).await.unwrap();
        assert_eq!(outcome.role, Role::First);
        assert_eq!(outcome.state, GameState::new());
    }

    #[actix::test]
    async fn test_leave_survives_brief_store_outage() {
        let (backend, failing) = FlakyBackend::new(MemoryBackend::new());
        let store = SessionStore::new(StateStore::new(Box::new(backend)).start());
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        join_session(store.clone(), "room".into(), a).await.unwrap();
        join_session(store.clone(), "room".into(), b).await.unwrap();

        failing.set(true);
        let leaving = actix::spawn(leave_session(store.clone(), "room".into(), a));
        settle().await;
        failing.set(false);
        let outcome = leaving.await.unwrap().unwrap();
        assert_eq!(outcome, LeaveOutcome { released: Some(Role::First), emptied: false });

        let outcome = leave_session(store.clone(), "room".into(), b).await.unwrap();
        assert!(outcome.emptied);
        assert!(!store.is_running("room").await.unwrap());

        let first = join_session(store.clone(), "room".into(), Uuid::new_v4()).await.unwrap();
        let second = join_session(store.clone(), "room".into(), Uuid::new_v4()).await.unwrap();
        assert_eq!((first.role, second.role), (Role::First, Role::Second));
    }

    #[actix::test]
    async fn test_leave_gives_up_after_bounded_retries() {
        let (backend, failing) = FlakyBackend::new(MemoryBackend::new());
        let store = SessionStore::new(StateStore::new(Box::new(backend)).start());
        let a = Uuid::new_v4();
        join_session(store.clone(), "room".into(), a).await.unwrap();

        failing.set(true);
        let result = leave_session(store.clone(), "room".into(), a).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }
}
