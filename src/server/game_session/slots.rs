//! Player slot assignment for one session.
//!
//! Two fixed positions, `[first, second]`. A joiner takes the lowest free
//! position and a leaver frees only its own, so the remaining player never
//! changes role.

use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::config::game::MAX_PLAYERS;
use crate::game::types::Role;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slots([Option<Uuid>; MAX_PLAYERS]);

impl Slots {
    pub fn occupied(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied() == 0
    }

    pub fn is_full(&self) -> bool {
        self.occupied() == MAX_PLAYERS
    }

    pub fn role_of(&self, conn_id: Uuid) -> Option<Role> {
        self.0
            .iter()
            .position(|slot| *slot == Some(conn_id))
            .and_then(Role::from_slot)
    }

    /// Put `conn_id` in the lowest free slot. `None` when both are taken.
    pub fn claim(&mut self, conn_id: Uuid) -> Option<Role> {
        let index = self.0.iter().position(Option::is_none)?;
        self.0[index] = Some(conn_id);
        Role::from_slot(index)
    }

    /// Free the slot held by `conn_id`, returning the role it had.
    pub fn release(&mut self, conn_id: Uuid) -> Option<Role> {
        let index = self.0.iter().position(|slot| *slot == Some(conn_id))?;
        self.0[index] = None;
        Role::from_slot(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_order_and_capacity() {
        let mut slots = Slots::default();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(slots.claim(a), Some(Role::First));
        assert_eq!(slots.claim(b), Some(Role::Second));
        assert_eq!(slots.claim(c), None);
        assert!(slots.is_full());
        assert_eq!(slots.role_of(c), None);
    }

    #[test]
    fn test_release_does_not_compact() {
        let mut slots = Slots::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        slots.claim(a);
        slots.claim(b);
        assert_eq!(slots.release(a), Some(Role::First));
        assert_eq!(slots.role_of(b), Some(Role::Second));
        assert_eq!(slots.occupied(), 1);
        assert_eq!(slots.release(a), None);
    }

    #[test]
    fn test_serializes_as_two_entry_list() {
        let mut slots = Slots::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        slots.claim(a);
        slots.claim(b);
        slots.release(a);
        let value = serde_json::to_value(&slots).unwrap();
        assert_eq!(value, serde_json::json!([null, b.to_string()]));
    }
}
