use serde::{Serialize, Deserialize};

/// Role a connection plays in a session.
///
/// The first two connections to claim a slot become `First` and `Second`;
/// everyone else watches as an `Observer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    First,
    Second,
    Observer,
}

impl Role {
    /// Role owning the given slot position, if it is a player slot.
    pub fn from_slot(index: usize) -> Option<Self> {
        match index {
            0 => Some(Role::First),
            1 => Some(Role::Second),
            _ => None,
        }
    }

    pub fn is_player(self) -> bool {
        matches!(self, Role::First | Role::Second)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub first: u32,
    pub second: u32,
}

impl Score {
    pub fn increment(&mut self, role: Role) {
        match role {
            Role::First => self.first += 1,
            Role::Second => self.second += 1,
            Role::Observer => {}
        }
    }

    /// Player whose score has reached `threshold`, if any.
    pub fn leader_at(&self, threshold: u32) -> Option<Role> {
        if self.first >= threshold {
            Some(Role::First)
        } else if self.second >= threshold {
            Some(Role::Second)
        } else {
            None
        }
    }
}
