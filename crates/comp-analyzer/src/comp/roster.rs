// Five-slot team rosters and pick normalization.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Number of slots on a roster, one per role.
pub const ROSTER_SIZE: usize = 5;

/// A champion pick in a single role slot. `name` is empty while the slot is unfilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub role: Role,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// Whether the slot holds a pick (non-blank after trimming).
    pub fn is_filled(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// A team's five role slots, always in TOP, JUNGLE, MID, ADC, SUPPORT order.
///
/// Slot roles are fixed at construction; only the names change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    slots: [RosterEntry; ROSTER_SIZE],
}

impl Roster {
    /// A roster with every slot blank.
    pub fn empty() -> Self {
        Self {
            slots: Role::ALL.map(|role| RosterEntry::new(String::new(), role)),
        }
    }

    /// Build a roster from names given in role order.
    ///
    /// Fewer than five names leaves the trailing slots blank. Returns `None`
    /// when more than five names are supplied.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        if names.len() > ROSTER_SIZE {
            return None;
        }
        let mut roster = Self::empty();
        for (slot, name) in roster.slots.iter_mut().zip(names) {
            slot.name = name.as_ref().to_string();
        }
        Some(roster)
    }

    /// Replace the pick in the given role's slot.
    pub fn set_pick(&mut self, role: Role, name: impl Into<String>) {
        self.slots[role.slot_index()].name = name.into();
    }

    /// The entry for a role.
    pub fn slot(&self, role: Role) -> &RosterEntry {
        &self.slots[role.slot_index()]
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.slots
    }

    /// Filled slots in role order, with names trimmed.
    pub fn picks(&self) -> Vec<RosterEntry> {
        self.slots
            .iter()
            .filter(|s| s.is_filled())
            .map(|s| RosterEntry::new(s.name.trim(), s.role))
            .collect()
    }

    /// Whether every slot is filled.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(RosterEntry::is_filled)
    }

    /// The normalized picks, or `None` if any slot is blank.
    pub fn complete_picks(&self) -> Option<Vec<RosterEntry>> {
        let picks = self.picks();
        if picks.len() < ROSTER_SIZE {
            return None;
        }
        Some(picks)
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::empty()
    }
}
