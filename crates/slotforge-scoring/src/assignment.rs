//! Slot-to-session mapping.

/// Maps slot indices to session indices.
///
/// Each slot holds at most one session. Placing a session twice is a
/// caller error; [`Assignment::slot_of`] finds the first slot only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    slots: Vec<Option<usize>>,
}

impl Assignment {
    /// Creates an empty assignment over `slot_count` slots.
    pub fn with_slot_count(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn get(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn is_occupied(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    /// Puts `session` into `slot`, returning the session it displaced.
    pub fn place(&mut self, slot: usize, session: usize) -> Option<usize> {
        self.slots[slot].replace(session)
    }

    /// Empties `slot`, returning its session.
    pub fn take(&mut self, slot: usize) -> Option<usize> {
        self.slots[slot].take()
    }

    pub fn slot_of(&self, session: usize) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(session))
    }

    pub fn contains_session(&self, session: usize) -> bool {
        self.slot_of(session).is_some()
    }

    /// Iterates `(slot, session)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, session)| session.map(|s| (slot, s)))
    }

    /// Returns a copy with every placement of `other` laid over this one.
    pub fn overlay(&self, other: &Assignment) -> Assignment {
        let mut merged = self.clone();
        for (slot, session) in other.iter() {
            merged.place(slot, session);
        }
        merged
    }

    /// Swaps the contents of two slots, whichever of them are occupied.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
    }
}
