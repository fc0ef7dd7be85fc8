//! Cyclic space–time reservation table.
//!
//! # Modular time
//!
//! Reservations are keyed by `(x, y, t mod time_length)`.  The modulus (T,
//! default 4999) is far larger than any planning window, so a live window
//! can never alias a slot it also plans through; entries older than T ticks
//! are simply overwritten when the wheel comes around.  Nothing is ever
//! garbage-collected on a timer — expiry is implicit in the arithmetic.
//!
//! # Sharing
//!
//! One table is shared by all agents of a player.  Writes happen only from
//! the agent currently being ticked (the outer loop is sequential), so the
//! order agents plan in decides who wins a contested slot — which is exactly
//! the reproducibility contract the engine wants.

use std::collections::HashMap;

use gp_core::{AgentId, CPos, Tick};

/// Sparse `(x, y, t mod T) → owner` table.
pub struct ReservationTable {
    time_length: u32,
    slots: HashMap<(i32, i32, u32), AgentId>,
}

impl ReservationTable {
    /// Create a table with modulus `time_length`.
    pub fn new(time_length: u32) -> ReservationTable {
        debug_assert!(time_length > 0, "time_length must be nonzero");
        ReservationTable { time_length, slots: HashMap::new() }
    }

    #[inline]
    fn slot(&self, cell: CPos, t: Tick) -> (i32, i32, u32) {
        (cell.x, cell.y, (t.0 % self.time_length as u64) as u32)
    }

    /// Claim `cell` at tick `t` for `agent`, displacing any prior owner.
    pub fn reserve(&mut self, cell: CPos, t: Tick, agent: AgentId) {
        let slot = self.slot(cell, t);
        self.slots.insert(slot, agent);
    }

    /// Release `cell` at tick `t` if — and only if — `agent` owns it.
    /// Another agent's claim on the same slot is left alone.
    pub fn free(&mut self, cell: CPos, t: Tick, agent: AgentId) {
        let slot = self.slot(cell, t);
        if self.slots.get(&slot) == Some(&agent) {
            self.slots.remove(&slot);
        }
    }

    /// Release every slot owned by `agent`.
    pub fn free_all(&mut self, agent: AgentId) {
        self.slots.retain(|_, owner| *owner != agent);
    }

    /// `true` if any agent holds `cell` at tick `t`.
    #[inline]
    pub fn is_reserved(&self, cell: CPos, t: Tick) -> bool {
        self.slots.contains_key(&self.slot(cell, t))
    }

    /// `true` if an agent *other than* `agent` holds `cell` at tick `t` —
    /// the query cooperative searches plan against.
    #[inline]
    pub fn reserved_by_other(&self, cell: CPos, t: Tick, agent: AgentId) -> bool {
        match self.slots.get(&self.slot(cell, t)) {
            Some(owner) => *owner != agent,
            None => false,
        }
    }

    /// The owner of `cell` at tick `t`, if reserved.
    #[inline]
    pub fn owner(&self, cell: CPos, t: Tick) -> Option<AgentId> {
        self.slots.get(&self.slot(cell, t)).copied()
    }

    /// Number of live reservation entries (all agents).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
