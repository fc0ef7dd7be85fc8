//! The two-phase visual interpolation of a committed step.
//!
//! A step from one cell to the next is rendered as two halves: first from
//! the current position to the midpoint between the cells, then from the
//! midpoint into the new cell's centre.  Splitting at the midpoint is what
//! lets consecutive steps curve: when the next step continues in a
//! compatible direction, the second half is skipped and the next first
//! half starts from the midpoint, so the agent's position never snaps.
//!
//! Both halves are non-interruptible.  Cancelling mid-half would leave the
//! agent's visual position between cells with no activity responsible for
//! resolving it.

use gp_core::WPos;

use crate::{Activity, Agent, MoveContext, Step};

/// Linear interpolation toward a target point over a fixed tick count.
struct Interpolation {
    from: WPos,
    to: WPos,
    total: u32,
    done: u32,
}

impl Interpolation {
    fn new(from: WPos, to: WPos, total: u32) -> Interpolation {
        Interpolation { from, to, total: total.max(1), done: 0 }
    }

    /// Advance one tick; `true` when the target is reached.
    fn advance(&mut self, agent: &mut Agent) -> bool {
        self.done += 1;
        agent.position = self.from.lerp(self.to, self.done as i32, self.total as i32);
        self.done >= self.total
    }
}

// ── MoveFirstHalf ─────────────────────────────────────────────────────────────

/// Carry the agent from its current position to the midpoint between
/// `from_cell` and `to_cell`.
pub struct MoveFirstHalf {
    interp: Interpolation,
}

impl MoveFirstHalf {
    /// `ticks` is the traverse time of the half at the agent's effective
    /// speed (already computed by the move activity).
    pub fn new(from: WPos, to: WPos, ticks: u32) -> MoveFirstHalf {
        MoveFirstHalf { interp: Interpolation::new(from, to, ticks) }
    }
}

impl Activity for MoveFirstHalf {
    fn tick(&mut self, agent: &mut Agent, _ctx: &mut MoveContext<'_>) -> Step {
        if self.interp.advance(agent) {
            Step::Complete
        } else {
            Step::Continue
        }
    }

    fn is_interruptible(&self) -> bool {
        false
    }
}

// ── MoveSecondHalf ────────────────────────────────────────────────────────────

/// Carry the agent from the midpoint into the centre of `to_cell` and
/// finalize the step: `from_cell` catches up with `to_cell`.
pub struct MoveSecondHalf {
    interp: Interpolation,
}

impl MoveSecondHalf {
    pub fn new(from: WPos, to: WPos, ticks: u32) -> MoveSecondHalf {
        MoveSecondHalf { interp: Interpolation::new(from, to, ticks) }
    }
}

impl Activity for MoveSecondHalf {
    fn tick(&mut self, agent: &mut Agent, _ctx: &mut MoveContext<'_>) -> Step {
        if self.interp.advance(agent) {
            agent.from_cell = agent.to_cell;
            agent.from_subcell = agent.to_subcell;
            Step::Complete
        } else {
            Step::Continue
        }
    }

    fn is_interruptible(&self) -> bool {
        false
    }
}
