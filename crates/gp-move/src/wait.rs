//! `WaitFor` — a tick-counted wait that ends early at a rewindow boundary.

use crate::{Activity, Agent, MoveContext, Step};

/// Counts down a fixed number of ticks — the time the move plan expects the
/// agent to sit on its cell — but completes early when the world crosses a
/// forced-rewindow boundary, so a waiting agent never sleeps through a
/// global replan.
pub struct WaitFor {
    remaining: u64,
    /// Ticks between forced rewindow boundaries for the owning agent.
    boundary_period: u64,
}

impl WaitFor {
    pub fn new(remaining: u64, boundary_period: u64) -> WaitFor {
        WaitFor { remaining, boundary_period: boundary_period.max(1) }
    }
}

impl Activity for WaitFor {
    fn tick(&mut self, _agent: &mut Agent, ctx: &mut MoveContext<'_>) -> Step {
        if self.remaining == 0 || ctx.now.0 % self.boundary_period == 0 {
            return Step::Complete;
        }
        self.remaining -= 1;
        Step::Continue
    }
}
