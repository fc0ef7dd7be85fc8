//! `Turn` — rotate in place toward a desired facing.

use gp_core::Facing;

use crate::{Activity, Agent, MoveContext, Step};

/// Rotates the agent by `turn_speed` facing units per tick and completes
/// when the desired facing is reached.  Agents with a zero turn speed snap
/// instantly.
pub struct Turn {
    desired: Facing,
}

impl Turn {
    pub fn new(desired: Facing) -> Turn {
        Turn { desired }
    }
}

impl Activity for Turn {
    fn tick(&mut self, agent: &mut Agent, _ctx: &mut MoveContext<'_>) -> Step {
        if agent.turn_speed == 0 {
            agent.facing = self.desired;
            return Step::Complete;
        }
        agent.facing = agent.facing.rotate_toward(self.desired, agent.turn_speed);
        if agent.facing == self.desired {
            Step::Complete
        } else {
            Step::Continue
        }
    }
}
