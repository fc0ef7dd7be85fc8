//! The activity abstraction: tickable states on a per-agent stack.
//!
//! # Contract
//!
//! One `tick` call per simulation tick reaches the *top* of the stack only.
//! An activity that pushes a child yields until the child completes; every
//! activity therefore consumes whole ticks and never observes the world
//! mid-tick.  Cancellation is cooperative: non-interruptible activities
//! (the half-steps, which must not strand an agent between cell centres)
//! finish before the cancel takes effect.

use gp_core::{PathConfig, Tick};
use gp_grid::{ActorMap, GridMap, Locomotor, ReservationTable};
use gp_search::{CellInfoPool, Pathfinder};

use crate::Agent;

// ── MoveContext ───────────────────────────────────────────────────────────────

/// The world facilities an activity may touch during one tick, split-
/// borrowed from whatever owns them.  Activities that need a search
/// context assemble one from these fields so the field borrows stay
/// disjoint.
pub struct MoveContext<'a> {
    pub map: &'a GridMap,
    pub locomotor: &'a Locomotor,
    pub actors: &'a mut ActorMap,
    pub reservations: &'a mut ReservationTable,
    pub pathfinder: &'a mut Pathfinder,
    pub pool: &'a mut CellInfoPool,
    pub config: &'a PathConfig,
    pub now: Tick,
}

// ── Activity ──────────────────────────────────────────────────────────────────

/// What an activity's tick did.
pub enum Step {
    /// Consumed the tick; call again next tick.
    Continue,
    /// Finished; pop from the stack.
    Complete,
    /// Queue a child; it starts next tick and runs to completion before
    /// this activity resumes.
    Push(Box<dyn Activity>),
}

/// A tickable state on an agent's activity stack.
pub trait Activity {
    fn tick(&mut self, agent: &mut Agent, ctx: &mut MoveContext<'_>) -> Step;

    /// Clean up when the activity is removed before completing (free held
    /// reservations, return pooled layers).
    fn cancel(&mut self, _agent: &mut Agent, _ctx: &mut MoveContext<'_>) {}

    /// Non-interruptible activities keep running after a cancel request
    /// until they complete on their own.
    fn is_interruptible(&self) -> bool {
        true
    }
}

// ── ActivityStack ─────────────────────────────────────────────────────────────

/// The per-agent stack driver.
#[derive(Default)]
pub struct ActivityStack {
    stack: Vec<Box<dyn Activity>>,
    cancel_requested: bool,
}

impl ActivityStack {
    pub fn new() -> ActivityStack {
        Self::default()
    }

    /// `true` when no activity is queued.
    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Begin a new root activity.
    pub fn push(&mut self, activity: Box<dyn Activity>) {
        self.stack.push(activity);
    }

    /// Request cancellation.  Interruptible activities are unwound at the
    /// next tick boundary; a non-interruptible top (a half-step) finishes
    /// first so the agent is never stranded between cells.
    pub fn cancel(&mut self) {
        self.cancel_requested = true;
    }

    /// Drive the top of the stack for one tick.
    pub fn tick(&mut self, agent: &mut Agent, ctx: &mut MoveContext<'_>) {
        if self.cancel_requested {
            self.unwind(agent, ctx);
            if self.stack.is_empty() {
                self.cancel_requested = false;
                return;
            }
        }

        let Some(top) = self.stack.last_mut() else {
            return;
        };
        match top.tick(agent, ctx) {
            Step::Continue => {}
            Step::Complete => {
                self.stack.pop();
            }
            Step::Push(child) => self.stack.push(child),
        }
    }

    /// Pop interruptible activities (calling their `cancel`) until the
    /// stack is empty or a non-interruptible activity is on top.
    fn unwind(&mut self, agent: &mut Agent, ctx: &mut MoveContext<'_>) {
        while let Some(top) = self.stack.last() {
            if !top.is_interruptible() {
                break;
            }
            if let Some(mut activity) = self.stack.pop() {
                activity.cancel(agent, ctx);
            }
        }
        if self.stack.is_empty() {
            self.cancel_requested = false;
        }
    }
}
