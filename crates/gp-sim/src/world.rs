//! The `World` struct and its tick loop.

use gp_core::{AgentId, CPos, PathConfig, Tick};
use gp_grid::{ActorMap, GridMap, Locomotor, ReservationTable};
use gp_move::{ActivityStack, Agent, Move, MoveContext};
use gp_search::{CellInfoPool, Pathfinder};

use crate::{SimError, SimResult, WorldObserver};

/// Owns the map, the shared planning state, and every agent.
///
/// One reservation table exists per player; an agent reads and writes only
/// its owner's table, so allied traffic coordinates while enemies are seen
/// purely through the actor map.  The cell-info pool is world-wide: every
/// search in the world draws its layers from it and returns them on
/// disposal.
///
/// Construct via [`WorldBuilder`][crate::WorldBuilder].
pub struct World {
    pub config: PathConfig,
    pub(crate) map: GridMap,
    pub(crate) locomotors: Vec<Locomotor>,
    pub(crate) actors: ActorMap,
    /// Reservation tables indexed by `PlayerId`.
    pub(crate) reservations: Vec<ReservationTable>,
    pub(crate) pool: CellInfoPool,
    pub(crate) pathfinder: Pathfinder,
    /// Agents indexed by `AgentId`; the tick loop's iteration order.
    pub(crate) agents: Vec<Agent>,
    pub(crate) stacks: Vec<ActivityStack>,
    pub(crate) now: Tick,
}

impl World {
    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn agent(&self, id: AgentId) -> SimResult<&Agent> {
        self.agents.get(id.index()).ok_or(SimError::UnknownAgent(id))
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// `true` while `id` has queued activities.
    pub fn is_busy(&self, id: AgentId) -> bool {
        self.stacks.get(id.index()).is_some_and(|s| !s.is_idle())
    }

    /// `true` when every agent is idle.
    pub fn all_idle(&self) -> bool {
        self.stacks.iter().all(ActivityStack::is_idle)
    }

    /// Live entries in `player`'s reservation table.
    pub fn reservation_table_len(&self, player: usize) -> usize {
        self.reservations.get(player).map_or(0, ReservationTable::len)
    }

    // ── Orders ────────────────────────────────────────────────────────────

    /// Queue a move order: `agent` heads for `destination`, accepting
    /// arrival within `near_enough` world units (0 = exact cell).
    pub fn issue_move(
        &mut self,
        id: AgentId,
        destination: CPos,
        near_enough: i32,
    ) -> SimResult<()> {
        let stack = self.stacks.get_mut(id.index()).ok_or(SimError::UnknownAgent(id))?;
        let mut activity = Move::new(destination).evaluating_nearest();
        if near_enough > 0 {
            activity = activity.with_near_enough(near_enough);
        }
        stack.push(Box::new(activity));
        Ok(())
    }

    /// Request cancellation of `agent`'s current activities.
    pub fn cancel(&mut self, id: AgentId) -> SimResult<()> {
        let stack = self.stacks.get_mut(id.index()).ok_or(SimError::UnknownAgent(id))?;
        stack.cancel();
        Ok(())
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the world by one tick.  Agents run in ascending `AgentId`
    /// order; each non-idle activity stack gets exactly one tick pass.
    ///
    /// Returns the number of agents that were active.
    pub fn tick(&mut self) -> usize {
        let mut active = 0;
        for i in 0..self.agents.len() {
            if self.stacks[i].is_idle() {
                continue;
            }
            active += 1;

            let agent = &mut self.agents[i];
            let locomotor = &self.locomotors[agent.locomotor as usize];
            let reservations = &mut self.reservations[agent.owner.index()];
            let mut ctx = MoveContext {
                map: &self.map,
                locomotor,
                actors: &mut self.actors,
                reservations,
                pathfinder: &mut self.pathfinder,
                pool: &mut self.pool,
                config: &self.config,
                now: self.now,
            };
            self.stacks[i].tick(agent, &mut ctx);
        }
        self.now = self.now.offset(1);
        active
    }

    /// Drive `n` ticks with observer callbacks at every boundary.
    pub fn run_ticks<O: WorldObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            let now = self.now;
            observer.on_tick_start(now);
            let active = self.tick();
            observer.on_tick_end(now, active);
            observer.on_snapshot(now, &self.agents);
        }
        observer.on_run_end(self.now);
    }

    /// Run until every agent is idle, up to `limit` ticks.  Returns the
    /// ticks consumed, or `limit` if agents were still busy.
    pub fn run_until_idle(&mut self, limit: u64) -> u64 {
        for spent in 0..limit {
            if self.all_idle() {
                return spent;
            }
            self.tick();
        }
        limit
    }
}
