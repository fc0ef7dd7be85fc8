//! The `Pathfinder` facade: one entry point per search variant, plus a
//! per-agent cache of the last unit-path query.
//!
//! The facade owns no world state; callers hand it a [`SearchContext`]
//! bundling the world references, the shared pool, and the current tick.
//! Group orders commonly ask the same path question for many members in
//! one tick, which is what the cache is for — it never survives the tick
//! it was filled in.

use std::collections::HashMap;

use gp_core::{AgentId, CPos, Facing, PathConfig, SubCell, Tick, WPos};
use gp_grid::{ActorMap, BlockedByActor, GridMap, Locomotor, ReservationTable};

use crate::cell_info::CellInfoPool;
use crate::graph::{EdgeRules, GridContext};
use crate::path::reconstruct_path;
use crate::search::PathSearch;
use crate::whca::SpaceTimeSearch;

// ── Contexts ──────────────────────────────────────────────────────────────────

/// Everything a search needs from the world, borrowed for one call.
pub struct SearchContext<'a> {
    pub grid: GridContext<'a>,
    pub reservations: &'a ReservationTable,
    pub pool: &'a mut CellInfoPool,
    pub config: &'a PathConfig,
    pub now: Tick,
}

impl<'a> SearchContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        map: &'a GridMap,
        locomotor: &'a Locomotor,
        actors: &'a ActorMap,
        reservations: &'a ReservationTable,
        pool: &'a mut CellInfoPool,
        config: &'a PathConfig,
        now: Tick,
    ) -> SearchContext<'a> {
        SearchContext {
            grid: GridContext { map, locomotor, actors },
            reservations,
            pool,
            config,
            now,
        }
    }
}

/// The kinematic surface of one agent, as the planners see it.
#[derive(Copy, Clone, Debug)]
pub struct MoverProfile {
    pub agent: AgentId,
    /// Base speed in world units per tick.
    pub speed: u32,
    pub facing: Facing,
    /// Facing units turned per tick; 0 means turns are free.
    pub turn_speed: u16,
}

// ── Cache ─────────────────────────────────────────────────────────────────────

struct CachedPath {
    source: CPos,
    target: CPos,
    blockers: BlockedByActor,
    tick: Tick,
    path: Vec<CPos>,
}

// ── Pathfinder ────────────────────────────────────────────────────────────────

/// Dispatches search variants and caches the last unit path per agent.
#[derive(Default)]
pub struct Pathfinder {
    cache: HashMap<AgentId, CachedPath>,
}

impl Pathfinder {
    pub fn new() -> Pathfinder {
        Self::default()
    }

    // ── Non-cooperative A* ────────────────────────────────────────────────

    /// Classic A\* from `source` to `target`, ignoring dynamic agent
    /// occupancy except as `blockers` dictates.  Returns the canonical
    /// empty path when the target is unreachable.
    pub fn find_unit_path(
        &mut self,
        ctx: &mut SearchContext<'_>,
        agent: AgentId,
        source: CPos,
        target: CPos,
        ignore: Option<AgentId>,
        blockers: BlockedByActor,
    ) -> Vec<CPos> {
        if let Some(cached) = self.cache.get(&agent) {
            if cached.tick == ctx.now
                && cached.source == source
                && cached.target == target
                && cached.blockers == blockers
            {
                return cached.path.clone();
            }
        }

        let rules = EdgeRules {
            agent,
            blockers,
            ignore,
            lane_bias: ctx.config.lane_bias,
            in_reverse: false,
        };
        let mut search = PathSearch::from_point(&ctx.grid, ctx.pool, ctx.config, rules, source, target);
        let path = Self::find_path(&mut search, &ctx.grid, target);
        search.dispose(ctx.pool);

        self.cache.insert(
            agent,
            CachedPath { source, target, blockers, tick: ctx.now, path: path.clone() },
        );
        path
    }

    /// Run a caller-constructed search to `target` and build the path.
    /// The caller keeps ownership of the search and disposes it.
    pub fn find_path(search: &mut PathSearch, grid: &GridContext<'_>, target: CPos) -> Vec<CPos> {
        if search.run_to(grid, target) {
            reconstruct_path(search, target)
        } else {
            Vec::new()
        }
    }

    // ── Cooperative windowed search ───────────────────────────────────────

    /// One cooperative window toward `goal`: exactly `window` cells on
    /// success, empty on failure.  `rra` must be the move's goal-rooted
    /// resumable search.
    #[allow(clippy::too_many_arguments)]
    pub fn find_path_whca(
        &mut self,
        ctx: &mut SearchContext<'_>,
        mover: MoverProfile,
        rra: &mut PathSearch,
        source: CPos,
        goal: CPos,
        ignore: Option<AgentId>,
        blockers: BlockedByActor,
        window: u16,
    ) -> Vec<CPos> {
        let rules = EdgeRules {
            agent: mover.agent,
            blockers,
            ignore,
            lane_bias: ctx.config.lane_bias,
            in_reverse: false,
        };
        SpaceTimeSearch::new(
            ctx.grid,
            ctx.reservations,
            rules,
            mover,
            rra,
            source,
            goal,
            window,
            ctx.now,
        )
        .run()
    }

    /// Like [`find_path_whca`](Self::find_path_whca) but never empty: an
    /// unreachable target yields the source repeated `window` times, so
    /// callers that promise a fixed-length window can keep that promise.
    #[allow(clippy::too_many_arguments)]
    pub fn find_unit_path_whca(
        &mut self,
        ctx: &mut SearchContext<'_>,
        mover: MoverProfile,
        rra: &mut PathSearch,
        source: CPos,
        goal: CPos,
        ignore: Option<AgentId>,
        blockers: BlockedByActor,
        window: u16,
    ) -> Vec<CPos> {
        let path = self.find_path_whca(ctx, mover, rra, source, goal, ignore, blockers, window);
        if path.is_empty() {
            vec![source; window as usize]
        } else {
            path
        }
    }

    /// Plan a window toward the best passable cell within `range` world
    /// units of `target`.  `subcell` refines the agent's own position for
    /// the already-in-range early-out.  Returns an empty path when already
    /// in range or no candidate cell is reachable.
    #[allow(clippy::too_many_arguments)]
    pub fn find_unit_path_to_range(
        &mut self,
        ctx: &mut SearchContext<'_>,
        mover: MoverProfile,
        source: CPos,
        subcell: SubCell,
        target: WPos,
        range: i32,
        blockers: BlockedByActor,
        window: u16,
    ) -> Vec<CPos> {
        let source_pos = ctx.grid.map.center_of_cell(source) + ctx.grid.map.offset_of_subcell(subcell);
        if (source_pos - target).length() <= range {
            return Vec::new();
        }

        let target_cell = ctx.grid.map.cell_containing(target);
        let range_cells = range / gp_core::CELL_SPAN + 1;
        let candidates: Vec<CPos> = ctx
            .grid
            .map
            .tiles_in_circle(target_cell, range_cells)
            .into_iter()
            .filter(|&c| (ctx.grid.map.center_of_cell(c) - target).length() <= range)
            .filter(|&c| {
                ctx.grid.locomotor.can_move_freely_into(
                    ctx.grid.map,
                    ctx.grid.actors,
                    mover.agent,
                    c,
                    blockers,
                    None,
                )
            })
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        // The candidate the agent can actually reach first, by true path
        // cost rather than straight-line distance.
        let rules = EdgeRules {
            agent: mover.agent,
            blockers,
            ignore: None,
            lane_bias: ctx.config.lane_bias,
            in_reverse: false,
        };
        let mut probe =
            PathSearch::from_point(&ctx.grid, ctx.pool, ctx.config, rules, source, target_cell);
        let goal = probe.run_to_any(&ctx.grid, &candidates);
        probe.dispose(ctx.pool);
        let Some(goal) = goal else {
            return Vec::new();
        };

        let mut rra = PathSearch::reverse_resumable(
            &ctx.grid, ctx.pool, ctx.config, mover.agent, goal, source,
        );
        let path =
            self.find_unit_path_whca(ctx, mover, &mut rra, source, goal, None, blockers, window);
        rra.dispose(ctx.pool);
        path
    }

    // ── Cache maintenance ─────────────────────────────────────────────────

    /// Drop the cached path of `agent` (e.g. when it dies).
    pub fn forget(&mut self, agent: AgentId) {
        self.cache.remove(&agent);
    }
}
