//! `PathSearch` — classical A\* over grid cells, with a resumable
//! goal-rooted mode (RRA\*).
//!
//! # Ownership
//!
//! A `PathSearch` owns its open queue and its pooled cell-info layers but
//! *not* the world: every expanding call takes a [`GridContext`].  That
//! split is what allows an RRA\* to outlive the tick it was created in —
//! the agent's move activity keeps the search, the world keeps the map.
//!
//! # RRA\* in one paragraph
//!
//! Constructed via [`PathSearch::reverse_resumable`], the search is rooted
//! at the move's *goal* and expands outward over the static graph
//! (immovable blockers only), which makes `cost_so_far` of every closed
//! cell the true static cost between that cell and the goal.  The forward
//! windowed search calls [`resume_until_closed`](PathSearch::resume_until_closed)
//! per cell; the first query pays for the expansion, later queries are a
//! table lookup.  Because cooperative constraints only remove edges, these
//! costs stay admissible and consistent for the space–time problem.

use std::cmp::Ordering;

use gp_core::{octile_estimate, AgentId, CPos, MoveCost, PathConfig, Tick, COST_INVALID};
use gp_grid::BlockedByActor;

use crate::cell_info::{CellInfo, CellInfoLayer, CellInfoPool, CellStatus};
use crate::graph::{EdgeRules, GraphConnection, GridContext};
use crate::heap::MinHeap;

fn by_estimate(a: &GraphConnection, b: &GraphConnection) -> Ordering {
    a.cost.cmp(&b.cost)
}

type OpenQueue = MinHeap<GraphConnection, fn(&GraphConnection, &GraphConnection) -> Ordering>;

/// Optional per-cell cost override; [`COST_INVALID`] vetoes the cell.
pub type CustomCost = Box<dyn Fn(CPos) -> MoveCost>;

// ── PathSearch ────────────────────────────────────────────────────────────────

/// An in-progress A\* over grid cells.
pub struct PathSearch {
    rules: EdgeRules,
    /// Cell the internal octile heuristic points toward.
    anchor: CPos,
    weight_pct: u32,
    /// Cheapest terrain cost of the locomotor — the heuristic's base.
    base_cost: MoveCost,
    custom_cost: Option<CustomCost>,
    /// Dense records for the ground plane.  `None` once disposed.
    ground: Option<CellInfoLayer>,
    /// Dense records per enabled custom movement layer.
    custom_layers: Vec<(u8, CellInfoLayer)>,
    open: OpenQueue,
    /// Nodes closed so far; resumability diagnostics.
    expansions: usize,
}

impl PathSearch {
    // ── Construction ──────────────────────────────────────────────────────

    /// A search with a single root, its heuristic anchored at `anchor`.
    pub fn from_point(
        grid: &GridContext<'_>,
        pool: &mut CellInfoPool,
        config: &PathConfig,
        rules: EdgeRules,
        start: CPos,
        anchor: CPos,
    ) -> PathSearch {
        Self::from_points(grid, pool, config, rules, &[start], anchor)
    }

    /// A search seeded with several roots at cost zero.  Used for queries
    /// of the form "reach any of these cells".
    pub fn from_points(
        grid: &GridContext<'_>,
        pool: &mut CellInfoPool,
        config: &PathConfig,
        rules: EdgeRules,
        starts: &[CPos],
        anchor: CPos,
    ) -> PathSearch {
        let custom_layers = grid
            .map
            .movement_layers()
            .iter()
            .filter(|l| l.enabled)
            .map(|l| (l.id, pool.acquire()))
            .collect();

        let mut search = PathSearch {
            rules,
            anchor,
            weight_pct: config.heuristic_weight_pct,
            base_cost: grid.locomotor.min_terrain_cost(),
            custom_cost: None,
            ground: Some(pool.acquire()),
            custom_layers,
            open: MinHeap::with_capacity(64, by_estimate),
            expansions: 0,
        };
        for &start in starts {
            let estimate = search.estimate(start);
            search.set_info(start, CellInfo::root(start, estimate, Tick::ZERO));
            search.open.add(GraphConnection { destination: start, cost: estimate });
        }
        search
    }

    /// The goal-rooted resumable search backing the cooperative planner's
    /// heuristic: rooted at `goal` on the static graph (immovable blockers
    /// only), internally guided toward the agent's start cell.
    pub fn reverse_resumable(
        grid: &GridContext<'_>,
        pool: &mut CellInfoPool,
        config: &PathConfig,
        agent: AgentId,
        goal: CPos,
        agent_start: CPos,
    ) -> PathSearch {
        let rules = EdgeRules {
            agent,
            blockers: BlockedByActor::Immovable,
            ignore: None,
            lane_bias: config.lane_bias,
            in_reverse: true,
        };
        Self::from_point(grid, pool, config, rules, goal, agent_start)
    }

    /// Attach a per-cell cost override.  Cells the override maps to
    /// [`COST_INVALID`] are marked [`CellStatus::Invalid`] and never
    /// entered.
    pub fn with_custom_cost(mut self, custom: CustomCost) -> PathSearch {
        self.custom_cost = Some(custom);
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn rules(&self) -> &EdgeRules {
        &self.rules
    }

    /// The recorded info of `cell` (unvisited default when never touched or
    /// after disposal).
    pub fn info(&self, cell: CPos) -> CellInfo {
        if cell.layer == 0 {
            return self.ground.as_ref().map_or_else(CellInfo::unvisited, |l| l.get(cell));
        }
        self.custom_layers
            .iter()
            .find(|(id, _)| *id == cell.layer)
            .map_or_else(CellInfo::unvisited, |(_, l)| l.get(cell))
    }

    fn set_info(&mut self, cell: CPos, info: CellInfo) {
        if cell.layer == 0 {
            if let Some(l) = self.ground.as_mut() {
                l.set(cell, info);
            }
            return;
        }
        if let Some((_, l)) = self.custom_layers.iter_mut().find(|(id, _)| *id == cell.layer) {
            l.set(cell, info);
        }
    }

    #[inline]
    pub fn is_closed(&self, cell: CPos) -> bool {
        self.info(cell).status == CellStatus::Closed
    }

    /// `cost_so_far` of a closed cell, [`COST_INVALID`] otherwise.
    pub fn cost_at(&self, cell: CPos) -> MoveCost {
        let info = self.info(cell);
        if info.status == CellStatus::Closed {
            info.cost_so_far
        } else {
            COST_INVALID
        }
    }

    fn estimate(&self, cell: CPos) -> MoveCost {
        octile_estimate(cell, self.anchor, self.base_cost, self.weight_pct)
    }

    // ── Expansion ─────────────────────────────────────────────────────────

    #[inline]
    pub fn can_expand(&self) -> bool {
        !self.open.is_empty()
    }

    /// Total nodes closed since construction.
    #[inline]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Close the best open cell and relax its successors.  Returns the
    /// closed cell, or `None` when the open set is exhausted.
    pub fn expand(&mut self, grid: &GridContext<'_>) -> Option<CPos> {
        // Pop until a live entry surfaces; stale duplicates are discarded.
        let (cell, mut info) = loop {
            let entry = self.open.pop().ok()?;
            let info = self.info(entry.destination);
            if info.status.is_open() && info.estimated_total == entry.cost {
                break (entry.destination, info);
            }
        };

        info.status = CellStatus::Closed;
        self.set_info(cell, info);
        self.expansions += 1;

        for conn in self.rules.successors(grid, cell, info.previous) {
            let next = conn.destination;
            let next_info = self.info(next);
            if matches!(next_info.status, CellStatus::Closed | CellStatus::Invalid) {
                continue;
            }

            let mut step_cost = conn.cost;
            if let Some(custom) = &self.custom_cost {
                let extra = custom(next);
                if extra == COST_INVALID {
                    self.set_info(next, CellInfo { status: CellStatus::Invalid, ..next_info });
                    continue;
                }
                step_cost = step_cost.saturating_add(extra);
            }

            let g = info.cost_so_far.saturating_add(step_cost);
            if next_info.status != CellStatus::Unvisited && g >= next_info.cost_so_far {
                continue;
            }

            let f = g.saturating_add(self.estimate(next));
            let status = if next_info.status == CellStatus::Unvisited {
                CellStatus::Open
            } else {
                // The old queue entry is now stale; remember that so the pop
                // loop can reconcile it.
                CellStatus::Duplicate
            };
            self.set_info(
                next,
                CellInfo { cost_so_far: g, estimated_total: f, previous: cell, status, arrival: Tick::ZERO },
            );
            self.open.add(GraphConnection { destination: next, cost: f });
        }

        Some(cell)
    }

    /// Expand until `target` is closed.  Returns `true` on success.
    pub fn run_to(&mut self, grid: &GridContext<'_>, target: CPos) -> bool {
        if self.is_closed(target) {
            return true;
        }
        while let Some(closed) = self.expand(grid) {
            if closed == target {
                return true;
            }
        }
        false
    }

    /// Expand until any of `targets` is closed; returns the one reached.
    pub fn run_to_any(&mut self, grid: &GridContext<'_>, targets: &[CPos]) -> Option<CPos> {
        if let Some(&t) = targets.iter().find(|&&t| self.is_closed(t)) {
            return Some(t);
        }
        while let Some(closed) = self.expand(grid) {
            if targets.contains(&closed) {
                return Some(closed);
            }
        }
        None
    }

    // ── Resumable heuristic queries ───────────────────────────────────────

    /// The static cost between `cell` and this search's root, expanding
    /// lazily on first demand.
    ///
    /// Returns [`COST_INVALID`] when `cell` is off the map or the open set
    /// empties before `cell` closes (statically unreachable).  Once a cell
    /// has closed, repeated queries are pure lookups.
    pub fn resume_until_closed(&mut self, grid: &GridContext<'_>, cell: CPos) -> MoveCost {
        if !grid.map.contains(cell) {
            return COST_INVALID;
        }
        loop {
            let info = self.info(cell);
            if info.status == CellStatus::Closed {
                return info.cost_so_far;
            }
            if self.expand(grid).is_none() {
                return COST_INVALID;
            }
        }
    }

    // ── Disposal ──────────────────────────────────────────────────────────

    /// Return the pooled layers.  Safe to call more than once; later calls
    /// are no-ops.
    pub fn dispose(&mut self, pool: &mut CellInfoPool) {
        if let Some(layer) = self.ground.take() {
            pool.release(layer);
        }
        for (_, layer) in self.custom_layers.drain(..) {
            pool.release(layer);
        }
    }
}
