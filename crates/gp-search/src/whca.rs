//! `SpaceTimeSearch` — windowed cooperative A\* over (cell, step) nodes.
//!
//! # The window
//!
//! The search starts at the agent's cell at step 0 and terminates the first
//! time a node with `step == W` is popped; the reconstructed W-cell
//! sequence is the window path.  Bounding the horizon bounds per-tick work:
//! an agent plans at most O(W · branching · log) nodes per window,
//! whatever the map size.
//!
//! # Cooperation
//!
//! Successors are admitted against the shared reservation table at the
//! *projected arrival tick* of the step — computed from the traverse time
//! of the current cell plus any facing change the agent would have to turn
//! through.  Waiting in place is always a successor (it costs the cell's
//! terrain cost, except at the goal where sitting still is free), so a
//! blocked agent prefers a short wait over a detour whenever that is
//! cheaper.
//!
//! # Why RRA\* makes this fast
//!
//! Each touched cell asks the move's goal-rooted [`PathSearch`] for its
//! true static cost to the goal.  That heuristic is tight, so the forward
//! search rarely leaves the corridor RRA\* has already explored; the
//! successor filter below makes that explicit by preferring successors the
//! RRA\* has closed and falling back to the full set only when boxed in.

use std::cmp::Ordering;

use gp_core::{CPos, CVec, Facing, MoveCost, Tick, CELL_SPAN, COST_INVALID};
use gp_grid::ReservationTable;

use crate::cell_info::{CellInfo, CellStatus, SpaceTimeNode, SpaceTimeStore};
use crate::graph::{EdgeRules, GraphConnection, GridContext};
use crate::heap::MinHeap;
use crate::path::reconstruct_windowed;
use crate::pathfinder::MoverProfile;
use crate::search::PathSearch;

struct OpenEntry {
    node: SpaceTimeNode,
    estimate: MoveCost,
}

fn by_estimate(a: &OpenEntry, b: &OpenEntry) -> Ordering {
    a.estimate.cmp(&b.estimate)
}

type OpenQueue = MinHeap<OpenEntry, fn(&OpenEntry, &OpenEntry) -> Ordering>;

// ── SpaceTimeSearch ───────────────────────────────────────────────────────────

/// A single windowed cooperative search.  Construct, then [`run`](Self::run).
pub struct SpaceTimeSearch<'a> {
    grid: GridContext<'a>,
    reservations: &'a ReservationTable,
    rules: EdgeRules,
    mover: MoverProfile,
    rra: &'a mut PathSearch,
    start: CPos,
    goal: CPos,
    window: u16,
    now: Tick,
    store: SpaceTimeStore,
    open: OpenQueue,
}

impl<'a> SpaceTimeSearch<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        grid: GridContext<'a>,
        reservations: &'a ReservationTable,
        rules: EdgeRules,
        mover: MoverProfile,
        rra: &'a mut PathSearch,
        start: CPos,
        goal: CPos,
        window: u16,
        now: Tick,
    ) -> SpaceTimeSearch<'a> {
        SpaceTimeSearch {
            grid,
            reservations,
            rules,
            mover,
            rra,
            start,
            goal,
            window,
            now,
            store: SpaceTimeStore::new(),
            open: MinHeap::with_capacity(64, by_estimate),
        }
    }

    /// Run the search to termination.
    ///
    /// Returns the window path — exactly `window` cells, terminal first,
    /// consumed from the tail — or an empty vector when no window exists
    /// (the goal is statically unreachable, or the open set emptied before
    /// reaching step W).
    pub fn run(mut self) -> Vec<CPos> {
        let start_h = self.rra.resume_until_closed(&self.grid, self.start);
        if start_h == COST_INVALID {
            return Vec::new();
        }

        let root = SpaceTimeNode { cell: self.start, step: 0 };
        self.store.set(root, CellInfo::root(self.start, start_h, self.now));
        self.open.add(OpenEntry { node: root, estimate: start_h });

        while let Ok(entry) = self.open.pop() {
            let mut info = self.store.get(entry.node);
            if !info.status.is_open() || info.estimated_total != entry.estimate {
                continue; // stale duplicate
            }
            info.status = CellStatus::Closed;
            self.store.set(entry.node, info);

            if entry.node.step == self.window {
                return reconstruct_windowed(&self.store, entry.node.cell, self.window);
            }

            self.expand_node(entry.node, info);
        }

        Vec::new()
    }

    // ── Node expansion ────────────────────────────────────────────────────

    fn expand_node(&mut self, node: SpaceTimeNode, info: CellInfo) {
        let cell = node.cell;
        let at_goal = cell == self.goal;
        let waiting = info.previous == cell && node.step > 0;

        let mut conns: Vec<GraphConnection>;
        if at_goal {
            // Sitting at the goal is a free absorbing state: the only
            // successor is the zero-cost self-loop.
            conns = vec![GraphConnection { destination: cell, cost: 0 }];
        } else {
            conns = self.rules.successors(&self.grid, cell, info.previous);

            // Prefer successors the RRA* has already closed: their
            // heuristic is immediate and tight.  Skipped after a wait,
            // where escaping the local corridor may be the whole point.
            if !waiting {
                let closed: Vec<GraphConnection> = conns
                    .iter()
                    .copied()
                    .filter(|c| self.rra.is_closed(c.destination))
                    .collect();
                if !closed.is_empty() {
                    conns = closed;
                }
            }

            // Waiting costs what standing on the cell costs.
            let stay = self.rules.cost_to_enter(&self.grid, cell, cell, CVec::ZERO);
            if stay != COST_INVALID {
                conns.push(GraphConnection { destination: cell, cost: stay });
            }
        }

        let next_step = node.step + 1;
        for conn in conns {
            let dest = conn.destination;
            let next_node = SpaceTimeNode { cell: dest, step: next_step };
            let next_info = self.store.get(next_node);
            if matches!(next_info.status, CellStatus::Closed | CellStatus::Invalid) {
                continue;
            }

            let g = info.cost_so_far.saturating_add(conn.cost);
            if next_info.status != CellStatus::Unvisited && g >= next_info.cost_so_far {
                continue;
            }

            let arrival = self.arrival_through(node, info, dest);
            if !self.grid.locomotor.can_move_freely_into_coop(
                self.grid.map,
                self.grid.actors,
                self.reservations,
                self.rules.agent,
                dest,
                self.rules.blockers,
                self.rules.ignore,
                arrival,
            ) {
                continue;
            }

            let h = self.rra.resume_until_closed(&self.grid, dest);
            if h == COST_INVALID {
                continue; // statically cut off from the goal
            }

            let f = g.saturating_add(h);
            let status = if next_info.status == CellStatus::Unvisited {
                CellStatus::Open
            } else {
                CellStatus::Duplicate
            };
            self.store.set(
                next_node,
                CellInfo { cost_so_far: g, estimated_total: f, previous: cell, status, arrival },
            );
            self.open.add(OpenEntry { node: next_node, estimate: f });
        }
    }

    // ── Arrival-time model ────────────────────────────────────────────────

    /// Tick at which the agent would occupy `dest` when stepping there from
    /// `node`: the traverse time of the current cell at the agent's
    /// effective speed, plus the time to turn onto the step's heading.
    fn arrival_through(&self, node: SpaceTimeNode, info: CellInfo, dest: CPos) -> Tick {
        let speed = self
            .grid
            .locomotor
            .movement_speed_for_cell(self.grid.map, self.mover.speed, node.cell);
        let mut ticks = if speed == 0 {
            1
        } else {
            (CELL_SPAN as u64).div_ceil(speed as u64)
        };

        if dest != node.cell {
            if let Some(heading) = Facing::from_vec(dest - node.cell) {
                let current = self.facing_at(node, info);
                ticks += current.ticks_to_turn(heading, self.mover.turn_speed);
            }
        }

        info.arrival.offset(ticks)
    }

    /// The facing the agent would have on reaching `node`: the heading of
    /// the last real step in its chain, or the agent's present facing when
    /// the chain is all waits back to the root.
    fn facing_at(&self, node: SpaceTimeNode, info: CellInfo) -> Facing {
        let mut node = node;
        let mut info = info;
        loop {
            if info.previous != node.cell {
                if let Some(f) = Facing::from_vec(node.cell - info.previous) {
                    return f;
                }
            }
            if node.step == 0 {
                return self.mover.facing;
            }
            node = SpaceTimeNode { cell: info.previous, step: node.step - 1 };
            info = self.store.get(node);
        }
    }
}
