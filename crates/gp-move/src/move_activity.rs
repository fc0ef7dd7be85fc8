//! `Move` — the windowed movement state machine.
//!
//! # Lifecycle
//!
//! On its first tick the activity resolves its destination (optionally
//! snapping to the nearest cell the locomotor can enter) and roots the
//! agent's resumable RRA\* search at it.  From then on each tick either
//! consumes one cell of the current window or queues a child activity —
//! a turn, a wait, or one of the two half-step interpolations — and the
//! window itself is refreshed every W/2 steps, at every forced global
//! rewindow boundary, and whenever the plan stops matching reality.
//!
//! # Reservations
//!
//! Adopting a window writes the agent's projected occupancy into the
//! shared reservation table, cell by cell at the tick the agent expects to
//! be there; the agent's previous claims are freed first, and everything
//! is freed on cancel and on finish.  Later-planning agents see those
//! claims through their cooperative searches and plan around them.
//!
//! # Failure posture
//!
//! A window request that comes back empty under static blockers is retried
//! with no blockers at all; if even that fails the move completes as
//! abandoned.  Nothing in this module panics on a planning failure.

use gp_core::{AgentId, CPos, CVec, Facing, CELL_SPAN};
use gp_grid::{BlockedByActor, OccupantKind};
use gp_search::{PathSearch, SearchContext};

use crate::{Activity, Agent, MoveContext, MoveFirstHalf, MoveSecondHalf, Step, Turn, WaitFor};

/// How far out the destination snap searches for a movable cell.
const SNAP_RADIUS: i32 = 8;

// ── Move ──────────────────────────────────────────────────────────────────────

/// The per-agent windowed movement driver.
pub struct Move {
    destination: Option<CPos>,
    /// Arrival tolerance in world units; 0 demands the exact cell.
    near_enough: i32,
    /// Snap the destination to the nearest movable cell at startup.
    evaluate_nearest: bool,
    /// One agent whose occupancy never blocks this move.
    ignore: Option<AgentId>,

    /// Remaining window, consumed from the tail.
    path: Vec<CPos>,
    /// Cells consumed from the current window; -1 forces a fresh window.
    w: i32,
    turn_queued: bool,
    wait_queued: bool,
    /// Set while a `MoveFirstHalf` child is running; the next resume
    /// decides between curving onward and settling into the cell.
    first_half_pending: bool,
    started: bool,
    /// The move's goal-rooted resumable search; lives until finish.
    rra: Option<PathSearch>,
}

impl Move {
    pub fn new(destination: CPos) -> Move {
        Move {
            destination: Some(destination),
            near_enough: 0,
            evaluate_nearest: false,
            ignore: None,
            path: Vec::new(),
            w: -1,
            turn_queued: false,
            wait_queued: false,
            first_half_pending: false,
            started: false,
            rra: None,
        }
    }

    /// Accept arrival anywhere within `units` world units of the
    /// destination (1024 per cell).
    pub fn with_near_enough(mut self, units: i32) -> Move {
        self.near_enough = units;
        self
    }

    /// Never treat `agent` as a blocker (e.g. the transport being boarded).
    pub fn with_ignore(mut self, agent: AgentId) -> Move {
        self.ignore = Some(agent);
        self
    }

    /// Snap the destination to the nearest cell the locomotor can enter.
    pub fn evaluating_nearest(mut self) -> Move {
        self.evaluate_nearest = true;
        self
    }

    // ── Startup ───────────────────────────────────────────────────────────

    /// Resolve the destination and root the RRA\*.  `None` means the move
    /// is degenerate (no destination, or nothing movable near it) and
    /// should finish immediately as arrived.
    fn startup(&mut self, agent: &mut Agent, ctx: &mut MoveContext<'_>) -> Option<()> {
        let wanted = self.destination?;
        let dest = if self.evaluate_nearest {
            self.nearest_movable(agent, ctx, wanted)?
        } else {
            wanted
        };
        self.destination = Some(dest);

        let mut sc = SearchContext::new(
            ctx.map,
            ctx.locomotor,
            ctx.actors,
            ctx.reservations,
            ctx.pool,
            ctx.config,
            ctx.now,
        );
        let grid = sc.grid;
        self.rra = Some(PathSearch::reverse_resumable(
            &grid,
            &mut *sc.pool,
            sc.config,
            agent.id,
            dest,
            agent.to_cell,
        ));

        ctx.actors.set_kind(agent.to_cell, agent.id, OccupantKind::Moving);
        Some(())
    }

    /// The nearest cell to `wanted` the agent could actually stand on.
    fn nearest_movable(&self, agent: &Agent, ctx: &MoveContext<'_>, wanted: CPos) -> Option<CPos> {
        let enterable = |cell: CPos| {
            ctx.locomotor.can_move_freely_into(
                ctx.map,
                ctx.actors,
                agent.id,
                cell,
                BlockedByActor::Immovable,
                self.ignore,
            )
        };
        if enterable(wanted) {
            return Some(wanted);
        }
        for radius in 1..=SNAP_RADIUS {
            let best = ctx
                .map
                .tiles_in_circle(wanted, radius)
                .into_iter()
                .filter(|&c| enterable(c))
                .min_by_key(|&c| (c - wanted).length_squared());
            if best.is_some() {
                return best;
            }
        }
        None
    }

    // ── Window management ─────────────────────────────────────────────────

    /// One cooperative window under `blockers`; empty on failure.
    fn plan_window(
        &mut self,
        agent: &Agent,
        ctx: &mut MoveContext<'_>,
        dest: CPos,
        blockers: BlockedByActor,
    ) -> Vec<CPos> {
        let Some(rra) = self.rra.as_mut() else {
            return Vec::new();
        };
        let mut sc = SearchContext::new(
            ctx.map,
            ctx.locomotor,
            ctx.actors,
            ctx.reservations,
            ctx.pool,
            ctx.config,
            ctx.now,
        );
        ctx.pathfinder.find_path_whca(
            &mut sc,
            agent.mover_profile(),
            rra,
            agent.to_cell,
            dest,
            self.ignore,
            blockers,
            agent.window,
        )
    }

    /// Plan under static blockers, relaxing to none; adopt on success.
    fn request_window(&mut self, agent: &Agent, ctx: &mut MoveContext<'_>, dest: CPos) -> bool {
        let mut path = self.plan_window(agent, ctx, dest, BlockedByActor::Immovable);
        if path.is_empty() {
            path = self.plan_window(agent, ctx, dest, BlockedByActor::None);
        }
        if path.is_empty() {
            return false;
        }
        self.adopt_window(agent, ctx, path);
        true
    }

    /// Replan under one specific regime, keeping the old plan cleared when
    /// even that fails (the next tick re-enters window init).
    fn repath(
        &mut self,
        agent: &Agent,
        ctx: &mut MoveContext<'_>,
        dest: CPos,
        blockers: BlockedByActor,
    ) {
        let path = self.plan_window(agent, ctx, dest, blockers);
        if path.is_empty() {
            self.path.clear();
            self.w = -1;
        } else {
            self.adopt_window(agent, ctx, path);
        }
    }

    /// Install a fresh window and re-reserve the agent's projected
    /// occupancy along it.
    fn adopt_window(&mut self, agent: &Agent, ctx: &mut MoveContext<'_>, path: Vec<CPos>) {
        ctx.reservations.free_all(agent.id);

        let mut t = ctx.now;
        let mut from = agent.to_cell;
        for &cell in path.iter().rev() {
            let speed = agent.movement_speed_for_cell(ctx.map, ctx.locomotor, from).max(1);
            t = t.offset((CELL_SPAN as u64).div_ceil(speed as u64));
            ctx.reservations.reserve(cell, t, agent.id);
            from = cell;
        }

        self.path = path;
        self.w = 0;
    }

    // ── Arrival ───────────────────────────────────────────────────────────

    fn reached(&self, agent: &Agent, ctx: &MoveContext<'_>, dest: CPos) -> bool {
        if agent.to_cell == dest {
            return true;
        }
        if self.near_enough > 0 {
            let d = (ctx.map.center_of_cell(agent.to_cell) - ctx.map.center_of_cell(dest)).length();
            return d <= self.near_enough;
        }
        false
    }

    fn finish(&mut self, agent: &mut Agent, ctx: &mut MoveContext<'_>) -> Step {
        self.release(agent, ctx);
        Step::Complete
    }

    fn release(&mut self, agent: &mut Agent, ctx: &mut MoveContext<'_>) {
        // A cancel can land right after a first half completed.  Finish
        // entering the half-crossed cell so the agent never rests between
        // cell centres.
        if agent.is_mid_step() {
            agent.from_cell = agent.to_cell;
            agent.from_subcell = agent.to_subcell;
            agent.position = ctx.map.center_of_cell(agent.to_cell) + agent.to_subcell.offset();
        }
        if let Some(mut rra) = self.rra.take() {
            rra.dispose(ctx.pool);
        }
        ctx.reservations.free_all(agent.id);
        ctx.actors.set_kind(agent.to_cell, agent.id, OccupantKind::Stationary);
        self.path.clear();
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// After a first half lands on the cell midpoint: roll straight into
    /// the next step when the agent can curve through it.  Never chains
    /// past the half-window mark, so the rewindow cadence holds even for
    /// long smooth runs.
    fn try_chain(&mut self, agent: &mut Agent, ctx: &mut MoveContext<'_>) -> Option<Step> {
        if agent.always_turn_in_place || self.w >= (agent.window / 2) as i32 {
            return None;
        }
        let &next = self.path.last()?;
        if next == agent.to_cell || !next.is_adjacent_to(agent.to_cell) {
            return None;
        }
        let heading = Facing::from_vec(next - agent.to_cell)?;
        if agent.facing.is_sharp_turn_to(heading) {
            return None;
        }
        if !ctx.locomotor.can_move_freely_into(
            ctx.map,
            ctx.actors,
            agent.id,
            next,
            BlockedByActor::All,
            self.ignore,
        ) {
            return None;
        }

        // Finalize the cell being crossed and continue from the midpoint.
        agent.from_cell = agent.to_cell;
        agent.from_subcell = agent.to_subcell;
        self.path.pop();
        Some(self.commit_step(agent, ctx, next))
    }

    fn commit_step(&mut self, agent: &mut Agent, ctx: &mut MoveContext<'_>, next: CPos) -> Step {
        if let Some(heading) = Facing::from_vec(next - agent.to_cell) {
            agent.facing = heading;
        }
        self.turn_queued = false;

        let from = agent.to_cell;
        agent.from_cell = from;
        agent.to_cell = next;
        ctx.actors.move_agent(from, next, agent.id);
        ctx.actors.set_kind(next, agent.id, OccupantKind::Moving);

        let midpoint = ctx.map.between_cells(from, next);
        let ticks = self.half_ticks(agent, ctx, from);
        self.first_half_pending = true;
        Step::Push(Box::new(MoveFirstHalf::new(agent.position, midpoint, ticks)))
    }

    fn half_ticks(&self, agent: &Agent, ctx: &MoveContext<'_>, cell: CPos) -> u32 {
        let speed = agent.movement_speed_for_cell(ctx.map, ctx.locomotor, cell).max(1);
        ((CELL_SPAN as u32 / 2) / speed).max(1)
    }

    // ── Blocked-step decision tree ────────────────────────────────────────

    fn on_blocked(
        &mut self,
        agent: &mut Agent,
        ctx: &mut MoveContext<'_>,
        next: CPos,
        dest: CPos,
    ) -> Step {
        // Close enough to stop: nudge a friendly aside or give up here.
        if self.near_enough > 0 {
            let d = (ctx.map.center_of_cell(agent.to_cell) - ctx.map.center_of_cell(dest)).length();
            if d <= self.near_enough + CELL_SPAN {
                if self.nudge_candidate(agent, ctx, next, dest).is_some() {
                    self.repath(agent, ctx, dest, BlockedByActor::Immovable);
                } else {
                    // Surrender: the current cell becomes the destination,
                    // which completes the move on the next tick.
                    self.destination = Some(agent.to_cell);
                    self.path.clear();
                }
                return Step::Continue;
            }
        }

        let blocker =
            ctx.actors.first_blocker(next, BlockedByActor::All, agent.id, self.ignore);
        match blocker {
            // A movable agent squatting on the step: last resort is to plan
            // around every body on the map.
            Some(b) if b.kind != OccupantKind::Immovable => {
                self.repath(agent, ctx, dest, BlockedByActor::All);
            }
            // Immovable by nature (actor or terrain change): replan around
            // statics.  If the cell frees up, the fresh window routes
            // through it again by itself.
            _ => {
                self.repath(agent, ctx, dest, BlockedByActor::Immovable);
            }
        }
        Step::Continue
    }

    /// A neighbor of the blocked cell that a friendly blocker could shift
    /// to: enterable, and no further from the destination than the blocked
    /// cell itself.
    fn nudge_candidate(
        &self,
        agent: &Agent,
        ctx: &MoveContext<'_>,
        blocked: CPos,
        dest: CPos,
    ) -> Option<CPos> {
        let blocker =
            ctx.actors.first_blocker(blocked, BlockedByActor::All, agent.id, self.ignore)?;
        if blocker.kind == OccupantKind::Immovable || blocker.owner != agent.owner {
            return None;
        }
        let blocked_d2 = (blocked - dest).length_squared();
        CVec::FULL_NEIGHBORHOOD
            .iter()
            .map(|&v| blocked.offset(v))
            .find(|&c| {
                c != agent.to_cell
                    && ctx.locomotor.can_move_freely_into(
                        ctx.map,
                        ctx.actors,
                        agent.id,
                        c,
                        BlockedByActor::All,
                        self.ignore,
                    )
                    && (c - dest).length_squared() <= blocked_d2
            })
    }
}

// ── Activity impl ─────────────────────────────────────────────────────────────

impl Activity for Move {
    fn tick(&mut self, agent: &mut Agent, ctx: &mut MoveContext<'_>) -> Step {
        // ── Startup ───────────────────────────────────────────────────────
        if !self.started {
            self.started = true;
            if self.startup(agent, ctx).is_none() {
                return self.finish(agent, ctx);
            }
        }
        let Some(dest) = self.destination else {
            return self.finish(agent, ctx);
        };

        // ── Resume after a completed first half ───────────────────────────
        if self.first_half_pending {
            self.first_half_pending = false;
            self.w += 1;
            if let Some(step) = self.try_chain(agent, ctx) {
                return step;
            }
            let center = ctx.map.center_of_cell(agent.to_cell) + agent.to_subcell.offset();
            let ticks = self.half_ticks(agent, ctx, agent.to_cell);
            return Step::Push(Box::new(MoveSecondHalf::new(agent.position, center, ticks)));
        }

        // A completed wait means the plan's timing is stale: plan afresh
        // rather than consuming the rest of the old window.
        if self.wait_queued {
            self.wait_queued = false;
            self.w = -1;
        }

        // ── Arrived? ──────────────────────────────────────────────────────
        if self.reached(agent, ctx, dest) {
            return self.finish(agent, ctx);
        }

        // ── Window init ───────────────────────────────────────────────────
        let period = (agent.window as u64 * agent.reset_speed as u64).max(1);
        let boundary = ctx.now.0 % period == 0;
        if self.w < 0 || self.w >= (agent.window / 2) as i32 || boundary {
            if !self.request_window(agent, ctx, dest) {
                // Even the unblocked search found nothing: abandon cleanly.
                return self.finish(agent, ctx);
            }
        }

        // ── Step ──────────────────────────────────────────────────────────
        let Some(next) = self.path.pop() else {
            self.w = -1;
            return Step::Continue;
        };

        // Waiting is a step onto the own cell.
        if next == agent.to_cell {
            self.w += 1;
            self.wait_queued = true;
            let speed = agent
                .movement_speed_for_cell(ctx.map, ctx.locomotor, agent.to_cell)
                .max(1);
            let ticks = ((CELL_SPAN as u32) / speed).max(1) as u64;
            return Step::Push(Box::new(WaitFor::new(ticks, period)));
        }

        // Something moved the agent since this window was planned.
        let layer_shift = next.to_ground() == agent.to_cell.to_ground();
        if !next.is_adjacent_to(agent.to_cell) && !layer_shift {
            self.repath(agent, ctx, dest, BlockedByActor::Immovable);
            return Step::Continue;
        }

        // Execution-time blocker check against everything physical.
        if !ctx.locomotor.can_move_freely_into(
            ctx.map,
            ctx.actors,
            agent.id,
            next,
            BlockedByActor::All,
            self.ignore,
        ) {
            return self.on_blocked(agent, ctx, next, dest);
        }

        // Face the step before committing to it.
        if let Some(heading) = Facing::from_vec(next - agent.to_cell) {
            if agent.facing != heading {
                if !self.turn_queued {
                    self.path.push(next);
                    self.turn_queued = true;
                    return Step::Push(Box::new(Turn::new(heading)));
                }
                // The queued turn already ran; snap the remainder rather
                // than cycling between turn and step forever.
                agent.facing = heading;
            }
        }

        self.commit_step(agent, ctx, next)
    }

    fn cancel(&mut self, agent: &mut Agent, ctx: &mut MoveContext<'_>) {
        self.release(agent, ctx);
    }
}
