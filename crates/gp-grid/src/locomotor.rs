//! The locomotor: a per-terrain movement cost and speed oracle.
//!
//! A locomotor describes how one *class* of mover (tracked, wheeled, foot)
//! relates to terrain.  Many agents share one locomotor; an agent-specific
//! query is always `(locomotor, agent, cell)` because blocking depends on
//! who is asking.
//!
//! # Cost vs. speed
//!
//! `terrain_cost` drives path *planning* (lower cost = preferred route);
//! `terrain_speed_pct` drives path *execution* (how many ticks a step
//! takes).  The two usually correlate but are configured independently —
//! e.g. a ford can be slow to cross yet still the cheapest route.

use gp_core::{AgentId, CPos, MoveCost, Tick, COST_INVALID};

use crate::{ActorMap, BlockedByActor, GridMap, ReservationTable};

// ── LocomotorProfile ──────────────────────────────────────────────────────────

/// Declarative description of a mover class, indexed by terrain type id.
#[derive(Clone, Debug, Default)]
pub struct LocomotorProfile {
    /// Cost of entering a cell of each terrain type; [`COST_INVALID`] marks
    /// impassable terrain.  Terrain ids beyond the table are impassable.
    pub terrain_cost: Vec<MoveCost>,
    /// Speed percentage on each terrain type (100 = full speed).  Defaults
    /// to 100 for passable terrain when the table is shorter.
    pub terrain_speed_pct: Vec<u32>,
}

// ── Locomotor ─────────────────────────────────────────────────────────────────

/// Frozen, query-optimized form of a [`LocomotorProfile`].
pub struct Locomotor {
    cost: Vec<MoveCost>,
    speed_pct: Vec<u32>,
    /// Cheapest passable terrain cost — the base of the octile heuristic.
    min_cost: MoveCost,
}

impl Locomotor {
    pub fn new(profile: LocomotorProfile) -> Locomotor {
        let min_cost = profile
            .terrain_cost
            .iter()
            .copied()
            .filter(|&c| c != COST_INVALID)
            .min()
            .unwrap_or(COST_INVALID);
        Locomotor {
            cost: profile.terrain_cost,
            speed_pct: profile.terrain_speed_pct,
            min_cost,
        }
    }

    // ── Terrain tables ────────────────────────────────────────────────────

    /// Cost of entering terrain `t`, [`COST_INVALID`] when impassable.
    #[inline]
    pub fn movement_cost(&self, terrain: u8) -> MoveCost {
        self.cost.get(terrain as usize).copied().unwrap_or(COST_INVALID)
    }

    /// The cheapest terrain cost this locomotor can ever pay.  Used as the
    /// per-cell base of the octile heuristic; [`COST_INVALID`] when the
    /// locomotor can't move at all.
    #[inline]
    pub fn min_terrain_cost(&self) -> MoveCost {
        self.min_cost
    }

    /// Speed modifier on terrain `t` as a percentage.
    #[inline]
    pub fn terrain_speed_pct(&self, terrain: u8) -> u32 {
        if self.movement_cost(terrain) == COST_INVALID {
            return 0;
        }
        self.speed_pct.get(terrain as usize).copied().unwrap_or(100)
    }

    // ── Cell queries ──────────────────────────────────────────────────────

    /// Cost for `agent` to enter `cell` under the given blocker regime, or
    /// [`COST_INVALID`] when terrain or a blocking occupant forbids entry.
    pub fn movement_cost_to_enter(
        &self,
        map: &GridMap,
        actors: &ActorMap,
        agent: AgentId,
        cell: CPos,
        blockers: BlockedByActor,
        ignore: Option<AgentId>,
    ) -> MoveCost {
        let Some(terrain) = map.terrain(cell) else {
            return COST_INVALID;
        };
        let cost = self.movement_cost(terrain);
        if cost == COST_INVALID {
            return COST_INVALID;
        }
        if actors.is_blocked(cell, blockers, agent, ignore) {
            return COST_INVALID;
        }
        cost
    }

    /// `true` when `agent` may enter `cell` right now under `blockers`.
    #[inline]
    pub fn can_move_freely_into(
        &self,
        map: &GridMap,
        actors: &ActorMap,
        agent: AgentId,
        cell: CPos,
        blockers: BlockedByActor,
        ignore: Option<AgentId>,
    ) -> bool {
        self.movement_cost_to_enter(map, actors, agent, cell, blockers, ignore) != COST_INVALID
    }

    /// Cooperative entry check: the static check plus the reservation table
    /// at the projected `arrival` tick.
    #[allow(clippy::too_many_arguments)]
    pub fn can_move_freely_into_coop(
        &self,
        map: &GridMap,
        actors: &ActorMap,
        reservations: &ReservationTable,
        agent: AgentId,
        cell: CPos,
        blockers: BlockedByActor,
        ignore: Option<AgentId>,
        arrival: Tick,
    ) -> bool {
        self.can_move_freely_into(map, actors, agent, cell, blockers, ignore)
            && !reservations.reserved_by_other(cell, arrival, agent)
    }

    /// Effective speed (world units per tick) of an agent with base speed
    /// `agent_speed` inside `cell`.  Zero when the cell is impassable.
    pub fn movement_speed_for_cell(
        &self,
        map: &GridMap,
        agent_speed: u32,
        cell: CPos,
    ) -> u32 {
        match map.terrain(cell) {
            Some(t) => agent_speed * self.terrain_speed_pct(t) / 100,
            None => 0,
        }
    }
}
