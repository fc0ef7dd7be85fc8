//! Per-agent kinematic state.

use gp_core::{AgentId, CPos, Facing, PlayerId, SubCell, WPos};
use gp_grid::{GridMap, Locomotor};
use gp_search::MoverProfile;

/// The mobility surface of one agent.
///
/// An agent is always "between" `from_cell` and `to_cell`: the two are
/// equal when it is at rest, and differ for the duration of a committed
/// step.  `position` is the interpolated world-space point the renderer
/// would draw; the engine keeps it honest through the half-step
/// activities.
#[derive(Debug)]
pub struct Agent {
    pub id: AgentId,
    pub owner: PlayerId,

    // ── Cell occupancy ────────────────────────────────────────────────────
    /// Cell being left (equals `to_cell` at rest).
    pub from_cell: CPos,
    /// Cell being entered — the agent's logical location.
    pub to_cell: CPos,
    pub from_subcell: SubCell,
    pub to_subcell: SubCell,

    // ── Visual state ──────────────────────────────────────────────────────
    /// Interpolated world position.
    pub position: WPos,
    pub facing: Facing,

    // ── Kinematics ────────────────────────────────────────────────────────
    /// Base speed in world units per tick on full-speed terrain.
    pub speed: u32,
    /// Facing units turned per tick; 0 means turning is free.
    pub turn_speed: u16,
    /// The agent cannot curve through a step; it always stops and turns.
    pub always_turn_in_place: bool,

    // ── Planning parameters ───────────────────────────────────────────────
    /// Window size W used by this agent's cooperative searches.
    pub window: u16,
    /// Forced-rewindow cadence multiplier.
    pub reset_speed: u32,
    /// Index of the locomotor this agent moves with.
    pub locomotor: u8,
}

impl Agent {
    /// An agent at rest in `cell`, facing north, with middling defaults
    /// (speed of one cell per 8 ticks, 64 facing units per tick, W = 8).
    pub fn new(id: AgentId, owner: PlayerId, cell: CPos) -> Agent {
        Agent {
            id,
            owner,
            from_cell: cell,
            to_cell: cell,
            from_subcell: SubCell::Center,
            to_subcell: SubCell::Center,
            position: WPos::center_of(cell),
            facing: Facing::NORTH,
            speed: 128,
            turn_speed: 64,
            always_turn_in_place: false,
            window: 8,
            reset_speed: 1,
            locomotor: 0,
        }
    }

    /// The agent's logical location: the cell it occupies or is entering.
    #[inline]
    pub fn location(&self) -> CPos {
        self.to_cell
    }

    /// `true` while a step is in progress.
    #[inline]
    pub fn is_mid_step(&self) -> bool {
        self.from_cell != self.to_cell
    }

    /// Effective speed inside `cell` in world units per tick.
    pub fn movement_speed_for_cell(&self, map: &GridMap, locomotor: &Locomotor, cell: CPos) -> u32 {
        locomotor.movement_speed_for_cell(map, self.speed, cell)
    }

    /// The kinematic profile the planners consume.
    pub fn mover_profile(&self) -> MoverProfile {
        MoverProfile {
            agent: self.id,
            speed: self.speed,
            facing: self.facing,
            turn_speed: self.turn_speed,
        }
    }
}
