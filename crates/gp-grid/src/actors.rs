//! Sparse actor occupancy and the blocker regimes searches plan under.

use std::collections::HashMap;

use gp_core::{AgentId, CPos, PlayerId};

// ── Occupants ─────────────────────────────────────────────────────────────────

/// How an occupant behaves when something wants to path through its cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OccupantKind {
    /// Will never move (buildings, wrecks).
    Immovable,
    /// Mobile but currently idle.
    Stationary,
    /// Currently executing a move.
    Moving,
}

/// One actor registered in a cell.
#[derive(Copy, Clone, Debug)]
pub struct Occupant {
    pub agent: AgentId,
    pub owner: PlayerId,
    pub kind: OccupantKind,
}

// ── Blocker regimes ───────────────────────────────────────────────────────────

/// Which occupant kinds a particular search treats as blocking.
///
/// Regimes are ordered from most permissive to most restrictive; the window
/// planner relaxes from `Immovable` to `None` when boxed in, and the move
/// activity escalates to `All` as a last resort against persistent blockers.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BlockedByActor {
    /// Nothing blocks — terrain only.
    None,
    /// Only immovable occupants block.
    Immovable,
    /// Immovable and stationary occupants block.
    Stationary,
    /// Every occupant blocks.
    All,
}

impl BlockedByActor {
    /// `true` when `kind` counts as blocking under this regime.
    #[inline]
    pub fn blocks(self, kind: OccupantKind) -> bool {
        match self {
            BlockedByActor::None => false,
            BlockedByActor::Immovable => kind == OccupantKind::Immovable,
            BlockedByActor::Stationary => kind != OccupantKind::Moving,
            BlockedByActor::All => true,
        }
    }
}

// ── ActorMap ──────────────────────────────────────────────────────────────────

/// Sparse `CPos → occupants` index, updated as agents commit to cell
/// transitions.  Only occupied cells carry an entry.
#[derive(Default)]
pub struct ActorMap {
    cells: HashMap<CPos, Vec<Occupant>>,
}

impl ActorMap {
    pub fn new() -> ActorMap {
        Self::default()
    }

    /// Register `occupant` in `cell`.  An agent may transiently occupy two
    /// cells while executing a half-step.
    pub fn add(&mut self, cell: CPos, occupant: Occupant) {
        self.cells.entry(cell).or_default().push(occupant);
    }

    /// Remove `agent` from `cell` (no-op if absent).
    pub fn remove(&mut self, cell: CPos, agent: AgentId) {
        if let Some(list) = self.cells.get_mut(&cell) {
            list.retain(|o| o.agent != agent);
            if list.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    /// Move `agent`'s registration from one cell to another, preserving its
    /// owner and kind.
    pub fn move_agent(&mut self, from: CPos, to: CPos, agent: AgentId) {
        let occupant = self
            .cells
            .get(&from)
            .and_then(|l| l.iter().find(|o| o.agent == agent).copied());
        if let Some(occupant) = occupant {
            self.remove(from, agent);
            self.add(to, occupant);
        }
    }

    /// Update the recorded kind of `agent` in `cell` (idle ↔ moving).
    pub fn set_kind(&mut self, cell: CPos, agent: AgentId, kind: OccupantKind) {
        if let Some(list) = self.cells.get_mut(&cell) {
            for o in list.iter_mut().filter(|o| o.agent == agent) {
                o.kind = kind;
            }
        }
    }

    /// Occupants registered at `cell`.
    pub fn occupants_at(&self, cell: CPos) -> &[Occupant] {
        self.cells.get(&cell).map_or(&[], Vec::as_slice)
    }

    /// `true` when `cell` is blocked for `this_agent` under `blockers`.
    ///
    /// The agent itself never blocks its own path; `ignore` exempts one
    /// additional agent (e.g. a transport the agent is boarding).
    pub fn is_blocked(
        &self,
        cell: CPos,
        blockers: BlockedByActor,
        this_agent: AgentId,
        ignore: Option<AgentId>,
    ) -> bool {
        if blockers == BlockedByActor::None {
            return false;
        }
        self.occupants_at(cell).iter().any(|o| {
            o.agent != this_agent && Some(o.agent) != ignore && blockers.blocks(o.kind)
        })
    }

    /// The first blocking occupant, if any — used by the move activity to
    /// decide between nudging, waiting, and repathing.
    pub fn first_blocker(
        &self,
        cell: CPos,
        blockers: BlockedByActor,
        this_agent: AgentId,
        ignore: Option<AgentId>,
    ) -> Option<Occupant> {
        self.occupants_at(cell)
            .iter()
            .find(|o| o.agent != this_agent && Some(o.agent) != ignore && blockers.blocks(o.kind))
            .copied()
    }
}
