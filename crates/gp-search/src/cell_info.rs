//! Per-node search records and their storage.
//!
//! # Two storage shapes
//!
//! The 2-D searches (plain A\*, RRA\*) touch a large fraction of the map and
//! use dense map-sized layers drawn from a [`CellInfoPool`]; acquiring a
//! layer costs one `memset`-style reset instead of an allocation.  The
//! space–time search touches a thin tube of (cell, step) nodes and uses a
//! sparse hash map ([`SpaceTimeStore`]).
//!
//! # Status discipline
//!
//! The open queue is not a decrease-key heap, so improving an open node
//! pushes a *second* queue entry.  The node's status is set to
//! [`CellStatus::Duplicate`] to record that stale entries exist; the pop
//! loop accepts an entry only when its priority still matches the node's
//! recorded estimate and discards the rest.  `Invalid` marks nodes rejected
//! outright (e.g. by a custom-cost veto) so they are never expanded.

use std::collections::HashMap;

use gp_core::{CPos, MoveCost, Tick, COST_INVALID};

// ── CellStatus ────────────────────────────────────────────────────────────────

/// Search lifecycle of one node.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum CellStatus {
    #[default]
    Unvisited,
    /// In the open queue with exactly one live entry.
    Open,
    /// In the open queue, and at least one superseded entry is also still
    /// queued.  Treated as open; the stale entries are dropped at pop time.
    Duplicate,
    Closed,
    /// Rejected; never enters the open queue.
    Invalid,
}

impl CellStatus {
    /// `true` for the two states that may legitimately be popped.
    #[inline]
    pub fn is_open(self) -> bool {
        matches!(self, CellStatus::Open | CellStatus::Duplicate)
    }
}

// ── CellInfo ──────────────────────────────────────────────────────────────────

/// The search record of one node.
#[derive(Copy, Clone, Debug)]
pub struct CellInfo {
    /// Best known cost from the search root(s) — g.
    pub cost_so_far: MoveCost,
    /// g plus the heuristic — f, the open-queue priority.
    pub estimated_total: MoveCost,
    /// Predecessor cell; equal to the node's own cell at search roots.
    pub previous: CPos,
    pub status: CellStatus,
    /// Simulation tick at which the agent would occupy this node.  Only
    /// meaningful in space–time search; `Tick::ZERO` elsewhere.
    pub arrival: Tick,
}

impl CellInfo {
    /// The record of a never-touched node.
    pub fn unvisited() -> CellInfo {
        CellInfo {
            cost_so_far: COST_INVALID,
            estimated_total: COST_INVALID,
            previous: CPos::new(0, 0),
            status: CellStatus::Unvisited,
            arrival: Tick::ZERO,
        }
    }

    /// The record seeded at a search root.
    pub fn root(cell: CPos, estimate: MoveCost, arrival: Tick) -> CellInfo {
        CellInfo {
            cost_so_far: 0,
            estimated_total: estimate,
            previous: cell,
            status: CellStatus::Open,
            arrival,
        }
    }
}

// ── CellInfoLayer ─────────────────────────────────────────────────────────────

/// A dense, map-sized grid of [`CellInfo`] for one movement layer.
pub struct CellInfoLayer {
    width: i32,
    height: i32,
    cells: Box<[CellInfo]>,
}

impl CellInfoLayer {
    fn new(width: i32, height: i32) -> CellInfoLayer {
        let n = (width * height) as usize;
        CellInfoLayer {
            width,
            height,
            cells: vec![CellInfo::unvisited(); n].into_boxed_slice(),
        }
    }

    fn reset(&mut self) {
        self.cells.fill(CellInfo::unvisited());
    }

    #[inline]
    fn index_of(&self, cell: CPos) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width || cell.y >= self.height {
            return None;
        }
        Some((cell.y * self.width + cell.x) as usize)
    }

    /// The record at `cell`; out-of-bounds reads as unvisited.
    #[inline]
    pub fn get(&self, cell: CPos) -> CellInfo {
        match self.index_of(cell) {
            Some(i) => self.cells[i],
            None => CellInfo::unvisited(),
        }
    }

    /// Store `info` at `cell`; out-of-bounds writes are dropped.
    #[inline]
    pub fn set(&mut self, cell: CPos, info: CellInfo) {
        if let Some(i) = self.index_of(cell) {
            self.cells[i] = info;
        }
    }
}

// ── CellInfoPool ──────────────────────────────────────────────────────────────

/// A pool of reusable [`CellInfoLayer`]s, one pool per world.
///
/// Searches acquire layers at construction and release them on disposal, so
/// peak memory is bounded by the number of simultaneously live searches
/// rather than the number of searches ever run.
pub struct CellInfoPool {
    width: i32,
    height: i32,
    free: Vec<CellInfoLayer>,
    outstanding: usize,
}

impl CellInfoPool {
    /// Create a pool producing layers sized for a `width` × `height` map.
    pub fn new(width: i32, height: i32) -> CellInfoPool {
        CellInfoPool { width, height, free: Vec::new(), outstanding: 0 }
    }

    /// Take a reset layer from the pool, allocating only when empty.
    pub fn acquire(&mut self) -> CellInfoLayer {
        self.outstanding += 1;
        match self.free.pop() {
            Some(mut layer) => {
                layer.reset();
                layer
            }
            None => CellInfoLayer::new(self.width, self.height),
        }
    }

    /// Return a layer for reuse.
    pub fn release(&mut self, layer: CellInfoLayer) {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.free.push(layer);
    }

    /// Layers currently held by live searches.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Layers sitting in the pool ready for reuse.
    pub fn pooled(&self) -> usize {
        self.free.len()
    }
}

// ── Space–time storage ────────────────────────────────────────────────────────

/// A node of the space–time graph: a cell at a window step.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SpaceTimeNode {
    pub cell: CPos,
    /// Window step, 0 ..= W.
    pub step: u16,
}

/// Sparse space–time records.  A window search touches O(W · branching)
/// nodes out of a (cells × W)-sized space, so a hash map wins over any
/// dense layout.
#[derive(Default)]
pub struct SpaceTimeStore {
    nodes: HashMap<SpaceTimeNode, CellInfo>,
}

impl SpaceTimeStore {
    pub fn new() -> SpaceTimeStore {
        Self::default()
    }

    #[inline]
    pub fn get(&self, node: SpaceTimeNode) -> CellInfo {
        self.nodes.get(&node).copied().unwrap_or_else(CellInfo::unvisited)
    }

    #[inline]
    pub fn set(&mut self, node: SpaceTimeNode, info: CellInfo) {
        self.nodes.insert(node, info);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
