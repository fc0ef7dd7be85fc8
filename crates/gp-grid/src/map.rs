//! Grid map representation and builder.
//!
//! # Data layout
//!
//! Ground terrain is a dense row-major `Vec<u8>` of terrain type ids, so a
//! cell lookup is one multiply and one add.  Heights are an optional second
//! dense array — most maps are flat and pay nothing for the feature.  Custom
//! movement layers (tunnels, bridges) are sparse: each holds only the cells
//! it actually covers.
//!
//! # Coordinate conventions
//!
//! Cells are addressed by [`CPos`]; world-space positions by [`WPos`] with
//! [`CELL_SPAN`] units per cell edge.  The map owns every conversion between
//! the two so that callers never hand-roll the arithmetic.

use std::collections::HashMap;

use gp_core::{CPos, Facing, MoveCost, SubCell, WPos, WVec, CELL_SPAN};

use crate::{GridError, GridResult};

// ── MovementLayer ─────────────────────────────────────────────────────────────

/// A custom movement plane above or below the ground: a tunnel network, a
/// bridge deck.  Entering from the ground costs `entry_cost`; returning to
/// the ground costs `exit_cost`.
#[derive(Clone, Debug)]
pub struct MovementLayer {
    /// Layer id; nonzero (0 is the ground plane).
    pub id: u8,
    /// Cost of the ground → layer transition edge.
    pub entry_cost: MoveCost,
    /// Cost of the layer → ground transition edge.
    pub exit_cost: MoveCost,
    /// Disabled layers offer no transition edges and contain no cells for
    /// pathing purposes.
    pub enabled: bool,
    /// Sparse cell membership: (x, y) → terrain type id.
    cells: HashMap<(i32, i32), u8>,
}

impl MovementLayer {
    pub fn new(id: u8, entry_cost: MoveCost, exit_cost: MoveCost) -> MovementLayer {
        MovementLayer { id, entry_cost, exit_cost, enabled: true, cells: HashMap::new() }
    }

    /// Add a cell to the layer with the given terrain type.
    pub fn add_cell(&mut self, x: i32, y: i32, terrain: u8) -> &mut Self {
        self.cells.insert((x, y), terrain);
        self
    }

    /// `true` if the layer covers `(x, y)`.
    #[inline]
    pub fn covers(&self, x: i32, y: i32) -> bool {
        self.cells.contains_key(&(x, y))
    }

    #[inline]
    pub fn terrain(&self, x: i32, y: i32) -> Option<u8> {
        self.cells.get(&(x, y)).copied()
    }
}

// ── GridMap ───────────────────────────────────────────────────────────────────

/// An immutable grid map: ground terrain, optional heights, and custom
/// movement layers.  Construct via [`GridMapBuilder`].
pub struct GridMap {
    width: i32,
    height: i32,
    /// Row-major terrain type ids for the ground plane.
    terrain: Vec<u8>,
    /// Row-major cell heights; `None` for flat maps.
    heights: Option<Vec<i32>>,
    /// Custom movement layers, sorted by id.
    layers: Vec<MovementLayer>,
}

impl GridMap {
    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn cell_index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    // ── Containment and terrain ───────────────────────────────────────────

    /// `true` if `cell` exists: within bounds on the ground plane, or
    /// covered by an enabled custom layer.
    pub fn contains(&self, cell: CPos) -> bool {
        if cell.layer == 0 {
            return cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height;
        }
        self.layer(cell.layer)
            .is_some_and(|l| l.enabled && l.covers(cell.x, cell.y))
    }

    /// Terrain type id at `cell`, or `None` when the cell does not exist.
    pub fn terrain(&self, cell: CPos) -> Option<u8> {
        if cell.layer == 0 {
            if !self.contains(cell) {
                return None;
            }
            return Some(self.terrain[self.cell_index(cell.x, cell.y)]);
        }
        self.layer(cell.layer)
            .filter(|l| l.enabled)
            .and_then(|l| l.terrain(cell.x, cell.y))
    }

    /// Cell height.  Custom layers are flat; flat maps report 0 everywhere.
    pub fn cell_height(&self, cell: CPos) -> i32 {
        if cell.layer != 0 || !self.contains(cell) {
            return 0;
        }
        match &self.heights {
            Some(h) => h[self.cell_index(cell.x, cell.y)],
            None => 0,
        }
    }

    /// `true` when the map carries elevation data (enables the
    /// terrain-height gate in the path graph).
    #[inline]
    pub fn has_heights(&self) -> bool {
        self.heights.is_some()
    }

    // ── Movement layers ───────────────────────────────────────────────────

    /// All custom movement layers, sorted by id.
    pub fn movement_layers(&self) -> &[MovementLayer] {
        &self.layers
    }

    pub fn layer(&self, id: u8) -> Option<&MovementLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    // ── World-space conversions ───────────────────────────────────────────

    /// Centre of `cell` in world units.
    #[inline]
    pub fn center_of_cell(&self, cell: CPos) -> WPos {
        WPos::center_of(cell)
    }

    /// The ground cell containing a world position.
    #[inline]
    pub fn cell_containing(&self, pos: WPos) -> CPos {
        pos.containing_cell()
    }

    /// The world-space midpoint between the centres of two cells — the
    /// half-way point of a single step.
    #[inline]
    pub fn between_cells(&self, a: CPos, b: CPos) -> WPos {
        WPos::center_of(a).midpoint(WPos::center_of(b))
    }

    /// World-unit offset of a sub-cell slot from its cell centre.
    #[inline]
    pub fn offset_of_subcell(&self, subcell: SubCell) -> WVec {
        subcell.offset()
    }

    /// Facing of the straight line `from → to`, or `fallback` when the two
    /// cells coincide in the plane.
    pub fn facing_between(&self, from: CPos, to: CPos, fallback: Facing) -> Facing {
        Facing::from_vec(to - from).unwrap_or(fallback)
    }

    // ── Area queries ──────────────────────────────────────────────────────

    /// All ground cells within `range` cells (Euclidean) of `center`, in
    /// deterministic row-major order.  `center` itself is included.
    pub fn tiles_in_circle(&self, center: CPos, range: i32) -> Vec<CPos> {
        let range = range.max(0);
        let r2 = (range as i64) * (range as i64);
        let mut out = Vec::new();
        for y in center.y - range..=center.y + range {
            for x in center.x - range..=center.x + range {
                let cell = CPos::new(x, y);
                if !self.contains(cell) {
                    continue;
                }
                if (cell - center).length_squared() <= r2 {
                    out.push(cell);
                }
            }
        }
        out
    }
}

// ── GridMapBuilder ────────────────────────────────────────────────────────────

/// Construct a [`GridMap`] incrementally, then call [`build`](Self::build).
///
/// All cells start as terrain 0 at height 0.  Setting any height allocates
/// the height array and arms the terrain-height gate.
///
/// # Example
///
/// ```
/// use gp_grid::GridMapBuilder;
///
/// let mut b = GridMapBuilder::new(10, 1);
/// b.set_terrain(5, 0, 1); // a rough patch
/// let map = b.build().unwrap();
/// assert!(map.contains(gp_core::CPos::new(9, 0)));
/// assert!(!map.contains(gp_core::CPos::new(10, 0)));
/// ```
pub struct GridMapBuilder {
    width: i32,
    height: i32,
    terrain: Vec<u8>,
    heights: Option<Vec<i32>>,
    layers: Vec<MovementLayer>,
}

impl GridMapBuilder {
    pub fn new(width: i32, height: i32) -> GridMapBuilder {
        let cells = (width.max(0) * height.max(0)) as usize;
        GridMapBuilder {
            width,
            height,
            terrain: vec![0; cells],
            heights: None,
            layers: Vec::new(),
        }
    }

    /// Set the terrain type of a ground cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn set_terrain(&mut self, x: i32, y: i32, terrain: u8) -> &mut Self {
        assert!(x >= 0 && y >= 0 && x < self.width && y < self.height, "cell out of bounds");
        let idx = (y * self.width + x) as usize;
        self.terrain[idx] = terrain;
        self
    }

    /// Fill a rectangle (inclusive corners) with one terrain type.
    pub fn fill_terrain(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, terrain: u8) -> &mut Self {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set_terrain(x, y, terrain);
            }
        }
        self
    }

    /// Set the height of a ground cell, allocating the height array on first
    /// use.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn set_height(&mut self, x: i32, y: i32, h: i32) -> &mut Self {
        assert!(x >= 0 && y >= 0 && x < self.width && y < self.height, "cell out of bounds");
        let cells = (self.width * self.height) as usize;
        let idx = (y * self.width + x) as usize;
        self.heights.get_or_insert_with(|| vec![0; cells])[idx] = h;
        self
    }

    /// Register a custom movement layer.
    pub fn add_movement_layer(&mut self, layer: MovementLayer) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// Validate and freeze the map.
    ///
    /// # Errors
    ///
    /// Fails on non-positive dimensions, a layer claiming id 0, or two
    /// layers sharing an id.
    pub fn build(self) -> GridResult<GridMap> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GridError::EmptyMap { width: self.width, height: self.height });
        }

        let mut layers = self.layers;
        layers.sort_by_key(|l| l.id);
        for pair in layers.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(GridError::DuplicateLayerId(pair[0].id));
            }
        }
        if layers.first().is_some_and(|l| l.id == 0) {
            return Err(GridError::ReservedLayerId);
        }

        Ok(GridMap {
            width: self.width,
            height: self.height,
            terrain: self.terrain,
            heights: self.heights,
            layers,
        })
    }
}
