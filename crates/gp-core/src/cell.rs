//! Cell and world coordinates, and the integer movement-cost model.
//!
//! # Coordinate spaces
//!
//! Two spaces coexist:
//!
//! - **Cell space** ([`CPos`], [`CVec`]): integer grid coordinates.  `y`
//!   grows downward (screen convention).  `layer == 0` is the ground plane;
//!   nonzero layers are custom movement layers (tunnels, bridges) defined by
//!   the map.
//! - **World space** ([`WPos`], [`WVec`]): fixed-point sub-cell positions
//!   used for visual interpolation.  One cell edge spans [`CELL_SPAN`]
//!   (1024) world units, so conversions are shifts, not divisions.
//!
//! # Cost model
//!
//! All edge costs are integer [`MoveCost`] values.  [`COST_INVALID`]
//! (`u32::MAX`) is the "cannot enter" sentinel; it is never added to — code
//! must test for it before accumulating.  A nominal flat-terrain cell costs
//! [`CELL_COST`] (100), and a diagonal step costs `34/24` (≈ √2) of the
//! straight cost, which keeps octile distances exact in integers.

use std::fmt;
use std::ops::{Add, Sub};

// ── Cost model ────────────────────────────────────────────────────────────────

/// Integer movement cost.
pub type MoveCost = u32;

/// Sentinel cost for a cell that cannot be entered.
pub const COST_INVALID: MoveCost = u32::MAX;

/// Nominal cost of entering a flat, unobstructed cell.
pub const CELL_COST: MoveCost = 100;

/// World units spanned by one cell edge.
pub const CELL_SPAN: i32 = 1024;

/// Cost of a diagonal step given the straight-step cost.
///
/// `34/24` over-approximates √2 by ~0.2 %, keeping the heuristic admissible
/// while staying in integer arithmetic.
#[inline]
pub fn diagonal_cost(straight: MoveCost) -> MoveCost {
    straight.saturating_mul(34) / 24
}

/// Admissible octile lower bound on the cost of travelling `from → to`,
/// given the cheapest per-cell entry cost the mover can ever see.
///
/// `weight_pct` scales the estimate: 100 keeps it admissible; larger values
/// trade optimality for fewer expansions.  Saturates instead of overflowing.
pub fn octile_estimate(from: CPos, to: CPos, cell_cost: MoveCost, weight_pct: u32) -> MoveCost {
    let dx = from.x.abs_diff(to.x);
    let dy = from.y.abs_diff(to.y);
    let diag = dx.min(dy);
    let straight = dx.max(dy) - diag;

    let h = (straight as u64) * (cell_cost as u64)
        + (diag as u64) * (diagonal_cost(cell_cost) as u64);
    let h = h * (weight_pct as u64) / 100;
    h.min(COST_INVALID as u64 - 1) as MoveCost
}

// ── CVec ──────────────────────────────────────────────────────────────────────

/// A cell-space direction vector.  Components of unit steps are in
/// `{-1, 0, 1}`, but arbitrary offsets are representable.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CVec {
    pub x: i32,
    pub y: i32,
}

impl CVec {
    pub const ZERO: CVec = CVec { x: 0, y: 0 };

    /// The eight surrounding unit directions in row-major order
    /// (top-left … bottom-right, centre omitted).
    pub const FULL_NEIGHBORHOOD: [CVec; 8] = [
        CVec::new(-1, -1),
        CVec::new(0, -1),
        CVec::new(1, -1),
        CVec::new(-1, 0),
        CVec::new(1, 0),
        CVec::new(-1, 1),
        CVec::new(0, 1),
        CVec::new(1, 1),
    ];

    #[inline]
    pub const fn new(x: i32, y: i32) -> CVec {
        CVec { x, y }
    }

    /// `true` for the four diagonal unit directions.
    #[inline]
    pub fn is_diagonal(self) -> bool {
        self.x * self.y != 0
    }

    /// Row-major index of a unit direction: `(y+1)*3 + (x+1)`, so 0–8 with
    /// 4 denoting the zero vector.  Meaningful only for unit steps.
    #[inline]
    pub fn direction_index(self) -> usize {
        ((self.y + 1) * 3 + (self.x + 1)) as usize
    }

    #[inline]
    pub fn length_squared(self) -> i64 {
        let (x, y) = (self.x as i64, self.y as i64);
        x * x + y * y
    }
}

impl Add for CVec {
    type Output = CVec;
    #[inline]
    fn add(self, rhs: CVec) -> CVec {
        CVec::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for CVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ── CPos ──────────────────────────────────────────────────────────────────────

/// A cell position: integer grid coordinates plus a movement layer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPos {
    pub x: i32,
    pub y: i32,
    /// `0` = ground plane; nonzero layers are map-defined (tunnels, bridges).
    pub layer: u8,
}

impl CPos {
    /// A ground-layer cell.
    #[inline]
    pub const fn new(x: i32, y: i32) -> CPos {
        CPos { x, y, layer: 0 }
    }

    #[inline]
    pub const fn with_layer(x: i32, y: i32, layer: u8) -> CPos {
        CPos { x, y, layer }
    }

    /// The same (x, y) projected onto the ground plane.
    #[inline]
    pub fn to_ground(self) -> CPos {
        CPos::new(self.x, self.y)
    }

    /// The same (x, y) on another layer.
    #[inline]
    pub fn on_layer(self, layer: u8) -> CPos {
        CPos { layer, ..self }
    }

    /// Offset by a direction vector, staying on the same layer.
    #[inline]
    pub fn offset(self, v: CVec) -> CPos {
        CPos { x: self.x + v.x, y: self.y + v.y, layer: self.layer }
    }

    /// `true` if `other` is within one king-move step on the same layer.
    #[inline]
    pub fn is_adjacent_to(self, other: CPos) -> bool {
        self.layer == other.layer
            && (self.x - other.x).abs() <= 1
            && (self.y - other.y).abs() <= 1
    }
}

/// Deterministic total order: by layer, then row, then column.
impl Ord for CPos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.layer, self.y, self.x).cmp(&(other.layer, other.y, other.x))
    }
}

impl PartialOrd for CPos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Add<CVec> for CPos {
    type Output = CPos;
    #[inline]
    fn add(self, rhs: CVec) -> CPos {
        self.offset(rhs)
    }
}

/// Planar difference.  The layers of the operands are ignored: layer
/// transitions are vertical and have no planar extent.
impl Sub for CPos {
    type Output = CVec;
    #[inline]
    fn sub(self, rhs: CPos) -> CVec {
        CVec::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for CPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.layer == 0 {
            write!(f, "({},{})", self.x, self.y)
        } else {
            write!(f, "({},{},L{})", self.x, self.y, self.layer)
        }
    }
}

// ── World space ───────────────────────────────────────────────────────────────

/// A fixed-point world position (1024 units per cell edge).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WPos {
    pub x: i32,
    pub y: i32,
}

impl WPos {
    #[inline]
    pub const fn new(x: i32, y: i32) -> WPos {
        WPos { x, y }
    }

    /// The centre of `cell` in world units.
    #[inline]
    pub fn center_of(cell: CPos) -> WPos {
        WPos::new(cell.x * CELL_SPAN + CELL_SPAN / 2, cell.y * CELL_SPAN + CELL_SPAN / 2)
    }

    /// The cell whose footprint contains this position (ground layer).
    #[inline]
    pub fn containing_cell(self) -> CPos {
        CPos::new(self.x.div_euclid(CELL_SPAN), self.y.div_euclid(CELL_SPAN))
    }

    /// Midpoint between two world positions (rounds toward negative infinity).
    #[inline]
    pub fn midpoint(self, other: WPos) -> WPos {
        WPos::new((self.x + other.x) / 2, (self.y + other.y) / 2)
    }

    /// Linear interpolation at `num/den` of the way toward `to`.
    ///
    /// `den` must be nonzero; `num` is clamped to `den`.
    pub fn lerp(self, to: WPos, num: i32, den: i32) -> WPos {
        let num = num.clamp(0, den);
        WPos::new(
            self.x + ((to.x - self.x) as i64 * num as i64 / den as i64) as i32,
            self.y + ((to.y - self.y) as i64 * num as i64 / den as i64) as i32,
        )
    }
}

impl Add<WVec> for WPos {
    type Output = WPos;
    #[inline]
    fn add(self, rhs: WVec) -> WPos {
        WPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for WPos {
    type Output = WVec;
    #[inline]
    fn sub(self, rhs: WPos) -> WVec {
        WVec::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for WPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// A fixed-point world-space vector.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WVec {
    pub x: i32,
    pub y: i32,
}

impl WVec {
    #[inline]
    pub const fn new(x: i32, y: i32) -> WVec {
        WVec { x, y }
    }

    /// Euclidean length in world units, rounded down.
    pub fn length(self) -> i32 {
        let (x, y) = (self.x as i64, self.y as i64);
        ((x * x + y * y) as f64).sqrt() as i32
    }
}

// ── SubCell ───────────────────────────────────────────────────────────────────

/// A sub-cell slot within a cell, for agents that share cells.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubCell {
    #[default]
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SubCell {
    /// World-unit offset of this slot from the cell centre.
    pub fn offset(self) -> WVec {
        const Q: i32 = CELL_SPAN / 4;
        match self {
            SubCell::Center => WVec::new(0, 0),
            SubCell::TopLeft => WVec::new(-Q, -Q),
            SubCell::TopRight => WVec::new(Q, -Q),
            SubCell::BottomLeft => WVec::new(-Q, Q),
            SubCell::BottomRight => WVec::new(Q, Q),
        }
    }
}
