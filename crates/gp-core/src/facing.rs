//! `Facing` — 10-bit angle arithmetic.
//!
//! Angles are stored in 1/1024ths of a full turn: 0 = north (−y, screen
//! convention), increasing clockwise, so east = 256, south = 512, west = 768.
//! All arithmetic wraps modulo 1024, and "shortest arc" deltas are signed
//! values in `[-512, 511]`.

use std::fmt;

use crate::cell::CVec;

/// Number of facing units in a full turn.
pub const FULL_TURN: u16 = 1024;

const MASK: u16 = FULL_TURN - 1;

/// A 10-bit facing angle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facing(u16);

impl Facing {
    pub const NORTH: Facing = Facing(0);
    pub const EAST: Facing = Facing(256);
    pub const SOUTH: Facing = Facing(512);
    pub const WEST: Facing = Facing(768);

    /// Construct from raw units, wrapping into range.
    #[inline]
    pub const fn new(units: u16) -> Facing {
        Facing(units & MASK)
    }

    #[inline]
    pub const fn units(self) -> u16 {
        self.0
    }

    /// The facing of a unit step direction, or `None` for the zero vector.
    pub fn from_vec(v: CVec) -> Option<Facing> {
        let units = match (v.x.signum(), v.y.signum()) {
            (0, -1) => 0,
            (1, -1) => 128,
            (1, 0) => 256,
            (1, 1) => 384,
            (0, 1) => 512,
            (-1, 1) => 640,
            (-1, 0) => 768,
            (-1, -1) => 896,
            _ => return None,
        };
        Some(Facing(units))
    }

    /// Signed shortest arc from `self` to `target`, in `[-512, 511]`.
    /// Positive means clockwise.
    #[inline]
    pub fn delta(self, target: Facing) -> i16 {
        let raw = (target.0.wrapping_sub(self.0)) & MASK;
        if raw >= FULL_TURN / 2 {
            raw as i16 - FULL_TURN as i16
        } else {
            raw as i16
        }
    }

    /// Unsigned magnitude of the shortest arc to `target`, in `[0, 512]`.
    #[inline]
    pub fn arc_to(self, target: Facing) -> u16 {
        self.delta(target).unsigned_abs()
    }

    /// A turn is "sharp" when its magnitude falls in `[384, 640]` units —
    /// 135° ± 45°.  Sharp turns cannot be curved through mid-step.
    #[inline]
    pub fn is_sharp_turn_to(self, target: Facing) -> bool {
        let raw = (target.0.wrapping_sub(self.0)) & MASK;
        (384..=640).contains(&raw)
    }

    /// Rotate up to `step` units toward `target`, stopping exactly on it.
    pub fn rotate_toward(self, target: Facing, step: u16) -> Facing {
        let d = self.delta(target);
        if d.unsigned_abs() <= step {
            return target;
        }
        if d > 0 {
            Facing::new(self.0.wrapping_add(step))
        } else {
            Facing::new(self.0.wrapping_sub(step))
        }
    }

    /// Whole ticks needed to rotate to `target` at `turn_speed` units/tick.
    /// A zero turn speed means the turn can never complete; callers treat
    /// such agents as turning for free in place.
    pub fn ticks_to_turn(self, target: Facing, turn_speed: u16) -> u64 {
        if turn_speed == 0 {
            return 0;
        }
        (self.arc_to(target) as u64).div_ceil(turn_speed as u64)
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/1024", self.0)
    }
}
