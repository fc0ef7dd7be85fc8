//! Search tuning knobs shared by all planners.

use crate::error::{CoreError, CoreResult};

/// Configuration for the cooperative pathfinding engine.
///
/// Typically constructed once per world and shared by reference.  The
/// defaults are safe for maps up to a few hundred cells across.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathConfig {
    /// Modulus of the space–time reservation table.  Reservations older than
    /// this many ticks are implicitly invalidated by wraparound overwrite.
    /// Must exceed any window size in use.  Default: 4999.
    pub time_length: u32,

    /// Window size W: timesteps planned per cooperative search.  Default: 8.
    pub window: u16,

    /// Multiplier for the forced-rewindow cadence: every
    /// `window * reset_speed` ticks all agents discard their remaining plan
    /// and replan together.  Default: 1.
    pub reset_speed: u32,

    /// Heuristic weight percentage.  100 keeps the search admissible;
    /// larger values trade path quality for fewer expansions.  Default: 100.
    pub heuristic_weight_pct: u32,

    /// Lane-bias penalty added to parity-mismatched steps so that opposing
    /// traffic passes on consistent sides.  0 disables.  Default: 1.
    pub lane_bias: u32,
}

impl PathConfig {
    /// Validated construction.
    ///
    /// # Errors
    ///
    /// Fails if `time_length <= window` (wraparound could collide with live
    /// reservations), if `window == 0`, or if `reset_speed == 0`.
    pub fn new(
        time_length: u32,
        window: u16,
        reset_speed: u32,
        heuristic_weight_pct: u32,
        lane_bias: u32,
    ) -> CoreResult<PathConfig> {
        if window == 0 {
            return Err(CoreError::Config("window must be nonzero".into()));
        }
        if reset_speed == 0 {
            return Err(CoreError::Config("reset_speed must be nonzero".into()));
        }
        if time_length <= window as u32 {
            return Err(CoreError::Config(format!(
                "time_length ({time_length}) must exceed window ({window})"
            )));
        }
        Ok(PathConfig {
            time_length,
            window,
            reset_speed,
            heuristic_weight_pct,
            lane_bias,
        })
    }

    /// Ticks between forced global rewindow boundaries.
    #[inline]
    pub fn rewindow_period(&self) -> u64 {
        self.window as u64 * self.reset_speed as u64
    }

    /// `true` when `tick` falls on a forced rewindow boundary.
    #[inline]
    pub fn is_rewindow_boundary(&self, tick: crate::Tick) -> bool {
        tick.0 % self.rewindow_period() == 0
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        PathConfig {
            time_length: 4999,
            window: 8,
            reset_speed: 1,
            heuristic_weight_pct: 100,
            lane_bias: 1,
        }
    }
}
