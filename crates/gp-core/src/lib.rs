//! `gp-core` — foundational types for the `gridpath` cooperative pathfinding
//! engine.
//!
//! This crate is a dependency of every other `gp-*` crate.  It intentionally
//! has no `gp-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `PlayerId`                                     |
//! | [`cell`]   | `CPos`, `CVec`, `WPos`, `WVec`, `SubCell`, cost model     |
//! | [`facing`] | `Facing` — 10-bit angle arithmetic                        |
//! | [`time`]   | `Tick`                                                    |
//! | [`config`] | `PathConfig` — search tuning knobs                        |
//! | [`error`]  | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all plain-data types.    |

pub mod cell;
pub mod config;
pub mod error;
pub mod facing;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{
    diagonal_cost, octile_estimate, CPos, CVec, MoveCost, SubCell, WPos, WVec, CELL_COST,
    CELL_SPAN, COST_INVALID,
};
pub use config::PathConfig;
pub use error::{CoreError, CoreResult};
pub use facing::Facing;
pub use ids::{AgentId, PlayerId};
pub use time::Tick;
