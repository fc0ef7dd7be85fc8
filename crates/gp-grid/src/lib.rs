//! `gp-grid` — the terrain map, movement-cost oracle, and shared occupancy
//! state that searches plan against.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`map`]         | `GridMap`, `GridMapBuilder`, `MovementLayer`          |
//! | [`locomotor`]   | `Locomotor`, `LocomotorProfile` — per-terrain costs   |
//! | [`actors`]      | `ActorMap`, `Occupant`, `BlockedByActor`              |
//! | [`reservation`] | `ReservationTable` — cyclic space–time occupancy      |
//! | [`error`]       | `GridError`, `GridResult`                             |
//!
//! The map and locomotor are the two injected capabilities every search
//! consumes; the actor map and reservation table are the shared mutable
//! state that makes searches *cooperative*.

pub mod actors;
pub mod error;
pub mod locomotor;
pub mod map;
pub mod reservation;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use actors::{ActorMap, BlockedByActor, Occupant, OccupantKind};
pub use error::{GridError, GridResult};
pub use locomotor::{Locomotor, LocomotorProfile};
pub use map::{GridMap, GridMapBuilder, MovementLayer};
pub use reservation::ReservationTable;
