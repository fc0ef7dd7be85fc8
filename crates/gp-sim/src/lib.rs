//! `gp-sim` — the deterministic tick-loop harness that owns the shared
//! pathfinding state and drives every agent's activity stack.
//!
//! # Tick loop
//!
//! ```text
//! for each tick:
//!   ① observer.on_tick_start
//!   ② for each agent in ascending AgentId order:
//!        build a MoveContext from split borrows of the world
//!        tick the agent's activity stack once
//!   ③ observer.on_tick_end, observer.on_snapshot
//!   ④ advance the tick counter
//! ```
//!
//! The strict agent order is a correctness property, not a convenience:
//! within a tick, the order agents plan in decides who wins contested
//! reservation slots, so replaying the same inputs replays the same
//! outcome bit for bit.
//!
//! # What lives here
//!
//! | Module       | Contents                                      |
//! |--------------|-----------------------------------------------|
//! | [`world`]    | `World` — state owner and tick loop           |
//! | [`builder`]  | `WorldBuilder` — validated construction       |
//! | [`observer`] | `WorldObserver`, `NoopObserver`               |
//! | [`trace`]    | `TraceWriter` — CSV position snapshots        |
//! | [`error`]    | `SimError`, `SimResult`                       |

pub mod builder;
pub mod error;
pub mod observer;
pub mod trace;
pub mod world;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::WorldBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, WorldObserver};
pub use trace::TraceWriter;
pub use world::World;
