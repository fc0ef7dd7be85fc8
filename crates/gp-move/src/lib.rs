//! `gp-move` — the per-agent driver that turns windowed plans into cell
//! steps, turns, waits and half-step interpolations.
//!
//! # What lives here
//!
//! | Module           | Contents                                             |
//! |------------------|------------------------------------------------------|
//! | [`agent`]        | `Agent` — one mover's kinematic state                |
//! | [`activity`]     | `Activity`, `Step`, `ActivityStack`, `MoveContext`   |
//! | [`move_activity`]| `Move` — the windowed movement state machine         |
//! | [`turn`]         | `Turn` — rotate in place                             |
//! | [`wait`]         | `WaitFor` — tick-counted wait with early boundary fire |
//! | [`half_step`]    | `MoveFirstHalf`, `MoveSecondHalf` — visual interpolation |
//!
//! # The activity stack
//!
//! Every agent owns a stack of tickable activities.  The topmost activity
//! receives exactly one `tick` call per simulation tick; it may complete
//! (popping itself), continue, or push a child that runs to completion
//! before the parent resumes.  `Move` is the long-lived parent; `Turn`,
//! `WaitFor` and the two half-steps are its children.

pub mod activity;
pub mod agent;
pub mod half_step;
pub mod move_activity;
pub mod turn;
pub mod wait;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use activity::{Activity, ActivityStack, MoveContext, Step};
pub use agent::Agent;
pub use half_step::{MoveFirstHalf, MoveSecondHalf};
pub use move_activity::Move;
pub use turn::Turn;
pub use wait::WaitFor;
