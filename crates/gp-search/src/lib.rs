//! `gp-search` — the search stack of the gridpath engine.
//!
//! # Layering
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`heap`]     | `MinHeap` — comparator-driven binary min-heap            |
//! | [`cell_info`]| per-cell search records, pooled dense layers, sparse space–time store |
//! | [`graph`]    | `GridContext`, `EdgeRules` — successor generation and edge costs |
//! | [`search`]   | `PathSearch` — A\* over cells, resumable in reverse (RRA\*) |
//! | [`whca`]     | `SpaceTimeSearch` — windowed cooperative A\* over (cell, step) |
//! | [`path`]     | path reconstruction from recorded predecessor links      |
//! | [`pathfinder`]| `Pathfinder` facade with a per-agent path cache         |
//! | [`error`]    | `SearchError`, `SearchResult`                            |
//!
//! # How the pieces cooperate
//!
//! A move is planned window-by-window.  The agent owns one long-lived
//! [`PathSearch`] rooted at its destination (the RRA\* heuristic); each
//! window, a fresh [`SpaceTimeSearch`] expands forward through space–time,
//! asking the RRA\* for a lower bound on every cell it touches and the
//! reservation table for the cells other agents have claimed.  Searches own
//! their cell-info storage and borrow the world (`GridContext`) only for
//! the duration of a call, so the RRA\* can live across many ticks.

pub mod cell_info;
pub mod error;
pub mod graph;
pub mod heap;
pub mod path;
pub mod pathfinder;
pub mod search;
pub mod whca;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell_info::{CellInfo, CellInfoLayer, CellInfoPool, CellStatus, SpaceTimeNode, SpaceTimeStore};
pub use error::{SearchError, SearchResult};
pub use graph::{EdgeRules, GraphConnection, GridContext};
pub use heap::MinHeap;
pub use path::{reconstruct_path, reconstruct_windowed};
pub use pathfinder::{MoverProfile, Pathfinder, SearchContext};
pub use search::PathSearch;
pub use whca::SpaceTimeSearch;
