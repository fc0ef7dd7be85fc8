//! Path reconstruction from recorded predecessor links.
//!
//! Both builders return paths **destination-first**; the move activity
//! consumes cells from the tail, so the next step is always a pop.

use gp_core::CPos;

use crate::cell_info::{CellStatus, SpaceTimeNode, SpaceTimeStore};
use crate::search::PathSearch;

/// Follow `previous` links from `terminal` back toward the search root.
///
/// The root itself (the cell whose `previous` is itself) is not included:
/// for a forward search it is the cell the agent already stands on.  A
/// broken chain — a link to an unvisited record — ends the walk early and
/// yields the partial chain collected so far.
pub fn reconstruct_path(search: &PathSearch, terminal: CPos) -> Vec<CPos> {
    let mut path = Vec::new();
    let mut current = terminal;
    loop {
        let info = search.info(current);
        if info.status == CellStatus::Unvisited {
            break;
        }
        if info.previous == current {
            break;
        }
        path.push(current);
        current = info.previous;
    }
    path
}

/// Walk a space–time chain from `(terminal, window)` down to step 0.
///
/// Returns exactly `window` cells, terminal first; the cell at step 0 (the
/// agent's own) is not included.
pub fn reconstruct_windowed(store: &SpaceTimeStore, terminal: CPos, window: u16) -> Vec<CPos> {
    let mut path = Vec::with_capacity(window as usize);
    let mut cell = terminal;
    let mut step = window;
    while step > 0 {
        path.push(cell);
        cell = store.get(SpaceTimeNode { cell, step }).previous;
        step -= 1;
    }
    path
}
