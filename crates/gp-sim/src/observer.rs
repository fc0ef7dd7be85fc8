//! World observer trait for progress reporting and data collection.

use gp_core::Tick;
use gp_move::Agent;

/// Callbacks invoked by [`World::run_ticks`][crate::World::run_ticks] at
/// key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only
/// need to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl WorldObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, active: usize) {
///         if tick.0 % 25 == 0 {
///             println!("{tick}: {active} agents moving");
///         }
///     }
/// }
/// ```
pub trait WorldObserver {
    /// Called at the very start of each tick, before any agent runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `active` is the number of agents
    /// whose activity stacks were non-idle this tick.
    fn on_tick_end(&mut self, _tick: Tick, _active: usize) {}

    /// Called after every tick with read-only agent state, for output
    /// writers that record position snapshots.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[Agent]) {}

    /// Called once when `run_ticks` returns.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`WorldObserver`] that does nothing.  Use when you need to call
/// `run_ticks` but don't want callbacks.
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}
