//! CSV trace output.
//!
//! Writes one `agent_positions.csv` with a row per agent per recorded
//! tick.  Inspecting the trace in a spreadsheet (or diffing two traces
//! from the same seed world) is the quickest way to debug a coordination
//! problem without a renderer.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use gp_core::Tick;
use gp_move::Agent;

use crate::{SimResult, WorldObserver};

/// A [`WorldObserver`] that records agent position snapshots to CSV.
pub struct TraceWriter {
    writer: Writer<File>,
    /// Record every Nth tick; 1 records all.
    interval: u64,
}

impl TraceWriter {
    /// Open (or create) `agent_positions.csv` in `dir` and write the
    /// header row.
    pub fn new(dir: &Path, interval: u64) -> SimResult<TraceWriter> {
        let mut writer = Writer::from_path(dir.join("agent_positions.csv"))?;
        writer.write_record(["tick", "agent", "x", "y", "layer", "facing", "mid_step"])?;
        Ok(TraceWriter { writer, interval: interval.max(1) })
    }

    fn record(&mut self, tick: Tick, agents: &[Agent]) -> SimResult<()> {
        for agent in agents {
            let cell = agent.location();
            self.writer.write_record([
                tick.0.to_string(),
                agent.id.0.to_string(),
                cell.x.to_string(),
                cell.y.to_string(),
                cell.layer.to_string(),
                agent.facing.units().to_string(),
                (agent.is_mid_step() as u8).to_string(),
            ])?;
        }
        Ok(())
    }
}

impl WorldObserver for TraceWriter {
    fn on_snapshot(&mut self, tick: Tick, agents: &[Agent]) {
        if tick.0 % self.interval != 0 {
            return;
        }
        // Trace output is best-effort diagnostics; a full disk must not
        // take the simulation down with it.
        let _ = self.record(tick, agents);
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let _ = self.writer.flush();
    }
}
