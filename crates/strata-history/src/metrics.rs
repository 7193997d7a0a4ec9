//! Per-run timing and workload counters.
//!
//! [`RunMetrics`] is filled in by [`TectonicHistoryBuilder::build`](crate::TectonicHistoryBuilder::build)
//! and returned alongside the artifacts for profiling and telemetry.

use crate::emission::EmissionStats;

/// Workload of one era.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EraMetrics {
    /// Boundary and hotspot events built.
    pub events: usize,
    /// Events skipped because every scaled channel was zero.
    pub skipped_events: usize,
    /// Cells reached by event wavefronts, summed over events.
    pub visits: u64,
    /// Cells with no plate in this era's membership.
    pub unassigned_cells: usize,
    /// Time spent building and emitting this era's events, in microseconds.
    pub emission_us: u64,
}

impl EraMetrics {
    /// Fold in the counters of an emission pass.
    pub fn record_emission(&mut self, stats: &EmissionStats) {
        self.events = stats.events;
        self.skipped_events = stats.skipped;
        self.visits = stats.visits;
    }
}

/// Timing and workload of one generation run.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Wall-clock time for the whole run.
    pub total_us: u64,
    /// Time spent validating configuration and inputs.
    pub validate_us: u64,
    /// Time spent resolving per-era plate membership.
    pub membership_us: u64,
    /// Time spent aggregating eras into rollups.
    pub rollup_us: u64,
    /// Time spent advecting tracers.
    pub tracer_us: u64,
    /// Time spent computing provenance.
    pub provenance_us: u64,
    /// Per-era workload, oldest first.
    pub eras: Vec<EraMetrics>,
}

impl RunMetrics {
    /// Events built over all eras.
    pub fn total_events(&self) -> usize {
        self.eras.iter().map(|e| e.events).sum()
    }

    /// Wavefront visits over all eras.
    pub fn total_visits(&self) -> u64 {
        self.eras.iter().map(|e| e.visits).sum()
    }

    /// Time spent in emission over all eras.
    pub fn emission_us(&self) -> u64 {
        self.eras.iter().map(|e| e.emission_us).sum()
    }
}
