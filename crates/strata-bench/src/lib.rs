//! Benchmark profiles for the Strata tectonic history pipeline.
//!
//! Provides pre-built worlds for benchmarking:
//!
//! - [`reference_profile`]: 96x80 hex lattice (7,680 cells), 8 plates
//! - [`stress_profile`]: 320x256 hex lattice (~82K cells), 24 plates
//! - [`hotspot_cells`]: deterministic hotspot placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_core::{CellId, EraIndex};
use strata_history::{PlateMembership, TectonicSegments};
use strata_test_utils::{boundary_segments, random_motion, FixtureWorld};

/// Segment strength used by every profile.
pub const PROFILE_SEGMENT_STRENGTH: u8 = 180;

/// Build a reference profile: 96x80 hex lattice with 8 plate bands,
/// seeded motion, a continental band, and four hotspots.
pub fn reference_profile(seed: u64) -> FixtureWorld {
    profile(96, 80, 8, 4, seed)
}

/// Build a stress profile: 320x256 hex lattice with 24 plate bands and
/// sixteen hotspots.
pub fn stress_profile(seed: u64) -> FixtureWorld {
    profile(320, 256, 24, 16, seed)
}

fn profile(cols: u32, rows: u32, plates: u16, hotspots: u16, seed: u64) -> FixtureWorld {
    let mut world = FixtureWorld::banded(cols, rows, plates);
    world.motion = random_motion(plates as usize, seed);
    let band = (rows / 3..rows / 2).flat_map(|row| (0..cols).map(move |col| CellId(row * cols + col)));
    let mut world = world.with_continental(band);
    for cell in hotspot_cells(world.mesh.cell_count(), hotspots, seed) {
        world = world.with_hotspot(cell, 0.9, 0.5, (0.4, -0.1));
    }
    world
}

/// Segments for one era of a profile world: one per plate-boundary edge.
pub fn profile_segments(world: &FixtureWorld, _era: EraIndex, membership: &PlateMembership) -> TectonicSegments {
    boundary_segments(&world.mesh, membership, PROFILE_SEGMENT_STRENGTH)
}

/// Deterministic distinct hotspot cells.
///
/// Spreads `n` cells over the mesh using a multiplicative hash of the seed
/// and steps linearly past collisions.
pub fn hotspot_cells(cell_count: usize, n: u16, seed: u64) -> Vec<CellId> {
    let mut cells: Vec<CellId> = Vec::with_capacity(n as usize);
    for i in 0..(n as usize).min(cell_count) {
        let mut pos = (seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add((i as u64).wrapping_mul(1442695040888963407))
            % cell_count as u64) as u32;
        while cells.contains(&CellId(pos)) {
            pos = (pos + 1) % cell_count as u32;
        }
        cells.push(CellId(pos));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_history::TectonicHistoryBuilder;

    #[test]
    fn reference_profile_validates() {
        let world = reference_profile(42);
        assert_eq!(world.mesh.cell_count(), 96 * 80);
        world.inputs().validate().unwrap();
    }

    #[test]
    fn reference_profile_runs() {
        let world = reference_profile(42);
        let source = |era: EraIndex, m: &PlateMembership| profile_segments(&world, era, m);
        let out = TectonicHistoryBuilder::new(world.inputs()).build(&source).unwrap();
        assert!(out.metrics.total_events() > 0);
    }

    #[test]
    fn hotspot_cells_are_distinct() {
        let cells = hotspot_cells(50, 10, 42);
        assert_eq!(cells.len(), 10);
        let mut sorted = cells.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 10);
        assert!(cells.iter().all(|c| c.index() < 50));
    }

    #[test]
    fn hotspot_cells_deterministic() {
        assert_eq!(hotspot_cells(1000, 5, 42), hotspot_cells(1000, 5, 42));
    }
}
