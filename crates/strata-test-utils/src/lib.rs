//! Fixture worlds for Strata development.
//!
//! Provides a [`FixtureWorld`] that owns one of every upstream artifact,
//! segment builders for hand-placed and membership-derived boundaries, and
//! seeded jittered meshes for tests that need irregular geometry.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod segments;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_core::{CellId, CrustKind, PlateId};
use strata_history::{
    CrustTypes, MantleForcing, Plate, PlateGraph, PlateKind, PlateMotion, TectonicInputs,
};
use strata_mesh::MeshGraph;

pub use segments::{boundary_segments, collision, rift, subduction, transform};

/// One of every upstream artifact, owned, over a single mesh.
#[derive(Clone, Debug)]
pub struct FixtureWorld {
    pub mesh: MeshGraph,
    pub crust: CrustTypes,
    pub plates: PlateGraph,
    pub motion: PlateMotion,
    pub mantle: MantleForcing,
}

impl FixtureWorld {
    /// A hex world split into vertical plate bands.
    ///
    /// Plate `p` owns columns `[p * cols / plate_count, (p + 1) * cols / plate_count)`,
    /// its seed sits at the band's center, and plates alternate moving east
    /// and west. Crust is oceanic and the mantle quiet.
    pub fn banded(cols: u32, rows: u32, plate_count: u16) -> Self {
        let mesh = MeshGraph::periodic_hex(cols, rows).expect("fixture lattice dimensions are valid");
        let band = |col: u32| (col as u64 * plate_count as u64 / cols as u64) as u16;
        let owner = (0..mesh.cell_count())
            .map(|i| Some(PlateId(band(i as u32 % cols))))
            .collect();
        let plates = (0..plate_count)
            .map(|p| Plate {
                id: PlateId(p),
                seed_x: (p as f64 + 0.5) * cols as f64 / plate_count as f64,
                seed_y: rows as f64 * 0.4,
                kind: if p == 0 { PlateKind::Major } else { PlateKind::Minor },
            })
            .collect();
        let motion = (0..plate_count)
            .map(|p| if p % 2 == 0 { (1.0, 0.2) } else { (-1.0, -0.1) })
            .collect();
        let n = mesh.cell_count();
        Self {
            crust: CrustTypes::new(vec![CrustKind::Oceanic; n]),
            plates: PlateGraph::new(plates, owner).expect("fixture plate ids are unique"),
            motion: PlateMotion::new(motion),
            mantle: MantleForcing::quiet(n),
            mesh,
        }
    }

    /// Mark `cells` as continental.
    pub fn with_continental(mut self, cells: impl IntoIterator<Item = CellId>) -> Self {
        let mut kinds: Vec<CrustKind> = (0..self.mesh.cell_count())
            .map(|i| self.crust.get(CellId(i as u32)))
            .collect();
        for c in cells {
            kinds[c.index()] = CrustKind::Continental;
        }
        self.crust = CrustTypes::new(kinds);
        self
    }

    /// Make every cell continental.
    pub fn all_continental(self) -> Self {
        let cells: Vec<CellId> = (0..self.mesh.cell_count() as u32).map(CellId).collect();
        self.with_continental(cells)
    }

    /// Add an upwelling plume at `cell`.
    pub fn with_hotspot(mut self, cell: CellId, magnitude: f64, stress: f64, direction: (f64, f64)) -> Self {
        let i = cell.index();
        self.mantle.upwelling_class[i] = 1;
        self.mantle.forcing_mag[i] = magnitude;
        self.mantle.stress[i] = stress;
        self.mantle.forcing_u[i] = direction.0;
        self.mantle.forcing_v[i] = direction.1;
        self
    }

    /// Uniform mantle drift everywhere, without upwelling.
    pub fn with_mantle_drift(mut self, u: f64, v: f64) -> Self {
        self.mantle.forcing_u.fill(u);
        self.mantle.forcing_v.fill(v);
        self
    }

    /// Borrow the artifacts as run inputs.
    pub fn inputs(&self) -> TectonicInputs<'_> {
        TectonicInputs {
            mesh: &self.mesh,
            crust: &self.crust,
            plates: &self.plates,
            motion: &self.motion,
            mantle: &self.mantle,
        }
    }

    /// Cell at `(col, row)` of the underlying lattice.
    pub fn cell(&self, col: u32, row: u32) -> CellId {
        let cols = self.mesh.wrap_width() as u32;
        CellId(row * cols + col)
    }
}

/// A hex lattice with every site displaced by up to `amplitude` in each
/// axis, seeded for reproducibility. Adjacency is unchanged.
pub fn jittered_hex(cols: u32, rows: u32, amplitude: f64, seed: u64) -> MeshGraph {
    let base = MeshGraph::periodic_hex(cols, rows).expect("fixture lattice dimensions are valid");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n = base.cell_count();
    let mut site_x = Vec::with_capacity(n);
    let mut site_y = Vec::with_capacity(n);
    let mut offsets = Vec::with_capacity(n + 1);
    let mut neighbors = Vec::new();
    offsets.push(0);
    for i in 0..n {
        let cell = CellId(i as u32);
        let (x, y) = base.site(cell);
        site_x.push(x + rng.random_range(-amplitude..=amplitude));
        site_y.push(y + rng.random_range(-amplitude..=amplitude));
        neighbors.extend_from_slice(base.neighbor_indices(cell));
        offsets.push(neighbors.len() as u32);
    }
    MeshGraph::new(base.wrap_width(), site_x, site_y, offsets, neighbors)
        .expect("jittered lattice keeps valid adjacency")
}

/// Seeded random velocities in `[-1, 1]` per axis for `plate_count` plates.
pub fn random_motion(plate_count: usize, seed: u64) -> PlateMotion {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    PlateMotion::new(
        (0..plate_count)
            .map(|_| (rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0)))
            .collect(),
    )
}
