//! Per-era plate membership ("drifting Voronoi").
//!
//! For every era except the newest, each plate seed is pushed along its
//! velocity by an era-dependent distance and snapped to the nearest mesh
//! cell. A multi-source shortest-path expansion from those seeds then
//! assigns every reachable cell to the plate with the cheapest path, lower
//! plate id first on exact ties. The newest era is the anchor: it copies
//! today's assignment verbatim.

use crate::inputs::{PlateGraph, PlateMotion};
use strata_core::{CellId, PlateId};
use strata_mesh::{Cost, Frontier, MeshGraph};
use tracing::{debug, warn};

/// Plate assignment of every mesh cell for one era.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlateMembership {
    owner: Vec<Option<PlateId>>,
}

impl PlateMembership {
    /// Wrap a per-cell assignment.
    pub fn new(owner: Vec<Option<PlateId>>) -> Self {
        Self { owner }
    }

    /// Plate owning `cell`, if any.
    #[inline]
    pub fn get(&self, cell: CellId) -> Option<PlateId> {
        self.owner.get(cell.index()).copied().flatten()
    }

    /// The per-cell assignment.
    pub fn as_slice(&self) -> &[Option<PlateId>] {
        &self.owner
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.owner.len()
    }

    /// Returns `true` if no cells are covered.
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }

    /// Number of cells with no plate.
    pub fn unassigned(&self) -> usize {
        self.owner.iter().filter(|p| p.is_none()).count()
    }
}

/// Frontier key: path cost, then plate id, then cell, then push order.
type MembershipKey = (Cost, PlateId, CellId, u64);

/// Resolves plate membership for each era of one run.
///
/// Holds the scratch buffers so that repeated eras reuse one allocation.
pub struct MembershipResolver<'a> {
    mesh: &'a MeshGraph,
    plates: &'a PlateGraph,
    motion: &'a PlateMotion,
    mean_speed: f64,
    dist: Vec<f64>,
    owner: Vec<Option<PlateId>>,
    frontier: Frontier<MembershipKey>,
    seq: u64,
}

impl<'a> MembershipResolver<'a> {
    /// Create a resolver over validated inputs.
    pub fn new(mesh: &'a MeshGraph, plates: &'a PlateGraph, motion: &'a PlateMotion) -> Self {
        let n = mesh.cell_count();
        Self {
            mesh,
            plates,
            motion,
            mean_speed: motion.mean_speed(plates.plate_count()),
            dist: vec![f64::INFINITY; n],
            owner: vec![None; n],
            frontier: Frontier::with_capacity(n),
            seq: 0,
        }
    }

    /// Seed cell of each plate after advecting by `drift_steps` mean edges.
    ///
    /// Entries are `None` when the advected position is not finite.
    pub fn advected_seeds(&self, drift_steps: u32) -> Vec<(PlateId, Option<CellId>)> {
        let scale = drift_steps as f64 * self.mesh.mean_edge_length() / self.mean_speed;
        self.plates
            .plates()
            .enumerate()
            .map(|(slot, plate)| {
                let (vx, vy) = self.motion.velocity(slot);
                let cell = self
                    .mesh
                    .nearest_cell(plate.seed_x + vx * scale, plate.seed_y + vy * scale);
                (plate.id, cell)
            })
            .collect()
    }

    /// Assign every reachable cell to a plate for a non-anchor era.
    pub fn resolve(&mut self, drift_steps: u32) -> PlateMembership {
        self.dist.fill(f64::INFINITY);
        self.owner.fill(None);
        self.frontier.clear();

        for (plate, seed) in self.advected_seeds(drift_steps) {
            let Some(seed) = seed else {
                warn!(plate = plate.0, "plate seed has no finite position; plate absent this era");
                continue;
            };
            let i = seed.index();
            if self.dist[i] == 0.0 && self.owner[i].is_some_and(|o| o <= plate) {
                continue;
            }
            self.dist[i] = 0.0;
            self.owner[i] = Some(plate);
            self.push(0.0, plate, seed);
        }

        let mesh = self.mesh;
        while let Some((Cost(cost), plate, cell, _)) = self.frontier.pop() {
            let i = cell.index();
            if self.owner[i] != Some(plate) || self.dist[i] != cost {
                continue;
            }
            for n in mesh.neighbors(cell) {
                let Some(step) = mesh.normalized_edge_cost(cell, n) else {
                    continue;
                };
                let next = cost + step;
                let j = n.index();
                let current = self.dist[j];
                let wins = next < current
                    || (next == current && self.owner[j].is_none_or(|o| plate < o));
                if wins {
                    self.dist[j] = next;
                    self.owner[j] = Some(plate);
                    self.push(next, plate, n);
                }
            }
        }

        let membership = PlateMembership::new(self.owner.clone());
        debug!(
            drift_steps,
            unassigned = membership.unassigned(),
            "resolved era membership"
        );
        membership
    }

    fn push(&mut self, cost: f64, plate: PlateId, cell: CellId) {
        self.seq += 1;
        self.frontier.push((Cost(cost), plate, cell, self.seq));
    }
}

/// Plate membership for every era, oldest first.
///
/// The newest era is `current` verbatim; every other era is resolved by
/// [`MembershipResolver::resolve`] with that era's drift step count.
pub fn plate_membership_by_era(
    mesh: &MeshGraph,
    plates: &PlateGraph,
    motion: &PlateMotion,
    drift_steps_by_era: &[u32],
) -> Vec<PlateMembership> {
    let newest = drift_steps_by_era.len().saturating_sub(1);
    let mut resolver = MembershipResolver::new(mesh, plates, motion);
    drift_steps_by_era
        .iter()
        .enumerate()
        .map(|(era, &steps)| {
            if era == newest {
                PlateMembership::new(plates.cell_to_plate().to_vec())
            } else {
                resolver.resolve(steps)
            }
        })
        .collect()
}
