//! Typed input contracts from upstream generation stages.
//!
//! Every artifact here is produced elsewhere (crust initialisation, plate
//! graph construction, motion fitting, mantle forcing, segment derivation)
//! and consumed read-only. Each type validates its own shape against the
//! mesh; numeric content is clamped where it is read, never rejected.

use indexmap::IndexMap;
use strata_core::{
    clamp01, BoundaryType, CellId, CrustKind, DriftVector, InputError, PlateId,
};
use strata_mesh::MeshGraph;

fn check_len(
    artifact: &'static str,
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), InputError> {
    if expected != actual {
        return Err(InputError::LengthMismatch {
            artifact,
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

// ── Crust ──────────────────────────────────────────────────────────

/// Crust type of every mesh cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrustTypes {
    kind: Vec<CrustKind>,
}

impl CrustTypes {
    /// Wrap a per-cell crust array.
    pub fn new(kind: Vec<CrustKind>) -> Self {
        Self { kind }
    }

    /// Decode the upstream `u8` encoding (`0` oceanic, otherwise continental).
    pub fn from_raw(raw: &[u8]) -> Self {
        Self::new(raw.iter().map(|&r| CrustKind::from_raw(r)).collect())
    }

    /// Crust at `cell`; cells outside the array read as oceanic.
    pub fn get(&self, cell: CellId) -> CrustKind {
        self.kind.get(cell.index()).copied().unwrap_or_default()
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.kind.len()
    }

    /// Returns `true` if no cells are covered.
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    /// Check that there is one entry per mesh cell.
    pub fn validate(&self, mesh: &MeshGraph) -> Result<(), InputError> {
        check_len("crust", "type", mesh.cell_count(), self.kind.len())
    }
}

// ── Plates ─────────────────────────────────────────────────────────

/// Role of a plate in the plate graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlateKind {
    /// One of the large primary plates.
    #[default]
    Major,
    /// A microplate.
    Minor,
}

/// Plate metadata from the plate graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Plate {
    /// Plate id.
    pub id: PlateId,
    /// Seed site X in mesh coordinates.
    pub seed_x: f64,
    /// Seed site Y in mesh coordinates.
    pub seed_y: f64,
    /// Major or minor.
    pub kind: PlateKind,
}

/// Plates and today's per-cell plate assignment.
///
/// Plates keep their input order; a plate's position in that order is its
/// *slot*, which indexes [`PlateMotion`].
#[derive(Clone, Debug)]
pub struct PlateGraph {
    plates: IndexMap<PlateId, Plate>,
    cell_to_plate: Vec<Option<PlateId>>,
}

impl PlateGraph {
    /// Build a plate graph, rejecting duplicate ids, empty plate lists, and
    /// ids above [`PlateId::MAX`] in either the plates or the assignment.
    pub fn new(plates: Vec<Plate>, cell_to_plate: Vec<Option<PlateId>>) -> Result<Self, InputError> {
        if plates.is_empty() {
            return Err(InputError::NoPlates);
        }
        let encodable = |id: PlateId| {
            if id > PlateId::MAX {
                Err(InputError::PlateIdOutOfRange { id: id.0 })
            } else {
                Ok(())
            }
        };
        cell_to_plate.iter().flatten().try_for_each(|&id| encodable(id))?;
        let mut by_id = IndexMap::with_capacity(plates.len());
        for plate in plates {
            let id = plate.id;
            encodable(id)?;
            if by_id.insert(id, plate).is_some() {
                return Err(InputError::DuplicatePlate { id: id.0 });
            }
        }
        Ok(Self {
            plates: by_id,
            cell_to_plate,
        })
    }

    /// Plates in slot order.
    pub fn plates(&self) -> impl ExactSizeIterator<Item = &Plate> + '_ {
        self.plates.values()
    }

    /// Number of plates.
    pub fn plate_count(&self) -> usize {
        self.plates.len()
    }

    /// Today's plate assignment per cell.
    pub fn cell_to_plate(&self) -> &[Option<PlateId>] {
        &self.cell_to_plate
    }

    /// Check that the assignment covers every mesh cell.
    pub fn validate(&self, mesh: &MeshGraph) -> Result<(), InputError> {
        check_len(
            "plate_graph",
            "cell_to_plate",
            mesh.cell_count(),
            self.cell_to_plate.len(),
        )
    }
}

/// Per-plate velocity, indexed by plate slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlateMotion {
    velocity: Vec<(f64, f64)>,
}

impl PlateMotion {
    /// Wrap per-slot `(vx, vy)` velocities.
    pub fn new(velocity: Vec<(f64, f64)>) -> Self {
        Self { velocity }
    }

    /// Velocity of the plate in `slot`; missing entries are at rest.
    pub fn velocity(&self, slot: usize) -> (f64, f64) {
        self.velocity.get(slot).copied().unwrap_or((0.0, 0.0))
    }

    /// Mean plate speed over `plate_count` slots.
    ///
    /// Falls back to `1.0` when there are no plates or the mean is
    /// degenerate (non-finite or at most `1e-9`).
    pub fn mean_speed(&self, plate_count: usize) -> f64 {
        if plate_count == 0 {
            return 1.0;
        }
        let sum: f64 = (0..plate_count)
            .map(|slot| {
                let (vx, vy) = self.velocity(slot);
                (vx * vx + vy * vy).sqrt()
            })
            .sum();
        let mean = sum / plate_count as f64;
        if !mean.is_finite() || mean <= 1e-9 {
            1.0
        } else {
            mean
        }
    }

    /// Check that there is one velocity per plate.
    pub fn validate(&self, plates: &PlateGraph) -> Result<(), InputError> {
        check_len(
            "plate_motion",
            "velocity",
            plates.plate_count(),
            self.velocity.len(),
        )
    }
}

// ── Mantle forcing ─────────────────────────────────────────────────

/// Mantle forcing sampled per cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MantleForcing {
    /// Upwelling class; positive values mark upwelling sources.
    pub upwelling_class: Vec<i8>,
    /// Forcing vector X component.
    pub forcing_u: Vec<f64>,
    /// Forcing vector Y component.
    pub forcing_v: Vec<f64>,
    /// Forcing magnitude, read clamped to `[0, 1]`.
    pub forcing_mag: Vec<f64>,
    /// Stress, read clamped to `[0, 1]`.
    pub stress: Vec<f64>,
}

impl MantleForcing {
    /// Forcing with no upwelling and no drift anywhere.
    pub fn quiet(cell_count: usize) -> Self {
        Self {
            upwelling_class: vec![0; cell_count],
            forcing_u: vec![0.0; cell_count],
            forcing_v: vec![0.0; cell_count],
            forcing_mag: vec![0.0; cell_count],
            stress: vec![0.0; cell_count],
        }
    }

    /// Normalized forcing direction at `cell`.
    ///
    /// The accessors read cells past the end of an array as quiet.
    pub fn drift(&self, cell: CellId) -> DriftVector {
        DriftVector::from_vector(at(&self.forcing_u, cell), at(&self.forcing_v, cell))
    }

    /// Forcing magnitude at `cell`, clamped to `[0, 1]`.
    pub fn magnitude(&self, cell: CellId) -> f64 {
        clamp01(at(&self.forcing_mag, cell))
    }

    /// Stress at `cell`, clamped to `[0, 1]`.
    pub fn stress(&self, cell: CellId) -> f64 {
        clamp01(at(&self.stress, cell))
    }

    /// Returns `true` if `cell` is an upwelling source.
    pub fn is_upwelling(&self, cell: CellId) -> bool {
        self.upwelling_class.get(cell.index()).is_some_and(|&c| c > 0)
    }

    /// Check that every array covers the mesh.
    pub fn validate(&self, mesh: &MeshGraph) -> Result<(), InputError> {
        let n = mesh.cell_count();
        check_len("mantle_forcing", "upwelling_class", n, self.upwelling_class.len())?;
        check_len("mantle_forcing", "forcing_u", n, self.forcing_u.len())?;
        check_len("mantle_forcing", "forcing_v", n, self.forcing_v.len())?;
        check_len("mantle_forcing", "forcing_mag", n, self.forcing_mag.len())?;
        check_len("mantle_forcing", "stress", n, self.stress.len())
    }
}

fn at(values: &[f64], cell: CellId) -> f64 {
    values.get(cell.index()).copied().unwrap_or(0.0)
}

// ── Segments ───────────────────────────────────────────────────────

/// One boundary segment between two adjoining cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Boundary regime; `None` segments produce no event.
    pub regime: Option<BoundaryType>,
    /// Cell on the A side.
    pub a_cell: CellId,
    /// Cell on the B side.
    pub b_cell: CellId,
    /// Plate on the A side.
    pub plate_a: Option<PlateId>,
    /// Plate on the B side.
    pub plate_b: Option<PlateId>,
    /// Subduction polarity: `-1` B over A, `+1` A over B, `0` unknown.
    pub polarity: i8,
    /// Convergent compression.
    pub compression: u8,
    /// Divergent extension.
    pub extension: u8,
    /// Transform shear.
    pub shear: u8,
    /// Volcanism.
    pub volcanism: u8,
    /// Fracturing.
    pub fracture: u8,
    /// Relative motion direction.
    pub drift: DriftVector,
}

impl Segment {
    /// A segment with the given regime and cells and all signals zero.
    pub fn between(regime: Option<BoundaryType>, a_cell: CellId, b_cell: CellId) -> Self {
        Self {
            regime,
            a_cell,
            b_cell,
            plate_a: None,
            plate_b: None,
            polarity: 0,
            compression: 0,
            extension: 0,
            shear: 0,
            volcanism: 0,
            fracture: 0,
            drift: DriftVector::ZERO,
        }
    }
}

/// All boundary segments for one era.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TectonicSegments {
    /// Segments in upstream order; event indices follow this order.
    pub segments: Vec<Segment>,
}

impl TectonicSegments {
    /// Wrap a segment list.
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if there are no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check that every segment references cells inside the mesh.
    pub fn validate(&self, mesh: &MeshGraph) -> Result<(), InputError> {
        let cell_count = mesh.cell_count();
        for seg in &self.segments {
            for cell in [seg.a_cell, seg.b_cell] {
                if cell.index() >= cell_count {
                    return Err(InputError::CellOutOfRange {
                        artifact: "tectonic_segments",
                        cell: cell.0,
                        cell_count,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate(id: u16) -> Plate {
        Plate {
            id: PlateId(id),
            seed_x: 0.0,
            seed_y: 0.0,
            kind: PlateKind::Major,
        }
    }

    #[test]
    fn plate_graph_keeps_slot_order() {
        let g = PlateGraph::new(vec![plate(7), plate(2), plate(5)], vec![]).unwrap();
        let ids: Vec<_> = g.plates().map(|p| p.id.0).collect();
        assert_eq!(ids, [7, 2, 5]);
    }

    #[test]
    fn plate_graph_rejects_duplicates_and_empty() {
        assert_eq!(
            PlateGraph::new(vec![plate(1), plate(1)], vec![]).unwrap_err(),
            InputError::DuplicatePlate { id: 1 }
        );
        assert_eq!(PlateGraph::new(vec![], vec![]).unwrap_err(), InputError::NoPlates);
    }

    #[test]
    fn plate_graph_rejects_unencodable_ids() {
        assert_eq!(
            PlateGraph::new(vec![plate(40000), plate(50000)], vec![]).unwrap_err(),
            InputError::PlateIdOutOfRange { id: 40000 }
        );
        assert_eq!(
            PlateGraph::new(vec![plate(1)], vec![Some(PlateId(1)), Some(PlateId(32768))]).unwrap_err(),
            InputError::PlateIdOutOfRange { id: 32768 }
        );
        let g = PlateGraph::new(vec![plate(PlateId::MAX.0)], vec![Some(PlateId::MAX)]).unwrap();
        assert_eq!(PlateId::encode(g.cell_to_plate()[0]), i16::MAX);
    }

    #[test]
    fn mean_speed_falls_back_when_degenerate() {
        let m = PlateMotion::new(vec![(0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(m.mean_speed(2), 1.0);
        assert_eq!(m.mean_speed(0), 1.0);
        let m = PlateMotion::new(vec![(3.0, 4.0), (0.0, 1.0)]);
        assert!((m.mean_speed(2) - 3.0).abs() < 1e-12);
        let m = PlateMotion::new(vec![(f64::NAN, 0.0)]);
        assert_eq!(m.mean_speed(1), 1.0);
    }

    #[test]
    fn mantle_reads_are_clamped() {
        let mut f = MantleForcing::quiet(2);
        f.forcing_mag[0] = 3.0;
        f.stress[1] = f64::NAN;
        f.forcing_u[1] = -2.0;
        assert_eq!(f.magnitude(CellId(0)), 1.0);
        assert_eq!(f.stress(CellId(1)), 0.0);
        assert_eq!(f.drift(CellId(1)), DriftVector { u: -127, v: 0 });
        assert_eq!(f.drift(CellId(0)), DriftVector::ZERO);
    }

    #[test]
    fn short_mantle_arrays_read_quiet() {
        let f = MantleForcing {
            upwelling_class: vec![1, 1, 1],
            forcing_u: vec![1.0],
            forcing_v: vec![],
            forcing_mag: vec![0.8, 0.8],
            stress: vec![],
        };
        assert!(f.is_upwelling(CellId(2)));
        assert!(!f.is_upwelling(CellId(3)));
        assert_eq!(f.magnitude(CellId(2)), 0.0);
        assert_eq!(f.stress(CellId(0)), 0.0);
        assert_eq!(f.drift(CellId(0)), DriftVector { u: 127, v: 0 });
        assert_eq!(f.drift(CellId(5)), DriftVector::ZERO);
    }

    #[test]
    fn crust_out_of_range_reads_oceanic() {
        let c = CrustTypes::from_raw(&[0, 3]);
        assert!(c.get(CellId(1)).is_continental());
        assert_eq!(c.get(CellId(9)), CrustKind::Oceanic);
    }
}
