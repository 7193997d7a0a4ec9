//! Segment builders.
//!
//! Hand-placed single segments for scenario tests, and
//! [`boundary_segments`] which derives one segment per plate-boundary edge
//! from an era's membership so that it can serve as a per-era segment
//! source.

use strata_core::{BoundaryType, CellId, DriftVector, PlateId};
use strata_history::{PlateMembership, Segment, TectonicSegments};
use strata_mesh::MeshGraph;

/// A convergent segment with the given compression; plates 0 and 1.
pub fn subduction(a: CellId, b: CellId, compression: u8, polarity: i8) -> Segment {
    Segment {
        plate_a: Some(PlateId(0)),
        plate_b: Some(PlateId(1)),
        polarity,
        compression,
        volcanism: compression / 2,
        fracture: compression / 4,
        ..Segment::between(Some(BoundaryType::Convergent), a, b)
    }
}

/// A convergent segment meant to sit between continental cells.
pub fn collision(a: CellId, b: CellId, compression: u8) -> Segment {
    Segment {
        volcanism: 0,
        ..subduction(a, b, compression, 0)
    }
}

/// A divergent segment with the given extension.
pub fn rift(a: CellId, b: CellId, extension: u8) -> Segment {
    Segment {
        plate_a: Some(PlateId(0)),
        plate_b: Some(PlateId(1)),
        extension,
        volcanism: extension / 3,
        fracture: extension / 4,
        ..Segment::between(Some(BoundaryType::Divergent), a, b)
    }
}

/// A transform segment with the given shear, drifting east.
pub fn transform(a: CellId, b: CellId, shear: u8) -> Segment {
    Segment {
        plate_a: Some(PlateId(0)),
        plate_b: Some(PlateId(1)),
        shear,
        fracture: shear / 3,
        drift: DriftVector { u: 127, v: 0 },
        ..Segment::between(Some(BoundaryType::Transform), a, b)
    }
}

/// One segment per mesh edge whose two cells belong to different plates.
///
/// Each edge is visited once (from its lower cell). The regime cycles
/// convergent, divergent, transform by the lower plate id, and signals
/// scale with `strength`.
pub fn boundary_segments(mesh: &MeshGraph, membership: &PlateMembership, strength: u8) -> TectonicSegments {
    let mut segments = Vec::new();
    for i in 0..mesh.cell_count() {
        let a = CellId(i as u32);
        let Some(pa) = membership.get(a) else {
            continue;
        };
        for b in mesh.neighbors(a) {
            if b.index() <= i {
                continue;
            }
            let Some(pb) = membership.get(b) else {
                continue;
            };
            if pa == pb {
                continue;
            }
            let lo = pa.min(pb);
            let (dx, dy) = mesh.delta(a, b);
            let mut seg = match lo.0 % 3 {
                0 => subduction(a, b, strength, if pa < pb { 1 } else { -1 }),
                1 => rift(a, b, strength),
                _ => transform(a, b, strength),
            };
            seg.plate_a = Some(pa);
            seg.plate_b = Some(pb);
            seg.drift = DriftVector::from_vector(dx, dy);
            segments.push(seg);
        }
    }
    TectonicSegments::new(segments)
}
