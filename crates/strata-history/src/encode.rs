//! Fixed-width artifact encoding.
//!
//! Downstream stages and caches consume flat typed arrays. Optional values
//! become sentinels only here:
//!
//! | Value | Width | None |
//! |-------|-------|------|
//! | plate id | `i16` | `-1` |
//! | era index | `u8` | `255` |
//! | cell boundary type | `u8` | `0` |
//! | last boundary type | `u8` | `255` |
//! | volcanism event type | `u8` | `0` |
//! | tracer cell | `u32` | n/a |

use crate::fields::EraFields;
use crate::provenance::TectonicProvenance;
use crate::rollups::TectonicHistory;
use strata_core::{BoundaryType, CellId, EraIndex, EventType, PlateId};

/// Sentinel for "no boundary" in last-boundary type arrays.
pub const LAST_BOUNDARY_NONE: u8 = 255;

/// Cell boundary type as its code, `0` for none.
pub fn encode_boundary_type(boundary: Option<BoundaryType>) -> u8 {
    boundary.map_or(0, BoundaryType::code)
}

/// Event type as its priority, `0` for none.
pub fn encode_event_type(event: Option<EventType>) -> u8 {
    event.map_or(0, EventType::priority)
}

fn plates(ids: &[Option<PlateId>]) -> Vec<i16> {
    ids.iter().map(|&p| PlateId::encode(p)).collect()
}

fn eras(ids: &[Option<EraIndex>]) -> Vec<u8> {
    ids.iter().map(|&e| EraIndex::encode(e)).collect()
}

/// Encoded non-byte fields of one era.
///
/// The byte channels of [`EraFields`] are already fixed-width and are not
/// duplicated here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedEra {
    /// Boundary type codes.
    pub boundary_type: Vec<u8>,
    /// Boundary drift X components.
    pub boundary_drift_u: Vec<i8>,
    /// Boundary drift Y components.
    pub boundary_drift_v: Vec<i8>,
    /// Rift origin plate ids.
    pub rift_origin_plate: Vec<i16>,
    /// Volcanism origin plate ids.
    pub volcanism_origin_plate: Vec<i16>,
    /// Volcanism event type codes.
    pub volcanism_event_type: Vec<u8>,
}

impl From<&EraFields> for EncodedEra {
    fn from(f: &EraFields) -> Self {
        Self {
            boundary_type: f.boundary_type.iter().map(|&b| encode_boundary_type(b)).collect(),
            boundary_drift_u: f.boundary_drift.iter().map(|d| d.u).collect(),
            boundary_drift_v: f.boundary_drift.iter().map(|d| d.v).collect(),
            rift_origin_plate: plates(&f.rift_origin_plate),
            volcanism_origin_plate: plates(&f.volcanism_origin_plate),
            volcanism_event_type: f
                .volcanism_event_type
                .iter()
                .map(|&t| encode_event_type(t))
                .collect(),
        }
    }
}

/// Encoded optional arrays of a [`TectonicHistory`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedHistory {
    /// Per-era encoded fields, oldest first.
    pub eras: Vec<EncodedEra>,
    /// Per-era plate ids, oldest first.
    pub plate_id_by_era: Vec<Vec<i16>>,
    /// Last active era per cell.
    pub last_active_era: Vec<u8>,
    /// Last collision era per cell.
    pub last_collision_era: Vec<u8>,
    /// Last subduction era per cell.
    pub last_subduction_era: Vec<u8>,
}

impl From<&TectonicHistory> for EncodedHistory {
    fn from(h: &TectonicHistory) -> Self {
        Self {
            eras: h.eras.iter().map(EncodedEra::from).collect(),
            plate_id_by_era: h.plate_id_by_era.iter().map(|m| plates(m.as_slice())).collect(),
            last_active_era: eras(&h.last_active_era),
            last_collision_era: eras(&h.last_collision_era),
            last_subduction_era: eras(&h.last_subduction_era),
        }
    }
}

/// Flat form of a [`TectonicProvenance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedProvenance {
    /// Layout version.
    pub version: u32,
    /// Number of eras.
    pub era_count: u32,
    /// Number of cells.
    pub cell_count: u32,
    /// Per-era source cells, oldest first.
    pub tracer_index: Vec<Vec<u32>>,
    /// Origin era per cell.
    pub origin_era: Vec<u8>,
    /// Origin plate id per cell.
    pub origin_plate_id: Vec<i16>,
    /// Last boundary era per cell.
    pub last_boundary_era: Vec<u8>,
    /// Last boundary type per cell.
    pub last_boundary_type: Vec<u8>,
    /// Last boundary polarity per cell.
    pub last_boundary_polarity: Vec<i8>,
    /// Last boundary intensity per cell.
    pub last_boundary_intensity: Vec<u8>,
    /// Crust age per cell.
    pub crust_age: Vec<u8>,
}

impl From<&TectonicProvenance> for EncodedProvenance {
    fn from(p: &TectonicProvenance) -> Self {
        let last = &p.last_boundary;
        Self {
            version: p.version,
            era_count: p.era_count as u32,
            cell_count: p.cell_count as u32,
            tracer_index: p
                .tracer_index
                .iter()
                .map(|t| t.iter().map(|c: &CellId| c.0).collect())
                .collect(),
            origin_era: p.origin_era.iter().map(|e| e.0).collect(),
            origin_plate_id: plates(&p.origin_plate),
            last_boundary_era: last.iter().map(|b| EraIndex::encode(b.map(|b| b.era))).collect(),
            last_boundary_type: last
                .iter()
                .map(|b| b.map_or(LAST_BOUNDARY_NONE, |b| b.boundary_type.code()))
                .collect(),
            last_boundary_polarity: last.iter().map(|b| b.map_or(0, |b| b.polarity)).collect(),
            last_boundary_intensity: last.iter().map(|b| b.map_or(0, |b| b.intensity)).collect(),
            crust_age: p.crust_age.clone(),
        }
    }
}
