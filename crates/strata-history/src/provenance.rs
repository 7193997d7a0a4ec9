//! Crust provenance carried forward through the eras.
//!
//! Every cell starts as era-0 crust of the plate that owned it in era 0.
//! Each later era first moves the per-cell record along that era's tracer,
//! then stamps boundary activity and resets the origin of cells where new
//! crust formed: strong rifts, arcs above subduction, and hotspots.

use crate::config::ResetConfig;
use crate::fields::EraFields;
use crate::membership::PlateMembership;
use strata_core::{clamp_byte, BoundaryType, CellId, EraIndex, EventType, PlateId};
use tracing::debug;

/// Layout version of [`TectonicProvenance`].
pub const PROVENANCE_VERSION: u32 = 1;

/// Reset threshold for a signal whose strongest value this era is
/// `max_value`.
///
/// `max(min(max_value, floor), round(max_value * fraction))`, with the
/// fraction clamped to `[0, 1]`, so the threshold never exceeds what the
/// era actually produced.
///
/// # Examples
///
/// ```
/// use strata_history::derive_reset_threshold;
///
/// assert_eq!(derive_reset_threshold(200, 0.6, 1), 120);
/// assert_eq!(derive_reset_threshold(0, 0.6, 1), 0);
/// assert_eq!(derive_reset_threshold(1, 0.1, 1), 1);
/// ```
pub fn derive_reset_threshold(max_value: u8, fraction: f64, floor: u8) -> u8 {
    let frac = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let derived = clamp_byte(max_value as f64 * frac);
    floor.min(max_value).max(derived)
}

/// Per-era thresholds at or above which new crust forms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetThresholds {
    /// Rift potential on divergent cells.
    pub rift: u8,
    /// Subduction volcanism on convergent cells.
    pub arc: u8,
    /// Hotspot volcanism away from boundaries.
    pub hotspot: u8,
}

impl ResetThresholds {
    /// Calibrate against the strongest signals `fields` produced.
    pub fn derive(fields: &EraFields, config: &ResetConfig) -> Self {
        let (mut rift, mut arc, mut hotspot) = (0u8, 0u8, 0u8);
        for i in 0..fields.cell_count() {
            let volcanism = fields.volcanism[i];
            match (fields.boundary_type[i], fields.volcanism_event_type[i]) {
                (Some(BoundaryType::Divergent), _) => rift = rift.max(fields.rift[i]),
                (Some(BoundaryType::Convergent), Some(EventType::Subduction)) => {
                    arc = arc.max(volcanism)
                }
                (None, Some(EventType::IntraplateHotspot)) => hotspot = hotspot.max(volcanism),
                _ => {}
            }
        }
        Self {
            rift: derive_reset_threshold(rift, config.rift_fraction, config.floor),
            arc: derive_reset_threshold(arc, config.arc_fraction, config.floor),
            hotspot: derive_reset_threshold(hotspot, config.hotspot_fraction, config.floor),
        }
    }
}

/// The most recent boundary a cell's crust sat on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryRecord {
    /// Era of the boundary.
    pub era: EraIndex,
    /// Boundary regime.
    pub boundary_type: BoundaryType,
    /// Subduction polarity; 0 unless convergent.
    pub polarity: i8,
    /// Boundary intensity.
    pub intensity: u8,
}

/// Tracer chain plus final per-cell provenance scalars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TectonicProvenance {
    /// Layout version, [`PROVENANCE_VERSION`].
    pub version: u32,
    /// Number of eras.
    pub era_count: usize,
    /// Number of cells.
    pub cell_count: usize,
    /// Per-era source cell of each cell, oldest first.
    pub tracer_index: Vec<Vec<CellId>>,
    /// Era in which each cell's crust formed.
    pub origin_era: Vec<EraIndex>,
    /// Plate on which each cell's crust formed.
    pub origin_plate: Vec<Option<PlateId>>,
    /// Last boundary each cell's crust sat on.
    pub last_boundary: Vec<Option<BoundaryRecord>>,
    /// Crust age scaled to a byte; 255 is as old as the history.
    pub crust_age: Vec<u8>,
}

/// Per-cell state carried between eras.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Lineage {
    origin_era: EraIndex,
    origin_plate: Option<PlateId>,
    last_boundary: Option<BoundaryRecord>,
}

fn remap(lineage: &[Lineage], tracer: &[CellId]) -> Vec<Lineage> {
    lineage
        .iter()
        .enumerate()
        .map(|(i, own)| {
            tracer
                .get(i)
                .and_then(|src| lineage.get(src.index()))
                .copied()
                .unwrap_or(*own)
        })
        .collect()
}

fn stamp_era(lineage: &mut [Lineage], era: EraIndex, fields: &EraFields, thresholds: ResetThresholds) -> usize {
    let mut resets = 0;
    for (i, cell) in lineage.iter_mut().enumerate() {
        let boundary = fields.boundary_type[i];
        let intensity = fields.boundary_intensity[i];
        if let Some(boundary_type) = boundary {
            if intensity > 0 {
                cell.last_boundary = Some(BoundaryRecord {
                    era,
                    boundary_type,
                    polarity: if boundary_type == BoundaryType::Convergent {
                        fields.boundary_polarity[i]
                    } else {
                        0
                    },
                    intensity,
                });
            }
        }

        let volcanism = fields.volcanism[i];
        let volcanism_type = fields.volcanism_event_type[i];
        let mut born = None;
        if boundary == Some(BoundaryType::Divergent) && fields.rift[i] >= thresholds.rift {
            born = Some(fields.rift_origin_plate[i]);
        }
        if boundary.is_none()
            && volcanism >= thresholds.hotspot
            && volcanism_type == Some(EventType::IntraplateHotspot)
        {
            born = Some(fields.volcanism_origin_plate[i]);
        }
        if boundary == Some(BoundaryType::Convergent)
            && volcanism >= thresholds.arc
            && volcanism_type == Some(EventType::Subduction)
        {
            born = Some(fields.volcanism_origin_plate[i]);
        }
        if let Some(plate) = born {
            cell.origin_era = era;
            cell.origin_plate = plate;
            resets += 1;
        }
    }
    resets
}

/// Crust age as a byte: 0 for crust formed in the newest era, 255 for
/// crust as old as the first era.
pub fn crust_age(origin: EraIndex, era_count: usize) -> u8 {
    let newest = era_count.saturating_sub(1);
    let age = newest.saturating_sub(origin.index());
    clamp_byte(age as f64 / newest.max(1) as f64 * 255.0)
}

impl TectonicProvenance {
    /// Follow every cell from era 0 through the newest era.
    ///
    /// `tracer_index` and `eras` are both oldest first and of equal length;
    /// `era0` is the plate membership of the oldest era.
    pub fn compute(
        eras: &[EraFields],
        era0: &PlateMembership,
        tracer_index: Vec<Vec<CellId>>,
        reset: &ResetConfig,
    ) -> Self {
        let era_count = eras.len();
        let cell_count = eras.first().map_or(0, EraFields::cell_count);
        let mut lineage: Vec<Lineage> = (0..cell_count)
            .map(|i| Lineage {
                origin_era: EraIndex(0),
                origin_plate: era0.get(CellId(i as u32)),
                last_boundary: None,
            })
            .collect();

        for (e, fields) in eras.iter().enumerate() {
            let era = EraIndex(e as u8);
            if e > 0 {
                if let Some(tracer) = tracer_index.get(e) {
                    lineage = remap(&lineage, tracer);
                }
            }
            let thresholds = ResetThresholds::derive(fields, reset);
            let resets = stamp_era(&mut lineage, era, fields, thresholds);
            debug!(
                era = e,
                rift = thresholds.rift,
                arc = thresholds.arc,
                hotspot = thresholds.hotspot,
                resets,
                "stamped provenance"
            );
        }

        Self {
            version: PROVENANCE_VERSION,
            era_count,
            cell_count,
            tracer_index,
            crust_age: lineage.iter().map(|l| crust_age(l.origin_era, era_count)).collect(),
            origin_era: lineage.iter().map(|l| l.origin_era).collect(),
            origin_plate: lineage.iter().map(|l| l.origin_plate).collect(),
            last_boundary: lineage.iter().map(|l| l.last_boundary).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracer::identity_tracer;

    fn identity(eras: usize, cells: usize) -> Vec<Vec<CellId>> {
        vec![identity_tracer(cells); eras]
    }

    fn membership(cells: usize, plate: u16) -> PlateMembership {
        PlateMembership::new(vec![Some(PlateId(plate)); cells])
    }

    fn rift_at(fields: &mut EraFields, cell: usize, value: u8, origin: u16) {
        fields.boundary_type[cell] = Some(BoundaryType::Divergent);
        fields.rift[cell] = value;
        fields.boundary_intensity[cell] = value;
        fields.rift_origin_plate[cell] = Some(PlateId(origin));
    }

    #[test]
    fn threshold_never_exceeds_max() {
        assert_eq!(derive_reset_threshold(255, 0.75, 1), 191);
        assert_eq!(derive_reset_threshold(10, 2.0, 1), 10);
        assert_eq!(derive_reset_threshold(10, f64::NAN, 3), 3);
        assert_eq!(derive_reset_threshold(2, 0.1, 5), 2);
    }

    #[test]
    fn thresholds_track_category_maxima() {
        let mut f = EraFields::blank(4);
        rift_at(&mut f, 0, 100, 1);
        f.boundary_type[1] = Some(BoundaryType::Convergent);
        f.volcanism[1] = 200;
        f.volcanism_event_type[1] = Some(EventType::Subduction);
        f.volcanism[2] = 50;
        f.volcanism_event_type[2] = Some(EventType::IntraplateHotspot);
        // Collision volcanism is not arc volcanism.
        f.boundary_type[3] = Some(BoundaryType::Convergent);
        f.volcanism[3] = 250;
        f.volcanism_event_type[3] = Some(EventType::Collision);
        let t = ResetThresholds::derive(&f, &ResetConfig::default());
        assert_eq!(t, ResetThresholds { rift: 60, arc: 150, hotspot: 40 });
    }

    #[test]
    fn rift_at_threshold_resets_origin() {
        let mut eras = vec![EraFields::blank(3); 5];
        rift_at(&mut eras[2], 0, 100, 7);
        // 60 is exactly 0.6 of the era maximum.
        rift_at(&mut eras[2], 1, 60, 8);
        rift_at(&mut eras[2], 2, 59, 9);
        let p = TectonicProvenance::compute(&eras, &membership(3, 1), identity(5, 3), &ResetConfig::default());
        assert_eq!(p.origin_era, vec![EraIndex(2), EraIndex(2), EraIndex(0)]);
        assert_eq!(p.origin_plate, vec![Some(PlateId(7)), Some(PlateId(8)), Some(PlateId(1))]);
        // (4 - 2) / 4 * 255 = 127.5.
        assert_eq!(p.crust_age, vec![128, 128, 255]);
        assert_eq!(
            p.last_boundary[2],
            Some(BoundaryRecord {
                era: EraIndex(2),
                boundary_type: BoundaryType::Divergent,
                polarity: 0,
                intensity: 59
            })
        );
    }

    #[test]
    fn arc_and_hotspot_reset() {
        let mut eras = vec![EraFields::blank(2); 5];
        let f = &mut eras[4];
        f.boundary_type[0] = Some(BoundaryType::Convergent);
        f.boundary_polarity[0] = -1;
        f.boundary_intensity[0] = 90;
        f.volcanism[0] = 90;
        f.volcanism_event_type[0] = Some(EventType::Subduction);
        f.volcanism_origin_plate[0] = Some(PlateId(3));
        f.volcanism[1] = 40;
        f.volcanism_event_type[1] = Some(EventType::IntraplateHotspot);
        f.volcanism_origin_plate[1] = None;
        let p = TectonicProvenance::compute(&eras, &membership(2, 1), identity(5, 2), &ResetConfig::default());
        assert_eq!(p.origin_era, vec![EraIndex(4); 2]);
        assert_eq!(p.origin_plate, vec![Some(PlateId(3)), None]);
        assert_eq!(p.crust_age, vec![0, 0]);
        assert_eq!(p.last_boundary[0].map(|b| b.polarity), Some(-1));
        assert_eq!(p.last_boundary[1], None);
    }

    #[test]
    fn lineage_follows_tracer() {
        let mut eras = vec![EraFields::blank(3); 5];
        rift_at(&mut eras[1], 0, 80, 5);
        let mut tracers = identity(5, 3);
        // Era 2 pulls cell 0's record into cell 2; out-of-range keeps its own.
        tracers[2] = vec![CellId(0), CellId(1), CellId(0)];
        tracers[3] = vec![CellId(0), CellId(99), CellId(2)];
        let era0 = PlateMembership::new(vec![Some(PlateId(1)), Some(PlateId(2)), None]);
        let p = TectonicProvenance::compute(&eras, &era0, tracers, &ResetConfig::default());
        assert_eq!(p.origin_era, vec![EraIndex(1), EraIndex(0), EraIndex(1)]);
        assert_eq!(p.origin_plate, vec![Some(PlateId(5)), Some(PlateId(2)), Some(PlateId(5))]);
        assert_eq!(p.last_boundary[2].map(|b| b.era), Some(EraIndex(1)));
        assert_eq!(p.version, PROVENANCE_VERSION);
        assert_eq!((p.era_count, p.cell_count), (5, 3));
    }

    #[test]
    fn age_spans_full_byte_range() {
        assert_eq!(crust_age(EraIndex(0), 8), 255);
        assert_eq!(crust_age(EraIndex(7), 8), 0);
        assert_eq!(crust_age(EraIndex(0), 1), 0);
    }
}
