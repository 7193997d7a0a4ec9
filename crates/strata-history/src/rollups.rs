//! Cross-era rollups and the present-day snapshot.

use crate::fields::EraFields;
use crate::membership::PlateMembership;
use strata_core::{byte_fraction, BoundaryType, CellId, EraIndex};

/// Orogeny gain of the oldest era.
pub const OROGENY_GAIN_MIN: f64 = 0.85;
/// Orogeny gain of the newest era.
pub const OROGENY_GAIN_MAX: f64 = 1.15;

/// Orogeny gain for `era` of `era_count`, ramping linearly from
/// [`OROGENY_GAIN_MIN`] to [`OROGENY_GAIN_MAX`].
///
/// # Examples
///
/// ```
/// use strata_history::era_gain;
///
/// assert!((era_gain(0, 5) - 0.85).abs() < 1e-12);
/// assert!((era_gain(4, 5) - 1.15).abs() < 1e-12);
/// ```
pub fn era_gain(era: usize, era_count: usize) -> f64 {
    let t = if era_count > 1 {
        era as f64 / (era_count - 1) as f64
    } else {
        0.0
    };
    OROGENY_GAIN_MIN + (OROGENY_GAIN_MAX - OROGENY_GAIN_MIN) * t
}

/// Full tectonic history: every era's fields plus per-cell rollups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TectonicHistory {
    /// Number of eras.
    pub era_count: usize,
    /// Per-era fields, oldest first.
    pub eras: Vec<EraFields>,
    /// Per-era plate membership, oldest first.
    pub plate_id_by_era: Vec<PlateMembership>,
    /// Saturating sum of uplift over eras.
    pub uplift_total: Vec<u8>,
    /// Saturating sum of collision uplift over eras.
    pub collision_total: Vec<u8>,
    /// Saturating sum of subduction uplift over eras.
    pub subduction_total: Vec<u8>,
    /// Saturating sum of fracture over eras.
    pub fracture_total: Vec<u8>,
    /// Saturating sum of volcanism over eras.
    pub volcanism_total: Vec<u8>,
    /// Newest-era uplift as a byte fraction of `uplift_total`.
    pub uplift_recent_fraction: Vec<u8>,
    /// Newest-era collision as a byte fraction of `collision_total`.
    pub collision_recent_fraction: Vec<u8>,
    /// Newest-era subduction as a byte fraction of `subduction_total`.
    pub subduction_recent_fraction: Vec<u8>,
    /// Newest era in which any channel exceeded the activity threshold.
    pub last_active_era: Vec<Option<EraIndex>>,
    /// Newest era in which collision exceeded the activity threshold.
    pub last_collision_era: Vec<Option<EraIndex>>,
    /// Newest era in which subduction exceeded the activity threshold.
    pub last_subduction_era: Vec<Option<EraIndex>>,
}

fn saturating_total(eras: &[EraFields], field: impl Fn(&EraFields) -> &[u8], cell: usize) -> u8 {
    eras.iter()
        .fold(0u8, |acc, era| acc.saturating_add(field(era)[cell]))
}

fn last_era_above(
    eras: &[EraFields],
    threshold: u8,
    value: impl Fn(&EraFields, usize) -> u8,
    cell: usize,
) -> Option<EraIndex> {
    eras.iter()
        .rposition(|era| value(era, cell) > threshold)
        .map(|e| EraIndex(e as u8))
}

impl TectonicHistory {
    /// Reduce per-era fields into a history.
    ///
    /// `eras` must be non-empty and cover the same cells as `membership`.
    pub fn aggregate(eras: Vec<EraFields>, membership: Vec<PlateMembership>, activity_threshold: u8) -> Self {
        let cell_count = eras.first().map_or(0, EraFields::cell_count);
        let era_count = eras.len();
        let mut h = Self {
            era_count,
            uplift_total: vec![0; cell_count],
            collision_total: vec![0; cell_count],
            subduction_total: vec![0; cell_count],
            fracture_total: vec![0; cell_count],
            volcanism_total: vec![0; cell_count],
            uplift_recent_fraction: vec![0; cell_count],
            collision_recent_fraction: vec![0; cell_count],
            subduction_recent_fraction: vec![0; cell_count],
            last_active_era: vec![None; cell_count],
            last_collision_era: vec![None; cell_count],
            last_subduction_era: vec![None; cell_count],
            eras: Vec::new(),
            plate_id_by_era: membership,
        };
        let Some(newest) = eras.last() else {
            return h;
        };

        for i in 0..cell_count {
            h.uplift_total[i] = saturating_total(&eras, |e| &e.uplift, i);
            h.collision_total[i] = saturating_total(&eras, |e| &e.collision, i);
            h.subduction_total[i] = saturating_total(&eras, |e| &e.subduction, i);
            h.fracture_total[i] = saturating_total(&eras, |e| &e.fracture, i);
            h.volcanism_total[i] = saturating_total(&eras, |e| &e.volcanism, i);

            h.uplift_recent_fraction[i] = byte_fraction(newest.uplift[i], h.uplift_total[i]);
            h.collision_recent_fraction[i] = byte_fraction(newest.collision[i], h.collision_total[i]);
            h.subduction_recent_fraction[i] =
                byte_fraction(newest.subduction[i], h.subduction_total[i]);

            h.last_active_era[i] =
                last_era_above(&eras, activity_threshold, |e, c| e.peak(CellId(c as u32)), i);
            h.last_collision_era[i] = last_era_above(&eras, activity_threshold, |e, c| e.collision[c], i);
            h.last_subduction_era[i] =
                last_era_above(&eras, activity_threshold, |e, c| e.subduction[c], i);
        }
        h.eras = eras;
        h
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.uplift_total.len()
    }

    /// Fields of the newest era.
    pub fn newest(&self) -> Option<&EraFields> {
        self.eras.last()
    }
}

/// Present-day tectonic state for stages that only need the newest era.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tectonics {
    /// Newest-era boundary regime.
    pub boundary_type: Vec<Option<BoundaryType>>,
    /// Newest-era uplift.
    pub uplift: Vec<u8>,
    /// Newest-era rift potential.
    pub rift: Vec<u8>,
    /// Newest-era shear stress.
    pub shear: Vec<u8>,
    /// Newest-era volcanism.
    pub volcanism: Vec<u8>,
    /// Newest-era fracture.
    pub fracture: Vec<u8>,
    /// Saturating uplift total over all eras.
    pub cumulative_uplift: Vec<u8>,
}

impl Tectonics {
    /// Snapshot the newest era of `history`.
    ///
    /// Returns `None` for a history with no eras.
    pub fn current(history: &TectonicHistory) -> Option<Self> {
        let newest = history.newest()?;
        Some(Self {
            boundary_type: newest.boundary_type.clone(),
            uplift: newest.uplift.clone(),
            rift: newest.rift.clone(),
            shear: newest.shear.clone(),
            volcanism: newest.volcanism.clone(),
            fracture: newest.fracture.clone(),
            cumulative_uplift: history.uplift_total.clone(),
        })
    }
}
