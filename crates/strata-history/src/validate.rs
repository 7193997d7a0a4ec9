//! Structural checks for produced artifacts.
//!
//! A downstream stage that receives a history or provenance (possibly from
//! a cache) can check it before indexing into it.

use crate::error::ArtifactError;
use crate::provenance::{TectonicProvenance, PROVENANCE_VERSION};
use crate::rollups::TectonicHistory;
use strata_core::{ERA_COUNT_MAX, ERA_COUNT_MIN};

fn era_count(artifact: &'static str, count: usize) -> Result<(), ArtifactError> {
    if (ERA_COUNT_MIN..=ERA_COUNT_MAX).contains(&count) {
        return Ok(());
    }
    Err(ArtifactError::EraCount {
        artifact,
        count,
        min: ERA_COUNT_MIN,
        max: ERA_COUNT_MAX,
    })
}

fn era_list(artifact: &'static str, field: &'static str, expected: usize, actual: usize) -> Result<(), ArtifactError> {
    if expected == actual {
        return Ok(());
    }
    Err(ArtifactError::EraListLength {
        artifact,
        field,
        expected,
        actual,
    })
}

struct Cells {
    artifact: &'static str,
    expected: usize,
}

impl Cells {
    fn check(&self, field: &'static str, era: Option<usize>, actual: usize) -> Result<(), ArtifactError> {
        if actual == self.expected {
            return Ok(());
        }
        Err(ArtifactError::CellLength {
            artifact: self.artifact,
            field,
            era,
            expected: self.expected,
            actual,
        })
    }
}

impl TectonicHistory {
    /// Check era counts and that every per-cell array covers the same
    /// cells.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        const ARTIFACT: &str = "tectonic_history";
        era_count(ARTIFACT, self.era_count)?;
        era_list(ARTIFACT, "eras", self.era_count, self.eras.len())?;
        era_list(ARTIFACT, "plate_id_by_era", self.era_count, self.plate_id_by_era.len())?;

        let cells = Cells {
            artifact: ARTIFACT,
            expected: self.cell_count(),
        };
        if cells.expected == 0 {
            return Err(ArtifactError::NoCells { artifact: ARTIFACT });
        }
        for (field, len) in [
            ("collision_total", self.collision_total.len()),
            ("subduction_total", self.subduction_total.len()),
            ("fracture_total", self.fracture_total.len()),
            ("volcanism_total", self.volcanism_total.len()),
            ("uplift_recent_fraction", self.uplift_recent_fraction.len()),
            ("collision_recent_fraction", self.collision_recent_fraction.len()),
            ("subduction_recent_fraction", self.subduction_recent_fraction.len()),
            ("last_active_era", self.last_active_era.len()),
            ("last_collision_era", self.last_collision_era.len()),
            ("last_subduction_era", self.last_subduction_era.len()),
        ] {
            cells.check(field, None, len)?;
        }

        for (e, era) in self.eras.iter().enumerate() {
            let era_cells = [
                ("uplift", era.uplift.len()),
                ("collision", era.collision.len()),
                ("subduction", era.subduction.len()),
                ("rift", era.rift.len()),
                ("shear", era.shear.len()),
                ("volcanism", era.volcanism.len()),
                ("fracture", era.fracture.len()),
                ("boundary_type", era.boundary_type.len()),
                ("boundary_polarity", era.boundary_polarity.len()),
                ("boundary_intensity", era.boundary_intensity.len()),
                ("boundary_drift", era.boundary_drift.len()),
                ("rift_origin_plate", era.rift_origin_plate.len()),
                ("volcanism_origin_plate", era.volcanism_origin_plate.len()),
                ("volcanism_event_type", era.volcanism_event_type.len()),
                ("plate_id", self.plate_id_by_era[e].len()),
            ];
            for (field, len) in era_cells {
                cells.check(field, Some(e), len)?;
            }
        }
        Ok(())
    }
}

impl TectonicProvenance {
    /// Check the version, era count, array lengths, and that every tracer
    /// entry names a cell inside the mesh.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        const ARTIFACT: &str = "tectonic_provenance";
        if self.version != PROVENANCE_VERSION {
            return Err(ArtifactError::Version { found: self.version });
        }
        era_count(ARTIFACT, self.era_count)?;
        if self.cell_count == 0 {
            return Err(ArtifactError::NoCells { artifact: ARTIFACT });
        }
        era_list(ARTIFACT, "tracer_index", self.era_count, self.tracer_index.len())?;

        let cells = Cells {
            artifact: ARTIFACT,
            expected: self.cell_count,
        };
        for (e, tracer) in self.tracer_index.iter().enumerate() {
            cells.check("tracer_index", Some(e), tracer.len())?;
            if let Some((cell, src)) = tracer
                .iter()
                .enumerate()
                .find(|(_, src)| src.index() >= self.cell_count)
            {
                return Err(ArtifactError::TracerOutOfRange {
                    era: e,
                    cell,
                    source_cell: src.0,
                    cell_count: self.cell_count,
                });
            }
        }
        cells.check("origin_era", None, self.origin_era.len())?;
        cells.check("origin_plate", None, self.origin_plate.len())?;
        cells.check("last_boundary", None, self.last_boundary.len())?;
        cells.check("crust_age", None, self.crust_age.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResetConfig;
    use crate::fields::EraFields;
    use crate::membership::PlateMembership;
    use crate::tracer::identity_tracer;
    use strata_core::CellId;

    fn history(eras: usize, cells: usize) -> TectonicHistory {
        let m = vec![PlateMembership::new(vec![None; cells]); eras];
        TectonicHistory::aggregate(vec![EraFields::blank(cells); eras], m, 1)
    }

    fn provenance(eras: usize, cells: usize) -> TectonicProvenance {
        TectonicProvenance::compute(
            &vec![EraFields::blank(cells); eras],
            &PlateMembership::new(vec![None; cells]),
            vec![identity_tracer(cells); eras],
            &ResetConfig::default(),
        )
    }

    #[test]
    fn accepts_well_formed() {
        history(5, 3).validate().unwrap();
        provenance(8, 3).validate().unwrap();
    }

    #[test]
    fn rejects_era_count() {
        assert!(matches!(
            history(4, 3).validate(),
            Err(ArtifactError::EraCount { count: 4, .. })
        ));
        assert!(matches!(
            provenance(9, 3).validate(),
            Err(ArtifactError::EraCount { count: 9, .. })
        ));
    }

    #[test]
    fn rejects_truncated_era_array() {
        let mut h = history(5, 3);
        h.eras[2].shear.pop();
        assert_eq!(
            h.validate(),
            Err(ArtifactError::CellLength {
                artifact: "tectonic_history",
                field: "shear",
                era: Some(2),
                expected: 3,
                actual: 2,
            })
        );
    }

    #[test]
    fn rejects_missing_era() {
        let mut h = history(6, 3);
        h.plate_id_by_era.pop();
        assert!(matches!(
            h.validate(),
            Err(ArtifactError::EraListLength { field: "plate_id_by_era", .. })
        ));
    }

    #[test]
    fn rejects_tracer_out_of_range() {
        let mut p = provenance(5, 3);
        p.tracer_index[4][1] = CellId(3);
        assert_eq!(
            p.validate(),
            Err(ArtifactError::TracerOutOfRange {
                era: 4,
                cell: 1,
                source_cell: 3,
                cell_count: 3,
            })
        );
    }

    #[test]
    fn rejects_bad_version_and_short_scalars() {
        let mut p = provenance(5, 3);
        p.crust_age.truncate(1);
        assert!(matches!(p.validate(), Err(ArtifactError::CellLength { field: "crust_age", .. })));
        p.version = 0;
        assert_eq!(p.validate(), Err(ArtifactError::Version { found: 0 }));
    }
}
