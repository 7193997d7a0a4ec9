//! Where each era's boundary segments come from.

use crate::inputs::TectonicSegments;
use crate::membership::PlateMembership;
use std::borrow::Cow;
use strata_core::{EraIndex, InputError};
use strata_mesh::MeshGraph;

/// Supplies the boundary segments of each era.
///
/// Segment derivation lives upstream; an implementation may look up
/// precomputed segments or derive them from the era's plate membership.
pub trait SegmentSource {
    /// Segments of `era`, given that era's resolved membership.
    fn segments_for_era(
        &self,
        era: EraIndex,
        membership: &PlateMembership,
    ) -> Result<Cow<'_, TectonicSegments>, InputError>;

    /// Check every era's segments before any era is built.
    ///
    /// Sources that derive segments from membership can only be checked
    /// per era and keep the default, which accepts.
    fn check_eras(&self, _mesh: &MeshGraph, _era_count: usize) -> Result<(), InputError> {
        Ok(())
    }
}

/// Precomputed segments, one list per era, oldest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrecomputedSegments {
    by_era: Vec<TectonicSegments>,
}

impl PrecomputedSegments {
    /// Wrap per-era segment lists.
    pub fn new(by_era: Vec<TectonicSegments>) -> Self {
        Self { by_era }
    }

    /// Number of eras covered.
    pub fn era_count(&self) -> usize {
        self.by_era.len()
    }
}

impl SegmentSource for PrecomputedSegments {
    fn segments_for_era(
        &self,
        era: EraIndex,
        _membership: &PlateMembership,
    ) -> Result<Cow<'_, TectonicSegments>, InputError> {
        self.by_era
            .get(era.index())
            .map(Cow::Borrowed)
            .ok_or(InputError::MissingEraSegments { era: era.index() })
    }

    fn check_eras(&self, mesh: &MeshGraph, era_count: usize) -> Result<(), InputError> {
        if self.by_era.len() < era_count {
            return Err(InputError::MissingEraSegments {
                era: self.by_era.len(),
            });
        }
        self.by_era[..era_count]
            .iter()
            .try_for_each(|segments| segments.validate(mesh))
    }
}

/// The same segments in every era.
impl SegmentSource for TectonicSegments {
    fn segments_for_era(
        &self,
        _era: EraIndex,
        _membership: &PlateMembership,
    ) -> Result<Cow<'_, TectonicSegments>, InputError> {
        Ok(Cow::Borrowed(self))
    }

    fn check_eras(&self, mesh: &MeshGraph, _era_count: usize) -> Result<(), InputError> {
        self.validate(mesh)
    }
}

impl<F> SegmentSource for F
where
    F: Fn(EraIndex, &PlateMembership) -> TectonicSegments,
{
    fn segments_for_era(
        &self,
        era: EraIndex,
        membership: &PlateMembership,
    ) -> Result<Cow<'_, TectonicSegments>, InputError> {
        Ok(Cow::Owned(self(era, membership)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::Segment;
    use strata_core::{BoundaryType, CellId};

    fn one(a: u32) -> TectonicSegments {
        TectonicSegments::new(vec![Segment::between(Some(BoundaryType::Transform), CellId(a), CellId(a + 1))])
    }

    #[test]
    fn precomputed_indexes_by_era() {
        let src = PrecomputedSegments::new(vec![one(0), one(4)]);
        let m = PlateMembership::new(vec![]);
        assert_eq!(src.segments_for_era(EraIndex(1), &m).unwrap().segments[0].a_cell, CellId(4));
        assert_eq!(
            src.segments_for_era(EraIndex(2), &m).unwrap_err(),
            InputError::MissingEraSegments { era: 2 }
        );
    }

    #[test]
    fn precomputed_checks_every_era_up_front() {
        let mesh = MeshGraph::periodic_square(4, 4).unwrap();
        let src = PrecomputedSegments::new(vec![one(0), one(2), one(40)]);
        assert_eq!(
            src.check_eras(&mesh, 3).unwrap_err(),
            InputError::CellOutOfRange {
                artifact: "tectonic_segments",
                cell: 40,
                cell_count: 16,
            }
        );
        // Eras past the run are never read.
        src.check_eras(&mesh, 2).unwrap();
        assert_eq!(
            src.check_eras(&mesh, 5).unwrap_err(),
            InputError::MissingEraSegments { era: 3 }
        );
    }

    #[test]
    fn derived_sources_accept_up_front() {
        let mesh = MeshGraph::periodic_square(4, 4).unwrap();
        let src = |_: EraIndex, _: &PlateMembership| one(40);
        src.check_eras(&mesh, 5).unwrap();
        assert!(one(40).check_eras(&mesh, 5).is_err());
    }

    #[test]
    fn closures_derive_per_era() {
        let src = |era: EraIndex, _: &PlateMembership| one(era.0 as u32 * 2);
        let m = PlateMembership::new(vec![]);
        let segs = src.segments_for_era(EraIndex(3), &m).unwrap();
        assert!(matches!(segs, Cow::Owned(_)));
        assert_eq!(segs.segments[0].b_cell, CellId(7));
    }
}
