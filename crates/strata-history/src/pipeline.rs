//! One generation run, from validated inputs to the three artifacts.
//!
//! # Stage order
//!
//! 1. validate configuration and inputs
//! 2. plate membership per era
//! 3. per era, oldest first: segments, events, emission
//! 4. rollups and the present-day snapshot
//! 5. tracers, then provenance

use crate::config::HistoryConfig;
use crate::emission::{EmissionParams, EraScaling, FieldEmitter};
use crate::error::HistoryError;
use crate::events::era_events;
use crate::fingerprint::Fingerprint;
use crate::inputs::{CrustTypes, MantleForcing, PlateGraph, PlateMotion};
use crate::membership::plate_membership_by_era;
use crate::metrics::{EraMetrics, RunMetrics};
use crate::provenance::TectonicProvenance;
use crate::rollups::{era_gain, TectonicHistory, Tectonics};
use crate::segments::SegmentSource;
use crate::tracer::{mantle_drift, tracer_index_by_era};
use std::time::Instant;
use strata_core::{ConfigError, EraIndex};
use strata_mesh::MeshGraph;
use tracing::{debug, debug_span, info, instrument};

/// Upstream artifacts a run reads. All borrowed, none modified.
#[derive(Clone, Copy, Debug)]
pub struct TectonicInputs<'a> {
    /// The cell mesh.
    pub mesh: &'a MeshGraph,
    /// Crust type per cell.
    pub crust: &'a CrustTypes,
    /// Plates and today's cell assignment.
    pub plates: &'a PlateGraph,
    /// Velocity per plate.
    pub motion: &'a PlateMotion,
    /// Mantle forcing per cell.
    pub mantle: &'a MantleForcing,
}

impl TectonicInputs<'_> {
    /// Check every artifact against the mesh and each other.
    pub fn validate(&self) -> Result<(), HistoryError> {
        self.crust.validate(self.mesh)?;
        self.plates.validate(self.mesh)?;
        self.motion.validate(self.plates)?;
        self.mantle.validate(self.mesh)?;
        Ok(())
    }
}

/// Everything one run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct TectonicOutputs {
    /// Full per-era history with rollups.
    pub history: TectonicHistory,
    /// Tracer chain and provenance scalars.
    pub provenance: TectonicProvenance,
    /// Newest-era snapshot.
    pub tectonics: Tectonics,
    /// Timing and workload of the run.
    pub metrics: RunMetrics,
}

impl TectonicOutputs {
    /// Fingerprint of the history and provenance together.
    ///
    /// Metrics are excluded, so two runs over the same inputs agree.
    pub fn fingerprint(&self) -> u64 {
        Fingerprint::new()
            .history(&self.history)
            .provenance(&self.provenance)
            .finish()
    }
}

/// Configures and runs tectonic history generation.
///
/// # Examples
///
/// ```
/// use strata_core::{CellId, PlateId};
/// use strata_history::{
///     CrustTypes, HistoryConfig, MantleForcing, Plate, PlateGraph, PlateKind, PlateMotion,
///     TectonicHistoryBuilder, TectonicInputs, TectonicSegments,
/// };
/// use strata_mesh::MeshGraph;
///
/// let mesh = MeshGraph::periodic_hex(8, 4).unwrap();
/// let n = mesh.cell_count();
/// let plate = Plate { id: PlateId(0), seed_x: 2.0, seed_y: 1.0, kind: PlateKind::Major };
/// let plates = PlateGraph::new(vec![plate], vec![Some(PlateId(0)); n]).unwrap();
/// let crust = CrustTypes::from_raw(&vec![0; n]);
/// let motion = PlateMotion::new(vec![(1.0, 0.0)]);
/// let mantle = MantleForcing::quiet(n);
/// let inputs = TectonicInputs { mesh: &mesh, crust: &crust, plates: &plates, motion: &motion, mantle: &mantle };
///
/// let out = TectonicHistoryBuilder::new(inputs)
///     .with_config(HistoryConfig::default())
///     .build(&TectonicSegments::default())
///     .unwrap();
/// assert_eq!(out.history.era_count, 5);
/// assert_eq!(out.provenance.tracer_index[0][3], CellId(3));
/// ```
#[derive(Clone, Debug)]
pub struct TectonicHistoryBuilder<'a> {
    inputs: TectonicInputs<'a>,
    config: HistoryConfig,
}

impl<'a> TectonicHistoryBuilder<'a> {
    /// A builder with the default configuration.
    pub fn new(inputs: TectonicInputs<'a>) -> Self {
        Self {
            inputs,
            config: HistoryConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: HistoryConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Run every stage and return the artifacts.
    ///
    /// Fails before computing anything if the configuration or an input
    /// artifact is invalid, or if [`SegmentSource::check_eras`] rejects
    /// `segments`. Segments derived per era are checked as each era runs.
    #[instrument(skip_all, name = "tectonic_history", fields(cells = self.inputs.mesh.cell_count(), eras = self.config.era_count()))]
    pub fn build<S>(&self, segments: &S) -> Result<TectonicOutputs, HistoryError>
    where
        S: SegmentSource + ?Sized,
    {
        let run_start = Instant::now();
        let mut metrics = RunMetrics::default();
        let TectonicInputs {
            mesh,
            crust,
            plates,
            motion,
            mantle,
        } = self.inputs;
        let config = &self.config;

        let start = Instant::now();
        config.validate()?;
        self.inputs.validate()?;
        segments.check_eras(mesh, config.era_count())?;
        metrics.validate_us = start.elapsed().as_micros() as u64;

        let start = Instant::now();
        let membership = plate_membership_by_era(mesh, plates, motion, &config.drift_steps_by_era);
        metrics.membership_us = start.elapsed().as_micros() as u64;

        let era_count = config.era_count();
        let mut emitter = FieldEmitter::new(
            mesh,
            EmissionParams::from_belt(config.belt_influence_distance, config.belt_decay),
        );
        let mut eras = Vec::with_capacity(era_count);
        for (e, era_membership) in membership.iter().enumerate() {
            let _era = debug_span!("era", era = e).entered();
            let start = Instant::now();
            let era_segments = segments.segments_for_era(EraIndex(e as u8), era_membership)?;
            era_segments.validate(mesh)?;
            let events = era_events(
                mesh.cell_count(),
                crust,
                &era_segments,
                mantle,
                era_membership,
                config.hotspot_forcing_floor,
            );
            let scaling = EraScaling {
                weight: config.era_weights[e],
                gain: era_gain(e, era_count),
                drift_steps: config.drift_steps_by_era[e],
            };
            let (fields, stats) = emitter.emit_era(&events, scaling);
            let mut era_metrics = EraMetrics {
                unassigned_cells: era_membership.unassigned(),
                ..EraMetrics::default()
            };
            era_metrics.record_emission(&stats);
            era_metrics.emission_us = start.elapsed().as_micros() as u64;
            debug!(segments = era_segments.len(), events = events.len(), "built era");
            metrics.eras.push(era_metrics);
            eras.push(fields);
        }

        let start = Instant::now();
        let history = TectonicHistory::aggregate(eras, membership, config.activity_threshold);
        let Some(tectonics) = Tectonics::current(&history) else {
            return Err(ConfigError::EraCountOutOfRange { count: 0 }.into());
        };
        metrics.rollup_us = start.elapsed().as_micros() as u64;

        let start = Instant::now();
        let tracer_index = tracer_index_by_era(mesh, &mantle_drift(mantle), &history.eras);
        metrics.tracer_us = start.elapsed().as_micros() as u64;

        let start = Instant::now();
        let provenance = TectonicProvenance::compute(
            &history.eras,
            &history.plate_id_by_era[0],
            tracer_index,
            &config.reset,
        );
        metrics.provenance_us = start.elapsed().as_micros() as u64;

        metrics.total_us = run_start.elapsed().as_micros() as u64;
        info!(
            events = metrics.total_events(),
            visits = metrics.total_visits(),
            total_us = metrics.total_us,
            "tectonic history complete"
        );
        Ok(TectonicOutputs {
            history,
            provenance,
            tectonics,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{Plate, PlateKind, Segment, TectonicSegments};
    use crate::segments::PrecomputedSegments;
    use strata_core::{BoundaryType, CellId, InputError, PlateId};

    struct World {
        mesh: MeshGraph,
        crust: CrustTypes,
        plates: PlateGraph,
        motion: PlateMotion,
        mantle: MantleForcing,
    }

    impl World {
        fn new() -> Self {
            let mesh = MeshGraph::periodic_square(10, 4).unwrap();
            let n = mesh.cell_count();
            let owner = (0..n).map(|i| Some(PlateId(if i % 10 < 5 { 0 } else { 1 }))).collect();
            let plates = PlateGraph::new(
                vec![
                    Plate {
                        id: PlateId(0),
                        seed_x: 2.0,
                        seed_y: 1.0,
                        kind: PlateKind::Major,
                    },
                    Plate {
                        id: PlateId(1),
                        seed_x: 7.0,
                        seed_y: 2.0,
                        kind: PlateKind::Minor,
                    },
                ],
                owner,
            )
            .unwrap();
            Self {
                crust: CrustTypes::from_raw(&vec![0; n]),
                motion: PlateMotion::new(vec![(1.0, 0.0), (-1.0, 0.5)]),
                mantle: MantleForcing::quiet(n),
                mesh,
                plates,
            }
        }

        fn inputs(&self) -> TectonicInputs<'_> {
            TectonicInputs {
                mesh: &self.mesh,
                crust: &self.crust,
                plates: &self.plates,
                motion: &self.motion,
                mantle: &self.mantle,
            }
        }
    }

    fn rift(a: u32, b: u32) -> TectonicSegments {
        TectonicSegments::new(vec![Segment {
            extension: 200,
            volcanism: 40,
            fracture: 20,
            plate_a: Some(PlateId(0)),
            plate_b: Some(PlateId(1)),
            ..Segment::between(Some(BoundaryType::Divergent), CellId(a), CellId(b))
        }])
    }

    #[test]
    fn runs_all_stages() {
        let world = World::new();
        let out = TectonicHistoryBuilder::new(world.inputs()).build(&rift(14, 15)).unwrap();
        assert_eq!(out.history.era_count, 5);
        assert_eq!(out.metrics.eras.len(), 5);
        assert_eq!(out.metrics.total_events(), 5);
        assert!(out.history.eras.iter().all(|e| e.rift[14] > 0));
        assert_eq!(out.tectonics.rift, out.history.eras[4].rift);
        assert_eq!(out.history.plate_id_by_era[4].as_slice(), world.plates.cell_to_plate());
        out.history.validate().unwrap();
        out.provenance.validate().unwrap();
    }

    #[test]
    fn invalid_config_fails_first() {
        let world = World::new();
        let config = HistoryConfig {
            era_weights: vec![0.1; 4],
            drift_steps_by_era: vec![1; 4],
            ..HistoryConfig::default()
        };
        let err = TectonicHistoryBuilder::new(world.inputs())
            .with_config(config)
            .build(&TectonicSegments::default())
            .unwrap_err();
        assert_eq!(err, HistoryError::Config(ConfigError::EraCountOutOfRange { count: 4 }));
    }

    #[test]
    fn missing_era_segments_fail() {
        let world = World::new();
        let source = PrecomputedSegments::new(vec![rift(1, 2); 3]);
        let err = TectonicHistoryBuilder::new(world.inputs()).build(&source).unwrap_err();
        assert_eq!(err, HistoryError::Input(InputError::MissingEraSegments { era: 3 }));
    }

    #[test]
    fn bad_last_era_fails_before_membership() {
        let world = World::new();
        let mut by_era = vec![rift(14, 15); 4];
        by_era.push(rift(14, 400));
        let source = PrecomputedSegments::new(by_era);
        let err = TectonicHistoryBuilder::new(world.inputs()).build(&source).unwrap_err();
        assert_eq!(
            err,
            HistoryError::Input(InputError::CellOutOfRange {
                artifact: "tectonic_segments",
                cell: 400,
                cell_count: 40,
            })
        );
    }

    #[test]
    fn out_of_range_segment_fails() {
        let world = World::new();
        let err = TectonicHistoryBuilder::new(world.inputs())
            .build(&rift(3, 400))
            .unwrap_err();
        assert!(matches!(
            err,
            HistoryError::Input(InputError::CellOutOfRange { cell: 400, .. })
        ));
    }

    #[test]
    fn repeated_runs_agree() {
        let world = World::new();
        let builder = TectonicHistoryBuilder::new(world.inputs());
        let a = builder.build(&rift(14, 15)).unwrap();
        let b = builder.build(&rift(14, 15)).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.history, b.history);
        assert_eq!(a.provenance, b.provenance);
    }
}
