//! Event wavefront emission.
//!
//! Each event spreads outward from its (drift-displaced) seed cells by a
//! multi-source shortest-path expansion over the mesh. Distance is measured
//! in mean-edge units. At every reached cell each active channel whose
//! radius covers the distance offers `intensity * exp(-distance * decay)`
//! to that channel's winner table.
//!
//! Events are processed strictly in index order; the winner tie-break makes
//! the result independent of that order, but sequential processing keeps
//! the scratch buffers single-owner.

use crate::events::TectonicEvent;
use crate::fields::EraFields;
use crate::winners::{Candidate, ChannelWinners, WinnerSlot};
use strata_core::{clamp_byte, CellId, Channel, EventType};
use strata_mesh::{Cost, EpochTable, Frontier, MeshGraph};
use tracing::debug;

/// Radius multiplier per channel, applied to the base belt distance.
const RADIUS_MUL: [f64; 5] = [2.0, 1.25, 1.0, 0.875, 1.25];
/// Decay multiplier per channel, applied to the base belt decay.
const DECAY_MUL: [f64; 5] = [0.30 / 0.55, 1.0, 0.7 / 0.55, 0.85 / 0.55, 0.65 / 0.55];

/// Slack allowed when comparing path distances.
const DIST_EPSILON: f64 = 1e-6;

/// Per-channel emission radius and decay.
#[derive(Clone, Debug, PartialEq)]
pub struct EmissionParams {
    /// Radius in normalized mesh steps, indexed by [`Channel::index`].
    pub radius: [u32; 5],
    /// Exponential decay per normalized step, indexed by [`Channel::index`].
    pub decay: [f64; 5],
}

impl EmissionParams {
    /// Derive per-channel footprints from the two belt knobs.
    ///
    /// The base radius is `belt_influence_distance` clamped to `1..=64`;
    /// the base decay is `belt_decay`, at least `0.01`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_history::EmissionParams;
    ///
    /// let p = EmissionParams::from_belt(8, 0.55);
    /// assert_eq!(p.radius, [16, 10, 8, 7, 10]);
    /// assert!((p.decay[1] - 0.55).abs() < 1e-12);
    /// ```
    pub fn from_belt(belt_influence_distance: u32, belt_decay: f64) -> Self {
        let base_radius = belt_influence_distance.clamp(1, 64) as f64;
        let base_decay = if belt_decay.is_finite() {
            belt_decay.max(0.01)
        } else {
            0.01
        };
        Self {
            radius: RADIUS_MUL.map(|m| ((base_radius * m).round() as u32).max(1)),
            decay: DECAY_MUL.map(|m| base_decay * m),
        }
    }
}

/// Per-era scaling applied to every event of the era.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EraScaling {
    /// Era weight.
    pub weight: f64,
    /// Orogeny gain for convergent uplift and subduction volcanism.
    pub gain: f64,
    /// Steps each event's seeds are displaced along its drift.
    pub drift_steps: u32,
}

impl EraScaling {
    /// Scaled intensities of `event` for this era.
    pub fn scale(&self, event: &TectonicEvent) -> [u8; 5] {
        let weight = self.weight.max(0.0);
        let gain = if self.gain.is_finite() {
            self.gain.max(0.0)
        } else {
            1.0
        };
        let mut out = [0u8; 5];
        for ch in Channel::ALL {
            let boosted = match ch {
                Channel::Uplift => event.event_type.is_convergent(),
                Channel::Volcanism => event.event_type == EventType::Subduction,
                _ => false,
            };
            let g = if boosted { gain } else { 1.0 };
            out[ch.index()] = clamp_byte(event.intensity(ch) as f64 * weight * g);
        }
        out
    }
}

/// Counters from emitting one era.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmissionStats {
    /// Events offered for emission.
    pub events: usize,
    /// Events skipped because every scaled channel was zero.
    pub skipped: usize,
    /// Frontier pops that reached a cell within radius.
    pub visits: u64,
}

/// Emits events into per-era fields.
///
/// Owns the wavefront scratch (distance table and frontier) so that a run
/// reuses it across every event of every era.
pub struct FieldEmitter<'m> {
    mesh: &'m MeshGraph,
    params: EmissionParams,
    distance: EpochTable<f64>,
    frontier: Frontier<(Cost, CellId, u64)>,
    seq: u64,
}

impl<'m> FieldEmitter<'m> {
    /// Create an emitter for `mesh`.
    pub fn new(mesh: &'m MeshGraph, params: EmissionParams) -> Self {
        Self {
            mesh,
            params,
            distance: EpochTable::new(mesh.cell_count(), f64::INFINITY),
            frontier: Frontier::new(),
            seq: 0,
        }
    }

    /// Emit all `events` of one era and finalize its fields.
    pub fn emit_era(&mut self, events: &[TectonicEvent], scaling: EraScaling) -> (EraFields, EmissionStats) {
        let mut winners = ChannelWinners::new(self.mesh.cell_count());
        let mut stats = EmissionStats {
            events: events.len(),
            ..EmissionStats::default()
        };
        for (index, event) in events.iter().enumerate() {
            match self.emit_event(&mut winners, event, index as u32, scaling) {
                Some(visits) => stats.visits += visits,
                None => stats.skipped += 1,
            }
        }
        debug!(
            events = stats.events,
            skipped = stats.skipped,
            visits = stats.visits,
            "emitted era"
        );
        (EraFields::from_winners(winners, events), stats)
    }

    /// Seeds of `event` after walking `steps` along its drift.
    pub fn drifted_seeds(&self, event: &TectonicEvent, steps: u32) -> Vec<CellId> {
        event
            .seeds
            .iter()
            .filter(|c| c.index() < self.mesh.cell_count())
            .map(|&c| self.mesh.walk_drift(c, event.drift, steps))
            .collect()
    }

    /// Expand one event. Returns the visit count, or `None` if skipped.
    fn emit_event(
        &mut self,
        winners: &mut ChannelWinners,
        event: &TectonicEvent,
        index: u32,
        scaling: EraScaling,
    ) -> Option<u64> {
        let mesh = self.mesh;
        let intensity = scaling.scale(event);
        let radius = self.params.radius;
        let decay = self.params.decay;
        let max_radius = Channel::ALL
            .iter()
            .filter(|c| intensity[c.index()] > 0)
            .map(|c| radius[c.index()])
            .max()
            .unwrap_or(0);
        if max_radius == 0 {
            return None;
        }
        let max_radius = max_radius as f64;

        self.distance.begin();
        self.frontier.clear();
        for seed in self.drifted_seeds(event, scaling.drift_steps) {
            if self.distance.contains(seed.index()) {
                continue;
            }
            self.distance.set(seed.index(), 0.0);
            self.push(0.0, seed);
        }

        let split = match event.event_type {
            EventType::Collision => Some(WinnerSlot::Collision),
            EventType::Subduction => Some(WinnerSlot::Subduction),
            _ => None,
        };

        let mut visits = 0u64;
        while let Some((Cost(d), cell, _)) = self.frontier.pop() {
            let best = self.distance.get(cell.index()).unwrap_or(f64::INFINITY);
            if !(d <= best + DIST_EPSILON) || d > max_radius {
                continue;
            }
            visits += 1;

            for ch in Channel::ALL {
                let k = ch.index();
                if intensity[k] == 0 || d > radius[k] as f64 {
                    continue;
                }
                let candidate = Candidate {
                    score: intensity[k] as f64 * (-d * decay[k]).exp(),
                    intensity: intensity[k],
                    event_type: event.event_type,
                    event_index: index,
                };
                let won = winners.update_channel(ch, cell, candidate);
                match ch {
                    Channel::Uplift => {
                        if won {
                            winners.set_uplift_polarity(cell, event.polarity);
                        }
                        if let Some(slot) = split {
                            winners.update_channel(slot, cell, candidate);
                        }
                    }
                    Channel::Rift if won => winners.set_rift_origin(cell, event.origin_plate),
                    Channel::Volcanism if won => {
                        winners.set_volcanism_origin(cell, event.origin_plate)
                    }
                    _ => {}
                }
            }

            if d >= max_radius {
                continue;
            }
            for n in mesh.neighbors(cell) {
                let Some(step) = mesh.normalized_edge_cost(cell, n) else {
                    continue;
                };
                let nd = d + step;
                if nd > max_radius {
                    continue;
                }
                let prev = self.distance.get(n.index()).unwrap_or(f64::INFINITY);
                if nd + DIST_EPSILON < prev {
                    self.distance.set(n.index(), nd);
                    self.push(nd, n);
                }
            }
        }
        Some(visits)
    }

    fn push(&mut self, dist: f64, cell: CellId) {
        self.seq += 1;
        self.frontier.push((Cost(dist), cell, self.seq));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;
    use strata_core::{BoundaryType, DriftVector, PlateId};

    fn ring(n: u32) -> MeshGraph {
        MeshGraph::periodic_square(n, 1).unwrap()
    }

    fn event(event_type: EventType, intensity: [u8; 5], seed: u32) -> TectonicEvent {
        TectonicEvent {
            event_type,
            plate_a: None,
            plate_b: None,
            polarity: 0,
            intensity,
            drift: DriftVector::ZERO,
            seeds: smallvec![CellId(seed)],
            origin_plate: Some(PlateId(3)),
        }
    }

    fn unit() -> EraScaling {
        EraScaling {
            weight: 1.0,
            gain: 1.0,
            drift_steps: 0,
        }
    }

    #[test]
    fn default_footprints() {
        let p = EmissionParams::from_belt(8, 0.55);
        assert_eq!(p.radius, [16, 10, 8, 7, 10]);
        assert!((p.decay[0] - 0.30).abs() < 1e-12);
        assert!((p.decay[3] - 0.85).abs() < 1e-12);
        // Knobs are clamped.
        let p = EmissionParams::from_belt(0, 0.0);
        assert_eq!(p.radius, [2, 1, 1, 1, 1]);
        assert!((p.decay[1] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn gain_applies_to_convergent_uplift_and_subduction_volcanism() {
        let s = EraScaling {
            weight: 0.5,
            gain: 1.2,
            drift_steps: 0,
        };
        let sub = event(EventType::Subduction, [100, 0, 0, 100, 100], 0);
        assert_eq!(s.scale(&sub), [60, 0, 0, 60, 50]);
        let col = event(EventType::Collision, [100, 0, 0, 100, 100], 0);
        assert_eq!(s.scale(&col), [60, 0, 0, 50, 50]);
        let hot = event(EventType::IntraplateHotspot, [100, 0, 0, 100, 100], 0);
        assert_eq!(s.scale(&hot), [50, 0, 0, 50, 50]);
    }

    #[test]
    fn single_rift_decays_with_distance() {
        let mesh = ring(40);
        let mut emitter = FieldEmitter::new(&mesh, EmissionParams::from_belt(4, 0.5));
        let events = vec![event(EventType::Rift, [0, 200, 0, 0, 0], 10)];
        let (f, stats) = emitter.emit_era(&events, unit());
        // Rift radius = round(4 * 1.25) = 5, decay 0.5.
        assert_eq!(f.rift[10], 200);
        assert_eq!(f.rift[11], clamp_byte(200.0 * (-0.5f64).exp()));
        assert_eq!(f.rift[5], clamp_byte(200.0 * (-2.5f64).exp()));
        assert_eq!(f.rift[4], 0);
        assert_eq!(f.rift[16], 0);
        assert_eq!(f.boundary_type[10], Some(BoundaryType::Divergent));
        assert_eq!(f.rift_origin_plate[12], Some(PlateId(3)));
        assert_eq!(f.rift_origin_plate[20], None);
        assert_eq!(stats.visits, 11);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn zero_weight_skips_everything() {
        let mesh = ring(8);
        let mut emitter = FieldEmitter::new(&mesh, EmissionParams::from_belt(2, 0.5));
        let events = vec![event(EventType::Collision, [255; 5], 0)];
        let scaling = EraScaling {
            weight: 0.0,
            ..unit()
        };
        let (f, stats) = emitter.emit_era(&events, scaling);
        assert_eq!(stats.skipped, 1);
        assert!(f.uplift.iter().all(|&v| v == 0));
        assert!(f.boundary_type.iter().all(Option::is_none));
    }

    #[test]
    fn collision_fills_collision_split_only() {
        let mesh = ring(12);
        let mut emitter = FieldEmitter::new(&mesh, EmissionParams::from_belt(2, 0.55));
        let events = vec![event(EventType::Collision, [180, 0, 0, 0, 0], 6)];
        let (f, _) = emitter.emit_era(&events, unit());
        assert_eq!(f.collision[6], 180);
        assert_eq!(f.uplift[6], 180);
        assert!(f.subduction.iter().all(|&v| v == 0));
    }

    #[test]
    fn drift_displaces_seeds() {
        let mesh = ring(20);
        let mut emitter = FieldEmitter::new(&mesh, EmissionParams::from_belt(1, 0.55));
        let mut e = event(EventType::TransformShear, [0, 0, 100, 0, 0], 18);
        e.drift = DriftVector { u: 127, v: 0 };
        assert_eq!(emitter.drifted_seeds(&e, 3), vec![CellId(1)]);
        let scaling = EraScaling {
            drift_steps: 3,
            ..unit()
        };
        let (f, _) = emitter.emit_era(&[e], scaling);
        assert_eq!(f.shear[1], 100);
        assert_eq!(f.shear[18], 0);
        assert_eq!(f.boundary_drift[1], DriftVector { u: 127, v: 0 });
    }

    #[test]
    fn equal_events_resolve_by_type_then_index() {
        let mesh = ring(10);
        let mut emitter = FieldEmitter::new(&mesh, EmissionParams::from_belt(2, 0.55));
        let events = vec![
            event(EventType::IntraplateHotspot, [0, 0, 0, 90, 0], 4),
            event(EventType::Subduction, [0, 0, 0, 90, 0], 4),
            event(EventType::Subduction, [0, 0, 0, 90, 0], 4),
        ];
        let (f, _) = emitter.emit_era(&events, unit());
        assert_eq!(f.volcanism_event_type[4], Some(EventType::Subduction));
        assert_eq!(f.volcanism[4], 90);
    }
}
