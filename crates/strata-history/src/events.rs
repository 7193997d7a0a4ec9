//! Typed tectonic events for one era.
//!
//! Boundary segments become subduction, collision, rift, or transform
//! events; upwelling mantle cells become intraplate hotspots. Events carry
//! raw intensities; era weight and orogeny gain are applied at emission.

use crate::inputs::{CrustTypes, MantleForcing, TectonicSegments};
use crate::membership::PlateMembership;
use smallvec::smallvec;
use strata_core::{
    clamp_byte, BoundaryType, CellId, Channel, DriftVector, EventType, PlateId, SeedCells,
};

/// Share of hotspot intensity that becomes uplift.
pub const HOTSPOT_UPLIFT_SHARE: f64 = 0.45;
/// Share of hotspot intensity that becomes fracture.
pub const HOTSPOT_FRACTURE_SHARE: f64 = 0.35;
/// Hotspot intensity at zero stress, as a fraction of full forcing.
pub const HOTSPOT_BASE_RESPONSE: f64 = 0.6;
/// Additional hotspot intensity at full stress.
pub const HOTSPOT_STRESS_RESPONSE: f64 = 0.4;

/// A discrete boundary or hotspot occurrence in one era.
///
/// Immutable once built. The event's position in the era's event list is
/// its index, the last tie-break when two events score identically.
#[derive(Clone, Debug, PartialEq)]
pub struct TectonicEvent {
    /// Event classification.
    pub event_type: EventType,
    /// Plate on the A side, if known.
    pub plate_a: Option<PlateId>,
    /// Plate on the B side, if known.
    pub plate_b: Option<PlateId>,
    /// Subduction polarity (`-1`, `0`, `+1`); always 0 for non-subduction.
    pub polarity: i8,
    /// Raw intensities indexed by [`Channel::index`].
    pub intensity: [u8; 5],
    /// Quantized drift direction.
    pub drift: DriftVector,
    /// Seed cells the event emits from.
    pub seeds: SeedCells,
    /// Plate credited as the origin of crust this event creates.
    pub origin_plate: Option<PlateId>,
}

impl TectonicEvent {
    /// Raw intensity on `channel`.
    #[inline]
    pub fn intensity(&self, channel: Channel) -> u8 {
        self.intensity[channel.index()]
    }
}

fn channels(uplift: u8, rift: u8, shear: u8, volcanism: u8, fracture: u8) -> [u8; 5] {
    let mut out = [0u8; 5];
    out[Channel::Uplift.index()] = uplift;
    out[Channel::Rift.index()] = rift;
    out[Channel::Shear.index()] = shear;
    out[Channel::Volcanism.index()] = volcanism;
    out[Channel::Fracture.index()] = fracture;
    out
}

/// Build one event per segment whose regime is set.
///
/// Convergent segments are collisions when both adjoining cells are
/// continental, otherwise subductions. Seed cells outside the mesh are
/// dropped.
pub fn boundary_events(
    cell_count: usize,
    crust: &CrustTypes,
    segments: &TectonicSegments,
) -> Vec<TectonicEvent> {
    let mut events = Vec::with_capacity(segments.len());
    for seg in &segments.segments {
        let Some(regime) = seg.regime else {
            continue;
        };
        let in_mesh = |c: CellId| c.index() < cell_count;

        let (event_type, polarity, intensity) = match regime {
            BoundaryType::Convergent => {
                let continental = |c: CellId| in_mesh(c) && crust.get(c).is_continental();
                if continental(seg.a_cell) && continental(seg.b_cell) {
                    (
                        EventType::Collision,
                        0,
                        channels(seg.compression, 0, 0, seg.volcanism, seg.fracture),
                    )
                } else {
                    (
                        EventType::Subduction,
                        seg.polarity.signum(),
                        channels(seg.compression, 0, 0, seg.volcanism, seg.fracture),
                    )
                }
            }
            BoundaryType::Divergent => (
                EventType::Rift,
                0,
                channels(0, seg.extension, 0, seg.volcanism, seg.fracture),
            ),
            BoundaryType::Transform => (
                EventType::TransformShear,
                0,
                channels(0, 0, seg.shear, 0, seg.fracture),
            ),
        };

        let origin_plate = match event_type {
            EventType::Subduction => match polarity {
                p if p < 0 => seg.plate_b,
                p if p > 0 => seg.plate_a,
                _ => None,
            },
            EventType::Collision | EventType::Rift => min_plate(seg.plate_a, seg.plate_b),
            _ => None,
        };

        let seeds: SeedCells = if seg.a_cell == seg.b_cell {
            smallvec![seg.a_cell]
        } else {
            smallvec![seg.a_cell, seg.b_cell]
        };

        events.push(TectonicEvent {
            event_type,
            plate_a: seg.plate_a,
            plate_b: seg.plate_b,
            polarity,
            intensity,
            drift: seg.drift,
            seeds: seeds.into_iter().filter(|&c| in_mesh(c)).collect(),
            origin_plate,
        });
    }
    events
}

/// Smaller of two plate ids; an unknown plate sorts below every known one.
fn min_plate(a: Option<PlateId>, b: Option<PlateId>) -> Option<PlateId> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        _ => None,
    }
}

/// One hotspot event per upwelling cell with forcing above `forcing_floor`.
///
/// Intensity is `byte(forcing * (0.6 + 0.4 * stress) * 255)`; uplift and
/// fracture are fixed shares of it. The origin plate is the era's owner of
/// the hotspot cell. Forcing arrays shorter than `upwelling_class` read as
/// zero past their end.
pub fn hotspot_events(
    mantle: &MantleForcing,
    membership: &PlateMembership,
    forcing_floor: f64,
) -> Vec<TectonicEvent> {
    let mut events = Vec::new();
    for i in 0..mantle.upwelling_class.len() {
        let cell = CellId(i as u32);
        if !mantle.is_upwelling(cell) {
            continue;
        }
        let forcing = mantle.magnitude(cell);
        if forcing <= forcing_floor {
            continue;
        }
        let stress = mantle.stress(cell);
        let base = clamp_byte(
            forcing * (HOTSPOT_BASE_RESPONSE + HOTSPOT_STRESS_RESPONSE * stress) * 255.0,
        );
        if base == 0 {
            continue;
        }
        events.push(TectonicEvent {
            event_type: EventType::IntraplateHotspot,
            plate_a: None,
            plate_b: None,
            polarity: 0,
            intensity: channels(
                clamp_byte(base as f64 * HOTSPOT_UPLIFT_SHARE),
                0,
                0,
                base,
                clamp_byte(base as f64 * HOTSPOT_FRACTURE_SHARE),
            ),
            drift: mantle.drift(cell),
            seeds: smallvec![cell],
            origin_plate: membership.get(cell),
        });
    }
    events
}

/// All events of one era: boundary events first, then hotspots.
pub fn era_events(
    cell_count: usize,
    crust: &CrustTypes,
    segments: &TectonicSegments,
    mantle: &MantleForcing,
    membership: &PlateMembership,
    forcing_floor: f64,
) -> Vec<TectonicEvent> {
    let mut events = boundary_events(cell_count, crust, segments);
    events.extend(hotspot_events(mantle, membership, forcing_floor));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::Segment;
    use strata_core::CrustKind;

    fn seg(regime: Option<BoundaryType>, a: u32, b: u32) -> Segment {
        Segment {
            plate_a: Some(PlateId(4)),
            plate_b: Some(PlateId(2)),
            compression: 200,
            extension: 150,
            shear: 90,
            volcanism: 60,
            fracture: 30,
            drift: DriftVector { u: 127, v: 0 },
            ..Segment::between(regime, CellId(a), CellId(b))
        }
    }

    fn crust(kinds: &[CrustKind]) -> CrustTypes {
        CrustTypes::new(kinds.to_vec())
    }

    #[test]
    fn collision_needs_two_continents() {
        use CrustKind::*;
        let segments = TectonicSegments::new(vec![
            Segment { polarity: 1, ..seg(Some(BoundaryType::Convergent), 0, 1) },
            Segment { polarity: 1, ..seg(Some(BoundaryType::Convergent), 1, 2) },
        ]);
        let events = boundary_events(3, &crust(&[Continental, Continental, Oceanic]), &segments);
        assert_eq!(events[0].event_type, EventType::Collision);
        assert_eq!(events[0].polarity, 0);
        assert_eq!(events[0].origin_plate, Some(PlateId(2)));
        assert_eq!(events[0].intensity(Channel::Uplift), 200);
        assert_eq!(events[0].intensity(Channel::Rift), 0);

        assert_eq!(events[1].event_type, EventType::Subduction);
        assert_eq!(events[1].polarity, 1);
        assert_eq!(events[1].origin_plate, Some(PlateId(4)));
    }

    #[test]
    fn subduction_origin_follows_polarity() {
        let mut s = seg(Some(BoundaryType::Convergent), 0, 1);
        let oceanic = crust(&[CrustKind::Oceanic; 2]);
        s.polarity = -1;
        let e = boundary_events(2, &oceanic, &TectonicSegments::new(vec![s.clone()]));
        assert_eq!(e[0].origin_plate, Some(PlateId(2)));
        s.polarity = 0;
        let e = boundary_events(2, &oceanic, &TectonicSegments::new(vec![s]));
        assert_eq!(e[0].origin_plate, None);
    }

    #[test]
    fn regimes_pick_their_channels() {
        let segments = TectonicSegments::new(vec![
            seg(None, 0, 1),
            seg(Some(BoundaryType::Divergent), 0, 1),
            seg(Some(BoundaryType::Transform), 1, 1),
        ]);
        let events = boundary_events(2, &crust(&[CrustKind::Oceanic; 2]), &segments);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::Rift);
        assert_eq!(events[0].intensity, [0, 150, 0, 60, 30]);
        assert_eq!(events[0].origin_plate, Some(PlateId(2)));
        assert_eq!(events[1].event_type, EventType::TransformShear);
        assert_eq!(events[1].intensity, [0, 0, 90, 0, 30]);
        assert_eq!(events[1].seeds.as_slice(), &[CellId(1)]);
        assert_eq!(events[1].origin_plate, None);
    }

    #[test]
    fn out_of_mesh_seeds_are_dropped() {
        let segments = TectonicSegments::new(vec![seg(Some(BoundaryType::Divergent), 1, 9)]);
        let events = boundary_events(2, &crust(&[]), &segments);
        assert_eq!(events[0].seeds.as_slice(), &[CellId(1)]);
    }

    #[test]
    fn hotspot_intensity_and_origin() {
        let mut mantle = MantleForcing::quiet(3);
        mantle.upwelling_class[1] = 1;
        mantle.forcing_mag[1] = 1.0;
        mantle.forcing_v[1] = 0.5;
        // Upwelling but no forcing: skipped.
        mantle.upwelling_class[2] = 1;
        let membership = PlateMembership::new(vec![None, Some(PlateId(6)), None]);

        let events = hotspot_events(&mantle, &membership, 0.0);
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.event_type, EventType::IntraplateHotspot);
        // 255 * 0.6 = 153.
        assert_eq!(e.intensity(Channel::Volcanism), 153);
        assert_eq!(e.intensity(Channel::Uplift), 69);
        assert_eq!(e.intensity(Channel::Fracture), 54);
        assert_eq!(e.drift, DriftVector { u: 0, v: 127 });
        assert_eq!(e.origin_plate, Some(PlateId(6)));
        assert_eq!(e.seeds.as_slice(), &[CellId(1)]);
    }

    #[test]
    fn hotspots_tolerate_ragged_forcing() {
        let mantle = MantleForcing {
            upwelling_class: vec![1, 1, 1, 1],
            forcing_u: vec![],
            forcing_v: vec![1.0],
            forcing_mag: vec![1.0, 1.0],
            stress: vec![1.0],
        };
        let membership = PlateMembership::new(vec![Some(PlateId(3))]);

        let events = hotspot_events(&mantle, &membership, 0.0);
        let seeds: Vec<CellId> = events.iter().map(|e| e.seeds[0]).collect();
        assert_eq!(seeds, vec![CellId(0), CellId(1)]);
        assert_eq!(events[0].intensity(Channel::Volcanism), 255);
        assert_eq!(events[0].drift, DriftVector { u: 0, v: 127 });
        assert_eq!(events[1].drift, DriftVector::ZERO);
        assert_eq!(events[1].origin_plate, None);
    }

    #[test]
    fn hotspot_floor_is_exclusive() {
        let mut mantle = MantleForcing::quiet(1);
        mantle.upwelling_class[0] = 2;
        mantle.forcing_mag[0] = 0.5;
        let membership = PlateMembership::new(vec![None]);
        assert!(hotspot_events(&mantle, &membership, 0.5).is_empty());
        assert_eq!(hotspot_events(&mantle, &membership, 0.4).len(), 1);
    }
}
