//! Finalized per-era fields.

use crate::events::TectonicEvent;
use crate::winners::{ChannelWinners, WinnerSlot};
use strata_core::{BoundaryType, CellId, Channel, DriftVector, EventType, PlateId};

/// Driver fields and derived boundary classification for one era.
///
/// All arrays have one entry per mesh cell. Produced once by
/// [`FieldEmitter`](crate::FieldEmitter) and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EraFields {
    /// Orogenic uplift potential.
    pub uplift: Vec<u8>,
    /// Uplift contributed by collision events.
    pub collision: Vec<u8>,
    /// Uplift contributed by subduction events.
    pub subduction: Vec<u8>,
    /// Rift potential.
    pub rift: Vec<u8>,
    /// Shear stress.
    pub shear: Vec<u8>,
    /// Volcanism.
    pub volcanism: Vec<u8>,
    /// Fracturing.
    pub fracture: Vec<u8>,
    /// Dominant boundary regime, `None` away from boundaries.
    pub boundary_type: Vec<Option<BoundaryType>>,
    /// Subduction polarity of convergent cells, 0 elsewhere.
    pub boundary_polarity: Vec<i8>,
    /// Largest of the five channel values.
    pub boundary_intensity: Vec<u8>,
    /// Drift of the event that decided the boundary type.
    pub boundary_drift: Vec<DriftVector>,
    /// Origin plate of the winning rift event.
    pub rift_origin_plate: Vec<Option<PlateId>>,
    /// Origin plate of the winning volcanism event.
    pub volcanism_origin_plate: Vec<Option<PlateId>>,
    /// Type of the winning volcanism event.
    pub volcanism_event_type: Vec<Option<EventType>>,
}

impl EraFields {
    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.uplift.len()
    }

    /// Values of one of the five driver channels.
    pub fn channel(&self, channel: Channel) -> &[u8] {
        match channel {
            Channel::Uplift => &self.uplift,
            Channel::Rift => &self.rift,
            Channel::Shear => &self.shear,
            Channel::Volcanism => &self.volcanism,
            Channel::Fracture => &self.fracture,
        }
    }

    /// Largest driver channel value at `cell`.
    pub fn peak(&self, cell: CellId) -> u8 {
        Channel::ALL
            .iter()
            .map(|&c| self.channel(c)[cell.index()])
            .max()
            .unwrap_or(0)
    }

    /// Resolve the winner tables of an emitted era into final fields.
    ///
    /// A cell is a boundary when any of uplift, rift, or shear has a winner.
    /// The regime is uplift unless rift beats it on `(score, value)`, and
    /// then shear likewise against the current choice, so uplift wins ties
    /// over rift and rift over shear.
    pub fn from_winners(mut winners: ChannelWinners, events: &[TectonicEvent]) -> Self {
        let cell_count = winners.values(Channel::Uplift).len();
        let mut boundary_type = vec![None; cell_count];
        let mut boundary_polarity = vec![0i8; cell_count];
        let mut boundary_intensity = vec![0u8; cell_count];
        let mut boundary_drift = vec![DriftVector::ZERO; cell_count];
        let mut volcanism_event_type = vec![None; cell_count];

        for i in 0..cell_count {
            let cell = CellId(i as u32);
            boundary_intensity[i] = Channel::ALL
                .iter()
                .map(|&c| winners.values(c)[i])
                .max()
                .unwrap_or(0);
            volcanism_event_type[i] = winners.winner(Channel::Volcanism, cell).map(|w| w.event_type);

            let contender = |ch: Channel| {
                winners
                    .winner(ch, cell)
                    .map(|w| (w.score, winners.values(ch)[i], w.event_index))
            };
            let (uplift, rift, shear) = (
                contender(Channel::Uplift),
                contender(Channel::Rift),
                contender(Channel::Shear),
            );
            let mut best = match (uplift, rift, shear) {
                (None, None, None) => continue,
                _ => (BoundaryType::Convergent, uplift),
            };
            for (regime, challenger) in [(BoundaryType::Divergent, rift), (BoundaryType::Transform, shear)] {
                if outranks(challenger, best.1) {
                    best = (regime, challenger);
                }
            }

            let (regime, winner) = best;
            boundary_type[i] = Some(regime);
            if regime == BoundaryType::Convergent {
                boundary_polarity[i] = winners.uplift_polarity()[i];
            }
            if let Some(event) = winner.and_then(|(_, _, idx)| events.get(idx as usize)) {
                boundary_drift[i] = event.drift;
            }
        }

        let (rift_origin_plate, volcanism_origin_plate) = winners.take_origins();
        Self {
            uplift: winners.take_values(Channel::Uplift),
            collision: winners.take_values(WinnerSlot::Collision),
            subduction: winners.take_values(WinnerSlot::Subduction),
            rift: winners.take_values(Channel::Rift),
            shear: winners.take_values(Channel::Shear),
            volcanism: winners.take_values(Channel::Volcanism),
            fracture: winners.take_values(Channel::Fracture),
            boundary_type,
            boundary_polarity,
            boundary_intensity,
            boundary_drift,
            rift_origin_plate,
            volcanism_origin_plate,
            volcanism_event_type,
        }
    }
}

#[cfg(test)]
impl EraFields {
    /// All-zero fields with no boundaries.
    pub(crate) fn blank(cell_count: usize) -> Self {
        Self {
            uplift: vec![0; cell_count],
            collision: vec![0; cell_count],
            subduction: vec![0; cell_count],
            rift: vec![0; cell_count],
            shear: vec![0; cell_count],
            volcanism: vec![0; cell_count],
            fracture: vec![0; cell_count],
            boundary_type: vec![None; cell_count],
            boundary_polarity: vec![0; cell_count],
            boundary_intensity: vec![0; cell_count],
            boundary_drift: vec![DriftVector::ZERO; cell_count],
            rift_origin_plate: vec![None; cell_count],
            volcanism_origin_plate: vec![None; cell_count],
            volcanism_event_type: vec![None; cell_count],
        }
    }
}

/// `(score, value, event)` of a boundary contender; absent contenders
/// rank below any present one.
type Contender = Option<(f64, u8, u32)>;

fn outranks(challenger: Contender, current: Contender) -> bool {
    match (challenger, current) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some((s, v, _)), Some((bs, bv, _))) => s > bs || (s == bs && v > bv),
    }
}
