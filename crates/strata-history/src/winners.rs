//! Per-cell winning event bookkeeping used while emitting an era.
//!
//! Each channel keeps, per cell, the candidate with the highest rank under
//! one explicit total order:
//!
//! 1. higher score,
//! 2. then higher scaled intensity,
//! 3. then lower event type priority,
//! 4. then lower event index.
//!
//! Scores at or below zero never win. The stored channel value is the
//! winning score rounded to a byte.

use std::cmp::{Ordering, Reverse};
use strata_core::{clamp_byte, CellId, Channel, EventType, PlateId};
use strata_mesh::Cost;

/// A slot tracked by [`ChannelWinners`]: the five channels plus the
/// collision and subduction split of uplift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WinnerSlot {
    /// One of the five driver channels.
    Channel(Channel),
    /// Uplift contributed by collision events.
    Collision,
    /// Uplift contributed by subduction events.
    Subduction,
}

impl WinnerSlot {
    const COUNT: usize = 7;

    fn index(self) -> usize {
        match self {
            Self::Channel(c) => c.index(),
            Self::Collision => 5,
            Self::Subduction => 6,
        }
    }
}

impl From<Channel> for WinnerSlot {
    fn from(c: Channel) -> Self {
        Self::Channel(c)
    }
}

/// One event's contribution at one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Decayed score.
    pub score: f64,
    /// Scaled event intensity on this channel.
    pub intensity: u8,
    /// Type of the contributing event.
    pub event_type: EventType,
    /// Index of the contributing event in the era's event list.
    pub event_index: u32,
}

impl Candidate {
    /// Sort key; a greater key wins.
    fn rank(&self) -> (Cost, u8, Reverse<u8>, Reverse<u32>) {
        (
            Cost(self.score),
            self.intensity,
            Reverse(self.event_type.priority()),
            Reverse(self.event_index),
        )
    }

    /// Returns `true` if `self` should replace `current`.
    pub fn beats(&self, current: Option<&Candidate>) -> bool {
        if !(self.score > 0.0) {
            return false;
        }
        match current {
            None => true,
            Some(cur) => self.rank().cmp(&cur.rank()) == Ordering::Greater,
        }
    }
}

#[derive(Clone, Debug)]
struct SlotBuffer {
    winners: Vec<Option<Candidate>>,
    values: Vec<u8>,
}

impl SlotBuffer {
    fn new(cell_count: usize) -> Self {
        Self {
            winners: vec![None; cell_count],
            values: vec![0; cell_count],
        }
    }
}

/// Winner tables for every slot of one era, plus the side bands that
/// follow a winner (uplift polarity and origin plates).
#[derive(Clone, Debug)]
pub struct ChannelWinners {
    slots: [SlotBuffer; WinnerSlot::COUNT],
    uplift_polarity: Vec<i8>,
    rift_origin_plate: Vec<Option<PlateId>>,
    volcanism_origin_plate: Vec<Option<PlateId>>,
}

impl ChannelWinners {
    /// Empty tables for `cell_count` cells.
    pub fn new(cell_count: usize) -> Self {
        Self {
            slots: std::array::from_fn(|_| SlotBuffer::new(cell_count)),
            uplift_polarity: vec![0; cell_count],
            rift_origin_plate: vec![None; cell_count],
            volcanism_origin_plate: vec![None; cell_count],
        }
    }

    /// Offer `candidate` for `slot` at `cell`. Returns `true` if it won.
    pub fn update_channel(
        &mut self,
        slot: impl Into<WinnerSlot>,
        cell: CellId,
        candidate: Candidate,
    ) -> bool {
        let buf = &mut self.slots[slot.into().index()];
        let i = cell.index();
        if !candidate.beats(buf.winners[i].as_ref()) {
            return false;
        }
        buf.winners[i] = Some(candidate);
        buf.values[i] = clamp_byte(candidate.score);
        true
    }

    /// Record the polarity of a new uplift winner.
    pub fn set_uplift_polarity(&mut self, cell: CellId, polarity: i8) {
        self.uplift_polarity[cell.index()] = polarity;
    }

    /// Record the origin plate of a new rift winner.
    pub fn set_rift_origin(&mut self, cell: CellId, plate: Option<PlateId>) {
        self.rift_origin_plate[cell.index()] = plate;
    }

    /// Record the origin plate of a new volcanism winner.
    pub fn set_volcanism_origin(&mut self, cell: CellId, plate: Option<PlateId>) {
        self.volcanism_origin_plate[cell.index()] = plate;
    }

    /// Current winner for `slot` at `cell`.
    pub fn winner(&self, slot: impl Into<WinnerSlot>, cell: CellId) -> Option<&Candidate> {
        self.slots[slot.into().index()].winners[cell.index()].as_ref()
    }

    /// Byte values of `slot`.
    pub fn values(&self, slot: impl Into<WinnerSlot>) -> &[u8] {
        &self.slots[slot.into().index()].values
    }

    /// Move the byte values of `slot` out, leaving zeros.
    pub(crate) fn take_values(&mut self, slot: impl Into<WinnerSlot>) -> Vec<u8> {
        let buf = &mut self.slots[slot.into().index()];
        let zeros = vec![0; buf.values.len()];
        std::mem::replace(&mut buf.values, zeros)
    }

    /// Uplift polarity per cell.
    pub fn uplift_polarity(&self) -> &[i8] {
        &self.uplift_polarity
    }

    /// Move the side bands out: `(rift_origin, volcanism_origin)`.
    pub(crate) fn take_origins(&mut self) -> (Vec<Option<PlateId>>, Vec<Option<PlateId>>) {
        (
            std::mem::take(&mut self.rift_origin_plate),
            std::mem::take(&mut self.volcanism_origin_plate),
        )
    }
}
