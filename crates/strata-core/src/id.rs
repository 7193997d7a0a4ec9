//! Strongly-typed identifiers for mesh cells, plates, and eras.
//!
//! Upstream artifacts encode these as raw integers with sentinel values
//! (`-1` for an unknown plate, `255` for "no era"). Inside the core they
//! are always wrapped in these newtypes, and absence is expressed with
//! `Option`. Sentinel encoding only happens at the serialization edge.

use std::fmt;

/// Index of a cell in the world mesh.
///
/// `CellId(n)` addresses the n-th entry of every per-cell array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    /// The cell index as a `usize`, for slice indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a tectonic plate.
///
/// Plate ids are assigned by the upstream plate graph. They fit in the
/// positive half of an `i16` so that the serialized form can reserve `-1`
/// for "unknown plate".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlateId(pub u16);

impl PlateId {
    /// Largest id representable in the `i16` serialized form.
    pub const MAX: PlateId = PlateId(i16::MAX as u16);

    /// Decode an `i16` sentinel-encoded plate id (`< 0` means none).
    pub fn from_encoded(raw: i16) -> Option<Self> {
        u16::try_from(raw).ok().map(Self)
    }

    /// Encode an optional plate id as `i16`, with `-1` for none.
    ///
    /// Ids above [`PlateId::MAX`] saturate. Plate graphs reject such ids
    /// on construction, so run outputs never reach this case.
    pub fn encode(id: Option<Self>) -> i16 {
        match id {
            Some(p) => p.0.min(Self::MAX.0) as i16,
            None => -1,
        }
    }
}

impl fmt::Display for PlateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for PlateId {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Position of an era in the ordered era sequence (0 = oldest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EraIndex(pub u8);

impl EraIndex {
    /// Sentinel written for "never" at the serialization edge.
    pub const NONE_ENCODED: u8 = u8::MAX;

    /// The era index as a `usize`, for slice indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Encode an optional era as `u8`, with `255` for none.
    pub fn encode(era: Option<Self>) -> u8 {
        era.map_or(Self::NONE_ENCODED, |e| e.0)
    }

    /// Decode a `u8` sentinel-encoded era.
    pub fn from_encoded(raw: u8) -> Option<Self> {
        (raw != Self::NONE_ENCODED).then_some(Self(raw))
    }
}

impl fmt::Display for EraIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for EraIndex {
    fn from(v: u8) -> Self {
        Self(v)
    }
}
