//! Content fingerprints of produced artifacts.
//!
//! FNV-1a over the encoded form of every array, with each array's ordinal
//! folded in at its boundary so that moving bytes between arrays changes
//! the hash. Not cryptographic; used for determinism checks and cache
//! keys.

use crate::encode::{EncodedEra, EncodedHistory, EncodedProvenance};
use crate::provenance::TectonicProvenance;
use crate::rollups::TectonicHistory;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// Incremental FNV-1a 64 state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fingerprint {
    hash: u64,
    arrays: u32,
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}

impl Fingerprint {
    /// Fresh state at the offset basis.
    pub fn new() -> Self {
        Self {
            hash: FNV_OFFSET,
            arrays: 0,
        }
    }

    #[inline]
    fn byte(&mut self, b: u8) {
        self.hash = (self.hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }

    fn bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.byte(b);
        }
    }

    fn begin_array(&mut self, len: usize) {
        let ordinal = self.arrays.to_le_bytes();
        self.bytes(&ordinal);
        self.bytes(&(len as u64).to_le_bytes());
        self.arrays += 1;
    }

    /// Feed a byte array.
    pub fn u8s(&mut self, values: &[u8]) -> &mut Self {
        self.begin_array(values.len());
        self.bytes(values);
        self
    }

    /// Feed a signed byte array.
    pub fn i8s(&mut self, values: &[i8]) -> &mut Self {
        self.begin_array(values.len());
        for &v in values {
            self.byte(v as u8);
        }
        self
    }

    /// Feed an `i16` array as little-endian bytes.
    pub fn i16s(&mut self, values: &[i16]) -> &mut Self {
        self.begin_array(values.len());
        for v in values {
            self.bytes(&v.to_le_bytes());
        }
        self
    }

    /// Feed a `u32` array as little-endian bytes.
    pub fn u32s(&mut self, values: &[u32]) -> &mut Self {
        self.begin_array(values.len());
        for v in values {
            self.bytes(&v.to_le_bytes());
        }
        self
    }

    /// The hash so far.
    pub fn finish(&self) -> u64 {
        self.hash
    }

    fn era(&mut self, encoded: &EncodedEra) -> &mut Self {
        self.u8s(&encoded.boundary_type)
            .i8s(&encoded.boundary_drift_u)
            .i8s(&encoded.boundary_drift_v)
            .i16s(&encoded.rift_origin_plate)
            .i16s(&encoded.volcanism_origin_plate)
            .u8s(&encoded.volcanism_event_type)
    }

    /// Feed every array of a history.
    pub fn history(&mut self, history: &TectonicHistory) -> &mut Self {
        let encoded = EncodedHistory::from(history);
        self.u32s(&[history.era_count as u32]);
        for (fields, enc) in history.eras.iter().zip(&encoded.eras) {
            self.u8s(&fields.uplift)
                .u8s(&fields.collision)
                .u8s(&fields.subduction)
                .u8s(&fields.rift)
                .u8s(&fields.shear)
                .u8s(&fields.volcanism)
                .u8s(&fields.fracture)
                .i8s(&fields.boundary_polarity)
                .u8s(&fields.boundary_intensity)
                .era(enc);
        }
        for plates in &encoded.plate_id_by_era {
            self.i16s(plates);
        }
        self.u8s(&history.uplift_total)
            .u8s(&history.collision_total)
            .u8s(&history.subduction_total)
            .u8s(&history.fracture_total)
            .u8s(&history.volcanism_total)
            .u8s(&history.uplift_recent_fraction)
            .u8s(&history.collision_recent_fraction)
            .u8s(&history.subduction_recent_fraction)
            .u8s(&encoded.last_active_era)
            .u8s(&encoded.last_collision_era)
            .u8s(&encoded.last_subduction_era)
    }

    /// Feed every array of a provenance.
    pub fn provenance(&mut self, provenance: &TectonicProvenance) -> &mut Self {
        let e = EncodedProvenance::from(provenance);
        self.u32s(&[e.version, e.era_count, e.cell_count]);
        for tracer in &e.tracer_index {
            self.u32s(tracer);
        }
        self.u8s(&e.origin_era)
            .i16s(&e.origin_plate_id)
            .u8s(&e.last_boundary_era)
            .u8s(&e.last_boundary_type)
            .i8s(&e.last_boundary_polarity)
            .u8s(&e.last_boundary_intensity)
            .u8s(&e.crust_age)
    }
}

/// Fingerprint of a history alone.
pub fn history_fingerprint(history: &TectonicHistory) -> u64 {
    Fingerprint::new().history(history).finish()
}

/// Fingerprint of a provenance alone.
pub fn provenance_fingerprint(provenance: &TectonicProvenance) -> u64 {
    Fingerprint::new().provenance(provenance).finish()
}
