//! Quantized 2D drift directions.

use crate::quantize::clamp_i8;

/// A direction quantized to signed bytes in `-127..=127` per axis.
///
/// Unit vectors are stored scaled by 127; the zero vector means
/// "no drift". Used for event drift, boundary drift, and mantle drift.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DriftVector {
    /// X component (scaled by 127).
    pub u: i8,
    /// Y component (scaled by 127).
    pub v: i8,
}

impl DriftVector {
    /// Scale of a unit vector component.
    pub const SCALE: f64 = 127.0;

    /// The zero vector.
    pub const ZERO: DriftVector = DriftVector { u: 0, v: 0 };

    /// Build from raw components, clamping each to `-127..=127`.
    pub fn new(u: i32, v: i32) -> Self {
        Self {
            u: clamp_i8(u as f64),
            v: clamp_i8(v as f64),
        }
    }

    /// Normalize an arbitrary vector and quantize it.
    ///
    /// Vectors shorter than `1e-9` (or non-finite) become [`DriftVector::ZERO`].
    pub fn from_vector(x: f64, y: f64) -> Self {
        let len = (x * x + y * y).sqrt();
        if !len.is_finite() || len <= 1e-9 {
            return Self::ZERO;
        }
        Self {
            u: clamp_i8(x / len * Self::SCALE),
            v: clamp_i8(y / len * Self::SCALE),
        }
    }

    /// Returns `true` when both components are zero.
    pub fn is_zero(self) -> bool {
        self.u == 0 && self.v == 0
    }

    /// The same direction with both components negated.
    pub fn reversed(self) -> Self {
        Self {
            u: self.u.saturating_neg(),
            v: self.v.saturating_neg(),
        }
    }

    /// Components divided by [`DriftVector::SCALE`].
    pub fn unit(self) -> (f64, f64) {
        (self.u as f64 / Self::SCALE, self.v as f64 / Self::SCALE)
    }
}
