//! Saturating fixed-point helpers.
//!
//! Every per-cell output is a byte (`0..=255`) or a signed byte restricted
//! to `-127..=127`. These helpers perform the rounding and clamping; there
//! are no overflow errors anywhere in the pipeline.

/// Round and clamp to `0..=255`.
///
/// `+inf` maps to 255; NaN and `-inf` map to 0.
#[inline]
pub fn clamp_byte(value: f64) -> u8 {
    if value == f64::INFINITY {
        return u8::MAX;
    }
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Round half up and clamp to the symmetric signed range `-127..=127`.
///
/// Halves round toward `+inf`, so `-2.5` becomes `-2`. `+inf`/`-inf`
/// saturate; NaN maps to 0.
#[inline]
pub fn clamp_i8(value: f64) -> i8 {
    if value.is_nan() {
        return 0;
    }
    (value + 0.5).floor().clamp(-127.0, 127.0) as i8
}

/// Clamp to `[0, 1]`, mapping non-finite values to 0.
#[inline]
pub fn clamp01(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// `part / total` scaled to a byte, or 0 when `total` is 0.
#[inline]
pub fn byte_fraction(part: u8, total: u8) -> u8 {
    if total == 0 {
        return 0;
    }
    clamp_byte(part as f64 / total as f64 * 255.0)
}
