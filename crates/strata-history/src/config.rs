//! History configuration and validation.
//!
//! [`HistoryConfig`] is the single input describing how eras are weighted
//! and how far emitted signals travel. [`validate()`](HistoryConfig::validate)
//! checks every invariant up front; the pipeline refuses to run on an
//! invalid configuration.

use strata_core::{ConfigError, ERA_COUNT_MAX, ERA_COUNT_MIN};

/// Largest accepted drift step count for a single era.
pub const MAX_DRIFT_STEPS: u32 = 16;
/// Largest accepted per-era weight.
pub const MAX_ERA_WEIGHT: f64 = 10.0;
/// Inclusive bounds on `belt_influence_distance`.
pub const BELT_INFLUENCE_RANGE: (u32, u32) = (1, 64);
/// Inclusive bounds on `belt_decay`.
pub const BELT_DECAY_RANGE: (f64, f64) = (0.01, 10.0);

// ── ResetConfig ────────────────────────────────────────────────────

/// Per-era provenance reset calibration.
///
/// Each era derives its reset thresholds from the strongest signal it
/// actually emitted: `threshold = max(min(max, floor), round(max * frac))`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResetConfig {
    /// Fraction of the era's peak divergent rift potential. Default: 0.6.
    pub rift_fraction: f64,
    /// Fraction of the era's peak subduction-arc volcanism. Default: 0.75.
    pub arc_fraction: f64,
    /// Fraction of the era's peak intraplate hotspot volcanism. Default: 0.8.
    pub hotspot_fraction: f64,
    /// Smallest threshold, bounded by the era's peak. Default: 1.
    pub floor: u8,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            rift_fraction: 0.6,
            arc_fraction: 0.75,
            hotspot_fraction: 0.8,
            floor: 1,
        }
    }
}

impl ResetConfig {
    /// Check that every fraction lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("rift_fraction", self.rift_fraction),
            ("arc_fraction", self.arc_fraction),
            ("hotspot_fraction", self.hotspot_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidResetFraction { name, value });
            }
        }
        Ok(())
    }
}

// ── HistoryConfig ──────────────────────────────────────────────────

/// Configuration for one tectonic history run.
///
/// `era_weights` and `drift_steps_by_era` are indexed oldest to newest and
/// their common length is the era count.
///
/// # Examples
///
/// ```
/// use strata_history::HistoryConfig;
///
/// let config = HistoryConfig::default();
/// assert_eq!(config.validate(), Ok(()));
/// assert_eq!(config.era_count(), 5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryConfig {
    /// Intensity multiplier per era. Default: `[0.3, 0.25, 0.2, 0.15, 0.1]`.
    pub era_weights: Vec<f64>,
    /// Drift steps per era, used both for membership seed advection and
    /// event seed displacement. Default: `[12, 9, 6, 3, 1]`.
    pub drift_steps_by_era: Vec<u32>,
    /// Base emission radius in normalized mesh steps. Default: 8.
    pub belt_influence_distance: u32,
    /// Base exponential decay per normalized mesh step. Default: 0.55.
    pub belt_decay: f64,
    /// Channel values strictly above this count as activity. Default: 1.
    pub activity_threshold: u8,
    /// Hotspots need forcing magnitude strictly above this. Default: 0.
    pub hotspot_forcing_floor: f64,
    /// Provenance reset calibration.
    pub reset: ResetConfig,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            era_weights: vec![0.3, 0.25, 0.2, 0.15, 0.1],
            drift_steps_by_era: vec![12, 9, 6, 3, 1],
            belt_influence_distance: 8,
            belt_decay: 0.55,
            activity_threshold: 1,
            hotspot_forcing_floor: 0.0,
            reset: ResetConfig::default(),
        }
    }
}

impl HistoryConfig {
    /// Number of eras (length of `era_weights`).
    pub fn era_count(&self) -> usize {
        self.era_weights.len()
    }

    /// Check structural invariants.
    ///
    /// Called by the pipeline before any computation begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = self.era_weights.len();
        let drift_steps = self.drift_steps_by_era.len();
        if weights != drift_steps {
            return Err(ConfigError::EraLengthMismatch {
                weights,
                drift_steps,
            });
        }
        if !(ERA_COUNT_MIN..=ERA_COUNT_MAX).contains(&weights) {
            return Err(ConfigError::EraCountOutOfRange { count: weights });
        }
        for (era, &value) in self.era_weights.iter().enumerate() {
            if !(0.0..=MAX_ERA_WEIGHT).contains(&value) {
                return Err(ConfigError::InvalidEraWeight { era, value });
            }
        }
        for (era, &value) in self.drift_steps_by_era.iter().enumerate() {
            if value > MAX_DRIFT_STEPS {
                return Err(ConfigError::DriftStepsTooLarge {
                    era,
                    value,
                    max: MAX_DRIFT_STEPS,
                });
            }
        }
        let (lo, hi) = BELT_INFLUENCE_RANGE;
        if !(lo..=hi).contains(&self.belt_influence_distance) {
            return Err(ConfigError::InvalidBeltInfluence {
                value: self.belt_influence_distance,
            });
        }
        let (lo, hi) = BELT_DECAY_RANGE;
        if !(lo..=hi).contains(&self.belt_decay) {
            return Err(ConfigError::InvalidBeltDecay {
                value: self.belt_decay,
            });
        }
        if !(0.0..=1.0).contains(&self.hotspot_forcing_floor) {
            return Err(ConfigError::InvalidHotspotFloor {
                value: self.hotspot_forcing_floor,
            });
        }
        self.reset.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_eras(n: usize) -> HistoryConfig {
        HistoryConfig {
            era_weights: vec![0.2; n],
            drift_steps_by_era: vec![2; n],
            ..HistoryConfig::default()
        }
    }

    #[test]
    fn default_is_valid() {
        let c = HistoryConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.era_count(), 5);
    }

    #[test]
    fn era_count_bounds() {
        for n in 5..=8 {
            assert!(with_eras(n).validate().is_ok(), "{n} eras should be valid");
        }
        assert_eq!(
            with_eras(4).validate(),
            Err(ConfigError::EraCountOutOfRange { count: 4 })
        );
        assert_eq!(
            with_eras(9).validate(),
            Err(ConfigError::EraCountOutOfRange { count: 9 })
        );
    }

    #[test]
    fn length_mismatch_is_reported_first() {
        let c = HistoryConfig {
            era_weights: vec![0.1; 3],
            drift_steps_by_era: vec![1; 12],
            ..HistoryConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::EraLengthMismatch {
                weights: 3,
                drift_steps: 12
            })
        );
    }

    #[test]
    fn rejects_bad_weights() {
        let mut c = HistoryConfig::default();
        c.era_weights[2] = f64::NAN;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidEraWeight { era: 2, .. })
        ));
        c.era_weights[2] = -0.1;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidEraWeight { era: 2, .. })
        ));
        c.era_weights[2] = 10.0;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_long_drift() {
        let mut c = HistoryConfig::default();
        c.drift_steps_by_era[0] = 17;
        assert_eq!(
            c.validate(),
            Err(ConfigError::DriftStepsTooLarge {
                era: 0,
                value: 17,
                max: 16
            })
        );
    }

    #[test]
    fn rejects_out_of_range_knobs() {
        let c = HistoryConfig {
            belt_influence_distance: 0,
            ..HistoryConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::InvalidBeltInfluence { value: 0 })
        );

        let c = HistoryConfig {
            belt_decay: 0.0,
            ..HistoryConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::InvalidBeltDecay { .. })));

        let c = HistoryConfig {
            hotspot_forcing_floor: 1.5,
            ..HistoryConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidHotspotFloor { .. })
        ));

        let c = HistoryConfig {
            reset: ResetConfig {
                arc_fraction: 1.2,
                ..ResetConfig::default()
            },
            ..HistoryConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidResetFraction {
                name: "arc_fraction",
                ..
            })
        ));
    }
}
