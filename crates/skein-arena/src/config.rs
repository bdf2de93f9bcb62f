//! Arena configuration parameters.

use crate::error::ConfigError;

/// Configuration for a [`SlotArena`](crate::SlotArena).
///
/// Controls the initial slot allocation, the growth curve and the orphan
/// sweep trigger. Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ArenaConfig {
    /// Number of slots allocated on first insertion.
    ///
    /// Default: 16. Must be non-zero.
    pub initial_capacity: u32,

    /// Capacity at which growth switches from doubling to +25%.
    ///
    /// Default: 1024. Must be at least `initial_capacity`.
    pub large_threshold: u32,

    /// Fraction of capacity held by orphans that triggers an automatic sweep
    /// when the outermost traversal exits.
    ///
    /// Default: 0.20. Must lie in `(0, 1]`.
    pub sweep_ratio: f64,
}

impl ArenaConfig {
    /// Default number of slots allocated on first use.
    pub const DEFAULT_INITIAL_CAPACITY: u32 = 16;

    /// Default doubling cut-over.
    pub const DEFAULT_LARGE_THRESHOLD: u32 = 1024;

    /// Default orphan sweep trigger.
    pub const DEFAULT_SWEEP_RATIO: f64 = 0.20;

    /// Create a config with the given initial capacity and default values
    /// for everything else.
    ///
    /// The large threshold is raised to `initial_capacity` if needed so the
    /// result always validates when `initial_capacity` is non-zero.
    pub fn with_initial_capacity(initial_capacity: u32) -> Self {
        Self {
            initial_capacity,
            large_threshold: Self::DEFAULT_LARGE_THRESHOLD.max(initial_capacity),
            sweep_ratio: Self::DEFAULT_SWEEP_RATIO,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroInitialCapacity);
        }
        if self.large_threshold < self.initial_capacity {
            return Err(ConfigError::ThresholdBelowInitial {
                initial_capacity: self.initial_capacity,
                large_threshold: self.large_threshold,
            });
        }
        if !(self.sweep_ratio > 0.0 && self.sweep_ratio <= 1.0) {
            return Err(ConfigError::InvalidSweepRatio {
                value: self.sweep_ratio,
            });
        }
        Ok(())
    }

    /// Capacity the arena should grow to from `current`.
    ///
    /// Zero grows to `initial_capacity`; below `large_threshold` the
    /// capacity doubles; from there on it grows by a quarter.
    pub fn next_capacity(&self, current: u32) -> u32 {
        if current == 0 {
            self.initial_capacity
        } else if current < self.large_threshold {
            current.saturating_mul(2)
        } else {
            current.saturating_add((current / 4).max(1))
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            large_threshold: Self::DEFAULT_LARGE_THRESHOLD,
            sweep_ratio: Self::DEFAULT_SWEEP_RATIO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates() {
        assert!(ArenaConfig::default().validate().is_ok());
    }

    #[test]
    fn growth_doubles_then_quarters() {
        let config = ArenaConfig::default();
        assert_eq!(config.next_capacity(0), 16);
        assert_eq!(config.next_capacity(16), 32);
        assert_eq!(config.next_capacity(512), 1024);
        assert_eq!(config.next_capacity(1024), 1280);
        assert_eq!(config.next_capacity(1280), 1600);
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = ArenaConfig {
            initial_capacity: 0,
            ..ArenaConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInitialCapacity));
    }

    #[test]
    fn rejects_threshold_below_initial() {
        let config = ArenaConfig {
            initial_capacity: 64,
            large_threshold: 32,
            ..ArenaConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ThresholdBelowInitial {
                initial_capacity: 64,
                large_threshold: 32,
            })
        );
    }

    #[test]
    fn rejects_bad_sweep_ratio() {
        for value in [0.0, -0.5, 1.5, f64::NAN] {
            let config = ArenaConfig {
                sweep_ratio: value,
                ..ArenaConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidSweepRatio { .. })),
                "sweep_ratio {value} should be rejected"
            );
        }
    }

    #[test]
    fn with_initial_capacity_raises_threshold() {
        let config = ArenaConfig::with_initial_capacity(4096);
        assert_eq!(config.large_threshold, 4096);
        assert!(config.validate().is_ok());
    }
}
