//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors detected by [`ArenaConfig::validate`](crate::ArenaConfig::validate).
///
/// Runtime arena operations never return errors: stale or out-of-range
/// indices are reported as `None`/`false`.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `initial_capacity` was zero.
    ZeroInitialCapacity,
    /// The doubling cut-over lies below the initial capacity.
    ThresholdBelowInitial {
        /// The configured initial capacity.
        initial_capacity: u32,
        /// The configured large threshold.
        large_threshold: u32,
    },
    /// `sweep_ratio` is NaN or outside `(0, 1]`.
    InvalidSweepRatio {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInitialCapacity => write!(f, "initial capacity must be non-zero"),
            Self::ThresholdBelowInitial {
                initial_capacity,
                large_threshold,
            } => {
                write!(
                    f,
                    "large threshold {large_threshold} is below initial capacity {initial_capacity}"
                )
            }
            Self::InvalidSweepRatio { value } => {
                write!(f, "sweep ratio must be in (0, 1], got {value}")
            }
        }
    }
}

impl Error for ConfigError {}
