use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for cross-validation runs.
#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct CrossValConfig {
    /// Number of folds. Must be at least 2 and at most the size of the
    /// smallest class when stratifying.
    pub n_folds: usize,
    /// Seed for the deterministic per-class shuffle. Identical seed and
    /// labels always yield identical folds.
    pub seed: u64,
}

impl CrossValConfig {
    pub fn new(n_folds: usize, seed: u64) -> Self {
        Self { n_folds, seed }
    }
}

impl Default for CrossValConfig {
    fn default() -> Self {
        Self {
            n_folds: 5,
            seed: 42,
        }
    }
}

impl FromStr for CrossValConfig {
    type Err = String;

    /// Parse `"5"` (fold count, default seed) or `"5:42"` (folds:seed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (folds, seed) = match s.split_once(':') {
            Some((folds, seed)) => (
                folds,
                seed.parse::<u64>()
                    .map_err(|e| format!("invalid seed {:?}: {}", seed, e))?,
            ),
            None => (s, Self::default().seed),
        };
        let n_folds = folds
            .parse::<usize>()
            .map_err(|e| format!("invalid fold count {:?}: {}", folds, e))?;
        Ok(Self { n_folds, seed })
    }
}

/// Configuration for threshold calibration.
#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct CalibrationConfig {
    /// Precision the calibrated threshold must reach. Recall typically
    /// drops as this rises; callers evaluate that trade-off separately.
    pub target_precision: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            target_precision: 0.9,
        }
    }
}

impl FromStr for CalibrationConfig {
    type Err = String;

    /// Parse a precision target in (0, 1], e.g. `"0.95"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let target_precision = s
            .parse::<f64>()
            .map_err(|e| format!("invalid precision target {:?}: {}", s, e))?;
        if !(target_precision > 0.0 && target_precision <= 1.0) {
            return Err(format!(
                "precision target must lie in (0, 1], got {}",
                target_precision
            ));
        }
        Ok(Self { target_precision })
    }
}
