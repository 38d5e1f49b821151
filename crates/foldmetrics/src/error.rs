use std::error::Error;
use std::fmt;

/// Custom error type for evaluation failures.
///
/// Each variant is a distinct, inspectable condition so callers can decide
/// whether to retry with different settings, fall back, or abort.
#[derive(Debug)]
pub enum EvalError {
    /// Invalid evaluation settings, e.g. a fold count the data cannot support.
    Config(String),
    /// An external estimator's fit/predict/score call failed for a fold.
    Estimator {
        fold: usize,
        source: anyhow::Error,
    },
    /// No threshold on the traced curve reaches the requested precision.
    /// `best` is the highest precision the curve attains.
    CalibrationInfeasible {
        target: f64,
        best: f64,
    },
    /// Inconsistent feature-vector width or label arity across instances.
    ShapeMismatch(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::Config(msg) => write!(f, "invalid configuration: {}", msg),
            EvalError::Estimator { fold, source } => {
                write!(f, "estimator failed on fold {}: {}", fold, source)
            }
            EvalError::CalibrationInfeasible { target, best } => write!(
                f,
                "no threshold reaches precision {:.4} (best attainable: {:.4})",
                target, best
            ),
            EvalError::ShapeMismatch(msg) => write!(f, "shape mismatch: {}", msg),
        }
    }
}

impl Error for EvalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EvalError::Estimator { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
