use ndarray::{Array1, Array2};

use crate::data_handling::Label;

/// The capability interface for external learners.
///
/// The evaluation engine drives estimators but never inspects their state:
/// each cross-validation fold gets a fresh instance from a factory, fits it
/// on the fold's training rows and reads predictions or decision scores off
/// the test rows. Failures cross this boundary as opaque `anyhow` errors
/// and are surfaced with the originating fold attached.
pub trait Estimator: Send {
    /// Fit the model on `x` (one row per instance) and matching labels.
    fn fit(&mut self, x: &Array2<f32>, y: &[Label]) -> anyhow::Result<()>;

    /// Predict one label per input row, in row order.
    fn predict(&self, x: &Array2<f32>) -> anyhow::Result<Vec<Label>>;

    /// Real-valued decision scores for binary problems, one per row.
    /// Higher means more confidently positive; calibration compares these
    /// against a threshold.
    fn decision_function(&self, x: &Array2<f32>) -> anyhow::Result<Array1<f32>>;

    /// Decision scores per instance and class, shape (n_rows, n_classes).
    ///
    /// Binary estimators get this for free as a single-column matrix over
    /// [`Estimator::decision_function`]; multiclass/multilabel estimators
    /// override it with one column per class or label.
    fn score_matrix(&self, x: &Array2<f32>) -> anyhow::Result<Array2<f32>> {
        let scores = self.decision_function(x)?;
        let n = scores.len();
        Ok(scores
            .into_shape((n, 1))
            .expect("a length-n vector reshapes to (n, 1)"))
    }

    /// Optional human readable name for the model.
    fn name(&self) -> &str {
        "estimator"
    }
}
