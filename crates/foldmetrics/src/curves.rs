//! Precision/recall and ROC curve tracing, AUC, and threshold calibration.
//!
//! Both tracers sweep a decision threshold over every distinct score value,
//! from the most conservative (highest) downward. At a threshold t, an
//! instance counts as predicted-positive when its score is >= t. Scores are
//! sorted descending with ties broken by stable original order, and one
//! point is emitted per distinct score.
use ndarray::Array1;

use crate::error::EvalError;

/// One point on a traced curve, tagged with the threshold that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
    pub threshold: f64,
}

/// An ordered sequence of curve points, traversed by decreasing threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: Vec<CurvePoint>,
}

impl Curve {
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Indices sorted by descending score; equal scores keep original order.
fn sort_descending(scores: &Array1<f32>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

fn check_scores(y_true: &[bool], scores: &Array1<f32>) -> Result<(), EvalError> {
    if y_true.len() != scores.len() {
        return Err(EvalError::ShapeMismatch(format!(
            "{} labels vs {} scores",
            y_true.len(),
            scores.len()
        )));
    }
    if y_true.is_empty() {
        return Err(EvalError::Config(
            "cannot trace a curve over zero instances".to_string(),
        ));
    }
    if let Some(nan) = scores.iter().position(|s| s.is_nan()) {
        return Err(EvalError::ShapeMismatch(format!(
            "score {} is NaN; thresholds over NaN are undefined",
            nan
        )));
    }
    Ok(())
}

/// Trace the precision/recall curve for binary labels and decision scores.
///
/// Thresholds are emitted in decreasing order; recall is non-decreasing
/// along the curve while precision need not be monotonic. Points carry
/// (x = recall, y = precision).
pub fn precision_recall_curve(
    y_true: &[bool],
    scores: &Array1<f32>,
) -> Result<Curve, EvalError> {
    check_scores(y_true, scores)?;
    let n_pos = y_true.iter().filter(|&&t| t).count();
    if n_pos == 0 {
        return Err(EvalError::Config(
            "precision/recall curve needs at least one positive instance".to_string(),
        ));
    }

    let order = sort_descending(scores);
    let mut points = Vec::new();
    let mut tp = 0usize;
    let mut fp = 0usize;

    for (rank, &idx) in order.iter().enumerate() {
        if y_true[idx] {
            tp += 1;
        } else {
            fp += 1;
        }
        // Emit only at distinct-score boundaries so every point is
        // reproducible by "score >= threshold".
        let last_of_run = rank + 1 == order.len()
            || scores[order[rank + 1]] < scores[idx];
        if last_of_run {
            points.push(CurvePoint {
                x: tp as f64 / n_pos as f64,
                y: tp as f64 / (tp + fp) as f64,
                threshold: f64::from(scores[idx]),
            });
        }
    }

    Ok(Curve { points })
}

/// Trace the ROC curve: (x = false-positive rate, y = true-positive rate).
///
/// Both rates are non-decreasing; the curve always starts at (0, 0) with an
/// infinite threshold and ends at (1, 1) at the lowest score. Requires at
/// least one positive and one negative instance, otherwise a rate is
/// undefined.
pub fn roc_curve(y_true: &[bool], scores: &Array1<f32>) -> Result<Curve, EvalError> {
    check_scores(y_true, scores)?;
    let n_pos = y_true.iter().filter(|&&t| t).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(EvalError::Config(
            "ROC curve needs at least one positive and one negative instance".to_string(),
        ));
    }

    let order = sort_descending(scores);
    let mut points = vec![CurvePoint {
        x: 0.0,
        y: 0.0,
        threshold: f64::INFINITY,
    }];
    let mut tp = 0usize;
    let mut fp = 0usize;

    for (rank, &idx) in order.iter().enumerate() {
        if y_true[idx] {
            tp += 1;
        } else {
            fp += 1;
        }
        let last_of_run = rank + 1 == order.len()
            || scores[order[rank + 1]] < scores[idx];
        if last_of_run {
            points.push(CurvePoint {
                x: fp as f64 / n_neg as f64,
                y: tp as f64 / n_pos as f64,
                threshold: f64::from(scores[idx]),
            });
        }
    }

    Ok(Curve { points })
}

/// Trapezoidal integral of a curve's (x, y) points ordered by increasing x.
///
/// For ROC curves the result lies in [0, 1]: 1.0 for a perfect separator,
/// converging to 0.5 for scores uncorrelated with the labels.
pub fn area_under_curve(curve: &Curve) -> f64 {
    let mut pts: Vec<(f64, f64)> = curve.points().iter().map(|p| (p.x, p.y)).collect();
    pts.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut area = 0.0;
    for pair in pts.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        area += (x1 - x0) * (y0 + y1) / 2.0;
    }
    // Accumulated rounding can nudge the sum past the unit interval.
    area.clamp(0.0, 1.0)
}

/// Find the most conservative threshold whose precision reaches `target`.
///
/// Scans the precision/recall curve from the highest threshold downward and
/// returns the first threshold with precision >= `target`. Re-deriving
/// predictions as "score >= threshold" reproduces that precision on the
/// same data; recall typically drops, which the caller evaluates
/// separately. If the curve never reaches the target, the error carries the
/// best attainable precision so callers can fall back deliberately.
pub fn find_threshold_for_precision(
    precision_recall: &Curve,
    target: f64,
) -> Result<f64, EvalError> {
    let mut best = 0.0f64;
    for point in precision_recall.points() {
        if point.y >= target {
            return Ok(point.threshold);
        }
        best = best.max(point.y);
    }
    Err(EvalError::CalibrationInfeasible { target, best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn tied_scores_emit_a_single_point() {
        let y = vec![true, false, true];
        let scores = arr1(&[0.5f32, 0.5, 0.5]);
        let curve = precision_recall_curve(&y, &scores).unwrap();
        assert_eq!(curve.len(), 1);
        let p = curve.points()[0];
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn nan_scores_are_rejected() {
        let y = vec![true, false];
        let scores = arr1(&[0.3f32, f32::NAN]);
        assert!(matches!(
            roc_curve(&y, &scores),
            Err(EvalError::ShapeMismatch(_))
        ));
    }
}
