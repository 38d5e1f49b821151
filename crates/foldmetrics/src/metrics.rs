//! Confusion-matrix construction and derived classification metrics.
//!
//! All scalar metrics are defined from confusion counts, never by
//! re-scanning raw labels, and every degenerate case is an explicit zero
//! rather than a NaN: precision with no predicted positives is 0, recall
//! with no true positives is 0, F1 with both zero is 0.
use crate::data_handling::{class_indices, Label};
use crate::error::EvalError;
use crate::report::MetricReport;

/// A K×K table of counts; cell (i, j) holds the number of instances with
/// true class i predicted as class j. Row-major storage. The class set is
/// fixed by the caller so matrices from different runs line up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: Vec<usize>,
    n_classes: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1_from(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ConfusionMatrix {
    /// Build from per-instance class indices in a single O(N) pass.
    pub fn from_class_indices(
        y_true: &[usize],
        y_pred: &[usize],
        n_classes: usize,
    ) -> Result<Self, EvalError> {
        if y_true.len() != y_pred.len() {
            return Err(EvalError::ShapeMismatch(format!(
                "{} true labels vs {} predictions",
                y_true.len(),
                y_pred.len()
            )));
        }
        if n_classes == 0 {
            return Err(EvalError::Config("need at least one class".to_string()));
        }
        let mut counts = vec![0usize; n_classes * n_classes];
        for (i, (&t, &p)) in y_true.iter().zip(y_pred.iter()).enumerate() {
            if t >= n_classes || p >= n_classes {
                return Err(EvalError::ShapeMismatch(format!(
                    "instance {}: class index ({}, {}) outside the declared {} classes",
                    i, t, p, n_classes
                )));
            }
            counts[t * n_classes + p] += 1;
        }
        Ok(ConfusionMatrix { counts, n_classes })
    }

    /// Build from tagged labels (binary or multiclass). Binary labels map
    /// to a 2×2 matrix with the positive class at index 1.
    pub fn from_labels(
        y_true: &[Label],
        y_pred: &[Label],
        n_classes: usize,
    ) -> Result<Self, EvalError> {
        let t = class_indices(y_true)?;
        let p = class_indices(y_pred)?;
        Self::from_class_indices(&t, &p, n_classes)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Count at (true class, predicted class).
    pub fn get(&self, true_class: usize, predicted_class: usize) -> usize {
        self.counts[true_class * self.n_classes + predicted_class]
    }

    /// Total number of instances counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Number of true instances of `class` (row sum).
    pub fn support(&self, class: usize) -> usize {
        (0..self.n_classes).map(|j| self.get(class, j)).sum()
    }

    /// One-vs-rest reduction: `class` is positive, everything else negative.
    pub fn true_positives(&self, class: usize) -> usize {
        self.get(class, class)
    }

    pub fn false_positives(&self, class: usize) -> usize {
        (0..self.n_classes)
            .filter(|&i| i != class)
            .map(|i| self.get(i, class))
            .sum()
    }

    pub fn false_negatives(&self, class: usize) -> usize {
        (0..self.n_classes)
            .filter(|&j| j != class)
            .map(|j| self.get(class, j))
            .sum()
    }

    pub fn true_negatives(&self, class: usize) -> usize {
        self.total()
            - self.true_positives(class)
            - self.false_positives(class)
            - self.false_negatives(class)
    }

    /// TP / (TP + FP); 0 when nothing was predicted as `class`.
    pub fn precision(&self, class: usize) -> f64 {
        let tp = self.true_positives(class);
        ratio(tp, tp + self.false_positives(class))
    }

    /// TP / (TP + FN); 0 when `class` has no true instances.
    pub fn recall(&self, class: usize) -> f64 {
        let tp = self.true_positives(class);
        ratio(tp, tp + self.false_negatives(class))
    }

    /// Harmonic mean of precision and recall; 0 when both are 0.
    pub fn f1(&self, class: usize) -> f64 {
        f1_from(self.precision(class), self.recall(class))
    }

    /// Fraction of instances on the diagonal.
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.n_classes).map(|c| self.get(c, c)).sum();
        ratio(correct, self.total())
    }

    /// Unweighted mean of per-class precision.
    pub fn macro_precision(&self) -> f64 {
        macro_average(&(0..self.n_classes).map(|c| self.precision(c)).collect::<Vec<_>>())
    }

    /// Unweighted mean of per-class recall.
    pub fn macro_recall(&self) -> f64 {
        macro_average(&(0..self.n_classes).map(|c| self.recall(c)).collect::<Vec<_>>())
    }

    /// Unweighted mean of per-class F1.
    pub fn macro_f1(&self) -> f64 {
        macro_average(&(0..self.n_classes).map(|c| self.f1(c)).collect::<Vec<_>>())
    }
}

/// Unweighted mean of per-class or per-label metric values.
pub fn macro_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Fraction of instances whose predicted label equals the true label.
/// Works for any label kind; multilabel vectors must match exactly.
pub fn accuracy(y_true: &[Label], y_pred: &[Label]) -> f64 {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / y_true.len() as f64
}

/// A scorer closure computing macro-F1 over `n_classes`, suitable for
/// [`crate::cross_validation::cross_validate_score`]. Instances with
/// malformed labels score 0.
pub fn macro_f1_scorer(n_classes: usize) -> impl Fn(&[Label], &[Label]) -> f64 + Sync {
    move |y_true, y_pred| match ConfusionMatrix::from_labels(y_true, y_pred, n_classes) {
        Ok(cm) => cm.macro_f1(),
        Err(e) => {
            log::warn!("macro-F1 scorer fell back to 0: {}", e);
            0.0
        }
    }
}

/// Per-label F1 for multilabel data: each label column is scored as an
/// independent binary problem.
pub fn per_label_f1(y_true: &[Label], y_pred: &[Label]) -> Result<Vec<f64>, EvalError> {
    if y_true.len() != y_pred.len() {
        return Err(EvalError::ShapeMismatch(format!(
            "{} true labels vs {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(EvalError::ShapeMismatch(
            "per-label F1 needs at least one instance".to_string(),
        ));
    }

    let width = match &y_true[0] {
        Label::Multilabel(v) => v.len(),
        other => {
            return Err(EvalError::ShapeMismatch(format!(
                "per-label F1 expects multilabel data, got {:?}",
                other.kind()
            )))
        }
    };

    let column = |labels: &[Label], idx: usize| -> Result<Vec<bool>, EvalError> {
        labels
            .iter()
            .map(|l| match l {
                Label::Multilabel(v) if v.len() == width => Ok(v[idx]),
                Label::Multilabel(v) => Err(EvalError::ShapeMismatch(format!(
                    "multilabel width {} disagrees with declared width {}",
                    v.len(),
                    width
                ))),
                other => Err(EvalError::ShapeMismatch(format!(
                    "per-label F1 expects multilabel data, got {:?}",
                    other.kind()
                ))),
            })
            .collect()
    };

    let mut f1s = Vec::with_capacity(width);
    for idx in 0..width {
        let truth = column(y_true, idx)?;
        let pred = column(y_pred, idx)?;
        let tp = truth.iter().zip(&pred).filter(|&(&t, &p)| t && p).count();
        let fp = truth.iter().zip(&pred).filter(|&(&t, &p)| !t && p).count();
        let fn_ = truth.iter().zip(&pred).filter(|&(&t, &p)| t && !p).count();
        f1s.push(f1_from(ratio(tp, tp + fp), ratio(tp, tp + fn_)));
    }
    Ok(f1s)
}

/// Multilabel macro-F1: the unweighted mean of [`per_label_f1`].
pub fn multilabel_macro_f1(y_true: &[Label], y_pred: &[Label]) -> Result<f64, EvalError> {
    Ok(macro_average(&per_label_f1(y_true, y_pred)?))
}

/// Render a confusion matrix as a flat metric report: per-class
/// precision/recall/F1/support plus accuracy and the macro averages.
pub fn classification_report(cm: &ConfusionMatrix) -> MetricReport {
    let mut report = MetricReport::new();
    for class in 0..cm.n_classes() {
        report.insert(format!("precision_{}", class), cm.precision(class));
        report.insert(format!("recall_{}", class), cm.recall(class));
        report.insert(format!("f1_{}", class), cm.f1(class));
        report.insert(format!("support_{}", class), cm.support(class) as f64);
    }
    report.insert("accuracy", cm.accuracy());
    report.insert("macro_precision", cm.macro_precision());
    report.insert("macro_recall", cm.macro_recall());
    report.insert("macro_f1", cm.macro_f1());
    report
}
