//! Data structures for labeled datasets.
//!
//! This module defines the closed, tagged [`Label`] representation and the
//! immutable [`Dataset`] consumed by the partitioner, the cross-validation
//! orchestrator and the metric functions. A dataset is built once per
//! experiment, validated on construction, and only ever borrowed read-only
//! afterwards.
use ndarray::Array2;

use crate::error::EvalError;

/// A single instance's label.
///
/// Exactly one tag is used per dataset; metric functions branch on the tag
/// rather than inspecting runtime shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// Two mutually exclusive categories; `true` is the positive class.
    Binary(bool),
    /// One of K mutually exclusive categories, as a class index.
    Class(usize),
    /// A fixed-width vector of independent binary labels.
    Multilabel(Vec<bool>),
}

/// The tag of a [`Label`], used for dataset-wide consistency checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Binary,
    Multiclass,
    Multilabel,
}

impl Label {
    pub fn kind(&self) -> LabelKind {
        match self {
            Label::Binary(_) => LabelKind::Binary,
            Label::Class(_) => LabelKind::Multiclass,
            Label::Multilabel(_) => LabelKind::Multilabel,
        }
    }
}

/// An ordered, immutable collection of N instances: a feature matrix of
/// shape (N, n_features) and one label per row.
#[derive(Debug, Clone)]
pub struct Dataset {
    x: Array2<f32>,
    y: Vec<Label>,
    kind: LabelKind,
    /// Width of the multilabel vectors; 0 for other kinds.
    label_width: usize,
}

impl Dataset {
    /// Build a dataset, validating that the label count matches the row
    /// count, that every label carries the same tag, and that all
    /// multilabel vectors share one width.
    pub fn new(x: Array2<f32>, y: Vec<Label>) -> Result<Self, EvalError> {
        if x.nrows() != y.len() {
            return Err(EvalError::ShapeMismatch(format!(
                "feature matrix has {} rows but {} labels were given",
                x.nrows(),
                y.len()
            )));
        }
        if y.is_empty() {
            return Err(EvalError::ShapeMismatch(
                "dataset must contain at least one instance".to_string(),
            ));
        }

        let kind = y[0].kind();
        let label_width = match &y[0] {
            Label::Multilabel(v) => v.len(),
            _ => 0,
        };

        for (i, label) in y.iter().enumerate() {
            if label.kind() != kind {
                return Err(EvalError::ShapeMismatch(format!(
                    "label {} has kind {:?} but the dataset is {:?}",
                    i,
                    label.kind(),
                    kind
                )));
            }
            if let Label::Multilabel(v) = label {
                if v.len() != label_width {
                    return Err(EvalError::ShapeMismatch(format!(
                        "multilabel vector {} has width {} but the dataset declares {}",
                        i,
                        v.len(),
                        label_width
                    )));
                }
            }
        }

        Ok(Dataset {
            x,
            y,
            kind,
            label_width,
        })
    }

    pub fn n_instances(&self) -> usize {
        self.y.len()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn features(&self) -> &Array2<f32> {
        &self.x
    }

    pub fn labels(&self) -> &[Label] {
        &self.y
    }

    pub fn kind(&self) -> LabelKind {
        self.kind
    }

    /// Width of the multilabel vectors. Zero for binary/multiclass data.
    pub fn label_width(&self) -> usize {
        self.label_width
    }

    /// One stratum id per instance, for stratified partitioning.
    ///
    /// Binary labels map to strata 0 (negative) and 1 (positive);
    /// multiclass labels map to their class index. Multilabel data has no
    /// canonical reduction to a single stratum, so callers must derive
    /// their own.
    pub fn strata(&self) -> Result<Vec<usize>, EvalError> {
        match self.kind {
            LabelKind::Binary => Ok(self
                .y
                .iter()
                .map(|l| match l {
                    Label::Binary(true) => 1,
                    _ => 0,
                })
                .collect()),
            LabelKind::Multiclass => Ok(self
                .y
                .iter()
                .map(|l| match l {
                    Label::Class(c) => *c,
                    _ => unreachable!("kind checked on construction"),
                })
                .collect()),
            LabelKind::Multilabel => Err(EvalError::Config(
                "multilabel datasets have no canonical strata; supply them explicitly"
                    .to_string(),
            )),
        }
    }

    /// Log a summary of the input data at info level.
    pub fn log_summary(&self) {
        log::info!(
            "dataset: {} instances, {} feature columns, {:?} labels",
            self.n_instances(),
            self.n_features(),
            self.kind
        );
        if self.kind == LabelKind::Multilabel {
            log::info!("dataset: {} independent labels per instance", self.label_width);
        }
    }
}

/// Extract per-instance class indices from binary or multiclass labels.
///
/// Binary labels map to 0/1 with the positive class at index 1, so the
/// resulting indices line up with a two-class confusion matrix. Multilabel
/// labels are rejected; each label column is scored independently instead.
pub fn class_indices(labels: &[Label]) -> Result<Vec<usize>, EvalError> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| match l {
            Label::Binary(b) => Ok(usize::from(*b)),
            Label::Class(c) => Ok(*c),
            Label::Multilabel(_) => Err(EvalError::ShapeMismatch(format!(
                "label {} is multilabel; class indices are only defined for binary/multiclass",
                i
            ))),
        })
        .collect()
}
