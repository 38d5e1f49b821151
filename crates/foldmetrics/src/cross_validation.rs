//! Cross-validation orchestration.
//!
//! Drives an external estimator across a set of folds, producing either one
//! score per fold or a full out-of-fold prediction vector aligned to the
//! original instance order. Every fold gets an independently constructed
//! estimator, so folds share no mutable state and run in parallel.
use std::str::FromStr;

use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;

use crate::data_handling::{Dataset, Label};
use crate::error::EvalError;
use crate::models::estimator::Estimator;
use crate::partition::{validate_folds, Fold};

/// Which estimator output `cross_validate_predict` collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictMode {
    /// Collect `predict` output (labels).
    Label,
    /// Collect `decision_function` output (one real score per instance).
    Score,
    /// Collect `score_matrix` output (one score per instance and class).
    ScoreMatrix,
}

impl FromStr for PredictMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "label" | "predict" => Ok(PredictMode::Label),
            "score" | "decision" => Ok(PredictMode::Score),
            "score-matrix" | "score_matrix" | "matrix" => Ok(PredictMode::ScoreMatrix),
            _ => Err(format!("unknown predict mode: {}", s)),
        }
    }
}

/// Out-of-fold predictions, one entry (or row) per original instance.
#[derive(Debug, Clone, PartialEq)]
pub enum OutOfFold {
    Labels(Vec<Label>),
    Scores(Array1<f32>),
    /// Per-class decision scores, shape (n_instances, n_classes).
    ScoreMatrix(Array2<f32>),
}

fn gather_labels(labels: &[Label], indices: &[usize]) -> Vec<Label> {
    indices.iter().map(|&i| labels[i].clone()).collect()
}

fn fit_on_fold<F>(
    factory: &F,
    dataset: &Dataset,
    fold_idx: usize,
    fold: &Fold,
) -> Result<(Box<dyn Estimator>, Array2<f32>), EvalError>
where
    F: Fn() -> Box<dyn Estimator> + Sync,
{
    let x_train = dataset.features().select(Axis(0), &fold.train);
    let y_train = gather_labels(dataset.labels(), &fold.train);
    let x_test = dataset.features().select(Axis(0), &fold.test);

    let mut model = factory();
    log::info!(
        "fold {}: fitting {} on {} train / {} test instances",
        fold_idx,
        model.name(),
        fold.train.len(),
        fold.test.len()
    );
    model.fit(&x_train, &y_train).map_err(|source| EvalError::Estimator {
        fold: fold_idx,
        source,
    })?;
    Ok((model, x_test))
}

/// Fit and score an estimator on every fold.
///
/// Returns one scalar per fold, in fold order. The scalars are never
/// averaged here; whether and how to aggregate them is the caller's
/// decision (see [`crate::report::fold_score_summary`]).
///
/// A fresh estimator comes from `factory` for each fold. If any fold's fit
/// or predict fails, the error is returned with that fold's index and no
/// partial result escapes.
pub fn cross_validate_score<F, S>(
    factory: F,
    dataset: &Dataset,
    folds: &[Fold],
    scorer: S,
) -> Result<Vec<f64>, EvalError>
where
    F: Fn() -> Box<dyn Estimator> + Sync,
    S: Fn(&[Label], &[Label]) -> f64 + Sync,
{
    validate_folds(folds, dataset.n_instances())?;

    folds
        .par_iter()
        .enumerate()
        .map(|(fold_idx, fold)| {
            let (model, x_test) = fit_on_fold(&factory, dataset, fold_idx, fold)?;
            let predicted = model.predict(&x_test).map_err(|source| EvalError::Estimator {
                fold: fold_idx,
                source,
            })?;
            if predicted.len() != fold.test.len() {
                return Err(EvalError::ShapeMismatch(format!(
                    "fold {} returned {} predictions for {} test instances",
                    fold_idx,
                    predicted.len(),
                    fold.test.len()
                )));
            }
            let truth = gather_labels(dataset.labels(), &fold.test);
            Ok(scorer(&truth, &predicted))
        })
        .collect()
}

/// Produce an out-of-fold prediction for every instance.
///
/// Each fold's test-set predictions are written back at their original
/// dataset indices, so every instance ends up with exactly one prediction
/// made by a model that never trained on it. `mode` selects between label
/// output and decision-score output.
pub fn cross_validate_predict<F>(
    factory: F,
    dataset: &Dataset,
    folds: &[Fold],
    mode: PredictMode,
) -> Result<OutOfFold, EvalError>
where
    F: Fn() -> Box<dyn Estimator> + Sync,
{
    validate_folds(folds, dataset.n_instances())?;
    let n = dataset.n_instances();

    match mode {
        PredictMode::Label => {
            let per_fold: Vec<(Vec<usize>, Vec<Label>)> = folds
                .par_iter()
                .enumerate()
                .map(|(fold_idx, fold)| {
                    let (model, x_test) = fit_on_fold(&factory, dataset, fold_idx, fold)?;
                    let predicted =
                        model.predict(&x_test).map_err(|source| EvalError::Estimator {
                            fold: fold_idx,
                            source,
                        })?;
                    if predicted.len() != fold.test.len() {
                        return Err(EvalError::ShapeMismatch(format!(
                            "fold {} returned {} predictions for {} test instances",
                            fold_idx,
                            predicted.len(),
                            fold.test.len()
                        )));
                    }
                    Ok((fold.test.clone(), predicted))
                })
                .collect::<Result<_, EvalError>>()?;

            // Coverage was validated above: every slot is written exactly once.
            let mut out: Vec<Option<Label>> = vec![None; n];
            for (indices, predicted) in per_fold {
                for (i, label) in indices.into_iter().zip(predicted) {
                    out[i] = Some(label);
                }
            }
            let labels = out
                .into_iter()
                .map(|slot| slot.expect("fold coverage validated"))
                .collect();
            Ok(OutOfFold::Labels(labels))
        }
        PredictMode::Score => {
            let per_fold: Vec<(Vec<usize>, Array1<f32>)> = folds
                .par_iter()
                .enumerate()
                .map(|(fold_idx, fold)| {
                    let (model, x_test) = fit_on_fold(&factory, dataset, fold_idx, fold)?;
                    let scores = model
                        .decision_function(&x_test)
                        .map_err(|source| EvalError::Estimator {
                            fold: fold_idx,
                            source,
                        })?;
                    if scores.len() != fold.test.len() {
                        return Err(EvalError::ShapeMismatch(format!(
                            "fold {} returned {} scores for {} test instances",
                            fold_idx,
                            scores.len(),
                            fold.test.len()
                        )));
                    }
                    Ok((fold.test.clone(), scores))
                })
                .collect::<Result<_, EvalError>>()?;

            let mut out = Array1::<f32>::zeros(n);
            for (indices, scores) in per_fold {
                for (i, &s) in indices.into_iter().zip(scores.iter()) {
                    out[i] = s;
                }
            }
            Ok(OutOfFold::Scores(out))
        }
        PredictMode::ScoreMatrix => {
            let per_fold: Vec<(Vec<usize>, Array2<f32>)> = folds
                .par_iter()
                .enumerate()
                .map(|(fold_idx, fold)| {
                    let (model, x_test) = fit_on_fold(&factory, dataset, fold_idx, fold)?;
                    let scores = model
                        .score_matrix(&x_test)
                        .map_err(|source| EvalError::Estimator {
                            fold: fold_idx,
                            source,
                        })?;
                    if scores.nrows() != fold.test.len() {
                        return Err(EvalError::ShapeMismatch(format!(
                            "fold {} returned {} score rows for {} test instances",
                            fold_idx,
                            scores.nrows(),
                            fold.test.len()
                        )));
                    }
                    Ok((fold.test.clone(), scores))
                })
                .collect::<Result<_, EvalError>>()?;

            // Every fold must agree on the class count before scattering.
            let n_columns = per_fold
                .first()
                .map(|(_, scores)| scores.ncols())
                .unwrap_or(0);
            for (fold_idx, (_, scores)) in per_fold.iter().enumerate() {
                if scores.ncols() != n_columns {
                    return Err(EvalError::ShapeMismatch(format!(
                        "fold {} returned {} score columns but fold 0 returned {}",
                        fold_idx,
                        scores.ncols(),
                        n_columns
                    )));
                }
            }

            let mut out = Array2::<f32>::zeros((n, n_columns));
            for (indices, scores) in per_fold {
                for (row, i) in indices.into_iter().enumerate() {
                    out.row_mut(i).assign(&scores.row(row));
                }
            }
            Ok(OutOfFold::ScoreMatrix(out))
        }
    }
}
