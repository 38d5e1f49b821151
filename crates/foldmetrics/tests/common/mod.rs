//! Deterministic mock estimators shared by the integration tests.
#![allow(dead_code)]

use anyhow::bail;
use ndarray::{Array1, Array2};

use foldmetrics::data_handling::Label;
use foldmetrics::models::estimator::Estimator;

fn binary_targets(y: &[Label]) -> anyhow::Result<Vec<bool>> {
    y.iter()
        .map(|l| match l {
            Label::Binary(b) => Ok(*b),
            other => bail!("expected binary labels, got {:?}", other.kind()),
        })
        .collect()
}

/// Thresholds on the first feature column: fit places the cut halfway
/// between the positive and negative class means. Fully deterministic.
#[derive(Default)]
pub struct MidpointModel {
    threshold: Option<f32>,
}

impl Estimator for MidpointModel {
    fn fit(&mut self, x: &Array2<f32>, y: &[Label]) -> anyhow::Result<()> {
        let targets = binary_targets(y)?;
        if x.nrows() != targets.len() {
            bail!("{} rows vs {} labels", x.nrows(), targets.len());
        }
        let mut pos = (0.0f32, 0usize);
        let mut neg = (0.0f32, 0usize);
        for (i, &t) in targets.iter().enumerate() {
            let v = x[(i, 0)];
            if t {
                pos = (pos.0 + v, pos.1 + 1);
            } else {
                neg = (neg.0 + v, neg.1 + 1);
            }
        }
        if pos.1 == 0 || neg.1 == 0 {
            bail!("midpoint model needs both classes in the training set");
        }
        self.threshold = Some((pos.0 / pos.1 as f32 + neg.0 / neg.1 as f32) / 2.0);
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> anyhow::Result<Vec<Label>> {
        let scores = self.decision_function(x)?;
        Ok(scores.iter().map(|&s| Label::Binary(s >= 0.0)).collect())
    }

    fn decision_function(&self, x: &Array2<f32>) -> anyhow::Result<Array1<f32>> {
        let Some(threshold) = self.threshold else {
            bail!("midpoint model is not fitted");
        };
        Ok(Array1::from_iter((0..x.nrows()).map(|i| x[(i, 0)] - threshold)))
    }

    fn name(&self) -> &str {
        "midpoint"
    }
}

/// Scores rows by negated Euclidean distance to the positive-class centroid.
/// Used as the binary base learner for one-vs-rest tests: distances are
/// comparable in scale across classes.
#[derive(Default)]
pub struct CentroidScorer {
    centroid: Option<Vec<f32>>,
}

impl Estimator for CentroidScorer {
    fn fit(&mut self, x: &Array2<f32>, y: &[Label]) -> anyhow::Result<()> {
        let targets = binary_targets(y)?;
        let mut centroid = vec![0.0f32; x.ncols()];
        let mut count = 0usize;
        for (i, &t) in targets.iter().enumerate() {
            if t {
                for (c, slot) in centroid.iter_mut().enumerate() {
                    *slot += x[(i, c)];
                }
                count += 1;
            }
        }
        if count == 0 {
            bail!("centroid scorer needs at least one positive instance");
        }
        for slot in centroid.iter_mut() {
            *slot /= count as f32;
        }
        self.centroid = Some(centroid);
        Ok(())
    }

    fn predict(&self, _x: &Array2<f32>) -> anyhow::Result<Vec<Label>> {
        bail!("centroid scorer only produces decision scores")
    }

    fn decision_function(&self, x: &Array2<f32>) -> anyhow::Result<Array1<f32>> {
        let Some(centroid) = &self.centroid else {
            bail!("centroid scorer is not fitted");
        };
        Ok(Array1::from_iter((0..x.nrows()).map(|i| {
            let dist2: f32 = centroid
                .iter()
                .enumerate()
                .map(|(c, &m)| (x[(i, c)] - m).powi(2))
                .sum();
            -dist2.sqrt()
        })))
    }

    fn name(&self) -> &str {
        "centroid"
    }
}

/// Scores every row with the same constant: the fraction of positive
/// training labels. With balanced classes, all one-vs-rest learners tie.
#[derive(Default)]
pub struct ConstantScorer {
    value: Option<f32>,
}

impl Estimator for ConstantScorer {
    fn fit(&mut self, _x: &Array2<f32>, y: &[Label]) -> anyhow::Result<()> {
        let targets = binary_targets(y)?;
        let positives = targets.iter().filter(|&&t| t).count();
        self.value = Some(positives as f32 / targets.len().max(1) as f32);
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> anyhow::Result<Vec<Label>> {
        let scores = self.decision_function(x)?;
        Ok(scores.iter().map(|&s| Label::Binary(s >= 0.5)).collect())
    }

    fn decision_function(&self, x: &Array2<f32>) -> anyhow::Result<Array1<f32>> {
        let Some(value) = self.value else {
            bail!("constant scorer is not fitted");
        };
        Ok(Array1::from_elem(x.nrows(), value))
    }

    fn name(&self) -> &str {
        "constant"
    }
}

/// Always answers with one entry too few; exercises output arity checks.
pub struct TruncatingModel;

impl Estimator for TruncatingModel {
    fn fit(&mut self, _x: &Array2<f32>, _y: &[Label]) -> anyhow::Result<()> {
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> anyhow::Result<Vec<Label>> {
        Ok(vec![Label::Binary(false); x.nrows().saturating_sub(1)])
    }

    fn decision_function(&self, x: &Array2<f32>) -> anyhow::Result<Array1<f32>> {
        Ok(Array1::zeros(x.nrows().saturating_sub(1)))
    }

    fn name(&self) -> &str {
        "truncating"
    }
}

/// Which estimator call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Fit,
    Predict,
    Score,
}

/// Fails on the selected call; the other calls behave like a constant model.
pub struct FailingModel(pub FailOn);

impl Estimator for FailingModel {
    fn fit(&mut self, _x: &Array2<f32>, _y: &[Label]) -> anyhow::Result<()> {
        if self.0 == FailOn::Fit {
            bail!("synthetic fit failure");
        }
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> anyhow::Result<Vec<Label>> {
        if self.0 == FailOn::Predict {
            bail!("synthetic predict failure");
        }
        Ok(vec![Label::Binary(false); x.nrows()])
    }

    fn decision_function(&self, x: &Array2<f32>) -> anyhow::Result<Array1<f32>> {
        if self.0 == FailOn::Score {
            bail!("synthetic score failure");
        }
        Ok(Array1::zeros(x.nrows()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
