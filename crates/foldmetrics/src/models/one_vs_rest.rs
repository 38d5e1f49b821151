use anyhow::{anyhow, bail};
use ndarray::{Array1, Array2};

use crate::data_handling::Label;
use crate::models::estimator::Estimator;

/// One-vs-rest multiclass decomposition.
///
/// Wraps K binary estimators, one per class, each trained with its class
/// as positive and everything else as negative. Prediction scores every
/// class's decision function and takes the argmax, breaking ties toward
/// the lowest class index.
///
/// The decomposition performs no score normalization: it matches a native
/// multiclass estimator only when the base estimator's binary scores are
/// comparable in scale across classes, which is the caller's precondition.
pub struct OneVsRest<F>
where
    F: Fn() -> Box<dyn Estimator> + Send,
{
    factory: F,
    n_classes: usize,
    models: Vec<Box<dyn Estimator>>,
}

impl<F> OneVsRest<F>
where
    F: Fn() -> Box<dyn Estimator> + Send,
{
    /// Wrap `factory` for a K-class problem. Each call to `fit` builds K
    /// fresh binary estimators from the factory.
    pub fn new(n_classes: usize, factory: F) -> Self {
        OneVsRest {
            factory,
            n_classes,
            models: Vec::new(),
        }
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Per-class decision scores, shape (n_instances, n_classes).
    pub fn decision_matrix(&self, x: &Array2<f32>) -> anyhow::Result<Array2<f32>> {
        if self.models.len() != self.n_classes {
            bail!("one-vs-rest model is not fitted");
        }
        let mut scores = Array2::<f32>::zeros((x.nrows(), self.n_classes));
        for (class, model) in self.models.iter().enumerate() {
            let column = model
                .decision_function(x)
                .map_err(|e| anyhow!("class {} scorer failed: {}", class, e))?;
            if column.len() != x.nrows() {
                bail!(
                    "class {} scorer returned {} scores for {} rows",
                    class,
                    column.len(),
                    x.nrows()
                );
            }
            scores.column_mut(class).assign(&column);
        }
        Ok(scores)
    }
}

impl<F> Estimator for OneVsRest<F>
where
    F: Fn() -> Box<dyn Estimator> + Send,
{
    fn fit(&mut self, x: &Array2<f32>, y: &[Label]) -> anyhow::Result<()> {
        let classes: Vec<usize> = y
            .iter()
            .map(|l| match l {
                Label::Class(c) => Ok(*c),
                other => Err(anyhow!(
                    "one-vs-rest expects multiclass labels, got {:?}",
                    other.kind()
                )),
            })
            .collect::<anyhow::Result<_>>()?;
        if let Some(&c) = classes.iter().find(|&&c| c >= self.n_classes) {
            bail!("class index {} out of range for {} classes", c, self.n_classes);
        }

        self.models.clear();
        for class in 0..self.n_classes {
            let binarized: Vec<Label> =
                classes.iter().map(|&c| Label::Binary(c == class)).collect();
            let mut model = (self.factory)();
            model
                .fit(x, &binarized)
                .map_err(|e| anyhow!("class {} learner failed to fit: {}", class, e))?;
            self.models.push(model);
        }
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> anyhow::Result<Vec<Label>> {
        let scores = self.decision_matrix(x)?;
        let labels = scores
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0usize;
                for (class, &s) in row.iter().enumerate() {
                    // Strict comparison keeps the lowest index on ties.
                    if s > row[best] {
                        best = class;
                    }
                }
                Label::Class(best)
            })
            .collect();
        Ok(labels)
    }

    fn decision_function(&self, _x: &Array2<f32>) -> anyhow::Result<Array1<f32>> {
        bail!("one-vs-rest produces per-class scores; use score_matrix")
    }

    fn score_matrix(&self, x: &Array2<f32>) -> anyhow::Result<Array2<f32>> {
        self.decision_matrix(x)
    }

    fn name(&self) -> &str {
        "one-vs-rest"
    }
}
