//! Metric reports: named scalar results of an evaluation call.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A mapping from metric name to scalar value.
///
/// Reports are produced per evaluation call and never merged destructively;
/// [`MetricReport::merged`] returns a new report and leaves both inputs
/// untouched. `BTreeMap` keeps iteration and serialization order stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    metrics: BTreeMap<String, f64>,
}

impl MetricReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.metrics.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.metrics.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Combine two reports into a new one. Entries from `other` win when
    /// both reports name the same metric.
    pub fn merged(&self, other: &MetricReport) -> MetricReport {
        let mut metrics = self.metrics.clone();
        for (k, &v) in &other.metrics {
            metrics.insert(k.clone(), v);
        }
        MetricReport { metrics }
    }
}

impl fmt::Display for MetricReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (name, value) in &self.metrics {
            writeln!(f, "{}: {:.6}", name, value)?;
        }
        Ok(())
    }
}

/// Summarize per-fold scores as a report with mean, standard deviation and
/// fold count. Cross-validation itself never averages; this is the
/// caller-side convenience.
pub fn fold_score_summary(scores: &[f64]) -> MetricReport {
    let mut report = MetricReport::new();
    report.insert("n_folds", scores.len() as f64);
    if scores.is_empty() {
        return report;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / scores.len() as f64;
    report.insert("mean_score", mean);
    report.insert("std_score", var.sqrt());
    report
}
