//! Stratified k-fold partitioning.
//!
//! Splits instance indices into k disjoint train/test folds while
//! preserving, within one instance per fold, the global class proportions
//! in every test set.
use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::EvalError;

/// One train/test split: two disjoint index sets into the original dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split instances into k stratified folds.
///
/// `strata` assigns one stratum (class) id per instance. Within each
/// stratum, instances are shuffled deterministically from `seed` and dealt
/// round-robin across the k test sets, so each fold's test set receives
/// `count(stratum)/k` instances of that stratum, give or take one. The
/// union of all test sets covers every index exactly once.
///
/// # Arguments
///
/// * `strata` - Per-instance stratum ids.
/// * `k` - Number of folds; at least 2 and at most the smallest stratum's size.
/// * `seed` - Shuffle seed; identical seed and strata yield identical folds.
pub fn stratified_kfold(strata: &[usize], k: usize, seed: u64) -> Result<Vec<Fold>, EvalError> {
    let n = strata.len();
    if k < 2 {
        return Err(EvalError::Config(format!(
            "need at least 2 folds, got {}",
            k
        )));
    }
    if n == 0 {
        return Err(EvalError::Config(
            "cannot partition zero instances".to_string(),
        ));
    }

    // BTreeMap keeps stratum iteration order stable across runs.
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &s) in strata.iter().enumerate() {
        groups.entry(s).or_default().push(i);
    }

    for (&stratum, members) in &groups {
        if members.len() < k {
            return Err(EvalError::Config(format!(
                "stratum {} has only {} instances; cannot stratify into {} folds",
                stratum,
                members.len(),
                k
            )));
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut test_sets: Vec<Vec<usize>> = vec![Vec::new(); k];

    for members in groups.values() {
        let mut shuffled = members.clone();
        shuffled.shuffle(&mut rng);
        for (pos, idx) in shuffled.into_iter().enumerate() {
            test_sets[pos % k].push(idx);
        }
    }

    let folds = test_sets
        .into_iter()
        .enumerate()
        .map(|(fold, mut test)| {
            test.sort_unstable();
            let mut in_test = vec![false; n];
            for &i in &test {
                in_test[i] = true;
            }
            let train: Vec<usize> = (0..n).filter(|&i| !in_test[i]).collect();
            log::trace!(
                "fold {}: {} train / {} test instances",
                fold,
                train.len(),
                test.len()
            );
            Fold { train, test }
        })
        .collect();

    Ok(folds)
}

/// Check that `folds` partition `{0, .., n_instances-1}`: every index lands
/// in exactly one test set, and no fold's train set overlaps its own test
/// set. Run before scattering out-of-fold predictions so a malformed fold
/// set fails loudly instead of corrupting the output container.
pub fn validate_folds(folds: &[Fold], n_instances: usize) -> Result<(), EvalError> {
    let mut seen = vec![false; n_instances];
    for (fold, f) in folds.iter().enumerate() {
        for &i in &f.test {
            if i >= n_instances {
                return Err(EvalError::Config(format!(
                    "fold {} test index {} out of range for {} instances",
                    fold, i, n_instances
                )));
            }
            if seen[i] {
                return Err(EvalError::Config(format!(
                    "instance {} appears in more than one test set",
                    i
                )));
            }
            seen[i] = true;
        }
        for &i in &f.train {
            if i >= n_instances {
                return Err(EvalError::Config(format!(
                    "fold {} train index {} out of range for {} instances",
                    fold, i, n_instances
                )));
            }
        }
        let in_test: std::collections::HashSet<usize> = f.test.iter().copied().collect();
        if f.train.iter().any(|i| in_test.contains(i)) {
            return Err(EvalError::Config(format!(
                "fold {} has overlapping train and test sets",
                fold
            )));
        }
    }
    if let Some(missing) = seen.iter().position(|&s| !s) {
        return Err(EvalError::Config(format!(
            "instance {} is missing from every test set",
            missing
        )));
    }
    Ok(())
}
