//! Integration tests for curve tracing, AUC, and threshold calibration.

use foldmetrics::curves::{
    area_under_curve, find_threshold_for_precision, precision_recall_curve, roc_curve,
};
use foldmetrics::error::EvalError;
use ndarray::{arr1, Array1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Precision/recall curve
// ---------------------------------------------------------------------------

#[test]
fn pr_curve_traces_known_points() {
    let y = vec![true, false, true, true];
    let scores = arr1(&[0.9f32, 0.8, 0.7, 0.6]);
    let curve = precision_recall_curve(&y, &scores).unwrap();

    let got: Vec<(f64, f64)> = curve.points().iter().map(|p| (p.x, p.y)).collect();
    let expected = [
        (1.0 / 3.0, 1.0),
        (1.0 / 3.0, 0.5),
        (2.0 / 3.0, 2.0 / 3.0),
        (1.0, 0.75),
    ];
    assert_eq!(got.len(), expected.len());
    for ((gx, gy), (ex, ey)) in got.iter().zip(expected.iter()) {
        assert!((gx - ex).abs() < 1e-12 && (gy - ey).abs() < 1e-12);
    }

    // Thresholds come out in decreasing order.
    for pair in curve.points().windows(2) {
        assert!(pair[0].threshold > pair[1].threshold);
    }
}

#[test]
fn pr_curve_recall_is_non_decreasing() {
    let y = vec![true, false, true, false, false, true, true, false];
    let scores = arr1(&[0.95f32, 0.9, 0.8, 0.7, 0.6, 0.55, 0.4, 0.2]);
    let curve = precision_recall_curve(&y, &scores).unwrap();
    for pair in curve.points().windows(2) {
        assert!(pair[1].x >= pair[0].x, "recall decreased along the sweep");
    }
}

#[test]
fn pr_curve_without_positives_is_a_config_error() {
    let y = vec![false, false];
    let scores = arr1(&[0.5f32, 0.3]);
    assert!(matches!(
        precision_recall_curve(&y, &scores),
        Err(EvalError::Config(_))
    ));
}

// ---------------------------------------------------------------------------
// ROC curve and AUC
// ---------------------------------------------------------------------------

#[test]
fn roc_curve_starts_at_origin_and_ends_at_one_one() {
    let y = vec![true, false, true, false, true];
    let scores = arr1(&[0.9f32, 0.7, 0.6, 0.4, 0.2]);
    let curve = roc_curve(&y, &scores).unwrap();

    let first = curve.points().first().unwrap();
    let last = curve.points().last().unwrap();
    assert_eq!((first.x, first.y), (0.0, 0.0));
    assert!(first.threshold.is_infinite());
    assert!((last.x - 1.0).abs() < 1e-12);
    assert!((last.y - 1.0).abs() < 1e-12);

    // Both rates are non-decreasing.
    for pair in curve.points().windows(2) {
        assert!(pair[1].x >= pair[0].x);
        assert!(pair[1].y >= pair[0].y);
    }
}

#[test]
fn perfect_separation_gives_auc_one() {
    let y = vec![true, true, true, false, false, false];
    let scores = arr1(&[0.9f32, 0.8, 0.7, 0.3, 0.2, 0.1]);
    let curve = roc_curve(&y, &scores).unwrap();
    assert!((area_under_curve(&curve) - 1.0).abs() < 1e-6);
}

#[test]
fn inverted_separation_gives_auc_zero() {
    let y = vec![false, true];
    let scores = arr1(&[0.8f32, 0.2]);
    let curve = roc_curve(&y, &scores).unwrap();
    assert!(area_under_curve(&curve).abs() < 1e-12);
}

#[test]
fn random_scores_give_auc_near_half() {
    let mut rng = StdRng::seed_from_u64(5);
    let n = 4000;
    let y: Vec<bool> = (0..n).map(|_| rng.gen_bool(0.5)).collect();
    let scores: Array1<f32> = Array1::from_iter((0..n).map(|_| rng.gen::<f32>()));
    let curve = roc_curve(&y, &scores).unwrap();
    let auc = area_under_curve(&curve);
    assert!(
        (auc - 0.5).abs() < 0.05,
        "AUC of label-independent scores was {}",
        auc
    );
}

#[test]
fn auc_never_leaves_the_unit_interval() {
    // Long curves accumulate trapezoid rounding; the result must stay in
    // [0, 1] regardless.
    let mut rng = StdRng::seed_from_u64(11);
    let n = 1001;
    let y: Vec<bool> = (0..n).map(|i| i % 3 == 0 || rng.gen_bool(0.2)).collect();
    let scores: Array1<f32> =
        Array1::from_iter((0..n).map(|i| i as f32 * 1e-4 + rng.gen::<f32>()));

    let roc = roc_curve(&y, &scores).unwrap();
    let auc = area_under_curve(&roc);
    assert!((0.0..=1.0).contains(&auc), "ROC AUC = {}", auc);

    let pr = precision_recall_curve(&y, &scores).unwrap();
    let pr_auc = area_under_curve(&pr);
    assert!((0.0..=1.0).contains(&pr_auc), "PR AUC = {}", pr_auc);
}

#[test]
fn single_class_roc_is_a_config_error() {
    let y = vec![true, true, true];
    let scores = arr1(&[0.9f32, 0.5, 0.1]);
    assert!(matches!(roc_curve(&y, &scores), Err(EvalError::Config(_))));
}

// ---------------------------------------------------------------------------
// Threshold calibration
// ---------------------------------------------------------------------------

#[test]
fn calibrated_threshold_reproduces_the_target_precision() {
    // Clean scores up top, noisy below: precision 0.9 is reachable only at
    // conservative thresholds.
    let mut y = vec![true; 9];
    y.push(false);
    y.extend([false, true, false, false, true, false, false, false]);
    let scores: Array1<f32> =
        Array1::from_iter((0..y.len()).map(|i| 1.0 - i as f32 * 0.05));

    let curve = precision_recall_curve(&y, &scores).unwrap();
    let threshold = find_threshold_for_precision(&curve, 0.9).unwrap();

    // Re-derive predictions as "score >= threshold" and measure precision.
    let predicted: Vec<bool> = scores.iter().map(|&s| f64::from(s) >= threshold).collect();
    let tp = y
        .iter()
        .zip(&predicted)
        .filter(|&(&t, &p)| t && p)
        .count();
    let pp = predicted.iter().filter(|&&p| p).count();
    assert!(pp > 0);
    let precision = tp as f64 / pp as f64;
    assert!(
        precision >= 0.9 - 1e-9,
        "calibrated threshold {} gave precision {}",
        threshold,
        precision
    );
}

#[test]
fn unreachable_target_reports_infeasible_with_best_attainable() {
    // Alternating labels from the top: precision never exceeds 0.5.
    let y = vec![false, true, false, true];
    let scores = arr1(&[0.9f32, 0.8, 0.7, 0.6]);
    let curve = precision_recall_curve(&y, &scores).unwrap();

    match find_threshold_for_precision(&curve, 0.9) {
        Err(EvalError::CalibrationInfeasible { target, best }) => {
            assert!((target - 0.9).abs() < 1e-12);
            assert!((best - 0.5).abs() < 1e-12);
        }
        other => panic!("expected calibration-infeasible, got {:?}", other),
    }
}

#[test]
fn most_conservative_qualifying_threshold_wins() {
    // Precision is 1.0 at the top two thresholds, dips, then recovers.
    let y = vec![true, true, false, true];
    let scores = arr1(&[0.9f32, 0.8, 0.7, 0.6]);
    let curve = precision_recall_curve(&y, &scores).unwrap();
    let threshold = find_threshold_for_precision(&curve, 1.0).unwrap();
    assert!((threshold - 0.9).abs() < 1e-6);
}
