//! foldmetrics: evaluation and calibration helpers for classifiers.
//!
//! This crate provides stratified k-fold partitioning, a cross-validation
//! orchestrator with out-of-fold prediction aggregation, confusion-matrix
//! derived metrics (binary, multiclass and multilabel), precision/recall and
//! ROC curve tracing with trapezoidal AUC, and threshold calibration against
//! a target precision.
//!
//! The crate never trains a model itself: concrete learners are supplied by
//! the caller through the [`models::estimator::Estimator`] trait, one fresh
//! instance per fold, and all evaluation artifacts are recomputed from the
//! predictions and scores they produce.
pub mod config;
pub mod cross_validation;
pub mod curves;
pub mod data_handling;
pub mod error;
pub mod metrics;
pub mod models;
pub mod partition;
pub mod report;
