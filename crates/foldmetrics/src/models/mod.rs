pub mod estimator;
pub mod one_vs_rest;
