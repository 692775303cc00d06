//! Utility functions

pub mod scoring;

pub use scoring::{calc_penalty_time, score_time};
