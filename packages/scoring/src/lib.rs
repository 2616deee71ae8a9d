#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Deterministic site scoring engine.
//!
//! Turns raw per-site signals (transit distance, daily pedestrian flow,
//! competitor count, bike-share availability, rent) into a normalized 0-100
//! recommendation score with categorical labels. The engine is a pure,
//! stateless function of its inputs: no I/O, no shared state, safe to invoke
//! concurrently for arbitrarily many sites.

pub mod decay;
pub mod engine;

pub use engine::{
    RATIO_SENTINEL, flow_accessibility, rent_sub_score, score_batch, score_site,
    supply_demand_ratio,
};

use thiserror::Error;

/// Errors that can occur when scoring a site.
///
/// The engine never retries and never panics: a malformed input fails fast
/// with the offending field named, and degenerate arithmetic (zero flow) is
/// handled via the [`RATIO_SENTINEL`] rather than reported as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// A numeric field is not a usable number (negative, NaN, or infinite).
    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        /// Name of the offending input field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}
