//! Data processing for agronomic climate records.
//!
//! This crate turns filtered daily records into the derived tables behind
//! every dashboard page: per-year daily means with cross-year norms, year
//! profiles and similarity scores, rain-risk matrices, axis ranges for the
//! dual-axis constructor, and the field summary table.
//!
//! Every function here is pure: each stage builds a new table from its input.

pub mod aggregate;
pub mod colors;
pub mod constructor;
pub mod field_summary;
pub mod rain_risk;
pub mod scale;
pub mod similarity;

#[cfg(test)]
pub(crate) mod fixtures;
