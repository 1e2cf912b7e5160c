//! Risk scoring for elderly diabetic patients.
//!
//! Everything here is pure: callers pass snapshots in and get plain values
//! back. Persistence and HTTP live in `db` and `api`.

pub mod cohort;
pub mod engine;
pub mod metrics;
pub mod recommendations;
pub mod rules;
pub mod types;

pub use cohort::{summarize, CohortMetric, CohortRow, CohortSummary};
pub use engine::{assess, score_category, score_risks};
pub use metrics::{compute_bmi, compute_egfr, DerivedMetrics};
pub use recommendations::derive_recommendations;
pub use types::*;
