//! HTTP API.
//!
//! JSON endpoints for patients, their vitals and medications, per-patient
//! risk assessment and the cohort dashboard. Routes are nested under
//! `/api/`; every request passes through the access logger.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server, ApiServer};
pub use types::ApiContext;
