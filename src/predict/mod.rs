//! Hydrate prediction module.
//!
//! Resolves raw request fields against the feature schema, runs single
//! predictions and pressure sweeps, and exposes both as HTTP endpoints.

mod models;
pub mod resolver;
mod routes;
pub mod service;
pub mod sweep;

pub use models::{CurveRequest, CurveResponse, PredictResponse, SchemaResponse};
pub use resolver::{resolve, resolve_fields, FieldOutcome, Resolution, ResolveError};
pub use routes::router;
pub use sweep::{sweep, Curve, PressureRange, SweepError};
