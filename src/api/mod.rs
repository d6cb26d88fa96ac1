//! HTTP API module for the take-home pay engine.
//!
//! This module provides the REST endpoints for calculating and comparing
//! UK take-home pay.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationQuery, CalculationRequest, ComparisonRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
