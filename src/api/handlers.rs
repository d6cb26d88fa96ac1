//! HTTP request handlers for the take-home pay API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate, calculate_detailed, compare};

use super::request::{CalculationQuery, CalculationRequest, ComparisonRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/calculate",
            get(calculate_query_handler).post(calculate_handler),
        )
        .route("/compare", post(compare_handler))
        .with_state(state)
}

/// Handler for GET /calculate.
///
/// Reads the inputs from the query string and returns the flat result.
async fn calculate_query_handler(
    State(state): State<AppState>,
    query: Result<Query<CalculationQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation query");

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Query string rejected"
            );
            return ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
                .into_response();
        }
    };

    let request = match query.into_request() {
        Ok(request) => request,
        Err(error) => {
            warn!(
                correlation_id = %correlation_id,
                error = %error.message,
                "Malformed number in query"
            );
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    let input = match request.into_input() {
        Ok(input) => input,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid input");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let start_time = Instant::now();
    let result = calculate(&input, state.rules());
    info!(
        correlation_id = %correlation_id,
        gross = %result.gross,
        net_annual = %result.net_annual,
        duration_us = start_time.elapsed().as_micros(),
        "Calculation completed successfully"
    );
    json_response(result)
}

/// Handler for POST /calculate.
///
/// Accepts a calculation request and returns the detailed result with
/// per-band lines and an audit trace.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(rejection, correlation_id).into_response(),
    };

    let input = match request.into_input() {
        Ok(input) => input,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid input");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let start_time = Instant::now();
    let detailed = calculate_detailed(&input, state.rules());
    info!(
        correlation_id = %correlation_id,
        calculation_id = %detailed.calculation_id,
        gross = %detailed.result.gross,
        net_annual = %detailed.result.net_annual,
        duration_us = start_time.elapsed().as_micros(),
        "Calculation completed successfully"
    );
    json_response(detailed)
}

/// Handler for POST /compare.
///
/// Runs two independent calculations and returns them side by side.
async fn compare_handler(
    State(state): State<AppState>,
    payload: Result<Json<ComparisonRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing comparison request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(rejection, correlation_id).into_response(),
    };

    let inputs = request
        .first
        .into_input()
        .and_then(|first| request.second.into_input().map(|second| (first, second)));
    let (first, second) = match inputs {
        Ok(pair) => pair,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid input");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let comparison = compare(&first, &second, state.rules());
    info!(
        correlation_id = %correlation_id,
        net_annual_difference = %comparison.net_annual_difference,
        "Comparison completed successfully"
    );
    json_response(comparison)
}

/// Maps a JSON body rejection to an error response.
fn json_rejection(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the bad field
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::validation_error(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn json_response<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
