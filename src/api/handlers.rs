//! HTTP request handlers for the labor engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_annual_leave, calculate_average_wage, calculate_retirement_tax,
    calculate_severance, check_minimum_wage,
};
use crate::config::TaxRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{AverageWageInput, RetirementTaxInput, SeveranceInput};
use crate::store::NewCalculation;

use super::request::{LeaveRequest, ListCalculationsQuery, MinimumWageRequest, SeveranceRequest};
use super::response::{ApiError, ApiErrorResponse, MinimumWageRateResponse, SeveranceResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/annual-leave", post(annual_leave_handler))
        .route("/severance", post(severance_handler))
        .route("/average-wage", post(average_wage_handler))
        .route("/retirement-tax", post(retirement_tax_handler))
        .route("/minimum-wage", post(minimum_wage_handler))
        .route("/minimum-wage/:year", get(minimum_wage_rate_handler))
        .route(
            "/users/:user_id/calculations",
            post(save_calculation_handler).get(list_calculations_handler),
        )
        .route(
            "/users/:user_id/calculations/:id",
            delete(delete_calculation_handler),
        )
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a body parsing failure to a 400 with an [`ApiError`] body.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the failure
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
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
    json_response(StatusCode::BAD_REQUEST, error)
}

fn error_response(correlation_id: Uuid, operation: &'static str, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        operation,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn finish<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    started: Instant,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                duration_us = started.elapsed().as_micros() as u64,
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, body)
        }
        Err(err) => error_response(correlation_id, operation, err),
    }
}

/// Handler for POST /annual-leave.
async fn annual_leave_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaveRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing annual leave request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let started = Instant::now();
    let result = request
        .into_input(state.today())
        .and_then(|input| calculate_annual_leave(&input));
    finish(correlation_id, "annual_leave", started, result)
}

/// Handler for POST /severance.
///
/// With `include_tax`, the total amount is passed to the retirement tax
/// calculator with at least one year of service.
async fn severance_handler(
    State(state): State<AppState>,
    payload: Result<Json<SeveranceRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing severance request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let started = Instant::now();
    let result = severance_with_tax(
        &request.input,
        request.include_tax,
        state.config().tax_rules(),
    );
    finish(correlation_id, "severance", started, result)
}

fn severance_with_tax(
    input: &SeveranceInput,
    include_tax: bool,
    rules: &TaxRules,
) -> EngineResult<SeveranceResponse> {
    let severance = calculate_severance(input)?;
    if !include_tax {
        return Ok(SeveranceResponse {
            severance,
            tax: None,
        });
    }

    let years_of_service = u32::try_from(severance.working_years.max(1)).map_err(|_| {
        EngineError::CalculationError {
            message: format!("working years out of range: {}", severance.working_years),
        }
    })?;
    let tax_input = RetirementTaxInput {
        severance_amount: severance.total_amount,
        years_of_service,
        age: None,
    };
    let tax = calculate_retirement_tax(&tax_input, rules)?;
    Ok(SeveranceResponse {
        severance,
        tax: Some(tax),
    })
}

/// Handler for POST /average-wage.
async fn average_wage_handler(
    payload: Result<Json<AverageWageInput>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing average wage request");

    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let started = Instant::now();
    finish(
        correlation_id,
        "average_wage",
        started,
        calculate_average_wage(&input),
    )
}

/// Handler for POST /retirement-tax.
async fn retirement_tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<RetirementTaxInput>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing retirement tax request");

    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let started = Instant::now();
    let result = calculate_retirement_tax(&input, state.config().tax_rules());
    finish(correlation_id, "retirement_tax", started, result)
}

/// Handler for POST /minimum-wage.
async fn minimum_wage_handler(
    State(state): State<AppState>,
    payload: Result<Json<MinimumWageRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing minimum wage request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let started = Instant::now();
    let input = request.into_input(state.current_year());
    let result = check_minimum_wage(&input, state.config().minimum_wage_table());
    finish(correlation_id, "minimum_wage", started, result)
}

/// Handler for GET /minimum-wage/:year.
async fn minimum_wage_rate_handler(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    let started = Instant::now();
    let result = state
        .config()
        .get_minimum_wage(year)
        .map(|hourly_wage| MinimumWageRateResponse { year, hourly_wage });
    finish(correlation_id, "minimum_wage_rate", started, result)
}

/// Handler for POST /users/:user_id/calculations.
async fn save_calculation_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<NewCalculation>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, user_id = %user_id, "Saving calculation");

    let new = match payload {
        Ok(Json(new)) => new,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match state.store().create(&user_id, new) {
        Ok(saved) => json_response(StatusCode::CREATED, saved),
        Err(err) => error_response(correlation_id, "save_calculation", err),
    }
}

/// Handler for GET /users/:user_id/calculations.
async fn list_calculations_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<ListCalculationsQuery>, QueryRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let filter = match query {
        Ok(Query(query)) => query.calculation_type,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Invalid query string");
            return json_response(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(rejection.body_text()),
            );
        }
    };

    match state.store().list(&user_id, filter) {
        Ok(records) => json_response(StatusCode::OK, records),
        Err(err) => error_response(correlation_id, "list_calculations", err),
    }
}

/// Handler for DELETE /users/:user_id/calculations/:id.
async fn delete_calculation_handler(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let result = Uuid::parse_str(&id)
        .map_err(|_| EngineError::invalid_input("id", "must be a UUID"))
        .and_then(|id| state.store().delete(&user_id, id));

    match result {
        Ok(()) => {
            info!(correlation_id = %correlation_id, user_id = %user_id, id = %id, "Deleted calculation");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => error_response(correlation_id, "delete_calculation", err),
    }
}
