//! Integration tests for the labor engine HTTP API.
//!
//! This test suite covers every endpoint:
//! - Annual leave (hire-date and fiscal-year rules, defaults)
//! - Severance (DB, DC, hybrid, with and without retirement tax)
//! - Average wage
//! - Retirement income tax
//! - Minimum wage compliance and rate lookup
//! - Saved calculations
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use chrono::NaiveDate;
use labor_engine::api::{AppState, create_router};
use labor_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

/// Request defaults resolve against this date.
fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
}

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/kr_labor").expect("Failed to load config");
    AppState::new(config).with_today(test_today())
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Reads a decimal field that is serialized as a string.
fn dec_field(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal fields serialize as strings")).unwrap()
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, "POST", uri, Some(body)).await
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    send(router, "GET", uri, None).await
}

// =============================================================================
// Annual leave
// =============================================================================

#[tokio::test]
async fn test_annual_leave_one_year_mark() {
    let (status, result) = post(
        create_router_for_test(),
        "/annual-leave",
        json!({
            "hire_date": "2023-01-01",
            "reference_date": "2024-01-01",
            "fiscal_year_start": "01-01"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["hire_based"]["basic"], 15);
    assert_eq!(result["hire_based"]["additional"], 0);
    assert_eq!(result["hire_based"]["total"], 15);
}

#[tokio::test]
async fn test_annual_leave_three_year_mark_earns_additional_day() {
    let (status, result) = post(
        create_router_for_test(),
        "/annual-leave",
        json!({ "hire_date": "2021-01-01", "reference_date": "2024-01-02" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["service_years"], 3);
    assert_eq!(result["hire_based"]["additional"], 1);
    assert_eq!(result["hire_based"]["total"], 16);
}

#[tokio::test]
async fn test_annual_leave_same_day_is_zero() {
    let (status, result) = post(
        create_router_for_test(),
        "/annual-leave",
        json!({ "hire_date": "2024-03-04", "reference_date": "2024-03-04" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["hire_based"]["total"], 0);
    assert_eq!(result["fiscal_based"]["total"], 0);
    assert_eq!(result["difference"], 0);
}

#[tokio::test]
async fn test_annual_leave_history_ends_at_reference_totals() {
    let (status, result) = post(
        create_router_for_test(),
        "/annual-leave",
        json!({
            "hire_date": "2019-07-15",
            "reference_date": "2024-05-20",
            "fiscal_year_start": "01-01"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let history = result["yearly_history"].as_array().unwrap();
    assert_eq!(history.len(), 6);
    assert_eq!(history[0]["year"], 2019);

    let last = history.last().unwrap();
    assert_eq!(last["year"], 2024);
    assert_eq!(last["hire_based"], result["hire_based"]);
    assert_eq!(last["fiscal_based"], result["fiscal_based"]);
    assert_eq!(last["difference"], result["difference"]);
}

#[tokio::test]
async fn test_annual_leave_defaults_reference_date_to_today() {
    let (status, result) = post(
        create_router_for_test(),
        "/annual-leave",
        json!({ "hire_date": "2020-01-01" }),
    )
    .await;

    // 2020-01-01 through 2024-07-15, counting the hire day
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["service_days"], 1658);
    assert_eq!(result["service_years"], 4);
}

#[tokio::test]
async fn test_annual_leave_invalid_date_returns_400() {
    let (status, error) = post(
        create_router_for_test(),
        "/annual-leave",
        json!({ "hire_date": "2023-02-30", "reference_date": "2024-01-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_DATE");
    assert!(error["message"].as_str().unwrap().contains("hire_date"));
}

#[tokio::test]
async fn test_annual_leave_invalid_fiscal_start_returns_400() {
    let (status, error) = post(
        create_router_for_test(),
        "/annual-leave",
        json!({
            "hire_date": "2023-01-01",
            "reference_date": "2024-01-01",
            "fiscal_year_start": "13-01"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_DATE");
}

#[tokio::test]
async fn test_annual_leave_reference_before_hire_returns_400() {
    let (status, error) = post(
        create_router_for_test(),
        "/annual-leave",
        json!({ "hire_date": "2024-01-01", "reference_date": "2023-12-31" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_annual_leave_missing_hire_date_returns_validation_error() {
    let (status, error) = post(
        create_router_for_test(),
        "/annual-leave",
        json!({ "reference_date": "2024-01-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("hire_date"));
}

// =============================================================================
// Severance
// =============================================================================

#[tokio::test]
async fn test_severance_db_one_year() {
    let (status, result) = post(
        create_router_for_test(),
        "/severance",
        json!({
            "employment_start": "2023-01-01",
            "employment_end": "2024-01-01",
            "plan_type": "db",
            "average_monthly_pay": 3000000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let severance = &result["severance"];
    assert_eq!(severance["plan_type"], "db");
    assert_eq!(severance["working_days"], 365);
    assert_eq!(dec_field(&severance["severance_amount"]), decimal("3000000"));
    assert_eq!(dec_field(&severance["total_amount"]), decimal("3000000"));
    assert!(result.get("tax").is_none());
}

#[tokio::test]
async fn test_severance_db_with_tax() {
    let (status, result) = post(
        create_router_for_test(),
        "/severance",
        json!({
            "employment_start": "2014-01-01",
            "employment_end": "2024-01-01",
            "plan_type": "db",
            "average_monthly_pay": 6000000,
            "include_tax": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let severance = &result["severance"];
    assert_eq!(severance["working_days"], 3652);
    assert_eq!(severance["working_years"], 10);
    // 6,000,000 * 3652 / 365
    assert_eq!(dec_field(&severance["severance_amount"]), decimal("60032876"));
    assert_eq!(
        dec_field(&severance["continuous_service_bonus"]),
        decimal("12000000")
    );
    let total = dec_field(&severance["total_amount"]);
    assert_eq!(total, decimal("72032876"));

    let tax = &result["tax"];
    assert_eq!(tax["years_of_service"], 10);
    assert_eq!(dec_field(&tax["severance_amount"]), total);
    assert_eq!(dec_field(&tax["converted_income"]), decimal("3203287"));
    assert_eq!(
        dec_field(&tax["net_amount"]) + dec_field(&tax["total_tax"]),
        total
    );
}

#[tokio::test]
async fn test_severance_short_service_taxes_at_least_one_year() {
    let (status, result) = post(
        create_router_for_test(),
        "/severance",
        json!({
            "employment_start": "2024-01-01",
            "employment_end": "2024-07-01",
            "plan_type": "db",
            "average_monthly_pay": 3000000,
            "include_tax": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["severance"]["working_years"], 0);
    assert_eq!(result["tax"]["years_of_service"], 1);
}

#[tokio::test]
async fn test_severance_dc_zero_return_is_principal() {
    let (status, result) = post(
        create_router_for_test(),
        "/severance",
        json!({
            "employment_start": "2023-01-01",
            "employment_end": "2024-01-01",
            "plan_type": "dc",
            "monthly_contribution": 200000,
            "annual_return_rate": 0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["severance"]["plan_type"], "dc");
    assert_eq!(
        dec_field(&result["severance"]["total_amount"]),
        decimal("2400000")
    );
}

#[tokio::test]
async fn test_severance_hybrid_weights_plans() {
    let (status, result) = post(
        create_router_for_test(),
        "/severance",
        json!({
            "employment_start": "2023-01-01",
            "employment_end": "2024-01-01",
            "plan_type": "hybrid",
            "average_monthly_pay": 3000000,
            "monthly_contribution": 200000,
            "annual_return_rate": 5,
            "db_ratio": 60
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 3,000,000 * 0.6 + 2,400,000 * 0.4
    assert_eq!(
        dec_field(&result["severance"]["total_amount"]),
        decimal("2760000")
    );
}

#[tokio::test]
async fn test_severance_unknown_plan_type_returns_400() {
    let (status, _) = post(
        create_router_for_test(),
        "/severance",
        json!({
            "employment_start": "2023-01-01",
            "employment_end": "2024-01-01",
            "plan_type": "pension",
            "average_monthly_pay": 3000000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_severance_end_before_start_returns_400() {
    let (status, error) = post(
        create_router_for_test(),
        "/severance",
        json!({
            "employment_start": "2024-01-01",
            "employment_end": "2023-01-01",
            "plan_type": "db",
            "average_monthly_pay": 3000000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_severance_out_of_range_pay_returns_calculation_error() {
    let (status, error) = post(
        create_router_for_test(),
        "/severance",
        json!({
            "employment_start": "2000-01-01",
            "employment_end": "2024-01-01",
            "plan_type": "db",
            "average_monthly_pay": "10000000000000000000000000"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["code"], "CALCULATION_ERROR");
}

// =============================================================================
// Average wage
// =============================================================================

#[tokio::test]
async fn test_average_wage() {
    let (status, result) = post(
        create_router_for_test(),
        "/average-wage",
        json!({
            "months": [
                { "base_salary": 3000000, "allowances": [200000], "working_days": 31 },
                { "base_salary": 3000000, "allowances": [200000], "working_days": 29 },
                { "base_salary": 3000000, "allowances": [200000, 100000], "working_days": 31 }
            ],
            "annual_fixed_bonus": 3650000,
            "annual_leave_allowance": 730000
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["total_days"], 91);
    assert_eq!(dec_field(&result["final_daily_wage"]), decimal("118593"));
    assert_eq!(dec_field(&result["monthly_average_wage"]), decimal("3557790"));
}

#[tokio::test]
async fn test_average_wage_zero_days_returns_400() {
    let (status, error) = post(
        create_router_for_test(),
        "/average-wage",
        json!({
            "months": [
                { "base_salary": 3000000, "working_days": 31 },
                { "base_salary": 3000000, "working_days": 0 },
                { "base_salary": 3000000, "working_days": 31 }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
    assert!(error["message"].as_str().unwrap().contains("months[1]"));
}

#[tokio::test]
async fn test_average_wage_requires_three_months() {
    let (status, _) = post(
        create_router_for_test(),
        "/average-wage",
        json!({ "months": [{ "base_salary": 3000000, "working_days": 31 }] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Retirement tax
// =============================================================================

#[tokio::test]
async fn test_retirement_tax_bracket_boundary() {
    let (status, result) = post(
        create_router_for_test(),
        "/retirement-tax",
        json!({ "severance_amount": 85000000, "years_of_service": 5 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_field(&result["converted_income"]), decimal("14000000"));
    assert_eq!(dec_field(&result["tax_on_converted"]), decimal("840000"));
    assert_eq!(dec_field(&result["total_tax"]), decimal("3696000"));
    assert_eq!(dec_field(&result["net_amount"]), decimal("81304000"));
    assert_eq!(result["effective_rate"], "4.35");
}

#[tokio::test]
async fn test_retirement_tax_age_adds_note_only() {
    let router = create_router_for_test();
    let (_, without_age) = post(
        router.clone(),
        "/retirement-tax",
        json!({ "severance_amount": 150000000, "years_of_service": 12 }),
    )
    .await;
    let (status, with_age) = post(
        router,
        "/retirement-tax",
        json!({ "severance_amount": 150000000, "years_of_service": 12, "age": 57 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(without_age["total_tax"], with_age["total_tax"]);
    assert_eq!(with_age["notes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_retirement_tax_zero_years_returns_400() {
    let (status, error) = post(
        create_router_for_test(),
        "/retirement-tax",
        json!({ "severance_amount": 10000000, "years_of_service": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
}

// =============================================================================
// Minimum wage
// =============================================================================

#[tokio::test]
async fn test_minimum_wage_exact_threshold_is_compliant() {
    let (status, result) = post(
        create_router_for_test(),
        "/minimum-wage",
        json!({
            "pay": { "base_pay": 1713668 },
            "hours": { "weekly_hours": 40 },
            "year": 2024
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_field(&result["minimum_hourly_wage"]), decimal("9860"));
    assert_eq!(dec_field(&result["effective_hourly_wage"]), decimal("9860"));
    assert_eq!(result["is_violation"], false);
}

#[tokio::test]
async fn test_minimum_wage_sub_cent_shortfall_is_violation() {
    let (status, result) = post(
        create_router_for_test(),
        "/minimum-wage",
        json!({
            "pay": { "base_pay": 1971999 },
            "hours": { "weekly_hours": 40, "overtime_hours": "26.2" },
            "year": 2024
        }),
    )
    .await;

    // 1,971,999 / 200 hours = 9,859.995
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["is_violation"], true);
    assert_eq!(dec_field(&result["monthly_shortfall"]), decimal("1"));
}

#[tokio::test]
async fn test_minimum_wage_bonus_excluded_causes_violation() {
    let (status, result) = post(
        create_router_for_test(),
        "/minimum-wage",
        json!({
            "pay": { "base_pay": 1600000, "bonus": 400000 },
            "hours": { "weekly_hours": 40 },
            "year": 2024
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_field(&result["excluded_bonus"]), decimal("400000"));
    assert_eq!(dec_field(&result["includable_pay"]), decimal("1600000"));
    assert_eq!(result["is_violation"], true);
    assert!(dec_field(&result["shortfall"]) > Decimal::ZERO);
}

#[tokio::test]
async fn test_minimum_wage_defaults_to_current_year() {
    let (status, result) = post(
        create_router_for_test(),
        "/minimum-wage",
        json!({
            "pay": { "base_pay": 3000000 },
            "hours": { "weekly_hours": 40 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["year"], 2024);
    assert_eq!(dec_field(&result["minimum_hourly_wage"]), decimal("9860"));
}

#[tokio::test]
async fn test_minimum_wage_unknown_year_returns_400() {
    let (status, error) = post(
        create_router_for_test(),
        "/minimum-wage",
        json!({
            "pay": { "base_pay": 2000000 },
            "hours": { "weekly_hours": 40 },
            "year": 1999
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MINIMUM_WAGE_NOT_FOUND");
}

#[tokio::test]
async fn test_minimum_wage_rate_lookup() {
    let (status, result) = get(create_router_for_test(), "/minimum-wage/2025").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["year"], 2025);
    assert_eq!(dec_field(&result["hourly_wage"]), decimal("10030"));
}

#[tokio::test]
async fn test_minimum_wage_rate_lookup_unknown_year() {
    let (status, error) = get(create_router_for_test(), "/minimum-wage/1990").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MINIMUM_WAGE_NOT_FOUND");
}

// =============================================================================
// Saved calculations
// =============================================================================

#[tokio::test]
async fn test_saved_calculation_lifecycle() {
    let router = create_router_for_test();

    let (status, saved) = post(
        router.clone(),
        "/users/user-1/calculations",
        json!({
            "calculation_type": "severance",
            "label": "2024 퇴직",
            "payload": { "total_amount": "3000000" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["user_id"], "user-1");
    assert_eq!(saved["calculation_type"], "severance");
    let id = saved["id"].as_str().unwrap().to_string();

    post(
        router.clone(),
        "/users/user-1/calculations",
        json!({ "calculation_type": "annual_leave", "payload": {} }),
    )
    .await;

    let (status, all) = get(router.clone(), "/users/user-1/calculations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, filtered) = get(router.clone(), "/users/user-1/calculations?type=severance").await;
    assert_eq!(status, StatusCode::OK);
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["id"], id.as_str());

    let uri = format!("/users/user-1/calculations/{}", id);
    let (status, body) = send(router.clone(), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, error) = send(router.clone(), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");

    let (_, remaining) = get(router, "/users/user-1/calculations").await;
    assert_eq!(remaining.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_saved_calculations_are_scoped_per_user() {
    let router = create_router_for_test();

    let (_, saved) = post(
        router.clone(),
        "/users/user-1/calculations",
        json!({ "calculation_type": "minimum_wage", "payload": {} }),
    )
    .await;
    let id = saved["id"].as_str().unwrap();

    let (_, other) = get(router.clone(), "/users/user-2/calculations").await;
    assert!(other.as_array().unwrap().is_empty());

    let uri = format!("/users/user-2/calculations/{}", id);
    let (status, _) = send(router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_saved_calculations_invalid_type_filter_returns_400() {
    let (status, error) = get(
        create_router_for_test(),
        "/users/user-1/calculations?type=payroll",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_delete_with_malformed_id_returns_400() {
    let (status, error) = send(
        create_router_for_test(),
        "DELETE",
        "/users/user-1/calculations/not-a-uuid",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
}

// =============================================================================
// Malformed requests
// =============================================================================

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/retirement-tax")
                .header("Content-Type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/average-wage")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(error["code"], "MISSING_CONTENT_TYPE");
}
