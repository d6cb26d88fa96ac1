//! Integration tests for the take-home pay API.
//!
//! This test suite covers:
//! - Basic-rate, higher-rate and tapered salaries
//! - Regional income tax (UK vs Scotland)
//! - Student loan plans
//! - Pension contributions
//! - Query-string and JSON entry points
//! - Salary comparison
//! - Error cases

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tower::ServiceExt;

use take_home::api::{create_router, AppState};
use take_home::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/uk_2025_26").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, json)
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn get_query(router: Router, query: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/calculate?{}", query))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

fn assert_field(result: &Value, field: &str, expected: &str) {
    let actual = result[field]
        .as_str()
        .unwrap_or_else(|| panic!("field {} missing or not a string: {}", field, result));
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected {} {}, got {}",
        field,
        expected,
        actual
    );
}

fn field(result: &Value, field: &str) -> Decimal {
    Decimal::from_str(result[field].as_str().unwrap()).unwrap()
}

fn assert_sums_to_gross(result: &Value) {
    let total = field(result, "netAnnual")
        + field(result, "incomeTax")
        + field(result, "nationalInsurance")
        + field(result, "studentLoanRepayment")
        + field(result, "pensionContribution");
    let gap = (total - field(result, "gross")).abs();
    assert!(gap <= Decimal::new(1, 2), "breakdown off by {}", gap);
}

// =============================================================================
// SECTION 1: Query endpoint
// =============================================================================

#[tokio::test]
async fn test_query_30000_uk() {
    let (status, result) = get_query(create_router_for_test(), "grossSalary=30000&region=UK").await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, "gross", "30000");
    assert_field(&result, "incomeTax", "3486.00");
    assert_field(&result, "nationalInsurance", "1394.40");
    assert_field(&result, "studentLoanRepayment", "0");
    assert_field(&result, "netAnnual", "25119.60");
    assert_field(&result, "netMonthly", "2093.30");
    assert_field(&result, "netWeekly", "483.07");
    assert_field(&result, "effectiveTaxRatePercent", "11.62");
    assert_field(&result, "effectiveNiRatePercent", "4.65");
    assert_eq!(result["region"], "UK");
    assert!(result["studentLoanPlan"].is_null());
    assert_sums_to_gross(&result);
}

#[tokio::test]
async fn test_query_result_is_flat() {
    let (_, result) = get_query(create_router_for_test(), "grossSalary=45000").await;
    let object = result.as_object().unwrap();
    assert_eq!(object.len(), 13);
    assert!(object.values().all(|v| !v.is_object() && !v.is_array()));
}

#[tokio::test]
async fn test_query_defaults_when_empty() {
    let (status, result) = get_query(create_router_for_test(), "").await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, "gross", "0");
    assert_field(&result, "netAnnual", "0");
    assert_field(&result, "effectiveTaxRatePercent", "0");
    assert_field(&result, "effectiveNiRatePercent", "0");
    assert_eq!(result["region"], "UK");
}

#[tokio::test]
async fn test_query_accepts_snake_case_names() {
    let (status, result) = get_query(
        create_router_for_test(),
        "gross_salary=30000&student_loan_plan=plan2&pension_rate_percent=0",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&result, "studentLoanRepayment", "137.70");
    assert_eq!(result["studentLoanPlan"], "plan2");
}

#[tokio::test]
async fn test_query_decimals_have_two_places() {
    let (_, result) = get_query(create_router_for_test(), "grossSalary=30000").await;
    assert_eq!(result["incomeTax"], "3486.00");
    assert_eq!(result["nationalInsurance"], "1394.40");
    assert_eq!(result["pensionRate"], "0.00");
}

// =============================================================================
// SECTION 2: Bands, tapering and regions
// =============================================================================

#[tokio::test]
async fn test_higher_rate_60000() {
    let (_, result) = get_query(create_router_for_test(), "grossSalary=60000").await;
    // 7540 + 0.40 * 9730
    assert_field(&result, "incomeTax", "11432.00");
    // 3016 + 0.02 * 9730
    assert_field(&result, "nationalInsurance", "3210.60");
    assert_field(&result, "netAnnual", "45357.40");
}

#[tokio::test]
async fn test_tapered_allowance_120000() {
    let (status, detailed) = post_json(
        create_router_for_test(),
        "/calculate",
        json!({ "grossSalary": 120000, "region": "UK" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&detailed, "personalAllowance", "2570");
    assert_field(&detailed["result"], "incomeTax", "37432.00");
    assert_field(&detailed["result"], "nationalInsurance", "4410.60");
    assert_field(&detailed["result"], "netAnnual", "78157.40");
}

#[tokio::test]
async fn test_allowance_gone_at_125140() {
    let (_, detailed) = post_json(
        create_router_for_test(),
        "/calculate",
        json!({ "grossSalary": 125140 }),
    )
    .await;

    assert_field(&detailed, "personalAllowance", "0");
    // 0.20 * 50270 + 0.40 * 74870
    assert_field(&detailed["result"], "incomeTax", "40002.00");
}

#[tokio::test]
async fn test_allowance_untouched_at_100000() {
    let (_, detailed) = post_json(
        create_router_for_test(),
        "/calculate",
        json!({ "grossSalary": 100000 }),
    )
    .await;
    assert_field(&detailed, "personalAllowance", "12570");
}

#[tokio::test]
async fn test_scotland_vs_uk_50000() {
    let router = create_router_for_test();
    let (_, uk) = get_query(router.clone(), "grossSalary=50000&region=UK").await;
    let (_, scotland) = get_query(router, "grossSalary=50000&region=Scotland").await;

    assert_field(&uk, "incomeTax", "7486.00");
    assert_field(&scotland, "incomeTax", "9013.80");
    assert_eq!(uk["nationalInsurance"], scotland["nationalInsurance"]);
    assert_eq!(scotland["region"], "Scotland");
}

#[tokio::test]
async fn test_unknown_region_defaults_to_uk() {
    let (status, result) =
        get_query(create_router_for_test(), "grossSalary=50000&region=Atlantis").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["region"], "UK");
    assert_field(&result, "incomeTax", "7486.00");
}

// =============================================================================
// SECTION 3: Student loans and pension
// =============================================================================

#[tokio::test]
async fn test_plan2_30000() {
    let (_, result) =
        get_query(create_router_for_test(), "grossSalary=30000&studentLoanPlan=plan2").await;
    assert_field(&result, "studentLoanRepayment", "137.70");
    assert_field(&result, "netAnnual", "24981.90");
    assert_sums_to_gross(&result);
}

#[tokio::test]
async fn test_plan1_and_postgraduate() {
    let router = create_router_for_test();
    let (_, plan1) = get_query(router.clone(), "grossSalary=36065&studentLoanPlan=plan1").await;
    let (_, postgraduate) =
        get_query(router, "grossSalary=31000&studentLoanPlan=postgraduate").await;

    assert_field(&plan1, "studentLoanRepayment", "900.00");
    assert_field(&postgraduate, "studentLoanRepayment", "600.00");
    assert_eq!(postgraduate["studentLoanPlan"], "postgraduate_loan");
}

#[tokio::test]
async fn test_plan5_never_repays() {
    let (_, result) =
        get_query(create_router_for_test(), "grossSalary=80000&studentLoanPlan=plan5").await;
    assert_field(&result, "studentLoanRepayment", "0");
    assert_eq!(result["studentLoanPlan"], "plan5");
}

#[tokio::test]
async fn test_unknown_plan_means_no_repayment() {
    let (status, result) =
        get_query(create_router_for_test(), "grossSalary=80000&studentLoanPlan=plan3").await;
    assert_eq!(status, StatusCode::OK);
    assert_field(&result, "studentLoanRepayment", "0");
    assert!(result["studentLoanPlan"].is_null());
}

#[tokio::test]
async fn test_pension_5_percent_40000() {
    let (_, result) =
        get_query(create_router_for_test(), "grossSalary=40000&pensionRatePercent=5").await;

    assert_field(&result, "pensionContribution", "2000.00");
    assert_field(&result, "incomeTax", "5086.00");
    assert_field(&result, "nationalInsurance", "2034.40");
    assert_field(&result, "netAnnual", "30879.60");
    assert_field(&result, "pensionRate", "5");
    assert_sums_to_gross(&result);
}

#[tokio::test]
async fn test_all_deductions_together() {
    let (_, result) = get_query(
        create_router_for_test(),
        "grossSalary=65432.10&region=Scotland&studentLoanPlan=plan4&pensionRatePercent=7.5",
    )
    .await;
    assert_sums_to_gross(&result);
    assert!(field(&result, "studentLoanRepayment") > Decimal::ZERO);
}

// =============================================================================
// SECTION 4: Detailed POST endpoint
// =============================================================================

#[tokio::test]
async fn test_post_returns_detailed_breakdown() {
    let (status, detailed) = post_json(
        create_router_for_test(),
        "/calculate",
        json!({
            "grossSalary": "30000",
            "region": "UK",
            "studentLoanPlan": "plan2",
            "pensionRatePercent": 0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(detailed["taxYear"], "2025-26");
    assert!(detailed["calculationId"].is_string());
    assert!(detailed["timestamp"].is_string());
    assert_eq!(detailed["engineVersion"], env!("CARGO_PKG_VERSION"));
    assert_field(&detailed, "taxableBase", "30000");

    let income_tax_bands = detailed["incomeTaxBands"].as_array().unwrap();
    assert_eq!(income_tax_bands.len(), 4);
    assert_field(&income_tax_bands[1], "taxedAmount", "17430");
    assert_field(&income_tax_bands[1], "owed", "3486");
    assert!(income_tax_bands[3]["upper"].is_null());

    let ni_bands = detailed["nationalInsuranceBands"].as_array().unwrap();
    assert_eq!(ni_bands.len(), 3);

    let trace = detailed["auditTrace"].as_array().unwrap();
    assert_eq!(trace.len(), 6);
    assert_eq!(trace[0]["stepNumber"], 1);
    assert_eq!(trace[4]["ruleId"], "student_loan");
    assert_eq!(trace[4]["output"]["student_loan_repayment"], "137.70");
}

#[tokio::test]
async fn test_post_empty_body_uses_defaults() {
    let (status, detailed) = post_json(create_router_for_test(), "/calculate", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_field(&detailed["result"], "gross", "0");
    assert_eq!(detailed["result"]["region"], "UK");
}

// =============================================================================
// SECTION 5: Comparison
// =============================================================================

#[tokio::test]
async fn test_compare_two_salaries() {
    let (status, comparison) = post_json(
        create_router_for_test(),
        "/compare",
        json!({
            "first": { "grossSalary": 30000 },
            "second": { "grossSalary": 40000 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_field(&comparison["first"], "netAnnual", "25119.60");
    assert_field(&comparison["second"], "netAnnual", "32319.60");
    assert_field(&comparison, "grossDifference", "10000");
    assert_field(&comparison, "netAnnualDifference", "7200");
    assert_field(&comparison, "incomeTaxDifference", "2000");
    assert_field(&comparison, "nationalInsuranceDifference", "800");
}

#[tokio::test]
async fn test_compare_rejects_invalid_second_salary() {
    let (status, error) = post_json(
        create_router_for_test(),
        "/compare",
        json!({
            "first": { "grossSalary": 30000 },
            "second": { "grossSalary": -1 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
}

// =============================================================================
// SECTION 6: Error cases
// =============================================================================

#[tokio::test]
async fn test_error_malformed_json() {
    let router = create_router_for_test();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from("{invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, error) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_non_numeric_salary_in_body() {
    let (status, error) = post_json(
        create_router_for_test(),
        "/calculate",
        json!({ "grossSalary": "a lot" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_error_non_numeric_salary_in_query() {
    let (status, error) = get_query(create_router_for_test(), "grossSalary=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_NUMBER");
    assert!(error["message"].as_str().unwrap().contains("grossSalary"));
}

#[tokio::test]
async fn test_error_negative_salary() {
    let (status, error) = get_query(create_router_for_test(), "grossSalary=-100").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
    assert!(error["message"].as_str().unwrap().contains("gross_salary"));
}

#[tokio::test]
async fn test_error_negative_pension_rate() {
    let (status, error) = post_json(
        create_router_for_test(),
        "/calculate",
        json!({ "grossSalary": 30000, "pensionRatePercent": -3 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
    assert!(error["message"].as_str().unwrap().contains("pension_rate_percent"));
}

#[tokio::test]
async fn test_error_pension_rate_at_decimal_limit() {
    let (status, error) = get_query(
        create_router_for_test(),
        "grossSalary=30000&pensionRatePercent=79228162514264337593543950335",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
    assert!(error["message"].as_str().unwrap().contains("pension_rate_percent"));
}

#[tokio::test]
async fn test_error_salary_at_decimal_limit() {
    let (status, error) = get_query(
        create_router_for_test(),
        "grossSalary=79228162514264337593543950335&pensionRatePercent=5",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
    assert!(error["message"].as_str().unwrap().contains("gross_salary"));
}

#[tokio::test]
async fn test_error_salary_above_ceiling_in_comparison() {
    let (status, error) = post_json(
        create_router_for_test(),
        "/compare",
        json!({
            "first": { "grossSalary": 30000 },
            "second": { "grossSalary": 2000000000000u64 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_pension_rate_of_hundred_percent_accepted() {
    let (status, result) = get_query(
        create_router_for_test(),
        "grossSalary=30000&pensionRatePercent=100",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["pensionContribution"], "30000.00");
    assert_eq!(result["incomeTax"], "0.00");
    assert_eq!(result["netAnnual"], "0.00");
}

#[tokio::test]
async fn test_error_missing_content_type() {
    let router = create_router_for_test();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, error) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MISSING_CONTENT_TYPE");
}
