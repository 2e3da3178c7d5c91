pub mod cli;

use axum::{
    Router,
    extract::{
        Json, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::core::{
    AllocationValidation, AssetAllocationEntry, GoalHorizon, MacroSnapshot, PortfolioMetrics,
    ProjectionPoint, ProjectionRequest, RiskProfile, ScenarioTag, aggregate, classify,
    evaluate_portfolio, project, required_monthly_contribution, set_allocation, template_for,
    time_to_reach_goal, validate_allocation,
};

pub const MAX_PROJECTION_YEARS: u32 = 100;
const DEFAULT_PROJECTION_YEARS: u32 = 10;

type JsonPayload<T> = Result<Json<T>, JsonRejection>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EntriesPayload {
    entries: Vec<AssetAllocationEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AllocationEditPayload {
    entries: Vec<AssetAllocationEntry>,
    index: Option<usize>,
    value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionPayload {
    principal: Option<f64>,
    annual_return: Option<f64>,
    years: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ContributionPayload {
    principal: Option<f64>,
    annual_return: Option<f64>,
    years: Option<u32>,
    target: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HorizonPayload {
    principal: Option<f64>,
    monthly_contribution: Option<f64>,
    annual_return: Option<f64>,
    target: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScenarioPayload {
    snapshot: Option<MacroSnapshot>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EvaluatePayload {
    entries: Vec<AssetAllocationEntry>,
    principal: Option<f64>,
    years: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateResponse {
    tier: RiskProfile,
    entries: Vec<AssetAllocationEntry>,
    validation: AllocationValidation,
    metrics: PortfolioMetrics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationResponse {
    entries: Vec<AssetAllocationEntry>,
    validation: AllocationValidation,
    metrics: PortfolioMetrics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsResponse {
    metrics: PortfolioMetrics,
    validation: AllocationValidation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    principal: f64,
    annual_return: f64,
    years: u32,
    points: Vec<ProjectionPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContributionResponse {
    monthly_contribution: Option<f64>,
    reachable: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioResponse {
    scenario: ScenarioTag,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/templates/:tier", get(template_handler))
        .route("/api/allocation", post(allocation_handler))
        .route("/api/metrics", post(metrics_handler))
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .route("/api/goals/contribution", post(contribution_handler))
        .route("/api/goals/horizon", post(horizon_handler))
        .route("/api/scenario", post(scenario_handler))
        .route("/api/evaluate", post(evaluate_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(settings: Settings) -> std::io::Result<()> {
    let addr = settings.bind_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "advisor HTTP API listening");

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

async fn healthz() -> &'static str {
    "ok"
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn template_handler(Path(tier): Path<String>) -> Response {
    let profile = RiskProfile::from_tier(&tier);
    let entries = template_for(profile);
    let response = TemplateResponse {
        tier: profile,
        validation: validate_allocation(&entries),
        metrics: aggregate(&entries),
        entries,
    };
    json_response(StatusCode::OK, response)
}

async fn allocation_handler(payload: JsonPayload<AllocationEditPayload>) -> Response {
    let payload = match accept_json(payload) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match allocation_response(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => bad_request(&msg),
    }
}

async fn metrics_handler(payload: JsonPayload<EntriesPayload>) -> Response {
    let payload = match accept_json(payload) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let response = MetricsResponse {
        metrics: aggregate(&payload.entries),
        validation: validate_allocation(&payload.entries),
    };
    json_response(StatusCode::OK, response)
}

async fn projection_get_handler(
    payload: Result<Query<ProjectionPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => projection_handler_impl(payload),
        Err(rejection) => rejected(rejection.status(), &rejection.body_text()),
    }
}

async fn projection_post_handler(payload: JsonPayload<ProjectionPayload>) -> Response {
    match accept_json(payload) {
        Ok(payload) => projection_handler_impl(payload),
        Err(response) => response,
    }
}

fn projection_handler_impl(payload: ProjectionPayload) -> Response {
    match projection_response(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => bad_request(&msg),
    }
}

async fn contribution_handler(payload: JsonPayload<ContributionPayload>) -> Response {
    let payload = match accept_json(payload) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match contribution_response(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => bad_request(&msg),
    }
}

async fn horizon_handler(payload: JsonPayload<HorizonPayload>) -> Response {
    let payload = match accept_json(payload) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    match horizon_response(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => bad_request(&msg),
    }
}

async fn scenario_handler(payload: JsonPayload<ScenarioPayload>) -> Response {
    let payload = match accept_json(payload) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let scenario = classify(payload.snapshot.as_ref());
    tracing::debug!(%scenario, "classified macro snapshot");
    json_response(
        StatusCode::OK,
        ScenarioResponse {
            scenario,
            label: scenario.label(),
        },
    )
}

async fn evaluate_handler(payload: JsonPayload<EvaluatePayload>) -> Response {
    let payload = match accept_json(payload) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    let request = match projection_request(payload.principal, payload.years) {
        Ok(request) => request,
        Err(msg) => return bad_request(&msg),
    };
    json_response(StatusCode::OK, evaluate_portfolio(&payload.entries, request))
}

fn allocation_response(payload: AllocationEditPayload) -> Result<AllocationResponse, String> {
    let index = payload.index.ok_or("index is required")?;
    let value = require_finite("value", payload.value)?;
    let entries = set_allocation(&payload.entries, index, value).map_err(|e| e.to_string())?;

    Ok(AllocationResponse {
        validation: validate_allocation(&entries),
        metrics: aggregate(&entries),
        entries,
    })
}

fn projection_response(payload: ProjectionPayload) -> Result<ProjectionResponse, String> {
    let request = projection_request(payload.principal, payload.years)?;
    let annual_return = require_rate(payload.annual_return)?;

    Ok(ProjectionResponse {
        principal: request.principal,
        annual_return,
        years: request.years,
        points: project(request.principal, annual_return, request.years),
    })
}

fn contribution_response(payload: ContributionPayload) -> Result<ContributionResponse, String> {
    let principal = require_non_negative("principal", payload.principal)?;
    let annual_return = require_rate(payload.annual_return)?;
    let years = require_years(payload.years)?;
    let target = require_non_negative("target", payload.target)?;

    let monthly_contribution =
        required_monthly_contribution(principal, annual_return, years, target);
    Ok(ContributionResponse {
        reachable: monthly_contribution.is_some(),
        monthly_contribution,
    })
}

fn horizon_response(payload: HorizonPayload) -> Result<GoalHorizon, String> {
    let principal = require_non_negative("principal", payload.principal)?;
    let monthly_contribution =
        require_non_negative("monthlyContribution", payload.monthly_contribution)?;
    let annual_return = require_rate(payload.annual_return)?;
    let target = require_non_negative("target", payload.target)?;

    Ok(time_to_reach_goal(
        principal,
        monthly_contribution,
        annual_return,
        target,
    ))
}

fn projection_request(
    principal: Option<f64>,
    years: Option<u32>,
) -> Result<ProjectionRequest, String> {
    Ok(ProjectionRequest {
        principal: require_non_negative("principal", principal)?,
        years: require_years(years)?,
    })
}

fn require_finite(name: &str, value: Option<f64>) -> Result<f64, String> {
    let Some(value) = value else {
        return Err(format!("{name} is required"));
    };
    if !value.is_finite() {
        return Err(format!("{name} must be a finite number"));
    }
    Ok(value)
}

fn require_non_negative(name: &str, value: Option<f64>) -> Result<f64, String> {
    let value = require_finite(name, value)?;
    if value < 0.0 {
        return Err(format!("{name} must be >= 0"));
    }
    Ok(value)
}

fn require_rate(value: Option<f64>) -> Result<f64, String> {
    require_finite("annualReturn", value)
}

fn require_years(years: Option<u32>) -> Result<u32, String> {
    let years = years.unwrap_or(DEFAULT_PROJECTION_YEARS);
    if years > MAX_PROJECTION_YEARS {
        return Err(format!("years must be <= {MAX_PROJECTION_YEARS}"));
    }
    Ok(years)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

/// Body extraction failures keep axum's status but use the JSON error body.
fn accept_json<T>(payload: JsonPayload<T>) -> Result<T, Response> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| rejected(rejection.status(), &rejection.body_text()))
}

fn rejected(status: StatusCode, msg: &str) -> Response {
    tracing::debug!(%status, error = msg, "rejected request body");
    error_response(status, msg)
}

fn bad_request(msg: &str) -> Response {
    tracing::debug!(error = msg, "rejected request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequest;
    use serde_json::Value;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    fn payload<T: serde::de::DeserializeOwned>(json: &str) -> T {
        serde_json::from_str(json).expect("payload should parse")
    }

    #[test]
    fn allocation_payload_parses_web_keys() {
        let parsed: AllocationEditPayload = payload(
            r##"{
              "entries": [
                {
                  "name": "Equities",
                  "allocation": 60,
                  "expectedReturn": 12,
                  "risk": 18,
                  "color": "#f00"
                },
                {"name": "Bonds", "allocation": 40, "expectedReturn": 6, "risk": 4}
              ],
              "index": 1,
              "value": 50
            }"##,
        );
        let response = allocation_response(parsed).expect("valid edit");

        assert_approx(response.entries[0].allocation, 50.0);
        assert_approx(response.entries[1].allocation, 50.0);
        assert_eq!(response.entries[0].color, "#f00");
        assert!(response.validation.is_valid);
        assert_approx(response.metrics.expected_return, 9.0);
    }

    #[test]
    fn allocation_requires_index_and_value() {
        let missing_index: AllocationEditPayload = payload(r#"{"entries": [], "value": 10}"#);
        let err = allocation_response(missing_index).expect_err("index is required");
        assert!(err.contains("index"));

        let missing_value: AllocationEditPayload = payload(r#"{"entries": [], "index": 0}"#);
        let err = allocation_response(missing_value).expect_err("value is required");
        assert!(err.contains("value"));
    }

    #[test]
    fn allocation_rejects_out_of_range_index() {
        let parsed: AllocationEditPayload = payload(
            r#"{
              "entries": [{"name": "Cash", "allocation": 100}],
              "index": 3,
              "value": 10
            }"#,
        );
        let err = allocation_response(parsed).expect_err("index out of range");
        assert!(err.contains("out of bounds"));
    }

    #[test]
    fn projection_defaults_years_and_validates_inputs() {
        let parsed: ProjectionPayload = payload(r#"{"principal": 1000, "annualReturn": 10}"#);
        let response = projection_response(parsed).expect("valid projection");
        assert_eq!(response.points.len(), DEFAULT_PROJECTION_YEARS as usize);
        assert_approx(response.points[2].value, 1331.0);

        let negative: ProjectionPayload =
            payload(r#"{"principal": -1, "annualReturn": 10, "years": 3}"#);
        let err = projection_response(negative).expect_err("negative principal");
        assert!(err.contains("principal"));

        let too_long: ProjectionPayload =
            payload(r#"{"principal": 1, "annualReturn": 10, "years": 101}"#);
        let err = projection_response(too_long).expect_err("years above cap");
        assert!(err.contains("years"));

        let no_rate: ProjectionPayload = payload(r#"{"principal": 1, "years": 3}"#);
        let err = projection_response(no_rate).expect_err("rate is required");
        assert!(err.contains("annualReturn"));
    }

    #[test]
    fn contribution_reports_unreachable_without_time() {
        let parsed: ContributionPayload =
            payload(r#"{"principal": 100, "annualReturn": 5, "years": 0, "target": 1000}"#);
        let response = contribution_response(parsed).expect("valid payload");
        assert!(!response.reachable);
        assert!(response.monthly_contribution.is_none());
    }

    #[test]
    fn horizon_serializes_status() {
        let parsed: HorizonPayload = payload(
            r#"{"principal": 0, "monthlyContribution": 100, "annualReturn": 0, "target": 1200}"#,
        );
        let horizon = horizon_response(parsed).expect("valid payload");
        let json = serde_json::to_value(horizon).expect("serialize");
        assert_eq!(json["status"], "reached");
        assert_eq!(json["months"], 12);
    }

    #[tokio::test]
    async fn template_endpoint_falls_back_to_moderate() {
        let response = template_handler(Path("unknown".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );

        let json = body_json(response).await;
        assert_eq!(json["tier"], "moderate");
        assert_eq!(json["validation"]["isValid"], true);
        assert!(json["entries"].as_array().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn scenario_endpoint_handles_missing_snapshot() {
        let response = scenario_handler(Ok(Json(payload("{}")))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["scenario"], "baseline");
        assert_eq!(json["label"], ScenarioTag::Baseline.label());
    }

    #[tokio::test]
    async fn scenario_endpoint_classifies_snapshot() {
        let body = r#"{"snapshot": {
          "inflationRateTrailing12m": 8,
          "gdpAnnualForecast": 1,
          "gdpLastQuarter": 0.2,
          "policyRateCurrent": 12,
          "currencyVariationPct": 3,
          "growthTrendIndicator": "stable"
        }}"#;
        let response = scenario_handler(Ok(Json(payload(body)))).await;
        let json = body_json(response).await;
        assert_eq!(json["scenario"], "stagflation");
    }

    #[tokio::test]
    async fn evaluate_endpoint_flags_unbalanced_allocation() {
        let body = r#"{
          "entries": [
            {"name": "Equities", "allocation": 50, "expectedReturn": 10, "risk": 18},
            {"name": "Bonds", "allocation": 30, "expectedReturn": 6, "risk": 4}
          ],
          "principal": 1000,
          "years": 2
        }"#;
        let response = evaluate_handler(Ok(Json(payload(body)))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["validation"]["isValid"], false);
        assert_eq!(json["projection"].as_array().map(Vec::len), Some(2));
        let expected_return = json["metrics"]["expectedReturn"].as_f64().expect("number");
        assert_approx(expected_return, 6.8);
    }

    #[tokio::test]
    async fn bad_requests_return_error_body() {
        let response = projection_post_handler(Ok(Json(payload(r#"{"annualReturn": 5}"#)))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "principal is required");
    }

    async fn extract_json<T: serde::de::DeserializeOwned>(body: &'static str) -> JsonPayload<T> {
        let request = axum::http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .expect("request should build");
        Json::<T>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn incomplete_snapshot_is_rejected_with_json_error() {
        let body = r#"{"snapshot": {"inflationRateTrailing12m": 8}}"#;
        let response = scenario_handler(extract_json(body).await).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        let message = json["error"].as_str().expect("error message");
        assert!(message.contains("gdpAnnualForecast"), "{message}");
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_with_json_error() {
        let response = metrics_handler(extract_json("{not json").await).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let response = not_found_handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Not found");
    }
}
