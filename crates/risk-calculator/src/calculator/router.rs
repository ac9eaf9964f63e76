use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::analytics::{risk_matrix, risk_trends, EvaluationFilter};
use super::domain::{
    AppRequestId, AppRequestPatch, CriterionId, CriterionOptionPatch, CriterionPatch,
    NewAppRequest, NewCriterion, NewCriterionOption, NewPlatformType, OptionId, PlatformTypeId,
    PlatformTypePatch,
};
use super::export::{
    all_criteria_reference_csv, calculation_breakdown_csv, criteria_file_name,
    criteria_reference_csv, evaluation_file_name, ExportError,
};
use super::repository::StateRepository;
use super::scoring::{ScoringError, Selections};
use super::service::{CalculatorService, CalculatorServiceError};
use super::state::CatalogError;

const DEFAULT_TREND_DAYS: u32 = 30;

type SharedService<R> = Arc<CalculatorService<R>>;

/// Router exposing catalog administration, request scoring, exports and analytics.
pub fn calculator_router<R>(service: SharedService<R>) -> Router
where
    R: StateRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/platform-types",
            get(list_platform_types::<R>).post(create_platform_type::<R>),
        )
        .route(
            "/api/v1/platform-types/export",
            get(export_all_criteria::<R>),
        )
        .route(
            "/api/v1/platform-types/:platform_type_id",
            get(get_platform_type::<R>)
                .patch(update_platform_type::<R>)
                .delete(delete_platform_type::<R>),
        )
        .route(
            "/api/v1/platform-types/:platform_type_id/normalize",
            post(normalize_platform_type::<R>),
        )
        .route(
            "/api/v1/platform-types/:platform_type_id/export",
            get(export_platform_criteria::<R>),
        )
        .route(
            "/api/v1/platform-types/:platform_type_id/criteria",
            post(create_criterion::<R>),
        )
        .route(
            "/api/v1/platform-types/:platform_type_id/criteria/:criterion_id",
            patch(update_criterion::<R>).delete(delete_criterion::<R>),
        )
        .route(
            "/api/v1/platform-types/:platform_type_id/criteria/:criterion_id/options",
            post(create_option::<R>),
        )
        .route(
            "/api/v1/platform-types/:platform_type_id/criteria/:criterion_id/options/:option_id",
            patch(update_option::<R>).delete(delete_option::<R>),
        )
        .route(
            "/api/v1/requests",
            get(list_requests::<R>).post(create_request::<R>),
        )
        .route(
            "/api/v1/requests/:request_id",
            get(get_request::<R>)
                .patch(update_request::<R>)
                .delete(delete_request::<R>),
        )
        .route(
            "/api/v1/requests/:request_id/calculate",
            post(calculate_handler::<R>),
        )
        .route(
            "/api/v1/requests/:request_id/evaluate",
            post(evaluate_handler::<R>),
        )
        .route(
            "/api/v1/requests/:request_id/export",
            get(export_request::<R>),
        )
        .route("/api/v1/analytics/risk-matrix", get(risk_matrix_handler::<R>))
        .route("/api/v1/analytics/trends", get(trends_handler::<R>))
        .with_state(service)
}

/// Body of the calculate and evaluate endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionsPayload {
    #[serde(default)]
    pub selections: Selections,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrendsQuery {
    #[serde(default)]
    platform_type_id: Option<PlatformTypeId>,
    #[serde(default)]
    days: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedChild<I, T> {
    id: I,
    platform_type: T,
}

pub(crate) async fn list_platform_types<R>(State(service): State<SharedService<R>>) -> Response
where
    R: StateRepository + 'static,
{
    (StatusCode::OK, Json(service.platform_types())).into_response()
}

pub(crate) async fn create_platform_type<R>(
    State(service): State<SharedService<R>>,
    Json(input): Json<NewPlatformType>,
) -> Response
where
    R: StateRepository + 'static,
{
    respond(StatusCode::CREATED, service.add_platform_type(input))
}

pub(crate) async fn get_platform_type<R>(
    State(service): State<SharedService<R>>,
    Path(platform_type_id): Path<String>,
) -> Response
where
    R: StateRepository + 'static,
{
    let id = PlatformTypeId(platform_type_id);
    respond(StatusCode::OK, service.platform_type(&id))
}

pub(crate) async fn update_platform_type<R>(
    State(service): State<SharedService<R>>,
    Path(platform_type_id): Path<String>,
    Json(patch): Json<PlatformTypePatch>,
) -> Response
where
    R: StateRepository + 'static,
{
    let id = PlatformTypeId(platform_type_id);
    respond(StatusCode::OK, service.update_platform_type(&id, patch))
}

pub(crate) async fn delete_platform_type<R>(
    State(service): State<SharedService<R>>,
    Path(platform_type_id): Path<String>,
) -> Response
where
    R: StateRepository + 'static,
{
    let id = PlatformTypeId(platform_type_id);
    match service.delete_platform_type(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn normalize_platform_type<R>(
    State(service): State<SharedService<R>>,
    Path(platform_type_id): Path<String>,
) -> Response
where
    R: StateRepository + 'static,
{
    let id = PlatformTypeId(platform_type_id);
    respond(StatusCode::OK, service.normalize_criteria_weights(&id))
}

pub(crate) async fn create_criterion<R>(
    State(service): State<SharedService<R>>,
    Path(platform_type_id): Path<String>,
    Json(input): Json<NewCriterion>,
) -> Response
where
    R: StateRepository + 'static,
{
    let id = PlatformTypeId(platform_type_id);
    let created = service
        .add_criterion(&id, input)
        .map(|(id, platform_type)| CreatedChild { id, platform_type });
    respond(StatusCode::CREATED, created)
}

pub(crate) async fn update_criterion<R>(
    State(service): State<SharedService<R>>,
    Path((platform_type_id, criterion_id)): Path<(String, String)>,
    Json(patch): Json<CriterionPatch>,
) -> Response
where
    R: StateRepository + 'static,
{
    let result = service.update_criterion(
        &PlatformTypeId(platform_type_id),
        &CriterionId(criterion_id),
        patch,
    );
    respond(StatusCode::OK, result)
}

pub(crate) async fn delete_criterion<R>(
    State(service): State<SharedService<R>>,
    Path((platform_type_id, criterion_id)): Path<(String, String)>,
) -> Response
where
    R: StateRepository + 'static,
{
    let result =
        service.delete_criterion(&PlatformTypeId(platform_type_id), &CriterionId(criterion_id));
    respond(StatusCode::OK, result)
}

pub(crate) async fn create_option<R>(
    State(service): State<SharedService<R>>,
    Path((platform_type_id, criterion_id)): Path<(String, String)>,
    Json(input): Json<NewCriterionOption>,
) -> Response
where
    R: StateRepository + 'static,
{
    let created = service
        .add_criterion_option(
            &PlatformTypeId(platform_type_id),
            &CriterionId(criterion_id),
            input,
        )
        .map(|(id, platform_type)| CreatedChild { id, platform_type });
    respond(StatusCode::CREATED, created)
}

pub(crate) async fn update_option<R>(
    State(service): State<SharedService<R>>,
    Path((platform_type_id, criterion_id, option_id)): Path<(String, String, String)>,
    Json(patch): Json<CriterionOptionPatch>,
) -> Response
where
    R: StateRepository + 'static,
{
    let result = service.update_criterion_option(
        &PlatformTypeId(platform_type_id),
        &CriterionId(criterion_id),
        &OptionId(option_id),
        patch,
    );
    respond(StatusCode::OK, result)
}

pub(crate) async fn delete_option<R>(
    State(service): State<SharedService<R>>,
    Path((platform_type_id, criterion_id, option_id)): Path<(String, String, String)>,
) -> Response
where
    R: StateRepository + 'static,
{
    let result = service.delete_criterion_option(
        &PlatformTypeId(platform_type_id),
        &CriterionId(criterion_id),
        &OptionId(option_id),
    );
    respond(StatusCode::OK, result)
}

pub(crate) async fn list_requests<R>(State(service): State<SharedService<R>>) -> Response
where
    R: StateRepository + 'static,
{
    (StatusCode::OK, Json(service.app_requests())).into_response()
}

pub(crate) async fn create_request<R>(
    State(service): State<SharedService<R>>,
    Json(input): Json<NewAppRequest>,
) -> Response
where
    R: StateRepository + 'static,
{
    respond(StatusCode::CREATED, service.add_app_request(input))
}

pub(crate) async fn get_request<R>(
    State(service): State<SharedService<R>>,
    Path(request_id): Path<String>,
) -> Response
where
    R: StateRepository + 'static,
{
    respond(StatusCode::OK, service.app_request(&AppRequestId(request_id)))
}

pub(crate) async fn update_request<R>(
    State(service): State<SharedService<R>>,
    Path(request_id): Path<String>,
    Json(patch): Json<AppRequestPatch>,
) -> Response
where
    R: StateRepository + 'static,
{
    let result = service.update_app_request(&AppRequestId(request_id), patch);
    respond(StatusCode::OK, result)
}

pub(crate) async fn delete_request<R>(
    State(service): State<SharedService<R>>,
    Path(request_id): Path<String>,
) -> Response
where
    R: StateRepository + 'static,
{
    match service.delete_app_request(&AppRequestId(request_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn calculate_handler<R>(
    State(service): State<SharedService<R>>,
    Path(request_id): Path<String>,
    Json(payload): Json<SelectionsPayload>,
) -> Response
where
    R: StateRepository + 'static,
{
    let result = service.calculate_score(&AppRequestId(request_id), &payload.selections);
    respond(StatusCode::OK, result)
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<SharedService<R>>,
    Path(request_id): Path<String>,
    Json(payload): Json<SelectionsPayload>,
) -> Response
where
    R: StateRepository + 'static,
{
    let result = service.evaluate(&AppRequestId(request_id), &payload.selections);
    respond(StatusCode::OK, result)
}

pub(crate) async fn export_all_criteria<R>(State(service): State<SharedService<R>>) -> Response
where
    R: StateRepository + 'static,
{
    let file_name = criteria_file_name("All_Platforms", Utc::now().date_naive());
    csv_response(all_criteria_reference_csv(&service.platform_types()), &file_name)
}

pub(crate) async fn export_platform_criteria<R>(
    State(service): State<SharedService<R>>,
    Path(platform_type_id): Path<String>,
) -> Response
where
    R: StateRepository + 'static,
{
    let platform_type = match service.platform_type(&PlatformTypeId(platform_type_id)) {
        Ok(platform_type) => platform_type,
        Err(err) => return error_response(err),
    };
    let file_name = criteria_file_name(&platform_type.name, Utc::now().date_naive());
    csv_response(criteria_reference_csv(&platform_type), &file_name)
}

pub(crate) async fn export_request<R>(
    State(service): State<SharedService<R>>,
    Path(request_id): Path<String>,
) -> Response
where
    R: StateRepository + 'static,
{
    let request = match service.app_request(&AppRequestId(request_id)) {
        Ok(request) => request,
        Err(err) => return error_response(err),
    };
    let Some(result) = request.calculation_result.as_ref() else {
        let payload = json!({
            "error": format!("app request {} has no calculation result", request.id),
        });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    let file_name = evaluation_file_name(&request.name, Utc::now().date_naive());
    csv_response(calculation_breakdown_csv(&request, result), &file_name)
}

pub(crate) async fn risk_matrix_handler<R>(
    State(service): State<SharedService<R>>,
    Query(filter): Query<EvaluationFilter>,
) -> Response
where
    R: StateRepository + 'static,
{
    let state = service.snapshot();
    let matrix = risk_matrix(&state.app_requests, &state.platform_types, &filter);
    (StatusCode::OK, Json(matrix)).into_response()
}

pub(crate) async fn trends_handler<R>(
    State(service): State<SharedService<R>>,
    Query(query): Query<TrendsQuery>,
) -> Response
where
    R: StateRepository + 'static,
{
    let filter = EvaluationFilter {
        platform_type_id: query.platform_type_id,
        recommendation: None,
    };
    let days = query.days.unwrap_or(DEFAULT_TREND_DAYS);
    let report = risk_trends(&service.app_requests(), &filter, days, Utc::now());
    (StatusCode::OK, Json(report)).into_response()
}

fn respond<T>(status: StatusCode, result: Result<T, CalculatorServiceError>) -> Response
where
    T: Serialize,
{
    match result {
        Ok(value) => (status, Json(value)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Maps service failures onto HTTP status codes with a JSON error body.
pub(crate) fn error_response(err: CalculatorServiceError) -> Response {
    let status = match &err {
        CalculatorServiceError::Catalog(CatalogError::Validation(_)) => StatusCode::BAD_REQUEST,
        CalculatorServiceError::Catalog(_) => StatusCode::NOT_FOUND,
        CalculatorServiceError::Scoring(ScoringError::IncompleteSelection { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CalculatorServiceError::Scoring(_) => StatusCode::NOT_FOUND,
        CalculatorServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(error = %err, "calculator request failed");
    }

    let mut payload = json!({ "error": err.to_string() });
    if let CalculatorServiceError::Scoring(ScoringError::IncompleteSelection {
        criterion_id,
        ..
    }) = &err
    {
        payload["criterionId"] = json!(criterion_id);
    }
    (status, Json(payload)).into_response()
}

fn csv_response(rendered: Result<String, ExportError>, file_name: &str) -> Response {
    match rendered {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            body,
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "csv export failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
