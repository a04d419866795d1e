//! axum routes.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use bondalayze_application::{AnalysisUseCase, AnalyzeCommand};
use bondalayze_core::BondaError;
use bondalayze_core::image::EncodedImage;
use bondalayze_core::plan::Plan;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api_error::ApiError;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone)]
pub struct AppState {
    pub usecase: Arc<AnalysisUseCase>,
}

impl AppState {
    pub fn new(usecase: Arc<AnalysisUseCase>) -> Self {
        Self { usecase }
    }
}

/// `POST /api/analyze` body.
#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub images: Vec<EncodedImage>,
    #[serde(default)]
    pub space_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub days: Option<u32>,
    pub space_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSpaceBody {
    pub name: String,
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .route("/api/usage", get(usage))
        .route("/api/analyses", get(list_analyses))
        .route("/api/analyses/:id", delete(delete_analysis))
        .route("/api/spaces", get(list_spaces).post(create_space))
        .route("/api/spaces/:id/analyses", delete(clear_space))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    let Json(body) = body.map_err(|rejection| invalid_body(rejection.body_text()))?;

    let command = AnalyzeCommand {
        text: body.text,
        requested_plan: body.plan.as_deref().and_then(|plan| plan.parse::<Plan>().ok()),
        images: body.images,
        space_id: body.space_id.filter(|id| !id.trim().is_empty()),
    };

    let response = state.usecase.analyze(token, command).await?;
    Ok(Json(response))
}

async fn usage(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    Ok(Json(state.usecase.usage(token).await?))
}

async fn list_analyses(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    let Query(params) = params.map_err(|rejection| invalid_body(rejection.body_text()))?;

    let records = state
        .usecase
        .history(token, params.days, params.space_id)
        .await?;
    Ok(Json(records))
}

async fn delete_analysis(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    state.usecase.delete_analysis(token, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_spaces(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    Ok(Json(state.usecase.spaces(token).await?))
}

async fn create_space(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateSpaceBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    let Json(body) = body.map_err(|rejection| invalid_body(rejection.body_text()))?;

    let space = state.usecase.create_space(token, &body.name).await?;
    Ok((StatusCode::CREATED, Json(space)))
}

async fn clear_space(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(space_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    let deleted = state.usecase.clear_space(token, &space_id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError(BondaError::Unauthorized))
}

fn invalid_body(detail: String) -> ApiError {
    ApiError(BondaError::invalid_input(detail))
}
