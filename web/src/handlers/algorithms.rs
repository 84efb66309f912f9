//! Algorithm endpoints under `/api/v1/algorithms`.

use crate::error::AppError;
use crate::extractors::{AuthUser, CorrelationId};
use crate::state::AppState;
use algorithm_hub_core::{
    AlgorithmDescriptor, AlgorithmKind, AlgorithmRequest, RequestId, UsageStats, catalog,
    validate_input,
};
use algorithm_hub_runtime::{AlgorithmResult, DEFAULT_HISTORY_LIMIT};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest `limit` accepted by the history endpoint.
pub const MAX_HISTORY_LIMIT: usize = 100;

/// Body of `POST /algorithms/process`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessRequest {
    /// Algorithm name, e.g. `"fibonacci"`
    pub algorithm_type: String,
    /// Algorithm payload
    pub input_data: Value,
}

/// Query of `GET /algorithms/history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    /// Maximum rows, 1..=100 (default 50)
    pub limit: Option<usize>,
    /// Keep only rows of this algorithm
    pub algorithm_type: Option<String>,
}

/// Body of `GET /algorithms/types`.
#[derive(Debug, Serialize)]
pub struct AlgorithmTypes {
    /// The fixed catalog
    pub types: Vec<AlgorithmDescriptor>,
}

fn parse_kind(name: &str) -> Result<AlgorithmKind, AppError> {
    name.parse()
        .map_err(|e: algorithm_hub_core::AlgorithmError| AppError::validation(e.to_string()))
}

/// Run one algorithm for the caller.
///
/// ```text
/// POST /api/v1/algorithms/process
/// {"algorithm_type": "fibonacci", "input_data": {"n": 10}}
/// ```
///
/// # Errors
///
/// - 401 without a valid bearer token
/// - 422 for an unknown algorithm or a payload failing boundary validation
/// - 400 when the routine rejects the payload (the record is stored as `failed`)
/// - 503 when the record store fails
#[tracing::instrument(skip_all, fields(correlation_id = %correlation_id, user_id = %user.id))]
pub async fn process(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    correlation_id: CorrelationId,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<AlgorithmResult>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::validation(rejection.body_text()))?;
    let kind = parse_kind(&request.algorithm_type)?;
    validate_input(kind, &request.input_data)?;

    let result = state.service.process(kind, request.input_data, &user.id).await?;

    tracing::info!(
        kind = %kind,
        request_id = %result.request_id,
        processing_time = result.processing_time.as_deref().unwrap_or_default(),
        "Algorithm processed"
    );
    Ok(Json(result))
}

/// The caller's lifecycle records, in the record store's order.
///
/// ```text
/// GET /api/v1/algorithms/history?limit=20&algorithm_type=sorting
/// ```
///
/// The kind filter is applied after the limit, so fewer than `limit` rows
/// may come back.
///
/// # Errors
///
/// - 401 without a valid bearer token
/// - 422 for a limit outside 1..=100 or an unknown `algorithm_type`
/// - 503 when the record store fails
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<AlgorithmRequest>>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::validation(rejection.body_text()))?;

    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(AppError::validation(format!(
            "limit: must be between 1 and {MAX_HISTORY_LIMIT}"
        )));
    }
    let kind = query.algorithm_type.as_deref().map(parse_kind).transpose()?;

    let mut history = state.service.get_history(&user.id, Some(limit)).await?;
    if let Some(kind) = kind {
        history.retain(|request| request.algorithm_kind() == kind);
    }
    Ok(Json(history))
}

/// One of the caller's lifecycle records.
///
/// ```text
/// GET /api/v1/algorithms/requests/{id}
/// ```
///
/// # Errors
///
/// - 401 without a valid bearer token
/// - 422 if `id` is not a UUID
/// - 404 if the record does not exist or belongs to someone else
pub async fn request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<AlgorithmRequest>, AppError> {
    let id: RequestId = id
        .parse()
        .map_err(|_| AppError::validation(format!("id: not a valid request id: {id}")))?;

    Ok(Json(state.service.get_request(&user.id, id).await?))
}

/// The catalog of supported algorithms. No authentication.
///
/// ```text
/// GET /api/v1/algorithms/types
/// ```
#[allow(clippy::unused_async)]
pub async fn types() -> Json<AlgorithmTypes> {
    Json(AlgorithmTypes { types: catalog() })
}

/// Usage statistics over every record the caller owns.
///
/// ```text
/// GET /api/v1/algorithms/stats
/// ```
///
/// # Errors
///
/// - 401 without a valid bearer token
/// - 503 when the record store fails
pub async fn stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UsageStats>, AppError> {
    Ok(Json(state.service.get_stats(&user.id).await?))
}
