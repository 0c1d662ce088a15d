use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::logic::{HealthReporter, SurveyError, SurveyRepository};
use crate::model::{FilterSet, Info, NewSurvey, SurveyPatch};
use crate::store::Gateway;

pub const JSON_UTF8: &str = "application/json; charset=UTF-8";
pub const MISSING_DATABASE: &str = "Database connection could not be found";

/// Everything the handlers share. The repository is absent when the service
/// was started without a database.
pub struct AppState<G: Gateway> {
    pub info: Info,
    pub repository: Option<SurveyRepository<G>>,
    pub health: HealthReporter<G>,
}

impl<G: Gateway> AppState<G> {
    pub fn new(gateway: Option<Arc<G>>, config: &AppConfig) -> Self {
        Self {
            info: Info {
                name: config.service.name.clone(),
                app_version: config.service.app_version.clone(),
            },
            repository: gateway
                .clone()
                .map(|gateway| SurveyRepository::new(gateway, &config.database.schema)),
            health: HealthReporter::new(gateway, config.health.rabbitmq_status.clone()),
        }
    }
}

pub type SharedState<G> = Arc<AppState<G>>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, [(header::CONTENT_TYPE, JSON_UTF8)], Json(body)).into_response()
}

fn repository<G: Gateway>(state: &AppState<G>) -> Result<&SurveyRepository<G>, ApiError> {
    state.repository.as_ref().ok_or_else(|| {
        log::error!("{}", MISSING_DATABASE);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(MISSING_DATABASE)),
        )
    })
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    log::error!("Rejected request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(&format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    )
}

fn survey_error(err: SurveyError) -> ApiError {
    let status = match &err {
        SurveyError::NotFound(_) => StatusCode::NOT_FOUND,
        err if err.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    log::error!("Survey request failed ({}): {}", status.as_u16(), err);
    (status, Json(ErrorResponse::new(&err.to_string())))
}

fn not_found(message: String) -> Response {
    log::error!("{}", message);
    json_response(StatusCode::NOT_FOUND, &ErrorResponse::new(&message))
}

pub async fn show_info<G: Gateway>(State(state): State<SharedState<G>>) -> Response {
    json_response(StatusCode::OK, &state.info)
}

pub async fn show_health<G: Gateway>(State(state): State<SharedState<G>>) -> Response {
    let status = state.health.report().await;
    json_response(StatusCode::OK, &status)
}

/// `GET /survey?surveyRef=&shortName=&longName=`
pub async fn search_surveys<G: Gateway>(
    State(state): State<SharedState<G>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let repository = repository(&state)?;
    let filters = FilterSet::from_pairs(params);

    let surveys = repository.search(&filters).await.map_err(survey_error)?;
    if surveys.is_empty() {
        return Ok(not_found("No surveys match the given parameters".to_string()));
    }

    log::info!("Found {} survey(s) for {:?}", surveys.len(), filters);
    Ok(json_response(StatusCode::OK, &surveys))
}

pub async fn create_survey<G: Gateway>(
    State(state): State<SharedState<G>>,
    body: Result<Json<NewSurvey>, JsonRejection>,
) -> Result<Response, ApiError> {
    let repository = repository(&state)?;
    let Json(new_survey) = body.map_err(bad_body)?;

    let survey = repository.create(new_survey).await.map_err(survey_error)?;

    log::info!("Created survey {}", survey.reference);
    Ok(json_response(StatusCode::CREATED, &survey))
}

pub async fn get_survey<G: Gateway>(
    State(state): State<SharedState<G>>,
    Path(reference): Path<String>,
) -> Result<Response, ApiError> {
    let repository = repository(&state)?;

    let surveys = repository
        .fetch_by_reference(&reference)
        .await
        .map_err(survey_error)?;
    if surveys.is_empty() {
        return Ok(not_found(format!("Survey '{}' not found", reference)));
    }

    log::info!("Fetched survey {}", reference);
    Ok(json_response(StatusCode::OK, &surveys))
}

pub async fn update_survey<G: Gateway>(
    State(state): State<SharedState<G>>,
    Path(reference): Path<String>,
    body: Result<Json<SurveyPatch>, JsonRejection>,
) -> Result<Response, ApiError> {
    let repository = repository(&state)?;
    let Json(patch) = body.map_err(bad_body)?;

    let survey = repository
        .update_by_reference(&reference, &patch)
        .await
        .map_err(survey_error)?;

    log::info!("Updated survey {}", reference);
    Ok(json_response(StatusCode::OK, &survey))
}

pub async fn delete_survey<G: Gateway>(
    State(state): State<SharedState<G>>,
    Path(reference): Path<String>,
) -> Result<StatusCode, ApiError> {
    let repository = repository(&state)?;

    repository
        .delete_by_reference(&reference)
        .await
        .map_err(survey_error)?;

    log::info!("Deleted survey {}", reference);
    Ok(StatusCode::NO_CONTENT)
}
