use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use lodge_core::models::{EnrollmentResponse, UpsertEnrollmentRequest};
use lodge_core::CoreError;
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CepQuery {
    pub cep: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments", get(get_enrollment).post(upsert_enrollment))
        .route("/enrollments/cep", get(get_address_from_cep))
}

async fn get_enrollment(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    Ok(Json(state.enrollments.get_enrollment(user_id).await?))
}

async fn upsert_enrollment(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    AppJson(req): AppJson<UpsertEnrollmentRequest>,
) -> Result<StatusCode, AppError> {
    state.enrollments.upsert_enrollment(user_id, &req).await?;
    Ok(StatusCode::OK)
}

/// A lookup miss answers 204 rather than 404.
async fn get_address_from_cep(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CepQuery>,
) -> Result<Response, AppError> {
    match state.enrollments.lookup_address(&query.cep).await {
        Ok(address) => Ok(Json(address).into_response()),
        Err(CoreError::NotFound) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(err) => Err(err.into()),
    }
}
