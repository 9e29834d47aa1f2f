use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use lodge_core::models::{BookingDoneResponse, BookingResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub room_id: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/booking", get(get_booking).post(create_booking))
        .route("/booking/{booking_id}", put(update_booking))
}

/// GET /booking
async fn get_booking(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.bookings.get_booking(user_id).await?;
    Ok(Json(booking))
}

/// POST /booking
async fn create_booking(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    AppJson(req): AppJson<BookingRequest>,
) -> Result<Json<BookingDoneResponse>, AppError> {
    let done = state.bookings.create_booking(user_id, req.room_id).await?;
    Ok(Json(done))
}

/// PUT /booking/:bookingId
async fn update_booking(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    AppPath(booking_id): AppPath<i32>,
    AppJson(req): AppJson<BookingRequest>,
) -> Result<Json<BookingDoneResponse>, AppError> {
    let done = state.bookings.update_booking(user_id, req.room_id, booking_id).await?;
    Ok(Json(done))
}
