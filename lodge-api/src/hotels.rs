use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use lodge_core::models::{Hotel, HotelWithRooms};

use crate::error::AppError;
use crate::extract::AppPath;
use crate::middleware::AuthUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hotels", get(list_hotels))
        .route("/hotels/{hotel_id}", get(list_hotel_rooms))
}

async fn list_hotels(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<Hotel>>, AppError> {
    Ok(Json(state.hotels.list_hotels(user_id).await?))
}

async fn list_hotel_rooms(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    AppPath(hotel_id): AppPath<i32>,
) -> Result<Json<HotelWithRooms>, AppError> {
    Ok(Json(state.hotels.list_hotel_rooms(user_id, hotel_id).await?))
}
