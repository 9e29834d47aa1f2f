use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lodge_core::models::{Booking, BookingWithRoom, Room, User, UserWithBookings};
use lodge_core::repository::{BookingRepository, RepoResult, RoomRepository, UserRepository};

use crate::database::PgStore;

#[derive(sqlx::FromRow)]
pub(crate) struct RoomRow {
    id: i32,
    name: String,
    capacity: i32,
    hotel_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: row.id,
            name: row.name,
            capacity: row.capacity,
            hotel_id: row.hotel_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i32,
    user_id: i32,
    room_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            user_id: row.user_id,
            room_id: row.room_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRoomRow {
    id: i32,
    user_id: i32,
    room_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    room_name: String,
    room_capacity: i32,
    room_hotel_id: i32,
    room_created_at: DateTime<Utc>,
    room_updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const BOOKING_COLUMNS: &str = "id, user_id, room_id, created_at, updated_at";

#[async_trait]
impl RoomRepository for PgStore {
    async fn find_room_by_id(&self, room_id: i32) -> RepoResult<Option<Room>> {
        let row = sqlx::query_as::<_, RoomRow>(
            "SELECT id, name, capacity, hotel_id, created_at, updated_at FROM rooms WHERE id = $1",
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Room::from))
    }
}

#[async_trait]
impl BookingRepository for PgStore {
    async fn find_booking_by_user(&self, user_id: i32) -> RepoResult<Option<BookingWithRoom>> {
        let row = sqlx::query_as::<_, BookingRoomRow>(
            r#"
            SELECT
                b.id, b.user_id, b.room_id, b.created_at, b.updated_at,
                r.name AS room_name,
                r.capacity AS room_capacity,
                r.hotel_id AS room_hotel_id,
                r.created_at AS room_created_at,
                r.updated_at AS room_updated_at
            FROM bookings b
            JOIN rooms r ON r.id = b.room_id
            WHERE b.user_id = $1
            ORDER BY b.id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| BookingWithRoom {
            booking: Booking {
                id: row.id,
                user_id: row.user_id,
                room_id: row.room_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            room: Room {
                id: row.room_id,
                name: row.room_name,
                capacity: row.room_capacity,
                hotel_id: row.room_hotel_id,
                created_at: row.room_created_at,
                updated_at: row.room_updated_at,
            },
        }))
    }

    async fn find_booking_by_id_and_user(
        &self,
        booking_id: i32,
        user_id: i32,
    ) -> RepoResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE id = $1 AND user_id = $2",
            BOOKING_COLUMNS
        ))
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Booking::from))
    }

    async fn create_booking(&self, user_id: i32, room_id: i32) -> RepoResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "INSERT INTO bookings (user_id, room_id) VALUES ($1, $2) RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_booking_room(&self, booking_id: i32, room_id: i32) -> RepoResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET room_id = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(room_id)
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_user_with_bookings(&self, user_id: i32) -> RepoResult<Option<UserWithBookings>> {
        let Some(user) = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let bookings = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM bookings WHERE user_id = $1 ORDER BY id",
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(UserWithBookings {
            user: User {
                id: user.id,
                email: user.email,
                created_at: user.created_at,
                updated_at: user.updated_at,
            },
            bookings: bookings.into_iter().map(Booking::from).collect(),
        }))
    }
}
