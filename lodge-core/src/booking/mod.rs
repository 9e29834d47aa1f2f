pub mod rules;

use tracing::{debug, error, info};

use crate::models::{BookingDoneResponse, BookingResponse};
use crate::repository::Repositories;
use crate::{CoreError, CoreResult};

/// Hotel room reservations for enrolled users.
///
/// Room existence and capacity are checked before any enrollment or ticket
/// lookup. The checks and the write are separate store calls with no
/// transaction around them, so two concurrent requests can both pass the
/// capacity gate.
#[derive(Clone)]
pub struct BookingService {
    repos: Repositories,
}

impl BookingService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// The user's current booking with its room. Any failure reads as
    /// `NotFound`.
    pub async fn get_booking(&self, user_id: i32) -> CoreResult<BookingResponse> {
        let booking = match self.repos.bookings.find_booking_by_user(user_id).await {
            Ok(Some(booking)) => booking,
            Ok(None) => return Err(CoreError::NotFound),
            Err(err) => {
                error!(user_id, error = %err, "Booking lookup failed");
                return Err(CoreError::NotFound);
            }
        };

        Ok(booking.into())
    }

    pub async fn create_booking(&self, user_id: i32, room_id: i32) -> CoreResult<BookingDoneResponse> {
        let room = self.repos.rooms.find_room_by_id(room_id).await?;
        rules::bookable_room(room)?;

        let ticket = self.repos.ticket_for_user(user_id).await?;
        rules::ensure_ticket_can_book(&ticket)?;

        let booking = self.repos.bookings.create_booking(user_id, room_id).await?;
        info!(user_id, room_id, booking_id = booking.id, "Booking created");

        Ok(BookingDoneResponse { booking_id: booking.id })
    }

    /// Moves one of the user's bookings to another room.
    pub async fn update_booking(
        &self,
        user_id: i32,
        room_id: i32,
        booking_id: i32,
    ) -> CoreResult<BookingDoneResponse> {
        let room = self.repos.rooms.find_room_by_id(room_id).await?;
        rules::bookable_room(room)?;

        let user = self
            .repos
            .users
            .find_user_with_bookings(user_id)
            .await?
            .ok_or(CoreError::NotFound)?;
        rules::ensure_has_booking(&user)?;

        let booking = self
            .repos
            .bookings
            .find_booking_by_id_and_user(booking_id, user_id)
            .await?
            .ok_or_else(|| {
                debug!(user_id, booking_id, "Booking does not belong to user");
                CoreError::BookingNotFoundForUser
            })?;

        self.repos.bookings.update_booking_room(booking.id, room_id).await?;
        info!(user_id, room_id, booking_id = booking.id, "Booking moved");

        Ok(BookingDoneResponse { booking_id: booking.id })
    }
}
