//! Booking and listing eligibility. Pure checks over records the services
//! have already fetched.

use crate::models::{Room, TicketWithType, UserWithBookings};
use crate::{CoreError, CoreResult};

/// A room can take a booking when it exists and its capacity is non-zero.
pub fn bookable_room(room: Option<Room>) -> CoreResult<Room> {
    let room = room.ok_or(CoreError::RoomNotFound)?;
    if room.is_full() {
        return Err(CoreError::RoomIsFull);
    }
    Ok(room)
}

/// Booking needs an in-person, paid ticket.
pub fn ensure_ticket_can_book(ticket: &TicketWithType) -> CoreResult<()> {
    if ticket.ticket_type.is_remote || !ticket.is_paid() {
        return Err(CoreError::BookingRulesViolation);
    }
    Ok(())
}

/// Hotel listing additionally needs a ticket type that includes the hotel.
pub fn ensure_ticket_can_list_hotels(ticket: &TicketWithType) -> CoreResult<()> {
    if !ticket.is_paid() || ticket.ticket_type.is_remote || !ticket.ticket_type.includes_hotel {
        return Err(CoreError::CantListHotels);
    }
    Ok(())
}

pub fn ensure_has_booking(user: &UserWithBookings) -> CoreResult<()> {
    if user.bookings.is_empty() {
        return Err(CoreError::UserHasNoBooking);
    }
    Ok(())
}
