use async_trait::async_trait;
use std::sync::Arc;
use crate::models::{
    Address, Booking, BookingWithRoom, Enrollment, EnrollmentWithAddress, Hotel, HotelWithRooms,
    NewAddress, NewEnrollment, Room, TicketWithType, UserWithBookings,
};

/// Error type returned by every repository; storage engines box their own.
pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_room_by_id(&self, room_id: i32) -> RepoResult<Option<Room>>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// First booking of the user (lowest id) together with its room.
    async fn find_booking_by_user(&self, user_id: i32) -> RepoResult<Option<BookingWithRoom>>;

    async fn find_booking_by_id_and_user(
        &self,
        booking_id: i32,
        user_id: i32,
    ) -> RepoResult<Option<Booking>>;

    async fn create_booking(&self, user_id: i32, room_id: i32) -> RepoResult<Booking>;

    async fn update_booking_room(&self, booking_id: i32, room_id: i32) -> RepoResult<Booking>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_with_bookings(&self, user_id: i32) -> RepoResult<Option<UserWithBookings>>;
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn find_enrollment_with_address(
        &self,
        user_id: i32,
    ) -> RepoResult<Option<EnrollmentWithAddress>>;

    /// Creates the user's enrollment or overwrites the existing one.
    async fn upsert_enrollment(
        &self,
        user_id: i32,
        enrollment: &NewEnrollment,
    ) -> RepoResult<Enrollment>;
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Creates the enrollment's address or overwrites the existing one.
    async fn upsert_address(&self, enrollment_id: i32, address: &NewAddress) -> RepoResult<Address>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_ticket_by_enrollment(&self, enrollment_id: i32)
        -> RepoResult<Option<TicketWithType>>;
}

#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn list_hotels(&self) -> RepoResult<Vec<Hotel>>;

    async fn find_hotel_with_rooms(&self, hotel_id: i32) -> RepoResult<Option<HotelWithRooms>>;
}

/// One handle per entity, shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub rooms: Arc<dyn RoomRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub users: Arc<dyn UserRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub addresses: Arc<dyn AddressRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub hotels: Arc<dyn HotelRepository>,
}

impl Repositories {
    /// Uses the same backend for every entity.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: RoomRepository
            + BookingRepository
            + UserRepository
            + EnrollmentRepository
            + AddressRepository
            + TicketRepository
            + HotelRepository
            + 'static,
    {
        Self {
            rooms: backend.clone(),
            bookings: backend.clone(),
            users: backend.clone(),
            enrollments: backend.clone(),
            addresses: backend.clone(),
            tickets: backend.clone(),
            hotels: backend,
        }
    }

    /// Resolves user → enrollment → ticket, the chain every eligibility
    /// check starts from. A missing link is `NotFound`.
    pub async fn ticket_for_user(&self, user_id: i32) -> crate::CoreResult<TicketWithType> {
        let enrollment = self
            .enrollments
            .find_enrollment_with_address(user_id)
            .await?
            .ok_or(crate::CoreError::NotFound)?;

        self.tickets
            .find_ticket_by_enrollment(enrollment.enrollment.id)
            .await?
            .ok_or(crate::CoreError::NotFound)
    }
}
