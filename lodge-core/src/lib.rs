pub mod models;
pub mod repository;
pub mod address;
pub mod booking;
pub mod hotel;
pub mod enrollment;
pub mod memory;

pub use booking::BookingService;
pub use hotel::HotelService;
pub use enrollment::EnrollmentService;
pub use repository::Repositories;

/// Failures surfaced by the booking, hotel and enrollment services.
///
/// Every variant knows the HTTP status it maps to, so the API layer never
/// has to inspect messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("No result for this search")]
    NotFound,
    #[error("Room not found")]
    RoomNotFound,
    #[error("Room is full")]
    RoomIsFull,
    #[error("User has no booking to update")]
    UserHasNoBooking,
    #[error("Booking not found for this user")]
    BookingNotFoundForUser,
    #[error("An in-person, paid ticket is required to book a room")]
    BookingRulesViolation,
    #[error("Can't list hotels")]
    CantListHotels,
    #[error("This address is invalid")]
    InvalidAddress,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Upstream service error: {0}")]
    Upstream(String),
}

impl CoreError {
    pub fn status(&self) -> u16 {
        match self {
            CoreError::NotFound | CoreError::RoomNotFound => 404,
            CoreError::RoomIsFull
            | CoreError::UserHasNoBooking
            | CoreError::BookingNotFoundForUser
            | CoreError::BookingRulesViolation => 403,
            CoreError::CantListHotels => 402,
            CoreError::InvalidAddress => 400,
            CoreError::Storage(_) | CoreError::Upstream(_) => 500,
        }
    }
}

impl From<repository::RepoError> for CoreError {
    fn from(err: repository::RepoError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
