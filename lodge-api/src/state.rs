use std::sync::Arc;
use lodge_core::address::AddressLookup;
use lodge_core::{BookingService, EnrollmentService, HotelService, Repositories};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: BookingService,
    pub hotels: HotelService,
    pub enrollments: EnrollmentService,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(repos: Repositories, address_lookup: Arc<dyn AddressLookup>, auth: AuthConfig) -> Self {
        Self {
            bookings: BookingService::new(repos.clone()),
            hotels: HotelService::new(repos.clone()),
            enrollments: EnrollmentService::new(repos, address_lookup),
            auth,
        }
    }
}
