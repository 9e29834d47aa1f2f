use async_trait::async_trait;
use chrono::Utc;
use lodge_shared::Masked;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{
    Address, Booking, BookingWithRoom, Enrollment, EnrollmentWithAddress, Hotel, HotelWithRooms,
    NewAddress, NewEnrollment, Room, Ticket, TicketStatus, TicketType, TicketWithType, User,
    UserWithBookings,
};
use crate::repository::{
    AddressRepository, BookingRepository, EnrollmentRepository, HotelRepository, RepoResult,
    Repositories, RoomRepository, TicketRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    next_id: i32,
    users: BTreeMap<i32, User>,
    enrollments: BTreeMap<i32, Enrollment>,
    addresses: BTreeMap<i32, Address>,
    ticket_types: BTreeMap<i32, TicketType>,
    tickets: BTreeMap<i32, Ticket>,
    hotels: BTreeMap<i32, Hotel>,
    rooms: BTreeMap<i32, Room>,
    bookings: BTreeMap<i32, Booking>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store implementing every repository trait.
///
/// Ids come from one counter shared by all tables, ordered maps keep
/// "first" lookups deterministic. Foreign keys are checked on writes.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories::from_backend(self.clone())
    }

    pub async fn add_user(&self, email: &str) -> User {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    pub async fn add_hotel(&self, name: &str, image: &str) -> Hotel {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let hotel = Hotel {
            id: tables.next_id(),
            name: name.to_string(),
            image: image.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.hotels.insert(hotel.id, hotel.clone());
        hotel
    }

    pub async fn add_room(&self, hotel_id: i32, name: &str, capacity: i32) -> Room {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let room = Room {
            id: tables.next_id(),
            name: name.to_string(),
            capacity,
            hotel_id,
            created_at: now,
            updated_at: now,
        };
        tables.rooms.insert(room.id, room.clone());
        room
    }

    pub async fn add_enrollment(&self, user_id: i32, name: &str) -> Enrollment {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let enrollment = Enrollment {
            id: tables.next_id(),
            name: name.to_string(),
            cpf: Masked("12345678909".to_string()),
            birthday: now,
            phone: Masked("(21) 98999-9999".to_string()),
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.enrollments.insert(enrollment.id, enrollment.clone());
        enrollment
    }

    pub async fn add_ticket_type(&self, name: &str, is_remote: bool, includes_hotel: bool) -> TicketType {
        let mut tables = self.tables.write().await;
        let ticket_type = TicketType {
            id: tables.next_id(),
            name: name.to_string(),
            price: if is_remote { 250 } else { 600 },
            is_remote,
            includes_hotel,
        };
        tables.ticket_types.insert(ticket_type.id, ticket_type.clone());
        ticket_type
    }

    pub async fn add_ticket(&self, enrollment_id: i32, ticket_type_id: i32, status: TicketStatus) -> Ticket {
        let mut tables = self.tables.write().await;
        let ticket = Ticket {
            id: tables.next_id(),
            ticket_type_id,
            enrollment_id,
            status,
        };
        tables.tickets.insert(ticket.id, ticket.clone());
        ticket
    }

    /// User with an enrollment and a ticket of the given kind.
    pub async fn add_ticket_holder(
        &self,
        email: &str,
        status: TicketStatus,
        is_remote: bool,
        includes_hotel: bool,
    ) -> User {
        let user = self.add_user(email).await;
        let enrollment = self.add_enrollment(user.id, email).await;
        let ticket_type = self.add_ticket_type("Ticket", is_remote, includes_hotel).await;
        self.add_ticket(enrollment.id, ticket_type.id, status).await;
        user
    }

    pub async fn set_room_capacity(&self, room_id: i32, capacity: i32) {
        if let Some(room) = self.tables.write().await.rooms.get_mut(&room_id) {
            room.capacity = capacity;
        }
    }

    pub async fn booking(&self, booking_id: i32) -> Option<Booking> {
        self.tables.read().await.bookings.get(&booking_id).cloned()
    }

    pub async fn booking_count(&self) -> usize {
        self.tables.read().await.bookings.len()
    }
}

#[async_trait]
impl RoomRepository for InMemoryStore {
    async fn find_room_by_id(&self, room_id: i32) -> RepoResult<Option<Room>> {
        Ok(self.tables.read().await.rooms.get(&room_id).cloned())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn find_booking_by_user(&self, user_id: i32) -> RepoResult<Option<BookingWithRoom>> {
        let tables = self.tables.read().await;
        let Some(booking) = tables.bookings.values().find(|b| b.user_id == user_id) else {
            return Ok(None);
        };
        let room = tables
            .rooms
            .get(&booking.room_id)
            .ok_or_else(|| format!("booking {} references missing room {}", booking.id, booking.room_id))?;

        Ok(Some(BookingWithRoom {
            booking: booking.clone(),
            room: room.clone(),
        }))
    }

    async fn find_booking_by_id_and_user(
        &self,
        booking_id: i32,
        user_id: i32,
    ) -> RepoResult<Option<Booking>> {
        Ok(self
            .tables
            .read()
            .await
            .bookings
            .get(&booking_id)
            .filter(|b| b.user_id == user_id)
            .cloned())
    }

    async fn create_booking(&self, user_id: i32, room_id: i32) -> RepoResult<Booking> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(format!("foreign key violation: user {}", user_id).into());
        }
        if !tables.rooms.contains_key(&room_id) {
            return Err(format!("foreign key violation: room {}", room_id).into());
        }

        let now = Utc::now();
        let booking = Booking {
            id: tables.next_id(),
            user_id,
            room_id,
            created_at: now,
            updated_at: now,
        };
        tables.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn update_booking_room(&self, booking_id: i32, room_id: i32) -> RepoResult<Booking> {
        let mut tables = self.tables.write().await;
        if !tables.rooms.contains_key(&room_id) {
            return Err(format!("foreign key violation: room {}", room_id).into());
        }
        let booking = tables
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| format!("booking {} does not exist", booking_id))?;

        booking.room_id = room_id;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_user_with_bookings(&self, user_id: i32) -> RepoResult<Option<UserWithBookings>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&user_id).map(|user| UserWithBookings {
            user: user.clone(),
            bookings: tables
                .bookings
                .values()
                .filter(|b| b.user_id == user_id)
                .cloned()
                .collect(),
        }))
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn find_enrollment_with_address(
        &self,
        user_id: i32,
    ) -> RepoResult<Option<EnrollmentWithAddress>> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .values()
            .find(|e| e.user_id == user_id)
            .map(|enrollment| EnrollmentWithAddress {
                enrollment: enrollment.clone(),
                addresses: tables
                    .addresses
                    .values()
                    .filter(|a| a.enrollment_id == enrollment.id)
                    .cloned()
                    .collect(),
            }))
    }

    async fn upsert_enrollment(
        &self,
        user_id: i32,
        enrollment: &NewEnrollment,
    ) -> RepoResult<Enrollment> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(format!("foreign key violation: user {}", user_id).into());
        }

        let now = Utc::now();
        let existing = tables
            .enrollments
            .values()
            .find(|e| e.user_id == user_id)
            .map(|e| (e.id, e.created_at));
        let (id, created_at) = match existing {
            Some(found) => found,
            None => (tables.next_id(), now),
        };

        let row = Enrollment {
            id,
            name: enrollment.name.clone(),
            cpf: enrollment.cpf.clone(),
            birthday: enrollment.birthday,
            phone: enrollment.phone.clone(),
            user_id,
            created_at,
            updated_at: now,
        };
        tables.enrollments.insert(id, row.clone());
        Ok(row)
    }
}

#[async_trait]
impl AddressRepository for InMemoryStore {
    async fn upsert_address(&self, enrollment_id: i32, address: &NewAddress) -> RepoResult<Address> {
        let mut tables = self.tables.write().await;
        if !tables.enrollments.contains_key(&enrollment_id) {
            return Err(format!("foreign key violation: enrollment {}", enrollment_id).into());
        }

        let existing = tables
            .addresses
            .values()
            .find(|a| a.enrollment_id == enrollment_id)
            .map(|a| a.id);
        let id = match existing {
            Some(id) => id,
            None => tables.next_id(),
        };

        let row = Address {
            id,
            cep: address.cep.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            number: address.number.clone(),
            neighborhood: address.neighborhood.clone(),
            address_detail: address.address_detail.clone(),
            enrollment_id,
        };
        tables.addresses.insert(id, row.clone());
        Ok(row)
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn find_ticket_by_enrollment(
        &self,
        enrollment_id: i32,
    ) -> RepoResult<Option<TicketWithType>> {
        let tables = self.tables.read().await;
        let Some(ticket) = tables.tickets.values().find(|t| t.enrollment_id == enrollment_id) else {
            return Ok(None);
        };
        let ticket_type = tables
            .ticket_types
            .get(&ticket.ticket_type_id)
            .ok_or_else(|| format!("ticket {} references missing type {}", ticket.id, ticket.ticket_type_id))?;

        Ok(Some(TicketWithType {
            ticket: ticket.clone(),
            ticket_type: ticket_type.clone(),
        }))
    }
}

#[async_trait]
impl HotelRepository for InMemoryStore {
    async fn list_hotels(&self) -> RepoResult<Vec<Hotel>> {
        Ok(self.tables.read().await.hotels.values().cloned().collect())
    }

    async fn find_hotel_with_rooms(&self, hotel_id: i32) -> RepoResult<Option<HotelWithRooms>> {
        let tables = self.tables.read().await;
        Ok(tables.hotels.get(&hotel_id).map(|hotel| HotelWithRooms {
            hotel: hotel.clone(),
            rooms: tables
                .rooms
                .values()
                .filter(|r| r.hotel_id == hotel_id)
                .cloned()
                .collect(),
        }))
    }
}
