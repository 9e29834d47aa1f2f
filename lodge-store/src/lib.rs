pub mod app_config;
pub mod database;
pub mod booking_repo;
pub mod hotel_repo;
pub mod enrollment_repo;
pub mod address_client;

pub use database::{DbClient, PgStore};
pub use address_client::ViaCepClient;
