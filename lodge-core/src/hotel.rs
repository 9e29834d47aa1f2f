use tracing::{debug, error};

use crate::booking::rules;
use crate::models::{Hotel, HotelWithRooms};
use crate::repository::Repositories;
use crate::{CoreError, CoreResult};

/// Hotel catalog, visible only to holders of a paid, in-person ticket that
/// includes the hotel.
#[derive(Clone)]
pub struct HotelService {
    repos: Repositories,
}

impl HotelService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    async fn ensure_can_list(&self, user_id: i32) -> CoreResult<()> {
        let ticket = self.repos.ticket_for_user(user_id).await?;
        rules::ensure_ticket_can_list_hotels(&ticket).map_err(|err| {
            debug!(user_id, status = %ticket.ticket.status, "Hotel listing refused");
            err
        })
    }

    pub async fn list_hotels(&self, user_id: i32) -> CoreResult<Vec<Hotel>> {
        let listed = async {
            self.ensure_can_list(user_id).await?;
            Ok::<_, CoreError>(self.repos.hotels.list_hotels().await?)
        };
        listed.await.map_err(|err| listing_error(user_id, err))
    }

    pub async fn list_hotel_rooms(&self, user_id: i32, hotel_id: i32) -> CoreResult<HotelWithRooms> {
        let listed = async {
            self.ensure_can_list(user_id).await?;
            self.repos
                .hotels
                .find_hotel_with_rooms(hotel_id)
                .await?
                .ok_or(CoreError::NotFound)
        };
        listed.await.map_err(|err| listing_error(user_id, err))
    }
}

/// The listing path answers either "not found" or "can't list".
fn listing_error(user_id: i32, err: CoreError) -> CoreError {
    match err {
        CoreError::NotFound | CoreError::CantListHotels => err,
        other => {
            error!(user_id, error = %other, "Hotel listing failed");
            CoreError::CantListHotels
        }
    }
}
