use std::sync::Arc;
use tracing::{info, warn};

use crate::address::{AddressLookup, CepAddress};
use crate::models::{EnrollmentResponse, UpsertEnrollmentRequest};
use crate::repository::Repositories;
use crate::{CoreError, CoreResult};

/// Conference registration records and their postal addresses.
#[derive(Clone)]
pub struct EnrollmentService {
    repos: Repositories,
    lookup: Arc<dyn AddressLookup>,
}

impl EnrollmentService {
    pub fn new(repos: Repositories, lookup: Arc<dyn AddressLookup>) -> Self {
        Self { repos, lookup }
    }

    pub async fn get_enrollment(&self, user_id: i32) -> CoreResult<EnrollmentResponse> {
        let enrollment = self
            .repos
            .enrollments
            .find_enrollment_with_address(user_id)
            .await?
            .ok_or(CoreError::NotFound)?;

        Ok(enrollment.into())
    }

    pub async fn lookup_address(&self, cep: &str) -> CoreResult<CepAddress> {
        self.lookup
            .lookup(cep)
            .await
            .map_err(|e| CoreError::Upstream(e.to_string()))?
            .ok_or(CoreError::NotFound)
    }

    /// Validates the postal code, then writes the enrollment and its address.
    pub async fn upsert_enrollment(
        &self,
        user_id: i32,
        request: &UpsertEnrollmentRequest,
    ) -> CoreResult<()> {
        let cep = &request.address.cep;
        let found = self
            .lookup
            .lookup(cep)
            .await
            .map_err(|e| CoreError::Upstream(e.to_string()))?;
        if found.is_none() {
            warn!(user_id, cep = %cep, "Rejected enrollment with unknown postal code");
            return Err(CoreError::InvalidAddress);
        }

        let enrollment = self
            .repos
            .enrollments
            .upsert_enrollment(user_id, &request.enrollment)
            .await?;
        self.repos
            .addresses
            .upsert_address(enrollment.id, &request.address)
            .await?;

        info!(user_id, enrollment_id = enrollment.id, "Enrollment saved");
        Ok(())
    }
}
