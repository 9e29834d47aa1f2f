use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lodge_core::models::{
    Address, Enrollment, EnrollmentWithAddress, NewAddress, NewEnrollment, Ticket, TicketStatus,
    TicketType, TicketWithType,
};
use lodge_core::repository::{
    AddressRepository, EnrollmentRepository, RepoResult, TicketRepository,
};
use lodge_shared::Masked;

use crate::database::PgStore;

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    id: i32,
    name: String,
    cpf: String,
    birthday: DateTime<Utc>,
    phone: String,
    user_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        Enrollment {
            id: row.id,
            name: row.name,
            cpf: Masked(row.cpf),
            birthday: row.birthday,
            phone: Masked(row.phone),
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i32,
    cep: String,
    street: String,
    city: String,
    state: String,
    number: String,
    neighborhood: String,
    address_detail: Option<String>,
    enrollment_id: i32,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Address {
            id: row.id,
            cep: row.cep,
            street: row.street,
            city: row.city,
            state: row.state,
            number: row.number,
            neighborhood: row.neighborhood,
            address_detail: row.address_detail,
            enrollment_id: row.enrollment_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: i32,
    ticket_type_id: i32,
    enrollment_id: i32,
    status: String,
    type_name: String,
    type_price: i32,
    is_remote: bool,
    includes_hotel: bool,
}

impl TryFrom<TicketRow> for TicketWithType {
    type Error = String;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status: TicketStatus = row.status.parse()?;
        Ok(TicketWithType {
            ticket: Ticket {
                id: row.id,
                ticket_type_id: row.ticket_type_id,
                enrollment_id: row.enrollment_id,
                status,
            },
            ticket_type: TicketType {
                id: row.ticket_type_id,
                name: row.type_name,
                price: row.type_price,
                is_remote: row.is_remote,
                includes_hotel: row.includes_hotel,
            },
        })
    }
}

const ENROLLMENT_COLUMNS: &str =
    "id, name, cpf, birthday, phone, user_id, created_at, updated_at";
const ADDRESS_COLUMNS: &str =
    "id, cep, street, city, state, number, neighborhood, address_detail, enrollment_id";

#[async_trait]
impl EnrollmentRepository for PgStore {
    async fn find_enrollment_with_address(
        &self,
        user_id: i32,
    ) -> RepoResult<Option<EnrollmentWithAddress>> {
        let Some(enrollment) = sqlx::query_as::<_, EnrollmentRow>(&format!(
            "SELECT {} FROM enrollments WHERE user_id = $1",
            ENROLLMENT_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let addresses = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {} FROM addresses WHERE enrollment_id = $1 ORDER BY id",
            ADDRESS_COLUMNS
        ))
        .bind(enrollment.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(EnrollmentWithAddress {
            enrollment: enrollment.into(),
            addresses: addresses.into_iter().map(Address::from).collect(),
        }))
    }

    async fn upsert_enrollment(
        &self,
        user_id: i32,
        enrollment: &NewEnrollment,
    ) -> RepoResult<Enrollment> {
        let row = sqlx::query_as::<_, EnrollmentRow>(&format!(
            r#"
            INSERT INTO enrollments (name, cpf, birthday, phone, user_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET name = EXCLUDED.name,
                cpf = EXCLUDED.cpf,
                birthday = EXCLUDED.birthday,
                phone = EXCLUDED.phone,
                updated_at = NOW()
            RETURNING {}
            "#,
            ENROLLMENT_COLUMNS
        ))
        .bind(&enrollment.name)
        .bind(enrollment.cpf.expose())
        .bind(enrollment.birthday)
        .bind(enrollment.phone.expose())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

#[async_trait]
impl AddressRepository for PgStore {
    async fn upsert_address(&self, enrollment_id: i32, address: &NewAddress) -> RepoResult<Address> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            r#"
            INSERT INTO addresses (cep, street, city, state, number, neighborhood, address_detail, enrollment_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (enrollment_id) DO UPDATE
            SET cep = EXCLUDED.cep,
                street = EXCLUDED.street,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                number = EXCLUDED.number,
                neighborhood = EXCLUDED.neighborhood,
                address_detail = EXCLUDED.address_detail,
                updated_at = NOW()
            RETURNING {}
            "#,
            ADDRESS_COLUMNS
        ))
        .bind(&address.cep)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.number)
        .bind(&address.neighborhood)
        .bind(&address.address_detail)
        .bind(enrollment_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

#[async_trait]
impl TicketRepository for PgStore {
    async fn find_ticket_by_enrollment(
        &self,
        enrollment_id: i32,
    ) -> RepoResult<Option<TicketWithType>> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT
                t.id, t.ticket_type_id, t.enrollment_id, t.status,
                tt.name AS type_name,
                tt.price AS type_price,
                tt.is_remote,
                tt.includes_hotel
            FROM tickets t
            JOIN ticket_types tt ON tt.id = t.ticket_type_id
            WHERE t.enrollment_id = $1
            ORDER BY t.id
            LIMIT 1
            "#,
        )
        .bind(enrollment_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(TicketWithType::try_from(row)?)),
            None => Ok(None),
        }
    }
}
