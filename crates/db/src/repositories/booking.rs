use crate::{
    DbPool,
    models::{DbBooking, NewBooking},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use uuid::Uuid;

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Non-cancelled bookings intersecting `[start, end)`, ordered by start.
    ///
    /// With `worker_id` set only that worker's bookings are returned.
    async fn list_active_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        worker_id: Option<Uuid>,
    ) -> Result<Vec<DbBooking>>;

    async fn create_booking(&self, booking: NewBooking) -> Result<DbBooking>;

    async fn get_booking_by_id(&self, id: Uuid) -> Result<Option<DbBooking>>;

    /// Marks a booking cancelled. Returns `None` when the id is unknown.
    async fn cancel_booking(&self, id: Uuid) -> Result<Option<DbBooking>>;
}

pub struct PgBookingStore {
    pool: DbPool,
}

impl PgBookingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn list_active_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        worker_id: Option<Uuid>,
    ) -> Result<Vec<DbBooking>> {
        tracing::debug!(
            "Listing active bookings: start={}, end={}, worker_id={:?}",
            start, end, worker_id
        );

        let bookings = sqlx::query_as::<_, DbBooking>(
            r#"
            SELECT id, worker_id, client_name, client_email, service_name,
                   start_time, end_time, status, notes, created_at
            FROM bookings
            WHERE start_time < $2
              AND end_time > $1
              AND status <> 'cancelled'
              AND ($3::uuid IS NULL OR worker_id = $3)
            ORDER BY start_time ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<DbBooking> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        tracing::debug!(
            "Creating booking: id={}, start={}, end={}, worker_id={:?}",
            id, booking.start_time, booking.end_time, booking.worker_id
        );

        let created = sqlx::query_as::<_, DbBooking>(
            r#"
            INSERT INTO bookings (id, worker_id, client_name, client_email, service_name,
                                  start_time, end_time, status, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, worker_id, client_name, client_email, service_name,
                      start_time, end_time, status, notes, created_at
            "#,
        )
        .bind(id)
        .bind(booking.worker_id)
        .bind(&booking.client_name)
        .bind(&booking.client_email)
        .bind(&booking.service_name)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.status.as_str())
        .bind(&booking.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_booking_by_id(&self, id: Uuid) -> Result<Option<DbBooking>> {
        let booking = sqlx::query_as::<_, DbBooking>(
            r#"
            SELECT id, worker_id, client_name, client_email, service_name,
                   start_time, end_time, status, notes, created_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn cancel_booking(&self, id: Uuid) -> Result<Option<DbBooking>> {
        tracing::debug!("Cancelling booking: id={}", id);

        let booking = sqlx::query_as::<_, DbBooking>(
            r#"
            UPDATE bookings
            SET status = 'cancelled'
            WHERE id = $1
            RETURNING id, worker_id, client_name, client_email, service_name,
                      start_time, end_time, status, notes, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }
}
