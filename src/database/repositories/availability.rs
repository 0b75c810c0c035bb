use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::AvailabilityStore;
use crate::database::{
    models::{Availability, AvailabilityChanges, NewAvailability},
    utils::sql,
};
use crate::error::AppResult;

const AVAILABILITY_COLUMNS: &str = r#"
    id,
    user_id,
    date,
    start_time,
    end_time,
    is_available,
    notes,
    colony_ids,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityStore for AvailabilityRepository {
    async fn insert_availability(&self, availability: NewAvailability) -> AppResult<Availability> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Availability>(&sql(&format!(
            r#"
            INSERT INTO
                availabilities (
                    id,
                    user_id,
                    date,
                    start_time,
                    end_time,
                    is_available,
                    notes,
                    colony_ids,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {AVAILABILITY_COLUMNS}
            "#
        )))
        .bind(Uuid::new_v4())
        .bind(availability.user_id)
        .bind(availability.date)
        .bind(availability.start_time)
        .bind(availability.end_time)
        .bind(availability.is_available)
        .bind(availability.notes)
        .bind(availability.colony_ids)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_availability(&self, id: Uuid) -> AppResult<Option<Availability>> {
        let availability = sqlx::query_as::<_, Availability>(&sql(&format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM availabilities WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(availability)
    }

    async fn list_availabilities(&self, user_id: Option<Uuid>) -> AppResult<Vec<Availability>> {
        let availabilities = sqlx::query_as::<_, Availability>(&sql(&format!(
            r#"
            SELECT {AVAILABILITY_COLUMNS}
            FROM availabilities
            WHERE (?::uuid IS NULL OR user_id = ?)
            ORDER BY date, start_time
            "#
        )))
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(availabilities)
    }

    async fn find_open_availabilities(
        &self,
        user_id: Uuid,
        from: NaiveDate,
    ) -> AppResult<Vec<Availability>> {
        let availabilities = sqlx::query_as::<_, Availability>(&sql(&format!(
            r#"
            SELECT {AVAILABILITY_COLUMNS}
            FROM availabilities
            WHERE user_id = ? AND date >= ? AND is_available = TRUE
            ORDER BY date, start_time
            "#
        )))
        .bind(user_id)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(availabilities)
    }

    async fn update_availability(
        &self,
        id: Uuid,
        changes: AvailabilityChanges,
    ) -> AppResult<Option<Availability>> {
        let availability = sqlx::query_as::<_, Availability>(&sql(&format!(
            r#"
            UPDATE availabilities
            SET
                date = COALESCE(?, date),
                start_time = COALESCE(?, start_time),
                end_time = COALESCE(?, end_time),
                is_available = COALESCE(?, is_available),
                notes = COALESCE(?, notes),
                colony_ids = COALESCE(?, colony_ids),
                updated_at = ?
            WHERE id = ?
            RETURNING {AVAILABILITY_COLUMNS}
            "#
        )))
        .bind(changes.date)
        .bind(changes.start_time)
        .bind(changes.end_time)
        .bind(changes.is_available)
        .bind(changes.notes)
        .bind(changes.colony_ids)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(availability)
    }

    async fn delete_availability(&self, id: Uuid) -> AppResult<Option<Availability>> {
        let availability = sqlx::query_as::<_, Availability>(&sql(&format!(
            "DELETE FROM availabilities WHERE id = ? RETURNING {AVAILABILITY_COLUMNS}"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(availability)
    }
}
