use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::ColonyStore;
use crate::database::{
    models::{Colony, ColonyInput, NewColony},
    utils::sql,
};
use crate::error::AppResult;

const COLONY_COLUMNS: &str = r#"
    id,
    name,
    address,
    landmark,
    city,
    pincode,
    description,
    is_active,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct ColonyRepository {
    pool: PgPool,
}

impl ColonyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ColonyStore for ColonyRepository {
    async fn insert_colony(&self, colony: NewColony) -> AppResult<Colony> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Colony>(&sql(&format!(
            r#"
            INSERT INTO
                colonies (
                    id,
                    name,
                    address,
                    landmark,
                    city,
                    pincode,
                    description,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COLONY_COLUMNS}
            "#
        )))
        .bind(Uuid::new_v4())
        .bind(colony.name)
        .bind(colony.address)
        .bind(colony.landmark)
        .bind(colony.city)
        .bind(colony.pincode)
        .bind(colony.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_colony(&self, id: Uuid) -> AppResult<Option<Colony>> {
        let colony = sqlx::query_as::<_, Colony>(&sql(&format!(
            "SELECT {COLONY_COLUMNS} FROM colonies WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(colony)
    }

    async fn find_colonies(&self, ids: &[Uuid]) -> AppResult<Vec<Colony>> {
        let colonies = sqlx::query_as::<_, Colony>(&sql(&format!(
            "SELECT {COLONY_COLUMNS} FROM colonies WHERE id = ANY(?) ORDER BY name"
        )))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(colonies)
    }

    async fn list_colonies(&self, active_only: bool) -> AppResult<Vec<Colony>> {
        let colonies = sqlx::query_as::<_, Colony>(&sql(&format!(
            r#"
            SELECT {COLONY_COLUMNS}
            FROM colonies
            WHERE (? = FALSE OR is_active = TRUE)
            ORDER BY name
            "#
        )))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(colonies)
    }

    async fn update_colony(&self, id: Uuid, input: ColonyInput) -> AppResult<Option<Colony>> {
        let colony = sqlx::query_as::<_, Colony>(&sql(&format!(
            r#"
            UPDATE colonies
            SET
                name = COALESCE(?, name),
                address = COALESCE(?, address),
                landmark = COALESCE(?, landmark),
                city = COALESCE(?, city),
                pincode = COALESCE(?, pincode),
                description = COALESCE(?, description),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            RETURNING {COLONY_COLUMNS}
            "#
        )))
        .bind(input.name)
        .bind(input.address)
        .bind(input.landmark)
        .bind(input.city)
        .bind(input.pincode)
        .bind(input.description)
        .bind(input.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(colony)
    }

    async fn delete_colony(&self, id: Uuid) -> AppResult<Option<Colony>> {
        let colony = sqlx::query_as::<_, Colony>(&sql(&format!(
            "DELETE FROM colonies WHERE id = ? RETURNING {COLONY_COLUMNS}"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(colony)
    }
}
