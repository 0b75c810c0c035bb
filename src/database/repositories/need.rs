use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::NeedStore;
use crate::database::{
    models::{Need, NeedFilter, NeedStatus, NewNeed},
    utils::sql,
};
use crate::error::AppResult;

const NEED_COLUMNS: &str = r#"
    id,
    user_id,
    service_category_id,
    colony_id,
    description,
    status,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct NeedRepository {
    pool: PgPool,
}

impl NeedRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NeedStore for NeedRepository {
    async fn insert_need(&self, need: NewNeed) -> AppResult<Need> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Need>(&sql(&format!(
            r#"
            INSERT INTO
                needs (
                    id,
                    user_id,
                    service_category_id,
                    colony_id,
                    description,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {NEED_COLUMNS}
            "#
        )))
        .bind(Uuid::new_v4())
        .bind(need.user_id)
        .bind(need.service_category_id)
        .bind(need.colony_id)
        .bind(need.description)
        .bind(NeedStatus::Open)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_need(&self, id: Uuid) -> AppResult<Option<Need>> {
        let need = sqlx::query_as::<_, Need>(&sql(&format!(
            "SELECT {NEED_COLUMNS} FROM needs WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(need)
    }

    async fn list_needs(&self, filter: &NeedFilter) -> AppResult<Vec<Need>> {
        let mut query = format!("SELECT {NEED_COLUMNS} FROM needs");
        let mut conditions: Vec<&str> = vec![];

        if filter.user_id.is_some() {
            conditions.push("user_id = ?");
        }
        if filter.service_category_id.is_some() {
            conditions.push("service_category_id = ?");
        }
        if filter.colony_id.is_some() {
            conditions.push("colony_id = ?");
        }
        if filter.colony_ids.is_some() {
            conditions.push("colony_id = ANY(?)");
        }
        if filter.status.is_some() {
            conditions.push("status = ?");
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY created_at DESC");

        let query = sql(&query);
        let mut statement = sqlx::query_as::<_, Need>(&query);

        if let Some(user_id) = filter.user_id {
            statement = statement.bind(user_id);
        }
        if let Some(category_id) = filter.service_category_id {
            statement = statement.bind(category_id);
        }
        if let Some(colony_id) = filter.colony_id {
            statement = statement.bind(colony_id);
        }
        if let Some(colony_ids) = &filter.colony_ids {
            statement = statement.bind(colony_ids.clone());
        }
        if let Some(status) = filter.status {
            statement = statement.bind(status);
        }

        let needs = statement.fetch_all(&self.pool).await?;

        Ok(needs)
    }

    async fn delete_need(&self, id: Uuid) -> AppResult<Option<Need>> {
        let need = sqlx::query_as::<_, Need>(&sql(&format!(
            "DELETE FROM needs WHERE id = ? RETURNING {NEED_COLUMNS}"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(need)
    }
}
