use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::CategoryStore;
use crate::database::{
    models::{CategoryInput, NewCategory, ServiceCategory},
    utils::sql,
};
use crate::error::AppResult;

const CATEGORY_COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn insert_category(&self, category: NewCategory) -> AppResult<ServiceCategory> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, ServiceCategory>(&sql(&format!(
            r#"
            INSERT INTO
                service_categories (id, name, description, created_at, updated_at)
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING {CATEGORY_COLUMNS}
            "#
        )))
        .bind(Uuid::new_v4())
        .bind(category.name)
        .bind(category.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_category(&self, id: Uuid) -> AppResult<Option<ServiceCategory>> {
        let category = sqlx::query_as::<_, ServiceCategory>(&sql(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM service_categories WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_categories(&self, ids: &[Uuid]) -> AppResult<Vec<ServiceCategory>> {
        let categories = sqlx::query_as::<_, ServiceCategory>(&sql(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM service_categories WHERE id = ANY(?)"
        )))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn find_category_by_name(&self, name: &str) -> AppResult<Option<ServiceCategory>> {
        let category = sqlx::query_as::<_, ServiceCategory>(&sql(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM service_categories WHERE LOWER(name) = LOWER(?)"
        )))
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn list_categories(&self, active_only: bool) -> AppResult<Vec<ServiceCategory>> {
        let categories = sqlx::query_as::<_, ServiceCategory>(&sql(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS}
            FROM service_categories
            WHERE (? = FALSE OR is_active = TRUE)
            ORDER BY name
            "#
        )))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> AppResult<Option<ServiceCategory>> {
        let category = sqlx::query_as::<_, ServiceCategory>(&sql(&format!(
            r#"
            UPDATE service_categories
            SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            RETURNING {CATEGORY_COLUMNS}
            "#
        )))
        .bind(input.name)
        .bind(input.description)
        .bind(input.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn deactivate_category(&self, id: Uuid) -> AppResult<Option<ServiceCategory>> {
        let category = sqlx::query_as::<_, ServiceCategory>(&sql(&format!(
            r#"
            UPDATE service_categories
            SET is_active = FALSE, updated_at = ?
            WHERE id = ?
            RETURNING {CATEGORY_COLUMNS}
            "#
        )))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }
}
