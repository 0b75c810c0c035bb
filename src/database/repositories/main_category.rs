use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::MainCategoryStore;
use crate::database::{
    models::{MainCategory, MainCategoryInput, NewMainCategory},
    utils::sql,
};
use crate::error::AppResult;

const MAIN_CATEGORY_COLUMNS: &str =
    "id, name, description, service_category_ids, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct MainCategoryRepository {
    pool: PgPool,
}

impl MainCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MainCategoryStore for MainCategoryRepository {
    async fn insert_main_category(&self, main: NewMainCategory) -> AppResult<MainCategory> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, MainCategory>(&sql(&format!(
            r#"
            INSERT INTO
                main_categories (id, name, description, service_category_ids, created_at, updated_at)
            VALUES
                (?, ?, ?, ?, ?, ?)
            RETURNING {MAIN_CATEGORY_COLUMNS}
            "#
        )))
        .bind(Uuid::new_v4())
        .bind(main.name)
        .bind(main.description)
        .bind(main.service_category_ids)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_main_category(&self, id: Uuid) -> AppResult<Option<MainCategory>> {
        let main = sqlx::query_as::<_, MainCategory>(&sql(&format!(
            "SELECT {MAIN_CATEGORY_COLUMNS} FROM main_categories WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(main)
    }

    async fn list_main_categories(&self, active_only: bool) -> AppResult<Vec<MainCategory>> {
        let mains = sqlx::query_as::<_, MainCategory>(&sql(&format!(
            r#"
            SELECT {MAIN_CATEGORY_COLUMNS}
            FROM main_categories
            WHERE (? = FALSE OR is_active = TRUE)
            ORDER BY name
            "#
        )))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(mains)
    }

    async fn update_main_category(
        &self,
        id: Uuid,
        input: MainCategoryInput,
    ) -> AppResult<Option<MainCategory>> {
        let main = sqlx::query_as::<_, MainCategory>(&sql(&format!(
            r#"
            UPDATE main_categories
            SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                service_category_ids = COALESCE(?, service_category_ids),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            RETURNING {MAIN_CATEGORY_COLUMNS}
            "#
        )))
        .bind(input.name)
        .bind(input.description)
        .bind(input.service_category_ids)
        .bind(input.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(main)
    }

    async fn deactivate_main_category(&self, id: Uuid) -> AppResult<Option<MainCategory>> {
        let main = sqlx::query_as::<_, MainCategory>(&sql(&format!(
            r#"
            UPDATE main_categories
            SET is_active = FALSE, updated_at = ?
            WHERE id = ?
            RETURNING {MAIN_CATEGORY_COLUMNS}
            "#
        )))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(main)
    }
}
