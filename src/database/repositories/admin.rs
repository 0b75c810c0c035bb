use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::AdminStore;
use crate::database::{
    models::{Admin, NewAdmin},
    utils::sql,
};
use crate::error::AppResult;

#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for AdminRepository {
    async fn insert_admin(&self, admin: NewAdmin) -> AppResult<Admin> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Admin>(&sql(r#"
            INSERT INTO
                admins (id, admin_id, password_hash, name, created_at, updated_at)
            VALUES
                (?, ?, ?, ?, ?, ?)
            RETURNING
                id, admin_id, password_hash, name, created_at, updated_at
        "#))
        .bind(Uuid::new_v4())
        .bind(admin.admin_id)
        .bind(admin.password_hash)
        .bind(admin.name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_admin(&self, id: Uuid) -> AppResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&sql(r#"
            SELECT id, admin_id, password_hash, name, created_at, updated_at
            FROM admins
            WHERE id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn find_admin_by_login(&self, admin_id: &str) -> AppResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&sql(r#"
            SELECT id, admin_id, password_hash, name, created_at, updated_at
            FROM admins
            WHERE admin_id = ?
        "#))
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn count_admins(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_admins(&self) -> AppResult<Vec<Admin>> {
        let admins = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, admin_id, password_hash, name, created_at, updated_at
            FROM admins
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(admins)
    }
}
