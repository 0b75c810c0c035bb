use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::UserStore;
use crate::database::{
    models::{NewUser, User, UserChanges, UserRole},
    utils::sql,
};
use crate::error::AppResult;

const USER_COLUMNS: &str = r#"
    id,
    registration_id,
    full_name,
    mobile_number,
    whatsapp_number,
    email,
    password_hash,
    address,
    pincode,
    is_blocked,
    role,
    service_category_id,
    experience,
    service_charge,
    tatkal_enabled,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, User>(&sql(&format!(
            r#"
            INSERT INTO
                users (
                    id,
                    registration_id,
                    full_name,
                    mobile_number,
                    whatsapp_number,
                    email,
                    password_hash,
                    address,
                    pincode,
                    role,
                    service_category_id,
                    experience,
                    service_charge,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        )))
        .bind(Uuid::new_v4())
        .bind(user.registration_id)
        .bind(user.full_name)
        .bind(user.mobile_number)
        .bind(user.whatsapp_number)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.address)
        .bind(user.pincode)
        .bind(user.role)
        .bind(user.service_category_id)
        .bind(user.experience)
        .bind(user.service_charge)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_users(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&sql(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY(?)"
        )))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_user_by_mobile(&self, mobile_number: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE mobile_number = ?"
        )))
        .bind(mobile_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn registration_id_taken(&self, registration_id: &str) -> AppResult<bool> {
        let taken: bool =
            sqlx::query_scalar(&sql("SELECT EXISTS(SELECT 1 FROM users WHERE registration_id = ?)"))
                .bind(registration_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(taken)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&sql(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        )))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn set_user_blocked(&self, id: Uuid, is_blocked: bool) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(&format!(
            r#"
            UPDATE users
            SET is_blocked = ?, updated_at = ?
            WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        )))
        .bind(is_blocked)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(&format!(
            r#"
            UPDATE users
            SET
                full_name = COALESCE(?, full_name),
                mobile_number = COALESCE(?, mobile_number),
                whatsapp_number = COALESCE(?, whatsapp_number),
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                address = COALESCE(?, address),
                pincode = COALESCE(?, pincode),
                role = COALESCE(?, role),
                service_category_id = COALESCE(?, service_category_id),
                experience = COALESCE(?, experience),
                service_charge = COALESCE(?, service_charge),
                is_blocked = COALESCE(?, is_blocked),
                tatkal_enabled = COALESCE(?, tatkal_enabled),
                updated_at = ?
            WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        )))
        .bind(changes.full_name)
        .bind(changes.mobile_number)
        .bind(changes.whatsapp_number)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.address)
        .bind(changes.pincode)
        .bind(changes.role)
        .bind(changes.service_category_id)
        .bind(changes.experience)
        .bind(changes.service_charge)
        .bind(changes.is_blocked)
        .bind(changes.tatkal_enabled)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<Option<User>> {
        // Leaves, availabilities and needs go with it (ON DELETE CASCADE)
        let user = sqlx::query_as::<_, User>(&sql(&format!(
            "DELETE FROM users WHERE id = ? RETURNING {USER_COLUMNS}"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_tatkal_providers(
        &self,
        service_category_id: Option<Uuid>,
        pincode: Option<i32>,
    ) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&sql(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE tatkal_enabled = TRUE
                AND is_blocked = FALSE
                AND role = ?
                AND (?::uuid IS NULL OR service_category_id = ?)
                AND (?::int IS NULL OR pincode = ?)
            ORDER BY full_name
            "#
        )))
        .bind(UserRole::SocietyService)
        .bind(service_category_id)
        .bind(service_category_id)
        .bind(pincode)
        .bind(pincode)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
