use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::LeaveStore;
use crate::database::{
    models::{LeaveRecord, LeaveSchedule, LeaveStatus, LeaveType, NewLeave},
    types::LeaveRow,
    utils::sql,
};
use crate::error::AppResult;

const LEAVE_COLUMNS: &str = r#"
    id,
    user_id,
    leave_type,
    start_date,
    end_date,
    weekly_days,
    reason,
    status,
    created_at,
    updated_at
"#;

/// Leaves backed by Postgres. Collisions between active leaves are
/// rejected by the `leaves_single_no_overlap` exclusion constraint and the
/// `leaves_one_active_weekly` partial unique index.
#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_records(rows: Vec<LeaveRow>) -> AppResult<Vec<LeaveRecord>> {
    rows.into_iter().map(LeaveRecord::try_from).collect()
}

#[async_trait]
impl LeaveStore for LeaveRepository {
    async fn insert_leave(&self, leave: NewLeave) -> AppResult<LeaveRecord> {
        let now = Utc::now();
        let (start_date, end_date, weekly_days) = match &leave.schedule {
            LeaveSchedule::Single {
                start_date,
                end_date,
            } => (Some(*start_date), Some(*end_date), None),
            LeaveSchedule::Weekly { weekly_days } => (None, None, Some(weekly_days.to_db())),
        };

        let row = sqlx::query_as::<_, LeaveRow>(&sql(&format!(
            r#"
            INSERT INTO
                leaves (
                    id,
                    user_id,
                    leave_type,
                    start_date,
                    end_date,
                    weekly_days,
                    reason,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {LEAVE_COLUMNS}
            "#
        )))
        .bind(Uuid::new_v4())
        .bind(leave.user_id)
        .bind(leave.schedule.leave_type())
        .bind(start_date)
        .bind(end_date)
        .bind(weekly_days)
        .bind(leave.reason)
        .bind(LeaveStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        LeaveRecord::try_from(row)
    }

    async fn find_leave(&self, id: Uuid) -> AppResult<Option<LeaveRecord>> {
        let row = sqlx::query_as::<_, LeaveRow>(&sql(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leaves WHERE id = ?"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(LeaveRecord::try_from).transpose()
    }

    async fn list_leaves(&self, user_id: Option<Uuid>) -> AppResult<Vec<LeaveRecord>> {
        let rows = sqlx::query_as::<_, LeaveRow>(&sql(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leaves
            WHERE (?::uuid IS NULL OR user_id = ?)
            ORDER BY COALESCE(start_date, created_at::date) DESC, created_at DESC
            "#
        )))
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        into_records(rows)
    }

    async fn find_user_leaves(
        &self,
        user_id: Uuid,
        leave_type: Option<LeaveType>,
        statuses: &[LeaveStatus],
    ) -> AppResult<Vec<LeaveRecord>> {
        let statuses: Vec<&str> = statuses.iter().map(LeaveStatus::as_str).collect();

        let rows = sqlx::query_as::<_, LeaveRow>(&sql(&format!(
            r#"
            SELECT {LEAVE_COLUMNS}
            FROM leaves
            WHERE user_id = ?
                AND (?::varchar IS NULL OR leave_type = ?)
                AND status = ANY(?)
            ORDER BY created_at
            "#
        )))
        .bind(user_id)
        .bind(leave_type)
        .bind(leave_type)
        .bind(statuses)
        .fetch_all(&self.pool)
        .await?;

        into_records(rows)
    }

    async fn transition_leave(
        &self,
        id: Uuid,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> AppResult<Option<LeaveRecord>> {
        let row = sqlx::query_as::<_, LeaveRow>(&sql(&format!(
            r#"
            UPDATE leaves
            SET status = ?, updated_at = ?
            WHERE id = ? AND status = ?
            RETURNING {LEAVE_COLUMNS}
            "#
        )))
        .bind(to)
        .bind(Utc::now())
        .bind(id)
        .bind(from)
        .fetch_optional(&self.pool)
        .await?;

        row.map(LeaveRecord::try_from).transpose()
    }

    async fn delete_leave(&self, id: Uuid) -> AppResult<Option<LeaveRecord>> {
        let row = sqlx::query_as::<_, LeaveRow>(&sql(&format!(
            "DELETE FROM leaves WHERE id = ? RETURNING {LEAVE_COLUMNS}"
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(LeaveRecord::try_from).transpose()
    }
}
