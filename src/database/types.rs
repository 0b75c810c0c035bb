use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::models::{LeaveRecord, LeaveSchedule, LeaveStatus, LeaveType, WeekdaySet};
use crate::error::AppError;

// Flat row shape of the leaves table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeaveRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub leave_type: LeaveType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub weekly_days: Option<Vec<i16>>,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<LeaveRow> for LeaveRecord {
    type Error = AppError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let schedule = match (row.leave_type, row.start_date, row.end_date, row.weekly_days) {
            (LeaveType::Single, Some(start_date), Some(end_date), None) => LeaveSchedule::Single {
                start_date,
                end_date,
            },
            (LeaveType::Weekly, None, None, Some(days)) => LeaveSchedule::Weekly {
                weekly_days: WeekdaySet::new(days.into_iter().map(i64::from))
                    .map_err(|e| AppError::Store(format!("leave {}: {}", row.id, e)))?,
            },
            (leave_type, ..) => {
                return Err(AppError::Store(format!(
                    "leave {} has a malformed {} shape",
                    row.id, leave_type
                )));
            }
        };

        Ok(LeaveRecord {
            id: row.id,
            user_id: row.user_id,
            schedule,
            reason: row.reason,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(leave_type: LeaveType) -> LeaveRow {
        let now = Utc::now();
        LeaveRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            leave_type,
            start_date: None,
            end_date: None,
            weekly_days: None,
            reason: None,
            status: LeaveStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_weekly_row_decodes_into_weekday_set() {
        let mut weekly = row(LeaveType::Weekly);
        weekly.weekly_days = Some(vec![6, 0]);

        let record = LeaveRecord::try_from(weekly).unwrap();
        assert_eq!(record.leave_type(), LeaveType::Weekly);
    }

    #[test]
    fn test_mixed_shape_row_is_rejected() {
        let mut broken = row(LeaveType::Single);
        broken.start_date = NaiveDate::from_ymd_opt(2025, 4, 1);
        broken.end_date = NaiveDate::from_ymd_opt(2025, 4, 2);
        broken.weekly_days = Some(vec![1]);

        assert!(matches!(
            LeaveRecord::try_from(broken),
            Err(AppError::Store(_))
        ));
        assert!(LeaveRecord::try_from(row(LeaveType::Weekly)).is_err());
    }
}
