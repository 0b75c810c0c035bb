use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::models::{
    LeaveCheck, LeaveRecord, LeaveRequestInput, LeaveSchedule, LeaveStatus, LeaveType, NewLeave,
    WeekdaySet, find_conflict,
};
use crate::database::repositories::{LeaveStore, UserStore};
use crate::error::{AppError, AppResult};
use crate::services::{
    access::{ensure_admin, ensure_owner_or_admin, resolve_subject},
    auth::Claims,
    clock::SharedClock,
    validation::{parse_calendar_date, require_date},
};

/// Turns a raw request body into a well-formed leave shape. Missing
/// `leaveType` means a single leave.
pub fn parse_schedule(input: &LeaveRequestInput) -> AppResult<LeaveSchedule> {
    let leave_type = match input.leave_type.as_deref().map(str::trim) {
        None | Some("") => LeaveType::Single,
        Some(raw) => raw
            .parse::<LeaveType>()
            .map_err(|_| AppError::validation("leaveType must be either single or weekly"))?,
    };

    match leave_type {
        LeaveType::Single => {
            if input.weekly_days.as_ref().is_some_and(|days| !days.is_empty()) {
                return Err(AppError::validation(
                    "weeklyDays is only allowed for weekly leaves",
                ));
            }

            let start_date = require_date("startDate", input.start_date.as_deref())?;
            let end_date = require_date("endDate", input.end_date.as_deref())?;
            if end_date < start_date {
                return Err(AppError::validation(
                    "endDate must be greater than or equal to startDate",
                ));
            }

            Ok(LeaveSchedule::Single {
                start_date,
                end_date,
            })
        }
        LeaveType::Weekly => {
            if input.start_date.is_some() || input.end_date.is_some() {
                return Err(AppError::validation(
                    "startDate and endDate are not allowed for weekly leaves",
                ));
            }

            let raw_days = input
                .weekly_days
                .as_ref()
                .ok_or_else(|| AppError::validation("weeklyDays is required for weekly leaves"))?;
            let days = raw_days
                .iter()
                .map(weekday_value)
                .collect::<AppResult<Vec<i64>>>()?;

            Ok(LeaveSchedule::Weekly {
                weekly_days: WeekdaySet::new(days).map_err(AppError::Validation)?,
            })
        }
    }
}

fn weekday_value(value: &serde_json::Value) -> AppResult<i64> {
    let day = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    day.ok_or_else(|| {
        AppError::validation(format!(
            "weeklyDays values must be integers between 0 and 6, got {}",
            value
        ))
    })
}

/// Conflict error carrying the colliding record so the caller can adjust.
pub fn conflict_error(existing: &LeaveRecord) -> AppError {
    let message = match &existing.schedule {
        LeaveSchedule::Single {
            start_date,
            end_date,
        } => format!(
            "Leave overlaps an existing {} leave from {} to {}",
            existing.status, start_date, end_date
        ),
        LeaveSchedule::Weekly { weekly_days } => format!(
            "An active weekly leave already exists on days {}; cancel it before requesting another",
            weekly_days
        ),
    };

    match serde_json::to_value(existing) {
        Ok(detail) => AppError::conflict_with(message, detail),
        Err(_) => AppError::conflict(message),
    }
}

/// Approved leave covering `date`. A single leave wins over a weekly one
/// when both match.
pub fn leave_on(leaves: &[LeaveRecord], date: NaiveDate) -> Option<&LeaveRecord> {
    let mut approved = leaves
        .iter()
        .filter(|leave| leave.status == LeaveStatus::Approved)
        .filter(|leave| leave.schedule.covers(date));

    let first = approved.next()?;
    if first.leave_type() == LeaveType::Single {
        return Some(first);
    }

    approved
        .find(|leave| leave.leave_type() == LeaveType::Single)
        .or(Some(first))
}

#[derive(Clone)]
pub struct LeaveService {
    leaves: Arc<dyn LeaveStore>,
    users: Arc<dyn UserStore>,
    clock: SharedClock,
}

impl LeaveService {
    pub fn new(leaves: Arc<dyn LeaveStore>, users: Arc<dyn UserStore>, clock: SharedClock) -> Self {
        Self {
            leaves,
            users,
            clock,
        }
    }

    /// Checks shape and collisions for a proposed leave without writing.
    pub async fn validate_new_leave(
        &self,
        provider_id: Uuid,
        input: &LeaveRequestInput,
    ) -> AppResult<LeaveSchedule> {
        let schedule = parse_schedule(input)?;

        let existing = self
            .leaves
            .find_user_leaves(
                provider_id,
                Some(schedule.leave_type()),
                LeaveStatus::ACTIVE,
            )
            .await?;

        if let Some(conflict) = find_conflict(&existing, &schedule) {
            log::warn!(
                "Leave for provider {} rejected: collides with leave {}",
                provider_id,
                conflict.id
            );
            return Err(conflict_error(conflict));
        }

        Ok(schedule)
    }

    pub async fn apply(&self, claims: &Claims, input: LeaveRequestInput) -> AppResult<LeaveRecord> {
        let provider_id = resolve_subject(claims, input.user_id)?;

        let provider = self
            .users
            .find_user(provider_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if !provider.is_provider() {
            return Err(AppError::validation(
                "Only society service users can apply for leave",
            ));
        }

        let schedule = self.validate_new_leave(provider_id, &input).await?;
        let reason = input
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let leave = self
            .leaves
            .insert_leave(NewLeave {
                user_id: provider_id,
                schedule,
                reason,
            })
            .await?;

        log::info!(
            "Leave {} created for provider {} ({})",
            leave.id,
            provider_id,
            leave.schedule
        );
        Ok(leave)
    }

    pub async fn list(&self, user_id: Option<Uuid>) -> AppResult<Vec<LeaveRecord>> {
        self.leaves.list_leaves(user_id).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<LeaveRecord> {
        self.leaves
            .find_leave(id)
            .await?
            .ok_or_else(|| AppError::not_found("Leave not found"))
    }

    /// Whether the provider has an approved leave on `date`, which defaults
    /// to today.
    pub async fn is_on_leave(&self, provider_id: Uuid, date: Option<&str>) -> AppResult<LeaveCheck> {
        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_calendar_date("date", raw)?,
            None => self.clock.today(),
        };

        if self.users.find_user(provider_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let approved = self
            .leaves
            .find_user_leaves(provider_id, None, &[LeaveStatus::Approved])
            .await?;
        let matched = leave_on(&approved, date).cloned();

        Ok(LeaveCheck {
            user_id: provider_id,
            date,
            is_on_leave: matched.is_some(),
            leave_type: matched.as_ref().map(LeaveRecord::leave_type),
            leave: matched,
        })
    }

    /// Admin decision on a pending leave.
    pub async fn update_status(
        &self,
        claims: &Claims,
        id: Uuid,
        status: LeaveStatus,
    ) -> AppResult<LeaveRecord> {
        ensure_admin(claims)?;

        if status == LeaveStatus::Pending {
            return Err(AppError::validation(
                "status must be either approved or rejected",
            ));
        }

        let leave = self.get(id).await?;
        if leave.status != LeaveStatus::Pending {
            return Err(AppError::validation(format!(
                "Leave is already {}",
                leave.status
            )));
        }

        let updated = self
            .leaves
            .transition_leave(id, LeaveStatus::Pending, status)
            .await?
            .ok_or_else(|| AppError::validation("Leave is no longer pending"))?;

        log::info!("Leave {} marked {} by {}", id, status, claims.user_id());
        Ok(updated)
    }

    /// Cancels a leave outright and returns what was removed.
    pub async fn cancel(&self, claims: &Claims, id: Uuid) -> AppResult<LeaveRecord> {
        let leave = self.get(id).await?;
        ensure_owner_or_admin(claims, leave.user_id)?;

        let deleted = self
            .leaves
            .delete_leave(id)
            .await?
            .ok_or_else(|| AppError::not_found("Leave not found"))?;

        log::info!("Leave {} cancelled by {}", id, claims.user_id());
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn input(body: serde_json::Value) -> LeaveRequestInput {
        serde_json::from_value(body).unwrap()
    }

    fn approved(schedule: LeaveSchedule) -> LeaveRecord {
        let now = Utc::now();
        LeaveRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            schedule,
            reason: None,
            status: LeaveStatus::Approved,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_parse_defaults_to_single() {
        let schedule =
            parse_schedule(&input(json!({ "startDate": "2025-04-01", "endDate": "2025-04-03" })))
                .unwrap();
        assert_eq!(
            schedule,
            LeaveSchedule::Single {
                start_date: date("2025-04-01"),
                end_date: date("2025-04-03"),
            }
        );
    }

    #[test]
    fn test_parse_rejects_reversed_range() {
        let err = parse_schedule(&input(json!({
            "leaveType": "single",
            "startDate": "2025-04-03",
            "endDate": "2025-04-01"
        })))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_parse_weekly_dedupes_and_checks_range() {
        let schedule = parse_schedule(&input(json!({
            "leaveType": "weekly",
            "weeklyDays": [6, 0, "6"]
        })))
        .unwrap();
        match schedule {
            LeaveSchedule::Weekly { weekly_days } => {
                assert_eq!(weekly_days.days().collect::<Vec<_>>(), vec![0, 6]);
            }
            other => panic!("expected weekly, got {:?}", other),
        }

        for bad in [json!([7]), json!([]), json!([1.5]), json!([null])] {
            let err = parse_schedule(&input(json!({ "leaveType": "weekly", "weeklyDays": bad })))
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn test_parse_rejects_mixed_shapes() {
        assert!(
            parse_schedule(&input(json!({
                "leaveType": "weekly",
                "weeklyDays": [1],
                "startDate": "2025-04-01"
            })))
            .is_err()
        );
        assert!(
            parse_schedule(&input(json!({
                "leaveType": "single",
                "startDate": "2025-04-01",
                "endDate": "2025-04-01",
                "weeklyDays": [1]
            })))
            .is_err()
        );
        assert!(parse_schedule(&input(json!({ "leaveType": "monthly" }))).is_err());
    }

    #[test]
    fn test_leave_on_prefers_single_over_weekly() {
        let weekly = approved(LeaveSchedule::Weekly {
            weekly_days: WeekdaySet::new(vec![6]).unwrap(),
        });
        let single = approved(LeaveSchedule::Single {
            start_date: date("2025-03-14"),
            end_date: date("2025-03-16"),
        });
        let leaves = vec![weekly.clone(), single.clone()];

        // Saturday inside the single range
        assert_eq!(leave_on(&leaves, date("2025-03-15")).map(|l| l.id), Some(single.id));
        // Following Saturday, weekly only
        assert_eq!(leave_on(&leaves, date("2025-03-22")).map(|l| l.id), Some(weekly.id));
        // Monday after, nothing
        assert!(leave_on(&leaves, date("2025-03-17")).is_none());
    }

    #[test]
    fn test_leave_on_ignores_pending() {
        let mut pending = approved(LeaveSchedule::Single {
            start_date: date("2025-03-14"),
            end_date: date("2025-03-16"),
        });
        pending.status = LeaveStatus::Pending;
        assert!(leave_on(&[pending], date("2025-03-15")).is_none());
    }

    #[test]
    fn test_conflict_error_carries_colliding_range() {
        let existing = approved(LeaveSchedule::Single {
            start_date: date("2025-04-01"),
            end_date: date("2025-04-03"),
        });

        match conflict_error(&existing) {
            AppError::Conflict { message, detail } => {
                assert!(message.contains("2025-04-01 to 2025-04-03"));
                let detail = detail.unwrap();
                assert_eq!(detail["startDate"], json!("2025-04-01"));
                assert_eq!(detail["endDate"], json!("2025-04-03"));
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }
}
