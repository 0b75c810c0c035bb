use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{colony::ColonySummary, user::UserSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String, // HH:mm
    pub end_time: String,   // HH:mm
    pub is_available: bool,
    pub notes: Option<String>,
    pub colony_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAvailability {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
    pub notes: Option<String>,
    pub colony_ids: Vec<Uuid>,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityChanges {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_available: Option<bool>,
    pub notes: Option<String>,
    pub colony_ids: Option<Vec<Uuid>>,
}

impl AvailabilityChanges {
    pub fn apply_to(self, record: &mut Availability) {
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(start_time) = self.start_time {
            record.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            record.end_time = end_time;
        }
        if let Some(is_available) = self.is_available {
            record.is_available = is_available;
        }
        if let Some(notes) = self.notes {
            record.notes = Some(notes);
        }
        if let Some(colony_ids) = self.colony_ids {
            record.colony_ids = colony_ids;
        }
    }
}

/// Colony references as sent by clients: either a JSON array or a
/// comma-separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColonyIds {
    List(Vec<String>),
    Joined(String),
}

impl ColonyIds {
    /// Trimmed, non-empty entries in first-seen order without duplicates.
    pub fn entries(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            ColonyIds::List(items) => items.iter().map(String::as_str).collect(),
            ColonyIds::Joined(joined) => joined.split(',').collect(),
        };

        let mut entries: Vec<String> = Vec::with_capacity(raw.len());
        for item in raw.into_iter().map(str::trim).filter(|s| !s.is_empty()) {
            if !entries.iter().any(|e| e == item) {
                entries.push(item.to_string());
            }
        }
        entries
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInput {
    pub user_id: Option<Uuid>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_available: Option<bool>,
    pub notes: Option<String>,
    pub colony_ids: Option<ColonyIds>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityView {
    pub id: Uuid,
    pub user: Option<UserSummary>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
    pub notes: Option<String>,
    pub colonies: Vec<ColonySummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityView {
    pub fn new(
        record: Availability,
        user: Option<UserSummary>,
        colonies: Vec<ColonySummary>,
    ) -> Self {
        Self {
            id: record.id,
            user,
            date: record.date,
            start_time: record.start_time,
            end_time: record.end_time,
            is_available: record.is_available,
            notes: record.notes,
            colonies,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
