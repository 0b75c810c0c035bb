use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum LeaveType {
        Single => "single",
        Weekly => "weekly",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum LeaveStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

impl LeaveStatus {
    /// Pending and approved leaves block new requests.
    pub const ACTIVE: &'static [LeaveStatus] = &[LeaveStatus::Pending, LeaveStatus::Approved];

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

/// Non-empty set of weekdays, 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct WeekdaySet(BTreeSet<u8>);

impl WeekdaySet {
    pub fn new<I>(days: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut set = BTreeSet::new();
        for day in days {
            if !(0..=6).contains(&day) {
                return Err(format!("weeklyDays values must be between 0 and 6, got {}", day));
            }
            set.insert(day as u8);
        }

        if set.is_empty() {
            return Err("weeklyDays must contain at least one day".to_string());
        }

        Ok(Self(set))
    }

    pub fn contains(&self, day: u8) -> bool {
        self.0.contains(&day)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday().num_days_from_sunday() as u8)
    }

    pub fn days(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn to_db(&self) -> Vec<i16> {
        self.days().map(i16::from).collect()
    }
}

impl TryFrom<Vec<i64>> for WeekdaySet {
    type Error = String;

    fn try_from(days: Vec<i64>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<WeekdaySet> for Vec<i64> {
    fn from(set: WeekdaySet) -> Self {
        set.days().map(i64::from).collect()
    }
}

impl std::fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let days: Vec<String> = self.days().map(|d| d.to_string()).collect();
        write!(f, "[{}]", days.join(", "))
    }
}

/// The two leave shapes. A single leave is a closed date range, a weekly
/// leave is a recurring set of weekdays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "leaveType")]
pub enum LeaveSchedule {
    #[serde(rename = "single", rename_all = "camelCase")]
    Single {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    #[serde(rename = "weekly", rename_all = "camelCase")]
    Weekly { weekly_days: WeekdaySet },
}

impl LeaveSchedule {
    pub fn leave_type(&self) -> LeaveType {
        match self {
            LeaveSchedule::Single { .. } => LeaveType::Single,
            LeaveSchedule::Weekly { .. } => LeaveType::Weekly,
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        match self {
            LeaveSchedule::Single {
                start_date,
                end_date,
            } => *start_date <= date && date <= *end_date,
            LeaveSchedule::Weekly { weekly_days } => weekly_days.contains_date(date),
        }
    }

    /// Whether two active leaves of one provider may not coexist. Single
    /// ranges collide on closed-interval overlap. Any two weekly patterns
    /// collide regardless of their days. Mixed shapes never collide.
    pub fn collides_with(&self, other: &LeaveSchedule) -> bool {
        match (self, other) {
            (
                LeaveSchedule::Single {
                    start_date: a_start,
                    end_date: a_end,
                },
                LeaveSchedule::Single {
                    start_date: b_start,
                    end_date: b_end,
                },
            ) => a_start <= b_end && a_end >= b_start,
            (LeaveSchedule::Weekly { .. }, LeaveSchedule::Weekly { .. }) => true,
            _ => false,
        }
    }
}

/// First active leave in `existing` that blocks `proposed`.
pub fn find_conflict<'a>(
    existing: &'a [LeaveRecord],
    proposed: &LeaveSchedule,
) -> Option<&'a LeaveRecord> {
    existing
        .iter()
        .filter(|leave| leave.is_active())
        .find(|leave| leave.schedule.collides_with(proposed))
}

impl std::fmt::Display for LeaveSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveSchedule::Single {
                start_date,
                end_date,
            } => write!(f, "{} to {}", start_date, end_date),
            LeaveSchedule::Weekly { weekly_days } => write!(f, "every week on days {}", weekly_days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub schedule: LeaveSchedule,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveRecord {
    pub fn leave_type(&self) -> LeaveType {
        self.schedule.leave_type()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

#[derive(Debug, Clone)]
pub struct NewLeave {
    pub user_id: Uuid,
    pub schedule: LeaveSchedule,
    pub reason: Option<String>,
}

/// Raw request body. Field presence and formats are checked by the leave
/// service so malformed input surfaces as a validation error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestInput {
    pub user_id: Option<Uuid>,
    pub leave_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub weekly_days: Option<Vec<serde_json::Value>>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaveStatusInput {
    pub status: LeaveStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnLeaveQuery {
    pub date: Option<String>,
}

/// Answer to "is this provider on leave on this date".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveCheck {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub is_on_leave: bool,
    pub leave_type: Option<LeaveType>,
    pub leave: Option<LeaveRecord>,
}
