use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    category::CategorySummary, colony::ColonySummary, macros::string_enum, user::UserSummary,
};

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum NeedStatus {
        Open => "open",
        InProgress => "in-progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Need {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_category_id: Uuid,
    pub colony_id: Uuid,
    pub description: String,
    pub status: NeedStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNeed {
    pub user_id: Uuid,
    pub service_category_id: Uuid,
    pub colony_id: Uuid,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedInput {
    pub user_id: Option<Uuid>,
    pub service_category_id: Option<Uuid>,
    pub colony_id: Option<Uuid>,
    pub description: Option<String>,
}

/// Query-string filters for need listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedFilter {
    pub user_id: Option<Uuid>,
    pub service_category_id: Option<Uuid>,
    pub colony_id: Option<Uuid>,
    #[serde(skip_deserializing)]
    pub colony_ids: Option<Vec<Uuid>>,
    pub status: Option<NeedStatus>,
}

impl NeedFilter {
    pub fn matches(&self, need: &Need) -> bool {
        self.user_id.is_none_or(|id| need.user_id == id)
            && self
                .service_category_id
                .is_none_or(|id| need.service_category_id == id)
            && self.colony_id.is_none_or(|id| need.colony_id == id)
            && self
                .colony_ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&need.colony_id))
            && self.status.is_none_or(|status| need.status == status)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingQuery {
    pub service_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedView {
    pub id: Uuid,
    pub user: Option<UserSummary>,
    pub service_category: Option<CategorySummary>,
    pub colony: Option<ColonySummary>,
    pub description: String,
    pub status: NeedStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NeedView {
    pub fn new(
        need: Need,
        user: Option<UserSummary>,
        service_category: Option<CategorySummary>,
        colony: Option<ColonySummary>,
    ) -> Self {
        Self {
            id: need.id,
            user,
            service_category,
            colony,
            description: need.description,
            status: need.status,
            created_at: need.created_at,
            updated_at: need.updated_at,
        }
    }
}

/// Result of matching open needs against a provider's availability zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedMatchResult {
    pub needs: Vec<NeedView>,
    pub colonies: Vec<ColonySummary>,
    pub total_needs: usize,
    pub available_colonies_count: usize,
    pub availability_records_count: usize,
    pub message: String,
}
