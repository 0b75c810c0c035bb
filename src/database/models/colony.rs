use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Colony {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub landmark: Option<String>,
    pub city: Option<String>,
    pub pincode: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewColony {
    pub name: String,
    pub address: Option<String>,
    pub landmark: Option<String>,
    pub city: Option<String>,
    pub pincode: i32,
    pub description: Option<String>,
}

/// Body for both create and partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColonyInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub landmark: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<i32>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColonySummary {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: i32,
}

impl From<&Colony> for ColonySummary {
    fn from(colony: &Colony) -> Self {
        Self {
            id: colony.id,
            name: colony.name.clone(),
            address: colony.address.clone(),
            city: colony.city.clone(),
            pincode: colony.pincode,
        }
    }
}
