use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ServiceCategory;

/// Groups service categories under one heading for browsing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MainCategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub service_category_ids: Vec<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MainCategory {
    /// Same rule as service categories: trimmed, case-insensitive.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

#[derive(Debug, Clone)]
pub struct NewMainCategory {
    pub name: String,
    pub description: Option<String>,
    pub service_category_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainCategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub service_category_ids: Option<Vec<Uuid>>,
    pub is_active: Option<bool>,
}

/// A main category with its linked service categories resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainCategoryView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub service_categories: Vec<ServiceCategory>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MainCategoryView {
    /// Keeps the stored link order; ids with no matching category are dropped.
    pub fn resolve(main: MainCategory, categories: &[ServiceCategory]) -> Self {
        let service_categories = main
            .service_category_ids
            .iter()
            .filter_map(|id| categories.iter().find(|c| c.id == *id).cloned())
            .collect();

        Self {
            id: main.id,
            name: main.name,
            description: main.description,
            service_categories,
            is_active: main.is_active,
            created_at: main.created_at,
            updated_at: main.updated_at,
        }
    }
}

/// Drops repeated ids, keeping the first occurrence.
pub fn dedup_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn category(name: &str) -> ServiceCategory {
        let now = Utc::now();
        ServiceCategory {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_view_follows_link_order_and_skips_unknown_ids() {
        let plumber = category("Plumber");
        let painter = category("Painter");
        let now = Utc::now();
        let main = MainCategory {
            id: Uuid::new_v4(),
            name: "Home Repair".into(),
            description: None,
            service_category_ids: vec![painter.id, Uuid::new_v4(), plumber.id],
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let view = MainCategoryView::resolve(main, &[plumber.clone(), painter.clone()]);
        let names: Vec<&str> = view.service_categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Painter", "Plumber"]);
    }

    #[test]
    fn test_dedup_ids_keeps_first_occurrence() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(dedup_ids(vec![b, a, b, a]), vec![b, a]);
    }
}
